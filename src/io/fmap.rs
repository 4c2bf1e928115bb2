//! Feature map dump : a json object mapping each dimension (as a string) to the array of keys hashed into it.

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::errors::{GraphashError, Result};
use crate::hashing::FeatureMap;


fn json_error(path: &Path, e: serde_json::Error) -> GraphashError {
    if e.is_io() {
        return GraphashError::io(path, std::io::Error::from(e));
    }
    GraphashError::Format {
        path: path.to_path_buf(),
        line: Some(e.line() as u64),
        offset: None,
        reason: e.to_string(),
    }
}


/// writes the map, dimensions in ascending order and keys sorted
pub fn write_feature_map(fmap: &FeatureMap, path: &Path) -> Result<()> {
    let file = OpenOptions::new().write(true).create(true).truncate(true).open(path)
        .map_err(|e| GraphashError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, fmap).map_err(|e| json_error(path, e))?;
    writer.flush().map_err(|e| GraphashError::io(path, e))?;
    log::info!("feature map with {} dimensions and {} keys dumped in {:?}", fmap.nb_dims(), fmap.nb_keys(), path.as_os_str());
    Ok(())
} // end of write_feature_map


pub fn read_feature_map(path: &Path) -> Result<FeatureMap> {
    let file = OpenOptions::new().read(true).open(path).map_err(|e| GraphashError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| json_error(path, e))
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn json_layout_and_reload() {
        let mut fmap = FeatureMap::new();
        fmap.insert(12, "B-C");
        fmap.insert(3, "A");
        fmap.insert(12, "A-B");
        fmap.insert(12, "A-B");
        let json = serde_json::to_string(&fmap).unwrap();
        assert_eq!(json, r#"{"3":["A"],"12":["A-B","B-C"]}"#);
        //
        let dir = std::env::temp_dir().join("graphash_fmap_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fmap.json");
        write_feature_map(&fmap, &path).unwrap();
        assert_eq!(read_feature_map(&path).unwrap(), fmap);
        std::fs::write(&path, r#"{"x": ["A"]}"#).unwrap();
        assert!(matches!(read_feature_map(&path), Err(GraphashError::Format { .. })));
    }
} // end of mod tests
