//! Construct or dump a labeled graph from/to a csv file.
//!
//! One graph per file. Records are flexible :
//! - `n,<node id>,<label field>,<label field>...` declares a node, label fields are concatenated,
//! - `e,<source id>,<target id>` declares a directed edge.
//!
//! Lines beginning with `#` are comments. Node ids are arbitrary strings, densified in order of first appearance.


use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::errors::{GraphashError, Result};
use crate::graph::{GraphBuilder, LabeledGraph};


/// reads a graph from a csv file, the file name is the graph identifier
pub fn graph_from_csv(filepath: &Path) -> Result<LabeledGraph> {
    log::trace!("loading graph from {:?}", filepath.as_os_str());
    let file = OpenOptions::new().read(true).open(filepath).map_err(|e| {
        log::error!("graph_from_csv could not open file {:?}", filepath.as_os_str());
        GraphashError::io(filepath, e)
    })?;
    let id = filepath.file_name().map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filepath.to_string_lossy().into_owned());
    graph_from_reader(BufReader::new(file), &id, filepath)
} // end of graph_from_csv


fn format_error(filepath: &Path, record: Option<&StringRecord>, reason: String) -> GraphashError {
    let position = record.and_then(|r| r.position());
    GraphashError::Format {
        path: filepath.to_path_buf(),
        line: position.map(|p| p.line()),
        offset: position.map(|p| p.byte()),
        reason,
    }
}


/// reads a graph from any reader. filepath is only used in error reports.
pub fn graph_from_reader<R: Read>(reader: R, id: &str, filepath: &Path) -> Result<LabeledGraph> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader);
    //
    let mut builder = GraphBuilder::new(Some(id));
    let mut nb_record = 0usize;
    let mut nb_edges = 0usize;
    for result in rdr.records() {
        let record = result.map_err(|e| {
            let position = e.position().cloned();
            GraphashError::Format {
                path: filepath.to_path_buf(),
                line: position.as_ref().map(|p| p.line()),
                offset: position.as_ref().map(|p| p.byte()),
                reason: e.to_string(),
            }
        })?;
        nb_record += 1;
        match record.get(0) {
            Some("n") => {
                let node_id = record.get(1)
                    .ok_or_else(|| format_error(filepath, Some(&record), String::from("node record without id")))?;
                let fields: Vec<&str> = record.iter().skip(2).collect();
                builder.add_node(node_id, &fields);
            }
            Some("e") => {
                if record.len() < 3 {
                    return Err(format_error(filepath, Some(&record), format!("edge record with {} fields", record.len())));
                }
                builder.add_edge(&record[1], &record[2]);
                nb_edges += 1;
            }
            Some("") if record.len() == 1 => {}
            other => {
                return Err(format_error(filepath, Some(&record), format!("unknown record type {:?}", other)));
            }
        }
    }
    log::trace!("{} : {} records, {} nodes, {} edges", id, nb_record, builder.nb_nodes(), nb_edges);
    builder.build()
} // end of graph_from_reader


/// dumps a graph in the format read by [graph_from_csv]. Labels are written as one field,
/// fields holding a comma, a quote or a line break are quoted.
pub fn graph_to_csv(graph: &LabeledGraph, filepath: &Path) -> Result<()> {
    let file = OpenOptions::new().write(true).create(true).truncate(true).open(filepath)
        .map_err(|e| GraphashError::io(filepath, e))?;
    let mut header = BufWriter::new(file);
    writeln!(header, "# {}", graph.describe().replace('\n', " ")).map_err(|e| GraphashError::io(filepath, e))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(header);
    let csv_err = |e: csv::Error| GraphashError::io(filepath, std::io::Error::from(e));
    for node in 0..graph.node_count() {
        let node_id = graph.original_id(node).map(|s| s.to_string()).unwrap_or_else(|| node.to_string());
        writer.write_record(["n", node_id.as_str(), graph.label(node)]).map_err(csv_err)?;
    }
    for (from, to) in graph.edges() {
        let from = graph.original_id(from).map(|s| s.to_string()).unwrap_or_else(|| from.to_string());
        let to = graph.original_id(to).map(|s| s.to_string()).unwrap_or_else(|| to.to_string());
        writer.write_record(["e", from.as_str(), to.as_str()]).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| GraphashError::io(filepath, e))?;
    Ok(())
} // end of graph_to_csv


#[cfg(test)]
mod tests {

    use super::*;
    use crate::bags::BagMode;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const README_CSV: &str = "# README graph\n\
        n,1,A\nn,2,B\nn,3,C\nn,4,A\nn,5,B\nn,6,C\n\
        e,1,2\ne,2,3\ne,3,4\ne,4,5\ne,5,6\ne,5,2\n";

    #[test]
    fn load_readme_graph() {
        log_init_test();
        let graph = graph_from_reader(README_CSV.as_bytes(), "readme", Path::new("readme.csv")).unwrap();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.original_id(4), Some("5"));
        let bag = BagMode::Edges.extract(&graph);
        assert_eq!(bag.get("B-B"), Some(1.));
        assert_eq!(bag.get("A-B"), Some(2.));
    } // end of load_readme_graph

    #[test]
    fn multi_field_labels_and_late_declaration() {
        log_init_test();
        let content = "e, f, g\nn, f, 0, 1, 1\nn, g, 1,0\n";
        let graph = graph_from_reader(content.as_bytes(), "g", Path::new("g.csv")).unwrap();
        assert_eq!(graph.label(0), "011");
        assert_eq!(graph.label(1), "10");
    }

    #[test]
    fn format_and_validation_errors() {
        log_init_test();
        let content = "n,1,A\nx,1,2\n";
        match graph_from_reader(content.as_bytes(), "bad", Path::new("bad.csv")) {
            Err(GraphashError::Format { line, offset, .. }) => {
                assert_eq!(line, Some(2));
                assert_eq!(offset, Some(6));
            }
            other => panic!("unexpected {:?}", other),
        }
        let content = "n,1,A\ne,1\n";
        assert!(matches!(graph_from_reader(content.as_bytes(), "bad", Path::new("bad.csv")), Err(GraphashError::Format { .. })));
        // unlabeled node
        let content = "n,1,A\ne,1,2\n";
        assert!(matches!(graph_from_reader(content.as_bytes(), "bad", Path::new("bad.csv")), Err(GraphashError::Validation { .. })));
        // missing file
        let missing = std::env::temp_dir().join("graphash_no_such_dir").join("none.csv");
        assert!(matches!(graph_from_csv(&missing), Err(GraphashError::Io { .. })));
    }

    #[test]
    fn dump_and_reload() {
        log_init_test();
        let dir = std::env::temp_dir().join("graphash_csv_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("readme.csv");
        let graph = graph_from_reader(README_CSV.as_bytes(), "readme.csv", Path::new("readme.csv")).unwrap();
        graph_to_csv(&graph, &path).unwrap();
        let reloaded = graph_from_csv(&path).unwrap();
        assert_eq!(reloaded.get_id(), Some("readme.csv"));
        for mode in [BagMode::Nodes, BagMode::Edges, BagMode::BranchlessPaths] {
            assert_eq!(mode.extract(&graph), mode.extract(&reloaded));
        }
    }

    #[test]
    fn labels_with_commas_and_quotes_survive_dump() {
        log_init_test();
        let mut builder = GraphBuilder::new(Some("quoted.csv"));
        builder.add_node("x,1", &["a,b"]);
        builder.add_node("y\"2", &["say \"hi\""]);
        builder.add_node("z", &["c"]);
        builder.add_edge("x,1", "y\"2");
        builder.add_edge("y\"2", "z");
        let graph = builder.build().unwrap();
        //
        let dir = std::env::temp_dir().join("graphash_csv_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quoted.csv");
        graph_to_csv(&graph, &path).unwrap();
        let reloaded = graph_from_csv(&path).unwrap();
        let labels: Vec<&str> = (0..reloaded.node_count()).map(|n| reloaded.label(n)).collect();
        log::debug!("reloaded labels {:?}", labels);
        assert_eq!(labels, vec!["a,b", "say \"hi\"", "c"]);
        assert_eq!(reloaded.original_id(0), Some("x,1"));
        assert_eq!(reloaded.original_id(1), Some("y\"2"));
        assert_eq!(reloaded.edge_count(), 2);
        for mode in [BagMode::Nodes, BagMode::Edges] {
            assert_eq!(mode.extract(&graph), mode.extract(&reloaded));
        }
    } // end of labels_with_commas_and_quotes_survive_dump
} // end of mod tests
