//! libsvm style records : `<label> <dim>:<value> <dim>:<value> ...`, one line per graph.
//!
//! Dimensions are written in ascending order and values with absolute value below [ZERO_THRESHOLD] are omitted.
//! Stacking concatenates the feature spaces of several files describing the same corpus.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{GraphashError, Result};
use crate::hashing::SparseVector;

/// values below this (in absolute value) are not written
pub const ZERO_THRESHOLD: f64 = 1.0e-9;


/// formats one record, newline included
pub fn format_record(label: i64, vector: &SparseVector) -> String {
    let mut line = label.to_string();
    for (dim, value) in vector.iter() {
        if value.abs() < ZERO_THRESHOLD {
            continue;
        }
        line.push_str(&format!(" {}:{}", dim, value));
    }
    line.push('\n');
    line
} // end of format_record


/// Sequential writer of records. Opened in append mode for the bundles following the first one.
pub struct LibsvmWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    nb_records: usize,
}

impl LibsvmWriter {

    pub fn new(path: &Path, append: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        if append {
            options.append(true).create(true);
        } else {
            options.write(true).create(true).truncate(true);
        }
        let file = options.open(path).map_err(|e| {
            log::error!("LibsvmWriter could not open {:?}", path.as_os_str());
            GraphashError::io(path, e)
        })?;
        Ok(LibsvmWriter { path: path.to_path_buf(), writer: BufWriter::new(file), nb_records: 0 })
    }

    pub fn write_record(&mut self, label: i64, vector: &SparseVector) -> Result<()> {
        self.writer.write_all(format_record(label, vector).as_bytes())
            .map_err(|e| GraphashError::io(&self.path, e))?;
        self.nb_records += 1;
        Ok(())
    }

    /// number of records written by this writer
    pub fn get_nb_records(&self) -> usize {
        self.nb_records
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| GraphashError::io(&self.path, e))
    }
} // end of impl LibsvmWriter


/// parses one line. line_num and offset are for error reports
fn parse_record(line: &str, path: &Path, line_num: u64, offset: u64) -> Result<(i64, SparseVector)> {
    let format_err = |reason: String| GraphashError::Format {
        path: path.to_path_buf(),
        line: Some(line_num),
        offset: Some(offset),
        reason,
    };
    let mut fields = line.split_whitespace();
    let label = fields.next()
        .ok_or_else(|| format_err(String::from("empty record")))?
        .parse::<i64>()
        .map_err(|e| format_err(format!("bad label : {}", e)))?;
    let mut vector = SparseVector::new();
    let mut last_dim: Option<u32> = None;
    for field in fields {
        let (dim, value) = field.split_once(':').ok_or_else(|| format_err(format!("bad entry {}", field)))?;
        let dim = dim.parse::<u32>().map_err(|e| format_err(format!("bad dimension {} : {}", dim, e)))?;
        let value = value.parse::<f64>().map_err(|e| format_err(format!("bad value {} : {}", value, e)))?;
        if last_dim.map_or(false, |last| dim <= last) {
            return Err(format_err(format!("dimension {} not in ascending order", dim)));
        }
        last_dim = Some(dim);
        vector.set(dim, value);
    }
    Ok((label, vector))
} // end of parse_record


/// reads all records of a file. Blank lines are skipped.
pub fn read_libsvm(path: &Path) -> Result<Vec<(i64, SparseVector)>> {
    let file = File::open(path).map_err(|e| GraphashError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut records = Vec::new();
    let mut line = String::new();
    let mut offset = 0u64;
    let mut line_num = 0u64;
    loop {
        line.clear();
        let nb_read = reader.read_line(&mut line).map_err(|e| GraphashError::Io {
            path: path.to_path_buf(),
            offset: Some(offset),
            source: e,
        })?;
        if nb_read == 0 {
            break;
        }
        line_num += 1;
        if !line.trim().is_empty() {
            records.push(parse_record(&line, path, line_num, offset)?);
        }
        offset += nb_read as u64;
    }
    log::debug!("read {} records from {:?}", records.len(), path.as_os_str());
    Ok(records)
} // end of read_libsvm


/// Concatenates feature spaces. The vector of input k has its dimensions shifted by k * 2^bits.
/// Inputs must have the same number of records with the same labels, record by record.
/// Returns the number of records written.
pub fn stack_libsvm(inputs: &[PathBuf], bits: u32, output: &Path) -> Result<usize> {
    if inputs.is_empty() {
        return Err(GraphashError::config("nothing to stack"));
    }
    let space = 1u64 << bits.min(32);
    let contents = inputs.iter().map(|p| read_libsvm(p)).collect::<Result<Vec<_>>>()?;
    let nb_records = contents[0].len();
    for (k, content) in contents.iter().enumerate() {
        if content.len() != nb_records {
            return Err(GraphashError::Format {
                path: inputs[k].clone(),
                line: None,
                offset: None,
                reason: format!("{} records, {} expected", content.len(), nb_records),
            });
        }
    }
    //
    let mut writer = LibsvmWriter::new(output, false)?;
    for rank in 0..nb_records {
        let label = contents[0][rank].0;
        let mut stacked = SparseVector::new();
        for (k, content) in contents.iter().enumerate() {
            let (other_label, vector) = &content[rank];
            if *other_label != label {
                return Err(GraphashError::Format {
                    path: inputs[k].clone(),
                    line: Some(rank as u64 + 1),
                    offset: None,
                    reason: format!("label {} differs from label {} of {:?}", other_label, label, inputs[0]),
                });
            }
            if let Some(max_dim) = vector.max_dim() {
                if max_dim as u64 >= space {
                    return Err(GraphashError::Format {
                        path: inputs[k].clone(),
                        line: Some(rank as u64 + 1),
                        offset: None,
                        reason: format!("dimension {} out of 2^{} space", max_dim, bits),
                    });
                }
            }
            stacked.extend(&vector.shifted(k as u64 * space)?);
        }
        writer.write_record(label, &stacked)?;
    }
    writer.flush()?;
    log::info!("stacked {} files of {} records into {:?}", inputs.len(), nb_records, output.as_os_str());
    Ok(nb_records)
} // end of stack_libsvm


// end of mod tests
