//! JSON table output
//!
//! Each table is written as a pretty-printed JSON array of flat records.
//! Non-ASCII text is written verbatim. All four tables are serialized
//! before the output directory is touched, then staged as `.tmp` files and
//! renamed into place once every stage write has succeeded.

use crate::error::{GenError, GenResult};
use crate::pipeline::GeneratedTables;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const PERSON_DATA_FILE: &str = "person_data.json";
pub const PERSON_VOTE_DATA_FILE: &str = "person_vote_data.json";
pub const FACT_DATA_FILE: &str = "fact_data.json";
pub const VOTE_DETAIL_DATA_FILE: &str = "vote_detail_data.json";

/// A serialized table ready to be written
struct RenderedTable {
    file_name: &'static str,
    records: usize,
    bytes: Vec<u8>,
}

/// Writes the generated tables into one directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write all four tables, returning the final file paths
    pub fn write_all(&self, tables: &GeneratedTables) -> GenResult<Vec<PathBuf>> {
        let rendered = [
            render(PERSON_DATA_FILE, &tables.person)?,
            render(PERSON_VOTE_DATA_FILE, &tables.person_vote)?,
            render(FACT_DATA_FILE, &tables.fact)?,
            render(VOTE_DETAIL_DATA_FILE, &tables.vote_detail)?,
        ];

        fs::create_dir_all(&self.output_dir).map_err(|e| output_error(&self.output_dir, e))?;

        let mut staged: Vec<PathBuf> = Vec::with_capacity(rendered.len());
        for table in &rendered {
            let tmp_path = self.output_dir.join(format!("{}.tmp", table.file_name));
            if let Err(e) = fs::write(&tmp_path, &table.bytes) {
                self.discard(&staged);
                return Err(output_error(&tmp_path, e));
            }
            staged.push(tmp_path);
        }

        let mut written = Vec::with_capacity(rendered.len());
        for (index, (table, tmp_path)) in rendered.iter().zip(&staged).enumerate() {
            let final_path = self.output_dir.join(table.file_name);
            if let Err(e) = fs::rename(tmp_path, &final_path) {
                self.discard(&staged[index..]);
                return Err(output_error(&final_path, e));
            }
            info!(file = table.file_name, records = table.records, "Saved table");
            written.push(final_path);
        }

        Ok(written)
    }

    fn discard(&self, staged: &[PathBuf]) {
        for path in staged {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "Failed to remove staged file");
            }
        }
    }
}

fn render<T: Serialize>(file_name: &'static str, rows: &[T]) -> GenResult<RenderedTable> {
    let bytes = serde_json::to_vec_pretty(rows).map_err(politigraph_common::Error::from)?;
    Ok(RenderedTable {
        file_name,
        records: rows.len(),
        bytes,
    })
}

fn output_error(path: &Path, source: std::io::Error) -> GenError {
    GenError::Output {
        path: path.display().to_string(),
        source,
    }
}
