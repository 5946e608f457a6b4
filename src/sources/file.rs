//! Local JSON file source.
//!
//! Reads either a bare array of records or a json-server `db.json` document.
//! Files ending in `.gz` are decompressed transparently.

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::Result;
use crate::models::{records_from_payload, SalesRecord};
use crate::sources::RecordSource;

/// Records read from a JSON file on every fetch, filtered client-side.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_contents(&self) -> Result<String> {
        if self.path.extension().and_then(|e| e.to_str()) == Some("gz") {
            let file = fs::File::open(&self.path)?;
            let mut decoder = BufReader::new(GzDecoder::new(BufReader::new(file)));
            let mut contents = String::new();
            decoder.read_to_string(&mut contents)?;
            Ok(contents)
        } else {
            Ok(fs::read_to_string(&self.path)?)
        }
    }
}

impl RecordSource for FileSource {
    fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        let contents = self.read_contents()?;
        let payload: serde_json::Value = serde_json::from_str(&contents)?;
        let records = records_from_payload(payload)?;
        debug!(path = %self.path.display(), count = records.len(), "loaded sales records");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("file({})", self.path.display())
    }
}
