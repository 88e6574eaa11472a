// Tue Mar 10 2026 - Alex

use crate::dump::enums::EnumInfo;
use crate::dump::record::RecordInfo;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dump: {0}")]
    Json(#[from] serde_json::Error),
}

/// A complete type dump: two ordered sequences, consumed wholesale and
/// never written back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeDump {
    pub enums: Vec<EnumInfo>,
    pub records: Vec<RecordInfo>,
}

impl TypeDump {
    pub fn load(path: &Path) -> Result<Self, DumpError> {
        let file = File::open(path)?;
        let dump = serde_json::from_reader(BufReader::new(file))?;
        Ok(dump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dump_parses() {
        let dump: TypeDump = serde_json::from_str(r#"{"enums": [], "records": []}"#).unwrap();
        assert!(dump.enums.is_empty());
        assert!(dump.records.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = TypeDump::load(Path::new("/nonexistent/dump.json")).unwrap_err();
        assert!(matches!(err, DumpError::Io(_)));
    }
}
