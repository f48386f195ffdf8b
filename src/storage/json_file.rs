use super::{KeyValueStore, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const EXTENSION: &str = "json";
const TMP_EXTENSION: &str = "tmp";

/// One pretty-printed JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", file_stem(key), EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Stages to a temporary file and renames so readers never see half a value.
    fn set(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension(TMP_EXTENSION);
        fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn file_stem(key: &str) -> String {
    key.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
