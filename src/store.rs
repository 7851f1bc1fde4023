use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize as _;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::error::{PipelineError, Result};

pub trait PageStore {
    /// Persists `document` under `file_name` and returns where it landed.
    fn put(&self, file_name: &str, document: &Value) -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct LocalFsPageStore {
    out_dir: PathBuf,
}

impl LocalFsPageStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl PageStore for LocalFsPageStore {
    fn put(&self, file_name: &str, document: &Value) -> Result<PathBuf> {
        let path = self.out_dir.join(file_name);
        write_json_atomic(&path, document).map_err(|source| PipelineError::Persistence {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

fn write_json_atomic(path: &Path, document: &Value) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    {
        let mut ser = serde_json::Serializer::with_formatter(
            tmp.as_file_mut(),
            PrettyFormatter::with_indent(b"    "),
        );
        document.serialize(&mut ser)?;
    }
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
