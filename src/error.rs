use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("input resource not found: {}", .path.display())]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {record}: {}", .fields.join(", "))]
    Validation {
        record: &'static str,
        fields: Vec<String>,
    },

    #[error("question list has {available} entries; answer selection needs at least {required}")]
    IndexOutOfRange { required: usize, available: usize },

    #[error("template {template}: {reason}")]
    TemplateIntegrity { template: String, reason: String },

    #[error("write page: {}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("load config: {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl PipelineError {
    pub(crate) fn template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TemplateIntegrity {
            template: template.into(),
            reason: reason.into(),
        }
    }
}
