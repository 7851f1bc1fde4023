use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::formats::ComparisonProduct;

pub const DEFAULT_INPUT: &str = "data/raw_product_data.txt";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path to the `Key: value` product description.
    pub input: PathBuf,
    /// Directory that receives the generated pages.
    pub output_dir: PathBuf,
    /// Directory holding `product_page.json`, `faq.json` and
    /// `comparison_page.json`. The built-in templates are used when unset.
    pub template_dir: Option<PathBuf>,
    pub competitor: ComparisonProduct,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            template_dir: None,
            competitor: crate::competitor::default_competitor(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|err| PipelineError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        serde_yaml::from_str(&yaml).map_err(|err| PipelineError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Loads the optional config file, then applies the `--input` override.
    pub fn resolve(config_path: Option<&Path>, input: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        if let Some(input) = input {
            config.input = input.to_path_buf();
        }
        Ok(config)
    }
}
