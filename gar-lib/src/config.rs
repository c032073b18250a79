use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_API_ORIGIN: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Origin of the REST API that release metadata is requested from
    pub api_origin: Url,

    /// Directory that retrieved assets are written to
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_origin: Url::parse(DEFAULT_API_ORIGIN).expect("default API origin is a valid URL"),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn new(api_origin: Url, output_dir: &Path) -> Self {
        Self {
            api_origin,
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Sets up a Config from optional overrides, falling back to [Self::default].
    /// The output directory is created if it does not exist yet.
    pub fn setup(api_origin: Option<&str>, output_dir: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let api_origin = match api_origin {
            Some(origin) => {
                Url::parse(origin).with_context(|| format!("Invalid API URL: {origin}"))?
            }
            None => defaults.api_origin,
        };
        let output_dir = output_dir
            .map(|d| d.to_path_buf())
            .unwrap_or(defaults.output_dir);

        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;

        Ok(Self {
            api_origin,
            output_dir,
        })
    }
}
