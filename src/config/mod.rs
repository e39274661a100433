use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::builder::BuilderOptions;

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".actionkey.yml";

/// Builder options resolved from `.actionkey.yml`.
///
/// The file holds a partial `BuilderOptions` mapping; missing keys keep
/// their defaults:
///
/// ```yaml
/// name_separator: "."
/// param_separator: "/"
/// param_order_offset: 0
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    options: BuilderOptions,
    /// File the options were read from, if any.
    source: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn into_options(self) -> BuilderOptions {
        self.options
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Load config from the given path, or look for `.actionkey.yml` in the
/// current directory. Without an explicit path a missing file yields the
/// defaults; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<ResolvedConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("config file {} does not exist", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = Path::new(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(ResolvedConfig::default());
            }
            p.to_path_buf()
        }
    };

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    let options = parse_options(&contents)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;

    Ok(ResolvedConfig {
        options,
        source: Some(config_path),
    })
}

fn parse_options(contents: &str) -> Result<BuilderOptions> {
    if contents.trim().is_empty() {
        return Ok(BuilderOptions::default());
    }
    Ok(serde_yml::from_str(contents)?)
}
