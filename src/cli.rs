use std::path::PathBuf;

use clap::Parser;

use crate::builder::BuilderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Only the matcher; never fails on unbound params.
    Matcher,
    /// Only the identifier; every param must be bound.
    Identifier,
    /// Both; an unbound param is reported instead of failing.
    Both,
}

#[derive(Parser, Debug)]
#[command(
    name = "actionkey",
    version,
    about = "Build action identifiers and the regular expressions that match them"
)]
pub struct Args {
    /// Action document (YAML or JSON)
    pub document: Option<PathBuf>,

    /// Read the action document from stdin
    #[arg(long, conflicts_with = "document")]
    pub stdin: bool,

    /// Path to configuration file [default: .actionkey.yml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Which projection to print
    #[arg(short, long, default_value = "both", value_parser = ["matcher", "identifier", "both"])]
    pub output: String,

    /// Override the name separator from the config file
    #[arg(long, value_name = "SEP")]
    pub name_separator: Option<String>,

    /// Override the param separator from the config file
    #[arg(long, value_name = "SEP")]
    pub param_separator: Option<String>,

    /// Override the order assigned to the first param
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub param_order_offset: Option<i32>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    pub fn output_mode(&self) -> OutputMode {
        match self.output.as_str() {
            "matcher" => OutputMode::Matcher,
            "identifier" => OutputMode::Identifier,
            _ => OutputMode::Both,
        }
    }

    /// Apply command-line separator/offset overrides on top of `options`.
    pub fn apply_overrides(&self, mut options: BuilderOptions) -> BuilderOptions {
        if let Some(sep) = &self.name_separator {
            options.name_separator = sep.clone();
        }
        if let Some(sep) = &self.param_separator {
            options.param_separator = sep.clone();
        }
        if let Some(offset) = self.param_order_offset {
            options.param_order_offset = offset;
        }
        options
    }
}
