pub mod builder;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod formatter;
pub mod value;

use std::io::{Read, Write};

use anyhow::{Context, Result, bail};
use tracing::debug;

pub use builder::{BuilderOptions, BuilderState, Param, PatternBuilder, WILDCARD};
pub use error::BuilderError;
pub use value::ParamValue;

use cli::{Args, OutputMode};
use config::load_config;
use document::ActionDocument;
use formatter::{Projection, create_formatter};

/// Run the CLI, printing to stdout. Returns the exit code: 0 = success,
/// 2 = invalid document or a requested projection failed.
pub fn run(args: Args) -> Result<i32> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    run_to(&args, &mut lock)
}

/// Same as [`run`], writing the projections to `out`.
pub fn run_to(args: &Args, out: &mut dyn Write) -> Result<i32> {
    let config = load_config(args.config.as_deref())?;
    match config.source() {
        Some(path) => debug!(path = %path.display(), "config loaded"),
        None => debug!("no config file found, using defaults"),
    }
    let options = args.apply_overrides(config.into_options());
    debug!(?options, "builder options");

    let input = if args.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read action document from stdin")?;
        input
    } else if let Some(path) = &args.document {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read action document {}", path.display()))?
    } else {
        bail!("no action document given (pass a FILE or --stdin)");
    };

    let document = match ActionDocument::parse(&input) {
        Ok(doc) => doc,
        Err(e) => return Ok(report(e)),
    };
    let builder = match document.apply(&PatternBuilder::new(options)) {
        Ok(b) => b,
        Err(e) => return Ok(report(e)),
    };

    let mode = args.output_mode();
    let mut projection = Projection::default();

    if mode != OutputMode::Identifier {
        match builder.to_matcher() {
            Ok(re) => projection.matcher = Some(re.as_str().to_string()),
            Err(e) => return Ok(report(e)),
        }
    }

    if mode != OutputMode::Matcher {
        match builder.to_identifier() {
            Ok(id) => projection.identifier = Some(id),
            Err(BuilderError::MissingValue(key)) if mode == OutputMode::Both => {
                debug!(key = %key, "identifier skipped, param has no value");
                projection.missing_param = Some(key);
            }
            Err(e) => return Ok(report(e)),
        }
    }

    create_formatter(&args.format).format_to(&projection, out);
    Ok(0)
}

fn report(err: impl Into<anyhow::Error>) -> i32 {
    eprintln!("error: {:#}", err.into());
    2
}
