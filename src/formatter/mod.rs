pub mod json;
pub mod text;

use std::io::Write;

/// The projections produced for one action document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// Uncompiled matcher source, when requested.
    pub matcher: Option<String>,
    /// Concrete identifier, when requested and every param is bound.
    pub identifier: Option<String>,
    /// First unbound param, when the identifier was requested but could
    /// not be built.
    pub missing_param: Option<String>,
}

impl Projection {
    fn identifier_requested(&self) -> bool {
        self.identifier.is_some() || self.missing_param.is_some()
    }
}

pub trait Formatter {
    fn format_to(&self, projection: &Projection, out: &mut dyn Write);
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "json" => Box::new(json::JsonFormatter),
        // "text" and any unknown value
        _ => Box::new(text::TextFormatter),
    }
}
