use std::io::Write;

use crate::formatter::{Formatter, Projection};

/// Bare values when one projection was requested, labelled lines otherwise.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_to(&self, projection: &Projection, out: &mut dyn Write) {
        let identifier = match (&projection.identifier, &projection.missing_param) {
            (Some(id), _) => Some(id.clone()),
            (None, Some(key)) => Some(format!("<unset param \"{key}\">")),
            (None, None) => None,
        };

        match (&projection.matcher, identifier) {
            (Some(matcher), Some(identifier)) => {
                let _ = writeln!(out, "matcher: {matcher}");
                let _ = writeln!(out, "identifier: {identifier}");
            }
            (Some(matcher), None) => {
                let _ = writeln!(out, "{matcher}");
            }
            (None, Some(identifier)) => {
                let _ = writeln!(out, "{identifier}");
            }
            (None, None) => {}
        }
    }
}
