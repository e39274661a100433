use std::io::Write;

use serde::Serialize;

use crate::formatter::{Formatter, Projection};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    matcher: Option<&'a str>,
    /// Present (possibly null) whenever the identifier was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_param: Option<&'a str>,
}

impl Formatter for JsonFormatter {
    fn format_to(&self, projection: &Projection, out: &mut dyn Write) {
        let output = JsonOutput {
            matcher: projection.matcher.as_deref(),
            identifier: projection
                .identifier_requested()
                .then(|| projection.identifier.as_deref()),
            missing_param: projection.missing_param.as_deref(),
        };
        // Safe to unwrap: our types always serialize successfully
        let _ = writeln!(out, "{}", serde_json::to_string_pretty(&output).unwrap());
    }
}
