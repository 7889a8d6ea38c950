//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::PregenError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &PregenError) -> String {
    match e {
        PregenError::Usage(lines) => {
            let mut out = String::from("Usage:");
            for line in lines {
                out.push_str("\n  pregen ");
                out.push_str(line);
            }
            out
        }
        other => other.to_string(),
    }
}
