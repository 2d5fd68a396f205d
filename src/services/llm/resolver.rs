//! Model Compatibility Resolver
//!
//! Maps retired or unsupported model identifiers to ones the provider
//! accepts. Model availability churns faster than the rest of the system;
//! this table is the single seam that absorbs it.

use serde::{Deserialize, Serialize};

/// Identifiers known to be retired or superseded, with their replacements.
///
/// Identifiers absent from this table pass through unchanged; a known-valid
/// identifier is never rewritten.
const MODEL_ALIASES: &[(&str, &str)] = &[
    ("gpt-3.5-turbo", "gpt-4o-mini"),
    ("gpt-3.5-turbo-16k", "gpt-4o-mini"),
    ("gpt-3.5-turbo-1106", "gpt-4o-mini"),
    ("gpt-3.5-turbo-0125", "gpt-4o-mini"),
    ("gpt-4-turbo", "gpt-4o"),
    ("gpt-4-turbo-preview", "gpt-4o"),
    ("gpt-4-32k", "gpt-4o"),
    ("gpt-4-vision-preview", "gpt-4o"),
];

/// Outcome of a model identifier resolution.
///
/// A substitution is always recorded so the caller can see which identifier
/// was actually submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResolution {
    pub requested: String,
    pub resolved: String,
    pub remapped: bool,
}

/// Resolve a caller-supplied identifier to the one submitted to the
/// provider. Pure lookup: the same input always yields the same output.
pub fn resolve_model(requested: &str) -> ModelResolution {
    match MODEL_ALIASES.iter().find(|(from, _)| *from == requested) {
        Some((_, to)) => ModelResolution {
            requested: requested.to_string(),
            resolved: to.to_string(),
            remapped: true,
        },
        None => ModelResolution {
            requested: requested.to_string(),
            resolved: requested.to_string(),
            remapped: false,
        },
    }
}
