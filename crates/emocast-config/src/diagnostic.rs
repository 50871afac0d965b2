// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment extraction failures into miette reports.
//!
//! Unknown keys get a source span pointing into `emocast.toml` and, when one
//! is close enough, a suggested spelling.

#![allow(unused_assignments)] // emitted by miette's Diagnostic derive

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a known key must beat to be suggested.
const MIN_SIMILARITY: f64 = 0.75;

/// One problem found while loading or validating configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("`{key}` is not an emocast setting")]
    #[diagnostic(code(emocast::config::unknown_key), help("{hint}"))]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        hint: String,
        #[label("unrecognized here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(emocast::config::invalid_type))]
    InvalidType { key: String, detail: String },

    #[error("`{key}` is required")]
    #[diagnostic(
        code(emocast::config::missing_key),
        help("set `{key}` in emocast.toml or through an EMOCAST_* variable")
    )]
    MissingKey { key: String },

    #[error("{message}")]
    #[diagnostic(code(emocast::config::validation))]
    Validation { message: String },

    #[error("{0}")]
    #[diagnostic(code(emocast::config::other))]
    Other(String),
}

impl ConfigError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    fn from_figment(error: figment::error::Error, sources: &[(String, String)]) -> Self {
        let dotted = error
            .path
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".");

        match &error.kind {
            Kind::UnknownField(field, known) => {
                let (span, src) = locate(&error, field, sources);
                let suggestion = suggest_key(field, known);
                let hint = match &suggestion {
                    Some(close) => format!("did you mean `{close}`? known keys: {}", known.join(", ")),
                    None => format!("known keys: {}", known.join(", ")),
                };
                Self::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    hint,
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => Self::MissingKey {
                key: field.to_string(),
            },
            Kind::InvalidType(found, expected) => Self::InvalidType {
                key: dotted,
                detail: format!("found {found}, expected {expected}"),
            },
            _ => Self::Other(error.to_string()),
        }
    }
}

/// Splits a figment error (which may aggregate several) into diagnostics.
///
/// `toml_sources` holds `(path, content)` pairs for the files that were
/// merged, so unknown keys can be pointed at.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| ConfigError::from_figment(error, toml_sources))
        .collect()
}

fn locate(
    error: &figment::error::Error,
    field: &str,
    sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|meta| meta.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // String-loaded config has no path; it is then the only source.
    let matched = match origin {
        Some(path) => sources.iter().find(|(candidate, _)| *candidate == path),
        None if sources.len() == 1 => sources.first(),
        None => None,
    };
    let Some((path, content)) = matched else {
        return (None, None);
    };

    let tables: Vec<String> = error.path.iter().cloned().collect();
    match find_key_offset(content, &tables, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` as a key under the `[path[0]]` table header.
///
/// With an empty `path` the search starts at the top of the document.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(table) => {
            let header = format!("[{table}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let body = line.trim_start();
        let indent = line.len() - body.len();
        let is_key = body
            .strip_prefix(field)
            .and_then(|rest| rest.trim_start_matches([' ', '\t']).chars().next())
            == Some('=');
        if is_key {
            return Some(line_start + indent);
        }
        line_start += line.len();
    }
    None
}

/// The known key closest to `unknown`, if any scores above [`MIN_SIMILARITY`].
pub fn suggest_key(unknown: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|&(_, score)| score > MIN_SIMILARITY)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Prints every diagnostic to stderr, graphically when the terminal allows.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("emocast: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_prompt_key() {
        let valid = &["clean", "emotion", "emotion_unique", "keyphrase", "campaign"];
        assert_eq!(suggest_key("keyphrse", valid), Some("keyphrase".to_string()));
        assert_eq!(
            suggest_key("emotion_uniq", valid),
            Some("emotion_unique".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_key() {
        let valid = &["database_path", "wal_mode"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn finds_key_inside_its_section() {
        let content = "[service]\nport = 1\n[pipeline]\nbatch_concurency = 4\n";
        let path = vec!["pipeline".to_string()];
        let offset = find_key_offset(content, &path, "batch_concurency").unwrap();
        assert_eq!(&content[offset..offset + 16], "batch_concurency");
    }

    #[test]
    fn key_prefix_of_another_key_is_not_matched() {
        let content = "[storage]\nwal_mode_extra = 1\nwal_mode = true\n";
        let path = vec!["storage".to_string()];
        let offset = find_key_offset(content, &path, "wal_mode").unwrap();
        assert_eq!(&content[offset..offset + 15], "wal_mode = true");
    }
}
