// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input preconditions checked before any gateway call.

use emocast_core::EmocastError;

/// Rejects empty or whitespace-only text.
pub fn require_non_blank(field: &str, text: &str) -> Result<(), EmocastError> {
    if text.trim().is_empty() {
        return Err(EmocastError::validation(field, "must not be blank"));
    }
    Ok(())
}

/// Rejects an empty list, or one whose first element is blank.
///
/// Only the first element is inspected. Later blank messages reach the
/// gateway and fail (or succeed) on their own.
pub fn require_non_empty_first(field: &str, items: &[String]) -> Result<(), EmocastError> {
    match items.first() {
        None => Err(EmocastError::validation(field, "must contain at least one message")),
        Some(first) if first.trim().is_empty() => Err(EmocastError::validation(
            field,
            "first message must not be blank",
        )),
        Some(_) => Ok(()),
    }
}

/// Rejects a missing identifier.
pub fn require_id(field: &str, id: &str) -> Result<(), EmocastError> {
    if id.trim().is_empty() {
        return Err(EmocastError::validation(field, "identifier is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: EmocastError) -> String {
        match err {
            EmocastError::ValidationFailed { field, .. } => field,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_non_blank("message", "hi").is_ok());
        assert_eq!(field_of(require_non_blank("message", " \n\t").unwrap_err()), "message");
    }

    #[test]
    fn only_first_element_is_checked() {
        let empty: Vec<String> = vec![];
        assert!(require_non_empty_first("messages", &empty).is_err());
        assert!(require_non_empty_first("messages", &["".into(), "ok".into()]).is_err());
        assert!(require_non_empty_first("messages", &["ok".into(), "".into()]).is_ok());
    }

    #[test]
    fn missing_id_is_rejected() {
        assert!(require_id("brandId", "b-1").is_ok());
        assert_eq!(field_of(require_id("brandId", "").unwrap_err()), "brandId");
    }
}
