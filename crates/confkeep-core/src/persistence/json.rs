//! serde_json helpers for JSON-encoded configuration state.
//!
//! Most configuration types are plain serde structs; these helpers make a
//! [`PersistedConfig`](super::PersistedConfig) implementation for them a
//! pair of one-liners.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::manager::DecodeError;

/// Encode `value` as JSON text.
///
/// Pretty output is intended for the on-disk primary file (users may
/// inspect it); compact output suits logs and tests. Serialization of a
/// plain config struct does not fail in practice, so a failure is logged
/// and reported as `None`, which skips the write.
pub fn encode<T: Serialize>(value: &T, pretty: bool) -> Option<String> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };

    match result {
        Ok(text) => Some(text),
        Err(e) => {
            log::error!("failed to encode config as JSON: {}", e);
            None
        }
    }
}

/// Decode JSON `text` into `state`, replacing it wholesale.
///
/// `state` is left untouched when `text` does not parse.
pub fn decode_into<T: DeserializeOwned>(state: &mut T, text: &str) -> Result<(), DecodeError> {
    *state = serde_json::from_str(text)?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        threshold: u32,
    }

    #[test]
    fn encode_compact_and_pretty() {
        let sample = Sample {
            name: "broker".to_string(),
            threshold: 16,
        };

        let compact = encode(&sample, false).unwrap();
        assert_eq!(compact, "{\"name\":\"broker\",\"threshold\":16}");

        let pretty = encode(&sample, true).unwrap();
        assert!(pretty.contains('\n'));
        assert!(pretty.contains("\"threshold\": 16"));
    }

    #[test]
    fn decode_replaces_state() {
        let mut state = Sample::default();

        decode_into(&mut state, "{\"name\":\"broker\",\"threshold\":4}").unwrap();

        assert_eq!(state.name, "broker");
        assert_eq!(state.threshold, 4);
    }

    #[test]
    fn decode_failure_leaves_state_untouched() {
        let mut state = Sample {
            name: "keep".to_string(),
            threshold: 7,
        };

        let result = decode_into(&mut state, "not json at all");

        assert!(matches!(result, Err(DecodeError::Json(_))));
        assert_eq!(state.name, "keep");
        assert_eq!(state.threshold, 7);
    }
}
