//! Render-time configuration.
//!
//! [`RenderOptions`] selects what happens when a placeholder has no value. The default
//! is strict ([`MissingKeyPolicy::Fail`]); [`RenderOptions::lenient`] leaves unresolved
//! placeholders in the output instead.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TemplateError};

/// What rendering does when a placeholder has no value in the mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingKeyPolicy {
    /// Stop and return [`RenderError::MissingKey`](crate::RenderError::MissingKey).
    #[default]
    Fail,
    /// Write the placeholder back exactly as it appears in the source.
    Leave,
}

/// Options controlling a render call.
///
/// Deserializable so callers can keep them next to their templates in a config file:
///
/// ```json
/// { "missing-key": "leave" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderOptions {
    pub missing_key: MissingKeyPolicy,
}

impl RenderOptions {
    /// Fail on the first unresolved placeholder. This is the default.
    pub fn strict() -> Self {
        Self {
            missing_key: MissingKeyPolicy::Fail,
        }
    }

    /// Leave unresolved placeholders in the output.
    pub fn lenient() -> Self {
        Self {
            missing_key: MissingKeyPolicy::Leave,
        }
    }

    /// Read options from a JSON document. Absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| TemplateError::Options { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strict() {
        assert_eq!(RenderOptions::default(), RenderOptions::strict());
        assert_eq!(MissingKeyPolicy::default(), MissingKeyPolicy::Fail);
    }

    #[test]
    fn test_from_json() {
        let options = RenderOptions::from_json(r#"{ "missing-key": "leave" }"#).unwrap();
        assert_eq!(options, RenderOptions::lenient());

        let options = RenderOptions::from_json("{}").unwrap();
        assert_eq!(options, RenderOptions::strict());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = RenderOptions::from_json(r#"{ "missing-key": "ignore" }"#).unwrap_err();
        assert!(matches!(err, TemplateError::Options { .. }));
        assert_eq!(err.to_string(), "failed to parse render options");
    }

    #[test]
    fn test_serialize_kebab_case() {
        let json = serde_json::to_value(RenderOptions::lenient()).unwrap();
        assert_eq!(json, serde_json::json!({ "missing-key": "leave" }));
    }
}
