//! Error types for template parsing and rendering.

use thiserror::Error;

/// The reason a placeholder could not be parsed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `$` that is not followed by `$`, an identifier, or `{identifier}`.
    #[error("invalid placeholder")]
    InvalidPlaceholder,

    /// A `${identifier` that is never closed by `}`.
    #[error("unterminated braced placeholder")]
    UnterminatedBrace,
}

/// A malformed placeholder found while parsing a template.
///
/// `position` is the byte offset of the character that broke the placeholder.
/// When the source ends in the middle of a placeholder it equals the source length.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}, column {column} (byte {position})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset of the offending character.
    pub position: usize,
    /// Byte offset of the `$` that opened the placeholder.
    pub placeholder_start: usize,
    /// 1-based line of `position`.
    pub line: usize,
    /// 1-based column of `position`, counted in characters.
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(
        source: &str,
        kind: ParseErrorKind,
        placeholder_start: usize,
        position: usize,
    ) -> Self {
        let before = &source[..position];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            kind,
            position,
            placeholder_start,
            line,
            column,
        }
    }
}

/// Errors raised while rendering a parsed template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A placeholder names a key the mapping does not contain.
    #[error("missing key \"{name}\"")]
    MissingKey { name: String },
}

/// All errors that can occur while working with templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template source contains a malformed placeholder.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Strict rendering hit a placeholder with no value.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Render options could not be read from JSON.
    #[error("failed to parse render options")]
    Options {
        #[source]
        source: serde_json::Error,
    },
}

/// Alias for `Result<T, TemplateError>`.
pub type Result<T> = std::result::Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column_first_line() {
        let err = ParseError::new("ab $1", ParseErrorKind::InvalidPlaceholder, 3, 4);
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 5);
    }

    #[test]
    fn test_line_and_column_count_characters() {
        let source = "first\nñé $";
        let err = ParseError::new(
            source,
            ParseErrorKind::InvalidPlaceholder,
            source.len() - 1,
            source.len(),
        );
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 5);
    }

    #[test]
    fn test_display_messages() {
        let err = ParseError::new("${name", ParseErrorKind::UnterminatedBrace, 0, 6);
        assert_eq!(
            err.to_string(),
            "unterminated braced placeholder at line 1, column 7 (byte 6)"
        );

        let err = RenderError::MissingKey {
            name: "who".into(),
        };
        assert_eq!(err.to_string(), "missing key \"who\"");
        assert_eq!(TemplateError::from(err).to_string(), "missing key \"who\"");
    }
}
