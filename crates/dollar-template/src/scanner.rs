//! Single-pass scanner that compiles template source into segments.
//!
//! The scanner walks the source bytes once, driven by a small state machine:
//!
//! ```text
//! ReadingLiteral --'$'--> SawDollar --'$'--------> ReadingLiteral   (escape)
//!                                   --ident start-> ReadingBareIdentifier
//!                                   --'{'--------> AfterBrace --ident start--> ReadingBracedIdentifier
//! ReadingBareIdentifier   --non-ident--> ReadingLiteral (placeholder committed)
//! ReadingBracedIdentifier --'}'--------> ReadingLiteral (placeholder committed)
//! ```
//!
//! Anything else is a malformed placeholder. [`scan_strict`] stops there with a
//! [`ParseError`]; [`scan_lenient`] keeps the `$` as literal text, records the error,
//! and resumes scanning right after the `$`.
//!
//! All delimiters are ASCII, so every slice boundary the scanner produces is a valid
//! UTF-8 character boundary.

use std::ops::Range;

use crate::error::ParseErrorKind::{InvalidPlaceholder, UnterminatedBrace};
use crate::error::{ParseError, ParseErrorKind};
use crate::template::{Placeholder, PlaceholderStyle, Segment};

/// How the scanner reacts to malformed placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Strict,
    Lenient,
}

/// Output of a successful scan.
#[derive(Debug)]
pub(crate) struct Scanned {
    pub segments: Vec<Segment>,
    /// Malformed placeholders passed through as literal text (lenient mode only).
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Copy)]
enum State {
    ReadingLiteral,
    SawDollar { start: usize },
    AfterBrace { start: usize },
    ReadingBareIdentifier { start: usize },
    ReadingBracedIdentifier { start: usize },
}

#[inline]
fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_identifier_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scan `source`, stopping at the first malformed placeholder.
pub(crate) fn scan_strict(source: &str) -> Result<Scanned, ParseError> {
    let mut scanned = Scanner::new(source, Mode::Strict).run();
    match scanned.errors.pop() {
        Some(err) => Err(err),
        None => Ok(scanned),
    }
}

/// Scan `source`, passing malformed placeholders through as literal text.
pub(crate) fn scan_lenient(source: &str) -> Scanned {
    Scanner::new(source, Mode::Lenient).run()
}

struct Scanner<'s> {
    source: &'s str,
    mode: Mode,
    segments: Vec<Segment>,
    errors: Vec<ParseError>,
    /// Output text of the literal segment being built.
    literal: String,
    /// Source offset where the pending literal segment begins.
    literal_start: usize,
    /// Source offset of raw literal text not yet copied into `literal`.
    run_start: usize,
}

impl<'s> Scanner<'s> {
    fn new(source: &'s str, mode: Mode) -> Self {
        Self {
            source,
            mode,
            segments: Vec::new(),
            errors: Vec::new(),
            literal: String::new(),
            literal_start: 0,
            run_start: 0,
        }
    }

    fn run(mut self) -> Scanned {
        let bytes = self.source.as_bytes();
        let len = bytes.len();
        let mut state = State::ReadingLiteral;
        let mut i = 0;

        loop {
            let current = bytes.get(i).copied();
            state = match (state, current) {
                (State::ReadingLiteral, None) => {
                    self.flush_literal(len);
                    break;
                }
                (State::ReadingLiteral, Some(b'$')) => {
                    self.literal.push_str(&self.source[self.run_start..i]);
                    self.run_start = i;
                    State::SawDollar { start: i }
                }
                (State::ReadingLiteral, Some(_)) => State::ReadingLiteral,

                (State::SawDollar { .. }, Some(b'$')) => {
                    self.literal.push('$');
                    self.run_start = i + 1;
                    State::ReadingLiteral
                }
                (State::SawDollar { start }, Some(b'{')) => State::AfterBrace { start },
                (State::SawDollar { start }, Some(b)) if is_identifier_start(b) => {
                    State::ReadingBareIdentifier { start }
                }
                (State::SawDollar { start }, _) => {
                    let Some(resume) = self.malformed(InvalidPlaceholder, start, i) else {
                        break;
                    };
                    i = resume;
                    State::ReadingLiteral
                }

                (State::AfterBrace { start }, Some(b)) if is_identifier_start(b) => {
                    State::ReadingBracedIdentifier { start }
                }
                (State::AfterBrace { start }, Some(_)) => {
                    let Some(resume) = self.malformed(InvalidPlaceholder, start, i) else {
                        break;
                    };
                    i = resume;
                    State::ReadingLiteral
                }
                (State::AfterBrace { start }, None) => {
                    let Some(resume) = self.malformed(UnterminatedBrace, start, i) else {
                        break;
                    };
                    i = resume;
                    State::ReadingLiteral
                }

                (State::ReadingBareIdentifier { start }, Some(b)) if is_identifier_continue(b) => {
                    State::ReadingBareIdentifier { start }
                }
                (State::ReadingBareIdentifier { start }, _) => {
                    self.commit_placeholder(PlaceholderStyle::Bare, start..i, start + 1..i);
                    if current.is_none() {
                        break;
                    }
                    // The terminating byte belongs to whatever follows; re-read it.
                    state = State::ReadingLiteral;
                    continue;
                }

                (State::ReadingBracedIdentifier { start }, Some(b)) if is_identifier_continue(b) => {
                    State::ReadingBracedIdentifier { start }
                }
                (State::ReadingBracedIdentifier { start }, Some(b'}')) => {
                    self.commit_placeholder(PlaceholderStyle::Braced, start..i + 1, start + 2..i);
                    State::ReadingLiteral
                }
                (State::ReadingBracedIdentifier { start }, _) => {
                    let Some(resume) = self.malformed(UnterminatedBrace, start, i) else {
                        break;
                    };
                    i = resume;
                    State::ReadingLiteral
                }
            };
            i += 1;
        }

        Scanned {
            segments: self.segments,
            errors: self.errors,
        }
    }

    /// Record a malformed placeholder opened at `start` and broken at `position`.
    ///
    /// Returns `None` when scanning must stop (strict mode). Lenient mode keeps the `$`
    /// as literal text and returns its offset, so the loop's increment resumes scanning
    /// right after it.
    fn malformed(&mut self, kind: ParseErrorKind, start: usize, position: usize) -> Option<usize> {
        self.errors.push(ParseError::new(self.source, kind, start, position));
        match self.mode {
            Mode::Strict => None,
            Mode::Lenient => {
                self.literal.push('$');
                self.run_start = start + 1;
                Some(start)
            }
        }
    }

    fn commit_placeholder(
        &mut self,
        style: PlaceholderStyle,
        span: Range<usize>,
        name: Range<usize>,
    ) {
        self.flush_literal(span.start);
        let end = span.end;
        self.segments.push(Segment::Placeholder(Placeholder::new(
            &self.source[name],
            style,
            span,
        )));
        self.literal_start = end;
        self.run_start = end;
    }

    fn flush_literal(&mut self, end: usize) {
        if self.run_start < end {
            self.literal.push_str(&self.source[self.run_start..end]);
        }
        if self.literal_start < end {
            self.segments.push(Segment::Literal {
                text: std::mem::take(&mut self.literal),
                span: self.literal_start..end,
            });
        }
        self.literal_start = end;
        self.run_start = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(source: &str) -> Result<Vec<Segment>, ParseError> {
        scan_strict(source).map(|s| s.segments)
    }

    fn literal(text: &str, span: Range<usize>) -> Segment {
        Segment::Literal {
            text: text.into(),
            span,
        }
    }

    fn bare(name: &str, span: Range<usize>) -> Segment {
        Segment::Placeholder(Placeholder::new(name, PlaceholderStyle::Bare, span))
    }

    fn braced(name: &str, span: Range<usize>) -> Segment {
        Segment::Placeholder(Placeholder::new(name, PlaceholderStyle::Braced, span))
    }

    #[test]
    fn test_empty_source() {
        assert!(strict("").unwrap().is_empty());
    }

    #[test]
    fn test_plain_text_is_one_literal() {
        assert_eq!(
            strict("some random text {}").unwrap(),
            vec![literal("some random text {}", 0..19)]
        );
    }

    #[test]
    fn test_escape_collapses_into_literal() {
        assert_eq!(strict("$$").unwrap(), vec![literal("$", 0..2)]);
        assert_eq!(strict("a$$b").unwrap(), vec![literal("a$b", 0..4)]);
        assert_eq!(strict("$$$$").unwrap(), vec![literal("$$", 0..4)]);
    }

    #[test]
    fn test_bare_placeholder() {
        assert_eq!(
            strict("$hello_world10").unwrap(),
            vec![bare("hello_world10", 0..14)]
        );
        assert_eq!(strict("$h").unwrap(), vec![bare("h", 0..2)]);
        assert_eq!(strict("$_").unwrap(), vec![bare("_", 0..2)]);
    }

    #[test]
    fn test_bare_placeholder_stops_at_non_identifier() {
        assert_eq!(
            strict("I $feeling it").unwrap(),
            vec![
                literal("I ", 0..2),
                bare("feeling", 2..10),
                literal(" it", 10..13)
            ]
        );
    }

    #[test]
    fn test_adjacent_placeholders() {
        assert_eq!(
            strict("$a$b").unwrap(),
            vec![bare("a", 0..2), bare("b", 2..4)]
        );
        assert_eq!(
            strict("$a$$").unwrap(),
            vec![bare("a", 0..2), literal("$", 2..4)]
        );
    }

    #[test]
    fn test_braced_placeholder() {
        assert_eq!(
            strict("${hello_world10}").unwrap(),
            vec![braced("hello_world10", 0..16)]
        );
        assert_eq!(
            strict("${name}suffix").unwrap(),
            vec![braced("name", 0..7), literal("suffix", 7..13)]
        );
    }

    #[test]
    fn test_non_ascii_literal_text() {
        assert_eq!(
            strict("héllo ${wörld}").unwrap_err().kind,
            ParseErrorKind::UnterminatedBrace
        );
        assert_eq!(
            strict("héllo $w ünïcode").unwrap(),
            vec![
                literal("héllo ", 0..7),
                bare("w", 7..9),
                literal(" ünïcode", 9..19)
            ]
        );
    }

    #[test]
    fn test_digit_start_is_invalid() {
        let err = strict("$1bad").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPlaceholder);
        assert_eq!(err.placeholder_start, 0);
        assert_eq!(err.position, 1);

        let err = strict("${1}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPlaceholder);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_trailing_dollar_is_invalid() {
        let err = strict("end$").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPlaceholder);
        assert_eq!(err.placeholder_start, 3);
        assert_eq!(err.position, 4);
    }

    #[test]
    fn test_empty_braces_are_invalid() {
        let err = strict("${}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPlaceholder);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_unterminated_brace() {
        let err = strict("${name").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedBrace);
        assert_eq!(err.position, 6);

        let err = strict("x ${").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedBrace);
        assert_eq!(err.placeholder_start, 2);

        let err = strict("${name rest}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedBrace);
        assert_eq!(err.position, 6);
    }

    #[test]
    fn test_first_error_wins() {
        let err = strict("ok $ and ${").unwrap_err();
        assert_eq!(err.placeholder_start, 3);
    }

    #[test]
    fn test_lenient_passes_malformed_through() {
        let scanned = scan_lenient("$1bad");
        assert_eq!(scanned.segments, vec![literal("$1bad", 0..5)]);
        assert_eq!(scanned.errors.len(), 1);
    }

    #[test]
    fn test_lenient_resumes_after_dollar() {
        let scanned = scan_lenient("${$x}");
        assert_eq!(
            scanned.segments,
            vec![literal("${", 0..2), bare("x", 2..4), literal("}", 4..5)]
        );

        let scanned = scan_lenient("a ${name b");
        assert_eq!(scanned.segments, vec![literal("a ${name b", 0..10)]);
        assert_eq!(scanned.errors[0].kind, ParseErrorKind::UnterminatedBrace);

        let scanned = scan_lenient("cost: 5$");
        assert_eq!(scanned.segments, vec![literal("cost: 5$", 0..8)]);
    }

    #[test]
    fn test_spans_cover_source() {
        let source = "a $b ${c}$$ $1 ${d";
        let scanned = scan_lenient(source);
        let mut expected_start = 0;
        for segment in &scanned.segments {
            let span = segment.span();
            assert_eq!(span.start, expected_start);
            expected_start = span.end;
        }
        assert_eq!(expected_start, source.len());
        assert_eq!(scanned.errors.len(), 2);
    }
}
