//! `$`-style string templates: parse once, render many times.
//!
//! Implements the [PEP 292](https://peps.python.org/pep-0292) substitution scheme:
//! - `$identifier` names a placeholder; the longest run of letters, digits and
//!   underscores after the `$` is the identifier.
//! - `${identifier}` is the same placeholder, delimited so it can sit directly against
//!   other identifier characters (`${noun}ification`).
//! - `$$` is an escaped, literal `$`.
//!
//! A [`Template`] is compiled by [`Template::parse`] (strict: malformed placeholders are
//! a [`ParseError`]) or [`Template::parse_lenient`] (malformed placeholders are kept as
//! literal text). It is then rendered against any [`Substitutions`] mapping:
//! - [`Template::render`] fails with [`RenderError::MissingKey`] on an unresolved
//!   placeholder;
//! - [`Template::render_with`] takes [`RenderOptions`] to choose the missing-key policy;
//! - [`Template::safe_render`] never fails and writes unresolved placeholders back
//!   exactly as written.
//!
//! For one-off use, the [`Substitute`] extension trait renders a `&str` directly.

pub mod error;
pub mod ext;
pub mod options;
mod scanner;
pub mod substitutions;
pub mod template;

pub use error::{ParseError, ParseErrorKind, RenderError, Result, TemplateError};
pub use ext::Substitute;
pub use options::{MissingKeyPolicy, RenderOptions};
pub use substitutions::{from_fn, Chain, Environment, FromFn, Substitutions};
pub use template::{Placeholder, PlaceholderStyle, Segment, Template};

#[cfg(doctest)]
#[doc = include_str!("../../../README.md")]
struct ReadmeDoctests;
