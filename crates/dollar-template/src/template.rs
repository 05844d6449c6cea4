//! Compiled templates and their render entry points.
//!
//! A [`Template`] is parsed once and rendered any number of times. It owns its source
//! text and segment list and is never mutated after construction, so a single template
//! can be shared across threads and rendered concurrently.
//!
//! ## Usage
//!
//! ```
//! use std::collections::HashMap;
//! use dollar_template::Template;
//!
//! let template = Template::parse("Hello, ${name}! You owe $$$amount.")?;
//! let values = HashMap::from([("name", "Ada"), ("amount", "12")]);
//! assert_eq!(template.render(&values)?, "Hello, Ada! You owe $12.");
//! # Ok::<(), dollar_template::TemplateError>(())
//! ```

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ParseError, RenderError};
use crate::options::{MissingKeyPolicy, RenderOptions};
use crate::scanner;
use crate::substitutions::Substitutions;

/// The syntax a placeholder was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// `$name`
    Bare,
    /// `${name}`
    Braced,
}

/// A substitution point in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    name: String,
    style: PlaceholderStyle,
    span: Range<usize>,
}

impl Placeholder {
    pub(crate) fn new(name: &str, style: PlaceholderStyle, span: Range<usize>) -> Self {
        Self {
            name: name.to_owned(),
            style,
            span,
        }
    }

    /// The identifier this placeholder refers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the placeholder was written `$name` or `${name}`.
    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    /// Byte range of the placeholder in the template source, delimiters included.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Append the placeholder exactly as it was written.
    fn write_original(&self, out: &mut String) {
        match self.style {
            PlaceholderStyle::Bare => {
                out.push('$');
                out.push_str(&self.name);
            }
            PlaceholderStyle::Braced => {
                out.push_str("${");
                out.push_str(&self.name);
                out.push('}');
            }
        }
    }
}

/// One piece of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output as-is. `$$` escapes are already collapsed to `$`,
    /// so `text` may be shorter than the source `span` it covers.
    Literal { text: String, span: Range<usize> },
    Placeholder(Placeholder),
}

impl Segment {
    /// Byte range of the segment in the template source.
    pub fn span(&self) -> Range<usize> {
        match self {
            Segment::Literal { span, .. } => span.clone(),
            Segment::Placeholder(placeholder) => placeholder.span(),
        }
    }
}

/// An immutable, compiled `$`-template.
///
/// Serializes as its source string and deserializes with [`Template::parse`]. A
/// leniently parsed template that skipped malformed placeholders refuses to serialize,
/// since strict parsing could not read it back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    errors: Vec<ParseError>,
}

impl Template {
    /// Compile `source`, failing on the first malformed placeholder.
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseError> {
        let source = source.into();
        let scanned = scanner::scan_strict(&source).inspect_err(|err| {
            tracing::debug!("template rejected: {err}");
        })?;
        Ok(Self::assemble(source, scanned))
    }

    /// Compile `source`, keeping malformed placeholders as literal text.
    ///
    /// The skipped placeholders are available from [`Template::errors`]. Combine with
    /// [`Template::safe_render`] for rendering that never fails.
    pub fn parse_lenient(source: impl Into<String>) -> Self {
        let source = source.into();
        let scanned = scanner::scan_lenient(&source);
        Self::assemble(source, scanned)
    }

    fn assemble(source: String, scanned: scanner::Scanned) -> Self {
        let template = Self {
            source,
            segments: scanned.segments,
            errors: scanned.errors,
        };
        tracing::debug!(
            "parsed template: {} bytes, {} segments, {} placeholders, {} skipped",
            template.source.len(),
            template.segments.len(),
            template.placeholders().count(),
            template.errors.len()
        );
        template
    }

    /// The original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled segments, in source order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All placeholders in order of appearance, duplicates included.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(placeholder),
            Segment::Literal { .. } => None,
        })
    }

    /// Unique identifiers referenced by the template, in order of first appearance.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.placeholders()
            .map(Placeholder::name)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// `true` unless lenient parsing passed malformed placeholders through.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Malformed placeholders that lenient parsing kept as literal text.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Render with the default options: any missing key is an error.
    pub fn render<M>(&self, mapping: &M) -> Result<String, RenderError>
    where
        M: Substitutions + ?Sized,
    {
        self.render_with(mapping, &RenderOptions::default())
    }

    /// Render with an explicit missing-key policy.
    pub fn render_with<M>(
        &self,
        mapping: &M,
        options: &RenderOptions,
    ) -> Result<String, RenderError>
    where
        M: Substitutions + ?Sized,
    {
        let mut out = String::with_capacity(self.source.len());
        self.render_into(mapping, options, &mut out)?;
        Ok(out)
    }

    /// Append the rendered template to `out`.
    ///
    /// On failure `out` is truncated back to its original length.
    pub fn render_into<M>(
        &self,
        mapping: &M,
        options: &RenderOptions,
        out: &mut String,
    ) -> Result<(), RenderError>
    where
        M: Substitutions + ?Sized,
    {
        let mark = out.len();
        match self.expand(mapping, options.missing_key, out) {
            None => Ok(()),
            Some(placeholder) => {
                out.truncate(mark);
                tracing::debug!("missing key \"{}\"", placeholder.name());
                Err(RenderError::MissingKey {
                    name: placeholder.name().to_owned(),
                })
            }
        }
    }

    /// Render without ever failing.
    ///
    /// Unresolved placeholders are written back exactly as they appear in the source.
    pub fn safe_render<M>(&self, mapping: &M) -> String
    where
        M: Substitutions + ?Sized,
    {
        let mut out = String::with_capacity(self.source.len());
        let unresolved = self.expand(mapping, MissingKeyPolicy::Leave, &mut out);
        debug_assert!(unresolved.is_none());
        out
    }

    /// Write every segment to `out`.
    ///
    /// Returns the first unresolved placeholder when `policy` is [`MissingKeyPolicy::Fail`];
    /// `out` then holds partial output. Under [`MissingKeyPolicy::Leave`] it returns `None`.
    fn expand<M>(
        &self,
        mapping: &M,
        policy: MissingKeyPolicy,
        out: &mut String,
    ) -> Option<&Placeholder>
    where
        M: Substitutions + ?Sized,
    {
        for segment in &self.segments {
            match segment {
                Segment::Literal { text, .. } => out.push_str(text),
                Segment::Placeholder(placeholder) => match mapping.lookup(placeholder.name()) {
                    Some(value) => out.push_str(&value),
                    None => match policy {
                        MissingKeyPolicy::Fail => return Some(placeholder),
                        MissingKeyPolicy::Leave => {
                            tracing::trace!("leaving \"{}\" unresolved", placeholder.name());
                            placeholder.write_original(out);
                        }
                    },
                },
            }
        }
        None
    }
}

impl Serialize for Template {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(err) = self.errors.first() {
            return Err(S::Error::custom(format_args!(
                "template is not valid and cannot be read back: {err}"
            )));
        }
        serializer.serialize_str(&self.source)
    }
}

impl FromStr for Template {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Template {
    type Error = ParseError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::parse(source)
    }
}

impl TryFrom<&str> for Template {
    type Error = ParseError;

    fn try_from(source: &str) -> Result<Self, Self::Error> {
        Self::parse(source)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.source
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
