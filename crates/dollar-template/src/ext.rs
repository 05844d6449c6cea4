//! One-shot substitution directly on string slices.
//!
//! Convenient when a template is used once. Anything rendered repeatedly should be
//! parsed into a [`Template`] up front instead.

use crate::error::Result;
use crate::substitutions::Substitutions;
use crate::template::Template;

/// Parse-and-render in a single call.
///
/// ```
/// use std::collections::HashMap;
/// use dollar_template::Substitute;
///
/// let values = HashMap::from([("feeling", "love")]);
/// assert_eq!("I $feeling this".substitute(&values)?, "I love this");
/// assert_eq!("I $feeling ${it}".safe_substitute(&values), "I love ${it}");
/// # Ok::<(), dollar_template::TemplateError>(())
/// ```
pub trait Substitute {
    /// Strict parse followed by strict render.
    fn substitute<M>(&self, mapping: &M) -> Result<String>
    where
        M: Substitutions + ?Sized;

    /// Lenient parse followed by safe render. Never fails.
    fn safe_substitute<M>(&self, mapping: &M) -> String
    where
        M: Substitutions + ?Sized;
}

impl Substitute for str {
    fn substitute<M>(&self, mapping: &M) -> Result<String>
    where
        M: Substitutions + ?Sized,
    {
        let template = Template::parse(self)?;
        Ok(template.render(mapping)?)
    }

    fn safe_substitute<M>(&self, mapping: &M) -> String
    where
        M: Substitutions + ?Sized,
    {
        Template::parse_lenient(self).safe_render(mapping)
    }
}
