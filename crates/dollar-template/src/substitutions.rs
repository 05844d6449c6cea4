//! Sources of placeholder values.
//!
//! Rendering only needs to ask "what is the text for this identifier?", which is the
//! whole of the [`Substitutions`] trait. It is implemented for the usual maps, for
//! lists of pairs, for JSON objects, and for the process environment. Mappings can be
//! layered with [`Substitutions::chain`] so that, for example, explicit values override
//! a set of defaults.

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use serde_json::Value;

/// A read-only mapping from identifier to replacement text.
pub trait Substitutions {
    /// The replacement text for `name`, or `None` if the mapping has no such key.
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Consult `self` first and fall back to `fallback` for missing keys.
    fn chain<B>(self, fallback: B) -> Chain<Self, B>
    where
        Self: Sized,
        B: Substitutions,
    {
        Chain {
            primary: self,
            fallback,
        }
    }
}

impl<T> Substitutions for &T
where
    T: Substitutions + ?Sized,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(name)
    }
}

impl<K, V, S> Substitutions for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_ref()))
    }
}

impl<K, V> Substitutions for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_ref()))
    }
}

/// Pairs are searched front to back; the first matching key wins.
impl<K, V> Substitutions for [(K, V)]
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .find(|(key, _)| key.as_ref() == name)
            .map(|(_, value)| Cow::Borrowed(value.as_ref()))
    }
}

impl<K, V, const N: usize> Substitutions for [(K, V); N]
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_slice().lookup(name)
    }
}

impl<K, V> Substitutions for Vec<(K, V)>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_slice().lookup(name)
    }
}

/// JSON strings are used verbatim; every other value renders as its JSON text.
fn json_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

impl Substitutions for serde_json::Map<String, Value> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(json_text)
    }
}

/// Only JSON objects provide values; any other JSON value is an empty mapping.
impl Substitutions for Value {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_object()?.lookup(name)
    }
}

/// Values from the process environment.
///
/// A variable that is set counts as present even when its value is not valid UTF-8;
/// invalid sequences are replaced with `U+FFFD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl Substitutions for Environment {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        std::env::var_os(name).map(|value| Cow::Owned(value.to_string_lossy().into_owned()))
    }
}

/// Two mappings layered together. Created by [`Substitutions::chain`].
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> Substitutions for Chain<A, B>
where
    A: Substitutions,
    B: Substitutions,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.primary
            .lookup(name)
            .or_else(|| self.fallback.lookup(name))
    }
}

/// Values computed on demand by a closure. Created by [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

/// Build a mapping from a closure returning the value for an identifier.
///
/// ```
/// use dollar_template::{from_fn, Template};
///
/// let upper = from_fn(|name| Some(name.to_uppercase()));
/// let template = Template::parse("$greeting, $who")?;
/// assert_eq!(template.render(&upper)?, "GREETING, WHO");
/// # Ok::<(), dollar_template::TemplateError>(())
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    FromFn(f)
}

impl<F> Substitutions for FromFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        (self.0)(name).map(Cow::Owned)
    }
}
