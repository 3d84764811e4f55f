//! Environment sources and their adapters.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    env, fmt,
};

/// Capability to look up environment variables by name.
///
/// Implementations exist for the two source shapes supported by
/// [`parse()`](crate::parse()): plain string maps ([`HashMap`], [`BTreeMap`]) and
/// accessor objects wrapped in [`Lookup`]. [`OsEnv`] reads the real process
/// environment. An empty value is reported as-is; normalizing it to "missing" is
/// the orchestrator's job.
pub trait EnvSource {
    /// Looks up the variable with the given name.
    fn get(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).get(name)
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }
}

impl<'a> EnvSource for HashMap<&'a str, &'a str> {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(*value))
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }
}

impl<'a> EnvSource for BTreeMap<&'a str, &'a str> {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(*value))
    }
}

/// The real process environment, read via [`std::env::var`]. Never mutates the
/// environment; variables with non-UTF-8 contents are reported as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnv;

impl EnvSource for OsEnv {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        env::var(name).ok().map(Cow::Owned)
    }
}

/// Adapter for accessor-shaped sources: any `Fn(&str) -> Option<String>`.
///
/// # Examples
///
/// ```
/// use typed_env::{EnvSource, Lookup};
///
/// let source = Lookup(|name: &str| (name == "GREETING").then(|| "hello".to_owned()));
/// assert_eq!(source.get("GREETING").as_deref(), Some("hello"));
/// assert_eq!(source.get("OTHER"), None);
/// ```
pub struct Lookup<F>(pub F);

impl<F> fmt::Debug for Lookup<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Lookup").finish_non_exhaustive()
    }
}

impl<F: Fn(&str) -> Option<String>> EnvSource for Lookup<F> {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        (self.0)(name).map(Cow::Owned)
    }
}
