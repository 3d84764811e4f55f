//! Environment variable parser descriptors.

use std::{fmt, sync::Arc};

use futures_util::future::BoxFuture;

/// Type-erased parse function. Synchronous and asynchronous functions are invoked
/// uniformly via [`Self::invoke()`], which always settles to an [`anyhow::Result`].
pub(crate) enum ParseFn<T> {
    Sync(Arc<dyn Fn(&str) -> anyhow::Result<T> + Send + Sync>),
    Async(Arc<dyn Fn(String) -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>),
}

impl<T> Clone for ParseFn<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(parse) => Self::Sync(parse.clone()),
            Self::Async(parse) => Self::Async(parse.clone()),
        }
    }
}

impl<T> fmt::Debug for ParseFn<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => formatter.write_str("Sync(_)"),
            Self::Async(_) => formatter.write_str("Async(_)"),
        }
    }
}

impl<T> ParseFn<T> {
    pub(crate) async fn invoke(&self, raw: &str) -> anyhow::Result<T> {
        match self {
            Self::Sync(parse) => parse(raw),
            Self::Async(parse) => parse(raw.to_owned()).await,
        }
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sync(this), Self::Sync(other)) => Arc::ptr_eq(this, other),
            (Self::Async(this), Self::Async(other)) => Arc::ptr_eq(this, other),
            _ => false,
        }
    }
}

/// Requirement mode of a [`Parser`]. Exactly one mode is active at a time;
/// `Default` always carries a value.
pub(crate) enum Mode<T> {
    Required,
    Optional,
    Default(Arc<T>),
}

impl<T> Clone for Mode<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Required => Self::Required,
            Self::Optional => Self::Optional,
            Self::Default(value) => Self::Default(value.clone()),
        }
    }
}

impl<T> fmt::Debug for Mode<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Required => "Required",
            Self::Optional => "Optional",
            Self::Default(_) => "Default(_)",
        })
    }
}

/// Immutable specification of how one environment variable is located, validated
/// and defaulted.
///
/// Created by the built-in factories ([`string()`](crate::string),
/// [`integer()`](crate::integer) etc.) or by [`custom()`](crate::custom) /
/// [`custom_async()`](crate::custom_async). All configuration methods are chainable;
/// each one is a pure transform producing a new descriptor and leaving the receiver's
/// shared state untouched. Cloning is cheap (all shared pieces sit behind [`Arc`]s).
///
/// # Examples
///
/// ```
/// use typed_env as env;
///
/// let parser = env::json()
///     .optional()
///     .variable("APP_FEATURES")
///     .description("must be a JSON feature map");
/// ```
pub struct Parser<T> {
    parse: ParseFn<T>,
    mode: Mode<T>,
    description: Arc<str>,
    variable: Option<Arc<str>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            parse: self.parse.clone(),
            mode: self.mode.clone(),
            description: self.description.clone(),
            variable: self.variable.clone(),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Parser")
            .field("description", &self.description)
            .field("mode", &self.mode)
            .field("variable", &self.variable)
            .finish_non_exhaustive()
    }
}

impl<T> Parser<T> {
    pub(crate) fn sync<F>(description: &str, parse: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            parse: ParseFn::Sync(Arc::new(parse)),
            mode: Mode::Required,
            description: description.into(),
            variable: None,
        }
    }

    pub(crate) fn asynchronous<F>(description: &str, parse: F) -> Self
    where
        F: Fn(String) -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync + 'static,
    {
        Self {
            parse: ParseFn::Async(Arc::new(parse)),
            mode: Mode::Required,
            description: description.into(),
            variable: None,
        }
    }

    /// Returns a descriptor that rejects missing or empty environment variables.
    /// This is the mode every descriptor starts in; calling it on an already-required
    /// descriptor returns it unchanged.
    pub fn required(self) -> Self {
        match self.mode {
            Mode::Required => self,
            _ => Self {
                mode: Mode::Required,
                ..self
            },
        }
    }

    /// Returns a descriptor that tolerates missing or empty environment variables:
    /// the corresponding field is left unset instead of producing a failure.
    pub fn optional(self) -> Self {
        match self.mode {
            Mode::Optional => self,
            _ => Self {
                mode: Mode::Optional,
                ..self
            },
        }
    }

    /// Returns a descriptor that substitutes `value` when the environment variable
    /// is missing or empty.
    pub fn default(self, value: T) -> Self {
        Self {
            mode: Mode::Default(Arc::new(value)),
            ..self
        }
    }

    /// Returns a descriptor that reads the variable named `name` instead of the
    /// field's own key in the schema.
    pub fn variable(self, name: impl Into<String>) -> Self {
        Self {
            variable: Some(name.into().into()),
            ..self
        }
    }

    /// Returns a descriptor with an updated human-readable validity statement
    /// (e.g. `"must be a JSON feature map"`) used when rendering failures.
    pub fn description(self, text: impl Into<String>) -> Self {
        Self {
            description: text.into().into(),
            ..self
        }
    }

    pub(crate) fn mode(&self) -> &Mode<T> {
        &self.mode
    }

    pub(crate) fn description_text(&self) -> &str {
        &self.description
    }

    pub(crate) fn variable_name(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub(crate) async fn invoke(&self, raw: &str) -> anyhow::Result<T> {
        self.parse.invoke(raw).await
    }

    #[cfg(test)]
    pub(crate) fn shares_parse_fn_with(&self, other: &Self) -> bool {
        self.parse.ptr_eq(&other.parse)
    }

    #[cfg(test)]
    pub(crate) fn try_parse_sync(&self, raw: &str) -> anyhow::Result<T> {
        match &self.parse {
            ParseFn::Sync(parse) => parse(raw),
            ParseFn::Async(_) => panic!("parser is asynchronous"),
        }
    }
}
