//! Schema mapping field names to parser descriptors.

use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

use futures_util::future::BoxFuture;

use crate::parser::{Mode, Parser};

/// Parsed value with its concrete type erased. `Arc` (rather than `Box`) lets a
/// schema-held default be shared by any number of parse results without a `Clone`
/// bound on the value type.
pub(crate) type ErasedValue = Arc<dyn Any + Send + Sync>;

/// What to do when a variable is missing (or empty, which is normalized to missing).
pub(crate) enum MissingPolicy {
    Fail,
    Skip,
    Substitute(ErasedValue),
}

/// Object-safe view of a [`Parser`] held by an [`EnvSchema`].
pub(crate) trait ErasedParser: Send + Sync {
    fn variable_override(&self) -> Option<&str>;

    fn description(&self) -> &str;

    fn is_optional(&self) -> bool;

    fn on_missing(&self) -> MissingPolicy;

    fn parse_raw<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, anyhow::Result<ErasedValue>>;
}

impl<T: Send + Sync + 'static> ErasedParser for Parser<T> {
    fn variable_override(&self) -> Option<&str> {
        self.variable_name()
    }

    fn description(&self) -> &str {
        self.description_text()
    }

    fn is_optional(&self) -> bool {
        matches!(self.mode(), Mode::Optional)
    }

    fn on_missing(&self) -> MissingPolicy {
        match self.mode() {
            Mode::Required => MissingPolicy::Fail,
            Mode::Optional => MissingPolicy::Skip,
            Mode::Default(value) => {
                let value: ErasedValue = value.clone();
                MissingPolicy::Substitute(value)
            }
        }
    }

    fn parse_raw<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, anyhow::Result<ErasedValue>> {
        Box::pin(async move {
            let parsed = self.invoke(raw).await?;
            let parsed: ErasedValue = Arc::new(parsed);
            Ok(parsed)
        })
    }
}

/// Mapping from application-facing field names to parser descriptors, consumed by
/// [`parse()`](crate::parse()).
///
/// Field names are unique; inserting a field with an existing name replaces the
/// earlier descriptor. Insertion order is irrelevant: failures are reported sorted
/// by variable name regardless of it.
///
/// # Examples
///
/// ```
/// use typed_env::{self as env, EnvSchema};
///
/// let schema = EnvSchema::new()
///     .field("PORT", env::port().default(8080))
///     .field("NAME", env::string().optional());
/// assert_eq!(schema.len(), 2);
/// assert!(schema.contains("PORT"));
/// ```
pub struct EnvSchema {
    fields: BTreeMap<String, Box<dyn ErasedParser>>,
}

impl EnvSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field parsed by the given descriptor.
    #[must_use]
    pub fn field<T>(mut self, name: impl Into<String>, parser: Parser<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.fields.insert(name.into(), Box::new(parser));
        self
    }

    /// Returns the number of fields in this schema.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Checks whether this schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks whether this schema contains a field with the given name.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &dyn ErasedParser)> {
        self.fields
            .iter()
            .map(|(name, parser)| (name.as_str(), parser.as_ref()))
    }
}

impl Default for EnvSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvSchema {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = formatter.debug_map();
        for (name, parser) in &self.fields {
            map.entry(name, &parser.description());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{integer, string};

    #[test]
    fn inserting_field_twice_replaces_descriptor() {
        let schema = EnvSchema::new()
            .field("VALUE", string())
            .field("VALUE", integer());

        assert_eq!(schema.len(), 1);
        let (_, parser) = schema.iter().next().unwrap();
        assert_eq!(parser.description(), "must be an integer");
    }

    #[test]
    fn erased_parser_exposes_descriptor_metadata() {
        let schema = EnvSchema::new().field("WORKERS", integer().optional().variable("NUM_WORKERS"));

        let (field, parser) = schema.iter().next().unwrap();
        assert_eq!(field, "WORKERS");
        assert_eq!(parser.variable_override(), Some("NUM_WORKERS"));
        assert!(parser.is_optional());
        assert!(matches!(parser.on_missing(), MissingPolicy::Skip));
    }

    #[test]
    fn default_mode_erases_to_substitution() {
        let schema = EnvSchema::new().field("PORT", crate::port().default(8080));
        let (_, parser) = schema.iter().next().unwrap();

        let MissingPolicy::Substitute(value) = parser.on_missing() else {
            panic!("unexpected missing policy");
        };
        assert_eq!(value.downcast_ref::<u16>(), Some(&8080));
    }
}
