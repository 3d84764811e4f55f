//! Parse orchestration: walking a schema against an environment source.

use std::{collections::HashMap, fmt};

use anyhow::anyhow;

use crate::{
    error::{EnvParseError, ParseFailure},
    schema::{EnvSchema, ErasedValue, MissingPolicy},
    source::EnvSource,
};

/// Result of a successful [`parse()`] call: one entry per schema field.
///
/// Values are type-erased; [`Self::get()`] recovers them by downcasting to the
/// type produced by the field's parser. Optional fields whose variable was missing
/// are present in the map but unset.
pub struct ParsedValues {
    values: HashMap<String, Option<ErasedValue>>,
}

impl ParsedValues {
    /// Returns the value of the given field, downcast to `T`.
    ///
    /// Returns `None` if the field is not in the map, if it is an unset optional
    /// field, or if `T` is not the type produced by the field's parser.
    pub fn get<T: 'static>(&self, field: &str) -> Option<&T> {
        self.values.get(field)?.as_ref()?.downcast_ref()
    }

    /// Checks whether the given field carries a value. Unset optional fields are
    /// contained in the map but not set.
    pub fn is_set(&self, field: &str) -> bool {
        matches!(self.values.get(field), Some(Some(_)))
    }

    /// Checks whether the given field was part of the parsed schema.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Returns the number of fields, including unset optional ones.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ParsedValues {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = formatter.debug_map();
        for (field, value) in &self.values {
            map.entry(field, if value.is_some() { &"_" } else { &"<unset>" });
        }
        map.finish()
    }
}

/// Parses all fields of `schema` from the given environment source.
///
/// Each field resolves its variable name (the descriptor's override, else the
/// field's own key), looks the variable up, and applies the descriptor's
/// requirement mode. A variable set to the empty string is indistinguishable from
/// an unset one: both count as missing, for every requirement mode. Missing
/// required variables and values rejected by a parse function are collected
/// across *all* fields and surfaced as one [`EnvParseError`]; there is no partial
/// success.
///
/// Asynchronous custom parsers are awaited in place; fields are processed
/// sequentially and independently.
///
/// # Errors
///
/// Returns an [`EnvParseError`] bundling every failed field, sorted by variable
/// name.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use typed_env::{self as env, EnvSchema};
///
/// let schema = EnvSchema::new()
///     .field("PORT", env::port())
///     .field("RETRIES", env::integer().default(3));
/// let source = HashMap::from([("PORT", "8080")]);
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build()?;
/// # rt.block_on(async {
/// let values = typed_env::parse(&source, &schema).await?;
/// assert_eq!(values.get::<u16>("PORT"), Some(&8080));
/// assert_eq!(values.get::<i64>("RETRIES"), Some(&3));
/// # anyhow::Ok(())
/// # })?;
/// # anyhow::Ok(())
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(field_count = schema.len()))]
pub async fn parse<E: EnvSource>(
    env: &E,
    schema: &EnvSchema,
) -> Result<ParsedValues, EnvParseError> {
    let mut values = HashMap::with_capacity(schema.len());
    let mut failures = vec![];

    for (field, parser) in schema.iter() {
        let variable = parser.variable_override().unwrap_or(field);
        // Empty values are normalized to missing ones.
        let raw = env.get(variable).filter(|raw| !raw.is_empty());

        let Some(raw) = raw else {
            match parser.on_missing() {
                MissingPolicy::Fail => {
                    let cause = anyhow!("{variable:?} not set");
                    failures.push(ParseFailure::new(variable, parser.description(), false, cause));
                }
                MissingPolicy::Skip => {
                    tracing::debug!(field, variable, "optional variable not set");
                    values.insert(field.to_owned(), None);
                }
                MissingPolicy::Substitute(default) => {
                    tracing::debug!(field, variable, "substituting default value");
                    values.insert(field.to_owned(), Some(default));
                }
            }
            continue;
        };

        match parser.parse_raw(&raw).await {
            Ok(parsed) => {
                tracing::trace!(field, variable, "parsed variable");
                values.insert(field.to_owned(), Some(parsed));
            }
            Err(cause) => {
                failures.push(ParseFailure::new(
                    variable,
                    parser.description(),
                    parser.is_optional(),
                    cause,
                ));
            }
        }
    }

    if failures.is_empty() {
        Ok(ParsedValues { values })
    } else {
        tracing::debug!(failure_count = failures.len(), "parsing failed");
        Err(EnvParseError::new(failures))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{boolean, integer, string};

    #[tokio::test]
    async fn empty_value_counts_as_missing_for_every_mode() {
        let source = HashMap::from([("REQUIRED", ""), ("OPTIONAL", ""), ("DEFAULTED", "")]);
        let schema = EnvSchema::new()
            .field("REQUIRED", string())
            .field("OPTIONAL", string().optional())
            .field("DEFAULTED", string().default("fallback".to_owned()));

        let err = parse(&source, &schema).await.unwrap_err();
        assert_eq!(err.len(), 1);
        let failure = err.first().unwrap();
        assert_eq!(failure.variable(), "REQUIRED");
        assert_eq!(failure.cause().to_string(), "\"REQUIRED\" not set");

        let schema = EnvSchema::new()
            .field("OPTIONAL", string().optional())
            .field("DEFAULTED", string().default("fallback".to_owned()));
        let values = parse(&source, &schema).await.unwrap();
        assert!(!values.is_set("OPTIONAL"));
        assert!(values.contains("OPTIONAL"));
        assert_eq!(
            values.get::<String>("DEFAULTED"),
            Some(&"fallback".to_owned())
        );
    }

    #[tokio::test]
    async fn variable_override_redirects_lookup() {
        let source = HashMap::from([("GREETING", "hello")]);
        let schema = EnvSchema::new().field("renamed", string().variable("GREETING"));

        let values = parse(&source, &schema).await.unwrap();
        assert_eq!(values.get::<String>("renamed"), Some(&"hello".to_owned()));
        assert_eq!(values.len(), 1);
    }

    #[tokio::test]
    async fn failure_on_one_field_does_not_abort_others() {
        let source = HashMap::from([("FLAG", "1"), ("WORKERS", "4")]);
        let schema = EnvSchema::new()
            .field("FLAG", boolean())
            .field("WORKERS", integer());

        let err = parse(&source, &schema).await.unwrap_err();
        // Both fields were attempted; only FLAG failed.
        assert_eq!(err.len(), 1);
        assert_eq!(err.first().unwrap().variable(), "FLAG");
    }

    #[tokio::test]
    async fn rejected_optional_value_is_reported_as_optional() {
        let source = HashMap::from([("LIMIT", "nope")]);
        let schema = EnvSchema::new().field("LIMIT", integer().optional());

        let err = parse(&source, &schema).await.unwrap_err();
        let failure = err.first().unwrap();
        assert!(failure.is_optional());
        assert_eq!(
            err.to_string(),
            "Failed to parse environment variables: \"LIMIT\" (optional) must be an integer"
        );
    }

    #[tokio::test]
    async fn empty_schema_parses_to_empty_values() {
        let source: HashMap<&str, &str> = HashMap::new();
        let values = parse(&source, &EnvSchema::new()).await.unwrap();
        assert!(values.is_empty());
    }
}
