//! Parse failures and their aggregation.

use std::fmt;

/// Validation problem for a single environment variable, prior to aggregation.
///
/// Carries the resolved variable name (after applying any override), the
/// descriptor's validity statement at failure time, and the underlying cause:
/// either whatever error the parse function produced, verbatim, or a synthetic
/// "not set" error for missing required variables.
pub struct ParseFailure {
    variable: String,
    description: String,
    optional: bool,
    cause: anyhow::Error,
}

impl ParseFailure {
    pub(crate) fn new(
        variable: &str,
        description: &str,
        optional: bool,
        cause: anyhow::Error,
    ) -> Self {
        Self {
            variable: variable.to_owned(),
            description: description.to_owned(),
            optional,
            cause,
        }
    }

    /// Returns the name of the environment variable that failed to parse.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Returns the descriptor's validity statement, e.g. `must be an integer`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Checks whether the failing field was optional. Optional fields only fail
    /// when a present value is rejected by the parse function.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the underlying error.
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }
}

impl fmt::Debug for ParseFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ParseFailure")
            .field("variable", &self.variable)
            .field("description", &self.description)
            .field("optional", &self.optional)
            .field("cause", &self.cause)
            .finish()
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:?}", self.variable)?;
        if self.optional {
            formatter.write_str(" (optional)")?;
        }
        write!(formatter, " {}", self.description)
    }
}

/// Aggregated error surfaced by [`parse()`](crate::parse()), bundling every
/// [`ParseFailure`] from one call.
///
/// Failures are sorted by variable name ascending, both in the rendered message
/// and in the structured list exposed by [`Self::failures()`].
#[derive(Debug)]
pub struct EnvParseError {
    failures: Vec<ParseFailure>,
}

impl EnvParseError {
    pub(crate) fn new(mut failures: Vec<ParseFailure>) -> Self {
        failures.sort_by(|a, b| a.variable.cmp(&b.variable));
        Self { failures }
    }

    /// Iterates over the failures, sorted by variable name.
    pub fn failures(&self) -> impl Iterator<Item = &ParseFailure> {
        self.failures.iter()
    }

    /// Returns the number of failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Checks whether there are no failures. Errors produced by
    /// [`parse()`](crate::parse()) always contain at least one.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the first failure in sorted order, if any.
    pub fn first(&self) -> Option<&ParseFailure> {
        self.failures.first()
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Failed to parse environment variables")?;
        for (i, failure) in self.failures.iter().enumerate() {
            formatter.write_str(if i == 0 { ": " } else { ", " })?;
            fmt::Display::fmt(failure, formatter)?;
        }
        Ok(())
    }
}

impl std::error::Error for EnvParseError {}
