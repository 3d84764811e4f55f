//! `typed-env` – declarative validation and coercion of environment variables into
//! typed values.
//!
//! # Overview
//!
//! The task solved by the library is turning a flat string → string mapping (the
//! process environment, or anything shaped like it) into strongly-typed values,
//! reporting *every* invalid or missing variable in a single aggregated error
//! instead of failing on the first one.
//!
//! The building blocks:
//!
//! - [`Parser`] — an immutable, chainable descriptor of how one variable is
//!   validated and coerced: its parse function, requirement mode
//!   (required / optional / defaulted), human-readable description, and an
//!   optional variable-name override. Built-in descriptors cover the common cases
//!   ([`string()`], [`number()`], [`integer()`], [`json()`], [`port()`],
//!   [`boolean()`]); [`custom()`] and [`custom_async()`] wrap user-defined parse
//!   functions.
//! - [`EnvSchema`] — a mapping from application-facing field names to descriptors.
//! - [`EnvSource`] — the capability to look variables up, with adapters for plain
//!   maps, accessor closures ([`Lookup`]) and the process environment ([`OsEnv`]).
//! - [`parse()`] — the single entry point: walks the schema, applies each field's
//!   requirement mode (an empty variable counts as missing), invokes parse
//!   functions (awaiting asynchronous ones), and either returns the complete
//!   [`ParsedValues`] or fails with an [`EnvParseError`] listing all failures
//!   sorted by variable name.
//!
//! # Examples
//!
//! ## Basic workflow
//!
//! ```
//! use std::collections::HashMap;
//! use typed_env::{self as env, EnvSchema};
//!
//! let schema = EnvSchema::new()
//!     .field("PORT", env::port().default(8080))
//!     .field("NAME", env::string().optional())
//!     .field("DEBUG", env::boolean().variable("APP_DEBUG"));
//! // Any string map works as a source; use `typed_env::OsEnv` for the real
//! // process environment.
//! let source = HashMap::from([("PORT", "3000"), ("APP_DEBUG", "true")]);
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build()?;
//! # rt.block_on(async {
//! let values = typed_env::parse(&source, &schema).await?;
//! assert_eq!(values.get::<u16>("PORT"), Some(&3000));
//! assert_eq!(values.get::<String>("NAME"), None);
//! assert_eq!(values.get::<bool>("DEBUG"), Some(&true));
//! # anyhow::Ok(())
//! # })?;
//! # anyhow::Ok(())
//! ```
//!
//! ## Aggregated failures
//!
//! ```
//! use std::collections::HashMap;
//! use typed_env::{self as env, EnvSchema};
//!
//! let schema = EnvSchema::new()
//!     .field("PORT", env::port())
//!     .field("NAME", env::string());
//! let source = HashMap::from([("PORT", "65536")]);
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build()?;
//! # rt.block_on(async {
//! let err = typed_env::parse(&source, &schema).await.unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Failed to parse environment variables: \
//!      \"NAME\" must be set, \"PORT\" must be a valid port number"
//! );
//! assert_eq!(err.len(), 2);
//! # anyhow::Ok(())
//! # })?;
//! # anyhow::Ok(())
//! ```

mod error;
mod parse;
mod parser;
mod parsers;
mod schema;
mod source;

pub use self::{
    error::{EnvParseError, ParseFailure},
    parse::{ParsedValues, parse},
    parser::Parser,
    parsers::{boolean, custom, custom_async, integer, json, number, port, string},
    schema::EnvSchema,
    source::{EnvSource, Lookup, OsEnv},
};
