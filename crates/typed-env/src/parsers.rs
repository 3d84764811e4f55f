//! Built-in parsers and constructors for user-defined ones.

use std::{future::Future, sync::LazyLock};

use anyhow::anyhow;

use crate::parser::Parser;

static STRING: LazyLock<Parser<String>> =
    LazyLock::new(|| Parser::sync("must be set", |raw: &str| Ok(raw.to_owned())));
static NUMBER: LazyLock<Parser<f64>> =
    LazyLock::new(|| Parser::sync("must be a number", parse_number));
static INTEGER: LazyLock<Parser<i64>> =
    LazyLock::new(|| Parser::sync("must be an integer", parse_integer));
static JSON: LazyLock<Parser<serde_json::Value>> =
    LazyLock::new(|| Parser::sync("must be JSON", parse_json));
static PORT: LazyLock<Parser<u16>> =
    LazyLock::new(|| Parser::sync("must be a valid port number", parse_port));
static BOOLEAN: LazyLock<Parser<bool>> =
    LazyLock::new(|| Parser::sync(r#"must be "true" or "false""#, parse_boolean));

fn parse_number(raw: &str) -> anyhow::Result<f64> {
    let json: serde_json::Value = serde_json::from_str(raw)
        .map_err(|_| anyhow!("{raw:?} cannot be parsed as a number"))?;
    json.as_f64()
        .filter(|number| number.is_finite())
        .ok_or_else(|| anyhow!("{raw:?} cannot be parsed as a number"))
}

#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
fn parse_integer(raw: &str) -> anyhow::Result<i64> {
    let error = || anyhow!("{raw:?} cannot be parsed as an integer");
    let number = parse_number(raw).map_err(|_| error())?;
    if number.fract() != 0.0 || number < i64::MIN as f64 || number >= i64::MAX as f64 {
        return Err(error());
    }
    Ok(number as i64)
}

fn parse_json(raw: &str) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(raw)?)
}

fn parse_port(raw: &str) -> anyhow::Result<u16> {
    let error = || anyhow!("{raw:?} cannot be parsed as a port number");
    let number = parse_integer(raw).map_err(|_| error())?;
    u16::try_from(number).map_err(|_| error())
}

fn parse_boolean(raw: &str) -> anyhow::Result<bool> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(anyhow!("{raw:?} cannot be parsed as a boolean")),
    }
}

/// Parser accepting any value. Since missing and empty variables are handled before
/// the parse function runs, it never fails; its description is `must be set`.
pub fn string() -> Parser<String> {
    STRING.clone()
}

/// Parser accepting any finite JSON number (`6.28`, `3`, `1e5`); rejects everything
/// else, including quoted strings like `"1.2"`.
pub fn number() -> Parser<f64> {
    NUMBER.clone()
}

/// Parser accepting JSON numbers without a fractional part. `100` and `1e2` are
/// integers; `1.2` is not.
pub fn integer() -> Parser<i64> {
    INTEGER.clone()
}

/// Parser accepting any syntactically valid JSON value.
pub fn json() -> Parser<serde_json::Value> {
    JSON.clone()
}

/// Parser accepting integers in the inclusive range 0–65535.
pub fn port() -> Parser<u16> {
    PORT.clone()
}

/// Parser accepting exactly the literals `true` and `false`, case-sensitive.
pub fn boolean() -> Parser<bool> {
    BOOLEAN.clone()
}

/// Wraps a user-defined synchronous parse function with the supplied description.
/// The resulting descriptor has the same chain semantics as the built-in ones.
///
/// # Examples
///
/// ```
/// use typed_env as env;
///
/// let parser = env::custom("must be a valid u128", |raw: &str| raw.parse::<u128>());
/// ```
pub fn custom<T, F, E>(description: &str, parse: F) -> Parser<T>
where
    F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    E: Into<anyhow::Error>,
{
    Parser::sync(description, move |raw: &str| parse(raw).map_err(Into::into))
}

/// Asynchronous counterpart of [`custom()`]. The orchestrator awaits the returned
/// future, so asynchronous and synchronous parsers are indistinguishable to callers
/// of [`parse()`](crate::parse()).
pub fn custom_async<T, F, Fut, E>(description: &str, parse: F) -> Parser<T>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Into<anyhow::Error>,
    T: Send + 'static,
{
    Parser::asynchronous(description, move |raw: String| {
        let parsed = parse(raw);
        Box::pin(async move { parsed.await.map_err(Into::into) })
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn factories_share_canonical_parsers() {
        assert!(string().shares_parse_fn_with(&string()));
        assert!(port().shares_parse_fn_with(&port()));
        assert!(
            string()
                .try_parse_sync("value")
                .is_ok_and(|parsed| parsed == "value")
        );
    }

    #[test]
    fn number_accepts_json_number_literals() {
        assert_eq!(number().try_parse_sync("6.28").unwrap(), 6.28);
        assert_eq!(number().try_parse_sync("3").unwrap(), 3.0);
        assert_eq!(number().try_parse_sync("1e5").unwrap(), 100_000.0);
        assert_eq!(number().try_parse_sync("-0.5").unwrap(), -0.5);
    }

    #[test]
    fn number_rejects_non_numbers() {
        for raw in [r#""1.2""#, "null", "true", "not json", "[1]"] {
            let err = number().try_parse_sync(raw).unwrap_err();
            assert!(
                err.to_string().contains("cannot be parsed as a number"),
                "{err}"
            );
        }
    }

    #[test]
    fn integer_requires_no_fractional_part() {
        assert_eq!(integer().try_parse_sync("2").unwrap(), 2);
        assert_eq!(integer().try_parse_sync("-7").unwrap(), -7);
        assert_eq!(integer().try_parse_sync("1e2").unwrap(), 100);

        for raw in ["1.2", r#""3""#, "NaN"] {
            let err = integer().try_parse_sync(raw).unwrap_err();
            assert!(
                err.to_string().contains("cannot be parsed as an integer"),
                "{err}"
            );
        }
    }

    #[test]
    fn json_accepts_any_valid_json() {
        assert_eq!(
            json_parser_value(r#"{"hello":"world"}"#),
            json!({ "hello": "world" })
        );
        assert_eq!(json_parser_value("[1,2,3]"), json!([1, 2, 3]));
        assert_eq!(json_parser_value("null"), json!(null));

        let err = json().try_parse_sync("undefined").unwrap_err();
        assert!(err.is::<serde_json::Error>());
    }

    fn json_parser_value(raw: &str) -> serde_json::Value {
        json().try_parse_sync(raw).unwrap()
    }

    #[test]
    fn port_requires_integer_in_range() {
        assert_eq!(port().try_parse_sync("0").unwrap(), 0);
        assert_eq!(port().try_parse_sync("8080").unwrap(), 8080);
        assert_eq!(port().try_parse_sync("65535").unwrap(), 65_535);

        for raw in ["65536", "-1", "8080.1", "auto"] {
            let err = port().try_parse_sync(raw).unwrap_err();
            assert!(
                err.to_string().contains("cannot be parsed as a port number"),
                "{err}"
            );
        }
    }

    #[test]
    fn boolean_accepts_exact_literals_only() {
        assert!(boolean().try_parse_sync("true").unwrap());
        assert!(!boolean().try_parse_sync("false").unwrap());

        for raw in ["1", "0", "True", "FALSE", "yes"] {
            let err = boolean().try_parse_sync(raw).unwrap_err();
            assert!(
                err.to_string().contains("cannot be parsed as a boolean"),
                "{err}"
            );
        }
    }

    #[test]
    fn custom_parser_wraps_fallible_function() {
        let parser = custom("must be a valid u128", |raw: &str| raw.parse::<u128>());
        assert_eq!(
            parser.try_parse_sync("99999999999999999").unwrap(),
            99_999_999_999_999_999
        );
        assert!(parser.try_parse_sync("1.2").is_err());
        assert_eq!(parser.description_text(), "must be a valid u128");
    }
}
