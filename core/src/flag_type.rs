//! Atomic flag types.
//!
//! A [`FlagType`] tries to read one value of its type starting at position
//! `i` of the argument array. It never looks at tokens before `i`, never
//! panics, and reports "no value here" with [`ParseResult::FAILED`]. The
//! flagset parser does not care what a type does internally, so new types
//! only have to implement this trait.
//!
//! # Examples
//!
//! ```
//! use flagset_core::{FlagType, NumberFlag, ParseResult, StringFlag};
//!
//! let args: Vec<String> = ["--count", "25or6to4"].iter().map(|s| s.to_string()).collect();
//! assert_eq!(NumberFlag.parse(1, &args), ParseResult::parsed(1, 25.0));
//! assert_eq!(StringFlag.parse(2, &args), ParseResult::FAILED);
//! ```

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use crate::types::{FlagValue, ParseResult, ValueKind};

/// Same leading-number grammar as JavaScript's `parseFloat`.
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?)(Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("static regex must compile")
});

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?[0-9]+)").expect("static regex must compile"));

/// Parser for one scalar flag type.
pub trait FlagType: fmt::Debug + Send + Sync {
    /// Attempts to read a value starting at `args[i]`.
    fn parse(&self, i: usize, args: &[String]) -> ParseResult;

    /// The kind of value this type produces.
    fn kind(&self) -> ValueKind;

    /// Type-level default applied when the flag is absent.
    ///
    /// A type with a default does not allow a flag-level default.
    fn default_value(&self) -> Option<FlagValue> {
        None
    }

    /// Checks a resolved value, including defaults.
    fn validate(&self, _value: &FlagValue) -> bool {
        true
    }
}

/// Presence flag: `--wrap` means `true`, absence means `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanFlag;

impl FlagType for BooleanFlag {
    fn parse(&self, _i: usize, _args: &[String]) -> ParseResult {
        ParseResult::parsed(0, true)
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Boolean
    }

    fn default_value(&self) -> Option<FlagValue> {
        Some(FlagValue::Bool(false))
    }
}

/// Negated presence flag: `--no-wrap` style, `false` when present and
/// `true` when absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegatedFlag;

impl FlagType for NegatedFlag {
    fn parse(&self, _i: usize, _args: &[String]) -> ParseResult {
        ParseResult::parsed(0, false)
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Boolean
    }

    fn default_value(&self) -> Option<FlagValue> {
        Some(FlagValue::Bool(true))
    }
}

/// Takes the next token verbatim, including a literal `--`.
///
/// An empty or missing token is not a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFlag;

impl FlagType for StringFlag {
    fn parse(&self, i: usize, args: &[String]) -> ParseResult {
        match args.get(i) {
            Some(value) if !value.is_empty() => ParseResult::parsed(1, value.as_str()),
            _ => ParseResult::FAILED,
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::String
    }
}

/// Floating point number read off the front of the next token, so
/// `25or6to4` gives `25` and `2020-02-02` gives `2020`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberFlag;

impl FlagType for NumberFlag {
    fn parse(&self, i: usize, args: &[String]) -> ParseResult {
        match args.get(i).and_then(|token| leading_float(token)) {
            Some(value) => ParseResult::parsed(1, value),
            None => ParseResult::FAILED,
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Number
    }
}

fn leading_float(token: &str) -> Option<f64> {
    let caps = LEADING_FLOAT.captures(token)?;
    let negative = &caps[1] == "-";
    let magnitude = match &caps[2] {
        "Infinity" => f64::INFINITY,
        digits => digits.parse::<f64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Integer read off the front of the next token, so `1.5` gives `1`.
///
/// Values outside the `i64` range do not parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerFlag;

impl FlagType for IntegerFlag {
    fn parse(&self, i: usize, args: &[String]) -> ParseResult {
        let value = args.get(i).and_then(|token| {
            let caps = LEADING_INT.captures(token)?;
            caps[1].parse::<i64>().ok()
        });
        match value {
            Some(value) => ParseResult::parsed(1, value),
            None => ParseResult::FAILED,
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Integer
    }
}

/// Accepts only tokens from a fixed set of legal strings.
///
/// # Examples
///
/// ```
/// use flagset_core::{EnumFlag, FlagType, ParseResult};
///
/// let format = EnumFlag::new(["text", "html", "markdown"]);
/// let args = vec!["html".to_string(), "pdf".to_string()];
/// assert_eq!(format.parse(0, &args), ParseResult::parsed(1, "html"));
/// assert_eq!(format.parse(1, &args), ParseResult::FAILED);
/// ```
#[derive(Debug, Clone)]
pub struct EnumFlag {
    legal: Vec<String>,
}

impl EnumFlag {
    pub fn new<I, S>(legal: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            legal: legal.into_iter().map(Into::into).collect(),
        }
    }

    pub fn legal_values(&self) -> &[String] {
        &self.legal
    }

    fn accepts(&self, candidate: &str) -> bool {
        self.legal.iter().any(|legal| legal == candidate)
    }
}

impl FlagType for EnumFlag {
    fn parse(&self, i: usize, args: &[String]) -> ParseResult {
        match args.get(i) {
            Some(value) if self.accepts(value) => ParseResult::parsed(1, value.as_str()),
            _ => ParseResult::FAILED,
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn validate(&self, value: &FlagValue) -> bool {
        value.as_str().is_some_and(|s| self.accepts(s))
    }
}

/// Calendar date in `YYYY-MM-DD` form.
///
/// A full RFC 3339 timestamp is also accepted; only its UTC date is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFlag;

impl FlagType for DateFlag {
    fn parse(&self, i: usize, args: &[String]) -> ParseResult {
        match args.get(i).and_then(|token| parse_date(token)) {
            Some(date) => ParseResult::parsed(1, date),
            None => ParseResult::FAILED,
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Date
    }
}

fn parse_date(token: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(token)
        .ok()
        .map(|ts| ts.with_timezone(&Utc).date_naive())
}
