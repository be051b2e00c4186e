//! Value and result types shared by flag types, the flagset parser and
//! command handlers.
//!
//! A parse produces a [`CliArgs`] whose `flags` record is a [`FlagValues`]
//! map. Handlers that want a strongly-shaped record implement [`FromFlags`]
//! for their own struct and read values back with [`FlagValues::require`]
//! and [`FlagValues::get`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FlagAccessError;

/// A parsed flag value of one of the built-in atomic types.
///
/// # Examples
///
/// ```
/// use flagset_core::{FlagValue, ValueKind};
///
/// let count = FlagValue::Number(25.0);
/// assert_eq!(count.kind(), ValueKind::Number);
/// assert_eq!(count.to_string(), "25");
///
/// let title = FlagValue::from("going to the movies");
/// assert_eq!(title.as_str(), Some("going to the movies"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Presence flags (`--verbose`, negated flags).
    Bool(bool),
    /// Free-form or enumerated string.
    Str(String),
    /// Floating point number.
    Number(f64),
    /// Integer.
    Integer(i64),
    /// Calendar date.
    Date(NaiveDate),
}

impl FlagValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            FlagValue::Bool(_) => ValueKind::Boolean,
            FlagValue::Str(_) => ValueKind::String,
            FlagValue::Number(_) => ValueKind::Number,
            FlagValue::Integer(_) => ValueKind::Integer,
            FlagValue::Date(_) => ValueKind::Date,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlagValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FlagValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FlagValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Str(s) => f.write_str(s),
            FlagValue::Number(n) => write!(f, "{n}"),
            FlagValue::Integer(n) => write!(f, "{n}"),
            FlagValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Str(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::Str(value)
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        FlagValue::Number(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Integer(value)
    }
}

impl From<NaiveDate> for FlagValue {
    fn from(value: NaiveDate) -> Self {
        FlagValue::Date(value)
    }
}

/// Kind of value a flag type produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    String,
    Number,
    Integer,
    Date,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Integer => "integer",
            ValueKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// Outcome of one atomic parse attempt.
///
/// `consumed == 0` together with `value == None` means "could not parse
/// here". Presence flags succeed with `consumed == 0` and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Number of tokens taken from the argument array.
    pub consumed: usize,
    /// The parsed value, if any.
    pub value: Option<FlagValue>,
}

impl ParseResult {
    /// The failed parse.
    pub const FAILED: ParseResult = ParseResult {
        consumed: 0,
        value: None,
    };

    /// A successful parse that took `consumed` tokens.
    pub fn parsed(consumed: usize, value: impl Into<FlagValue>) -> Self {
        Self {
            consumed,
            value: Some(value.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.value.is_none()
    }
}

/// Conversion out of a [`FlagValue`] into a plain Rust type.
pub trait FromFlagValue: Sized {
    /// The value kind this type is read from.
    const KIND: ValueKind;

    fn from_flag_value(value: &FlagValue) -> Option<Self>;
}

impl FromFlagValue for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromFlagValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl FromFlagValue for f64 {
    const KIND: ValueKind = ValueKind::Number;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_number()
    }
}

impl FromFlagValue for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FromFlagValue for NaiveDate {
    const KIND: ValueKind = ValueKind::Date;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_date()
    }
}

/// The resolved flags record of one parse.
///
/// Every required flag is present. Optional flags without a default are
/// absent when they were not given on the command line.
///
/// # Examples
///
/// ```
/// use flagset_core::{FlagValue, FlagValues};
///
/// let mut flags = FlagValues::new();
/// flags.insert("verbose", FlagValue::Bool(true));
/// flags.insert("count", FlagValue::Number(25.0));
///
/// assert_eq!(flags.get::<bool>("verbose"), Some(true));
/// assert_eq!(flags.require::<f64>("count").unwrap(), 25.0);
/// assert!(flags.require::<String>("title").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlagValues {
    values: BTreeMap<String, FlagValue>,
}

impl FlagValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: FlagValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns the raw value stored under `name`.
    pub fn value(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name)
    }

    /// Returns the value under `name` converted to `T`, or `None` when it is
    /// absent or of another kind.
    pub fn get<T: FromFlagValue>(&self, name: &str) -> Option<T> {
        self.values.get(name).and_then(T::from_flag_value)
    }

    /// Returns the value under `name` converted to `T`.
    ///
    /// # Errors
    ///
    /// [`FlagAccessError::MissingKey`] when the key is absent and
    /// [`FlagAccessError::WrongKind`] when the stored value has another kind.
    pub fn require<T: FromFlagValue>(&self, name: &str) -> Result<T, FlagAccessError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| FlagAccessError::MissingKey(name.to_string()))?;
        T::from_flag_value(value).ok_or_else(|| FlagAccessError::WrongKind {
            name: name.to_string(),
            expected: T::KIND,
            found: value.kind(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, FlagValue)> for FlagValues {
    fn from_iter<I: IntoIterator<Item = (K, FlagValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Conversion from a resolved [`FlagValues`] record into a command's own
/// flags shape.
///
/// # Examples
///
/// ```
/// use flagset_core::{FlagAccessError, FlagValue, FlagValues, FromFlags};
///
/// struct BuildFlags {
///     release: bool,
///     target: Option<String>,
/// }
///
/// impl FromFlags for BuildFlags {
///     fn from_flags(flags: &FlagValues) -> Result<Self, FlagAccessError> {
///         Ok(Self {
///             release: flags.require("release")?,
///             target: flags.get("target"),
///         })
///     }
/// }
///
/// let flags: FlagValues = [("release", FlagValue::Bool(false))].into_iter().collect();
/// let build = BuildFlags::from_flags(&flags).unwrap();
/// assert!(!build.release);
/// assert!(build.target.is_none());
/// ```
pub trait FromFlags: Sized {
    fn from_flags(flags: &FlagValues) -> Result<Self, FlagAccessError>;
}

impl FromFlags for FlagValues {
    fn from_flags(flags: &FlagValues) -> Result<Self, FlagAccessError> {
        Ok(flags.clone())
    }
}

impl FromFlags for () {
    fn from_flags(_flags: &FlagValues) -> Result<Self, FlagAccessError> {
        Ok(())
    }
}

/// Result of parsing one argument array against one flagset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CliArgs<F = FlagValues> {
    /// Tokens not claimed by any flag, in order.
    pub args: Vec<String>,
    /// Tokens after a bare `--`.
    pub dashdash: Vec<String>,
    /// The resolved flags record.
    pub flags: F,
}

impl<F> CliArgs<F> {
    /// Replaces the flags record, keeping positional and passthrough args.
    pub fn map_flags<G>(self, f: impl FnOnce(F) -> G) -> CliArgs<G> {
        CliArgs {
            args: self.args,
            dashdash: self.dashdash,
            flags: f(self.flags),
        }
    }
}

impl CliArgs<FlagValues> {
    /// Converts the flags record into `V`.
    ///
    /// # Errors
    ///
    /// Returns the [`FlagAccessError`] raised by `V::from_flags`.
    pub fn into_typed<V: FromFlags>(self) -> Result<CliArgs<V>, FlagAccessError> {
        let flags = V::from_flags(&self.flags)?;
        Ok(self.map_flags(|_| flags))
    }
}
