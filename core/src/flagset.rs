//! Flag definitions and flagsets.
//!
//! A [`Flag`] pairs a name and description with a [`FlagType`] and says
//! whether its value must be present in every parse result
//! ([`Presence::Required`]) or may be absent ([`Presence::Optional`]).
//! A [`Flagset`] is the complete, immutable declaration of the flags one
//! command accepts.
//!
//! # Examples
//!
//! ```
//! use flagset_core::*;
//!
//! let flagset = Flagset::new()
//!     .with_flag(Flag::required("verbose", "print more", BooleanFlag))
//!     .with_flag(Flag::optional("title", "page title", StringFlag))
//!     .with_flag(
//!         Flag::required("count", "how many", NumberFlag)
//!             .with_default(FlagValue::Number(1.0))
//!             .unwrap(),
//!     );
//!
//! assert_eq!(flagset.names(), vec!["count", "title", "verbose"]);
//! assert_eq!(
//!     flagset.help(),
//!     "--help: show command help\n\
//!      --count: how many (default: 1)\n\
//!      --title: page title\n\
//!      --verbose: print more (default: false)\n"
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{DefinitionError, ParsingError};
use crate::flag_type::FlagType;
use crate::parser::{FlagsetParser, ParserConfig};
use crate::types::{CliArgs, FlagValue};

/// Description of the implicit help flag in help text.
pub const HELP_DESCRIPTION: &str = "show command help";

/// Whether a flag's value is always present in the parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Present in every successful parse, either given or defaulted.
    Required,
    /// May be absent when not given and without a default.
    Optional,
}

/// Flag-specific check run on the resolved value.
pub type Validator = Arc<dyn Fn(&FlagValue) -> bool + Send + Sync>;

/// Declaration of one `--name` flag.
#[derive(Clone)]
pub struct Flag {
    name: String,
    description: String,
    flag_type: Arc<dyn FlagType>,
    presence: Presence,
    default: Option<FlagValue>,
    validator: Option<Validator>,
}

impl Flag {
    /// Creates a flag whose value is always present after parsing.
    ///
    /// `name` is given without the leading `--`. Without a type or flag
    /// default, parsing fails when the flag is missing.
    pub fn required(name: &str, description: &str, flag_type: impl FlagType + 'static) -> Self {
        Self::new(name, description, Arc::new(flag_type), Presence::Required)
    }

    /// Creates a flag that may be absent from the parse result.
    pub fn optional(name: &str, description: &str, flag_type: impl FlagType + 'static) -> Self {
        Self::new(name, description, Arc::new(flag_type), Presence::Optional)
    }

    /// Creates a flag from a shared flag type.
    pub fn new(
        name: &str,
        description: &str,
        flag_type: Arc<dyn FlagType>,
        presence: Presence,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            flag_type,
            presence,
            default: None,
            validator: None,
        }
    }

    /// Sets the value used when the flag is not given.
    ///
    /// # Errors
    ///
    /// - [`DefinitionError::ConflictingDefault`] if the flag type has its own
    ///   default (boolean and negated flags do).
    /// - [`DefinitionError::DefaultKindMismatch`] if `value` is of another kind
    ///   than the flag type parses.
    /// - [`DefinitionError::IllegalDefault`] if the flag type rejects `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagset_core::*;
    ///
    /// let err = Flag::required("verbose", "", BooleanFlag)
    ///     .with_default(FlagValue::Bool(true))
    ///     .unwrap_err();
    /// assert!(matches!(err, DefinitionError::ConflictingDefault { .. }));
    /// ```
    pub fn with_default(mut self, value: FlagValue) -> Result<Self, DefinitionError> {
        if let Some(type_default) = self.flag_type.default_value() {
            return Err(DefinitionError::ConflictingDefault {
                flag: self.name,
                type_default: type_default.to_string(),
            });
        }
        if value.kind() != self.flag_type.kind() {
            return Err(DefinitionError::DefaultKindMismatch {
                flag: self.name,
                expected: self.flag_type.kind(),
                found: value.kind(),
            });
        }
        if !self.flag_type.validate(&value) {
            return Err(DefinitionError::IllegalDefault {
                flag: self.name,
                value: value.to_string(),
            });
        }
        self.default = Some(value);
        Ok(self)
    }

    /// Adds a check the resolved value must pass.
    pub fn with_validator(
        mut self,
        validator: impl Fn(&FlagValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flag_type(&self) -> &dyn FlagType {
        self.flag_type.as_ref()
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    /// The flag-level default, if one was set.
    pub fn default(&self) -> Option<&FlagValue> {
        self.default.as_ref()
    }

    /// The value applied when the flag is absent: the type default wins over
    /// the flag default.
    pub fn effective_default(&self) -> Option<FlagValue> {
        self.flag_type
            .default_value()
            .or_else(|| self.default.clone())
    }

    /// Runs the type's and the flag's checks on `value`.
    pub fn validate(&self, value: &FlagValue) -> bool {
        self.flag_type.validate(value) && self.validator.as_ref().is_none_or(|check| check(value))
    }

    fn help_line(&self) -> String {
        match self.effective_default() {
            Some(default) => format!("--{}: {} (default: {default})", self.name, self.description),
            None => format!("--{}: {}", self.name, self.description),
        }
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("flag_type", &self.flag_type)
            .field("presence", &self.presence)
            .field("default", &self.default)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// The flags accepted by one command.
///
/// Built once and shared read-only; parsing never mutates it.
#[derive(Debug, Clone, Default)]
pub struct Flagset {
    flags: Vec<Flag>,
}

impl Flagset {
    /// Creates an empty flagset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag.
    ///
    /// Duplicate and reserved names are not rejected here; run
    /// [`validate_flagset`](crate::validate_flagset) to catch them.
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Finds a flag by name (without the leading `--`).
    pub fn find(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Iterates over flags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flag names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.flags.iter().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Renders help for the default [`ParserConfig`].
    pub fn help(&self) -> String {
        self.help_for(&ParserConfig::default())
    }

    /// Renders one line per flag, sorted by name, after a line for the help
    /// flag `config` accepts.
    pub fn help_for(&self, config: &ParserConfig) -> String {
        let mut flags: Vec<&Flag> = self.flags.iter().collect();
        flags.sort_by(|a, b| a.name.cmp(&b.name));

        let mut lines: Vec<String> = config
            .help_flag()
            .map(|flag| format!("{flag}: {HELP_DESCRIPTION}"))
            .into_iter()
            .collect();
        lines.extend(flags.iter().map(|f| f.help_line()));
        lines.push(String::new());
        lines.join("\n")
    }

    /// Returns a parser for this flagset with the given configuration.
    pub fn parser(&self, config: ParserConfig) -> FlagsetParser<'_> {
        FlagsetParser::new(self, config)
    }

    /// Parses `args` with the default [`ParserConfig`].
    ///
    /// # Errors
    ///
    /// Returns the [`ParsingError`] raised by the parse.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<CliArgs, ParsingError> {
        self.parser(ParserConfig::default()).parse(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag_type::{BooleanFlag, EnumFlag, IntegerFlag, NegatedFlag, StringFlag};
    use crate::types::ValueKind;

    #[test]
    fn test_default_conflicts_with_type_default() {
        let err = Flag::optional("wrap", "", NegatedFlag)
            .with_default(FlagValue::Bool(false))
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::ConflictingDefault {
                flag: "wrap".to_string(),
                type_default: "true".to_string(),
            }
        );
    }

    #[test]
    fn test_default_kind_must_match() {
        let err = Flag::optional("count", "", IntegerFlag)
            .with_default(FlagValue::Number(1.5))
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::DefaultKindMismatch {
                flag: "count".to_string(),
                expected: ValueKind::Integer,
                found: ValueKind::Number,
            }
        );
    }

    #[test]
    fn test_enum_default_must_be_legal() {
        let format = EnumFlag::new(["text", "html"]);
        assert!(
            Flag::optional("format", "", format.clone())
                .with_default(FlagValue::from("html"))
                .is_ok()
        );
        let err = Flag::optional("format", "", format)
            .with_default(FlagValue::from("pdf"))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::IllegalDefault { .. }));
    }

    #[test]
    fn test_effective_default_prefers_type_default() {
        let flag = Flag::optional("verbose", "", BooleanFlag);
        assert_eq!(flag.effective_default(), Some(FlagValue::Bool(false)));
        assert!(flag.default().is_none());

        let flag = Flag::optional("title", "", StringFlag)
            .with_default(FlagValue::from("going to the movies"))
            .unwrap();
        assert_eq!(
            flag.effective_default(),
            Some(FlagValue::from("going to the movies"))
        );
    }

    #[test]
    fn test_help_lists_help_first_then_sorted() {
        let flagset = Flagset::new()
            .with_flag(Flag::optional("zeta", "last", StringFlag))
            .with_flag(Flag::optional("title", "", StringFlag))
            .with_flag(Flag::required("alpha", "first", BooleanFlag));

        assert_eq!(
            flagset.help(),
            "--help: show command help\n--alpha: first (default: false)\n--title: \n--zeta: last\n"
        );
    }

    #[test]
    fn test_help_names_configured_help_flag() {
        let flagset = Flagset::new().with_flag(Flag::optional("title", "page title", StringFlag));

        let usage = ParserConfig::default().with_help_aliases(["-?", "--usage"]);
        assert_eq!(
            flagset.help_for(&usage),
            "--usage: show command help\n--title: page title\n"
        );

        let short_only = ParserConfig::default().with_help_aliases(["-h"]);
        assert!(flagset.help_for(&short_only).starts_with("-h: show command help\n"));

        let none = ParserConfig::default().with_help_aliases(Vec::<String>::new());
        assert_eq!(flagset.help_for(&none), "--title: page title\n");
    }

    #[test]
    fn test_validator_combines_with_type_check() {
        let flag = Flag::required("port", "", IntegerFlag)
            .with_validator(|v| v.as_integer().is_some_and(|p| (1..=65535).contains(&p)));
        assert!(flag.validate(&FlagValue::Integer(8080)));
        assert!(!flag.validate(&FlagValue::Integer(0)));
    }

    #[test]
    fn test_flagset_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Flagset>();
    }
}
