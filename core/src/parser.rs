//! The flagset parser.
//!
//! Turns one raw argument array into a [`CliArgs`] for one [`Flagset`] in a
//! single left-to-right pass:
//!
//! 1. a help alias (`--help`, `-h`) stops the parse with
//!    [`ErrorKind::HelpRequested`](crate::ErrorKind::HelpRequested);
//! 2. a bare `--` sends every remaining token to `dashdash`;
//! 3. `--name` hands the following tokens to that flag's [`FlagType`];
//! 4. anything else is a positional argument.
//!
//! Absent flags then get their type default or flag default, required flags
//! without either fail, and every resolved value is validated. Either the
//! whole call succeeds or it returns a [`ParsingError`]; nothing is
//! partially committed.
//!
//! [`FlagType`]: crate::FlagType

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ParsingError;
use crate::flagset::Flagset;
use crate::types::{CliArgs, FlagValues};

/// Marker separating parsed args from passthrough args.
pub const DASHDASH: &str = "--";

/// What to do with a `--` that is the last token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDashdash {
    /// Fail with a disallowed-passthrough error.
    #[default]
    Reject,
    /// Succeed with an empty `dashdash`.
    Accept,
}

/// Parser settings.
///
/// # Examples
///
/// ```
/// use flagset_core::{EmptyDashdash, ParserConfig};
///
/// let config: ParserConfig = serde_json::from_str(r#"{ "empty_dashdash": "accept" }"#).unwrap();
/// assert!(config.allow_dashdash);
/// assert_eq!(config.empty_dashdash, EmptyDashdash::Accept);
/// assert_eq!(config.help_aliases, vec!["--help", "-h"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Whether a bare `--` starts passthrough args. When `false`, a `--`
    /// token is an error.
    pub allow_dashdash: bool,
    /// Handling of a trailing `--` with nothing after it.
    pub empty_dashdash: EmptyDashdash,
    /// Tokens that request help.
    pub help_aliases: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            allow_dashdash: true,
            empty_dashdash: EmptyDashdash::Reject,
            help_aliases: vec!["--help".to_string(), "-h".to_string()],
        }
    }
}

impl ParserConfig {
    /// Rejects every `--` token.
    pub fn without_dashdash(mut self) -> Self {
        self.allow_dashdash = false;
        self
    }

    /// Treats a trailing `--` as empty passthrough.
    pub fn accept_empty_dashdash(mut self) -> Self {
        self.empty_dashdash = EmptyDashdash::Accept;
        self
    }

    /// Replaces the tokens that request help.
    pub fn with_help_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.help_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_help(&self, token: &str) -> bool {
        self.help_aliases.iter().any(|alias| alias == token)
    }

    /// The alias shown in help text: the first `--` alias, else the first.
    pub fn help_flag(&self) -> Option<&str> {
        self.help_aliases
            .iter()
            .find(|alias| alias.starts_with("--"))
            .or_else(|| self.help_aliases.first())
            .map(String::as_str)
    }
}

/// Parses argument arrays against one flagset.
///
/// Holds no per-parse state, so one parser may be used from many threads.
///
/// # Examples
///
/// ```
/// use flagset_core::*;
///
/// let flagset = Flagset::new().with_flag(Flag::required("count", "", NumberFlag));
/// let parser = flagset.parser(ParserConfig::default());
///
/// let parsed = parser.parse(&["a", "--count", "25or6to4", "b", "--", "c"]).unwrap();
/// assert_eq!(parsed.args, vec!["a", "b"]);
/// assert_eq!(parsed.dashdash, vec!["c"]);
/// assert_eq!(parsed.flags.get::<f64>("count"), Some(25.0));
/// ```
#[derive(Debug, Clone)]
pub struct FlagsetParser<'a> {
    flagset: &'a Flagset,
    config: ParserConfig,
}

/// Accumulator threaded through one scan.
#[derive(Default)]
struct Scan {
    args: Vec<String>,
    dashdash: Vec<String>,
    flags: FlagValues,
}

impl<'a> FlagsetParser<'a> {
    pub fn new(flagset: &'a Flagset, config: ParserConfig) -> Self {
        Self { flagset, config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `raw` into positional args, passthrough args and flags.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] for help requests, unrecognized flags,
    /// flags without a valid value, missing required flags, values rejected
    /// by validation, and disallowed or empty `--`.
    pub fn parse<S: AsRef<str>>(&self, raw: &[S]) -> Result<CliArgs, ParsingError> {
        let tokens: Vec<String> = raw.iter().map(|s| s.as_ref().to_string()).collect();
        let mut scan = Scan::default();

        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_str();
            if self.config.is_help(token) {
                return Err(ParsingError::help_requested());
            }
            if token == DASHDASH {
                scan.dashdash = self.take_dashdash(&tokens[i + 1..])?;
                break;
            }
            if let Some(name) = token.strip_prefix(DASHDASH) {
                i = self.take_flag(name, token, i + 1, &tokens, &mut scan.flags)?;
                continue;
            }
            scan.args.push(token.to_string());
            i += 1;
        }

        let flags = self.resolve(scan.flags)?;
        debug!(
            args = scan.args.len(),
            dashdash = scan.dashdash.len(),
            flags = flags.len(),
            "Parsed flagset arguments"
        );
        Ok(CliArgs {
            args: scan.args,
            dashdash: scan.dashdash,
            flags,
        })
    }

    fn take_dashdash(&self, rest: &[String]) -> Result<Vec<String>, ParsingError> {
        if !self.config.allow_dashdash {
            return Err(ParsingError::disallowed_dashdash());
        }
        if rest.is_empty() && self.config.empty_dashdash == EmptyDashdash::Reject {
            return Err(ParsingError::empty_dashdash());
        }
        Ok(rest.to_vec())
    }

    /// Reads the value of `--name` starting at `start`; returns the position
    /// after the consumed tokens.
    fn take_flag(
        &self,
        name: &str,
        token: &str,
        start: usize,
        tokens: &[String],
        flags: &mut FlagValues,
    ) -> Result<usize, ParsingError> {
        let flag = self
            .flagset
            .find(name)
            .ok_or_else(|| ParsingError::unrecognized_flag(token))?;

        let result = flag.flag_type().parse(start, tokens);
        match result.value {
            Some(value) => {
                trace!(flag = name, consumed = result.consumed, value = %value, "Parsed flag");
                flags.insert(name, value);
                Ok(start + result.consumed)
            }
            None => Err(ParsingError::invalid_flag_argument(
                name,
                tokens.get(start..).unwrap_or_default(),
            )),
        }
    }

    /// Applies defaults, enforces required flags and validates values.
    fn resolve(&self, mut flags: FlagValues) -> Result<FlagValues, ParsingError> {
        for flag in self.flagset.iter() {
            if !flags.contains(flag.name()) {
                match flag.effective_default() {
                    Some(default) => flags.insert(flag.name(), default),
                    None if flag.is_required() => {
                        return Err(ParsingError::missing_required_flag(flag.name()));
                    }
                    None => continue,
                }
            }
            if let Some(value) = flags.value(flag.name()) {
                if !flag.validate(value) {
                    return Err(ParsingError::invalid_value(flag.name(), value));
                }
            }
        }
        Ok(flags)
    }
}
