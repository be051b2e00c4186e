//! Error taxonomy for parsing, flag definitions and flag access.
//!
//! [`ParsingError`] is the only error the flagset parser and the command
//! router produce. Each [`ErrorKind`] maps to a stable process exit code in
//! [`exit_code`], so scripts built on a CLI can branch on the status.

use thiserror::Error;

use crate::types::ValueKind;

/// Stable exit codes returned by commands and the router.
pub mod exit_code {
    /// Success, or help was displayed on request.
    pub const SUCCESS: i32 = 0;
    /// Anything not classified below, including handler failures.
    pub const UNKNOWN: i32 = 1;
    pub const UNRECOGNIZED_SUBCOMMAND: i32 = 2;
    pub const MISSING_SUBCOMMAND: i32 = 3;
    pub const UNRECOGNIZED_FLAG: i32 = 4;
    pub const MISSING_REQUIRED_FLAG: i32 = 5;
    pub const INVALID_FLAG_ARGUMENT: i32 = 6;
    pub const INVALID_VALUE: i32 = 7;
    pub const DISALLOWED_DASHDASH: i32 = 8;
}

/// Classification of a [`ParsingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `--help` was given. Not a failure: the command prints help and exits 0.
    HelpRequested,
    /// A `--name` token matched no flag in the flagset.
    UnrecognizedFlag,
    /// A known flag could not parse a value from the following tokens.
    InvalidFlagArgument,
    /// A required flag was never given and has no default.
    MissingRequiredFlag,
    /// A value was parsed but rejected by a validator.
    InvalidValue,
    /// A token at a multi-command matched no subcommand.
    UnrecognizedSubcommand,
    /// Arguments ran out before a leaf command was reached.
    MissingSubcommand,
    /// A bare `--` where passthrough args are not allowed, or with nothing after it.
    DisallowedDashdash,
    Unknown,
}

impl ErrorKind {
    /// Returns the exit code for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagset_core::{ErrorKind, exit_code};
    ///
    /// assert_eq!(ErrorKind::HelpRequested.exit_code(), exit_code::SUCCESS);
    /// assert_eq!(ErrorKind::UnrecognizedFlag.exit_code(), 4);
    /// ```
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::HelpRequested => exit_code::SUCCESS,
            ErrorKind::UnrecognizedFlag => exit_code::UNRECOGNIZED_FLAG,
            ErrorKind::InvalidFlagArgument => exit_code::INVALID_FLAG_ARGUMENT,
            ErrorKind::MissingRequiredFlag => exit_code::MISSING_REQUIRED_FLAG,
            ErrorKind::InvalidValue => exit_code::INVALID_VALUE,
            ErrorKind::UnrecognizedSubcommand => exit_code::UNRECOGNIZED_SUBCOMMAND,
            ErrorKind::MissingSubcommand => exit_code::MISSING_SUBCOMMAND,
            ErrorKind::DisallowedDashdash => exit_code::DISALLOWED_DASHDASH,
            ErrorKind::Unknown => exit_code::UNKNOWN,
        }
    }
}

/// A user-facing parse failure.
///
/// Created at the point of failure and never modified afterwards. Carries
/// enough context to render help without re-parsing.
///
/// # Examples
///
/// ```
/// use flagset_core::{ErrorKind, ParsingError};
///
/// let err = ParsingError::missing_required_flag("title");
/// assert_eq!(err.kind(), ErrorKind::MissingRequiredFlag);
/// assert_eq!(err.param_name(), Some("title"));
/// assert_eq!(err.help(), "Parsing error: missing required flag\nFlag: title\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParsingError {
    kind: ErrorKind,
    message: String,
    advice: Option<String>,
    param_name: Option<String>,
}

impl ParsingError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            advice: None,
            param_name: None,
        }
    }

    /// Adds a hint on how to fix the invocation.
    pub fn with_advice(mut self, advice: impl Into<String>) -> Self {
        self.advice = Some(advice.into());
        self
    }

    /// Names the flag, token or command path the error is about.
    pub fn with_param(mut self, param_name: impl Into<String>) -> Self {
        self.param_name = Some(param_name.into());
        self
    }

    pub fn help_requested() -> Self {
        Self::new(ErrorKind::HelpRequested, "help requested")
    }

    pub fn unrecognized_flag(token: &str) -> Self {
        Self::new(ErrorKind::UnrecognizedFlag, "unrecognized flag").with_param(token)
    }

    /// `tail` holds the tokens the flag's type tried to read its value from.
    pub fn invalid_flag_argument(flag: &str, tail: &[impl AsRef<str>]) -> Self {
        let tail: Vec<&str> = tail.iter().map(AsRef::as_ref).collect();
        Self::new(ErrorKind::InvalidFlagArgument, "missing arg")
            .with_advice(format!(
                "the arguments '{}' didn't provide a valid value for the flag",
                tail.join(" ")
            ))
            .with_param(flag)
    }

    pub fn missing_required_flag(flag: &str) -> Self {
        Self::new(ErrorKind::MissingRequiredFlag, "missing required flag").with_param(flag)
    }

    pub fn invalid_value(flag: &str, value: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::InvalidValue, "invalid value")
            .with_advice(format!("the value '{value}' isn't valid for this flag"))
            .with_param(flag)
    }

    pub fn disallowed_dashdash() -> Self {
        Self::new(ErrorKind::DisallowedDashdash, "\"--\" not allowed")
            .with_advice("this command doesn't allow passthrough args after a '--'")
            .with_param("--")
    }

    pub fn empty_dashdash() -> Self {
        Self::new(ErrorKind::DisallowedDashdash, "no args found after '--'")
            .with_advice("'--' passes the following args through; omit it when there are none")
            .with_param("--")
    }

    pub fn unrecognized_subcommand(token: &str) -> Self {
        Self::new(
            ErrorKind::UnrecognizedSubcommand,
            format!("unrecognized subcommand: '{token}'"),
        )
        .with_param(token)
    }

    /// `path` is the space-joined command path reached so far.
    pub fn missing_subcommand(path: &str) -> Self {
        Self::new(ErrorKind::MissingSubcommand, "missing subcommand")
            .with_advice("provide one of the subcommands listed above")
            .with_param(path)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn advice(&self) -> Option<&str> {
        self.advice.as_deref()
    }

    pub fn param_name(&self) -> Option<&str> {
        self.param_name.as_deref()
    }

    /// Exit code for this error.
    pub fn code(&self) -> i32 {
        self.kind.exit_code()
    }

    pub fn is_help_request(&self) -> bool {
        self.kind == ErrorKind::HelpRequested
    }

    /// What the parameter line names: a flag, the offending subcommand
    /// token, or the command path for a missing subcommand.
    fn param_label(&self) -> &'static str {
        match self.kind {
            ErrorKind::UnrecognizedSubcommand => "Subcommand",
            ErrorKind::MissingSubcommand => "Command",
            _ => "Flag",
        }
    }

    /// Renders the error for the user.
    pub fn help(&self) -> String {
        let mut lines = vec![format!("Parsing error: {}", self.message)];
        if let Some(param) = &self.param_name {
            lines.push(format!("{}: {param}", self.param_label()));
        }
        if let Some(advice) = &self.advice {
            lines.push(format!("Possible solution:\n\n{advice}"));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Construction-time problems with flags, flagsets and command trees.
///
/// These are programming errors in a CLI's declaration, not user errors;
/// they are reported by the `with_default` builder and the audit functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The flag's type has its own default, so a flag default is not allowed.
    #[error("flag {flag} should not have a default because its type has a mandatory default of {type_default}")]
    ConflictingDefault { flag: String, type_default: String },
    /// The default value's kind differs from the flag type's kind.
    #[error("flag {flag} has a {found} default but its type parses {expected} values")]
    DefaultKindMismatch {
        flag: String,
        expected: ValueKind,
        found: ValueKind,
    },
    /// The flag's type rejects the default value.
    #[error("flag {flag} has an illegal default: {value}")]
    IllegalDefault { flag: String, value: String },
    #[error("flag name cannot be empty")]
    EmptyFlagName,
    /// Flag names are given without the leading `--`.
    #[error("invalid flag name: {0}")]
    InvalidFlagName(String),
    /// `help` is handled by the parser itself.
    #[error("flag name is reserved: {0}")]
    ReservedFlagName(String),
    #[error("duplicate flag in flagset: {0}")]
    DuplicateFlag(String),
    #[error("command name cannot be empty at path: {0}")]
    EmptyCommandName(String),
    #[error("invalid subcommand name at path: {0}")]
    InvalidSubcommandName(String),
    #[error("duplicate subcommand in scope: {0}")]
    DuplicateSubcommand(String),
    /// A flagset problem inside a leaf command.
    #[error("in command {path}: {source}")]
    InCommand {
        path: String,
        #[source]
        source: Box<DefinitionError>,
    },
}

/// A command's flags shape does not match the values its flagset produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagAccessError {
    #[error("flag not present: {0}")]
    MissingKey(String),
    #[error("flag {name} holds a {found} value, expected {expected}")]
    WrongKind {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
}
