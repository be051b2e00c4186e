//! Flag types, flagsets and the flagset parser.
//!
//! This crate is the parsing half of a small command-line framework:
//!
//! - [`FlagType`]: atomic parsers for one scalar type ([`BooleanFlag`],
//!   [`NegatedFlag`], [`StringFlag`], [`NumberFlag`], [`IntegerFlag`],
//!   [`EnumFlag`], [`DateFlag`]).
//! - [`Flag`] and [`Flagset`]: the declaration of the `--name` flags one
//!   command accepts, with required/optional presence and defaults.
//! - [`FlagsetParser`]: turns a raw argument array into [`CliArgs`]
//!   (positional args, passthrough args after `--`, resolved flags).
//! - [`ParsingError`]: structured failures with stable exit codes.
//!
//! Validation ([`validate_flagset`]) catches declaration mistakes such as
//! duplicate or reserved flag names.
//!
//! # Example
//!
//! ```
//! use flagset_core::*;
//!
//! let flagset = Flagset::new()
//!     .with_flag(Flag::required("verbose", "print more", BooleanFlag))
//!     .with_flag(Flag::required("title", "page title", StringFlag));
//! assert!(validate_flagset(&flagset).is_empty());
//!
//! let parsed = flagset.parse(&["--title", "Go For Words", "notes.txt"]).unwrap();
//! assert_eq!(parsed.args, vec!["notes.txt"]);
//! assert_eq!(parsed.flags.get::<bool>("verbose"), Some(false));
//! assert_eq!(parsed.flags.get::<String>("title").as_deref(), Some("Go For Words"));
//!
//! let err = flagset.parse(&["notes.txt"]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MissingRequiredFlag);
//! assert_eq!(err.code(), exit_code::MISSING_REQUIRED_FLAG);
//! ```

mod error;
mod flag_type;
mod flagset;
mod parser;
mod types;
mod validate;

pub use error::{DefinitionError, ErrorKind, FlagAccessError, ParsingError, exit_code};
pub use flag_type::{
    BooleanFlag, DateFlag, EnumFlag, FlagType, IntegerFlag, NegatedFlag, NumberFlag, StringFlag,
};
pub use flagset::{Flag, Flagset, HELP_DESCRIPTION, Presence, Validator};
pub use parser::{DASHDASH, EmptyDashdash, FlagsetParser, ParserConfig};
pub use types::*;
pub use validate::{RESERVED_HELP, validate_flagset};
