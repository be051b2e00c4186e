//! Commands and command trees built on `flagset-core`.
//!
//! A [`LeafCommand`] binds a [`Flagset`](flagset_core::Flagset) to a handler.
//! A [`MultiCommand`] groups named subcommands, which may themselves be
//! multi-commands. [`run`] routes raw arguments through a tree to one leaf,
//! answering help requests and routing failures along the way.
//!
//! # Example
//!
//! ```
//! use flagset_command::*;
//! use flagset_core::{CliArgs, Flag, FlagValues, Flagset, StringFlag, exit_code};
//!
//! let greet = LeafCommand::new(
//!     "greet",
//!     "say hello",
//!     Flagset::new().with_flag(Flag::required("name", "who to greet", StringFlag)),
//!     |parsed: CliArgs<FlagValues>, out| {
//!         let name: String = parsed.flags.require("name")?;
//!         out.write_out(&format!("hello {name}\n"))?;
//!         Ok(exit_code::SUCCESS)
//!     },
//! );
//! let root: Node = MultiCommand::new("tool", "a demo").with_subcommand(greet).into();
//! assert!(validate_tree(&root).is_empty());
//!
//! let mut out = BufferOutput::default();
//! assert_eq!(run(&root, &["greet", "--name", "ada"], &mut out), 0);
//! assert_eq!(out.stdout, "hello ada\n");
//!
//! let mut out = BufferOutput::default();
//! assert_eq!(run(&root, &["wave"], &mut out), exit_code::UNRECOGNIZED_SUBCOMMAND);
//! ```

mod command;
mod multi;
mod output;
mod router;
mod validate;

pub use command::{Handler, HandlerResult, Leaf, LeafCommand};
pub use multi::{MultiCommand, Node};
pub use output::{BufferOutput, Output, StdOutput};
pub use router::{HELP_TOKENS, Route, is_help_token, resolve, run};
pub use validate::validate_tree;
