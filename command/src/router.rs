//! Routing raw arguments through a command tree to one leaf.
//!
//! [`resolve`] walks multi-commands one bare token at a time. It never looks
//! at flags: a flag-like token where a subcommand name is expected is an
//! unrecognized subcommand. [`run`] resolves and then executes the leaf, or
//! prints the help and error of the last multi-command reached.

use std::fmt;

use flagset_core::{ParsingError, exit_code};
use tracing::debug;

use crate::command::Leaf;
use crate::multi::Node;
use crate::output::{Output, emit_err, emit_out};

/// Tokens that ask a multi-command for its help.
pub const HELP_TOKENS: [&str; 3] = ["-h", "--help", "help"];

pub fn is_help_token(token: &str) -> bool {
    HELP_TOKENS.contains(&token)
}

/// Where traversal ended.
///
/// `path` always starts with the root command's name.
pub enum Route<'a> {
    /// Reached a leaf; `rest` is what remains for its flagset parser.
    Leaf {
        leaf: &'a dyn Leaf,
        path: Vec<String>,
        rest: Vec<String>,
    },
    /// A help token at a multi-command.
    Help { path: Vec<String>, help: String },
    /// A token matched no subcommand.
    UnrecognizedSubcommand {
        token: String,
        path: Vec<String>,
        help: String,
    },
    /// Arguments ran out at a multi-command.
    MissingSubcommand { path: Vec<String>, help: String },
}

impl Route<'_> {
    pub fn path(&self) -> &[String] {
        match self {
            Route::Leaf { path, .. }
            | Route::Help { path, .. }
            | Route::UnrecognizedSubcommand { path, .. }
            | Route::MissingSubcommand { path, .. } => path,
        }
    }

    /// The error for terminal failure routes.
    pub fn error(&self) -> Option<ParsingError> {
        match self {
            Route::UnrecognizedSubcommand { token, .. } => {
                Some(ParsingError::unrecognized_subcommand(token))
            }
            Route::MissingSubcommand { path, .. } => {
                Some(ParsingError::missing_subcommand(&path.join(" ")))
            }
            Route::Leaf { .. } | Route::Help { .. } => None,
        }
    }
}

impl fmt::Debug for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Leaf { leaf, path, rest } => f
                .debug_struct("Leaf")
                .field("leaf", &leaf.name())
                .field("path", path)
                .field("rest", rest)
                .finish(),
            Route::Help { path, .. } => f.debug_struct("Help").field("path", path).finish(),
            Route::UnrecognizedSubcommand { token, path, .. } => f
                .debug_struct("UnrecognizedSubcommand")
                .field("token", token)
                .field("path", path)
                .finish(),
            Route::MissingSubcommand { path, .. } => f
                .debug_struct("MissingSubcommand")
                .field("path", path)
                .finish(),
        }
    }
}

/// Walks `root` with `args` until a leaf or a terminal state is reached.
///
/// # Examples
///
/// ```
/// use flagset_command::{LeafCommand, MultiCommand, Node, Route, resolve};
/// use flagset_core::{CliArgs, Flagset};
///
/// let build = LeafCommand::new("build", "compile", Flagset::new(), |_: CliArgs<()>, _| Ok(0));
/// let root = Node::from(MultiCommand::new("tool", "helper").with_subcommand(build));
///
/// match resolve(&root, &["build", "--help"]) {
///     Route::Leaf { leaf, path, rest } => {
///         assert_eq!(leaf.name(), "build");
///         assert_eq!(path, vec!["tool", "build"]);
///         assert_eq!(rest, vec!["--help"]);
///     }
///     other => panic!("unexpected route {other:?}"),
/// }
/// ```
pub fn resolve<'a, S: AsRef<str>>(root: &'a Node, args: &[S]) -> Route<'a> {
    let mut node = root;
    let mut path = vec![root.name().to_string()];
    let mut i = 0;

    loop {
        let multi = match node {
            Node::Leaf(leaf) => {
                let rest: Vec<String> = args[i..].iter().map(|s| s.as_ref().to_string()).collect();
                debug!(command = %path.join(" "), rest = rest.len(), "Resolved leaf command");
                return Route::Leaf {
                    leaf: leaf.as_ref(),
                    path,
                    rest,
                };
            }
            Node::Multi(multi) => multi,
        };

        let Some(token) = args.get(i).map(AsRef::as_ref) else {
            debug!(command = %path.join(" "), "Ran out of arguments before a leaf command");
            let help = multi.help(&path);
            return Route::MissingSubcommand { path, help };
        };

        if is_help_token(token) {
            let help = multi.help(&path);
            return Route::Help { path, help };
        }

        match multi.find(token) {
            Some(child) => {
                debug!(command = %path.join(" "), subcommand = token, "Descending into subcommand");
                path.push(token.to_string());
                node = child;
                i += 1;
            }
            None => {
                debug!(command = %path.join(" "), token, "Unrecognized subcommand");
                let help = multi.help(&path);
                return Route::UnrecognizedSubcommand {
                    token: token.to_string(),
                    path,
                    help,
                };
            }
        }
    }
}

/// Resolves `args` against `root` and runs the result.
///
/// Returns the leaf's exit code, [`exit_code::SUCCESS`] after printing help,
/// or the code of the routing failure after printing help and the error to
/// the error stream.
pub fn run<S: AsRef<str>>(root: &Node, args: &[S], out: &mut dyn Output) -> i32 {
    let route = resolve(root, args);
    let failure = route.error();
    match route {
        Route::Leaf { leaf, path, rest } => leaf.run(&rest, &path, out),
        Route::Help { help, .. } => {
            emit_out(out, &help);
            exit_code::SUCCESS
        }
        Route::UnrecognizedSubcommand { help, .. } | Route::MissingSubcommand { help, .. } => {
            let Some(err) = failure else {
                return exit_code::UNKNOWN;
            };
            emit_err(out, &format!("{help}\n{}", err.help()));
            err.code()
        }
    }
}
