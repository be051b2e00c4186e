//! Leaf commands: a flagset bound to a handler.

use std::error::Error;
use std::fmt;

use flagset_core::{CliArgs, Flagset, FromFlags, ParserConfig, exit_code};
use tracing::{debug, warn};

use crate::output::{Output, emit_err, emit_out};

/// What a handler returns: an exit code, or an error reported as
/// [`exit_code::UNKNOWN`].
pub type HandlerResult = Result<i32, Box<dyn Error + Send + Sync>>;

/// A command handler for flags shaped as `V`.
pub type Handler<V> = Box<dyn Fn(CliArgs<V>, &mut dyn Output) -> HandlerResult + Send + Sync>;

/// A runnable command without subcommands.
///
/// Object-safe so command trees can hold leaves with different flag shapes.
pub trait Leaf: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn flagset(&self) -> &Flagset;

    /// Parser settings used by [`Leaf::run`]; the help text names this
    /// configuration's help flag.
    fn config(&self) -> &ParserConfig;

    /// One-line summary.
    fn describe(&self) -> String {
        format!("{}: {}", self.name(), self.description())
    }

    /// Description plus flag help. `path` is the command path used to reach
    /// this leaf; when empty the leaf's own name is used.
    fn help(&self, path: &[String]) -> String {
        let title = if path.is_empty() {
            self.name().to_string()
        } else {
            path.join(" ")
        };
        format!(
            "{title}: {}\n\n{}",
            self.description(),
            self.flagset().help_for(self.config())
        )
    }

    /// Parses `args`, runs the handler and returns the exit code.
    fn run(&self, args: &[String], path: &[String], out: &mut dyn Output) -> i32;
}

/// A leaf command whose handler receives flags converted to `V`.
///
/// # Examples
///
/// ```
/// use flagset_command::{BufferOutput, Leaf, LeafCommand};
/// use flagset_core::{BooleanFlag, CliArgs, Flag, FlagValues, Flagset};
///
/// let flagset = Flagset::new().with_flag(Flag::required("loud", "shout it", BooleanFlag));
/// let hello = LeafCommand::new("hello", "say hello", flagset, |parsed: CliArgs<FlagValues>, out| {
///     let loud = parsed.flags.get::<bool>("loud") == Some(true);
///     out.write_out(if loud { "HELLO\n" } else { "hello\n" })?;
///     Ok(0)
/// });
///
/// let mut out = BufferOutput::default();
/// assert_eq!(hello.run(&["--loud".to_string()], &[], &mut out), 0);
/// assert_eq!(out.stdout, "HELLO\n");
/// ```
pub struct LeafCommand<V> {
    name: String,
    description: String,
    flagset: Flagset,
    config: ParserConfig,
    handler: Handler<V>,
}

impl<V: FromFlags> LeafCommand<V> {
    pub fn new(
        name: &str,
        description: &str,
        flagset: Flagset,
        handler: impl Fn(CliArgs<V>, &mut dyn Output) -> HandlerResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            flagset,
            config: ParserConfig::default(),
            handler: Box::new(handler),
        }
    }

    /// Replaces the parser configuration used by [`Leaf::run`].
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }
}

impl<V: FromFlags> Leaf for LeafCommand<V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn flagset(&self) -> &Flagset {
        &self.flagset
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn run(&self, args: &[String], path: &[String], out: &mut dyn Output) -> i32 {
        let parsed = match self.flagset.parser(self.config.clone()).parse(args) {
            Ok(parsed) => parsed,
            Err(err) if err.is_help_request() => {
                emit_out(out, &self.help(path));
                return exit_code::SUCCESS;
            }
            Err(err) => {
                debug!(
                    command = %self.name,
                    kind = ?err.kind(),
                    error = %err,
                    "Failed to parse arguments"
                );
                emit_err(out, &format!("{}\n{}", self.help(path), err.help()));
                return err.code();
            }
        };

        let typed = match parsed.into_typed::<V>() {
            Ok(typed) => typed,
            Err(err) => {
                warn!(
                    command = %self.name,
                    error = %err,
                    "Flags do not match the command's flag shape"
                );
                emit_err(out, &format!("{}\nerror: {err}\n", self.help(path)));
                return exit_code::UNKNOWN;
            }
        };

        match (self.handler)(typed, out) {
            Ok(code) => {
                debug!(command = %self.name, code, "Command finished");
                code
            }
            Err(err) => {
                warn!(command = %self.name, error = %err, "Command handler failed");
                emit_err(out, &format!("{}\nerror: {err}\n", self.help(path)));
                exit_code::UNKNOWN
            }
        }
    }
}

impl<V> fmt::Debug for LeafCommand<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("flagset", &self.flagset)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use flagset_core::{
        BooleanFlag, ErrorKind, Flag, FlagAccessError, FlagValues, NumberFlag, StringFlag,
    };

    use super::*;
    use crate::output::BufferOutput;

    struct CountFlags {
        count: f64,
        label: Option<String>,
    }

    impl FromFlags for CountFlags {
        fn from_flags(flags: &FlagValues) -> Result<Self, FlagAccessError> {
            Ok(Self {
                count: flags.require("count")?,
                label: flags.get("label"),
            })
        }
    }

    fn count_command() -> LeafCommand<CountFlags> {
        let flagset = Flagset::new()
            .with_flag(Flag::required("count", "how many", NumberFlag))
            .with_flag(Flag::optional("label", "what to call them", StringFlag));
        LeafCommand::new("count", "count things", flagset, |parsed: CliArgs<CountFlags>, out| {
            let label = parsed.flags.label.unwrap_or_else(|| "things".to_string());
            out.write_out(&format!("{} {label} {:?}\n", parsed.flags.count, parsed.args))?;
            Ok(0)
        })
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_passes_typed_flags_and_args() {
        let mut out = BufferOutput::default();
        let code = count_command().run(&args(&["--count", "3", "x"]), &[], &mut out);

        assert_eq!(code, 0);
        assert_eq!(out.stdout, "3 things [\"x\"]\n");
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn test_help_request_goes_to_stdout() {
        let mut out = BufferOutput::default();
        let code = count_command().run(&args(&["--help"]), &[], &mut out);

        assert_eq!(code, exit_code::SUCCESS);
        assert_eq!(
            out.stdout,
            "count: count things\n\n--help: show command help\n--count: how many\n--label: what to call them\n"
        );
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn test_parse_error_goes_to_stderr_with_code() {
        let mut out = BufferOutput::default();
        let code = count_command().run(&[], &[], &mut out);

        assert_eq!(code, ErrorKind::MissingRequiredFlag.exit_code());
        assert!(out.stdout.is_empty());
        assert!(out.stderr.starts_with("count: count things\n"));
        assert!(out.stderr.ends_with("Parsing error: missing required flag\nFlag: count\n"));
    }

    #[test]
    fn test_custom_help_alias_is_advertised_and_accepted() {
        let config = ParserConfig::default().with_help_aliases(["--usage"]);
        let command = count_command().with_config(config);

        let mut out = BufferOutput::default();
        let code = command.run(&args(&["--usage"]), &[], &mut out);
        assert_eq!(code, exit_code::SUCCESS);
        assert!(out.stdout.contains("\n--usage: show command help\n"));
        assert!(!out.stdout.contains("--help"));

        let mut out = BufferOutput::default();
        let code = command.run(&args(&["--help"]), &[], &mut out);
        assert_eq!(code, exit_code::UNRECOGNIZED_FLAG);
        assert!(out.stderr.starts_with("count: count things\n\n--usage: show command help\n"));
    }

    #[test]
    fn test_help_uses_command_path() {
        let path = args(&["tool", "stats", "count"]);
        assert!(count_command().help(&path).starts_with("tool stats count: count things\n"));
        assert_eq!(count_command().describe(), "count: count things");
    }

    #[test]
    fn test_handler_error_maps_to_unknown() {
        let failing = LeafCommand::new(
            "fail",
            "always fails",
            Flagset::new(),
            |_: CliArgs<()>, _out| Err("disk on fire".into()),
        );
        let mut out = BufferOutput::default();

        assert_eq!(failing.run(&[], &[], &mut out), exit_code::UNKNOWN);
        assert!(out.stderr.ends_with("error: disk on fire\n"));
    }

    #[test]
    fn test_shape_mismatch_maps_to_unknown() {
        // CountFlags expects a number but the flagset declares a boolean.
        let flagset = Flagset::new().with_flag(Flag::required("count", "", BooleanFlag));
        let mismatched =
            LeafCommand::new("count", "", flagset, |_: CliArgs<CountFlags>, _out| Ok(0));
        let mut out = BufferOutput::default();

        assert_eq!(mismatched.run(&[], &[], &mut out), exit_code::UNKNOWN);
        assert!(out.stderr.contains("flag count holds a boolean value, expected number"));
    }

    #[test]
    fn test_handler_exit_code_is_returned() {
        let status = LeafCommand::new("status", "", Flagset::new(), |_: CliArgs<()>, _out| Ok(42));
        assert_eq!(status.run(&[], &[], &mut BufferOutput::default()), 42);
    }
}
