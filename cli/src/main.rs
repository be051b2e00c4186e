use std::ffi::OsString;

use chrono::{Local, NaiveDate};
use flagset_command::{LeafCommand, MultiCommand, Node, Output, StdOutput, run, validate_tree};
use flagset_core::{
    BooleanFlag, CliArgs, DateFlag, DefinitionError, EnumFlag, Flag, FlagAccessError, FlagValue,
    FlagValues, Flagset, FromFlags, IntegerFlag, NegatedFlag, ParserConfig, StringFlag, exit_code,
};
use tracing::{debug, error};

const GREETINGS: [&str; 3] = ["hello", "hi", "howdy"];
const MAX_PRECISION: i64 = 12;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let root = match build_tree() {
        Ok(root) => root,
        Err(err) => {
            error!(error = %err, "Invalid command definition");
            std::process::exit(exit_code::UNKNOWN);
        }
    };

    let problems = validate_tree(&root);
    if !problems.is_empty() {
        for problem in &problems {
            error!(error = %problem, "Invalid command tree");
        }
        std::process::exit(exit_code::UNKNOWN);
    }

    let args = match utf8_args(std::env::args_os().skip(1)) {
        Ok(args) => args,
        Err(bad) => {
            eprintln!("error: argument is not valid UTF-8: {}", bad.to_string_lossy());
            std::process::exit(exit_code::UNKNOWN);
        }
    };
    debug!(args = args.len(), "Routing command line");
    let code = run(&root, &args, &mut StdOutput);
    std::process::exit(code);
}

/// Converts raw arguments, returning the first one that is not UTF-8.
fn utf8_args(raw: impl Iterator<Item = OsString>) -> Result<Vec<String>, OsString> {
    raw.map(OsString::into_string).collect()
}

fn build_tree() -> Result<Node, DefinitionError> {
    let math = MultiCommand::new("math", "arithmetic on positional numbers")
        .with_subcommand(math_command("add", "sum the numbers", |a, b| a + b, 0.0))
        .with_subcommand(math_command("mul", "multiply the numbers", |a, b| a * b, 1.0));

    Ok(MultiCommand::new("flagset-demo", "demo commands for the flagset parser")
        .with_subcommand(echo_command())
        .with_subcommand(greet_command()?)
        .with_subcommand(days_command())
        .with_subcommand(math)
        .into())
}

fn echo_command() -> LeafCommand<FlagValues> {
    let flagset = Flagset::new()
        .with_flag(Flag::required("json", "print the parsed arguments as JSON", BooleanFlag))
        .with_flag(Flag::required("upper", "uppercase the output", BooleanFlag))
        .with_flag(Flag::optional("prefix", "text printed before the args", StringFlag));

    LeafCommand::new(
        "echo",
        "print positional arguments",
        flagset,
        |parsed: CliArgs<FlagValues>, out: &mut dyn Output| {
            if parsed.flags.require::<bool>("json")? {
                let json = serde_json::to_string_pretty(&parsed)?;
                out.write_out(&format!("{json}\n"))?;
                return Ok(exit_code::SUCCESS);
            }

            let mut words: Vec<String> = parsed.flags.get::<String>("prefix").into_iter().collect();
            words.extend(parsed.args.iter().cloned());
            words.extend(parsed.dashdash.iter().cloned());
            let mut line = words.join(" ");
            if parsed.flags.require::<bool>("upper")? {
                line = line.to_uppercase();
            }
            out.write_out(&format!("{line}\n"))?;
            Ok(exit_code::SUCCESS)
        },
    )
    .with_config(ParserConfig::default().accept_empty_dashdash())
}

struct GreetFlags {
    name: String,
    greeting: String,
    shout: bool,
    newline: bool,
}

impl FromFlags for GreetFlags {
    fn from_flags(flags: &FlagValues) -> Result<Self, FlagAccessError> {
        Ok(Self {
            name: flags.require("name")?,
            greeting: flags.require("greeting")?,
            shout: flags.require("shout")?,
            newline: flags.require("no-newline")?,
        })
    }
}

fn greet_command() -> Result<LeafCommand<GreetFlags>, DefinitionError> {
    let flagset = Flagset::new()
        .with_flag(Flag::required("name", "who to greet", StringFlag))
        .with_flag(
            Flag::required("greeting", "one of hello, hi, howdy", EnumFlag::new(GREETINGS))
                .with_default(FlagValue::from("hello"))?,
        )
        .with_flag(Flag::required("shout", "uppercase the greeting", BooleanFlag))
        .with_flag(Flag::required("no-newline", "omit the trailing newline", NegatedFlag));

    Ok(LeafCommand::new(
        "greet",
        "greet someone by name",
        flagset,
        |parsed: CliArgs<GreetFlags>, out: &mut dyn Output| {
            let flags = parsed.flags;
            let mut text = format!("{}, {}!", flags.greeting, flags.name);
            if flags.shout {
                text = text.to_uppercase();
            }
            if flags.newline {
                text.push('\n');
            }
            out.write_out(&text)?;
            Ok(exit_code::SUCCESS)
        },
    ))
}

struct DaysFlags {
    from: NaiveDate,
    to: Option<NaiveDate>,
}

impl FromFlags for DaysFlags {
    fn from_flags(flags: &FlagValues) -> Result<Self, FlagAccessError> {
        Ok(Self {
            from: flags.require("from")?,
            to: flags.get("to"),
        })
    }
}

fn days_command() -> LeafCommand<DaysFlags> {
    let flagset = Flagset::new()
        .with_flag(Flag::required("from", "start date (YYYY-MM-DD)", DateFlag))
        .with_flag(Flag::optional("to", "end date, today when omitted", DateFlag));

    LeafCommand::new(
        "days",
        "count the days between two dates",
        flagset,
        |parsed: CliArgs<DaysFlags>, out: &mut dyn Output| {
            let to = parsed.flags.to.unwrap_or_else(|| Local::now().date_naive());
            let days = (to - parsed.flags.from).num_days();
            out.write_out(&format!("{days}\n"))?;
            Ok(exit_code::SUCCESS)
        },
    )
}

fn math_command(
    name: &str,
    description: &str,
    op: fn(f64, f64) -> f64,
    identity: f64,
) -> LeafCommand<FlagValues> {
    let flagset = Flagset::new().with_flag(
        Flag::optional("precision", "digits after the decimal point", IntegerFlag)
            .with_validator(|value| {
                value
                    .as_integer()
                    .is_some_and(|digits| (0..=MAX_PRECISION).contains(&digits))
            }),
    );

    LeafCommand::new(
        name,
        description,
        flagset,
        move |parsed: CliArgs<FlagValues>, out: &mut dyn Output| {
            let mut total = identity;
            for arg in &parsed.args {
                let value: f64 = arg
                    .parse()
                    .map_err(|_| format!("not a number: '{arg}'"))?;
                total = op(total, value);
            }

            let text = match parsed.flags.get::<i64>("precision") {
                Some(digits) => {
                    let precision = usize::try_from(digits)?;
                    format!("{total:.precision$}")
                }
                None => total.to_string(),
            };
            out.write_out(&format!("{text}\n"))?;
            Ok(exit_code::SUCCESS)
        },
    )
}
