//! Table-driven flagset parser cases.
//!
//! Each base case is expanded with extra positionals, unrecognized flags and
//! passthrough args around it, so every flagset is exercised with flags and
//! positionals interleaved.

use flagset_core::*;

#[derive(Debug, Clone)]
struct Case {
    raw: Vec<String>,
    expected: Option<CliArgs>,
}

fn strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn ok(raw: &[&str], flags: &[(&str, FlagValue)]) -> Case {
    Case {
        raw: strings(raw),
        expected: Some(CliArgs {
            args: vec![],
            dashdash: vec![],
            flags: flags.iter().cloned().collect(),
        }),
    }
}

fn fails(raw: &[&str]) -> Case {
    Case {
        raw: strings(raw),
        expected: None,
    }
}

fn concat(parts: &[&[String]]) -> Vec<String> {
    parts.iter().flat_map(|p| p.iter().cloned()).collect()
}

/// Wraps a successful case in the variations every flagset must handle.
fn fuzzed(case: Case) -> Vec<Case> {
    let Some(parsed) = case.expected.clone() else {
        return vec![case];
    };
    let raw = case.raw.clone();
    let early = strings(&["early"]);
    let late = strings(&["late"]);
    let unknown = strings(&["--some-unrecognized-flag"]);
    let passthrough = strings(&["--", "a", "b", "c"]);
    let with = |raw: Vec<String>, args: Vec<String>, dashdash: Vec<String>| Case {
        raw,
        expected: Some(CliArgs {
            args,
            dashdash,
            flags: parsed.flags.clone(),
        }),
    };

    vec![
        case.clone(),
        with(concat(&[&early, &raw]), concat(&[&early, &parsed.args]), vec![]),
        with(concat(&[&raw, &late]), concat(&[&parsed.args, &late]), vec![]),
        with(
            concat(&[&early, &raw, &late]),
            concat(&[&early, &parsed.args, &late]),
            vec![],
        ),
        Case {
            raw: concat(&[&unknown, &raw]),
            expected: None,
        },
        Case {
            raw: concat(&[&raw, &unknown]),
            expected: None,
        },
        with(
            concat(&[&raw, &passthrough]),
            parsed.args.clone(),
            strings(&["a", "b", "c"]),
        ),
        with(
            concat(&[&early, &early, &raw, &late, &strings(&["later", "z"]), &passthrough]),
            concat(&[&early, &early, &parsed.args, &late, &strings(&["later", "z"])]),
            strings(&["a", "b", "c"]),
        ),
        Case {
            raw: concat(&[&raw, &strings(&["--"])]),
            expected: None,
        },
    ]
}

fn check(flagset: &Flagset, cases: Vec<Case>) {
    for case in cases {
        let result = flagset.parse(&case.raw);
        match (&case.expected, result) {
            (Some(expected), Ok(parsed)) => {
                assert_eq!(&parsed, expected, "raw: {:?}", case.raw);
                assert_partition(flagset, &case.raw, &parsed);
            }
            (None, Err(err)) => assert!(!err.is_help_request(), "raw: {:?}", case.raw),
            (Some(_), Err(err)) => panic!("raw {:?} failed: {err:?}", case.raw),
            (None, Ok(parsed)) => panic!("raw {:?} should fail, got {parsed:?}", case.raw),
        }
    }
}

/// Every raw token is claimed exactly once: as a positional, as a flag name
/// or one of the tokens its type consumed, or as passthrough after `--`.
/// Positionals keep their order and passthrough args are the raw suffix.
fn assert_partition(flagset: &Flagset, raw: &[String], parsed: &CliArgs) {
    let mut positionals = Vec::new();
    let mut flag_tokens = 0;
    let mut i = 0;
    while i < raw.len() && raw[i] != "--" {
        match raw[i].strip_prefix("--").and_then(|name| flagset.find(name)) {
            Some(flag) => {
                let consumed = flag.flag_type().parse(i + 1, raw).consumed;
                flag_tokens += 1 + consumed;
                i += 1 + consumed;
            }
            None => {
                positionals.push(raw[i].clone());
                i += 1;
            }
        }
    }
    let passthrough = raw.len() - i;

    assert_eq!(parsed.args, positionals, "positionals of {raw:?}");
    if passthrough > 0 {
        assert_eq!(raw[i], "--");
        assert_eq!(&raw[i + 1..], parsed.dashdash.as_slice(), "passthrough of {raw:?}");
    } else {
        assert!(parsed.dashdash.is_empty(), "passthrough of {raw:?}");
    }
    assert_eq!(
        parsed.args.len() + flag_tokens + passthrough,
        raw.len(),
        "tokens of {raw:?} not conserved"
    );
}

#[test]
fn simple_positional_args() {
    let letters = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
    for n in 0..=letters.len() {
        let raw = &letters[..n];
        let parsed = Flagset::new().parse(raw).unwrap();
        assert_eq!(parsed.args, strings(raw));
        assert!(parsed.dashdash.is_empty());
    }
}

#[test]
fn dashdash_at_every_position() {
    let letters = strings(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
    for n in 0..=letters.len() {
        for insert_before in [0, 1, 2, 5, 9, 11] {
            let base = &letters[..n];
            if insert_before >= base.len() {
                let raw = concat(&[base, &strings(&["--"])]);
                let err = Flagset::new().parse(&raw).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::DisallowedDashdash);
                continue;
            }
            let raw = concat(&[&base[..insert_before], &strings(&["--"]), &base[insert_before..]]);
            let parsed = Flagset::new().parse(&raw).unwrap();
            assert_eq!(parsed.args, base[..insert_before].to_vec());
            assert_eq!(parsed.dashdash, base[insert_before..].to_vec());
        }
    }
}

#[test]
fn dashdash_can_always_be_prohibited() {
    let flagset = Flagset::new();
    let parser = flagset.parser(ParserConfig::default().without_dashdash());
    for raw in [vec!["--"], vec!["a", "--", "b"], vec!["--", "a"]] {
        let err = parser.parse(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisallowedDashdash, "raw: {raw:?}");
    }
}

#[test]
fn boolean_flags() {
    let flagset = Flagset::new().with_flag(Flag::required("verbose", "", BooleanFlag));
    let mut cases = fuzzed(ok(&["--verbose"], &[("verbose", FlagValue::Bool(true))]));
    cases.push(ok(&[], &[("verbose", FlagValue::Bool(false))]));
    cases.push(ok(
        &["--verbose", "--verbose", "--verbose"],
        &[("verbose", FlagValue::Bool(true))],
    ));
    check(&flagset, cases);
}

#[test]
fn negated_flags() {
    let flagset = Flagset::new().with_flag(Flag::required("wrap", "", NegatedFlag));
    let mut cases = fuzzed(ok(&["--wrap"], &[("wrap", FlagValue::Bool(false))]));
    cases.extend(fuzzed(ok(&[], &[("wrap", FlagValue::Bool(true))])));
    check(&flagset, cases);
}

#[test]
fn required_string_flags() {
    let flagset = Flagset::new().with_flag(Flag::required("title", "", StringFlag));
    let mut cases = Vec::new();
    cases.extend(fuzzed(ok(&["--title", "go-for-it"], &[("title", "go-for-it".into())])));
    cases.extend(fuzzed(ok(
        &["--title", "Go For Words"],
        &[("title", "Go For Words".into())],
    )));
    cases.push(ok(&["--title", "--"], &[("title", "--".into())]));
    cases.push(fails(&[]));
    cases.push(fails(&["--title"]));
    cases.push(fails(&["--title", ""]));
    cases.push(fails(&["--ttile", "arg"]));
    check(&flagset, cases);
}

#[test]
fn defaulting_string_flags() {
    let flagset = Flagset::new().with_flag(
        Flag::optional("title", "", StringFlag)
            .with_default("going to the movies".into())
            .unwrap(),
    );
    let mut cases = Vec::new();
    cases.extend(fuzzed(ok(&[], &[("title", "going to the movies".into())])));
    cases.extend(fuzzed(ok(&["--title", "go-for-it"], &[("title", "go-for-it".into())])));
    cases.push(ok(&["--title", "--"], &[("title", "--".into())]));
    cases.push(fails(&["--title"]));
    cases.push(fails(&["--ttile", "arg"]));
    check(&flagset, cases);
}

#[test]
fn optional_string_flags() {
    let flagset = Flagset::new().with_flag(Flag::optional("title", "", StringFlag));
    let mut cases = Vec::new();
    cases.extend(fuzzed(ok(&[], &[])));
    cases.extend(fuzzed(ok(&["--title", "go-for-it"], &[("title", "go-for-it".into())])));
    cases.push(ok(&["--title", "--"], &[("title", "--".into())]));
    cases.push(fails(&["--title"]));
    cases.push(fails(&["--ttile", "arg"]));
    check(&flagset, cases);
}

#[test]
fn required_numeric_flags() {
    let flagset = Flagset::new().with_flag(Flag::required("count", "", NumberFlag));
    let mut cases = Vec::new();
    for (token, value) in [("5.4", 5.4), ("-2000.345", -2000.345), ("-2", -2.0), ("12abcd", 12.0)] {
        cases.extend(fuzzed(ok(&["--count", token], &[("count", value.into())])));
    }
    cases.push(fails(&["--count"]));
    cases.push(fails(&["--cnt", "5"]));
    cases.push(fails(&["--count", "abf1"]));
    cases.push(fails(&["--count", "elephant"]));
    cases.push(fails(&["--count", "--"]));
    check(&flagset, cases);
}

#[test]
fn defaulting_numeric_flags() {
    let flagset = Flagset::new().with_flag(
        Flag::required("count", "", NumberFlag)
            .with_default(FlagValue::Number(-99.5))
            .unwrap(),
    );
    let mut cases = Vec::new();
    cases.extend(fuzzed(ok(&["--count", "31.55"], &[("count", 31.55.into())])));
    cases.extend(fuzzed(ok(&[], &[("count", (-99.5).into())])));
    cases.push(fails(&["--cnt", "5"]));
    cases.push(fails(&["--count"]));
    cases.push(fails(&["--count", "abf1"]));
    cases.push(fails(&["--count", "--"]));
    check(&flagset, cases);
}

#[test]
fn optional_numeric_flags() {
    let flagset = Flagset::new().with_flag(Flag::optional("count", "", NumberFlag));
    let mut cases = Vec::new();
    cases.extend(fuzzed(ok(&[], &[])));
    cases.extend(fuzzed(ok(&["--count", "5.4"], &[("count", 5.4.into())])));
    cases.extend(fuzzed(ok(&["--count", "12abcd"], &[("count", 12.0.into())])));
    cases.push(fails(&["--count"]));
    cases.push(fails(&["--count", "elephant"]));
    check(&flagset, cases);
}

#[test]
fn integer_enum_and_date_flags() {
    let flagset = Flagset::new()
        .with_flag(Flag::optional("jobs", "", IntegerFlag))
        .with_flag(
            Flag::required("format", "", EnumFlag::new(["text", "html", "markdown"]))
                .with_default("text".into())
                .unwrap(),
        )
        .with_flag(Flag::optional("since", "", DateFlag));
    let since = chrono::NaiveDate::from_ymd_opt(2020, 2, 2).unwrap();

    let mut cases = Vec::new();
    cases.extend(fuzzed(ok(
        &["--jobs", "1.5", "--format", "html", "--since", "2020-02-02"],
        &[
            ("jobs", FlagValue::Integer(1)),
            ("format", "html".into()),
            ("since", since.into()),
        ],
    )));
    cases.extend(fuzzed(ok(&[], &[("format", "text".into())])));
    cases.push(fails(&["--format", "pdf"]));
    cases.push(fails(&["--format", ""]));
    cases.push(fails(&["--since", "yesterday"]));
    cases.push(fails(&["--jobs", "many"]));
    check(&flagset, cases);
}

#[test]
fn parses_are_independent_across_threads() {
    let flagset = Flagset::new()
        .with_flag(Flag::required("verbose", "", BooleanFlag))
        .with_flag(Flag::optional("title", "", StringFlag));
    let parser = flagset.parser(ParserConfig::default());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let parser = &parser;
                scope.spawn(move || {
                    let title = format!("title-{n}");
                    let raw = if n % 2 == 0 {
                        vec!["--title".to_string(), title.clone(), "--verbose".to_string()]
                    } else {
                        vec!["--title".to_string(), title.clone()]
                    };
                    let parsed = parser.parse(&raw).unwrap();
                    assert_eq!(parsed.flags.get::<String>("title"), Some(title));
                    assert_eq!(parsed.flags.get::<bool>("verbose"), Some(n % 2 == 0));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    });
}
