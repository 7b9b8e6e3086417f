use std::process::ExitCode;
use std::time::Instant;

use colored::Colorize;
use serde_json::json;
use strata_diff::{codec, Approximate, Diff, DiffStrategy, Differ, Equivalence};
use tracing::info;

use crate::cli::*;
use crate::config::CliConfig;
use crate::input::{read_diff, read_fixtures, read_value, write_output, Fixture};

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    }
    .with_overrides(cli.max_depth, cli.strategy.map(Into::into), cli.tolerance);

    let differ = Differ::new(config.diff.clone());
    match config.equivalence.float_tolerance {
        Some(tolerance) => dispatch(cli, &differ.with_equivalence(Approximate::new(tolerance))),
        None => dispatch(cli, &differ),
    }
}

fn dispatch<E: Equivalence + Clone>(cli: Cli, differ: &Differ<E>) -> anyhow::Result<ExitCode> {
    let format = cli.format;
    match cli.command {
        Command::Diff(args) => cmd_diff(args, differ, format),
        Command::Apply(args) => cmd_apply(args, differ, format),
        Command::Equiv(args) => cmd_equiv(args, differ, format),
        Command::Verify(args) => cmd_verify(args, differ, format),
        Command::Profile(args) => cmd_profile(args, differ, format),
    }
}

fn cmd_diff<E: Equivalence>(args: DiffArgs, differ: &Differ<E>, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let orig = read_value(&args.orig)?;
    let other = read_value(&args.other)?;
    let diff = differ.diff(&orig, &other)?;
    write_output(args.output.as_deref(), &codec::to_json_string_pretty(&diff)?)?;

    if let (Some(path), OutputFormat::Text) = (&args.output, format) {
        let summary = diff.summary();
        if diff.is_empty() {
            println!("{} No changes.", "✓".green().bold());
        } else {
            println!(
                "{} Wrote diff to {}: {} written, {} removed, {} nested",
                "✓".green().bold(),
                path.display().to_string().bold(),
                summary.written.to_string().green(),
                summary.removed.to_string().red(),
                summary.patched.to_string().cyan(),
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_apply<E: Equivalence>(args: ApplyArgs, differ: &Differ<E>, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let orig = read_value(&args.orig)?;
    let diff = read_diff(&args.diff)?;
    let applied = differ.apply(&orig, &diff)?;
    write_output(args.output.as_deref(), &applied.to_json_string_pretty()?)?;

    if let (Some(path), OutputFormat::Text) = (&args.output, format) {
        println!(
            "{} Applied {} changes, wrote {}",
            "✓".green().bold(),
            diff.summary().total(),
            path.display().to_string().bold()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_equiv<E: Equivalence>(args: EquivArgs, differ: &Differ<E>, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let a = read_value(&args.a)?;
    let b = read_value(&args.b)?;
    let equivalent = differ.equivalent(&a, &b)?;

    match format {
        OutputFormat::Json => println!("{}", json!({ "equivalent": equivalent })),
        OutputFormat::Text if equivalent => println!("{} Equivalent", "✓".green().bold()),
        OutputFormat::Text => println!("{} Not equivalent", "✗".red().bold()),
    }
    Ok(if equivalent { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Outcome of checking one fixture case.
#[derive(Debug, PartialEq, Eq)]
pub struct FixtureReport {
    /// `diff(orig, new)` matched the expected diff under both strategies.
    pub diff_matches: bool,
    /// `apply(orig, diff)` was equivalent to `new`.
    pub apply_matches: bool,
}

impl FixtureReport {
    pub fn passed(&self) -> bool {
        self.diff_matches && self.apply_matches
    }
}

/// Fixture diffs are stored encoded, so computed diffs are compared after
/// the same encode/decode pass.
fn normalize(diff: &Diff) -> anyhow::Result<Diff> {
    Ok(codec::decode(&codec::encode(diff)?)?)
}

pub fn verify_fixture<E: Equivalence + Clone>(differ: &Differ<E>, fixture: &Fixture) -> anyhow::Result<FixtureReport> {
    let mut diff_matches = true;
    for strategy in [DiffStrategy::AddDifferent, DiffStrategy::RemoveEquivalent] {
        let config = differ.config().clone().with_strategy(strategy);
        let variant = Differ::new(config).with_equivalence(differ.equivalence().clone());
        let computed = normalize(&variant.diff(&fixture.orig, &fixture.new)?)?;
        diff_matches &= computed.equivalent_with(&fixture.diff, differ.equivalence());
    }

    let applied = differ.apply(&fixture.orig, &fixture.diff)?;
    let apply_matches = differ.equivalent(&applied, &fixture.new)?;

    Ok(FixtureReport {
        diff_matches,
        apply_matches,
    })
}

fn cmd_verify<E: Equivalence + Clone>(args: VerifyArgs, differ: &Differ<E>, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let fixtures = read_fixtures(&args.fixtures)?;
    let mut failures = 0;
    let mut results = Vec::with_capacity(fixtures.len());

    for (i, fixture) in fixtures.iter().enumerate() {
        let report = verify_fixture(differ, fixture)?;
        if !report.passed() {
            failures += 1;
        }
        match format {
            OutputFormat::Json => results.push(json!({
                "case": i,
                "diff_matches": report.diff_matches,
                "apply_matches": report.apply_matches,
            })),
            OutputFormat::Text if report.passed() => println!("  {} case {}", "✓".green(), i),
            OutputFormat::Text => {
                let mut reasons = Vec::new();
                if !report.diff_matches {
                    reasons.push("diff mismatch");
                }
                if !report.apply_matches {
                    reasons.push("apply mismatch");
                }
                println!("  {} case {}: {}", "✗".red(), i, reasons.join(", ").red());
            }
        }
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Text if failures == 0 => {
            println!("{} {} cases passed", "✓".green().bold(), fixtures.len());
        }
        OutputFormat::Text => {
            println!("{} {} of {} cases failed", "✗".red().bold(), failures, fixtures.len());
        }
    }
    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn cmd_profile<E: Equivalence>(args: ProfileArgs, differ: &Differ<E>, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let fixtures = read_fixtures(&args.fixtures)?;
    info!(cases = fixtures.len(), iterations = args.iterations, strategy = ?differ.config().strategy, "profiling");

    let start = Instant::now();
    for _ in 0..args.iterations {
        for fixture in &fixtures {
            differ.diff(&fixture.orig, &fixture.new)?;
        }
    }
    let elapsed = start.elapsed();
    let runs = (args.iterations * fixtures.len()).max(1);
    let per_diff = elapsed / u32::try_from(runs).unwrap_or(u32::MAX);

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "cases": fixtures.len(),
                "iterations": args.iterations,
                "elapsed_ms": elapsed.as_secs_f64() * 1000.0,
                "per_diff_ns": u64::try_from(per_diff.as_nanos()).unwrap_or(u64::MAX),
            })
        ),
        OutputFormat::Text => {
            println!(
                "{} diffs in {:.3?} ({:?} per diff)",
                (args.iterations * fixtures.len()).to_string().bold(),
                elapsed,
                per_diff
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use strata_diff::DiffConfig;

    fn fixtures() -> Vec<Fixture> {
        read_fixtures(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/cases.json")).unwrap()
    }

    #[test]
    fn bundled_fixtures_pass() {
        let differ = Differ::new(DiffConfig::default());
        for (i, fixture) in fixtures().iter().enumerate() {
            let report = verify_fixture(&differ, fixture).unwrap();
            assert!(report.passed(), "case {i} failed: {report:?}");
        }
    }

    #[test]
    fn wrong_expected_diff_is_reported() {
        let differ = Differ::new(DiffConfig::default());
        let mut fixture = fixtures().remove(4);
        fixture.diff = Diff::empty_mapping();

        let report = verify_fixture(&differ, &fixture).unwrap();
        assert!(!report.diff_matches);
        assert!(!report.apply_matches);
    }

    #[test]
    fn approximate_engine_verifies_fixtures() {
        let differ = Differ::new(DiffConfig::default()).with_equivalence(Approximate::new(1e-9));
        assert!(fixtures().iter().all(|f| verify_fixture(&differ, f).unwrap().passed()));
    }

    #[test]
    fn profile_runs_every_case() {
        let differ = Differ::new(DiffConfig::default());
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/cases.json");
        for format in [OutputFormat::Text, OutputFormat::Json] {
            let args = ProfileArgs { fixtures: fixtures.clone(), iterations: 3 };
            assert_eq!(cmd_profile(args, &differ, format).unwrap(), ExitCode::SUCCESS);
        }

        let none = ProfileArgs { fixtures: fixtures.clone(), iterations: 0 };
        assert_eq!(cmd_profile(none, &differ, OutputFormat::Json).unwrap(), ExitCode::SUCCESS);

        let missing = ProfileArgs { fixtures: fixtures.with_file_name("missing.json"), iterations: 1 };
        assert!(cmd_profile(missing, &differ, OutputFormat::Text).is_err());
    }

    #[test]
    fn equiv_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.toml");
        std::fs::write(&a, r#"{"list": [1, 2], "name": "x"}"#).unwrap();
        std::fs::write(&b, "name = \"x\"\nlist = [2, 1]\n").unwrap();

        let differ = Differ::new(DiffConfig::default());
        let code = cmd_equiv(EquivArgs { a: a.clone(), b }, &differ, OutputFormat::Json).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let c = dir.path().join("c.json");
        std::fs::write(&c, r#"{"list": [1, 2, 2], "name": "x"}"#).unwrap();
        let code = cmd_equiv(EquivArgs { a, b: c }, &differ, OutputFormat::Json).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn diff_then_apply_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let orig = dir.path().join("orig.json");
        let other = dir.path().join("other.json");
        let diff = dir.path().join("diff.json");
        let out = dir.path().join("out.json");
        std::fs::write(&orig, r#"{"a": 1, "b": {"c": [1, 2]}, "gone": true}"#).unwrap();
        std::fs::write(&other, r#"{"a": 1, "b": {"c": [2, 3]}, "new": null}"#).unwrap();

        let differ = Differ::new(DiffConfig::default());
        cmd_diff(
            DiffArgs { orig: orig.clone(), other: other.clone(), output: Some(diff.clone()) },
            &differ,
            OutputFormat::Json,
        )
        .unwrap();
        cmd_apply(
            ApplyArgs { orig, diff, output: Some(out.clone()) },
            &differ,
            OutputFormat::Json,
        )
        .unwrap();

        let applied = read_value(&out).unwrap();
        assert!(differ.equivalent(&applied, &read_value(&other).unwrap()).unwrap());
    }
}
