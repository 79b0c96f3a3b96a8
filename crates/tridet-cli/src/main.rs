//! `tridet` — command-line verification harness for the TD16 coprocessor.
//!
//! ```text
//! USAGE:
//!   tridet verify --scenario counting            Verify a built-in system
//!   tridet verify --sub 1,2 --diag 3,4,5 --super 6,7
//!                                                Verify explicit diagonals
//!   tridet scenarios                             List built-in systems
//! ```
//!
//! Exit codes: 0 when the accelerator matches the golden model, 1 on a
//! mismatch, 2 when the run itself fails (allocation, no backend, bad
//! vectors).

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tridet_driver::fixtures::Scenario;
use tridet_driver::{
    select_coprocessor, verify_determinant, Coprocessor, CoprocessorSelection, DriverConfig,
    ResultWidth, RoccCoprocessor, SoftwareCoprocessor, TridiagonalSystem,
};

const EXIT_MISMATCH: u8 = 1;
const EXIT_DRIVER_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "tridet", about = "TD16 determinant coprocessor verification", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run one verification against the golden model.
    Verify(VerifyArgs),
    /// List the built-in verification scenarios.
    Scenarios,
}

#[derive(Args)]
struct VerifyArgs {
    /// Built-in scenario name (see `tridet scenarios`).
    #[arg(long, conflicts_with_all = ["sub", "diag", "sup"])]
    scenario: Option<String>,

    /// Sub-diagonal `a`: comma-separated i16 values, order − 1 of them.
    #[arg(long, value_name = "I16,..")]
    sub: Option<String>,

    /// Main diagonal `b`: comma-separated i16 values, order of them.
    #[arg(long, value_name = "I16,..")]
    diag: Option<String>,

    /// Super-diagonal `c`: comma-separated i16 values, order − 1 of them.
    #[arg(long = "super", value_name = "I16,..")]
    sup: Option<String>,

    /// Coprocessor implementation to drive.
    #[arg(long, value_enum, default_value = "auto")]
    coprocessor: CoprocArg,

    /// Comparison width in bits. Defaults to the scenario's sign-off width,
    /// or 32 for explicit vectors.
    #[arg(long, value_enum)]
    width: Option<WidthArg>,

    /// RoCC command channel (the shipped RTL decodes channel 0 only).
    #[arg(long, default_value_t = 0)]
    channel: u8,

    /// BUSY responses the software double gives before DONE.
    #[arg(long, default_value_t = 3)]
    busy_polls: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CoprocArg {
    /// Silicon when this host has it, software double otherwise.
    Auto,
    /// Force the RoCC backend (riscv64 harts with the TD16).
    Rocc,
    /// Force the in-process software double.
    Software,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WidthArg {
    /// 32-bit result register (shipped build).
    #[value(name = "32")]
    W32,
    /// 64-bit result register (wide build).
    #[value(name = "64")]
    W64,
}

impl From<WidthArg> for ResultWidth {
    fn from(width: WidthArg) -> Self {
        match width {
            WidthArg::W32 => Self::W32,
            WidthArg::W64 => Self::W64,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    let outcome = run(cli);
    if let Err(err) = &outcome {
        eprintln!("error: {err:#}");
    }
    ExitCode::from(exit_code(&outcome))
}

/// Map a run outcome onto the process exit contract: 0 when the accelerator
/// matched the golden model, [`EXIT_MISMATCH`] when it did not,
/// [`EXIT_DRIVER_ERROR`] when the run itself failed.
fn exit_code(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => EXIT_MISMATCH,
        Err(_) => EXIT_DRIVER_ERROR,
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Cmd::Verify(args) => cmd_verify(&args),
        Cmd::Scenarios => {
            cmd_scenarios();
            Ok(true)
        }
    }
}

fn cmd_verify(args: &VerifyArgs) -> Result<bool> {
    let (system, label, sign_off_width) = resolve_system(args)?;
    let width = args
        .width
        .map(ResultWidth::from)
        .or(sign_off_width)
        .unwrap_or_default();
    let config = DriverConfig {
        channel: args.channel,
        width,
    };

    let mut coproc = build_coprocessor(args)?;
    let report = verify_determinant(coproc.as_mut(), &system, config)?;

    println!("Coprocessor : {}", coproc.kind());
    println!("System      : {label} (order {})", system.order());
    println!("Width       : {width}");
    println!("Expected    : {}", report.expected());
    println!("Accelerator : {}", report.actual());
    println!(
        "Verdict     : {}",
        if report.passed() { "PASS" } else { "FAIL" }
    );

    Ok(report.passed())
}

fn cmd_scenarios() {
    println!("Built-in scenarios:");
    println!();
    for scenario in Scenario::ALL {
        println!(
            "  {:<12} {:>6}  {}",
            scenario.name(),
            scenario.width().to_string(),
            scenario.summary()
        );
    }
}

/// Build the system to verify, with a display label and the width its
/// sign-off used (None for explicit vectors).
fn resolve_system(args: &VerifyArgs) -> Result<(TridiagonalSystem, String, Option<ResultWidth>)> {
    if let Some(name) = &args.scenario {
        let scenario = Scenario::from_name(name).ok_or_else(|| {
            anyhow!("unknown scenario {name:?}; `tridet scenarios` lists the built-ins")
        })?;
        return Ok((
            scenario.system(),
            scenario.name().to_string(),
            Some(scenario.width()),
        ));
    }

    let (Some(sub), Some(diag), Some(sup)) = (&args.sub, &args.diag, &args.sup) else {
        bail!("provide --scenario NAME, or all of --sub, --diag and --super");
    };
    let system = TridiagonalSystem::new(
        parse_i16_list(sub, "--sub")?,
        parse_i16_list(diag, "--diag")?,
        parse_i16_list(sup, "--super")?,
    )?;
    Ok((system, "explicit vectors".to_string(), None))
}

/// Build the backend. Auto resolves to silicon when this host can issue RoCC
/// instructions; every path that builds the software double applies
/// `--busy-polls`.
fn build_coprocessor(args: &VerifyArgs) -> Result<Box<dyn Coprocessor>> {
    let use_rocc = match args.coprocessor {
        CoprocArg::Rocc => true,
        CoprocArg::Auto => RoccCoprocessor::available(),
        CoprocArg::Software => false,
    };
    if use_rocc {
        return Ok(select_coprocessor(CoprocessorSelection::Rocc, args.channel)?);
    }
    Ok(Box::new(
        SoftwareCoprocessor::new().with_busy_polls(args.busy_polls),
    ))
}

fn parse_i16_list(raw: &str, which: &str) -> Result<Vec<i16>> {
    raw.split(',')
        .map(str::trim)
        .map(|token| {
            token
                .parse::<i16>()
                .with_context(|| format!("invalid {which} element {token:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_map_all_three_verdicts() {
        assert_eq!(exit_code(&Ok(true)), 0);
        assert_eq!(exit_code(&Ok(false)), EXIT_MISMATCH);
        assert_eq!(
            exit_code(&Err(anyhow!("no coprocessor reachable"))),
            EXIT_DRIVER_ERROR
        );
    }

    #[test]
    fn i16_lists_parse_and_reject() {
        assert_eq!(parse_i16_list("1, -2,3", "--sub").unwrap(), vec![1, -2, 3]);
        assert!(parse_i16_list("1,x", "--sub").is_err());
        assert!(parse_i16_list("99999", "--diag").is_err());
    }
}
