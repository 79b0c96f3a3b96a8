//! Sign-off scenarios against the software double
//!
//! Runs both bring-up systems through the full protocol without hardware.

use tridet_driver::fixtures::Scenario;
use tridet_driver::{verify_determinant, Result, SoftwareCoprocessor};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("tridet_driver=debug")
        .init();

    println!("🔢 TD16 software verification\n");

    let mut failures = 0;
    for scenario in Scenario::ALL {
        let mut coproc = SoftwareCoprocessor::new();
        let report = verify_determinant(&mut coproc, &scenario.system(), scenario.config())?;

        let mark = if report.passed() { "✅" } else { "❌" };
        println!("{mark} {:<12} {report}", scenario.name());
        if !report.passed() {
            failures += 1;
        }
    }

    if failures == 0 {
        println!("\n🎉 All scenarios verified");
    } else {
        println!("\n{failures} scenario(s) failed");
    }

    Ok(())
}
