//! Integration tests for the verification harness.
//!
//! Everything here drives the public API end to end against the software
//! double; the silicon cases are `#[ignore]`d so the suite passes on any
//! host.

use tridet_driver::fixtures::Scenario;
use tridet_driver::{
    select_coprocessor, verify_determinant, CoprocessorKind, CoprocessorSelection,
    DeterminantDriver, DriverConfig, ResultWidth, RoccCoprocessor, SoftwareCoprocessor,
    StagedVectors, TridiagonalSystem,
};

/// Both sign-off scenarios pass against the software double.
#[test]
fn test_sign_off_scenarios_pass() {
    for scenario in Scenario::ALL {
        let mut coproc = SoftwareCoprocessor::new();
        let report = verify_determinant(&mut coproc, &scenario.system(), scenario.config())
            .expect("software verification should complete");
        assert!(report.passed(), "{}: {report}", scenario.name());
    }
}

/// The counting scenario wraps the 32-bit register to the signed value the
/// RTL sign-off recorded, and evaluates exactly at 64 bits.
#[test]
fn test_counting_scenario_values_at_both_widths() {
    let system = Scenario::Counting.system();

    let mut coproc = SoftwareCoprocessor::new();
    let narrow = verify_determinant(&mut coproc, &system, DriverConfig::default())
        .expect("32-bit run should complete");
    assert_eq!(narrow.actual(), 82_619_585);

    let wide_config = DriverConfig {
        width: ResultWidth::W64,
        ..DriverConfig::default()
    };
    let wide = verify_determinant(&mut coproc, &system, wide_config)
        .expect("64-bit run should complete");
    assert_eq!(wide.actual(), 56_874_039_553_217);
}

/// A full verification is idempotent: repeating it changes nothing.
#[test]
fn test_verification_is_idempotent() {
    let scenario = Scenario::MixedSign;
    let system = scenario.system();
    let mut coproc = SoftwareCoprocessor::new();

    let first = verify_determinant(&mut coproc, &system, scenario.config())
        .expect("first run should complete");
    let second = verify_determinant(&mut coproc, &system, scenario.config())
        .expect("second run should complete");
    assert_eq!(first, second);
    assert_eq!(second.actual(), -3216);
}

/// Corrupting one staged lane before issue must flip the verdict, which is
/// exactly what a real datapath defect would look like.
#[test]
fn test_corrupted_staging_is_detected() {
    let system = Scenario::Counting.system();
    let config = DriverConfig::default();

    let mut clean = StagedVectors::acquire(&system, config.width)
        .expect("staging should succeed");
    let mut corrupt = StagedVectors::acquire(&system, config.width)
        .expect("staging should succeed");
    corrupt
        .diag_mut()
        .set(7, -1)
        .expect("lane 7 is in bounds for order 16");

    let driver = DeterminantDriver::new(config);
    let mut coproc = SoftwareCoprocessor::new();
    let reference = driver
        .execute(&mut coproc, &mut clean)
        .expect("clean run should complete");
    let perturbed = driver
        .execute(&mut coproc, &mut corrupt)
        .expect("corrupt run should complete");

    assert_ne!(reference, perturbed, "a corrupted lane must change the determinant");
}

/// Explicit software selection works everywhere; auto selection falls back
/// to software on hosts without the accelerator.
#[test]
fn test_coprocessor_selection() {
    let mut coproc = select_coprocessor(CoprocessorSelection::Software, 0)
        .expect("software double is always available");
    assert_eq!(coproc.kind(), CoprocessorKind::Software);

    let report = verify_determinant(
        &mut *coproc,
        &Scenario::Counting.system(),
        Scenario::Counting.config(),
    )
    .expect("verification through the boxed coprocessor should complete");
    assert!(report.passed());

    let auto = select_coprocessor(CoprocessorSelection::Auto, 0)
        .expect("auto selection should always produce a coprocessor");
    if RoccCoprocessor::available() {
        assert_eq!(auto.kind(), CoprocessorKind::Rocc);
    } else {
        assert_eq!(auto.kind(), CoprocessorKind::Software);
    }
}

/// Arbitrary systems agree with the golden model through the whole stack,
/// not just the sign-off vectors.
#[test]
fn test_ad_hoc_systems_verify() {
    let cases: [(Vec<i16>, Vec<i16>, Vec<i16>); 3] = [
        (vec![2], vec![3, 7], vec![4]),
        (vec![0; 4], vec![9, 4, -3, 11, 2], vec![1, 2, 3, 4]),
        (vec![-321; 7], vec![12_345; 8], vec![999; 7]),
    ];
    for (sub, diag, sup) in cases {
        let system = TridiagonalSystem::new(sub, diag, sup).expect("lengths are consistent");
        let mut coproc = SoftwareCoprocessor::new();
        let report = verify_determinant(&mut coproc, &system, DriverConfig::default())
            .expect("verification should complete");
        assert!(report.passed(), "order {}: {report}", system.order());
    }
}

/// Sign-off run against the real TD16.
#[test]
#[ignore] // Requires a riscv64 hart with the TD16 on custom-0
fn test_sign_off_scenarios_on_silicon() {
    for scenario in Scenario::ALL {
        let mut coproc =
            RoccCoprocessor::new(0).expect("TD16 should be reachable on channel 0");
        let report = verify_determinant(&mut coproc, &scenario.system(), scenario.config())
            .expect("silicon verification should complete");
        assert!(report.passed(), "{}: {report}", scenario.name());
    }
}
