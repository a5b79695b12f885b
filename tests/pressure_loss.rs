//! 천연가스 압력손실 회귀 테스트.
use approx::assert_relative_eq;
use gas_mains_toolbox::gas::{
    compute, lookup_internal_diameter, report, CalculationInput, InputError, OutOfRange,
    OutOfRangeQuantity, PipeNotFound, VelocityRegime, PIPE_TABLE,
};

fn input(upstream_mbar: f64, flow: f64, length: f64, pipe_index: usize) -> CalculationInput {
    CalculationInput {
        upstream_pressure_mbar: upstream_mbar,
        base_gas_flow_rate_m3_per_h: flow,
        pipe_length_m: length,
        pipe_efficiency_factor: 0.97,
        pipe_index,
        change_in_altitude_m: 0.0,
    }
}

/// 식을 log10으로 다시 세운 독립 계산 (전체 정밀도 비교용).
fn reference_loss_mbar(inp: &CalculationInput) -> f64 {
    let d = lookup_internal_diameter(inp.pipe_index).unwrap();
    let q = inp.base_gas_flow_rate_m3_per_h;
    let p1 = 1.01325 + inp.upstream_pressure_mbar / 1000.0;
    let re = 25043.0 * q / d;
    let x = re.log10() - 5.0;
    let f = 1.0 / (14.7519 + 3.5657 * x + 0.0362 * x * x).powi(2)
        / (inp.pipe_efficiency_factor * inp.pipe_efficiency_factor);
    let t1 = (278.15 * 1.01325 * 1.01325) / (0.0007574 * 0.0007574 * 288.15 * 288.15);
    let t2 = q * q * t1 * 0.6 * inp.pipe_length_m * f / d.powi(5);
    let p2 = (p1 * p1 - t2).sqrt();
    (p1 - p2) * 1000.0 - 0.048 * inp.change_in_altitude_m
}

#[test]
fn low_pressure_main_matches_reference_figures() {
    let inp = input(50.0, 100.0, 500.0, 5);
    let res = compute(&inp).expect("pressure loss calc");
    assert_relative_eq!(res.corrected_pressure_loss_mbar, 5.320576498770713, epsilon = 1e-9);
    assert_relative_eq!(res.velocity_m_per_s, 3.4399791847151886, epsilon = 1e-12);
    assert_eq!(res.velocity_regime, VelocityRegime::LowPressure);
    assert_relative_eq!(
        res.corrected_pressure_loss_mbar,
        reference_loss_mbar(&inp),
        max_relative = 1e-9
    );

    let lines = report::summary_lines(&res);
    assert_eq!(lines, vec!["Pressure loss is 5.32 mbar", "Velocity is 3.44 m/s"]);
}

#[test]
fn medium_pressure_main_uses_high_pressure_velocity() {
    let inp = input(2000.0, 100.0, 500.0, 5);
    let res = compute(&inp).expect("pressure loss calc");
    assert_eq!(res.velocity_regime, VelocityRegime::HighPressure);
    assert_relative_eq!(res.downstream_bar_abs, 3.011376705945247, epsilon = 1e-9);
    assert_relative_eq!(res.corrected_pressure_loss_mbar, 1.8732940547532273, epsilon = 1e-6);
    assert_relative_eq!(res.velocity_m_per_s, 1.157490167036633, epsilon = 1e-9);
    assert_eq!(report::round2(res.velocity_m_per_s), 1.16);
}

#[test]
fn exactly_75_mbar_stays_on_low_pressure_formula() {
    let at = compute(&input(75.0, 100.0, 500.0, 5)).unwrap();
    assert_eq!(at.velocity_regime, VelocityRegime::LowPressure);
    assert_relative_eq!(at.velocity_m_per_s, 3.4399791847151886, epsilon = 1e-12);

    let above = compute(&input(75.01, 100.0, 500.0, 5)).unwrap();
    assert_eq!(above.velocity_regime, VelocityRegime::HighPressure);
    assert_relative_eq!(above.velocity_m_per_s, 3.2188154575176187, epsilon = 1e-9);
}

#[test]
fn downhill_run_adds_to_loss() {
    let mut inp = input(50.0, 10.0, 100.0, 0);
    inp.pipe_efficiency_factor = 1.0;
    inp.change_in_altitude_m = -20.0;
    let res = compute(&inp).unwrap();
    assert_relative_eq!(res.pressure_loss_mbar, 159.48160959298997, max_relative = 1e-9);
    assert_relative_eq!(
        res.corrected_pressure_loss_mbar,
        160.44160959298998,
        max_relative = 1e-9
    );
    assert_relative_eq!(res.velocity_m_per_s, 15.379755797361915, epsilon = 1e-9);
}

#[test]
fn overlong_thin_pipe_reports_loss_out_of_range_but_keeps_velocity() {
    let res = compute(&input(50.0, 100.0, 100_000.0, 0)).expect("valid input");
    assert_eq!(
        res.pressure_loss(),
        Err(OutOfRange(OutOfRangeQuantity::PressureLoss))
    );
    assert_relative_eq!(res.velocity().unwrap(), 153.79755797361915, epsilon = 1e-9);
    assert_eq!(
        report::summary_lines(&res),
        vec!["Calculated pressure loss is out of range", "Velocity is 153.80 m/s"]
    );
}

#[test]
fn high_pressure_velocity_out_of_range_keeps_pressure_loss() {
    // 하류 압력은 유효하지만 중압 유속식의 제곱근 인자는 음수
    let res = compute(&input(2000.0, 100.0, 45.0, 0)).expect("valid input");
    assert_eq!(res.velocity_regime, VelocityRegime::HighPressure);
    assert!(res.downstream_bar_abs.is_finite());
    assert_eq!(res.velocity(), Err(OutOfRange(OutOfRangeQuantity::Velocity)));
    assert_eq!(
        report::summary_lines(&res),
        vec!["Pressure loss is 2633.88 mbar", "Calculated velocity is out of range"]
    );
    assert!(report::detail_lines(&res).iter().all(|l| !l.contains("NaN")));
}

#[test]
fn both_quantities_out_of_range() {
    let res = compute(&input(2000.0, 100.0, 100_000.0, 0)).expect("valid input");
    assert_eq!(
        report::summary_lines(&res),
        vec![
            "Calculated pressure loss is out of range",
            "Calculated velocity is out of range"
        ]
    );
}

#[test]
fn repeated_calls_give_identical_results() {
    let inp = input(50.0, 100.0, 500.0, 5);
    assert_eq!(compute(&inp), compute(&inp));
}

#[test]
fn input_errors_are_reported_in_field_order() {
    let mut inp = input(0.0, -1.0, 500.0, 5);
    assert_eq!(
        compute(&inp),
        Err(InputError::UpstreamPressure)
    );
    inp.upstream_pressure_mbar = 50.0;
    assert_eq!(compute(&inp), Err(InputError::FlowRate));
    inp.base_gas_flow_rate_m3_per_h = 100.0;
    inp.pipe_length_m = 0.0;
    assert_eq!(compute(&inp), Err(InputError::PipeLength));
    inp.pipe_length_m = 500.0;
    inp.pipe_efficiency_factor = 1.5;
    assert_eq!(
        compute(&inp),
        Err(InputError::EfficiencyFactor)
    );
    let err = compute(&inp).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The pipe efficiency factor must be a positive number less than or equal to 1"
    );
}

#[test]
fn every_table_row_resolves_and_index_16_does_not() {
    for (index, spec) in PIPE_TABLE.iter().enumerate() {
        assert_eq!(lookup_internal_diameter(index), Ok(spec.internal_diameter_mm));
    }
    assert_eq!(lookup_internal_diameter(0), Ok(15.15));
    assert_eq!(lookup_internal_diameter(15), Ok(313.50));
    assert_eq!(
        lookup_internal_diameter(16),
        Err(PipeNotFound { index: 16 })
    );
    assert!(matches!(
        compute(&input(50.0, 100.0, 500.0, 16)),
        Err(InputError::Pipe(_))
    ));
}
