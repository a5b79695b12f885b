//! 압력손실 결과를 표시용 문자열로 바꾼다. 반올림은 여기서만 한다.

use super::pressure_loss::{CalculationResult, VelocityRegime};

/// 소수점 둘째 자리로 반올림한다 (표시 전용).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 압력손실과 유속 두 줄. 범위를 벗어난 쪽만 "out of range" 문구로 바뀐다.
pub fn summary_lines(res: &CalculationResult) -> Vec<String> {
    let loss = match res.pressure_loss() {
        Ok(mbar) => format!("Pressure loss is {:.2} mbar", round2(mbar)),
        Err(e) => e.to_string(),
    };
    let velocity = match res.velocity() {
        Ok(v) => format!("Velocity is {:.2} m/s", round2(v)),
        Err(e) => e.to_string(),
    };
    vec![loss, velocity]
}

/// 상세 결과(중간값 포함) 줄 목록. 유한하지 않은 중간값은 생략한다.
pub fn detail_lines(res: &CalculationResult) -> Vec<String> {
    let regime = match res.velocity_regime {
        VelocityRegime::LowPressure => "<= 75 mbar",
        VelocityRegime::HighPressure => "> 75 mbar",
    };
    let mut lines = vec![
        format!("Internal diameter: {:.2} mm", res.internal_diameter_mm),
        format!("Upstream pressure: {:.5} bar(a)", res.upstream_bar_abs),
    ];
    if res.downstream_bar_abs.is_finite() {
        lines.push(format!(
            "Downstream pressure: {:.5} bar(a)",
            res.downstream_bar_abs
        ));
    }
    lines.push(format!("Reynolds number: {:.0}", res.reynolds_number));
    lines.push(format!("Friction factor: {:.6}", res.friction_factor));
    if res.pressure_loss_mbar.is_finite() {
        lines.push(format!(
            "Uncorrected pressure loss: {:.2} mbar",
            round2(res.pressure_loss_mbar)
        ));
    }
    lines.push(format!("Velocity formula: {regime}"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::pressure_loss::{compute, CalculationInput};

    fn long_thin_main() -> CalculationResult {
        compute(&CalculationInput {
            upstream_pressure_mbar: 50.0,
            base_gas_flow_rate_m3_per_h: 100.0,
            pipe_length_m: 100_000.0,
            pipe_efficiency_factor: 0.97,
            pipe_index: 0,
            change_in_altitude_m: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn round2_only_touches_the_third_decimal() {
        assert_eq!(round2(3.4399791847151886), 3.44);
        assert_eq!(round2(5.320576498770713), 5.32);
        assert_eq!(round2(-2.567), -2.57);
    }

    #[test]
    fn out_of_range_loss_keeps_the_velocity_line() {
        let lines = summary_lines(&long_thin_main());
        assert_eq!(
            lines,
            vec![
                "Calculated pressure loss is out of range".to_string(),
                "Velocity is 153.80 m/s".to_string(),
            ]
        );
    }

    #[test]
    fn details_never_show_nan() {
        let lines = detail_lines(&long_thin_main());
        assert!(lines.iter().all(|l| !l.contains("NaN")), "{lines:?}");
        assert!(!lines.iter().any(|l| l.starts_with("Downstream pressure")));
    }
}
