//! 저압 천연가스 배관 압력손실/유속 계산.
//!
//! 평활관 마찰계수 근사에 효율계수를 반영한 폐형식(closed-form) 유량식을 사용한다.
//! 모든 계산은 f64 전체 정밀도로 수행하고, 반올림은 표시 단계에서만 한다.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use super::constants::{
    PhysicalConstants, ALTITUDE_CORRECTION_MBAR_PER_M, HIGH_PRESSURE_FRICTION_COEFFICIENT,
    NATURAL_GAS, REYNOLDS_COEFFICIENT, VELOCITY_COEFFICIENT, VELOCITY_THRESHOLD_BAR_ABS,
};
use super::pipe_data::{lookup_internal_diameter, PipeNotFound};

/// 계산 전에 걸러지는 입력 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("The upstream pressure must be a positive number")]
    UpstreamPressure,
    #[error("The base gas flow rate must be a positive number")]
    FlowRate,
    #[error("The pipe length must be a positive number")]
    PipeLength,
    #[error("The pipe efficiency factor must be a positive number less than or equal to 1")]
    EfficiencyFactor,
    #[error("Pipe data look-up failed, so results will not be valid ({0})")]
    Pipe(#[from] PipeNotFound),
    #[error("The change in altitude has to be a number, but this can be zero")]
    ChangeInAltitude,
}

/// 범위를 벗어난 계산 결과의 대상 물리량.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRangeQuantity {
    PressureLoss,
    Velocity,
}

impl fmt::Display for OutOfRangeQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfRangeQuantity::PressureLoss => write!(f, "pressure loss"),
            OutOfRangeQuantity::Velocity => write!(f, "velocity"),
        }
    }
}

/// 계산은 됐지만 값이 유한하지 않은 물리량. 압력손실과 유속은 따로 판정한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Calculated {0} is out of range")]
pub struct OutOfRange(pub OutOfRangeQuantity);

/// 압력손실 계산 입력값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationInput {
    /// 상류 압력 [mbar(g)]
    pub upstream_pressure_mbar: f64,
    /// 기준 상태 가스 유량 [m3/h]
    pub base_gas_flow_rate_m3_per_h: f64,
    /// 배관 길이 [m]
    pub pipe_length_m: f64,
    /// 배관 효율계수 (0 < f <= 1)
    pub pipe_efficiency_factor: f64,
    /// 배관 표 인덱스
    pub pipe_index: usize,
    /// 고도 변화 [m]. 음수/0 허용.
    pub change_in_altitude_m: f64,
}

/// 적용된 유속식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityRegime {
    /// 상류압 75 mbar(g) 이하
    LowPressure,
    /// 상류압 75 mbar(g) 초과
    HighPressure,
}

/// 압력손실 계산 결과. 모든 값은 반올림 전 전체 정밀도.
///
/// 범위를 벗어난 값은 NaN으로 남으므로 표시할 때는 [`CalculationResult::pressure_loss`]와
/// [`CalculationResult::velocity`]를 거친다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationResult {
    pub internal_diameter_mm: f64,
    pub upstream_bar_abs: f64,
    pub reynolds_number: f64,
    pub friction_factor: f64,
    pub downstream_bar_abs: f64,
    pub pressure_loss_bar: f64,
    pub pressure_loss_mbar: f64,
    pub corrected_pressure_loss_mbar: f64,
    pub velocity_m_per_s: f64,
    pub velocity_regime: VelocityRegime,
}

impl CalculationInput {
    /// 계산 전 입력값을 검증하고 배관 내경[mm]을 돌려준다.
    pub fn validate(&self) -> Result<f64, InputError> {
        if !is_positive(self.upstream_pressure_mbar) {
            return Err(InputError::UpstreamPressure);
        }
        if !is_positive(self.base_gas_flow_rate_m3_per_h) {
            return Err(InputError::FlowRate);
        }
        if !is_positive(self.pipe_length_m) {
            return Err(InputError::PipeLength);
        }
        if !is_positive(self.pipe_efficiency_factor) || self.pipe_efficiency_factor > 1.0 {
            return Err(InputError::EfficiencyFactor);
        }
        let diameter = lookup_internal_diameter(self.pipe_index)?;
        if !self.change_in_altitude_m.is_finite() {
            return Err(InputError::ChangeInAltitude);
        }
        Ok(diameter)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl CalculationResult {
    /// 고도 보정 압력손실 [mbar]. 하류 압력의 제곱근 인자가 음수면 범위 초과.
    pub fn pressure_loss(&self) -> Result<f64, OutOfRange> {
        finite_or(
            self.corrected_pressure_loss_mbar,
            OutOfRangeQuantity::PressureLoss,
        )
    }

    /// 유속 [m/s]. 중압식의 제곱근 인자가 음수면 범위 초과.
    pub fn velocity(&self) -> Result<f64, OutOfRange> {
        finite_or(self.velocity_m_per_s, OutOfRangeQuantity::Velocity)
    }
}

fn finite_or(value: f64, quantity: OutOfRangeQuantity) -> Result<f64, OutOfRange> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OutOfRange(quantity))
    }
}

/// 압력손실과 유속을 계산한다.
///
/// 입력이 유효하면 항상 결과를 돌려준다. 배관이 유량에 비해 너무 길거나 가늘면
/// 압력손실이나 유속 중 하나만 범위를 벗어날 수 있으며, 각각 따로 판정한다.
pub fn compute(input: &CalculationInput) -> Result<CalculationResult, InputError> {
    let diameter = input.validate()?;
    let result = evaluate(&NATURAL_GAS, input, diameter);
    debug!(
        reynolds = result.reynolds_number,
        friction = result.friction_factor,
        downstream_bar_abs = result.downstream_bar_abs,
        "pressure loss evaluated"
    );

    if let Err(e) = result.pressure_loss() {
        warn!(?input, "{e}");
    }
    if let Err(e) = result.velocity() {
        warn!(?input, "{e}");
    }
    Ok(result)
}

/// 검증이 끝난 입력으로 식을 순서대로 평가한다. NaN은 그대로 전파된다.
fn evaluate(k: &PhysicalConstants, input: &CalculationInput, diameter: f64) -> CalculationResult {
    let flow = input.base_gas_flow_rate_m3_per_h;
    let length = input.pipe_length_m;
    let efficiency = input.pipe_efficiency_factor;

    let upstream_abs = k.gauge_mbar_to_bar_abs(input.upstream_pressure_mbar);

    let reynolds = REYNOLDS_COEFFICIENT * flow / diameter;
    // log10 대신 ln * log10(e). 결과 마지막 비트까지 고정된다.
    let log10_reynolds = reynolds.ln() * std::f64::consts::LOG10_E;
    let x = log10_reynolds - 5.0;
    let x_squared = x * x;
    let friction_smooth = (14.7519 + 3.5657 * x + 0.0362 * x_squared).powf(-2.0);
    let friction = friction_smooth / (efficiency * efficiency);

    let diameter_pow5 = diameter.powf(5.0);
    let temporary1 = k.flow_equation_factor();
    let temporary2 =
        flow * flow * temporary1 * k.specific_gravity * length * friction / diameter_pow5;

    // 음수 인자의 sqrt는 NaN
    let downstream_abs = (upstream_abs * upstream_abs - temporary2).sqrt();
    let pressure_loss_bar = upstream_abs - downstream_abs;
    let pressure_loss_mbar = pressure_loss_bar * 1000.0;
    let corrected_pressure_loss_mbar =
        pressure_loss_mbar - ALTITUDE_CORRECTION_MBAR_PER_M * input.change_in_altitude_m;

    let (velocity, regime) = if upstream_abs > VELOCITY_THRESHOLD_BAR_ABS {
        let radicand = upstream_abs * upstream_abs
            - HIGH_PRESSURE_FRICTION_COEFFICIENT * flow * flow * length * friction / diameter_pow5;
        let v = (VELOCITY_COEFFICIENT * flow * k.standard_pressure_bar)
            / (diameter * diameter * radicand.powf(0.5));
        (v, VelocityRegime::HighPressure)
    } else {
        let v = VELOCITY_COEFFICIENT * flow / (diameter * diameter);
        (v, VelocityRegime::LowPressure)
    };

    CalculationResult {
        internal_diameter_mm: diameter,
        upstream_bar_abs: upstream_abs,
        reynolds_number: reynolds,
        friction_factor: friction,
        downstream_bar_abs: downstream_abs,
        pressure_loss_bar,
        pressure_loss_mbar,
        corrected_pressure_loss_mbar,
        velocity_m_per_s: velocity,
        velocity_regime: regime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base_input() -> CalculationInput {
        CalculationInput {
            upstream_pressure_mbar: 50.0,
            base_gas_flow_rate_m3_per_h: 100.0,
            pipe_length_m: 500.0,
            pipe_efficiency_factor: 0.97,
            pipe_index: 5,
            change_in_altitude_m: 0.0,
        }
    }

    #[test]
    fn intermediates_keep_full_precision() {
        let res = compute(&base_input()).unwrap();
        assert_relative_eq!(res.upstream_bar_abs, 1.06325, epsilon = 1e-12);
        assert_relative_eq!(res.reynolds_number, 24721.61895360316, epsilon = 1e-9);
        assert_relative_eq!(res.friction_factor, 0.006693258987049468, epsilon = 1e-12);
        assert_relative_eq!(res.downstream_bar_abs, 1.0579294235012293, epsilon = 1e-12);
    }

    #[test]
    fn uphill_run_reduces_corrected_loss() {
        let mut input = base_input();
        input.change_in_altitude_m = 10.0;
        let res = compute(&input).unwrap();
        assert_relative_eq!(
            res.pressure_loss_mbar - res.corrected_pressure_loss_mbar,
            0.48,
            epsilon = 1e-9
        );
    }

    #[test]
    fn efficiency_must_be_within_unit_interval() {
        for bad in [0.0, -0.5, 1.01, f64::NAN] {
            let mut input = base_input();
            input.pipe_efficiency_factor = bad;
            assert_eq!(
                compute(&input),
                Err(InputError::EfficiencyFactor),
                "efficiency {bad}"
            );
        }
        let mut input = base_input();
        input.pipe_efficiency_factor = 1.0;
        assert!(compute(&input).is_ok());
    }

    #[test]
    fn unknown_pipe_is_an_input_error() {
        let mut input = base_input();
        input.pipe_index = 16;
        assert!(matches!(
            compute(&input),
            Err(InputError::Pipe(_))
        ));
    }

    #[test]
    fn non_finite_altitude_is_rejected() {
        let mut input = base_input();
        input.change_in_altitude_m = f64::INFINITY;
        assert_eq!(compute(&input), Err(InputError::ChangeInAltitude));
    }

    #[test]
    fn velocity_can_fail_while_pressure_loss_holds() {
        let input = CalculationInput {
            upstream_pressure_mbar: 2000.0,
            base_gas_flow_rate_m3_per_h: 100.0,
            pipe_length_m: 45.0,
            pipe_efficiency_factor: 0.97,
            pipe_index: 0,
            change_in_altitude_m: 0.0,
        };
        let res = compute(&input).unwrap();
        assert_relative_eq!(res.pressure_loss().unwrap(), 2633.877132581061, max_relative = 1e-9);
        assert_eq!(res.velocity(), Err(OutOfRange(OutOfRangeQuantity::Velocity)));
    }
}
