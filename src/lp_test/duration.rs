use thiserror::Error;
use tracing::debug;

use super::tables::{cross_sectional_area, z_factor, NominalDiameter, Sdr};

/// 시험 시간이 이보다 짧으면(올림 기준) 허용 압력강하는 0이다.
pub const MINIMUM_TEST_MINUTES: f64 = 15.0;

/// 15분 이상 시험에서 허용되는 압력강하 [mbar].
pub const PERMITTED_LOSS_MBAR: f64 = 3.0;

/// 시험 시간 계산 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestDurationError {
    #[error("The pipe length must be a positive number")]
    InvalidLength,
    #[error(
        "Unable to calculate minimum test duration. You may have selected an invalid \
         combination of nominal pipe diameter and standard dimension ratio."
    )]
    UnsupportedCombination { diameter: NominalDiameter, sdr: Sdr },
}

/// 허용 압력강하.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermittedLoss {
    /// 15분 미만: 압력강하 불허, 시험은 최소 15분 유지
    Zero,
    /// 3 mbar
    ThreeMbar,
}

impl PermittedLoss {
    /// 시험 시간[분]을 올림한 값이 15분 미만이면 `Zero`.
    pub fn for_minutes(minutes: f64) -> Self {
        if minutes.ceil() < MINIMUM_TEST_MINUTES {
            PermittedLoss::Zero
        } else {
            PermittedLoss::ThreeMbar
        }
    }

    pub fn mbar(self) -> f64 {
        match self {
            PermittedLoss::Zero => 0.0,
            PermittedLoss::ThreeMbar => PERMITTED_LOSS_MBAR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PermittedLoss::Zero => "zero",
            PermittedLoss::ThreeMbar => "3 mbar",
        }
    }
}

/// 시험 시간 계산 입력.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestDurationInput {
    pub diameter: NominalDiameter,
    pub sdr: Sdr,
    pub pipe_length_m: f64,
}

/// 시험 시간 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestDurationResult {
    pub diameter: NominalDiameter,
    pub sdr: Sdr,
    pub pipe_length_m: f64,
    pub z_factor: f64,
    pub cross_sectional_area_m2: Option<f64>,
    pub duration_hours: f64,
    pub duration_minutes: f64,
    pub permitted_loss: PermittedLoss,
}

/// 최소 시험 시간을 계산한다: hours = Z * L, minutes = hours * 60.
pub fn compute_test_duration(
    input: &TestDurationInput,
) -> Result<TestDurationResult, TestDurationError> {
    if !(input.pipe_length_m.is_finite() && input.pipe_length_m > 0.0) {
        return Err(TestDurationError::InvalidLength);
    }
    let d = input.diameter.mm();
    let z = z_factor(d, input.sdr).ok_or(TestDurationError::UnsupportedCombination {
        diameter: input.diameter,
        sdr: input.sdr,
    })?;
    let hours = z * input.pipe_length_m;
    let minutes = hours * 60.0;
    debug!(diameter = d, sdr = %input.sdr, z, minutes, "test duration computed");

    Ok(TestDurationResult {
        diameter: input.diameter,
        sdr: input.sdr,
        pipe_length_m: input.pipe_length_m,
        z_factor: z,
        cross_sectional_area_m2: cross_sectional_area(d, input.sdr),
        duration_hours: hours,
        duration_minutes: minutes,
        permitted_loss: PermittedLoss::for_minutes(minutes),
    })
}

impl TestDurationResult {
    /// 결과 문구.
    pub fn message(&self) -> String {
        let mut out = format!(
            "For the input values specified above, the minimum test duration is {:.2} minutes.",
            self.duration_minutes
        );
        if self.permitted_loss == PermittedLoss::Zero {
            out.push_str(" However, the minimum test duration should always be at least 15 minutes.");
            out.push_str(" The permitted pressure loss is zero.");
        } else {
            out.push_str(" The permitted pressure loss is 3 mbar.");
        }
        out
    }
}
