//! 천연가스 압력손실 계산에 쓰이는 고정 물리 상수.

/// 계산 전반에서 공유하는 물리 상수 묶음. 프로세스 전체에서 변경되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// 유량식 계수 c
    pub c: f64,
    /// 가스 비중 (공기 = 1)
    pub specific_gravity: f64,
    /// 평균 압축계수 Z
    pub average_compressibility_factor: f64,
    /// 유동 가스 평균 온도 [K]
    pub average_temperature_of_flowing_gas_k: f64,
    /// 표준 온도 [K]
    pub standard_temperature_k: f64,
    /// 표준 압력 [bar abs]
    pub standard_pressure_bar: f64,
}

/// 저압 천연가스 배관 계산용 상수.
pub const NATURAL_GAS: PhysicalConstants = PhysicalConstants {
    c: 0.0007574,
    specific_gravity: 0.6,
    average_compressibility_factor: 1.0,
    average_temperature_of_flowing_gas_k: 278.15,
    standard_temperature_k: 288.15,
    standard_pressure_bar: 1.01325,
};

/// 레이놀즈수 계산 계수 (유량 m3/h, 내경 mm 기준).
pub const REYNOLDS_COEFFICIENT: f64 = 25043.0;

/// 고도 보정 계수 [mbar/m]. 상승 구간에서는 손실이 줄어든다.
pub const ALTITUDE_CORRECTION_MBAR_PER_M: f64 = 0.048;

/// 유속식 계수 (353 * Q / D^2).
pub const VELOCITY_COEFFICIENT: f64 = 353.0;

/// 75 mbar 초과 유속식에서 쓰이는 마찰 항 계수.
pub const HIGH_PRESSURE_FRICTION_COEFFICIENT: f64 = 3730.0;

/// 저압/중압 유속식 분기점 [bar abs] = 1.01325 + 0.075. 초과(>)일 때만 중압식을 쓴다.
pub const VELOCITY_THRESHOLD_BAR_ABS: f64 = 1.08825;

impl PhysicalConstants {
    /// (Z * T_flow * P_std^2) / (c^2 * T_std^2)
    pub fn flow_equation_factor(&self) -> f64 {
        (self.average_compressibility_factor
            * self.average_temperature_of_flowing_gas_k
            * self.standard_pressure_bar
            * self.standard_pressure_bar)
            / (self.c * self.c * self.standard_temperature_k * self.standard_temperature_k)
    }

    /// 게이지 압력 [mbar]을 절대압 [bar]으로 환산한다.
    pub fn gauge_mbar_to_bar_abs(&self, gauge_mbar: f64) -> f64 {
        self.standard_pressure_bar + gauge_mbar / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_75_mbar_above_standard_pressure() {
        assert_eq!(NATURAL_GAS.gauge_mbar_to_bar_abs(75.0), VELOCITY_THRESHOLD_BAR_ABS);
    }

    #[test]
    fn flow_equation_factor_matches_hand_value() {
        let f = NATURAL_GAS.flow_equation_factor();
        assert!((f - 5995.4866).abs() < 1e-3, "factor={f}");
    }
}
