//! PE 가스 배관 규격(호칭경/SDR)별 내경 표.

use std::fmt;

use thiserror::Error;

/// 배관 규격 한 행.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeSpec {
    /// 호칭경(외경) [mm]
    pub nominal_diameter_mm: u32,
    /// SDR 표기 (예: "11", "17.6")
    pub sdr: &'static str,
    /// 내경 [mm]
    pub internal_diameter_mm: f64,
}

impl fmt::Display for PipeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NPD {} mm, SDR {}", self.nominal_diameter_mm, self.sdr)
    }
}

/// 표에 없는 인덱스를 조회한 경우.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pipe data look-up failed for index {index}")]
pub struct PipeNotFound {
    pub index: usize,
}

const fn row(nominal_diameter_mm: u32, sdr: &'static str, internal_diameter_mm: f64) -> PipeSpec {
    PipeSpec {
        nominal_diameter_mm,
        sdr,
        internal_diameter_mm,
    }
}

/// 선택 목록 순서 그대로의 배관 표. 인덱스가 곧 선택 번호다.
pub static PIPE_TABLE: [PipeSpec; 16] = [
    row(20, "9", 15.15),
    row(25, "11", 20.15),
    row(32, "11", 25.75),
    row(63, "11", 50.90),
    row(90, "11", 72.90),
    row(125, "11", 101.30),
    row(180, "11", 145.95),
    row(250, "11", 202.95),
    row(315, "11", 255.75),
    row(355, "11", 288.30),
    row(90, "17.6", 79.20),
    row(125, "17.6", 110.30),
    row(180, "17.6", 158.75),
    row(250, "17.6", 220.75),
    row(315, "17.6", 278.25),
    row(355, "17.6", 313.50),
];

/// 인덱스로 배관 규격을 조회한다.
pub fn pipe_spec(index: usize) -> Result<&'static PipeSpec, PipeNotFound> {
    PIPE_TABLE.get(index).ok_or(PipeNotFound { index })
}

/// 인덱스로 내경[mm]을 조회한다. 범위 밖(16 이상)은 `PipeNotFound`.
pub fn lookup_internal_diameter(index: usize) -> Result<f64, PipeNotFound> {
    pipe_spec(index).map(|spec| spec.internal_diameter_mm)
}

/// 표 전체를 (인덱스, 규격) 순으로 돌려준다. 선택 목록 구성용.
pub fn pipe_options() -> impl Iterator<Item = (usize, &'static PipeSpec)> {
    PIPE_TABLE.iter().enumerate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_row_returns_its_tabulated_diameter() {
        let expected = [
            15.15, 20.15, 25.75, 50.90, 72.90, 101.30, 145.95, 202.95, 255.75, 288.30, 79.20,
            110.30, 158.75, 220.75, 278.25, 313.50,
        ];
        for (index, want) in expected.iter().enumerate() {
            assert_eq!(lookup_internal_diameter(index), Ok(*want), "index {index}");
        }
    }

    #[test]
    fn index_past_the_end_is_not_found() {
        assert_eq!(lookup_internal_diameter(16), Err(PipeNotFound { index: 16 }));
        assert!(lookup_internal_diameter(usize::MAX).is_err());
    }

    #[test]
    fn label_names_diameter_and_sdr() {
        assert_eq!(PIPE_TABLE[10].to_string(), "NPD 90 mm, SDR 17.6");
    }
}
