//! 저압(MOP <= 75 mbar) PE 본관 기밀시험용 Z 계수/단면적 표.
//!
//! 행은 외경 [mm], 열은 SDR11, SDR13.6, SDR17.6, SDR21, SDR26 순서다.
//! 규격상 존재하지 않는 조합은 `None`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// SDR 구분. 표의 열 순서와 같다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sdr {
    Sdr11,
    Sdr13_6,
    Sdr17_6,
    Sdr21,
    Sdr26,
}

impl Sdr {
    /// 선택 목록 순서.
    pub const ALL: [Sdr; 5] = [Sdr::Sdr11, Sdr::Sdr13_6, Sdr::Sdr17_6, Sdr::Sdr21, Sdr::Sdr26];

    pub fn from_index(index: usize) -> Option<Sdr> {
        Self::ALL.get(index).copied()
    }

    fn column(self) -> usize {
        match self {
            Sdr::Sdr11 => 0,
            Sdr::Sdr13_6 => 1,
            Sdr::Sdr17_6 => 2,
            Sdr::Sdr21 => 3,
            Sdr::Sdr26 => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sdr::Sdr11 => "SDR11",
            Sdr::Sdr13_6 => "SDR13.6",
            Sdr::Sdr17_6 => "SDR17.6",
            Sdr::Sdr21 => "SDR21",
            Sdr::Sdr26 => "SDR26",
        }
    }
}

impl fmt::Display for Sdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 문자열 파싱 실패.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSelectionError {
    #[error("unknown SDR: {0}")]
    Sdr(String),
    #[error("unsupported nominal pipe diameter: {0}")]
    Diameter(String),
}

impl FromStr for Sdr {
    type Err = ParseSelectionError;

    /// "SDR11", "sdr 17.6", "21" 형태를 모두 받는다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let digits = lower.trim_start_matches("sdr").trim();
        match digits {
            "11" => Ok(Sdr::Sdr11),
            "13.6" => Ok(Sdr::Sdr13_6),
            "17.6" => Ok(Sdr::Sdr17_6),
            "21" => Ok(Sdr::Sdr21),
            "26" => Ok(Sdr::Sdr26),
            _ => Err(ParseSelectionError::Sdr(s.to_string())),
        }
    }
}

/// 시험 계산기에서 선택 가능한 호칭경 [mm].
///
/// 25/32 mm 인입관은 별도의 간이 시험 절차를 따르므로 목록에 없다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct NominalDiameter(u32);

impl NominalDiameter {
    pub const SELECTABLE_MM: [u32; 7] = [63, 90, 125, 180, 250, 315, 355];

    pub fn new(mm: u32) -> Option<Self> {
        Self::SELECTABLE_MM.contains(&mm).then_some(NominalDiameter(mm))
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::SELECTABLE_MM.get(index).map(|mm| NominalDiameter(*mm))
    }

    pub fn all() -> impl Iterator<Item = NominalDiameter> {
        Self::SELECTABLE_MM.iter().map(|mm| NominalDiameter(*mm))
    }

    pub fn mm(self) -> u32 {
        self.0
    }
}

impl Default for NominalDiameter {
    fn default() -> Self {
        NominalDiameter(Self::SELECTABLE_MM[0])
    }
}

impl fmt::Display for NominalDiameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for NominalDiameter {
    type Error = ParseSelectionError;

    fn try_from(mm: u32) -> Result<Self, Self::Error> {
        NominalDiameter::new(mm).ok_or_else(|| ParseSelectionError::Diameter(mm.to_string()))
    }
}

impl From<NominalDiameter> for u32 {
    fn from(d: NominalDiameter) -> u32 {
        d.0
    }
}

impl FromStr for NominalDiameter {
    type Err = ParseSelectionError;

    /// "63", "63mm", "63 mm" 형태를 받는다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches("mm").trim();
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(NominalDiameter::new)
            .ok_or_else(|| ParseSelectionError::Diameter(s.to_string()))
    }
}

type Row = (u32, [Option<f64>; 5]);

/// 시험 시간 계수 Z [h/m] (MOP <= 75 mbar).
static Z_FACTOR_MOP_LE_75_MBAR: [Row; 23] = [
    (55, [Some(0.0005), None, Some(0.0006), None, None]),
    (63, [Some(0.0006), Some(0.0006), Some(0.0007), None, None]),
    (75, [Some(0.0009), Some(0.0009), Some(0.0010), None, None]),
    (90, [Some(0.0013), None, Some(0.0015), None, None]),
    (110, [Some(0.0019), None, Some(0.0022), None, None]),
    (125, [Some(0.0025), None, Some(0.0029), None, None]),
    (140, [Some(0.0031), None, Some(0.0036), None, None]),
    (160, [None, None, None, None, Some(0.0051)]),
    (180, [Some(0.0051), None, Some(0.0060), None, None]),
    (200, [Some(0.0063), None, Some(0.0074), None, None]),
    (213, [None, None, None, None, Some(0.0091)]),
    (250, [Some(0.0099), None, Some(0.0116), Some(0.0121), Some(0.0125)]),
    (268, [None, None, None, Some(0.0139), Some(0.0144)]),
    (280, [Some(0.0124), None, Some(0.0145), Some(0.0151), Some(0.0157)]),
    (315, [Some(0.0157), None, Some(0.0184), Some(0.0191), Some(0.0199)]),
    (355, [Some(0.0199), None, Some(0.0233), Some(0.0243), Some(0.0253)]),
    (400, [Some(0.0252), None, Some(0.0296), Some(0.0309), Some(0.0321)]),
    (440, [None, None, None, None, Some(0.0389)]),
    (450, [Some(0.0319), None, Some(0.0375), Some(0.0391), Some(0.0407)]),
    (469, [None, None, None, Some(0.0424), None]),
    (500, [Some(0.0394), None, Some(0.0463), Some(0.0482), Some(0.0502)]),
    (560, [None, None, None, None, Some(0.0630)]),
    (630, [Some(0.0626), None, Some(0.0735), Some(0.0766), Some(0.0797)]),
];

/// PE 배관 내부 단면적 [m2].
static CROSS_SECTIONAL_AREA_M2: [Row; 23] = [
    (55, [Some(0.0016), None, Some(0.0018), None, None]),
    (63, [Some(0.0021), Some(0.0023), Some(0.0024), None, None]),
    (75, [Some(0.0030), Some(0.0032), Some(0.0034), None, None]),
    (90, [Some(0.0043), None, Some(0.0050), None, None]),
    (110, [Some(0.0064), None, Some(0.0074), None, None]),
    (125, [Some(0.0082), None, Some(0.0096), None, None]),
    (140, [Some(0.0103), None, Some(0.0120), None, None]),
    (160, [None, None, None, None, Some(0.0171)]),
    (180, [Some(0.0170), None, Some(0.0200), None, None]),
    (200, [Some(0.0210), None, Some(0.0247), None, None]),
    (213, [None, None, None, None, Some(0.0304)]),
    (250, [Some(0.0329), None, Some(0.0386), Some(0.0402), Some(0.0418)]),
    (268, [None, None, None, Some(0.0461), Some(0.0481)]),
    (280, [Some(0.0412), None, Some(0.0484), Some(0.0505), Some(0.0525)]),
    (315, [Some(0.0522), None, Some(0.0612), Some(0.0638), Some(0.0664)]),
    (355, [Some(0.0663), None, Some(0.0778), Some(0.0810), Some(0.0843)]),
    (400, [Some(0.0841), None, Some(0.0987), Some(0.1029), Some(0.1070)]),
    (440, [None, None, None, None, Some(0.1295)]),
    (450, [Some(0.1065), None, Some(0.1250), Some(0.1302), Some(0.1355)]),
    (469, [None, None, None, Some(0.1414), None]),
    (500, [Some(0.1314), None, Some(0.1543), Some(0.1607), Some(0.1673)]),
    (560, [None, None, None, None, Some(0.2098)]),
    (630, [Some(0.2087), None, Some(0.2449), Some(0.2552), Some(0.2657)]),
];

fn lookup(table: &[Row], diameter_mm: u32, sdr: Sdr) -> Option<f64> {
    table
        .iter()
        .find(|(d, _)| *d == diameter_mm)
        .and_then(|(_, cols)| cols[sdr.column()])
}

/// 외경/SDR 조합의 Z 계수 [h/m]. 규격에 없는 조합은 `None`.
pub fn z_factor(diameter_mm: u32, sdr: Sdr) -> Option<f64> {
    lookup(&Z_FACTOR_MOP_LE_75_MBAR, diameter_mm, sdr)
}

/// 외경/SDR 조합의 내부 단면적 [m2].
pub fn cross_sectional_area(diameter_mm: u32, sdr: Sdr) -> Option<f64> {
    lookup(&CROSS_SECTIONAL_AREA_M2, diameter_mm, sdr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_factor_known_and_missing_cells() {
        assert_eq!(z_factor(63, Sdr::Sdr11), Some(0.0006));
        assert_eq!(z_factor(355, Sdr::Sdr17_6), Some(0.0233));
        assert_eq!(z_factor(90, Sdr::Sdr13_6), None);
        assert_eq!(z_factor(64, Sdr::Sdr11), None);
    }

    #[test]
    fn area_table_lines_up_with_z_table() {
        for (d, _) in Z_FACTOR_MOP_LE_75_MBAR.iter() {
            for sdr in Sdr::ALL {
                assert_eq!(
                    z_factor(*d, sdr).is_some(),
                    cross_sectional_area(*d, sdr).is_some(),
                    "{d} {sdr}"
                );
            }
        }
    }

    #[test]
    fn parses_selection_text() {
        assert_eq!("SDR17.6".parse::<Sdr>(), Ok(Sdr::Sdr17_6));
        assert_eq!("11".parse::<Sdr>(), Ok(Sdr::Sdr11));
        assert!("SDR9".parse::<Sdr>().is_err());
        assert_eq!("125mm".parse::<NominalDiameter>().map(|d| d.mm()), Ok(125));
        assert!("32".parse::<NominalDiameter>().is_err());
    }
}
