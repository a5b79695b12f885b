//! 여러 배관 구간의 시험 결과를 모아 망 전체 시험 시간을 구한다.
//!
//! 저장 목록은 최대 9개 구간으로 제한되며, TOML 파일에 세션 단위로 보관한다.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::duration::{PermittedLoss, TestDurationResult};
use super::tables::{NominalDiameter, Sdr};

/// 저장 가능한 최대 구간 수.
pub const MAX_STORED_RESULTS: usize = 9;

/// 저장 목록 오류.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Maximum number of network results already stored.")]
    Full,
    #[error("failed to access network results at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse network results at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("network results at {path} hold {count} sections, more than the 9 allowed")]
    TooMany { path: PathBuf, count: usize },
    #[error("failed to serialize network results: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 저장된 구간 하나.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub diameter: NominalDiameter,
    pub sdr: Sdr,
    pub pipe_length_m: f64,
    pub duration_minutes: f64,
}

impl From<&TestDurationResult> for StoredResult {
    fn from(res: &TestDurationResult) -> Self {
        Self {
            diameter: res.diameter,
            sdr: res.sdr,
            pipe_length_m: res.pipe_length_m,
            duration_minutes: res.duration_minutes,
        }
    }
}

impl StoredResult {
    /// "Diameter: 63mm, SDR11" / "Length: 100m" / "Test duration: 3.60 minutes"
    pub fn tidy_lines(&self) -> [String; 3] {
        [
            format!("Diameter: {}mm, {}", self.diameter, self.sdr),
            format!("Length: {}m", self.pipe_length_m),
            format!("Test duration: {:.2} minutes", self.duration_minutes),
        ]
    }
}

/// 최대 9개 구간을 담는 결과 목록.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkResults {
    #[serde(default)]
    sections: Vec<StoredResult>,
}

impl NetworkResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// 구간을 추가한다. 이미 9개면 `NetworkError::Full`.
    pub fn add(&mut self, result: StoredResult) -> Result<(), NetworkError> {
        if self.sections.len() >= MAX_STORED_RESULTS {
            warn!(stored = self.sections.len(), "network results full");
            return Err(NetworkError::Full);
        }
        self.sections.push(result);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sections.len() >= MAX_STORED_RESULTS
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredResult> {
        self.sections.iter()
    }

    /// 구간별 시험 시간의 합 [분].
    pub fn total_minutes(&self) -> f64 {
        self.sections.iter().map(|s| s.duration_minutes).sum()
    }

    pub fn allowed_loss(&self) -> PermittedLoss {
        PermittedLoss::for_minutes(self.total_minutes())
    }

    pub fn below_minimum(&self) -> bool {
        self.allowed_loss() == PermittedLoss::Zero
    }

    /// 누적 결과 요약 문구. 비어 있으면 빈 목록.
    pub fn summary_lines(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut lines = Vec::new();
        if self.len() > 1 {
            lines.push(format!("There are {} pipe sections.", self.len()));
        } else {
            lines.push("There is only 1 pipe section.".to_string());
        }
        for (i, section) in self.sections.iter().enumerate() {
            lines.push(format!("Pipe section {}", i + 1));
            lines.extend(section.tidy_lines());
        }
        let warning = if self.below_minimum() {
            " (however, the minimum test duration should always be at least 15 minutes)"
        } else {
            ""
        };
        lines.push(format!(
            "Test duration: {:.2} minutes{warning}",
            self.total_minutes()
        ));
        lines.push(format!(
            "Allowed pressure loss: {}",
            self.allowed_loss().label()
        ));
        lines
    }
}

/// TOML 파일 기반 결과 저장소.
#[derive(Debug, Clone)]
pub struct NetworkStore {
    path: PathBuf,
}

impl NetworkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 파일이 없으면 빈 목록을 돌려준다. 9개를 넘는 파일은 거부한다.
    pub fn load(&self) -> Result<NetworkResults, NetworkError> {
        if !self.path.exists() {
            return Ok(NetworkResults::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| NetworkError::Io {
            path: self.path.clone(),
            source,
        })?;
        let results: NetworkResults =
            toml::from_str(&content).map_err(|source| NetworkError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if results.len() > MAX_STORED_RESULTS {
            return Err(NetworkError::TooMany {
                path: self.path.clone(),
                count: results.len(),
            });
        }
        Ok(results)
    }

    pub fn save(&self, results: &NetworkResults) -> Result<(), NetworkError> {
        let content = toml::to_string_pretty(results)?;
        fs::write(&self.path, content).map_err(|source| NetworkError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), sections = results.len(), "network results saved");
        Ok(())
    }

    /// 불러와서 추가한 뒤 저장한다. 가득 차 있으면 파일은 그대로다.
    pub fn append(&self, result: StoredResult) -> Result<NetworkResults, NetworkError> {
        let mut results = self.load()?;
        results.add(result)?;
        self.save(&results)?;
        Ok(results)
    }

    /// 저장 파일을 지운다. 없으면 아무것도 하지 않는다.
    pub fn clear(&self) -> Result<(), NetworkError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "network results cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(NetworkError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(minutes: f64) -> StoredResult {
        StoredResult {
            diameter: NominalDiameter::new(90).unwrap(),
            sdr: Sdr::Sdr11,
            pipe_length_m: 50.0,
            duration_minutes: minutes,
        }
    }

    #[test]
    fn tenth_section_is_refused() {
        let mut results = NetworkResults::new();
        for _ in 0..MAX_STORED_RESULTS {
            results.add(section(1.0)).unwrap();
        }
        assert!(results.is_full());
        assert!(matches!(results.add(section(1.0)), Err(NetworkError::Full)));
        assert_eq!(results.len(), MAX_STORED_RESULTS);
    }

    #[test]
    fn single_section_wording() {
        let mut results = NetworkResults::new();
        results.add(section(3.9)).unwrap();
        let lines = results.summary_lines();
        assert_eq!(lines[0], "There is only 1 pipe section.");
        assert_eq!(lines[2], "Diameter: 90mm, SDR11");
        assert!(lines[5].contains("at least 15 minutes"));
        assert_eq!(lines[6], "Allowed pressure loss: zero");
    }
}
