//! 저압 PE 본관 기밀시험 시간 계산과 망 단위 누적.

pub mod duration;
pub mod network;
pub mod tables;

pub use duration::{
    compute_test_duration, PermittedLoss, TestDurationError, TestDurationInput,
    TestDurationResult, MINIMUM_TEST_MINUTES, PERMITTED_LOSS_MBAR,
};
pub use network::{NetworkError, NetworkResults, NetworkStore, StoredResult, MAX_STORED_RESULTS};
pub use tables::{cross_sectional_area, z_factor, NominalDiameter, ParseSelectionError, Sdr};
