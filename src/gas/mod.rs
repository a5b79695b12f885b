//! 천연가스 배관 압력손실 계산 모듈.

pub mod constants;
pub mod pipe_data;
pub mod pressure_loss;
pub mod report;

pub use pipe_data::{
    lookup_internal_diameter, pipe_options, pipe_spec, PipeNotFound, PipeSpec, PIPE_TABLE,
};
pub use pressure_loss::{
    compute, CalculationInput, CalculationResult, InputError, OutOfRange, OutOfRangeQuantity,
    VelocityRegime,
};
