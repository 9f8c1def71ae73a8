use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Particle pool capacity must be at least 2, got {0}")]
    CapacityTooSmall(usize),

    #[error("Maximum particle age must be finite and positive, got {0}")]
    InvalidMaxAge(f32),
}
