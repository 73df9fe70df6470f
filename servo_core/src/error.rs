use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ServoError {
    #[error("servo attach failed: {0}")]
    Attach(String),
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("motion worker stopped")]
    WorkerStopped,
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing servo")]
    MissingServo,
    #[error("missing state sink")]
    MissingSink,
    #[error("missing actuator name")]
    MissingName,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
