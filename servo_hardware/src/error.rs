use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("servo attach failed on pin {pin}")]
    AttachFailed { pin: u8 },
    #[error("servo not attached")]
    NotAttached,
    #[error("angle {0} out of range (0..=180)")]
    AngleOutOfRange(u8),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
