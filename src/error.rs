use thiserror::Error;

pub type TimingResult<T> = Result<T, TimingError>;

#[derive(Debug, Error)]
pub enum TimingError {
    #[error("invalid client size: width={width}, height={height}")]
    InvalidClientSize { width: i64, height: i64 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
