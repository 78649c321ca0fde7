use thiserror::Error;

pub type AvResult<T> = Result<T, AvError>;

#[derive(Error, Debug)]
pub enum AvError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch: {what} (left={left}, right={right})")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Too few points for {what}: need {needed}, got {got}")]
    TooFewPoints {
        what: &'static str,
        needed: usize,
        got: usize,
    },
}
