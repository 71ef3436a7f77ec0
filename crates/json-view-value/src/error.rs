use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("cannot address '{segment}' inside a {found}")]
    InvalidTarget { segment: String, found: &'static str },
    #[error("index {index} is past the end of an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
