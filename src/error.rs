use thiserror::Error;

/// Precondition failures reported by every container in this crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    #[error("container is empty")]
    Empty,

    #[error("index {index} is out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("cannot dereference or advance past the end position")]
    PastTheEnd,

    #[error("cannot move before the first element")]
    BeforeBegin,
}

impl ContainerError {
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }
}

pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ContainerError::Empty.to_string(), "container is empty");
        assert_eq!(
            ContainerError::out_of_range(5, 5).to_string(),
            "index 5 is out of range for length 5"
        );
    }
}
