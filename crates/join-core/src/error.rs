use thiserror::Error;

#[derive(Error, Debug)]
pub enum JoinError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl JoinError {
    /// Persistence failures are non-fatal: they are reported to the caller
    /// and the next store emission corrects any local divergence.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            JoinError::Validation(_) | JoinError::Persistence(_) | JoinError::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(JoinError::Validation("missing title".into()).is_recoverable());
        assert!(JoinError::Persistence("network".into()).is_recoverable());
        assert!(JoinError::NotFound("task abc".into()).is_recoverable());
        assert!(!JoinError::Internal("broken invariant".into()).is_recoverable());
    }
}
