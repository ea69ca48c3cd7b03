use crate::error::JoinError;

pub type JoinResult<T> = Result<T, JoinError>;
