pub mod contact;
pub mod summary;
pub mod task;
