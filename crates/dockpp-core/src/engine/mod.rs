pub mod error;
pub mod inference;
pub mod progress;
pub mod workspace;
