//! Plain data carried into and out of a docking run.

pub mod request;
pub mod result;
