//! # Workflows Module
//!
//! High-level entry points that run a complete docking invocation.
//!
//! - **Single-pair run** ([`run`]) - validates the inputs, stages them into a temporary
//!   workspace, invokes the inference script and optionally records its output.

pub mod run;
