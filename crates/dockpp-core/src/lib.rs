//! # DockPP Core Library
//!
//! Staging and invocation layer for single-pair antibody-antigen docking runs with an
//! external DiffDock-PP style inference script.
//!
//! ## Architecture
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models ([`RunRequest`](core::models::request::RunRequest),
//!   [`RunResult`](core::models::result::RunResult)) and the file formats the run touches:
//!   the YAML configuration template, the CSV manifest and the JSON log record.
//!
//! - **[`engine`]: The Run Machinery.** The per-run temporary [`Workspace`](engine::workspace::Workspace),
//!   the child-process launcher and progress reporting.
//!
//! - **[`workflows`]: The Public API.** [`workflows::run::execute`] ties the layers together into
//!   the full validate, stage, invoke, record and clean up sequence.

pub mod core;
pub mod engine;
pub mod workflows;
