//! Readers and writers for the files a docking run stages or records.
//!
//! None of these formats are interpreted beyond what the inference script needs:
//! the configuration template is rewritten in two places, the manifest is a fixed
//! two-line CSV and the log record mirrors the captured process output.

pub mod config_doc;
pub mod log_record;
pub mod manifest;
