//! Record/replay of provider interactions for deterministic runs.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
