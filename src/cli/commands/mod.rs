//! CLI command implementations

pub mod add;
pub mod completions;
pub mod export;
pub mod init;
pub mod list;
pub mod seed;
pub mod show;
pub mod stats;
pub mod update;
