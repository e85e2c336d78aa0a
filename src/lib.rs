//! irt: a local incident tracker
//!
//! Records security incidents in a plain YAML file and moves them through the
//! NIST SP 800-61 incident-handling lifecycle.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
