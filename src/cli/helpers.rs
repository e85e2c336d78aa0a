//! Shared helper functions for CLI commands

use console::{style, StyledObject};

use crate::cli::GlobalOpts;
use crate::core::{Config, Store};
use crate::entities::incident::{Severity, Status, Tag};

/// Build the store handle for this invocation
pub fn open_store(global: &GlobalOpts) -> (Config, Store) {
    let config = Config::load();
    let path = config.store_path(global.store.as_deref());
    tracing::debug!(path = %path.display(), "using incident store");
    (config, Store::new(path))
}

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// First line of a possibly multi-line text
pub fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

pub fn style_severity(severity: Severity) -> StyledObject<&'static str> {
    let text = severity.as_str();
    match severity {
        Severity::Critical => style(text).red().bold(),
        Severity::High => style(text).red(),
        Severity::Medium => style(text).yellow(),
        Severity::Low => style(text).white(),
    }
}

pub fn style_status(status: Status) -> StyledObject<&'static str> {
    let text = status.as_str();
    match status {
        Status::Open => style(text).cyan(),
        Status::InProgress => style(text).yellow(),
        Status::Contained => style(text).magenta(),
        Status::Resolved => style(text).green(),
        Status::Closed => style(text).dim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("one\ntwo"), "one");
        assert_eq!(first_line(""), "");
    }
}
