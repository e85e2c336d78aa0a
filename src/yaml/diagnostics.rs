//! Source-annotated diagnostics for a store file that fails to parse

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A YAML or schema error located inside the store file
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(irt::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the text it was parsing
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let width = source[offset..].chars().next().map_or(0, char::len_utf8);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset + width),
            help,
            message,
        }
    }

    /// The parser's message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset the label points at
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Convert a 1-based line/column pair to the byte offset of a character
///
/// Columns past the end of a line land on its last character, lines past the
/// end of the source on the final character.
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let last_char = source.char_indices().last().map_or(0, |(i, _)| i);
    let mut line_start = 0;
    for (current, text) in source.split_inclusive('\n').enumerate() {
        if current + 1 == line {
            return text
                .char_indices()
                .nth(column.saturating_sub(1))
                .or_else(|| text.char_indices().last())
                .map_or(last_char, |(i, _)| line_start + i)
                .min(last_char);
        }
        line_start += text.len();
    }
    last_char
}

fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("unknown variant") {
        return Some(
            "Tags must use their canonical spelling, e.g. phase `contain`, status `in_progress`."
                .to_string(),
        );
    }

    if msg_lower.contains("missing field") {
        return Some(
            "Every incident needs id, title, category, severity, phase, status, created_at and updated_at."
                .to_string(),
        );
    }

    if msg_lower.contains("invalid type") && msg_lower.contains("sequence") {
        return Some("The store must be a YAML list of incidents (use `[]` when empty).".to_string());
    }

    if msg_lower.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs.".to_string());
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once per incident.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let source = "abc";
        assert_eq!(line_col_to_offset(source, 9, 1), 2);
    }

    #[test]
    fn test_offset_past_end_stays_on_char_boundary() {
        let source = "title: café";
        let offset = line_col_to_offset(source, 9, 1);
        assert!(source.is_char_boundary(offset));
        assert_eq!(&source[offset..], "é");

        let offset = line_col_to_offset(source, 1, 40);
        assert_eq!(&source[offset..], "é");
    }

    #[test]
    fn test_empty_source_offset() {
        assert_eq!(line_col_to_offset("", 1, 1), 0);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("unknown variant `respnd`").is_some());
        assert!(generate_help("missing field `title`").is_some());
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_from_serde_error_points_into_source() {
        let source = "- id: [unterminated\n";
        let err = serde_yml::from_str::<serde_yml::Value>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "incidents.yaml");
        assert!(!diag.message().is_empty());
        assert!(diag.offset() < source.len());
    }
}
