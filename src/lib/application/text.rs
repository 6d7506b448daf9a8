const SNIPPET_LIMIT: usize = 160;

/// Collapse text to a single short line for log output.
pub(crate) fn summarise(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(empty)".to_string();
    }
    let single_line = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = single_line.chars();
    let mut result: String = chars.by_ref().take(SNIPPET_LIMIT).collect();
    if chars.next().is_some() {
        result.push_str("...");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::summarise;

    #[test]
    fn summarise_flattens_and_truncates() {
        assert_eq!(summarise("  \n "), "(empty)");
        assert_eq!(summarise("a\n  b\tc"), "a b c");
        let long = "x".repeat(200);
        let short = summarise(&long);
        assert_eq!(short.len(), 163);
        assert!(short.ends_with("..."));
    }
}
