//! Whitespace normalization shared by every extracted text field

/// Collapses every whitespace run (non-breaking spaces included) to a single
/// space and trims both ends
///
/// # Examples
///
/// ```
/// use thread_scrape::document::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Inlägg:\u{a0}1\u{a0}234 \n"), "Inlägg: 1 234");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`collapse_whitespace`], but keeps line structure
///
/// Each line is collapsed on its own and blank lines are dropped, so two
/// distinct lines never merge into one.
pub fn collapse_preserving_newlines(text: &str) -> String {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_runs_and_trim() {
        assert_eq!(collapse_whitespace("  a \t\t b\n\nc  "), "a b c");
    }

    #[test]
    fn test_collapse_non_breaking_space() {
        assert_eq!(collapse_whitespace("1\u{a0}\u{a0}234"), "1 234");
    }

    #[test]
    fn test_collapse_empty() {
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace(" \u{a0}\n "), "");
    }

    #[test]
    fn test_collapse_is_idempotent() {
        for input in ["  x  y ", "å\u{a0}ä\tö", "", "one\ntwo  three", "\u{a0}"] {
            let once = collapse_whitespace(input);
            assert_eq!(collapse_whitespace(&once), once);
        }
    }

    #[test]
    fn test_preserving_keeps_lines_apart() {
        let text = "first   line \n\n   second\u{a0} line\r\nthird";
        assert_eq!(
            collapse_preserving_newlines(text),
            "first line\nsecond line\nthird"
        );
    }

    #[test]
    fn test_preserving_is_idempotent() {
        for input in ["a\n\n b \n c", "  \n  ", "x", "Citat:\n  hej  hej\n\n\nsvar"] {
            let once = collapse_preserving_newlines(input);
            assert_eq!(collapse_preserving_newlines(&once), once);
        }
    }

    #[test]
    fn test_preserving_never_merges_lines() {
        let text = "alpha\nbeta\ngamma";
        let out = collapse_preserving_newlines(text);
        assert_eq!(out.lines().count(), 3);
    }
}
