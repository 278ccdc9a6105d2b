//! Heading grammar shared by the course parser and the subsection correlator.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)*)").unwrap());
static NUMBERED_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#+)[ \t]+(\d+(?:\.\d+)*)[ \t]+(.+?)\s*$").unwrap());

/// A `### 1.2 Name` / `#### 1.2.3 Name` style heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedHeading {
    pub level: usize,
    pub number: String,
    pub name: String,
}

impl NumberedHeading {
    /// `"<number> <name>"`, the heading text without its `#` marks.
    pub fn title(&self) -> String {
        format!("{} {}", self.number, self.name)
    }
}

/// Dotted numeric prefix of `text`, e.g. `"1.1.1"` for `"1.1.1 Resistance"`.
pub fn parse_leading_dotted_number(text: &str) -> Option<String> {
    LEADING_NUMBER_RE.captures(text).map(|c| c[1].to_string())
}

/// Parse a numbered heading line. The level is the exact count of `#`.
pub fn parse_numbered_heading(line: &str) -> Option<NumberedHeading> {
    let caps = NUMBERED_HEADING_RE.captures(line)?;
    Some(NumberedHeading {
        level: caps[1].len(),
        number: caps[2].to_string(),
        name: caps[3].to_string(),
    })
}

/// First two dot-components of a dotted number (`"1.1.1"` → `"1.1"`).
pub fn parent_number(number: &str) -> String {
    number.split('.').take(2).collect::<Vec<_>>().join(".")
}

/// Case-insensitive prefix strip, returning the remainder of `line`.
pub fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_number() {
        assert_eq!(parse_leading_dotted_number("1.1.1 Resistance").as_deref(), Some("1.1.1"));
        assert_eq!(parse_leading_dotted_number("  2.1.2 Something").as_deref(), Some("2.1.2"));
        assert_eq!(parse_leading_dotted_number("3 Intro").as_deref(), Some("3"));
        assert_eq!(parse_leading_dotted_number("Resistance 1.1"), None);
        assert_eq!(parse_leading_dotted_number(""), None);
    }

    #[test]
    fn numbered_heading_levels() {
        let h = parse_numbered_heading("### 1.1 Circuits").unwrap();
        assert_eq!(h.level, 3);
        assert_eq!(h.number, "1.1");
        assert_eq!(h.name, "Circuits");

        let h = parse_numbered_heading("#### 1.1.1 Ohm's Law  ").unwrap();
        assert_eq!(h.level, 4);
        assert_eq!(h.title(), "1.1.1 Ohm's Law");
    }

    #[test]
    fn unnumbered_heading_rejected() {
        assert!(parse_numbered_heading("### Section 1: Intro").is_none());
        assert!(parse_numbered_heading("#### 1.1.1").is_none());
        assert!(parse_numbered_heading("1.1 Circuits").is_none());
    }

    #[test]
    fn parent_of_dotted_number() {
        assert_eq!(parent_number("1.1.1"), "1.1");
        assert_eq!(parent_number("2.3.4.5"), "2.3");
        assert_eq!(parent_number("1.2"), "1.2");
        assert_eq!(parent_number("7"), "7");
    }

    #[test]
    fn prefix_ignore_case() {
        assert_eq!(strip_prefix_ignore_case("**SUMMARY:** x", "**summary:**"), Some(" x"));
        assert_eq!(strip_prefix_ignore_case("**Sum", "**summary:**"), None);
        assert_eq!(strip_prefix_ignore_case("é**summary:**", "**summary:**"), None);
    }
}
