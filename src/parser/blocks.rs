use std::sync::LazyLock;

use regex::Regex;

use crate::headings::strip_prefix_ignore_case;

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^###[ \t]+Section[ \t]+\d+:[ \t]*(.*?)\s*$").unwrap());
static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^####[ \t]+Page[ \t]+\d+:[ \t]*(.*?)\s*$").unwrap());

const KEY_TAKEAWAY: &str = "**key takeaway:**";

/// Bold labels recognised anywhere in a module document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Summary,
    LearningObjectives,
    RealWorldExamples,
    EstimatedStudyTime,
    DifficultyLevel,
}

const LABELS: &[(&str, Label)] = &[
    ("**summary:**", Label::Summary),
    ("**learning objectives:**", Label::LearningObjectives),
    ("**real-world examples:**", Label::RealWorldExamples),
    ("**estimated study time:**", Label::EstimatedStudyTime),
    ("**difficulty level:**", Label::DifficultyLevel),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// `### Section N: title`; empty titles are `None`.
    SectionHeading { title: Option<&'a str> },
    /// `#### Page N: title`; empty titles are `None`.
    PageHeading { title: Option<&'a str> },
    /// Any other line opening with `####`.
    SubHeading,
    /// A line carrying `**Key Takeaway:**`, split around the marker.
    KeyTakeaway { before: &'a str, after: &'a str },
    Label { label: Label, rest: &'a str },
    Bullet(&'a str),
    Text,
    Empty,
}

/// One physical line and what it looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub raw: &'a str,
    pub block: Block<'a>,
}

pub fn classify_lines(markdown: &str) -> Vec<Line<'_>> {
    markdown
        .lines()
        .map(|raw| Line {
            raw,
            block: classify(raw),
        })
        .collect()
}

fn classify(raw: &str) -> Block<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Block::Empty;
    }

    if let Some(caps) = SECTION_RE.captures(raw) {
        return Block::SectionHeading {
            title: non_empty(caps.get(1).map_or("", |m| m.as_str())),
        };
    }
    if let Some(caps) = PAGE_RE.captures(raw) {
        return Block::PageHeading {
            title: non_empty(caps.get(1).map_or("", |m| m.as_str())),
        };
    }
    if raw.starts_with("####") {
        return Block::SubHeading;
    }

    // ASCII lowercasing keeps byte offsets aligned with `raw`.
    if let Some(at) = raw.to_ascii_lowercase().find(KEY_TAKEAWAY) {
        return Block::KeyTakeaway {
            before: raw[..at].trim_end(),
            after: raw[at + KEY_TAKEAWAY.len()..].trim(),
        };
    }

    for (prefix, label) in LABELS {
        if let Some(rest) = strip_prefix_ignore_case(line, prefix) {
            return Block::Label {
                label: *label,
                rest: rest.trim(),
            };
        }
    }

    if let Some(item) = line.strip_prefix('-') {
        return Block::Bullet(item.trim());
    }

    Block::Text
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
