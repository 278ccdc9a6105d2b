use super::blocks::{Block, Line};

/// A `### Section N:` chunk before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection<'a> {
    /// 1-based position among section headings, preamble excluded.
    pub ordinal: usize,
    pub title: Option<&'a str>,
    pub pages: Vec<RawPage<'a>>,
}

/// A `#### Page N:` block before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage<'a> {
    pub title: Option<&'a str>,
    pub body: Vec<&'a str>,
    pub key_takeaway: Option<&'a str>,
}

impl RawPage<'_> {
    pub fn content(&self) -> String {
        self.body.join("\n").trim().to_string()
    }
}

enum State {
    Preamble,
    InSection,
    /// `collecting` turns off once the page's key takeaway has been read.
    InPage { collecting: bool },
}

/// Split classified lines into sections and their pages in one pass.
///
/// Everything before the first section heading is preamble and ignored here.
/// A page runs until the next `####` line or section heading; its body stops
/// at the first `**Key Takeaway:**` marker.
pub fn segment_sections<'a>(lines: &[Line<'a>]) -> Vec<RawSection<'a>> {
    let mut sections: Vec<RawSection<'a>> = Vec::new();
    let mut state = State::Preamble;

    for line in lines {
        match &line.block {
            Block::SectionHeading { title } => {
                sections.push(RawSection {
                    ordinal: sections.len() + 1,
                    title: *title,
                    pages: Vec::new(),
                });
                state = State::InSection;
            }
            Block::PageHeading { title } if !matches!(state, State::Preamble) => {
                if let Some(section) = sections.last_mut() {
                    section.pages.push(RawPage {
                        title: *title,
                        body: Vec::new(),
                        key_takeaway: None,
                    });
                }
                state = State::InPage { collecting: true };
            }
            Block::SubHeading if matches!(state, State::InPage { .. }) => {
                state = State::InSection;
            }
            Block::KeyTakeaway { before, after }
                if matches!(state, State::InPage { collecting: true }) =>
            {
                if let Some(page) = current_page(&mut sections) {
                    if !before.is_empty() {
                        page.body.push(*before);
                    }
                    page.key_takeaway = Some(*after);
                }
                state = State::InPage { collecting: false };
            }
            _ if matches!(state, State::InPage { collecting: true }) => {
                if let Some(page) = current_page(&mut sections) {
                    page.body.push(line.raw);
                }
            }
            _ => {}
        }
    }

    sections
}

fn current_page<'s, 'a>(sections: &'s mut [RawSection<'a>]) -> Option<&'s mut RawPage<'a>> {
    sections.last_mut().and_then(|s| s.pages.last_mut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blocks::classify_lines;

    fn segment(md: &str) -> Vec<RawSection<'_>> {
        let lines = classify_lines(md);
        segment_sections(&lines)
    }

    #[test]
    fn preamble_is_skipped() {
        let sections = segment("# Module 1\nIntro text\n#### Page 1: Stray\nbody\n");
        assert!(sections.is_empty());
    }

    #[test]
    fn sections_and_pages_in_order() {
        let md = "### Section 1: A\n#### Page 1: A1\none\n#### Page 2: A2\ntwo\n### Section 2: B\n#### Page 1: B1\nthree\n";
        let sections = segment(md);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].ordinal, 1);
        assert_eq!(sections[0].title, Some("A"));
        assert_eq!(sections[0].pages.len(), 2);
        assert_eq!(sections[0].pages[1].title, Some("A2"));
        assert_eq!(sections[0].pages[1].content(), "two");
        assert_eq!(sections[1].ordinal, 2);
        assert_eq!(sections[1].pages[0].content(), "three");
    }

    #[test]
    fn body_stops_at_key_takeaway() {
        let md = "### Section 1: A\n#### Page 1: P\nline one\n\nline two\n**Key Takeaway:** remember\nafter the takeaway\n";
        let sections = segment(md);
        let page = &sections[0].pages[0];
        assert_eq!(page.content(), "line one\n\nline two");
        assert_eq!(page.key_takeaway, Some("remember"));
    }

    #[test]
    fn other_level_four_heading_ends_page() {
        let md = "### Section 1: A\n#### Page 1: P\nkept\n#### Extra notes\nlost\n#### Page 2: Q\nkept too\n";
        let sections = segment(md);
        assert_eq!(sections[0].pages.len(), 2);
        assert_eq!(sections[0].pages[0].content(), "kept");
        assert_eq!(sections[0].pages[1].content(), "kept too");
    }

    #[test]
    fn text_between_section_heading_and_first_page_is_ignored() {
        let md = "### Section 1: A\nintro blurb\n#### Page 1: P\nbody\n";
        let sections = segment(md);
        assert_eq!(sections[0].pages[0].content(), "body");
    }

    #[test]
    fn level_three_non_section_heading_stays_in_page() {
        let md = "### Section 1: A\n#### Page 1: P\n### Aside\nbody\n";
        let sections = segment(md);
        assert_eq!(sections[0].pages[0].content(), "### Aside\nbody");
    }

    #[test]
    fn labels_and_bullets_inside_pages_are_content() {
        let md = "### Section 1: A\n#### Page 1: P\n- point\n**Summary:** inline\n";
        let sections = segment(md);
        assert_eq!(sections[0].pages[0].content(), "- point\n**Summary:** inline");
    }

    #[test]
    fn section_without_pages_is_kept_raw() {
        let sections = segment("### Section 1: Lonely\nno pages here\n");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].pages.is_empty());
    }
}
