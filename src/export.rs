use crate::model::{Page, ParsedModuleContent, Section};

/// Render a parsed module back into the authoring Markdown dialect.
///
/// Empty blocks are left out. Gaps in section ids and page numbers are
/// filled with empty headings, which parse back to nothing, so a reparse
/// lands on the same numbering.
pub fn to_markdown(content: &ParsedModuleContent) -> String {
    let mut out = String::new();

    if let Some(summary) = &content.summary {
        out.push_str(&format!("**Summary:**\n{}\n\n", summary));
    }
    out.push_str(&list_block("**Learning Objectives:**", &content.objectives));
    out.push_str(&list_block("**Real-World Examples:**", &content.examples));
    out.push_str(&format!("**Estimated Study Time:** {}\n", content.estimated_study_time));
    out.push_str(&format!("**Difficulty Level:** {}\n", content.difficulty_level));

    let mut next_section = 1;
    for section in &content.detailed_subsections {
        let expected = next_section;
        let ordinal = claim_number(section_ordinal(section), &mut next_section);
        out.push_str(&(expected..ordinal).map(|n| format!("\n### Section {}:\n", n)).collect::<String>());
        out.push_str(&section_to_text(section, ordinal));
    }

    out
}

fn section_to_text(section: &Section, ordinal: usize) -> String {
    let mut text = format!("\n### Section {}: {}\n", ordinal, section.title);
    let mut next_page = 1;
    for page in &section.pages {
        let expected = next_page;
        let number = claim_number(Some(page.page_number), &mut next_page);
        text.push_str(&(expected..number).map(|n| format!("#### Page {}:\n", n)).collect::<String>());
        text.push_str(&page_to_text(page, number));
    }
    text
}

fn page_to_text(page: &Page, number: usize) -> String {
    let mut lines = vec![format!("#### Page {}: {}", number, page.page_title)];
    if !page.content.is_empty() {
        lines.push(page.content.clone());
    }
    if !page.key_takeaway.is_empty() {
        lines.push(format!("**Key Takeaway:** {}", page.key_takeaway));
    }
    lines.push(String::new());
    lines.join("\n") + "\n"
}

fn list_block(label: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut lines = vec![label.to_string()];
    lines.extend(items.iter().map(|item| format!("- {}", item)));
    lines.join("\n") + "\n\n"
}

/// `section-N` ids carry the heading ordinal.
fn section_ordinal(section: &Section) -> Option<usize> {
    section.id.strip_prefix("section-")?.parse().ok()
}

/// Take `wanted` if it does not go backwards, else the next free number.
fn claim_number(wanted: Option<usize>, next: &mut usize) -> usize {
    let number = wanted.filter(|n| *n >= *next).unwrap_or(*next);
    *next = number + 1;
    number
}
