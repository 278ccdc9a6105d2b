use tracing::debug;

use crate::model::{Page, Section, SECTION_ESTIMATED_TIME};
use crate::parser::sections::{RawPage, RawSection};

/// Turn raw sections into output records.
///
/// Pages with neither content nor key takeaway are dropped, and a section
/// left without pages is dropped with them, title included. Numbering is
/// positional and assigned before either filter runs.
pub fn build_sections(raw: &[RawSection<'_>]) -> Vec<Section> {
    raw.iter()
        .map(build_section)
        .filter(|section| {
            let keep = has_pages(section);
            if !keep {
                debug!(id = %section.id, title = %section.title, "dropping section without content");
            }
            keep
        })
        .collect()
}

fn build_section(raw: &RawSection<'_>) -> Section {
    let title = raw
        .title
        .map(str::to_string)
        .unwrap_or_else(|| format!("Section {}", raw.ordinal));

    let pages = raw
        .pages
        .iter()
        .enumerate()
        .map(|(idx, page)| build_page(idx + 1, page))
        .filter(|page| {
            if page.is_empty() {
                debug!(section = raw.ordinal, page = page.page_number, "dropping empty page");
                false
            } else {
                true
            }
        })
        .collect();

    Section {
        id: format!("section-{}", raw.ordinal),
        summary: format!("Learn about {}", title),
        title,
        pages,
        estimated_time: SECTION_ESTIMATED_TIME.to_string(),
    }
}

fn build_page(page_number: usize, raw: &RawPage<'_>) -> Page {
    Page {
        page_number,
        page_title: raw
            .title
            .map(str::to_string)
            .unwrap_or_else(|| format!("Page {}", page_number)),
        content: raw.content(),
        key_takeaway: raw.key_takeaway.unwrap_or_default().trim().to_string(),
    }
}

fn has_pages(section: &Section) -> bool {
    !section.pages.is_empty()
}
