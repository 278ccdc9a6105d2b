//! Subsection correlation.
//!
//! Maps the `#### 1.1.1 Name` headings of a module's Markdown onto the
//! AI-authored enrichment records that describe them. The Markdown decides
//! which subsections exist and in what order; enrichment records only ever
//! add fields to a subsection whose number they share.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::headings::{parent_number, parse_leading_dotted_number, parse_numbered_heading, NumberedHeading};
use crate::model::{ContentShape, EnrichedSubsection, EnrichmentRecord};

const SECTION_LEVEL: usize = 3;
const SUBSECTION_LEVEL: usize = 4;

/// Fields owned by the correlator; enrichment values for them are replaced.
const RESERVED_FIELDS: &[&str] = &["title", "number", "formattedTitle", "contentShape"];

/// Build the enriched subsection list for one module.
///
/// Missing content yields an empty list. Records whose `title` has no leading
/// dotted number never match anything.
pub fn correlate(module_content: Option<&str>, ai_subsections: &[EnrichmentRecord]) -> Vec<EnrichedSubsection> {
    let Some(content) = module_content else {
        return Vec::new();
    };

    let headings: Vec<NumberedHeading> = content.lines().filter_map(parse_numbered_heading).collect();

    let parents: HashMap<&str, &str> = headings
        .iter()
        .filter(|h| h.level == SECTION_LEVEL)
        .map(|h| (h.number.as_str(), h.name.as_str()))
        .collect();

    headings
        .iter()
        .filter(|h| h.level == SUBSECTION_LEVEL)
        .map(|heading| {
            let mut enrichment = find_enrichment(ai_subsections, &heading.number)
                .cloned()
                .unwrap_or_default();
            for key in RESERVED_FIELDS {
                enrichment.remove(*key);
            }

            let formatted_title = match parents.get(parent_number(&heading.number).as_str()) {
                Some(parent) => format!("{}:{}", parent, heading.name),
                None => heading.name.clone(),
            };

            EnrichedSubsection {
                title: heading.title(),
                number: heading.number.clone(),
                formatted_title,
                content_shape: content_shape(&enrichment),
                enrichment,
            }
        })
        .collect()
}

/// First record whose `title` starts with exactly `number`.
pub fn find_enrichment<'r>(records: &'r [EnrichmentRecord], number: &str) -> Option<&'r EnrichmentRecord> {
    let found = records.iter().find(|record| {
        record
            .get("title")
            .and_then(Value::as_str)
            .and_then(parse_leading_dotted_number)
            .is_some_and(|n| n == number)
    });
    if found.is_none() {
        debug!(number, "no enrichment record for subsection");
    }
    found
}

/// Classify enriched content: categorized flashcards win over legacy pages.
pub fn content_shape(enrichment: &EnrichmentRecord) -> ContentShape {
    let count = |key: &str| enrichment.get(key).and_then(Value::as_array).map_or(0, Vec::len);

    let concept_count = count("conceptFlashCards");
    let formula_count = count("formulaFlashCards");
    if concept_count + formula_count > 0 {
        return ContentShape::CategorizedFlashcards {
            concept_count,
            formula_count,
        };
    }

    match count("pages") {
        0 => ContentShape::Empty,
        page_count => ContentShape::LegacyPages { page_count },
    }
}

/// Accept an enrichment payload from JSON. The payload must be an array;
/// elements that are not objects are skipped.
pub fn enrichment_from_value(value: Value) -> Result<Vec<EnrichmentRecord>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::InvalidEnrichment(format!(
                "expected a JSON array of subsection records, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match item {
            Value::Object(record) => Some(record),
            other => {
                debug!(index = idx, kind = json_kind(&other), "skipping non-object enrichment record");
                None
            }
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KINEMATICS: &str = "### 2.1 Kinematics\n#### 2.1.1 Velocity\nBody text\n#### 2.1.2 Acceleration\nBody text\n";

    fn records(value: Value) -> Vec<EnrichmentRecord> {
        enrichment_from_value(value).unwrap()
    }

    #[test]
    fn kinematics_scenario() {
        let ai = records(json!([{ "title": "2.1.2 Something", "summary": "S2" }]));
        let subs = correlate(Some(KINEMATICS), &ai);

        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].title, "2.1.1 Velocity");
        assert_eq!(subs[0].number, "2.1.1");
        assert_eq!(subs[0].formatted_title, "Kinematics:Velocity");
        assert!(subs[0].field("summary").is_none());

        assert_eq!(subs[1].title, "2.1.2 Acceleration");
        assert_eq!(subs[1].formatted_title, "Kinematics:Acceleration");
        assert_eq!(subs[1].field("summary"), Some(&json!("S2")));
    }

    #[test]
    fn markdown_title_overrides_ai_title() {
        let ai = records(json!([{ "title": "2.1.1   velocity (AI)", "number": "9.9", "pages": [] }]));
        let subs = correlate(Some(KINEMATICS), &ai);
        assert_eq!(subs[0].title, "2.1.1 Velocity");
        assert_eq!(subs[0].number, "2.1.1");
        assert!(subs[0].field("title").is_none());
        assert!(subs[0].field("pages").is_some());

        let json = serde_json::to_value(&subs[0]).unwrap();
        assert_eq!(json["title"], "2.1.1 Velocity");
        assert_eq!(json["number"], "2.1.1");
    }

    #[test]
    fn order_follows_markdown_not_enrichment() {
        let ai = records(json!([
            { "title": "2.1.2 B", "summary": "second" },
            { "title": "2.1.1 A", "summary": "first" },
        ]));
        let subs = correlate(Some(KINEMATICS), &ai);
        let numbers: Vec<&str> = subs.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(numbers, vec!["2.1.1", "2.1.2"]);
        assert_eq!(subs[0].field("summary"), Some(&json!("first")));
    }

    #[test]
    fn enrichment_never_adds_subsections() {
        let ai = records(json!([{ "title": "2.1.9 Phantom", "summary": "x" }]));
        let subs = correlate(Some(KINEMATICS), &ai);
        assert_eq!(subs.len(), 2);
        assert!(subs.iter().all(|s| s.enrichment.is_empty()));
    }

    #[test]
    fn first_matching_record_wins() {
        let ai = records(json!([
            { "title": "2.1.1 One", "summary": "one" },
            { "title": "2.1.1 Two", "summary": "two" },
        ]));
        let subs = correlate(Some(KINEMATICS), &ai);
        assert_eq!(subs[0].field("summary"), Some(&json!("one")));
    }

    #[test]
    fn number_match_is_exact() {
        let ai = records(json!([{ "title": "2.1.10 Ten", "summary": "ten" }, { "title": "2.1", "summary": "parent" }]));
        let subs = correlate(Some(KINEMATICS), &ai);
        assert!(subs.iter().all(|s| s.field("summary").is_none()));
    }

    #[test]
    fn unnumbered_records_are_skipped() {
        let ai = records(json!([{ "title": "Velocity", "summary": "x" }, { "summary": "no title" }, { "title": 211 }]));
        let subs = correlate(Some(KINEMATICS), &ai);
        assert!(subs.iter().all(|s| s.enrichment.is_empty()));
    }

    #[test]
    fn missing_parent_gives_bare_name() {
        let subs = correlate(Some("#### 4.2.1 Lonely\n### 4.3 Other\n"), &[]);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].formatted_title, "Lonely");
        assert!(!subs[0].formatted_title.contains(':'));
    }

    #[test]
    fn parent_may_follow_subsection() {
        let subs = correlate(Some("#### 1.1.1 Early\n### 1.1 Late Parent\n"), &[]);
        assert_eq!(subs[0].formatted_title, "Late Parent:Early");
    }

    #[test]
    fn heading_levels_are_exact() {
        let md = "## 1.1 Too shallow\n### 1.1 Parent\n##### 1.1.1.1 Too deep\n#### 1.1.2 Kept\n";
        let subs = correlate(Some(md), &[]);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].title, "1.1.2 Kept");
        assert_eq!(subs[0].formatted_title, "Parent:Kept");
    }

    #[test]
    fn missing_content_is_empty() {
        let ai = records(json!([{ "title": "1.1.1 A" }]));
        assert!(correlate(None, &ai).is_empty());
        assert!(correlate(Some(""), &ai).is_empty());
        assert!(correlate(Some("no headings at all"), &ai).is_empty());
    }

    #[test]
    fn physics_fixture() {
        let md = std::fs::read_to_string("tests/fixtures/physics.md").unwrap();
        let subs = correlate(Some(md.as_str()), &[]);
        let formatted: Vec<&str> = subs.iter().map(|s| s.formatted_title.as_str()).collect();
        assert_eq!(
            formatted,
            vec![
                "Kinematics:Velocity",
                "Kinematics:Acceleration",
                "Dynamics:Newton's Second Law",
                "Orphaned Topic",
            ]
        );
    }

    #[test]
    fn shapes() {
        let shape = |v: Value| content_shape(v.as_object().unwrap());
        assert_eq!(
            shape(json!({ "conceptFlashCards": [{}, {}], "formulaFlashCards": [{}], "pages": [{}] })),
            ContentShape::CategorizedFlashcards { concept_count: 2, formula_count: 1 }
        );
        assert_eq!(
            shape(json!({ "conceptFlashCards": [], "pages": [{}, {}, {}] })),
            ContentShape::LegacyPages { page_count: 3 }
        );
        assert_eq!(shape(json!({ "summary": "only" })), ContentShape::Empty);
        assert_eq!(shape(json!({ "pages": "not a list" })), ContentShape::Empty);
    }

    #[test]
    fn shape_attached_to_subsection() {
        let ai = records(json!([{ "title": "2.1.1", "formulaFlashCards": [{ "q": "v = ?", "a": "dx/dt" }] }]));
        let subs = correlate(Some(KINEMATICS), &ai);
        assert_eq!(
            subs[0].content_shape,
            ContentShape::CategorizedFlashcards { concept_count: 0, formula_count: 1 }
        );
        assert_eq!(subs[1].content_shape, ContentShape::Empty);
    }

    #[test]
    fn enrichment_payload_must_be_array() {
        assert!(matches!(
            enrichment_from_value(json!({ "title": "1.1.1" })),
            Err(Error::InvalidEnrichment(_))
        ));
        let kept = records(json!([{ "title": "1.1.1" }, 5, "x", null]));
        assert_eq!(kept.len(), 1);
    }
}
