use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_STUDY_TIME: &str = "2-3 hours";
pub const DEFAULT_DIFFICULTY: &str = "intermediate";
pub const SECTION_ESTIMATED_TIME: &str = "15-20 minutes";

/// Structured form of one course module's Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedModuleContent {
    pub summary: Option<String>,
    pub objectives: Vec<String>,
    pub examples: Vec<String>,
    pub resources: Resources,
    pub estimated_study_time: String,
    pub difficulty_level: String,
    pub detailed_subsections: Vec<Section>,
}

impl Default for ParsedModuleContent {
    fn default() -> Self {
        ParsedModuleContent {
            summary: None,
            objectives: Vec::new(),
            examples: Vec::new(),
            resources: Resources::default(),
            estimated_study_time: DEFAULT_STUDY_TIME.to_string(),
            difficulty_level: DEFAULT_DIFFICULTY.to_string(),
            detailed_subsections: Vec::new(),
        }
    }
}

impl ParsedModuleContent {
    pub fn page_count(&self) -> usize {
        self.detailed_subsections.iter().map(|s| s.pages.len()).sum()
    }
}

/// Resource categories filled in later by AI enrichment; the parser leaves
/// every list empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub books: Vec<String>,
    pub courses: Vec<String>,
    pub articles: Vec<String>,
    pub videos: Vec<String>,
    pub tools: Vec<String>,
    pub websites: Vec<String>,
    pub exercises: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub pages: Vec<Page>,
    pub estimated_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_number: usize,
    pub page_title: String,
    pub content: String,
    pub key_takeaway: String,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.key_takeaway.trim().is_empty()
    }
}

/// AI-authored description of a subsection, kept as loose JSON.
pub type EnrichmentRecord = Map<String, Value>;

/// A `####` subsection from module Markdown merged with its enrichment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSubsection {
    pub title: String,
    pub number: String,
    pub formatted_title: String,
    #[serde(default)]
    pub content_shape: ContentShape,
    /// Enrichment fields (`summary`, `conceptFlashCards`, `pages`, ...).
    #[serde(flatten)]
    pub enrichment: EnrichmentRecord,
}

impl EnrichedSubsection {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.enrichment.get(key)
    }
}

/// What kind of enriched content a subsection carries, so renderers can pick
/// a layout without re-inspecting the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentShape {
    #[serde(rename_all = "camelCase")]
    CategorizedFlashcards {
        concept_count: usize,
        formula_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    LegacyPages { page_count: usize },
    #[default]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(ParsedModuleContent::default()).unwrap();
        assert_eq!(json["summary"], Value::Null);
        assert_eq!(json["estimatedStudyTime"], "2-3 hours");
        assert_eq!(json["difficultyLevel"], "intermediate");
        assert_eq!(json["detailedSubsections"], serde_json::json!([]));
        let categories: Vec<&String> = json["resources"].as_object().unwrap().keys().collect();
        assert_eq!(categories.len(), 7);
        assert!(json["resources"]["exercises"].as_array().unwrap().is_empty());
    }

    #[test]
    fn enriched_subsection_flattens_enrichment() {
        let mut enrichment = EnrichmentRecord::new();
        enrichment.insert("summary".into(), Value::from("S"));
        let sub = EnrichedSubsection {
            title: "1.1.1 Ohm".into(),
            number: "1.1.1".into(),
            formatted_title: "Circuits:Ohm".into(),
            content_shape: ContentShape::Empty,
            enrichment,
        };
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["summary"], "S");
        assert_eq!(json["formattedTitle"], "Circuits:Ohm");
        assert_eq!(json["contentShape"]["kind"], "empty");
    }

    #[test]
    fn blank_page_is_empty() {
        let page = Page {
            page_number: 1,
            page_title: "Blank".into(),
            content: "  \n".into(),
            key_takeaway: " ".into(),
        };
        assert!(page.is_empty());
    }
}
