pub mod metadata;
pub mod pages;

use super::blocks::{Label, Line};
use super::sections::RawSection;
use crate::model::ParsedModuleContent;

/// Fill a fresh default record from classified lines and segmented sections.
/// Each field falls back to its default independently.
pub fn extract_all(lines: &[Line<'_>], sections: &[RawSection<'_>]) -> ParsedModuleContent {
    let mut content = ParsedModuleContent::default();

    content.summary = metadata::summary(lines);
    content.objectives = metadata::bullet_list(lines, Label::LearningObjectives);
    content.examples = metadata::bullet_list(lines, Label::RealWorldExamples);
    if let Some(time) = metadata::inline_value(lines, Label::EstimatedStudyTime) {
        content.estimated_study_time = time;
    }
    if let Some(level) = metadata::inline_value(lines, Label::DifficultyLevel) {
        content.difficulty_level = level.to_lowercase();
    }
    content.detailed_subsections = pages::build_sections(sections);

    content
}
