pub mod blocks;
pub mod extract;
pub mod sections;

use serde_json::Value;

use crate::model::ParsedModuleContent;

/// Three-pass pipeline: markdown → lines → sections → module record.
///
/// Never fails: `None` and blank input give the default record, and every
/// field that cannot be found keeps its default.
pub fn parse_module(markdown: Option<&str>) -> ParsedModuleContent {
    let Some(markdown) = markdown else {
        return ParsedModuleContent::default();
    };
    let lines = blocks::classify_lines(markdown);
    let sections = sections::segment_sections(&lines);
    extract::extract_all(&lines, &sections)
}

/// JSON boundary: only a string is parsed, any other value yields defaults.
pub fn parse_value(value: &Value) -> ParsedModuleContent {
    parse_module(value.as_str())
}
