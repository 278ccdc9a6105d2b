//! Course-authoring Markdown toolkit.
//!
//! [`parse_module`] turns a module's Markdown into sections and pages;
//! [`correlate`] merges `####`-numbered subsections with AI enrichment
//! records. Both are pure and never fail.

pub mod config;
pub mod correlate;
pub mod db;
pub mod error;
pub mod export;
pub mod headings;
pub mod model;
pub mod parser;
pub mod syllabus;

pub use correlate::{correlate, enrichment_from_value};
pub use error::{Error, Result};
pub use export::to_markdown;
pub use headings::parse_leading_dotted_number;
pub use model::{
    ContentShape, EnrichedSubsection, EnrichmentRecord, Page, ParsedModuleContent, Resources, Section,
};
pub use parser::{parse_module, parse_value};
pub use syllabus::{split_syllabus, ModuleDraft};
