//! Splitting an uploaded syllabus into per-module Markdown drafts.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::ParsedModuleContent;
use crate::parser::parse_module;

static MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^##[ \t]+Module[ \t]+\d+:[ \t]*(.*?)\s*$").unwrap());
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,2}[ \t]+(.+?)\s*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDraft {
    pub number: usize,
    pub title: String,
    pub content: String,
}

impl ModuleDraft {
    pub fn parse(&self) -> ParsedModuleContent {
        parse_module(Some(self.content.as_str()))
    }
}

/// Split on `## Module N: title` headings. Without any such heading the
/// whole document is one draft.
pub fn split_syllabus(markdown: &str) -> Vec<ModuleDraft> {
    if markdown.trim().is_empty() {
        return Vec::new();
    }

    let mut drafts: Vec<(Option<&str>, Vec<&str>)> = Vec::new();
    for line in markdown.lines() {
        if let Some(caps) = MODULE_RE.captures(line) {
            let title = caps.get(1).map(|m| m.as_str()).filter(|t| !t.is_empty());
            drafts.push((title, Vec::new()));
        } else if let Some((_, body)) = drafts.last_mut() {
            body.push(line);
        }
    }

    if drafts.is_empty() {
        let title = markdown
            .lines()
            .find_map(|l| TITLE_RE.captures(l).map(|c| c[1].to_string()))
            .unwrap_or_else(|| "Module 1".to_string());
        return vec![ModuleDraft {
            number: 1,
            title,
            content: markdown.trim().to_string(),
        }];
    }

    drafts
        .into_iter()
        .enumerate()
        .map(|(idx, (title, body))| ModuleDraft {
            number: idx + 1,
            title: title
                .map(str::to_string)
                .unwrap_or_else(|| format!("Module {}", idx + 1)),
            content: body.join("\n").trim().to_string(),
        })
        .collect()
}
