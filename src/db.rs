use std::collections::HashSet;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::correlate::enrichment_from_value;
use crate::error::{Error, Result};
use crate::model::{EnrichmentRecord, ParsedModuleContent};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS modules (
            slug           TEXT PRIMARY KEY,
            title          TEXT NOT NULL,
            source         TEXT NOT NULL,
            markdown       TEXT NOT NULL,
            parsed         TEXT NOT NULL,
            section_count  INTEGER NOT NULL DEFAULT 0,
            page_count     INTEGER NOT NULL DEFAULT 0,
            ai_subsections TEXT,
            imported_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Import ──

pub struct ModuleRow {
    pub slug: String,
    pub title: String,
    pub source: String,
    pub markdown: String,
    pub parsed: ParsedModuleContent,
}

/// Upsert modules in one transaction. Re-importing a slug replaces its
/// Markdown and parse but keeps any attached AI subsections. A slug repeated
/// within `rows` is stored once, last row winning; the count is of distinct
/// slugs.
pub fn save_modules(conn: &Connection, rows: &[ModuleRow]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut seen: HashSet<&str> = HashSet::new();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO modules (slug, title, source, markdown, parsed, section_count, page_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(slug) DO UPDATE SET
                title = excluded.title,
                source = excluded.source,
                markdown = excluded.markdown,
                parsed = excluded.parsed,
                section_count = excluded.section_count,
                page_count = excluded.page_count,
                imported_at = datetime('now')",
        )?;
        for r in rows {
            if !seen.insert(r.slug.as_str()) {
                warn!(slug = %r.slug, source = %r.source, "duplicate slug in batch, replacing earlier module");
            }
            let parsed = serde_json::to_string(&r.parsed)?;
            stmt.execute(params![
                r.slug,
                r.title,
                r.source,
                r.markdown,
                parsed,
                r.parsed.detailed_subsections.len() as i64,
                r.parsed.page_count() as i64,
            ])?;
        }
    }
    tx.commit()?;
    Ok(seen.len())
}

pub fn set_ai_subsections(conn: &Connection, slug: &str, records: &[EnrichmentRecord]) -> Result<()> {
    let json = serde_json::to_string(records)?;
    let updated = conn.execute(
        "UPDATE modules SET ai_subsections = ?1 WHERE slug = ?2",
        params![json, slug],
    )?;
    if updated == 0 {
        return Err(Error::ModuleNotFound(slug.to_string()));
    }
    Ok(())
}

// ── Reading ──

pub struct StoredModule {
    pub slug: String,
    pub title: String,
    pub source: String,
    pub markdown: String,
    pub parsed: ParsedModuleContent,
    pub ai_subsections: Vec<EnrichmentRecord>,
    pub imported_at: String,
}

pub fn fetch_module(conn: &Connection, slug: &str) -> Result<StoredModule> {
    let row = conn
        .query_row(
            "SELECT slug, title, source, markdown, parsed, ai_subsections, imported_at
             FROM modules WHERE slug = ?1",
            [slug],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, String>(6)?,
                ))
            },
        )
        .optional()?;
    let Some((slug, title, source, markdown, parsed, ai, imported_at)) = row else {
        return Err(Error::ModuleNotFound(slug.to_string()));
    };

    let ai_subsections = match ai {
        Some(json) => enrichment_from_value(serde_json::from_str(&json)?)?,
        None => Vec::new(),
    };

    Ok(StoredModule {
        slug,
        title,
        source,
        markdown,
        parsed: serde_json::from_str(&parsed)?,
        ai_subsections,
        imported_at,
    })
}

pub struct ModuleSummary {
    pub slug: String,
    pub title: String,
    pub section_count: i64,
    pub page_count: i64,
    pub enriched: bool,
}

pub fn list_modules(conn: &Connection, limit: Option<usize>) -> Result<Vec<ModuleSummary>> {
    let sql = format!(
        "SELECT slug, title, section_count, page_count, ai_subsections IS NOT NULL
         FROM modules ORDER BY slug{}",
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ModuleSummary {
                slug: row.get(0)?,
                title: row.get(1)?,
                section_count: row.get(2)?,
                page_count: row.get(3)?,
                enriched: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub modules: i64,
    pub sections: i64,
    pub pages: i64,
    pub enriched: i64,
    pub empty: i64,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let stats = conn.query_row(
        "SELECT
            COUNT(*),
            COALESCE(SUM(section_count), 0),
            COALESCE(SUM(page_count), 0),
            COALESCE(SUM(ai_subsections IS NOT NULL), 0),
            COALESCE(SUM(section_count = 0), 0)
         FROM modules",
        [],
        |row| {
            Ok(Stats {
                modules: row.get(0)?,
                sections: row.get(1)?,
                pages: row.get(2)?,
                enriched: row.get(3)?,
                empty: row.get(4)?,
            })
        },
    )?;
    Ok(stats)
}

/// File-stem or title → lower-case slug, non-alphanumeric runs collapsed to `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}
