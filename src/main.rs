use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use course_md::config::Settings;
use course_md::{db, EnrichmentRecord};

#[derive(Parser)]
#[command(name = "course_md", about = "Parse course-module Markdown into structured sections and pages")]
struct Cli {
    /// SQLite module store (overrides COURSE_MD_DB_PATH / course_md.toml)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one module file ("-" for stdin) and print it as JSON
    Parse { file: PathBuf },
    /// Correlate #### subsections of a module file with AI enrichment records
    Correlate {
        content: PathBuf,
        /// JSON array of enrichment records
        #[arg(short, long)]
        enrichment: Option<PathBuf>,
    },
    /// Split a syllabus into module drafts and parse each one
    Split { file: PathBuf },
    /// Parse files or directories of Markdown and store them
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Attach AI enrichment records to a stored module
    Enrich {
        slug: String,
        #[arg(short, long)]
        enrichment: PathBuf,
    },
    /// Print a stored module's parsed JSON
    Show { slug: String },
    /// Print a stored module's enriched subsections
    Subsections { slug: String },
    /// Print a stored module as Markdown
    Export { slug: String },
    /// List stored modules
    List {
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show store statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.as_str().into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let db_path = cli.db.clone().unwrap_or_else(|| settings.db_path.clone());

    let result = match cli.command {
        Commands::Parse { file } => {
            let markdown = read_input(&file)?;
            print_json(&course_md::parse_module(Some(markdown.as_str())))
        }
        Commands::Correlate { content, enrichment } => {
            let markdown = read_input(&content)?;
            let records = match enrichment {
                Some(path) => read_enrichment(&path)?,
                None => Vec::new(),
            };
            print_json(&course_md::correlate(Some(markdown.as_str()), &records))
        }
        Commands::Split { file } => {
            let markdown = read_input(&file)?;
            let drafts: Vec<_> = course_md::split_syllabus(&markdown)
                .into_iter()
                .map(|d| SplitOutput {
                    parsed: d.parse(),
                    number: d.number,
                    title: d.title,
                })
                .collect();
            print_json(&drafts)
        }
        Commands::Import { paths } => {
            let files = collect_files(&paths, &settings.import_extension)?;
            if files.is_empty() {
                println!("No .{} files found.", settings.import_extension);
                return Ok(());
            }
            println!("Importing {} files...", files.len());
            let (rows, errors) = import_files(&files);
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            let saved = db::save_modules(&conn, &rows)?;
            let pages: usize = rows.iter().map(|r| r.parsed.page_count()).sum();
            println!(
                "Saved {} modules ({} pages) to {}, {} files failed.",
                saved,
                pages,
                db_path.display(),
                errors
            );
            Ok(())
        }
        Commands::Enrich { slug, enrichment } => {
            let records = read_enrichment(&enrichment)?;
            let conn = open_store(&db_path)?;
            db::set_ai_subsections(&conn, &slug, &records)?;
            println!("Attached {} enrichment records to {}.", records.len(), slug);
            Ok(())
        }
        Commands::Show { slug } => {
            let conn = open_store(&db_path)?;
            print_json(&db::fetch_module(&conn, &slug)?.parsed)
        }
        Commands::Subsections { slug } => {
            let conn = open_store(&db_path)?;
            let module = db::fetch_module(&conn, &slug)?;
            print_json(&course_md::correlate(Some(module.markdown.as_str()), &module.ai_subsections))
        }
        Commands::Export { slug } => {
            let conn = open_store(&db_path)?;
            let module = db::fetch_module(&conn, &slug)?;
            print!("{}", course_md::to_markdown(&module.parsed));
            Ok(())
        }
        Commands::List { limit } => {
            let conn = open_store(&db_path)?;
            let rows = db::list_modules(&conn, Some(limit))?;
            if rows.is_empty() {
                println!("No modules stored. Run 'import' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<28} | {:<32} | {:>8} | {:>5} | {:<8}",
                "#", "Slug", "Title", "Sections", "Pages", "Enriched"
            );
            println!("{}", "-".repeat(98));
            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:<28} | {:<32} | {:>8} | {:>5} | {:<8}",
                    i + 1,
                    truncate(&r.slug, 28),
                    truncate(&r.title, 32),
                    r.section_count,
                    r.page_count,
                    if r.enriched { "yes" } else { "-" }
                );
            }
            println!("\n{} modules", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = open_store(&db_path)?;
            let s = db::get_stats(&conn)?;
            println!("Modules:   {}", s.modules);
            println!("Sections:  {}", s.sections);
            println!("Pages:     {}", s.pages);
            println!("Enriched:  {}", s.enriched);
            println!("Empty:     {}", s.empty);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

#[derive(Serialize)]
struct SplitOutput {
    number: usize,
    title: String,
    parsed: course_md::ParsedModuleContent,
}

fn open_store(path: &Path) -> anyhow::Result<rusqlite::Connection> {
    let conn = db::connect(path).with_context(|| format!("opening {}", path.display()))?;
    db::init_schema(&conn)?;
    Ok(conn)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_enrichment(path: &Path) -> anyhow::Result<Vec<EnrichmentRecord>> {
    let raw = read_input(path)?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(course_md::enrichment_from_value(value)?)
}

/// Files as given, plus matching files directly inside any directory.
fn collect_files(paths: &[PathBuf], extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("listing {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == extension))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn import_files(files: &[PathBuf]) -> (Vec<db::ModuleRow>, usize) {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = std::fs::read_to_string(path).map(|markdown| module_rows(path, &markdown));
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut rows = Vec::new();
    let mut errors = 0;
    for (path, result) in results {
        match result {
            Ok(mut r) => {
                info!(file = %path.display(), modules = r.len(), "parsed");
                rows.append(&mut r);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable file");
                errors += 1;
            }
        }
    }
    (rows, errors)
}

/// One stored module per syllabus draft; a file without module headings is
/// a single module keyed by its file stem.
fn module_rows(path: &Path, markdown: &str) -> Vec<db::ModuleRow> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let source = path.display().to_string();
    let drafts = course_md::split_syllabus(markdown);

    if drafts.len() <= 1 {
        let title = drafts.into_iter().next().map(|d| d.title).unwrap_or_else(|| stem.clone());
        return vec![db::ModuleRow {
            slug: db::slugify(&stem),
            title,
            source,
            markdown: markdown.to_string(),
            parsed: course_md::parse_module(Some(markdown)),
        }];
    }

    drafts
        .into_iter()
        .map(|draft| db::ModuleRow {
            slug: db::slugify(&format!("{} {} {}", stem, draft.number, draft.title)),
            parsed: draft.parse(),
            title: draft.title,
            source: source.clone(),
            markdown: draft.content,
        })
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
