use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use skipindex_core::persist::{load_index, save_index, IndexPaths};
use skipindex_core::tokenizer::tokenize;
use skipindex_core::{DocId, Index, IndexConfig, IndexError, Metadata, SkipStride};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    body: String,
    title: Option<String>,
    url: Option<String>,
    #[serde(default)]
    meta: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a positional inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index snapshot from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Fixed skip stride instead of sqrt(list length)
        #[arg(long)]
        skip_stride: Option<usize>,
        /// Build skip tables once at the end instead of after every document
        #[arg(long, default_value_t = false)]
        lazy_skips: bool,
    },
    /// Print the ids of documents containing both terms
    Query {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        term_a: String,
        term_b: String,
    },
    /// Print corpus statistics
    Stats {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, skip_stride, lazy_skips } => {
            let config = IndexConfig {
                skip_stride: skip_stride.map_or(SkipStride::Sqrt, SkipStride::Fixed),
                eager_skip_rebuild: !lazy_skips,
            };
            build_index(&input, &output, config)
        }
        Commands::Query { index, term_a, term_b } => query(&index, &term_a, &term_b),
        Commands::Stats { index } => {
            let idx = load_index(&IndexPaths::new(&index))?;
            println!("{}", serde_json::to_string_pretty(&idx.stats())?);
            Ok(())
        }
    }
}

fn build_index(input: &str, output: &str, config: IndexConfig) -> Result<()> {
    let input_path = Path::new(input);
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        let entries = WalkDir::new(input_path).sort_by_file_name().into_iter();
        for entry in entries.filter_map(|e| e.ok()) {
            let p = entry.path();
            let ext = p.extension().and_then(|s| s.to_str());
            if p.is_file() && matches!(ext, Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        bail!("input path {input} does not exist");
    }

    let mut docs: Vec<InputDoc> = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }
    // Ascending ids keep every posting insert on the append path.
    docs.sort_by_key(|d| d.id);

    let mut index = Index::with_config(config);
    let mut skipped = 0usize;
    for doc in docs {
        let metadata = doc_metadata(&doc);
        match index.ingest(doc.id, &doc.body, metadata) {
            Ok(()) => {}
            Err(IndexError::DuplicateDocument(_)) => skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }
    index.refresh_skips();

    let stats = index.stats();
    tracing::info!(
        num_docs = stats.document_count,
        num_terms = stats.vocabulary_size,
        skipped,
        "ingested documents"
    );

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    save_index(&IndexPaths::new(output), &index, &created_at)?;
    tracing::info!(output, "index build complete");
    Ok(())
}

fn query(index_dir: &str, term_a: &str, term_b: &str) -> Result<()> {
    let index = load_index(&IndexPaths::new(index_dir))?;
    let (a, b) = (single_term(term_a)?, single_term(term_b)?);
    let hits = index.intersect(&a, &b);
    let results: Vec<_> = hits
        .iter()
        .map(|id| {
            serde_json::json!({
                "doc_id": id,
                "metadata": index.document(*id).map(|d| &d.metadata),
            })
        })
        .collect();
    let out = serde_json::json!({ "terms": [a, b], "total_hits": hits.len(), "results": results });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Normalize a query argument the same way documents are; it must yield one term.
fn single_term(arg: &str) -> Result<String> {
    let mut terms = tokenize(arg);
    match terms.len() {
        1 => Ok(terms.remove(0)),
        0 => bail!("query term {arg:?} has no alphanumeric characters"),
        n => bail!("query term {arg:?} splits into {n} terms {terms:?}; pass exactly one term"),
    }
}

fn doc_metadata(doc: &InputDoc) -> Metadata {
    let mut metadata = Metadata::new();
    if let Some(title) = &doc.title {
        metadata.insert("title".into(), title.clone());
    }
    if let Some(url) = &doc.url {
        metadata.insert("url".into(), url.clone());
    }
    for (k, v) in doc.meta.iter().flatten() {
        let value = match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        metadata.insert(k.clone(), value);
    }
    metadata
}

fn read_jsonl(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        docs.push(serde_json::from_str(&line)?);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => docs.push(serde_json::from_value(json)?),
        _ => tracing::warn!(file = %file.display(), "skipping file that is not an object or array"),
    }
    Ok(())
}
