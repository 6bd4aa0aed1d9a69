use anyhow::Result;
use clap::{Parser, Subcommand};
use docsearch_core::{build, query_term, rank_by_frequency, search, DocId, SearchHit};
use indexer::load_store;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Index text documents and run single-term frequency lookups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load documents, build the index and look up one term
    Search {
        /// Input path (file or directory of .json/.jsonl/.txt files)
        #[arg(long)]
        input: PathBuf,
        /// Query; only its first word is matched
        #[arg(long)]
        query: String,
        /// Order hits by descending frequency instead of ingestion order
        #[arg(long, default_value_t = false)]
        by_frequency: bool,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Fail on duplicate document ids instead of skipping them
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Load documents, build the index and print its size
    Stats {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

#[derive(Serialize)]
struct SearchOutput {
    query: String,
    /// Normalized term actually looked up; empty when the query has no letters.
    term: String,
    total_hits: usize,
    results: Vec<NamedHit>,
}

#[derive(Serialize)]
struct NamedHit {
    doc_id: DocId,
    name: String,
    frequency: u32,
}

#[derive(Serialize)]
struct StatsOutput {
    files: usize,
    num_docs: u32,
    num_terms: usize,
    num_postings: usize,
    skipped_duplicates: Vec<DocId>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { input, query, by_frequency, json, strict } => {
            run_search(&input, &query, by_frequency, json, strict)
        }
        Commands::Stats { input, json, strict } => run_stats(&input, json, strict),
    }
}

fn run_search(input: &Path, query: &str, by_frequency: bool, json: bool, strict: bool) -> Result<()> {
    let (store, _report) = load_store(input, strict)?;
    let index = build(&store);

    let mut hits: Vec<SearchHit> = search(&index, query);
    if by_frequency {
        hits = rank_by_frequency(hits);
    }

    let names: HashMap<DocId, &str> = store.all().map(|d| (d.id, d.name.as_str())).collect();
    let results: Vec<NamedHit> = hits
        .into_iter()
        .map(|h| NamedHit {
            doc_id: h.doc_id,
            name: names.get(&h.doc_id).copied().unwrap_or_default().to_string(),
            frequency: h.frequency,
        })
        .collect();
    let out = SearchOutput {
        query: query.to_string(),
        term: query_term(query).unwrap_or_default(),
        total_hits: results.len(),
        results,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if out.results.is_empty() {
        println!("No results found for '{}'.", out.term);
    } else {
        println!("Results for '{}':", out.term);
        for hit in &out.results {
            println!("Document {} ({}) | score {}", hit.doc_id, hit.name, hit.frequency);
        }
    }
    Ok(())
}

fn run_stats(input: &Path, json: bool, strict: bool) -> Result<()> {
    let (store, report) = load_store(input, strict)?;
    let index = build(&store);
    let out = StatsOutput {
        files: report.files,
        num_docs: index.num_docs(),
        num_terms: index.num_terms(),
        num_postings: index.entries().count(),
        skipped_duplicates: report.duplicates,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("files: {}", out.files);
        println!("documents: {}", out.num_docs);
        println!("terms: {}", out.num_terms);
        println!("postings: {}", out.num_postings);
        if !out.skipped_duplicates.is_empty() {
            println!("skipped duplicate ids: {:?}", out.skipped_duplicates);
        }
    }
    Ok(())
}
