use anyhow::{anyhow, Context, Result};
use docsearch_core::{DocId, Document, DocumentStore};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputDoc {
    /// Left to the store when absent.
    #[serde(default)]
    pub id: Option<DocId>,
    #[serde(default, alias = "title", alias = "file_name")]
    pub name: String,
    #[serde(alias = "body")]
    pub content: String,
}

#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub files: usize,
    pub added: usize,
    pub duplicates: Vec<DocId>,
}

/// Files under `input` that look like document sources, in file-name order.
pub fn collect_input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("json" | "jsonl" | "txt")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

/// Parse every document in `file`, choosing the format by extension:
/// `.jsonl` one object per line, `.txt` one `id|name|content` record per line,
/// anything else a JSON object or array.
pub fn read_input_docs(file: &Path) -> Result<Vec<InputDoc>> {
    match extension(file) {
        Some("jsonl") => read_jsonl(file),
        Some("txt") => read_records(file),
        _ => read_json(file),
    }
}

/// Load every source under `input` into a fresh store.
///
/// Duplicate ids are skipped with a warning unless `strict` is set, in which
/// case the first duplicate aborts the load.
pub fn load_store(input: &Path, strict: bool) -> Result<(DocumentStore, IngestReport)> {
    let files = collect_input_files(input);
    if files.is_empty() {
        return Err(anyhow!("no .json, .jsonl or .txt documents found at {}", input.display()));
    }

    let mut store = DocumentStore::new();
    let mut report = IngestReport::default();
    for file in files {
        let docs = read_input_docs(&file)?;
        tracing::info!(file = %file.display(), docs = docs.len(), "read input file");
        ingest(&mut store, docs, strict, &mut report)
            .with_context(|| format!("ingesting {}", file.display()))?;
        report.files += 1;
    }
    tracing::info!(added = report.added, duplicates = report.duplicates.len(), "ingested documents");
    Ok((store, report))
}

/// Feed `docs` to `store` through its `add`/`insert` contract.
pub fn ingest(
    store: &mut DocumentStore,
    docs: impl IntoIterator<Item = InputDoc>,
    strict: bool,
    report: &mut IngestReport,
) -> Result<()> {
    for doc in docs {
        match doc.id {
            Some(id) => match store.add(Document::new(id, doc.name, doc.content)) {
                Ok(()) => report.added += 1,
                Err(e) if strict => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(id = e.id, "skipping document: {e}");
                    report.duplicates.push(e.id);
                }
            },
            None => {
                store.insert(doc.name, doc.content)?;
                report.added += 1;
            }
        }
    }
    Ok(())
}

/// Parse one `id|name|content` line. Only the first two `|` split fields, so
/// content may contain `|`.
pub fn parse_record(line: &str) -> Result<InputDoc> {
    let mut parts = line.splitn(3, '|');
    let (id, name, content) = match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(name), Some(content)) => (id, name, content),
        _ => return Err(anyhow!("expected `id|name|content`")),
    };
    let id: DocId = id.trim().parse().with_context(|| format!("invalid document id {:?}", id.trim()))?;
    Ok(InputDoc { id: Some(id), name: name.to_string(), content: content.to_string() })
}

fn read_jsonl(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(open(file)?);
    let mut docs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", file.display()))?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid document", file.display(), lineno + 1))?;
        docs.push(doc);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("{}: invalid JSON", file.display()))?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<InputDoc>, _>>(),
        other => serde_json::from_value(other).map(|doc| vec![doc]),
    };
    docs.with_context(|| format!("{}: invalid document", file.display()))
}

fn read_records(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(open(file)?);
    let mut docs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", file.display()))?;
        if line.trim().is_empty() { continue; }
        let doc = parse_record(&line).with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        docs.push(doc);
    }
    Ok(docs)
}

fn open(file: &Path) -> Result<File> {
    File::open(file).with_context(|| format!("opening {}", file.display()))
}

fn extension(p: &Path) -> Option<&str> {
    p.extension().and_then(|s| s.to_str())
}
