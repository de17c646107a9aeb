use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::index::{DocumentRecord, Index};
use crate::posting::PostingList;
use crate::DocId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
    #[serde(default)]
    pub config: IndexConfig,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn write_bin<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut w, value)?;
    w.flush()?;
    Ok(())
}

fn read_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let r = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(r)?)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut w = BufWriter::new(File::create(paths.meta())?);
    serde_json::to_writer_pretty(&mut w, meta)?;
    w.flush()?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let r = BufReader::new(File::open(paths.meta())?);
    Ok(serde_json::from_reader(r)?)
}

/// Write posting lists, document records and meta under `paths.root`.
pub fn save_index(paths: &IndexPaths, index: &Index, created_at: &str) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bin(&paths.postings(), index.posting_lists())?;
    write_bin(&paths.docs(), index.documents())?;
    let meta = MetaFile {
        num_docs: index.documents().len() as u32,
        created_at: created_at.to_string(),
        version: SNAPSHOT_VERSION,
        config: index.config().clone(),
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "saved index snapshot");
    Ok(())
}

/// Load a snapshot written by `save_index`, validating every posting list and
/// rebuilding any skip table that does not match its list.
pub fn load_index(paths: &IndexPaths) -> Result<Index> {
    let meta = load_meta(paths)?;
    if meta.version > SNAPSHOT_VERSION {
        return Err(IndexError::IncompatibleSnapshot {
            expected: SNAPSHOT_VERSION,
            actual: meta.version,
        });
    }
    let terms: HashMap<String, PostingList> = read_bin(&paths.postings())?;
    let docs: HashMap<DocId, DocumentRecord> = read_bin(&paths.docs())?;

    if docs.len() as u32 != meta.num_docs {
        return Err(IndexError::CorruptSnapshot(format!(
            "meta lists {} documents, found {}",
            meta.num_docs,
            docs.len()
        )));
    }
    for (term, list) in &terms {
        if !list.skips_consistent() {
            return Err(IndexError::CorruptSnapshot(format!(
                "skip table for {term:?} does not match its postings"
            )));
        }
        if !list.check_invariants() {
            return Err(IndexError::CorruptSnapshot(format!(
                "posting list for {term:?} is not ordered"
            )));
        }
        if let Some(p) = list.postings().iter().find(|p| !docs.contains_key(&p.doc_id)) {
            return Err(IndexError::CorruptSnapshot(format!(
                "{term:?} refers to unknown document {}",
                p.doc_id
            )));
        }
    }

    let mut index = Index::from_parts(meta.config, terms, docs);
    let rebuilt = index.refresh_skips();
    tracing::info!(
        root = %paths.root.display(),
        num_docs = meta.num_docs,
        rebuilt,
        "loaded index snapshot"
    );
    Ok(index)
}
