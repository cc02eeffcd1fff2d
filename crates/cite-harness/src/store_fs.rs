//! Filesystem-backed [`DocumentStore`].
//!
//! Scans a root directory with include/exclude globs and serves each
//! matching file as one document. The document ID is the file's path
//! relative to the root, so IDs are stable across rescans and citations
//! remain meaningful to an operator.

use std::path::{Component, PathBuf};

use anyhow::{bail, Result};
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use cite_harness_core::models::Document;
use cite_harness_core::store::DocumentStore;

use crate::config::StoreConfig;

pub struct FsStore {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
    follow_symlinks: bool,
}

impl FsStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if !config.root.exists() {
            bail!("Store root does not exist: {}", config.root.display());
        }

        let include = build_globset(&config.include_globs)?;

        let mut default_excludes = vec![
            "**/.git/**".to_string(),
            "**/target/**".to_string(),
            "**/node_modules/**".to_string(),
        ];
        default_excludes.extend(config.exclude_globs.clone());
        let exclude = build_globset(&default_excludes)?;

        Ok(Self {
            root: config.root.clone(),
            include,
            exclude,
            follow_symlinks: config.follow_symlinks,
        })
    }
}

#[async_trait]
impl DocumentStore for FsStore {
    async fn list_document_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        let walker = WalkDir::new(&self.root).follow_links(self.follow_symlinks);
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let rel_str = relative.to_string_lossy().to_string();

            if self.exclude.is_match(&rel_str) {
                continue;
            }
            if !self.include.is_match(&rel_str) {
                continue;
            }

            ids.push(rel_str);
        }

        // Sort for deterministic ordering
        ids.sort();
        Ok(ids)
    }

    async fn load_document(&self, id: &str) -> Result<Option<Document>> {
        // IDs are relative paths under the root; anything that escapes it
        // is not one of ours.
        let rel = PathBuf::from(id);
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Ok(None);
        }

        let path = self.root.join(&rel);
        if !path.is_file() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(&path).unwrap_or_default();
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Some(Document {
            id: id.to_string(),
            text,
            metadata: serde_json::json!({
                "filename": filename,
                "size": size,
            }),
        }))
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
