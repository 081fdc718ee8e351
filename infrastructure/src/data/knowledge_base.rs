//! Rule corpus loading.
//!
//! Accepts either a bare JSON array of rules or an object with a `rules`
//! array. A corpus ships with the crate and is used when no file is
//! configured.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use triage_domain::{KbRule, KnowledgeBase};

const BUILTIN_CORPUS: &str = include_str!("../../../fixtures/kb_docs.json");

#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid knowledge base {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },

    #[error("knowledge base {0} contains no rules")]
    Empty(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Bare(Vec<KbRule>),
    Wrapped { rules: Vec<KbRule> },
}

pub struct KnowledgeBaseLoader;

impl KnowledgeBaseLoader {
    /// Load from `path`, or the built-in corpus when `None`
    pub fn load(path: Option<&Path>) -> Result<KnowledgeBase, KnowledgeBaseError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn from_file(path: &Path) -> Result<KnowledgeBase, KnowledgeBaseError> {
        let json = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::parse(&json, &path.display().to_string())?;
        info!("Loaded {} rule(s) from {}", kb.len(), path.display());
        Ok(kb)
    }

    pub fn builtin() -> Result<KnowledgeBase, KnowledgeBaseError> {
        Self::parse(BUILTIN_CORPUS, "(built-in)")
    }

    pub fn parse(json: &str, origin: &str) -> Result<KnowledgeBase, KnowledgeBaseError> {
        let file: CorpusFile =
            serde_json::from_str(json).map_err(|source| KnowledgeBaseError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        let rules = match file {
            CorpusFile::Bare(rules) | CorpusFile::Wrapped { rules } => rules,
        };
        if rules.is_empty() {
            return Err(KnowledgeBaseError::Empty(origin.to_string()));
        }
        Ok(KnowledgeBase::new(rules))
    }
}
