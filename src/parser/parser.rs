use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::parser::types::*;

/// A tree dump, optionally bundled with the original token stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TreeDocument {
    Bare(Vec<Stmt>),
    WithTokens {
        stmts: Vec<Stmt>,
        #[serde(default)]
        tokens: Vec<Token>,
    },
}

/// Statements plus the tokens they were parsed from (empty when the dump
/// carried none).
#[derive(Debug, Clone, Default)]
pub struct LoadedTree {
    pub stmts: Vec<Stmt>,
    pub tokens: Vec<Token>,
}

// Loader for JSON tree dumps produced by an upstream PHP parser
pub struct TreeLoader;

impl TreeLoader {
    pub fn parse_str(json: &str) -> Result<LoadedTree> {
        let document: TreeDocument =
            serde_json::from_str(json).context("Tree dump is not a valid syntax tree")?;

        let loaded = match document {
            TreeDocument::Bare(stmts) => LoadedTree {
                stmts,
                tokens: Vec::new(),
            },
            TreeDocument::WithTokens { stmts, tokens } => LoadedTree { stmts, tokens },
        };

        debug!(
            statements = loaded.stmts.len(),
            tokens = loaded.tokens.len(),
            "loaded syntax tree"
        );
        Ok(loaded)
    }

    pub fn load(path: &Path) -> Result<LoadedTree> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree dump {}", path.display()))?;
        Self::parse_str(&json).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn parse_tokens(json: &str) -> Result<Vec<Token>> {
        serde_json::from_str(json).context("Token dump is not a list of tokens")
    }
}
