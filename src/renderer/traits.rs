use serde::Deserialize;

use crate::error::Result;
use crate::parser::{Stmt, Token};
use crate::renderer::renders::NodeRenderer;

pub use crate::parser::ArraySyntax;

/// Configuration for one renderer instance. Fixed for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Emit HTML highlighting markup around keywords, names, literals and comments.
    pub annotate: bool,
    /// Delimiters for arrays that do not record their own syntax.
    pub array_syntax: ArraySyntax,
    /// Classify string literals that look like hook, theme or callback names.
    pub target_style: bool,
}

impl StyleConfig {
    pub fn new() -> Self {
        Self {
            annotate: false,
            array_syntax: ArraySyntax::Short,
            target_style: true,
        }
    }

    pub fn with_annotate(self, annotate: bool) -> Self {
        Self { annotate, ..self }
    }

    pub fn with_array_syntax(self, array_syntax: ArraySyntax) -> Self {
        Self {
            array_syntax,
            ..self
        }
    }

    pub fn with_target_style(self, target_style: bool) -> Self {
        Self {
            target_style,
            ..self
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Original tree and tokens captured when a printer is built for reprinting.
#[derive(Debug, Clone, Default)]
pub struct OriginalSnapshot {
    pub stmts: Vec<Stmt>,
    pub tokens: Vec<Token>,
}

/// Token-preserving reprinter. Implementations copy unchanged spans of the
/// original token stream and hand changed subtrees to `renderer`.
pub trait FormatPreservingEngine {
    fn reprint(
        &self,
        current: &[Stmt],
        original: &[Stmt],
        tokens: &[Token],
        renderer: &mut NodeRenderer,
    ) -> Result<String>;
}
