use tracing::debug;

use crate::error::Result;
use crate::parser::*;
use crate::renderer::components::Markup;
use crate::renderer::renders::NodeRenderer;
use crate::renderer::traits::*;

/// Opening tag emitted before every rendered unit.
pub const BOUNDARY: &str = "<?php";

struct Original {
    snapshot: OriginalSnapshot,
    engine: Box<dyn FormatPreservingEngine>,
}

/// Entry point for rendering whole files.
pub struct Printer {
    renderer: NodeRenderer,
    original: Option<Original>,
}

impl Printer {
    pub fn new(config: StyleConfig) -> Self {
        Self {
            renderer: NodeRenderer::new(config),
            original: None,
        }
    }

    /// Printer that can reprint `snapshot` through `engine`, keeping the
    /// original text of unchanged statements.
    pub fn with_original(
        config: StyleConfig,
        snapshot: OriginalSnapshot,
        engine: Box<dyn FormatPreservingEngine>,
    ) -> Self {
        Self {
            renderer: NodeRenderer::new(config),
            original: Some(Original { snapshot, engine }),
        }
    }

    pub fn config(&self) -> &StyleConfig {
        self.renderer.config()
    }

    pub fn render(&mut self, stmts: &[Stmt]) -> Result<String> {
        debug!(statements = stmts.len(), annotate = self.config().annotate, "rendering unit");
        self.renderer.reset();
        let body = self.renderer.render_stmts(stmts)?;

        let boundary = if self.config().annotate {
            Markup::wrap("boundary", &Markup::escape(BOUNDARY))
        } else {
            BOUNDARY.to_string()
        };

        let body = body.trim_start_matches('\n');
        if body.is_empty() {
            return Ok(format!("{}\n", boundary));
        }
        Ok(format!("{}\n\n{}\n", boundary, body))
    }

    /// Reprints `current` against the captured original, falling back to a
    /// full render when no original was captured.
    pub fn render_preserving_format(&mut self, current: &[Stmt]) -> Result<String> {
        let Some(original) = &self.original else {
            debug!("no original snapshot, rendering from scratch");
            return self.render(current);
        };

        self.renderer.reset();
        let output = original.engine.reprint(
            current,
            &original.snapshot.stmts,
            &original.snapshot.tokens,
            &mut self.renderer,
        )?;
        self.renderer.state().ensure_balanced()?;
        debug!(bytes = output.len(), "reprinted unit");
        Ok(output)
    }
}
