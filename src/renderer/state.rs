use std::ops::{Deref, DerefMut};

use tracing::error;

use crate::error::{RenderError, Result};
use crate::renderer::renders::NodeRenderer;

/// One indentation unit.
pub const INDENT: &str = "  ";

/// Current indentation depth and the newline-plus-indent string that
/// separates statements at that depth.
#[derive(Debug, Clone)]
pub struct Indentation {
    level: usize,
    newline: String,
}

impl Indentation {
    pub fn new() -> Self {
        Self {
            level: 0,
            newline: "\n".to_string(),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Newline followed by the indentation of the current level.
    pub fn newline(&self) -> &str {
        &self.newline
    }

    /// Indentation of the current level without the newline.
    pub fn prefix(&self) -> &str {
        &self.newline[1..]
    }

    pub fn width(&self) -> usize {
        self.newline.len() - 1
    }

    pub fn indent(&mut self) {
        self.level += 1;
        self.newline.push_str(INDENT);
    }

    pub fn outdent(&mut self) -> Result<()> {
        if self.level == 0 {
            return Err(RenderError::StateInvariant(
                "outdent below indentation level zero".to_string(),
            ));
        }
        self.level -= 1;
        self.newline.truncate(self.newline.len() - INDENT.len());
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Indentation {
    fn default() -> Self {
        Self::new()
    }
}

/// An active call whose argument list is being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// Literal call name; `None` for dynamic call targets.
    pub name: Option<String>,
    /// 1-based position of the argument being rendered, 0 before the first.
    pub argument: usize,
}

/// Array-entry context of the value being rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayContext {
    pub in_value: bool,
    /// Key of the enclosing entry when it was a string literal.
    pub key: Option<String>,
}

/// Mutable traversal state consulted by contextual classification.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    calls: Vec<CallFrame>,
    pub(crate) array: ArrayContext,
    pub(crate) in_literal_text: bool,
    pub(crate) last_literal: Option<String>,
    /// First scope restore that failed since the last reset.
    poisoned: Option<String>,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_call(&mut self, name: Option<String>) {
        self.calls.push(CallFrame { name, argument: 0 });
    }

    pub fn pop_call(&mut self) -> Result<CallFrame> {
        self.calls.pop().ok_or_else(|| {
            RenderError::StateInvariant("popped an empty call-name stack".to_string())
        })
    }

    /// Marks the innermost call as rendering its `position`-th argument.
    pub fn set_argument(&mut self, position: usize) {
        if let Some(frame) = self.calls.last_mut() {
            frame.argument = position;
        }
    }

    pub fn current_call(&self) -> Option<&CallFrame> {
        self.calls.last()
    }

    pub fn call_depth(&self) -> usize {
        self.calls.len()
    }

    pub fn in_array_value(&self) -> bool {
        self.array.in_value
    }

    pub fn array_key(&self) -> Option<&str> {
        self.array.key.as_deref()
    }

    pub fn in_literal_text(&self) -> bool {
        self.in_literal_text
    }

    pub fn last_literal(&self) -> Option<&str> {
        self.last_literal.as_deref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn poison(&mut self, err: &RenderError) {
        if self.poisoned.is_none() {
            self.poisoned = Some(err.to_string());
        }
    }

    /// Fails unless every scope opened during a render has been closed
    /// and restored cleanly.
    pub fn ensure_balanced(&self) -> Result<()> {
        if let Some(reason) = &self.poisoned {
            return Err(RenderError::StateInvariant(format!(
                "scope restore failed: {}",
                reason
            )));
        }
        if !self.calls.is_empty() {
            return Err(RenderError::StateInvariant(format!(
                "{} call frame(s) left open after render",
                self.calls.len()
            )));
        }
        if self.in_literal_text || self.array.in_value {
            return Err(RenderError::StateInvariant(
                "literal or array context left open after render".to_string(),
            ));
        }
        Ok(())
    }
}

enum Restore {
    Outdent,
    PopCall,
    Array(ArrayContext),
    LiteralText(bool),
}

/// Scoped change to the renderer's state, undone when the scope drops.
///
/// Derefs to the renderer so nested rendering goes through the scope; an
/// early `?` return still runs the restore.
pub struct Scope<'r> {
    renderer: &'r mut NodeRenderer,
    restore: Option<Restore>,
}

impl Deref for Scope<'_> {
    type Target = NodeRenderer;

    fn deref(&self) -> &NodeRenderer {
        self.renderer
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut NodeRenderer {
        self.renderer
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        let Some(restore) = self.restore.take() else {
            return;
        };
        let result = match restore {
            Restore::Outdent => self.renderer.indentation.outdent(),
            Restore::PopCall => self.renderer.state.pop_call().map(|_| ()),
            Restore::Array(saved) => {
                self.renderer.state.array = saved;
                Ok(())
            }
            Restore::LiteralText(saved) => {
                self.renderer.state.in_literal_text = saved;
                Ok(())
            }
        };
        if let Err(err) = result {
            error!(%err, "failed to restore render state");
            self.renderer.state.poison(&err);
        }
    }
}

impl NodeRenderer {
    /// One indentation level deeper for the lifetime of the scope.
    pub(crate) fn indented(&mut self) -> Scope<'_> {
        self.indentation.indent();
        Scope {
            renderer: self,
            restore: Some(Restore::Outdent),
        }
    }

    /// Pushes a call frame. The enclosing array-entry context stays
    /// visible to the arguments.
    pub(crate) fn enter_call(&mut self, name: Option<String>) -> Scope<'_> {
        self.state.push_call(name);
        Scope {
            renderer: self,
            restore: Some(Restore::PopCall),
        }
    }

    pub(crate) fn enter_array_value(&mut self, key: Option<String>) -> Scope<'_> {
        let saved = std::mem::replace(&mut self.state.array, ArrayContext { in_value: true, key });
        Scope {
            renderer: self,
            restore: Some(Restore::Array(saved)),
        }
    }

    pub(crate) fn enter_literal_text(&mut self) -> Scope<'_> {
        let saved = std::mem::replace(&mut self.state.in_literal_text, true);
        Scope {
            renderer: self,
            restore: Some(Restore::LiteralText(saved)),
        }
    }
}
