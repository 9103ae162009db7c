use thiserror::Error;

/// Fatal rendering failures. A failed render produces no output at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The tree contains a node kind this renderer has no rendering for.
    #[error("unsupported {kind} node: no rendering is defined for it")]
    UnsupportedNode { kind: &'static str },

    /// Push/pop pairing of the render state was broken.
    #[error("render state invariant violated: {0}")]
    StateInvariant(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
