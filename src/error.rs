//! Error types for the B+Tree index.

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in this crate.
///
/// Construction is the only fallible tree operation; a lookup that finds
/// nothing and an insert that hits an existing entry are ordinary outcomes
/// communicated through return values, not errors. The `Io` variant is
/// produced only by the topology exporter when it fails to write its output
/// files, and leaves the in-memory tree untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested branching factor cannot form a valid B+Tree.
    ///
    /// An index node must hold at least one key even at minimum fanout,
    /// which requires `order >= 3`.
    #[error("branching factor must be at least 3, got {0}")]
    InvalidOrder(usize),

    /// Writing a topology export to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
