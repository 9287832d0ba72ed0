//! Carton - The shared toolbox for Rendu.
//!
//! This crate provides the small set of utilities every other Rendu crate
//! reaches for: fast hash maps, compact strings, module path handling and
//! content hashing.
//!
//! # Modules
//!
//! - **path**: Normalization of module paths and resolution of relative specifiers
//! - **hash**: Content fingerprints for change detection
//! - **line_index**: Byte offset to line/column conversion for diagnostics
//!
//! # Example
//!
//! ```
//! use rendu_carton::path::{join_specifier, normalize_path};
//!
//! assert_eq!(normalize_path("src/./ui/../Header.tsx"), "src/Header.tsx");
//! assert_eq!(join_specifier("src/App.tsx", "./ui/Header"), "src/ui/Header");
//! ```

pub mod hash;
pub mod line_index;
pub mod path;

// Re-export compact_str::CompactString for convenience
pub use compact_str::{format_compact, CompactString, ToCompactString};

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

pub use line_index::LineIndex;

/// Normalized, forward-slash separated path of a source module.
pub type FilePath = CompactString;

/// Check whether a name starts with an ASCII uppercase letter.
///
/// Component names, and render targets, are required to be capitalized.
#[inline]
pub fn is_capitalized(name: &str) -> bool {
    name.as_bytes().first().is_some_and(u8::is_ascii_uppercase)
}
