//! # rendu_relief
//!
//! Relief - The module surface Rendu analyzes.
//!
//! ## Name Origin
//!
//! A **relief** is a sculpture raised from a flat background: only the
//! shapes that matter stand out. `rendu_relief` keeps only the parts of a
//! JavaScript/TypeScript module that render-type checking needs: imports,
//! exports, component declarations with their documentation comments, and
//! the recognized shapes of the expressions they return.
//!
//! ## Architecture
//!
//! ```text
//! rendu_armature (Parse + lower)
//!        ↓
//!   rendu_relief (Module model)  ← This crate
//!        ↓
//!  rendu_croquis (Resolution + reachability)
//!        ↓
//!   rendu_patina (Lint rules)
//! ```
//!
//! Everything here is plain owned data, so a host can also build summaries
//! directly from its own syntax tree.

pub mod ast;
pub mod options;

pub use ast::*;
pub use options::{OptionsError, RenderTypesOptions, TransparentComponentOption, DEFAULT_MAX_DEPTH};
