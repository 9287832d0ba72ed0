//! Lint rules for render-type annotations.

pub mod render_types;
