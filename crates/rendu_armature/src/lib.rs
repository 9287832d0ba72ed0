//! # rendu_armature
//!
//! Armature - The structural framework Rendu's analysis is built on.
//!
//! ## Name Origin
//!
//! An **armature** is the wire skeleton a sculptor builds before adding
//! clay. `rendu_armature` parses JavaScript/TypeScript modules with OXC and
//! lowers them into the [`ModuleSummary`] skeleton the checker works on.
//!
//! ## Example
//!
//! ```
//! use rendu_armature::parse_module;
//! use rendu_relief::RenderTypesOptions;
//!
//! let source = r#"
//! /** @renders {MenuItem} */
//! export function Item() {
//!   return <MenuItem />;
//! }
//! "#;
//! let module = parse_module("src/Item.tsx", source, &RenderTypesOptions::default()).unwrap();
//! assert_eq!(module.components.len(), 1);
//! assert!(module.components[0].doc.is_some());
//! ```

mod comments;
mod expr;
mod lower;

pub use comments::DocCommentIndex;

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use rendu_carton::{path::normalize_path, CompactString};
use rendu_relief::{ModuleSummary, RenderTypesOptions};

/// Errors raised while lowering a module.
#[derive(Debug, thiserror::Error)]
pub enum ArmatureError {
    /// The path does not name a JavaScript or TypeScript module.
    #[error("unsupported module extension: {path}")]
    UnsupportedExtension { path: CompactString },

    /// The parser could not recover.
    #[error("failed to parse {path}: {message}")]
    Parse { path: CompactString, message: String },
}

/// Parse and lower one module.
///
/// Recoverable syntax errors are logged and the partial tree is still
/// lowered; only an unrecoverable parse fails.
pub fn parse_module(
    path: &str,
    source: &str,
    options: &RenderTypesOptions,
) -> Result<ModuleSummary, ArmatureError> {
    let path = normalize_path(path);
    let source_type =
        SourceType::from_path(path.as_str()).map_err(|_| ArmatureError::UnsupportedExtension {
            path: path.clone(),
        })?;

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked {
        let message = ret
            .errors
            .first()
            .map(|error| error.to_string())
            .unwrap_or_else(|| "unrecoverable syntax error".to_string());
        return Err(ArmatureError::Parse { path, message });
    }
    if !ret.errors.is_empty() {
        tracing::debug!(
            path = %path,
            errors = ret.errors.len(),
            "lowering module with recoverable syntax errors"
        );
    }

    let module = lower::Lowerer::new(&path, source, options).lower(&ret.program);
    tracing::trace!(
        path = %module.path,
        components = module.components.len(),
        elements = module.elements.len(),
        "lowered module"
    );
    Ok(module)
}
