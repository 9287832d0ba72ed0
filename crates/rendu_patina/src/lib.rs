//! # rendu_patina
//!
//! Patina - The render-type linter for Rendu.
//! Reports broken `@renders` contracts in JSX components.
//!
//! ## Name Origin
//!
//! **Patina** (/ˈpætɪnə/) refers to the greenish layer that forms on copper,
//! bronze, and similar metals through oxidation over time. In art and antiques,
//! patina is valued as a sign of authenticity. `rendu_patina` examines what a
//! component actually renders to confirm it is what its annotation claims.
//!
//! ## Features
//!
//! - Rich diagnostic output with code snippets and suggestions (like oxlint)
//! - Compact and JSON output with line/column positions
//! - Auto-fixes for almost-correct annotations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rendu_croquis::Project;
//! use rendu_patina::{format_results, Linter, OutputFormat};
//!
//! let mut project = Project::default();
//! project.add_source("src/App.tsx", source)?;
//!
//! let (results, summary) = Linter::new().lint_project(&project);
//! if summary.has_errors() {
//!     let sources = [("src/App.tsx".to_string(), source.to_string())];
//!     println!("{}", format_results(&results, &sources, OutputFormat::Text));
//! }
//! ```
//!
//! ## Rules
//!
//! ### Correctness Rules
//! - `render-types/valid-render-return` - Require returned JSX to satisfy the component's `@renders`
//! - `render-types/valid-render-prop` - Require JSX passed to `@renders` props to satisfy the declaration
//!
//! ### Suggestion Rules
//! - `render-types/valid-renders-jsdoc` - Report malformed `@renders` / `@transparent` annotations (fixable)

pub mod context;
pub mod diagnostic;
pub mod linter;
pub mod output;
pub mod rule;
pub mod rules;

pub use context::LintContext;
pub use diagnostic::{Fix, Label, LintDiagnostic, LintSummary, Severity, TextEdit};
pub use linter::{LintResult, Linter};
pub use output::{format_results, format_summary, OutputFormat};
pub use rule::{Rule, RuleCategory, RuleMeta, RuleRegistry};

use rendu_croquis::Project;

/// Lint every module of `project` with the recommended rules.
#[inline]
pub fn lint_project(project: &Project) -> (Vec<LintResult>, LintSummary) {
    Linter::new().lint_project(project)
}
