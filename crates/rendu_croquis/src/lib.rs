//! # rendu_croquis
//!
//! Croquis - The render-type analysis layer for Rendu.
//!
//! ## Name Origin
//!
//! **Croquis** (/kʁɔ.ki/) is a French term for a quick, sketchy drawing that
//! captures the essential features of a subject. `rendu_croquis` sketches
//! what each component can ultimately render, without executing anything.
//!
//! ## Purpose
//!
//! - **Annotations**: Parse `@renders` and `@transparent` from doc comments
//! - **Identity Resolution**: Follow imports, aliases and re-exports to the declaring file
//! - **Render Graph**: Resolved render declarations per component
//! - **Candidates**: Decompose returned JSX into the components it may render
//! - **Reachability**: Walk render chains to check candidates against declarations
//!
//! ## Architecture
//!
//! ```text
//! rendu_armature (Parse + lower)
//!        ↓
//!   rendu_relief (Module model)
//!        ↓
//!  rendu_croquis (Render-type analysis)  ← This crate
//!        ↓
//!   rendu_patina (Lint rules)
//! ```
//!
//! ## Example
//!
//! ```
//! use rendu_croquis::{Project, ResolutionContext};
//! use rendu_relief::RenderTypesOptions;
//!
//! let mut project = Project::new(RenderTypesOptions::default());
//! project
//!     .add_source(
//!         "src/App.tsx",
//!         r#"
//! function Header() { return <h1 />; }
//! function Footer() { return <footer />; }
//!
//! /** @renders {Header} */
//! function MyHeader() { return <Footer />; }
//! "#,
//!     )
//!     .unwrap();
//!
//! let context = ResolutionContext::new();
//! let analysis = project.analyzer(&context).analyze_file("src/App.tsx").unwrap();
//! assert_eq!(analysis.return_violations.len(), 1);
//! ```

// Core modules
pub mod annotation;
pub mod context;
pub mod identity;
pub mod resolver;

// Analysis modules
pub mod analysis;
pub mod check;
pub mod evaluator;
pub mod graph;
pub mod project;
pub mod reachability;
pub mod transparency;

#[cfg(test)]
mod test_utils;

pub use analysis::{FileAnalysis, PropViolation, RenderAnalyzer, ReturnViolation};
pub use annotation::{
    lint_annotation_syntax, locate_renders, parse_renders, parse_transparent, AnnotationIssue,
    AnnotationIssueKind, RenderModifier, RendersAnnotation, TransparencyDescriptor,
};
pub use check::{check_candidate, check_candidates, CandidateVerdict, RenderViolation};
pub use context::ResolutionContext;
pub use evaluator::{extract_candidates, Candidate, CandidateKind, EvalEnv, ResolvedEnv};
pub use graph::{
    build_resolved_render_graph, ComponentEntry, FileRenderGraph, PropContract, RenderGraph,
    RenderLookup, ResolvedLookup,
};
pub use identity::{ComponentIdentity, ComponentRef, Comparison, RefKey, RenderTarget, RendersDeclaration};
pub use project::Project;
pub use reachability::{can_render, find_render_chain};
pub use resolver::{IdentityResolver, ModuleHost, MAX_ALIAS_HOPS};
pub use transparency::TransparencyRegistry;
