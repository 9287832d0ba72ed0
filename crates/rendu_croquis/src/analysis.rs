//! Per-file render-type analysis.
//!
//! Ties the pieces together for one file:
//!
//! 1. Build the resolved [`FileRenderGraph`]
//! 2. Evaluate every return expression of each annotated component
//! 3. Evaluate every JSX usage of components whose props declare `@renders`
//!
//! and collect the violations.

use rendu_carton::{CompactString, FilePath};
use rendu_relief::{ElementExpr, RenderExpr, Span};

use crate::check::{check_candidates, RenderViolation};
use crate::context::ResolutionContext;
use crate::evaluator::{extract_candidates, Candidate, CandidateKind, ResolvedEnv};
use crate::graph::{build_resolved_render_graph, FileRenderGraph, PropContract, ResolvedLookup};
use crate::resolver::{IdentityResolver, ModuleHost};
use crate::transparency::TransparencyRegistry;

/// A return expression that breaks its component's `@renders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnViolation {
    pub component: CompactString,
    pub violation: RenderViolation,
}

/// A prop value (or children) that breaks the prop's `@renders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropViolation {
    /// Element name as written
    pub element: CompactString,
    pub prop: CompactString,
    pub violation: RenderViolation,
}

/// Analysis result for one file.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub file: FilePath,
    pub graph: FileRenderGraph,
    pub return_violations: Vec<ReturnViolation>,
    pub prop_violations: Vec<PropViolation>,
}

impl FileAnalysis {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.return_violations.is_empty() && self.prop_violations.is_empty()
    }

    #[inline]
    pub fn violation_count(&self) -> usize {
        self.return_violations.len() + self.prop_violations.len()
    }
}

/// Runs render-type analysis over the modules of a host.
pub struct RenderAnalyzer<'a> {
    resolver: IdentityResolver<'a>,
}

impl<'a> RenderAnalyzer<'a> {
    pub fn new(host: &'a dyn ModuleHost, context: &'a ResolutionContext) -> Self {
        Self {
            resolver: IdentityResolver::new(host, context),
        }
    }

    #[inline]
    pub fn resolver(&self) -> &IdentityResolver<'a> {
        &self.resolver
    }

    /// Analyze `file`. `None` when the host has no such module.
    pub fn analyze_file(&self, file: &str) -> Option<FileAnalysis> {
        let module = self.resolver.host().module(file)?;
        let graph = build_resolved_render_graph(&self.resolver, file)?;
        let registry = TransparencyRegistry::for_file(&self.resolver, &graph);
        let env = ResolvedEnv::new(&self.resolver, &registry, file);
        let lookup = ResolvedLookup::new(&graph.graph, &self.resolver);
        let max_depth = self.resolver.options().max_depth;

        let mut return_violations = Vec::new();
        for entry in &graph.entries {
            let Some(renders) = entry.renders.as_ref().filter(|renders| !renders.unchecked) else {
                continue;
            };
            let Some(decl) = module.component(&entry.name) else {
                continue;
            };
            for ret in &decl.returns {
                let candidates = extract_candidates(ret, &env, max_depth);
                return_violations.extend(
                    check_candidates(&candidates, renders, &lookup, max_depth)
                        .into_iter()
                        .map(|violation| ReturnViolation {
                            component: entry.name.clone(),
                            violation,
                        }),
                );
            }
        }

        let mut prop_violations = Vec::new();
        for element in module.elements.iter().filter(|element| element.is_component()) {
            let component = self.resolver.element_ref(file, &element.name);
            let Some(identity) = &component.identity else {
                continue;
            };
            let contracts = self.resolver.prop_contracts(identity);
            for contract in contracts.iter() {
                let candidates = prop_candidates(element, contract, &env, max_depth);
                prop_violations.extend(
                    check_candidates(&candidates, &contract.declaration, &lookup, max_depth)
                        .into_iter()
                        .map(|violation| PropViolation {
                            element: element.name.clone(),
                            prop: contract.prop.clone(),
                            violation,
                        }),
                );
            }
        }

        tracing::debug!(
            file,
            returns = return_violations.len(),
            props = prop_violations.len(),
            "analyzed render types"
        );

        Some(FileAnalysis {
            file: FilePath::new(file),
            graph,
            return_violations,
            prop_violations,
        })
    }
}

/// Candidates of the value an element passes for `contract`'s prop.
fn prop_candidates(
    element: &ElementExpr,
    contract: &PropContract,
    env: &ResolvedEnv<'_>,
    max_depth: usize,
) -> Vec<Candidate> {
    let absent = |span: Span| vec![Candidate::new(CandidateKind::Nullish, span)];

    if let Some(attr) = element.attribute(&contract.prop) {
        return match &attr.value {
            Some(value) => extract_candidates(value, env, max_depth),
            None => vec![Candidate::new(CandidateKind::Unknown, attr.span)],
        };
    }
    if contract.prop != "children" {
        return absent(element.name_span);
    }
    if element.children.is_empty() {
        return absent(element.name_span);
    }
    element
        .children
        .iter()
        .flat_map(|child: &RenderExpr| extract_candidates(child, env, max_depth))
        .collect()
}
