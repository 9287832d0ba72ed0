//! Checking candidates against a render declaration.

use rendu_carton::CompactString;
use rendu_relief::Span;

use crate::evaluator::{Candidate, CandidateKind};
use crate::graph::RenderLookup;
use crate::identity::RendersDeclaration;
use crate::reachability::find_render_chain;

/// A candidate the declaration does not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderViolation {
    pub span: Span,
    pub expected: RendersDeclaration,
    pub found: CandidateKind,
    /// Declaration of the found component, when it has one
    pub found_renders: Option<RendersDeclaration>,
}

impl RenderViolation {
    /// `Expected to render <Header>, but found <Footer>`
    pub fn message(&self) -> String {
        let expected: Vec<String> = self
            .expected
            .targets
            .iter()
            .map(|target| format!("<{}>", target.name))
            .collect();
        format!(
            "Expected to render {}, but found {}",
            expected.join(" or "),
            self.found
        )
    }
}

/// Verdict for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateVerdict {
    Accepted,
    /// Component accepted through this chain of `@renders` declarations
    AcceptedVia(Vec<CompactString>),
    Rejected,
}

/// Evaluate one candidate under `declaration`'s modifier.
pub fn check_candidate(
    candidate: &Candidate,
    declaration: &RendersDeclaration,
    lookup: &dyn RenderLookup,
    max_depth: usize,
) -> CandidateVerdict {
    match &candidate.kind {
        CandidateKind::Nullish if declaration.accepts_nullish() => CandidateVerdict::Accepted,
        CandidateKind::Fragment if declaration.accepts_fragment() => CandidateVerdict::Accepted,
        CandidateKind::Component(component) => {
            match find_render_chain(component, &declaration.targets, lookup, max_depth) {
                Some(chain) if chain.len() == 1 => CandidateVerdict::Accepted,
                Some(chain) => CandidateVerdict::AcceptedVia(
                    chain.into_iter().map(|component| component.name).collect(),
                ),
                None => CandidateVerdict::Rejected,
            }
        }
        _ => CandidateVerdict::Rejected,
    }
}

/// Every candidate `declaration` rejects. Unchecked declarations accept all.
pub fn check_candidates(
    candidates: &[Candidate],
    declaration: &RendersDeclaration,
    lookup: &dyn RenderLookup,
    max_depth: usize,
) -> Vec<RenderViolation> {
    if declaration.unchecked {
        return Vec::new();
    }

    candidates
        .iter()
        .filter(|candidate| {
            check_candidate(candidate, declaration, lookup, max_depth) == CandidateVerdict::Rejected
        })
        .map(|candidate| RenderViolation {
            span: candidate.span,
            expected: declaration.clone(),
            found: candidate.kind.clone(),
            found_renders: candidate
                .kind
                .component()
                .and_then(|component| lookup.renders_of(component)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::RenderModifier;
    use crate::graph::RenderGraph;
    use crate::identity::{ComponentIdentity, ComponentRef};
    use rendu_carton::SmallVec;

    fn component(name: &str) -> ComponentRef {
        ComponentRef::new(
            name,
            Some(ComponentIdentity::new(format!("src/{name}.tsx"), name)),
            "src/App.tsx",
        )
    }

    fn declaration(targets: &[&str], modifier: RenderModifier) -> RendersDeclaration {
        RendersDeclaration {
            targets: targets.iter().map(|name| component(name)).collect::<SmallVec<_>>(),
            modifier,
            unchecked: false,
            span: Span::EMPTY,
        }
    }

    fn candidate(kind: CandidateKind) -> Candidate {
        Candidate::new(kind, Span::new(10, 20))
    }

    fn accepted(kind: CandidateKind, modifier: RenderModifier) -> bool {
        let graph = RenderGraph::new();
        check_candidates(
            &[candidate(kind)],
            &declaration(&["Header"], modifier),
            &graph,
            10,
        )
        .is_empty()
    }

    #[test]
    fn test_modifiers() {
        use RenderModifier::*;

        assert!(!accepted(CandidateKind::Nullish, Required));
        assert!(accepted(CandidateKind::Nullish, Optional));
        assert!(accepted(CandidateKind::Nullish, Many));

        assert!(!accepted(CandidateKind::Fragment, Required));
        assert!(!accepted(CandidateKind::Fragment, Optional));
        assert!(accepted(CandidateKind::Fragment, Many));

        for modifier in [Required, Optional, Many] {
            assert!(!accepted(CandidateKind::Unknown, modifier));
            assert!(accepted(CandidateKind::Component(component("Header")), modifier));
            assert!(!accepted(CandidateKind::Component(component("Footer")), modifier));
        }
    }

    #[test]
    fn test_unchecked_accepts_everything() {
        let graph = RenderGraph::new();
        let mut declaration = declaration(&["Header"], RenderModifier::Required);
        declaration.unchecked = true;
        let candidates = [
            candidate(CandidateKind::Unknown),
            candidate(CandidateKind::Component(component("Footer"))),
        ];
        assert!(check_candidates(&candidates, &declaration, &graph, 10).is_empty());
    }

    #[test]
    fn test_violation_per_rejected_candidate() {
        let mut graph = RenderGraph::new();
        graph.insert(
            &component("MyHeader"),
            declaration(&["Header"], RenderModifier::Required),
        );
        let declaration = declaration(&["Header"], RenderModifier::Required);
        let candidates = [
            candidate(CandidateKind::Component(component("MyHeader"))),
            candidate(CandidateKind::Component(component("Footer"))),
            candidate(CandidateKind::Nullish),
        ];

        let verdict = check_candidate(&candidates[0], &declaration, &graph, 10);
        assert_eq!(
            verdict,
            CandidateVerdict::AcceptedVia(vec!["MyHeader".into(), "Header".into()])
        );

        let violations = check_candidates(&candidates, &declaration, &graph, 10);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].found_renders.is_none());
        insta::assert_snapshot!(violations[0].message(), @"Expected to render <Header>, but found <Footer>");
        insta::assert_snapshot!(violations[1].message(), @"Expected to render <Header>, but found nothing");
    }
}
