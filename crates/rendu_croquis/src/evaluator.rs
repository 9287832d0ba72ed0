//! Structural decomposition of render expressions into candidates.
//!
//! A candidate is one concrete thing an expression may render. Conditionals
//! and logical operators fork, list calls flatten into their callback
//! returns, and transparent components are looked through into the values
//! of their pass-through props.

use std::fmt;

use rendu_carton::FxHashSet;
use rendu_relief::{ElementExpr, LiteralKind, LogicalOperator, RenderExpr, Span};

use crate::annotation::TransparencyDescriptor;
use crate::identity::{ComponentRef, RefKey};
use crate::resolver::IdentityResolver;
use crate::transparency::TransparencyRegistry;

/// What a candidate is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    Component(ComponentRef),
    Fragment,
    /// `null`, `undefined`, `false`, or an absent operand
    Nullish,
    /// A shape the evaluator does not model
    Unknown,
}

impl CandidateKind {
    #[inline]
    pub fn component(&self) -> Option<&ComponentRef> {
        match self {
            Self::Component(component) => Some(component),
            _ => None,
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(component) => write!(f, "<{}>", component.name),
            Self::Fragment => f.write_str("a fragment"),
            Self::Nullish => f.write_str("nothing"),
            Self::Unknown => f.write_str("an unrecognized expression"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub span: Span,
}

impl Candidate {
    #[inline]
    pub const fn new(kind: CandidateKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Name resolution and transparency lookups for one analyzed file.
pub trait EvalEnv {
    /// Reference for a JSX tag name as written.
    fn resolve_element(&self, name: &str) -> ComponentRef;

    /// Pass-through props when `component` is transparent.
    fn passthrough_props(&self, component: &ComponentRef) -> Option<TransparencyDescriptor>;
}

/// [`EvalEnv`] backed by a resolver and a transparency registry.
pub struct ResolvedEnv<'a> {
    resolver: &'a IdentityResolver<'a>,
    registry: &'a TransparencyRegistry<'a>,
    file: &'a str,
}

impl<'a> ResolvedEnv<'a> {
    pub fn new(
        resolver: &'a IdentityResolver<'a>,
        registry: &'a TransparencyRegistry<'a>,
        file: &'a str,
    ) -> Self {
        Self {
            resolver,
            registry,
            file,
        }
    }
}

impl EvalEnv for ResolvedEnv<'_> {
    fn resolve_element(&self, name: &str) -> ComponentRef {
        self.resolver.element_ref(self.file, name)
    }

    fn passthrough_props(&self, component: &ComponentRef) -> Option<TransparencyDescriptor> {
        self.registry.passthrough_props(component)
    }
}

/// Decompose `expr` into its render candidates.
///
/// Transparent unwrapping is bounded by `max_depth`; an element that would
/// exceed it yields `Unknown`.
pub fn extract_candidates(expr: &RenderExpr, env: &dyn EvalEnv, max_depth: usize) -> Vec<Candidate> {
    let mut evaluator = Evaluator {
        env,
        max_depth,
        visited: FxHashSet::default(),
        out: Vec::new(),
    };
    evaluator.expr(expr, 0);
    evaluator.out
}

struct Evaluator<'e> {
    env: &'e dyn EvalEnv,
    max_depth: usize,
    visited: FxHashSet<(RefKey, u32)>,
    out: Vec<Candidate>,
}

impl Evaluator<'_> {
    fn push(&mut self, kind: CandidateKind, span: Span) {
        self.out.push(Candidate::new(kind, span));
    }

    fn expr(&mut self, expr: &RenderExpr, depth: usize) {
        match expr {
            RenderExpr::Element(element) => self.element(element, depth),
            RenderExpr::Fragment(fragment) => self.push(CandidateKind::Fragment, fragment.span),
            RenderExpr::Conditional(cond) => {
                self.operand(&cond.consequent, depth);
                self.operand(&cond.alternate, depth);
            }
            RenderExpr::Logical(logical) if logical.operator == LogicalOperator::And => {
                self.operand(&logical.left, depth);
                self.operand(&logical.right, depth);
            }
            // `label || <Header />` renders `label` itself whenever it is kept
            RenderExpr::Logical(logical) => {
                self.expr(&logical.left, depth);
                self.expr(&logical.right, depth);
            }
            RenderExpr::Call(call) => {
                for ret in &call.returns {
                    self.expr(ret, depth);
                }
            }
            RenderExpr::Literal(lit) if lit.kind.is_nullish() => {
                self.push(CandidateKind::Nullish, lit.span)
            }
            RenderExpr::Literal(lit) => self.push(CandidateKind::Unknown, lit.span),
            RenderExpr::Other(span) => self.push(CandidateKind::Unknown, *span),
        }
    }

    /// Branch operands that cannot render (`isOpen` in `isOpen && <Panel />`)
    /// contribute nothing.
    fn operand(&mut self, expr: &RenderExpr, depth: usize) {
        if expr.is_render_shape() {
            self.expr(expr, depth);
        } else {
            self.push(CandidateKind::Nullish, expr.span());
        }
    }

    fn element(&mut self, element: &ElementExpr, depth: usize) {
        let component = self.env.resolve_element(&element.name);
        let Some(descriptor) = self.env.passthrough_props(&component) else {
            self.push(CandidateKind::Component(component), element.span);
            return;
        };

        if depth >= self.max_depth {
            tracing::trace!(name = %element.name, depth, "transparent depth exceeded");
            self.push(CandidateKind::Unknown, element.span);
            return;
        }
        if !self.visited.insert((component.key(), element.span.start)) {
            self.push(CandidateKind::Unknown, element.span);
            return;
        }

        let before = self.out.len();
        for prop in descriptor.props() {
            if prop == "children" {
                for child in &element.children {
                    self.expr(child, depth + 1);
                }
            }
            if let Some(attr) = element.attribute(prop) {
                match &attr.value {
                    Some(value) => self.expr(value, depth + 1),
                    // `<Slot content />` passes `true`
                    None => self.push(CandidateKind::Unknown, attr.span),
                }
            }
        }
        if self.out.len() == before {
            self.push(CandidateKind::Nullish, element.span);
        }
    }
}
