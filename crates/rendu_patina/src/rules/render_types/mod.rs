//! `render-types/*` rules.
//!
//! - `render-types/valid-render-return` - Returned JSX must satisfy the component's `@renders`
//! - `render-types/valid-render-prop` - Props declared with `@renders` must receive matching JSX
//! - `render-types/valid-renders-jsdoc` - Catch almost-correct `@renders` / `@transparent` tags

mod valid_render_prop;
mod valid_render_return;
mod valid_renders_jsdoc;

pub use valid_render_prop::ValidRenderProp;
pub use valid_render_return::ValidRenderReturn;
pub use valid_renders_jsdoc::ValidRendersJsdoc;

use rendu_croquis::{CandidateKind, RenderModifier, RenderViolation, RendersAnnotation};

/// The declaration rewritten with another modifier, for help texts.
fn with_modifier(violation: &RenderViolation, modifier: RenderModifier, unchecked: bool) -> String {
    let targets = violation.expected.targets.iter().map(|target| target.name.clone());
    RendersAnnotation::new(targets, modifier, unchecked).to_string()
}

/// Help text explaining how the violation could be resolved.
pub(crate) fn violation_help(violation: &RenderViolation) -> String {
    let expected = violation.expected.target_names();
    match &violation.found {
        CandidateKind::Component(found) => match &violation.found_renders {
            Some(renders) => format!(
                "<{}> renders {}, which never reaches {}",
                found.name,
                renders.target_names(),
                expected
            ),
            None => format!(
                "<{}> has no `@renders` declaration; annotate it with `@renders {{{}}}` if it always renders {}",
                found.name, expected, expected
            ),
        },
        CandidateKind::Nullish => format!(
            "Use `{}` if rendering nothing is intended",
            with_modifier(violation, RenderModifier::Optional, false)
        ),
        CandidateKind::Fragment => format!(
            "Use `{}` to allow fragments",
            with_modifier(violation, RenderModifier::Many, false)
        ),
        CandidateKind::Unknown => format!(
            "Return JSX directly, or opt out of checking with `{}`",
            with_modifier(violation, violation.expected.modifier, true)
        ),
    }
}

#[cfg(test)]
pub(crate) fn lint_with(
    rule: Box<dyn crate::rule::Rule>,
    files: &[(&str, &str)],
    path: &str,
) -> crate::linter::LintResult {
    use rendu_croquis::{Project, ResolutionContext};

    let mut registry = crate::rule::RuleRegistry::new();
    registry.register(rule);
    let mut project = Project::default();
    for (file, source) in files {
        project.add_source(file, source).unwrap();
    }
    let context = ResolutionContext::new();
    crate::linter::Linter::with_registry(registry)
        .lint_file(&project, &context, path)
        .unwrap()
}
