//! render-types/valid-renders-jsdoc
//!
//! Report `@renders` and `@transparent` tags that are almost well-formed.
//! Such tags are otherwise ignored silently, leaving the component
//! unchecked.
//!
//! ## Examples
//!
//! ### Invalid
//! ```tsx
//! /** @renders Header */
//! /** @renders {header} */
//! /** @transparent {children */
//! ```
//!
//! ### Valid
//! ```tsx
//! /** @renders {Header} */
//! /** @transparent {children} */
//! ```

use rendu_croquis::lint_annotation_syntax;
use rendu_relief::ModuleSummary;

use crate::context::LintContext;
use crate::diagnostic::{Fix, LintDiagnostic, Severity, TextEdit};
use crate::rule::{Rule, RuleCategory, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "render-types/valid-renders-jsdoc",
    description: "Report malformed `@renders` and `@transparent` annotations",
    category: RuleCategory::Suggestion,
    fixable: true,
    default_severity: Severity::Warning,
};

pub struct ValidRendersJsdoc;

impl Rule for ValidRendersJsdoc {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn run_on_module(&self, ctx: &mut LintContext<'_>, module: &ModuleSummary) {
        for doc in &module.doc_comments {
            for issue in lint_annotation_syntax(&doc.text) {
                let range = issue.range.offset_by(doc.span.start);
                let mut diagnostic = LintDiagnostic::warn(META.name, issue.message(), range);
                if let Some(suggestion) = issue.suggestion {
                    diagnostic = diagnostic
                        .with_help(format!("Did you mean `{suggestion}`?"))
                        .with_fix(Fix::new(
                            format!("Replace with `{suggestion}`"),
                            TextEdit::replace(range, suggestion),
                        ));
                }
                ctx.report(diagnostic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::render_types::lint_with;

    fn lint(source: &str) -> crate::linter::LintResult {
        lint_with(Box::new(ValidRendersJsdoc), &[("src/App.tsx", source)], "src/App.tsx")
    }

    #[test]
    fn test_valid_annotations() {
        let result = lint(
            "/** @renders? {Header | Footer} */\nfunction A() { return null; }\n/** @transparent {content} */\nfunction B() { return null; }",
        );
        assert!(!result.has_diagnostics());
    }

    #[test]
    fn test_lowercase_target_is_fixable() {
        let source = "/** @renders* {item} */\nfunction List() { return null; }";
        let result = lint(source);
        assert_eq!(result.warning_count, 1);

        let diagnostic = &result.diagnostics[0];
        assert_eq!(diagnostic.message, "@renders target must be a capitalized component name");
        let fixed = diagnostic.fix.as_ref().unwrap().apply(source);
        assert_eq!(fixed, "/** @renders* {Item} */\nfunction List() { return null; }");
    }

    #[test]
    fn test_empty_braces_have_no_fix() {
        let result = lint("/** @renders {} */\nfunction Empty() { return null; }");
        assert_eq!(result.warning_count, 1);
        assert!(!result.diagnostics[0].has_fix());
        assert!(result.diagnostics[0].help.is_none());
    }
}
