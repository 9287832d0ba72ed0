//! render-types/valid-render-return
//!
//! Require every return of a component annotated with `@renders` to render
//! one of the declared components.
//!
//! ## Examples
//!
//! ### Invalid
//! ```tsx
//! /** @renders {Header} */
//! function MyHeader() {
//!   return <Footer />;
//! }
//! ```
//!
//! ### Valid
//! ```tsx
//! /** @renders {Header} */
//! function MyHeader() {
//!   return <Header />;
//! }
//! ```

use rendu_croquis::FileAnalysis;

use crate::context::LintContext;
use crate::diagnostic::{LintDiagnostic, Severity};
use crate::rule::{Rule, RuleCategory, RuleMeta};

use super::violation_help;

static META: RuleMeta = RuleMeta {
    name: "render-types/valid-render-return",
    description: "Require returned JSX to satisfy the component's `@renders` declaration",
    category: RuleCategory::Correctness,
    fixable: false,
    default_severity: Severity::Error,
};

pub struct ValidRenderReturn;

impl Rule for ValidRenderReturn {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn run_on_analysis(&self, ctx: &mut LintContext<'_>, analysis: &FileAnalysis) {
        for ret in &analysis.return_violations {
            let violation = &ret.violation;
            ctx.report(
                LintDiagnostic::error(META.name, violation.message(), violation.span)
                    .with_help(violation_help(violation))
                    .with_label(
                        format!("`{}` declares its render type here", ret.component),
                        violation.expected.span,
                    ),
            );
        }
    }
}
