//! render-types/valid-render-prop
//!
//! Require JSX passed to a prop (or as children) whose props-type member is
//! annotated with `@renders` to render one of the declared components.
//!
//! ## Examples
//!
//! ```tsx
//! interface MenuProps {
//!   /** @renders* {MenuItem} */
//!   children: ReactNode;
//! }
//! ```
//!
//! ### Invalid
//! ```tsx
//! <Menu><div /></Menu>
//! ```
//!
//! ### Valid
//! ```tsx
//! <Menu><MenuItem /><MenuItem /></Menu>
//! ```

use rendu_croquis::FileAnalysis;

use crate::context::LintContext;
use crate::diagnostic::{LintDiagnostic, Severity};
use crate::rule::{Rule, RuleCategory, RuleMeta};

use super::violation_help;

static META: RuleMeta = RuleMeta {
    name: "render-types/valid-render-prop",
    description: "Require JSX passed to `@renders` props to satisfy the declaration",
    category: RuleCategory::Correctness,
    fixable: false,
    default_severity: Severity::Error,
};

pub struct ValidRenderProp;

impl Rule for ValidRenderProp {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn run_on_analysis(&self, ctx: &mut LintContext<'_>, analysis: &FileAnalysis) {
        for prop in &analysis.prop_violations {
            let violation = &prop.violation;
            ctx.report(
                LintDiagnostic::error(
                    META.name,
                    format!(
                        "Invalid `{}` for <{}>: {}",
                        prop.prop,
                        prop.element,
                        violation.message()
                    ),
                    violation.span,
                )
                .with_help(violation_help(violation)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::render_types::lint_with;

    const MENU: &str = r#"
export interface MenuProps {
  /** @renders* {MenuItem} */
  children?: unknown;
  /** @renders? {MenuItem} */
  header?: unknown;
}

export function MenuItem() { return <li />; }

export function Menu(props: MenuProps) { return <ul />; }
"#;

    #[test]
    fn test_valid_props() {
        let app = r#"
import { Menu, MenuItem } from "./Menu";
export const App = () => <Menu header={<MenuItem />}><><MenuItem /></><MenuItem /></Menu>;
"#;
        let result = lint_with(
            Box::new(ValidRenderProp),
            &[("src/Menu.tsx", MENU), ("src/App.tsx", app)],
            "src/App.tsx",
        );
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_invalid_header_prop() {
        let app = r#"
import { Menu, MenuItem } from "./Menu";
export const App = () => <Menu header={<p />}><MenuItem /></Menu>;
"#;
        let result = lint_with(
            Box::new(ValidRenderProp),
            &[("src/Menu.tsx", MENU), ("src/App.tsx", app)],
            "src/App.tsx",
        );
        assert_eq!(result.error_count, 1);
        insta::assert_snapshot!(
            result.diagnostics[0].message.as_str(),
            @"Invalid `header` for <Menu>: Expected to render <MenuItem>, but found <p>"
        );
    }
}
