//! Rule trait and registry for lint rules.

use rendu_croquis::FileAnalysis;
use rendu_relief::ModuleSummary;

use crate::context::LintContext;
use crate::diagnostic::Severity;

/// Rule category for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    /// Render contracts that are broken
    Correctness,
    /// Annotations that are almost, but not quite, well-formed
    Suggestion,
}

/// Rule metadata
pub struct RuleMeta {
    /// Rule name (e.g., "render-types/valid-render-return")
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    /// Whether rule is auto-fixable
    pub fixable: bool,
    pub default_severity: Severity,
}

/// Rule trait for implementing lint rules
///
/// Each hook receives the file's [`LintContext`] for reporting diagnostics.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;

    /// Run on the lowered module (called once per file)
    #[allow(unused_variables)]
    fn run_on_module(&self, ctx: &mut LintContext<'_>, module: &ModuleSummary) {}

    /// Run on the file's render-type analysis (called once per file)
    #[allow(unused_variables)]
    fn run_on_analysis(&self, ctx: &mut LintContext<'_>, analysis: &FileAnalysis) {}
}

/// Registry holding all enabled lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Find a registered rule by name.
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|rule| rule.meta().name == name)
            .map(|rule| rule.as_ref())
    }

    /// Create registry with every built-in render-types rule.
    pub fn with_recommended() -> Self {
        let mut registry = Self::new();

        // Correctness (Error)
        registry.register(Box::new(crate::rules::render_types::ValidRenderReturn));
        registry.register(Box::new(crate::rules::render_types::ValidRenderProp));

        // Suggestions (Warning)
        registry.register(Box::new(crate::rules::render_types::ValidRendersJsdoc));

        registry
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_recommended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommended_rules() {
        let registry = RuleRegistry::with_recommended();
        let names: Vec<&str> = registry.rules().iter().map(|r| r.meta().name).collect();
        assert_eq!(
            names,
            [
                "render-types/valid-render-return",
                "render-types/valid-render-prop",
                "render-types/valid-renders-jsdoc",
            ]
        );

        let jsdoc = registry.get("render-types/valid-renders-jsdoc").unwrap();
        assert!(jsdoc.meta().fixable);
        assert_eq!(jsdoc.meta().default_severity, Severity::Warning);
        assert!(registry.get("render-types/unknown").is_none());
    }
}
