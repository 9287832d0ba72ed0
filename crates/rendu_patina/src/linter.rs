//! Main linter entry point.
//!
//! Runs every enabled rule over the modules of a [`Project`], first over the
//! lowered module and then over its render-type analysis.

use rendu_carton::FxHashSet;
use rendu_croquis::{ModuleHost, Project, ResolutionContext};

use crate::context::LintContext;
use crate::diagnostic::{LintDiagnostic, LintSummary};
use crate::rule::RuleRegistry;

/// Lint result for a single file
#[derive(Debug, Clone)]
pub struct LintResult {
    /// Filename that was linted
    pub filename: String,
    /// Collected diagnostics
    pub diagnostics: Vec<LintDiagnostic>,
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
}

impl LintResult {
    /// Check if there are any errors
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if there are any diagnostics
    #[inline]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Main linter struct.
pub struct Linter {
    registry: RuleRegistry,
    /// Optional set of enabled rule names (if None, all rules are enabled)
    enabled_rules: Option<FxHashSet<String>>,
}

impl Linter {
    /// Create a new linter with recommended rules
    #[inline]
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::with_recommended())
    }

    /// Create a linter with a custom rule registry
    #[inline]
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self {
            registry,
            enabled_rules: None,
        }
    }

    /// Set enabled rules (if None, all rules are enabled)
    ///
    /// Pass a list of rule names to enable only those rules.
    /// Rules not in the list will be skipped during linting.
    #[inline]
    pub fn with_enabled_rules(mut self, rules: Option<Vec<String>>) -> Self {
        self.enabled_rules = rules.map(|r| r.into_iter().collect());
        self
    }

    /// Check if a rule is enabled
    #[inline]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        match &self.enabled_rules {
            Some(set) => set.contains(rule_name),
            None => true,
        }
    }

    /// Lint one module of `project`. `None` when the project has no such
    /// module.
    pub fn lint_file(
        &self,
        project: &Project,
        context: &ResolutionContext,
        path: &str,
    ) -> Option<LintResult> {
        let module = project.module(path)?;
        let analysis = project.analyzer(context).analyze_file(path)?;

        let mut ctx = LintContext::new(path);
        ctx.set_enabled_rules(self.enabled_rules.as_ref());

        for rule in self.registry.rules() {
            let name = rule.meta().name;
            if !self.is_rule_enabled(name) {
                continue;
            }
            ctx.current_rule = name;
            rule.run_on_module(&mut ctx, module);
            rule.run_on_analysis(&mut ctx, &analysis);
        }

        let error_count = ctx.error_count();
        let warning_count = ctx.warning_count();
        let diagnostics = ctx.into_diagnostics();
        tracing::debug!(path, error_count, warning_count, "linted module");

        Some(LintResult {
            filename: path.to_string(),
            diagnostics,
            error_count,
            warning_count,
        })
    }

    /// Lint every module of `project` with a fresh resolution cache.
    pub fn lint_project(&self, project: &Project) -> (Vec<LintResult>, LintSummary) {
        let context = ResolutionContext::new();
        self.lint_project_with_context(project, &context)
    }

    /// Lint every module of `project`, sharing `context` across files
    /// (and across runs, until the caller resets it).
    pub fn lint_project_with_context(
        &self,
        project: &Project,
        context: &ResolutionContext,
    ) -> (Vec<LintResult>, LintSummary) {
        let paths = project.paths();
        let mut results = Vec::with_capacity(paths.len());
        let mut summary = LintSummary::default();

        for path in &paths {
            let Some(result) = self.lint_file(project, context, path) else {
                continue;
            };
            summary.error_count += result.error_count;
            summary.warning_count += result.warning_count;
            results.push(result);
        }

        summary.file_count = results.len();
        (results, summary)
    }

    /// Get the rule registry
    #[inline]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Get all registered rules
    #[inline]
    pub fn rules(&self) -> &[Box<dyn crate::rule::Rule>] {
        self.registry.rules()
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}
