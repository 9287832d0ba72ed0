//! Lint context for rule execution.

use rendu_carton::CompactString;
use rendu_relief::Span;
use rustc_hash::FxHashSet;

use crate::diagnostic::{LintDiagnostic, Severity};

/// Per-file context handed to every rule.
pub struct LintContext<'a> {
    /// Normalized path of the file being linted
    pub filename: &'a str,
    /// Current rule name (set by the linter before calling rule hooks)
    pub current_rule: &'static str,
    diagnostics: Vec<LintDiagnostic>,
    /// Rules allowed to report (`None` = all)
    enabled_rules: Option<&'a FxHashSet<String>>,
    error_count: usize,
    warning_count: usize,
}

impl<'a> LintContext<'a> {
    const INITIAL_DIAGNOSTICS_CAPACITY: usize = 8;

    #[inline]
    pub fn new(filename: &'a str) -> Self {
        Self {
            filename,
            current_rule: "",
            diagnostics: Vec::with_capacity(Self::INITIAL_DIAGNOSTICS_CAPACITY),
            enabled_rules: None,
            error_count: 0,
            warning_count: 0,
        }
    }

    /// Restrict reporting to the named rules.
    #[inline]
    pub fn set_enabled_rules(&mut self, rules: Option<&'a FxHashSet<String>>) {
        self.enabled_rules = rules;
    }

    #[inline]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.enabled_rules.map_or(true, |rules| rules.contains(rule_name))
    }

    /// Report a lint diagnostic
    #[inline]
    pub fn report(&mut self, diagnostic: LintDiagnostic) {
        if !self.is_rule_enabled(diagnostic.rule_name) {
            return;
        }
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    /// Report an error for the current rule
    #[inline]
    pub fn error(&mut self, message: impl Into<CompactString>, span: Span) {
        self.report(LintDiagnostic::error(self.current_rule, message, span));
    }

    /// Report a warning for the current rule
    #[inline]
    pub fn warn(&mut self, message: impl Into<CompactString>, span: Span) {
        self.report(LintDiagnostic::warn(self.current_rule, message, span));
    }

    #[inline]
    pub fn diagnostics(&self) -> &[LintDiagnostic] {
        &self.diagnostics
    }

    /// Diagnostics ordered by position
    pub fn into_diagnostics(mut self) -> Vec<LintDiagnostic> {
        self.diagnostics.sort_by_key(|diagnostic| (diagnostic.start, diagnostic.end));
        self.diagnostics
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }
}
