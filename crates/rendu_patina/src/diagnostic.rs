//! Diagnostic types for rendu_patina.
//!
//! Uses `CompactString` for efficient small string storage.

use oxc_diagnostics::OxcDiagnostic;
use oxc_span::Span as OxcSpan;
use rendu_carton::CompactString;
use rendu_relief::Span;
use serde::Serialize;

/// Lint diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A single text replacement in the source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    /// Start byte offset
    pub start: u32,
    /// End byte offset
    pub end: u32,
    /// Replacement text
    #[serde(rename = "newText")]
    pub new_text: String,
}

impl TextEdit {
    #[inline]
    pub fn new(start: u32, end: u32, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }

    /// Replace the text covered by `span`.
    #[inline]
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self::new(span.start, span.end, text)
    }
}

/// A fix for a diagnostic, containing one or more text edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    /// Description of the fix
    pub message: String,
    pub edits: Vec<TextEdit>,
}

impl Fix {
    /// Create a new fix with a single edit
    #[inline]
    pub fn new(message: impl Into<String>, edit: TextEdit) -> Self {
        Self {
            message: message.into(),
            edits: vec![edit],
        }
    }

    /// Apply the fix to a source string
    pub fn apply(&self, source: &str) -> String {
        let mut result = source.to_string();
        // Apply edits in reverse order to preserve offsets
        let mut edits = self.edits.clone();
        edits.sort_by(|a, b| b.start.cmp(&a.start));

        for edit in edits {
            let start = edit.start as usize;
            let end = edit.end as usize;
            if start <= end && end <= result.len() {
                result.replace_range(start..end, &edit.new_text);
            }
        }
        result
    }
}

/// Additional label for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub message: CompactString,
    pub start: u32,
    pub end: u32,
}

/// A lint diagnostic with rich information for display.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// Rule that triggered this diagnostic
    pub rule_name: &'static str,
    pub severity: Severity,
    pub message: CompactString,
    /// Start byte offset in source
    pub start: u32,
    /// End byte offset in source
    pub end: u32,
    /// Help message for fixing (optional)
    pub help: Option<CompactString>,
    /// Related locations in the same file
    pub labels: Vec<Label>,
    /// Auto-fix for this diagnostic (optional)
    pub fix: Option<Fix>,
}

impl LintDiagnostic {
    #[inline]
    fn new(rule_name: &'static str, severity: Severity, message: CompactString, span: Span) -> Self {
        Self {
            rule_name,
            severity,
            message,
            start: span.start,
            end: span.end,
            help: None,
            labels: Vec::new(),
            fix: None,
        }
    }

    /// Create a new error diagnostic
    #[inline]
    pub fn error(rule_name: &'static str, message: impl Into<CompactString>, span: Span) -> Self {
        Self::new(rule_name, Severity::Error, message.into(), span)
    }

    /// Create a new warning diagnostic
    #[inline]
    pub fn warn(rule_name: &'static str, message: impl Into<CompactString>, span: Span) -> Self {
        Self::new(rule_name, Severity::Warning, message.into(), span)
    }

    #[inline]
    pub fn with_help(mut self, help: impl Into<CompactString>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[inline]
    pub fn with_label(mut self, message: impl Into<CompactString>, span: Span) -> Self {
        self.labels.push(Label {
            message: message.into(),
            start: span.start,
            end: span.end,
        });
        self
    }

    #[inline]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    #[inline]
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Convert to OxcDiagnostic for rich rendering
    pub fn into_oxc_diagnostic(self) -> OxcDiagnostic {
        let mut diag = match self.severity {
            Severity::Error => OxcDiagnostic::error(self.message.to_string()),
            Severity::Warning => OxcDiagnostic::warn(self.message.to_string()),
        };

        diag = diag.with_label(OxcSpan::new(self.start, self.end));
        if let Some(help) = self.help {
            diag = diag.with_help(help.to_string());
        }
        for label in self.labels {
            diag = diag
                .and_label(OxcSpan::new(label.start, label.end).label(label.message.to_string()));
        }

        diag
    }
}

/// Summary of lint results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub file_count: usize,
}

impl LintSummary {
    #[inline]
    pub fn add(&mut self, diagnostic: &LintDiagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
