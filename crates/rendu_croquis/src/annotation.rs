//! Render-type annotation parsing.
//!
//! Two tags are recognized inside documentation comments:
//!
//! - `@renders {Target}` with optional modifiers attached to the tag:
//!   `?` (optional), `*` (many) and `!` (unchecked). Several targets are
//!   separated by `|`.
//! - `@transparent` or `@transparent {prop, other}`.
//!
//! Parsing is strict: anything that is not well formed yields `None`.
//! [`lint_annotation_syntax`] reports the almost-correct forms separately,
//! each with a suggested replacement where one can be derived.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Match, Regex};
use rendu_carton::{CompactString, SmallVec};
use rendu_relief::Span;

const RENDERS: &str = "@renders";

static RENDERS_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@renders[?*!]*").expect("renders tag pattern is valid"));

static TRANSPARENT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@transparent").expect("transparent tag pattern is valid"));

/// Capitalized identifier with optional dotted member access (`Menu.Item`).
static TARGET_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("target name pattern is valid")
});

static PROP_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("prop name pattern is valid")
});

// =============================================================================
// Types
// =============================================================================

/// Multiplicity of a render declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderModifier {
    /// Exactly one matching component
    #[default]
    Required,
    /// A matching component or nothing (`?`)
    Optional,
    /// Any number of matching components, fragments included (`*`)
    Many,
}

impl RenderModifier {
    /// Modifier suffix as written after the tag.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Required => "",
            Self::Optional => "?",
            Self::Many => "*",
        }
    }
}

/// A parsed `@renders` annotation. Targets are raw names, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendersAnnotation {
    pub targets: SmallVec<[CompactString; 2]>,
    pub modifier: RenderModifier,
    pub unchecked: bool,
}

impl RendersAnnotation {
    pub fn new<I, S>(targets: I, modifier: RenderModifier, unchecked: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            modifier,
            unchecked,
        }
    }
}

/// Canonical form: `@renders{?|*}{!} {A | B}`.
impl fmt::Display for RendersAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(RENDERS)?;
        f.write_str(self.modifier.suffix())?;
        if self.unchecked {
            f.write_str("!")?;
        }
        write!(f, " {{{}}}", self.targets.join(" | "))
    }
}

/// Props through which a transparent component forwards rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparencyDescriptor {
    passthrough_props: SmallVec<[CompactString; 2]>,
}

impl Default for TransparencyDescriptor {
    fn default() -> Self {
        Self {
            passthrough_props: SmallVec::from_iter([CompactString::const_new("children")]),
        }
    }
}

impl TransparencyDescriptor {
    /// Build from a prop list. Duplicates are dropped; an empty list means `children`.
    pub fn new<I, S>(props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let mut passthrough_props: SmallVec<[CompactString; 2]> = SmallVec::new();
        for prop in props {
            let prop = prop.into();
            if !passthrough_props.contains(&prop) {
                passthrough_props.push(prop);
            }
        }
        if passthrough_props.is_empty() {
            return Self::default();
        }
        Self { passthrough_props }
    }

    #[inline]
    pub fn props(&self) -> &[CompactString] {
        &self.passthrough_props
    }

    #[inline]
    pub fn passes_through(&self, prop: &str) -> bool {
        self.passthrough_props.iter().any(|p| p == prop)
    }
}

// =============================================================================
// Scanning helpers
// =============================================================================

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Tag matches that are not a prefix of a longer word (`@rendersFoo`).
fn find_tags<'t>(text: &'t str, tag: &'t Regex) -> impl Iterator<Item = Match<'t>> + 't {
    tag.find_iter(text)
        .filter(move |m| !text[m.end()..].starts_with(is_ident_char))
}

fn line_end(text: &str, from: usize) -> usize {
    text[from..].find('\n').map_or(text.len(), |offset| from + offset)
}

/// Cut a line at the comment terminator.
fn before_comment_close(s: &str) -> &str {
    s.find("*/").map_or(s, |idx| &s[..idx])
}

enum Braces<'t> {
    Missing,
    Unclosed {
        open: usize,
        line_end: usize,
    },
    Closed {
        content: &'t str,
        end: usize,
    },
}

/// Locate a `{...}` group following `pos` on the same line.
fn braces_after(text: &str, pos: usize) -> Braces<'_> {
    let rest = &text[pos..];
    let trimmed = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
    if !trimmed.starts_with('{') {
        return Braces::Missing;
    }
    let open = pos + (rest.len() - trimmed.len());
    let line_end = line_end(text, open);
    match text[open + 1..line_end].find('}') {
        Some(close) => Braces::Closed {
            content: &text[open + 1..open + 1 + close],
            end: open + close + 2,
        },
        None => Braces::Unclosed { open, line_end },
    }
}

fn modifiers(tag: &str) -> (RenderModifier, bool) {
    let mods = &tag[RENDERS.len()..];
    let modifier = if mods.contains('*') {
        RenderModifier::Many
    } else if mods.contains('?') {
        RenderModifier::Optional
    } else {
        RenderModifier::Required
    };
    (modifier, mods.contains('!'))
}

fn parse_targets(content: &str) -> Option<SmallVec<[CompactString; 2]>> {
    let mut targets = SmallVec::new();
    for part in content.split('|') {
        let name = part.trim();
        if !TARGET_NAME.is_match(name) {
            return None;
        }
        targets.push(CompactString::new(name));
    }
    Some(targets)
}

fn capitalize(name: &str) -> CompactString {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = CompactString::default();
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => CompactString::default(),
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse the first `@renders` tag of a comment.
pub fn parse_renders(text: &str) -> Option<RendersAnnotation> {
    locate_renders(text).map(|(annotation, _)| annotation)
}

/// Like [`parse_renders`], also returning the annotation's range in `text`.
pub fn locate_renders(text: &str) -> Option<(RendersAnnotation, Span)> {
    let tag = find_tags(text, &RENDERS_TAG).next()?;
    let Braces::Closed { content, end } = braces_after(text, tag.end()) else {
        return None;
    };
    let targets = parse_targets(content)?;
    let (modifier, unchecked) = modifiers(tag.as_str());
    Some((
        RendersAnnotation {
            targets,
            modifier,
            unchecked,
        },
        Span::new(tag.start() as u32, end as u32),
    ))
}

/// Parse the first `@transparent` tag of a comment.
pub fn parse_transparent(text: &str) -> Option<TransparencyDescriptor> {
    let tag = find_tags(text, &TRANSPARENT_TAG).next()?;
    match braces_after(text, tag.end()) {
        Braces::Missing => Some(TransparencyDescriptor::default()),
        Braces::Unclosed { .. } => None,
        Braces::Closed { content, .. } => {
            let mut props = Vec::new();
            for part in content.split(',') {
                let prop = part.trim();
                if prop.is_empty() {
                    continue;
                }
                if !PROP_NAME.is_match(prop) {
                    return None;
                }
                props.push(prop);
            }
            Some(TransparencyDescriptor::new(props))
        }
    }
}

// =============================================================================
// Syntax lint
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationIssueKind {
    /// `@renders Header`
    MissingBraces,
    /// `@renders {}`
    EmptyBraces,
    /// `@renders {Header`
    UnclosedBrace,
    /// `@renders {header}`
    LowercaseTarget,
    /// `@renders {Header |}` and other unparseable target lists
    InvalidTarget,
    /// `@transparent {children`
    UnclosedTransparent,
}

/// An almost-correct annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationIssue {
    pub kind: AnnotationIssueKind,
    /// Range of the offending annotation in the comment text
    pub range: Span,
    /// Corrected annotation text, when one can be derived
    pub suggestion: Option<String>,
}

impl AnnotationIssue {
    pub fn message(&self) -> &'static str {
        match self.kind {
            AnnotationIssueKind::MissingBraces => "@renders target must be wrapped in braces",
            AnnotationIssueKind::EmptyBraces => "@renders must name at least one component",
            AnnotationIssueKind::UnclosedBrace => "@renders target list is missing a closing brace",
            AnnotationIssueKind::LowercaseTarget => "@renders target must be a capitalized component name",
            AnnotationIssueKind::InvalidTarget => "@renders target list is not a `|` separated list of component names",
            AnnotationIssueKind::UnclosedTransparent => "@transparent prop list is missing a closing brace",
        }
    }
}

/// Suggest a canonical annotation for loosely written targets.
fn suggest_renders(tag: &str, raw_targets: &str) -> Option<String> {
    let targets: SmallVec<[CompactString; 2]> = raw_targets
        .split('|')
        .map(|part| capitalize(part.trim()))
        .collect();
    if !targets.iter().all(|name| TARGET_NAME.is_match(name)) {
        return None;
    }
    let (modifier, unchecked) = modifiers(tag);
    Some(
        RendersAnnotation {
            targets,
            modifier,
            unchecked,
        }
        .to_string(),
    )
}

fn renders_issue(text: &str, tag: Match<'_>) -> Option<AnnotationIssue> {
    let start = tag.start() as u32;
    let issue = |kind, end: usize, suggestion| AnnotationIssue {
        kind,
        range: Span::new(start, end as u32),
        suggestion,
    };

    match braces_after(text, tag.end()) {
        Braces::Missing => {
            let line = before_comment_close(&text[tag.end()..line_end(text, tag.end())]);
            let lead = line.len() - line.trim_start().len();
            let run_len = line[lead..]
                .find(|c: char| !(is_ident_char(c) || matches!(c, '.' | '|' | ' ' | '\t')))
                .unwrap_or(line.len() - lead);
            let run = line[lead..lead + run_len].trim_end();
            if run.is_empty() {
                return Some(issue(AnnotationIssueKind::MissingBraces, tag.end(), None));
            }
            let end = tag.end() + lead + run.len();
            Some(issue(
                AnnotationIssueKind::MissingBraces,
                end,
                suggest_renders(tag.as_str(), run),
            ))
        }
        Braces::Unclosed { open, line_end } => {
            let content = before_comment_close(&text[open + 1..line_end]).trim_end();
            let end = open + 1 + content.len();
            let suggestion = if content.trim().is_empty() {
                None
            } else {
                suggest_renders(tag.as_str(), content)
            };
            Some(issue(AnnotationIssueKind::UnclosedBrace, end, suggestion))
        }
        Braces::Closed { content, end } => {
            if content.trim().is_empty() {
                return Some(issue(AnnotationIssueKind::EmptyBraces, end, None));
            }
            if parse_targets(content).is_some() {
                return None;
            }
            let lowercase = content
                .split('|')
                .any(|part| part.trim().starts_with(|c: char| c.is_ascii_lowercase()));
            match suggest_renders(tag.as_str(), content) {
                Some(suggestion) if lowercase => Some(issue(
                    AnnotationIssueKind::LowercaseTarget,
                    end,
                    Some(suggestion),
                )),
                _ => Some(issue(AnnotationIssueKind::InvalidTarget, end, None)),
            }
        }
    }
}

/// Report almost-correct `@renders` / `@transparent` annotations.
///
/// Advisory only: an issue never changes what [`parse_renders`] or
/// [`parse_transparent`] return.
pub fn lint_annotation_syntax(text: &str) -> Vec<AnnotationIssue> {
    let mut issues: Vec<AnnotationIssue> = find_tags(text, &RENDERS_TAG)
        .filter_map(|tag| renders_issue(text, tag))
        .collect();

    for tag in find_tags(text, &TRANSPARENT_TAG) {
        if let Braces::Unclosed { open, line_end } = braces_after(text, tag.end()) {
            let content = before_comment_close(&text[open + 1..line_end]).trim_end();
            let props: Vec<&str> = content
                .split(',')
                .map(str::trim)
                .filter(|prop| !prop.is_empty())
                .collect();
            let suggestion = (!props.is_empty()
                && props.iter().all(|prop| PROP_NAME.is_match(prop)))
            .then(|| format!("@transparent {{{}}}", props.join(", ")));
            issues.push(AnnotationIssue {
                kind: AnnotationIssueKind::UnclosedTransparent,
                range: Span::new(tag.start() as u32, (open + 1 + content.len()) as u32),
                suggestion,
            });
        }
    }

    issues
}
