//! Canonical component identities and references.

use std::fmt;

use rendu_carton::{CompactString, FilePath, SmallVec};
use rendu_relief::Span;

use crate::annotation::RenderModifier;

/// Where a component is declared: the original declaration, independent of
/// any import alias or re-export used to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentIdentity {
    pub declaration_file: FilePath,
    pub symbol_name: CompactString,
}

impl ComponentIdentity {
    pub fn new(declaration_file: impl Into<FilePath>, symbol_name: impl Into<CompactString>) -> Self {
        Self {
            declaration_file: declaration_file.into(),
            symbol_name: symbol_name.into(),
        }
    }
}

impl fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol_name, self.declaration_file)
    }
}

/// Result of comparing two component references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Both resolved to the same declaration
    Identical,
    /// Neither resolved; same raw name within the same analysis unit
    SameNameUnresolved,
    Different,
}

impl Comparison {
    #[inline]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Identical | Self::SameNameUnresolved)
    }
}

/// Key used for visited sets and graph lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefKey {
    Identity(ComponentIdentity),
    /// Unresolved name, scoped to its unit
    Name(FilePath, CompactString),
}

/// A component as referenced from some analysis unit.
///
/// `unit` is the file whose resolution context produced the reference. It
/// scopes name-only comparisons when `identity` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    pub name: CompactString,
    pub identity: Option<ComponentIdentity>,
    pub unit: FilePath,
}

/// One member of a declared target list.
pub type RenderTarget = ComponentRef;

impl ComponentRef {
    pub fn new(
        name: impl Into<CompactString>,
        identity: Option<ComponentIdentity>,
        unit: impl Into<FilePath>,
    ) -> Self {
        Self {
            name: name.into(),
            identity,
            unit: unit.into(),
        }
    }

    /// A reference whose identity could not be resolved.
    pub fn unresolved(name: impl Into<CompactString>, unit: impl Into<FilePath>) -> Self {
        Self::new(name, None, unit)
    }

    /// Compare by identity; fall back to names only when neither side
    /// resolved and both come from the same unit.
    pub fn compare(&self, other: &ComponentRef) -> Comparison {
        match (&self.identity, &other.identity) {
            (Some(a), Some(b)) if a == b => Comparison::Identical,
            (None, None) if self.unit == other.unit && self.name == other.name => {
                Comparison::SameNameUnresolved
            }
            _ => Comparison::Different,
        }
    }

    pub fn key(&self) -> RefKey {
        match &self.identity {
            Some(identity) => RefKey::Identity(identity.clone()),
            None => RefKey::Name(self.unit.clone(), self.name.clone()),
        }
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A `@renders` annotation with its targets resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendersDeclaration {
    pub targets: SmallVec<[RenderTarget; 2]>,
    pub modifier: RenderModifier,
    pub unchecked: bool,
    /// Range of the annotation in its source file
    pub span: Span,
}

impl RendersDeclaration {
    #[inline]
    pub const fn accepts_nullish(&self) -> bool {
        matches!(self.modifier, RenderModifier::Optional | RenderModifier::Many)
    }

    #[inline]
    pub const fn accepts_fragment(&self) -> bool {
        matches!(self.modifier, RenderModifier::Many)
    }

    /// Target names joined for messages: `Header | Footer`.
    pub fn target_names(&self) -> String {
        let names: Vec<&str> = self.targets.iter().map(|t| t.name.as_str()).collect();
        names.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_comparison() {
        let header = ComponentIdentity::new("src/Header.tsx", "Header");
        let a = ComponentRef::new("Header", Some(header.clone()), "src/App.tsx");
        let b = ComponentRef::new("Title", Some(header), "src/Page.tsx");
        assert_eq!(a.compare(&b), Comparison::Identical);

        let other = ComponentRef::new(
            "Header",
            Some(ComponentIdentity::new("src/legacy/Header.tsx", "Header")),
            "src/App.tsx",
        );
        assert_eq!(a.compare(&other), Comparison::Different);
    }

    #[test]
    fn test_name_fallback_is_unit_scoped() {
        let a = ComponentRef::unresolved("Header", "src/App.tsx");
        let b = ComponentRef::unresolved("Header", "src/App.tsx");
        let c = ComponentRef::unresolved("Header", "src/Page.tsx");
        assert_eq!(a.compare(&b), Comparison::SameNameUnresolved);
        assert_eq!(a.compare(&c), Comparison::Different);

        // Identity on one side only is never a match
        let resolved = ComponentRef::new(
            "Header",
            Some(ComponentIdentity::new("src/App.tsx", "Header")),
            "src/App.tsx",
        );
        assert_eq!(a.compare(&resolved), Comparison::Different);
        assert!(!Comparison::Different.is_match());
    }

    #[test]
    fn test_keys() {
        let a = ComponentRef::unresolved("Header", "src/App.tsx");
        assert_eq!(
            a.key(),
            RefKey::Name("src/App.tsx".into(), "Header".into())
        );
        let identity = ComponentIdentity::new("src/Header.tsx", "Header");
        let b = ComponentRef::new("H", Some(identity.clone()), "src/App.tsx");
        assert_eq!(b.key(), RefKey::Identity(identity));
    }
}
