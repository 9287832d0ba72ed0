//! Render declaration graph.
//!
//! Built per analyzed file in two passes:
//!
//! 1. **Collection**: every capitalized, function-like component (optionally
//!    wrapped in one configured higher-order wrapper) has its leading
//!    documentation comment parsed for `@renders` and `@transparent`.
//! 2. **Resolution**: the declaring component and every target are resolved
//!    to canonical identities.
//!
//! Lookups prefer identity and fall back to unit-scoped names. Components
//! declared in other files are pulled lazily through the resolver and cached
//! in the run's [`ResolutionContext`](crate::ResolutionContext).

use std::sync::Arc;

use rendu_carton::{CompactString, FilePath, FxHashMap};
use rendu_relief::{ComponentDecl, RenderTypesOptions, Span};

use crate::annotation::{
    locate_renders, parse_transparent, RendersAnnotation, TransparencyDescriptor,
};
use crate::identity::{ComponentIdentity, ComponentRef, RefKey, RendersDeclaration};
use crate::resolver::IdentityResolver;

/// A component's render-type declarations, resolved in its own module.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentEntry {
    /// Local name in the declaring module
    pub name: CompactString,
    pub component: ComponentRef,
    pub annotation: Option<RendersAnnotation>,
    pub renders: Option<RendersDeclaration>,
    pub transparency: Option<TransparencyDescriptor>,
    pub name_span: Span,
}

/// A `@renders` contract on one prop of a component's props type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropContract {
    pub prop: CompactString,
    pub declaration: RendersDeclaration,
}

/// Pass 1 result for one component.
#[derive(Debug, Clone)]
pub(crate) struct CollectedComponent {
    name: CompactString,
    name_span: Span,
    annotation: Option<(RendersAnnotation, Span)>,
    transparency: Option<TransparencyDescriptor>,
}

/// Pass 1: read the declarations of one component.
///
/// Returns `None` for components that are not recognized (wrapper not
/// configured) or carry neither tag.
pub(crate) fn collect_component(
    decl: &ComponentDecl,
    options: &RenderTypesOptions,
) -> Option<CollectedComponent> {
    if let Some(wrapper) = &decl.wrapper {
        if !options.is_component_wrapper(wrapper) {
            return None;
        }
    }
    let doc = decl.doc.as_ref()?;
    let annotation = locate_renders(&doc.text)
        .map(|(annotation, range)| (annotation, range.offset_by(doc.span.start)));
    let transparency = parse_transparent(&doc.text);
    if annotation.is_none() && transparency.is_none() {
        return None;
    }

    Some(CollectedComponent {
        name: decl.name.clone(),
        name_span: decl.name_span,
        annotation,
        transparency,
    })
}

impl CollectedComponent {
    /// Pass 2: resolve the component and its targets in `file`.
    pub(crate) fn resolve(self, resolver: &IdentityResolver<'_>, file: &str) -> ComponentEntry {
        let component = resolver.resolve_ref(file, &self.name);
        let (annotation, renders) = match self.annotation {
            Some((annotation, span)) => {
                let renders = RendersDeclaration {
                    targets: annotation
                        .targets
                        .iter()
                        .map(|target| resolver.resolve_ref(file, target))
                        .collect(),
                    modifier: annotation.modifier,
                    unchecked: annotation.unchecked,
                    span,
                };
                (Some(annotation), Some(renders))
            }
            None => (None, None),
        };

        ComponentEntry {
            name: self.name,
            component,
            annotation,
            renders,
            transparency: self.transparency,
            name_span: self.name_span,
        }
    }
}

// =============================================================================
// Graph
// =============================================================================

/// Source of render declarations for reachability.
pub trait RenderLookup {
    fn renders_of(&self, component: &ComponentRef) -> Option<RendersDeclaration>;
}

/// `identity | (unit, name)` → render declaration.
#[derive(Debug, Clone, Default)]
pub struct RenderGraph {
    declarations: FxHashMap<RefKey, RendersDeclaration>,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, component: &ComponentRef, declaration: RendersDeclaration) {
        self.declarations.insert(component.key(), declaration);
    }

    pub fn get(&self, component: &ComponentRef) -> Option<&RendersDeclaration> {
        self.declarations.get(&component.key())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl RenderLookup for RenderGraph {
    fn renders_of(&self, component: &ComponentRef) -> Option<RendersDeclaration> {
        self.get(component).cloned()
    }
}

/// The resolved graph of one file plus its per-component entries.
#[derive(Debug, Clone)]
pub struct FileRenderGraph {
    pub file: FilePath,
    pub graph: RenderGraph,
    pub entries: Vec<ComponentEntry>,
}

impl FileRenderGraph {
    /// Entry of the component declared as `name` in this file.
    pub fn entry(&self, name: &str) -> Option<&ComponentEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

/// Build the two-pass graph for `file`. `None` when the host has no such module.
pub fn build_resolved_render_graph(
    resolver: &IdentityResolver<'_>,
    file: &str,
) -> Option<FileRenderGraph> {
    let module = resolver.host().module(file)?;
    let options = resolver.options();

    // Pass 1: collection
    let collected: Vec<CollectedComponent> = module
        .components
        .iter()
        .filter_map(|decl| collect_component(decl, options))
        .collect();
    tracing::debug!(file, components = collected.len(), "collected render declarations");

    // Pass 2: identity resolution
    let mut graph = RenderGraph::new();
    let entries: Vec<ComponentEntry> = collected
        .into_iter()
        .map(|collected| collected.resolve(resolver, file))
        .collect();
    for entry in &entries {
        if let Some(renders) = &entry.renders {
            graph.insert(&entry.component, renders.clone());
        }
    }

    Some(FileRenderGraph {
        file: FilePath::new(file),
        graph,
        entries,
    })
}

/// A file's graph that pulls declarations of other files on demand.
pub struct ResolvedLookup<'g, 'r> {
    graph: &'g RenderGraph,
    resolver: &'g IdentityResolver<'r>,
}

impl<'g, 'r> ResolvedLookup<'g, 'r> {
    pub fn new(graph: &'g RenderGraph, resolver: &'g IdentityResolver<'r>) -> Self {
        Self { graph, resolver }
    }

    /// Pulled entry for a resolved component.
    pub fn entry(&self, identity: &ComponentIdentity) -> Option<Arc<ComponentEntry>> {
        self.resolver.component_entry(identity)
    }
}

impl RenderLookup for ResolvedLookup<'_, '_> {
    fn renders_of(&self, component: &ComponentRef) -> Option<RendersDeclaration> {
        if let Some(declaration) = self.graph.get(component) {
            return Some(declaration.clone());
        }
        let identity = component.identity.as_ref()?;
        self.entry(identity)?.renders.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::RenderModifier;
    use crate::context::ResolutionContext;
    use crate::test_utils::project;

    #[test]
    fn test_two_pass_build() {
        let host = project(&[
            (
                "src/Header.tsx",
                "export function Header() { return <h1 />; }",
            ),
            (
                "src/App.tsx",
                r#"
import { Header } from "./Header";

/** @renders? {Header} */
export const MyHeader = () => <Header />;

/** @transparent */
export function Layout({ children }) { return <main>{children}</main>; }

/** Plain docs */
function Plain() { return null; }

const Wrapped = forwardRef(
  /** ignored: docs belong to the declaration statement */
  () => <Header />
);
"#,
            ),
        ]);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        let file_graph = build_resolved_render_graph(&resolver, "src/App.tsx").unwrap();
        assert_eq!(file_graph.entries.len(), 2);
        assert_eq!(file_graph.graph.len(), 1);

        let my_header = file_graph.entry("MyHeader").unwrap();
        assert_eq!(
            my_header.component.identity,
            Some(ComponentIdentity::new("src/App.tsx", "MyHeader"))
        );
        let renders = my_header.renders.as_ref().unwrap();
        assert_eq!(renders.modifier, RenderModifier::Optional);
        assert_eq!(
            renders.targets[0].identity,
            Some(ComponentIdentity::new("src/Header.tsx", "Header"))
        );

        let layout = file_graph.entry("Layout").unwrap();
        assert!(layout.renders.is_none());
        assert_eq!(layout.transparency.as_ref().unwrap().props(), ["children"]);

        assert!(file_graph.entry("Plain").is_none());
        assert!(build_resolved_render_graph(&resolver, "src/Missing.tsx").is_none());
    }

    #[test]
    fn test_unconfigured_wrapper_is_skipped() {
        let decl = ComponentDecl {
            name: "Observed".into(),
            name_span: Span::EMPTY,
            kind: rendu_relief::ComponentKind::Arrow,
            wrapper: Some("observer".into()),
            doc: Some(rendu_relief::DocComment::new("/** @renders {A} */", Span::EMPTY)),
            returns: Vec::new(),
            props_type: None,
            span: Span::EMPTY,
        };
        let options = RenderTypesOptions::default();
        assert!(collect_component(&decl, &options).is_none());

        let options = options.with_wrapper("observer");
        assert!(collect_component(&decl, &options).is_some());
    }

    #[test]
    fn test_lookup_pulls_other_files() {
        let host = project(&[
            (
                "src/MyHeader.tsx",
                "import { Header } from './Header';\n/** @renders {Header} */\nexport const MyHeader = () => <Header />;",
            ),
            ("src/Header.tsx", "export const Header = () => <h1 />;"),
            ("src/App.tsx", "import { MyHeader } from './MyHeader';"),
        ]);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);
        let file_graph = build_resolved_render_graph(&resolver, "src/App.tsx").unwrap();
        assert!(file_graph.graph.is_empty());

        let lookup = ResolvedLookup::new(&file_graph.graph, &resolver);
        let my_header = resolver.resolve_ref("src/App.tsx", "MyHeader");
        let renders = lookup.renders_of(&my_header).unwrap();
        assert_eq!(renders.target_names(), "Header");
        assert_eq!(
            renders.targets[0].identity,
            Some(ComponentIdentity::new("src/Header.tsx", "Header"))
        );
        assert_eq!(context.cached_declarations(), 1);

        // Repeated pulls hit the cache
        lookup.renders_of(&my_header);
        assert_eq!(context.cached_declarations(), 1);
    }
}
