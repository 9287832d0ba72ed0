//! Transparent component registry.
//!
//! A transparent component never counts as rendered output itself: the
//! evaluator looks through it into its pass-through props. Sources, from
//! lowest to highest precedence:
//!
//! 1. `transparentComponents` in [`RenderTypesOptions`]
//! 2. `@transparent` in the analyzed file
//! 3. `@transparent` on imported components, pulled through the resolver

use rendu_carton::{CompactString, FxHashMap};
use rendu_relief::RenderTypesOptions;

use crate::annotation::TransparencyDescriptor;
use crate::graph::FileRenderGraph;
use crate::identity::{ComponentRef, RefKey};
use crate::resolver::IdentityResolver;

/// Pass-through props per component.
#[derive(Default)]
pub struct TransparencyRegistry<'r> {
    configured: FxHashMap<CompactString, TransparencyDescriptor>,
    declared: FxHashMap<RefKey, TransparencyDescriptor>,
    resolver: Option<&'r IdentityResolver<'r>>,
}

impl<'r> TransparencyRegistry<'r> {
    /// Registry seeded with the configured transparent components.
    pub fn from_options(options: &RenderTypesOptions) -> Self {
        let configured = options
            .transparent_components
            .iter()
            .map(|component| {
                (
                    CompactString::new(component.name()),
                    TransparencyDescriptor::new(component.props()),
                )
            })
            .collect();
        Self {
            configured,
            ..Default::default()
        }
    }

    /// Registry for one analyzed file: configuration, the file's own
    /// `@transparent` declarations, and cross-file pulls.
    pub fn for_file(resolver: &'r IdentityResolver<'r>, graph: &FileRenderGraph) -> Self {
        let mut registry = Self::from_options(resolver.options()).with_resolver(resolver);
        for entry in &graph.entries {
            if let Some(transparency) = &entry.transparency {
                registry.register(&entry.component, transparency.clone());
            }
        }
        registry
    }

    /// Pull `@transparent` declarations of other modules through `resolver`.
    pub fn with_resolver(mut self, resolver: &'r IdentityResolver<'r>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Register an in-source declaration. Overrides configuration.
    pub fn register(&mut self, component: &ComponentRef, descriptor: TransparencyDescriptor) {
        self.declared.insert(component.key(), descriptor);
    }

    /// Pass-through props of `component`; `None` when it is opaque.
    pub fn passthrough_props(&self, component: &ComponentRef) -> Option<TransparencyDescriptor> {
        if let Some(descriptor) = self.declared.get(&component.key()) {
            return Some(descriptor.clone());
        }
        if let (Some(resolver), Some(identity)) = (self.resolver, &component.identity) {
            if let Some(descriptor) = resolver
                .component_entry(identity)
                .and_then(|entry| entry.transparency.clone())
            {
                return Some(descriptor);
            }
        }
        self.configured_props(component)
    }

    #[inline]
    pub fn is_transparent(&self, component: &ComponentRef) -> bool {
        self.passthrough_props(component).is_some()
    }

    /// Configured names match the name as written or the declared symbol.
    fn configured_props(&self, component: &ComponentRef) -> Option<TransparencyDescriptor> {
        self.configured
            .get(component.name.as_str())
            .or_else(|| {
                let identity = component.identity.as_ref()?;
                self.configured.get(identity.symbol_name.as_str())
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResolutionContext;
    use crate::graph::build_resolved_render_graph;
    use crate::identity::ComponentIdentity;
    use crate::test_utils::project_with;

    #[test]
    fn test_configured_components() {
        let options = RenderTypesOptions::default()
            .with_transparent("Suspense")
            .with_transparent_props("Slot", ["content", "fallback"]);
        let registry = TransparencyRegistry::from_options(&options);

        let suspense = ComponentRef::unresolved("Suspense", "src/App.tsx");
        assert_eq!(
            registry.passthrough_props(&suspense).unwrap().props(),
            ["children"]
        );

        // Aliased import of a configured component
        let slot = ComponentRef::new(
            "Placeholder",
            Some(ComponentIdentity::new("src/Slot.tsx", "Slot")),
            "src/App.tsx",
        );
        assert_eq!(
            registry.passthrough_props(&slot).unwrap().props(),
            ["content", "fallback"]
        );
        assert!(!registry.is_transparent(&ComponentRef::unresolved("Header", "src/App.tsx")));
    }

    #[test]
    fn test_in_source_overrides_configuration() {
        let options = RenderTypesOptions::default().with_transparent("Layout");
        let host = project_with(
            options,
            &[
                (
                    "src/Layout.tsx",
                    "/** @transparent {header, footer} */\nexport function Layout(props) { return <main />; }",
                ),
                (
                    "src/App.tsx",
                    "import { Layout } from './Layout';\n/** @transparent */\nfunction Box({ children }) { return <div>{children}</div>; }",
                ),
            ],
        );
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);
        let graph = build_resolved_render_graph(&resolver, "src/App.tsx").unwrap();
        let registry = TransparencyRegistry::for_file(&resolver, &graph);

        let layout = resolver.resolve_ref("src/App.tsx", "Layout");
        assert_eq!(
            registry.passthrough_props(&layout).unwrap().props(),
            ["header", "footer"]
        );
        let boxed = resolver.resolve_ref("src/App.tsx", "Box");
        assert_eq!(registry.passthrough_props(&boxed).unwrap().props(), ["children"]);
    }
}
