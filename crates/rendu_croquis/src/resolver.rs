//! Canonical identity resolution.
//!
//! Maps a name used in one module to the declaration it ultimately refers
//! to, following:
//!
//! - imports (default, named and namespace)
//! - local aliases (`const Title = Heading`, `export { A as B }`)
//! - named, default, namespace and star re-exports
//! - member access through namespaces and object literals (`Menu.Item`)
//!
//! Every failure is `None`; callers fall back to unit-scoped name matching.

use std::sync::Arc;

use rendu_carton::{is_capitalized, CompactString, FilePath, FxHashSet};
use rendu_relief::{ExportTarget, ImportedName, ModuleSummary, RenderTypesOptions, ValueBinding};

use crate::annotation::locate_renders;
use crate::context::ResolutionContext;
use crate::graph::{collect_component, ComponentEntry, PropContract};
use crate::identity::{ComponentIdentity, ComponentRef, RendersDeclaration};

/// Upper bound on alias / re-export hops along one chain.
pub const MAX_ALIAS_HOPS: usize = 32;

/// Module lookup and specifier resolution supplied by the host.
pub trait ModuleHost {
    /// Summary of the module at a normalized path.
    fn module(&self, path: &str) -> Option<&ModuleSummary>;

    /// Resolve an import specifier written in `importer` to a module path.
    fn resolve_specifier(&self, importer: &str, specifier: &str) -> Option<FilePath>;

    fn options(&self) -> &RenderTypesOptions;
}

/// What a name is bound to after following aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    /// A declaration (component, props type or other local symbol)
    Declaration(ComponentIdentity),
    /// A module namespace (`import * as UI`, `export * as UI from`)
    Namespace(FilePath),
    /// A local object literal (`const Menu = { Item }`)
    Object { file: FilePath, name: CompactString },
}

/// Exports already followed during one resolution. Each `(module, export)`
/// is expanded at most once, which bounds `export *` fan-out and cycles.
type Expanded = FxHashSet<(FilePath, CompactString)>;

/// Resolves names to canonical identities, memoized in a [`ResolutionContext`].
pub struct IdentityResolver<'a> {
    host: &'a dyn ModuleHost,
    context: &'a ResolutionContext,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(host: &'a dyn ModuleHost, context: &'a ResolutionContext) -> Self {
        Self { host, context }
    }

    #[inline]
    pub fn host(&self) -> &'a dyn ModuleHost {
        self.host
    }

    #[inline]
    pub fn context(&self) -> &'a ResolutionContext {
        self.context
    }

    #[inline]
    pub fn options(&self) -> &'a RenderTypesOptions {
        self.host.options()
    }

    /// Resolve `local_name` (possibly dotted) as used in `file`.
    pub fn resolve_identity(&self, file: &str, local_name: &str) -> Option<ComponentIdentity> {
        if let Some(cached) = self.context.cached_identity(file, local_name) {
            return cached;
        }

        let mut expanded = Expanded::default();
        let identity = match self.resolve_path(file, local_name, 0, &mut expanded) {
            Some(Binding::Declaration(identity)) => Some(identity),
            Some(_) => None,
            None => self.local_fallback(file, local_name),
        };

        if identity.is_none() {
            tracing::debug!(file, name = local_name, "unresolved component identity");
        }
        self.context.store_identity(file, local_name, identity.clone());
        identity
    }

    /// A reference to `name` as written in `file`.
    pub fn resolve_ref(&self, file: &str, name: &str) -> ComponentRef {
        ComponentRef::new(name, self.resolve_identity(file, name), file)
    }

    /// Like [`resolve_ref`](Self::resolve_ref), leaving intrinsic elements
    /// (`div`, `span`) unresolved.
    pub fn element_ref(&self, file: &str, name: &str) -> ComponentRef {
        if is_capitalized(name) || name.contains('.') {
            self.resolve_ref(file, name)
        } else {
            ComponentRef::unresolved(name, file)
        }
    }

    /// Names neither imported nor aliased are declarations of this file.
    fn local_fallback(&self, file: &str, name: &str) -> Option<ComponentIdentity> {
        if name.contains('.') {
            return None;
        }
        let module = self.host.module(file)?;
        if module.import(name).is_some() || module.value(name).is_some() {
            return None;
        }
        Some(ComponentIdentity::new(file, name))
    }

    fn resolve_path(
        &self,
        file: &str,
        path: &str,
        hops: usize,
        expanded: &mut Expanded,
    ) -> Option<Binding> {
        let mut segments = path.split('.');
        let base = segments.next()?;
        let mut binding = self.resolve_binding(file, base, hops, expanded)?;
        for segment in segments {
            binding = self.resolve_member(binding, segment, hops, expanded)?;
        }
        Some(binding)
    }

    fn resolve_binding(
        &self,
        file: &str,
        name: &str,
        hops: usize,
        expanded: &mut Expanded,
    ) -> Option<Binding> {
        let hops = hops + 1;
        if hops > MAX_ALIAS_HOPS {
            tracing::debug!(file, name, "alias chain exceeded hop limit");
            return None;
        }

        let module = self.host.module(file)?;
        if module.component(name).is_some() {
            return Some(Binding::Declaration(ComponentIdentity::new(file, name)));
        }
        if let Some(value) = module.value(name) {
            return match value {
                ValueBinding::Alias { target } => self.resolve_path(file, target, hops, expanded),
                ValueBinding::Object { .. } => Some(Binding::Object {
                    file: FilePath::new(file),
                    name: CompactString::new(name),
                }),
            };
        }
        if let Some(import) = module.import(name) {
            let Some(target) = self.host.resolve_specifier(file, &import.source) else {
                tracing::debug!(file, specifier = %import.source, "unresolved module specifier");
                return None;
            };
            return match &import.imported {
                ImportedName::Namespace => Some(Binding::Namespace(target)),
                imported => {
                    self.resolve_export(&target, imported.export_name()?, hops, expanded)
                }
            };
        }
        if module.declares(name) {
            return Some(Binding::Declaration(ComponentIdentity::new(file, name)));
        }
        None
    }

    fn resolve_export(
        &self,
        file: &str,
        export_name: &str,
        hops: usize,
        expanded: &mut Expanded,
    ) -> Option<Binding> {
        let hops = hops + 1;
        if hops > MAX_ALIAS_HOPS {
            return None;
        }
        if !expanded.insert((FilePath::new(file), CompactString::new(export_name))) {
            return None;
        }

        let module = self.host.module(file)?;
        if let Some(export) = module.export(export_name) {
            return match &export.target {
                ExportTarget::Local(local) => self.resolve_binding(file, local, hops, expanded),
                ExportTarget::ReExport { source, imported } => {
                    let target = self.host.resolve_specifier(file, source)?;
                    match imported {
                        ImportedName::Namespace => Some(Binding::Namespace(target)),
                        imported => {
                            self.resolve_export(&target, imported.export_name()?, hops, expanded)
                        }
                    }
                }
            };
        }

        // `export *` never forwards the default export
        if export_name == "default" {
            return None;
        }
        module.star_exports.iter().find_map(|source| {
            let target = self.host.resolve_specifier(file, source)?;
            self.resolve_export(&target, export_name, hops, expanded)
        })
    }

    fn resolve_member(
        &self,
        binding: Binding,
        member: &str,
        hops: usize,
        expanded: &mut Expanded,
    ) -> Option<Binding> {
        match binding {
            Binding::Namespace(file) => self.resolve_export(&file, member, hops, expanded),
            Binding::Object { file, name } => {
                let module = self.host.module(&file)?;
                let Some(ValueBinding::Object { members }) = module.value(&name) else {
                    return None;
                };
                let target = &members.iter().find(|m| m.key == member)?.value;
                self.resolve_path(&file, target, hops, expanded)
            }
            Binding::Declaration(_) => None,
        }
    }

    // =========================================================================
    // Cross-file declaration pulls
    // =========================================================================

    /// Render and transparency declarations of the component behind
    /// `identity`, parsed in its own module. Cached under the identity.
    pub fn component_entry(&self, identity: &ComponentIdentity) -> Option<Arc<ComponentEntry>> {
        if let Some(cached) = self.context.cached_entry(identity) {
            return cached;
        }

        tracing::debug!(%identity, "pulling component declaration");
        let entry = self
            .host
            .module(&identity.declaration_file)
            .and_then(|module| module.component(&identity.symbol_name))
            .and_then(|decl| collect_component(decl, self.options()))
            .map(|collected| Arc::new(collected.resolve(self, &identity.declaration_file)));

        self.context.store_entry(identity.clone(), entry.clone());
        entry
    }

    /// `@renders` contracts declared on the members of a component's props type.
    pub fn prop_contracts(&self, identity: &ComponentIdentity) -> Arc<[PropContract]> {
        if let Some(cached) = self.context.cached_prop_contracts(identity) {
            return cached;
        }

        let contracts: Arc<[PropContract]> = self
            .collect_prop_contracts(identity)
            .unwrap_or_default()
            .into();
        self.context
            .store_prop_contracts(identity.clone(), Arc::clone(&contracts));
        contracts
    }

    fn collect_prop_contracts(&self, identity: &ComponentIdentity) -> Option<Vec<PropContract>> {
        let file = identity.declaration_file.as_str();
        let decl = self.host.module(file)?.component(&identity.symbol_name)?;
        let props_type = decl.props_type.as_ref()?;

        // The props type may itself be imported
        let shape_identity = self.resolve_identity(file, props_type)?;
        let shape_file = shape_identity.declaration_file.as_str();
        let shape = self
            .host
            .module(shape_file)?
            .props_type(&shape_identity.symbol_name)?;

        let contracts = shape
            .members
            .iter()
            .filter_map(|member| {
                let doc = member.doc.as_ref()?;
                let (annotation, range) = locate_renders(&doc.text)?;
                Some(PropContract {
                    prop: member.name.clone(),
                    declaration: RendersDeclaration {
                        targets: annotation
                            .targets
                            .iter()
                            .map(|target| self.resolve_ref(shape_file, target))
                            .collect(),
                        modifier: annotation.modifier,
                        unchecked: annotation.unchecked,
                        span: range.offset_by(doc.span.start),
                    },
                })
            })
            .collect();
        Some(contracts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::project;

    #[test]
    fn test_local_declaration() {
        let host = project(&[
            ("src/App.tsx", "export function Header() { return <h1 />; }"),
        ]);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        assert_eq!(
            resolver.resolve_identity("src/App.tsx", "Header"),
            Some(ComponentIdentity::new("src/App.tsx", "Header"))
        );
        // Undeclared, unimported names are still local
        assert_eq!(
            resolver.resolve_identity("src/App.tsx", "Other"),
            Some(ComponentIdentity::new("src/App.tsx", "Other"))
        );
        assert_eq!(resolver.resolve_identity("src/Missing.tsx", "Header"), None);
    }

    #[test]
    fn test_import_and_aliases() {
        let host = project(&[
            ("src/ui/Header.tsx", "export function Header() { return <h1 />; }"),
            ("src/ui/index.ts", "export { Header as Title } from './Header';\nexport * from './Footer';"),
            ("src/ui/Footer.tsx", "const Footer = () => <footer />;\nexport default Footer;\nexport { Footer };"),
            ("src/App.tsx", "import { Title, Footer } from './ui';\nimport Foot from './ui/Footer';\nconst Heading = Title;"),
        ]);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        let header = ComponentIdentity::new("src/ui/Header.tsx", "Header");
        let footer = ComponentIdentity::new("src/ui/Footer.tsx", "Footer");
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Title"), Some(header.clone()));
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Heading"), Some(header));
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Footer"), Some(footer.clone()));
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Foot"), Some(footer));
    }

    #[test]
    fn test_member_access() {
        let host = project(&[
            ("src/menu/Item.tsx", "export const MenuItem = () => <li />;\nexport const Divider = () => <hr />;"),
            ("src/menu/index.ts", "import { MenuItem, Divider } from './Item';\nexport const Menu = { Item: MenuItem, Divider };\nexport * as Parts from './Item';"),
            ("src/App.tsx", "import { Menu, Parts } from './menu';\nimport * as Items from './menu/Item';"),
        ]);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        let item = ComponentIdentity::new("src/menu/Item.tsx", "MenuItem");
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Menu.Item"), Some(item.clone()));
        assert_eq!(
            resolver.resolve_identity("src/App.tsx", "Menu.Divider"),
            Some(ComponentIdentity::new("src/menu/Item.tsx", "Divider"))
        );
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Parts.MenuItem"), Some(item.clone()));
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Items.MenuItem"), Some(item));

        // No partial success
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Menu.Missing"), None);
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Menu.Item.Deep"), None);
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Menu"), None);
    }

    #[test]
    fn test_unresolvable_imports() {
        let host = project(&[
            ("src/App.tsx", "import { Suspense } from 'react';\nimport { Gone } from './gone';"),
        ]);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        assert_eq!(resolver.resolve_identity("src/App.tsx", "Suspense"), None);
        assert_eq!(resolver.resolve_identity("src/App.tsx", "Gone"), None);
        assert!(resolver.element_ref("src/App.tsx", "div").identity.is_none());
    }

    #[test]
    fn test_alias_cycle_terminates() {
        let host = project(&[
            ("src/a.ts", "export { B as A } from './b';"),
            ("src/b.ts", "export { A as B } from './a';"),
            ("src/App.tsx", "import { A } from './a';"),
        ]);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        assert_eq!(resolver.resolve_identity("src/App.tsx", "A"), None);
    }

    #[test]
    fn test_wide_star_barrel() {
        let components: Vec<(String, String)> = (0..40)
            .map(|i| {
                (
                    format!("src/ui/C{i}.tsx"),
                    format!("export const C{i} = () => <div />;"),
                )
            })
            .collect();
        let barrel: String = (0..40)
            .map(|i| format!("export * from './C{i}';\n"))
            .collect();

        let mut files: Vec<(&str, &str)> = components
            .iter()
            .map(|(path, source)| (path.as_str(), source.as_str()))
            .collect();
        files.push(("src/ui/index.ts", barrel.as_str()));
        files.push(("src/App.tsx", "import { C0, C39 } from './ui';"));
        let host = project(&files);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        assert_eq!(
            resolver.resolve_identity("src/App.tsx", "C39"),
            Some(ComponentIdentity::new("src/ui/C39.tsx", "C39"))
        );
        assert_eq!(
            resolver.resolve_identity("src/App.tsx", "C0"),
            Some(ComponentIdentity::new("src/ui/C0.tsx", "C0"))
        );
    }

    #[test]
    fn test_star_cycles_with_fan_out_terminate() {
        // Every barrel re-exports every other one
        let barrels: Vec<(String, String)> = (0..6)
            .map(|i| {
                let source: String = (0..6)
                    .filter(|&j| j != i)
                    .map(|j| format!("export * from './b{j}';\n"))
                    .collect();
                (format!("src/b{i}.ts"), source)
            })
            .collect();
        let mut files: Vec<(&str, &str)> = barrels
            .iter()
            .map(|(path, source)| (path.as_str(), source.as_str()))
            .collect();
        files.push(("src/App.tsx", "import { Missing } from './b0';"));
        let host = project(&files);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        assert_eq!(resolver.resolve_identity("src/App.tsx", "Missing"), None);
    }

    #[test]
    fn test_cached_and_reset() {
        let host = project(&[
            ("src/Header.tsx", "/** @renders {Title} */\nexport function Header() { return <Title />; }\nfunction Title() { return <h1 />; }"),
            ("src/App.tsx", "import { Header } from './Header';"),
        ]);
        let context = ResolutionContext::new();
        let resolver = IdentityResolver::new(&host, &context);

        let identity = resolver.resolve_identity("src/App.tsx", "Header").unwrap();
        let entry = resolver.component_entry(&identity).unwrap();
        let renders = entry.renders.as_ref().unwrap();
        assert_eq!(
            renders.targets[0].identity,
            Some(ComponentIdentity::new("src/Header.tsx", "Title"))
        );
        assert_eq!(context.cached_declarations(), 1);

        context.reset();
        assert_eq!(context.cached_declarations(), 0);
        assert_eq!(context.cached_identities(), 0);
    }
}
