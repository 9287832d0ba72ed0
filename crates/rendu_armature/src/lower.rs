//! Module-level lowering: imports, exports, component declarations, value
//! bindings and props types.

use oxc_ast::ast::{
    ArrowFunctionExpression, Declaration, ExportAllDeclaration, ExportDefaultDeclaration,
    ExportDefaultDeclarationKind, ExportNamedDeclaration, Expression, FormalParameters, Function,
    ImportDeclaration, ImportDeclarationSpecifier, JSXElement, ObjectPropertyKind, Program,
    PropertyKey, Statement, TSInterfaceDeclaration, TSSignature, TSType, TSTypeAliasDeclaration,
    TSTypeName, VariableDeclaration,
};
use oxc_ast_visit::{walk, Visit};
use rendu_carton::{is_capitalized, CompactString};
use rendu_relief::{
    ComponentDecl, ComponentKind, ElementExpr, ExportBinding, ExportTarget, ImportBinding,
    ImportedName, ModuleSummary, ObjectMember, PropMember, PropsShape, RenderTypesOptions, Span,
    ValueBinding,
};

use crate::comments::DocCommentIndex;
use crate::expr::{
    arrow_returns, element_expr, expression_path, function_returns, span, strip_wrappers,
};

/// Local name given to anonymous default-exported components.
const DEFAULT_EXPORT: &str = "default";

/// A function-like initializer recognized as a component body.
enum ComponentBody<'b, 'a> {
    Function(&'b Function<'a>),
    Arrow(&'b ArrowFunctionExpression<'a>),
}

pub(crate) struct Lowerer<'s, 'o> {
    source: &'s str,
    options: &'o RenderTypesOptions,
    comments: DocCommentIndex,
    module: ModuleSummary,
}

impl<'s, 'o> Lowerer<'s, 'o> {
    pub(crate) fn new(path: &str, source: &'s str, options: &'o RenderTypesOptions) -> Self {
        Self {
            source,
            options,
            comments: DocCommentIndex::default(),
            module: ModuleSummary::new(path),
        }
    }

    pub(crate) fn lower(mut self, program: &Program<'_>) -> ModuleSummary {
        self.comments = DocCommentIndex::new(self.source, &program.comments);
        for statement in &program.body {
            self.lower_statement(statement);
        }

        let mut collector = ElementCollector::default();
        collector.visit_program(program);
        self.module.elements = collector.elements;
        self.module.doc_comments = self.comments.render_tagged().cloned().collect();

        self.module
    }

    fn lower_statement(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::ImportDeclaration(import) => self.lower_import(import),
            Statement::ExportNamedDeclaration(export) => self.lower_export_named(export),
            Statement::ExportDefaultDeclaration(export) => self.lower_export_default(export),
            Statement::ExportAllDeclaration(export) => self.lower_export_all(export),
            Statement::FunctionDeclaration(func) => self.lower_function(func, func.span.start),
            Statement::VariableDeclaration(decl) => self.lower_variables(decl, decl.span.start),
            Statement::TSInterfaceDeclaration(iface) => self.lower_interface(iface),
            Statement::TSTypeAliasDeclaration(alias) => self.lower_type_alias(alias),
            _ => {}
        }
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    fn lower_import(&mut self, import: &ImportDeclaration<'_>) {
        let Some(specifiers) = &import.specifiers else {
            return;
        };
        let source = CompactString::new(import.source.value.as_str());

        for specifier in specifiers {
            let (local, imported, specifier_span) = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    let imported = s.imported.name();
                    let imported = if imported.as_str() == DEFAULT_EXPORT {
                        ImportedName::Default
                    } else {
                        ImportedName::Named(CompactString::new(imported.as_str()))
                    };
                    (s.local.name.as_str(), imported, s.span)
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    (s.local.name.as_str(), ImportedName::Default, s.span)
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    (s.local.name.as_str(), ImportedName::Namespace, s.span)
                }
            };
            self.module.imports.push(ImportBinding {
                local: CompactString::new(local),
                source: source.clone(),
                imported,
                span: span(specifier_span),
            });
        }
    }

    fn push_export(&mut self, exported: &str, target: ExportTarget, export_span: Span) {
        self.module.exports.push(ExportBinding {
            exported: CompactString::new(exported),
            target,
            span: export_span,
        });
    }

    fn lower_export_named(&mut self, export: &ExportNamedDeclaration<'_>) {
        let start = export.span.start;
        let export_span = span(export.span);

        if let Some(declaration) = &export.declaration {
            match declaration {
                Declaration::FunctionDeclaration(func) => {
                    if let Some(id) = &func.id {
                        let name = id.name.as_str();
                        self.push_export(name, ExportTarget::Local(name.into()), export_span);
                    }
                    self.lower_function(func, start);
                }
                Declaration::VariableDeclaration(decl) => {
                    for declarator in &decl.declarations {
                        if let Some(id) = declarator.id.get_binding_identifier() {
                            let name = id.name.as_str();
                            self.push_export(name, ExportTarget::Local(name.into()), export_span);
                        }
                    }
                    self.lower_variables(decl, start);
                }
                Declaration::TSInterfaceDeclaration(iface) => self.lower_interface(iface),
                Declaration::TSTypeAliasDeclaration(alias) => self.lower_type_alias(alias),
                _ => {}
            }
            return;
        }

        let source = export
            .source
            .as_ref()
            .map(|source| CompactString::new(source.value.as_str()));
        for specifier in &export.specifiers {
            let local = specifier.local.name();
            let target = match &source {
                Some(source) => ExportTarget::ReExport {
                    source: source.clone(),
                    imported: if local.as_str() == DEFAULT_EXPORT {
                        ImportedName::Default
                    } else {
                        ImportedName::Named(CompactString::new(local.as_str()))
                    },
                },
                None => ExportTarget::Local(CompactString::new(local.as_str())),
            };
            self.push_export(
                specifier.exported.name().as_str(),
                target,
                span(specifier.span),
            );
        }
    }

    fn lower_export_default(&mut self, export: &ExportDefaultDeclaration<'_>) {
        let start = export.span.start;
        let export_span = span(export.span);

        let local = match &export.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => match &func.id {
                Some(id) => {
                    self.lower_function(func, start);
                    Some(CompactString::new(id.name.as_str()))
                }
                None => {
                    let decl = self.component_decl(
                        DEFAULT_EXPORT,
                        span(func.span),
                        ComponentBody::Function(func),
                        None,
                        start,
                        span(func.span),
                    );
                    self.module.components.push(decl);
                    Some(CompactString::const_new(DEFAULT_EXPORT))
                }
            },
            ExportDefaultDeclarationKind::Identifier(id) => {
                Some(CompactString::new(id.name.as_str()))
            }
            ExportDefaultDeclarationKind::ArrowFunctionExpression(arrow) => {
                let decl = self.component_decl(
                    DEFAULT_EXPORT,
                    span(arrow.span),
                    ComponentBody::Arrow(arrow),
                    None,
                    start,
                    span(arrow.span),
                );
                self.module.components.push(decl);
                Some(CompactString::const_new(DEFAULT_EXPORT))
            }
            ExportDefaultDeclarationKind::CallExpression(call) => {
                // `export default memo(Header)` or `export default memo(() => ...)`
                let wrapper = expression_path(&call.callee)
                    .filter(|callee| self.options.is_component_wrapper(callee));
                let argument = call.arguments.first().and_then(|arg| arg.as_expression());
                match (wrapper, argument) {
                    (Some(wrapper), Some(argument)) => match Self::component_body(argument) {
                        Some(body) => {
                            let decl = self.component_decl(
                                DEFAULT_EXPORT,
                                span(call.span),
                                body,
                                Some(wrapper),
                                start,
                                span(call.span),
                            );
                            self.module.components.push(decl);
                            Some(CompactString::const_new(DEFAULT_EXPORT))
                        }
                        None => expression_path(argument),
                    },
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some(local) = local {
            self.push_export(DEFAULT_EXPORT, ExportTarget::Local(local), export_span);
        }
    }

    fn lower_export_all(&mut self, export: &ExportAllDeclaration<'_>) {
        let source = CompactString::new(export.source.value.as_str());
        match &export.exported {
            Some(exported) => self.push_export(
                exported.name().as_str(),
                ExportTarget::ReExport {
                    source,
                    imported: ImportedName::Namespace,
                },
                span(export.span),
            ),
            None => self.module.star_exports.push(source),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn lower_function(&mut self, func: &Function<'_>, doc_anchor: u32) {
        let Some(id) = &func.id else {
            return;
        };
        if !is_capitalized(&id.name) {
            return;
        }
        let decl = self.component_decl(
            id.name.as_str(),
            span(id.span),
            ComponentBody::Function(func),
            None,
            doc_anchor,
            span(func.span),
        );
        self.module.components.push(decl);
    }

    fn lower_variables(&mut self, decl: &VariableDeclaration<'_>, doc_anchor: u32) {
        for (idx, declarator) in decl.declarations.iter().enumerate() {
            let Some(id) = declarator.id.get_binding_identifier() else {
                continue;
            };
            let Some(init) = &declarator.init else {
                continue;
            };
            // The statement's comment documents the first declarator only
            let anchor = if idx == 0 {
                doc_anchor
            } else {
                declarator.span.start
            };
            self.lower_binding(
                id.name.as_str(),
                span(id.span),
                init,
                anchor,
                span(declarator.span),
            );
        }
    }

    fn lower_binding(
        &mut self,
        name: &str,
        name_span: Span,
        init: &Expression<'_>,
        doc_anchor: u32,
        decl_span: Span,
    ) {
        let init = strip_wrappers(init);

        if let Some(body) = Self::component_body(init) {
            if is_capitalized(name) {
                let decl = self.component_decl(name, name_span, body, None, doc_anchor, decl_span);
                self.module.components.push(decl);
            }
            return;
        }

        match init {
            Expression::CallExpression(call) => {
                let Some(callee) = expression_path(&call.callee) else {
                    return;
                };
                if !self.options.is_component_wrapper(&callee) {
                    return;
                }
                let Some(argument) = call.arguments.first().and_then(|arg| arg.as_expression())
                else {
                    return;
                };
                match Self::component_body(argument) {
                    Some(body) if is_capitalized(name) => {
                        let decl = self.component_decl(
                            name,
                            name_span,
                            body,
                            Some(callee),
                            doc_anchor,
                            decl_span,
                        );
                        self.module.components.push(decl);
                    }
                    Some(_) => {}
                    None => {
                        // `const Header = memo(Heading)`
                        if let Some(target) = expression_path(argument) {
                            self.module
                                .values
                                .insert(name.into(), ValueBinding::Alias { target });
                        }
                    }
                }
            }
            Expression::ObjectExpression(object) => {
                let members: Vec<ObjectMember> = object
                    .properties
                    .iter()
                    .filter_map(|property| match property {
                        ObjectPropertyKind::ObjectProperty(p) => {
                            let PropertyKey::StaticIdentifier(key) = &p.key else {
                                return None;
                            };
                            Some(ObjectMember {
                                key: CompactString::new(key.name.as_str()),
                                value: expression_path(&p.value)?,
                            })
                        }
                        ObjectPropertyKind::SpreadProperty(_) => None,
                    })
                    .collect();
                if !members.is_empty() {
                    self.module
                        .values
                        .insert(name.into(), ValueBinding::Object { members });
                }
            }
            other => {
                if let Some(target) = expression_path(other) {
                    self.module
                        .values
                        .insert(name.into(), ValueBinding::Alias { target });
                }
            }
        }
    }

    fn component_body<'b, 'a>(expr: &'b Expression<'a>) -> Option<ComponentBody<'b, 'a>> {
        match strip_wrappers(expr) {
            Expression::ArrowFunctionExpression(arrow) => Some(ComponentBody::Arrow(arrow)),
            Expression::FunctionExpression(func) => Some(ComponentBody::Function(func)),
            _ => None,
        }
    }

    fn component_decl(
        &self,
        name: &str,
        name_span: Span,
        body: ComponentBody<'_, '_>,
        wrapper: Option<CompactString>,
        doc_anchor: u32,
        decl_span: Span,
    ) -> ComponentDecl {
        let (kind, returns, props_type) = match body {
            ComponentBody::Function(func) => {
                let kind = if func.is_expression() {
                    ComponentKind::FunctionExpression
                } else {
                    ComponentKind::Function
                };
                (kind, function_returns(func), props_type_name(&func.params))
            }
            ComponentBody::Arrow(arrow) => (
                ComponentKind::Arrow,
                arrow_returns(arrow),
                props_type_name(&arrow.params),
            ),
        };

        ComponentDecl {
            name: CompactString::new(name),
            name_span,
            kind,
            wrapper,
            doc: self.comments.leading(self.source, doc_anchor).cloned(),
            returns,
            props_type,
            span: decl_span,
        }
    }

    // =========================================================================
    // Props types
    // =========================================================================

    fn lower_interface(&mut self, iface: &TSInterfaceDeclaration<'_>) {
        let members = self.prop_members(&iface.body.body);
        let name = CompactString::new(iface.id.name.as_str());
        self.module
            .props_types
            .insert(name.clone(), PropsShape { name, members });
    }

    fn lower_type_alias(&mut self, alias: &TSTypeAliasDeclaration<'_>) {
        let TSType::TSTypeLiteral(literal) = &alias.type_annotation else {
            return;
        };
        let members = self.prop_members(&literal.members);
        let name = CompactString::new(alias.id.name.as_str());
        self.module
            .props_types
            .insert(name.clone(), PropsShape { name, members });
    }

    fn prop_members(&self, signatures: &[TSSignature<'_>]) -> Vec<PropMember> {
        signatures
            .iter()
            .filter_map(|signature| {
                let TSSignature::TSPropertySignature(prop) = signature else {
                    return None;
                };
                let PropertyKey::StaticIdentifier(key) = &prop.key else {
                    return None;
                };
                Some(PropMember {
                    name: CompactString::new(key.name.as_str()),
                    doc: self.comments.leading(self.source, prop.span.start).cloned(),
                    span: span(prop.span),
                })
            })
            .collect()
    }
}

/// Type name annotated on the first parameter (`{ items }: MenuProps`).
fn props_type_name(params: &FormalParameters<'_>) -> Option<CompactString> {
    let first_param = params.items.first()?;
    let type_ann = first_param.type_annotation.as_ref()?;
    match &type_ann.type_annotation {
        TSType::TSTypeReference(reference) => match &reference.type_name {
            TSTypeName::IdentifierReference(id) => Some(CompactString::new(id.name.as_str())),
            _ => None,
        },
        _ => None,
    }
}

/// Collects every JSX element of a module in source order.
#[derive(Default)]
struct ElementCollector {
    elements: Vec<ElementExpr>,
}

impl<'a> Visit<'a> for ElementCollector {
    fn visit_jsx_element(&mut self, element: &JSXElement<'a>) {
        let lowered = element_expr(element);
        if !matches!(lowered.name.as_str(), "Fragment" | "React.Fragment") {
            self.elements.push(lowered);
        }
        walk::walk_jsx_element(self, element);
    }
}
