//! Module model node types.
//!
//! A [`ModuleSummary`] is produced once per source file by an adapter over
//! the host syntax tree. Expressions that can be rendered are lowered into
//! the closed [`RenderExpr`] union; every shape the evaluator does not model
//! becomes [`RenderExpr::Other`].

use rendu_carton::{is_capitalized, CompactString, FilePath, FxHashMap};
use serde::{Deserialize, Serialize};

/// Source range [start, end) in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Empty span at offset zero
    pub const EMPTY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shift a span that is relative to `base`.
    #[inline]
    pub const fn offset_by(&self, base: u32) -> Self {
        Self::new(self.start + base, self.end + base)
    }
}

/// A documentation comment (`/** ... */`), delimiters included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocComment {
    pub text: String,
    pub span: Span,
}

impl DocComment {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    /// Whether the comment mentions one of the render-type tags.
    #[inline]
    pub fn has_render_tags(&self) -> bool {
        self.text.contains("@renders") || self.text.contains("@transparent")
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// Recognized expression shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderExpr {
    /// `<Name attr={...}>children</Name>`
    Element(ElementExpr),
    /// `<>children</>` or `<Fragment>`
    Fragment(FragmentExpr),
    /// `test ? consequent : alternate`
    Conditional(ConditionalExpr),
    /// `left && right`, `left || right`, `left ?? right`
    Logical(LogicalExpr),
    /// `items.map(item => <Row />)`
    Call(ListCallExpr),
    /// `null`, `undefined`, `false`, and every other literal
    Literal(LiteralExpr),
    /// Anything the evaluator does not model
    Other(Span),
}

impl RenderExpr {
    pub fn span(&self) -> Span {
        match self {
            Self::Element(el) => el.span,
            Self::Fragment(frag) => frag.span,
            Self::Conditional(cond) => cond.span,
            Self::Logical(logical) => logical.span,
            Self::Call(call) => call.span,
            Self::Literal(lit) => lit.span,
            Self::Other(span) => *span,
        }
    }

    /// Whether this is a JSX node (element or fragment).
    #[inline]
    pub fn is_jsx(&self) -> bool {
        matches!(self, Self::Element(_) | Self::Fragment(_))
    }

    /// Whether this shape can produce rendered output at all.
    ///
    /// Bare conditions such as `isOpen` in `isOpen && <Panel />` are not.
    pub fn is_render_shape(&self) -> bool {
        match self {
            Self::Element(_) | Self::Fragment(_) | Self::Call(_) => true,
            Self::Conditional(_) | Self::Logical(_) => true,
            Self::Literal(lit) => lit.kind.is_nullish(),
            Self::Other(_) => false,
        }
    }
}

/// A JSX element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementExpr {
    /// Tag name as written, dotted for member access (`Menu.Item`)
    pub name: CompactString,
    pub name_span: Span,
    pub attributes: Vec<JsxAttribute>,
    /// Child nodes; whitespace-only text is dropped
    pub children: Vec<RenderExpr>,
    pub span: Span,
}

impl ElementExpr {
    /// Find an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&JsxAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Whether the tag refers to a component rather than an intrinsic element.
    #[inline]
    pub fn is_component(&self) -> bool {
        is_capitalized(&self.name) || self.name.contains('.')
    }
}

/// A JSX attribute. Spread attributes are not recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxAttribute {
    pub name: CompactString,
    /// `None` for valueless attributes (`<Input disabled />`)
    pub value: Option<RenderExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentExpr {
    pub children: Vec<RenderExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpr {
    pub consequent: Box<RenderExpr>,
    pub alternate: Box<RenderExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
    Coalesce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpr {
    pub operator: LogicalOperator,
    pub left: Box<RenderExpr>,
    pub right: Box<RenderExpr>,
    pub span: Span,
}

/// A list-mapping call (`.map` / `.flatMap`) whose callback returns JSX.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListCallExpr {
    pub method: CompactString,
    /// Every return expression of the callback
    pub returns: Vec<RenderExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    Null,
    Undefined,
    False,
    /// Strings, numbers, `true`, JSX text, ...
    Other,
}

impl LiteralKind {
    #[inline]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined | Self::False)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub span: Span,
}

// =============================================================================
// Declarations
// =============================================================================

/// How a component was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// `function Header() {}`
    Function,
    /// `const Header = function () {}`
    FunctionExpression,
    /// `const Header = () => {}`
    Arrow,
}

/// A capitalized, function-like declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDecl {
    pub name: CompactString,
    pub name_span: Span,
    pub kind: ComponentKind,
    /// Higher-order wrapper callee, e.g. `forwardRef` or `React.memo`
    pub wrapper: Option<CompactString>,
    /// Leading documentation comment (of the outer export statement when exported)
    pub doc: Option<DocComment>,
    /// Return expressions, not including nested functions
    pub returns: Vec<RenderExpr>,
    /// Type name annotated on the first parameter (`props: MenuProps`)
    pub props_type: Option<CompactString>,
    pub span: Span,
}

/// A non-component value binding that resolution may need to look through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueBinding {
    /// `const Title = Heading` or `const Item = Menu.Item`
    Alias { target: CompactString },
    /// `const Menu = { Item: MenuItem, Divider }`
    Object { members: Vec<ObjectMember> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMember {
    pub key: CompactString,
    /// Identifier path the member refers to (dotted for member access)
    pub value: CompactString,
}

/// Which export of the source module an import binds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportedName {
    Default,
    Named(CompactString),
    Namespace,
}

impl ImportedName {
    /// Export name looked up in the source module (`None` for namespaces).
    pub fn export_name(&self) -> Option<&str> {
        match self {
            Self::Default => Some("default"),
            Self::Named(name) => Some(name.as_str()),
            Self::Namespace => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBinding {
    pub local: CompactString,
    pub source: CompactString,
    pub imported: ImportedName,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportTarget {
    /// `export { Local as Exported }`, `export function Exported`, `export default Local`
    Local(CompactString),
    /// `export { Imported as Exported } from './source'`, `export * as Exported from`
    ReExport {
        source: CompactString,
        imported: ImportedName,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBinding {
    pub exported: CompactString,
    pub target: ExportTarget,
    pub span: Span,
}

/// A props interface or type-literal alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropsShape {
    pub name: CompactString,
    pub members: Vec<PropMember>,
}

impl PropsShape {
    pub fn member(&self, name: &str) -> Option<&PropMember> {
        self.members.iter().find(|member| member.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropMember {
    pub name: CompactString,
    pub doc: Option<DocComment>,
    pub span: Span,
}

// =============================================================================
// Module
// =============================================================================

/// Everything render-type checking needs from one source module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub path: FilePath,
    pub imports: Vec<ImportBinding>,
    pub exports: Vec<ExportBinding>,
    /// Sources of `export * from '...'`
    pub star_exports: Vec<CompactString>,
    pub components: Vec<ComponentDecl>,
    pub values: FxHashMap<CompactString, ValueBinding>,
    pub props_types: FxHashMap<CompactString, PropsShape>,
    /// Every JSX element in the module, in source order
    pub elements: Vec<ElementExpr>,
    /// Every documentation comment mentioning a render-type tag
    pub doc_comments: Vec<DocComment>,
}

impl ModuleSummary {
    pub fn new(path: impl Into<FilePath>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Find a component declared in this module by its local name.
    pub fn component(&self, name: &str) -> Option<&ComponentDecl> {
        self.components.iter().find(|component| component.name == name)
    }

    /// Find the import that binds `local`.
    pub fn import(&self, local: &str) -> Option<&ImportBinding> {
        self.imports.iter().find(|import| import.local == local)
    }

    /// Find the export named `exported`.
    pub fn export(&self, exported: &str) -> Option<&ExportBinding> {
        self.exports.iter().find(|export| export.exported == exported)
    }

    #[inline]
    pub fn value(&self, name: &str) -> Option<&ValueBinding> {
        self.values.get(name)
    }

    #[inline]
    pub fn props_type(&self, name: &str) -> Option<&PropsShape> {
        self.props_types.get(name)
    }

    /// Whether `name` is declared (not imported) in this module.
    pub fn declares(&self, name: &str) -> bool {
        self.component(name).is_some()
            || self.values.contains_key(name)
            || self.props_types.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str) -> ElementExpr {
        ElementExpr {
            name: CompactString::new(name),
            name_span: Span::new(1, 1 + name.len() as u32),
            attributes: Vec::new(),
            children: Vec::new(),
            span: Span::new(0, 4 + name.len() as u32),
        }
    }

    #[test]
    fn test_span() {
        let span = Span::new(4, 10);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert_eq!(span.offset_by(2), Span::new(6, 12));
        assert!(Span::EMPTY.is_empty());
    }

    #[test]
    fn test_element_is_component() {
        assert!(element("Header").is_component());
        assert!(element("menu.Item").is_component());
        assert!(!element("div").is_component());
    }

    #[test]
    fn test_render_shape() {
        let null = RenderExpr::Literal(LiteralExpr {
            kind: LiteralKind::Null,
            span: Span::EMPTY,
        });
        let text = RenderExpr::Literal(LiteralExpr {
            kind: LiteralKind::Other,
            span: Span::EMPTY,
        });
        assert!(null.is_render_shape());
        assert!(!text.is_render_shape());
        assert!(!RenderExpr::Other(Span::EMPTY).is_render_shape());
        assert!(RenderExpr::Element(element("Header")).is_jsx());
    }

    #[test]
    fn test_module_lookups() {
        let mut module = ModuleSummary::new("src/Menu.tsx");
        module.imports.push(ImportBinding {
            local: CompactString::new("Item"),
            source: CompactString::new("./Item"),
            imported: ImportedName::Named(CompactString::new("MenuItem")),
            span: Span::EMPTY,
        });
        module.values.insert(
            CompactString::new("Menu"),
            ValueBinding::Object {
                members: vec![ObjectMember {
                    key: CompactString::new("Item"),
                    value: CompactString::new("Item"),
                }],
            },
        );

        assert!(module.import("Item").is_some());
        assert!(module.import("Menu").is_none());
        assert!(module.declares("Menu"));
        assert!(!module.declares("Item"));
        assert_eq!(
            module.import("Item").and_then(|import| import.imported.export_name()),
            Some("MenuItem")
        );
        assert_eq!(ImportedName::Namespace.export_name(), None);
    }
}
