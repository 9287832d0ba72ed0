//! Expression lowering.
//!
//! Turns OXC expressions into the closed [`RenderExpr`] union. Only the
//! shapes the evaluator understands are preserved; everything else becomes
//! [`RenderExpr::Other`] carrying its span.

use oxc_ast::ast::{
    ArrowFunctionExpression, CallExpression, ChainElement, Expression, Function, JSXAttributeItem,
    JSXAttributeName, JSXAttributeValue, JSXChild, JSXElement, JSXElementName, JSXFragment,
    JSXMemberExpression, JSXMemberExpressionObject, Statement,
};
use oxc_span::GetSpan;
use oxc_syntax::operator::{LogicalOperator as JsLogicalOperator, UnaryOperator};
use rendu_carton::{format_compact, CompactString};
use rendu_relief::{
    ConditionalExpr, ElementExpr, FragmentExpr, JsxAttribute, ListCallExpr, LiteralExpr,
    LiteralKind, LogicalExpr, LogicalOperator, RenderExpr, Span,
};

/// Convert an OXC span.
#[inline]
pub(crate) fn span(span: oxc_span::Span) -> Span {
    Span::new(span.start, span.end)
}

/// Look through parentheses and TypeScript-only wrappers.
pub(crate) fn strip_wrappers<'b, 'a>(mut expr: &'b Expression<'a>) -> &'b Expression<'a> {
    loop {
        expr = match expr {
            Expression::ParenthesizedExpression(paren) => &paren.expression,
            Expression::TSAsExpression(as_expr) => &as_expr.expression,
            Expression::TSSatisfiesExpression(satisfies) => &satisfies.expression,
            Expression::TSNonNullExpression(non_null) => &non_null.expression,
            _ => return expr,
        };
    }
}

/// Dotted identifier path of an expression (`Menu.Item`), if it is one.
pub(crate) fn expression_path(expr: &Expression<'_>) -> Option<CompactString> {
    match strip_wrappers(expr) {
        Expression::Identifier(id) => Some(CompactString::new(id.name.as_str())),
        Expression::StaticMemberExpression(member) => {
            let object = expression_path(&member.object)?;
            Some(format_compact!("{}.{}", object, member.property.name))
        }
        _ => None,
    }
}

fn literal(kind: LiteralKind, oxc_span: oxc_span::Span) -> RenderExpr {
    RenderExpr::Literal(LiteralExpr {
        kind,
        span: span(oxc_span),
    })
}

/// Lower an expression in render position.
pub(crate) fn lower_expression(expr: &Expression<'_>) -> RenderExpr {
    match strip_wrappers(expr) {
        Expression::JSXElement(element) => lower_jsx_element(element),
        Expression::JSXFragment(fragment) => lower_jsx_fragment(fragment),
        Expression::ConditionalExpression(cond) => RenderExpr::Conditional(ConditionalExpr {
            consequent: Box::new(lower_expression(&cond.consequent)),
            alternate: Box::new(lower_expression(&cond.alternate)),
            span: span(cond.span),
        }),
        Expression::LogicalExpression(logical) => RenderExpr::Logical(LogicalExpr {
            operator: match logical.operator {
                JsLogicalOperator::And => LogicalOperator::And,
                JsLogicalOperator::Or => LogicalOperator::Or,
                JsLogicalOperator::Coalesce => LogicalOperator::Coalesce,
            },
            left: Box::new(lower_expression(&logical.left)),
            right: Box::new(lower_expression(&logical.right)),
            span: span(logical.span),
        }),
        Expression::CallExpression(call) => {
            lower_list_call(call).unwrap_or(RenderExpr::Other(span(call.span)))
        }
        Expression::ChainExpression(chain) => match &chain.expression {
            ChainElement::CallExpression(call) => {
                lower_list_call(call).unwrap_or(RenderExpr::Other(span(chain.span)))
            }
            _ => RenderExpr::Other(span(chain.span)),
        },
        Expression::NullLiteral(lit) => literal(LiteralKind::Null, lit.span),
        Expression::Identifier(id) if id.name.as_str() == "undefined" => {
            literal(LiteralKind::Undefined, id.span)
        }
        Expression::UnaryExpression(unary) if unary.operator == UnaryOperator::Void => {
            literal(LiteralKind::Undefined, unary.span)
        }
        Expression::BooleanLiteral(lit) if !lit.value => literal(LiteralKind::False, lit.span),
        Expression::BooleanLiteral(lit) => literal(LiteralKind::Other, lit.span),
        Expression::StringLiteral(lit) => literal(LiteralKind::Other, lit.span),
        Expression::NumericLiteral(lit) => literal(LiteralKind::Other, lit.span),
        Expression::BigIntLiteral(lit) => literal(LiteralKind::Other, lit.span),
        Expression::TemplateLiteral(lit) => literal(LiteralKind::Other, lit.span),
        other => RenderExpr::Other(span(other.span())),
    }
}

/// `items.map(item => <Row />)` and `items.flatMap(...)`.
///
/// Calls whose callback never returns a render shape stay opaque.
fn lower_list_call(call: &CallExpression<'_>) -> Option<RenderExpr> {
    let Expression::StaticMemberExpression(member) = strip_wrappers(&call.callee) else {
        return None;
    };
    let method = member.property.name.as_str();
    if !matches!(method, "map" | "flatMap") {
        return None;
    }

    let callback = call.arguments.first()?.as_expression()?;
    let returns = match strip_wrappers(callback) {
        Expression::ArrowFunctionExpression(arrow) => arrow_returns(arrow),
        Expression::FunctionExpression(func) => function_returns(func),
        _ => return None,
    };
    if !returns.iter().any(RenderExpr::is_render_shape) {
        return None;
    }

    Some(RenderExpr::Call(ListCallExpr {
        method: CompactString::new(method),
        returns,
        span: span(call.span),
    }))
}

// =============================================================================
// Returns
// =============================================================================

/// Return expressions of an arrow function. Expression bodies count as one.
pub(crate) fn arrow_returns(arrow: &ArrowFunctionExpression<'_>) -> Vec<RenderExpr> {
    if let Some(expr) = arrow.get_expression() {
        return vec![lower_expression(expr)];
    }
    let mut returns = Vec::new();
    collect_returns(&arrow.body.statements, &mut returns);
    returns
}

pub(crate) fn function_returns(func: &Function<'_>) -> Vec<RenderExpr> {
    let mut returns = Vec::new();
    if let Some(body) = &func.body {
        collect_returns(&body.statements, &mut returns);
    }
    returns
}

/// Collect `return` arguments without entering nested functions.
fn collect_returns(statements: &[Statement<'_>], out: &mut Vec<RenderExpr>) {
    for statement in statements {
        collect_statement_returns(statement, out);
    }
}

fn collect_statement_returns(statement: &Statement<'_>, out: &mut Vec<RenderExpr>) {
    match statement {
        Statement::ReturnStatement(ret) => match &ret.argument {
            Some(argument) => out.push(lower_expression(argument)),
            None => out.push(literal(LiteralKind::Undefined, ret.span)),
        },
        Statement::BlockStatement(block) => collect_returns(&block.body, out),
        Statement::IfStatement(if_stmt) => {
            collect_statement_returns(&if_stmt.consequent, out);
            if let Some(alternate) = &if_stmt.alternate {
                collect_statement_returns(alternate, out);
            }
        }
        Statement::SwitchStatement(switch) => {
            for case in &switch.cases {
                collect_returns(&case.consequent, out);
            }
        }
        Statement::TryStatement(try_stmt) => {
            collect_returns(&try_stmt.block.body, out);
            if let Some(handler) = &try_stmt.handler {
                collect_returns(&handler.body.body, out);
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                collect_returns(&finalizer.body, out);
            }
        }
        Statement::ForStatement(for_stmt) => collect_statement_returns(&for_stmt.body, out),
        Statement::ForInStatement(for_in) => collect_statement_returns(&for_in.body, out),
        Statement::ForOfStatement(for_of) => collect_statement_returns(&for_of.body, out),
        Statement::WhileStatement(while_stmt) => collect_statement_returns(&while_stmt.body, out),
        Statement::DoWhileStatement(do_while) => collect_statement_returns(&do_while.body, out),
        Statement::LabeledStatement(labeled) => collect_statement_returns(&labeled.body, out),
        _ => {}
    }
}

// =============================================================================
// JSX
// =============================================================================

/// Lower a JSX element. `<Fragment>` and `<React.Fragment>` become fragments.
pub(crate) fn lower_jsx_element(element: &JSXElement<'_>) -> RenderExpr {
    let element = element_expr(element);
    if matches!(element.name.as_str(), "Fragment" | "React.Fragment") {
        return RenderExpr::Fragment(FragmentExpr {
            children: element.children,
            span: element.span,
        });
    }
    RenderExpr::Element(element)
}

pub(crate) fn element_expr(element: &JSXElement<'_>) -> ElementExpr {
    let opening = &element.opening_element;
    ElementExpr {
        name: element_name(&opening.name),
        name_span: span(opening.name.span()),
        attributes: opening.attributes.iter().filter_map(lower_attribute).collect(),
        children: lower_children(&element.children),
        span: span(element.span),
    }
}

fn lower_jsx_fragment(fragment: &JSXFragment<'_>) -> RenderExpr {
    RenderExpr::Fragment(FragmentExpr {
        children: lower_children(&fragment.children),
        span: span(fragment.span),
    })
}

fn element_name(name: &JSXElementName<'_>) -> CompactString {
    match name {
        JSXElementName::Identifier(id) => CompactString::new(id.name.as_str()),
        JSXElementName::IdentifierReference(id) => CompactString::new(id.name.as_str()),
        JSXElementName::NamespacedName(ns) => {
            format_compact!("{}:{}", ns.namespace.name, ns.name.name)
        }
        JSXElementName::MemberExpression(member) => member_name(member),
        JSXElementName::ThisExpression(_) => CompactString::const_new("this"),
    }
}

fn member_name(member: &JSXMemberExpression<'_>) -> CompactString {
    let object = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => CompactString::new(id.name.as_str()),
        JSXMemberExpressionObject::MemberExpression(inner) => member_name(inner),
        JSXMemberExpressionObject::ThisExpression(_) => CompactString::const_new("this"),
    };
    format_compact!("{}.{}", object, member.property.name)
}

fn lower_attribute(item: &JSXAttributeItem<'_>) -> Option<JsxAttribute> {
    let JSXAttributeItem::Attribute(attr) = item else {
        return None;
    };
    let name = match &attr.name {
        JSXAttributeName::Identifier(id) => CompactString::new(id.name.as_str()),
        JSXAttributeName::NamespacedName(ns) => {
            format_compact!("{}:{}", ns.namespace.name, ns.name.name)
        }
    };
    let value = attr.value.as_ref().and_then(|value| match value {
        JSXAttributeValue::StringLiteral(lit) => Some(literal(LiteralKind::Other, lit.span)),
        JSXAttributeValue::ExpressionContainer(container) => {
            container.expression.as_expression().map(lower_expression)
        }
        JSXAttributeValue::Element(element) => Some(lower_jsx_element(element)),
        JSXAttributeValue::Fragment(fragment) => Some(lower_jsx_fragment(fragment)),
    });
    Some(JsxAttribute {
        name,
        value,
        span: span(attr.span),
    })
}

fn lower_children(children: &[JSXChild<'_>]) -> Vec<RenderExpr> {
    children
        .iter()
        .filter_map(|child| match child {
            JSXChild::Text(text) if text.value.trim().is_empty() => None,
            JSXChild::Text(text) => Some(literal(LiteralKind::Other, text.span)),
            JSXChild::Element(element) => Some(lower_jsx_element(element)),
            JSXChild::Fragment(fragment) => Some(lower_jsx_fragment(fragment)),
            JSXChild::ExpressionContainer(container) => {
                container.expression.as_expression().map(lower_expression)
            }
            JSXChild::Spread(spread) => Some(RenderExpr::Other(span(spread.span))),
        })
        .collect()
}
