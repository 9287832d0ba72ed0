//! Documentation comment index.
//!
//! Built from the comments the parser already collected, so comment openers
//! inside string, template or regex literals never count. A comment leads a
//! node when nothing but whitespace separates the comment's end from the
//! node's start.

use oxc_ast::ast::Comment;
use rendu_relief::{DocComment, Span};

/// Every `/** ... */` comment of a module, in source order.
#[derive(Debug, Default)]
pub struct DocCommentIndex {
    comments: Vec<DocComment>,
}

impl DocCommentIndex {
    pub fn new(source: &str, comments: &[Comment]) -> Self {
        let comments = comments
            .iter()
            .filter(|comment| comment.is_block())
            .filter_map(|comment| {
                let text = source.get(comment.span.start as usize..comment.span.end as usize)?;
                // `/**/` is an empty block comment, not documentation
                (text.starts_with("/**") && text.len() > 4).then(|| {
                    DocComment::new(text, Span::new(comment.span.start, comment.span.end))
                })
            })
            .collect();

        Self { comments }
    }

    /// The documentation comment directly before `start`, if any.
    pub fn leading(&self, source: &str, start: u32) -> Option<&DocComment> {
        let idx = self
            .comments
            .partition_point(|comment| comment.span.end <= start);
        let comment = self.comments.get(idx.checked_sub(1)?)?;
        let gap = source.get(comment.span.end as usize..start as usize)?;
        gap.trim().is_empty().then_some(comment)
    }

    /// Comments mentioning a render-type tag.
    pub fn render_tagged(&self) -> impl Iterator<Item = &DocComment> {
        self.comments.iter().filter(|comment| comment.has_render_tags())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn index(source: &str) -> DocCommentIndex {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::tsx()).parse();
        DocCommentIndex::new(source, &ret.program.comments)
    }

    #[test]
    fn test_collects_doc_comments() {
        let source = "// a /** not doc */\n/* plain */\n/** @renders {A} */\nfunction B() {}\n/**/";
        let index = index(source);
        assert_eq!(index.len(), 1);
        assert_eq!(index.render_tagged().count(), 1);
    }

    #[test]
    fn test_comment_openers_inside_literals() {
        let source = r#"const glob = "src/*";
const tpl = `/* ${glob} */`;
const re = /a\/*b/;
/** @renders {Header} */
function MyHeader() { return null; }
"#;
        let index = index(source);
        assert_eq!(index.len(), 1);

        let start = source.find("function MyHeader").unwrap() as u32;
        let leading = index.leading(source, start).unwrap();
        assert_eq!(leading.text, "/** @renders {Header} */");
    }

    #[test]
    fn test_leading_comment() {
        let source = "/** @renders {A} */\n\nexport function B() {}\n/** doc */ const x = 1; function C() {}";
        let index = index(source);

        let b_start = source.find("export").unwrap() as u32;
        let leading = index.leading(source, b_start).unwrap();
        assert_eq!(leading.text, "/** @renders {A} */");

        let c_start = source.find("function C").unwrap() as u32;
        assert!(index.leading(source, c_start).is_none());

        assert!(index.leading(source, 0).is_none());
    }
}
