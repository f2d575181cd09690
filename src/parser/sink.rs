//! Build a `rowan` green tree from parser events and the raw token list.
//!
//! Trivia never reaches the grammar, so the sink re-inserts it: whitespace
//! and comments before a node's first token are attached to the enclosing
//! node, and anything left after the last event ends up in the root. Every
//! byte of the source therefore appears exactly once in the tree.

use log::warn;
use rowan::{GreenNode, GreenNodeBuilder, Language, TextRange, TextSize};

use super::errors::{ErrorCode, ParseError};
use super::event::Event;
use crate::{CssLanguage, Span, SyntaxKind};

pub(crate) struct Sink<'a> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'a [(SyntaxKind, Span)],
    src: &'a str,
    pos: usize,
    depth: usize,
    errors: Vec<ParseError>,
}

impl<'a> Sink<'a> {
    pub(crate) fn new(tokens: &'a [(SyntaxKind, Span)], src: &'a str) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            src,
            pos: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    /// Replay `events` and return the finished tree plus the errors in tree
    /// order.
    pub(crate) fn finish(mut self, mut events: Vec<Event>) -> (GreenNode, Vec<ParseError>) {
        for idx in 0..events.len() {
            let Some(event) = events.get_mut(idx).map(std::mem::take) else {
                continue;
            };
            match event {
                Event::Start {
                    kind,
                    forward_parent,
                } => self.start_chain(&mut events, idx, kind, forward_parent),
                Event::Token => self.token(),
                Event::Finish => self.finish_node(),
                Event::Error { code } => self.error(code),
                Event::Tombstone => {}
            }
        }
        (self.builder.finish(), self.errors)
    }

    fn start_chain(
        &mut self,
        events: &mut [Event],
        idx: usize,
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    ) {
        let mut kinds = vec![kind];
        let mut cursor = idx;
        let mut next = forward_parent;
        while let Some(distance) = next {
            cursor += distance;
            next = match events.get_mut(cursor).map(std::mem::take) {
                Some(Event::Start {
                    kind,
                    forward_parent,
                }) => {
                    kinds.push(kind);
                    forward_parent
                }
                other => {
                    warn!("forward parent at {cursor} points at {other:?}");
                    None
                }
            };
        }
        for kind in kinds.into_iter().rev() {
            if self.depth > 0 {
                self.flush_trivia();
            }
            self.builder.start_node(CssLanguage::kind_to_raw(kind));
            self.depth += 1;
        }
    }

    fn finish_node(&mut self) {
        if self.depth == 1 {
            self.flush_remaining();
        }
        self.builder.finish_node();
        self.depth = self.depth.saturating_sub(1);
    }

    fn token(&mut self) {
        self.flush_trivia();
        if let Some((kind, span)) = self.tokens.get(self.pos) {
            self.push_token(*kind, span);
            self.pos += 1;
        } else {
            warn!("token event past the end of the token list");
        }
    }

    fn error(&mut self, code: ErrorCode) {
        self.flush_trivia();
        let range = self
            .tokens
            .get(self.pos)
            .map_or_else(|| self.src.len()..self.src.len(), |(_, span)| span.clone());
        self.errors.push(ParseError {
            code,
            range: to_text_range(&range),
        });
        self.builder
            .start_node(CssLanguage::kind_to_raw(SyntaxKind::N_ERROR));
        self.builder.finish_node();
    }

    fn flush_trivia(&mut self) {
        while let Some((kind, span)) = self.tokens.get(self.pos) {
            if !kind.is_trivia() {
                break;
            }
            self.push_token(*kind, span);
            self.pos += 1;
        }
    }

    fn flush_remaining(&mut self) {
        while let Some((kind, span)) = self.tokens.get(self.pos) {
            self.push_token(*kind, span);
            self.pos += 1;
        }
    }

    fn push_token(&mut self, kind: SyntaxKind, span: &Span) {
        let text = self.src.get(span.clone()).map_or_else(
            || {
                warn!(
                    "token span {:?} out of bounds for source of length {}",
                    span,
                    self.src.len()
                );
                ""
            },
            |t| t,
        );
        self.builder.token(CssLanguage::kind_to_raw(kind), text);
    }
}

fn to_text_range(span: &Span) -> TextRange {
    let clamp = |n: usize| TextSize::from(u32::try_from(n).unwrap_or(u32::MAX));
    TextRange::new(clamp(span.start), clamp(span.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dialect, SyntaxNode, tokenize_with_trivia};
    use rstest::rstest;

    #[rstest]
    fn trivia_is_attached_outside_nodes() {
        let src = " a /*c*/ ";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let events = vec![
            Event::Start {
                kind: SyntaxKind::N_STYLESHEET,
                forward_parent: None,
            },
            Event::Start {
                kind: SyntaxKind::N_IDENTIFIER,
                forward_parent: None,
            },
            Event::Token,
            Event::Finish,
            Event::Finish,
        ];
        let (green, errors) = Sink::new(&tokens, src).finish(events);
        let root = SyntaxNode::new_root(green);
        assert!(errors.is_empty());
        assert_eq!(root.text().to_string(), src);
        let ident = root
            .first_child()
            .unwrap_or_else(|| panic!("identifier node missing"));
        assert_eq!(ident.text().to_string(), "a");
    }

    #[rstest]
    fn forward_parent_wraps_earlier_node() {
        let src = "a";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let events = vec![
            Event::Start {
                kind: SyntaxKind::N_STYLESHEET,
                forward_parent: None,
            },
            Event::Start {
                kind: SyntaxKind::N_TERM,
                forward_parent: Some(3),
            },
            Event::Token,
            Event::Finish,
            Event::Start {
                kind: SyntaxKind::N_EXPRESSION,
                forward_parent: None,
            },
            Event::Finish,
            Event::Finish,
        ];
        let (green, _) = Sink::new(&tokens, src).finish(events);
        let root = SyntaxNode::new_root(green);
        let expr = root
            .first_child()
            .unwrap_or_else(|| panic!("expression missing"));
        assert_eq!(expr.kind(), SyntaxKind::N_EXPRESSION);
        assert_eq!(
            expr.first_child().map(|n| n.kind()),
            Some(SyntaxKind::N_TERM)
        );
    }

    #[rstest]
    fn error_event_records_offending_range() {
        let src = "a ;";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let events = vec![
            Event::Start {
                kind: SyntaxKind::N_STYLESHEET,
                forward_parent: None,
            },
            Event::Token,
            Event::Error {
                code: ErrorCode::ColonExpected,
            },
            Event::Finish,
        ];
        let (green, errors) = Sink::new(&tokens, src).finish(events);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().map(ParseError::offset), Some(2));
        let root = SyntaxNode::new_root(green);
        let error = root
            .first_child()
            .unwrap_or_else(|| panic!("error node missing"));
        assert_eq!(error.kind(), SyntaxKind::N_ERROR);
        assert!(error.text_range().is_empty());
        assert_eq!(root.text().to_string(), src);
    }
}
