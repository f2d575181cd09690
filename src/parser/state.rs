//! Recursive-descent parser state shared by every grammar module.
//!
//! The parser owns a [`TokenStream`] of significant tokens and an event
//! buffer. Nodes are opened with [`Parser::start`] and closed through the
//! returned [`Marker`]; [`CompletedMarker::precede`] wraps an already
//! finished node in a new parent, and [`Parser::checkpoint`] /
//! [`Parser::rewind`] implement speculative parsing.
//!
//! The parser keeps its own copy of the full token list, trivia included,
//! because a few ambiguous tokens are re-split in context; [`Parser::finish`]
//! hands that list back alongside the events.

use log::trace;

use super::errors::ErrorCode;
use super::event::Event;
use super::token_stream::TokenStream;
use crate::{Dialect, Span, SyntaxKind, tokenize_with_trivia};

pub(crate) struct Parser<'t> {
    stream: TokenStream<'t>,
    tokens: Vec<(SyntaxKind, Span)>,
    src: &'t str,
    dialect: Dialect,
    events: Vec<Event>,
    errors: usize,
    splits: Vec<Split>,
}

/// Saved parser position for speculative parsing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    events: usize,
    cursor: usize,
    errors: usize,
    splits: usize,
}

/// A token run replaced by [`Parser::split_unicode_range`], kept so a
/// rewind can put it back.
#[derive(Debug)]
struct Split {
    cursor: usize,
    first: usize,
    inserted: usize,
    removed: Vec<(SyntaxKind, Span)>,
}

/// An open node; finish it with [`Marker::complete`] or drop it with
/// [`Marker::abandon`].
#[derive(Debug)]
#[must_use = "markers must be completed or abandoned"]
pub(crate) struct Marker {
    pos: usize,
}

/// A finished node that can still be wrapped by a new parent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &[(SyntaxKind, Span)], src: &'t str, dialect: Dialect) -> Self {
        Self {
            stream: TokenStream::new(tokens, src),
            tokens: tokens.to_vec(),
            src,
            dialect,
            events: Vec::new(),
            errors: 0,
            splits: Vec::new(),
        }
    }

    /// The recorded events and the token list they refer to.
    pub(crate) fn finish(self) -> (Vec<Event>, Vec<(SyntaxKind, Span)>) {
        (self.events, self.tokens)
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.stream.is_exhausted()
    }

    // ----- lookahead -----

    pub(crate) fn current(&self) -> SyntaxKind {
        self.stream.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.stream.nth(n)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    pub(crate) fn nth_at(&self, n: usize, kind: SyntaxKind) -> bool {
        self.nth(n) == kind
    }

    pub(crate) fn text(&self) -> &'t str {
        self.stream.nth_text(0)
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'t str {
        self.stream.nth_text(n)
    }

    /// Whether the current token is the identifier `word`, ignoring case.
    pub(crate) fn at_word(&self, word: &str) -> bool {
        self.nth_word(0, word)
    }

    pub(crate) fn nth_word(&self, n: usize, word: &str) -> bool {
        self.nth(n) == SyntaxKind::T_IDENT && self.nth_text(n).eq_ignore_ascii_case(word)
    }

    /// Whether the current token is the at-keyword `name` (with `@`),
    /// ignoring case.
    pub(crate) fn at_keyword(&self, name: &str) -> bool {
        self.at(SyntaxKind::T_AT_KEYWORD) && self.text().eq_ignore_ascii_case(name)
    }

    /// Whether whitespace separates the current token from the previous one.
    pub(crate) fn has_whitespace(&self) -> bool {
        self.stream.has_whitespace_before(0)
    }

    pub(crate) fn nth_has_whitespace(&self, n: usize) -> bool {
        self.stream.has_whitespace_before(n)
    }

    /// Whether the token `n` ahead exists and directly follows the token
    /// before it.
    pub(crate) fn nth_adjacent(&self, n: usize) -> bool {
        !self.nth_at(n, SyntaxKind::T_EOF) && !self.stream.has_whitespace_before(n)
    }

    pub(crate) fn prev(&self) -> Option<SyntaxKind> {
        self.stream.prev()
    }

    // ----- consumption -----

    pub(crate) fn bump(&mut self) {
        if self.at(SyntaxKind::T_EOF) {
            return;
        }
        self.events.push(Event::Token);
        self.stream.advance();
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or record `code` without consuming anything.
    pub(crate) fn expect(&mut self, kind: SyntaxKind, code: ErrorCode) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(code);
        false
    }

    pub(crate) fn error(&mut self, code: ErrorCode) {
        trace!("{code} at token {:?} '{}'", self.current(), self.text());
        self.events.push(Event::Error { code });
        self.errors += 1;
    }

    /// Re-read a unicode-range token at the cursor as `u`, `+` and whatever
    /// follows, so `u+a` can be a sibling selector.
    ///
    /// The range is re-lexed together with the identifier-like tokens glued
    /// to it, which turns `u+abbr` into `u + abbr` rather than
    /// `u + abb r`.
    pub(crate) fn split_unicode_range(&mut self) {
        if !self.at(SyntaxKind::T_UNICODE_RANGE) {
            return;
        }
        let mut run = 1;
        while self.nth_adjacent(run)
            && matches!(
                self.nth(run),
                SyntaxKind::T_IDENT
                    | SyntaxKind::T_NUMBER
                    | SyntaxKind::T_DIMENSION
                    | SyntaxKind::T_MINUS
            )
        {
            run += 1;
        }
        let start = self.stream.nth_span(0).start;
        let end = self.stream.nth_span(run - 1).end;
        let rest = start + 2;
        let mut parts = vec![
            (SyntaxKind::T_IDENT, start..start + 1),
            (SyntaxKind::T_PLUS, start + 1..rest),
        ];
        let tail = self.src.get(rest..end).unwrap_or_default();
        parts.extend(
            tokenize_with_trivia(tail, self.dialect)
                .into_iter()
                .map(|(kind, span)| (kind, span.start + rest..span.end + rest)),
        );
        trace!("split unicode range '{}' into {} tokens", self.text(), parts.len());
        let cursor = self.stream.cursor();
        let first = self.tokens.partition_point(|(_, span)| span.start < start);
        let last = self.tokens.partition_point(|(_, span)| span.start < end);
        let inserted = parts.len();
        self.tokens.splice(first..last, parts.iter().cloned());
        let removed = self.stream.splice(cursor, run, parts);
        self.splits.push(Split {
            cursor,
            first,
            inserted,
            removed,
        });
    }

    /// Consume one token, or a whole balanced group when the token opens
    /// one.
    ///
    /// Returns `false` when a group ran out of input or hit a stray `}`
    /// before its closer.
    pub(crate) fn bump_balanced(&mut self) -> bool {
        let close = match self.current() {
            SyntaxKind::T_LBRACE | SyntaxKind::T_HASH_LBRACE | SyntaxKind::T_AT_LBRACE => {
                SyntaxKind::T_RBRACE
            }
            SyntaxKind::T_LPAREN => SyntaxKind::T_RPAREN,
            SyntaxKind::T_LBRACKET => SyntaxKind::T_RBRACKET,
            _ => {
                self.bump();
                return true;
            }
        };
        self.bump();
        while !self.at(close) && !self.at(SyntaxKind::T_EOF) {
            if self.at_any(&[SyntaxKind::T_RBRACE, SyntaxKind::T_RPAREN, SyntaxKind::T_RBRACKET])
            {
                // mismatched closer: stop so an enclosing construct can use it
                if self.at(SyntaxKind::T_RBRACE) {
                    return false;
                }
                self.bump();
                continue;
            }
            self.bump_balanced();
        }
        self.eat(close)
    }

    /// Skip ahead to a synchronisation point.
    ///
    /// Tokens in `consume` end recovery and are consumed; tokens in `stop`
    /// end it without being consumed. A `}` always stops recovery unless it
    /// is listed in `consume`, and nested blocks are skipped whole.
    pub(crate) fn recover(&mut self, consume: &[SyntaxKind], stop: &[SyntaxKind]) {
        let start = self.stream.cursor();
        loop {
            let kind = self.current();
            if kind == SyntaxKind::T_EOF {
                break;
            }
            if consume.contains(&kind) {
                self.bump();
                break;
            }
            if stop.contains(&kind) || kind == SyntaxKind::T_RBRACE {
                break;
            }
            self.bump_balanced();
        }
        trace!(
            "recovered over {} tokens, resuming at {:?}",
            self.stream.cursor().saturating_sub(start),
            self.current()
        );
    }

    // ----- markers -----

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Tombstone);
        Marker { pos }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            events: self.events.len(),
            cursor: self.stream.cursor(),
            errors: self.errors,
            splits: self.splits.len(),
        }
    }

    /// Discard everything produced since `checkpoint`, including token
    /// splits.
    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.events.truncate(checkpoint.events);
        while self.splits.len() > checkpoint.splits {
            let Some(split) = self.splits.pop() else {
                break;
            };
            let end = (split.first + split.inserted).min(self.tokens.len());
            self.tokens
                .splice(split.first..end, split.removed.iter().cloned());
            self.stream
                .splice(split.cursor, split.inserted, split.removed);
        }
        self.stream.rewind(checkpoint.cursor);
        self.errors = checkpoint.errors;
    }

    /// Whether an error was recorded since `checkpoint`.
    pub(crate) fn has_error_since(&self, checkpoint: Checkpoint) -> bool {
        self.errors > checkpoint.errors
    }
}

impl Marker {
    pub(crate) fn complete(self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        if let Some(slot) = p.events.get_mut(self.pos) {
            *slot = Event::Start {
                kind,
                forward_parent: None,
            };
        }
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    pub(crate) fn abandon(self, p: &mut Parser<'_>) {
        if self.pos + 1 == p.events.len() {
            p.events.pop();
        }
    }
}

impl CompletedMarker {
    /// Open a new node that will become the parent of this one.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let parent = p.start();
        if let Some(Event::Start { forward_parent, .. }) = p.events.get_mut(self.pos) {
            *forward_parent = Some(parent.pos - self.pos);
        }
        parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize_with_trivia;
    use rstest::rstest;

    #[rstest]
    fn rewind_discards_speculative_events() {
        let src = "a b";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        let cp = p.checkpoint();
        let m = p.start();
        p.bump();
        p.error(ErrorCode::ColonExpected);
        let _ = m.complete(&mut p, SyntaxKind::N_DECLARATION);
        assert!(p.has_error_since(cp));
        p.rewind(cp);
        assert!(!p.has_error_since(cp));
        assert_eq!(p.text(), "a");
        assert!(p.finish().0.is_empty());
    }

    #[rstest]
    fn errors_before_a_checkpoint_are_not_counted() {
        let src = "a b";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        p.error(ErrorCode::ColonExpected);
        let outer = p.checkpoint();
        assert!(!p.has_error_since(outer));
        p.bump();
        let inner = p.checkpoint();
        p.error(ErrorCode::TermExpected);
        assert!(p.has_error_since(outer));
        p.rewind(inner);
        assert!(!p.has_error_since(outer));
        assert_eq!(p.text(), "b");
    }

    #[rstest]
    fn recover_skips_nested_blocks_and_stops_at_close() {
        let src = "x { y } z ; }";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        p.recover(&[], &[]);
        assert!(p.at(SyntaxKind::T_RBRACE));
        assert_eq!(p.nth_text(0), "}");
        assert!(p.is_exhausted() || p.nth_at(1, SyntaxKind::T_EOF));
    }

    #[rstest]
    fn recover_consumes_listed_token() {
        let src = "x y ; z";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        p.recover(&[SyntaxKind::T_SEMI], &[]);
        assert_eq!(p.text(), "z");
    }

    #[rstest]
    #[case("{ a { } }", true)]
    #[case("{ a { }", false)]
    #[case("( ] )", true)]
    #[case("( }", false)]
    #[case("x", true)]
    fn bump_balanced_reports_unclosed_groups(#[case] src: &str, #[case] closed: bool) {
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        assert_eq!(p.bump_balanced(), closed);
    }

    #[rstest]
    fn abandon_of_last_marker_leaves_no_trace() {
        let src = "a";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        let m = p.start();
        m.abandon(&mut p);
        assert!(p.finish().0.is_empty());
    }

    #[rstest]
    #[case("u+a", &["u", "+", "a"])]
    #[case("u+abbr", &["u", "+", "abbr"])]
    #[case("U+b-c", &["U", "+", "b-c"])]
    #[case("u+a.x", &["u", "+", "a", "."])]
    fn unicode_range_splits_into_sibling_selector(
        #[case] src: &str,
        #[case] expected: &[&str],
    ) {
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        p.split_unicode_range();
        let texts: Vec<&str> = (0..expected.len()).map(|n| p.nth_text(n)).collect();
        assert_eq!(texts, expected);
        assert_eq!(p.nth(1), SyntaxKind::T_PLUS);
        let (_, full) = p.finish();
        let joined: String = full
            .iter()
            .filter_map(|(_, span)| src.get(span.clone()))
            .collect();
        assert_eq!(joined, src);
    }

    #[rstest]
    fn rewind_restores_split_tokens() {
        let src = "x:U+0025-00FF";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        let cp = p.checkpoint();
        p.bump();
        p.bump();
        p.split_unicode_range();
        assert_eq!(p.text(), "U");
        p.rewind(cp);
        assert_eq!(p.nth(2), SyntaxKind::T_UNICODE_RANGE);
        assert_eq!(p.nth_text(2), "U+0025-00FF");
        let (_, full) = p.finish();
        assert_eq!(full, tokens);
    }

    #[rstest]
    fn split_leaves_other_tokens_alone() {
        let src = "a+b";
        let tokens = tokenize_with_trivia(src, Dialect::Css);
        let mut p = Parser::new(&tokens, src, Dialect::Css);
        p.split_unicode_range();
        let (_, full) = p.finish();
        assert_eq!(full, tokens);
    }
}
