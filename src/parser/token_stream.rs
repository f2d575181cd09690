//! Token stream utilities.
//!
//! Provides a cursor over the significant tokens of a document. Trivia is
//! filtered out up front; the parser only ever looks at significant tokens
//! and asks the stream whether whitespace separated two of them.
//!
//! ```
//! use cssls::{Dialect, tokenize_with_trivia};
//!
//! let src = "a { color: red }";
//! let tokens = tokenize_with_trivia(src, Dialect::Css);
//! assert_eq!(tokens.len(), 10);
//! ```
use crate::{Span, SyntaxKind};

#[derive(Debug)]
pub(crate) struct TokenStream<'a> {
    tokens: Vec<(SyntaxKind, Span)>,
    src: &'a str,
    cursor: usize,
}

impl<'a> TokenStream<'a> {
    /// Constructs a new `TokenStream` over the significant tokens in
    /// `tokens`.
    ///
    /// The stream starts with the cursor at the first significant token.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let stream = TokenStream::new(&tokens, src);
    /// assert_eq!(stream.cursor(), 0);
    /// ```
    #[must_use]
    pub(crate) fn new(tokens: &[(SyntaxKind, Span)], src: &'a str) -> Self {
        Self {
            tokens: tokens
                .iter()
                .filter(|(k, _)| !k.is_trivia())
                .cloned()
                .collect(),
            src,
            cursor: 0,
        }
    }

    /// Returns the current cursor position within the token stream.
    #[must_use]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor back to a position returned by [`Self::cursor`].
    pub(crate) fn rewind(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.tokens.len());
    }

    /// Kind of the token `n` places ahead of the cursor, or `T_EOF`.
    #[must_use]
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.cursor + n)
            .map_or(SyntaxKind::T_EOF, |(k, _)| *k)
    }

    /// Span of the token `n` places ahead, or an empty span at the end.
    #[must_use]
    pub(crate) fn nth_span(&self, n: usize) -> Span {
        self.tokens
            .get(self.cursor + n)
            .map_or(self.src.len()..self.src.len(), |(_, span)| span.clone())
    }

    /// Source text of the token `n` places ahead.
    #[must_use]
    pub(crate) fn nth_text(&self, n: usize) -> &'a str {
        let span = self.nth_span(n);
        self.src.get(span).unwrap_or_default()
    }

    /// Whether whitespace or a comment precedes the token `n` places ahead.
    ///
    /// The first token of the document counts as preceded by whitespace.
    #[must_use]
    pub(crate) fn has_whitespace_before(&self, n: usize) -> bool {
        let idx = self.cursor + n;
        let Some(prev) = idx.checked_sub(1).and_then(|i| self.tokens.get(i)) else {
            return true;
        };
        self.nth_span(n).start > prev.1.end
    }

    /// Kind of the most recently consumed token.
    #[must_use]
    pub(crate) fn prev(&self) -> Option<SyntaxKind> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(k, _)| *k)
    }

    /// Moves the cursor forward by one token if not already at the end of
    /// the token stream.
    pub(crate) fn advance(&mut self) {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
    }

    /// Replaces the `len` tokens at index `at` with `parts`, returning the
    /// tokens taken out.
    pub(crate) fn splice(
        &mut self,
        at: usize,
        len: usize,
        parts: Vec<(SyntaxKind, Span)>,
    ) -> Vec<(SyntaxKind, Span)> {
        let start = at.min(self.tokens.len());
        let end = (start + len).min(self.tokens.len());
        self.tokens.splice(start..end, parts).collect()
    }

    /// Whether every significant token has been consumed.
    #[must_use]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.cursor >= self.tokens.len()
    }
}
