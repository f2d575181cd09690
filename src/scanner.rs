//! Lexical analysis for style-sheet source.
//!
//! This module exposes `tokenize_with_trivia` and `tokenize_without_trivia`
//! which convert raw source text into a sequence of `(SyntaxKind, Span)`
//! pairs, plus the cursor-style [`Scanner`] used by collaborators that walk
//! tokens one at a time. Recognition is done with `logos`; a few constructs
//! that need context (raw `url(...)` bodies, numbers followed by units) are
//! resolved by small passes over the raw token stream. Tokenisation never
//! fails: characters no rule accepts become `T_UNKNOWN` tokens.

use logos::{Lexer, Logos};

use crate::{Dialect, SyntaxKind, data};

/// Byte range for a token within the source.
pub type Span = std::ops::Range<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlashForm {
    Operator,
    LineComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringEnd {
    Closed,
    Unterminated,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(extras = Dialect)]
enum Token {
    #[regex(r"[ \t\r\n\x0c]+")]
    Whitespace,
    #[token("/*", block_comment)]
    BlockComment,
    #[token("/", slash)]
    Slash(SlashForm),
    #[regex(r"(-?([a-zA-Z_]|[^\x00-\x7F]|\\[^\r\n\x0c])|--)([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\x0c])*")]
    Ident,
    #[regex(r"@(-?([a-zA-Z_]|[^\x00-\x7F]|\\[^\r\n\x0c])|--)([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\x0c])*")]
    AtKeyword,
    #[regex(r"\$(-?([a-zA-Z_]|[^\x00-\x7F]|\\[^\r\n\x0c])|--)([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\x0c])*")]
    DollarVar,
    #[regex(r"%(-?([a-zA-Z_]|[^\x00-\x7F]|\\[^\r\n\x0c])|--)([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\x0c])*")]
    Placeholder,
    #[regex(r"#([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\x0c])+")]
    Hash,
    #[regex(r"[0-9]+(\.[0-9]+)?|\.[0-9]+", number)]
    Number,
    #[regex(r"[uU]\+[0-9a-fA-F?]{1,6}(-[0-9a-fA-F]{1,6})?")]
    UnicodeRange,
    #[token("\"", quoted)]
    #[token("'", quoted)]
    Str(StringEnd),
    #[token("#{")]
    HashLBrace,
    #[token("@{")]
    AtLBrace,
    #[token("@")]
    At,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token(">=")]
    Gte,
    #[token("<=")]
    Lte,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Neq,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("%")]
    Percent,
    #[token("^=")]
    PrefixMatch,
    #[token("$=")]
    SuffixMatch,
    #[token("*=")]
    SubstringMatch,
    #[token("~=")]
    Includes,
    #[token("|=")]
    DashMatch,
    #[token("<!--")]
    Cdo,
    #[token("-->")]
    Cdc,
}

fn block_comment(lex: &mut Lexer<'_, Token>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |i| i + 2);
    lex.bump(len);
    true
}

fn slash(lex: &mut Lexer<'_, Token>) -> SlashForm {
    let rest = lex.remainder();
    if lex.extras.has_line_comments() && rest.starts_with('/') {
        let len = rest.find(['\n', '\r', '\x0c']).unwrap_or(rest.len());
        lex.bump(len);
        SlashForm::LineComment
    } else {
        SlashForm::Operator
    }
}

fn number(lex: &mut Lexer<'_, Token>) -> bool {
    let bytes = lex.remainder().as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return true;
    }
    let sign = usize::from(matches!(bytes.get(1), Some(b'+' | b'-')));
    let digits = bytes
        .iter()
        .skip(1 + sign)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits > 0 {
        lex.bump(1 + sign + digits);
    }
    true
}

fn quoted(lex: &mut Lexer<'_, Token>) -> StringEnd {
    let quote = lex.slice().chars().next();
    let rest = lex.remainder();
    let mut escaped = false;
    for (idx, ch) in rest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\n' | '\r' | '\x0c' => {
                lex.bump(idx);
                return StringEnd::Unterminated;
            }
            c if Some(c) == quote => {
                lex.bump(idx + c.len_utf8());
                return StringEnd::Closed;
            }
            _ => {}
        }
    }
    lex.bump(rest.len());
    StringEnd::Unterminated
}

const fn token_kind(token: Token) -> SyntaxKind {
    match token {
        Token::Whitespace => SyntaxKind::T_WHITESPACE,
        Token::BlockComment | Token::Slash(SlashForm::LineComment) => SyntaxKind::T_COMMENT,
        Token::Slash(SlashForm::Operator) => SyntaxKind::T_SLASH,
        Token::Ident => SyntaxKind::T_IDENT,
        Token::AtKeyword => SyntaxKind::T_AT_KEYWORD,
        Token::DollarVar => SyntaxKind::T_DOLLAR_VAR,
        Token::Placeholder => SyntaxKind::T_PLACEHOLDER,
        Token::Hash => SyntaxKind::T_HASH,
        Token::Number => SyntaxKind::T_NUMBER,
        Token::UnicodeRange => SyntaxKind::T_UNICODE_RANGE,
        Token::Str(StringEnd::Closed) => SyntaxKind::T_STRING,
        Token::Str(StringEnd::Unterminated) => SyntaxKind::T_BAD_STRING,
        Token::HashLBrace => SyntaxKind::T_HASH_LBRACE,
        Token::AtLBrace => SyntaxKind::T_AT_LBRACE,
        Token::At => SyntaxKind::T_AT,
        Token::LParen => SyntaxKind::T_LPAREN,
        Token::RParen => SyntaxKind::T_RPAREN,
        Token::LBrace => SyntaxKind::T_LBRACE,
        Token::RBrace => SyntaxKind::T_RBRACE,
        Token::LBracket => SyntaxKind::T_LBRACKET,
        Token::RBracket => SyntaxKind::T_RBRACKET,
        Token::Semi => SyntaxKind::T_SEMI,
        Token::Colon => SyntaxKind::T_COLON,
        Token::Comma => SyntaxKind::T_COMMA,
        Token::Dot => SyntaxKind::T_DOT,
        Token::Ellipsis => SyntaxKind::T_ELLIPSIS,
        Token::Star => SyntaxKind::T_STAR,
        Token::Plus => SyntaxKind::T_PLUS,
        Token::Minus => SyntaxKind::T_MINUS,
        Token::Gt => SyntaxKind::T_GT,
        Token::Lt => SyntaxKind::T_LT,
        Token::Gte => SyntaxKind::T_GTE,
        Token::Lte => SyntaxKind::T_LTE,
        Token::Eq => SyntaxKind::T_EQ,
        Token::EqEq => SyntaxKind::T_EQEQ,
        Token::Neq => SyntaxKind::T_NEQ,
        Token::Tilde => SyntaxKind::T_TILDE,
        Token::Bang => SyntaxKind::T_BANG,
        Token::Amp => SyntaxKind::T_AMP,
        Token::Pipe => SyntaxKind::T_PIPE,
        Token::Caret => SyntaxKind::T_CARET,
        Token::Percent => SyntaxKind::T_PERCENT,
        Token::PrefixMatch => SyntaxKind::T_PREFIX_MATCH,
        Token::SuffixMatch => SyntaxKind::T_SUFFIX_MATCH,
        Token::SubstringMatch => SyntaxKind::T_SUBSTRING_MATCH,
        Token::Includes => SyntaxKind::T_INCLUDES,
        Token::DashMatch => SyntaxKind::T_DASH_MATCH,
        Token::Cdo => SyntaxKind::T_CDO,
        Token::Cdc => SyntaxKind::T_CDC,
    }
}

/// End offset of a raw `url(...)` body starting at `open_end`, if the body
/// is unquoted and closed on the same logical run.
fn raw_url_end(src: &str, open_end: usize) -> Option<usize> {
    let rest = src.get(open_end..)?;
    let mut chars = rest.char_indices().peekable();
    while chars.next_if(|(_, c)| c.is_ascii_whitespace()).is_some() {}
    let (_, first) = *chars.peek()?;
    if matches!(first, '"' | '\'' | ')') {
        return None;
    }
    let mut trailing_ws = false;
    while let Some((idx, ch)) = chars.next() {
        match ch {
            ')' => return Some(open_end + idx + 1),
            '\\' => {
                if trailing_ws || chars.next_if(|(_, c)| !matches!(c, '\n' | '\r')).is_none() {
                    return None;
                }
            }
            c if c.is_ascii_whitespace() => trailing_ws = true,
            '"' | '\'' | '(' => return None,
            _ if trailing_ws => return None,
            _ => {}
        }
    }
    None
}

fn is_url_function(src: &str, ident: Option<&(SyntaxKind, Span)>, lparen: &Span) -> bool {
    ident.is_some_and(|(kind, span)| {
        *kind == SyntaxKind::T_IDENT
            && span.end == lparen.start
            && src
                .get(span.clone())
                .is_some_and(|text| text.eq_ignore_ascii_case("url"))
    })
}

fn lex_raw(src: &str, dialect: Dialect) -> Vec<(SyntaxKind, Span)> {
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "rough capacity estimate"
    )]
    let estimated_tokens = src.len() / 4; // roughly four chars per token
    let mut out: Vec<(SyntaxKind, Span)> = Vec::with_capacity(estimated_tokens);
    let mut base = 0;
    'restart: loop {
        let rest = src.get(base..).unwrap_or_default();
        let mut lexer = Token::lexer_with_extras(rest, dialect);
        while let Some(result) = lexer.next() {
            let local = lexer.span();
            let span = (base + local.start)..(base + local.end);
            let kind = result.map_or(SyntaxKind::T_UNKNOWN, token_kind);
            if kind == SyntaxKind::T_LPAREN && is_url_function(src, out.last(), &span) {
                if let Some(end) = raw_url_end(src, span.end) {
                    let start = out.pop().map_or(span.start, |(_, ident)| ident.start);
                    out.push((SyntaxKind::T_URL, start..end));
                    base = end;
                    continue 'restart;
                }
            }
            out.push((kind, span));
        }
        break;
    }
    out
}

/// Merge numbers with an adjacent `%` or known unit.
fn merge_dimensions(src: &str, raw: Vec<(SyntaxKind, Span)>) -> Vec<(SyntaxKind, Span)> {
    let mut out = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter().peekable();
    while let Some((kind, span)) = iter.next() {
        if kind != SyntaxKind::T_NUMBER {
            out.push((kind, span));
            continue;
        }
        let merged = iter.peek().and_then(|(next_kind, next_span)| {
            if next_span.start != span.end {
                return None;
            }
            match next_kind {
                SyntaxKind::T_PERCENT => Some((SyntaxKind::T_PERCENTAGE, next_span.end)),
                SyntaxKind::T_IDENT => src
                    .get(next_span.clone())
                    .filter(|unit| data::is_known_unit(unit))
                    .map(|_| (SyntaxKind::T_DIMENSION, next_span.end)),
                _ => None,
            }
        });
        let Some((merged_kind, end)) = merged else {
            out.push((kind, span));
            continue;
        };
        iter.next();
        out.push((merged_kind, span.start..end));
    }
    out
}

#[must_use]
fn tokenize_impl(src: &str, dialect: Dialect) -> Vec<(SyntaxKind, Span)> {
    merge_dimensions(src, lex_raw(src, dialect))
}

/// Tokenise the source, excluding whitespace and comments.
///
/// # Examples
///
/// ```rust
/// use cssls::{Dialect, SyntaxKind, tokenize_without_trivia};
///
/// let tokens = tokenize_without_trivia("a { color: red }", Dialect::Css);
/// assert!(!tokens.iter().any(|(k, _)| *k == SyntaxKind::T_WHITESPACE));
/// ```
#[must_use]
pub fn tokenize_without_trivia(src: &str, dialect: Dialect) -> Vec<(SyntaxKind, Span)> {
    tokenize_impl(src, dialect)
        .into_iter()
        .filter(|(k, _)| !k.is_trivia())
        .collect()
}

/// Tokenise the provided style-sheet source.
///
/// This variant retains whitespace and comment tokens, so concatenating the
/// token texts reproduces `src`.
///
/// # Examples
///
/// ```rust
/// use cssls::{Dialect, SyntaxKind, tokenize_with_trivia};
///
/// let tokens = tokenize_with_trivia("a{margin:10px}", Dialect::Css);
/// assert_eq!(tokens.len(), 6);
/// assert_eq!(tokens[4].0, SyntaxKind::T_DIMENSION);
/// ```
#[must_use]
pub fn tokenize_with_trivia(src: &str, dialect: Dialect) -> Vec<(SyntaxKind, Span)> {
    tokenize_impl(src, dialect)
}

/// A token handed out by [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedToken<'a> {
    /// Token kind.
    pub kind: SyntaxKind,
    /// Source text covered by the token.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub offset: usize,
}

impl ScannedToken<'_> {
    /// Length of the token in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the token covers no text (only true for end of file).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Cursor over the tokens of one document.
///
/// `next_token` skips trivia, `next_token_with_trivia` does not. Once the
/// input is exhausted every call yields a zero-length `T_EOF` token.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    tokens: Vec<(SyntaxKind, Span)>,
    index: usize,
}

impl<'a> Scanner<'a> {
    /// Scan `src` in `dialect`, positioned at offset zero.
    #[must_use]
    pub fn new(src: &'a str, dialect: Dialect) -> Self {
        Self {
            src,
            tokens: tokenize_impl(src, dialect),
            index: 0,
        }
    }

    /// Move to the first token starting at or after `offset`.
    pub fn set_position(&mut self, offset: usize) {
        self.index = self.tokens.partition_point(|(_, span)| span.start < offset);
    }

    /// Offset of the next token to be returned.
    #[must_use]
    pub fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map_or(self.src.len(), |(_, span)| span.start)
    }

    /// Return the next significant token and advance past it.
    pub fn next_token(&mut self) -> ScannedToken<'a> {
        loop {
            let token = self.next_token_with_trivia();
            if !token.kind.is_trivia() {
                return token;
            }
        }
    }

    /// Return the next token, whitespace and comments included.
    pub fn next_token_with_trivia(&mut self) -> ScannedToken<'a> {
        let Some((kind, span)) = self.tokens.get(self.index).cloned() else {
            return ScannedToken {
                kind: SyntaxKind::T_EOF,
                text: "",
                offset: self.src.len(),
            };
        };
        self.index += 1;
        ScannedToken {
            kind,
            text: self.src.get(span.clone()).unwrap_or_default(),
            offset: span.start,
        }
    }
}
