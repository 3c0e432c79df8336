/*! Parser for the extended regular expression dialect.

Parsing happens in three steps:

1) Normalization: a single left-to-right scan that turns the pattern into a
   flat stream of operand and operator tokens. Macro references are expanded,
   character classes become alternations of bytes, bounded repetitions are
   expanded into explicit copies of the repeated term, action blocks are
   registered in [`Actions`] and replaced by an action symbol, and the implicit
   concatenation operator is inserted between adjacent terms.

2) Precedence reduction: a shunting-yard pass reorders the token stream into
   postfix order. Alternation has the lowest priority, concatenation comes
   next, and the postfix closure binds tighter than both.

3) Folding: the postfix stream is folded into an [`Ast`] with an operand
   stack.

The dialect has no bare literals other than single letters and punctuation
that is not a metacharacter. Runs of letters are macro names, so `'abc'`
must be quoted while `a` alone is the literal byte `a` (unless a macro named
`a` exists).
*/

use indexmap::IndexMap;

use crate::compiler::Actions;
use crate::re::alphabet::{class_escape, ByteSet, DOT};
use crate::re::ast::Ast;
use crate::re::Symbol;
use crate::Span;

pub use crate::re::parser::errors::Error;

mod errors;
mod shunting;

/// Largest count accepted in a bounded repetition like `{m,n}`.
pub const MAX_REPETITION: u32 = 1000;

/// Largest number of tokens a pattern can have after bounded repetitions
/// are expanded.
const MAX_TOKENS: usize = 1 << 20;

#[cfg(test)]
mod tests;

/// Parses regular expressions into an [`Ast`].
#[derive(Default)]
pub struct Parser<'a> {
    macros: Option<&'a IndexMap<String, String>>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self { macros: None }
    }

    /// Sets the table used for resolving macro references.
    pub fn macros(mut self, macros: &'a IndexMap<String, String>) -> Self {
        self.macros = Some(macros);
        self
    }

    /// Parses `pattern` and returns its syntax tree.
    ///
    /// Every action block found in the pattern is appended to `actions`, and
    /// its index in the registry is used as the action symbol in the tree.
    pub fn parse(
        &self,
        pattern: &'a str,
        actions: &mut Actions,
    ) -> Result<Ast, Error> {
        let tokens = Normalizer::new(pattern, self.macros, actions).run()?;
        let postfix = shunting::to_postfix(tokens)?;
        shunting::fold(postfix)
    }
}

/// Kinds of tokens produced by the normalizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Symbol(Symbol),
    Empty,
    Open,
    Close,
    Or,
    Concat,
    Closure,
}

impl TokenKind {
    /// True if a term can start with this token.
    fn starts_term(&self) -> bool {
        matches!(self, TokenKind::Symbol(_) | TokenKind::Empty | TokenKind::Open)
    }

    /// True if a term can end with this token.
    fn ends_term(&self) -> bool {
        matches!(
            self,
            TokenKind::Symbol(_)
                | TokenKind::Empty
                | TokenKind::Close
                | TokenKind::Closure
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Result of decoding an escape sequence.
enum Escape {
    Byte(u8),
    Set(&'static ByteSet),
}

struct Normalizer<'a, 'r> {
    src: &'a str,
    pos: usize,
    macros: Option<&'a IndexMap<String, String>>,
    actions: &'r mut Actions,
    /// Names of the macros being expanded, outermost first.
    expanding: Vec<&'a str>,
    /// When expanding a macro, every token gets the span of the outermost
    /// macro reference.
    origin: Option<Span>,
    tokens: Vec<Token>,
}

impl<'a, 'r> Normalizer<'a, 'r> {
    fn new(
        src: &'a str,
        macros: Option<&'a IndexMap<String, String>>,
        actions: &'r mut Actions,
    ) -> Self {
        Self {
            src,
            pos: 0,
            macros,
            actions,
            expanding: Vec::new(),
            origin: None,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, Error> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'(' => {
                    self.pos += 1;
                    self.emit(TokenKind::Open, self.span(start));
                }
                b')' => {
                    self.pos += 1;
                    self.emit(TokenKind::Close, self.span(start));
                }
                b'|' => {
                    self.pos += 1;
                    self.emit(TokenKind::Or, self.span(start));
                }
                b'*' => {
                    self.pos += 1;
                    self.repeat(0, None, self.span(start))?;
                }
                b'+' => {
                    self.pos += 1;
                    self.repeat(1, None, self.span(start))?;
                }
                b'?' => {
                    self.pos += 1;
                    self.repeat(0, Some(1), self.span(start))?;
                }
                b'{' => match self.peek_at(1) {
                    Some(b'0'..=b'9') | Some(b',') => self.quantifier()?,
                    _ => self.action()?,
                },
                b'[' => self.class()?,
                b'.' => {
                    self.pos += 1;
                    self.emit_set(&DOT, self.span(start))?;
                }
                b'\\' => match self.escape(true)? {
                    Escape::Byte(b) => self.emit(
                        TokenKind::Symbol(Symbol::Byte(b)),
                        self.span(start),
                    ),
                    Escape::Set(set) => self.emit_set(set, self.span(start))?,
                },
                b'\'' | b'"' => self.string(c)?,
                c if c.is_ascii_alphabetic() => self.identifier()?,
                b']' | b'}' => return Err(self.unexpected_char()),
                c if c.is_ascii_graphic() => {
                    self.pos += 1;
                    self.emit(
                        TokenKind::Symbol(Symbol::Byte(c)),
                        self.span(start),
                    );
                }
                _ => return Err(self.unexpected_char()),
            }
        }
        Ok(self.tokens)
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn next(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Returns the span that goes from `start` to the current position, or
    /// the span of the macro reference being expanded.
    fn span(&self, start: usize) -> Span {
        match &self.origin {
            Some(origin) => origin.clone(),
            None => Span(start..self.pos),
        }
    }

    fn unexpected_char(&self) -> Error {
        let ch = self
            .src
            .get(self.pos..)
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        let end = (self.pos + ch.len_utf8()).min(self.src.len());
        Error::UnexpectedChar { ch, span: self.span_at(self.pos, end) }
    }

    fn span_at(&self, start: usize, end: usize) -> Span {
        match &self.origin {
            Some(origin) => origin.clone(),
            None => Span(start..end),
        }
    }

    /// Appends a token, inserting a concatenation operator if the token
    /// starts a new term right after a complete one.
    fn emit(&mut self, kind: TokenKind, span: Span) {
        let (ends_term, is_open) =
            self.tokens.last().map_or((false, false), |last| {
                (last.kind.ends_term(), last.kind == TokenKind::Open)
            });

        if kind.starts_term() && ends_term {
            self.tokens
                .push(Token { kind: TokenKind::Concat, span: span.clone() });
        }

        // `()` matches the empty string.
        if kind == TokenKind::Close && is_open {
            self.tokens
                .push(Token { kind: TokenKind::Empty, span: span.clone() });
        }

        self.tokens.push(Token { kind, span });
    }

    fn emit_all(&mut self, tokens: &[Token]) {
        for token in tokens {
            self.emit(token.kind.clone(), token.span.clone());
        }
    }

    /// Emits a set of bytes as a parenthesized alternation of its members,
    /// in ascending order.
    fn emit_set(&mut self, set: &ByteSet, span: Span) -> Result<(), Error> {
        let bytes = set.to_vec();
        match bytes.as_slice() {
            [] => return Err(Error::EmptyClass { span }),
            [b] => self.emit(TokenKind::Symbol(Symbol::Byte(*b)), span),
            _ => {
                self.emit(TokenKind::Open, span.clone());
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        self.emit(TokenKind::Or, span.clone());
                    }
                    self.emit(TokenKind::Symbol(Symbol::Byte(*b)), span.clone());
                }
                self.emit(TokenKind::Close, span);
            }
        }
        Ok(())
    }

    /// Decodes the escape sequence at the current position, which must be a
    /// backslash. When `sets` is true, `\w`, `\d`, `\s` and their upper-case
    /// variants produce a set of bytes. Otherwise, they are just the escaped
    /// letter, like any other unknown escape.
    fn escape(&mut self, sets: bool) -> Result<Escape, Error> {
        let start = self.pos;
        self.pos += 1;

        let c = match self.peek() {
            Some(c) if !c.is_ascii() => return Err(self.unexpected_char()),
            Some(c) => c,
            None => {
                return Err(Error::UnexpectedEnd { span: self.span(start) })
            }
        };

        self.pos += 1;

        let b = match c {
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'e' => 0x1b,
            b'x' => {
                let hi = self.next().and_then(hex_value);
                let lo = self.next().and_then(hex_value);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => (hi << 4) | lo,
                    _ => {
                        return Err(Error::InvalidEscape {
                            span: self.span(start),
                        });
                    }
                }
            }
            b'c' => match self.next() {
                Some(c) => c & 0x1f,
                None => {
                    return Err(Error::UnexpectedEnd {
                        span: self.span(start),
                    })
                }
            },
            c if sets => match class_escape(c) {
                Some(set) => return Ok(Escape::Set(set)),
                None => c,
            },
            c => c,
        };

        Ok(Escape::Byte(b))
    }

    fn escape_byte(&mut self) -> Result<u8, Error> {
        match self.escape(false)? {
            Escape::Byte(b) => Ok(b),
            Escape::Set(_) => unreachable!("set escape outside of a class"),
        }
    }

    /// Parses a quoted string. Strings with more than one byte are a single
    /// parenthesized term.
    fn string(&mut self, delimiter: u8) -> Result<(), Error> {
        let start = self.pos;
        self.pos += 1;

        let mut bytes = Vec::new();

        loop {
            match self.peek() {
                None => {
                    return Err(Error::UnexpectedEnd { span: self.span(start) })
                }
                Some(c) if c == delimiter => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => bytes.push(self.escape_byte()?),
                Some(c) => {
                    self.pos += 1;
                    bytes.push(c);
                }
            }
        }

        let span = self.span(start);

        match bytes.as_slice() {
            [] => self.emit(TokenKind::Empty, span),
            [b] => self.emit(TokenKind::Symbol(Symbol::Byte(*b)), span),
            _ => {
                self.emit(TokenKind::Open, span.clone());
                for b in bytes {
                    self.emit(TokenKind::Symbol(Symbol::Byte(b)), span.clone());
                }
                self.emit(TokenKind::Close, span);
            }
        }

        Ok(())
    }

    /// Parses a character class like `[a-z_]` or `[^\d]`.
    fn class(&mut self) -> Result<(), Error> {
        let start = self.pos;
        self.pos += 1;

        let negated = if self.peek() == Some(b'^') {
            self.pos += 1;
            true
        } else {
            false
        };

        let mut set = ByteSet::new();

        loop {
            let item_start = self.pos;

            let first = match self.peek() {
                None => {
                    return Err(Error::UnterminatedClass {
                        span: self.span(start),
                    })
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => match self.escape(true)? {
                    Escape::Byte(b) => b,
                    Escape::Set(s) => {
                        set.union(s);
                        continue;
                    }
                },
                Some(b'.') => {
                    self.pos += 1;
                    set.union(&DOT);
                    continue;
                }
                Some(c) => {
                    self.pos += 1;
                    c
                }
            };

            // A `-` right before the closing `]` is a literal.
            let is_range = self.peek() == Some(b'-')
                && !matches!(self.peek_at(1), Some(b']') | None);

            if !is_range {
                set.insert(first);
                continue;
            }

            self.pos += 1;

            let last = match self.peek() {
                Some(b'\\') => self.escape_byte()?,
                Some(c) => {
                    self.pos += 1;
                    c
                }
                None => unreachable!(),
            };

            if last < first {
                return Err(Error::BackwardRange {
                    first: crate::re::byte_repr(first),
                    last: crate::re::byte_repr(last),
                    span: self.span(item_start),
                });
            }

            set.insert_range(first, last);
        }

        if negated {
            set = set.complement();
        }

        self.emit_set(&set, self.span(start))
    }

    /// Parses an identifier, which is either a macro reference or a single
    /// letter.
    fn identifier(&mut self) -> Result<(), Error> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }

        let src = self.src;
        let name = &src[start..self.pos];
        let span = self.span(start);

        let Some((name, body)) =
            self.macros.and_then(|macros| macros.get_key_value(name))
        else {
            return if name.len() == 1 {
                self.emit(
                    TokenKind::Symbol(Symbol::Byte(name.as_bytes()[0])),
                    span,
                );
                Ok(())
            } else {
                Err(Error::UnknownMacro { name: name.to_string(), span })
            };
        };

        if self.expanding.contains(&name.as_str()) {
            return Err(Error::RecursiveMacro { name: name.clone(), span });
        }

        let mut expanding = self.expanding.clone();
        expanding.push(name.as_str());

        let expansion = Normalizer {
            src: body.as_str(),
            pos: 0,
            macros: self.macros,
            actions: &mut *self.actions,
            expanding,
            origin: Some(span.clone()),
            tokens: Vec::new(),
        }
        .run()
        .map_err(|err| err.with_span(span.clone()))?;

        self.emit(TokenKind::Open, span.clone());
        self.tokens.extend(expansion);
        self.emit(TokenKind::Close, span);

        Ok(())
    }

    /// Parses an action block. The text between the outermost braces is
    /// registered verbatim.
    fn action(&mut self) -> Result<(), Error> {
        let start = self.pos;
        self.pos += 1;

        let body_start = self.pos;
        let mut depth = 1;

        while depth > 0 {
            match self.next() {
                None => {
                    return Err(Error::UnexpectedEnd { span: self.span(start) })
                }
                Some(b'{') => depth += 1,
                Some(b'}') => depth -= 1,
                // Braces inside string and character literals don't count.
                Some(quote @ (b'"' | b'\'')) => loop {
                    match self.next() {
                        None => {
                            return Err(Error::UnexpectedEnd {
                                span: self.span(start),
                            })
                        }
                        Some(b'\\') => {
                            self.next();
                        }
                        Some(c) if c == quote => break,
                        Some(_) => {}
                    }
                },
                Some(_) => {}
            }
        }

        let idx = self.actions.add(&self.src[body_start..self.pos - 1]);
        self.emit(TokenKind::Symbol(Symbol::Action(idx)), self.span(start));

        Ok(())
    }

    /// Parses a bounded repetition like `{2}`, `{2,}`, `{,4}` or `{2,4}`.
    fn quantifier(&mut self) -> Result<(), Error> {
        let start = self.pos;
        self.pos += 1;

        let min = self.number(start)?;

        let (min, max) = if self.peek() == Some(b',') {
            self.pos += 1;
            (min.unwrap_or(0), self.number(start)?)
        } else {
            // The first character after `{` is a digit or a comma, so if
            // there's no comma there must be a number.
            let min = min.unwrap_or(0);
            (min, Some(min))
        };

        if self.peek() != Some(b'}') {
            return Err(Error::MissingBrace { span: self.span(start) });
        }

        self.pos += 1;
        self.repeat(min, max, self.span(start))
    }

    fn number(&mut self, start: usize) -> Result<Option<u32>, Error> {
        let digits_start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if digits_start == self.pos {
            return Ok(None);
        }
        self.src[digits_start..self.pos]
            .parse::<u32>()
            .map(Some)
            .map_err(|_| Error::TooManyRepetitions { span: self.span(start) })
    }

    /// Returns the index of the first token of the last complete term, or
    /// `None` if the token stream doesn't end with a complete term.
    fn term_start(&self) -> Option<usize> {
        let mut i = self.tokens.len();

        while i > 0 && self.tokens[i - 1].kind == TokenKind::Closure {
            i -= 1;
        }

        match self.tokens.get(i.checked_sub(1)?)?.kind {
            TokenKind::Symbol(_) | TokenKind::Empty => Some(i - 1),
            TokenKind::Close => {
                let mut depth = 0;
                for j in (0..i).rev() {
                    match self.tokens[j].kind {
                        TokenKind::Close => depth += 1,
                        TokenKind::Open => {
                            depth -= 1;
                            if depth == 0 {
                                return Some(j);
                            }
                        }
                        _ => {}
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Applies the repetition `{min,max}` to the last complete term. A `max`
    /// of `None` means there's no upper bound.
    ///
    /// Except for `*`, which has its own postfix operator, repetitions are
    /// expanded by copying the term. `{m,}` becomes `m` copies followed by a
    /// closure of one more copy, `{m,n}` becomes an alternation of `m` to `n`
    /// concatenated copies and `{m}` becomes `m` concatenated copies.
    fn repeat(
        &mut self,
        min: u32,
        max: Option<u32>,
        span: Span,
    ) -> Result<(), Error> {
        if matches!(max, Some(max) if max < min) {
            return Err(Error::InvalidRepetition { span });
        }

        if min > MAX_REPETITION || max.is_some_and(|max| max > MAX_REPETITION)
        {
            return Err(Error::TooManyRepetitions { span });
        }

        let start =
            self.term_start().ok_or(Error::NothingToRepeat { span: span.clone() })?;

        match (min, max) {
            (1, Some(1)) => {}
            (0, None) => self.emit(TokenKind::Closure, span),
            (_, Some(0)) => {
                self.tokens.truncate(start);
                self.emit(TokenKind::Empty, span);
            }
            (min, max) => {
                let copies = match max {
                    None => min as usize + 1,
                    Some(max) => (min..=max).map(|n| n as usize).sum(),
                };

                if (self.tokens.len() - start).saturating_mul(copies)
                    > MAX_TOKENS - self.tokens.len().min(MAX_TOKENS)
                {
                    return Err(Error::PatternTooLarge { span });
                }

                let term: Vec<Token> = self.tokens.drain(start..).collect();

                self.emit(TokenKind::Open, span.clone());

                match max {
                    None => {
                        for _ in 0..=min {
                            self.emit_all(&term);
                        }
                        self.emit(TokenKind::Closure, span.clone());
                    }
                    Some(max) if max == min => {
                        for _ in 0..min {
                            self.emit_all(&term);
                        }
                    }
                    Some(max) => {
                        for count in min..=max {
                            if count > min {
                                self.emit(TokenKind::Or, span.clone());
                            }
                            if count == 0 {
                                self.emit(TokenKind::Empty, span.clone());
                            }
                            for _ in 0..count {
                                self.emit_all(&term);
                            }
                        }
                    }
                }

                self.emit(TokenKind::Close, span);
            }
        }

        Ok(())
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
