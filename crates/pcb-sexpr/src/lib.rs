//! A simple S-expression parser that tracks source spans for each node.
//!
//! # Navigating parsed trees
//!
//! Decoders built on this crate consume the tree through a small set of
//! fallible accessors (see [`access`]):
//!
//! - [`Sexpr::child`] / [`Sexpr::num_children`] - positional access into lists
//! - [`Sexpr::head`] - the leading keyword of a `(keyword arg...)` clause
//! - [`Sexpr::coerce_string`], [`Sexpr::coerce_int`], [`Sexpr::coerce_f64`] -
//!   scalar coercions that fail with an [`AccessError`] instead of panicking

pub mod access;

pub use access::AccessError;

use std::fmt;

/// Byte span in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// The kind of S-expression value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SexprKind {
    /// A symbol - unquoted identifier
    Symbol(String),
    /// A string - quoted text
    String(String),
    /// An integer value
    Int(i64),
    /// A floating-point value
    F64(f64),
    /// A list of S-expressions
    List(Vec<Sexpr>),
}

/// An S-expression value with source span
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sexpr {
    /// The kind of S-expression
    pub kind: SexprKind,
    /// Source span (byte offsets)
    pub span: Span,
}

impl PartialEq for Sexpr {
    fn eq(&self, other: &Self) -> bool {
        // Compare only the kind, not the span
        self.kind == other.kind
    }
}

impl Sexpr {
    /// Create a new Sexpr with a span
    pub fn with_span(kind: SexprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create a symbol (unquoted atom) with an empty span
    pub fn symbol(s: impl Into<String>) -> Self {
        Self {
            kind: SexprKind::Symbol(s.into()),
            span: Span::default(),
        }
    }

    /// Check if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self.kind, SexprKind::List(_))
    }

    /// Check if this is an atom (anything but a list)
    pub fn is_scalar(&self) -> bool {
        !self.is_list()
    }

    /// Get the atom value if this is an atom (symbol or string)
    pub fn as_atom(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::Symbol(s) | SexprKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the list items if this is a list
    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match &self.kind {
            SexprKind::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Parser for S-expressions
pub struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            chars: input.char_indices().peekable(),
            current_pos: 0,
        }
    }

    /// Parse the input and return the S-expression
    pub fn parse(&mut self) -> Result<Sexpr, ParseError> {
        self.skip_whitespace();
        if self.is_at_end() {
            return Err(ParseError::UnexpectedEof);
        }

        match self.peek_char() {
            Some('(') => self.parse_list(),
            Some(')') => Err(ParseError::UnexpectedClose(self.current_pos)),
            _ => self.parse_atom(),
        }
    }

    /// Parse multiple S-expressions from the input
    pub fn parse_all(&mut self) -> Result<Vec<Sexpr>, ParseError> {
        let mut results = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            results.push(self.parse()?);
        }

        Ok(results)
    }

    fn parse_list(&mut self) -> Result<Sexpr, ParseError> {
        let start_pos = self.current_pos;
        self.expect('(')?;
        let mut items = Vec::new();
        let mut item_count = 0;

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                return Err(ParseError::UnclosedList);
            }

            if self.peek_char() == Some(')') {
                self.advance();
                break;
            }

            items.push(self.parse()?);
            item_count += 1;

            // Log progress for large lists
            if item_count % 1000 == 0 {
                log::trace!("Parsed {item_count} items in list at position {start_pos}");
            }
        }

        let end_pos = self.current_pos;
        Ok(Sexpr::with_span(
            SexprKind::List(items),
            Span::new(start_pos, end_pos),
        ))
    }

    fn parse_atom(&mut self) -> Result<Sexpr, ParseError> {
        self.skip_whitespace();

        if self.peek_char() == Some('"') {
            // Parse quoted string
            self.parse_string()
        } else {
            // Parse unquoted atom - could be number or symbol
            let start = self.current_pos;
            while let Some(ch) = self.peek_char() {
                if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                    break;
                }
                self.advance();
            }

            if self.current_pos == start {
                return Err(ParseError::EmptyAtom);
            }

            let end = self.current_pos;
            let atom_str = &self.input[start..end];
            let span = Span::new(start, end);

            Ok(Sexpr::with_span(classify_atom(atom_str), span))
        }
    }

    fn parse_string(&mut self) -> Result<Sexpr, ParseError> {
        let start_pos = self.current_pos;
        self.expect('"')?;
        let mut result = String::new();

        loop {
            match self.peek_char() {
                None => return Err(ParseError::UnterminatedString),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('n') => {
                            result.push('\n');
                            self.advance();
                        }
                        Some('r') => {
                            result.push('\r');
                            self.advance();
                        }
                        Some('t') => {
                            result.push('\t');
                            self.advance();
                        }
                        Some(ch) => {
                            result.push(ch);
                            self.advance();
                        }
                        None => return Err(ParseError::UnterminatedString),
                    }
                }
                Some(ch) => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        let end_pos = self.current_pos;
        Ok(Sexpr::with_span(
            SexprKind::String(result),
            Span::new(start_pos, end_pos),
        ))
    }

    fn skip_whitespace(&mut self) {
        let start_pos = self.current_pos;
        let mut skipped = 0;

        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance();
                skipped += 1;
            } else if ch == ';' {
                // Skip comment until end of line
                self.advance();
                while let Some(ch) = self.peek_char() {
                    self.advance();
                    if ch == '\n' {
                        break;
                    }
                }
                skipped += 1;
            } else {
                break;
            }

            if skipped % 10000 == 0 && skipped > 0 {
                log::trace!(
                    "Skipped {skipped} whitespace/comment chars starting at position {start_pos}"
                );
            }
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn advance(&mut self) {
        if let Some((pos, ch)) = self.chars.next() {
            // pos is the start of the char, we want the position after it
            self.current_pos = pos + ch.len_utf8();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError::UnexpectedChar(ch, expected)),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }
}

/// Classify an unquoted atom as an integer, float or symbol.
///
/// Only plain decimal notation that prints back to the same text is numeric.
/// Everything else (`007`, `+5`, `4.70`, `1.0`, a hex timestamp such as
/// `5E125702`) stays a symbol so string coercion returns it verbatim.
/// Numeric coercion still accepts them.
fn classify_atom(atom: &str) -> SexprKind {
    if !is_plain_decimal(atom) {
        return SexprKind::Symbol(atom.to_string());
    }
    if atom.contains('.') {
        if let Ok(float_val) = atom.parse::<f64>()
            && float_val.to_string() == atom
        {
            return SexprKind::F64(float_val);
        }
    } else if let Ok(int_val) = atom.parse::<i64>()
        && int_val.to_string() == atom
    {
        return SexprKind::Int(int_val);
    }
    SexprKind::Symbol(atom.to_string())
}

/// `[+-]digits[.digits]`, with digits on at least one side of the point.
fn is_plain_decimal(atom: &str) -> bool {
    let digits = atom.strip_prefix(['-', '+']).unwrap_or(atom);
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    !(int_part.is_empty() && frac_part.is_empty())
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a string into an S-expression
pub fn parse(input: &str) -> Result<Sexpr, ParseError> {
    log::trace!("Parsing S-expression from {} bytes of input", input.len());
    let result = Parser::new(input).parse();
    match &result {
        Ok(_) => log::trace!("Successfully parsed S-expression"),
        Err(e) => log::trace!("Failed to parse S-expression: {e:?}"),
    }
    result
}

/// Parse a string into multiple S-expressions
pub fn parse_all(input: &str) -> Result<Vec<Sexpr>, ParseError> {
    log::trace!(
        "Parsing multiple S-expressions from {} bytes of input",
        input.len()
    );
    let result = Parser::new(input).parse_all();
    match &result {
        Ok(exprs) => log::trace!("Successfully parsed {} S-expressions", exprs.len()),
        Err(e) => log::trace!("Failed to parse S-expressions: {e:?}"),
    }
    result
}

/// Parse a whole document into a single list node holding every top-level
/// expression.
///
/// A well-formed KiCad file yields a document with exactly one child. The
/// returned node spans the full input.
pub fn parse_document(input: &str) -> Result<Sexpr, ParseError> {
    let items = parse_all(input)?;
    Ok(Sexpr::with_span(
        SexprKind::List(items),
        Span::new(0, input.len()),
    ))
}

/// Errors that can occur during parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedEof,
    UnexpectedChar(char, char),
    /// A `)` with no matching `(`, at the given byte offset
    UnexpectedClose(usize),
    UnclosedList,
    UnterminatedString,
    EmptyAtom,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEof => write!(f, "Unexpected end of input"),
            ParseError::UnexpectedChar(found, expected) => {
                write!(f, "Expected '{expected}', found '{found}'")
            }
            ParseError::UnexpectedClose(pos) => write!(f, "Unexpected ')' at byte {pos}"),
            ParseError::UnclosedList => write!(f, "Unclosed list"),
            ParseError::UnterminatedString => write!(f, "Unterminated string"),
            ParseError::EmptyAtom => write!(f, "Empty atom"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Single-line rendering, used in diagnostics.
impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SexprKind::Symbol(s) => write!(f, "{s}"),
            SexprKind::String(s) => write!(f, "{s:?}"),
            SexprKind::Int(n) => write!(f, "{n}"),
            SexprKind::F64(v) => write!(f, "{v}"),
            SexprKind::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}
