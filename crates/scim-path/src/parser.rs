//! SCIM path and filter parser (RFC 7644 section 3.4.2.2).

use crate::types::*;
use crate::util::split_urn;
use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unknown operator {0:?}")]
    UnknownOperator(String),
    #[error("unterminated string literal")]
    UnclosedString,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid number")]
    InvalidNumber,
    #[error("empty attribute name")]
    EmptySegment,
    #[error("only one filter is allowed per path")]
    NestedFilter,
}

/// Syntax error carrying the offending text and the byte offset of the failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset} in {input:?}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub input: String,
    pub offset: usize,
}

/// SCIM path and filter parser.
pub struct PathParser<'a> {
    input: &'a str,
    pos: usize,
    seen_filter: bool,
}

impl<'a> PathParser<'a> {
    /// Parse an attribute path such as `emails[type eq "work"].value`.
    ///
    /// The empty string parses to the root path.
    pub fn parse_path(input: &'a str) -> Result<Path, ParseError> {
        let mut parser = Self { input, pos: 0, seen_filter: false };
        parser.path()
    }

    /// Parse a standalone filter expression such as `type eq "work" and primary eq true`.
    pub fn parse_filter(input: &'a str) -> Result<Filter, ParseError> {
        let mut parser = Self { input, pos: 0, seen_filter: false };
        let filter = parser.filter_expression()?;
        parser.skip_whitespace();
        match parser.peek() {
            None => Ok(filter),
            Some(c) => Err(parser.error(ParseErrorKind::UnexpectedChar(c))),
        }
    }

    fn path(&mut self) -> Result<Path, ParseError> {
        if self.input.is_empty() {
            return Ok(Path::root());
        }

        // The URN qualifier may itself contain dots ("2.0"), so it is cut off
        // before segment parsing, looking only at the text ahead of any filter.
        let input: &'a str = self.input;
        let head_end = input.find('[').unwrap_or(input.len());
        let (schema, _) = split_urn(&input[..head_end]);
        if let Some(urn) = schema {
            self.pos = urn.len() + 1;
        }

        let mut segments = Vec::new();
        loop {
            let name = self.segment_name()?;
            let filter = if self.peek() == Some('[') {
                if self.seen_filter {
                    return Err(self.error(ParseErrorKind::NestedFilter));
                }
                self.seen_filter = true;
                self.advance();
                let filter = self.filter_expression()?;
                self.skip_whitespace();
                self.expect(']')?;
                Some(filter)
            } else {
                None
            };
            segments.push(Segment { name, filter });

            match self.peek() {
                None => break,
                Some('.') => self.advance(),
                Some(c) => return Err(self.error(ParseErrorKind::UnexpectedChar(c))),
            }
        }

        Ok(Path::new(schema.map(str::to_string), segments))
    }

    fn segment_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error(ParseErrorKind::EmptySegment));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    // `and` and `or` share one precedence level and associate to the left.
    fn filter_expression(&mut self) -> Result<Filter, ParseError> {
        let mut left = self.unary_expression()?;

        loop {
            self.skip_whitespace();
            let save = self.pos;
            let word = self.peek_word();
            let op = if word.eq_ignore_ascii_case("and") {
                LogicalOp::And
            } else if word.eq_ignore_ascii_case("or") {
                LogicalOp::Or
            } else {
                self.pos = save;
                break;
            };
            self.advance_by(word.len());
            if !self.skip_whitespace() && self.peek() != Some('(') {
                return Err(self.unexpected());
            }
            let right = self.unary_expression()?;
            left = Filter::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn unary_expression(&mut self) -> Result<Filter, ParseError> {
        self.skip_whitespace();

        if self.peek() == Some('(') {
            self.advance();
            let expr = self.filter_expression()?;
            self.skip_whitespace();
            self.expect(')')?;
            return Ok(expr);
        }

        let word = self.peek_word();
        if word.eq_ignore_ascii_case("not") {
            let rest = &self.input[self.pos + word.len()..];
            if rest.starts_with('(') || rest.starts_with(char::is_whitespace) {
                self.advance_by(word.len());
                let inner = self.unary_expression()?;
                return Ok(Filter::Not(Box::new(inner)));
            }
        }

        self.comparison()
    }

    fn comparison(&mut self) -> Result<Filter, ParseError> {
        let path = self.attribute_path()?;

        if !self.skip_whitespace() {
            return Err(self.unexpected());
        }
        let op_start = self.pos;
        let token = self.peek_word();
        let op = match CompareOp::from_token(token) {
            Some(op) => op,
            None if token.is_empty() => return Err(self.unexpected()),
            None => {
                return Err(ParseError {
                    kind: ParseErrorKind::UnknownOperator(token.to_string()),
                    input: self.input.to_string(),
                    offset: op_start,
                })
            }
        };
        self.advance_by(token.len());

        if op == CompareOp::Present {
            return Ok(Filter::Comparison { path, op, value: Value::Null });
        }

        if !self.skip_whitespace() {
            return Err(self.unexpected());
        }
        let value = self.literal()?;
        Ok(Filter::Comparison { path, op, value })
    }

    fn attribute_path(&mut self) -> Result<Path, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_name_char(c) || c == '.' || c == ':' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.unexpected());
        }

        let token = &self.input[start..self.pos];
        let (schema, dotted) = split_urn(token);
        let mut segments = Vec::new();
        let mut offset = start + schema.map(|urn| urn.len() + 1).unwrap_or(0);
        for name in dotted.split('.') {
            if name.is_empty() {
                return Err(ParseError {
                    kind: ParseErrorKind::EmptySegment,
                    input: self.input.to_string(),
                    offset,
                });
            }
            segments.push(Segment::new(name));
            offset += name.len() + 1;
        }
        Ok(Path::new(schema.map(str::to_string), segments))
    }

    fn literal(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some('"') => self.string().map(Value::String),
            Some('-') | Some('0'..='9') => self.number(),
            Some(_) => {
                let word = self.peek_word();
                let value = if word.eq_ignore_ascii_case("true") {
                    Value::Bool(true)
                } else if word.eq_ignore_ascii_case("false") {
                    Value::Bool(false)
                } else if word.eq_ignore_ascii_case("null") {
                    Value::Null
                } else {
                    return Err(self.unexpected());
                };
                self.advance_by(word.len());
                Ok(value)
            }
            None => Err(self.error(ParseErrorKind::UnexpectedEnd)),
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let open = self.pos;
        self.advance();

        let mut result = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError {
                        kind: ParseErrorKind::UnclosedString,
                        input: self.input.to_string(),
                        offset: open,
                    })
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{0008}',
                        Some('f') => '\u{000C}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => {
                            self.advance();
                            result.push(self.unicode_escape()?);
                            continue;
                        }
                        _ => return Err(self.error(ParseErrorKind::InvalidEscape)),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        Ok(result)
    }

    fn unicode_escape(&mut self) -> Result<char, ParseError> {
        let high = self.hex4()?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.error(ParseErrorKind::InvalidEscape));
        }
        if !self.peek_str("\\u") {
            return Err(self.error(ParseErrorKind::InvalidEscape));
        }
        self.advance_by(2);
        let low = self.hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.error(ParseErrorKind::InvalidEscape));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| self.error(ParseErrorKind::InvalidEscape))
    }

    fn hex4(&mut self) -> Result<u32, ParseError> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error(ParseErrorKind::InvalidEscape))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error(ParseErrorKind::InvalidEscape));
        }
        let code =
            u32::from_str_radix(digits, 16).map_err(|_| self.error(ParseErrorKind::InvalidEscape))?;
        self.advance_by(4);
        Ok(code)
    }

    fn number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let mut fractional = false;

        if self.peek() == Some('-') {
            self.advance();
        }
        if !matches!(self.peek(), Some('0'..='9')) {
            return Err(self.error(ParseErrorKind::InvalidNumber));
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        if self.peek() == Some('.') {
            fractional = true;
            self.advance();
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(self.error(ParseErrorKind::InvalidNumber));
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            fractional = true;
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(self.error(ParseErrorKind::InvalidNumber));
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        let text = &self.input[start..self.pos];
        let invalid = || ParseError {
            kind: ParseErrorKind::InvalidNumber,
            input: self.input.to_string(),
            offset: start,
        };
        if !fractional {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
        }
        let n = text.parse::<f64>().map_err(|_| invalid())?;
        Number::from_f64(n).map(Value::Number).ok_or_else(invalid)
    }

    /// The run of ASCII letters at the cursor, without consuming it.
    fn peek_word(&self) -> &'a str {
        let input: &'a str = self.input;
        let rest = &input[self.pos..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        &rest[..len]
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Returns whether any whitespace was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        self.pos > start
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(c) => self.error(ParseErrorKind::UnexpectedChar(c)),
            None => self.error(ParseErrorKind::UnexpectedEnd),
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            input: self.input.to_string(),
            offset: self.pos,
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '$'
}
