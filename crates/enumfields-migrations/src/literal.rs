//! Literal expressions for frozen enum text.
//!
//! Frozen enums are written as Python-style literal text, e.g.
//! `('tests.test_enums', 'Color', (('RED', 'r'), ('GREEN', 'g')))`. This module
//! reads and writes that format. The reader only understands literals
//! (strings, numbers, `None`, `True`, `False`, tuples and lists); there is no
//! evaluation, and anything else is a syntax error.

use std::fmt::{self, Write as _};

use enumfields_core::error::{EnumFieldError, EnumFieldResult};

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// An integer that fits in 64 bits.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Str(String),
    /// A tuple, `(a, b)` or `(a,)` or `()`.
    Tuple(Vec<Literal>),
    /// A list, `[a, b]`.
    List(Vec<Literal>),
}

impl Literal {
    /// Returns the string, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items of a tuple or list.
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(items) | Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns a short name for the literal's kind, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write_float(f, *v),
            Self::Str(s) => f.write_str(&quote(s)),
            Self::Tuple(items) => {
                f.write_char('(')?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Self::List(items) => {
                f.write_char('[')?;
                write_items(f, items)?;
                f.write_char(']')
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("nan")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "inf" } else { "-inf" })
    } else {
        write!(f, "{v:?}")
    }
}

/// Quotes `s` as a string literal.
///
/// Single quotes are used unless the string contains a single quote and no
/// double quote. Backslashes, the chosen quote and control characters are
/// escaped; everything else is written as is.
///
/// # Examples
///
/// ```
/// use enumfields_migrations::literal::quote;
///
/// assert_eq!(quote("r"), "'r'");
/// assert_eq!(quote("it's"), "\"it's\"");
/// assert_eq!(quote("a\nb"), "'a\\nb'");
/// ```
pub fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() && (c as u32) < 0x100 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Parses literal text into a [`Literal`].
///
/// # Errors
///
/// Returns [`EnumFieldError::LiteralSyntax`] with the byte offset of the
/// first problem if `text` is not exactly one literal expression.
///
/// # Examples
///
/// ```
/// use enumfields_migrations::literal::{parse, Literal};
///
/// let lit = parse("(u'RED', 'r')").unwrap();
/// assert_eq!(
///     lit,
///     Literal::Tuple(vec![Literal::Str("RED".into()), Literal::Str("r".into())])
/// );
/// assert!(parse("__import__('os')").is_err());
/// ```
pub fn parse(text: &str) -> EnumFieldResult<Literal> {
    let mut parser = Parser { src: text, pos: 0 };
    parser.skip_whitespace();
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> EnumFieldError {
        self.error_at(self.pos, message)
    }

    #[allow(clippy::unused_self)]
    fn error_at(&self, position: usize, message: impl Into<String>) -> EnumFieldError {
        EnumFieldError::LiteralSyntax {
            position,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '\\' && matches!(self.peek_second(), Some('\n')) {
                self.pos += 2;
            } else {
                break;
            }
        }
    }

    fn parse_value(&mut self) -> EnumFieldResult<Literal> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('(') => self.parse_parenthesized(),
            Some('[') => {
                self.bump();
                let items = self.parse_items(']')?.0;
                Ok(Literal::List(items))
            }
            Some('\'' | '"') => self.parse_strings(),
            Some(c) if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' => {
                self.parse_number()
            }
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_word(),
            Some(c) => Err(self.error(format!("unexpected character {c:?}"))),
        }
    }

    fn parse_parenthesized(&mut self) -> EnumFieldResult<Literal> {
        self.bump();
        let (mut items, trailing_comma) = self.parse_items(')')?;
        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Literal::Tuple(items))
    }

    /// Parses comma-separated values up to `close`, consuming it.
    ///
    /// Returns the items and whether the last item was followed by a comma.
    fn parse_items(&mut self, close: char) -> EnumFieldResult<(Vec<Literal>, bool)> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, trailing_comma));
            }
            if !items.is_empty() && !trailing_comma {
                return Err(self.error(format!("expected ',' or {close:?}")));
            }
            items.push(self.parse_value()?);
            self.skip_whitespace();
            trailing_comma = self.peek() == Some(',');
            if trailing_comma {
                self.bump();
            }
        }
    }

    fn parse_word(&mut self) -> EnumFieldResult<Literal> {
        let start = self.pos;
        let first = self.peek();
        let second = self.peek_second();
        if let (Some(prefix), Some('\'' | '"')) = (first, second) {
            if matches!(prefix, 'u' | 'U' | 'r' | 'R') {
                return self.parse_strings();
            }
            return Err(self.error(format!("unsupported string prefix {prefix:?}")));
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            word => Err(self.error_at(start, format!("'{word}' is not a literal"))),
        }
    }

    /// Parses one or more adjacent string literals, concatenating them.
    fn parse_strings(&mut self) -> EnumFieldResult<Literal> {
        let mut value = self.parse_string()?;
        loop {
            let save = self.pos;
            self.skip_whitespace();
            let next_is_string = match (self.peek(), self.peek_second()) {
                (Some('\'' | '"'), _) => true,
                (Some('u' | 'U' | 'r' | 'R'), Some('\'' | '"')) => true,
                _ => false,
            };
            if !next_is_string {
                self.pos = save;
                return Ok(Literal::Str(value));
            }
            value.push_str(&self.parse_string()?);
        }
    }

    fn parse_string(&mut self) -> EnumFieldResult<String> {
        let start = self.pos;
        let mut raw = false;
        if let Some(prefix @ ('u' | 'U' | 'r' | 'R')) = self.peek() {
            raw = matches!(prefix, 'r' | 'R');
            self.bump();
        }
        let Some(delimiter @ ('\'' | '"')) = self.bump() else {
            return Err(self.error_at(start, "expected a string"));
        };
        if self.rest().starts_with(delimiter) && self.rest()[1..].starts_with(delimiter) {
            return Err(self.error_at(start, "triple-quoted strings are not supported"));
        }

        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                c if c == delimiter => return Ok(out),
                '\n' => return Err(self.error_at(start, "unterminated string")),
                '\\' if raw => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.parse_escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> EnumFieldResult<()> {
        let escape_start = self.pos - 1;
        let Some(c) = self.bump() else {
            return Err(self.error_at(escape_start, "unterminated string"));
        };
        match c {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            'x' => out.push(self.parse_hex_escape(escape_start, 2)?),
            'u' => out.push(self.parse_hex_escape(escape_start, 4)?),
            'U' => out.push(self.parse_hex_escape(escape_start, 8)?),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn parse_hex_escape(&mut self, escape_start: usize, digits: usize) -> EnumFieldResult<char> {
        let hex: String = self.rest().chars().take(digits).collect();
        if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error_at(escape_start, "truncated hex escape"));
        }
        self.pos += digits;
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error_at(escape_start, "invalid code point in escape"))
    }

    fn parse_number(&mut self) -> EnumFieldResult<Literal> {
        let start = self.pos;
        let mut negative = false;
        while let Some(sign @ ('-' | '+')) = self.peek() {
            if sign == '-' {
                negative = !negative;
            }
            self.bump();
            self.skip_whitespace();
        }

        let body_start = self.pos;
        let radix = match (self.peek(), self.peek_second()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            self.pos += 2;
            let digits = self.take_while(|c| c.is_digit(radix) || c == '_');
            return self.finish_int(start, &digits, radix, negative);
        }

        let mut is_float = false;
        let mut text = self.take_while(|c| c.is_ascii_digit() || c == '_');
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit() || c == '_'));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            text.push('e');
            if let Some(sign @ ('-' | '+')) = self.peek() {
                self.bump();
                text.push(sign);
            }
            text.push_str(&self.take_while(|c| c.is_ascii_digit() || c == '_'));
        }
        if self.pos == body_start || text == "." {
            return Err(self.error_at(start, "expected a number"));
        }
        if let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                return Err(self.error(format!("unexpected character {c:?} in number")));
            }
        }

        if is_float {
            let value: f64 = text
                .replace('_', "")
                .parse()
                .map_err(|_| self.error_at(start, format!("invalid float '{text}'")))?;
            return Ok(Literal::Float(if negative { -value } else { value }));
        }
        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0' && c != '_') {
            return Err(self.error_at(body_start, "leading zeros in integer"));
        }
        self.finish_int(start, &text, 10, negative)
    }

    fn finish_int(
        &self,
        start: usize,
        digits: &str,
        radix: u32,
        negative: bool,
    ) -> EnumFieldResult<Literal> {
        if digits.is_empty()
            || digits.starts_with('_')
            || digits.ends_with('_')
            || digits.contains("__")
        {
            return Err(self.error_at(start, "malformed integer"));
        }
        let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
        let signed = if negative {
            format!("-{cleaned}")
        } else {
            cleaned
        };
        i64::from_str_radix(&signed, radix)
            .map(Literal::Int)
            .map_err(|_| self.error_at(start, "integer out of range"))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.bump();
            } else {
                break;
            }
        }
        self.src[start..self.pos].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Literal {
        Literal::Str(v.to_string())
    }

    fn position(err: &EnumFieldError) -> usize {
        match err {
            EnumFieldError::LiteralSyntax { position, .. } => *position,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    // ── Parsing ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_frozen_color() {
        let lit =
            parse("('tests.test_enums', 'Color', (('RED', 'r'), ('GREEN', 'g'), ('BLUE', 'b')))")
                .unwrap();
        assert_eq!(
            lit,
            Literal::Tuple(vec![
                s("tests.test_enums"),
                s("Color"),
                Literal::Tuple(vec![
                    Literal::Tuple(vec![s("RED"), s("r")]),
                    Literal::Tuple(vec![s("GREEN"), s("g")]),
                    Literal::Tuple(vec![s("BLUE"), s("b")]),
                ]),
            ])
        );
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("None").unwrap(), Literal::None);
        assert_eq!(parse("True").unwrap(), Literal::Bool(true));
        assert_eq!(parse(" False ").unwrap(), Literal::Bool(false));
        assert_eq!(parse("42").unwrap(), Literal::Int(42));
        assert_eq!(parse("-7").unwrap(), Literal::Int(-7));
        assert_eq!(parse("- 7").unwrap(), Literal::Int(-7));
        assert_eq!(parse("1_000").unwrap(), Literal::Int(1000));
        assert_eq!(parse("0x1F").unwrap(), Literal::Int(31));
        assert_eq!(parse("0o17").unwrap(), Literal::Int(15));
        assert_eq!(parse("0b101").unwrap(), Literal::Int(5));
        assert_eq!(parse("0").unwrap(), Literal::Int(0));
        assert_eq!(parse("1.5").unwrap(), Literal::Float(1.5));
        assert_eq!(parse(".5").unwrap(), Literal::Float(0.5));
        assert_eq!(parse("2e3").unwrap(), Literal::Float(2000.0));
        assert_eq!(parse("-1.0").unwrap(), Literal::Float(-1.0));
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(parse("'r'").unwrap(), s("r"));
        assert_eq!(parse("\"r\"").unwrap(), s("r"));
        assert_eq!(parse("u'bluë'").unwrap(), s("bluë"));
        assert_eq!(parse(r"'it\'s'").unwrap(), s("it's"));
        assert_eq!(parse(r"'a\nb\t\\'").unwrap(), s("a\nb\t\\"));
        assert_eq!(parse(r"'\x41ë\U0001F600'").unwrap(), s("Aë😀"));
        assert_eq!(parse(r"'\101'").unwrap(), s("A"));
        assert_eq!(parse(r"'\q'").unwrap(), s("\\q"));
        assert_eq!(parse(r"r'\n'").unwrap(), s("\\n"));
        assert_eq!(parse("'a' 'b'").unwrap(), s("ab"));
    }

    #[test]
    fn test_parse_tuples_and_lists() {
        assert_eq!(parse("()").unwrap(), Literal::Tuple(vec![]));
        assert_eq!(parse("(1,)").unwrap(), Literal::Tuple(vec![Literal::Int(1)]));
        assert_eq!(parse("(1)").unwrap(), Literal::Int(1));
        assert_eq!(
            parse("(1, 2,)").unwrap(),
            Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)])
        );
        assert_eq!(
            parse("[1, 'a', None]").unwrap(),
            Literal::List(vec![Literal::Int(1), s("a"), Literal::None])
        );
        assert_eq!(parse("[]").unwrap(), Literal::List(vec![]));
        assert_eq!(
            parse("(\n  ('A', 1),\n  ('B', 2),\n)").unwrap().as_sequence().unwrap().len(),
            2
        );
    }

    #[test]
    fn test_rejects_non_literals() {
        for text in [
            "__import__('os').system('true')",
            "Color.RED",
            "x",
            "1 + 2",
            "(1, 2",
            "[1 2]",
            "'unterminated",
            "b'bytes'",
            "'''triple'''",
            "",
            "1,",
            "{1: 2}",
            "007",
            "99999999999999999999",
            "1__0",
            "12abc",
        ] {
            assert!(parse(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn test_error_positions() {
        assert_eq!(position(&parse("(1, foo)").unwrap_err()), 4);
        assert_eq!(position(&parse("1 2").unwrap_err()), 2);
        assert_eq!(position(&parse("('a' , @)").unwrap_err()), 7);
    }

    // ── Writing ─────────────────────────────────────────────────────

    #[test]
    fn test_display() {
        let lit = Literal::Tuple(vec![
            s("m"),
            Literal::Tuple(vec![Literal::Tuple(vec![s("ONE"), Literal::Int(1)])]),
            Literal::List(vec![Literal::None, Literal::Bool(true), Literal::Float(1.0)]),
        ]);
        assert_eq!(lit.to_string(), "('m', (('ONE', 1),), [None, True, 1.0])");
        assert_eq!(Literal::Tuple(vec![]).to_string(), "()");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote(""), "''");
        assert_eq!(quote("bluë"), "'bluë'");
        assert_eq!(quote("both ' and \""), r#"'both \' and "'"#);
        assert_eq!(quote("back\\slash"), r"'back\\slash'");
        assert_eq!(quote("\u{01}"), r"'\x01'");
    }

    #[test]
    fn test_written_text_parses_back() {
        let lit = Literal::Tuple(vec![
            s("it's \"quoted\"\n"),
            Literal::Int(-3),
            Literal::Float(0.25),
            Literal::Tuple(vec![s("x")]),
        ]);
        assert_eq!(parse(&lit.to_string()).unwrap(), lit);
    }
}
