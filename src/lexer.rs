use crate::error::{ExprError, Result};
use crate::parse::{classify, looks_like_int, scan_decimal, scan_integer};
use crate::types::{Operator, TokenKind};
use crate::value::Value;
use crate::{String, ToString};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub position: usize,
}

/// The lexer struct, which produces tokens from an input string.
///
/// Signs are never part of a number: `-5` lexes as an operator followed by `5`, and
/// the evaluator decides whether the operator is unary.
#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pub pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn get_original_input(&self) -> &'a str {
        self.input
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn syntax_error(&self) -> ExprError {
        ExprError::Syntax {
            expr: self.input.to_string(),
        }
    }

    /// Get the next token from the input.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let position = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::End,
                position,
            });
        };

        if c.is_ascii_digit() || c == '.' {
            if let Some(value) = self.number()? {
                return Ok(Token {
                    kind: TokenKind::Value(value),
                    position,
                });
            }
        }

        let kind = match c {
            '$' => {
                self.advance();
                self.variable()?
            }
            '[' => {
                self.advance();
                TokenKind::Command(self.bracketed()?)
            }
            '"' => {
                self.advance();
                TokenKind::Value(classify(&self.quoted()?)?)
            }
            '{' => {
                self.advance();
                TokenKind::Value(classify(&self.braced()?)?)
            }
            c if c.is_ascii_alphabetic() => self.function_name()?,
            _ => {
                self.advance();
                self.punctuation(c)
            }
        };
        Ok(Token { kind, position })
    }

    fn number(&mut self) -> Result<Option<Value>> {
        let rest = self.rest();
        if looks_like_int(rest) {
            let (value, used) = scan_integer(rest);
            self.pos += used;
            return Ok(Some(Value::Int(value)));
        }
        let (value, used) = scan_decimal(rest)?;
        if used == 0 {
            return Ok(None);
        }
        self.pos += used;
        Ok(Some(Value::Rational(value)))
    }

    fn punctuation(&mut self, c: char) -> TokenKind {
        match (c, self.peek()) {
            ('(', _) => TokenKind::OpenParen,
            (')', _) => TokenKind::CloseParen,
            (',', _) => TokenKind::Comma,
            ('*', _) => TokenKind::Operator(Operator::Mult),
            ('/', _) => TokenKind::Operator(Operator::Divide),
            ('%', _) => TokenKind::Operator(Operator::Mod),
            ('+', _) => TokenKind::Operator(Operator::Plus),
            ('-', _) => TokenKind::Operator(Operator::Minus),
            ('?', _) => TokenKind::Operator(Operator::Question),
            (':', _) => TokenKind::Operator(Operator::Colon),
            ('^', _) => TokenKind::Operator(Operator::BitXor),
            ('~', _) => TokenKind::Operator(Operator::BitNot),
            ('<', Some('<')) => self.pair(Operator::LeftShift),
            ('<', Some('=')) => self.pair(Operator::Leq),
            ('<', _) => TokenKind::Operator(Operator::Less),
            ('>', Some('>')) => self.pair(Operator::RightShift),
            ('>', Some('=')) => self.pair(Operator::Geq),
            ('>', _) => TokenKind::Operator(Operator::Greater),
            ('=', Some('=')) => self.pair(Operator::Equal),
            ('!', Some('=')) => self.pair(Operator::Neq),
            ('!', _) => TokenKind::Operator(Operator::Not),
            ('&', Some('&')) => self.pair(Operator::And),
            ('&', _) => TokenKind::Operator(Operator::BitAnd),
            ('|', Some('|')) => self.pair(Operator::Or),
            ('|', _) => TokenKind::Operator(Operator::BitOr),
            (other, _) => TokenKind::Unknown(other),
        }
    }

    /// Second character of a two-character operator.
    fn pair(&mut self, op: Operator) -> TokenKind {
        self.advance();
        TokenKind::Operator(op)
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        &self.input[start..self.pos]
    }

    /// `name(`: only function calls may use a bare identifier.
    fn function_name(&mut self) -> Result<TokenKind> {
        let name = self.identifier();
        self.skip_whitespace();
        if self.peek() != Some('(') {
            return Err(self.syntax_error());
        }
        self.advance();
        Ok(TokenKind::Function(name.to_string()))
    }

    /// After `$`: `name`, `name(index)` or `{name}`.
    fn variable(&mut self) -> Result<TokenKind> {
        if self.peek() == Some('{') {
            self.advance();
            let start = self.pos;
            while self.peek().is_some_and(|c| c != '}') {
                self.advance();
            }
            if self.peek().is_none() {
                return Err(self.syntax_error());
            }
            let name = self.input[start..self.pos].to_string();
            self.advance();
            return Ok(TokenKind::Variable { name, index: None });
        }
        let name = self.identifier().to_string();
        if name.is_empty() {
            return Err(self.syntax_error());
        }
        let mut index = None;
        if self.peek() == Some('(') {
            self.advance();
            let start = self.pos;
            while self.peek().is_some_and(|c| c != ')') {
                self.advance();
            }
            if self.peek().is_none() {
                return Err(self.syntax_error());
            }
            index = Some(self.input[start..self.pos].to_string());
            self.advance();
        }
        Ok(TokenKind::Variable { name, index })
    }

    /// After `[`: the script up to the matching `]`.
    fn bracketed(&mut self) -> Result<String> {
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        let script = self.input[start..self.pos].to_string();
                        self.advance();
                        return Ok(script);
                    }
                }
                '\\' => self.advance(),
                _ => {}
            }
            self.advance();
        }
        Err(self.syntax_error())
    }

    /// After `"`: the text up to the closing quote with backslash escapes applied.
    fn quoted(&mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            self.advance();
            match c {
                '"' => return Ok(text),
                '\\' => {
                    let Some(e) = self.peek() else {
                        break;
                    };
                    self.advance();
                    text.push(match e {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        'f' => '\u{0c}',
                        'v' => '\u{0b}',
                        'b' => '\u{08}',
                        'a' => '\u{07}',
                        other => other,
                    });
                }
                other => text.push(other),
            }
        }
        Err(self.syntax_error())
    }

    /// After `{`: the text up to the matching `}`, verbatim.
    fn braced(&mut self) -> Result<String> {
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let text = self.input[start..self.pos].to_string();
                        self.advance();
                        return Ok(text);
                    }
                }
                '\\' if self.peek_at(1).is_some() => self.advance(),
                _ => {}
            }
            self.advance();
        }
        Err(self.syntax_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::BigInt;
    use crate::rational::BigRational;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::End {
                return out;
            }
            out.push(token.kind);
        }
    }

    fn int(n: i64) -> TokenKind {
        TokenKind::Value(Value::Int(BigInt::from_i64(n)))
    }

    #[test]
    fn test_numbers_and_operators() {
        assert_eq!(
            kinds("2+3*-4"),
            vec![
                int(2),
                TokenKind::Operator(Operator::Plus),
                int(3),
                TokenKind::Operator(Operator::Mult),
                TokenKind::Operator(Operator::Minus),
                int(4),
            ]
        );
        assert_eq!(
            kinds("1.5 0x1f .25"),
            vec![
                TokenKind::Value(Value::Rational(
                    BigRational::new(BigInt::from_i64(3), BigInt::from_i64(2)).unwrap()
                )),
                int(31),
                TokenKind::Value(Value::Rational(
                    BigRational::new(BigInt::one(), BigInt::from_i64(4)).unwrap()
                )),
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        let ops: Vec<TokenKind> = kinds("<< >> <= >= == != && || < > ! & |");
        let expected = [
            Operator::LeftShift,
            Operator::RightShift,
            Operator::Leq,
            Operator::Geq,
            Operator::Equal,
            Operator::Neq,
            Operator::And,
            Operator::Or,
            Operator::Less,
            Operator::Greater,
            Operator::Not,
            Operator::BitAnd,
            Operator::BitOr,
        ];
        assert_eq!(ops, expected.iter().map(|op| TokenKind::Operator(*op)).collect::<Vec<_>>());
    }

    #[test]
    fn test_lone_equals_is_unknown() {
        assert_eq!(kinds("= @"), vec![TokenKind::Unknown('='), TokenKind::Unknown('@')]);
    }

    #[test]
    fn test_function_and_positions() {
        let mut lexer = Lexer::new("  sqrt (2)");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Function("sqrt".to_string()));
        assert_eq!(token.position, 2);
        assert_eq!(lexer.next_token().unwrap().kind, int(2));
        assert!(matches!(Lexer::new("foo + 1").next_token(), Err(ExprError::Syntax { .. })));
    }

    #[test]
    fn test_substitutions() {
        assert_eq!(
            kinds("$x + $arr(a,b) + ${odd name} + [incr i]"),
            vec![
                TokenKind::Variable {
                    name: "x".to_string(),
                    index: None
                },
                TokenKind::Operator(Operator::Plus),
                TokenKind::Variable {
                    name: "arr".to_string(),
                    index: Some("a,b".to_string())
                },
                TokenKind::Operator(Operator::Plus),
                TokenKind::Variable {
                    name: "odd name".to_string(),
                    index: None
                },
                TokenKind::Operator(Operator::Plus),
                TokenKind::Command("incr i".to_string()),
            ]
        );
        assert_eq!(kinds("[a [b] c]"), vec![TokenKind::Command("a [b] c".to_string())]);
        assert!(Lexer::new("[open").next_token().is_err());
    }

    #[test]
    fn test_quoted_and_braced_strings() {
        assert_eq!(
            kinds(r#""a\tb" {x {y}} "42""#),
            vec![
                TokenKind::Value(Value::Str("a\tb".to_string())),
                TokenKind::Value(Value::Str("x {y}".to_string())),
                int(42),
            ]
        );
        assert!(Lexer::new("\"unterminated").next_token().is_err());
        assert!(Lexer::new("{unterminated").next_token().is_err());
    }
}
