//! JSONC tokenizer.
//!
//! Splits source text into significant tokens and trivia pieces (whitespace
//! runs, `//` line comments, `/* */` block comments). Every byte of the
//! input lands in exactly one token lexeme or trivia piece; that accounting
//! is what lets the parsed tree reproduce its source byte-for-byte.
//!
//! String and number lexemes are validated and decoded by handing the raw
//! lexeme to `serde_json`, so escape and range semantics match the rest of
//! the ecosystem instead of a private reimplementation.

use std::str::FromStr;

use serde_json::Number;

use crate::error::{ParseError, Result};

/// A run of non-significant bytes between tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trivia {
    /// Spaces, tabs, carriage returns, newlines, and a document-head BOM.
    Whitespace(String),
    /// `// ...` up to but not including the terminating newline.
    LineComment(String),
    /// `/* ... */` including both delimiters.
    BlockComment(String),
}

impl Trivia {
    /// The raw text of this piece, exactly as it appeared in the source.
    pub fn text(&self) -> &str {
        match self {
            Trivia::Whitespace(s) | Trivia::LineComment(s) | Trivia::BlockComment(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Null,
    Bool(bool),
    /// Number literal. `raw` is the untouched lexeme, `value` the decoded form.
    Number { raw: String, value: Number },
    /// String literal. `raw` includes the quotes, `value` is the decoded text.
    Str { raw: String, value: String },
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub offset: usize,
}

/// Byte-position scanner over a UTF-8 source string.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    /// Consume all trivia at the current position.
    ///
    /// Returns an error only for an unterminated block comment.
    pub fn take_trivia(&mut self) -> Result<Vec<Trivia>> {
        let mut pieces = Vec::new();
        if self.pos == 0 && self.src.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
            pieces.push(Trivia::Whitespace("\u{feff}".to_string()));
        }
        loop {
            let start = self.pos;
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
                        self.pos += 1;
                    }
                    pieces.push(Trivia::Whitespace(self.src[start..self.pos].to_string()));
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while self.peek().is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                    pieces.push(Trivia::LineComment(self.src[start..self.pos].to_string()));
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let Some(end) = self.src[start + 2..].find("*/") else {
                        return Err(self.error_at(start, "unterminated block comment"));
                    };
                    self.pos = start + 2 + end + 2;
                    pieces.push(Trivia::BlockComment(self.src[start..self.pos].to_string()));
                }
                _ => break,
            }
        }
        Ok(pieces)
    }

    /// Read the next significant token. Trivia must already be consumed.
    pub fn next_token(&mut self) -> Result<Token> {
        let offset = self.pos;
        let Some(b) = self.peek() else {
            return Ok(Token { kind: TokenKind::Eof, offset });
        };
        let kind = match b {
            b'{' => self.punct(TokenKind::LBrace),
            b'}' => self.punct(TokenKind::RBrace),
            b'[' => self.punct(TokenKind::LBracket),
            b']' => self.punct(TokenKind::RBracket),
            b':' => self.punct(TokenKind::Colon),
            b',' => self.punct(TokenKind::Comma),
            b'"' => self.read_string()?,
            b'-' | b'0'..=b'9' => self.read_number()?,
            b't' => self.read_keyword("true", TokenKind::Bool(true))?,
            b'f' => self.read_keyword("false", TokenKind::Bool(false))?,
            b'n' => self.read_keyword("null", TokenKind::Null)?,
            _ => {
                let ch = self.src[offset..].chars().next().unwrap_or('\0');
                return Err(self.error_at(offset, &format!("unexpected character `{ch}`")));
            }
        };
        Ok(Token { kind, offset })
    }

    fn punct(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn read_keyword(&mut self, word: &str, kind: TokenKind) -> Result<TokenKind> {
        if self.src[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(kind)
        } else {
            Err(self.error_at(self.pos, &format!("expected `{word}`")))
        }
    }

    /// Scan a string lexeme to its closing quote, then decode it.
    ///
    /// The scan only needs to honor backslash escapes to find the end;
    /// escape validity is checked by the `serde_json` decode.
    fn read_string(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(self.error_at(start, "unterminated string"));
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_none() {
                        return Err(self.error_at(start, "unterminated string"));
                    }
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
        let raw = &self.src[start..self.pos];
        let value: String = serde_json::from_str(raw)
            .map_err(|_| self.error_at(start, "invalid string literal"))?;
        Ok(TokenKind::Str { raw: raw.to_string(), value })
    }

    fn read_number(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
        ) {
            self.pos += 1;
        }
        let raw = &self.src[start..self.pos];
        let value = Number::from_str(raw)
            .map_err(|_| self.error_at(start, &format!("invalid number literal `{raw}`")))?;
        Ok(TokenKind::Number { raw: raw.to_string(), value })
    }

    /// Leading whitespace of the line containing `offset`.
    ///
    /// This is the indentation used for children of a container whose
    /// opening delimiter sits at `offset`, regardless of the delimiter's
    /// own column.
    pub(crate) fn line_indent_at(&self, offset: usize) -> String {
        let line_start = self.src[..offset].rfind('\n').map_or(0, |p| p + 1);
        let line = &self.src[line_start..];
        let end = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        line[..end].to_string()
    }

    /// Build a positioned error for the given byte offset.
    pub(crate) fn error_at(&self, offset: usize, message: &str) -> ParseError {
        let prefix = &self.src[..offset];
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map_or(0, |p| p + 1);
        let column = self.src[line_start..offset].chars().count() + 1;
        ParseError {
            line,
            column,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Result<Vec<TokenKind>> {
        let mut lexer = Lexer::new(input);
        let mut kinds = Vec::new();
        loop {
            lexer.take_trivia()?;
            let token = lexer.next_token()?;
            if token.kind == TokenKind::Eof {
                break;
            }
            kinds.push(token.kind);
        }
        Ok(kinds)
    }

    #[test]
    fn structural_tokens() {
        let kinds = lex("{}[],:").unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comma,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn literals() {
        let kinds = lex("null true false").unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Null,
                TokenKind::Bool(true),
                TokenKind::Bool(false)
            ]
        );
    }

    #[test]
    fn string_keeps_raw_lexeme() {
        let kinds = lex(r#""a\nb""#).unwrap();
        assert_eq!(
            kinds,
            vec![TokenKind::Str {
                raw: r#""a\nb""#.to_string(),
                value: "a\nb".to_string()
            }]
        );
    }

    #[test]
    fn number_keeps_raw_lexeme() {
        let kinds = lex("1e3").unwrap();
        match &kinds[0] {
            TokenKind::Number { raw, value } => {
                assert_eq!(raw, "1e3");
                assert_eq!(value.as_f64(), Some(1000.0));
            }
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn comments_are_trivia() {
        let mut lexer = Lexer::new("// head\n/* body */ 1");
        let trivia = lexer.take_trivia().unwrap();
        assert_eq!(
            trivia,
            vec![
                Trivia::LineComment("// head".to_string()),
                Trivia::Whitespace("\n".to_string()),
                Trivia::BlockComment("/* body */".to_string()),
                Trivia::Whitespace(" ".to_string()),
            ]
        );
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Number { .. }
        ));
    }

    #[test]
    fn bom_is_leading_trivia() {
        let mut lexer = Lexer::new("\u{feff}{");
        let trivia = lexer.take_trivia().unwrap();
        assert_eq!(trivia, vec![Trivia::Whitespace("\u{feff}".to_string())]);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::LBrace);
    }

    #[test]
    fn unterminated_block_comment() {
        let mut lexer = Lexer::new("/* never closed");
        let err = lexer.take_trivia().unwrap_err();
        assert!(err.message.contains("unterminated block comment"));
        assert_eq!((err.line, err.column), (1, 1));
    }

    #[test]
    fn unterminated_string() {
        let err = lex("\"open").unwrap_err();
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn string_may_not_span_lines() {
        let err = lex("\"a\nb\"").unwrap_err();
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn invalid_escape_rejected() {
        let err = lex(r#""\q""#).unwrap_err();
        assert!(err.message.contains("invalid string literal"));
    }

    #[test]
    fn invalid_number_rejected() {
        let err = lex("1.2.3").unwrap_err();
        assert!(err.message.contains("invalid number literal"));
    }

    #[test]
    fn error_position_is_one_based() {
        let err = lex("{\n  @").unwrap_err();
        assert_eq!((err.line, err.column), (2, 3));
    }

    #[test]
    fn line_indent() {
        let lexer = Lexer::new("{\n  \"a\": [\n}");
        assert_eq!(lexer.line_indent_at(0), "");
        // offset of '[' on the second line
        assert_eq!(lexer.line_indent_at(9), "  ");
    }
}
