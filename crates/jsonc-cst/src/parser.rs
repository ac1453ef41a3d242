//! Recursive-descent JSONC parser producing a lossless [`Document`].
//!
//! The parser owns the trivia attachment contract that makes comments
//! survive edits:
//!
//! - Trivia between two siblings splits at the comma. Everything up to and
//!   including the newline that follows the comma stays with the left
//!   sibling (`post_comma`); the rest becomes the right sibling's leading
//!   trivia. When no newline follows the comma, everything goes to the
//!   right sibling.
//! - A comment between a value and its comma is the value's `pre_comma`
//!   trivia.
//! - Trivia between the last entry (or a trailing comma) and the closing
//!   delimiter is the container's interior tail.
//!
//! Duplicate object keys are rejected; reconciliation over a tree with
//! ambiguous keys would be meaningless.

use crate::error::Result;
use crate::lexer::{Lexer, Token, TokenKind, Trivia};
use crate::node::{ArrayNode, Document, Item, Node, ObjectNode, Prop, ScalarKind, ScalarNode};

/// Structural recursion limit, so hostile input degrades into an error
/// instead of a stack overflow.
const MAX_NESTING: usize = 128;

/// Parse JSONC text into a lossless document.
pub fn parse(src: &str) -> Result<Document> {
    Parser::new(src)?.parse_document()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Trivia collected immediately before `current`.
    pending: Vec<Trivia>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(src);
        let pending = lexer.take_trivia()?;
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            pending,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<()> {
        self.pending = self.lexer.take_trivia()?;
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn error_here(&self, message: &str) -> crate::error::ParseError {
        self.lexer.error_at(self.current.offset, message)
    }

    fn take_pending_text(&mut self) -> String {
        let mut text = String::new();
        for piece in self.pending.drain(..) {
            text.push_str(piece.text());
        }
        text
    }

    /// Split pending trivia at the first line break found in a whitespace
    /// piece: everything up to and including that newline belongs to the
    /// entry that just ended; the rest becomes the next sibling's leading
    /// trivia. Without such a break (including when a multi-line block
    /// comment comes first), everything stays with the next sibling.
    fn split_pending_after_newline(&mut self) -> String {
        let mut split = None;
        for (i, piece) in self.pending.iter().enumerate() {
            match piece {
                Trivia::Whitespace(ws) => {
                    if let Some(pos) = ws.find('\n') {
                        split = Some((i, pos));
                        break;
                    }
                }
                Trivia::BlockComment(text) if text.contains('\n') => break,
                _ => {}
            }
        }
        let Some((index, pos)) = split else {
            return String::new();
        };
        let mut post = String::new();
        for piece in &self.pending[..index] {
            post.push_str(piece.text());
        }
        let mut rest: Vec<Trivia> = Vec::new();
        if let Trivia::Whitespace(ws) = &self.pending[index] {
            post.push_str(&ws[..=pos]);
            if pos + 1 < ws.len() {
                rest.push(Trivia::Whitespace(ws[pos + 1..].to_string()));
            }
        }
        rest.extend(self.pending.drain(index + 1..));
        self.pending = rest;
        post
    }

    fn parse_document(mut self) -> Result<Document> {
        let leading = self.take_pending_text();
        let root = self.parse_node()?;
        let trailing = self.take_pending_text();
        if self.current.kind != TokenKind::Eof {
            return Err(self.error_here("unexpected trailing content"));
        }
        Ok(Document {
            leading,
            root,
            trailing,
        })
    }

    fn parse_node(&mut self) -> Result<Node> {
        match &self.current.kind {
            TokenKind::LBrace => self.parse_object(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::Null => self.scalar(ScalarKind::Null, "null".to_string()),
            TokenKind::Bool(b) => {
                let b = *b;
                self.scalar(ScalarKind::Bool(b), b.to_string())
            }
            TokenKind::Number { raw, value } => {
                let (raw, value) = (raw.clone(), value.clone());
                self.scalar(ScalarKind::Number(value), raw)
            }
            TokenKind::Str { raw, value } => {
                let (raw, value) = (raw.clone(), value.clone());
                self.scalar(ScalarKind::String(value), raw)
            }
            TokenKind::Eof => Err(self.error_here("unexpected end of input")),
            _ => Err(self.error_here("expected a value")),
        }
    }

    fn scalar(&mut self, kind: ScalarKind, lexeme: String) -> Result<Node> {
        self.advance()?;
        Ok(Node::Scalar(ScalarNode { kind, lexeme }))
    }

    fn parse_object(&mut self) -> Result<Node> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error_here("nesting too deep"));
        }
        let open_indent = self.lexer.line_indent_at(self.current.offset);
        self.advance()?;

        let mut props: Vec<Prop> = Vec::new();
        loop {
            if self.current.kind == TokenKind::RBrace {
                let tail = self.take_pending_text();
                self.advance()?;
                self.depth -= 1;
                return Ok(Node::Object(ObjectNode {
                    props,
                    tail,
                    open_indent,
                }));
            }

            let leading = self.take_pending_text();
            let key_offset = self.current.offset;
            let (key_raw, key) = match &self.current.kind {
                TokenKind::Str { raw, value } => (raw.clone(), value.clone()),
                _ => return Err(self.error_here("expected a property key")),
            };
            if props.iter().any(|p| p.key == key) {
                return Err(self
                    .lexer
                    .error_at(key_offset, &format!("duplicate key `{key}`")));
            }
            self.advance()?;

            let pre_colon = self.take_pending_text();
            if self.current.kind != TokenKind::Colon {
                return Err(self.error_here("expected `:`"));
            }
            self.advance()?;

            let post_colon = self.take_pending_text();
            let value = self.parse_node()?;
            let (pre_comma, comma, post_comma) = self.parse_separator(TokenKind::RBrace)?;
            props.push(Prop {
                leading,
                key_raw,
                key,
                pre_colon,
                post_colon,
                value,
                pre_comma,
                comma,
                post_comma,
            });
        }
    }

    fn parse_array(&mut self) -> Result<Node> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error_here("nesting too deep"));
        }
        let open_indent = self.lexer.line_indent_at(self.current.offset);
        self.advance()?;

        let mut items: Vec<Item> = Vec::new();
        loop {
            if self.current.kind == TokenKind::RBracket {
                let tail = self.take_pending_text();
                self.advance()?;
                self.depth -= 1;
                return Ok(Node::Array(ArrayNode {
                    items,
                    tail,
                    open_indent,
                }));
            }

            let leading = self.take_pending_text();
            let node = self.parse_node()?;
            let (pre_comma, comma, post_comma) = self.parse_separator(TokenKind::RBracket)?;
            items.push(Item {
                leading,
                node,
                pre_comma,
                comma,
                post_comma,
            });
        }
    }

    /// After a value: consume the separating comma if present and split the
    /// trivia that follows it. Trivia before the closing delimiter is left
    /// pending so the container claims it as interior tail, which also
    /// covers JSONC trailing commas.
    fn parse_separator(&mut self, close: TokenKind) -> Result<(String, bool, String)> {
        if self.current.kind == TokenKind::Comma {
            let pre_comma = self.take_pending_text();
            self.advance()?;
            let post_comma = if self.current.kind == close || self.current.kind == TokenKind::Eof {
                String::new()
            } else {
                self.split_pending_after_newline()
            };
            return Ok((pre_comma, true, post_comma));
        }
        if self.current.kind == close {
            return Ok((String::new(), false, String::new()));
        }
        Err(self.error_here("expected `,` or a closing delimiter"))
    }
}
