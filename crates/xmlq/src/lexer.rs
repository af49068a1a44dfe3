use compact_str::CompactString;

use crate::error::{Error, Result};

/// Characters that form one-character punctuation tokens. Quotes are in
/// the set but open a string literal instead when seen at token start.
const PUNCT: &[char] = &['"', '\'', '*', '+', ':', '=', '[', '\\', ']', '>'];

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_punct(c: char) -> bool {
    PUNCT.contains(&c)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A single punctuation character.
    Punct(char),
    /// A maximal run of non-space, non-punctuation characters.
    Ident,
    /// A quoted string with escapes already resolved.
    Str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
}

impl Token {
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

/// Cursor-based tokenizer over selector text.
#[derive(Debug)]
pub struct Lexer<'a> {
    rest: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { rest: input }
    }

    /// Produce the next token, or `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.rest = self.rest.trim_start_matches(is_space);

        let mut chars = self.rest.chars();
        let Some(first) = chars.next() else {
            return Ok(None);
        };

        if first == '"' || first == '\'' {
            return self.quoted_string(first).map(Some);
        }

        if is_punct(first) {
            self.rest = chars.as_str();
            return Ok(Some(Token {
                kind: TokenKind::Punct(first),
                text: CompactString::from(first.to_string()),
            }));
        }

        let end = self
            .rest
            .find(|c: char| is_space(c) || is_punct(c))
            .unwrap_or(self.rest.len());
        let (ident, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(Some(Token {
            kind: TokenKind::Ident,
            text: CompactString::from(ident),
        }))
    }

    /// Consume a string literal. `quote` is the opening quote character;
    /// content runs to the matching quote. A backslash escapes a
    /// following quote or backslash and is copied literally otherwise.
    fn quoted_string(&mut self, quote: char) -> Result<Token> {
        let mut content = String::new();
        let mut chars = self.rest.chars();
        chars.next(); // opening quote

        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.clone().next() {
                    Some(next @ ('"' | '\'' | '\\')) => {
                        content.push(next);
                        chars.next();
                    }
                    _ => content.push('\\'),
                }
            } else if c == quote {
                self.rest = chars.as_str();
                return Ok(Token {
                    kind: TokenKind::Str,
                    text: CompactString::from(content),
                });
            } else {
                content.push(c);
            }
        }

        Err(Error::UnterminatedString)
    }
}
