//! Recursive-descent selector compiler.
//!
//! Grammar:
//!
//! ```text
//! selector        ::= single_selector (single_selector)*
//! single_selector ::= [combinator] simple_selector
//! combinator      ::= '>' | '+'
//! simple_selector ::= element_name attrib*
//! element_name    ::= IDENT ':' IDENT | IDENT | '*'
//! attrib          ::= '[' IDENT '=' (STRING | IDENT) ']'
//! ```
//!
//! Whitespace between simple selectors acts as the implicit descendant
//! combinator.

use smallvec::SmallVec;
use tracing::trace;

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::selector::{CompileMode, NameTest, Selector, StepOp};

/// Compile selector text into an executable pipeline.
///
/// In [`CompileMode::Filter`] the grammar is compiled identically and
/// only the first step is rewritten to test the input node itself. Empty
/// input compiles to a single [`StepOp::CopySelf`].
pub fn compile(text: &str, mode: CompileMode) -> Result<Selector> {
    trace!(selector = text, ?mode, "compiling selector");
    let mut parser = Parser::new(text);
    let mut steps: SmallVec<[StepOp; 8]> = SmallVec::new();
    parser.parse_selector(&mut steps)?;

    if steps.is_empty() {
        steps.push(StepOp::CopySelf);
    }

    if mode == CompileMode::Filter {
        steps[0] = match steps[0].clone() {
            StepOp::Descendants(test) if test.name.is_none() => StepOp::CopySelf,
            StepOp::Descendants(test) => StepOp::SelfMatch(test),
            other => other,
        };
    }

    Ok(Selector::new(steps.into_vec(), mode))
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<Option<Token>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            lookahead: None,
        }
    }

    fn next(&mut self) -> Result<Option<Token>> {
        match self.lookahead.take() {
            Some(tok) => Ok(tok),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token()?);
        }
        Ok(self.lookahead.as_ref().and_then(Option::as_ref))
    }

    /// `selector ::= single_selector (single_selector)*`
    fn parse_selector(&mut self, steps: &mut SmallVec<[StepOp; 8]>) -> Result<()> {
        loop {
            let Some(tok) = self.next()? else {
                return Ok(());
            };

            match tok.kind {
                TokenKind::Punct('>') => self.parse_simple_selector(steps, Axis::Child)?,
                TokenKind::Punct('+') => self.parse_simple_selector(steps, Axis::NextSibling)?,
                TokenKind::Punct('*') | TokenKind::Ident => {
                    let test = self.finish_element_name(&tok)?;
                    steps.push(StepOp::Descendants(test));
                    self.parse_attribs(steps)?;
                }
                _ => return Err(Error::UnexpectedToken(tok.text)),
            }
        }
    }

    /// `single_selector` after a combinator token has been consumed.
    fn parse_simple_selector(
        &mut self,
        steps: &mut SmallVec<[StepOp; 8]>,
        axis: Axis,
    ) -> Result<()> {
        let tok = self
            .next()?
            .ok_or_else(|| Error::UnexpectedToken("end of selector".into()))?;

        let test = match tok.kind {
            TokenKind::Punct('*') | TokenKind::Ident => self.finish_element_name(&tok)?,
            _ => return Err(Error::UnexpectedToken(tok.text)),
        };

        steps.push(match axis {
            Axis::Child => StepOp::Children(test),
            Axis::NextSibling => StepOp::NextSibling(test),
        });
        self.parse_attribs(steps)
    }

    /// `element_name ::= IDENT ':' IDENT | IDENT | '*'`
    ///
    /// The leading token has already been consumed and is passed in.
    fn finish_element_name(&mut self, lead: &Token) -> Result<NameTest> {
        if lead.is_punct('*') {
            return Ok(NameTest::any());
        }

        // A ':' directly after an identifier qualifies it with a prefix.
        if self.peek()?.is_some_and(|t| t.is_punct(':')) {
            self.next()?;
            let name = self
                .next()?
                .ok_or_else(|| Error::UnexpectedToken("end of selector".into()))?;
            if name.kind != TokenKind::Ident {
                return Err(Error::UnexpectedToken(name.text));
            }
            return Ok(NameTest::prefixed(lead.text.clone(), name.text));
        }

        Ok(NameTest::named(lead.text.clone()))
    }

    /// `attrib ::= '[' IDENT '=' (STRING | IDENT) ']'`
    fn parse_attribs(&mut self, steps: &mut SmallVec<[StepOp; 8]>) -> Result<()> {
        while self.peek()?.is_some_and(|t| t.is_punct('[')) {
            self.next()?;

            let name = self.expect(TokenKind::Ident)?;
            let eq = self
                .next()?
                .ok_or_else(|| Error::UnexpectedToken("end of selector".into()))?;
            if !eq.is_punct('=') {
                return Err(Error::UnexpectedToken(eq.text));
            }

            let value = self
                .next()?
                .ok_or_else(|| Error::UnexpectedToken("end of selector".into()))?;
            if !matches!(value.kind, TokenKind::Str | TokenKind::Ident) {
                return Err(Error::UnexpectedToken(value.text));
            }

            let close = self
                .next()?
                .ok_or_else(|| Error::UnexpectedToken("end of selector".into()))?;
            if !close.is_punct(']') {
                return Err(Error::UnexpectedToken(close.text));
            }

            steps.push(StepOp::AttrEquals {
                name: name.text,
                value: value.text,
            });
        }
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let tok = self
            .next()?
            .ok_or_else(|| Error::UnexpectedToken("end of selector".into()))?;
        if tok.kind != kind {
            return Err(Error::UnexpectedToken(tok.text));
        }
        Ok(tok)
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Child,
    NextSibling,
}
