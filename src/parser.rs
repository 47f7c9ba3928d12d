//! Recursive-descent parser for sentences and Horn clauses.
//!
//! # Grammar
//!
//! ```text
//! sentence := element ( ['+' | '&'] element )*
//! element  := '(' [ literal ( [','] literal )* ] ')' | literal | 'true' | 'false'
//! literal  := ['~' | '!'] NAME
//! horn     := body '->' ( literal | 'false' )
//! body     := '(' [ literal ( [','] literal )* ] ')' | [ literal ( [',' | '&'] literal )* ]
//! NAME     := [A-Za-z0-9_.]+
//! ```
//!
//! Elements are juxtaposed or joined with `+` or `&`. Whether an element is a clause
//! or a term is decided by the caller (see [`Kb::construct_cnf`] and
//! [`Kb::construct_dnf`]); the parser only produces names, which the knowledge
//! base resolves to atoms.
//!
//! [`Kb::construct_cnf`]: crate::kb::Kb::construct_cnf
//! [`Kb::construct_dnf`]: crate::kb::Kb::construct_dnf

use logos::Logos;

use crate::error::{Error, Result};

#[derive(Logos, Debug, Clone, Eq, PartialEq)]
#[logos(skip r"\s+")]
enum Token {
    #[regex(r"[A-Za-z0-9_.]+", |lex| lex.slice().to_string())]
    Name(String),

    #[token("~")]
    #[token("!")]
    Not,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token("+")]
    Plus,

    #[token("&")]
    Amp,

    #[token("->")]
    Arrow,
}

/// Lex `text` into tokens tagged with their byte offsets.
fn tokenize(text: &str) -> Result<Vec<(Token, usize)>> {
    let mut lex = Token::lexer(text);
    let mut tokens = Vec::new();

    while let Some(token) = lex.next() {
        let pos = lex.span().start;
        match token {
            Ok(token) => tokens.push((token, pos)),
            Err(()) => {
                let rest = &text[pos..];
                return Err(match rest.chars().next() {
                    Some('-') => Error::parse(pos, "expected `->`"),
                    Some(c) => Error::parse(pos, format!("unexpected character `{}`", c)),
                    None => Error::parse(pos, "unexpected end of input"),
                });
            }
        }
    }

    Ok(tokens)
}

/// A literal as written: an atom name and a polarity.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedLiteral {
    pub name: String,
    pub positive: bool,
    /// Byte offset of the literal in the source text.
    pub position: usize,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Element {
    Group(Vec<ParsedLiteral>),
    Constant(bool),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedHorn {
    pub body: Vec<ParsedLiteral>,
    /// `None` for an integrity constraint (`-> false`).
    pub head: Option<ParsedLiteral>,
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(text: &str) -> Result<Self> {
        Ok(Self {
            tokens: tokenize(text)?,
            pos: 0,
            end: text.len(),
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |&(_, p)| p)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_literal(&self) -> bool {
        matches!(self.peek(), Some(Token::Not) | Some(Token::Name(_)))
    }

    fn literal(&mut self) -> Result<ParsedLiteral> {
        let position = self.offset();
        let positive = !self.eat(&Token::Not);
        match self.bump() {
            Some(Token::Name(name)) if name == "true" || name == "false" => Err(Error::parse(
                position,
                format!("constant `{}` cannot be used as a literal", name),
            )),
            Some(Token::Name(name)) => Ok(ParsedLiteral {
                name,
                positive,
                position,
            }),
            _ => Err(Error::parse(position, "expected an atom name")),
        }
    }

    /// `'(' [ literal ( [sep] literal )* ] ')'` with the opening paren already consumed.
    fn group(&mut self, open: usize) -> Result<Vec<ParsedLiteral>> {
        let mut lits = Vec::new();
        loop {
            if self.eat(&Token::RParen) {
                return Ok(lits);
            }
            if !lits.is_empty() {
                self.eat(&Token::Comma);
            }
            if self.peek().is_none() {
                return Err(Error::parse(open, "unclosed `(`"));
            }
            lits.push(self.literal()?);
        }
    }

    fn element(&mut self) -> Result<Element> {
        let position = self.offset();
        match self.peek() {
            Some(Token::LParen) => {
                self.pos += 1;
                Ok(Element::Group(self.group(position)?))
            }
            Some(Token::Name(name)) if name == "true" || name == "false" => {
                let value = name == "true";
                self.pos += 1;
                Ok(Element::Constant(value))
            }
            Some(Token::Name(_)) | Some(Token::Not) => Ok(Element::Group(vec![self.literal()?])),
            _ => Err(Error::parse(position, "expected `(`, a literal or a constant")),
        }
    }

    fn sentence(&mut self) -> Result<Vec<Element>> {
        let mut elements = Vec::new();
        while self.peek().is_some() {
            let separated = !elements.is_empty() && (self.eat(&Token::Plus) || self.eat(&Token::Amp));
            if separated && self.peek().is_none() {
                return Err(Error::parse(self.end, "dangling separator"));
            }
            elements.push(self.element()?);
        }
        Ok(elements)
    }

    fn horn(&mut self) -> Result<ParsedHorn> {
        let mut body = Vec::new();
        if self.peek() == Some(&Token::LParen) {
            let open = self.offset();
            self.pos += 1;
            body = self.group(open)?;
        } else {
            while self.at_literal() {
                body.push(self.literal()?);
                if !self.eat(&Token::Comma) {
                    self.eat(&Token::Amp);
                }
            }
        }

        if !self.eat(&Token::Arrow) {
            return Err(Error::parse(self.offset(), "expected `->`"));
        }

        let head = match self.peek() {
            Some(Token::Name(name)) if name == "false" => {
                self.pos += 1;
                None
            }
            _ => Some(self.literal()?),
        };

        if self.peek().is_some() {
            return Err(Error::parse(self.offset(), "unexpected input after the head"));
        }

        Ok(ParsedHorn { body, head })
    }
}

/// Parse a sentence into its elements.
pub fn parse_sentence(text: &str) -> Result<Vec<Element>> {
    Parser::new(text)?.sentence()
}

/// Parse a Horn clause `body -> head`.
pub fn parse_horn(text: &str) -> Result<ParsedHorn> {
    Parser::new(text)?.horn()
}
