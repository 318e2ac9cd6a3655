use chumsky::prelude::*;
use std::fmt;

use crate::ast::{ArithOp, ComparisonOp};
use crate::Span;

pub type SpannedToken = (Token, Span);
pub type LexError = Simple<char, Span>;

/// `#name` directives, lexed as a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Int,
    MaxInt,
    Const,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Directive::Int => "#int",
            Directive::MaxInt => "#maxint",
            Directive::Const => "#const",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Ident(String),
    Variable(String),
    Number(String),
    String(String),
    Directive(Directive),
    Cmp(ComparisonOp),
    Arith(ArithOp),
    Not,
    Bar,
    RuleSep,
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(text) | Token::Variable(text) | Token::Number(text) => {
                write!(f, "{}", text)
            }
            Token::String(text) => write!(f, "\"{}\"", text),
            Token::Directive(directive) => write!(f, "{}", directive),
            Token::Cmp(op) => write!(f, "{}", op),
            Token::Arith(op) => write!(f, "{}", op),
            Token::Not => write!(f, "not"),
            Token::Bar => write!(f, "|"),
            Token::RuleSep => write!(f, ":-"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

fn string_literal() -> impl Parser<char, String, Error = LexError> + Clone {
    let escaped = just('\\').ignore_then(choice((
        just('"').to('"'),
        just('n').to('\n'),
        just('\\').to('\\'),
    )));

    just('"')
        .ignore_then(
            escaped
                .or(filter(|c| *c != '"' && *c != '\\' && *c != '\n'))
                .repeated(),
        )
        .then_ignore(just('"'))
        .collect::<String>()
        .labelled("string")
}

/// Lowercase names are constants or predicates, uppercase names variables
fn word() -> impl Parser<char, Token, Error = LexError> + Clone {
    text::ident()
        .map(|name: String| {
            if name == "not" {
                Token::Not
            } else if name.starts_with(|c: char| c.is_uppercase()) {
                Token::Variable(name)
            } else {
                Token::Ident(name)
            }
        })
        .labelled("identifier")
}

fn directive() -> impl Parser<char, Token, Error = LexError> + Clone {
    just('#')
        .ignore_then(text::ident())
        .try_map(|name: String, span| match name.as_str() {
            "int" => Ok(Token::Directive(Directive::Int)),
            "maxint" => Ok(Token::Directive(Directive::MaxInt)),
            "const" => Ok(Token::Directive(Directive::Const)),
            _ => Err(Simple::custom(span, format!("unknown directive #{}", name))),
        })
        .labelled("directive")
}

fn comparison() -> impl Parser<char, Token, Error = LexError> + Clone {
    choice((
        just("<=").to(ComparisonOp::LessOrEqual),
        just(">=").to(ComparisonOp::GreaterOrEqual),
        just("!=").to(ComparisonOp::NotEqual),
        just("<>").to(ComparisonOp::NotEqual),
        just("=").to(ComparisonOp::Equal),
        just("<").to(ComparisonOp::LessThan),
        just(">").to(ComparisonOp::GreaterThan),
    ))
    .map(Token::Cmp)
}

fn arithmetic() -> impl Parser<char, Token, Error = LexError> + Clone {
    choice((
        just('+').to(ArithOp::Add),
        just('-').to(ArithOp::Sub),
        just('*').to(ArithOp::Mul),
        just('/').to(ArithOp::Div),
        just('\\').to(ArithOp::Mod),
    ))
    .map(Token::Arith)
}

/// `% to end of line` and `/* ... */`
fn comment() -> impl Parser<char, (), Error = LexError> + Clone {
    let line = just('%').then(take_until(text::newline().or(end()))).ignored();
    let block = just("/*").then(take_until(just("*/"))).ignored();
    line.or(block).labelled("comment")
}

pub fn lexer() -> impl Parser<char, Vec<SpannedToken>, Error = LexError> + Clone {
    let punct = choice((
        just(":-").to(Token::RuleSep),
        just('|').to(Token::Bar),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
        just('.').to(Token::Dot),
        just(';').to(Token::Semicolon),
    ));

    let token = choice((
        string_literal().map(Token::String),
        text::int(10).map(Token::Number).labelled("number"),
        directive(),
        word(),
        comparison(),
        arithmetic(),
        punct,
    ))
    .map_with_span(|token, span| (token, span));

    let skip = comment().or(text::whitespace().at_least(1).ignored()).repeated();

    skip.clone()
        .ignore_then(token.then_ignore(skip).repeated())
        .then_ignore(end())
}
