//! Parser implementation for disjunctive ASP programs.
//!
//! Supports parsing:
//! - Facts: `edge(a, b).`
//! - Disjunctive rules: `in(X) v out(X) :- node(X).`
//! - Constraints: `:- in(X), out(X).`
//! - Negation: `not reached(X)`
//! - Comparisons: `X < Y`, `X != 1`
//! - Arithmetic: `Z = X + Y`
//! - Directives: `#maxint = 10.`, `#const n = 3.`

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use chumsky::stream::Stream;
use internment::Intern;
use std::fmt;
use std::hash::Hash;

use crate::ast::*;
use crate::token::{lexer, Directive, LexError, SpannedToken, Token};
use crate::{Span, SrcId};

type ParserError = Simple<Token, Span>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("{}", describe(.0))]
    Lex(LexError),
    #[error("{}", describe(.0))]
    Parse(ParserError),
}

fn describe<T: fmt::Display + Hash + Eq>(error: &Simple<T, Span>) -> String {
    let span = error.span();
    if let SimpleReason::Custom(message) = error.reason() {
        return format!("{} at {:?}", message, span);
    }
    let found = error
        .found()
        .map(|token| format!("'{}'", token))
        .unwrap_or_else(|| "end of input".to_string());
    let mut expected: Vec<String> = error
        .expected()
        .map(|token| match token {
            Some(token) => format!("'{}'", token),
            None => "end of input".to_string(),
        })
        .collect();
    expected.sort();
    match error.label() {
        Some(label) => format!("unexpected {} in {} at {:?}", found, label, span),
        None if expected.is_empty() => format!("unexpected {} at {:?}", found, span),
        None => format!(
            "unexpected {} at {:?}, expected {}",
            found,
            span,
            expected.join(" or ")
        ),
    }
}

fn ident_token() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! {
        Token::Ident(ident) if !ident.starts_with('_') => ident,
    }
    .labelled("identifier")
}

fn variable_token() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! {
        Token::Variable(ident) => ident,
        Token::Ident(ident) if ident.starts_with('_') => ident,
    }
    .labelled("variable")
}

fn number_token() -> impl Parser<Token, u32, Error = ParserError> + Clone {
    select! { Token::Number(number) => number }
        .try_map(|value: String, span| {
            value
                .parse::<u32>()
                .map_err(|_| ParserError::custom(span, "integer out of range"))
        })
        .labelled("number")
}

fn directive_token(directive: Directive) -> impl Parser<Token, (), Error = ParserError> + Clone {
    just(Token::Directive(directive)).ignored()
}

fn equals() -> impl Parser<Token, Token, Error = ParserError> + Clone {
    just(Token::Cmp(ComparisonOp::Equal))
}

fn token(kind: Token) -> impl Parser<Token, Token, Error = ParserError> + Clone {
    just(kind)
}

fn lex_with_src(input: &str, src: SrcId) -> Result<Vec<SpannedToken>, Vec<ParseError>> {
    let len = input.chars().count();
    let eoi = Span::new(src, len..len);
    let stream = Stream::from_iter(
        eoi,
        input
            .chars()
            .enumerate()
            .map(|(idx, ch)| (ch, Span::new(src, idx..idx + 1))),
    );
    lexer()
        .parse(stream)
        .map_err(|errors| errors.into_iter().map(ParseError::Lex).collect())
}

#[cfg(test)]
fn lex(input: &str) -> Result<Vec<SpannedToken>, Vec<ParseError>> {
    lex_with_src(input, SrcId::empty())
}

fn parse_with<T>(
    parser: impl Parser<Token, T, Error = ParserError>,
    input: &str,
    src: SrcId,
) -> Result<T, Vec<ParseError>> {
    let tokens = lex_with_src(input, src)?;
    let end = input.chars().count();
    let eoi = Span::new(src, end..end);
    let stream = Stream::from_iter(eoi, tokens.into_iter());
    parser
        .parse(stream)
        .map_err(|errors| errors.into_iter().map(ParseError::Parse).collect())
}

/// Parse a term (variable, integer, string or symbolic constant)
fn term() -> impl Parser<Token, Term, Error = ParserError> + Clone {
    let variable = variable_token().map(|s| Term::Variable(Intern::new(s)));
    let integer = number_token().map(Term::Integer);
    let string = select! { Token::String(value) => value }
        .map(|s| Term::Constant(Intern::new(format!("\"{}\"", s))));
    let constant = ident_token().map(|s| Term::Constant(Intern::new(s)));

    choice((variable, integer, string, constant)).labelled("term")
}

/// Parse an atom
fn atom() -> impl Parser<Token, Atom, Error = ParserError> + Clone {
    ident_token()
        .then(
            term()
                .separated_by(token(Token::Comma))
                .at_least(1)
                .delimited_by(token(Token::LParen), token(Token::RParen))
                .or_not(),
        )
        .map(|(predicate, terms)| Atom {
            predicate: Intern::new(predicate),
            terms: terms.unwrap_or_default(),
        })
        .labelled("atom")
}

fn comparison_operator() -> impl Parser<Token, ComparisonOp, Error = ParserError> + Clone {
    select! { Token::Cmp(op) => op }.labelled("comparison")
}

fn arithmetic_operator() -> impl Parser<Token, ArithOp, Error = ParserError> + Clone {
    select! { Token::Arith(op) => op }
}

#[derive(Clone)]
enum Expr {
    Simple(Term),
    Binary(Term, ArithOp, Term),
}

fn expression() -> impl Parser<Token, Expr, Error = ParserError> + Clone {
    term()
        .then(arithmetic_operator().then(term()).or_not())
        .map(|(left, rest)| match rest {
            Some((op, right)) => Expr::Binary(left, op, right),
            None => Expr::Simple(left),
        })
}

/// Parse a builtin literal: `X > 5`, `Z = X + Y`
fn builtin_literal() -> impl Parser<Token, Literal, Error = ParserError> + Clone {
    expression()
        .then(comparison_operator())
        .then(expression())
        .try_map(|((left, op), right), span| match (left, right) {
            (Expr::Simple(left), Expr::Simple(right)) => {
                Ok(Literal::Comparison(ComparisonLiteral { left, op, right }))
            }
            (Expr::Binary(left, arith, right), Expr::Simple(result))
            | (Expr::Simple(result), Expr::Binary(left, arith, right))
                if op == ComparisonOp::Equal =>
            {
                Ok(Literal::Arithmetic(ArithmeticLiteral {
                    result,
                    left,
                    op: arith,
                    right,
                }))
            }
            _ => Err(ParserError::custom(
                span,
                "arithmetic must have the form Z = X op Y",
            )),
        })
}

/// Parse `#int(X)`
fn int_literal() -> impl Parser<Token, Literal, Error = ParserError> + Clone {
    directive_token(Directive::Int)
        .ignore_then(term().delimited_by(token(Token::LParen), token(Token::RParen)))
        .map(Literal::Int)
}

/// Parse a body literal
fn literal() -> impl Parser<Token, Literal, Error = ParserError> + Clone {
    let negated = token(Token::Not)
        .ignore_then(atom())
        .map(Literal::Negative);

    let positive = atom().map(Literal::Positive);

    choice((int_literal(), builtin_literal(), negated, positive)).labelled("literal")
}

fn body() -> impl Parser<Token, Vec<Literal>, Error = ParserError> + Clone {
    literal().separated_by(token(Token::Comma)).at_least(1)
}

/// `v`, `|` or `;` between head atoms
fn head_separator() -> impl Parser<Token, (), Error = ParserError> + Clone {
    choice((
        select! { Token::Ident(ident) if ident == "v" => () },
        token(Token::Bar).ignored(),
        token(Token::Semicolon).ignored(),
    ))
}

/// Parse a rule or fact: `a v b :- body.`, `a.`
fn rule() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    atom()
        .separated_by(head_separator())
        .at_least(1)
        .then(token(Token::RuleSep).ignore_then(body()).or_not())
        .then_ignore(token(Token::Dot))
        .map(|(mut head, body)| match body {
            None if head.len() == 1 => Statement::Fact(Fact {
                atom: head.remove(0),
            }),
            body => Statement::Rule(Rule {
                head,
                body: body.unwrap_or_default(),
            }),
        })
        .labelled("rule")
}

/// Parse a constraint: :- body.
fn constraint() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    token(Token::RuleSep)
        .ignore_then(body())
        .then_ignore(token(Token::Dot))
        .map(|body| Statement::Constraint(Constraint { body }))
        .labelled("constraint")
}

/// Parse `#maxint = N.` or `#const name = value.`
fn directive() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    let maxint = directive_token(Directive::MaxInt)
        .ignore_then(equals())
        .ignore_then(number_token())
        .map(Statement::MaxInt);

    let constant = directive_token(Directive::Const)
        .ignore_then(ident_token())
        .then_ignore(equals())
        .then(term())
        .map(|(name, value)| {
            Statement::Const(ConstDecl {
                name: Intern::new(name),
                value,
            })
        });

    choice((maxint, constant))
        .then_ignore(token(Token::Dot))
        .labelled("directive")
}

/// Parse a statement
fn statement() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    choice((directive(), constraint(), rule())).labelled("statement")
}

/// Parse a program
pub fn program() -> impl Parser<Token, Program, Error = ParserError> + Clone {
    statement()
        .repeated()
        .map(|statements| Program { statements })
        .then_ignore(end())
        .labelled("program")
}

/// Parse an ASP program from text
pub fn parse_program(input: &str, src: SrcId) -> Result<Program, Vec<ParseError>> {
    let program = parse_with(program(), input, src)?;
    log::debug!("parsed {} statements from {}", program.statements.len(), src);
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Program {
        let result = parse_program(input, SrcId::empty());
        assert!(result.is_ok(), "Parse error: {:?}", result.err());
        result.unwrap()
    }

    // ===== Lexer Tests =====

    #[test]
    fn test_lex_rule() {
        let tokens = lex("a(X) :- b(X), not c(X).").unwrap();
        assert_eq!(tokens.len(), 16);
        assert_eq!(tokens[4].0, Token::RuleSep);
        assert_eq!(tokens[10].0, Token::Not);
    }

    #[test]
    fn test_lex_comments() {
        let tokens = lex("% line\n/* block\n comment */ a. % trailing").unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_lex_operators() {
        let tokens = lex("X <= Y, X <> Y, Z = X \\ Y").unwrap();
        assert_eq!(tokens[1].0, Token::Cmp(ComparisonOp::LessOrEqual));
        assert_eq!(tokens[5].0, Token::Cmp(ComparisonOp::NotEqual));
        assert_eq!(tokens[11].0, Token::Arith(ArithOp::Mod));
    }

    #[test]
    fn test_lex_directives() {
        let tokens = lex("#maxint = 4. #int(X)").unwrap();
        assert_eq!(tokens[0].0, Token::Directive(Directive::MaxInt));
        assert_eq!(tokens[4].0, Token::Directive(Directive::Int));
        assert!(lex("#show a/1.").is_err());
    }

    // ===== Statement Tests =====

    #[test]
    fn test_parse_fact() {
        let program = parse("edge(a, 1).");
        match &program.statements[0] {
            Statement::Fact(f) => {
                assert_eq!(f.atom.predicate.as_ref(), "edge");
                assert_eq!(f.atom.terms[1], Term::Integer(1));
            }
            _ => panic!("Expected fact"),
        }
    }

    #[test]
    fn test_parse_zero_arity_fact() {
        let program = parse("done.");
        match &program.statements[0] {
            Statement::Fact(f) => assert!(f.atom.terms.is_empty()),
            _ => panic!("Expected fact"),
        }
    }

    #[test]
    fn test_parse_disjunctive_fact() {
        let program = parse("a v b. c | d. e ; f.");
        assert_eq!(program.statements.len(), 3);
        for statement in &program.statements {
            match statement {
                Statement::Rule(r) => {
                    assert_eq!(r.head.len(), 2);
                    assert!(r.body.is_empty());
                }
                _ => panic!("Expected disjunctive rule"),
            }
        }
    }

    #[test]
    fn test_parse_disjunctive_rule() {
        let program = parse("in(X) v out(X) :- node(X), not fixed(X).");
        match &program.statements[0] {
            Statement::Rule(r) => {
                assert_eq!(r.head.len(), 2);
                assert_eq!(r.body.len(), 2);
                assert!(matches!(r.body[1], Literal::Negative(_)));
            }
            _ => panic!("Expected rule"),
        }
    }

    #[test]
    fn test_parse_constraint() {
        let program = parse(":- not a, not b.");
        match &program.statements[0] {
            Statement::Constraint(c) => assert_eq!(c.body.len(), 2),
            _ => panic!("Expected constraint"),
        }
    }

    #[test]
    fn test_parse_comparison() {
        let program = parse("b(X) :- a(X), X != 1.");
        match &program.statements[0] {
            Statement::Rule(r) => match &r.body[1] {
                Literal::Comparison(c) => {
                    assert_eq!(c.op, ComparisonOp::NotEqual);
                    assert_eq!(c.right, Term::Integer(1));
                }
                other => panic!("Expected comparison, got {:?}", other),
            },
            _ => panic!("Expected rule"),
        }
    }

    #[test]
    fn test_parse_arithmetic_either_side() {
        let program = parse("s(Z) :- a(X), a(Y), Z = X + Y. t(Z) :- a(X), X * 2 = Z.");
        let arith: Vec<&ArithmeticLiteral> = program
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::Rule(r) => r.body.iter().find_map(|l| match l {
                    Literal::Arithmetic(a) => Some(a),
                    _ => None,
                }),
                _ => None,
            })
            .collect();
        assert_eq!(arith.len(), 2);
        assert_eq!(arith[0].op, ArithOp::Add);
        assert_eq!(arith[1].op, ArithOp::Mul);
        assert_eq!(arith[1].right, Term::Integer(2));
    }

    #[test]
    fn test_parse_arithmetic_requires_equality() {
        assert!(parse_program("p(X) :- q(X), X + 1 < 3.", SrcId::empty()).is_err());
    }

    #[test]
    fn test_parse_int_builtin() {
        let program = parse("n(X) :- #int(X).");
        match &program.statements[0] {
            Statement::Rule(r) => {
                assert_eq!(
                    r.body[0],
                    Literal::Int(Term::Variable(Intern::new("X".to_string())))
                )
            }
            _ => panic!("Expected rule"),
        }
    }

    #[test]
    fn test_parse_directives() {
        let program = parse("#maxint = 5. #const n = 3.");
        assert_eq!(program.statements[0], Statement::MaxInt(5));
        match &program.statements[1] {
            Statement::Const(decl) => {
                assert_eq!(decl.name.as_ref(), "n");
                assert_eq!(decl.value, Term::Integer(3));
            }
            _ => panic!("Expected const"),
        }
    }

    #[test]
    fn test_parse_anonymous_variable() {
        let program = parse("p(X) :- q(X, _).");
        match &program.statements[0] {
            Statement::Rule(r) => match &r.body[0] {
                Literal::Positive(atom) => {
                    assert_eq!(atom.terms[1], Term::Variable(Intern::new("_".to_string())))
                }
                _ => panic!("Expected positive literal"),
            },
            _ => panic!("Expected rule"),
        }
    }

    #[test]
    fn test_parse_string_constant() {
        let program = parse("name(\"Ada Lovelace\").");
        match &program.statements[0] {
            Statement::Fact(f) => assert_eq!(
                f.atom.terms[0],
                Term::Constant(Intern::new("\"Ada Lovelace\"".to_string()))
            ),
            _ => panic!("Expected fact"),
        }
    }

    #[test]
    fn test_parse_error_reports_position() {
        let errors = parse_program("a :- .", SrcId::named("bad.lp")).unwrap_err();
        assert!(!errors.is_empty());
        let message = errors[0].to_string();
        assert!(message.contains("bad.lp"), "message was {}", message);
    }

    #[test]
    fn test_parse_missing_dot_fails() {
        assert!(parse_program("a :- b", SrcId::empty()).is_err());
    }
}
