//! Turns a formula string into an [`Expr`] over an ordered list of input variables.
//!
//! Grammar, loosest binding first:
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | name '(' expr ')' | name | '(' expr ')'
//! ```
//! so `-x^2` is `-(x^2)`, `2^3^2` is `2^9` and `2^-1` is `0.5`.
//!
//! Every bracket, function call, sign and exponent opens one `unary` level. More than
//! [`MAX_NESTING_DEPTH`] open levels are rejected with [`ParseError::TooDeep`] before the
//! recursion can exhaust the stack. Long `+`/`-` and `*`/`/` chains are read in a loop and do
//! not count.
//!
//! Names are resolved here, not at evaluation: an input variable becomes `Var(index)`,
//! `_pi` and `_e` become constants, a name followed by `(` must be a registered [`ElemFun`].
//!
//! # Example
//! ```
//! use RustedFunctions::symbolic::parse_expr::parse_expression;
//! let vars = vec!["x1".to_string(), "x2".to_string()];
//! let expr = parse_expression("x1*sin(x2)", &vars).unwrap();
//! assert_eq!(expr.eval(&[2.0, 0.0]), 0.0);
//! ```
use crate::symbolic::elementary::ElemFun;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{find_unbalanced_bracket, position_of};
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, one_of},
    combinator::{cut, opt, recognize},
    error::{ErrorKind, ParseError as NomParseError},
    multi::many0,
    sequence::{pair, preceded},
};
use std::cell::Cell;
use std::f64::consts::{E, PI};
use std::str::FromStr;
use thiserror::Error;

/// Deepest accepted nesting of brackets, calls, signs and exponents.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Why a formula was rejected. Positions are char offsets into the formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty formula")]
    EmptyFormula,
    #[error("unknown variable '{name}' at position {position}")]
    UnknownVariable { name: String, position: usize },
    #[error("unknown function '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },
    #[error("function '{name}' at position {position} takes exactly one argument")]
    FunctionArity { name: String, position: usize },
    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParentheses { position: usize },
    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("formula nested deeper than {} levels at position {position}", MAX_NESTING_DEPTH)]
    TooDeep { position: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum FormulaErrorKind {
    Syntax,
    UnknownVariable(String),
    UnknownFunction(String),
    FunctionArity(String),
    TooDeep,
}

/// nom error carrying the remaining input, so the position can be recovered afterwards
#[derive(Debug, Clone, PartialEq)]
struct FormulaError<'a> {
    rest: &'a str,
    kind: FormulaErrorKind,
}

impl<'a> FormulaError<'a> {
    fn new(rest: &'a str, kind: FormulaErrorKind) -> Self {
        FormulaError { rest, kind }
    }

    fn failure<O>(rest: &'a str, kind: FormulaErrorKind) -> PResult<'a, O> {
        Err(nom::Err::Failure(FormulaError::new(rest, kind)))
    }

    fn into_parse_error(self, formula: &str) -> ParseError {
        let position = position_of(formula, self.rest);
        match self.kind {
            FormulaErrorKind::UnknownVariable(name) => ParseError::UnknownVariable { name, position },
            FormulaErrorKind::UnknownFunction(name) => ParseError::UnknownFunction { name, position },
            FormulaErrorKind::FunctionArity(name) => ParseError::FunctionArity { name, position },
            FormulaErrorKind::TooDeep => ParseError::TooDeep { position },
            FormulaErrorKind::Syntax => unexpected(formula, self.rest),
        }
    }
}

impl<'a> NomParseError<&'a str> for FormulaError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        FormulaError::new(input, FormulaErrorKind::Syntax)
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, O> = IResult<&'a str, O, FormulaError<'a>>;

fn unexpected(formula: &str, rest: &str) -> ParseError {
    let rest = rest.trim_start();
    match rest.chars().next() {
        Some(c) => ParseError::UnexpectedToken {
            found: c.to_string(),
            position: position_of(formula, rest),
        },
        None => ParseError::UnexpectedEnd,
    }
}

fn sp<'a>(input: &'a str) -> PResult<'a, &'a str> {
    multispace0(input)
}

fn symbol<'a>(c: char) -> impl Parser<&'a str, Output = char, Error = FormulaError<'a>> {
    preceded(sp, char(c))
}

fn operator<'a>(ops: &'static str) -> impl Parser<&'a str, Output = char, Error = FormulaError<'a>> {
    preceded(sp, one_of(ops))
}

/// word characters: a letter or `_` first, then letters, digits and `_`
fn identifier<'a>(input: &'a str) -> PResult<'a, &'a str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// `12`, `1.5`, `3.`, `.5`, each with an optional `e[+-]digits` exponent
fn float_literal<'a>(input: &'a str) -> PResult<'a, &'a str> {
    let mantissa = alt((
        recognize((digit1, opt((char('.'), opt(digit1))))),
        recognize((char('.'), digit1)),
    ));
    let exponent = opt((one_of("eE"), opt(one_of("+-")), digit1));
    recognize((mantissa, exponent)).parse(input)
}

struct FormulaParser<'v> {
    variables: &'v [String],
    depth: Cell<usize>, // unary levels currently open
}

impl<'v> FormulaParser<'v> {
    fn expr<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let (input, first) = self.term(input)?;
        let (input, rest) =
            many0(pair(operator("+-"), cut(|i: &'a str| self.term(i)))).parse(input)?;
        let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
            '+' => acc + rhs,
            _ => acc - rhs,
        });
        Ok((input, expr))
    }

    fn term<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let (input, first) = self.unary(input)?;
        let (input, rest) =
            many0(pair(operator("*/"), cut(|i: &'a str| self.unary(i)))).parse(input)?;
        let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
            '*' => acc * rhs,
            _ => acc / rhs,
        });
        Ok((input, expr))
    }

    fn unary<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let depth = self.depth.get();
        if depth >= MAX_NESTING_DEPTH {
            return FormulaError::failure(input, FormulaErrorKind::TooDeep);
        }
        self.depth.set(depth + 1);
        let result = self.signed(input);
        self.depth.set(depth);
        result
    }

    fn signed<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let (input, sign) = opt(operator("+-")).parse(input)?;
        match sign {
            Some('-') => {
                let (input, operand) = cut(|i: &'a str| self.unary(i)).parse(input)?;
                Ok((input, -operand))
            }
            Some(_) => cut(|i: &'a str| self.unary(i)).parse(input),
            None => self.power(input),
        }
    }

    fn power<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let (input, base) = self.primary(input)?;
        // right associative: the exponent is parsed as a full unary, which may contain '^' again
        let (input, exponent) =
            opt(preceded(symbol('^'), cut(|i: &'a str| self.unary(i)))).parse(input)?;
        match exponent {
            Some(exponent) => Ok((input, base.pow(exponent))),
            None => Ok((input, base)),
        }
    }

    fn primary<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let (input, _) = sp(input)?;
        alt((
            |i: &'a str| self.number(i),
            |i: &'a str| self.name_or_call(i),
            |i: &'a str| self.group(i),
        ))
        .parse(input)
    }

    fn number<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let (rest, text) = float_literal(input)?;
        match text.parse::<f64>() {
            Ok(value) => Ok((rest, Expr::Const(value))),
            Err(_) => FormulaError::failure(input, FormulaErrorKind::Syntax),
        }
    }

    fn name_or_call<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let (rest, name) = identifier(input)?;
        let (after_name, _) = sp(rest)?;
        if let Some(inside) = after_name.strip_prefix('(') {
            let Ok(fun) = ElemFun::from_str(name) else {
                return FormulaError::failure(input, FormulaErrorKind::UnknownFunction(name.to_string()));
            };
            let (rest, argument) = cut(|i: &'a str| self.expr(i)).parse(inside)?;
            let (rest, _) = sp(rest)?;
            if rest.starts_with(',') {
                return FormulaError::failure(input, FormulaErrorKind::FunctionArity(name.to_string()));
            }
            let (rest, _) = cut(symbol(')')).parse(rest)?;
            return Ok((rest, argument.apply(fun)));
        }
        if let Some(index) = self.variables.iter().position(|v| v == name) {
            return Ok((rest, Expr::Var(index)));
        }
        match name {
            "_pi" => Ok((rest, Expr::Const(PI))),
            "_e" => Ok((rest, Expr::Const(E))),
            _ => FormulaError::failure(input, FormulaErrorKind::UnknownVariable(name.to_string())),
        }
    }

    fn group<'a>(&self, input: &'a str) -> PResult<'a, Expr> {
        let (input, _) = symbol('(').parse(input)?;
        let (input, inner) = cut(|i: &'a str| self.expr(i)).parse(input)?;
        let (input, _) = cut(symbol(')')).parse(input)?;
        Ok((input, inner))
    }
}

/// Parses `formula` against the ordered input description `variables`.
///
/// Every `Var` index in the result is smaller than `variables.len()`.
pub fn parse_expression(formula: &str, variables: &[String]) -> Result<Expr, ParseError> {
    if formula.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }
    if let Some(position) = find_unbalanced_bracket(formula) {
        return Err(ParseError::UnbalancedParentheses { position });
    }
    let parser = FormulaParser {
        variables,
        depth: Cell::new(0),
    };
    match parser.expr(formula) {
        Ok((rest, expr)) => {
            if !rest.trim().is_empty() {
                return Err(unexpected(formula, rest));
            }
            debug!("parsed '{}' into {}", formula, expr.to_formula(variables));
            Ok(expr)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.into_parse_error(formula)),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::UnexpectedEnd),
    }
}
