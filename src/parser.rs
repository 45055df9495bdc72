//! Filter expression parser using nom.
//!
//! Parses the textual filters accepted by the CLI and by
//! [`Query::parse_filter`](crate::query::Query::parse_filter).
//!
//! # Syntax Overview
//!
//! ```text
//! booleanFlag IS TRUE AND primitiveFlag = 1 OR name LIKE 'a%'
//! ─────┬───── ───┬─── ─┬─ ──────┬──────
//!      │         │     │        └── Comparison: field op literal
//!      │         │     └── Connective (AND / OR, left to right)
//!      │         └── Truth test: IS [NOT] TRUE | FALSE | NULL
//!      └── Field name (mapped field, not column)
//! ```
//!
//! `IS NOT TRUE` reads as `IS FALSE` and `IS NOT FALSE` as `IS TRUE`, since
//! flags are tested through their column's coercion rule.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{map_res, not, opt, recognize, value},
    multi::many0,
    sequence::{pair, terminated, tuple},
    IResult,
};

use crate::ast::{Comparator, LogicalOp, Value};
use crate::error::{FieldqlError, FieldqlResult};

/// A parsed filter: conditions joined left to right.
///
/// The connective of the first condition is always [`LogicalOp::And`].
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub conditions: Vec<(LogicalOp, ParsedCondition)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCondition {
    pub field: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    IsTrue,
    IsFalse,
    IsNull,
    IsNotNull,
    Compare(Comparator, Value),
}

/// Parse a complete filter expression.
pub fn parse_filter(input: &str) -> FieldqlResult<Filter> {
    match parse_expr(input.trim_start()) {
        Ok((rest, filter)) if rest.trim().is_empty() => Ok(filter),
        Ok((rest, _)) => Err(FieldqlError::parse(
            input.len() - rest.len(),
            format!("Unexpected trailing content: '{}'", rest.trim()),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            let message = if e.input.is_empty() {
                "Unexpected end of filter".to_string()
            } else {
                format!("Unexpected input: '{}'", e.input)
            };
            Err(FieldqlError::parse(position, message))
        }
        Err(nom::Err::Incomplete(_)) => {
            Err(FieldqlError::parse(input.len(), "Unexpected end of filter"))
        }
    }
}

/// expr := cond ((AND|OR) cond)*
fn parse_expr(input: &str) -> IResult<&str, Filter> {
    let (input, first) = parse_condition(input)?;
    let (input, rest) = many0(pair(parse_connective, parse_condition))(input)?;

    let mut conditions = vec![(LogicalOp::And, first)];
    conditions.extend(rest);
    Ok((input, Filter { conditions }))
}

fn parse_connective(input: &str) -> IResult<&str, LogicalOp> {
    let (input, _) = multispace1(input)?;
    let (input, op) = alt((
        value(LogicalOp::And, keyword("and")),
        value(LogicalOp::Or, keyword("or")),
    ))(input)?;
    let (input, _) = multispace1(input)?;
    Ok((input, op))
}

/// cond := field IS [NOT] (TRUE|FALSE|NULL) | field op literal
fn parse_condition(input: &str) -> IResult<&str, ParsedCondition> {
    let (input, field) = parse_identifier(input)?;
    let (input, predicate) = alt((parse_truth_test, parse_comparison))(input)?;

    Ok((
        input,
        ParsedCondition {
            field: field.to_string(),
            predicate,
        },
    ))
}

fn parse_truth_test(input: &str) -> IResult<&str, Predicate> {
    let (input, _) = multispace1(input)?;
    let (input, _) = keyword("is")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, negated) = opt(terminated(keyword("not"), multispace1))(input)?;
    let (input, predicate) = alt((
        value(Predicate::IsTrue, keyword("true")),
        value(Predicate::IsFalse, keyword("false")),
        value(Predicate::IsNull, keyword("null")),
    ))(input)?;

    let predicate = match (negated.is_some(), predicate) {
        (false, p) => p,
        (true, Predicate::IsTrue) => Predicate::IsFalse,
        (true, Predicate::IsFalse) => Predicate::IsTrue,
        (true, _) => Predicate::IsNotNull,
    };
    Ok((input, predicate))
}

fn parse_comparison(input: &str) -> IResult<&str, Predicate> {
    let (input, _) = multispace0(input)?;
    let (input, op) = parse_operator(input)?;
    let (input, _) = multispace0(input)?;
    let (input, literal) = parse_literal(input)?;
    Ok((input, Predicate::Compare(op, literal)))
}

fn parse_operator(input: &str) -> IResult<&str, Comparator> {
    alt((
        value(Comparator::GreaterEqual, tag(">=")),
        value(Comparator::LessEqual, tag("<=")),
        value(Comparator::NotEqual, tag("<>")),
        value(Comparator::NotEqual, tag("!=")),
        value(Comparator::GreaterThan, char('>')),
        value(Comparator::LessThan, char('<')),
        value(Comparator::Equal, char('=')),
        value(Comparator::Like, keyword("like")),
    ))(input)
}

fn parse_literal(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Bool(true), keyword("true")),
        value(Value::Bool(false), keyword("false")),
        value(Value::Null, keyword("null")),
        parse_number,
        parse_quoted_string,
    ))(input)
}

/// Parse a number (integer or float).
fn parse_number(input: &str) -> IResult<&str, Value> {
    map_res(
        recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit1))))),
        |num: &str| {
            if num.contains('.') {
                num.parse::<f64>().map(Value::Float).map_err(|e| e.to_string())
            } else {
                num.parse::<i64>().map(Value::Int).map_err(|e| e.to_string())
            }
        },
    )(input)
}

/// Parse a single-quoted string; `''` is an escaped quote.
fn parse_quoted_string(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('\'')(input)?;
    let (input, parts) = many0(alt((
        take_while1(|c: char| c != '\''),
        value("'", tag("''")),
    )))(input)?;
    let (input, _) = char('\'')(input)?;

    Ok((input, Value::Text(parts.concat())))
}

/// Parse a field name.
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Case-insensitive keyword that is not the prefix of a longer word.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(
        tag_no_case(word),
        not(take_while1(|c: char| c.is_alphanumeric() || c == '_')),
    )
}
