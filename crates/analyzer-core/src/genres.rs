//! Safe parsing of the literal text stored in the `genres` and `keywords`
//! columns.
//!
//! Cells look like `[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]`.
//! The text is parsed as data (lists, tuples, dicts, quoted strings, numbers
//! and the `True`/`False`/`None` keywords) into a [`serde_json::Value`]; it is
//! never evaluated, and container nesting is bounded by [`MAX_DEPTH`].

use serde_json::{Map, Number, Value};
use winnow::ascii::multispace0;
use winnow::combinator::{alt, cut_err, delimited, fail, opt, separated, separated_pair, terminated};
use winnow::token::{any, literal, take_till, take_while};
use winnow::{ModalResult, Parser};

/// Deepest container nesting accepted before the text is rejected.
pub const MAX_DEPTH: usize = 64;

/// Parse a complete literal. Returns `None` when the text is not a
/// well-formed literal, nests deeper than [`MAX_DEPTH`], or has trailing
/// garbage.
pub fn parse_literal(text: &str) -> Option<Value> {
    top_level.parse(text).ok()
}

/// `name` of every record in a serialized list of records, such as a
/// `genres` or `keywords` cell.
///
/// Permissive: anything other than a list (or tuple) whose every element is a
/// record carrying a `name` yields an empty list. A `None` name is skipped.
pub fn record_names(text: &str) -> Vec<String> {
    let Some(Value::Array(items)) = parse_literal(text) else {
        return Vec::new();
    };

    let mut names = Vec::with_capacity(items.len());
    for item in &items {
        match item.get("name") {
            Some(Value::String(name)) => names.push(name.clone()),
            Some(Value::Null) => {}
            None => return Vec::new(),
            Some(other) => names.push(other.to_string()),
        }
    }
    names
}

// ── Grammar ───────────────────────────────────────────────────────────────────

fn top_level(input: &mut &str) -> ModalResult<Value> {
    value(input, 0)
}

fn value(input: &mut &str, depth: usize) -> ModalResult<Value> {
    if depth > MAX_DEPTH {
        return cut_err(fail::<_, Value, _>).parse_next(input);
    }
    delimited(
        multispace0,
        alt((
            |i: &mut &str| list(i, depth + 1),
            |i: &mut &str| tuple(i, depth + 1),
            |i: &mut &str| dict(i, depth + 1),
            quoted.map(Value::String),
            keyword,
            number,
        )),
        multispace0,
    )
    .parse_next(input)
}

fn items(input: &mut &str, depth: usize) -> ModalResult<Vec<Value>> {
    terminated(
        separated(0.., |i: &mut &str| value(i, depth), ','),
        opt(','),
    )
    .parse_next(input)
}

fn list(input: &mut &str, depth: usize) -> ModalResult<Value> {
    let items = delimited('[', |i: &mut &str| items(i, depth), (multispace0, ']'))
        .parse_next(input)?;
    Ok(Value::Array(items))
}

fn tuple(input: &mut &str, depth: usize) -> ModalResult<Value> {
    let items = delimited('(', |i: &mut &str| items(i, depth), (multispace0, ')'))
        .parse_next(input)?;
    Ok(Value::Array(items))
}

fn dict(input: &mut &str, depth: usize) -> ModalResult<Value> {
    let entries: Vec<(String, Value)> = delimited(
        '{',
        terminated(
            separated(0.., |i: &mut &str| entry(i, depth), ','),
            opt(','),
        ),
        (multispace0, '}'),
    )
    .parse_next(input)?;
    Ok(Value::Object(entries.into_iter().collect::<Map<String, Value>>()))
}

fn entry(input: &mut &str, depth: usize) -> ModalResult<(String, Value)> {
    let (key, val) = separated_pair(
        |i: &mut &str| value(i, depth),
        ':',
        |i: &mut &str| value(i, depth),
    )
    .parse_next(input)?;
    let key = match key {
        Value::String(s) => s,
        other => other.to_string(),
    };
    Ok((key, val))
}

/// Single- or double-quoted string with backslash escapes.
fn quoted(input: &mut &str) -> ModalResult<String> {
    let quote = alt(('\'', '"')).parse_next(input)?;
    let mut out = String::new();
    loop {
        let chunk = take_till(0.., |c: char| c == quote || c == '\\').parse_next(input)?;
        out.push_str(chunk);
        if any.parse_next(input)? == quote {
            return Ok(out);
        }
        let escaped = any.parse_next(input)?;
        out.push(match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => other,
        });
    }
}

fn keyword(input: &mut &str) -> ModalResult<Value> {
    alt((
        alt((literal("True"), literal("true"))).value(Value::Bool(true)),
        alt((literal("False"), literal("false"))).value(Value::Bool(false)),
        alt((literal("None"), literal("null"))).value(Value::Null),
    ))
    .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<Value> {
    take_while(1.., |c: char| {
        c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
    })
    .verify_map(number_value)
    .parse_next(input)
}

fn number_value(raw: &str) -> Option<Value> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(Value::Number(v.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
