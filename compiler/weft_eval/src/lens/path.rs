//! Access path syntax.
//!
//! ```text
//! path     := step+
//! step     := '.' ( ident | digits | '"' chars '"' | '(' ident ')' )
//! ```
//!
//! `.power` and `."ID"` read a field by name, `.0` by position, and
//! `.(Combustion)` continues only on that variant.

use weft_ir::{Selector, StringInterner};

use crate::errors::LensError;

fn invalid(path: &str, reason: impl Into<String>) -> LensError {
    LensError::InvalidPath {
        path: path.to_owned(),
        reason: reason.into(),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split an identifier off the front of `rest`.
fn ident(rest: &str) -> Option<(&str, &str)> {
    let first = rest.chars().next().filter(|&c| is_ident_start(c))?;
    let end = rest[first.len_utf8()..]
        .find(|c: char| !is_ident_continue(c))
        .map_or(rest.len(), |i| i + first.len_utf8());
    Some(rest.split_at(end))
}

/// Parse `path` into selectors, interning every name it mentions.
pub(super) fn parse(path: &str, interner: &StringInterner) -> Result<Vec<Selector>, LensError> {
    if path.is_empty() {
        return Err(invalid(path, "empty path"));
    }
    let mut selectors = Vec::new();
    let mut rest = path;
    while !rest.is_empty() {
        let Some(after_dot) = rest.strip_prefix('.') else {
            return Err(invalid(path, format!("expected `.` before `{rest}`")));
        };
        let (selector, remaining) = step(path, after_dot, interner)?;
        selectors.push(selector);
        rest = remaining;
    }
    Ok(selectors)
}

/// Parse one step after its leading `.`.
fn step<'p>(
    path: &str,
    input: &'p str,
    interner: &StringInterner,
) -> Result<(Selector, &'p str), LensError> {
    match input.chars().next() {
        None => Err(invalid(path, "expected a selector after `.`")),
        Some(c) if c.is_ascii_digit() => {
            let end = input
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(input.len());
            let (digits, rest) = input.split_at(end);
            let index = digits
                .parse::<usize>()
                .map_err(|_| invalid(path, format!("field position `{digits}` is too large")))?;
            Ok((Selector::FieldByPosition(index), rest))
        }
        Some('"') => {
            let body = &input[1..];
            let Some(close) = body.find('"') else {
                return Err(invalid(path, "unterminated quoted field name"));
            };
            if close == 0 {
                return Err(invalid(path, "empty quoted field name"));
            }
            let name = interner.intern(&body[..close]);
            Ok((Selector::FieldByName(name), &body[close + 1..]))
        }
        Some('(') => {
            let Some((tag, rest)) = ident(&input[1..]) else {
                return Err(invalid(path, "expected a constructor name after `(`"));
            };
            let Some(rest) = rest.strip_prefix(')') else {
                return Err(invalid(path, format!("expected `)` after `{tag}`")));
            };
            Ok((Selector::VariantGuard(interner.intern(tag)), rest))
        }
        Some(_) => {
            let Some((name, rest)) = ident(input) else {
                return Err(invalid(path, format!("unexpected `{input}`")));
            };
            Ok((Selector::FieldByName(interner.intern(name)), rest))
        }
    }
}
