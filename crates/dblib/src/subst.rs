//! Placeholder substitution for option fragments.
//!
//! An option fragment (`WHERE id = ?`, `ORDER BY ? LIMIT 5`) may carry
//! `?` placeholders. Each unescaped `?` is replaced, left to right, by
//! the rendered literal of the next bound value. `\?` is an escaped
//! literal question mark and is never substituted. Substitution happens
//! in one pass over the input, so literal text produced for one value
//! is never rescanned for placeholders.

use crate::error::{DbError, DbResult};
use crate::escape::Escaper;
use crate::value::Values;

/// Count the unescaped `?` placeholders in a fragment.
pub fn count_placeholders(fragment: &str) -> usize {
    let mut count = 0;
    let mut chars = fragment.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            // A backslash shields only a following question mark.
            '\\' if chars.peek() == Some(&'?') => {
                chars.next();
            }
            '?' => count += 1,
            _ => {}
        }
    }
    count
}

/// Replace each unescaped `?` with the escaped literal of the next
/// bound value, and unescape `\?` to `?`.
///
/// Fails with [`DbError::PlaceholderCount`] when the fragment has more
/// placeholders than `values` supplies. Surplus values are ignored.
pub fn substitute(fragment: &str, values: &Values, escaper: &Escaper<'_>) -> DbResult<String> {
    let expected = count_placeholders(fragment);
    if expected > values.len() {
        return Err(DbError::PlaceholderCount {
            expected,
            supplied: values.len(),
        });
    }

    let mut out = String::with_capacity(fragment.len());
    let mut next = 0;
    let mut chars = fragment.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'?') => {
                chars.next();
                out.push('?');
            }
            '?' => {
                // Counted above, so the value is present.
                if let Some(value) = values.get(next) {
                    out.push_str(&escaper.escape_literal(value));
                }
                next += 1;
            }
            other => out.push(other),
        }
    }
    Ok(out)
}
