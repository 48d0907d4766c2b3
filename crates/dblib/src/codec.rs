//! Row Codec: the paired encode/decode transform applied to values
//! crossing the storage boundary.
//!
//! `encode` runs as the escaper's literal-prep step before driver
//! escaping; `decode` runs recursively over every fetched scalar so data
//! read back matches what was logically stored, not its storage-escaped
//! form.
//!
//! The legacy implementation interleaved HTML-entity handling with SQL
//! escaping and changed its mind between versions. Rather than guess,
//! the codec is a pluggable pair with one documented default:
//!
//! - [`SlashCodec`] (default): `encode` is the identity, `decode`
//!   removes backslash escape sequences. Round-trip holds for every
//!   printable string that does not itself contain `\`.
//! - [`EntityCodec`]: the legacy-faithful pair (entity-decode before
//!   storage, slash-strip + entity-encode after fetch). Non-bijective
//!   for strings containing raw `&`, `<`, `>`, `"` or `'`.
//! - [`NoopCodec`]: both directions identity.

use crate::value::Value;

/// A reversible-ish sanitize/unsanitize pair for stored values.
pub trait Codec: Send + Sync {
    /// Literal-prep applied before the driver's escape routine.
    fn encode(&self, raw: &str) -> String;

    /// Reverse transform applied to every fetched scalar.
    fn decode(&self, stored: &str) -> String;

    /// Apply [`Codec::decode`] recursively through lists and maps.
    ///
    /// Map keys are decoded too: the legacy post-fetch pass ran over
    /// keys and values alike.
    fn decode_value(&self, value: Value) -> Value {
        match value {
            Value::Text(s) => Value::Text(self.decode(&s)),
            Value::List(items) => {
                Value::List(items.into_iter().map(|v| self.decode_value(v)).collect())
            }
            Value::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (self.decode(&k), self.decode_value(v)))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Remove backslash escape sequences: `\x` becomes `x`.
///
/// A trailing lone backslash is preserved as-is.
fn strip_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// The documented entity subset handled by [`EntityCodec`].
const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#039;", '\''),
];

fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    'outer: while !rest.is_empty() {
        if rest.starts_with('&') {
            for (entity, ch) in ENTITIES {
                if let Some(tail) = rest.strip_prefix(entity) {
                    out.push(ch);
                    rest = tail;
                    continue 'outer;
                }
            }
        }
        let ch = rest.chars().next().unwrap_or_default();
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

fn encode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ENTITIES.iter().find(|(_, c)| *c == ch) {
            Some((entity, _)) => out.push_str(entity),
            None => out.push(ch),
        }
    }
    out
}

/// Default codec: identity on encode, backslash-strip on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlashCodec;

impl Codec for SlashCodec {
    fn encode(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn decode(&self, stored: &str) -> String {
        strip_slashes(stored)
    }
}

/// Legacy-faithful codec: HTML entities decoded before storage and
/// re-encoded after fetch, with backslash-stripping in between.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityCodec;

impl Codec for EntityCodec {
    fn encode(&self, raw: &str) -> String {
        decode_entities(raw)
    }

    fn decode(&self, stored: &str) -> String {
        encode_entities(&strip_slashes(stored))
    }
}

/// Identity in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCodec;

impl Codec for NoopCodec {
    fn encode(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn decode(&self, stored: &str) -> String {
        stored.to_string()
    }
}
