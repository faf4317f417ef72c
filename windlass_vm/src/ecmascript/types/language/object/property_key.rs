// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::{number_to_string, HeapString, Symbol, Value};

/// A property key: a String or a Symbol. Canonical array-index strings are
/// normalized into the `Index` form so that numeric property access never
/// allocates and exotic array behaviour can test for indexes cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// An array index: an integer in `0..=u32::MAX - 2`.
    Index(u32),
    String(HeapString),
    Symbol(Symbol),
}

impl PropertyKey {
    pub fn from_str(agent: &mut Agent, key: &str) -> Self {
        if let Some(index) = parse_array_index(key) {
            PropertyKey::Index(index)
        } else {
            PropertyKey::String(HeapString::from_str(agent, key))
        }
    }

    pub fn from_heap_string(agent: &Agent, key: HeapString) -> Self {
        if let Some(index) = parse_array_index(key.as_str(agent)) {
            PropertyKey::Index(index)
        } else {
            PropertyKey::String(key)
        }
    }

    /// The key for an integral number that is within array-index range.
    pub fn try_from_f64(value: f64) -> Option<Self> {
        if value.fract() == 0.0 && value >= 0.0 && value < (u32::MAX - 1) as f64 {
            Some(PropertyKey::Index(value as u32))
        } else {
            None
        }
    }

    pub fn is_array_index(self) -> bool {
        matches!(self, PropertyKey::Index(_))
    }

    pub fn as_index(self) -> Option<u32> {
        match self {
            PropertyKey::Index(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_symbol(self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// The language-level value of the key: indexes convert back to their
    /// canonical string form.
    pub fn to_value(self, agent: &mut Agent) -> Value {
        match self {
            PropertyKey::Index(i) => Value::from_string(agent, i.to_string()),
            PropertyKey::String(s) => Value::String(s),
            PropertyKey::Symbol(s) => Value::Symbol(s),
        }
    }

    /// Whether this key equals the given string content.
    pub fn equals_str(self, agent: &Agent, other: &str) -> bool {
        match self {
            PropertyKey::Index(_) => false,
            PropertyKey::String(s) => s.as_str(agent) == other,
            PropertyKey::Symbol(_) => false,
        }
    }

    pub fn debug_string(self, agent: &Agent) -> std::string::String {
        match self {
            PropertyKey::Index(i) => i.to_string(),
            PropertyKey::String(s) => s.as_str(agent).to_owned(),
            PropertyKey::Symbol(s) => {
                let description = s.description(agent).map_or("", |d| d.as_str(agent));
                format!("Symbol({description})")
            }
        }
    }
}

impl From<HeapString> for PropertyKey {
    /// Note: this does not normalize array-index strings; use
    /// [`PropertyKey::from_heap_string`] when the content may be numeric.
    fn from(value: HeapString) -> Self {
        PropertyKey::String(value)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(value: Symbol) -> Self {
        PropertyKey::Symbol(value)
    }
}

impl From<u32> for PropertyKey {
    fn from(value: u32) -> Self {
        PropertyKey::Index(value)
    }
}

/// Parses a canonical array-index string: "0", or a digit string with no
/// leading zero whose value is at most 2^32 - 2.
pub(crate) fn parse_array_index(key: &str) -> Option<u32> {
    if key.is_empty() || key.len() > 10 {
        return None;
    }
    if key == "0" {
        return Some(0);
    }
    if key.starts_with('0') || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = key.parse().ok()?;
    if value <= (u32::MAX - 1) as u64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Canonical numeric strings that are not array indexes (for example
/// "-0" or "4294967295") still need the numeric-string test for
/// CanonicalNumericIndexString semantics on string exotics.
pub(crate) fn is_canonical_numeric_string(key: &str) -> bool {
    if key == "-0" {
        return true;
    }
    let n = crate::ecmascript::types::string_to_number(key);
    number_to_string(n) == key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_index_parsing() {
        assert_eq!(parse_array_index("0"), Some(0));
        assert_eq!(parse_array_index("42"), Some(42));
        assert_eq!(parse_array_index("4294967294"), Some(u32::MAX - 1));
        assert_eq!(parse_array_index("4294967295"), None);
        assert_eq!(parse_array_index("01"), None);
        assert_eq!(parse_array_index("-1"), None);
        assert_eq!(parse_array_index(""), None);
        assert_eq!(parse_array_index("1.5"), None);
    }
}
