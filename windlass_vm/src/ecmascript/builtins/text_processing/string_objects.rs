// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.1 String Objects](https://tc39.es/ecma262/#sec-string-objects)
//!
//! Host failures inside delegated Unicode operations surface as the
//! spec'd error kinds: RangeError where the language names one, TypeError
//! otherwise.

use unicode_normalization::UnicodeNormalization;

use crate::ecmascript::abstract_operations::operations_on_objects::{
    call_function, get, get_method_on_value, invoke,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::require_object_coercible;
use crate::ecmascript::abstract_operations::type_conversion::{
    to_integer_or_infinity, to_number, to_string,
};
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::iterator_objects::{
    create_string_iterator, string_iterator_next,
};
use crate::ecmascript::builtins::ordinary::get_prototype_from_constructor;
use crate::ecmascript::builtins::string_object::{string_create, string_object_value};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{
    Agent, ExceptionType, JsResult, ProtoIntrinsics, RealmIdentifier,
};
use crate::ecmascript::types::{HeapString, Object, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct StringConstructor;
impl Builtin for StringConstructor {
    const NAME: &'static str = "String";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}
struct StringFromCharCode;
impl Builtin for StringFromCharCode {
    const NAME: &'static str = "fromCharCode";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringConstructor::from_char_code);
}
struct StringFromCodePoint;
impl Builtin for StringFromCodePoint {
    const NAME: &'static str = "fromCodePoint";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringConstructor::from_code_point);
}
struct StringRaw;
impl Builtin for StringRaw {
    const NAME: &'static str = "raw";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringConstructor::raw);
}

impl StringConstructor {
    /// ### [22.1.1.1 String ( value )](https://tc39.es/ecma262/#sec-string-constructor-string-value)
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let s = if arguments.is_empty() {
            HeapString::empty(agent)
        } else {
            let value = arguments.get(0);
            // 2.a. String(symbol) is the symbol's descriptive string.
            if let (Value::Symbol(symbol), None) = (value, new_target) {
                return Ok(Value::String(symbol.descriptive_string(agent)));
            }
            to_string(agent, value)?
        };
        let Some(new_target) = new_target else {
            return Ok(Value::String(s));
        };
        let prototype =
            get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::String)?;
        Ok(Value::Object(string_create(agent, s, Some(prototype))))
    }

    fn from_char_code(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let mut units = Vec::with_capacity(arguments.len());
        for argument in arguments.0 {
            let n = to_number(agent, *argument)?;
            units.push(crate::ecmascript::abstract_operations::type_conversion::f64_to_uint32(n)
                as u16);
        }
        let text = std::string::String::from_utf16_lossy(&units);
        Ok(Value::from_string(agent, text))
    }

    fn from_code_point(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let mut text = std::string::String::new();
        for argument in arguments.0 {
            let n = to_number(agent, *argument)?;
            if n.fract() != 0.0 || !(0.0..=0x10FFFF as f64).contains(&n) {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    format!("Invalid code point {n}"),
                ));
            }
            let Some(c) = char::from_u32(n as u32) else {
                // Lone surrogates are replaced; UTF-8 storage cannot hold
                // them.
                text.push('\u{FFFD}');
                continue;
            };
            text.push(c);
        }
        Ok(Value::from_string(agent, text))
    }

    /// ### [22.1.2.4 String.raw ( template, ...substitutions )](https://tc39.es/ecma262/#sec-string.raw)
    fn raw(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(cooked) = arguments.get(0) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "String.raw requires a template object",
            ));
        };
        // 2./3. Let literals be ? ToObject(? Get(cooked, "raw")).
        let raw_key = PropertyKey::from_str(agent, "raw");
        let raw = get(agent, cooked, raw_key)?;
        let raw = crate::ecmascript::abstract_operations::type_conversion::to_object(agent, raw)?;
        let length = crate::ecmascript::abstract_operations::operations_on_objects::length_of_array_like(
            agent, raw,
        )?;
        let mut out = std::string::String::new();
        for index in 0..length {
            let segment = get(agent, raw, PropertyKey::Index(index as u32))?;
            let segment = to_string(agent, segment)?;
            out.push_str(segment.as_str(agent));
            if index + 1 < length {
                if let Some(substitution) = arguments.0.get(index as usize + 1) {
                    let substitution = to_string(agent, *substitution)?;
                    out.push_str(substitution.as_str(agent));
                }
            }
        }
        Ok(Value::from_string(agent, out))
    }
}

/// ### [22.1.3 String.prototype: thisStringValue](https://tc39.es/ecma262/#sec-properties-of-the-string-prototype-object)
fn this_string_value(agent: &mut Agent, value: Value) -> JsResult<HeapString> {
    match value {
        Value::String(s) => Ok(s),
        Value::Object(object) => string_object_value(agent, object).ok_or_else(|| {
            agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Method called on incompatible receiver, expected a String",
            )
        }),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Method called on incompatible receiver, expected a String",
        )),
    }
}

/// The `RequireObjectCoercible` + `ToString` prologue shared by most
/// prototype methods.
fn this_to_string(agent: &mut Agent, this_value: Value) -> JsResult<HeapString> {
    let value = require_object_coercible(agent, this_value)?;
    to_string(agent, value)
}

macro_rules! string_builtin {
    ($struct_name: ident, $name: literal, $length: literal, $behaviour: path) => {
        struct $struct_name;
        impl Builtin for $struct_name {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular($behaviour);
        }
    };
}

string_builtin!(StringPrototypeAt, "at", 1, string_prototype_at);
string_builtin!(StringPrototypeCharAt, "charAt", 1, string_prototype_char_at);
string_builtin!(StringPrototypeCharCodeAt, "charCodeAt", 1, string_prototype_char_code_at);
string_builtin!(StringPrototypeCodePointAt, "codePointAt", 1, string_prototype_code_point_at);
string_builtin!(StringPrototypeConcat, "concat", 1, string_prototype_concat);
string_builtin!(StringPrototypeEndsWith, "endsWith", 1, string_prototype_ends_with);
string_builtin!(StringPrototypeIncludes, "includes", 1, string_prototype_includes);
string_builtin!(StringPrototypeIndexOf, "indexOf", 1, string_prototype_index_of);
string_builtin!(StringPrototypeLastIndexOf, "lastIndexOf", 1, string_prototype_last_index_of);
string_builtin!(StringPrototypeMatch, "match", 1, string_prototype_match);
string_builtin!(StringPrototypeNormalize, "normalize", 0, string_prototype_normalize);
string_builtin!(StringPrototypePadEnd, "padEnd", 1, string_prototype_pad_end);
string_builtin!(StringPrototypePadStart, "padStart", 1, string_prototype_pad_start);
string_builtin!(StringPrototypeRepeat, "repeat", 1, string_prototype_repeat);
string_builtin!(StringPrototypeReplace, "replace", 2, string_prototype_replace);
string_builtin!(StringPrototypeReplaceAll, "replaceAll", 2, string_prototype_replace_all);
string_builtin!(StringPrototypeSlice, "slice", 2, string_prototype_slice);
string_builtin!(StringPrototypeSplit, "split", 2, string_prototype_split);
string_builtin!(StringPrototypeStartsWith, "startsWith", 1, string_prototype_starts_with);
string_builtin!(StringPrototypeSubstring, "substring", 2, string_prototype_substring);
string_builtin!(StringPrototypeToLowerCase, "toLowerCase", 0, string_prototype_to_lower_case);
string_builtin!(StringPrototypeToString, "toString", 0, string_prototype_to_string);
string_builtin!(StringPrototypeToUpperCase, "toUpperCase", 0, string_prototype_to_upper_case);
string_builtin!(StringPrototypeTrim, "trim", 0, string_prototype_trim);
string_builtin!(StringPrototypeTrimEnd, "trimEnd", 0, string_prototype_trim_end);
string_builtin!(StringPrototypeTrimStart, "trimStart", 0, string_prototype_trim_start);
string_builtin!(StringPrototypeValueOf, "valueOf", 0, string_prototype_value_of);
string_builtin!(StringPrototypeIterator, "[Symbol.iterator]", 0, string_prototype_iterator);

fn string_prototype_at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let length = s.utf16_len(agent);
    let relative = to_integer_or_infinity(agent, arguments.get(0))?;
    let index = if relative < 0.0 {
        length as f64 + relative
    } else {
        relative
    };
    if index < 0.0 || index >= length as f64 {
        return Ok(Value::Undefined);
    }
    let text = s.utf16_substring(agent, index as usize, index as usize + 1);
    Ok(Value::from_string(agent, text))
}

/// ### [22.1.3.2 String.prototype.charAt ( pos )](https://tc39.es/ecma262/#sec-string.prototype.charat)
fn string_prototype_char_at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let position = to_integer_or_infinity(agent, arguments.get(0))?;
    if position < 0.0 || position >= s.utf16_len(agent) as f64 {
        return Ok(Value::from_str(agent, ""));
    }
    let text = s.utf16_substring(agent, position as usize, position as usize + 1);
    Ok(Value::from_string(agent, text))
}

fn string_prototype_char_code_at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let position = to_integer_or_infinity(agent, arguments.get(0))?;
    if position < 0.0 {
        return Ok(Value::Number(f64::NAN));
    }
    match s.utf16_char_at(agent, position as usize) {
        Some(unit) => Ok(Value::Number(unit as f64)),
        None => Ok(Value::Number(f64::NAN)),
    }
}

fn string_prototype_code_point_at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let position = to_integer_or_infinity(agent, arguments.get(0))?;
    if position < 0.0 || position >= s.utf16_len(agent) as f64 {
        return Ok(Value::Undefined);
    }
    let text = s.utf16_substring(agent, position as usize, position as usize + 2);
    match text.chars().next() {
        Some(c) => Ok(Value::Number(c as u32 as f64)),
        None => Ok(Value::Undefined),
    }
}

fn string_prototype_concat(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let mut out = s.as_str(agent).to_owned();
    for argument in arguments.0 {
        let part = to_string(agent, *argument)?;
        out.push_str(part.as_str(agent));
    }
    Ok(Value::from_string(agent, out))
}

fn search_string_argument(
    agent: &mut Agent,
    argument: Value,
    method: &'static str,
) -> JsResult<HeapString> {
    // RegExp search arguments are rejected by these methods.
    if let Value::Object(object) = argument {
        if matches!(
            agent[object].kind,
            crate::ecmascript::types::ObjectKind::RegExp(_)
        ) {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("First argument to String.prototype.{method} must not be a regular expression"),
            ));
        }
    }
    to_string(agent, argument)
}

fn string_prototype_ends_with(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let search = search_string_argument(agent, arguments.get(0), "endsWith")?;
    let text = s.as_str(agent).to_owned();
    let search = search.as_str(agent).to_owned();
    let end_position = arguments.get(1);
    let haystack = if end_position.is_undefined() {
        text
    } else {
        let end = to_integer_or_infinity(agent, end_position)?;
        let end = end.clamp(0.0, s.utf16_len(agent) as f64) as usize;
        s.utf16_substring(agent, 0, end)
    };
    Ok(Value::Boolean(haystack.ends_with(&search)))
}

fn string_prototype_includes(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let search = search_string_argument(agent, arguments.get(0), "includes")?;
    let text = s.as_str(agent).to_owned();
    let search = search.as_str(agent);
    Ok(Value::Boolean(text.contains(search)))
}

/// ### [22.1.3.9 String.prototype.indexOf ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.indexof)
fn string_prototype_index_of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let search = to_string(agent, arguments.get(0))?;
    let position = to_integer_or_infinity(agent, arguments.get(1))?;
    let units: Vec<u16> = s.as_str(agent).encode_utf16().collect();
    let needle: Vec<u16> = search.as_str(agent).encode_utf16().collect();
    let start = position.clamp(0.0, units.len() as f64) as usize;
    Ok(Value::Number(utf16_find(&units, &needle, start)))
}

fn utf16_find(haystack: &[u16], needle: &[u16], from: usize) -> f64 {
    if needle.is_empty() {
        return from.min(haystack.len()) as f64;
    }
    if needle.len() > haystack.len() {
        return -1.0;
    }
    for start in from..=haystack.len().saturating_sub(needle.len()) {
        if &haystack[start..start + needle.len()] == needle {
            return start as f64;
        }
    }
    -1.0
}

fn string_prototype_last_index_of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let search = to_string(agent, arguments.get(0))?;
    let units: Vec<u16> = s.as_str(agent).encode_utf16().collect();
    let needle: Vec<u16> = search.as_str(agent).encode_utf16().collect();
    if needle.is_empty() {
        return Ok(Value::Number(units.len() as f64));
    }
    if needle.len() > units.len() {
        return Ok(Value::Number(-1.0));
    }
    for start in (0..=units.len() - needle.len()).rev() {
        if &units[start..start + needle.len()] == &needle[..] {
            return Ok(Value::Number(start as f64));
        }
    }
    Ok(Value::Number(-1.0))
}

/// ### [22.1.3.12 String.prototype.match ( regexp )](https://tc39.es/ecma262/#sec-string.prototype.match)
fn string_prototype_match(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    // 1. Let O be ? RequireObjectCoercible(this value).
    let o = require_object_coercible(agent, this_value)?;
    let regexp = arguments.get(0);
    // 2. If regexp is neither undefined nor null, then
    if !regexp.is_nullish() {
        // a. Let matcher be ? GetMethod(regexp, @@match).
        let matcher = get_method_on_value(
            agent,
            regexp,
            PropertyKey::Symbol(WellKnownSymbolIndexes::Match.into()),
        )?;
        // b. If matcher is not undefined, return ? Call(matcher, regexp,
        //    « O »).
        if let Some(matcher) = matcher {
            return call_function(agent, matcher, regexp, &[o]);
        }
    }
    // 3. Let S be ? ToString(O).
    let subject = to_string(agent, o)?;
    // 4. Let rx be ? RegExpCreate(regexp, undefined).
    let pattern = if regexp.is_undefined() {
        std::string::String::new()
    } else {
        to_string(agent, regexp)?.as_str(agent).to_owned()
    };
    let rx = crate::ecmascript::builtins::regexp::reg_exp_create(agent, &pattern, "")?;
    // 5. Return ? Invoke(rx, @@match, « S »).
    invoke(
        agent,
        Value::Object(rx),
        PropertyKey::Symbol(WellKnownSymbolIndexes::Match.into()),
        &[Value::String(subject)],
    )
}

/// ### [22.1.3.14 String.prototype.normalize ( \[ form \] )](https://tc39.es/ecma262/#sec-string.prototype.normalize)
fn string_prototype_normalize(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let form = arguments.get(0);
    let form = if form.is_undefined() {
        "NFC".to_owned()
    } else {
        to_string(agent, form)?.as_str(agent).to_owned()
    };
    let text = s.as_str(agent).to_owned();
    let normalized: std::string::String = match form.as_str() {
        "NFC" => text.nfc().collect(),
        "NFD" => text.nfd().collect(),
        "NFKC" => text.nfkc().collect(),
        "NFKD" => text.nfkd().collect(),
        _ => {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "The normalization form should be one of NFC, NFD, NFKC, NFKD",
            ));
        }
    };
    Ok(Value::from_string(agent, normalized))
}

fn string_pad_impl(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
    at_start: bool,
) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let max_length = to_integer_or_infinity(agent, arguments.get(0))?;
    let fill = arguments.get(1);
    let fill = if fill.is_undefined() {
        " ".to_owned()
    } else {
        to_string(agent, fill)?.as_str(agent).to_owned()
    };
    let text = s.as_str(agent).to_owned();
    let current = s.utf16_len(agent);
    if max_length <= current as f64 || fill.is_empty() {
        return Ok(Value::String(s));
    }
    let missing = max_length as usize - current;
    let mut pad = std::string::String::new();
    let fill_units: Vec<u16> = fill.encode_utf16().collect();
    while pad.encode_utf16().count() < missing {
        pad.push_str(&fill);
    }
    // Trim the filler to the exact code unit count.
    let pad_units: Vec<u16> = pad.encode_utf16().take(missing).collect();
    let pad = std::string::String::from_utf16_lossy(&pad_units);
    let _ = fill_units;
    let out = if at_start {
        format!("{pad}{text}")
    } else {
        format!("{text}{pad}")
    };
    Ok(Value::from_string(agent, out))
}

fn string_prototype_pad_end(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    string_pad_impl(agent, this_value, arguments, false)
}

fn string_prototype_pad_start(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    string_pad_impl(agent, this_value, arguments, true)
}

fn string_prototype_repeat(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let count = to_integer_or_infinity(agent, arguments.get(0))?;
    if count < 0.0 || count == f64::INFINITY {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid count value",
        ));
    }
    let text = s.as_str(agent).repeat(count as usize);
    Ok(Value::from_string(agent, text))
}

/// ### [22.1.3.19 String.prototype.replace ( searchValue, replaceValue )](https://tc39.es/ecma262/#sec-string.prototype.replace)
fn string_prototype_replace(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    string_replace_impl(agent, this_value, arguments, false)
}

/// ### [22.1.3.20 String.prototype.replaceAll ( searchValue, replaceValue )](https://tc39.es/ecma262/#sec-string.prototype.replaceall)
fn string_prototype_replace_all(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    string_replace_impl(agent, this_value, arguments, true)
}

fn string_replace_impl(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
    replace_all: bool,
) -> JsResult<Value> {
    // 1. Let O be ? RequireObjectCoercible(this value).
    let o = require_object_coercible(agent, this_value)?;
    let search_value = arguments.get(0);
    let replace_value = arguments.get(1);

    // 2. If searchValue is neither undefined nor null, then
    if !search_value.is_nullish() {
        // 2.a (replaceAll). A regexp search value must carry the g flag.
        if replace_all {
            if let Some((_, data)) =
                crate::ecmascript::builtins::regexp::require_regexp(agent, search_value)
            {
                if !data.global {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::TypeError,
                        "replaceAll must be called with a global RegExp",
                    ));
                }
            }
        }
        // b. Let replacer be ? GetMethod(searchValue, @@replace).
        let replacer = get_method_on_value(
            agent,
            search_value,
            PropertyKey::Symbol(WellKnownSymbolIndexes::Replace.into()),
        )?;
        // c. If replacer is not undefined, return ? Call(replacer,
        //    searchValue, « O, replaceValue »).
        if let Some(replacer) = replacer {
            return call_function(agent, replacer, search_value, &[o, replace_value]);
        }
    }

    // 3.-5. The string-search path.
    let s = to_string(agent, o)?;
    let search = to_string(agent, search_value)?;
    let text = s.as_str(agent).to_owned();
    let search_text = search.as_str(agent).to_owned();
    let replacement = replacement_text(agent, replace_value)?;
    let out = match replacement {
        Replacement::Text(replacement) => {
            let replacement = expand_dollar_patterns(&replacement, &search_text);
            if replace_all {
                text.replace(&search_text, &replacement)
            } else {
                text.replacen(&search_text, &replacement, 1)
            }
        }
        Replacement::Function(function) => {
            let mut out = std::string::String::new();
            let mut rest = text.as_str();
            let mut offset = 0usize;
            loop {
                let Some(position) = rest.find(&search_text) else {
                    out.push_str(rest);
                    break;
                };
                out.push_str(&rest[..position]);
                let matched = Value::from_str(agent, &search_text);
                let position_value = Value::Number((offset + position) as f64);
                let whole = Value::from_str(agent, &text);
                let replaced = crate::ecmascript::abstract_operations::operations_on_objects::call(
                    agent,
                    Value::Object(function),
                    Value::Undefined,
                    &[matched, position_value, whole],
                )?;
                let replaced = to_string(agent, replaced)?;
                out.push_str(replaced.as_str(agent));
                rest = &rest[position + search_text.len()..];
                offset += position + search_text.len();
                if !replace_all {
                    out.push_str(rest);
                    break;
                }
                if search_text.is_empty() {
                    out.push_str(rest);
                    break;
                }
            }
            out
        }
    };
    Ok(Value::from_string(agent, out))
}

enum Replacement {
    Text(std::string::String),
    Function(Object),
}

fn replacement_text(agent: &mut Agent, value: Value) -> JsResult<Replacement> {
    if let Value::Object(object) = value {
        if object.is_callable(agent) {
            return Ok(Replacement::Function(object));
        }
    }
    let text = to_string(agent, value)?;
    Ok(Replacement::Text(text.as_str(agent).to_owned()))
}

fn expand_dollar_patterns(replacement: &str, matched: &str) -> std::string::String {
    replacement.replace("$&", matched).replace("$$", "$")
}

/// ### [22.1.3.21 String.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-string.prototype.slice)
fn string_prototype_slice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let length = s.utf16_len(agent) as f64;
    let start = to_integer_or_infinity(agent, arguments.get(0))?;
    let end = arguments.get(1);
    let end = if end.is_undefined() {
        length
    } else {
        to_integer_or_infinity(agent, end)?
    };
    let from = if start < 0.0 {
        (length + start).max(0.0)
    } else {
        start.min(length)
    };
    let to = if end < 0.0 {
        (length + end).max(0.0)
    } else {
        end.min(length)
    };
    let text = if from < to {
        s.utf16_substring(agent, from as usize, to as usize)
    } else {
        std::string::String::new()
    };
    Ok(Value::from_string(agent, text))
}

/// ### [22.1.3.23 String.prototype.split ( separator, limit )](https://tc39.es/ecma262/#sec-string.prototype.split)
fn string_prototype_split(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    // 1. Let O be ? RequireObjectCoercible(this value).
    let o = require_object_coercible(agent, this_value)?;
    let separator = arguments.get(0);
    let limit = arguments.get(1);
    // 2. If separator is neither undefined nor null, then
    if !separator.is_nullish() {
        // a. Let splitter be ? GetMethod(separator, @@split).
        let splitter = get_method_on_value(
            agent,
            separator,
            PropertyKey::Symbol(WellKnownSymbolIndexes::Split.into()),
        )?;
        // b. If splitter is not undefined, return ? Call(splitter,
        //    separator, « O, limit »).
        if let Some(splitter) = splitter {
            return call_function(agent, splitter, separator, &[o, limit]);
        }
    }
    // 3.-5. The string-separator path.
    let s = to_string(agent, o)?;
    let limit = if limit.is_undefined() {
        u32::MAX
    } else {
        crate::ecmascript::abstract_operations::type_conversion::to_uint32(agent, limit)?
    };
    let text = s.as_str(agent).to_owned();
    let mut parts: Vec<Value> = Vec::new();
    if limit == 0 {
        // An explicit zero limit yields an empty array.
    } else if separator.is_undefined() {
        parts.push(Value::String(s));
    } else {
        let separator = to_string(agent, separator)?.as_str(agent).to_owned();
        split_by_string(agent, &text, &separator, limit, &mut parts);
    }
    Ok(Value::Object(
        crate::ecmascript::abstract_operations::operations_on_objects::create_array_from_list(
            agent, &parts,
        ),
    ))
}

fn split_by_string(
    agent: &mut Agent,
    text: &str,
    separator: &str,
    limit: u32,
    parts: &mut Vec<Value>,
) {
    if separator.is_empty() {
        for c in text.chars() {
            if parts.len() as u32 >= limit {
                return;
            }
            parts.push(Value::from_string(agent, c.to_string()));
        }
        return;
    }
    for piece in text.split(separator) {
        if parts.len() as u32 >= limit {
            return;
        }
        parts.push(Value::from_str(agent, piece));
    }
}

fn string_prototype_starts_with(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let search = search_string_argument(agent, arguments.get(0), "startsWith")?;
    let position = relative_clamp(agent, arguments.get(1), s.utf16_len(agent))?;
    let haystack = s.utf16_substring(agent, position, s.utf16_len(agent));
    let search = search.as_str(agent);
    Ok(Value::Boolean(haystack.starts_with(search)))
}

fn relative_clamp(agent: &mut Agent, value: Value, length: usize) -> JsResult<usize> {
    if value.is_undefined() {
        return Ok(0);
    }
    let n = to_integer_or_infinity(agent, value)?;
    Ok(n.clamp(0.0, length as f64) as usize)
}

/// ### [22.1.3.24 String.prototype.substring ( start, end )](https://tc39.es/ecma262/#sec-string.prototype.substring)
fn string_prototype_substring(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let length = s.utf16_len(agent);
    let start = relative_clamp(agent, arguments.get(0), length)?;
    let end = arguments.get(1);
    let end = if end.is_undefined() {
        length
    } else {
        relative_clamp(agent, end, length)?
    };
    // 7./8. The smaller of the two is the start.
    let (from, to) = if start <= end { (start, end) } else { (end, start) };
    let text = s.utf16_substring(agent, from, to);
    Ok(Value::from_string(agent, text))
}

fn string_prototype_to_lower_case(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let text = s.as_str(agent).to_lowercase();
    Ok(Value::from_string(agent, text))
}

fn string_prototype_to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    Ok(Value::String(this_string_value(agent, this_value)?))
}

fn string_prototype_to_upper_case(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let text = s.as_str(agent).to_uppercase();
    Ok(Value::from_string(agent, text))
}

fn string_prototype_trim(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let text = s.as_str(agent).trim().to_owned();
    Ok(Value::from_string(agent, text))
}

fn string_prototype_trim_end(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let text = s.as_str(agent).trim_end().to_owned();
    Ok(Value::from_string(agent, text))
}

fn string_prototype_trim_start(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    let text = s.as_str(agent).trim_start().to_owned();
    Ok(Value::from_string(agent, text))
}

fn string_prototype_value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    Ok(Value::String(this_string_value(agent, this_value)?))
}

fn string_prototype_iterator(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let s = this_to_string(agent, this_value)?;
    Ok(Value::Object(create_string_iterator(agent, s)))
}

struct StringIteratorPrototypeNext;
impl Builtin for StringIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, _arguments| {
        string_iterator_next(agent, this_value)
    });
}

pub(crate) fn create_string_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    // %String.prototype% is itself a string exotic wrapping "".
    let empty = HeapString::empty(agent);
    let prototype = string_create(agent, empty, Some(object_prototype));
    agent
        .get_realm_mut(realm)
        .intrinsics
        .set("%String.prototype%", prototype);
    let prototype_builder = OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
        .with_builtin_function_property::<StringPrototypeAt>()
        .with_builtin_function_property::<StringPrototypeCharAt>()
        .with_builtin_function_property::<StringPrototypeCharCodeAt>()
        .with_builtin_function_property::<StringPrototypeCodePointAt>()
        .with_builtin_function_property::<StringPrototypeConcat>()
        .with_builtin_function_property::<StringPrototypeEndsWith>()
        .with_builtin_function_property::<StringPrototypeIncludes>()
        .with_builtin_function_property::<StringPrototypeIndexOf>()
        .with_builtin_function_property::<StringPrototypeLastIndexOf>()
        .with_builtin_function_property::<StringPrototypeMatch>()
        .with_builtin_function_property::<StringPrototypeNormalize>()
        .with_builtin_function_property::<StringPrototypePadEnd>()
        .with_builtin_function_property::<StringPrototypePadStart>()
        .with_builtin_function_property::<StringPrototypeRepeat>()
        .with_builtin_function_property::<StringPrototypeReplace>()
        .with_builtin_function_property::<StringPrototypeReplaceAll>()
        .with_builtin_function_property::<StringPrototypeSlice>()
        .with_builtin_function_property::<StringPrototypeSplit>()
        .with_builtin_function_property::<StringPrototypeStartsWith>()
        .with_builtin_function_property::<StringPrototypeSubstring>()
        .with_builtin_function_property::<StringPrototypeToLowerCase>()
        .with_builtin_function_property::<StringPrototypeToString>()
        .with_builtin_function_property::<StringPrototypeToUpperCase>()
        .with_builtin_function_property::<StringPrototypeTrim>()
        .with_builtin_function_property::<StringPrototypeTrimEnd>()
        .with_builtin_function_property::<StringPrototypeTrimStart>()
        .with_builtin_function_property::<StringPrototypeValueOf>();
    prototype_builder.build();
    // @@iterator
    let iterator_function = crate::ecmascript::builtins::builtin_function::create_builtin_function(
        agent,
        StringPrototypeIterator::BEHAVIOUR,
        StringPrototypeIterator::NAME,
        StringPrototypeIterator::LENGTH,
        "",
    );
    agent[prototype].properties.set(
        PropertyKey::Symbol(WellKnownSymbolIndexes::Iterator.into()),
        crate::ecmascript::types::Property::data(
            Value::Object(iterator_function),
            true,
            false,
            true,
        ),
    );

    let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<StringConstructor>(
        agent, realm, "%String%",
    )
    .with_prototype_property(prototype)
    .with_builtin_function_property::<StringFromCharCode>()
    .with_builtin_function_property::<StringFromCodePoint>()
    .with_builtin_function_property::<StringRaw>()
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
        .with_constructor_property(constructor)
        .build();

    let iterator_prototype = agent.get_realm(realm).intrinsics.iterator_prototype();
    OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%StringIteratorPrototype%",
        Some(iterator_prototype),
    )
    .with_builtin_function_property::<StringIteratorPrototypeNext>()
    .with_to_string_tag("String Iterator")
    .build();
}
