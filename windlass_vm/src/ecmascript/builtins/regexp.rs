// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.2 RegExp (Regular Expression) Objects](https://tc39.es/ecma262/#sec-regexp-regular-expression-objects)
//!
//! The core only invokes the external engine's compile/exec contract; the
//! `regex` crate is that engine. Pattern features the engine cannot
//! express (backreferences, lookbehind on some configurations) surface as
//! SyntaxError at construction.

use regex::Regex;

use crate::ecmascript::abstract_operations::operations_on_objects::{
    create_data_property_or_throw, set,
};
use crate::ecmascript::abstract_operations::type_conversion::{to_length, to_string};
use crate::ecmascript::builtins::array::array_create;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, ProtoIntrinsics};
use crate::ecmascript::types::{
    HeapString, Object, ObjectHeapData, ObjectKind, Property, PropertyKey, Value,
};

#[derive(Debug)]
pub struct RegExpData {
    /// \[\[OriginalSource]]
    pub(crate) original_source: HeapString,
    /// \[\[OriginalFlags]]
    pub(crate) original_flags: HeapString,
    /// \[\[RegExpMatcher]]: the compiled external-engine matcher.
    pub(crate) matcher: Regex,
    pub(crate) global: bool,
    pub(crate) sticky: bool,
}

/// Translates a JavaScript pattern into the external engine's syntax.
/// The common constructs map one-to-one; the `/` escape is unnecessary
/// outside the literal form.
fn translate_pattern(pattern: &str) -> String {
    pattern.replace("\\/", "/")
}

/// ### [22.2.3.1 RegExpCreate ( P, F )](https://tc39.es/ecma262/#sec-regexpcreate)
pub fn reg_exp_create(agent: &mut Agent, pattern: &str, flags: &str) -> JsResult<Object> {
    // 22.2.3.3 RegExpInitialize: validate flags.
    let mut seen = [false; 8];
    for flag in flags.chars() {
        let index = match flag {
            'd' => 0,
            'g' => 1,
            'i' => 2,
            'm' => 3,
            's' => 4,
            'u' => 5,
            'v' => 6,
            'y' => 7,
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::SyntaxError,
                    format!("Invalid regular expression flag '{flag}'"),
                ));
            }
        };
        if seen[index] {
            return Err(agent.throw_exception(
                ExceptionType::SyntaxError,
                format!("Duplicate regular expression flag '{flag}'"),
            ));
        }
        seen[index] = true;
    }
    // Compile through the external engine.
    let translated = translate_pattern(pattern);
    let matcher = regex::RegexBuilder::new(&translated)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map_err(|error| {
            agent.throw_exception(
                ExceptionType::SyntaxError,
                format!("Invalid regular expression: {error}"),
            )
        })?;

    let prototype = agent.intrinsic(ProtoIntrinsics::RegExp.intrinsic_name());
    let source = HeapString::from_str(agent, if pattern.is_empty() { "(?:)" } else { pattern });
    let flags_string = HeapString::from_str(agent, flags);
    let regexp = agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::RegExp(Box::new(RegExpData {
            original_source: source,
            original_flags: flags_string,
            matcher,
            global: flags.contains('g'),
            sticky: flags.contains('y'),
        })),
    ));
    // 22.2.3.3 step 8: lastIndex is a writable, non-configurable own
    // property.
    let last_index_key = PropertyKey::from_str(agent, "lastIndex");
    agent[regexp].properties.set(
        last_index_key,
        Property::data(Value::Number(0.0), true, false, false),
    );
    Ok(regexp)
}

pub(crate) fn require_regexp<'a>(agent: &'a Agent, value: Value) -> Option<(Object, &'a RegExpData)> {
    if let Value::Object(object) = value {
        if let ObjectKind::RegExp(data) = &agent[object].kind {
            return Some((object, data));
        }
    }
    None
}

/// `lastIndex` and `index` address UTF-16 code units, while the external
/// engine works in UTF-8 byte offsets; these two convert between the
/// addressings. A UTF-16 index inside a code point rounds to the code
/// point's start, matching how a mid-surrogate `lastIndex` cannot start a
/// match anyway.
pub(crate) fn utf16_index_to_byte(text: &str, utf16_index: usize) -> usize {
    if text.is_ascii() || utf16_index == 0 {
        return utf16_index.min(text.len());
    }
    let mut units = 0;
    for (byte_index, c) in text.char_indices() {
        if units >= utf16_index {
            return byte_index;
        }
        units += c.len_utf16();
    }
    text.len()
}

pub(crate) fn byte_index_to_utf16(text: &str, byte_index: usize) -> usize {
    if text.is_ascii() {
        return byte_index.min(text.len());
    }
    text[..byte_index.min(text.len())].encode_utf16().count()
}

/// ### [22.2.7.2 RegExpBuiltinExec ( R, S )](https://tc39.es/ecma262/#sec-regexpbuiltinexec)
///
/// Returns the match result array or null, honouring `lastIndex` for
/// global and sticky matchers.
pub(crate) fn reg_exp_builtin_exec(
    agent: &mut Agent,
    regexp: Object,
    subject: HeapString,
) -> JsResult<Value> {
    let ObjectKind::RegExp(data) = &agent[regexp].kind else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Method called on incompatible receiver, expected a RegExp",
        ));
    };
    let global = data.global;
    let sticky = data.sticky;
    let matcher = data.matcher.clone();
    let text = subject.as_str(agent).to_owned();

    // 3. Let lastIndex be ℝ(? ToLength(? Get(R, "lastIndex"))).
    let last_index_key = PropertyKey::from_str(agent, "lastIndex");
    let last_index = crate::ecmascript::abstract_operations::operations_on_objects::get(
        agent,
        regexp,
        last_index_key,
    )?;
    // lastIndex counts UTF-16 code units, like the `index` result
    // property; the external engine addresses UTF-8 bytes.
    let mut last_index = to_length(agent, last_index)? as usize;
    // 4.-6. A non-global, non-sticky matcher always starts at 0.
    if !global && !sticky {
        last_index = 0;
    }
    if last_index > byte_index_to_utf16(&text, text.len()) {
        if global || sticky {
            set(agent, regexp, last_index_key, Value::Number(0.0), true)?;
        }
        return Ok(Value::Null);
    }
    let byte_start = utf16_index_to_byte(&text, last_index);

    let captures = matcher.captures_at(&text, byte_start);
    let captures = match captures {
        Some(captures)
            if !sticky || captures.get(0).unwrap().start() == byte_start =>
        {
            captures
        }
        _ => {
            // 10.a. Failure resets lastIndex for global/sticky matchers.
            if global || sticky {
                set(agent, regexp, last_index_key, Value::Number(0.0), true)?;
            }
            return Ok(Value::Null);
        }
    };

    let full_match = captures.get(0).unwrap();
    let match_start = full_match.start();
    let match_end = full_match.end();
    let mut groups: Vec<Option<String>> = Vec::with_capacity(captures.len());
    for index in 0..captures.len() {
        groups.push(captures.get(index).map(|m| m.as_str().to_owned()));
    }
    let named: Vec<(String, Option<String>)> = matcher
        .capture_names()
        .flatten()
        .map(|name| {
            (
                name.to_owned(),
                captures.name(name).map(|m| m.as_str().to_owned()),
            )
        })
        .collect();

    // 16. Update lastIndex past the match for global/sticky matchers,
    //     converted back to UTF-16 code units.
    if global || sticky {
        let utf16_end = byte_index_to_utf16(&text, match_end);
        set(
            agent,
            regexp,
            last_index_key,
            Value::Number(utf16_end as f64),
            true,
        )?;
    }

    // 17.-26. Assemble the result array: index, input, the captures, and
    // named groups.
    let result = array_create(agent, groups.len() as u64, None)?;
    let index_key = PropertyKey::from_str(agent, "index");
    // `index` counts UTF-16 code units.
    let utf16_index = byte_index_to_utf16(&text, match_start);
    create_data_property_or_throw(
        agent,
        result,
        index_key,
        Value::Number(utf16_index as f64),
    )?;
    let input_key = PropertyKey::from_str(agent, "input");
    create_data_property_or_throw(agent, result, input_key, Value::String(subject))?;
    for (position, group) in groups.into_iter().enumerate() {
        let value = match group {
            Some(text) => Value::from_string(agent, text),
            None => Value::Undefined,
        };
        create_data_property_or_throw(agent, result, PropertyKey::Index(position as u32), value)?;
    }
    let groups_key = PropertyKey::from_str(agent, "groups");
    let groups_value = if named.is_empty() {
        Value::Undefined
    } else {
        let groups_object =
            crate::ecmascript::builtins::ordinary::ordinary_object_create(agent, None);
        for (name, group) in named {
            let key = PropertyKey::from_str(agent, &name);
            let value = match group {
                Some(text) => Value::from_string(agent, text),
                None => Value::Undefined,
            };
            create_data_property_or_throw(agent, groups_object, key, value)?;
        }
        Value::Object(groups_object)
    };
    create_data_property_or_throw(agent, result, groups_key, groups_value)?;
    Ok(Value::Object(result))
}

/// ### [22.2.7.1 RegExpExec ( R, S )](https://tc39.es/ecma262/#sec-regexpexec)
pub(crate) fn reg_exp_exec(agent: &mut Agent, regexp: Object, subject: Value) -> JsResult<Value> {
    let subject = to_string(agent, subject)?;
    // 1./2. A user-defined exec method takes precedence.
    let exec_key = PropertyKey::from_str(agent, "exec");
    let exec = crate::ecmascript::abstract_operations::operations_on_objects::get(
        agent, regexp, exec_key,
    )?;
    if let Value::Object(exec) = exec {
        if exec.is_callable(agent)
            && !matches!(agent[exec].kind, ObjectKind::BuiltinFunction(_))
        {
            let result = crate::ecmascript::abstract_operations::operations_on_objects::call_function(
                agent,
                exec,
                Value::Object(regexp),
                &[Value::String(subject)],
            )?;
            if !matches!(result, Value::Object(_) | Value::Null) {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "RegExp exec method returned something other than an object or null",
                ));
            }
            return Ok(result);
        }
    }
    // 3./4. Otherwise require the built-in matcher.
    reg_exp_builtin_exec(agent, regexp, subject)
}
