// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.2.4 The RegExp Constructor](https://tc39.es/ecma262/#sec-regexp-constructor)

use crate::ecmascript::abstract_operations::operations_on_objects::{
    call, create_array_from_list, get, set,
};
use crate::ecmascript::abstract_operations::type_conversion::{
    to_length, to_string, to_uint32,
};
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::regexp::{
    reg_exp_builtin_exec, reg_exp_create, reg_exp_exec, require_regexp,
};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{Object, ObjectKind, Property, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct RegExpConstructor;
impl Builtin for RegExpConstructor {
    const NAME: &'static str = "RegExp";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}

impl RegExpConstructor {
    /// ### [22.2.4.1 RegExp ( pattern, flags )](https://tc39.es/ecma262/#sec-regexp-pattern-flags)
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        _new_target: Option<Object>,
    ) -> JsResult<Value> {
        let pattern_argument = arguments.get(0);
        let flags_argument = arguments.get(1);
        // 2.-4. An existing RegExp contributes its source and flags.
        let (pattern, flags) = if let Some((_, data)) = require_regexp(agent, pattern_argument) {
            let source = data.original_source;
            let original_flags = data.original_flags;
            let pattern = source.as_str(agent).to_owned();
            let flags = if flags_argument.is_undefined() {
                original_flags.as_str(agent).to_owned()
            } else {
                to_string(agent, flags_argument)?.as_str(agent).to_owned()
            };
            (pattern, flags)
        } else {
            let pattern = if pattern_argument.is_undefined() {
                std::string::String::new()
            } else {
                to_string(agent, pattern_argument)?.as_str(agent).to_owned()
            };
            let flags = if flags_argument.is_undefined() {
                std::string::String::new()
            } else {
                to_string(agent, flags_argument)?.as_str(agent).to_owned()
            };
            (pattern, flags)
        };
        Ok(Value::Object(reg_exp_create(agent, &pattern, &flags)?))
    }
}

fn this_regexp(agent: &mut Agent, this_value: Value) -> JsResult<Object> {
    match this_value {
        Value::Object(object) if matches!(agent[object].kind, ObjectKind::RegExp(_)) => Ok(object),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Method called on incompatible receiver, expected a RegExp",
        )),
    }
}

struct RegExpPrototypeExec;
impl Builtin for RegExpPrototypeExec {
    const NAME: &'static str = "exec";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(regexp_prototype_exec);
}

/// ### [22.2.6.2 RegExp.prototype.exec ( string )](https://tc39.es/ecma262/#sec-regexp.prototype.exec)
fn regexp_prototype_exec(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let regexp = this_regexp(agent, this_value)?;
    let subject = to_string(agent, arguments.get(0))?;
    reg_exp_builtin_exec(agent, regexp, subject)
}

struct RegExpPrototypeTest;
impl Builtin for RegExpPrototypeTest {
    const NAME: &'static str = "test";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(regexp_prototype_test);
}

/// ### [22.2.6.16 RegExp.prototype.test ( S )](https://tc39.es/ecma262/#sec-regexp.prototype.test)
fn regexp_prototype_test(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let regexp = this_regexp(agent, this_value)?;
    let subject = to_string(agent, arguments.get(0))?;
    let result = reg_exp_builtin_exec(agent, regexp, subject)?;
    Ok(Value::Boolean(!result.is_null()))
}

struct RegExpPrototypeToString;
impl Builtin for RegExpPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(regexp_prototype_to_string);
}

fn regexp_prototype_to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let regexp = this_regexp(agent, this_value)?;
    let ObjectKind::RegExp(data) = &agent[regexp].kind else {
        unreachable!()
    };
    let source = data.original_source.as_str(agent).to_owned();
    let flags = data.original_flags.as_str(agent).to_owned();
    Ok(Value::from_string(agent, format!("/{source}/{flags}")))
}

struct RegExpPrototypeMatch;
impl Builtin for RegExpPrototypeMatch {
    const NAME: &'static str = "[Symbol.match]";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(regexp_prototype_match);
}

/// ### [22.2.6.8 RegExp.prototype \[ @@match \] ( string )](https://tc39.es/ecma262/#sec-regexp.prototype-@@match)
fn regexp_prototype_match(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    // 1./2. Let rx be the this value; it must be an Object.
    let Value::Object(rx) = this_value else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "RegExp.prototype[Symbol.match] called on a non-object",
        ));
    };
    // 3. Let S be ? ToString(string).
    let subject = to_string(agent, arguments.get(0))?;
    // 4. Let flags be ? ToString(? Get(rx, "flags")).
    let flags_key = PropertyKey::from_str(agent, "flags");
    let flags = get(agent, rx, flags_key)?;
    let flags = to_string(agent, flags)?;
    let global = flags.as_str(agent).contains('g');
    // 5. If flags does not contain "g", return ? RegExpExec(rx, S).
    if !global {
        return reg_exp_exec(agent, rx, Value::String(subject));
    }
    // 6. Else: reset lastIndex and collect every match string.
    let last_index_key = PropertyKey::from_str(agent, "lastIndex");
    // b. Perform ? Set(rx, "lastIndex", +0𝔽, true).
    set(agent, rx, last_index_key, Value::Number(0.0), true)?;
    let mut matches: Vec<Value> = Vec::new();
    // e. Repeat,
    loop {
        // i. Let result be ? RegExpExec(rx, S).
        let result = reg_exp_exec(agent, rx, Value::String(subject))?;
        let Value::Object(result) = result else {
            // ii. If result is null: return null for no matches, else A.
            if matches.is_empty() {
                return Ok(Value::Null);
            }
            return Ok(Value::Object(create_array_from_list(agent, &matches)));
        };
        // iii.1. Let matchStr be ? ToString(? Get(result, "0")).
        let first = get(agent, result, PropertyKey::Index(0))?;
        let match_str = to_string(agent, first)?;
        matches.push(Value::String(match_str));
        // iii.4. An empty match advances lastIndex past the position.
        if match_str.is_empty(agent) {
            let this_index = get(agent, rx, last_index_key)?;
            let this_index = to_length(agent, this_index)?;
            set(
                agent,
                rx,
                last_index_key,
                Value::Number((this_index + 1) as f64),
                true,
            )?;
        }
    }
}

struct RegExpPrototypeReplace;
impl Builtin for RegExpPrototypeReplace {
    const NAME: &'static str = "[Symbol.replace]";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(regexp_prototype_replace);
}

/// ### [22.2.6.11 RegExp.prototype \[ @@replace \] ( string, replaceValue )](https://tc39.es/ecma262/#sec-regexp.prototype-@@replace)
///
/// Replacement goes directly through the compiled matcher; functional
/// replace values are called per match with the captures, position, and
/// subject.
fn regexp_prototype_replace(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let regexp = this_regexp(agent, this_value)?;
    let subject = to_string(agent, arguments.get(0))?;
    let replace_value = arguments.get(1);
    let ObjectKind::RegExp(data) = &agent[regexp].kind else {
        unreachable!()
    };
    let matcher = data.matcher.clone();
    let global = data.global;
    let text = subject.as_str(agent).to_owned();
    let out = if let Value::Object(function) = replace_value {
        if function.is_callable(agent) {
            replace_with_function(agent, &matcher, &text, function, global)?
        } else {
            let replacement = to_string(agent, replace_value)?;
            let template = translate_js_replacement(replacement.as_str(agent));
            apply_template_replacement(&matcher, &text, &template, global)
        }
    } else {
        let replacement = to_string(agent, replace_value)?;
        let template = translate_js_replacement(replacement.as_str(agent));
        apply_template_replacement(&matcher, &text, &template, global)
    };
    // The exec loop of the spec leaves a global matcher's lastIndex at 0.
    if global {
        let last_index_key = PropertyKey::from_str(agent, "lastIndex");
        set(agent, regexp, last_index_key, Value::Number(0.0), true)?;
    }
    Ok(Value::from_string(agent, out))
}

fn apply_template_replacement(
    matcher: &regex::Regex,
    text: &str,
    template: &str,
    global: bool,
) -> std::string::String {
    if global {
        matcher.replace_all(text, template).into_owned()
    } else {
        matcher.replace(text, template).into_owned()
    }
}

/// ### [22.2.6.11.1 GetSubstitution](https://tc39.es/ecma262/#sec-getsubstitution)
///
/// Translates the language's `$`-patterns into the external engine's
/// expansion syntax: `$$` stays a literal dollar, `$&` is the whole match,
/// `$n` a numbered capture, and `$<name>` a named one.
fn translate_js_replacement(replacement: &str) -> std::string::String {
    let mut out = std::string::String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some('0'..='9') => {
                let mut digits = std::string::String::new();
                while let Some(digit @ '0'..='9') = chars.peek().copied() {
                    chars.next();
                    digits.push(digit);
                }
                out.push_str("${");
                out.push_str(&digits);
                out.push('}');
            }
            Some('<') => {
                chars.next();
                let mut name = std::string::String::new();
                for inner in chars.by_ref() {
                    if inner == '>' {
                        break;
                    }
                    name.push(inner);
                }
                out.push_str("${");
                out.push_str(&name);
                out.push('}');
            }
            _ => {
                // A lone dollar is literal.
                out.push_str("$$");
            }
        }
    }
    out
}

/// Runs a functional replace value over each match, passing the captures,
/// the match position in UTF-16 units, and the whole subject.
fn replace_with_function(
    agent: &mut Agent,
    matcher: &regex::Regex,
    text: &str,
    function: Object,
    global: bool,
) -> JsResult<std::string::String> {
    let mut out = std::string::String::new();
    let mut last_end = 0usize;
    for captures in matcher.captures_iter(text) {
        let full = captures.get(0).unwrap();
        out.push_str(&text[last_end..full.start()]);
        let mut call_arguments: Vec<Value> = Vec::with_capacity(captures.len() + 2);
        for index in 0..captures.len() {
            call_arguments.push(match captures.get(index) {
                Some(m) => Value::from_str(agent, m.as_str()),
                None => Value::Undefined,
            });
        }
        let position = crate::ecmascript::builtins::regexp::byte_index_to_utf16(text, full.start());
        call_arguments.push(Value::Number(position as f64));
        call_arguments.push(Value::from_str(agent, text));
        let replaced = call(
            agent,
            Value::Object(function),
            Value::Undefined,
            &call_arguments,
        )?;
        let replaced = to_string(agent, replaced)?;
        out.push_str(replaced.as_str(agent));
        last_end = full.end();
        if !global {
            break;
        }
    }
    out.push_str(&text[last_end..]);
    Ok(out)
}

struct RegExpPrototypeSplit;
impl Builtin for RegExpPrototypeSplit {
    const NAME: &'static str = "[Symbol.split]";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(regexp_prototype_split);
}

/// ### [22.2.6.14 RegExp.prototype \[ @@split \] ( string, limit )](https://tc39.es/ecma262/#sec-regexp.prototype-@@split)
///
/// Splitting never touches the receiver's lastIndex; capture groups are
/// spliced into the output between the pieces.
fn regexp_prototype_split(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let regexp = this_regexp(agent, this_value)?;
    let subject = to_string(agent, arguments.get(0))?;
    let limit = arguments.get(1);
    // 11. If limit is undefined, let lim be 2^32 - 1.
    let limit = if limit.is_undefined() {
        u32::MAX
    } else {
        to_uint32(agent, limit)?
    };
    let ObjectKind::RegExp(data) = &agent[regexp].kind else {
        unreachable!()
    };
    let matcher = data.matcher.clone();
    let text = subject.as_str(agent).to_owned();
    let mut parts: Vec<Value> = Vec::new();
    // 14. If lim is 0, return an empty array.
    if limit == 0 {
        return Ok(Value::Object(create_array_from_list(agent, &parts)));
    }
    // 15. An empty subject splits on whether the matcher matches it.
    if text.is_empty() {
        if !matcher.is_match("") {
            parts.push(Value::String(subject));
        }
        return Ok(Value::Object(create_array_from_list(agent, &parts)));
    }
    let mut last = 0usize;
    for captures in matcher.captures_iter(&text) {
        let full = captures.get(0).unwrap();
        // 19.b. An empty match at the start or end contributes nothing.
        if full.start() == full.end() {
            if full.start() == 0 {
                continue;
            }
            if full.end() == text.len() {
                break;
            }
        }
        parts.push(Value::from_str(agent, &text[last..full.start()]));
        if parts.len() as u32 >= limit {
            return Ok(Value::Object(create_array_from_list(agent, &parts)));
        }
        // 19.d.iv.5. The capture groups splice in after the piece.
        for index in 1..captures.len() {
            let value = match captures.get(index) {
                Some(m) => Value::from_str(agent, m.as_str()),
                None => Value::Undefined,
            };
            parts.push(value);
            if parts.len() as u32 >= limit {
                return Ok(Value::Object(create_array_from_list(agent, &parts)));
            }
        }
        last = full.end();
    }
    // 20. The remainder of the subject is the final piece.
    parts.push(Value::from_str(agent, &text[last..]));
    Ok(Value::Object(create_array_from_list(agent, &parts)))
}

struct RegExpPrototypeSourceGetter;
impl Builtin for RegExpPrototypeSourceGetter {
    const NAME: &'static str = "source";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, _| {
        let regexp = this_regexp(agent, this_value)?;
        let ObjectKind::RegExp(data) = &agent[regexp].kind else {
            unreachable!()
        };
        Ok(Value::String(data.original_source))
    });
}

struct RegExpPrototypeFlagsGetter;
impl Builtin for RegExpPrototypeFlagsGetter {
    const NAME: &'static str = "flags";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, _| {
        let regexp = this_regexp(agent, this_value)?;
        let ObjectKind::RegExp(data) = &agent[regexp].kind else {
            unreachable!()
        };
        Ok(Value::String(data.original_flags))
    });
}

struct RegExpPrototypeGlobalGetter;
impl Builtin for RegExpPrototypeGlobalGetter {
    const NAME: &'static str = "global";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, _| {
        let regexp = this_regexp(agent, this_value)?;
        let ObjectKind::RegExp(data) = &agent[regexp].kind else {
            unreachable!()
        };
        Ok(Value::Boolean(data.global))
    });
}

pub(crate) fn create_regexp_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%RegExp.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<RegExpPrototypeExec>()
    .with_builtin_function_property::<RegExpPrototypeTest>()
    .with_builtin_function_property::<RegExpPrototypeToString>()
    .with_builtin_function_getter_property::<RegExpPrototypeSourceGetter>()
    .with_builtin_function_getter_property::<RegExpPrototypeFlagsGetter>()
    .with_builtin_function_getter_property::<RegExpPrototypeGlobalGetter>()
    .build();
    // The String.prototype methods reach these through GetMethod on the
    // well-known symbols.
    for (builtin, symbol) in [
        (
            crate::ecmascript::builtins::builtin_function::create_builtin_function(
                agent,
                RegExpPrototypeMatch::BEHAVIOUR,
                RegExpPrototypeMatch::NAME,
                RegExpPrototypeMatch::LENGTH,
                "",
            ),
            WellKnownSymbolIndexes::Match,
        ),
        (
            crate::ecmascript::builtins::builtin_function::create_builtin_function(
                agent,
                RegExpPrototypeReplace::BEHAVIOUR,
                RegExpPrototypeReplace::NAME,
                RegExpPrototypeReplace::LENGTH,
                "",
            ),
            WellKnownSymbolIndexes::Replace,
        ),
        (
            crate::ecmascript::builtins::builtin_function::create_builtin_function(
                agent,
                RegExpPrototypeSplit::BEHAVIOUR,
                RegExpPrototypeSplit::NAME,
                RegExpPrototypeSplit::LENGTH,
                "",
            ),
            WellKnownSymbolIndexes::Split,
        ),
    ] {
        agent[prototype].properties.set(
            PropertyKey::Symbol(symbol.into()),
            Property::data(Value::Object(builtin), true, false, true),
        );
    }
    let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<RegExpConstructor>(
        agent, realm, "%RegExp%",
    )
    .with_prototype_property(prototype)
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
        .with_constructor_property(constructor)
        .build();
}
