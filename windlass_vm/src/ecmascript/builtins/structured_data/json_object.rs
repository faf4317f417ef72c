// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [25.5 The JSON Object](https://tc39.es/ecma262/#sec-json-object)
//!
//! `JSON.parse` goes through the external JSON parser; stringification
//! walks the language values directly.

use sonic_rs::{JsonContainerTrait, JsonValueTrait};

use crate::ecmascript::abstract_operations::operations_on_objects::{
    create_data_property_or_throw, enumerable_own_properties, get, length_of_array_like,
    EnumerablePropertiesKind,
};
use crate::ecmascript::abstract_operations::type_conversion::to_string;
use crate::ecmascript::builders::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array::array_create;
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{number_to_string, ObjectKind, PropertyKey, Value};

struct JsonParse;
impl Builtin for JsonParse {
    const NAME: &'static str = "parse";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(json_parse);
}

/// ### [25.5.1 JSON.parse ( text \[ , reviver \] )](https://tc39.es/ecma262/#sec-json.parse)
fn json_parse(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let text = to_string(agent, arguments.get(0))?;
    let text = text.as_str(agent).to_owned();
    let parsed: sonic_rs::Value = sonic_rs::from_str(&text).map_err(|error| {
        agent.throw_exception(
            ExceptionType::SyntaxError,
            format!("Unexpected token in JSON: {error}"),
        )
    })?;
    json_to_value(agent, &parsed)
}

fn json_to_value(agent: &mut Agent, json: &sonic_rs::Value) -> JsResult<Value> {
    if json.is_null() {
        return Ok(Value::Null);
    }
    if let Some(b) = json.as_bool() {
        return Ok(Value::Boolean(b));
    }
    if let Some(n) = json.as_f64() {
        return Ok(Value::Number(n));
    }
    if let Some(s) = json.as_str() {
        return Ok(Value::from_str(agent, s));
    }
    if let Some(array) = json.as_array() {
        let result = array_create(agent, array.len() as u64, None)?;
        for (index, element) in array.iter().enumerate() {
            let value = json_to_value(agent, element)?;
            create_data_property_or_throw(agent, result, PropertyKey::Index(index as u32), value)?;
        }
        return Ok(Value::Object(result));
    }
    if let Some(object) = json.as_object() {
        let prototype = agent.current_realm().intrinsics.object_prototype();
        let result = ordinary_object_create(agent, Some(prototype));
        for (name, element) in object.iter() {
            let key = PropertyKey::from_str(agent, name);
            let value = json_to_value(agent, element)?;
            create_data_property_or_throw(agent, result, key, value)?;
        }
        return Ok(Value::Object(result));
    }
    Ok(Value::Undefined)
}

struct JsonStringify;
impl Builtin for JsonStringify {
    const NAME: &'static str = "stringify";
    const LENGTH: u8 = 3;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(json_stringify);
}

/// ### [25.5.2 JSON.stringify ( value \[ , replacer \[ , space \] \] )](https://tc39.es/ecma262/#sec-json.stringify)
fn json_stringify(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let mut out = std::string::String::new();
    match serialize_json_value(agent, arguments.get(0), &mut out, 0)? {
        true => Ok(Value::from_string(agent, out)),
        false => Ok(Value::Undefined),
    }
}

fn serialize_json_value(
    agent: &mut Agent,
    value: Value,
    out: &mut std::string::String,
    depth: usize,
) -> JsResult<bool> {
    if depth > 256 {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Converting circular structure to JSON",
        ));
    }
    match value {
        Value::Null => {
            out.push_str("null");
            Ok(true)
        }
        Value::Boolean(b) => {
            out.push_str(if b { "true" } else { "false" });
            Ok(true)
        }
        Value::Number(n) => {
            if n.is_finite() {
                out.push_str(&number_to_string(n));
            } else {
                out.push_str("null");
            }
            Ok(true)
        }
        Value::String(s) => {
            let text = s.as_str(agent).to_owned();
            quote_json_string(&text, out);
            Ok(true)
        }
        Value::BigInt(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Do not know how to serialize a BigInt",
        )),
        Value::Undefined | Value::Symbol(_) => Ok(false),
        Value::Object(object) => {
            if object.is_callable(agent) {
                return Ok(false);
            }
            // Boxed primitives unwrap before serialization.
            match &agent[object].kind {
                ObjectKind::PrimitiveNumber(n) => {
                    let n = *n;
                    return serialize_json_value(agent, Value::Number(n), out, depth);
                }
                ObjectKind::PrimitiveBoolean(b) => {
                    let b = *b;
                    return serialize_json_value(agent, Value::Boolean(b), out, depth);
                }
                ObjectKind::StringObject { value } => {
                    let value = *value;
                    return serialize_json_value(agent, Value::String(value), out, depth);
                }
                _ => {}
            }
            if object.is_array(agent) {
                let length = length_of_array_like(agent, object)?;
                out.push('[');
                for index in 0..length {
                    if index > 0 {
                        out.push(',');
                    }
                    let element = get(agent, object, PropertyKey::Index(index as u32))?;
                    if !serialize_json_value(agent, element, out, depth + 1)? {
                        out.push_str("null");
                    }
                }
                out.push(']');
                return Ok(true);
            }
            let entries =
                enumerable_own_properties(agent, object, EnumerablePropertiesKind::KeyValue)?;
            out.push('{');
            let mut first = true;
            for entry in entries {
                let Value::Object(entry) = entry else {
                    unreachable!()
                };
                let key = get(agent, entry, PropertyKey::Index(0))?;
                let value = get(agent, entry, PropertyKey::Index(1))?;
                let mut piece = std::string::String::new();
                if serialize_json_value(agent, value, &mut piece, depth + 1)? {
                    if !first {
                        out.push(',');
                    }
                    first = false;
                    let key = to_string(agent, key)?.as_str(agent).to_owned();
                    quote_json_string(&key, out);
                    out.push(':');
                    out.push_str(&piece);
                }
            }
            out.push('}');
            Ok(true)
        }
    }
}

/// ### [25.5.2.2 QuoteJSONString ( value )](https://tc39.es/ecma262/#sec-quotejsonstring)
fn quote_json_string(text: &str, out: &mut std::string::String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

pub(crate) fn create_json_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, "%JSON%", Some(object_prototype))
        .with_builtin_function_property::<JsonParse>()
        .with_builtin_function_property::<JsonStringify>()
        .with_to_string_tag("JSON")
        .build();
}
