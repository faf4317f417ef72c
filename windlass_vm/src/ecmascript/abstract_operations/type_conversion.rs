// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! The conversion abstract operations. They are polymorphic over the
//! language types but never over specification types.

use num_traits::ToPrimitive;

use crate::ecmascript::abstract_operations::operations_on_objects::{call, get, get_method};
use crate::ecmascript::builtins::string_object::string_create;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, ProtoIntrinsics};
use crate::ecmascript::types::{
    string_to_big_int, string_to_number, HeapBigInt, HeapString, number_to_heap_string, Object,
    ObjectHeapData, ObjectKind, PropertyKey, Value,
};
use crate::heap::WellKnownSymbolIndexes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    String,
    Number,
}

/// ### [7.1.1 ToPrimitive ( input \[ , preferredType \] )](https://tc39.es/ecma262/#sec-toprimitive)
///
/// Converts its input argument to a non-Object type. If an object is
/// capable of converting to more than one primitive type, it may use the
/// optional hint preferredType to favour that type.
pub fn to_primitive(
    agent: &mut Agent,
    input: Value,
    preferred_type: Option<PreferredType>,
) -> JsResult<Value> {
    // 1. If input is an Object, then
    let Value::Object(input_object) = input else {
        // 2. Return input.
        return Ok(input);
    };
    // a. Let exoticToPrim be ? GetMethod(input, @@toPrimitive).
    let exotic_to_prim = get_method(
        agent,
        input_object,
        PropertyKey::Symbol(WellKnownSymbolIndexes::ToPrimitive.into()),
    )?;
    // b. If exoticToPrim is not undefined, then
    if let Some(exotic_to_prim) = exotic_to_prim {
        let hint = match preferred_type {
            // ii. Else if preferredType is STRING, let hint be "string".
            Some(PreferredType::String) => "string",
            // iii. Else, let hint be "number".
            Some(PreferredType::Number) => "number",
            // i. If preferredType is not present, let hint be "default".
            None => "default",
        };
        let hint = Value::from_str(agent, hint);
        // iv. Let result be ? Call(exoticToPrim, input, « hint »).
        let result = call(agent, Value::Object(exotic_to_prim), input, &[hint])?;
        // v. If result is not an Object, return result.
        if !result.is_object() {
            return Ok(result);
        }
        // vi. Throw a TypeError exception.
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert object to primitive value",
        ));
    }
    // c. If preferredType is not present, let preferredType be NUMBER.
    // d. Return ? OrdinaryToPrimitive(input, preferredType).
    ordinary_to_primitive(
        agent,
        input_object,
        preferred_type.unwrap_or(PreferredType::Number),
    )
}

/// ### [7.1.1.1 OrdinaryToPrimitive ( O, hint )](https://tc39.es/ecma262/#sec-ordinarytoprimitive)
pub fn ordinary_to_primitive(
    agent: &mut Agent,
    o: Object,
    hint: PreferredType,
) -> JsResult<Value> {
    // 1./2. Order the method names by the hint.
    let method_names: [&str; 2] = match hint {
        PreferredType::String => ["toString", "valueOf"],
        PreferredType::Number => ["valueOf", "toString"],
    };
    // 3. For each element name of methodNames, do
    for name in method_names {
        let key = PropertyKey::from_str(agent, name);
        // a. Let method be ? Get(O, name).
        let method = get(agent, o, key)?;
        // b. If IsCallable(method) is true, then
        if method.is_callable(agent) {
            // i. Let result be ? Call(method, O).
            let result = call(agent, method, Value::Object(o), &[])?;
            // ii. If result is not an Object, return result.
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    // 4. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value",
    ))
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
pub fn to_number(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    match argument {
        // 1. If argument is a Number, return argument.
        Value::Number(n) => Ok(n),
        // 2. If argument is either a Symbol or a BigInt, throw a TypeError.
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol to a number",
        )),
        Value::BigInt(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a BigInt to a number",
        )),
        // 3. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 4. If argument is either null or false, return +0𝔽.
        Value::Null => Ok(0.0),
        // 5. If argument is true, return 1𝔽.
        Value::Boolean(b) => Ok(if b { 1.0 } else { 0.0 }),
        // 6. If argument is a String, return StringToNumber(argument).
        Value::String(s) => {
            let text = s.as_str(agent).to_owned();
            Ok(string_to_number(&text))
        }
        // 7. Assert: argument is an Object.
        Value::Object(_) => {
            // 8. Let primValue be ? ToPrimitive(argument, NUMBER).
            let prim_value = to_primitive(agent, argument, Some(PreferredType::Number))?;
            // 9. Return ? ToNumber(primValue).
            to_number(agent, prim_value)
        }
    }
}

/// ### [7.1.3 ToNumeric ( value )](https://tc39.es/ecma262/#sec-tonumeric)
///
/// Returns either a Number or a BigInt value.
pub fn to_numeric(agent: &mut Agent, value: Value) -> JsResult<Value> {
    // 1. Let primValue be ? ToPrimitive(value, NUMBER).
    let prim_value = to_primitive(agent, value, Some(PreferredType::Number))?;
    // 2. If primValue is a BigInt, return primValue.
    if let Value::BigInt(_) = prim_value {
        return Ok(prim_value);
    }
    // 3. Return ? ToNumber(primValue).
    Ok(Value::Number(to_number(agent, prim_value)?))
}

/// ### [7.1.5 ToIntegerOrInfinity ( argument )](https://tc39.es/ecma262/#sec-tointegerorinfinity)
pub fn to_integer_or_infinity(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument)?;
    // 2. If number is one of NaN, +0𝔽, or -0𝔽, return 0.
    if number.is_nan() || number == 0.0 {
        return Ok(0.0);
    }
    // 3./4. Infinities pass through.
    if number.is_infinite() {
        return Ok(number);
    }
    // 5. Return truncate(ℝ(number)).
    Ok(number.trunc())
}

/// ### [7.1.6 ToInt32 ( argument )](https://tc39.es/ecma262/#sec-toint32)
pub fn to_int32(agent: &mut Agent, argument: Value) -> JsResult<i32> {
    let number = to_number(agent, argument)?;
    Ok(f64_to_int32(number))
}

pub fn f64_to_int32(number: f64) -> i32 {
    if !number.is_finite() || number == 0.0 {
        return 0;
    }
    let number = number.trunc();
    let int32bit = (number.rem_euclid(2f64.powi(32))) as u32;
    int32bit as i32
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
pub fn to_uint32(agent: &mut Agent, argument: Value) -> JsResult<u32> {
    let number = to_number(agent, argument)?;
    Ok(f64_to_uint32(number))
}

pub fn f64_to_uint32(number: f64) -> u32 {
    f64_to_int32(number) as u32
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub fn to_string(agent: &mut Agent, argument: Value) -> JsResult<HeapString> {
    match argument {
        // 1. If argument is a String, return argument.
        Value::String(s) => Ok(s),
        // 2. If argument is a Symbol, throw a TypeError exception.
        Value::Symbol(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Symbol to a string",
        )),
        // 3.-6. The literal forms.
        Value::Undefined => Ok(HeapString::from_str(agent, "undefined")),
        Value::Null => Ok(HeapString::from_str(agent, "null")),
        Value::Boolean(true) => Ok(HeapString::from_str(agent, "true")),
        Value::Boolean(false) => Ok(HeapString::from_str(agent, "false")),
        // 7. If argument is a Number, return Number::toString(argument, 10).
        Value::Number(n) => Ok(number_to_heap_string(agent, n)),
        // 8. If argument is a BigInt, return BigInt::toString(argument, 10).
        Value::BigInt(b) => Ok(b.to_string_radix(agent, 10)),
        // 9. Assert: argument is an Object.
        Value::Object(_) => {
            // 10. Let primValue be ? ToPrimitive(argument, STRING).
            let prim_value = to_primitive(agent, argument, Some(PreferredType::String))?;
            // 12. Return ? ToString(primValue).
            to_string(agent, prim_value)
        }
    }
}

/// ### [7.1.18 ToObject ( argument )](https://tc39.es/ecma262/#sec-toobject)
///
/// Boxes primitives with the intrinsic prototype of the current realm.
pub fn to_object(agent: &mut Agent, argument: Value) -> JsResult<Object> {
    match argument {
        Value::Undefined | Value::Null => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert undefined or null to object",
        )),
        Value::Boolean(b) => {
            let prototype = agent.intrinsic(ProtoIntrinsics::Boolean.intrinsic_name());
            Ok(agent.heap.create_object(ObjectHeapData::new(
                Some(prototype),
                ObjectKind::PrimitiveBoolean(b),
            )))
        }
        Value::Number(n) => {
            let prototype = agent.intrinsic(ProtoIntrinsics::Number.intrinsic_name());
            Ok(agent.heap.create_object(ObjectHeapData::new(
                Some(prototype),
                ObjectKind::PrimitiveNumber(n),
            )))
        }
        Value::String(s) => {
            let prototype = agent.intrinsic(ProtoIntrinsics::String.intrinsic_name());
            Ok(string_create(agent, s, Some(prototype)))
        }
        Value::Symbol(s) => {
            let prototype = agent.intrinsic(ProtoIntrinsics::Symbol.intrinsic_name());
            Ok(agent.heap.create_object(ObjectHeapData::new(
                Some(prototype),
                ObjectKind::PrimitiveSymbol(s),
            )))
        }
        Value::BigInt(b) => {
            let prototype = agent.intrinsic(ProtoIntrinsics::BigInt.intrinsic_name());
            Ok(agent.heap.create_object(ObjectHeapData::new(
                Some(prototype),
                ObjectKind::PrimitiveBigInt(b),
            )))
        }
        Value::Object(o) => Ok(o),
    }
}

/// ### [7.1.19 ToPropertyKey ( argument )](https://tc39.es/ecma262/#sec-topropertykey)
pub fn to_property_key(agent: &mut Agent, argument: Value) -> JsResult<PropertyKey> {
    // 1. Let key be ? ToPrimitive(argument, STRING).
    let key = to_primitive(agent, argument, Some(PreferredType::String))?;
    // 2. If key is a Symbol, return key.
    if let Value::Symbol(symbol) = key {
        return Ok(PropertyKey::Symbol(symbol));
    }
    // 3. Return ! ToString(key).
    let string = to_string(agent, key)?;
    Ok(PropertyKey::from_heap_string(agent, string))
}

/// ### [7.1.20 ToLength ( argument )](https://tc39.es/ecma262/#sec-tolength)
pub fn to_length(agent: &mut Agent, argument: Value) -> JsResult<u64> {
    // 1. Let len be ? ToIntegerOrInfinity(argument).
    let len = to_integer_or_infinity(agent, argument)?;
    // 2. If len ≤ 0, return +0𝔽.
    if len <= 0.0 {
        return Ok(0);
    }
    // 3. Return 𝔽(min(len, 2^53 - 1)).
    Ok(len.min(2f64.powi(53) - 1.0) as u64)
}

/// ### [7.1.13 ToBigInt ( argument )](https://tc39.es/ecma262/#sec-tobigint)
pub fn to_big_int(agent: &mut Agent, argument: Value) -> JsResult<HeapBigInt> {
    // 1. Let prim be ? ToPrimitive(argument, NUMBER).
    let prim = to_primitive(agent, argument, Some(PreferredType::Number))?;
    // 2. Return the value of prim corresponding to Table 12.
    match prim {
        Value::BigInt(b) => Ok(b),
        Value::Boolean(b) => Ok(HeapBigInt::from_i64(agent, if b { 1 } else { 0 })),
        Value::Number(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Number to a BigInt",
        )),
        Value::String(s) => {
            let text = s.as_str(agent).to_owned();
            match string_to_big_int(agent, &text) {
                Some(data) => Ok(HeapBigInt::from_bigint(agent, data)),
                None => Err(agent.throw_exception(
                    ExceptionType::SyntaxError,
                    format!("Cannot convert {text} to a BigInt"),
                )),
            }
        }
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert value to a BigInt",
        )),
    }
}

/// ### [7.1.21 CanonicalNumericIndexString ( argument )](https://tc39.es/ecma262/#sec-canonicalnumericindexstring)
pub fn canonical_numeric_index_string(agent: &Agent, argument: HeapString) -> Option<f64> {
    let text = argument.as_str(agent);
    if text == "-0" {
        return Some(-0.0);
    }
    let n = string_to_number(text);
    if crate::ecmascript::types::number_to_string(n) == text {
        Some(n)
    } else {
        None
    }
}

/// The index a BigInt exponent or shift must fit into.
pub fn big_int_to_u32(agent: &Agent, value: HeapBigInt) -> Option<u32> {
    value.data(agent).to_u32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::{DefaultHostHooks, Options};

    #[test]
    fn int32_wrapping() {
        assert_eq!(f64_to_int32(0.0), 0);
        assert_eq!(f64_to_int32(f64::NAN), 0);
        assert_eq!(f64_to_int32(f64::INFINITY), 0);
        assert_eq!(f64_to_int32(2f64.powi(31)), i32::MIN);
        assert_eq!(f64_to_int32(-1.5), -1);
        assert_eq!(f64_to_uint32(-1.0), u32::MAX);
    }

    #[test]
    fn to_number_on_primitives() {
        let mut agent = Agent::new(Options::default(), &DefaultHostHooks);
        assert!(to_number(&mut agent, Value::Undefined).unwrap().is_nan());
        assert_eq!(to_number(&mut agent, Value::Null).unwrap(), 0.0);
        assert_eq!(to_number(&mut agent, Value::Boolean(true)).unwrap(), 1.0);
        let s = Value::from_str(&mut agent, "  12.5 ");
        assert_eq!(to_number(&mut agent, s).unwrap(), 12.5);
    }
}
