// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.2 BigInt Objects](https://tc39.es/ecma262/#sec-bigint-objects)

use num_bigint::BigInt;
use num_traits::FromPrimitive;

use crate::ecmascript::abstract_operations::type_conversion::{
    to_integer_or_infinity, to_primitive, PreferredType,
};
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{HeapBigInt, Object, ObjectKind, Value};

pub(crate) struct BigIntConstructor;
impl Builtin for BigIntConstructor {
    const NAME: &'static str = "BigInt";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}

impl BigIntConstructor {
    /// ### [21.2.1.1 BigInt ( value )](https://tc39.es/ecma262/#sec-bigint-constructor-number-value)
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is not undefined, throw a TypeError exception.
        if new_target.is_some() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "BigInt is not a constructor",
            ));
        }
        // 2. Let prim be ? ToPrimitive(value, NUMBER).
        let prim = to_primitive(agent, arguments.get(0), Some(PreferredType::Number))?;
        // 3. If prim is a Number, return ? NumberToBigInt(prim).
        if let Value::Number(n) = prim {
            if !n.is_finite() || n.fract() != 0.0 {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "The number cannot be converted to a BigInt because it is not an integer",
                ));
            }
            let data = BigInt::from_f64(n).unwrap();
            return Ok(Value::BigInt(HeapBigInt::from_bigint(agent, data)));
        }
        // 4. Otherwise, return ? ToBigInt(prim).
        Ok(Value::BigInt(
            crate::ecmascript::abstract_operations::type_conversion::to_big_int(agent, prim)?,
        ))
    }
}

pub(crate) struct BigIntPrototype;

struct BigIntPrototypeToString;
impl Builtin for BigIntPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntPrototype::to_string);
}
struct BigIntPrototypeValueOf;
impl Builtin for BigIntPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntPrototype::value_of);
}

impl BigIntPrototype {
    fn this_big_int_value(agent: &mut Agent, value: Value) -> JsResult<HeapBigInt> {
        match value {
            Value::BigInt(b) => Ok(b),
            Value::Object(object) => match agent[object].kind {
                ObjectKind::PrimitiveBigInt(b) => Ok(b),
                _ => Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Method called on incompatible receiver, expected a BigInt",
                )),
            },
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Method called on incompatible receiver, expected a BigInt",
            )),
        }
    }

    fn to_string(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let b = Self::this_big_int_value(agent, this_value)?;
        let radix = arguments.get(0);
        let radix = if radix.is_undefined() {
            10.0
        } else {
            to_integer_or_infinity(agent, radix)?
        };
        if !(2.0..=36.0).contains(&radix) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "toString() radix must be between 2 and 36",
            ));
        }
        Ok(Value::String(b.to_string_radix(agent, radix as u32)))
    }

    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Ok(Value::BigInt(Self::this_big_int_value(agent, this_value)?))
    }
}

pub(crate) fn create_bigint_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%BigInt.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<BigIntPrototypeToString>()
    .with_builtin_function_property::<BigIntPrototypeValueOf>()
    .with_to_string_tag("BigInt")
    .build();
    let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<BigIntConstructor>(
        agent, realm, "%BigInt%",
    )
    .with_prototype_property(prototype)
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
        .with_constructor_property(constructor)
        .build();
}
