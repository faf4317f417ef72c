// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.1 Number Objects](https://tc39.es/ecma262/#sec-number-objects)

use crate::ecmascript::abstract_operations::type_conversion::{
    to_integer_or_infinity, to_numeric,
};
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ordinary::get_prototype_from_constructor;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{
    Agent, ExceptionType, JsResult, ProtoIntrinsics, RealmIdentifier,
};
use crate::ecmascript::types::{
    number_to_string, number_to_string_radix, Object, ObjectHeapData, ObjectKind, Value,
};

pub(crate) struct NumberConstructor;
impl Builtin for NumberConstructor {
    const NAME: &'static str = "Number";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}
struct NumberIsFinite;
impl Builtin for NumberIsFinite {
    const NAME: &'static str = "isFinite";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::is_finite);
}
struct NumberIsInteger;
impl Builtin for NumberIsInteger {
    const NAME: &'static str = "isInteger";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::is_integer);
}
struct NumberIsNaN;
impl Builtin for NumberIsNaN {
    const NAME: &'static str = "isNaN";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::is_nan);
}
struct NumberIsSafeInteger;
impl Builtin for NumberIsSafeInteger {
    const NAME: &'static str = "isSafeInteger";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::is_safe_integer);
}

impl NumberConstructor {
    /// ### [21.1.1.1 Number ( value )](https://tc39.es/ecma262/#sec-number-constructor-number-value)
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1.-3. Coerce the value; BigInts narrow to Number.
        let n = if arguments.is_empty() {
            0.0
        } else {
            match to_numeric(agent, arguments.get(0))? {
                Value::Number(n) => n,
                Value::BigInt(b) => b.to_f64(agent),
                _ => unreachable!(),
            }
        };
        // 4. If NewTarget is undefined, return n.
        let Some(new_target) = new_target else {
            return Ok(Value::Number(n));
        };
        // 5./6. Box the value.
        let prototype =
            get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::Number)?;
        Ok(Value::Object(agent.heap.create_object(ObjectHeapData::new(
            Some(prototype),
            ObjectKind::PrimitiveNumber(n),
        ))))
    }

    fn is_finite(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let _ = agent;
        Ok(Value::Boolean(matches!(
            arguments.get(0),
            Value::Number(n) if n.is_finite()
        )))
    }

    fn is_integer(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let _ = agent;
        Ok(Value::Boolean(matches!(
            arguments.get(0),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0
        )))
    }

    fn is_nan(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let _ = agent;
        Ok(Value::Boolean(matches!(
            arguments.get(0),
            Value::Number(n) if n.is_nan()
        )))
    }

    fn is_safe_integer(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let _ = agent;
        Ok(Value::Boolean(matches!(
            arguments.get(0),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() <= 2f64.powi(53) - 1.0
        )))
    }
}

pub(crate) struct NumberPrototype;

struct NumberPrototypeToFixed;
impl Builtin for NumberPrototypeToFixed {
    const NAME: &'static str = "toFixed";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_fixed);
}
struct NumberPrototypeToString;
impl Builtin for NumberPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_string);
}
struct NumberPrototypeValueOf;
impl Builtin for NumberPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::value_of);
}

impl NumberPrototype {
    /// ### [21.1.3.7.1 ThisNumberValue ( value )](https://tc39.es/ecma262/#sec-thisnumbervalue)
    fn this_number_value(agent: &mut Agent, value: Value) -> JsResult<f64> {
        match value {
            Value::Number(n) => Ok(n),
            Value::Object(object) => match agent[object].kind {
                ObjectKind::PrimitiveNumber(n) => Ok(n),
                _ => Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Method called on incompatible receiver, expected a Number",
                )),
            },
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Method called on incompatible receiver, expected a Number",
            )),
        }
    }

    /// ### [21.1.3.3 Number.prototype.toFixed ( fractionDigits )](https://tc39.es/ecma262/#sec-number.prototype.tofixed)
    fn to_fixed(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let x = Self::this_number_value(agent, this_value)?;
        let digits = to_integer_or_infinity(agent, arguments.get(0))?;
        if !(0.0..=100.0).contains(&digits) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "toFixed() digits argument must be between 0 and 100",
            ));
        }
        if !x.is_finite() || x.abs() >= 1e21 {
            return Ok(Value::from_string(agent, number_to_string(x)));
        }
        Ok(Value::from_string(
            agent,
            format!("{x:.*}", digits as usize),
        ))
    }

    /// ### [21.1.3.6 Number.prototype.toString ( \[ radix \] )](https://tc39.es/ecma262/#sec-number.prototype.tostring)
    fn to_string(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let x = Self::this_number_value(agent, this_value)?;
        let radix = arguments.get(0);
        // 2./3. Absent radix means 10.
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
        let text = if radix == 10.0 {
            number_to_string(x)
        } else {
            number_to_string_radix(x, radix as u32)
        };
        Ok(Value::from_string(agent, text))
    }

    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Number(Self::this_number_value(agent, this_value)?))
    }
}

pub(crate) fn create_number_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%Number.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<NumberPrototypeToFixed>()
    .with_builtin_function_property::<NumberPrototypeToString>()
    .with_builtin_function_property::<NumberPrototypeValueOf>()
    .build();
    let nan = Value::Number(f64::NAN);
    let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<NumberConstructor>(
        agent, realm, "%Number%",
    )
    .with_prototype_property(prototype)
    .with_builtin_function_property::<NumberIsFinite>()
    .with_builtin_function_property::<NumberIsInteger>()
    .with_builtin_function_property::<NumberIsNaN>()
    .with_builtin_function_property::<NumberIsSafeInteger>();
    let constructor = {
        let mut constructor = constructor;
        for (name, value) in [
            ("EPSILON", Value::Number(f64::EPSILON)),
            ("MAX_SAFE_INTEGER", Value::Number(2f64.powi(53) - 1.0)),
            ("MAX_VALUE", Value::Number(f64::MAX)),
            ("MIN_SAFE_INTEGER", Value::Number(-(2f64.powi(53) - 1.0))),
            ("MIN_VALUE", Value::Number(5e-324)),
            ("NaN", nan),
            ("NEGATIVE_INFINITY", Value::Number(f64::NEG_INFINITY)),
            ("POSITIVE_INFINITY", Value::Number(f64::INFINITY)),
        ] {
            let key = crate::ecmascript::types::PropertyKey::from_str(
                constructor.agent_mut(),
                name,
            );
            constructor = constructor.with_frozen_data_property(key, value);
        }
        constructor
    };
    let constructor = constructor.build();
    OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
        .with_constructor_property(constructor)
        .build();
}
