// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.3 Boolean Objects](https://tc39.es/ecma262/#sec-boolean-objects)

use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ordinary::get_prototype_from_constructor;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{
    Agent, ExceptionType, JsResult, ProtoIntrinsics, RealmIdentifier,
};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, Value,
};

pub(crate) struct BooleanConstructor;
impl Builtin for BooleanConstructor {
    const NAME: &'static str = "Boolean";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}

impl BooleanConstructor {
    /// ### [20.3.1.1 Boolean ( value )](https://tc39.es/ecma262/#sec-boolean-constructor-boolean-value)
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Let b be ToBoolean(value).
        let b = arguments.get(0).to_boolean(agent);
        // 2. If NewTarget is undefined, return b.
        let Some(new_target) = new_target else {
            return Ok(Value::Boolean(b));
        };
        // 3. Let O be ? OrdinaryCreateFromConstructor(NewTarget,
        //    "%Boolean.prototype%", « [[BooleanData]] »).
        let prototype =
            get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::Boolean)?;
        Ok(Value::Object(agent.heap.create_object(ObjectHeapData::new(
            Some(prototype),
            ObjectKind::PrimitiveBoolean(b),
        ))))
    }
}

pub(crate) struct BooleanPrototype;

struct BooleanPrototypeToString;
impl Builtin for BooleanPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BooleanPrototype::to_string);
}
struct BooleanPrototypeValueOf;
impl Builtin for BooleanPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BooleanPrototype::value_of);
}

impl BooleanPrototype {
    /// ### [20.3.3.3.1 ThisBooleanValue ( value )](https://tc39.es/ecma262/#sec-thisbooleanvalue)
    fn this_boolean_value(agent: &mut Agent, value: Value) -> JsResult<bool> {
        match value {
            Value::Boolean(b) => Ok(b),
            Value::Object(object) => match agent[object].kind {
                ObjectKind::PrimitiveBoolean(b) => Ok(b),
                _ => Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Method called on incompatible receiver, expected a Boolean",
                )),
            },
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Method called on incompatible receiver, expected a Boolean",
            )),
        }
    }

    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let b = Self::this_boolean_value(agent, this_value)?;
        Ok(Value::from_str(agent, if b { "true" } else { "false" }))
    }

    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Boolean(Self::this_boolean_value(agent, this_value)?))
    }
}

pub(crate) fn create_boolean_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%Boolean.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<BooleanPrototypeToString>()
    .with_builtin_function_property::<BooleanPrototypeValueOf>()
    .build();
    let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<BooleanConstructor>(
        agent,
        realm,
        "%Boolean%",
    )
    .with_prototype_property(prototype)
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
        .with_constructor_property(constructor)
        .build();
}
