// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.4 Symbol Objects](https://tc39.es/ecma262/#sec-symbol-objects)

use crate::ecmascript::abstract_operations::type_conversion::to_string;
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{Object, ObjectKind, PropertyKey, Symbol, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct SymbolConstructor;
impl Builtin for SymbolConstructor {
    const NAME: &'static str = "Symbol";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}
struct SymbolFor;
impl Builtin for SymbolFor {
    const NAME: &'static str = "for";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolConstructor::r#for);
}
struct SymbolKeyFor;
impl Builtin for SymbolKeyFor {
    const NAME: &'static str = "keyFor";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolConstructor::key_for);
}

impl SymbolConstructor {
    /// ### [20.4.1.1 Symbol ( \[ description \] )](https://tc39.es/ecma262/#sec-symbol-description)
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
                "Symbol is not a constructor",
            ));
        }
        // 2./3. An undefined description stays absent.
        let description = arguments.get(0);
        let description = if description.is_undefined() {
            None
        } else {
            Some(to_string(agent, description)?)
        };
        // 4. Return a new Symbol whose [[Description]] is descString.
        Ok(Value::Symbol(Symbol::new(agent, description)))
    }

    /// ### [20.4.2.2 Symbol.for ( key )](https://tc39.es/ecma262/#sec-symbol.for)
    fn r#for(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let key = to_string(agent, arguments.get(0))?;
        // 1./2. Reuse the registry entry when one exists.
        if let Some(existing) = agent.global_symbol_registry.get(&key) {
            return Ok(Value::Symbol(*existing));
        }
        let symbol = Symbol::new(agent, Some(key));
        agent.global_symbol_registry.insert(key, symbol);
        Ok(Value::Symbol(symbol))
    }

    /// ### [20.4.2.6 Symbol.keyFor ( sym )](https://tc39.es/ecma262/#sec-symbol.keyfor)
    fn key_for(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Symbol(symbol) = arguments.get(0) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Symbol.keyFor requires a symbol argument",
            ));
        };
        let registered = agent
            .global_symbol_registry
            .iter()
            .find(|(_, registered)| **registered == symbol)
            .map(|(key, _)| *key);
        Ok(match registered {
            Some(key) => Value::String(key),
            None => Value::Undefined,
        })
    }
}

pub(crate) struct SymbolPrototype;

struct SymbolPrototypeToString;
impl Builtin for SymbolPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::to_string);
}
struct SymbolPrototypeValueOf;
impl Builtin for SymbolPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::value_of);
}

impl SymbolPrototype {
    fn this_symbol_value(agent: &mut Agent, value: Value) -> JsResult<Symbol> {
        match value {
            Value::Symbol(symbol) => Ok(symbol),
            Value::Object(object) => match agent[object].kind {
                ObjectKind::PrimitiveSymbol(symbol) => Ok(symbol),
                _ => Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Method called on incompatible receiver, expected a Symbol",
                )),
            },
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Method called on incompatible receiver, expected a Symbol",
            )),
        }
    }

    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let symbol = Self::this_symbol_value(agent, this_value)?;
        Ok(Value::String(symbol.descriptive_string(agent)))
    }

    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Symbol(Self::this_symbol_value(agent, this_value)?))
    }
}

pub(crate) fn create_symbol_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%Symbol.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<SymbolPrototypeToString>()
    .with_builtin_function_property::<SymbolPrototypeValueOf>()
    .with_to_string_tag("Symbol")
    .build();
    let mut constructor_builder = BuiltinFunctionBuilder::new_intrinsic_constructor::<
        SymbolConstructor,
    >(agent, realm, "%Symbol%")
    .with_prototype_property(prototype)
    .with_builtin_function_property::<SymbolFor>()
    .with_builtin_function_property::<SymbolKeyFor>();
    // The well-known symbols are frozen data properties of the
    // constructor.
    for (name, index) in [
        ("asyncIterator", WellKnownSymbolIndexes::AsyncIterator),
        ("hasInstance", WellKnownSymbolIndexes::HasInstance),
        ("isConcatSpreadable", WellKnownSymbolIndexes::IsConcatSpreadable),
        ("iterator", WellKnownSymbolIndexes::Iterator),
        ("match", WellKnownSymbolIndexes::Match),
        ("matchAll", WellKnownSymbolIndexes::MatchAll),
        ("replace", WellKnownSymbolIndexes::Replace),
        ("search", WellKnownSymbolIndexes::Search),
        ("species", WellKnownSymbolIndexes::Species),
        ("split", WellKnownSymbolIndexes::Split),
        ("toPrimitive", WellKnownSymbolIndexes::ToPrimitive),
        ("toStringTag", WellKnownSymbolIndexes::ToStringTag),
        ("unscopables", WellKnownSymbolIndexes::Unscopables),
    ] {
        let key = PropertyKey::from_str(constructor_builder.agent_mut(), name);
        constructor_builder =
            constructor_builder.with_frozen_data_property(key, Value::Symbol(index.into()));
    }
    let constructor = constructor_builder.build();
    OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
        .with_constructor_property(constructor)
        .build();
}
