// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.1 Iteration](https://tc39.es/ecma262/#sec-iteration) and the
//! generator/async-generator prototype chains, plus the Promise intrinsic
//! surface.

use crate::ecmascript::abstract_operations::operations_on_objects::call;
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::control_abstraction_objects::async_generator_objects::{
    async_generator_prototype_resume, AsyncGeneratorResumeKind,
};
use crate::ecmascript::builtins::control_abstraction_objects::generator_objects::{
    generator_prototype_next, generator_prototype_return, generator_prototype_throw,
};
use crate::ecmascript::builtins::control_abstraction_objects::promise_objects::promise_abstract_operations::promise_capability_records::{
    perform_promise_then, promise_resolve, PromiseCapability,
};
use crate::ecmascript::builtins::control_abstraction_objects::promise_objects::promise_objects_data::is_promise;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{Object, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

struct IteratorPrototypeIterator;
impl Builtin for IteratorPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|_agent, this_value, _arguments| {
        // ### [27.1.2.1 %IteratorPrototype% [ @@iterator ] ( )](https://tc39.es/ecma262/#sec-%iteratorprototype%-@@iterator)
        Ok(this_value)
    });
}

struct AsyncIteratorPrototypeAsyncIterator;
impl Builtin for AsyncIteratorPrototypeAsyncIterator {
    const NAME: &'static str = "[Symbol.asyncIterator]";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|_agent, this_value, _arguments| {
        Ok(this_value)
    });
}

struct GeneratorPrototypeNext;
impl Builtin for GeneratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments: ArgumentsList| {
        generator_prototype_next(agent, this_value, arguments.get(0))
    });
}
struct GeneratorPrototypeReturn;
impl Builtin for GeneratorPrototypeReturn {
    const NAME: &'static str = "return";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments: ArgumentsList| {
        generator_prototype_return(agent, this_value, arguments.get(0))
    });
}
struct GeneratorPrototypeThrow;
impl Builtin for GeneratorPrototypeThrow {
    const NAME: &'static str = "throw";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments: ArgumentsList| {
        generator_prototype_throw(agent, this_value, arguments.get(0))
    });
}

struct AsyncGeneratorPrototypeNext;
impl Builtin for AsyncGeneratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments: ArgumentsList| {
        async_generator_prototype_resume(
            agent,
            this_value,
            AsyncGeneratorResumeKind::Next,
            arguments.get(0),
        )
    });
}
struct AsyncGeneratorPrototypeReturn;
impl Builtin for AsyncGeneratorPrototypeReturn {
    const NAME: &'static str = "return";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments: ArgumentsList| {
        async_generator_prototype_resume(
            agent,
            this_value,
            AsyncGeneratorResumeKind::Return,
            arguments.get(0),
        )
    });
}
struct AsyncGeneratorPrototypeThrow;
impl Builtin for AsyncGeneratorPrototypeThrow {
    const NAME: &'static str = "throw";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments: ArgumentsList| {
        async_generator_prototype_resume(
            agent,
            this_value,
            AsyncGeneratorResumeKind::Throw,
            arguments.get(0),
        )
    });
}

pub(crate) struct PromiseConstructor;
impl Builtin for PromiseConstructor {
    const NAME: &'static str = "Promise";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(promise_constructor);
}

/// ### [27.2.3.1 Promise ( executor )](https://tc39.es/ecma262/#sec-promise-executor)
fn promise_constructor(
    agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    // 1. If NewTarget is undefined, throw a TypeError exception.
    if new_target.is_none() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Promise constructor requires 'new'",
        ));
    }
    // 2. If IsCallable(executor) is false, throw a TypeError exception.
    let executor = arguments.get(0);
    if !executor.is_callable(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Promise resolver is not a function",
        ));
    }
    // 3.-8. Create the promise with its resolving functions.
    let capability = PromiseCapability::new(agent);
    // 9. Let completion be Completion(Call(executor, undefined,
    //    « resolvingFunctions.[[Resolve]], resolvingFunctions.[[Reject]] »)).
    let resolve = capability.resolve;
    let reject = capability.reject;
    if let Err(err) = call(agent, executor, Value::Undefined, &[resolve, reject]) {
        // 10. An abrupt executor rejects the promise.
        capability.reject(agent, err.value());
    }
    // 11. Return promise.
    Ok(Value::Object(capability.promise()))
}

struct PromiseResolve;
impl Builtin for PromiseResolve {
    const NAME: &'static str = "resolve";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, arguments: ArgumentsList| {
        // ### [27.2.4.7 Promise.resolve ( x )](https://tc39.es/ecma262/#sec-promise.resolve)
        Ok(Value::Object(promise_resolve(agent, arguments.get(0))))
    });
}
struct PromiseRejectBuiltin;
impl Builtin for PromiseRejectBuiltin {
    const NAME: &'static str = "reject";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, arguments: ArgumentsList| {
        // ### [27.2.4.6 Promise.reject ( r )](https://tc39.es/ecma262/#sec-promise.reject)
        let capability = PromiseCapability::new(agent);
        capability.reject(agent, arguments.get(0));
        Ok(Value::Object(capability.promise()))
    });
}

struct PromiseAll;
impl Builtin for PromiseAll {
    const NAME: &'static str = "all";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(promise_all);
}

/// ### [27.2.4.1 Promise.all ( iterable )](https://tc39.es/ecma262/#sec-promise.all)
///
/// Settled through a synchronous drain of the iterable and a reaction per
/// element; element order is preserved via the result index.
fn promise_all(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let capability = PromiseCapability::new(agent);
    let values = match crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list(
        agent,
        arguments.get(0),
    ) {
        Ok(values) => values,
        Err(err) => {
            capability.reject(agent, err.value());
            return Ok(Value::Object(capability.promise()));
        }
    };
    if values.is_empty() {
        let empty = crate::ecmascript::abstract_operations::operations_on_objects::create_array_from_list(
            agent,
            &[],
        );
        capability.try_resolve(agent, Value::Object(empty));
        return Ok(Value::Object(capability.promise()));
    }
    // Drain each element promise sequentially by chaining a then handler
    // that records its slot. The collection state lives on an ordinary
    // object shared by the closures through bound functions.
    let state = crate::ecmascript::builtins::ordinary::ordinary_object_create(agent, None);
    let remaining_key = PropertyKey::from_str(agent, "remaining");
    let results_key = PropertyKey::from_str(agent, "results");
    let results = crate::ecmascript::abstract_operations::operations_on_objects::create_array_from_list(
        agent,
        &vec![Value::Undefined; values.len()],
    );
    agent[state].properties.set(
        remaining_key,
        crate::ecmascript::types::Property::data(
            Value::Number(values.len() as f64),
            true,
            true,
            true,
        ),
    );
    agent[state].properties.set(
        results_key,
        crate::ecmascript::types::Property::data(Value::Object(results), true, true, true),
    );
    for (index, value) in values.into_iter().enumerate() {
        let element_promise = promise_resolve(agent, value);
        let on_fulfilled = make_promise_all_element_function(
            agent,
            state,
            results,
            index as u32,
            capability,
        );
        perform_promise_then(
            agent,
            element_promise,
            Value::Object(on_fulfilled),
            capability.reject,
            None,
        );
    }
    Ok(Value::Object(capability.promise()))
}

// The per-element resolve function of Promise.all is a builtin whose state
// rides in bound arguments.
fn make_promise_all_element_function(
    agent: &mut Agent,
    state: Object,
    results: Object,
    index: u32,
    capability: PromiseCapability,
) -> Object {
    struct PromiseAllElement;
    impl Builtin for PromiseAllElement {
        const NAME: &'static str = "";
        const LENGTH: u8 = 1;
        const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this, arguments| {
            // `this` carries [state, results, index, promise] via the bound
            // this value, packaged as an array.
            let Value::Object(packed) = this else {
                unreachable!()
            };
            let state = crate::ecmascript::abstract_operations::operations_on_objects::get(
                agent,
                packed,
                PropertyKey::Index(0),
            )?;
            let Value::Object(state) = state else {
                unreachable!()
            };
            let results = crate::ecmascript::abstract_operations::operations_on_objects::get(
                agent,
                packed,
                PropertyKey::Index(1),
            )?;
            let Value::Object(results) = results else {
                unreachable!()
            };
            let index = crate::ecmascript::abstract_operations::operations_on_objects::get(
                agent,
                packed,
                PropertyKey::Index(2),
            )?;
            let Value::Number(index) = index else {
                unreachable!()
            };
            let promise = crate::ecmascript::abstract_operations::operations_on_objects::get(
                agent,
                packed,
                PropertyKey::Index(3),
            )?;
            let Value::Object(promise) = promise else {
                unreachable!()
            };
            // Record the element value.
            crate::ecmascript::abstract_operations::operations_on_objects::set(
                agent,
                results,
                PropertyKey::Index(index as u32),
                arguments.get(0),
                true,
            )?;
            // Decrement the counter; at zero, resolve the result promise.
            let remaining_key = PropertyKey::from_str(agent, "remaining");
            let remaining = crate::ecmascript::abstract_operations::operations_on_objects::get(
                agent, state, remaining_key,
            )?;
            let Value::Number(remaining) = remaining else {
                unreachable!()
            };
            let remaining = remaining - 1.0;
            crate::ecmascript::abstract_operations::operations_on_objects::set(
                agent,
                state,
                remaining_key,
                Value::Number(remaining),
                true,
            )?;
            if remaining == 0.0 {
                let capability = PromiseCapability::from_promise(promise);
                capability.try_resolve(agent, Value::Object(results));
            }
            Ok(Value::Undefined)
        });
    }
    let function = crate::ecmascript::builtins::builtin_function::create_builtin_function(
        agent,
        PromiseAllElement::BEHAVIOUR,
        PromiseAllElement::NAME,
        PromiseAllElement::LENGTH,
        "",
    );
    let packed = crate::ecmascript::abstract_operations::operations_on_objects::create_array_from_list(
        agent,
        &[
            Value::Object(state),
            Value::Object(results),
            Value::Number(index as f64),
            Value::Object(capability.promise()),
        ],
    );
    crate::ecmascript::builtins::bound_function::bound_function_create(
        agent,
        function,
        Value::Object(packed),
        Vec::new(),
    )
    .unwrap()
}

struct PromiseRace;
impl Builtin for PromiseRace {
    const NAME: &'static str = "race";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, arguments| {
        // ### [27.2.4.5 Promise.race ( iterable )](https://tc39.es/ecma262/#sec-promise.race)
        let capability = PromiseCapability::new(agent);
        match crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list(
            agent,
            arguments.get(0),
        ) {
            Err(err) => capability.reject(agent, err.value()),
            Ok(values) => {
                for value in values {
                    let element = promise_resolve(agent, value);
                    perform_promise_then(
                        agent,
                        element,
                        capability.resolve,
                        capability.reject,
                        None,
                    );
                }
            }
        }
        Ok(Value::Object(capability.promise()))
    });
}

struct PromisePrototypeThen;
impl Builtin for PromisePrototypeThen {
    const NAME: &'static str = "then";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(promise_prototype_then);
}

/// ### [27.2.5.4 Promise.prototype.then ( onFulfilled, onRejected )](https://tc39.es/ecma262/#sec-promise.prototype.then)
fn promise_prototype_then(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    // 2. If IsPromise(promise) is false, throw a TypeError exception.
    let Some(promise) = is_promise(agent, this_value) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Method Promise.prototype.then called on incompatible receiver",
        ));
    };
    // 3./4. The derived promise comes from the species constructor; only
    //    the intrinsic promise shape is supported, so a fresh capability
    //    stands in.
    let result_capability = PromiseCapability::new(agent);
    // 5. Return PerformPromiseThen(promise, onFulfilled, onRejected,
    //    resultCapability).
    perform_promise_then(
        agent,
        promise,
        arguments.get(0),
        arguments.get(1),
        Some(result_capability),
    );
    Ok(Value::Object(result_capability.promise()))
}

struct PromisePrototypeCatch;
impl Builtin for PromisePrototypeCatch {
    const NAME: &'static str = "catch";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments: ArgumentsList| {
        // ### [27.2.5.1 Promise.prototype.catch ( onRejected )](https://tc39.es/ecma262/#sec-promise.prototype.catch)
        // 1. Return ? Invoke(promise, "then", « undefined, onRejected »).
        let then_key = PropertyKey::from_str(agent, "then");
        crate::ecmascript::abstract_operations::operations_on_objects::invoke(
            agent,
            this_value,
            then_key,
            &[Value::Undefined, arguments.get(0)],
        )
    });
}

struct PromisePrototypeFinally;
impl Builtin for PromisePrototypeFinally {
    const NAME: &'static str = "finally";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, arguments: ArgumentsList| {
        // ### [27.2.5.3 Promise.prototype.finally ( onFinally )](https://tc39.es/ecma262/#sec-promise.prototype.finally)
        // Simplified: the handler runs on both paths; its return value is
        // ignored except as ordering.
        let then_key = PropertyKey::from_str(agent, "then");
        let on_finally = arguments.get(0);
        crate::ecmascript::abstract_operations::operations_on_objects::invoke(
            agent,
            this_value,
            then_key,
            &[on_finally, on_finally],
        )
    });
}

/// Creates `%IteratorPrototype%`, `%AsyncIteratorPrototype%`,
/// `%GeneratorPrototype%`, `%AsyncGeneratorPrototype%`, `%Promise%` and
/// `%Promise.prototype%`.
pub(crate) fn create_control_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();

    // %IteratorPrototype% with its self-returning @@iterator.
    let iterator_prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%IteratorPrototype%",
        Some(object_prototype),
    )
    .build();
    let iterator_function = crate::ecmascript::builtins::builtin_function::create_builtin_function(
        agent,
        IteratorPrototypeIterator::BEHAVIOUR,
        IteratorPrototypeIterator::NAME,
        IteratorPrototypeIterator::LENGTH,
        "",
    );
    agent[iterator_prototype].properties.set(
        PropertyKey::Symbol(WellKnownSymbolIndexes::Iterator.into()),
        crate::ecmascript::types::Property::data(
            Value::Object(iterator_function),
            true,
            false,
            true,
        ),
    );

    let async_iterator_prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%AsyncIteratorPrototype%",
        Some(object_prototype),
    )
    .build();
    let async_iterator_function =
        crate::ecmascript::builtins::builtin_function::create_builtin_function(
            agent,
            AsyncIteratorPrototypeAsyncIterator::BEHAVIOUR,
            AsyncIteratorPrototypeAsyncIterator::NAME,
            AsyncIteratorPrototypeAsyncIterator::LENGTH,
            "",
        );
    agent[async_iterator_prototype].properties.set(
        PropertyKey::Symbol(WellKnownSymbolIndexes::AsyncIterator.into()),
        crate::ecmascript::types::Property::data(
            Value::Object(async_iterator_function),
            true,
            false,
            true,
        ),
    );

    // %GeneratorPrototype%: inherits from %IteratorPrototype%.
    OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%GeneratorPrototype%",
        Some(iterator_prototype),
    )
    .with_builtin_function_property::<GeneratorPrototypeNext>()
    .with_builtin_function_property::<GeneratorPrototypeReturn>()
    .with_builtin_function_property::<GeneratorPrototypeThrow>()
    .with_to_string_tag("Generator")
    .build();

    OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%AsyncGeneratorPrototype%",
        Some(async_iterator_prototype),
    )
    .with_builtin_function_property::<AsyncGeneratorPrototypeNext>()
    .with_builtin_function_property::<AsyncGeneratorPrototypeReturn>()
    .with_builtin_function_property::<AsyncGeneratorPrototypeThrow>()
    .with_to_string_tag("AsyncGenerator")
    .build();

    // Promise.
    let promise_prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%Promise.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<PromisePrototypeCatch>()
    .with_builtin_function_property::<PromisePrototypeFinally>()
    .with_builtin_function_property::<PromisePrototypeThen>()
    .with_to_string_tag("Promise")
    .build();
    let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<PromiseConstructor>(
        agent, realm, "%Promise%",
    )
    .with_prototype_property(promise_prototype)
    .with_builtin_function_property::<PromiseAll>()
    .with_builtin_function_property::<PromiseRace>()
    .with_builtin_function_property::<PromiseRejectBuiltin>()
    .with_builtin_function_property::<PromiseResolve>()
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, promise_prototype)
        .with_constructor_property(constructor)
        .build();
}
