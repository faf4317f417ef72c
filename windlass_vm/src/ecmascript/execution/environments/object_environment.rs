// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ObjectEnvironment, OuterEnv};
use crate::ecmascript::abstract_operations::operations_on_objects::{
    define_property_or_throw, get, has_property, set,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    HeapString, Object, PropertyDescriptor, PropertyKey, Value,
};
use crate::heap::WellKnownSymbolIndexes;

/// ### [9.1.1.2 Object Environment Records](https://tc39.es/ecma262/#sec-object-environment-records)
///
/// Each Object Environment Record is associated with an object called its
/// binding object. The record's bindings are the binding object's
/// properties; `with` statements create records whose bindings also honour
/// `@@unscopables`.
#[derive(Debug, Clone)]
pub struct ObjectEnvironmentRecord {
    /// ### \[\[BindingObject]]
    pub(crate) binding_object: Object,

    /// ### \[\[IsWithEnvironment]]
    pub(crate) is_with_environment: bool,

    /// ### \[\[OuterEnv]]
    pub(crate) outer_env: OuterEnv,
}

impl ObjectEnvironmentRecord {
    /// ### [9.1.1.2.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-object-environment-records-hasbinding-n)
    pub(crate) fn has_binding(
        agent: &mut Agent,
        index: ObjectEnvironment,
        name: HeapString,
    ) -> JsResult<bool> {
        let record = agent.heap.environments.get_object(index);
        let binding_object = record.binding_object;
        let is_with_environment = record.is_with_environment;
        let key = PropertyKey::from_heap_string(agent, name);
        // 2. Let foundBinding be ? HasProperty(bindingObject, N).
        let found_binding = has_property(agent, binding_object, key)?;
        // 3. If foundBinding is false, return false.
        if !found_binding {
            return Ok(false);
        }
        // 4. If envRec.[[IsWithEnvironment]] is false, return true.
        if !is_with_environment {
            return Ok(true);
        }
        // 5. Let unscopables be ? Get(bindingObject, @@unscopables).
        let unscopables = get(
            agent,
            binding_object,
            PropertyKey::Symbol(WellKnownSymbolIndexes::Unscopables.into()),
        )?;
        // 6. If unscopables is an Object, then
        if let Value::Object(unscopables) = unscopables {
            // a. Let blocked be ToBoolean(? Get(unscopables, N)).
            let blocked = get(agent, unscopables, key)?;
            // b. If blocked is true, return false.
            if blocked.to_boolean(agent) {
                return Ok(false);
            }
        }
        // 7. Return true.
        Ok(true)
    }

    /// ### [9.1.1.2.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-object-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(
        agent: &mut Agent,
        index: ObjectEnvironment,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        let binding_object = agent.heap.environments.get_object(index).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 1. Perform ? DefinePropertyOrThrow(bindingObject, N,
        //    PropertyDescriptor { [[Value]]: undefined, [[Writable]]: true,
        //    [[Enumerable]]: true, [[Configurable]]: D }).
        define_property_or_throw(
            agent,
            binding_object,
            key,
            PropertyDescriptor {
                value: Some(Value::Undefined),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(is_deletable),
                ..Default::default()
            },
        )
    }

    /// ### [9.1.1.2.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-object-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(
        agent: &mut Agent,
        index: ObjectEnvironment,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        // 1. Perform ? envRec.SetMutableBinding(N, V, false).
        Self::set_mutable_binding(agent, index, name, value, false)
    }

    /// ### [9.1.1.2.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-object-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        agent: &mut Agent,
        index: ObjectEnvironment,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        let binding_object = agent.heap.environments.get_object(index).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 2. Let stillExists be ? HasProperty(bindingObject, N).
        let still_exists = has_property(agent, binding_object, key)?;
        // 3. If stillExists is false and S is true, throw a ReferenceError
        //    exception.
        if !still_exists && is_strict {
            let name = name.as_str(agent).to_owned();
            return Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                format!("{name} is not defined"),
            ));
        }
        // 4. Perform ? Set(bindingObject, N, V, S).
        set(agent, binding_object, key, value, is_strict)
    }

    /// ### [9.1.1.2.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-object-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        agent: &mut Agent,
        index: ObjectEnvironment,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        let binding_object = agent.heap.environments.get_object(index).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 2. Let value be ? HasProperty(bindingObject, N).
        let value = has_property(agent, binding_object, key)?;
        // 3. If value is false, then
        if !value {
            // a. If S is false, return undefined; otherwise throw a
            //    ReferenceError exception.
            if !is_strict {
                return Ok(Value::Undefined);
            }
            let name = name.as_str(agent).to_owned();
            return Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                format!("{name} is not defined"),
            ));
        }
        // 4. Return ? Get(bindingObject, N).
        get(agent, binding_object, key)
    }

    /// ### [9.1.1.2.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-object-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(
        agent: &mut Agent,
        index: ObjectEnvironment,
        name: HeapString,
    ) -> JsResult<bool> {
        let binding_object = agent.heap.environments.get_object(index).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 2. Return ? bindingObject.[[Delete]](N).
        binding_object.internal_delete(agent, key)
    }
}

/// ### [9.1.2.3 NewObjectEnvironment ( O, W, E )](https://tc39.es/ecma262/#sec-newobjectenvironment)
pub fn new_object_environment(
    agent: &mut Agent,
    binding_object: Object,
    is_with_environment: bool,
    outer_env: OuterEnv,
) -> ObjectEnvironment {
    agent.heap.environments.object.push(ObjectEnvironmentRecord {
        binding_object,
        is_with_environment,
        outer_env,
    });
    ObjectEnvironment::last(&agent.heap.environments.object)
}
