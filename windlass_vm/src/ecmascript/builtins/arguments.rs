// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.4 Arguments Exotic Objects](https://tc39.es/ecma262/#sec-arguments-exotic-objects)
//!
//! A mapped arguments object keeps its index properties linked to the
//! function-scope bindings of the simple formal parameters; the unmapped
//! variant is an ordinary object with a poisoned `callee`.

use crate::ecmascript::builtins::ordinary::{
    ordinary_define_own_property, ordinary_delete, ordinary_get_own_property,
};
use crate::ecmascript::execution::{Agent, FunctionEnvironment, JsResult};
use crate::ecmascript::types::{
    HeapString, Object, ObjectKind, Property, PropertyDescriptor, PropertyKey, PropertyValue,
    Value,
};
use crate::heap::WellKnownSymbolIndexes;

/// The \[\[ParameterMap]] of a mapped arguments object: index → linked
/// function-environment binding.
#[derive(Debug, Clone)]
pub struct ParameterMap {
    pub(crate) environment: FunctionEnvironment,
    pub(crate) slots: Vec<Option<HeapString>>,
}

impl ParameterMap {
    fn mapped_name(&self, key: PropertyKey) -> Option<HeapString> {
        match key {
            PropertyKey::Index(index) => self.slots.get(index as usize).copied().flatten(),
            _ => None,
        }
    }
}

/// ### [10.4.4.6 CreateUnmappedArgumentsObject ( argumentsList )](https://tc39.es/ecma262/#sec-createunmappedargumentsobject)
pub fn create_unmapped_arguments_object(agent: &mut Agent, arguments: &[Value]) -> Object {
    // 2. Let obj be OrdinaryObjectCreate(%Object.prototype%, «
    //    [[ParameterMap]] »).
    let prototype = agent.current_realm().intrinsics.object_prototype();
    let object = agent.heap.create_object(crate::ecmascript::types::ObjectHeapData::new(
        Some(prototype),
        ObjectKind::ArgumentsUnmapped,
    ));
    // 4. Perform ! DefinePropertyOrThrow(obj, "length", ...).
    define_common_properties(agent, object, arguments);
    // 7. Perform ! DefinePropertyOrThrow(obj, "callee", PropertyDescriptor
    //    { [[Get]]: %ThrowTypeError%, [[Set]]: %ThrowTypeError%,
    //    [[Enumerable]]: false, [[Configurable]]: false }).
    let throw_type_error = agent.current_realm().intrinsics.throw_type_error();
    let callee_key = PropertyKey::from_str(agent, "callee");
    agent[object].properties.set(
        callee_key,
        Property {
            enumerable: false,
            configurable: false,
            value: PropertyValue::Accessor {
                get: Some(throw_type_error),
                set: Some(throw_type_error),
            },
        },
    );
    object
}

/// ### [10.4.4.7 CreateMappedArgumentsObject ( func, formals, argumentsList, env )](https://tc39.es/ecma262/#sec-createmappedargumentsobject)
///
/// `mapped_names` carries, per argument index, the simple parameter name
/// bound at that position (when any).
pub fn create_mapped_arguments_object(
    agent: &mut Agent,
    function: Object,
    mapped_names: Vec<Option<HeapString>>,
    arguments: &[Value],
    environment: FunctionEnvironment,
) -> Object {
    let prototype = agent.current_realm().intrinsics.object_prototype();
    let map = ParameterMap {
        environment,
        slots: mapped_names,
    };
    let object = agent.heap.create_object(crate::ecmascript::types::ObjectHeapData::new(
        Some(prototype),
        ObjectKind::ArgumentsMapped(Box::new(map)),
    ));
    define_common_properties(agent, object, arguments);
    // 21. Perform ! DefinePropertyOrThrow(obj, "callee", PropertyDescriptor
    //     { [[Value]]: func, [[Writable]]: true, [[Enumerable]]: false,
    //     [[Configurable]]: true }).
    let callee_key = PropertyKey::from_str(agent, "callee");
    agent[object].properties.set(
        callee_key,
        Property::data(Value::Object(function), true, false, true),
    );
    object
}

fn define_common_properties(agent: &mut Agent, object: Object, arguments: &[Value]) {
    // Index properties from the actual argument values.
    for (index, value) in arguments.iter().enumerate() {
        agent[object].properties.set(
            PropertyKey::Index(index as u32),
            Property::data(*value, true, true, true),
        );
    }
    // "length" is non-enumerable but writable and configurable.
    let length_key = PropertyKey::from_str(agent, "length");
    agent[object].properties.set(
        length_key,
        Property::data(Value::Number(arguments.len() as f64), true, false, true),
    );
    // @@iterator is %Array.prototype.values%.
    let values = agent.intrinsic("%Array.prototype.values%");
    agent[object].properties.set(
        PropertyKey::Symbol(WellKnownSymbolIndexes::Iterator.into()),
        Property::data(Value::Object(values), true, false, true),
    );
}

fn parameter_map(agent: &Agent, object: Object) -> &ParameterMap {
    match &agent[object].kind {
        ObjectKind::ArgumentsMapped(map) => map,
        _ => unreachable!("mapped arguments methods on a non-arguments object"),
    }
}

fn get_mapped_binding(agent: &Agent, environment: FunctionEnvironment, name: HeapString) -> Value {
    agent
        .heap
        .environments
        .get_function(environment)
        .declarative
        .get_binding_value(name)
        .unwrap_or(Value::Undefined)
}

/// ### [10.4.4.1 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-arguments-exotic-objects-getownproperty-p)
pub fn mapped_arguments_get_own_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> Option<PropertyDescriptor> {
    // 1. Let desc be OrdinaryGetOwnProperty(args, P).
    let mut descriptor = ordinary_get_own_property(agent, object, key)?;
    // 3. Let map be args.[[ParameterMap]].
    let map = parameter_map(agent, object);
    // 4. If ! HasOwnProperty(map, P) is true, set desc.[[Value]] to
    //    ! Get(map, P).
    if let Some(name) = map.mapped_name(key) {
        let environment = map.environment;
        descriptor.value = Some(get_mapped_binding(agent, environment, name));
    }
    // 5. Return desc.
    Some(descriptor)
}

/// ### [10.4.4.2 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-arguments-exotic-objects-defineownproperty-p-desc)
pub fn mapped_arguments_define_own_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    let map = parameter_map(agent, object);
    let mapped_name = map.mapped_name(key);
    let environment = map.environment;
    // 3. Let newArgDesc be Desc; 4. when redefining a mapped data property
    //    without a value, keep the mapped value.
    let mut new_descriptor = descriptor;
    if mapped_name.is_some()
        && descriptor.is_data_descriptor()
        && descriptor.value.is_none()
        && descriptor.writable == Some(false)
    {
        new_descriptor.value = Some(get_mapped_binding(agent, environment, mapped_name.unwrap()));
    }
    // 5. Let allowed be ! OrdinaryDefineOwnProperty(args, P, newArgDesc).
    let allowed = ordinary_define_own_property(agent, object, key, new_descriptor)?;
    // 6. If allowed is false, return false.
    if !allowed {
        return Ok(false);
    }
    // 7. If ! HasOwnProperty(map, P) is true, then
    if let Some(name) = mapped_name {
        if descriptor.is_accessor_descriptor() {
            // a. Accessor redefinition severs the mapping.
            remove_mapping(agent, object, key);
        } else {
            // b.i. If Desc has a [[Value]] field, write it through to the
            //      linked binding.
            if let Some(value) = descriptor.value {
                agent
                    .heap
                    .environments
                    .get_function_mut(environment)
                    .declarative
                    .get_binding_mut(name)
                    .unwrap()
                    .value = Some(value);
            }
            // b.ii. If Desc.[[Writable]] is false, sever the mapping.
            if descriptor.writable == Some(false) {
                remove_mapping(agent, object, key);
            }
        }
    }
    // 8. Return true.
    Ok(true)
}

/// ### [10.4.4.5 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-arguments-exotic-objects-delete-p)
pub fn mapped_arguments_delete(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> JsResult<bool> {
    let is_mapped = parameter_map(agent, object).mapped_name(key).is_some();
    // 3. Let result be ? OrdinaryDelete(args, P).
    let result = ordinary_delete(agent, object, key)?;
    // 4. If result is true and isMapped is true, delete the mapping.
    if result && is_mapped {
        remove_mapping(agent, object, key);
    }
    // 5. Return result.
    Ok(result)
}

fn remove_mapping(agent: &mut Agent, object: Object, key: PropertyKey) {
    let PropertyKey::Index(index) = key else {
        return;
    };
    if let ObjectKind::ArgumentsMapped(map) = &mut agent[object].kind {
        if let Some(slot) = map.slots.get_mut(index as usize) {
            *slot = None;
        }
    }
}
