// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.5 Proxy Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots)
//!
//! Every internal method calls the matching trap on the handler and then
//! enforces the specified invariants against the target.

use crate::ecmascript::abstract_operations::operations_on_objects::{
    call_function, create_list_from_array_like, get_method,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::same_value;
use crate::ecmascript::abstract_operations::type_conversion::to_property_key;
use crate::ecmascript::builtins::ordinary::validate_and_apply_property_descriptor;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsError, JsResult};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, PropertyDescriptor, PropertyKey, Value,
};

#[derive(Debug, Clone, Copy)]
pub struct ProxyData {
    /// \[\[ProxyTarget]]; `None` after revocation.
    pub target: Option<Object>,
    /// \[\[ProxyHandler]]; `None` after revocation.
    pub handler: Option<Object>,
    /// Whether the target was callable/constructable at creation, kept for
    /// classification after revocation.
    pub is_callable: bool,
    pub is_constructor: bool,
}

/// ### [10.5.15 ProxyCreate ( target, handler )](https://tc39.es/ecma262/#sec-proxycreate)
pub fn proxy_create(agent: &mut Agent, target: Value, handler: Value) -> JsResult<Object> {
    // 1./2. Both target and handler must be objects.
    let (Value::Object(target), Value::Object(handler)) = (target, handler) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot create proxy with a non-object as target or handler",
        ));
    };
    let data = ProxyData {
        target: Some(target),
        handler: Some(handler),
        is_callable: target.is_callable(agent),
        is_constructor: target.is_constructor(agent),
    };
    Ok(agent
        .heap
        .create_object(ObjectHeapData::new(None, ObjectKind::Proxy(data))))
}

pub fn proxy_revoke(agent: &mut Agent, proxy: Object) {
    if let ObjectKind::Proxy(data) = &mut agent[proxy].kind {
        data.target = None;
        data.handler = None;
    }
}

fn revoked_error(agent: &mut Agent) -> JsError {
    agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot perform operation on a revoked proxy",
    )
}

/// Validates the proxy is not revoked and fetches the named trap; returns
/// the (handler, target, trap) triple.
fn validate_and_get_trap(
    agent: &mut Agent,
    proxy: Object,
    name: &str,
) -> JsResult<(Object, Object, Option<Object>)> {
    let ObjectKind::Proxy(data) = &agent[proxy].kind else {
        unreachable!("proxy trap on a non-proxy")
    };
    let (Some(target), Some(handler)) = (data.target, data.handler) else {
        return Err(revoked_error(agent));
    };
    let key = PropertyKey::from_str(agent, name);
    let trap = get_method(agent, handler, key)?;
    Ok((handler, target, trap))
}

fn invariant_error(agent: &mut Agent, message: &'static str) -> JsError {
    agent.throw_exception_with_static_message(ExceptionType::TypeError, message)
}

/// ### [10.5.1 \[\[GetPrototypeOf\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getprototypeof)
pub fn proxy_get_prototype_of(agent: &mut Agent, proxy: Object) -> JsResult<Option<Object>> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "getPrototypeOf")?;
    // 5. If trap is undefined, return ? target.[[GetPrototypeOf]]().
    let Some(trap) = trap else {
        return target.internal_get_prototype_of(agent);
    };
    // 6. Let handlerProto be ? Call(trap, handler, « target »).
    let handler_proto = call_function(agent, trap, Value::Object(handler), &[Value::Object(target)])?;
    // 7. If handlerProto is not an Object and not null, throw a TypeError.
    let handler_proto = match handler_proto {
        Value::Null => None,
        Value::Object(object) => Some(object),
        _ => {
            return Err(invariant_error(
                agent,
                "getPrototypeOf trap must return an object or null",
            ));
        }
    };
    // 8./9. A non-extensible target pins the result.
    if target.internal_is_extensible(agent)? {
        return Ok(handler_proto);
    }
    let target_proto = target.internal_get_prototype_of(agent)?;
    if handler_proto != target_proto {
        return Err(invariant_error(
            agent,
            "getPrototypeOf trap disagrees with a non-extensible target",
        ));
    }
    Ok(handler_proto)
}

/// ### [10.5.2 \[\[SetPrototypeOf\]\] ( V )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-setprototypeof-v)
pub fn proxy_set_prototype_of(
    agent: &mut Agent,
    proxy: Object,
    prototype: Option<Object>,
) -> JsResult<bool> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "setPrototypeOf")?;
    let Some(trap) = trap else {
        return target.internal_set_prototype_of(agent, prototype);
    };
    let prototype_value = prototype.map_or(Value::Null, Value::Object);
    let result = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), prototype_value],
    )?;
    // 8. If booleanTrapResult is false, return false.
    if !result.to_boolean(agent) {
        return Ok(false);
    }
    // 9./10. The pinned-prototype invariant for non-extensible targets.
    if !target.internal_is_extensible(agent)? {
        let target_proto = target.internal_get_prototype_of(agent)?;
        if prototype != target_proto {
            return Err(invariant_error(
                agent,
                "setPrototypeOf trap disagrees with a non-extensible target",
            ));
        }
    }
    Ok(true)
}

/// ### [10.5.3 \[\[IsExtensible\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-isextensible)
pub fn proxy_is_extensible(agent: &mut Agent, proxy: Object) -> JsResult<bool> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "isExtensible")?;
    let Some(trap) = trap else {
        return target.internal_is_extensible(agent);
    };
    let result = call_function(agent, trap, Value::Object(handler), &[Value::Object(target)])?;
    let result = result.to_boolean(agent);
    // 8. The trap must agree with the target.
    if result != target.internal_is_extensible(agent)? {
        return Err(invariant_error(
            agent,
            "isExtensible trap disagrees with target",
        ));
    }
    Ok(result)
}

/// ### [10.5.4 \[\[PreventExtensions\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-preventextensions)
pub fn proxy_prevent_extensions(agent: &mut Agent, proxy: Object) -> JsResult<bool> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "preventExtensions")?;
    let Some(trap) = trap else {
        return target.internal_prevent_extensions(agent);
    };
    let result = call_function(agent, trap, Value::Object(handler), &[Value::Object(target)])?;
    let result = result.to_boolean(agent);
    // 8. A true result requires the target to actually be non-extensible.
    if result && target.internal_is_extensible(agent)? {
        return Err(invariant_error(
            agent,
            "preventExtensions trap returned true for an extensible target",
        ));
    }
    Ok(result)
}

/// ### [10.5.5 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getownproperty-p)
pub fn proxy_get_own_property(
    agent: &mut Agent,
    proxy: Object,
    key: PropertyKey,
) -> JsResult<Option<PropertyDescriptor>> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "getOwnPropertyDescriptor")?;
    let Some(trap) = trap else {
        return target.internal_get_own_property(agent, key);
    };
    let key_value = key.to_value(agent);
    let trap_result = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), key_value],
    )?;
    if !matches!(trap_result, Value::Undefined | Value::Object(_)) {
        return Err(invariant_error(
            agent,
            "getOwnPropertyDescriptor trap must return an object or undefined",
        ));
    }
    let target_descriptor = target.internal_get_own_property(agent, key)?;
    if trap_result.is_undefined() {
        // 11. An undefined result must not hide a non-configurable
        //     property, nor any property of a non-extensible target.
        let Some(target_descriptor) = target_descriptor else {
            return Ok(None);
        };
        if target_descriptor.configurable == Some(false) {
            return Err(invariant_error(
                agent,
                "getOwnPropertyDescriptor trap hid a non-configurable property",
            ));
        }
        if !target.internal_is_extensible(agent)? {
            return Err(invariant_error(
                agent,
                "getOwnPropertyDescriptor trap hid a property of a non-extensible target",
            ));
        }
        return Ok(None);
    }
    // 12.-17. Validate the reported descriptor's compatibility.
    let result_descriptor =
        crate::ecmascript::builtins::fundamental_objects::object_objects::to_property_descriptor(
            agent,
            trap_result,
        )?
        .complete();
    let extensible_target = target.internal_is_extensible(agent)?;
    let valid = validate_and_apply_property_descriptor(
        agent,
        None,
        extensible_target,
        result_descriptor,
        target_descriptor,
    );
    if !valid {
        return Err(invariant_error(
            agent,
            "getOwnPropertyDescriptor trap reported an incompatible descriptor",
        ));
    }
    if result_descriptor.configurable == Some(false)
        && target_descriptor.is_none_or(|descriptor| descriptor.configurable == Some(true))
    {
        return Err(invariant_error(
            agent,
            "getOwnPropertyDescriptor trap reported non-configurable for a configurable property",
        ));
    }
    Ok(Some(result_descriptor))
}

/// ### [10.5.6 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-defineownproperty-p-desc)
pub fn proxy_define_own_property(
    agent: &mut Agent,
    proxy: Object,
    key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "defineProperty")?;
    let Some(trap) = trap else {
        return target.internal_define_own_property(agent, key, descriptor);
    };
    let key_value = key.to_value(agent);
    let descriptor_object =
        crate::ecmascript::builtins::fundamental_objects::object_objects::from_property_descriptor(
            agent, descriptor,
        );
    let result = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), key_value, Value::Object(descriptor_object)],
    )?;
    if !result.to_boolean(agent) {
        return Ok(false);
    }
    // 10.-16. Invariants against the target's current state.
    let target_descriptor = target.internal_get_own_property(agent, key)?;
    let extensible_target = target.internal_is_extensible(agent)?;
    match target_descriptor {
        None => {
            if !extensible_target {
                return Err(invariant_error(
                    agent,
                    "defineProperty trap added a property to a non-extensible target",
                ));
            }
            if descriptor.configurable == Some(false) {
                return Err(invariant_error(
                    agent,
                    "defineProperty trap defined a non-configurable property that does not exist",
                ));
            }
        }
        Some(target_descriptor) => {
            let valid = validate_and_apply_property_descriptor(
                agent,
                None,
                extensible_target,
                descriptor,
                Some(target_descriptor),
            );
            if !valid {
                return Err(invariant_error(
                    agent,
                    "defineProperty trap allowed an incompatible descriptor",
                ));
            }
            if descriptor.configurable == Some(false)
                && target_descriptor.configurable == Some(true)
            {
                return Err(invariant_error(
                    agent,
                    "defineProperty trap reported non-configurable for a configurable property",
                ));
            }
        }
    }
    Ok(true)
}

/// ### [10.5.7 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-hasproperty-p)
pub fn proxy_has_property(agent: &mut Agent, proxy: Object, key: PropertyKey) -> JsResult<bool> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "has")?;
    let Some(trap) = trap else {
        return target.internal_has_property(agent, key);
    };
    let key_value = key.to_value(agent);
    let result = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), key_value],
    )?;
    let result = result.to_boolean(agent);
    // 9. A false result must not hide a non-configurable own property or
    //    any own property of a non-extensible target.
    if !result {
        if let Some(target_descriptor) = target.internal_get_own_property(agent, key)? {
            if target_descriptor.configurable == Some(false) {
                return Err(invariant_error(
                    agent,
                    "has trap hid a non-configurable property",
                ));
            }
            if !target.internal_is_extensible(agent)? {
                return Err(invariant_error(
                    agent,
                    "has trap hid a property of a non-extensible target",
                ));
            }
        }
    }
    Ok(result)
}

/// ### [10.5.8 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-get-p-receiver)
pub fn proxy_get(
    agent: &mut Agent,
    proxy: Object,
    key: PropertyKey,
    receiver: Value,
) -> JsResult<Value> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "get")?;
    let Some(trap) = trap else {
        return target.internal_get(agent, key, receiver);
    };
    let key_value = key.to_value(agent);
    let result = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), key_value, receiver],
    )?;
    // 9.-10. Consistency with non-configurable target properties.
    if let Some(target_descriptor) = target.internal_get_own_property(agent, key)? {
        if target_descriptor.configurable == Some(false) {
            if target_descriptor.is_data_descriptor()
                && target_descriptor.writable == Some(false)
            {
                let target_value = target_descriptor.value.unwrap_or(Value::Undefined);
                if !same_value(agent, result, target_value) {
                    return Err(invariant_error(
                        agent,
                        "get trap disagrees with a non-writable, non-configurable property",
                    ));
                }
            }
            if target_descriptor.is_accessor_descriptor()
                && target_descriptor.get == Some(None)
                && !result.is_undefined()
            {
                return Err(invariant_error(
                    agent,
                    "get trap returned a value for a getter-less accessor",
                ));
            }
        }
    }
    Ok(result)
}

/// ### [10.5.9 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-set-p-v-receiver)
pub fn proxy_set(
    agent: &mut Agent,
    proxy: Object,
    key: PropertyKey,
    value: Value,
    receiver: Value,
) -> JsResult<bool> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "set")?;
    let Some(trap) = trap else {
        return target.internal_set(agent, key, value, receiver);
    };
    let key_value = key.to_value(agent);
    let result = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), key_value, value, receiver],
    )?;
    if !result.to_boolean(agent) {
        return Ok(false);
    }
    // 10.-11. Writes must respect frozen data properties and setter-less
    //    accessors on the target.
    if let Some(target_descriptor) = target.internal_get_own_property(agent, key)? {
        if target_descriptor.configurable == Some(false) {
            if target_descriptor.is_data_descriptor()
                && target_descriptor.writable == Some(false)
            {
                let target_value = target_descriptor.value.unwrap_or(Value::Undefined);
                if !same_value(agent, value, target_value) {
                    return Err(invariant_error(
                        agent,
                        "set trap changed a non-writable, non-configurable property",
                    ));
                }
            }
            if target_descriptor.is_accessor_descriptor() && target_descriptor.set == Some(None)
            {
                return Err(invariant_error(
                    agent,
                    "set trap succeeded for a setter-less accessor",
                ));
            }
        }
    }
    Ok(true)
}

/// ### [10.5.10 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-delete-p)
pub fn proxy_delete(agent: &mut Agent, proxy: Object, key: PropertyKey) -> JsResult<bool> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "deleteProperty")?;
    let Some(trap) = trap else {
        return target.internal_delete(agent, key);
    };
    let key_value = key.to_value(agent);
    let result = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), key_value],
    )?;
    if !result.to_boolean(agent) {
        return Ok(false);
    }
    // 10.-13. Deletion must not claim success for non-configurable
    //    properties or on a non-extensible target's property.
    let Some(target_descriptor) = target.internal_get_own_property(agent, key)? else {
        return Ok(true);
    };
    if target_descriptor.configurable == Some(false) {
        return Err(invariant_error(
            agent,
            "deleteProperty trap deleted a non-configurable property",
        ));
    }
    if !target.internal_is_extensible(agent)? {
        return Err(invariant_error(
            agent,
            "deleteProperty trap deleted a property of a non-extensible target",
        ));
    }
    Ok(true)
}

/// ### [10.5.11 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-ownpropertykeys)
pub fn proxy_own_property_keys(agent: &mut Agent, proxy: Object) -> JsResult<Vec<PropertyKey>> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "ownKeys")?;
    let Some(trap) = trap else {
        return target.internal_own_property_keys(agent);
    };
    let trap_result = call_function(agent, trap, Value::Object(handler), &[Value::Object(target)])?;
    // 7. Let trapResultArray be ? CreateListFromArrayLike(trapResult,
    //    property-key).
    let trap_values = create_list_from_array_like(agent, trap_result)?;
    let mut keys: Vec<PropertyKey> = Vec::with_capacity(trap_values.len());
    let mut seen: hashbrown::HashSet<PropertyKey> = hashbrown::HashSet::new();
    for value in trap_values {
        if !value.is_property_key() {
            return Err(invariant_error(
                agent,
                "ownKeys trap returned a non-property-key entry",
            ));
        }
        let key = to_property_key(agent, value)?;
        // 8. Duplicate entries are rejected.
        if !seen.insert(key) {
            return Err(invariant_error(
                agent,
                "ownKeys trap returned duplicate entries",
            ));
        }
        keys.push(key);
    }
    // 9.-23. Completeness checks for non-configurable keys and
    //    non-extensible targets.
    let extensible_target = target.internal_is_extensible(agent)?;
    let target_keys = target.internal_own_property_keys(agent)?;
    let mut target_configurable_keys = Vec::new();
    let mut target_nonconfigurable_keys = Vec::new();
    for key in target_keys {
        let descriptor = target.internal_get_own_property(agent, key)?;
        if descriptor.is_some_and(|descriptor| descriptor.configurable == Some(false)) {
            target_nonconfigurable_keys.push(key);
        } else {
            target_configurable_keys.push(key);
        }
    }
    for key in &target_nonconfigurable_keys {
        if !keys.contains(key) {
            return Err(invariant_error(
                agent,
                "ownKeys trap omitted a non-configurable key",
            ));
        }
    }
    if extensible_target {
        return Ok(keys);
    }
    for key in &target_configurable_keys {
        if !keys.contains(key) {
            return Err(invariant_error(
                agent,
                "ownKeys trap omitted a key of a non-extensible target",
            ));
        }
    }
    let target_key_count = target_configurable_keys.len() + target_nonconfigurable_keys.len();
    if keys.len() != target_key_count {
        return Err(invariant_error(
            agent,
            "ownKeys trap invented keys on a non-extensible target",
        ));
    }
    Ok(keys)
}

/// ### [10.5.12 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-call-thisargument-argumentslist)
pub fn proxy_call(
    agent: &mut Agent,
    proxy: Object,
    this_argument: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "apply")?;
    let Some(trap) = trap else {
        return target.internal_call(agent, this_argument, arguments);
    };
    // 7. Let argArray be CreateArrayFromList(argumentsList).
    let arg_array =
        crate::ecmascript::abstract_operations::operations_on_objects::create_array_from_list(
            agent,
            arguments.0,
        );
    // 8. Return ? Call(trap, handler, « target, thisArgument, argArray »).
    call_function(
        agent,
        trap,
        Value::Object(handler),
        &[Value::Object(target), this_argument, Value::Object(arg_array)],
    )
}

/// ### [10.5.13 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-construct-argumentslist-newtarget)
pub fn proxy_construct(
    agent: &mut Agent,
    proxy: Object,
    arguments: ArgumentsList,
    new_target: Object,
) -> JsResult<Object> {
    let (handler, target, trap) = validate_and_get_trap(agent, proxy, "construct")?;
    let Some(trap) = trap else {
        return target.internal_construct(agent, arguments, new_target);
    };
    let arg_array =
        crate::ecmascript::abstract_operations::operations_on_objects::create_array_from_list(
            agent,
            arguments.0,
        );
    let result = call_function(
        agent,
        trap,
        Value::Object(handler),
        &[
            Value::Object(target),
            Value::Object(arg_array),
            Value::Object(new_target),
        ],
    )?;
    // 10. If newObj is not an Object, throw a TypeError exception.
    let Value::Object(result) = result else {
        return Err(invariant_error(
            agent,
            "construct trap must return an object",
        ));
    };
    Ok(result)
}
