// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.1 Ordinary Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots)

use crate::ecmascript::abstract_operations::operations_on_objects::get;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, ProtoIntrinsics};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, Property, PropertyDescriptor, PropertyKey, PropertyValue,
    Value,
};

/// ### [10.1.1.1 OrdinaryGetPrototypeOf ( O )](https://tc39.es/ecma262/#sec-ordinarygetprototypeof)
pub fn ordinary_get_prototype_of(agent: &Agent, object: Object) -> Option<Object> {
    // 1. Return O.[[Prototype]].
    agent[object].prototype
}

/// ### [10.1.2.1 OrdinarySetPrototypeOf ( O, V )](https://tc39.es/ecma262/#sec-ordinarysetprototypeof)
pub fn ordinary_set_prototype_of(
    agent: &mut Agent,
    object: Object,
    prototype: Option<Object>,
) -> bool {
    // 1. Let current be O.[[Prototype]].
    let current = agent[object].prototype;
    // 2. If SameValue(V, current) is true, return true.
    if prototype == current {
        return true;
    }
    // 3. Let extensible be O.[[Extensible]].
    // 4. If extensible is false, return false.
    if !agent[object].extensible {
        return false;
    }
    // 5.-8. Walk the new prototype chain; reject cycles. The walk stops at
    //    a non-ordinary [[GetPrototypeOf]] (a proxy may run user code).
    let mut p = prototype;
    while let Some(parent) = p {
        if parent == object {
            // b.i. Return false: a cycle would form.
            return false;
        }
        if matches!(agent[parent].kind, ObjectKind::Proxy(_)) {
            break;
        }
        p = agent[parent].prototype;
    }
    // 9. Set O.[[Prototype]] to V.
    agent[object].prototype = prototype;
    // 10. Return true.
    true
}

/// ### [10.1.3.1 OrdinaryIsExtensible ( O )](https://tc39.es/ecma262/#sec-ordinaryisextensible)
pub fn ordinary_is_extensible(agent: &Agent, object: Object) -> bool {
    // 1. Return O.[[Extensible]].
    agent[object].extensible
}

/// ### [10.1.4.1 OrdinaryPreventExtensions ( O )](https://tc39.es/ecma262/#sec-ordinarypreventextensions)
pub fn ordinary_prevent_extensions(agent: &mut Agent, object: Object) -> bool {
    // 1. Set O.[[Extensible]] to false.
    agent[object].extensible = false;
    // 2. Return true.
    true
}

/// ### [10.1.5.1 OrdinaryGetOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinarygetownproperty)
pub fn ordinary_get_own_property(
    agent: &Agent,
    object: Object,
    key: PropertyKey,
) -> Option<PropertyDescriptor> {
    // 1. If O does not have an own property with key P, return undefined.
    // 2.-9. Return a fully populated descriptor of the property.
    agent[object]
        .properties
        .get(key)
        .map(|property| property.descriptor())
}

/// ### [10.1.6.1 OrdinaryDefineOwnProperty ( O, P, Desc )](https://tc39.es/ecma262/#sec-ordinarydefineownproperty)
pub fn ordinary_define_own_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    // 1. Let current be ? O.[[GetOwnProperty]](P).
    let current = ordinary_get_own_property(agent, object, key);
    // 2. Let extensible be ? IsExtensible(O).
    let extensible = agent[object].extensible;
    // 3. Return ValidateAndApplyPropertyDescriptor(O, P, extensible, Desc,
    //    current).
    Ok(validate_and_apply_property_descriptor(
        agent,
        Some((object, key)),
        extensible,
        descriptor,
        current,
    ))
}

/// ### [10.1.6.3 ValidateAndApplyPropertyDescriptor ( O, P, extensible, Desc, current )](https://tc39.es/ecma262/#sec-validateandapplypropertydescriptor)
///
/// The compatibility table: any change on configurable properties, only
/// attribute-preserving changes on non-configurable ones. When `target` is
/// `None` only validation is performed.
pub fn validate_and_apply_property_descriptor(
    agent: &mut Agent,
    target: Option<(Object, PropertyKey)>,
    extensible: bool,
    descriptor: PropertyDescriptor,
    current: Option<PropertyDescriptor>,
) -> bool {
    // 2. If current is undefined, then
    let Some(current) = current else {
        // a. If extensible is false, return false.
        if !extensible {
            return false;
        }
        // c. If O is not undefined, create the property.
        if let Some((object, key)) = target {
            let property = Property::from_descriptor(descriptor);
            agent[object].properties.set(key, property);
        }
        // d. Return true.
        return true;
    };

    // 3. Assert: current is a fully populated Property Descriptor.
    // 4. If Desc does not have any fields, return true.
    if descriptor == PropertyDescriptor::default() {
        return true;
    }

    // 5. If current.[[Configurable]] is false, then
    if current.configurable == Some(false) {
        // a. If Desc has a [[Configurable]] field and
        //    Desc.[[Configurable]] is true, return false.
        if descriptor.configurable == Some(true) {
            return false;
        }
        // b. If Desc has an [[Enumerable]] field and the fields differ,
        //    return false.
        if let Some(enumerable) = descriptor.enumerable {
            if Some(enumerable) != current.enumerable {
                return false;
            }
        }
        // c. If IsGenericDescriptor(Desc) is false and the descriptor
        //    kinds differ, return false.
        if !descriptor.is_generic_descriptor()
            && descriptor.is_accessor_descriptor() != current.is_accessor_descriptor()
        {
            return false;
        }
        // d. If current is an accessor descriptor, the functions must be
        //    preserved.
        if current.is_accessor_descriptor() {
            if let Some(get) = descriptor.get {
                if Some(get) != current.get {
                    return false;
                }
            }
            if let Some(set) = descriptor.set {
                if Some(set) != current.set {
                    return false;
                }
            }
        } else if current.writable == Some(false) {
            // e. Else if current.[[Writable]] is false, then
            // i. If Desc has a [[Writable]] field and Desc.[[Writable]] is
            //    true, return false.
            if descriptor.writable == Some(true) {
                return false;
            }
            // ii. A non-writable value may not change.
            if let Some(value) = descriptor.value {
                let current_value = current.value.unwrap();
                if !crate::ecmascript::abstract_operations::testing_and_comparison::same_value(
                    agent,
                    value,
                    current_value,
                ) {
                    return false;
                }
            }
        }
    }

    // 6. If O is not undefined, apply the changes.
    if let Some((object, key)) = target {
        let is_accessor_change =
            descriptor.is_accessor_descriptor() != current.is_accessor_descriptor();
        let property = agent[object].properties.get_mut(key).unwrap();
        if is_accessor_change && descriptor.is_accessor_descriptor() {
            // a. Data -> accessor conversion keeps the shared attributes.
            property.value = PropertyValue::Accessor {
                get: descriptor.get.flatten(),
                set: descriptor.set.flatten(),
            };
        } else if is_accessor_change {
            // b. Accessor -> data conversion.
            property.value = PropertyValue::Data {
                value: descriptor.value.unwrap_or(Value::Undefined),
                writable: descriptor.writable.unwrap_or(false),
            };
        } else {
            // c. Apply each present field of Desc.
            match &mut property.value {
                PropertyValue::Data { value, writable } => {
                    if let Some(new_value) = descriptor.value {
                        *value = new_value;
                    }
                    if let Some(new_writable) = descriptor.writable {
                        *writable = new_writable;
                    }
                }
                PropertyValue::Accessor { get, set } => {
                    if let Some(new_get) = descriptor.get {
                        *get = new_get;
                    }
                    if let Some(new_set) = descriptor.set {
                        *set = new_set;
                    }
                }
            }
        }
        if let Some(enumerable) = descriptor.enumerable {
            property.enumerable = enumerable;
        }
        if let Some(configurable) = descriptor.configurable {
            property.configurable = configurable;
        }
    }

    // 7. Return true.
    true
}

/// ### [10.1.7.1 OrdinaryHasProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinaryhasproperty)
pub fn ordinary_has_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> JsResult<bool> {
    // 1. Let hasOwn be ? O.[[GetOwnProperty]](P).
    let has_own = object.internal_get_own_property(agent, key)?;
    // 2. If hasOwn is not undefined, return true.
    if has_own.is_some() {
        return Ok(true);
    }
    // 3. Let parent be ? O.[[GetPrototypeOf]]().
    let parent = object.internal_get_prototype_of(agent)?;
    // 4. If parent is not null, return ? parent.[[HasProperty]](P).
    if let Some(parent) = parent {
        return parent.internal_has_property(agent, key);
    }
    // 5. Return false.
    Ok(false)
}

/// ### [10.1.8.1 OrdinaryGet ( O, P, Receiver )](https://tc39.es/ecma262/#sec-ordinaryget)
///
/// Walks the prototype chain until a data property is found (returned) or
/// an accessor is found (invoked with the original receiver).
pub fn ordinary_get(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    receiver: Value,
) -> JsResult<Value> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let descriptor = object.internal_get_own_property(agent, key)?;
    // 2. If desc is undefined, then
    let Some(descriptor) = descriptor else {
        // a. Let parent be ? O.[[GetPrototypeOf]]().
        let Some(parent) = object.internal_get_prototype_of(agent)? else {
            // b. If parent is null, return undefined.
            return Ok(Value::Undefined);
        };
        // c. Return ? parent.[[Get]](P, Receiver).
        return parent.internal_get(agent, key, receiver);
    };
    // 3. If IsDataDescriptor(desc) is true, return desc.[[Value]].
    if descriptor.is_data_descriptor() {
        return Ok(descriptor.value.unwrap_or(Value::Undefined));
    }
    // 4. Assert: IsAccessorDescriptor(desc) is true.
    // 5. Let getter be desc.[[Get]].
    // 6. If getter is undefined, return undefined.
    let Some(Some(getter)) = descriptor.get else {
        return Ok(Value::Undefined);
    };
    // 7. Return ? Call(getter, Receiver).
    getter.internal_call(agent, receiver, crate::ecmascript::builtins::ArgumentsList(&[]))
}

/// ### [10.1.9.1 OrdinarySet ( O, P, V, Receiver )](https://tc39.es/ecma262/#sec-ordinaryset)
pub fn ordinary_set(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    value: Value,
    receiver: Value,
) -> JsResult<bool> {
    // 1. Let ownDesc be ? O.[[GetOwnProperty]](P).
    let own_descriptor = object.internal_get_own_property(agent, key)?;
    // 2. Return ? OrdinarySetWithOwnDescriptor(O, P, V, Receiver, ownDesc).
    ordinary_set_with_own_descriptor(agent, object, key, value, receiver, own_descriptor)
}

/// ### [10.1.9.2 OrdinarySetWithOwnDescriptor ( O, P, V, Receiver, ownDesc )](https://tc39.es/ecma262/#sec-ordinarysetwithowndescriptor)
pub fn ordinary_set_with_own_descriptor(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    value: Value,
    receiver: Value,
    own_descriptor: Option<PropertyDescriptor>,
) -> JsResult<bool> {
    // 1. If ownDesc is undefined, then
    let own_descriptor = match own_descriptor {
        None => {
            // a. Let parent be ? O.[[GetPrototypeOf]]().
            if let Some(parent) = object.internal_get_prototype_of(agent)? {
                // b. If parent is not null, return
                //    ? parent.[[Set]](P, V, Receiver).
                return parent.internal_set(agent, key, value, receiver);
            }
            // c. Else: treat the property as a fresh writable data
            //    property.
            PropertyDescriptor {
                value: Some(Value::Undefined),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(true),
                ..Default::default()
            }
        }
        Some(descriptor) => descriptor,
    };

    // 2. If IsDataDescriptor(ownDesc) is true, then
    if own_descriptor.is_data_descriptor() {
        // a. If ownDesc.[[Writable]] is false, return false.
        if own_descriptor.writable == Some(false) {
            return Ok(false);
        }
        // b. If Receiver is not an Object, return false.
        let Value::Object(receiver_object) = receiver else {
            return Ok(false);
        };
        // c. Let existingDescriptor be ? Receiver.[[GetOwnProperty]](P).
        let existing = receiver_object.internal_get_own_property(agent, key)?;
        // d. If existingDescriptor is not undefined, then
        if let Some(existing) = existing {
            // i. If IsAccessorDescriptor(existingDescriptor) is true,
            //    return false.
            if existing.is_accessor_descriptor() {
                return Ok(false);
            }
            // ii. If existingDescriptor.[[Writable]] is false, return
            //     false.
            if existing.writable == Some(false) {
                return Ok(false);
            }
            // iii. Perform ? Receiver.[[DefineOwnProperty]](P,
            //      { [[Value]]: V }).
            let value_descriptor = PropertyDescriptor {
                value: Some(value),
                ..Default::default()
            };
            return receiver_object.internal_define_own_property(agent, key, value_descriptor);
        }
        // e. Else: Receiver does not currently have a property P; create
        //    one.
        return crate::ecmascript::abstract_operations::operations_on_objects::create_data_property(
            agent,
            receiver_object,
            key,
            value,
        );
    }

    // 3. Assert: IsAccessorDescriptor(ownDesc) is true.
    // 4. Let setter be ownDesc.[[Set]].
    let Some(Some(setter)) = own_descriptor.set else {
        // 5. If setter is undefined, return false.
        return Ok(false);
    };
    // 6. Perform ? Call(setter, Receiver, « V »).
    setter.internal_call(
        agent,
        receiver,
        crate::ecmascript::builtins::ArgumentsList(&[value]),
    )?;
    // 7. Return true.
    Ok(true)
}

/// ### [10.1.10.1 OrdinaryDelete ( O, P )](https://tc39.es/ecma262/#sec-ordinarydelete)
pub fn ordinary_delete(agent: &mut Agent, object: Object, key: PropertyKey) -> JsResult<bool> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let descriptor = object.internal_get_own_property(agent, key)?;
    // 2. If desc is undefined, return true.
    let Some(descriptor) = descriptor else {
        return Ok(true);
    };
    // 3. If desc.[[Configurable]] is true, remove the property and return
    //    true.
    if descriptor.configurable == Some(true) {
        agent[object].properties.remove(key);
        return Ok(true);
    }
    // 4. Return false.
    Ok(false)
}

/// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
pub fn ordinary_own_property_keys(agent: &Agent, object: Object) -> Vec<PropertyKey> {
    agent[object].properties.ordered_keys()
}

/// ### [10.1.12 OrdinaryObjectCreate ( proto \[ , additionalInternalSlotsList \] )](https://tc39.es/ecma262/#sec-ordinaryobjectcreate)
pub fn ordinary_object_create(agent: &mut Agent, prototype: Option<Object>) -> Object {
    agent
        .heap
        .create_object(ObjectHeapData::new(prototype, ObjectKind::Ordinary))
}

/// The slot-carrying variant of [`ordinary_object_create`] used by exotic
/// factories.
pub fn object_create_with_kind(
    agent: &mut Agent,
    prototype: Option<Object>,
    kind: ObjectKind,
) -> Object {
    agent.heap.create_object(ObjectHeapData::new(prototype, kind))
}

/// ### [10.1.13 OrdinaryCreateFromConstructor ( constructor, intrinsicDefaultProto \[ , internalSlotsList \] )](https://tc39.es/ecma262/#sec-ordinarycreatefromconstructor)
pub fn ordinary_create_from_constructor(
    agent: &mut Agent,
    constructor: Object,
    intrinsic_default_proto: ProtoIntrinsics,
    kind: ObjectKind,
) -> JsResult<Object> {
    // 2. Let proto be ? GetPrototypeFromConstructor(constructor,
    //    intrinsicDefaultProto).
    let prototype = get_prototype_from_constructor(agent, constructor, intrinsic_default_proto)?;
    // 3. Return OrdinaryObjectCreate(proto, internalSlotsList).
    Ok(object_create_with_kind(agent, Some(prototype), kind))
}

/// ### [10.1.14 GetPrototypeFromConstructor ( constructor, intrinsicDefaultProto )](https://tc39.es/ecma262/#sec-getprototypefromconstructor)
pub fn get_prototype_from_constructor(
    agent: &mut Agent,
    constructor: Object,
    intrinsic_default_proto: ProtoIntrinsics,
) -> JsResult<Object> {
    // 2. Let proto be ? Get(constructor, "prototype").
    let key = PropertyKey::from_str(agent, "prototype");
    let proto = get(agent, constructor, key)?;
    match proto {
        Value::Object(proto) => Ok(proto),
        _ => {
            // 3. If proto is not an Object: use the constructor's realm's
            //    intrinsic default.
            let realm = crate::ecmascript::abstract_operations::operations_on_objects::get_function_realm(
                agent,
                constructor,
            )?;
            Ok(agent
                .get_realm(realm)
                .intrinsics
                .get(intrinsic_default_proto.intrinsic_name()))
        }
    }
}

/// Throws the standard "not an object" TypeError with the value rendered
/// into the message.
pub fn require_internal_slot_error(agent: &mut Agent, what: &'static str) -> crate::ecmascript::execution::JsError {
    agent.throw_exception(
        ExceptionType::TypeError,
        format!("Method called on incompatible receiver, expected {what}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::{Agent, DefaultHostHooks, Options};

    fn test_agent_with_context() -> Agent {
        let mut agent = Agent::new(Options::default(), &DefaultHostHooks);
        crate::ecmascript::execution::initialize_default_realm(&mut agent);
        agent
    }

    #[test]
    fn non_configurable_property_rules() {
        let mut agent = test_agent_with_context();
        let object = ordinary_object_create(&mut agent, None);
        let key = PropertyKey::from_str(&mut agent, "x");
        let one = Value::Number(1.0);
        let two = Value::Number(2.0);

        // Define a non-configurable, non-writable data property.
        let descriptor = PropertyDescriptor {
            value: Some(one),
            writable: Some(false),
            enumerable: Some(true),
            configurable: Some(false),
            ..Default::default()
        };
        assert!(ordinary_define_own_property(&mut agent, object, key, descriptor).unwrap());

        // Redefining with the same attributes succeeds.
        assert!(ordinary_define_own_property(&mut agent, object, key, descriptor).unwrap());
        // Changing the value of a non-writable property fails.
        let change_value = PropertyDescriptor {
            value: Some(two),
            ..Default::default()
        };
        assert!(!ordinary_define_own_property(&mut agent, object, key, change_value).unwrap());
        // Flipping writable from false to true fails.
        let make_writable = PropertyDescriptor {
            writable: Some(true),
            ..Default::default()
        };
        assert!(!ordinary_define_own_property(&mut agent, object, key, make_writable).unwrap());
        // Switching to an accessor fails.
        let to_accessor = PropertyDescriptor {
            get: Some(None),
            ..Default::default()
        };
        assert!(!ordinary_define_own_property(&mut agent, object, key, to_accessor).unwrap());
    }

    #[test]
    fn prevent_extensions_blocks_new_keys() {
        let mut agent = test_agent_with_context();
        let object = ordinary_object_create(&mut agent, None);
        ordinary_prevent_extensions(&mut agent, object);
        let key = PropertyKey::from_str(&mut agent, "fresh");
        let descriptor = PropertyDescriptor::new_data_descriptor(Value::Null);
        assert!(!ordinary_define_own_property(&mut agent, object, key, descriptor).unwrap());
    }

    #[test]
    fn set_prototype_rejects_cycles() {
        let mut agent = test_agent_with_context();
        let a = ordinary_object_create(&mut agent, None);
        let b = ordinary_object_create(&mut agent, Some(a));
        assert!(!ordinary_set_prototype_of(&mut agent, a, Some(b)));
        assert!(ordinary_set_prototype_of(&mut agent, b, None));
    }
}
