// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.3 String Exotic Objects](https://tc39.es/ecma262/#sec-string-exotic-objects)
//!
//! Numeric indexes 0..len-1 are virtual read-only character properties and
//! `length` is non-writable.

use crate::ecmascript::builtins::ordinary::{
    ordinary_define_own_property, ordinary_get_own_property,
};
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::{
    HeapString, Object, ObjectHeapData, ObjectKind, PropertyDescriptor, PropertyKey, Value,
};

/// ### [10.4.3.4 StringCreate ( value, prototype )](https://tc39.es/ecma262/#sec-stringcreate)
pub fn string_create(agent: &mut Agent, value: HeapString, prototype: Option<Object>) -> Object {
    // 1.-8. Create the exotic object with [[StringData]] set to value.
    let object = agent.heap.create_object(ObjectHeapData::new(
        prototype,
        ObjectKind::StringObject { value },
    ));
    // 9. Let length be the length of value.
    let length = value.utf16_len(agent);
    // 10. Perform ! DefinePropertyOrThrow(S, "length", PropertyDescriptor {
    //     [[Value]]: 𝔽(length), [[Writable]]: false, [[Enumerable]]: false,
    //     [[Configurable]]: false }).
    let length_key = PropertyKey::from_str(agent, "length");
    ordinary_define_own_property(
        agent,
        object,
        length_key,
        PropertyDescriptor {
            value: Some(Value::Number(length as f64)),
            writable: Some(false),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        },
    )
    .unwrap();
    // 11. Return S.
    object
}

fn boxed_string(agent: &Agent, object: Object) -> HeapString {
    match &agent[object].kind {
        ObjectKind::StringObject { value } => *value,
        _ => unreachable!("string exotic methods on a non-string object"),
    }
}

/// ### [10.4.3.5 StringGetOwnProperty ( S, P )](https://tc39.es/ecma262/#sec-stringgetownproperty)
fn string_get_own_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> Option<PropertyDescriptor> {
    // 2. If P is not a String, return undefined.
    let PropertyKey::Index(index) = key else {
        return None;
    };
    let string = boxed_string(agent, object);
    // 7. Let str be S.[[StringData]]; 9. If len ≤ index, return undefined.
    let unit = string.utf16_char_at(agent, index as usize)?;
    // 10. Let resultStr be the substring of str from index to index + 1.
    let result = std::string::String::from_utf16_lossy(&[unit]);
    let result = Value::from_string(agent, result);
    // 11. Return the PropertyDescriptor { [[Value]]: resultStr,
    //     [[Writable]]: false, [[Enumerable]]: true,
    //     [[Configurable]]: false }.
    Some(PropertyDescriptor {
        value: Some(result),
        writable: Some(false),
        enumerable: Some(true),
        configurable: Some(false),
        ..Default::default()
    })
}

/// ### [10.4.3.1 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-string-exotic-objects-getownproperty-p)
pub fn string_exotic_get_own_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> Option<PropertyDescriptor> {
    // 1. Let desc be OrdinaryGetOwnProperty(S, P).
    // 2. If desc is not undefined, return desc.
    if let Some(descriptor) = ordinary_get_own_property(agent, object, key) {
        return Some(descriptor);
    }
    // 3. Return StringGetOwnProperty(S, P).
    string_get_own_property(agent, object, key)
}

/// ### [10.4.3.2 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-string-exotic-objects-defineownproperty-p-desc)
pub fn string_exotic_define_own_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> bool {
    // 1. Let stringDesc be StringGetOwnProperty(S, P).
    let string_descriptor = string_get_own_property(agent, object, key);
    // 2. If stringDesc is not undefined, then
    if let Some(string_descriptor) = string_descriptor {
        // a. Let extensible be S.[[Extensible]].
        let extensible = agent[object].extensible;
        // b. Return IsCompatiblePropertyDescriptor(extensible, Desc,
        //    stringDesc).
        return crate::ecmascript::builtins::ordinary::validate_and_apply_property_descriptor(
            agent,
            None,
            extensible,
            descriptor,
            Some(string_descriptor),
        );
    }
    // 3. Return ! OrdinaryDefineOwnProperty(S, P, Desc).
    ordinary_define_own_property(agent, object, key, descriptor).unwrap_or(false)
}

/// ### [10.4.3.3 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-string-exotic-objects-ownpropertykeys)
pub fn string_exotic_own_property_keys(agent: &mut Agent, object: Object) -> Vec<PropertyKey> {
    let string = boxed_string(agent, object);
    let len = string.utf16_len(agent) as u32;
    let mut keys: Vec<PropertyKey> = Vec::with_capacity(len as usize + 1);
    // 3. For each integer i such that 0 ≤ i < len, in ascending order,
    //    append ! ToString(𝔽(i)).
    keys.extend((0..len).map(PropertyKey::Index));
    // 4./5./6. Then the remaining ordinary keys in their usual order,
    //    skipping the virtual indexes already produced.
    for key in agent[object].properties.ordered_keys() {
        match key {
            PropertyKey::Index(i) if i < len => {}
            _ => keys.push(key),
        }
    }
    keys
}

/// The boxed value for `String.prototype` methods with a string-object
/// receiver.
pub fn string_object_value(agent: &Agent, object: Object) -> Option<HeapString> {
    match &agent[object].kind {
        ObjectKind::StringObject { value } => Some(*value),
        _ => None,
    }
}

pub fn is_string_object(agent: &Agent, object: Object) -> bool {
    matches!(agent[object].kind, ObjectKind::StringObject { .. })
}
