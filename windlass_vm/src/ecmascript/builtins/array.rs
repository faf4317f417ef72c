// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)
//!
//! An Array's `length` property drives truncation; writes to an index at or
//! beyond the current length extend it.

use crate::ecmascript::abstract_operations::type_conversion::{to_number, to_uint32};
use crate::ecmascript::builtins::ordinary::{
    ordinary_define_own_property, ordinary_get_own_property,
};
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, ProtoIntrinsics};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, PropertyDescriptor, PropertyKey, PropertyValue, Value,
};

/// ### [10.4.2.2 ArrayCreate ( length \[ , proto \] )](https://tc39.es/ecma262/#sec-arraycreate)
pub fn array_create(
    agent: &mut Agent,
    length: u64,
    prototype: Option<Object>,
) -> JsResult<Object> {
    // 1. If length > 2^32 - 1, throw a RangeError exception.
    if length > u32::MAX as u64 {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    // 2. If proto is not present, set proto to %Array.prototype%.
    let prototype = prototype
        .unwrap_or_else(|| agent.intrinsic(ProtoIntrinsics::Array.intrinsic_name()));
    // 3. Let A be MakeBasicObject(« [[Prototype]], [[Extensible]] »).
    let array = agent
        .heap
        .create_object(ObjectHeapData::new(Some(prototype), ObjectKind::Array));
    // 6. Perform ! OrdinaryDefineOwnProperty(A, "length", PropertyDescriptor
    //    { [[Value]]: 𝔽(length), [[Writable]]: true, [[Enumerable]]: false,
    //    [[Configurable]]: false }).
    let length_key = PropertyKey::from_str(agent, "length");
    ordinary_define_own_property(
        agent,
        array,
        length_key,
        PropertyDescriptor {
            value: Some(Value::Number(length as f64)),
            writable: Some(true),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        },
    )
    .unwrap();
    // 7. Return A.
    Ok(array)
}

/// The current value of the `length` own property.
pub fn array_length(agent: &Agent, array: Object) -> u32 {
    let Some(key) = agent.heap.string_lookup.get("length").copied() else {
        return 0;
    };
    match agent[array].properties.get(PropertyKey::String(key)) {
        Some(property) => match property.value {
            PropertyValue::Data {
                value: Value::Number(n),
                ..
            } => n as u32,
            _ => 0,
        },
        None => 0,
    }
}

/// ### [10.4.2.1 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-array-exotic-objects-defineownproperty-p-desc)
pub fn array_define_own_property(
    agent: &mut Agent,
    array: Object,
    key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    // 1. If P is "length", then
    if key.equals_str(agent, "length") {
        // a. Return ? ArraySetLength(A, Desc).
        return array_set_length(agent, array, descriptor);
    }
    // 2. Else if P is an array index, then
    if let PropertyKey::Index(index) = key {
        let length_key = PropertyKey::from_str(agent, "length");
        // a./b. Read the current length descriptor; it is never absent and
        //    never an accessor on arrays.
        let old_len_desc = ordinary_get_own_property(agent, array, length_key).unwrap();
        let old_len = old_len_desc.value.unwrap();
        let Value::Number(old_len) = old_len else {
            unreachable!()
        };
        let old_len = old_len as u32;
        // e. If index ≥ oldLen and oldLenDesc.[[Writable]] is false,
        //    return false.
        if index >= old_len && old_len_desc.writable == Some(false) {
            return Ok(false);
        }
        // f. Let succeeded be ! OrdinaryDefineOwnProperty(A, P, Desc).
        let succeeded = ordinary_define_own_property(agent, array, key, descriptor)?;
        // g. If succeeded is false, return false.
        if !succeeded {
            return Ok(false);
        }
        // h. If index ≥ oldLen, set oldLenDesc.[[Value]] to index + 1 and
        //    update the length property.
        if index >= old_len {
            let property = agent[array].properties.get_mut(length_key).unwrap();
            property.value = PropertyValue::Data {
                value: Value::Number((index + 1) as f64),
                writable: match property.value {
                    PropertyValue::Data { writable, .. } => writable,
                    _ => unreachable!(),
                },
            };
        }
        // i. Return true.
        return Ok(true);
    }
    // 3. Return ? OrdinaryDefineOwnProperty(A, P, Desc).
    ordinary_define_own_property(agent, array, key, descriptor)
}

/// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
pub fn array_set_length(
    agent: &mut Agent,
    array: Object,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    let length_key = PropertyKey::from_str(agent, "length");
    // 1. If Desc does not have a [[Value]] field, then
    let Some(new_len_value) = descriptor.value else {
        // a. Return ! OrdinaryDefineOwnProperty(A, "length", Desc).
        return ordinary_define_own_property(agent, array, length_key, descriptor);
    };
    // 3. Let newLen be ? ToUint32(Desc.[[Value]]).
    let new_len = to_uint32(agent, new_len_value)?;
    // 4. Let numberLen be ? ToNumber(Desc.[[Value]]).
    let number_len = to_number(agent, new_len_value)?;
    // 5. If SameValueZero(newLen, numberLen) is false, throw a RangeError.
    if new_len as f64 != number_len {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    // 7. Let oldLenDesc be OrdinaryGetOwnProperty(A, "length").
    let old_len_desc = ordinary_get_own_property(agent, array, length_key).unwrap();
    let Some(Value::Number(old_len)) = old_len_desc.value else {
        unreachable!()
    };
    let old_len = old_len as u32;
    let old_len_writable = old_len_desc.writable == Some(true);

    let mut new_len_desc = descriptor;
    new_len_desc.value = Some(Value::Number(new_len as f64));

    // 11. If newLen ≥ oldLen, apply directly.
    if new_len >= old_len {
        return ordinary_define_own_property(agent, array, length_key, new_len_desc);
    }
    // 12. If oldLenDesc.[[Writable]] is false, return false.
    if !old_len_writable {
        return Ok(false);
    }
    // 13./14. Remember whether writability is being turned off; keep the
    //    length writable while deleting.
    let new_writable = new_len_desc.writable != Some(false);
    if !new_writable {
        new_len_desc.writable = Some(true);
    }
    // 15. Let succeeded be ! OrdinaryDefineOwnProperty(A, "length",
    //     newLenDesc).
    let succeeded = ordinary_define_own_property(agent, array, length_key, new_len_desc)?;
    if !succeeded {
        return Ok(false);
    }
    // 16. For each own property key P of A such that P is an array index
    //     and ! ToUint32(P) ≥ newLen, in descending numeric index order:
    let doomed = agent[array].properties.indexes_from(new_len);
    for index in doomed {
        // a. Let deleteSucceeded be ! A.[[Delete]](P).
        let property = agent[array]
            .properties
            .get(PropertyKey::Index(index))
            .unwrap();
        if property.configurable {
            agent[array].properties.remove(PropertyKey::Index(index));
        } else {
            // b. The delete failed: clamp the length just above the
            //    surviving index and report failure.
            let mut clamped = new_len_desc;
            clamped.value = Some(Value::Number((index + 1) as f64));
            if !new_writable {
                clamped.writable = Some(false);
            }
            ordinary_define_own_property(agent, array, length_key, clamped).unwrap();
            return Ok(false);
        }
    }
    // 17. If newWritable is false, strip writability.
    if !new_writable {
        ordinary_define_own_property(
            agent,
            array,
            length_key,
            PropertyDescriptor {
                writable: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    }
    // 18. Return true.
    Ok(true)
}

/// Builds an array directly from evaluated elements, the fast path for
/// array literals.
pub fn array_from_elements(agent: &mut Agent, elements: &[Option<Value>]) -> JsResult<Object> {
    let array = array_create(agent, elements.len() as u64, None)?;
    for (index, element) in elements.iter().enumerate() {
        // Holes leave the index property absent.
        if let Some(value) = element {
            let key = PropertyKey::Index(index as u32);
            let property = crate::ecmascript::types::Property::data(*value, true, true, true);
            agent[array].properties.set(key, property);
        }
    }
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::{
        initialize_default_realm, Agent, DefaultHostHooks, Options,
    };

    #[test]
    fn index_writes_extend_length() {
        let mut agent = Agent::new(Options::default(), &DefaultHostHooks);
        initialize_default_realm(&mut agent);
        let array = array_create(&mut agent, 0, None).unwrap();
        let descriptor = PropertyDescriptor::new_data_descriptor(Value::Number(7.0));
        array_define_own_property(&mut agent, array, PropertyKey::Index(4), descriptor).unwrap();
        assert_eq!(array_length(&agent, array), 5);
    }

    #[test]
    fn length_truncation_deletes_indexes() {
        let mut agent = Agent::new(Options::default(), &DefaultHostHooks);
        initialize_default_realm(&mut agent);
        let array = array_create(&mut agent, 0, None).unwrap();
        for i in 0..4u32 {
            let descriptor =
                PropertyDescriptor::new_data_descriptor(Value::Number(i as f64));
            array_define_own_property(&mut agent, array, PropertyKey::Index(i), descriptor)
                .unwrap();
        }
        let truncate = PropertyDescriptor {
            value: Some(Value::Number(2.0)),
            ..Default::default()
        };
        assert!(array_set_length(&mut agent, array, truncate).unwrap());
        assert_eq!(array_length(&agent, array), 2);
        assert!(agent[array].properties.get(PropertyKey::Index(1)).is_some());
        assert!(agent[array].properties.get(PropertyKey::Index(2)).is_none());
        assert!(agent[array].properties.get(PropertyKey::Index(3)).is_none());
    }
}
