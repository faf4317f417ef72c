// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The concrete iterator helper objects: array, string, map, and set
//! iterators. Each carries its target, its position, and its result kind.

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::create_iter_result_object;
use crate::ecmascript::abstract_operations::operations_on_objects::{
    create_array_from_list, get, length_of_array_like,
};
use crate::ecmascript::builtins::keyed_collections::{MapData, SetData};
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{
    HeapString, Object, ObjectHeapData, ObjectKind, PropertyKey, Value,
};

/// Which of key/value/entry an iterator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionIteratorKind {
    Key,
    Value,
    KeyAndValue,
}

#[derive(Debug)]
pub struct ArrayIteratorData {
    pub(crate) array: Option<Object>,
    pub(crate) next_index: u64,
    pub(crate) kind: CollectionIteratorKind,
}

#[derive(Debug)]
pub struct StringIteratorData {
    pub(crate) string: HeapString,
    pub(crate) next_index: usize,
}

#[derive(Debug)]
pub struct MapIteratorData {
    pub(crate) map: Option<Object>,
    pub(crate) next_index: usize,
    pub(crate) kind: CollectionIteratorKind,
}

#[derive(Debug)]
pub struct SetIteratorData {
    pub(crate) set: Option<Object>,
    pub(crate) next_index: usize,
    pub(crate) kind: CollectionIteratorKind,
}

/// ### [23.1.5.1 CreateArrayIterator ( array, kind )](https://tc39.es/ecma262/#sec-createarrayiterator)
pub fn create_array_iterator(
    agent: &mut Agent,
    array: Object,
    kind: CollectionIteratorKind,
) -> Object {
    let prototype = agent.intrinsic("%ArrayIteratorPrototype%");
    agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::ArrayIterator(Box::new(ArrayIteratorData {
            array: Some(array),
            next_index: 0,
            kind,
        })),
    ))
}

/// ### [23.1.5.2.1 %ArrayIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%arrayiteratorprototype%.next)
pub(crate) fn array_iterator_next(agent: &mut Agent, this_value: Value) -> JsResult<Value> {
    let Value::Object(iterator) = this_value else {
        return Err(iterator_brand_error(agent, "Array Iterator"));
    };
    let ObjectKind::ArrayIterator(data) = &agent[iterator].kind else {
        return Err(iterator_brand_error(agent, "Array Iterator"));
    };
    let (array, index, kind) = (data.array, data.next_index, data.kind);
    let Some(array) = array else {
        return Ok(Value::Object(create_iter_result_object(
            agent,
            Value::Undefined,
            true,
        )));
    };
    let length = length_of_array_like(agent, array)?;
    if index >= length {
        if let ObjectKind::ArrayIterator(data) = &mut agent[iterator].kind {
            data.array = None;
        }
        return Ok(Value::Object(create_iter_result_object(
            agent,
            Value::Undefined,
            true,
        )));
    }
    if let ObjectKind::ArrayIterator(data) = &mut agent[iterator].kind {
        data.next_index = index + 1;
    }
    let result = match kind {
        CollectionIteratorKind::Key => Value::Number(index as f64),
        CollectionIteratorKind::Value => {
            get(agent, array, PropertyKey::Index(index as u32))?
        }
        CollectionIteratorKind::KeyAndValue => {
            let value = get(agent, array, PropertyKey::Index(index as u32))?;
            let key = Value::Number(index as f64);
            Value::Object(create_array_from_list(agent, &[key, value]))
        }
    };
    Ok(Value::Object(create_iter_result_object(agent, result, false)))
}

/// ### [22.1.5.1 CreateStringIterator ( string )](https://tc39.es/ecma262/#sec-createstringiterator)
pub fn create_string_iterator(agent: &mut Agent, string: HeapString) -> Object {
    let prototype = agent.intrinsic("%StringIteratorPrototype%");
    agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::StringIterator(Box::new(StringIteratorData {
            string,
            next_index: 0,
        })),
    ))
}

/// ### [22.1.5.2.1 %StringIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%stringiteratorprototype%.next)
///
/// Iterates by code point.
pub(crate) fn string_iterator_next(agent: &mut Agent, this_value: Value) -> JsResult<Value> {
    let Value::Object(iterator) = this_value else {
        return Err(iterator_brand_error(agent, "String Iterator"));
    };
    let ObjectKind::StringIterator(data) = &agent[iterator].kind else {
        return Err(iterator_brand_error(agent, "String Iterator"));
    };
    let (string, index) = (data.string, data.next_index);
    let text = string.as_str(agent);
    let remainder = &text[index.min(text.len())..];
    let Some(next_char) = remainder.chars().next() else {
        return Ok(Value::Object(create_iter_result_object(
            agent,
            Value::Undefined,
            true,
        )));
    };
    if let ObjectKind::StringIterator(data) = &mut agent[iterator].kind {
        data.next_index = index + next_char.len_utf8();
    }
    let result = Value::from_string(agent, next_char.to_string());
    Ok(Value::Object(create_iter_result_object(agent, result, false)))
}

/// ### [24.1.5.1 CreateMapIterator ( map, kind )](https://tc39.es/ecma262/#sec-createmapiterator)
pub fn create_map_iterator(
    agent: &mut Agent,
    map: Object,
    kind: CollectionIteratorKind,
) -> Object {
    let prototype = agent.intrinsic("%MapIteratorPrototype%");
    agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::MapIterator(Box::new(MapIteratorData {
            map: Some(map),
            next_index: 0,
            kind,
        })),
    ))
}

pub(crate) fn map_iterator_next(agent: &mut Agent, this_value: Value) -> JsResult<Value> {
    let Value::Object(iterator) = this_value else {
        return Err(iterator_brand_error(agent, "Map Iterator"));
    };
    let ObjectKind::MapIterator(data) = &agent[iterator].kind else {
        return Err(iterator_brand_error(agent, "Map Iterator"));
    };
    let (map, mut index, kind) = (data.map, data.next_index, data.kind);
    let Some(map) = map else {
        return Ok(Value::Object(create_iter_result_object(
            agent,
            Value::Undefined,
            true,
        )));
    };
    // Tombstoned entries keep index stability under deletion while
    // iterating.
    loop {
        let ObjectKind::Map(map_data) = &agent[map].kind else {
            unreachable!()
        };
        let MapData { entries } = &**map_data;
        match entries.get(index) {
            None => {
                if let ObjectKind::MapIterator(data) = &mut agent[iterator].kind {
                    data.map = None;
                    data.next_index = index;
                }
                return Ok(Value::Object(create_iter_result_object(
                    agent,
                    Value::Undefined,
                    true,
                )));
            }
            Some(None) => {
                index += 1;
            }
            Some(Some((key, value))) => {
                let (key, value) = (*key, *value);
                if let ObjectKind::MapIterator(data) = &mut agent[iterator].kind {
                    data.next_index = index + 1;
                }
                let result = match kind {
                    CollectionIteratorKind::Key => key,
                    CollectionIteratorKind::Value => value,
                    CollectionIteratorKind::KeyAndValue => {
                        Value::Object(create_array_from_list(agent, &[key, value]))
                    }
                };
                return Ok(Value::Object(create_iter_result_object(agent, result, false)));
            }
        }
    }
}

/// ### [24.2.6.1 CreateSetIterator ( set, kind )](https://tc39.es/ecma262/#sec-createsetiterator)
pub fn create_set_iterator(
    agent: &mut Agent,
    set: Object,
    kind: CollectionIteratorKind,
) -> Object {
    let prototype = agent.intrinsic("%SetIteratorPrototype%");
    agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::SetIterator(Box::new(SetIteratorData {
            set: Some(set),
            next_index: 0,
            kind,
        })),
    ))
}

pub(crate) fn set_iterator_next(agent: &mut Agent, this_value: Value) -> JsResult<Value> {
    let Value::Object(iterator) = this_value else {
        return Err(iterator_brand_error(agent, "Set Iterator"));
    };
    let ObjectKind::SetIterator(data) = &agent[iterator].kind else {
        return Err(iterator_brand_error(agent, "Set Iterator"));
    };
    let (set, mut index, kind) = (data.set, data.next_index, data.kind);
    let Some(set) = set else {
        return Ok(Value::Object(create_iter_result_object(
            agent,
            Value::Undefined,
            true,
        )));
    };
    loop {
        let ObjectKind::Set(set_data) = &agent[set].kind else {
            unreachable!()
        };
        let SetData { values } = &**set_data;
        match values.get(index) {
            None => {
                if let ObjectKind::SetIterator(data) = &mut agent[iterator].kind {
                    data.set = None;
                    data.next_index = index;
                }
                return Ok(Value::Object(create_iter_result_object(
                    agent,
                    Value::Undefined,
                    true,
                )));
            }
            Some(None) => {
                index += 1;
            }
            Some(Some(value)) => {
                let value = *value;
                if let ObjectKind::SetIterator(data) = &mut agent[iterator].kind {
                    data.next_index = index + 1;
                }
                let result = match kind {
                    CollectionIteratorKind::Value | CollectionIteratorKind::Key => value,
                    CollectionIteratorKind::KeyAndValue => {
                        Value::Object(create_array_from_list(agent, &[value, value]))
                    }
                };
                return Ok(Value::Object(create_iter_result_object(agent, result, false)));
            }
        }
    }
}

fn iterator_brand_error(
    agent: &mut Agent,
    brand: &str,
) -> crate::ecmascript::execution::JsError {
    agent.throw_exception(
        ExceptionType::TypeError,
        format!("next method called on incompatible receiver, expected a {brand}"),
    )
}
