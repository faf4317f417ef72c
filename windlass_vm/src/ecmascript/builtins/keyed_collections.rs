// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [24 Keyed Collections](https://tc39.es/ecma262/#sec-keyed-collections)
//!
//! Map and Set storage. Entries are tombstoned rather than removed so that
//! live iterators keep their positions; keys compare with SameValueZero.
//! The weak variants share the layout — without a collector nothing is
//! ever reclaimed, which the arena ownership model already accepts.

use crate::ecmascript::abstract_operations::testing_and_comparison::same_value_zero;
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::Value;

#[derive(Debug, Default)]
pub struct MapData {
    /// Insertion-ordered entries; `None` marks a deleted slot.
    pub(crate) entries: Vec<Option<(Value, Value)>>,
}

impl MapData {
    pub(crate) fn find(&self, agent: &Agent, key: Value) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry.is_some_and(|(entry_key, _)| same_value_zero(agent, entry_key, key))
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }
}

#[derive(Debug, Default)]
pub struct SetData {
    pub(crate) values: Vec<Option<Value>>,
}

impl SetData {
    pub(crate) fn find(&self, agent: &Agent, value: Value) -> Option<usize> {
        self.values.iter().position(|entry| {
            entry.is_some_and(|entry_value| same_value_zero(agent, entry_value, value))
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.values.iter().filter(|entry| entry.is_some()).count()
    }
}

#[derive(Debug, Default)]
pub struct WeakMapData {
    pub(crate) entries: Vec<Option<(Value, Value)>>,
}

impl WeakMapData {
    pub(crate) fn find(&self, agent: &Agent, key: Value) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry.is_some_and(|(entry_key, _)| same_value_zero(agent, entry_key, key))
        })
    }
}

#[derive(Debug, Default)]
pub struct WeakSetData {
    pub(crate) values: Vec<Option<Value>>,
}

impl WeakSetData {
    pub(crate) fn find(&self, agent: &Agent, value: Value) -> Option<usize> {
        self.values.iter().position(|entry| {
            entry.is_some_and(|entry_value| same_value_zero(agent, entry_value, value))
        })
    }
}

/// ### [24.1.1.2 CanBeHeldWeakly ( v )](https://tc39.es/ecma262/#sec-canbeheldweakly)
pub(crate) fn can_be_held_weakly(value: Value) -> bool {
    matches!(value, Value::Object(_) | Value::Symbol(_))
}

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::operations_on_objects::{call, get};
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::iterator_objects::{
    create_map_iterator, create_set_iterator, map_iterator_next, set_iterator_next,
    CollectionIteratorKind,
};
use crate::ecmascript::builtins::ordinary::get_prototype_from_constructor;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{ExceptionType, JsResult, ProtoIntrinsics, RealmIdentifier};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, PropertyKey,
};
use crate::heap::WellKnownSymbolIndexes;

fn this_map(agent: &mut Agent, this_value: Value) -> JsResult<Object> {
    if let Value::Object(object) = this_value {
        if matches!(agent[object].kind, ObjectKind::Map(_)) {
            return Ok(object);
        }
    }
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Method called on incompatible receiver, expected a Map",
    ))
}

fn this_set(agent: &mut Agent, this_value: Value) -> JsResult<Object> {
    if let Value::Object(object) = this_value {
        if matches!(agent[object].kind, ObjectKind::Set(_)) {
            return Ok(object);
        }
    }
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Method called on incompatible receiver, expected a Set",
    ))
}

pub(crate) struct MapConstructor;
impl Builtin for MapConstructor {
    const NAME: &'static str = "Map";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(map_constructor);
}

/// ### [24.1.1.1 Map ( [ iterable ] )](https://tc39.es/ecma262/#sec-map-iterable)
fn map_constructor(
    agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    let Some(new_target) = new_target else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Constructor Map requires 'new'",
        ));
    };
    let prototype = get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::Map)?;
    let map = agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::Map(Box::new(MapData::default())),
    ));
    let iterable = arguments.get(0);
    if !iterable.is_nullish() {
        // 5. Add every [key, value] entry of the iterable.
        let entries = iterable_to_list(agent, iterable)?;
        for entry in entries {
            let Value::Object(entry) = entry else {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Iterator value is not an entry object",
                ));
            };
            let key = get(agent, entry, PropertyKey::Index(0))?;
            let value = get(agent, entry, PropertyKey::Index(1))?;
            map_set_entry(agent, map, key, value);
        }
    }
    Ok(Value::Object(map))
}

fn map_set_entry(agent: &mut Agent, map: Object, key: Value, value: Value) {
    // 24.1.3.9 step 5: SameValueZero folds -0 into +0 on insertion.
    let key = match key {
        Value::Number(n) if n == 0.0 => Value::Number(0.0),
        other => other,
    };
    let existing = {
        let ObjectKind::Map(data) = &agent[map].kind else {
            unreachable!()
        };
        data.find(agent, key)
    };
    let ObjectKind::Map(data) = &mut agent[map].kind else {
        unreachable!()
    };
    match existing {
        Some(index) => data.entries[index] = Some((key, value)),
        None => data.entries.push(Some((key, value))),
    }
}

macro_rules! map_builtin {
    ($struct_name: ident, $name: literal, $length: literal, $behaviour: path) => {
        struct $struct_name;
        impl Builtin for $struct_name {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular($behaviour);
        }
    };
}

map_builtin!(MapPrototypeClear, "clear", 0, map_prototype_clear);
map_builtin!(MapPrototypeDelete, "delete", 1, map_prototype_delete);
map_builtin!(MapPrototypeEntries, "entries", 0, map_prototype_entries);
map_builtin!(MapPrototypeForEach, "forEach", 1, map_prototype_for_each);
map_builtin!(MapPrototypeGet, "get", 1, map_prototype_get);
map_builtin!(MapPrototypeHas, "has", 1, map_prototype_has);
map_builtin!(MapPrototypeKeys, "keys", 0, map_prototype_keys);
map_builtin!(MapPrototypeSet, "set", 2, map_prototype_set);
map_builtin!(MapPrototypeValues, "values", 0, map_prototype_values);
struct MapPrototypeSizeGetter;
impl Builtin for MapPrototypeSizeGetter {
    const NAME: &'static str = "size";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(map_prototype_size);
}

fn map_prototype_clear(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    let ObjectKind::Map(data) = &mut agent[map].kind else {
        unreachable!()
    };
    for entry in data.entries.iter_mut() {
        *entry = None;
    }
    Ok(Value::Undefined)
}

fn map_prototype_delete(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    let key = arguments.get(0);
    let found = {
        let ObjectKind::Map(data) = &agent[map].kind else {
            unreachable!()
        };
        data.find(agent, key)
    };
    match found {
        Some(index) => {
            let ObjectKind::Map(data) = &mut agent[map].kind else {
                unreachable!()
            };
            data.entries[index] = None;
            Ok(Value::Boolean(true))
        }
        None => Ok(Value::Boolean(false)),
    }
}

fn map_prototype_entries(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    Ok(Value::Object(create_map_iterator(
        agent,
        map,
        CollectionIteratorKind::KeyAndValue,
    )))
}

fn map_prototype_for_each(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    let callback = arguments.get(0);
    if !callback.is_callable(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Callback is not a function",
        ));
    }
    let this_arg = arguments.get(1);
    let mut index = 0;
    loop {
        let entry = {
            let ObjectKind::Map(data) = &agent[map].kind else {
                unreachable!()
            };
            match data.entries.get(index) {
                None => break,
                Some(entry) => *entry,
            }
        };
        index += 1;
        if let Some((key, value)) = entry {
            call(agent, callback, this_arg, &[value, key, Value::Object(map)])?;
        }
    }
    Ok(Value::Undefined)
}

fn map_prototype_get(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    let key = arguments.get(0);
    let ObjectKind::Map(data) = &agent[map].kind else {
        unreachable!()
    };
    match data.find(agent, key) {
        Some(index) => Ok(data.entries[index].unwrap().1),
        None => Ok(Value::Undefined),
    }
}

fn map_prototype_has(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    let key = arguments.get(0);
    let ObjectKind::Map(data) = &agent[map].kind else {
        unreachable!()
    };
    Ok(Value::Boolean(data.find(agent, key).is_some()))
}

fn map_prototype_keys(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    Ok(Value::Object(create_map_iterator(
        agent,
        map,
        CollectionIteratorKind::Key,
    )))
}

fn map_prototype_set(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    map_set_entry(agent, map, arguments.get(0), arguments.get(1));
    Ok(Value::Object(map))
}

fn map_prototype_size(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    let ObjectKind::Map(data) = &agent[map].kind else {
        unreachable!()
    };
    Ok(Value::Number(data.size() as f64))
}

fn map_prototype_values(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let map = this_map(agent, this_value)?;
    Ok(Value::Object(create_map_iterator(
        agent,
        map,
        CollectionIteratorKind::Value,
    )))
}

pub(crate) struct SetConstructor;
impl Builtin for SetConstructor {
    const NAME: &'static str = "Set";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(set_constructor);
}

/// ### [24.2.2.1 Set ( [ iterable ] )](https://tc39.es/ecma262/#sec-set-iterable)
fn set_constructor(
    agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    let Some(new_target) = new_target else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Constructor Set requires 'new'",
        ));
    };
    let prototype = get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::Set)?;
    let set = agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::Set(Box::new(SetData::default())),
    ));
    let iterable = arguments.get(0);
    if !iterable.is_nullish() {
        let values = iterable_to_list(agent, iterable)?;
        for value in values {
            set_add_value(agent, set, value);
        }
    }
    Ok(Value::Object(set))
}

fn set_add_value(agent: &mut Agent, set: Object, value: Value) {
    let value = match value {
        Value::Number(n) if n == 0.0 => Value::Number(0.0),
        other => other,
    };
    let existing = {
        let ObjectKind::Set(data) = &agent[set].kind else {
            unreachable!()
        };
        data.find(agent, value)
    };
    if existing.is_none() {
        let ObjectKind::Set(data) = &mut agent[set].kind else {
            unreachable!()
        };
        data.values.push(Some(value));
    }
}

map_builtin!(SetPrototypeAdd, "add", 1, set_prototype_add);
map_builtin!(SetPrototypeClear, "clear", 0, set_prototype_clear);
map_builtin!(SetPrototypeDelete, "delete", 1, set_prototype_delete);
map_builtin!(SetPrototypeEntries, "entries", 0, set_prototype_entries);
map_builtin!(SetPrototypeForEach, "forEach", 1, set_prototype_for_each);
map_builtin!(SetPrototypeHas, "has", 1, set_prototype_has);
pub(crate) struct SetPrototypeValues;
impl Builtin for SetPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(set_prototype_values);
}
struct SetPrototypeSizeGetter;
impl Builtin for SetPrototypeSizeGetter {
    const NAME: &'static str = "size";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(set_prototype_size);
}

fn set_prototype_add(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let set = this_set(agent, this_value)?;
    set_add_value(agent, set, arguments.get(0));
    Ok(Value::Object(set))
}

fn set_prototype_clear(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let set = this_set(agent, this_value)?;
    let ObjectKind::Set(data) = &mut agent[set].kind else {
        unreachable!()
    };
    for value in data.values.iter_mut() {
        *value = None;
    }
    Ok(Value::Undefined)
}

fn set_prototype_delete(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let set = this_set(agent, this_value)?;
    let value = arguments.get(0);
    let found = {
        let ObjectKind::Set(data) = &agent[set].kind else {
            unreachable!()
        };
        data.find(agent, value)
    };
    match found {
        Some(index) => {
            let ObjectKind::Set(data) = &mut agent[set].kind else {
                unreachable!()
            };
            data.values[index] = None;
            Ok(Value::Boolean(true))
        }
        None => Ok(Value::Boolean(false)),
    }
}

fn set_prototype_entries(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let set = this_set(agent, this_value)?;
    Ok(Value::Object(create_set_iterator(
        agent,
        set,
        CollectionIteratorKind::KeyAndValue,
    )))
}

fn set_prototype_for_each(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let set = this_set(agent, this_value)?;
    let callback = arguments.get(0);
    if !callback.is_callable(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Callback is not a function",
        ));
    }
    let this_arg = arguments.get(1);
    let mut index = 0;
    loop {
        let value = {
            let ObjectKind::Set(data) = &agent[set].kind else {
                unreachable!()
            };
            match data.values.get(index) {
                None => break,
                Some(value) => *value,
            }
        };
        index += 1;
        if let Some(value) = value {
            call(agent, callback, this_arg, &[value, value, Value::Object(set)])?;
        }
    }
    Ok(Value::Undefined)
}

fn set_prototype_has(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let set = this_set(agent, this_value)?;
    let value = arguments.get(0);
    let ObjectKind::Set(data) = &agent[set].kind else {
        unreachable!()
    };
    Ok(Value::Boolean(data.find(agent, value).is_some()))
}

fn set_prototype_size(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let set = this_set(agent, this_value)?;
    let ObjectKind::Set(data) = &agent[set].kind else {
        unreachable!()
    };
    Ok(Value::Number(data.size() as f64))
}

fn set_prototype_values(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let set = this_set(agent, this_value)?;
    Ok(Value::Object(create_set_iterator(
        agent,
        set,
        CollectionIteratorKind::Value,
    )))
}

#[cfg(feature = "weak-refs")]
mod weak {
    use super::*;

    pub(crate) struct WeakMapConstructor;
    impl Builtin for WeakMapConstructor {
        const NAME: &'static str = "WeakMap";
        const LENGTH: u8 = 0;
        const BEHAVIOUR: Behaviour = Behaviour::Constructor(weak_map_constructor);
    }

    fn weak_map_constructor(
        agent: &mut Agent,
        _this_value: Value,
        _arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let Some(new_target) = new_target else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Constructor WeakMap requires 'new'",
            ));
        };
        let prototype =
            get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::WeakMap)?;
        Ok(Value::Object(agent.heap.create_object(ObjectHeapData::new(
            Some(prototype),
            ObjectKind::WeakMap(Box::new(WeakMapData::default())),
        ))))
    }

    fn this_weak_map(agent: &mut Agent, this_value: Value) -> JsResult<Object> {
        if let Value::Object(object) = this_value {
            if matches!(agent[object].kind, ObjectKind::WeakMap(_)) {
                return Ok(object);
            }
        }
        Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Method called on incompatible receiver, expected a WeakMap",
        ))
    }

    fn require_weak_key(agent: &mut Agent, key: Value) -> JsResult<Value> {
        if !can_be_held_weakly(key) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Invalid value used as weak map key",
            ));
        }
        Ok(key)
    }

    map_builtin!(WeakMapPrototypeDelete, "delete", 1, weak_map_prototype_delete);
    map_builtin!(WeakMapPrototypeGet, "get", 1, weak_map_prototype_get);
    map_builtin!(WeakMapPrototypeHas, "has", 1, weak_map_prototype_has);
    map_builtin!(WeakMapPrototypeSet, "set", 2, weak_map_prototype_set);

    fn weak_map_prototype_delete(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_weak_map(agent, this_value)?;
        let key = arguments.get(0);
        let found = {
            let ObjectKind::WeakMap(data) = &agent[map].kind else {
                unreachable!()
            };
            data.find(agent, key)
        };
        match found {
            Some(index) => {
                let ObjectKind::WeakMap(data) = &mut agent[map].kind else {
                    unreachable!()
                };
                data.entries[index] = None;
                Ok(Value::Boolean(true))
            }
            None => Ok(Value::Boolean(false)),
        }
    }

    fn weak_map_prototype_get(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_weak_map(agent, this_value)?;
        let key = arguments.get(0);
        let ObjectKind::WeakMap(data) = &agent[map].kind else {
            unreachable!()
        };
        match data.find(agent, key) {
            Some(index) => Ok(data.entries[index].unwrap().1),
            None => Ok(Value::Undefined),
        }
    }

    fn weak_map_prototype_has(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_weak_map(agent, this_value)?;
        let key = arguments.get(0);
        let ObjectKind::WeakMap(data) = &agent[map].kind else {
            unreachable!()
        };
        Ok(Value::Boolean(data.find(agent, key).is_some()))
    }

    fn weak_map_prototype_set(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_weak_map(agent, this_value)?;
        let key = require_weak_key(agent, arguments.get(0))?;
        let value = arguments.get(1);
        let found = {
            let ObjectKind::WeakMap(data) = &agent[map].kind else {
                unreachable!()
            };
            data.find(agent, key)
        };
        let ObjectKind::WeakMap(data) = &mut agent[map].kind else {
            unreachable!()
        };
        match found {
            Some(index) => data.entries[index] = Some((key, value)),
            None => data.entries.push(Some((key, value))),
        }
        Ok(Value::Object(map))
    }

    pub(crate) struct WeakSetConstructor;
    impl Builtin for WeakSetConstructor {
        const NAME: &'static str = "WeakSet";
        const LENGTH: u8 = 0;
        const BEHAVIOUR: Behaviour = Behaviour::Constructor(weak_set_constructor);
    }

    fn weak_set_constructor(
        agent: &mut Agent,
        _this_value: Value,
        _arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let Some(new_target) = new_target else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Constructor WeakSet requires 'new'",
            ));
        };
        let prototype =
            get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::WeakSet)?;
        Ok(Value::Object(agent.heap.create_object(ObjectHeapData::new(
            Some(prototype),
            ObjectKind::WeakSet(Box::new(WeakSetData::default())),
        ))))
    }

    fn this_weak_set(agent: &mut Agent, this_value: Value) -> JsResult<Object> {
        if let Value::Object(object) = this_value {
            if matches!(agent[object].kind, ObjectKind::WeakSet(_)) {
                return Ok(object);
            }
        }
        Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Method called on incompatible receiver, expected a WeakSet",
        ))
    }

    map_builtin!(WeakSetPrototypeAdd, "add", 1, weak_set_prototype_add);
    map_builtin!(WeakSetPrototypeDelete, "delete", 1, weak_set_prototype_delete);
    map_builtin!(WeakSetPrototypeHas, "has", 1, weak_set_prototype_has);

    fn weak_set_prototype_add(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let set = this_weak_set(agent, this_value)?;
        let value = require_weak_key(agent, arguments.get(0))?;
        let found = {
            let ObjectKind::WeakSet(data) = &agent[set].kind else {
                unreachable!()
            };
            data.find(agent, value)
        };
        if found.is_none() {
            let ObjectKind::WeakSet(data) = &mut agent[set].kind else {
                unreachable!()
            };
            data.values.push(Some(value));
        }
        Ok(Value::Object(set))
    }

    fn weak_set_prototype_delete(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let set = this_weak_set(agent, this_value)?;
        let value = arguments.get(0);
        let found = {
            let ObjectKind::WeakSet(data) = &agent[set].kind else {
                unreachable!()
            };
            data.find(agent, value)
        };
        match found {
            Some(index) => {
                let ObjectKind::WeakSet(data) = &mut agent[set].kind else {
                    unreachable!()
                };
                data.values[index] = None;
                Ok(Value::Boolean(true))
            }
            None => Ok(Value::Boolean(false)),
        }
    }

    fn weak_set_prototype_has(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let set = this_weak_set(agent, this_value)?;
        let value = arguments.get(0);
        let ObjectKind::WeakSet(data) = &agent[set].kind else {
            unreachable!()
        };
        Ok(Value::Boolean(data.find(agent, value).is_some()))
    }

    pub(crate) fn create_weak_collection_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
        let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
        let weak_map_prototype = OrdinaryObjectBuilder::new_intrinsic_object(
            agent,
            realm,
            "%WeakMap.prototype%",
            Some(object_prototype),
        )
        .with_builtin_function_property::<WeakMapPrototypeDelete>()
        .with_builtin_function_property::<WeakMapPrototypeGet>()
        .with_builtin_function_property::<WeakMapPrototypeHas>()
        .with_builtin_function_property::<WeakMapPrototypeSet>()
        .with_to_string_tag("WeakMap")
        .build();
        let weak_map_constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<
            WeakMapConstructor,
        >(agent, realm, "%WeakMap%")
        .with_prototype_property(weak_map_prototype)
        .build();
        OrdinaryObjectBuilder::for_existing(agent, realm, weak_map_prototype)
            .with_constructor_property(weak_map_constructor)
            .build();

        let weak_set_prototype = OrdinaryObjectBuilder::new_intrinsic_object(
            agent,
            realm,
            "%WeakSet.prototype%",
            Some(object_prototype),
        )
        .with_builtin_function_property::<WeakSetPrototypeAdd>()
        .with_builtin_function_property::<WeakSetPrototypeDelete>()
        .with_builtin_function_property::<WeakSetPrototypeHas>()
        .with_to_string_tag("WeakSet")
        .build();
        let weak_set_constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<
            WeakSetConstructor,
        >(agent, realm, "%WeakSet%")
        .with_prototype_property(weak_set_prototype)
        .build();
        OrdinaryObjectBuilder::for_existing(agent, realm, weak_set_prototype)
            .with_constructor_property(weak_set_constructor)
            .build();
    }
}

#[cfg(feature = "weak-refs")]
pub(crate) use weak::create_weak_collection_intrinsics;

struct MapIteratorPrototypeNext;
impl Builtin for MapIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, _arguments| {
        map_iterator_next(agent, this_value)
    });
}
struct SetIteratorPrototypeNext;
impl Builtin for SetIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, _arguments| {
        set_iterator_next(agent, this_value)
    });
}

pub(crate) fn create_keyed_collection_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    // Map.
    let map_prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%Map.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<MapPrototypeClear>()
    .with_builtin_function_property::<MapPrototypeDelete>()
    .with_builtin_function_property::<MapPrototypeEntries>()
    .with_builtin_function_property::<MapPrototypeForEach>()
    .with_builtin_function_property::<MapPrototypeGet>()
    .with_builtin_function_property::<MapPrototypeHas>()
    .with_builtin_function_property::<MapPrototypeKeys>()
    .with_builtin_function_property::<MapPrototypeSet>()
    .with_builtin_function_property::<MapPrototypeValues>()
    .with_builtin_function_getter_property::<MapPrototypeSizeGetter>()
    .with_to_string_tag("Map")
    .build();
    let entries_key = PropertyKey::from_str(agent, "entries");
    let entries_function = match agent[map_prototype].properties.get(entries_key) {
        Some(crate::ecmascript::types::Property {
            value: crate::ecmascript::types::PropertyValue::Data { value, .. },
            ..
        }) => *value,
        _ => unreachable!(),
    };
    agent[map_prototype].properties.set(
        PropertyKey::Symbol(WellKnownSymbolIndexes::Iterator.into()),
        crate::ecmascript::types::Property::data(entries_function, true, false, true),
    );
    let map_constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<MapConstructor>(
        agent, realm, "%Map%",
    )
    .with_prototype_property(map_prototype)
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, map_prototype)
        .with_constructor_property(map_constructor)
        .build();

    // Set.
    let set_prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%Set.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<SetPrototypeAdd>()
    .with_builtin_function_property::<SetPrototypeClear>()
    .with_builtin_function_property::<SetPrototypeDelete>()
    .with_builtin_function_property::<SetPrototypeEntries>()
    .with_builtin_function_property::<SetPrototypeForEach>()
    .with_builtin_function_property::<SetPrototypeHas>()
    .with_builtin_function_property::<SetPrototypeValues>()
    .with_builtin_function_getter_property::<SetPrototypeSizeGetter>()
    .with_to_string_tag("Set")
    .build();
    let values_key = PropertyKey::from_str(agent, "values");
    let values_function = match agent[set_prototype].properties.get(values_key) {
        Some(crate::ecmascript::types::Property {
            value: crate::ecmascript::types::PropertyValue::Data { value, .. },
            ..
        }) => *value,
        _ => unreachable!(),
    };
    // keys and @@iterator alias values.
    let keys_key = PropertyKey::from_str(agent, "keys");
    agent[set_prototype].properties.set(
        keys_key,
        crate::ecmascript::types::Property::data(values_function, true, false, true),
    );
    agent[set_prototype].properties.set(
        PropertyKey::Symbol(WellKnownSymbolIndexes::Iterator.into()),
        crate::ecmascript::types::Property::data(values_function, true, false, true),
    );
    let set_constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<SetConstructor>(
        agent, realm, "%Set%",
    )
    .with_prototype_property(set_prototype)
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, set_prototype)
        .with_constructor_property(set_constructor)
        .build();

    // Iterator helper prototypes.
    let iterator_prototype = agent.get_realm(realm).intrinsics.iterator_prototype();
    OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%MapIteratorPrototype%",
        Some(iterator_prototype),
    )
    .with_builtin_function_property::<MapIteratorPrototypeNext>()
    .with_to_string_tag("Map Iterator")
    .build();
    OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%SetIteratorPrototype%",
        Some(iterator_prototype),
    )
    .with_builtin_function_property::<SetIteratorPrototypeNext>()
    .with_to_string_tag("Set Iterator")
    .build();
}
