// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.1 Array Objects](https://tc39.es/ecma262/#sec-array-objects)

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::operations_on_objects::{
    call, create_data_property_or_throw, delete_property_or_throw, get, has_property,
    length_of_array_like, set,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::{
    is_strictly_equal, same_value_zero,
};
use crate::ecmascript::abstract_operations::type_conversion::{
    to_integer_or_infinity, to_object, to_string, to_uint32,
};
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::array::array_create;
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::iterator_objects::{
    array_iterator_next, create_array_iterator, CollectionIteratorKind,
};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{Object, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct ArrayConstructor;
impl Builtin for ArrayConstructor {
    const NAME: &'static str = "Array";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}
struct ArrayFrom;
impl Builtin for ArrayFrom {
    const NAME: &'static str = "from";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::from);
}
struct ArrayIsArray;
impl Builtin for ArrayIsArray {
    const NAME: &'static str = "isArray";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::is_array);
}
struct ArrayOf;
impl Builtin for ArrayOf {
    const NAME: &'static str = "of";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::of);
}

impl ArrayConstructor {
    /// ### [23.1.1.1 Array ( ...values )](https://tc39.es/ecma262/#sec-array)
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        _new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 4. A single numeric argument is a length.
        if arguments.len() == 1 {
            if let Value::Number(n) = arguments.get(0) {
                let len = to_uint32(agent, Value::Number(n))?;
                if len as f64 != n {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::RangeError,
                        "Invalid array length",
                    ));
                }
                return Ok(Value::Object(array_create(agent, len as u64, None)?));
            }
        }
        // 5. Otherwise the arguments are the elements.
        let array = array_create(agent, arguments.len() as u64, None)?;
        for (index, value) in arguments.0.iter().enumerate() {
            create_data_property_or_throw(agent, array, PropertyKey::Index(index as u32), *value)?;
        }
        Ok(Value::Object(array))
    }

    /// ### [23.1.2.1 Array.from ( items \[ , mapper \[ , thisArg \] \] )](https://tc39.es/ecma262/#sec-array.from)
    fn from(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let items = arguments.get(0);
        let mapper = arguments.get(1);
        let this_arg = arguments.get(2);
        if !mapper.is_undefined() && !mapper.is_callable(agent) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Array.from mapper must be a function",
            ));
        }
        // Iterable path first, array-like fallback.
        let values = match iterable_to_list(agent, items) {
            Ok(values) => values,
            Err(_) => {
                let object = to_object(agent, items)?;
                let length = length_of_array_like(agent, object)?;
                let mut values = Vec::with_capacity(length.min(4096) as usize);
                for index in 0..length {
                    values.push(get(agent, object, PropertyKey::Index(index as u32))?);
                }
                values
            }
        };
        let array = array_create(agent, values.len() as u64, None)?;
        for (index, value) in values.into_iter().enumerate() {
            let value = if mapper.is_undefined() {
                value
            } else {
                call(agent, mapper, this_arg, &[value, Value::Number(index as f64)])?
            };
            create_data_property_or_throw(agent, array, PropertyKey::Index(index as u32), value)?;
        }
        Ok(Value::Object(array))
    }

    /// ### [23.1.2.2 Array.isArray ( arg )](https://tc39.es/ecma262/#sec-array.isarray)
    fn is_array(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Boolean(match arguments.get(0) {
            Value::Object(object) => object.is_array(agent),
            _ => false,
        }))
    }

    fn of(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let array = array_create(agent, arguments.len() as u64, None)?;
        for (index, value) in arguments.0.iter().enumerate() {
            create_data_property_or_throw(agent, array, PropertyKey::Index(index as u32), *value)?;
        }
        Ok(Value::Object(array))
    }
}

fn this_array_like(agent: &mut Agent, this_value: Value) -> JsResult<(Object, u64)> {
    // 1. Let O be ? ToObject(this value); 2. Let len be
    //    ? LengthOfArrayLike(O).
    let object = to_object(agent, this_value)?;
    let length = length_of_array_like(agent, object)?;
    Ok((object, length))
}

fn require_callback(agent: &mut Agent, value: Value) -> JsResult<Value> {
    if !value.is_callable(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Callback is not a function",
        ));
    }
    Ok(value)
}

/// Normalizes a relative index argument against a length.
fn relative_index(agent: &mut Agent, value: Value, length: u64, default: u64) -> JsResult<u64> {
    if value.is_undefined() {
        return Ok(default);
    }
    let relative = to_integer_or_infinity(agent, value)?;
    Ok(if relative < 0.0 {
        (length as f64 + relative).max(0.0) as u64
    } else {
        (relative as u64).min(length)
    })
}

macro_rules! array_builtin {
    ($struct_name: ident, $name: literal, $length: literal, $behaviour: path) => {
        struct $struct_name;
        impl Builtin for $struct_name {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular($behaviour);
        }
    };
}

array_builtin!(ArrayPrototypeAt, "at", 1, array_prototype_at);
array_builtin!(ArrayPrototypeConcat, "concat", 1, array_prototype_concat);
array_builtin!(ArrayPrototypeEntries, "entries", 0, array_prototype_entries);
array_builtin!(ArrayPrototypeEvery, "every", 1, array_prototype_every);
array_builtin!(ArrayPrototypeFill, "fill", 1, array_prototype_fill);
array_builtin!(ArrayPrototypeFilter, "filter", 1, array_prototype_filter);
array_builtin!(ArrayPrototypeFind, "find", 1, array_prototype_find);
array_builtin!(ArrayPrototypeFindIndex, "findIndex", 1, array_prototype_find_index);
array_builtin!(ArrayPrototypeFlat, "flat", 0, array_prototype_flat);
array_builtin!(ArrayPrototypeForEach, "forEach", 1, array_prototype_for_each);
array_builtin!(ArrayPrototypeIncludes, "includes", 1, array_prototype_includes);
array_builtin!(ArrayPrototypeIndexOf, "indexOf", 1, array_prototype_index_of);
array_builtin!(ArrayPrototypeJoin, "join", 1, array_prototype_join);
array_builtin!(ArrayPrototypeKeys, "keys", 0, array_prototype_keys);
array_builtin!(ArrayPrototypeLastIndexOf, "lastIndexOf", 1, array_prototype_last_index_of);
array_builtin!(ArrayPrototypeMap, "map", 1, array_prototype_map);
array_builtin!(ArrayPrototypePop, "pop", 0, array_prototype_pop);
array_builtin!(ArrayPrototypePush, "push", 1, array_prototype_push);
array_builtin!(ArrayPrototypeReduce, "reduce", 1, array_prototype_reduce);
array_builtin!(ArrayPrototypeReduceRight, "reduceRight", 1, array_prototype_reduce_right);
array_builtin!(ArrayPrototypeReverse, "reverse", 0, array_prototype_reverse);
array_builtin!(ArrayPrototypeShift, "shift", 0, array_prototype_shift);
array_builtin!(ArrayPrototypeSlice, "slice", 2, array_prototype_slice);
array_builtin!(ArrayPrototypeSome, "some", 1, array_prototype_some);
array_builtin!(ArrayPrototypeSort, "sort", 1, array_prototype_sort);
array_builtin!(ArrayPrototypeSplice, "splice", 2, array_prototype_splice);
array_builtin!(ArrayPrototypeToString, "toString", 0, array_prototype_to_string);
array_builtin!(ArrayPrototypeUnshift, "unshift", 1, array_prototype_unshift);
pub(crate) struct ArrayPrototypeValues;
impl Builtin for ArrayPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(array_prototype_values);
}

/// ### [23.1.3.1 Array.prototype.at ( index )](https://tc39.es/ecma262/#sec-array.prototype.at)
fn array_prototype_at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let relative = to_integer_or_infinity(agent, arguments.get(0))?;
    let index = if relative < 0.0 {
        length as f64 + relative
    } else {
        relative
    };
    if index < 0.0 || index >= length as f64 {
        return Ok(Value::Undefined);
    }
    get(agent, object, PropertyKey::Index(index as u32))
}

/// ### [23.1.3.2 Array.prototype.concat ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.concat)
fn array_prototype_concat(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let object = to_object(agent, this_value)?;
    let result = array_create(agent, 0, None)?;
    let mut n: u32 = 0;
    let mut append = |agent: &mut Agent, item: Value| -> JsResult<()> {
        let spreadable = match item {
            Value::Object(item_object) => item_object.is_array(agent),
            _ => false,
        };
        if spreadable {
            let Value::Object(item_object) = item else {
                unreachable!()
            };
            let length = length_of_array_like(agent, item_object)?;
            for index in 0..length {
                let key = PropertyKey::Index(index as u32);
                if has_property(agent, item_object, key)? {
                    let value = get(agent, item_object, key)?;
                    create_data_property_or_throw(agent, result, PropertyKey::Index(n), value)?;
                }
                n += 1;
            }
        } else {
            create_data_property_or_throw(agent, result, PropertyKey::Index(n), item)?;
            n += 1;
        }
        Ok(())
    };
    append(agent, Value::Object(object))?;
    for item in arguments.0 {
        append(agent, *item)?;
    }
    let length_key = PropertyKey::from_str(agent, "length");
    set(agent, result, length_key, Value::Number(n as f64), true)?;
    Ok(Value::Object(result))
}

fn array_prototype_entries(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let object = to_object(agent, this_value)?;
    Ok(Value::Object(create_array_iterator(
        agent,
        object,
        CollectionIteratorKind::KeyAndValue,
    )))
}

/// ### [23.1.3.6 Array.prototype.every ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.every)
fn array_prototype_every(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let callback = require_callback(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    for index in 0..length {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        let result = call(
            agent,
            callback,
            this_arg,
            &[value, Value::Number(index as f64), Value::Object(object)],
        )?;
        if !result.to_boolean(agent) {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(Value::Boolean(true))
}

fn array_prototype_fill(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let value = arguments.get(0);
    let start = relative_index(agent, arguments.get(1), length, 0)?;
    let end = relative_index(agent, arguments.get(2), length, length)?;
    for index in start..end {
        set(agent, object, PropertyKey::Index(index as u32), value, true)?;
    }
    Ok(Value::Object(object))
}

fn array_prototype_filter(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let callback = require_callback(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    let result = array_create(agent, 0, None)?;
    let mut to: u32 = 0;
    for index in 0..length {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        let selected = call(
            agent,
            callback,
            this_arg,
            &[value, Value::Number(index as f64), Value::Object(object)],
        )?;
        if selected.to_boolean(agent) {
            create_data_property_or_throw(agent, result, PropertyKey::Index(to), value)?;
            to += 1;
        }
    }
    Ok(Value::Object(result))
}

fn array_find_impl(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
    want_index: bool,
) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let predicate = require_callback(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    for index in 0..length {
        let value = get(agent, object, PropertyKey::Index(index as u32))?;
        let found = call(
            agent,
            predicate,
            this_arg,
            &[value, Value::Number(index as f64), Value::Object(object)],
        )?;
        if found.to_boolean(agent) {
            return Ok(if want_index {
                Value::Number(index as f64)
            } else {
                value
            });
        }
    }
    Ok(if want_index {
        Value::Number(-1.0)
    } else {
        Value::Undefined
    })
}

fn array_prototype_find(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    array_find_impl(agent, this_value, arguments, false)
}

fn array_prototype_find_index(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    array_find_impl(agent, this_value, arguments, true)
}

/// ### [23.1.3.13 Array.prototype.flat ( \[ depth \] )](https://tc39.es/ecma262/#sec-array.prototype.flat)
fn array_prototype_flat(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let depth = arguments.get(0);
    let depth = if depth.is_undefined() {
        1.0
    } else {
        to_integer_or_infinity(agent, depth)?
    };
    let result = array_create(agent, 0, None)?;
    let mut to: u32 = 0;
    flatten_into(agent, object, length, depth, result, &mut to)?;
    Ok(Value::Object(result))
}

fn flatten_into(
    agent: &mut Agent,
    source: Object,
    length: u64,
    depth: f64,
    target: Object,
    to: &mut u32,
) -> JsResult<()> {
    for index in 0..length {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, source, key)? {
            continue;
        }
        let value = get(agent, source, key)?;
        let is_spreadable = depth > 0.0
            && matches!(value, Value::Object(object) if object.is_array(agent));
        if is_spreadable {
            let Value::Object(inner) = value else {
                unreachable!()
            };
            let inner_length = length_of_array_like(agent, inner)?;
            flatten_into(agent, inner, inner_length, depth - 1.0, target, to)?;
        } else {
            create_data_property_or_throw(agent, target, PropertyKey::Index(*to), value)?;
            *to += 1;
        }
    }
    Ok(())
}

fn array_prototype_for_each(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let callback = require_callback(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    for index in 0..length {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        call(
            agent,
            callback,
            this_arg,
            &[value, Value::Number(index as f64), Value::Object(object)],
        )?;
    }
    Ok(Value::Undefined)
}

/// ### [23.1.3.16 Array.prototype.includes ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.includes)
fn array_prototype_includes(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let search = arguments.get(0);
    let from = relative_index(agent, arguments.get(1), length, 0)?;
    for index in from..length {
        let value = get(agent, object, PropertyKey::Index(index as u32))?;
        if same_value_zero(agent, value, search) {
            return Ok(Value::Boolean(true));
        }
    }
    Ok(Value::Boolean(false))
}

fn array_prototype_index_of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let search = arguments.get(0);
    let from = relative_index(agent, arguments.get(1), length, 0)?;
    for index in from..length {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        if is_strictly_equal(agent, value, search) {
            return Ok(Value::Number(index as f64));
        }
    }
    Ok(Value::Number(-1.0))
}

/// ### [23.1.3.18 Array.prototype.join ( separator )](https://tc39.es/ecma262/#sec-array.prototype.join)
fn array_prototype_join(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let separator = arguments.get(0);
    let separator = if separator.is_undefined() {
        ",".to_owned()
    } else {
        to_string(agent, separator)?.as_str(agent).to_owned()
    };
    let mut out = std::string::String::new();
    for index in 0..length {
        if index > 0 {
            out.push_str(&separator);
        }
        let value = get(agent, object, PropertyKey::Index(index as u32))?;
        if !value.is_nullish() {
            let text = to_string(agent, value)?;
            out.push_str(text.as_str(agent));
        }
    }
    Ok(Value::from_string(agent, out))
}

fn array_prototype_keys(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let object = to_object(agent, this_value)?;
    Ok(Value::Object(create_array_iterator(
        agent,
        object,
        CollectionIteratorKind::Key,
    )))
}

fn array_prototype_last_index_of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let search = arguments.get(0);
    for index in (0..length).rev() {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        if is_strictly_equal(agent, value, search) {
            return Ok(Value::Number(index as f64));
        }
    }
    Ok(Value::Number(-1.0))
}

fn array_prototype_map(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let callback = require_callback(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    let result = array_create(agent, length, None)?;
    for index in 0..length {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        let mapped = call(
            agent,
            callback,
            this_arg,
            &[value, Value::Number(index as f64), Value::Object(object)],
        )?;
        create_data_property_or_throw(agent, result, key, mapped)?;
    }
    Ok(Value::Object(result))
}

/// ### [23.1.3.22 Array.prototype.pop ( )](https://tc39.es/ecma262/#sec-array.prototype.pop)
fn array_prototype_pop(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let length_key = PropertyKey::from_str(agent, "length");
    if length == 0 {
        set(agent, object, length_key, Value::Number(0.0), true)?;
        return Ok(Value::Undefined);
    }
    let index = PropertyKey::Index((length - 1) as u32);
    let element = get(agent, object, index)?;
    delete_property_or_throw(agent, object, index)?;
    set(
        agent,
        object,
        length_key,
        Value::Number((length - 1) as f64),
        true,
    )?;
    Ok(element)
}

/// ### [23.1.3.23 Array.prototype.push ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.push)
fn array_prototype_push(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, mut length) = this_array_like(agent, this_value)?;
    for item in arguments.0 {
        set(
            agent,
            object,
            PropertyKey::Index(length as u32),
            *item,
            true,
        )?;
        length += 1;
    }
    let length_key = PropertyKey::from_str(agent, "length");
    set(
        agent,
        object,
        length_key,
        Value::Number(length as f64),
        true,
    )?;
    Ok(Value::Number(length as f64))
}

fn array_reduce_impl(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
    reversed: bool,
) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let callback = require_callback(agent, arguments.get(0))?;
    let indexes: Vec<u64> = if reversed {
        (0..length).rev().collect()
    } else {
        (0..length).collect()
    };
    let mut accumulator = None;
    if arguments.len() >= 2 {
        accumulator = Some(arguments.get(1));
    }
    for index in indexes {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        accumulator = Some(match accumulator {
            None => value,
            Some(accumulator) => call(
                agent,
                callback,
                Value::Undefined,
                &[
                    accumulator,
                    value,
                    Value::Number(index as f64),
                    Value::Object(object),
                ],
            )?,
        });
    }
    accumulator.ok_or_else(|| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Reduce of empty array with no initial value",
        )
    })
}

fn array_prototype_reduce(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    array_reduce_impl(agent, this_value, arguments, false)
}

fn array_prototype_reduce_right(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    array_reduce_impl(agent, this_value, arguments, true)
}

/// ### [23.1.3.26 Array.prototype.reverse ( )](https://tc39.es/ecma262/#sec-array.prototype.reverse)
fn array_prototype_reverse(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let middle = length / 2;
    let mut lower = 0u64;
    while lower != middle {
        let upper = length - lower - 1;
        let lower_key = PropertyKey::Index(lower as u32);
        let upper_key = PropertyKey::Index(upper as u32);
        let lower_exists = has_property(agent, object, lower_key)?;
        let lower_value = if lower_exists {
            get(agent, object, lower_key)?
        } else {
            Value::Undefined
        };
        let upper_exists = has_property(agent, object, upper_key)?;
        let upper_value = if upper_exists {
            get(agent, object, upper_key)?
        } else {
            Value::Undefined
        };
        match (lower_exists, upper_exists) {
            (true, true) => {
                set(agent, object, lower_key, upper_value, true)?;
                set(agent, object, upper_key, lower_value, true)?;
            }
            (false, true) => {
                set(agent, object, lower_key, upper_value, true)?;
                delete_property_or_throw(agent, object, upper_key)?;
            }
            (true, false) => {
                delete_property_or_throw(agent, object, lower_key)?;
                set(agent, object, upper_key, lower_value, true)?;
            }
            (false, false) => {}
        }
        lower += 1;
    }
    Ok(Value::Object(object))
}

/// ### [23.1.3.27 Array.prototype.shift ( )](https://tc39.es/ecma262/#sec-array.prototype.shift)
fn array_prototype_shift(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let length_key = PropertyKey::from_str(agent, "length");
    if length == 0 {
        set(agent, object, length_key, Value::Number(0.0), true)?;
        return Ok(Value::Undefined);
    }
    let first = get(agent, object, PropertyKey::Index(0))?;
    for index in 1..length {
        let from = PropertyKey::Index(index as u32);
        let to = PropertyKey::Index((index - 1) as u32);
        if has_property(agent, object, from)? {
            let value = get(agent, object, from)?;
            set(agent, object, to, value, true)?;
        } else {
            delete_property_or_throw(agent, object, to)?;
        }
    }
    delete_property_or_throw(agent, object, PropertyKey::Index((length - 1) as u32))?;
    set(
        agent,
        object,
        length_key,
        Value::Number((length - 1) as f64),
        true,
    )?;
    Ok(first)
}

/// ### [23.1.3.28 Array.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-array.prototype.slice)
fn array_prototype_slice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let start = relative_index(agent, arguments.get(0), length, 0)?;
    let end = relative_index(agent, arguments.get(1), length, length)?;
    let count = end.saturating_sub(start);
    let result = array_create(agent, count, None)?;
    let mut to: u32 = 0;
    for index in start..end {
        let key = PropertyKey::Index(index as u32);
        if has_property(agent, object, key)? {
            let value = get(agent, object, key)?;
            create_data_property_or_throw(agent, result, PropertyKey::Index(to), value)?;
        }
        to += 1;
    }
    Ok(Value::Object(result))
}

fn array_prototype_some(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let callback = require_callback(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    for index in 0..length {
        let key = PropertyKey::Index(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        let result = call(
            agent,
            callback,
            this_arg,
            &[value, Value::Number(index as f64), Value::Object(object)],
        )?;
        if result.to_boolean(agent) {
            return Ok(Value::Boolean(true));
        }
    }
    Ok(Value::Boolean(false))
}

/// ### [23.1.3.30 Array.prototype.sort ( comparator )](https://tc39.es/ecma262/#sec-array.prototype.sort)
fn array_prototype_sort(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let comparator = arguments.get(0);
    if !comparator.is_undefined() && !comparator.is_callable(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "The comparison function must be either a function or undefined",
        ));
    }
    let (object, length) = this_array_like(agent, this_value)?;
    // Collect present elements; holes sort to the end.
    let mut values = Vec::with_capacity(length as usize);
    let mut holes = 0u64;
    for index in 0..length {
        let key = PropertyKey::Index(index as u32);
        if has_property(agent, object, key)? {
            values.push(get(agent, object, key)?);
        } else {
            holes += 1;
        }
    }
    // An insertion sort keeps comparator calls observable and avoids
    // aborting on a throwing comparator mid-swap.
    let mut sorted: Vec<Value> = Vec::with_capacity(values.len());
    for value in values {
        let mut insert_at = sorted.len();
        for (position, existing) in sorted.iter().enumerate() {
            if compare_array_elements(agent, value, *existing, comparator)? < 0.0 {
                insert_at = position;
                break;
            }
        }
        sorted.insert(insert_at, value);
    }
    for (index, value) in sorted.iter().enumerate() {
        set(agent, object, PropertyKey::Index(index as u32), *value, true)?;
    }
    for index in sorted.len() as u64..(sorted.len() as u64 + holes) {
        delete_property_or_throw(agent, object, PropertyKey::Index(index as u32))?;
    }
    Ok(Value::Object(object))
}

/// ### [23.1.3.30.2 CompareArrayElements ( x, y, comparator )](https://tc39.es/ecma262/#sec-comparearrayelements)
fn compare_array_elements(
    agent: &mut Agent,
    x: Value,
    y: Value,
    comparator: Value,
) -> JsResult<f64> {
    match (x.is_undefined(), y.is_undefined()) {
        (true, true) => return Ok(0.0),
        (true, false) => return Ok(1.0),
        (false, true) => return Ok(-1.0),
        (false, false) => {}
    }
    if !comparator.is_undefined() {
        let result = call(agent, comparator, Value::Undefined, &[x, y])?;
        let result = crate::ecmascript::abstract_operations::type_conversion::to_number(
            agent, result,
        )?;
        return Ok(if result.is_nan() { 0.0 } else { result });
    }
    let x_string = to_string(agent, x)?.as_str(agent).to_owned();
    let y_string = to_string(agent, y)?.as_str(agent).to_owned();
    Ok(match x_string.cmp(&y_string) {
        std::cmp::Ordering::Less => -1.0,
        std::cmp::Ordering::Equal => 0.0,
        std::cmp::Ordering::Greater => 1.0,
    })
}

/// ### [23.1.3.31 Array.prototype.splice ( start, deleteCount, ...items )](https://tc39.es/ecma262/#sec-array.prototype.splice)
fn array_prototype_splice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let start = relative_index(agent, arguments.get(0), length, 0)?;
    let delete_count = if arguments.len() == 0 {
        0
    } else if arguments.len() == 1 {
        length - start
    } else {
        let count = to_integer_or_infinity(agent, arguments.get(1))?;
        (count.max(0.0) as u64).min(length - start)
    };
    let items: Vec<Value> = arguments.0.iter().skip(2).copied().collect();
    // The removed elements become the result array.
    let removed = array_create(agent, delete_count, None)?;
    for offset in 0..delete_count {
        let key = PropertyKey::Index((start + offset) as u32);
        if has_property(agent, object, key)? {
            let value = get(agent, object, key)?;
            create_data_property_or_throw(
                agent,
                removed,
                PropertyKey::Index(offset as u32),
                value,
            )?;
        }
    }
    let new_length = length - delete_count + items.len() as u64;
    // Shift the tail into place.
    if items.len() as u64 > delete_count {
        for index in (start + delete_count..length).rev() {
            let from = PropertyKey::Index(index as u32);
            let to = PropertyKey::Index((index - delete_count + items.len() as u64) as u32);
            if has_property(agent, object, from)? {
                let value = get(agent, object, from)?;
                set(agent, object, to, value, true)?;
            } else {
                delete_property_or_throw(agent, object, to)?;
            }
        }
    } else if (items.len() as u64) < delete_count {
        for index in start + delete_count..length {
            let from = PropertyKey::Index(index as u32);
            let to = PropertyKey::Index((index - delete_count + items.len() as u64) as u32);
            if has_property(agent, object, from)? {
                let value = get(agent, object, from)?;
                set(agent, object, to, value, true)?;
            } else {
                delete_property_or_throw(agent, object, to)?;
            }
        }
        for index in (new_length..length).rev() {
            delete_property_or_throw(agent, object, PropertyKey::Index(index as u32))?;
        }
    }
    for (offset, item) in items.iter().enumerate() {
        set(
            agent,
            object,
            PropertyKey::Index((start + offset as u64) as u32),
            *item,
            true,
        )?;
    }
    let length_key = PropertyKey::from_str(agent, "length");
    set(
        agent,
        object,
        length_key,
        Value::Number(new_length as f64),
        true,
    )?;
    Ok(Value::Object(removed))
}

/// ### [23.1.3.36 Array.prototype.toString ( )](https://tc39.es/ecma262/#sec-array.prototype.tostring)
fn array_prototype_to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let object = to_object(agent, this_value)?;
    let join_key = PropertyKey::from_str(agent, "join");
    let join = get(agent, object, join_key)?;
    if join.is_callable(agent) {
        return call(agent, join, Value::Object(object), &[]);
    }
    // 4. Fall back to Object.prototype.toString semantics.
    Ok(Value::from_str(agent, "[object Array]"))
}

/// ### [23.1.3.38 Array.prototype.unshift ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.unshift)
fn array_prototype_unshift(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let (object, length) = this_array_like(agent, this_value)?;
    let count = arguments.len() as u64;
    if count > 0 {
        for index in (0..length).rev() {
            let from = PropertyKey::Index(index as u32);
            let to = PropertyKey::Index((index + count) as u32);
            if has_property(agent, object, from)? {
                let value = get(agent, object, from)?;
                set(agent, object, to, value, true)?;
            } else {
                delete_property_or_throw(agent, object, to)?;
            }
        }
        for (offset, item) in arguments.0.iter().enumerate() {
            set(
                agent,
                object,
                PropertyKey::Index(offset as u32),
                *item,
                true,
            )?;
        }
    }
    let length_key = PropertyKey::from_str(agent, "length");
    let new_length = Value::Number((length + count) as f64);
    set(agent, object, length_key, new_length, true)?;
    Ok(new_length)
}

fn array_prototype_values(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
    let object = to_object(agent, this_value)?;
    Ok(Value::Object(create_array_iterator(
        agent,
        object,
        CollectionIteratorKind::Value,
    )))
}

struct ArrayIteratorPrototypeNext;
impl Builtin for ArrayIteratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this_value, _arguments| {
        array_iterator_next(agent, this_value)
    });
}

pub(crate) fn create_array_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let prototype = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%Array.prototype%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<ArrayPrototypeAt>()
    .with_builtin_function_property::<ArrayPrototypeConcat>()
    .with_builtin_function_property::<ArrayPrototypeEntries>()
    .with_builtin_function_property::<ArrayPrototypeEvery>()
    .with_builtin_function_property::<ArrayPrototypeFill>()
    .with_builtin_function_property::<ArrayPrototypeFilter>()
    .with_builtin_function_property::<ArrayPrototypeFind>()
    .with_builtin_function_property::<ArrayPrototypeFindIndex>()
    .with_builtin_function_property::<ArrayPrototypeFlat>()
    .with_builtin_function_property::<ArrayPrototypeForEach>()
    .with_builtin_function_property::<ArrayPrototypeIncludes>()
    .with_builtin_function_property::<ArrayPrototypeIndexOf>()
    .with_builtin_function_property::<ArrayPrototypeJoin>()
    .with_builtin_function_property::<ArrayPrototypeKeys>()
    .with_builtin_function_property::<ArrayPrototypeLastIndexOf>()
    .with_builtin_function_property::<ArrayPrototypeMap>()
    .with_builtin_function_property::<ArrayPrototypePop>()
    .with_builtin_function_property::<ArrayPrototypePush>()
    .with_builtin_function_property::<ArrayPrototypeReduce>()
    .with_builtin_function_property::<ArrayPrototypeReduceRight>()
    .with_builtin_function_property::<ArrayPrototypeReverse>()
    .with_builtin_function_property::<ArrayPrototypeShift>()
    .with_builtin_function_property::<ArrayPrototypeSlice>()
    .with_builtin_function_property::<ArrayPrototypeSome>()
    .with_builtin_function_property::<ArrayPrototypeSort>()
    .with_builtin_function_property::<ArrayPrototypeSplice>()
    .with_builtin_function_property::<ArrayPrototypeToString>()
    .with_builtin_function_property::<ArrayPrototypeUnshift>()
    .with_builtin_function_property::<ArrayPrototypeValues>()
    .build();
    // @@iterator is the values function.
    let values_key = PropertyKey::from_str(agent, "values");
    let values_function = match agent[prototype].properties.get(values_key) {
        Some(crate::ecmascript::types::Property {
            value: crate::ecmascript::types::PropertyValue::Data { value, .. },
            ..
        }) => *value,
        _ => unreachable!(),
    };
    agent.get_realm_mut(realm).intrinsics.set(
        "%Array.prototype.values%",
        match values_function {
            Value::Object(object) => object,
            _ => unreachable!(),
        },
    );
    agent[prototype].properties.set(
        PropertyKey::Symbol(WellKnownSymbolIndexes::Iterator.into()),
        crate::ecmascript::types::Property::data(values_function, true, false, true),
    );

    let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<ArrayConstructor>(
        agent, realm, "%Array%",
    )
    .with_prototype_property(prototype)
    .with_builtin_function_property::<ArrayFrom>()
    .with_builtin_function_property::<ArrayIsArray>()
    .with_builtin_function_property::<ArrayOf>()
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
        .with_constructor_property(constructor)
        .build();

    // %ArrayIteratorPrototype%: inherits from %IteratorPrototype%.
    let iterator_prototype = agent.get_realm(realm).intrinsics.iterator_prototype();
    OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%ArrayIteratorPrototype%",
        Some(iterator_prototype),
    )
    .with_builtin_function_property::<ArrayIteratorPrototypeNext>()
    .with_to_string_tag("Array Iterator")
    .build();
}
