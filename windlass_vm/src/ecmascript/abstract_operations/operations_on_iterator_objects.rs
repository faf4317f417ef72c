// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.4 Operations on Iterator Objects](https://tc39.es/ecma262/#sec-operations-on-iterator-objects)

use super::operations_on_objects::{
    call, create_data_property_or_throw, get, get_method_on_value,
};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{Object, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

/// ### [7.4.1 Iterator Records](https://tc39.es/ecma262/#sec-iterator-records)
#[derive(Debug, Clone, Copy)]
pub struct IteratorRecord {
    /// \[\[Iterator]]
    pub iterator: Object,
    /// \[\[NextMethod]]
    pub next_method: Value,
    /// \[\[Done]]
    pub done: bool,
}

/// ### [7.4.3 GetIterator ( obj, kind )](https://tc39.es/ecma262/#sec-getiterator)
pub fn get_iterator(agent: &mut Agent, obj: Value, is_async: bool) -> JsResult<IteratorRecord> {
    // 1. If kind is ASYNC, let method be ? GetMethod(obj, @@asyncIterator);
    //    else let method be ? GetMethod(obj, @@iterator).
    let symbol = if is_async {
        WellKnownSymbolIndexes::AsyncIterator
    } else {
        WellKnownSymbolIndexes::Iterator
    };
    let method = get_method_on_value(agent, obj, PropertyKey::Symbol(symbol.into()))?;
    // 2.-3. If method is undefined, throw a TypeError exception.
    let Some(method) = method else {
        let what = obj.debug_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{what} is not iterable"),
        ));
    };
    // 4. Return ? GetIteratorFromMethod(obj, method).
    get_iterator_from_method(agent, obj, method)
}

/// ### [7.4.2 GetIteratorFromMethod ( obj, method )](https://tc39.es/ecma262/#sec-getiteratorfrommethod)
pub fn get_iterator_from_method(
    agent: &mut Agent,
    obj: Value,
    method: Object,
) -> JsResult<IteratorRecord> {
    // 1. Let iterator be ? Call(method, obj).
    let iterator = call(agent, Value::Object(method), obj, &[])?;
    // 2. If iterator is not an Object, throw a TypeError exception.
    let Value::Object(iterator) = iterator else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Iterator method returned a non-object",
        ));
    };
    // 3. Let nextMethod be ? Get(iterator, "next").
    let key = PropertyKey::from_str(agent, "next");
    let next_method = get(agent, iterator, key)?;
    // 4. Return the Iterator Record { [[Iterator]]: iterator,
    //    [[NextMethod]]: nextMethod, [[Done]]: false }.
    Ok(IteratorRecord {
        iterator,
        next_method,
        done: false,
    })
}

/// ### [7.4.4 IteratorNext ( iteratorRecord \[ , value \] )](https://tc39.es/ecma262/#sec-iteratornext)
pub fn iterator_next(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
    value: Option<Value>,
) -> JsResult<Object> {
    // 1./2. Call the next method with or without the value.
    let iterator = Value::Object(iterator_record.iterator);
    let result = match value {
        None => call(agent, iterator_record.next_method, iterator, &[])?,
        Some(value) => call(agent, iterator_record.next_method, iterator, &[value])?,
    };
    // 3. If result is not an Object, throw a TypeError exception.
    let Value::Object(result) = result else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Iterator result is not an object",
        ));
    };
    // 4. Return result.
    Ok(result)
}

/// ### [7.4.5 IteratorComplete ( iterResult )](https://tc39.es/ecma262/#sec-iteratorcomplete)
pub fn iterator_complete(agent: &mut Agent, iter_result: Object) -> JsResult<bool> {
    // 1. Return ToBoolean(? Get(iterResult, "done")).
    let key = PropertyKey::from_str(agent, "done");
    let done = get(agent, iter_result, key)?;
    Ok(done.to_boolean(agent))
}

/// ### [7.4.6 IteratorValue ( iterResult )](https://tc39.es/ecma262/#sec-iteratorvalue)
pub fn iterator_value(agent: &mut Agent, iter_result: Object) -> JsResult<Value> {
    // 1. Return ? Get(iterResult, "value").
    let key = PropertyKey::from_str(agent, "value");
    get(agent, iter_result, key)
}

/// ### [7.4.7 IteratorStep ( iteratorRecord )](https://tc39.es/ecma262/#sec-iteratorstep)
///
/// Returns the iterator result object, or `None` when the iterator has
/// signalled done.
pub fn iterator_step(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
) -> JsResult<Option<Object>> {
    // 1. Let result be ? IteratorNext(iteratorRecord).
    let result = iterator_next(agent, iterator_record, None)?;
    // 2. Let done be ? IteratorComplete(result).
    let done = iterator_complete(agent, result)?;
    // 3. If done is true, return DONE.
    if done {
        return Ok(None);
    }
    // 4. Return result.
    Ok(Some(result))
}

/// ### [7.4.8 IteratorStepValue ( iteratorRecord )](https://tc39.es/ecma262/#sec-iteratorstepvalue)
pub fn iterator_step_value(
    agent: &mut Agent,
    iterator_record: &mut IteratorRecord,
) -> JsResult<Option<Value>> {
    let result = iterator_step(agent, iterator_record);
    let result = match result {
        Err(err) => {
            iterator_record.done = true;
            return Err(err);
        }
        Ok(None) => {
            iterator_record.done = true;
            return Ok(None);
        }
        Ok(Some(result)) => result,
    };
    match iterator_value(agent, result) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            iterator_record.done = true;
            Err(err)
        }
    }
}

/// ### [7.4.9 IteratorClose ( iteratorRecord, completion )](https://tc39.es/ecma262/#sec-iteratorclose)
///
/// Calls the iterator's `return` method and preserves the incoming
/// completion, unless `return` itself throws while the incoming completion
/// was normal.
pub fn iterator_close<T>(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
    completion: JsResult<T>,
) -> JsResult<T> {
    // 3. Let innerResult be Completion(GetMethod(iterator, "return")).
    let key = PropertyKey::from_str(agent, "return");
    let inner_result = get_method_on_value(agent, Value::Object(iterator_record.iterator), key);
    let inner_result = match inner_result {
        // 4. If innerResult is a normal completion, then
        Ok(Some(return_method)) => {
            // b. If return is undefined, return ? completion.
            // c. Set innerResult to Completion(Call(return, iterator)).
            call(
                agent,
                Value::Object(return_method),
                Value::Object(iterator_record.iterator),
                &[],
            )
        }
        Ok(None) => return completion,
        Err(err) => Err(err),
    };
    // 5. If completion is a throw completion, return ? completion.
    let result = completion?;
    // 6. If innerResult is a throw completion, return ? innerResult.
    let inner_value = inner_result?;
    // 7. If innerResult.[[Value]] is not an Object, throw a TypeError.
    if !inner_value.is_object() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Iterator return method returned a non-object",
        ));
    }
    // 8. Return ? completion.
    Ok(result)
}

/// ### [7.4.12 CreateIterResultObject ( value, done )](https://tc39.es/ecma262/#sec-createiterresultobject)
pub fn create_iter_result_object(agent: &mut Agent, value: Value, done: bool) -> Object {
    // 1. Let obj be OrdinaryObjectCreate(%Object.prototype%).
    let prototype = agent.current_realm().intrinsics.object_prototype();
    let obj = ordinary_object_create(agent, Some(prototype));
    // 2. Perform ! CreateDataPropertyOrThrow(obj, "value", value).
    let value_key = PropertyKey::from_str(agent, "value");
    create_data_property_or_throw(agent, obj, value_key, value).unwrap();
    // 3. Perform ! CreateDataPropertyOrThrow(obj, "done", done).
    let done_key = PropertyKey::from_str(agent, "done");
    create_data_property_or_throw(agent, obj, done_key, Value::Boolean(done)).unwrap();
    // 4. Return obj.
    obj
}

/// ### [7.4.14 IterableToList ( items \[ , method \] )](https://tc39.es/ecma262/#sec-iterabletolist)
pub fn iterable_to_list(agent: &mut Agent, items: Value) -> JsResult<Vec<Value>> {
    let mut iterator_record = get_iterator(agent, items, false)?;
    let mut values = Vec::new();
    // 3. Repeat, while next is not DONE,
    while let Some(value) = iterator_step_value(agent, &mut iterator_record)? {
        values.push(value);
    }
    Ok(values)
}
