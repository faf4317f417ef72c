// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)

use super::testing_and_comparison::same_value;
use super::type_conversion::{to_length, to_object};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{
    Object, ObjectKind, PropertyDescriptor, PropertyKey, Value,
};
use crate::heap::WellKnownSymbolIndexes;

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
pub fn get(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<Value> {
    // 1. Return ? O.[[Get]](P, O).
    o.internal_get(agent, p, Value::Object(o))
}

/// ### [7.3.3 GetV ( V, P )](https://tc39.es/ecma262/#sec-getv)
pub fn get_v(agent: &mut Agent, v: Value, p: PropertyKey) -> JsResult<Value> {
    // 1. Let O be ? ToObject(V).
    let o = to_object(agent, v)?;
    // 2. Return ? O.[[Get]](P, V).
    o.internal_get(agent, p, v)
}

/// ### [7.3.4 Set ( O, P, V, Throw )](https://tc39.es/ecma262/#sec-set-o-p-v-throw)
pub fn set(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
    throw: bool,
) -> JsResult<()> {
    // 1. Let success be ? O.[[Set]](P, V, O).
    let success = o.internal_set(agent, p, v, Value::Object(o))?;
    // 2. If success is false and Throw is true, throw a TypeError exception.
    if !success && throw {
        let name = p.debug_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot assign to read-only property '{name}'"),
        ));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.5 CreateDataProperty ( O, P, V )](https://tc39.es/ecma262/#sec-createdataproperty)
pub fn create_data_property(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
) -> JsResult<bool> {
    // 1. Let newDesc be the PropertyDescriptor { [[Value]]: V,
    //    [[Writable]]: true, [[Enumerable]]: true, [[Configurable]]: true }.
    let new_desc = PropertyDescriptor::new_data_descriptor(v);
    // 2. Return ? O.[[DefineOwnProperty]](P, newDesc).
    o.internal_define_own_property(agent, p, new_desc)
}

/// ### [7.3.7 CreateDataPropertyOrThrow ( O, P, V )](https://tc39.es/ecma262/#sec-createdatapropertyorthrow)
pub fn create_data_property_or_throw(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
) -> JsResult<()> {
    let success = create_data_property(agent, o, p, v)?;
    if !success {
        let name = p.debug_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot create property '{name}'"),
        ));
    }
    Ok(())
}

/// ### [7.3.8 DefinePropertyOrThrow ( O, P, desc )](https://tc39.es/ecma262/#sec-definepropertyorthrow)
pub fn define_property_or_throw(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    desc: PropertyDescriptor,
) -> JsResult<()> {
    // 1. Let success be ? O.[[DefineOwnProperty]](P, desc).
    let success = o.internal_define_own_property(agent, p, desc)?;
    // 2. If success is false, throw a TypeError exception.
    if !success {
        let name = p.debug_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot define property '{name}'"),
        ));
    }
    Ok(())
}

/// ### [7.3.9 DeletePropertyOrThrow ( O, P )](https://tc39.es/ecma262/#sec-deletepropertyorthrow)
pub fn delete_property_or_throw(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<()> {
    let success = o.internal_delete(agent, p)?;
    if !success {
        let name = p.debug_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("Cannot delete property '{name}'"),
        ));
    }
    Ok(())
}

/// ### [7.3.11 HasProperty ( O, P )](https://tc39.es/ecma262/#sec-hasproperty)
pub fn has_property(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<bool> {
    // 1. Return ? O.[[HasProperty]](P).
    o.internal_has_property(agent, p)
}

/// ### [7.3.12 HasOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-hasownproperty)
pub fn has_own_property(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<bool> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let desc = o.internal_get_own_property(agent, p)?;
    // 2. If desc is undefined, return false; 3. otherwise return true.
    Ok(desc.is_some())
}

/// ### [7.3.10 GetMethod ( V, P )](https://tc39.es/ecma262/#sec-getmethod)
pub fn get_method(agent: &mut Agent, v: Object, p: PropertyKey) -> JsResult<Option<Object>> {
    get_method_on_value(agent, Value::Object(v), p)
}

pub fn get_method_on_value(
    agent: &mut Agent,
    v: Value,
    p: PropertyKey,
) -> JsResult<Option<Object>> {
    // 1. Let func be ? GetV(V, P).
    let func = get_v(agent, v, p)?;
    // 2. If func is either undefined or null, return undefined.
    if func.is_nullish() {
        return Ok(None);
    }
    // 3. If IsCallable(func) is false, throw a TypeError exception.
    let Value::Object(func) = func else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Property is not a function",
        ));
    };
    if !func.is_callable(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Property is not a function",
        ));
    }
    // 4. Return func.
    Ok(Some(func))
}

/// ### [7.3.14 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
pub fn call(agent: &mut Agent, f: Value, v: Value, arguments: &[Value]) -> JsResult<Value> {
    // 2. If IsCallable(F) is false, throw a TypeError exception.
    let Value::Object(f) = f else {
        let what = f.debug_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{what} is not a function"),
        ));
    };
    call_function(agent, f, v, arguments)
}

/// The object-typed variant of [`call`].
pub fn call_function(
    agent: &mut Agent,
    f: Object,
    v: Value,
    arguments: &[Value],
) -> JsResult<Value> {
    if !f.is_callable(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Value is not a function",
        ));
    }
    // 3. Return ? F.[[Call]](V, argumentsList).
    f.internal_call(agent, v, ArgumentsList(arguments))
}

/// ### [7.3.15 Construct ( F \[ , argumentsList \[ , newTarget \] \] )](https://tc39.es/ecma262/#sec-construct)
pub fn construct(
    agent: &mut Agent,
    f: Object,
    arguments: &[Value],
    new_target: Option<Object>,
) -> JsResult<Object> {
    // 1. If newTarget is not present, set newTarget to F.
    let new_target = new_target.unwrap_or(f);
    // 3. Return ? F.[[Construct]](argumentsList, newTarget).
    f.internal_construct(agent, ArgumentsList(arguments), new_target)
}

/// ### [7.3.20 Invoke ( V, P \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-invoke)
pub fn invoke(
    agent: &mut Agent,
    v: Value,
    p: PropertyKey,
    arguments: &[Value],
) -> JsResult<Value> {
    // 1. Let func be ? GetV(V, P).
    let func = get_v(agent, v, p)?;
    // 2. Return ? Call(func, V, argumentsList).
    call(agent, func, v, arguments)
}

/// ### [7.3.21 OrdinaryHasInstance ( C, O )](https://tc39.es/ecma262/#sec-ordinaryhasinstance)
pub fn ordinary_has_instance(agent: &mut Agent, c: Value, o: Value) -> JsResult<bool> {
    // 1. If IsCallable(C) is false, return false.
    let Value::Object(c_object) = c else {
        return Ok(false);
    };
    if !c_object.is_callable(agent) {
        return Ok(false);
    }
    // 2. If C has a [[BoundTargetFunction]] internal slot, then
    if let ObjectKind::BoundFunction(data) = &agent[c_object].kind {
        // a. Return ? InstanceofOperator(O, BC).
        let bound_target = data.bound_target_function;
        return instanceof_operator(agent, o, Value::Object(bound_target));
    }
    // 3. If O is not an Object, return false.
    let Value::Object(mut o) = o else {
        return Ok(false);
    };
    // 4. Let P be ? Get(C, "prototype").
    let key = PropertyKey::from_str(agent, "prototype");
    let p = get(agent, c_object, key)?;
    // 5. If P is not an Object, throw a TypeError exception.
    let Value::Object(p) = p else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Function has non-object prototype in instanceof check",
        ));
    };
    // 6. Repeat,
    loop {
        // a. Set O to ? O.[[GetPrototypeOf]]().
        match o.internal_get_prototype_of(agent)? {
            // b. If O is null, return false.
            None => return Ok(false),
            // c. If SameValue(P, O) is true, return true.
            Some(proto) => {
                if proto == p {
                    return Ok(true);
                }
                o = proto;
            }
        }
    }
}

/// ### [13.10.2 InstanceofOperator ( V, target )](https://tc39.es/ecma262/#sec-instanceofoperator)
pub fn instanceof_operator(agent: &mut Agent, v: Value, target: Value) -> JsResult<bool> {
    // 1. If target is not an Object, throw a TypeError exception.
    let Value::Object(target_object) = target else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Right-hand side of 'instanceof' is not an object",
        ));
    };
    // 2. Let instOfHandler be ? GetMethod(target, @@hasInstance).
    let inst_of_handler = get_method(
        agent,
        target_object,
        PropertyKey::Symbol(WellKnownSymbolIndexes::HasInstance.into()),
    )?;
    // 3. If instOfHandler is not undefined, then
    if let Some(inst_of_handler) = inst_of_handler {
        // a. Return ToBoolean(? Call(instOfHandler, target, « V »)).
        let result = call(agent, Value::Object(inst_of_handler), target, &[v])?;
        return Ok(result.to_boolean(agent));
    }
    // 4. If IsCallable(target) is false, throw a TypeError exception.
    if !target_object.is_callable(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Right-hand side of 'instanceof' is not callable",
        ));
    }
    // 5. Return ? OrdinaryHasInstance(target, V).
    ordinary_has_instance(agent, target, v)
}

/// ### [7.3.19 LengthOfArrayLike ( obj )](https://tc39.es/ecma262/#sec-lengthofarraylike)
pub fn length_of_array_like(agent: &mut Agent, obj: Object) -> JsResult<u64> {
    // 1. Return ℝ(? ToLength(? Get(obj, "length"))).
    let key = PropertyKey::from_str(agent, "length");
    let length = get(agent, obj, key)?;
    to_length(agent, length)
}

/// ### [7.3.18 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
pub fn create_array_from_list(agent: &mut Agent, elements: &[Value]) -> Object {
    // 1. Let array be ! ArrayCreate(0).
    let array = crate::ecmascript::builtins::array::array_create(agent, elements.len() as u64, None)
        .unwrap();
    // 2. For each element e of elements, append it.
    for (index, element) in elements.iter().enumerate() {
        create_data_property_or_throw(agent, array, PropertyKey::Index(index as u32), *element)
            .unwrap();
    }
    // 4. Return array.
    array
}

/// ### [7.3.19 CreateListFromArrayLike ( obj )](https://tc39.es/ecma262/#sec-createlistfromarraylike)
pub fn create_list_from_array_like(agent: &mut Agent, obj: Value) -> JsResult<Vec<Value>> {
    // 2. If obj is not an Object, throw a TypeError exception.
    let Value::Object(obj) = obj else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Value is not array-like",
        ));
    };
    // 3. Let len be ? LengthOfArrayLike(obj).
    let len = length_of_array_like(agent, obj)?;
    // 4.-6. Collect the indexed elements.
    let mut list = Vec::with_capacity(len.min(4096) as usize);
    for index in 0..len {
        let element = get(agent, obj, PropertyKey::Index(index as u32))?;
        list.push(element);
    }
    // 7. Return list.
    Ok(list)
}

/// ### [7.3.25 GetFunctionRealm ( obj )](https://tc39.es/ecma262/#sec-getfunctionrealm)
pub fn get_function_realm(agent: &mut Agent, obj: Object) -> JsResult<RealmIdentifier> {
    match &agent[obj].kind {
        ObjectKind::ECMAScriptFunction(data) => Ok(data.realm),
        ObjectKind::BuiltinFunction(data) => Ok(data.realm),
        ObjectKind::BoundFunction(data) => {
            let target = data.bound_target_function;
            get_function_realm(agent, target)
        }
        ObjectKind::Proxy(proxy) => match proxy.target {
            Some(target) => get_function_realm(agent, target),
            None => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot get realm of a revoked Proxy",
            )),
        },
        _ => Ok(agent.current_realm_id()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerablePropertiesKind {
    Key,
    Value,
    KeyValue,
}

/// ### [7.3.23 EnumerableOwnProperties ( O, kind )](https://tc39.es/ecma262/#sec-enumerableownproperties)
pub fn enumerable_own_properties(
    agent: &mut Agent,
    o: Object,
    kind: EnumerablePropertiesKind,
) -> JsResult<Vec<Value>> {
    // 1. Let ownKeys be ? O.[[OwnPropertyKeys]]().
    let own_keys = o.internal_own_property_keys(agent)?;
    let mut results = Vec::new();
    // 2. For each element key of ownKeys, do
    for key in own_keys {
        // a. If key is a Symbol, continue.
        if key.is_symbol() {
            continue;
        }
        // b. Let desc be ? O.[[GetOwnProperty]](key).
        let Some(desc) = o.internal_get_own_property(agent, key)? else {
            continue;
        };
        // c. If desc is not undefined and desc.[[Enumerable]] is true, then
        if desc.enumerable != Some(true) {
            continue;
        }
        match kind {
            // i. If kind is KEY, append key.
            EnumerablePropertiesKind::Key => results.push(key.to_value(agent)),
            EnumerablePropertiesKind::Value => {
                // 1. Let value be ? Get(O, key).
                let value = get(agent, o, key)?;
                results.push(value);
            }
            EnumerablePropertiesKind::KeyValue => {
                let value = get(agent, o, key)?;
                let key_value = key.to_value(agent);
                let entry = create_array_from_list(agent, &[key_value, value]);
                results.push(Value::Object(entry));
            }
        }
    }
    // 3. Return results.
    Ok(results)
}

/// ### [7.3.6 CreateNonEnumerableDataPropertyOrThrow ( O, P, V )](https://tc39.es/ecma262/#sec-createnonenumerabledatapropertyorthrow)
pub fn create_non_enumerable_data_property_or_throw(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    v: Value,
) {
    let desc = PropertyDescriptor::non_enumerable_data_descriptor(v);
    define_property_or_throw(agent, o, p, desc).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityLevel {
    Sealed,
    Frozen,
}

/// ### [7.3.16 SetIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-setintegritylevel)
pub fn set_integrity_level(
    agent: &mut Agent,
    o: Object,
    level: IntegrityLevel,
) -> JsResult<bool> {
    // 1. Let status be ? O.[[PreventExtensions]]().
    let status = o.internal_prevent_extensions(agent)?;
    // 2. If status is false, return false.
    if !status {
        return Ok(false);
    }
    // 3. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent)?;
    for key in keys {
        let desc = match level {
            // 4. If level is SEALED: { [[Configurable]]: false }.
            IntegrityLevel::Sealed => PropertyDescriptor {
                configurable: Some(false),
                ..Default::default()
            },
            // 5. Else: accessors keep their functions, data properties
            //    additionally become non-writable.
            IntegrityLevel::Frozen => {
                let Some(current) = o.internal_get_own_property(agent, key)? else {
                    continue;
                };
                if current.is_accessor_descriptor() {
                    PropertyDescriptor {
                        configurable: Some(false),
                        ..Default::default()
                    }
                } else {
                    PropertyDescriptor {
                        configurable: Some(false),
                        writable: Some(false),
                        ..Default::default()
                    }
                }
            }
        };
        define_property_or_throw(agent, o, key, desc)?;
    }
    Ok(true)
}

/// ### [7.3.17 TestIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-testintegritylevel)
pub fn test_integrity_level(
    agent: &mut Agent,
    o: Object,
    level: IntegrityLevel,
) -> JsResult<bool> {
    // 1. Let extensible be ? IsExtensible(O).
    // 2. If extensible is true, return false.
    if o.internal_is_extensible(agent)? {
        return Ok(false);
    }
    // 4. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent)?;
    for key in keys {
        // a. Let currentDesc be ? O.[[GetOwnProperty]](k).
        let Some(current) = o.internal_get_own_property(agent, key)? else {
            continue;
        };
        // b.i. If currentDesc.[[Configurable]] is true, return false.
        if current.configurable == Some(true) {
            return Ok(false);
        }
        // b.ii. If level is FROZEN and IsDataDescriptor(currentDesc) is
        //       true, non-writability is also required.
        if level == IntegrityLevel::Frozen
            && current.is_data_descriptor()
            && current.writable == Some(true)
        {
            return Ok(false);
        }
    }
    Ok(true)
}

/// ### [7.3.22 SpeciesConstructor ( O, defaultConstructor )](https://tc39.es/ecma262/#sec-speciesconstructor)
pub fn species_constructor(
    agent: &mut Agent,
    o: Object,
    default_constructor: Object,
) -> JsResult<Object> {
    // 1. Let C be ? Get(O, "constructor").
    let key = PropertyKey::from_str(agent, "constructor");
    let c = get(agent, o, key)?;
    // 2. If C is undefined, return defaultConstructor.
    if c.is_undefined() {
        return Ok(default_constructor);
    }
    // 3. If C is not an Object, throw a TypeError exception.
    let Value::Object(c) = c else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "constructor property is not an object",
        ));
    };
    // 4. Let S be ? Get(C, @@species).
    let s = get(
        agent,
        c,
        PropertyKey::Symbol(WellKnownSymbolIndexes::Species.into()),
    )?;
    // 5. If S is either undefined or null, return defaultConstructor.
    if s.is_nullish() {
        return Ok(default_constructor);
    }
    // 6. If IsConstructor(S) is true, return S.
    if let Value::Object(s) = s {
        if s.is_constructor(agent) {
            return Ok(s);
        }
    }
    // 7. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "@@species is not a constructor",
    ))
}

/// Used by `Object.is` and a handful of intrinsics.
pub fn is_same_value(agent: &Agent, x: Value, y: Value) -> bool {
    same_value(agent, x, y)
}

/// ### [7.3.26 CopyDataProperties ( target, source, excludedItems )](https://tc39.es/ecma262/#sec-copydataproperties)
///
/// Spread semantics: nullish sources are skipped, primitives contribute
/// their boxed own enumerable properties.
pub fn copy_data_properties(
    agent: &mut Agent,
    target: Object,
    source: Value,
    excluded_items: &[PropertyKey],
) -> JsResult<()> {
    // 1. If source is either undefined or null, return UNUSED.
    if source.is_nullish() {
        return Ok(());
    }
    // 2. Let from be ! ToObject(source).
    let from = to_object(agent, source)?;
    // 3. Let keys be ? from.[[OwnPropertyKeys]]().
    let keys = from.internal_own_property_keys(agent)?;
    // 4. For each element nextKey of keys, do
    for key in keys {
        if excluded_items.contains(&key) {
            continue;
        }
        // b.i. Let desc be ? from.[[GetOwnProperty]](nextKey).
        let Some(descriptor) = from.internal_get_own_property(agent, key)? else {
            continue;
        };
        // b.ii. If desc is not undefined and desc.[[Enumerable]] is true:
        if descriptor.enumerable != Some(true) {
            continue;
        }
        // 1. Let propValue be ? Get(from, nextKey).
        let value = get(agent, from, key)?;
        // 2. Perform ! CreateDataPropertyOrThrow(target, nextKey, propValue).
        create_data_property_or_throw(agent, target, key, value)?;
    }
    // 5. Return UNUSED.
    Ok(())
}
