// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.1 Object Objects](https://tc39.es/ecma262/#sec-object-objects)

use crate::ecmascript::abstract_operations::operations_on_objects::{
    create_data_property_or_throw, define_property_or_throw, enumerable_own_properties,
    create_array_from_list, get, has_own_property, invoke, is_same_value, set_integrity_level,
    test_integrity_level, EnumerablePropertiesKind, IntegrityLevel,
};
use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::type_conversion::{to_object, to_property_key};
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ordinary::{
    get_prototype_from_constructor, ordinary_object_create,
};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{
    Agent, ExceptionType, JsResult, ProtoIntrinsics, RealmIdentifier,
};
use crate::ecmascript::types::{
    Object, ObjectKind, PropertyDescriptor, PropertyKey, Value,
};

pub(crate) struct ObjectConstructor;

impl Builtin for ObjectConstructor {
    const NAME: &'static str = "Object";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}

struct ObjectAssign;
impl Builtin for ObjectAssign {
    const NAME: &'static str = "assign";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::assign);
}
struct ObjectCreate;
impl Builtin for ObjectCreate {
    const NAME: &'static str = "create";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::create);
}
struct ObjectDefineProperties;
impl Builtin for ObjectDefineProperties {
    const NAME: &'static str = "defineProperties";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::define_properties);
}
struct ObjectDefineProperty;
impl Builtin for ObjectDefineProperty {
    const NAME: &'static str = "defineProperty";
    const LENGTH: u8 = 3;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::define_property);
}
struct ObjectEntries;
impl Builtin for ObjectEntries {
    const NAME: &'static str = "entries";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::entries);
}
struct ObjectFreeze;
impl Builtin for ObjectFreeze {
    const NAME: &'static str = "freeze";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::freeze);
}
struct ObjectFromEntries;
impl Builtin for ObjectFromEntries {
    const NAME: &'static str = "fromEntries";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::from_entries);
}
struct ObjectGetOwnPropertyDescriptor;
impl Builtin for ObjectGetOwnPropertyDescriptor {
    const NAME: &'static str = "getOwnPropertyDescriptor";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour =
        Behaviour::Regular(ObjectConstructor::get_own_property_descriptor);
}
struct ObjectGetOwnPropertyNames;
impl Builtin for ObjectGetOwnPropertyNames {
    const NAME: &'static str = "getOwnPropertyNames";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::get_own_property_names);
}
struct ObjectGetPrototypeOf;
impl Builtin for ObjectGetPrototypeOf {
    const NAME: &'static str = "getPrototypeOf";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::get_prototype_of);
}
struct ObjectIs;
impl Builtin for ObjectIs {
    const NAME: &'static str = "is";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::is);
}
struct ObjectIsExtensible;
impl Builtin for ObjectIsExtensible {
    const NAME: &'static str = "isExtensible";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::is_extensible);
}
struct ObjectIsFrozen;
impl Builtin for ObjectIsFrozen {
    const NAME: &'static str = "isFrozen";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::is_frozen);
}
struct ObjectIsSealed;
impl Builtin for ObjectIsSealed {
    const NAME: &'static str = "isSealed";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::is_sealed);
}
struct ObjectKeys;
impl Builtin for ObjectKeys {
    const NAME: &'static str = "keys";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::keys);
}
struct ObjectPreventExtensions;
impl Builtin for ObjectPreventExtensions {
    const NAME: &'static str = "preventExtensions";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::prevent_extensions);
}
struct ObjectSeal;
impl Builtin for ObjectSeal {
    const NAME: &'static str = "seal";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::seal);
}
struct ObjectSetPrototypeOf;
impl Builtin for ObjectSetPrototypeOf {
    const NAME: &'static str = "setPrototypeOf";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::set_prototype_of);
}
struct ObjectValues;
impl Builtin for ObjectValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::values);
}

impl ObjectConstructor {
    /// ### [20.1.1.1 Object ( \[ value \] )](https://tc39.es/ecma262/#sec-object-value)
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let value = arguments.get(0);
        // 1. If NewTarget is neither undefined nor the active function
        //    object, then OrdinaryCreateFromConstructor.
        if let Some(new_target) = new_target {
            if Some(new_target) != agent.active_function_object() {
                let prototype =
                    get_prototype_from_constructor(agent, new_target, ProtoIntrinsics::Object)?;
                return Ok(Value::Object(ordinary_object_create(agent, Some(prototype))));
            }
        }
        // 2. If value is either undefined or null, return
        //    OrdinaryObjectCreate(%Object.prototype%).
        if value.is_nullish() {
            let prototype = agent.current_realm().intrinsics.object_prototype();
            return Ok(Value::Object(ordinary_object_create(agent, Some(prototype))));
        }
        // 3. Return ! ToObject(value).
        Ok(Value::Object(to_object(agent, value)?))
    }

    /// ### [20.1.2.1 Object.assign ( target, ...sources )](https://tc39.es/ecma262/#sec-object.assign)
    fn assign(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let to = to_object(agent, arguments.get(0))?;
        for source in arguments.0.iter().skip(1) {
            crate::ecmascript::abstract_operations::operations_on_objects::copy_data_properties(
                agent, to, *source, &[],
            )?;
        }
        Ok(Value::Object(to))
    }

    /// ### [20.1.2.2 Object.create ( O, Properties )](https://tc39.es/ecma262/#sec-object.create)
    fn create(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let prototype = match arguments.get(0) {
            Value::Object(object) => Some(object),
            Value::Null => None,
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Object prototype may only be an Object or null",
                ));
            }
        };
        let object = ordinary_object_create(agent, prototype);
        let properties = arguments.get(1);
        if !properties.is_undefined() {
            object_define_properties(agent, object, properties)?;
        }
        Ok(Value::Object(object))
    }

    /// ### [20.1.2.3 Object.defineProperties ( O, Properties )](https://tc39.es/ecma262/#sec-object.defineproperties)
    fn define_properties(
        agent: &mut Agent,
        _this: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Object.defineProperties called on non-object",
            ));
        };
        object_define_properties(agent, object, arguments.get(1))?;
        Ok(Value::Object(object))
    }

    /// ### [20.1.2.4 Object.defineProperty ( O, P, Attributes )](https://tc39.es/ecma262/#sec-object.defineproperty)
    fn define_property(
        agent: &mut Agent,
        _this: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. If O is not an Object, throw a TypeError exception.
        let Value::Object(object) = arguments.get(0) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Object.defineProperty called on non-object",
            ));
        };
        // 2. Let key be ? ToPropertyKey(P).
        let key = to_property_key(agent, arguments.get(1))?;
        // 3. Let desc be ? ToPropertyDescriptor(Attributes).
        let descriptor = to_property_descriptor(agent, arguments.get(2))?;
        // 4. Perform ? DefinePropertyOrThrow(O, key, desc).
        define_property_or_throw(agent, object, key, descriptor)?;
        // 5. Return O.
        Ok(Value::Object(object))
    }

    fn entries(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let entries =
            enumerable_own_properties(agent, object, EnumerablePropertiesKind::KeyValue)?;
        Ok(Value::Object(create_array_from_list(agent, &entries)))
    }

    /// ### [20.1.2.6 Object.freeze ( O )](https://tc39.es/ecma262/#sec-object.freeze)
    fn freeze(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        if !set_integrity_level(agent, object, IntegrityLevel::Frozen)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not freeze object",
            ));
        }
        Ok(Value::Object(object))
    }

    fn from_entries(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let entries = iterable_to_list(agent, arguments.get(0))?;
        let prototype = agent.current_realm().intrinsics.object_prototype();
        let object = ordinary_object_create(agent, Some(prototype));
        for entry in entries {
            let Value::Object(entry) = entry else {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Iterator value is not an entry object",
                ));
            };
            let key = get(agent, entry, PropertyKey::Index(0))?;
            let key = to_property_key(agent, key)?;
            let value = get(agent, entry, PropertyKey::Index(1))?;
            create_data_property_or_throw(agent, object, key, value)?;
        }
        Ok(Value::Object(object))
    }

    /// ### [20.1.2.8 Object.getOwnPropertyDescriptor ( O, P )](https://tc39.es/ecma262/#sec-object.getownpropertydescriptor)
    fn get_own_property_descriptor(
        agent: &mut Agent,
        _this: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let key = to_property_key(agent, arguments.get(1))?;
        let descriptor = object.internal_get_own_property(agent, key)?;
        Ok(match descriptor {
            None => Value::Undefined,
            Some(descriptor) => Value::Object(from_property_descriptor(agent, descriptor)),
        })
    }

    fn get_own_property_names(
        agent: &mut Agent,
        _this: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let keys = object.internal_own_property_keys(agent)?;
        let mut names = Vec::new();
        for key in keys {
            if !key.is_symbol() {
                names.push(key.to_value(agent));
            }
        }
        Ok(Value::Object(create_array_from_list(agent, &names)))
    }

    /// ### [20.1.2.12 Object.getPrototypeOf ( O )](https://tc39.es/ecma262/#sec-object.getprototypeof)
    fn get_prototype_of(
        agent: &mut Agent,
        _this: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        Ok(match object.internal_get_prototype_of(agent)? {
            Some(prototype) => Value::Object(prototype),
            None => Value::Null,
        })
    }

    fn is(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Boolean(is_same_value(
            agent,
            arguments.get(0),
            arguments.get(1),
        )))
    }

    fn is_extensible(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        Ok(Value::Boolean(object.internal_is_extensible(agent)?))
    }

    fn is_frozen(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(Value::Boolean(true));
        };
        Ok(Value::Boolean(test_integrity_level(
            agent,
            object,
            IntegrityLevel::Frozen,
        )?))
    }

    fn is_sealed(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(Value::Boolean(true));
        };
        Ok(Value::Boolean(test_integrity_level(
            agent,
            object,
            IntegrityLevel::Sealed,
        )?))
    }

    /// ### [20.1.2.17 Object.keys ( O )](https://tc39.es/ecma262/#sec-object.keys)
    fn keys(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let keys = enumerable_own_properties(agent, object, EnumerablePropertiesKind::Key)?;
        Ok(Value::Object(create_array_from_list(agent, &keys)))
    }

    fn prevent_extensions(
        agent: &mut Agent,
        _this: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        if !object.internal_prevent_extensions(agent)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not prevent extensions",
            ));
        }
        Ok(Value::Object(object))
    }

    fn seal(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        if !set_integrity_level(agent, object, IntegrityLevel::Sealed)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not seal object",
            ));
        }
        Ok(Value::Object(object))
    }

    /// ### [20.1.2.22 Object.setPrototypeOf ( O, proto )](https://tc39.es/ecma262/#sec-object.setprototypeof)
    fn set_prototype_of(
        agent: &mut Agent,
        _this: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = crate::ecmascript::abstract_operations::testing_and_comparison::require_object_coercible(
            agent,
            arguments.get(0),
        )?;
        let prototype = match arguments.get(1) {
            Value::Object(prototype) => Some(prototype),
            Value::Null => None,
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Object prototype may only be an Object or null",
                ));
            }
        };
        let Value::Object(object) = object else {
            return Ok(object);
        };
        if !object.internal_set_prototype_of(agent, prototype)? {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Could not set prototype",
            ));
        }
        Ok(Value::Object(object))
    }

    fn values(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let values = enumerable_own_properties(agent, object, EnumerablePropertiesKind::Value)?;
        Ok(Value::Object(create_array_from_list(agent, &values)))
    }
}

/// ### [20.1.2.3.1 ObjectDefineProperties ( O, Properties )](https://tc39.es/ecma262/#sec-objectdefineproperties)
fn object_define_properties(
    agent: &mut Agent,
    object: Object,
    properties: Value,
) -> JsResult<()> {
    let properties = to_object(agent, properties)?;
    let keys = properties.internal_own_property_keys(agent)?;
    let mut descriptors = Vec::new();
    for key in keys {
        let Some(descriptor) = properties.internal_get_own_property(agent, key)? else {
            continue;
        };
        if descriptor.enumerable != Some(true) {
            continue;
        }
        let value = get(agent, properties, key)?;
        let descriptor = to_property_descriptor(agent, value)?;
        descriptors.push((key, descriptor));
    }
    for (key, descriptor) in descriptors {
        define_property_or_throw(agent, object, key, descriptor)?;
    }
    Ok(())
}

/// ### [6.2.6.5 ToPropertyDescriptor ( Obj )](https://tc39.es/ecma262/#sec-topropertydescriptor)
pub(crate) fn to_property_descriptor(
    agent: &mut Agent,
    value: Value,
) -> JsResult<PropertyDescriptor> {
    // 1. If Obj is not an Object, throw a TypeError exception.
    let Value::Object(object) = value else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Property descriptor must be an object",
        ));
    };
    let mut descriptor = PropertyDescriptor::default();
    let enumerable_key = PropertyKey::from_str(agent, "enumerable");
    if object.internal_has_property(agent, enumerable_key)? {
        let value = get(agent, object, enumerable_key)?;
        descriptor.enumerable = Some(value.to_boolean(agent));
    }
    let configurable_key = PropertyKey::from_str(agent, "configurable");
    if object.internal_has_property(agent, configurable_key)? {
        let value = get(agent, object, configurable_key)?;
        descriptor.configurable = Some(value.to_boolean(agent));
    }
    let value_key = PropertyKey::from_str(agent, "value");
    if object.internal_has_property(agent, value_key)? {
        descriptor.value = Some(get(agent, object, value_key)?);
    }
    let writable_key = PropertyKey::from_str(agent, "writable");
    if object.internal_has_property(agent, writable_key)? {
        let value = get(agent, object, writable_key)?;
        descriptor.writable = Some(value.to_boolean(agent));
    }
    let get_key = PropertyKey::from_str(agent, "get");
    if object.internal_has_property(agent, get_key)? {
        let getter = get(agent, object, get_key)?;
        descriptor.get = Some(match getter {
            Value::Undefined => None,
            Value::Object(getter) if getter.is_callable(agent) => Some(getter),
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Getter must be a function",
                ));
            }
        });
    }
    let set_key = PropertyKey::from_str(agent, "set");
    if object.internal_has_property(agent, set_key)? {
        let setter = get(agent, object, set_key)?;
        descriptor.set = Some(match setter {
            Value::Undefined => None,
            Value::Object(setter) if setter.is_callable(agent) => Some(setter),
            _ => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Setter must be a function",
                ));
            }
        });
    }
    // 10. Data and accessor fields are mutually exclusive.
    descriptor.validate_exclusivity(agent)?;
    Ok(descriptor)
}

/// ### [6.2.6.4 FromPropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-frompropertydescriptor)
pub(crate) fn from_property_descriptor(
    agent: &mut Agent,
    descriptor: PropertyDescriptor,
) -> Object {
    let prototype = agent.current_realm().intrinsics.object_prototype();
    let object = ordinary_object_create(agent, Some(prototype));
    if let Some(value) = descriptor.value {
        let key = PropertyKey::from_str(agent, "value");
        create_data_property_or_throw(agent, object, key, value).unwrap();
    }
    if let Some(writable) = descriptor.writable {
        let key = PropertyKey::from_str(agent, "writable");
        create_data_property_or_throw(agent, object, key, Value::Boolean(writable)).unwrap();
    }
    if let Some(getter) = descriptor.get {
        let key = PropertyKey::from_str(agent, "get");
        let value = getter.map_or(Value::Undefined, Value::Object);
        create_data_property_or_throw(agent, object, key, value).unwrap();
    }
    if let Some(setter) = descriptor.set {
        let key = PropertyKey::from_str(agent, "set");
        let value = setter.map_or(Value::Undefined, Value::Object);
        create_data_property_or_throw(agent, object, key, value).unwrap();
    }
    if let Some(enumerable) = descriptor.enumerable {
        let key = PropertyKey::from_str(agent, "enumerable");
        create_data_property_or_throw(agent, object, key, Value::Boolean(enumerable)).unwrap();
    }
    if let Some(configurable) = descriptor.configurable {
        let key = PropertyKey::from_str(agent, "configurable");
        create_data_property_or_throw(agent, object, key, Value::Boolean(configurable)).unwrap();
    }
    object
}

pub(crate) struct ObjectPrototype;

struct ObjectPrototypeHasOwnProperty;
impl Builtin for ObjectPrototypeHasOwnProperty {
    const NAME: &'static str = "hasOwnProperty";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::has_own_property);
}
struct ObjectPrototypeIsPrototypeOf;
impl Builtin for ObjectPrototypeIsPrototypeOf {
    const NAME: &'static str = "isPrototypeOf";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::is_prototype_of);
}
struct ObjectPrototypePropertyIsEnumerable;
impl Builtin for ObjectPrototypePropertyIsEnumerable {
    const NAME: &'static str = "propertyIsEnumerable";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::property_is_enumerable);
}
struct ObjectPrototypeToLocaleString;
impl Builtin for ObjectPrototypeToLocaleString {
    const NAME: &'static str = "toLocaleString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::to_locale_string);
}
struct ObjectPrototypeToString;
impl Builtin for ObjectPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::to_string);
}
struct ObjectPrototypeValueOf;
impl Builtin for ObjectPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::value_of);
}

impl ObjectPrototype {
    /// ### [20.1.3.2 Object.prototype.hasOwnProperty ( V )](https://tc39.es/ecma262/#sec-object.prototype.hasownproperty)
    fn has_own_property(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let P be ? ToPropertyKey(V).
        let key = to_property_key(agent, arguments.get(0))?;
        // 2. Let O be ? ToObject(this value).
        let object = to_object(agent, this_value)?;
        // 3. Return ? HasOwnProperty(O, P).
        Ok(Value::Boolean(has_own_property(agent, object, key)?))
    }

    fn is_prototype_of(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(mut target) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        let object = to_object(agent, this_value)?;
        loop {
            match target.internal_get_prototype_of(agent)? {
                None => return Ok(Value::Boolean(false)),
                Some(prototype) => {
                    if prototype == object {
                        return Ok(Value::Boolean(true));
                    }
                    target = prototype;
                }
            }
        }
    }

    fn property_is_enumerable(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let key = to_property_key(agent, arguments.get(0))?;
        let object = to_object(agent, this_value)?;
        let descriptor = object.internal_get_own_property(agent, key)?;
        Ok(Value::Boolean(
            descriptor.is_some_and(|descriptor| descriptor.enumerable == Some(true)),
        ))
    }

    fn to_locale_string(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Return ? Invoke(O, "toString").
        let key = PropertyKey::from_str(agent, "toString");
        invoke(agent, this_value, key, &[])
    }

    /// ### [20.1.3.6 Object.prototype.toString ( )](https://tc39.es/ecma262/#sec-object.prototype.tostring)
    fn to_string(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1./2. undefined and null render their own tags.
        match this_value {
            Value::Undefined => return Ok(Value::from_str(agent, "[object Undefined]")),
            Value::Null => return Ok(Value::from_str(agent, "[object Null]")),
            _ => {}
        }
        let object = to_object(agent, this_value)?;
        // 5.-14. The builtin tag from the object kind.
        let builtin_tag = match &agent[object].kind {
            ObjectKind::Array => "Array",
            ObjectKind::ArgumentsMapped(_) | ObjectKind::ArgumentsUnmapped => "Arguments",
            ObjectKind::ECMAScriptFunction(_)
            | ObjectKind::BuiltinFunction(_)
            | ObjectKind::BoundFunction(_)
            | ObjectKind::PromiseResolvingFunction(_) => "Function",
            ObjectKind::Error(_) => "Error",
            ObjectKind::PrimitiveBoolean(_) => "Boolean",
            ObjectKind::PrimitiveNumber(_) => "Number",
            ObjectKind::StringObject { .. } => "String",
            ObjectKind::RegExp(_) => "RegExp",
            _ => "Object",
        };
        // 15. Let tag be ? Get(O, @@toStringTag); strings override.
        let tag_key = PropertyKey::Symbol(crate::heap::WellKnownSymbolIndexes::ToStringTag.into());
        let tag = get(agent, object, tag_key)?;
        let tag = match tag {
            Value::String(tag) => tag.as_str(agent).to_owned(),
            _ => builtin_tag.to_owned(),
        };
        Ok(Value::from_string(agent, format!("[object {tag}]")))
    }

    /// ### [20.1.3.7 Object.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-object.prototype.valueof)
    fn value_of(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Return ? ToObject(this value).
        Ok(Value::Object(to_object(agent, this_value)?))
    }
}

/// Creates `%Object%` and populates `%Object.prototype%`, which the realm
/// bootstrap created as a bare shell.
pub(crate) fn create_object_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let constructor =
        BuiltinFunctionBuilder::new_intrinsic_constructor::<ObjectConstructor>(agent, realm, "%Object%")
            .with_prototype_property(object_prototype)
            .with_builtin_function_property::<ObjectAssign>()
            .with_builtin_function_property::<ObjectCreate>()
            .with_builtin_function_property::<ObjectDefineProperties>()
            .with_builtin_function_property::<ObjectDefineProperty>()
            .with_builtin_function_property::<ObjectEntries>()
            .with_builtin_function_property::<ObjectFreeze>()
            .with_builtin_function_property::<ObjectFromEntries>()
            .with_builtin_function_property::<ObjectGetOwnPropertyDescriptor>()
            .with_builtin_function_property::<ObjectGetOwnPropertyNames>()
            .with_builtin_function_property::<ObjectGetPrototypeOf>()
            .with_builtin_function_property::<ObjectIs>()
            .with_builtin_function_property::<ObjectIsExtensible>()
            .with_builtin_function_property::<ObjectIsFrozen>()
            .with_builtin_function_property::<ObjectIsSealed>()
            .with_builtin_function_property::<ObjectKeys>()
            .with_builtin_function_property::<ObjectPreventExtensions>()
            .with_builtin_function_property::<ObjectSeal>()
            .with_builtin_function_property::<ObjectSetPrototypeOf>()
            .with_builtin_function_property::<ObjectValues>()
            .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, object_prototype)
        .with_constructor_property(constructor)
        .with_builtin_function_property::<ObjectPrototypeHasOwnProperty>()
        .with_builtin_function_property::<ObjectPrototypeIsPrototypeOf>()
        .with_builtin_function_property::<ObjectPrototypePropertyIsEnumerable>()
        .with_builtin_function_property::<ObjectPrototypeToLocaleString>()
        .with_builtin_function_property::<ObjectPrototypeToString>()
        .with_builtin_function_property::<ObjectPrototypeValueOf>()
        .build();
}
