// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [28 Reflection](https://tc39.es/ecma262/#sec-reflection): the
//! Reflect object and the Proxy constructor.

use crate::ecmascript::abstract_operations::operations_on_objects::{
    call_function, construct, create_array_from_list, create_list_from_array_like,
};
use crate::ecmascript::abstract_operations::type_conversion::to_property_key;
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::fundamental_objects::object_objects::{
    from_property_descriptor, to_property_descriptor,
};
use crate::ecmascript::builtins::proxy::{proxy_create, proxy_revoke};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{Object, ObjectKind, PropertyKey, Value};

fn require_object(agent: &mut Agent, value: Value, who: &'static str) -> JsResult<Object> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{who} called on non-object"),
        )),
    }
}

macro_rules! reflect_builtin {
    ($struct_name: ident, $name: literal, $length: literal, $behaviour: expr) => {
        struct $struct_name;
        impl Builtin for $struct_name {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular($behaviour);
        }
    };
}

reflect_builtin!(ReflectApply, "apply", 3, |agent, _this, arguments| {
    // ### [28.1.1 Reflect.apply ( target, thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-reflect.apply)
    let Value::Object(target) = arguments.get(0) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Reflect.apply target must be callable",
        ));
    };
    let args = create_list_from_array_like(agent, arguments.get(2))?;
    call_function(agent, target, arguments.get(1), &args)
});

reflect_builtin!(ReflectConstruct, "construct", 2, |agent, _this, arguments| {
    // ### [28.1.2 Reflect.construct ( target, argumentsList [ , newTarget ] )](https://tc39.es/ecma262/#sec-reflect.construct)
    let target = require_object(agent, arguments.get(0), "Reflect.construct")?;
    if !target.is_constructor(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Reflect.construct target must be a constructor",
        ));
    }
    let args = create_list_from_array_like(agent, arguments.get(1))?;
    let new_target = if arguments.len() > 2 {
        let Value::Object(new_target) = arguments.get(2) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Reflect.construct newTarget must be a constructor",
            ));
        };
        Some(new_target)
    } else {
        None
    };
    Ok(Value::Object(construct(agent, target, &args, new_target)?))
});

reflect_builtin!(ReflectDefineProperty, "defineProperty", 3, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.defineProperty")?;
    let key = to_property_key(agent, arguments.get(1))?;
    let descriptor = to_property_descriptor(agent, arguments.get(2))?;
    Ok(Value::Boolean(target.internal_define_own_property(
        agent, key, descriptor,
    )?))
});

reflect_builtin!(ReflectDeleteProperty, "deleteProperty", 2, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.deleteProperty")?;
    let key = to_property_key(agent, arguments.get(1))?;
    Ok(Value::Boolean(target.internal_delete(agent, key)?))
});

reflect_builtin!(ReflectGet, "get", 2, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.get")?;
    let key = to_property_key(agent, arguments.get(1))?;
    let receiver = if arguments.len() > 2 {
        arguments.get(2)
    } else {
        Value::Object(target)
    };
    target.internal_get(agent, key, receiver)
});

reflect_builtin!(
    ReflectGetOwnPropertyDescriptor,
    "getOwnPropertyDescriptor",
    2,
    |agent, _this, arguments| {
        let target = require_object(agent, arguments.get(0), "Reflect.getOwnPropertyDescriptor")?;
        let key = to_property_key(agent, arguments.get(1))?;
        Ok(match target.internal_get_own_property(agent, key)? {
            None => Value::Undefined,
            Some(descriptor) => Value::Object(from_property_descriptor(agent, descriptor)),
        })
    }
);

reflect_builtin!(ReflectGetPrototypeOf, "getPrototypeOf", 1, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.getPrototypeOf")?;
    Ok(match target.internal_get_prototype_of(agent)? {
        Some(prototype) => Value::Object(prototype),
        None => Value::Null,
    })
});

reflect_builtin!(ReflectHas, "has", 2, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.has")?;
    let key = to_property_key(agent, arguments.get(1))?;
    Ok(Value::Boolean(target.internal_has_property(agent, key)?))
});

reflect_builtin!(ReflectIsExtensible, "isExtensible", 1, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.isExtensible")?;
    Ok(Value::Boolean(target.internal_is_extensible(agent)?))
});

reflect_builtin!(ReflectOwnKeys, "ownKeys", 1, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.ownKeys")?;
    let keys = target.internal_own_property_keys(agent)?;
    let keys: Vec<Value> = keys.into_iter().map(|key| key.to_value(agent)).collect();
    Ok(Value::Object(create_array_from_list(agent, &keys)))
});

reflect_builtin!(ReflectPreventExtensions, "preventExtensions", 1, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.preventExtensions")?;
    Ok(Value::Boolean(target.internal_prevent_extensions(agent)?))
});

reflect_builtin!(ReflectSet, "set", 3, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.set")?;
    let key = to_property_key(agent, arguments.get(1))?;
    let receiver = if arguments.len() > 3 {
        arguments.get(3)
    } else {
        Value::Object(target)
    };
    Ok(Value::Boolean(target.internal_set(
        agent,
        key,
        arguments.get(2),
        receiver,
    )?))
});

reflect_builtin!(ReflectSetPrototypeOf, "setPrototypeOf", 2, |agent, _this, arguments| {
    let target = require_object(agent, arguments.get(0), "Reflect.setPrototypeOf")?;
    let prototype = match arguments.get(1) {
        Value::Object(prototype) => Some(prototype),
        Value::Null => None,
        _ => {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Reflect.setPrototypeOf prototype must be an object or null",
            ));
        }
    };
    Ok(Value::Boolean(
        target.internal_set_prototype_of(agent, prototype)?,
    ))
});

pub(crate) struct ProxyConstructor;
impl Builtin for ProxyConstructor {
    const NAME: &'static str = "Proxy";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(proxy_constructor);
}

/// ### [28.2.1.1 Proxy ( target, handler )](https://tc39.es/ecma262/#sec-proxy-target-handler)
fn proxy_constructor(
    agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    if new_target.is_none() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Constructor Proxy requires 'new'",
        ));
    }
    Ok(Value::Object(proxy_create(
        agent,
        arguments.get(0),
        arguments.get(1),
    )?))
}

struct ProxyRevocable;
impl Builtin for ProxyRevocable {
    const NAME: &'static str = "revocable";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(proxy_revocable);
}

/// ### [28.2.2.1 Proxy.revocable ( target, handler )](https://tc39.es/ecma262/#sec-proxy.revocable)
fn proxy_revocable(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let proxy = proxy_create(agent, arguments.get(0), arguments.get(1))?;
    // The revoker closes over the proxy through its bound this.
    struct Revoker;
    impl Builtin for Revoker {
        const NAME: &'static str = "";
        const LENGTH: u8 = 0;
        const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, this, _arguments| {
            if let Value::Object(proxy) = this {
                if matches!(agent[proxy].kind, ObjectKind::Proxy(_)) {
                    proxy_revoke(agent, proxy);
                }
            }
            Ok(Value::Undefined)
        });
    }
    let revoker = crate::ecmascript::builtins::builtin_function::create_builtin_function(
        agent,
        Revoker::BEHAVIOUR,
        Revoker::NAME,
        Revoker::LENGTH,
        "",
    );
    let revoker = crate::ecmascript::builtins::bound_function::bound_function_create(
        agent,
        revoker,
        Value::Object(proxy),
        Vec::new(),
    )?;
    let prototype = agent.current_realm().intrinsics.object_prototype();
    let result = crate::ecmascript::builtins::ordinary::ordinary_object_create(
        agent,
        Some(prototype),
    );
    let proxy_key = PropertyKey::from_str(agent, "proxy");
    crate::ecmascript::abstract_operations::operations_on_objects::create_data_property_or_throw(
        agent,
        result,
        proxy_key,
        Value::Object(proxy),
    )?;
    let revoke_key = PropertyKey::from_str(agent, "revoke");
    crate::ecmascript::abstract_operations::operations_on_objects::create_data_property_or_throw(
        agent,
        result,
        revoke_key,
        Value::Object(revoker),
    )?;
    Ok(Value::Object(result))
}

pub(crate) fn create_reflection_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, "%Reflect%", Some(object_prototype))
        .with_builtin_function_property::<ReflectApply>()
        .with_builtin_function_property::<ReflectConstruct>()
        .with_builtin_function_property::<ReflectDefineProperty>()
        .with_builtin_function_property::<ReflectDeleteProperty>()
        .with_builtin_function_property::<ReflectGet>()
        .with_builtin_function_property::<ReflectGetOwnPropertyDescriptor>()
        .with_builtin_function_property::<ReflectGetPrototypeOf>()
        .with_builtin_function_property::<ReflectHas>()
        .with_builtin_function_property::<ReflectIsExtensible>()
        .with_builtin_function_property::<ReflectOwnKeys>()
        .with_builtin_function_property::<ReflectPreventExtensions>()
        .with_builtin_function_property::<ReflectSet>()
        .with_builtin_function_property::<ReflectSetPrototypeOf>()
        .with_to_string_tag("Reflect")
        .build();
    let _ = BuiltinFunctionBuilder::new_intrinsic_constructor::<ProxyConstructor>(
        agent, realm, "%Proxy%",
    )
    .with_builtin_function_property::<ProxyRevocable>()
    .build();
}
