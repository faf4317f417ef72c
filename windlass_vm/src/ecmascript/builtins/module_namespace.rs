// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.6 Module Namespace Exotic Objects](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects)
//!
//! Immutable keys mirroring a module's exported bindings: the prototype is
//! pinned to null, keys cannot be defined or deleted, and gets read
//! through to the module environment.

use crate::ecmascript::builtins::ordinary::ordinary_get_own_property;
use crate::ecmascript::execution::{Agent, EnvironmentIndex, ExceptionType, JsResult};
use crate::ecmascript::types::{
    HeapString, Object, PropertyDescriptor, PropertyKey, Value,
};
use crate::heap::ModuleIdentifier;

#[derive(Debug)]
pub struct ModuleNamespaceData {
    /// \[\[Module]]
    pub(crate) module: ModuleIdentifier,
    /// \[\[Exports]]: sorted by code unit order.
    pub(crate) exports: Vec<HeapString>,
}

fn namespace_data(agent: &Agent, object: Object) -> &ModuleNamespaceData {
    match &agent[object].kind {
        crate::ecmascript::types::ObjectKind::ModuleNamespace(data) => data,
        _ => unreachable!("expected a module namespace object"),
    }
}

fn export_binding(agent: &mut Agent, object: Object, name: HeapString) -> JsResult<Value> {
    let module = namespace_data(agent, object).module;
    let environment = agent.heap.modules[module.into_index()].environment;
    EnvironmentIndex::Declarative(environment).get_binding_value(agent, name, true)
}

fn exported_name(agent: &Agent, object: Object, key: PropertyKey) -> Option<HeapString> {
    let PropertyKey::String(name) = key else {
        return None;
    };
    let data = namespace_data(agent, object);
    data.exports.iter().copied().find(|export| *export == name)
}

/// ### [10.4.6.2 \[\[SetPrototypeOf\]\] ( V )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-setprototypeof-v)
pub fn module_namespace_set_prototype_of(
    agent: &mut Agent,
    _object: Object,
    prototype: Option<Object>,
) -> bool {
    // 1. Return ! SetImmutablePrototype(O, V): only a null target succeeds.
    let _ = agent;
    prototype.is_none()
}

/// ### [10.4.6.5 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-getownproperty-p)
pub fn module_namespace_get_own_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> JsResult<Option<PropertyDescriptor>> {
    // 1. If P is a Symbol, return OrdinaryGetOwnProperty(O, P).
    if key.is_symbol() {
        return Ok(ordinary_get_own_property(agent, object, key));
    }
    // 2.-4. Exported names are writable, enumerable, non-configurable data
    //    properties.
    let Some(name) = exported_name(agent, object, key) else {
        return Ok(None);
    };
    let value = export_binding(agent, object, name)?;
    Ok(Some(PropertyDescriptor {
        value: Some(value),
        writable: Some(true),
        enumerable: Some(true),
        configurable: Some(false),
        ..Default::default()
    }))
}

/// ### [10.4.6.6 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-defineownproperty-p-desc)
pub fn module_namespace_define_own_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    if key.is_symbol() {
        return crate::ecmascript::builtins::ordinary::ordinary_define_own_property(
            agent, object, key, descriptor,
        );
    }
    // 2.-7. Only a redefinition identical to the current binding succeeds.
    let Some(current) = module_namespace_get_own_property(agent, object, key)? else {
        return Ok(false);
    };
    if descriptor.configurable == Some(true)
        || descriptor.enumerable == Some(false)
        || descriptor.is_accessor_descriptor()
        || descriptor.writable == Some(false)
    {
        return Ok(false);
    }
    if let Some(value) = descriptor.value {
        let current_value = current.value.unwrap();
        return Ok(
            crate::ecmascript::abstract_operations::testing_and_comparison::same_value(
                agent,
                value,
                current_value,
            ),
        );
    }
    Ok(true)
}

/// ### [10.4.6.7 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-hasproperty-p)
pub fn module_namespace_has_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> JsResult<bool> {
    if key.is_symbol() {
        return crate::ecmascript::builtins::ordinary::ordinary_has_property(agent, object, key);
    }
    Ok(exported_name(agent, object, key).is_some())
}

/// ### [10.4.6.8 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-get-p-receiver)
pub fn module_namespace_get(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    receiver: Value,
) -> JsResult<Value> {
    if key.is_symbol() {
        return crate::ecmascript::builtins::ordinary::ordinary_get(agent, object, key, receiver);
    }
    let Some(name) = exported_name(agent, object, key) else {
        return Ok(Value::Undefined);
    };
    export_binding(agent, object, name)
}

/// ### [10.4.6.9 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-set-p-v-receiver)
pub fn module_namespace_set(
    agent: &mut Agent,
    _object: Object,
    _key: PropertyKey,
    _value: Value,
    _receiver: Value,
) -> bool {
    // 1. Return false.
    let _ = agent;
    false
}

/// ### [10.4.6.10 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-delete-p)
pub fn module_namespace_delete(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> JsResult<bool> {
    if key.is_symbol() {
        return crate::ecmascript::builtins::ordinary::ordinary_delete(agent, object, key);
    }
    // 2. Return false for exported names, true otherwise.
    Ok(exported_name(agent, object, key).is_none())
}

/// ### [10.4.6.11 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects-ownpropertykeys)
pub fn module_namespace_own_property_keys(agent: &mut Agent, object: Object) -> Vec<PropertyKey> {
    let mut keys: Vec<PropertyKey> = namespace_data(agent, object)
        .exports
        .iter()
        .map(|name| PropertyKey::String(*name))
        .collect();
    keys.extend(
        agent[object]
            .properties
            .ordered_keys()
            .into_iter()
            .filter(|key| key.is_symbol()),
    );
    keys
}

/// Guards against misuse from abstract operations that require a module
/// namespace receiver.
pub fn require_module_namespace(agent: &mut Agent, value: Value) -> JsResult<Object> {
    if let Value::Object(object) = value {
        if matches!(
            agent[object].kind,
            crate::ecmascript::types::ObjectKind::ModuleNamespace(_)
        ) {
            return Ok(object);
        }
    }
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Expected a module namespace object",
    ))
}
