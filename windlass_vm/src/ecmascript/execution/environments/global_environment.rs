// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashSet;

use super::declarative_environment::DeclarativeEnvironmentRecord;
use super::object_environment::ObjectEnvironmentRecord;
use super::{DeclarativeEnvironment, GlobalEnvironment, ObjectEnvironment};
use crate::ecmascript::abstract_operations::operations_on_objects::{
    define_property_or_throw, has_own_property, set,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{HeapString, Object, PropertyDescriptor, PropertyKey, Value};

/// ### [9.1.1.4 Global Environment Records](https://tc39.es/ecma262/#sec-global-environment-records)
///
/// A global record fuses an object record backed by the global object (var
/// and function declarations, host-created globals) with a declarative
/// record for the lexical declarations of script top level. Name collisions
/// across the two are rejected at declaration time.
#[derive(Debug)]
pub struct GlobalEnvironmentRecord {
    /// ### \[\[ObjectRecord]]
    pub(crate) object_record: ObjectEnvironment,

    /// ### \[\[GlobalThisValue]]
    pub(crate) global_this_value: Object,

    /// ### \[\[DeclarativeRecord]]
    pub(crate) declarative_record: DeclarativeEnvironment,

    /// ### \[\[VarNames]]
    pub(crate) var_names: AHashSet<HeapString>,
}

impl GlobalEnvironmentRecord {
    /// ### [9.1.2.5 NewGlobalEnvironment ( G, thisValue )](https://tc39.es/ecma262/#sec-newglobalenvironment)
    pub(crate) fn new(agent: &mut Agent, global: Object, this_value: Object) -> GlobalEnvironment {
        // 1. Let objRec be NewObjectEnvironment(G, false, null).
        agent.heap.environments.object.push(ObjectEnvironmentRecord {
            binding_object: global,
            is_with_environment: false,
            outer_env: None,
        });
        let object_record = ObjectEnvironment::last(&agent.heap.environments.object);
        // 2. Let dclRec be NewDeclarativeEnvironment(null).
        agent
            .heap
            .environments
            .declarative
            .push(DeclarativeEnvironmentRecord::new(None));
        let declarative_record = DeclarativeEnvironment::last(&agent.heap.environments.declarative);
        // 3-8.
        agent.heap.environments.global.push(GlobalEnvironmentRecord {
            object_record,
            global_this_value: this_value,
            declarative_record,
            var_names: AHashSet::default(),
        });
        GlobalEnvironment::last(&agent.heap.environments.global)
    }

    /// ### [9.1.1.4.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-global-environment-records-hasbinding-n)
    pub(crate) fn has_binding(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
    ) -> JsResult<bool> {
        let record = agent.heap.environments.get_global(index);
        let declarative_record = record.declarative_record;
        let object_record = record.object_record;
        // 1. If ! DclRec.HasBinding(N) is true, return true.
        if agent
            .heap
            .environments
            .get_declarative(declarative_record)
            .has_binding(name)
        {
            return Ok(true);
        }
        // 2. Return ? ObjRec.HasBinding(N).
        ObjectEnvironmentRecord::has_binding(agent, object_record, name)
    }

    /// ### [9.1.1.4.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-global-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        let declarative_record = agent.heap.environments.get_global(index).declarative_record;
        // 1. If ! DclRec.HasBinding(N) is true, throw a TypeError exception.
        if agent
            .heap
            .environments
            .get_declarative(declarative_record)
            .has_binding(name)
        {
            let name = name.as_str(agent).to_owned();
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("Identifier '{name}' has already been declared"),
            ));
        }
        // 2. Return ! DclRec.CreateMutableBinding(N, D).
        agent
            .heap
            .environments
            .get_declarative_mut(declarative_record)
            .create_mutable_binding(name, is_deletable);
        Ok(())
    }

    /// ### [9.1.1.4.3 CreateImmutableBinding ( N, S )](https://tc39.es/ecma262/#sec-global-environment-records-createimmutablebinding-n-s)
    pub(crate) fn create_immutable_binding(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<()> {
        let declarative_record = agent.heap.environments.get_global(index).declarative_record;
        // 1. If ! DclRec.HasBinding(N) is true, throw a TypeError exception.
        if agent
            .heap
            .environments
            .get_declarative(declarative_record)
            .has_binding(name)
        {
            let name = name.as_str(agent).to_owned();
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("Identifier '{name}' has already been declared"),
            ));
        }
        // 2. Return ! DclRec.CreateImmutableBinding(N, S).
        agent
            .heap
            .environments
            .get_declarative_mut(declarative_record)
            .create_immutable_binding(name, is_strict);
        Ok(())
    }

    /// ### [9.1.1.4.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-global-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        let record = agent.heap.environments.get_global(index);
        let declarative_record = record.declarative_record;
        let object_record = record.object_record;
        // 1. If ! DclRec.HasBinding(N) is true, then
        if agent
            .heap
            .environments
            .get_declarative(declarative_record)
            .has_binding(name)
        {
            // a. Return ! DclRec.InitializeBinding(N, V).
            agent
                .heap
                .environments
                .get_declarative_mut(declarative_record)
                .initialize_binding(name, value);
            return Ok(());
        }
        // 2. Assert: If the binding exists, it must be in the Object
        //    Environment Record.
        // 3. Return ? ObjRec.InitializeBinding(N, V).
        ObjectEnvironmentRecord::initialize_binding(agent, object_record, name, value)
    }

    /// ### [9.1.1.4.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-global-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        let record = agent.heap.environments.get_global(index);
        let declarative_record = record.declarative_record;
        let object_record = record.object_record;
        // 1. If ! DclRec.HasBinding(N) is true, then
        if agent
            .heap
            .environments
            .get_declarative(declarative_record)
            .has_binding(name)
        {
            // a. Return ? DclRec.SetMutableBinding(N, V, S).
            return match agent
                .heap
                .environments
                .get_declarative_mut(declarative_record)
                .set_mutable_binding(name, value, is_strict)
            {
                Ok(()) => Ok(()),
                Err(error) => Err(error.throw(agent, name)),
            };
        }
        // 2. Return ? ObjRec.SetMutableBinding(N, V, S).
        ObjectEnvironmentRecord::set_mutable_binding(agent, object_record, name, value, is_strict)
    }

    /// ### [9.1.1.4.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-global-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        let record = agent.heap.environments.get_global(index);
        let declarative_record = record.declarative_record;
        let object_record = record.object_record;
        // 1. If ! DclRec.HasBinding(N) is true, then
        if agent
            .heap
            .environments
            .get_declarative(declarative_record)
            .has_binding(name)
        {
            // a. Return ? DclRec.GetBindingValue(N, S).
            return match agent
                .heap
                .environments
                .get_declarative(declarative_record)
                .get_binding_value(name)
            {
                Some(value) => Ok(value),
                None => {
                    let name = name.as_str(agent).to_owned();
                    Err(agent.throw_exception(
                        ExceptionType::ReferenceError,
                        format!("Cannot access '{name}' before initialization"),
                    ))
                }
            };
        }
        // 2. Return ? ObjRec.GetBindingValue(N, S).
        ObjectEnvironmentRecord::get_binding_value(agent, object_record, name, is_strict)
    }

    /// ### [9.1.1.4.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-global-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
    ) -> JsResult<bool> {
        let record = agent.heap.environments.get_global(index);
        let declarative_record = record.declarative_record;
        let object_record = record.object_record;
        // 1. If ! DclRec.HasBinding(N) is true, return ! DclRec.DeleteBinding(N).
        if agent
            .heap
            .environments
            .get_declarative(declarative_record)
            .has_binding(name)
        {
            return Ok(agent
                .heap
                .environments
                .get_declarative_mut(declarative_record)
                .delete_binding(name));
        }
        let global_object = agent.heap.environments.get_object(object_record).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 2. Let existingProp be ? HasOwnProperty(globalObject, N).
        let existing_prop = has_own_property(agent, global_object, key)?;
        // 3. If existingProp is true, then
        if existing_prop {
            // a. Let status be ? ObjRec.DeleteBinding(N).
            let status = ObjectEnvironmentRecord::delete_binding(agent, object_record, name)?;
            // b. If status is true and envRec.[[VarNames]] contains N,
            //    remove N from envRec.[[VarNames]].
            if status {
                agent
                    .heap
                    .environments
                    .get_global_mut(index)
                    .var_names
                    .remove(&name);
            }
            return Ok(status);
        }
        // 4. Return true.
        Ok(true)
    }

    /// ### [9.1.1.4.12 HasVarDeclaration ( N )](https://tc39.es/ecma262/#sec-hasvardeclaration)
    pub(crate) fn has_var_declaration(agent: &Agent, index: GlobalEnvironment, name: HeapString) -> bool {
        agent
            .heap
            .environments
            .get_global(index)
            .var_names
            .contains(&name)
    }

    /// ### [9.1.1.4.13 HasLexicalDeclaration ( N )](https://tc39.es/ecma262/#sec-haslexicaldeclaration)
    pub(crate) fn has_lexical_declaration(
        agent: &Agent,
        index: GlobalEnvironment,
        name: HeapString,
    ) -> bool {
        let declarative_record = agent.heap.environments.get_global(index).declarative_record;
        agent
            .heap
            .environments
            .get_declarative(declarative_record)
            .has_binding(name)
    }

    /// ### [9.1.1.4.14 HasRestrictedGlobalProperty ( N )](https://tc39.es/ecma262/#sec-hasrestrictedglobalproperty)
    pub(crate) fn has_restricted_global_property(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
    ) -> JsResult<bool> {
        let object_record = agent.heap.environments.get_global(index).object_record;
        let global_object = agent.heap.environments.get_object(object_record).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 3. Let existingProp be ? globalObject.[[GetOwnProperty]](N).
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4. If existingProp is undefined, return false.
        let Some(existing_prop) = existing_prop else {
            return Ok(false);
        };
        // 5. If existingProp.[[Configurable]] is true, return false.
        // 6. Return true.
        Ok(existing_prop.configurable != Some(true))
    }

    /// ### [9.1.1.4.15 CanDeclareGlobalVar ( N )](https://tc39.es/ecma262/#sec-candeclareglobalvar)
    pub(crate) fn can_declare_global_var(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
    ) -> JsResult<bool> {
        let object_record = agent.heap.environments.get_global(index).object_record;
        let global_object = agent.heap.environments.get_object(object_record).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 3. Let hasProperty be ? HasOwnProperty(globalObject, N).
        let has_property = has_own_property(agent, global_object, key)?;
        // 4. If hasProperty is true, return true.
        if has_property {
            return Ok(true);
        }
        // 5. Return ? IsExtensible(globalObject).
        global_object.internal_is_extensible(agent)
    }

    /// ### [9.1.1.4.16 CanDeclareGlobalFunction ( N )](https://tc39.es/ecma262/#sec-candeclareglobalfunction)
    pub(crate) fn can_declare_global_function(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
    ) -> JsResult<bool> {
        let object_record = agent.heap.environments.get_global(index).object_record;
        let global_object = agent.heap.environments.get_object(object_record).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 3. Let existingProp be ? globalObject.[[GetOwnProperty]](N).
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4. If existingProp is undefined, return ? IsExtensible(globalObject).
        let Some(existing_prop) = existing_prop else {
            return global_object.internal_is_extensible(agent);
        };
        // 5. If existingProp.[[Configurable]] is true, return true.
        if existing_prop.configurable == Some(true) {
            return Ok(true);
        }
        // 6. If IsDataDescriptor(existingProp) is true and existingProp has
        //    attribute values { [[Writable]]: true, [[Enumerable]]: true },
        //    return true.
        if existing_prop.is_data_descriptor()
            && existing_prop.writable == Some(true)
            && existing_prop.enumerable == Some(true)
        {
            return Ok(true);
        }
        // 7. Return false.
        Ok(false)
    }

    /// ### [9.1.1.4.17 CreateGlobalVarBinding ( N, D )](https://tc39.es/ecma262/#sec-createglobalvarbinding)
    pub(crate) fn create_global_var_binding(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        let object_record = agent.heap.environments.get_global(index).object_record;
        let global_object = agent.heap.environments.get_object(object_record).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 3. Let hasProperty be ? HasOwnProperty(globalObject, N).
        let has_property = has_own_property(agent, global_object, key)?;
        // 4. Let extensible be ? IsExtensible(globalObject).
        let extensible = global_object.internal_is_extensible(agent)?;
        // 5. If hasProperty is false and extensible is true, then
        if !has_property && extensible {
            // a. Perform ? ObjRec.CreateMutableBinding(N, D).
            ObjectEnvironmentRecord::create_mutable_binding(
                agent,
                object_record,
                name,
                is_deletable,
            )?;
            // b. Perform ? ObjRec.InitializeBinding(N, undefined).
            ObjectEnvironmentRecord::initialize_binding(
                agent,
                object_record,
                name,
                Value::Undefined,
            )?;
        }
        // 6. If envRec.[[VarNames]] does not contain N, append N.
        agent
            .heap
            .environments
            .get_global_mut(index)
            .var_names
            .insert(name);
        Ok(())
    }

    /// ### [9.1.1.4.18 CreateGlobalFunctionBinding ( N, V, D )](https://tc39.es/ecma262/#sec-createglobalfunctionbinding)
    pub(crate) fn create_global_function_binding(
        agent: &mut Agent,
        index: GlobalEnvironment,
        name: HeapString,
        value: Value,
        is_deletable: bool,
    ) -> JsResult<()> {
        let object_record = agent.heap.environments.get_global(index).object_record;
        let global_object = agent.heap.environments.get_object(object_record).binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        // 3. Let existingProp be ? globalObject.[[GetOwnProperty]](N).
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4./5. Choose the descriptor shape based on what exists.
        let desc = match existing_prop {
            None => PropertyDescriptor {
                value: Some(value),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(is_deletable),
                ..Default::default()
            },
            Some(existing) if existing.configurable == Some(true) => PropertyDescriptor {
                value: Some(value),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(is_deletable),
                ..Default::default()
            },
            Some(_) => PropertyDescriptor {
                value: Some(value),
                ..Default::default()
            },
        };
        // 6. Perform ? DefinePropertyOrThrow(globalObject, N, desc).
        define_property_or_throw(agent, global_object, key, desc)?;
        // 7. Perform ? Set(globalObject, N, V, false).
        set(agent, global_object, key, value, false)?;
        // 8. If envRec.[[VarNames]] does not contain N, append N.
        agent
            .heap
            .environments
            .get_global_mut(index)
            .var_names
            .insert(name);
        Ok(())
    }
}
