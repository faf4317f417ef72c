// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.1 Environment Records](https://tc39.es/ecma262/#sec-environment-records)
//!
//! Environment Records define the association of identifiers to specific
//! variables and functions, based upon the lexical nesting structure of the
//! code. Every record has an \[\[OuterEnv]] field, either null or a
//! reference to an outer record; lookups walk outward.

mod declarative_environment;
mod function_environment;
mod global_environment;
mod object_environment;
mod private_environment;

pub use declarative_environment::{new_declarative_environment, DeclarativeEnvironmentRecord};
pub(crate) use function_environment::get_this_function_environment;
pub use function_environment::{
    new_function_environment, FunctionEnvironmentRecord, ThisBindingStatus,
};
pub use global_environment::GlobalEnvironmentRecord;
pub use object_environment::{new_object_environment, ObjectEnvironmentRecord};
pub use private_environment::PrivateEnvironmentRecord;

use crate::ecmascript::types::{Base, HeapString, Object, Reference, Value};
use crate::heap::heap_index;

use super::{Agent, JsResult};

heap_index!(
    /// An index into the declarative environment arena.
    DeclarativeEnvironment
);
heap_index!(
    /// An index into the function environment arena.
    FunctionEnvironment
);
heap_index!(
    /// An index into the global environment arena.
    GlobalEnvironment
);
heap_index!(
    /// An index into the object environment arena.
    ObjectEnvironment
);
heap_index!(
    /// An index into the private environment arena.
    PrivateEnvironment
);

/// ### [\[\[OuterEnv\]\]](https://tc39.es/ecma262/#sec-environment-records)
pub type OuterEnv = Option<EnvironmentIndex>;

/// ### [9.1.1 The Environment Record Type Hierarchy](https://tc39.es/ecma262/#sec-the-environment-record-type-hierarchy)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentIndex {
    Declarative(DeclarativeEnvironment),
    Function(FunctionEnvironment),
    Global(GlobalEnvironment),
    Object(ObjectEnvironment),
}

#[derive(Debug)]
pub struct Environments {
    pub(crate) declarative: Vec<DeclarativeEnvironmentRecord>,
    pub(crate) function: Vec<FunctionEnvironmentRecord>,
    pub(crate) global: Vec<GlobalEnvironmentRecord>,
    pub(crate) object: Vec<ObjectEnvironmentRecord>,
    pub(crate) private: Vec<PrivateEnvironmentRecord>,
}

impl Default for Environments {
    fn default() -> Self {
        Self {
            declarative: Vec::with_capacity(256),
            function: Vec::with_capacity(256),
            global: Vec::with_capacity(1),
            object: Vec::with_capacity(16),
            private: Vec::new(),
        }
    }
}

impl Environments {
    pub(crate) fn get_declarative(
        &self,
        index: DeclarativeEnvironment,
    ) -> &DeclarativeEnvironmentRecord {
        &self.declarative[index.into_index()]
    }

    pub(crate) fn get_declarative_mut(
        &mut self,
        index: DeclarativeEnvironment,
    ) -> &mut DeclarativeEnvironmentRecord {
        &mut self.declarative[index.into_index()]
    }

    pub(crate) fn get_function(&self, index: FunctionEnvironment) -> &FunctionEnvironmentRecord {
        &self.function[index.into_index()]
    }

    pub(crate) fn get_function_mut(
        &mut self,
        index: FunctionEnvironment,
    ) -> &mut FunctionEnvironmentRecord {
        &mut self.function[index.into_index()]
    }

    pub(crate) fn get_global(&self, index: GlobalEnvironment) -> &GlobalEnvironmentRecord {
        &self.global[index.into_index()]
    }

    pub(crate) fn get_global_mut(
        &mut self,
        index: GlobalEnvironment,
    ) -> &mut GlobalEnvironmentRecord {
        &mut self.global[index.into_index()]
    }

    pub(crate) fn get_object(&self, index: ObjectEnvironment) -> &ObjectEnvironmentRecord {
        &self.object[index.into_index()]
    }

    pub(crate) fn get_object_mut(
        &mut self,
        index: ObjectEnvironment,
    ) -> &mut ObjectEnvironmentRecord {
        &mut self.object[index.into_index()]
    }
}

impl EnvironmentIndex {
    pub fn get_outer_env(self, agent: &Agent) -> OuterEnv {
        match self {
            EnvironmentIndex::Declarative(index) => {
                agent.heap.environments.get_declarative(index).outer_env
            }
            EnvironmentIndex::Function(index) => {
                agent.heap.environments.get_function(index).declarative.outer_env
            }
            EnvironmentIndex::Global(_) => None,
            EnvironmentIndex::Object(index) => {
                agent.heap.environments.get_object(index).outer_env
            }
        }
    }

    /// ### [HasBinding(N)](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    ///
    /// Determine if an Environment Record has a binding for the String value
    /// N. Return true if it does and false if it does not.
    pub fn has_binding(self, agent: &mut Agent, name: HeapString) -> JsResult<bool> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                Ok(agent.heap.environments.get_declarative(index).has_binding(name))
            }
            EnvironmentIndex::Function(index) => Ok(agent
                .heap
                .environments
                .get_function(index)
                .declarative
                .has_binding(name)),
            EnvironmentIndex::Global(index) => {
                GlobalEnvironmentRecord::has_binding(agent, index, name)
            }
            EnvironmentIndex::Object(index) => {
                ObjectEnvironmentRecord::has_binding(agent, index, name)
            }
        }
    }

    /// ### [CreateMutableBinding(N, D)](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    ///
    /// Create a new but uninitialized mutable binding in an Environment
    /// Record. If D is true the binding may be subsequently deleted.
    pub fn create_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                agent
                    .heap
                    .environments
                    .get_declarative_mut(index)
                    .create_mutable_binding(name, is_deletable);
                Ok(())
            }
            EnvironmentIndex::Function(index) => {
                agent
                    .heap
                    .environments
                    .get_function_mut(index)
                    .declarative
                    .create_mutable_binding(name, is_deletable);
                Ok(())
            }
            EnvironmentIndex::Global(index) => {
                GlobalEnvironmentRecord::create_mutable_binding(agent, index, name, is_deletable)
            }
            EnvironmentIndex::Object(index) => {
                ObjectEnvironmentRecord::create_mutable_binding(agent, index, name, is_deletable)
            }
        }
    }

    /// ### [CreateImmutableBinding(N, S)](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub fn create_immutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                agent
                    .heap
                    .environments
                    .get_declarative_mut(index)
                    .create_immutable_binding(name, is_strict);
                Ok(())
            }
            EnvironmentIndex::Function(index) => {
                agent
                    .heap
                    .environments
                    .get_function_mut(index)
                    .declarative
                    .create_immutable_binding(name, is_strict);
                Ok(())
            }
            EnvironmentIndex::Global(index) => {
                GlobalEnvironmentRecord::create_immutable_binding(agent, index, name, is_strict)
            }
            EnvironmentIndex::Object(_) => {
                unreachable!("object environments never receive immutable bindings")
            }
        }
    }

    /// ### [InitializeBinding(N, V)](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub fn initialize_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                agent
                    .heap
                    .environments
                    .get_declarative_mut(index)
                    .initialize_binding(name, value);
                Ok(())
            }
            EnvironmentIndex::Function(index) => {
                agent
                    .heap
                    .environments
                    .get_function_mut(index)
                    .declarative
                    .initialize_binding(name, value);
                Ok(())
            }
            EnvironmentIndex::Global(index) => {
                GlobalEnvironmentRecord::initialize_binding(agent, index, name, value)
            }
            EnvironmentIndex::Object(index) => {
                ObjectEnvironmentRecord::initialize_binding(agent, index, name, value)
            }
        }
    }

    /// ### [SetMutableBinding(N, V, S)](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                DeclarativeEnvironmentRecord::set_mutable_binding_on(
                    agent, index, name, value, is_strict,
                )
            }
            EnvironmentIndex::Function(index) => {
                FunctionEnvironmentRecord::set_mutable_binding(agent, index, name, value, is_strict)
            }
            EnvironmentIndex::Global(index) => {
                GlobalEnvironmentRecord::set_mutable_binding(agent, index, name, value, is_strict)
            }
            EnvironmentIndex::Object(index) => {
                ObjectEnvironmentRecord::set_mutable_binding(agent, index, name, value, is_strict)
            }
        }
    }

    /// ### [GetBindingValue(N, S)](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    ///
    /// If the binding exists but is uninitialized a ReferenceError is
    /// thrown, regardless of S.
    pub fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                DeclarativeEnvironmentRecord::get_binding_value_on(agent, index, name, is_strict)
            }
            EnvironmentIndex::Function(index) => {
                FunctionEnvironmentRecord::get_binding_value(agent, index, name, is_strict)
            }
            EnvironmentIndex::Global(index) => {
                GlobalEnvironmentRecord::get_binding_value(agent, index, name, is_strict)
            }
            EnvironmentIndex::Object(index) => {
                ObjectEnvironmentRecord::get_binding_value(agent, index, name, is_strict)
            }
        }
    }

    /// ### [DeleteBinding(N)](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub fn delete_binding(self, agent: &mut Agent, name: HeapString) -> JsResult<bool> {
        match self {
            EnvironmentIndex::Declarative(index) => Ok(agent
                .heap
                .environments
                .get_declarative_mut(index)
                .delete_binding(name)),
            EnvironmentIndex::Function(index) => Ok(agent
                .heap
                .environments
                .get_function_mut(index)
                .declarative
                .delete_binding(name)),
            EnvironmentIndex::Global(index) => {
                GlobalEnvironmentRecord::delete_binding(agent, index, name)
            }
            EnvironmentIndex::Object(index) => {
                ObjectEnvironmentRecord::delete_binding(agent, index, name)
            }
        }
    }

    /// ### [HasThisBinding()](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub fn has_this_binding(self, agent: &Agent) -> bool {
        match self {
            EnvironmentIndex::Declarative(_) => false,
            EnvironmentIndex::Function(index) => agent
                .heap
                .environments
                .get_function(index)
                .has_this_binding(),
            EnvironmentIndex::Global(_) => true,
            EnvironmentIndex::Object(_) => false,
        }
    }

    /// ### [GetThisBinding()](https://tc39.es/ecma262/#sec-function-environment-records-getthisbinding)
    pub fn get_this_binding(self, agent: &mut Agent) -> JsResult<Value> {
        match self {
            EnvironmentIndex::Function(index) => {
                FunctionEnvironmentRecord::get_this_binding(agent, index)
            }
            EnvironmentIndex::Global(index) => {
                Ok(Value::Object(agent.heap.environments.get_global(index).global_this_value))
            }
            _ => unreachable!("record has no this binding"),
        }
    }

    /// ### [WithBaseObject()](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub fn with_base_object(self, agent: &Agent) -> Option<Object> {
        match self {
            EnvironmentIndex::Object(index) => {
                let record = agent.heap.environments.get_object(index);
                if record.is_with_environment {
                    Some(record.binding_object)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// ### [9.1.2.1 GetIdentifierReference ( env, name, strict )](https://tc39.es/ecma262/#sec-getidentifierreference)
pub fn get_identifier_reference(
    agent: &mut Agent,
    env: Option<EnvironmentIndex>,
    name: HeapString,
    strict: bool,
) -> JsResult<Reference> {
    // 1. If env is null, then
    let Some(env) = env else {
        // a. Return the Reference Record {
        //    [[Base]]: UNRESOLVABLE, [[ReferencedName]]: name,
        //    [[Strict]]: strict, [[ThisValue]]: EMPTY }.
        return Ok(Reference {
            base: Base::Unresolvable,
            referenced_name: name.into(),
            strict,
            this_value: None,
        });
    };

    // 2. Let exists be ? env.HasBinding(name).
    let exists = env.has_binding(agent, name)?;

    // 3. If exists is true, then
    if exists {
        // a. Return the Reference Record {
        //    [[Base]]: env, [[ReferencedName]]: name,
        //    [[Strict]]: strict, [[ThisValue]]: EMPTY }.
        Ok(Reference {
            base: Base::Environment(env),
            referenced_name: name.into(),
            strict,
            this_value: None,
        })
    } else {
        // 4. Else,
        // a. Let outer be env.[[OuterEnv]].
        let outer = env.get_outer_env(agent);
        // b. Return ? GetIdentifierReference(outer, name, strict).
        get_identifier_reference(agent, outer, name, strict)
    }
}

/// ### [9.4.3 GetThisEnvironment ( )](https://tc39.es/ecma262/#sec-getthisenvironment)
///
/// Finds the Environment Record that currently supplies the binding of the
/// keyword `this`.
pub fn get_this_environment(agent: &Agent) -> EnvironmentIndex {
    // 1. Let env be the running execution context's LexicalEnvironment.
    let mut env = agent.current_lexical_environment();
    // 2. Repeat,
    loop {
        // a. Let exists be env.HasThisBinding().
        // b. If exists is true, return env.
        if env.has_this_binding(agent) {
            return env;
        }
        // c. Let outer be env.[[OuterEnv]].
        // d. Assert: outer is not null.
        // e. Set env to outer.
        env = env.get_outer_env(agent).unwrap();
    }
}
