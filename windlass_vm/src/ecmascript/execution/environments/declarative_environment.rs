// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use super::{DeclarativeEnvironment, OuterEnv};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{HeapString, Value};

/// ### [9.1.1.1 Declarative Environment Records](https://tc39.es/ecma262/#sec-declarative-environment-records)
///
/// Defines the effect of syntactic elements such as FunctionDeclarations,
/// VariableDeclarations, and Catch clauses that directly associate
/// identifier bindings with language values.
#[derive(Debug, Clone, Default)]
pub struct DeclarativeEnvironmentRecord {
    /// ### \[\[OuterEnv]]
    pub(crate) outer_env: OuterEnv,

    /// The environment's bindings.
    bindings: AHashMap<HeapString, Binding>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Binding {
    /// `None` means the binding is uninitialized.
    pub(crate) value: Option<Value>,
    pub(super) strict: bool,
    pub(super) mutable: bool,
    pub(super) deletable: bool,
}

impl DeclarativeEnvironmentRecord {
    /// ### [9.1.2.2 NewDeclarativeEnvironment ( E )](https://tc39.es/ecma262/#sec-newdeclarativeenvironment)
    pub(crate) fn new(outer_env: OuterEnv) -> Self {
        // 1. Let env be a new Declarative Environment Record containing no
        //    bindings.
        // 2. Set env.[[OuterEnv]] to E.
        // 3. Return env.
        Self {
            outer_env,
            bindings: AHashMap::default(),
        }
    }

    /// ### [9.1.1.1.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-declarative-environment-records-hasbinding-n)
    pub(crate) fn has_binding(&self, name: HeapString) -> bool {
        // 1. If envRec has a binding for N, return true.
        // 2. Return false.
        self.bindings.contains_key(&name)
    }

    /// ### [9.1.1.1.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-declarative-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(&mut self, name: HeapString, is_deletable: bool) {
        // 1. Assert: envRec does not already have a binding for N.
        debug_assert!(!self.has_binding(name));
        // 2. Create a mutable binding in envRec for N and record that it is
        //    uninitialized.
        self.bindings.insert(
            name,
            Binding {
                value: None,
                // Strictness only matters for immutable bindings.
                strict: false,
                mutable: true,
                deletable: is_deletable,
            },
        );
    }

    /// ### [9.1.1.1.3 CreateImmutableBinding ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-createimmutablebinding-n-s)
    pub(crate) fn create_immutable_binding(&mut self, name: HeapString, is_strict: bool) {
        // 1. Assert: envRec does not already have a binding for N.
        debug_assert!(!self.has_binding(name));
        // 2. Create an immutable binding in envRec for N and record that it
        //    is uninitialized.
        self.bindings.insert(
            name,
            Binding {
                value: None,
                strict: is_strict,
                mutable: false,
                deletable: false,
            },
        );
    }

    /// ### [9.1.1.1.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-declarative-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(&mut self, name: HeapString, value: Value) {
        // 1. Assert: envRec must have an uninitialized binding for N.
        let binding = self.bindings.get_mut(&name).unwrap();
        debug_assert!(binding.value.is_none());
        // 2. Set the bound value for N in envRec to V.
        // 3. Record that the binding for N in envRec has been initialized.
        binding.value = Some(value);
    }

    /// ### [9.1.1.1.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-getbindingvalue-n-s)
    ///
    /// Returns `None` for an uninitialized binding; the caller throws.
    pub(crate) fn get_binding_value(&self, name: HeapString) -> Option<Value> {
        // 1. Assert: envRec has a binding for N.
        let binding = self.bindings.get(&name).unwrap();
        // 2. If the binding for N in envRec is an uninitialized binding,
        //    throw a ReferenceError exception.
        // 3. Return the value currently bound to N in envRec.
        binding.value
    }

    pub(crate) fn get_binding(&self, name: HeapString) -> Option<&Binding> {
        self.bindings.get(&name)
    }

    pub(crate) fn get_binding_mut(&mut self, name: HeapString) -> Option<&mut Binding> {
        self.bindings.get_mut(&name)
    }

    /// ### [9.1.1.1.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-declarative-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(&mut self, name: HeapString) -> bool {
        // 1. Assert: envRec has a binding for N.
        let binding = self.bindings.get(&name).unwrap();
        // 2. If the binding for N in envRec cannot be deleted, return false.
        if !binding.deletable {
            return false;
        }
        // 3. Remove the binding for N from envRec.
        self.bindings.remove(&name);
        // 4. Return true.
        true
    }

    /// ### [9.1.1.1.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-setmutablebinding-n-v-s)
    ///
    /// Shared by declarative and function records (the latter delegate to
    /// their embedded declarative record), hence the `set_mutable_binding`
    /// body lives on the record while the arena-indexed entry points wrap
    /// it with error construction.
    pub(crate) fn set_mutable_binding(
        &mut self,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> Result<(), SetBindingError> {
        // 1. If envRec does not have a binding for N, then
        let Some(binding) = self.bindings.get_mut(&name) else {
            // a. If S is true, throw a ReferenceError exception.
            if is_strict {
                return Err(SetBindingError::MissingBinding);
            }
            // b. Perform ! envRec.CreateMutableBinding(N, true).
            // c. Perform ! envRec.InitializeBinding(N, V).
            self.bindings.insert(
                name,
                Binding {
                    value: Some(value),
                    strict: false,
                    mutable: true,
                    deletable: true,
                },
            );
            // d. Return UNUSED.
            return Ok(());
        };

        // 2. If the binding for N in envRec is a strict binding, set S to
        //    true.
        let is_strict = is_strict || binding.strict;

        // 3. If the binding for N in envRec has not yet been initialized,
        //    throw a ReferenceError exception.
        if binding.value.is_none() {
            return Err(SetBindingError::Uninitialized);
        }

        // 4. Else if the binding for N in envRec is a mutable binding,
        //    change its bound value to V.
        if binding.mutable {
            binding.value = Some(value);
        } else {
            // 5. Else: this is an attempt to change the value of an
            //    immutable binding. If S is true, throw a TypeError.
            if is_strict {
                return Err(SetBindingError::Immutable);
            }
        }

        // 6. Return UNUSED.
        Ok(())
    }
}

/// Why a binding write failed; the arena entry points turn these into the
/// spec'd exceptions with the binding's name in the message.
pub(crate) enum SetBindingError {
    MissingBinding,
    Uninitialized,
    Immutable,
}

impl SetBindingError {
    pub(crate) fn throw(
        self,
        agent: &mut Agent,
        name: HeapString,
    ) -> crate::ecmascript::execution::JsError {
        let name = name.as_str(agent).to_owned();
        match self {
            SetBindingError::MissingBinding => agent.throw_exception(
                ExceptionType::ReferenceError,
                format!("Cannot assign to nonexisting binding '{name}'"),
            ),
            SetBindingError::Uninitialized => agent.throw_exception(
                ExceptionType::ReferenceError,
                format!("Identifier '{name}' has not been initialized"),
            ),
            SetBindingError::Immutable => agent.throw_exception(
                ExceptionType::TypeError,
                format!("Assignment to constant variable '{name}'"),
            ),
        }
    }
}

impl DeclarativeEnvironmentRecord {
    pub(crate) fn set_mutable_binding_on(
        agent: &mut Agent,
        index: DeclarativeEnvironment,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        match agent
            .heap
            .environments
            .get_declarative_mut(index)
            .set_mutable_binding(name, value, is_strict)
        {
            Ok(()) => Ok(()),
            Err(error) => Err(error.throw(agent, name)),
        }
    }

    pub(crate) fn get_binding_value_on(
        agent: &mut Agent,
        index: DeclarativeEnvironment,
        name: HeapString,
        _is_strict: bool,
    ) -> JsResult<Value> {
        match agent
            .heap
            .environments
            .get_declarative(index)
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
        }
    }
}

/// ### [9.1.2.2 NewDeclarativeEnvironment ( E )](https://tc39.es/ecma262/#sec-newdeclarativeenvironment)
pub fn new_declarative_environment(agent: &mut Agent, outer_env: OuterEnv) -> DeclarativeEnvironment {
    agent
        .heap
        .environments
        .declarative
        .push(DeclarativeEnvironmentRecord::new(outer_env));
    DeclarativeEnvironment::last(&agent.heap.environments.declarative)
}
