// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::declarative_environment::DeclarativeEnvironmentRecord;
use super::{EnvironmentIndex, FunctionEnvironment, OuterEnv};
use crate::ecmascript::builtins::ecmascript_function::ThisMode;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{HeapString, Object, ObjectKind, Value};

/// ### [\[\[ThisBindingStatus]]](https://tc39.es/ecma262/#table-additional-fields-of-function-environment-records)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisBindingStatus {
    /// The function is an ArrowFunction and does not have a local `this`
    /// value.
    Lexical,
    /// `this` has not been bound yet; reading it is a ReferenceError.
    Uninitialized,
    /// `this` has been bound; binding it again is a ReferenceError.
    Initialized,
}

/// ### [9.1.1.3 Function Environment Records](https://tc39.es/ecma262/#sec-function-environment-records)
///
/// A declarative record augmented with the state of the `this` binding of a
/// function invocation, plus the invoked function and `new.target`.
#[derive(Debug, Clone)]
pub struct FunctionEnvironmentRecord {
    pub(crate) declarative: DeclarativeEnvironmentRecord,

    /// ### \[\[ThisValue]]
    pub(crate) this_value: Option<Value>,

    /// ### \[\[ThisBindingStatus]]
    pub(crate) this_binding_status: ThisBindingStatus,

    /// ### \[\[FunctionObject]]
    pub(crate) function_object: Object,

    /// ### \[\[NewTarget]]
    pub(crate) new_target: Option<Object>,
}

impl FunctionEnvironmentRecord {
    /// ### [9.1.1.3.1 BindThisValue ( V )](https://tc39.es/ecma262/#sec-bindthisvalue)
    ///
    /// The binding is one-shot: `{uninitialized → initialized}`.
    pub(crate) fn bind_this_value(
        agent: &mut Agent,
        index: FunctionEnvironment,
        value: Value,
    ) -> JsResult<Value> {
        let record = agent.heap.environments.get_function_mut(index);
        // 1. Assert: envRec.[[ThisBindingStatus]] is not LEXICAL.
        debug_assert!(record.this_binding_status != ThisBindingStatus::Lexical);
        // 2. If envRec.[[ThisBindingStatus]] is INITIALIZED, throw a
        //    ReferenceError exception.
        if record.this_binding_status == ThisBindingStatus::Initialized {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::ReferenceError,
                "Super constructor may only be called once",
            ));
        }
        // 3. Set envRec.[[ThisValue]] to V.
        record.this_value = Some(value);
        // 4. Set envRec.[[ThisBindingStatus]] to INITIALIZED.
        record.this_binding_status = ThisBindingStatus::Initialized;
        // 5. Return V.
        Ok(value)
    }

    /// ### [9.1.1.3.2 HasThisBinding ( )](https://tc39.es/ecma262/#sec-function-environment-records-hasthisbinding)
    pub(crate) fn has_this_binding(&self) -> bool {
        // 1. If envRec.[[ThisBindingStatus]] is LEXICAL, return false;
        //    otherwise, return true.
        self.this_binding_status != ThisBindingStatus::Lexical
    }

    /// ### [9.1.1.3.4 GetThisBinding ( )](https://tc39.es/ecma262/#sec-function-environment-records-getthisbinding)
    pub(crate) fn get_this_binding(
        agent: &mut Agent,
        index: FunctionEnvironment,
    ) -> JsResult<Value> {
        let record = agent.heap.environments.get_function(index);
        // 1. Assert: envRec.[[ThisBindingStatus]] is not LEXICAL.
        debug_assert!(record.this_binding_status != ThisBindingStatus::Lexical);
        // 2. If envRec.[[ThisBindingStatus]] is UNINITIALIZED, throw a
        //    ReferenceError exception.
        if record.this_binding_status == ThisBindingStatus::Uninitialized {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::ReferenceError,
                "Must call super constructor before accessing 'this'",
            ));
        }
        // 3. Return envRec.[[ThisValue]].
        Ok(agent
            .heap
            .environments
            .get_function(index)
            .this_value
            .unwrap())
    }

    /// ### [9.1.1.3.5 GetSuperBase ( )](https://tc39.es/ecma262/#sec-getsuperbase)
    pub(crate) fn get_super_base(agent: &mut Agent, index: FunctionEnvironment) -> JsResult<Value> {
        // 1. Let home be envRec.[[FunctionObject]].[[HomeObject]].
        let function = agent.heap.environments.get_function(index).function_object;
        let home = match &agent[function].kind {
            ObjectKind::ECMAScriptFunction(data) => data.home_object,
            _ => None,
        };
        // 2. If home is undefined, return undefined.
        let Some(home) = home else {
            return Ok(Value::Undefined);
        };
        // 4. Return ? home.[[GetPrototypeOf]]().
        Ok(match home.internal_get_prototype_of(agent)? {
            Some(proto) => Value::Object(proto),
            None => Value::Null,
        })
    }

    pub(crate) fn get_function_object(&self) -> Object {
        self.function_object
    }

    pub(crate) fn get_new_target(&self) -> Option<Object> {
        self.new_target
    }

    pub(crate) fn set_mutable_binding(
        agent: &mut Agent,
        index: FunctionEnvironment,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        match agent
            .heap
            .environments
            .get_function_mut(index)
            .declarative
            .set_mutable_binding(name, value, is_strict)
        {
            Ok(()) => Ok(()),
            Err(error) => Err(error.throw(agent, name)),
        }
    }

    pub(crate) fn get_binding_value(
        agent: &mut Agent,
        index: FunctionEnvironment,
        name: HeapString,
        _is_strict: bool,
    ) -> JsResult<Value> {
        match agent
            .heap
            .environments
            .get_function(index)
            .declarative
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

/// ### [9.1.2.4 NewFunctionEnvironment ( F, newTarget )](https://tc39.es/ecma262/#sec-newfunctionenvironment)
pub fn new_function_environment(
    agent: &mut Agent,
    function: Object,
    new_target: Option<Object>,
) -> FunctionEnvironment {
    let ObjectKind::ECMAScriptFunction(data) = &agent[function].kind else {
        unreachable!("function environments belong to ECMAScript functions")
    };
    // 2. Let env be a new Function Environment Record containing no bindings.
    // 5. If F.[[ThisMode]] is LEXICAL, set env.[[ThisBindingStatus]] to
    //    LEXICAL; otherwise set it to UNINITIALIZED.
    let this_binding_status = if data.this_mode == ThisMode::Lexical {
        ThisBindingStatus::Lexical
    } else {
        ThisBindingStatus::Uninitialized
    };
    // 8. Set env.[[OuterEnv]] to F.[[Environment]].
    let outer_env: OuterEnv = Some(data.environment);
    let record = FunctionEnvironmentRecord {
        declarative: DeclarativeEnvironmentRecord::new(outer_env),
        this_value: None,
        this_binding_status,
        // 3. Set env.[[FunctionObject]] to F.
        function_object: function,
        // 7. Set env.[[NewTarget]] to newTarget.
        new_target,
    };
    agent.heap.environments.function.push(record);
    FunctionEnvironment::last(&agent.heap.environments.function)
}

/// Convenience view of the nearest function environment on the lexical
/// chain, used by `super` and `new.target` evaluation.
pub(crate) fn get_this_function_environment(agent: &Agent) -> Option<FunctionEnvironment> {
    let mut env = Some(agent.current_lexical_environment());
    while let Some(e) = env {
        if let EnvironmentIndex::Function(index) = e {
            return Some(index);
        }
        env = e.get_outer_env(agent);
    }
    None
}
