// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::environments::{EnvironmentIndex, PrivateEnvironment};
use crate::ecmascript::scripts_and_modules::ScriptOrModule;
use crate::ecmascript::types::Object;
use crate::heap::{RealmIdentifier, SourceCode};

/// ### [code evaluation state](https://tc39.es/ecma262/#table-state-components-for-all-execution-contexts)
///
/// The additional state components of ECMAScript code execution contexts.
#[derive(Debug, Clone, Copy)]
pub struct ECMAScriptCodeEvaluationState {
    /// ### LexicalEnvironment
    ///
    /// The Environment Record used to resolve identifier references made by
    /// code within this execution context.
    pub lexical_environment: EnvironmentIndex,

    /// ### VariableEnvironment
    ///
    /// The Environment Record holding bindings created by VariableStatements
    /// within this execution context.
    pub variable_environment: EnvironmentIndex,

    /// ### PrivateEnvironment
    ///
    /// The PrivateEnvironment Record holding Private Names created by
    /// ClassElements in the nearest containing class, or null.
    pub private_environment: Option<PrivateEnvironment>,

    /// Whether the code of this context is strict mode code.
    pub is_strict_mode: bool,

    /// The source code the currently evaluated code was defined in.
    pub source_code: SourceCode,
}

/// ### [9.4 Execution Contexts](https://tc39.es/ecma262/#sec-execution-contexts)
///
/// Tracks the runtime evaluation of code. The agent owns a stack of these;
/// the topmost is the running execution context. A generator's context is
/// detached from the stack on yield and re-attached on resume.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// ### code evaluation state
    pub ecmascript_code: Option<ECMAScriptCodeEvaluationState>,

    /// ### Function
    ///
    /// The function object whose code this context is evaluating, or None
    /// when evaluating the code of a Script or Module.
    pub function: Option<Object>,

    /// ### Realm
    ///
    /// The Realm Record from which associated code accesses ECMAScript
    /// resources.
    pub realm: RealmIdentifier,

    /// ### ScriptOrModule
    ///
    /// The Script Record or Module Record from which associated code
    /// originates, if any.
    pub script_or_module: Option<ScriptOrModule>,
}
