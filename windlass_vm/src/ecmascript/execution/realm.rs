// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.3 Realms](https://tc39.es/ecma262/#sec-code-realms)
//!
//! A realm is a unit of isolation: its own global object, its own
//! intrinsics, its own environment root. Intrinsics are assembled by the
//! installed plugins in dependency order; global bindings are staged during
//! assembly and committed to the global object afterwards.

use ahash::AHashMap;

use super::environments::{EnvironmentIndex, GlobalEnvironment, GlobalEnvironmentRecord};
use super::execution_context::ExecutionContext;
use super::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{Object, ObjectHeapData, ObjectKind, Property, PropertyKey};
use crate::heap::RealmIdentifier;
use crate::plugins::{Plugin, StagedGlobals, DEFAULT_PLUGINS};

/// The table of intrinsic objects of one realm, keyed by well-known name.
///
/// Plugins register entries during realm assembly; lookups of a name no
/// installed plugin provided are a bug in the plugin dependency
/// declarations, hence the panic.
#[derive(Debug, Default)]
pub struct Intrinsics {
    table: AHashMap<&'static str, Object>,
}

impl Intrinsics {
    pub fn get(&self, name: &str) -> Object {
        *self
            .table
            .get(name)
            .unwrap_or_else(|| panic!("intrinsic {name} was never created"))
    }

    pub fn try_get(&self, name: &str) -> Option<Object> {
        self.table.get(name).copied()
    }

    pub fn set(&mut self, name: &'static str, object: Object) {
        let previous = self.table.insert(name, object);
        debug_assert!(previous.is_none(), "intrinsic {name} created twice");
    }

    pub fn object_prototype(&self) -> Object {
        self.get("%Object.prototype%")
    }

    pub fn function_prototype(&self) -> Object {
        self.get("%Function.prototype%")
    }

    pub fn iterator_prototype(&self) -> Object {
        self.get("%IteratorPrototype%")
    }

    pub fn generator_prototype(&self) -> Object {
        self.get("%GeneratorPrototype%")
    }

    pub fn promise_prototype(&self) -> Object {
        self.get("%Promise.prototype%")
    }

    pub fn throw_type_error(&self) -> Object {
        self.get("%ThrowTypeError%")
    }

    pub fn error_prototype(&self, kind: ExceptionType) -> Object {
        self.get(match kind {
            ExceptionType::Error => "%Error.prototype%",
            ExceptionType::AggregateError => "%AggregateError.prototype%",
            ExceptionType::EvalError => "%EvalError.prototype%",
            ExceptionType::RangeError => "%RangeError.prototype%",
            ExceptionType::ReferenceError => "%ReferenceError.prototype%",
            ExceptionType::SyntaxError => "%SyntaxError.prototype%",
            ExceptionType::TypeError => "%TypeError.prototype%",
            ExceptionType::UriError => "%URIError.prototype%",
        })
    }

    pub fn error_constructor(&self, kind: ExceptionType) -> Object {
        self.get(match kind {
            ExceptionType::Error => "%Error%",
            ExceptionType::AggregateError => "%AggregateError%",
            ExceptionType::EvalError => "%EvalError%",
            ExceptionType::RangeError => "%RangeError%",
            ExceptionType::ReferenceError => "%ReferenceError%",
            ExceptionType::SyntaxError => "%SyntaxError%",
            ExceptionType::TypeError => "%TypeError%",
            ExceptionType::UriError => "%URIError%",
        })
    }
}

/// The prototype intrinsics `OrdinaryCreateFromConstructor` can fall back
/// to when `new.target` carries no usable `prototype` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtoIntrinsics {
    Array,
    BigInt,
    Boolean,
    Error,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
    AggregateError,
    Function,
    Generator,
    AsyncGenerator,
    Map,
    Number,
    Object,
    Promise,
    RegExp,
    Set,
    String,
    Symbol,
    WeakMap,
    WeakSet,
}

impl ProtoIntrinsics {
    pub fn intrinsic_name(self) -> &'static str {
        match self {
            ProtoIntrinsics::Array => "%Array.prototype%",
            ProtoIntrinsics::BigInt => "%BigInt.prototype%",
            ProtoIntrinsics::Boolean => "%Boolean.prototype%",
            ProtoIntrinsics::Error => "%Error.prototype%",
            ProtoIntrinsics::EvalError => "%EvalError.prototype%",
            ProtoIntrinsics::RangeError => "%RangeError.prototype%",
            ProtoIntrinsics::ReferenceError => "%ReferenceError.prototype%",
            ProtoIntrinsics::SyntaxError => "%SyntaxError.prototype%",
            ProtoIntrinsics::TypeError => "%TypeError.prototype%",
            ProtoIntrinsics::UriError => "%URIError.prototype%",
            ProtoIntrinsics::AggregateError => "%AggregateError.prototype%",
            ProtoIntrinsics::Function => "%Function.prototype%",
            ProtoIntrinsics::Generator => "%GeneratorPrototype%",
            ProtoIntrinsics::AsyncGenerator => "%AsyncGeneratorPrototype%",
            ProtoIntrinsics::Map => "%Map.prototype%",
            ProtoIntrinsics::Number => "%Number.prototype%",
            ProtoIntrinsics::Object => "%Object.prototype%",
            ProtoIntrinsics::Promise => "%Promise.prototype%",
            ProtoIntrinsics::RegExp => "%RegExp.prototype%",
            ProtoIntrinsics::Set => "%Set.prototype%",
            ProtoIntrinsics::String => "%String.prototype%",
            ProtoIntrinsics::Symbol => "%Symbol.prototype%",
            ProtoIntrinsics::WeakMap => "%WeakMap.prototype%",
            ProtoIntrinsics::WeakSet => "%WeakSet.prototype%",
        }
    }
}

/// ### [9.3 Realm Records](https://tc39.es/ecma262/#sec-code-realms)
#[derive(Debug)]
pub struct Realm {
    /// ### \[\[Intrinsics]]
    pub intrinsics: Intrinsics,

    /// ### \[\[GlobalObject]]
    pub global_object: Object,

    /// ### \[\[GlobalEnv]]
    pub global_env: GlobalEnvironment,
}

impl Realm {
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    pub fn global_env_index(&self) -> EnvironmentIndex {
        EnvironmentIndex::Global(self.global_env)
    }
}

/// ### [9.6 InitializeHostDefinedRealm ( )](https://tc39.es/ecma262/#sec-initializehostdefinedrealm)
///
/// Creates a realm, runs every installed plugin's intrinsic construction in
/// installation order, and commits the staged global bindings.
pub fn create_realm(agent: &mut Agent, plugins: &[&'static dyn Plugin]) -> JsResult<RealmIdentifier> {
    // 1. Let realm be a new Realm Record.
    // 3. Let global be OrdinaryObjectCreate(null); its prototype is wired up
    //    by the plugin that creates %Object.prototype%.
    let global_object = agent.heap.create_object(ObjectHeapData::new(None, ObjectKind::Ordinary));
    // 7. Let newGlobalEnv be NewGlobalEnvironment(global, thisValue).
    let global_env = GlobalEnvironmentRecord::new(agent, global_object, global_object);
    agent.heap.realms.push(Realm {
        intrinsics: Intrinsics::default(),
        global_object,
        global_env,
    });
    let realm = RealmIdentifier::last(&agent.heap.realms);

    // 4. Let newContext be a new execution context; push it onto the
    //    execution context stack.
    agent.push_execution_context(ExecutionContext {
        ecmascript_code: None,
        function: None,
        realm,
        script_or_module: None,
    });

    // 8. Perform CreateIntrinsics for every installed plugin, staging
    //    global-binding descriptors as we go.
    let mut staged = StagedGlobals::default();
    for plugin in plugins {
        plugin.create_intrinsics(agent, realm, &mut staged);
    }

    // 9. Commit the staged globals onto the global object.
    let result = commit_staged_globals(agent, global_object, staged);
    agent.pop_execution_context();
    result?;

    Ok(realm)
}

fn commit_staged_globals(
    agent: &mut Agent,
    global_object: Object,
    staged: StagedGlobals,
) -> JsResult<()> {
    for (key, property) in staged.into_entries() {
        agent[global_object].properties.set(key, property);
    }
    // The circular `globalThis` binding closes the staging pass.
    let key = PropertyKey::from_str(agent, "globalThis");
    agent[global_object].properties.set(
        key,
        Property::data(global_object.into(), true, false, true),
    );
    Ok(())
}

/// Creates a realm with every default plugin installed; the plain entry
/// point for embedders and tests that need no custom plugin set.
pub fn initialize_default_realm(agent: &mut Agent) -> RealmIdentifier {
    if agent.syntax_table().is_empty() {
        for plugin in DEFAULT_PLUGINS {
            plugin.register_syntax(agent.syntax_table_mut());
        }
    }
    let realm = create_realm(agent, DEFAULT_PLUGINS).expect("default realm creation cannot fail");
    // Leave the realm entered so the embedder can immediately evaluate
    // scripts against it.
    agent.enter_realm(realm);
    realm
}
