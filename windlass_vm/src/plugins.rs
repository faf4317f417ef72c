// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The plugin layer: language features are assembled from plugins that
//! declare dependencies, contribute intrinsic constructors, and register
//! syntax handlers. Installation is dependency-ordered; adding a feature
//! is additive and removing one must not break unrelated code paths.

use crate::ecmascript::builders::BuiltinFunctionBuilder;
use crate::ecmascript::builtins::builtin_function::Builtin;
use crate::ecmascript::execution::{Agent, RealmIdentifier};
use crate::ecmascript::types::{Property, PropertyKey, Value};
use crate::engine::dispatch::{
    EvalNode, HandlerResult, SyntaxKind, SyntaxOperation, SyntaxRequest, SyntaxTable,
};

/// Global bindings assembled incrementally during realm creation and
/// committed to the global object after every plugin has run.
#[derive(Debug, Default)]
pub struct StagedGlobals {
    entries: Vec<(PropertyKey, Property)>,
}

impl StagedGlobals {
    /// Stages an intrinsic under its global name with the standard
    /// writable, non-enumerable, configurable attributes.
    pub fn stage_intrinsic(&mut self, agent: &mut Agent, name: &str, value: Value) {
        let key = PropertyKey::from_str(agent, name);
        self.entries.push((key, Property::data(value, true, false, true)));
    }

    /// Stages a frozen value binding (NaN, Infinity, undefined).
    pub fn stage_frozen(&mut self, agent: &mut Agent, name: &str, value: Value) {
        let key = PropertyKey::from_str(agent, name);
        self.entries
            .push((key, Property::data(value, false, false, false)));
    }

    pub fn into_entries(self) -> Vec<(PropertyKey, Property)> {
        self.entries
    }
}

/// One unit of language functionality: intrinsics and/or syntax handlers.
pub trait Plugin: std::fmt::Debug + Sync {
    /// The plugin's unique id, the node of the dependency DAG.
    fn id(&self) -> &'static str;

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    /// Contributes intrinsics to a realm under construction and stages
    /// global bindings.
    fn create_intrinsics(
        &self,
        _agent: &mut Agent,
        _realm: RealmIdentifier,
        _globals: &mut StagedGlobals,
    ) {
    }

    /// Registers syntax handlers; runs once per agent at install time.
    fn register_syntax(&self, _table: &mut SyntaxTable) {}
}

/// Every plugin the default realm installs, in dependency order.
pub static DEFAULT_PLUGINS: &[&'static dyn Plugin] = &[
    &LanguagePlugin,
    &FundamentalObjectsPlugin,
    &ControlAbstractionPlugin,
    &NumericPlugin,
    &TextPlugin,
    &IndexedCollectionsPlugin,
    &KeyedCollectionsPlugin,
    #[cfg(feature = "regexp")]
    &TextProcessingPlugin,
    #[cfg(feature = "json")]
    &StructuredDataPlugin,
    &ReflectionPlugin,
    &GlobalObjectPlugin,
];

/// The base language: `Evaluate` and `NamedEvaluation` handlers for every
/// expression and statement form.
#[derive(Debug)]
pub struct LanguagePlugin;

fn language_evaluate(agent: &mut Agent, request: SyntaxRequest) -> HandlerResult {
    match request {
        SyntaxRequest::Evaluate { node } => match node {
            EvalNode::Expression(expression) => HandlerResult::Step(
                crate::engine::expressions::begin_expression(agent, expression),
            ),
            EvalNode::Statement(statement) => HandlerResult::Step(
                crate::engine::statements::begin_statement(agent, statement),
            ),
        },
        _ => HandlerResult::NotApplicable,
    }
}

fn language_named_evaluation(agent: &mut Agent, request: SyntaxRequest) -> HandlerResult {
    match request {
        SyntaxRequest::NamedEvaluation {
            node: EvalNode::Expression(expression),
            name,
        } => HandlerResult::Step(crate::engine::expressions::begin_expression_named(
            agent,
            expression,
            Some(name),
        )),
        _ => HandlerResult::NotApplicable,
    }
}

const EXPRESSION_KINDS: &[SyntaxKind] = &[
    SyntaxKind::Literal,
    SyntaxKind::Identifier,
    SyntaxKind::ThisExpression,
    SyntaxKind::ArrayExpression,
    SyntaxKind::ObjectExpression,
    SyntaxKind::FunctionExpression,
    SyntaxKind::ArrowFunctionExpression,
    SyntaxKind::ClassExpression,
    SyntaxKind::TemplateLiteral,
    SyntaxKind::TaggedTemplateExpression,
    SyntaxKind::MemberExpression,
    SyntaxKind::CallExpression,
    SyntaxKind::NewExpression,
    SyntaxKind::MetaProperty,
    SyntaxKind::UpdateExpression,
    SyntaxKind::UnaryExpression,
    SyntaxKind::BinaryExpression,
    SyntaxKind::LogicalExpression,
    SyntaxKind::ConditionalExpression,
    SyntaxKind::AssignmentExpression,
    SyntaxKind::SequenceExpression,
    SyntaxKind::YieldExpression,
    SyntaxKind::AwaitExpression,
    SyntaxKind::ChainExpression,
    SyntaxKind::ParenthesizedExpression,
];

const STATEMENT_KINDS: &[SyntaxKind] = &[
    SyntaxKind::BlockStatement,
    SyntaxKind::VariableDeclaration,
    SyntaxKind::EmptyStatement,
    SyntaxKind::ExpressionStatement,
    SyntaxKind::IfStatement,
    SyntaxKind::DoWhileStatement,
    SyntaxKind::WhileStatement,
    SyntaxKind::ForStatement,
    SyntaxKind::ForInStatement,
    SyntaxKind::ForOfStatement,
    SyntaxKind::ContinueStatement,
    SyntaxKind::BreakStatement,
    SyntaxKind::ReturnStatement,
    SyntaxKind::WithStatement,
    SyntaxKind::LabeledStatement,
    SyntaxKind::SwitchStatement,
    SyntaxKind::ThrowStatement,
    SyntaxKind::TryStatement,
    SyntaxKind::DebuggerStatement,
    SyntaxKind::FunctionDeclaration,
    SyntaxKind::ClassDeclaration,
];

impl Plugin for LanguagePlugin {
    fn id(&self) -> &'static str {
        "language"
    }

    fn register_syntax(&self, table: &mut SyntaxTable) {
        for kind in EXPRESSION_KINDS {
            table.register(SyntaxOperation::Evaluate, *kind, language_evaluate);
            table.register(
                SyntaxOperation::NamedEvaluation,
                *kind,
                language_named_evaluation,
            );
        }
        for kind in STATEMENT_KINDS {
            table.register(SyntaxOperation::Evaluate, *kind, language_evaluate);
        }
    }
}

/// Object, Function, Boolean, Symbol, and the Error hierarchy.
#[derive(Debug)]
pub struct FundamentalObjectsPlugin;

impl Plugin for FundamentalObjectsPlugin {
    fn id(&self) -> &'static str {
        "fundamental"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["language"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        use crate::ecmascript::builtins::fundamental_objects::*;

        // Bootstrap: %Object.prototype% and the callable
        // %Function.prototype% must exist before any builder can run.
        let object_prototype = crate::ecmascript::builtins::ordinary::ordinary_object_create(
            agent, None,
        );
        agent
            .get_realm_mut(realm)
            .intrinsics
            .set("%Object.prototype%", object_prototype);
        let function_prototype = agent.heap.create_object(
            crate::ecmascript::types::ObjectHeapData::new(
                Some(object_prototype),
                crate::ecmascript::types::ObjectKind::BuiltinFunction(
                    crate::ecmascript::builtins::builtin_function::BuiltinFunctionData {
                        behaviour: crate::ecmascript::builtins::builtin_function::Behaviour::Regular(
                            function_objects::FunctionPrototype::behaviour,
                        ),
                        realm,
                    },
                ),
            ),
        );
        agent
            .get_realm_mut(realm)
            .intrinsics
            .set("%Function.prototype%", function_prototype);
        // The global object inherits from %Object.prototype%.
        let global_object = agent.get_realm(realm).global_object;
        agent[global_object].prototype = Some(object_prototype);

        object_objects::create_object_intrinsics(agent, realm);
        function_objects::create_function_intrinsics(agent, realm);
        boolean_objects::create_boolean_intrinsics(agent, realm);
        symbol_objects::create_symbol_intrinsics(agent, realm);
        error_objects::create_error_intrinsics(agent, realm);

        for (name, intrinsic) in [
            ("Object", "%Object%"),
            ("Function", "%Function%"),
            ("Boolean", "%Boolean%"),
            ("Symbol", "%Symbol%"),
            ("Error", "%Error%"),
            ("EvalError", "%EvalError%"),
            ("RangeError", "%RangeError%"),
            ("ReferenceError", "%ReferenceError%"),
            ("SyntaxError", "%SyntaxError%"),
            ("TypeError", "%TypeError%"),
            ("URIError", "%URIError%"),
            ("AggregateError", "%AggregateError%"),
        ] {
            let value = Value::Object(agent.get_realm(realm).intrinsics.get(intrinsic));
            globals.stage_intrinsic(agent, name, value);
        }
    }
}

/// Iteration, generators, async generators, and promises.
#[derive(Debug)]
pub struct ControlAbstractionPlugin;

impl Plugin for ControlAbstractionPlugin {
    fn id(&self) -> &'static str {
        "control"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        crate::ecmascript::builtins::control_abstraction_objects::iteration::create_control_intrinsics(
            agent, realm,
        );
        let promise = Value::Object(agent.get_realm(realm).intrinsics.get("%Promise%"));
        globals.stage_intrinsic(agent, "Promise", promise);
    }
}

/// Number, Math, and BigInt.
#[derive(Debug)]
pub struct NumericPlugin;

impl Plugin for NumericPlugin {
    fn id(&self) -> &'static str {
        "numeric"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        use crate::ecmascript::builtins::numbers_and_dates::*;
        number_objects::create_number_intrinsics(agent, realm);
        math_object::create_math_intrinsics(agent, realm);
        bigint_objects::create_bigint_intrinsics(agent, realm);
        for (name, intrinsic) in [("Number", "%Number%"), ("Math", "%Math%"), ("BigInt", "%BigInt%")]
        {
            let value = Value::Object(agent.get_realm(realm).intrinsics.get(intrinsic));
            globals.stage_intrinsic(agent, name, value);
        }
    }
}

/// The String intrinsic surface.
#[derive(Debug)]
pub struct TextPlugin;

impl Plugin for TextPlugin {
    fn id(&self) -> &'static str {
        "text"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental", "control"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        crate::ecmascript::builtins::text_processing::string_objects::create_string_intrinsics(
            agent, realm,
        );
        let string = Value::Object(agent.get_realm(realm).intrinsics.get("%String%"));
        globals.stage_intrinsic(agent, "String", string);
    }
}

/// The Array intrinsic surface.
#[derive(Debug)]
pub struct IndexedCollectionsPlugin;

impl Plugin for IndexedCollectionsPlugin {
    fn id(&self) -> &'static str {
        "indexed"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental", "control"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        crate::ecmascript::builtins::indexed_collections::array_objects::create_array_intrinsics(
            agent, realm,
        );
        let array = Value::Object(agent.get_realm(realm).intrinsics.get("%Array%"));
        globals.stage_intrinsic(agent, "Array", array);
    }
}

/// Map, Set, and the weak collections.
#[derive(Debug)]
pub struct KeyedCollectionsPlugin;

impl Plugin for KeyedCollectionsPlugin {
    fn id(&self) -> &'static str {
        "keyed"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental", "control"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        crate::ecmascript::builtins::keyed_collections::create_keyed_collection_intrinsics(
            agent, realm,
        );
        for (name, intrinsic) in [("Map", "%Map%"), ("Set", "%Set%")] {
            let value = Value::Object(agent.get_realm(realm).intrinsics.get(intrinsic));
            globals.stage_intrinsic(agent, name, value);
        }
        #[cfg(feature = "weak-refs")]
        {
            crate::ecmascript::builtins::keyed_collections::create_weak_collection_intrinsics(
                agent, realm,
            );
            for (name, intrinsic) in [("WeakMap", "%WeakMap%"), ("WeakSet", "%WeakSet%")] {
                let value = Value::Object(agent.get_realm(realm).intrinsics.get(intrinsic));
                globals.stage_intrinsic(agent, name, value);
            }
        }
    }
}

/// RegExp over the external matcher.
#[cfg(feature = "regexp")]
#[derive(Debug)]
pub struct TextProcessingPlugin;

#[cfg(feature = "regexp")]
impl Plugin for TextProcessingPlugin {
    fn id(&self) -> &'static str {
        "text-processing"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        crate::ecmascript::builtins::text_processing::regexp_objects::create_regexp_intrinsics(
            agent, realm,
        );
        let regexp = Value::Object(agent.get_realm(realm).intrinsics.get("%RegExp%"));
        globals.stage_intrinsic(agent, "RegExp", regexp);
    }
}

/// The JSON object.
#[cfg(feature = "json")]
#[derive(Debug)]
pub struct StructuredDataPlugin;

#[cfg(feature = "json")]
impl Plugin for StructuredDataPlugin {
    fn id(&self) -> &'static str {
        "structured"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        crate::ecmascript::builtins::structured_data::json_object::create_json_intrinsics(
            agent, realm,
        );
        let json = Value::Object(agent.get_realm(realm).intrinsics.get("%JSON%"));
        globals.stage_intrinsic(agent, "JSON", json);
    }
}

/// Reflect and Proxy.
#[derive(Debug)]
pub struct ReflectionPlugin;

impl Plugin for ReflectionPlugin {
    fn id(&self) -> &'static str {
        "reflection"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        crate::ecmascript::builtins::reflection::create_reflection_intrinsics(agent, realm);
        for (name, intrinsic) in [("Reflect", "%Reflect%"), ("Proxy", "%Proxy%")] {
            let value = Value::Object(agent.get_realm(realm).intrinsics.get(intrinsic));
            globals.stage_intrinsic(agent, name, value);
        }
    }
}

/// The global functions and value properties.
#[derive(Debug)]
pub struct GlobalObjectPlugin;

impl Plugin for GlobalObjectPlugin {
    fn id(&self) -> &'static str {
        "global"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["fundamental"]
    }

    fn create_intrinsics(
        &self,
        agent: &mut Agent,
        realm: RealmIdentifier,
        globals: &mut StagedGlobals,
    ) {
        use crate::ecmascript::builtins::global_object::*;

        fn stage_function<T: Builtin>(
            agent: &mut Agent,
            realm: RealmIdentifier,
            globals: &mut StagedGlobals,
        ) {
            let function = BuiltinFunctionBuilder::new::<T>(agent, realm).build();
            globals.stage_intrinsic(agent, T::NAME, Value::Object(function));
        }

        stage_function::<GlobalParseInt>(agent, realm, globals);
        stage_function::<GlobalParseFloat>(agent, realm, globals);
        stage_function::<GlobalIsNaN>(agent, realm, globals);
        stage_function::<GlobalIsFinite>(agent, realm, globals);
        stage_function::<GlobalEval>(agent, realm, globals);
        stage_function::<GlobalEncodeUriComponent>(agent, realm, globals);
        stage_function::<GlobalDecodeUriComponent>(agent, realm, globals);

        globals.stage_frozen(agent, "NaN", Value::Number(f64::NAN));
        globals.stage_frozen(agent, "Infinity", Value::Number(f64::INFINITY));
        globals.stage_frozen(agent, "undefined", Value::Undefined);
    }
}
