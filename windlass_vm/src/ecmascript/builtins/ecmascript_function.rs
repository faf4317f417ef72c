// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.2 ECMAScript Function Objects](https://tc39.es/ecma262/#sec-ecmascript-function-objects)

use core::ptr::NonNull;

use oxc_ast::ast::{FormalParameters, FunctionBody};
use oxc_ecmascript::BoundNames;
use oxc_span::Span;

use crate::ecmascript::abstract_operations::operations_on_objects::define_property_or_throw;
use crate::ecmascript::builtins::arguments::{
    create_mapped_arguments_object, create_unmapped_arguments_object,
};
use crate::ecmascript::builtins::control_abstraction_objects::async_function_objects::async_function_start;
use crate::ecmascript::builtins::control_abstraction_objects::generator_objects::{
    GeneratorData, GeneratorState, SuspendedActivation,
};
use crate::ecmascript::builtins::control_abstraction_objects::promise_objects::promise_abstract_operations::promise_capability_records::PromiseCapability;
use crate::ecmascript::builtins::ordinary::{
    ordinary_create_from_constructor, ordinary_object_create,
};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{
    new_declarative_environment, new_function_environment, Agent, EnvironmentIndex,
    ExceptionType, ExecutionContext, ECMAScriptCodeEvaluationState, FunctionEnvironment,
    FunctionEnvironmentRecord, JsResult, PrivateEnvironment, ProtoIntrinsics, RealmIdentifier,
    ThisBindingStatus,
};
use crate::ecmascript::scripts_and_modules::ScriptOrModule;
use crate::ecmascript::syntax_directed_operations::scope_analysis::{
    function_body_lexically_scoped_declarations, function_body_var_declared_names,
    function_body_var_scoped_declarations, LexicallyScopedDeclaration, VarScopedDeclaration,
};
use crate::ecmascript::types::{
    Completion, HeapString, Object, ObjectHeapData, ObjectKind, Property, PropertyDescriptor,
    PropertyKey, Value,
};
use crate::engine::fiber::Fiber;
use crate::engine::patterns::{
    formal_parameters_binding_initialization, FormalsSummary,
};
use crate::heap::SourceCode;

/// ### [\[\[ThisMode]]](https://tc39.es/ecma262/#table-internal-slots-of-ecmascript-function-objects)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisMode {
    /// `this` refers to the lexically enclosing binding (arrow functions).
    Lexical,
    /// `this` is used exactly as the caller provided it.
    Strict,
    /// undefined and null `this` are replaced with the global object,
    /// primitives are boxed.
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorStatus {
    NonConstructor,
    ConstructorFunction,
    BaseClass,
    DerivedClass,
}

impl ConstructorStatus {
    pub fn is_constructor(self) -> bool {
        self != ConstructorStatus::NonConstructor
    }

    pub fn is_class_constructor(self) -> bool {
        matches!(
            self,
            ConstructorStatus::BaseClass | ConstructorStatus::DerivedClass
        )
    }

    pub fn is_derived_class(self) -> bool {
        self == ConstructorStatus::DerivedClass
    }
}

/// An instance field installed by `InitializeInstanceElements`: the
/// evaluated key plus the uninstantiated initializer expression.
#[derive(Debug, Clone, Copy)]
pub struct ClassFieldRecord {
    pub key: PropertyKey,
    pub initializer: Option<NonNull<oxc_ast::ast::Expression<'static>>>,
}

/// ### [10.2 ECMAScript Function Objects](https://tc39.es/ecma262/#sec-ecmascript-function-objects)
#[derive(Debug)]
pub struct ECMAScriptFunctionObjectData {
    /// \[\[Environment]]
    pub environment: EnvironmentIndex,

    /// \[\[PrivateEnvironment]]
    pub private_environment: Option<PrivateEnvironment>,

    /// \[\[FormalParameters]]
    ///
    /// SAFETY: the referenced AST is owned by `source_code`, which lives
    /// until agent teardown.
    pub formal_parameters: NonNull<FormalParameters<'static>>,

    /// \[\[ECMAScriptCode]]
    ///
    /// SAFETY: as `formal_parameters`.
    pub ecmascript_code: NonNull<FunctionBody<'static>>,

    /// True when the body is the ConciseBody of an arrow function, which
    /// has an implicit return.
    pub is_concise_arrow_function: bool,

    pub is_async: bool,

    pub is_generator: bool,

    /// \[\[ConstructorKind]] and \[\[IsClassConstructor]]
    pub constructor_status: ConstructorStatus,

    /// \[\[Realm]]
    pub realm: RealmIdentifier,

    /// \[\[ScriptOrModule]]
    pub script_or_module: Option<ScriptOrModule>,

    /// \[\[ThisMode]]
    pub this_mode: ThisMode,

    /// \[\[Strict]]
    pub strict: bool,

    /// \[\[HomeObject]]
    pub home_object: Option<Object>,

    /// \[\[SourceText]]
    pub source_text: Span,

    /// \[\[SourceCode]]: where \[\[SourceText]] points into.
    pub source_code: SourceCode,

    /// \[\[Fields]]
    pub fields: Vec<ClassFieldRecord>,
}

pub struct OrdinaryFunctionCreateParams<'a> {
    pub function_prototype: Option<Object>,
    pub source_code: SourceCode,
    pub source_text: Span,
    pub parameters_list: &'a FormalParameters<'static>,
    pub body: &'a FunctionBody<'static>,
    pub is_concise_arrow_function: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub lexical_this: bool,
    pub env: EnvironmentIndex,
    pub private_env: Option<PrivateEnvironment>,
}

/// ### [10.2.3 OrdinaryFunctionCreate ( functionPrototype, sourceText, ParameterList, Body, thisMode, env, privateEnv )](https://tc39.es/ecma262/#sec-ordinaryfunctioncreate)
pub fn ordinary_function_create(agent: &mut Agent, params: OrdinaryFunctionCreateParams) -> Object {
    // 4. If thisMode is LEXICAL-THIS, set F.[[ThisMode]] to LEXICAL.
    // 5. Else if Strict is true, set F.[[ThisMode]] to STRICT.
    // 6. Else, set F.[[ThisMode]] to GLOBAL.
    let outer_strict = agent.in_strict_mode();
    let strict = outer_strict || params.body.has_use_strict_directive();
    let this_mode = if params.lexical_this {
        ThisMode::Lexical
    } else if strict {
        ThisMode::Strict
    } else {
        ThisMode::Global
    };
    let script_or_module = crate::ecmascript::execution::agent::get_active_script_or_module(agent);
    let prototype = params
        .function_prototype
        .unwrap_or_else(|| agent.current_realm().intrinsics.function_prototype());
    let data = ECMAScriptFunctionObjectData {
        environment: params.env,
        private_environment: params.private_env,
        formal_parameters: NonNull::from(params.parameters_list),
        ecmascript_code: NonNull::from(params.body),
        is_concise_arrow_function: params.is_concise_arrow_function,
        is_async: params.is_async,
        is_generator: params.is_generator,
        // 13. Set F.[[IsClassConstructor]] to false.
        constructor_status: ConstructorStatus::NonConstructor,
        realm: agent.current_realm_id(),
        script_or_module,
        this_mode,
        strict,
        home_object: None,
        source_text: params.source_text,
        source_code: params.source_code,
        fields: Vec::new(),
    };
    let function = agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::ECMAScriptFunction(Box::new(data)),
    ));
    // 19. Perform SetFunctionLength(F, len): the expected argument count is
    //     the number of leading simple parameters without defaults.
    let length = params
        .parameters_list
        .items
        .iter()
        .take_while(|item| {
            !matches!(
                item.pattern.kind,
                oxc_ast::ast::BindingPatternKind::AssignmentPattern(_)
            )
        })
        .count();
    let length_key = PropertyKey::from_str(agent, "length");
    agent[function].properties.set(
        length_key,
        Property::data(Value::Number(length as f64), false, false, true),
    );
    // 20. Return F.
    function
}

/// ### [10.2.9 SetFunctionName ( F, name \[ , prefix \] )](https://tc39.es/ecma262/#sec-setfunctionname)
pub fn set_function_name(agent: &mut Agent, function: Object, name: PropertyKey, prefix: Option<&str>) {
    // 2. If name is a Symbol, wrap its description in brackets.
    let name_string = match name {
        PropertyKey::Symbol(symbol) => {
            let description = symbol.description(agent).map_or_else(
                || "".to_owned(),
                |d| format!("[{}]", d.as_str(agent)),
            );
            description
        }
        PropertyKey::String(s) => s.as_str(agent).to_owned(),
        PropertyKey::Index(i) => i.to_string(),
    };
    let name_string = match prefix {
        Some(prefix) => format!("{prefix} {name_string}"),
        None => name_string,
    };
    let value = Value::from_string(agent, name_string);
    // 6. Perform ! DefinePropertyOrThrow(F, "name", PropertyDescriptor {
    //    [[Value]]: name, [[Writable]]: false, [[Enumerable]]: false,
    //    [[Configurable]]: true }).
    let key = PropertyKey::from_str(agent, "name");
    agent[function]
        .properties
        .set(key, Property::data(value, false, false, true));
}

/// ### [10.2.5 MakeConstructor ( F \[ , writablePrototype \[ , prototype \] \] )](https://tc39.es/ecma262/#sec-makeconstructor)
pub fn make_constructor(
    agent: &mut Agent,
    function: Object,
    writable_prototype: Option<bool>,
    prototype: Option<Object>,
) {
    let writable_prototype = writable_prototype.unwrap_or(true);
    // 2./4. Mark the function constructable.
    if let ObjectKind::ECMAScriptFunction(data) = &mut agent[function].kind {
        debug_assert!(data.constructor_status == ConstructorStatus::NonConstructor);
        data.constructor_status = ConstructorStatus::ConstructorFunction;
    }
    // 7. If prototype is not present, create one with a constructor
    //    back-link.
    let prototype = prototype.unwrap_or_else(|| {
        let object_prototype = agent.current_realm().intrinsics.object_prototype();
        let prototype = ordinary_object_create(agent, Some(object_prototype));
        let constructor_key = PropertyKey::from_str(agent, "constructor");
        agent[prototype].properties.set(
            constructor_key,
            Property::data(Value::Object(function), writable_prototype, false, true),
        );
        prototype
    });
    // 8. Perform ! DefinePropertyOrThrow(F, "prototype", ...).
    let prototype_key = PropertyKey::from_str(agent, "prototype");
    agent[function].properties.set(
        prototype_key,
        Property::data(Value::Object(prototype), writable_prototype, false, false),
    );
}

/// ### [10.2.7 MakeMethod ( F, homeObject )](https://tc39.es/ecma262/#sec-makemethod)
pub fn make_method(agent: &mut Agent, function: Object, home_object: Object) {
    if let ObjectKind::ECMAScriptFunction(data) = &mut agent[function].kind {
        data.home_object = Some(home_object);
    }
}

pub(crate) fn function_data(agent: &Agent, function: Object) -> &ECMAScriptFunctionObjectData {
    match &agent[function].kind {
        ObjectKind::ECMAScriptFunction(data) => data,
        _ => unreachable!("expected an ECMAScript function"),
    }
}

pub(crate) fn function_data_mut(
    agent: &mut Agent,
    function: Object,
) -> &mut ECMAScriptFunctionObjectData {
    match &mut agent[function].kind {
        ObjectKind::ECMAScriptFunction(data) => data,
        _ => unreachable!("expected an ECMAScript function"),
    }
}

/// ### [10.2.1.1 PrepareForOrdinaryCall ( F, newTarget )](https://tc39.es/ecma262/#sec-prepareforordinarycall)
pub(crate) fn prepare_for_ordinary_call(
    agent: &mut Agent,
    function: Object,
    new_target: Option<Object>,
) -> FunctionEnvironment {
    let data = function_data(agent, function);
    let realm = data.realm;
    let script_or_module = data.script_or_module;
    let strict = data.strict;
    let private_environment = data.private_environment;
    let source_code = data.source_code;
    // 7. Let localEnv be NewFunctionEnvironment(F, newTarget).
    let local_env = new_function_environment(agent, function, new_target);
    // 1.-11. Assemble and push the callee context.
    let callee_context = ExecutionContext {
        ecmascript_code: Some(ECMAScriptCodeEvaluationState {
            lexical_environment: EnvironmentIndex::Function(local_env),
            variable_environment: EnvironmentIndex::Function(local_env),
            private_environment,
            is_strict_mode: strict,
            source_code,
        }),
        function: Some(function),
        realm,
        script_or_module,
    };
    agent.push_execution_context(callee_context);
    // 12. Return calleeContext (the environment suffices for our callers).
    local_env
}

/// ### [10.2.1.2 OrdinaryCallBindThis ( F, calleeContext, thisArgument )](https://tc39.es/ecma262/#sec-ordinarycallbindthis)
pub(crate) fn ordinary_call_bind_this(
    agent: &mut Agent,
    function: Object,
    local_env: FunctionEnvironment,
    this_argument: Value,
) -> JsResult<()> {
    let data = function_data(agent, function);
    let this_mode = data.this_mode;
    // 1. Let thisMode be F.[[ThisMode]]; if LEXICAL, return UNUSED.
    if this_mode == ThisMode::Lexical {
        return Ok(());
    }
    let realm = data.realm;
    // 5. If thisMode is STRICT, let thisValue be thisArgument.
    let this_value = if this_mode == ThisMode::Strict {
        this_argument
    } else {
        // 6. Else,
        match this_argument {
            // a. If thisArgument is either undefined or null: the realm's
            //    globalEnv.[[GlobalThisValue]].
            Value::Undefined | Value::Null => {
                let global_env = agent.get_realm(realm).global_env;
                Value::Object(
                    agent
                        .heap
                        .environments
                        .get_global(global_env)
                        .global_this_value,
                )
            }
            // b. Else: ! ToObject(thisArgument), boxing in the callee's
            //    realm.
            _ => {
                let value =
                    crate::ecmascript::abstract_operations::type_conversion::to_object(
                        agent,
                        this_argument,
                    )?;
                Value::Object(value)
            }
        }
    };
    // 7. Perform ! localEnv.BindThisValue(thisValue).
    FunctionEnvironmentRecord::bind_this_value(agent, local_env, this_value)?;
    Ok(())
}

/// ### [10.2.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-ecmascript-function-objects-call-thisargument-argumentslist)
pub fn ecmascript_function_call(
    agent: &mut Agent,
    function: Object,
    this_argument: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    // 2. If F.[[IsClassConstructor]] is true, throw a TypeError exception.
    if function_data(agent, function)
        .constructor_status
        .is_class_constructor()
    {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Class constructor cannot be invoked without 'new'",
        ));
    }
    // 3./4. Prepare the callee context.
    let local_env = prepare_for_ordinary_call(agent, function, None);
    // 5. Perform OrdinaryCallBindThis(F, calleeContext, thisArgument).
    if let Err(err) = ordinary_call_bind_this(agent, function, local_env, this_argument) {
        agent.pop_execution_context();
        return Err(err);
    }
    // 6. Let result be Completion(OrdinaryCallEvaluateBody(F,
    //    argumentsList)).
    let result = ordinary_call_evaluate_body(agent, function, arguments);
    // 7. Remove calleeContext from the execution context stack.
    agent.pop_execution_context();
    // 8./9. Translate a return completion to its value; a normal body
    //    completion yields undefined.
    result
}

/// ### [10.2.1.3 Runtime Semantics: EvaluateBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluatebody)
pub(crate) fn ordinary_call_evaluate_body(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let data = function_data(agent, function);
    let is_generator = data.is_generator;
    let is_async = data.is_async;
    match (is_generator, is_async) {
        (false, false) => {
            // 1. Perform ? FunctionDeclarationInstantiation(functionObject,
            //    argumentsList).
            function_declaration_instantiation(agent, function, arguments)?;
            // 2. Return ? Evaluation of FunctionStatementList.
            let mut fiber = Fiber::for_function_body(agent, function);
            match fiber.run_to_completion(agent) {
                Completion::Normal(_) => Ok(Value::Undefined),
                Completion::Return(value) => Ok(value),
                Completion::Throw(err) => Err(err),
                Completion::Break(_) | Completion::Continue(_) => unreachable!(),
            }
        }
        (true, false) => evaluate_generator_body(agent, function, arguments),
        (false, true) => Ok(evaluate_async_function_body(agent, function, arguments)),
        (true, true) => {
            crate::ecmascript::builtins::control_abstraction_objects::async_generator_objects::evaluate_async_generator_body(
                agent, function, arguments,
            )
        }
    }
}

/// ### [15.5.2 Runtime Semantics: EvaluateGeneratorBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluategeneratorbody)
fn evaluate_generator_body(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    // 1. Perform ? FunctionDeclarationInstantiation(functionObject,
    //    argumentsList).
    function_declaration_instantiation(agent, function, arguments)?;
    // 2. Let G be ? OrdinaryCreateFromConstructor(functionObject,
    //    "%GeneratorPrototype%", « [[GeneratorState]], ... »).
    let generator = ordinary_create_from_constructor(
        agent,
        function,
        ProtoIntrinsics::Generator,
        ObjectKind::Generator(Box::new(GeneratorData {
            generator_state: None,
        })),
    )?;
    // 4. Perform GeneratorStart(G, FunctionBody): package the body fiber
    //    and the callee context, then suspend at start.
    let fiber = Fiber::for_function_body(agent, function);
    let execution_context = agent.running_execution_context().clone();
    if let ObjectKind::Generator(data) = &mut agent[generator].kind {
        data.generator_state = Some(GeneratorState::SuspendedStart(Box::new(
            SuspendedActivation {
                fiber,
                execution_context,
            },
        )));
    }
    // 5. Return Completion Record { [[Type]]: return, [[Value]]: G }.
    Ok(Value::Object(generator))
}

/// ### [15.8.4 Runtime Semantics: EvaluateAsyncFunctionBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluateasyncfunctionbody)
fn evaluate_async_function_body(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
) -> Value {
    // 1. Let promiseCapability be ! NewPromiseCapability(%Promise%).
    let capability = PromiseCapability::new(agent);
    // 2. Let declResult be
    //    Completion(FunctionDeclarationInstantiation(functionObject,
    //    argumentsList)).
    match function_declaration_instantiation(agent, function, arguments) {
        // 3. If declResult is an abrupt completion, reject.
        Err(err) => {
            capability.reject(agent, err.value());
        }
        // 4. Else, perform AsyncFunctionStart(promiseCapability,
        //    FunctionBody).
        Ok(()) => {
            let fiber = Fiber::for_function_body(agent, function);
            async_function_start(agent, capability, fiber);
        }
    }
    // 5. Return Completion Record { [[Type]]: return, [[Value]]:
    //    promiseCapability.[[Promise]] }.
    Value::Object(capability.promise())
}

/// ### [10.2.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-ecmascript-function-objects-construct-argumentslist-newtarget)
pub fn ecmascript_function_construct(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
    new_target: Object,
) -> JsResult<Object> {
    // 2. Let kind be F.[[ConstructorKind]].
    let constructor_status = function_data(agent, function).constructor_status;
    let is_base = !constructor_status.is_derived_class();
    // 3. If kind is BASE, then
    let this_argument = if is_base {
        // a. Let thisArgument be ? OrdinaryCreateFromConstructor(newTarget,
        //    "%Object.prototype%").
        Some(ordinary_create_from_constructor(
            agent,
            new_target,
            ProtoIntrinsics::Object,
            ObjectKind::Ordinary,
        )?)
    } else {
        None
    };
    // 4./5. Prepare the callee context with newTarget.
    let local_env = prepare_for_ordinary_call(agent, function, Some(new_target));
    let result = (|| -> JsResult<Option<Value>> {
        if let Some(this_argument) = this_argument {
            // 6.a. Perform OrdinaryCallBindThis(F, calleeContext,
            //      thisArgument).
            ordinary_call_bind_this(agent, function, local_env, Value::Object(this_argument))?;
            // 6.b. Perform ? InitializeInstanceElements(thisArgument, F).
            initialize_instance_elements(agent, this_argument, function)?;
        }
        // 8. Let result be Completion(OrdinaryCallEvaluateBody(F,
        //    argumentsList)).
        function_declaration_instantiation(agent, function, arguments)?;
        let mut fiber = Fiber::for_function_body(agent, function);
        match fiber.run_to_completion(agent) {
            Completion::Normal(_) => Ok(None),
            Completion::Return(value) => Ok(Some(value)),
            Completion::Throw(err) => Err(err),
            Completion::Break(_) | Completion::Continue(_) => unreachable!(),
        }
    })();

    let constructor_env = local_env;
    // 9. Remove calleeContext from the execution context stack.
    agent.pop_execution_context();
    let result = result?;

    // 10. If result is a return completion, then
    if let Some(value) = result {
        // a. If result.[[Value]] is an Object, return result.[[Value]].
        if let Value::Object(object) = value {
            return Ok(object);
        }
        // b. If kind is BASE, return thisArgument.
        if let Some(this_argument) = this_argument {
            return Ok(this_argument);
        }
        // c. If result.[[Value]] is not undefined, throw a TypeError.
        if !value.is_undefined() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Derived constructors may only return an object or undefined",
            ));
        }
    } else if let Some(this_argument) = this_argument {
        // 11. A base constructor that completes normally returns its
        //     allocated this.
        return Ok(this_argument);
    }

    // 12./13. Let thisBinding be ? constructorEnv.GetThisBinding(); assert
    //         it is an Object (the derived constructor must have called
    //         super()).
    let this_binding = FunctionEnvironmentRecord::get_this_binding(agent, constructor_env)?;
    let Value::Object(this_binding) = this_binding else {
        unreachable!("derived constructor this binding is always an object once bound")
    };
    Ok(this_binding)
}

/// ### [7.3.33 InitializeInstanceElements ( O, constructor )](https://tc39.es/ecma262/#sec-initializeinstanceelements)
pub(crate) fn initialize_instance_elements(
    agent: &mut Agent,
    this_argument: Object,
    constructor: Object,
) -> JsResult<()> {
    let fields = function_data(agent, constructor).fields.clone();
    for field in fields {
        let value = match field.initializer {
            None => Value::Undefined,
            Some(initializer) => {
                // SAFETY: initializer AST is owned by the constructor's
                // source code.
                let expression = unsafe { initializer.as_ref() };
                crate::engine::evaluate_expression_with_this(
                    agent,
                    constructor,
                    Value::Object(this_argument),
                    expression,
                )?
            }
        };
        define_property_or_throw(
            agent,
            this_argument,
            field.key,
            PropertyDescriptor::new_data_descriptor(value),
        )?;
    }
    Ok(())
}

/// ### [10.2.11 FunctionDeclarationInstantiation ( func, argumentsList )](https://tc39.es/ecma262/#sec-functiondeclarationinstantiation)
///
/// Performed before body evaluation: binds formal parameters with
/// duplicate handling, materializes the arguments object, hoists var and
/// function declarations, and instantiates lexical declarations in a
/// final lexical environment. When the parameter list has initializers a
/// separate variable environment is allocated so parameter evaluation
/// cannot observe body declarations.
pub(crate) fn function_declaration_instantiation(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
) -> JsResult<()> {
    let data = function_data(agent, function);
    let strict = data.strict;
    let this_mode = data.this_mode;
    // SAFETY: the AST is kept alive by the function's SourceCode.
    let formals: &'static FormalParameters<'static> =
        unsafe { data.formal_parameters.as_ref() };
    let code: &'static FunctionBody<'static> = unsafe { data.ecmascript_code.as_ref() };

    let env = agent.current_lexical_environment();
    let EnvironmentIndex::Function(function_env) = env else {
        unreachable!("function calls always run in a function environment")
    };

    // 5. Let parameterNames be the BoundNames of formals.
    let mut parameter_names: Vec<HeapString> = Vec::new();
    formals.bound_names(&mut |identifier| {
        let name = identifier.name.as_str();
        let name = HeapString::from_str(agent, name);
        parameter_names.push(name);
    });
    // 6. If parameterNames has any duplicate entries, let hasDuplicates be
    //    true.
    let has_duplicates = {
        let mut seen = hashbrown::HashSet::new();
        parameter_names.iter().any(|name| !seen.insert(*name))
    };
    // 7. Let simpleParameterList be IsSimpleParameterList of formals.
    let summary = FormalsSummary::of(formals);
    let simple_parameter_list = summary.is_simple;
    // 8. Let hasParameterExpressions be ContainsExpression of formals.
    let has_parameter_expressions = summary.has_expressions;

    // 9.-11. varNames, varDeclarations, lexicalNames.
    let var_names = function_body_var_declared_names(code);
    let var_declarations = function_body_var_scoped_declarations(code);
    let lexical_declarations = function_body_lexically_scoped_declarations(code);
    let mut lexical_names: Vec<&str> = Vec::new();
    for declaration in &lexical_declarations {
        declaration.bound_names(&mut |identifier| lexical_names.push(identifier.name.as_str()));
    }

    // 13.-15. functionNames and functionsToInitialize: var-scoped function
    //    declarations, last declaration of a name wins.
    let mut function_names: Vec<&str> = Vec::new();
    let mut functions_to_initialize: Vec<&'static oxc_ast::ast::Function<'static>> = Vec::new();
    for declaration in var_declarations.iter().rev() {
        if let VarScopedDeclaration::Function(decl) = declaration {
            let name = decl.id.as_ref().unwrap().name.as_str();
            if !function_names.contains(&name) {
                function_names.push(name);
                functions_to_initialize.insert(0, decl);
            }
        }
    }

    // 16.-18. argumentsObjectNeeded.
    let mut arguments_object_needed = true;
    if this_mode == ThisMode::Lexical {
        arguments_object_needed = false;
    } else if parameter_names
        .iter()
        .any(|name| name.as_str(agent) == "arguments")
    {
        arguments_object_needed = false;
    } else if !has_parameter_expressions
        && (function_names.contains(&"arguments") || lexical_names.contains(&"arguments"))
    {
        arguments_object_needed = false;
    }

    // 20.-21. Bind each unique parameter name in env.
    let mut bound: Vec<HeapString> = Vec::new();
    for name in &parameter_names {
        if bound.contains(name) {
            continue;
        }
        bound.push(*name);
        env.create_mutable_binding(agent, *name, false)?;
        // 21.b. With duplicates, bindings start initialized to undefined.
        if has_duplicates {
            env.initialize_binding(agent, *name, Value::Undefined)?;
        }
    }

    // 22. If argumentsObjectNeeded is true, materialize the arguments
    //     object.
    let mut parameter_bindings = parameter_names.clone();
    if arguments_object_needed {
        let arguments_object = if strict || !simple_parameter_list {
            // a. A mapped arguments object is only provided for non-strict
            //    functions with simple parameter lists.
            create_unmapped_arguments_object(agent, arguments.0)
        } else {
            // For each argument slot, the linked binding is the parameter
            // at that position unless the name recurs later.
            let mut mapped_names: Vec<Option<HeapString>> =
                vec![None; arguments.len()];
            for (index, name) in parameter_names.iter().enumerate() {
                if index >= arguments.len() {
                    break;
                }
                let recurs_later = parameter_names[index + 1..].contains(name);
                mapped_names[index] = if recurs_later { None } else { Some(*name) };
            }
            create_mapped_arguments_object(
                agent,
                function,
                mapped_names,
                arguments.0,
                function_env,
            )
        };
        let arguments_name = HeapString::from_str(agent, "arguments");
        // f./g. Strict functions get an immutable binding.
        if strict {
            env.create_immutable_binding(agent, arguments_name, false)?;
        } else {
            env.create_mutable_binding(agent, arguments_name, false)?;
        }
        // h. Perform ! env.InitializeBinding("arguments", ao).
        env.initialize_binding(agent, arguments_name, Value::Object(arguments_object))?;
        parameter_bindings.push(arguments_name);
    }

    // 23.-26. Bind the actual argument values against the formals,
    //    evaluating defaults and destructuring as needed.
    let binding_env = if has_duplicates { None } else { Some(env) };
    formal_parameters_binding_initialization(agent, formals, arguments.0, binding_env)?;

    // 27./28. Allocate the variable environment.
    let var_env = if !has_parameter_expressions {
        // 27.a.-c. env doubles as the variable environment.
        let mut instantiated: Vec<HeapString> = parameter_bindings.clone();
        for name in var_names.iter().copied() {
            let name = HeapString::from_str(agent, name);
            if !instantiated.contains(&name) {
                instantiated.push(name);
                env.create_mutable_binding(agent, name, false)?;
                env.initialize_binding(agent, name, Value::Undefined)?;
            }
        }
        env
    } else {
        // 28.a. A separate Environment Record so closures in the formals
        //    do not see the body's var declarations.
        let var_env_index = new_declarative_environment(agent, Some(env));
        let var_env = EnvironmentIndex::Declarative(var_env_index);
        agent
            .running_execution_context_mut()
            .ecmascript_code
            .as_mut()
            .unwrap()
            .variable_environment = var_env;
        let mut instantiated: Vec<HeapString> = Vec::new();
        for name_str in var_names.iter().copied() {
            let name = HeapString::from_str(agent, name_str);
            if instantiated.contains(&name) {
                continue;
            }
            instantiated.push(name);
            var_env.create_mutable_binding(agent, name, false)?;
            // d.iv. Copy the parameter's value unless a function
            //    declaration shadows it.
            let initial_value = if !parameter_bindings.contains(&name)
                || function_names.contains(&name_str)
            {
                Value::Undefined
            } else {
                env.get_binding_value(agent, name, false)?
            };
            var_env.initialize_binding(agent, name, initial_value)?;
        }
        var_env
    };

    // 30. The lexical environment: strict code shares the variable
    //     environment, sloppy code gets a fresh record so that direct eval
    //     declarations stay separate.
    let lex_env = if strict {
        var_env
    } else {
        EnvironmentIndex::Declarative(new_declarative_environment(agent, Some(var_env)))
    };
    // 32. Set the running execution context's LexicalEnvironment to lexEnv.
    agent.set_current_lexical_environment(lex_env);

    // 34./35. Instantiate the lexical declarations.
    for declaration in &lexical_declarations {
        let is_constant = declaration.is_constant_declaration();
        let mut names: Vec<HeapString> = Vec::new();
        declaration.bound_names(&mut |identifier| {
            let name = HeapString::from_str(agent, identifier.name.as_str());
            names.push(name);
        });
        for name in names {
            if is_constant {
                lex_env.create_immutable_binding(agent, name, true)?;
            } else {
                lex_env.create_mutable_binding(agent, name, false)?;
            }
        }
    }

    // 36. Instantiate the hoisted function declarations in the variable
    //     environment.
    let private_env = agent
        .running_execution_context()
        .ecmascript_code
        .as_ref()
        .unwrap()
        .private_environment;
    for declaration in functions_to_initialize {
        let name = HeapString::from_str(agent, declaration.id.as_ref().unwrap().name.as_str());
        let function_object =
            crate::ecmascript::syntax_directed_operations::function_definitions::instantiate_ordinary_function_object(
                agent,
                declaration,
                lex_env,
                private_env,
            );
        var_env.set_mutable_binding(agent, name, Value::Object(function_object), false)?;
    }

    Ok(())
}
