// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use oxc_ast::ast;
use oxc_span::GetSpan;

use crate::ecmascript::builtins::ecmascript_function::{
    make_constructor, ordinary_function_create, set_function_name, OrdinaryFunctionCreateParams,
};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::{Agent, EnvironmentIndex, PrivateEnvironment};
use crate::ecmascript::scripts_and_modules::source_code::extend_node_lifetime;
use crate::ecmascript::types::{Object, Property, PropertyKey, Value};

/// ### [15.1.2 Static Semantics: ContainsExpression](https://tc39.es/ecma262/#sec-static-semantics-containsexpression)
pub(crate) trait ContainsExpression {
    fn contains_expression(&self) -> bool;
}

impl ContainsExpression for ast::BindingPattern<'_> {
    fn contains_expression(&self) -> bool {
        match &self.kind {
            ast::BindingPatternKind::BindingIdentifier(_) => false,
            ast::BindingPatternKind::ObjectPattern(pattern) => pattern.contains_expression(),
            ast::BindingPatternKind::ArrayPattern(pattern) => pattern.contains_expression(),
            ast::BindingPatternKind::AssignmentPattern(_) => true,
        }
    }
}

impl ContainsExpression for ast::ObjectPattern<'_> {
    fn contains_expression(&self) -> bool {
        for property in &self.properties {
            if property.computed || property.value.contains_expression() {
                return true;
            }
        }
        false
    }
}

impl ContainsExpression for ast::ArrayPattern<'_> {
    fn contains_expression(&self) -> bool {
        for pattern in self.elements.iter().flatten() {
            if pattern.contains_expression() {
                return true;
            }
        }
        if let Some(rest) = &self.rest {
            rest.argument.contains_expression()
        } else {
            false
        }
    }
}

/// The SourceCode of the running execution context, which owns every AST
/// node reachable from the code being evaluated.
fn active_source_code(agent: &Agent) -> crate::heap::SourceCode {
    agent
        .running_execution_context()
        .ecmascript_code
        .as_ref()
        .unwrap()
        .source_code
}

/// ### [15.2.4 Runtime Semantics: InstantiateOrdinaryFunctionObject](https://tc39.es/ecma262/#sec-runtime-semantics-instantiateordinaryfunctionobject)
pub(crate) fn instantiate_ordinary_function_object(
    agent: &mut Agent,
    function: &ast::Function<'static>,
    env: EnvironmentIndex,
    private_env: Option<PrivateEnvironment>,
) -> Object {
    // 1. Let name be StringValue of BindingIdentifier, or "default" for an
    //    anonymous export default declaration.
    let pk_name = match &function.id {
        Some(id) => PropertyKey::from_str(agent, id.name.as_str()),
        None => PropertyKey::from_str(agent, "default"),
    };
    // 2. Let sourceText be the source text matched by FunctionDeclaration.
    // 3. Let F be OrdinaryFunctionCreate(%Function.prototype%, sourceText,
    //    FormalParameters, FunctionBody, NON-LEXICAL-THIS, env, privateEnv).
    let source_code = active_source_code(agent);
    let params = OrdinaryFunctionCreateParams {
        function_prototype: None,
        source_code,
        source_text: function.span,
        parameters_list: unsafe { extend_node_lifetime(&function.params) },
        body: unsafe { extend_node_lifetime(function.body.as_deref().unwrap()) },
        is_concise_arrow_function: false,
        is_async: function.r#async,
        is_generator: function.generator,
        lexical_this: false,
        env,
        private_env,
    };
    let f = ordinary_function_create(agent, params);
    // 4. Perform SetFunctionName(F, name).
    set_function_name(agent, f, pk_name, None);
    // 5. Perform MakeConstructor(F) for plain functions.
    if !function.r#async && !function.generator {
        make_constructor(agent, f, None, None);
    }
    if function.generator {
        // InstantiateGeneratorFunctionObject:
        // 5. Let prototype be
        //    OrdinaryObjectCreate(%GeneratorPrototype%). Note that it has
        //    no generator internal slots of its own.
        let generator_prototype = agent.current_realm().intrinsics.generator_prototype();
        let prototype = ordinary_object_create(agent, Some(generator_prototype));
        // 6. Perform ! DefinePropertyOrThrow(F, "prototype", { [[Value]]:
        //    prototype, [[Writable]]: true, [[Enumerable]]: false,
        //    [[Configurable]]: false }).
        let prototype_key = PropertyKey::from_str(agent, "prototype");
        agent[f].properties.set(
            prototype_key,
            Property::data(Value::Object(prototype), true, false, false),
        );
    }
    // 6. Return F.
    f
}

/// ### [15.2.5 Runtime Semantics: InstantiateOrdinaryFunctionExpression](https://tc39.es/ecma262/#sec-runtime-semantics-instantiateordinaryfunctionexpression)
///
/// Also covers the generator/async variants; named function expressions
/// close over a fresh environment carrying their own immutable name
/// binding.
pub(crate) fn instantiate_function_expression(
    agent: &mut Agent,
    function: &ast::Function<'static>,
    name: Option<PropertyKey>,
) -> Object {
    let state = *agent
        .running_execution_context()
        .ecmascript_code
        .as_ref()
        .unwrap();
    let (env, name) = if let Some(id) = &function.id {
        // 1.-4. Create a funcEnv with an immutable binding for the
        //    function's own name.
        let name = crate::ecmascript::types::HeapString::from_str(agent, id.name.as_str());
        let func_env = crate::ecmascript::execution::new_declarative_environment(
            agent,
            Some(state.lexical_environment),
        );
        let func_env = EnvironmentIndex::Declarative(func_env);
        func_env.create_immutable_binding(agent, name, false).unwrap();
        (func_env, PropertyKey::String(name))
    } else {
        let name = name.unwrap_or_else(|| PropertyKey::from_str(agent, ""));
        (state.lexical_environment, name)
    };
    let source_code = active_source_code(agent);
    let params = OrdinaryFunctionCreateParams {
        function_prototype: None,
        source_code,
        source_text: function.span,
        parameters_list: unsafe { extend_node_lifetime(&function.params) },
        body: unsafe { extend_node_lifetime(function.body.as_deref().unwrap()) },
        is_concise_arrow_function: false,
        is_async: function.r#async,
        is_generator: function.generator,
        lexical_this: false,
        env,
        private_env: state.private_environment,
    };
    let closure = ordinary_function_create(agent, params);
    // SetFunctionName and MakeConstructor as for declarations.
    set_function_name(agent, closure, name, None);
    if !function.r#async && !function.generator {
        make_constructor(agent, closure, None, None);
    }
    if function.generator {
        let generator_prototype = agent.current_realm().intrinsics.generator_prototype();
        let prototype = ordinary_object_create(agent, Some(generator_prototype));
        let prototype_key = PropertyKey::from_str(agent, "prototype");
        agent[closure].properties.set(
            prototype_key,
            Property::data(Value::Object(prototype), true, false, false),
        );
    }
    // 5.-7. Bind the own-name binding to the closure itself.
    if let Some(id) = &function.id {
        let name = crate::ecmascript::types::HeapString::from_str(agent, id.name.as_str());
        env.initialize_binding(agent, name, Value::Object(closure)).unwrap();
    }
    closure
}

/// ### [15.3.4 Runtime Semantics: InstantiateArrowFunctionExpression](https://tc39.es/ecma262/#sec-runtime-semantics-instantiatearrowfunctionexpression)
pub(crate) fn instantiate_arrow_function_expression(
    agent: &mut Agent,
    function: &ast::ArrowFunctionExpression<'static>,
    name: Option<PropertyKey>,
) -> Object {
    let state = *agent
        .running_execution_context()
        .ecmascript_code
        .as_ref()
        .unwrap();
    let source_code = active_source_code(agent);
    let params = OrdinaryFunctionCreateParams {
        function_prototype: None,
        source_code,
        source_text: function.span(),
        parameters_list: unsafe { extend_node_lifetime(&function.params) },
        body: unsafe { extend_node_lifetime(&function.body) },
        is_concise_arrow_function: function.expression,
        is_async: function.r#async,
        is_generator: false,
        // 4. Let closure be OrdinaryFunctionCreate(..., LEXICAL-THIS, ...).
        lexical_this: true,
        env: state.lexical_environment,
        private_env: state.private_environment,
    };
    let closure = ordinary_function_create(agent, params);
    let name = name.unwrap_or_else(|| PropertyKey::from_str(agent, ""));
    set_function_name(agent, closure, name, None);
    closure
}
