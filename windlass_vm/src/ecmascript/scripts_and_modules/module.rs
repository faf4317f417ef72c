// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [16.2 Modules](https://tc39.es/ecma262/#sec-modules)
//!
//! A single-module subset: a module parses with the module grammar, runs
//! strict, keeps its lexical declarations in a module environment, and
//! exposes its exports through a module namespace exotic object. Import
//! declarations require a host loader, which this embedding does not
//! provide, so they are rejected at evaluation time.

use oxc_diagnostics::OxcDiagnostic;
use oxc_ecmascript::BoundNames;

use super::source_code::{SourceCode, SourceCodeType};
use crate::ecmascript::builtins::module_namespace::ModuleNamespaceData;
use crate::ecmascript::execution::{
    new_declarative_environment, Agent, DeclarativeEnvironment, ECMAScriptCodeEvaluationState,
    EnvironmentIndex, ExceptionType, ExecutionContext, JsResult, RealmIdentifier,
};
use crate::ecmascript::types::{
    Completion, HeapString, Object, ObjectHeapData, ObjectKind, Value,
};
use crate::engine::fiber::Fiber;
use crate::heap::ModuleIdentifier;

/// A minimal source text module record.
#[derive(Debug)]
pub struct ModuleRecord {
    /// \[\[Realm]]
    pub realm: RealmIdentifier,
    /// \[\[ECMAScriptCode]]
    pub ecmascript_code: oxc_ast::ast::Program<'static>,
    pub source_code: SourceCode,
    /// \[\[Environment]]
    pub environment: DeclarativeEnvironment,
    /// \[\[Namespace]]
    pub namespace: Option<Object>,
    /// The module's exported binding names.
    pub exports: Vec<HeapString>,
}

/// ### [16.2.1.7 ParseModule ( sourceText, realm, hostDefined )](https://tc39.es/ecma262/#sec-parsemodule)
pub fn parse_module(
    agent: &mut Agent,
    source_text: &str,
    realm: RealmIdentifier,
) -> Result<ModuleIdentifier, Vec<OxcDiagnostic>> {
    let (program, source_code) = SourceCode::parse_source(agent, source_text, SourceCodeType::Module)?;
    // The module environment chains to the realm's global environment.
    let global_env = agent.get_realm(realm).global_env_index();
    let environment = new_declarative_environment(agent, Some(global_env));
    // Collect the exported local names.
    let mut exports: Vec<HeapString> = Vec::new();
    for statement in &program.body {
        if let oxc_ast::ast::Statement::ExportNamedDeclaration(export) = statement {
            if let Some(declaration) = &export.declaration {
                declaration.bound_names(&mut |identifier| {
                    exports.push(HeapString::from_str(agent, identifier.name.as_str()));
                });
            }
        }
    }
    exports.sort_by(|a, b| {
        // Exports list in code unit order.
        a.as_str(agent).cmp(b.as_str(agent))
    });
    agent.heap.modules.push(ModuleRecord {
        realm,
        ecmascript_code: program,
        source_code,
        environment,
        namespace: None,
        exports,
    });
    Ok(ModuleIdentifier::last(&agent.heap.modules))
}

/// ### [16.2.1.10 GetModuleNamespace ( module )](https://tc39.es/ecma262/#sec-getmodulenamespace)
pub fn get_module_namespace(agent: &mut Agent, module: ModuleIdentifier) -> Object {
    if let Some(namespace) = agent.heap.modules[module.into_index()].namespace {
        return namespace;
    }
    let exports = agent.heap.modules[module.into_index()].exports.clone();
    // 10.4.6.12 ModuleNamespaceCreate: null prototype, non-extensible.
    let namespace = agent.heap.create_object(ObjectHeapData::new(
        None,
        ObjectKind::ModuleNamespace(Box::new(ModuleNamespaceData { module, exports })),
    ));
    agent[namespace].extensible = false;
    let tag = Value::from_str(agent, "Module");
    let key = crate::ecmascript::types::PropertyKey::Symbol(
        crate::heap::WellKnownSymbolIndexes::ToStringTag.into(),
    );
    agent[namespace].properties.set(
        key,
        crate::ecmascript::types::Property::data(tag, false, false, false),
    );
    agent.heap.modules[module.into_index()].namespace = Some(namespace);
    namespace
}

/// Evaluates the module body: declarations instantiate into the module
/// environment, then the statement list runs strict.
pub fn module_evaluation(agent: &mut Agent, module: ModuleIdentifier) -> JsResult<Value> {
    let record = &agent.heap.modules[module.into_index()];
    let realm = record.realm;
    let source_code = record.source_code;
    let environment = record.environment;
    // SAFETY: owned by a never-dropped heap entry.
    let program: &'static oxc_ast::ast::Program<'static> = unsafe {
        super::source_code::extend_node_lifetime(
            &agent.heap.modules[module.into_index()].ecmascript_code,
        )
    };
    for statement in &program.body {
        if matches!(
            statement,
            oxc_ast::ast::Statement::ImportDeclaration(_)
                | oxc_ast::ast::Statement::ExportAllDeclaration(_)
        ) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::SyntaxError,
                "Module imports require a host module loader",
            ));
        }
    }
    let env_index = EnvironmentIndex::Declarative(environment);
    agent.push_execution_context(ExecutionContext {
        ecmascript_code: Some(ECMAScriptCodeEvaluationState {
            lexical_environment: env_index,
            variable_environment: env_index,
            private_environment: None,
            is_strict_mode: true,
            source_code,
        }),
        function: None,
        realm,
        script_or_module: Some(super::ScriptOrModule::Module(module)),
    });
    // Module bodies hoist like function bodies: all declarations live in
    // the module environment.
    if let Err(err) = instantiate_module_declarations(agent, program, env_index) {
        agent.pop_execution_context();
        return Err(err);
    }
    let mut fiber = Fiber::for_program(program);
    let completion = fiber.run_to_completion(agent);
    agent.pop_execution_context();
    match completion {
        Completion::Normal(value) => Ok(value.unwrap_or(Value::Undefined)),
        Completion::Throw(err) => Err(err),
        _ => unreachable!("control flow cannot escape a module body"),
    }
}

fn instantiate_module_declarations(
    agent: &mut Agent,
    program: &'static oxc_ast::ast::Program<'static>,
    env: EnvironmentIndex,
) -> JsResult<()> {
    use crate::ecmascript::syntax_directed_operations::scope_analysis::{
        script_var_declared_names, script_var_scoped_declarations, VarScopedDeclaration,
    };
    // Var declarations initialize to undefined.
    for name in script_var_declared_names(program) {
        let name = HeapString::from_str(agent, name);
        if !env.has_binding(agent, name)? {
            env.create_mutable_binding(agent, name, false)?;
            env.initialize_binding(agent, name, Value::Undefined)?;
        }
    }
    // Hoisted function declarations bind eagerly.
    for declaration in script_var_scoped_declarations(program) {
        if let VarScopedDeclaration::Function(function) = declaration {
            let name = HeapString::from_str(agent, function.id.as_ref().unwrap().name.as_str());
            let function_object =
                crate::ecmascript::syntax_directed_operations::function_definitions::instantiate_ordinary_function_object(
                    agent, function, env, None,
                );
            env.set_mutable_binding(agent, name, Value::Object(function_object), false)?;
        }
    }
    // Lexical declarations get uninitialized bindings.
    let lex_declarations =
        crate::ecmascript::syntax_directed_operations::scope_analysis::script_lexically_scoped_declarations(
            program,
        );
    for declaration in &lex_declarations {
        let is_constant = declaration.is_constant_declaration();
        let mut names = Vec::new();
        declaration.bound_names(&mut |identifier| {
            names.push(HeapString::from_str(agent, identifier.name.as_str()));
        });
        for name in names {
            if is_constant {
                env.create_immutable_binding(agent, name, true)?;
            } else {
                env.create_mutable_binding(agent, name, false)?;
            }
        }
    }
    Ok(())
}
