// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [16.1 Scripts](https://tc39.es/ecma262/#sec-scripts)

use oxc_diagnostics::OxcDiagnostic;
use oxc_ecmascript::BoundNames;

use super::source_code::{SourceCode, SourceCodeType};
use super::ScriptOrModule;
use crate::ecmascript::execution::{
    Agent, ECMAScriptCodeEvaluationState, ExceptionType, ExecutionContext,
    GlobalEnvironmentRecord, JsResult, RealmIdentifier,
};
use crate::ecmascript::syntax_directed_operations::function_definitions::instantiate_ordinary_function_object;
use crate::ecmascript::syntax_directed_operations::scope_analysis::{
    script_lexically_scoped_declarations, script_var_declared_names,
    script_var_scoped_declarations, LexicallyScopedDeclaration, VarScopedDeclaration,
};
use crate::ecmascript::types::{Completion, HeapString, Value};
use crate::engine::fiber::{Fiber, FiberStep};
use crate::heap::ScriptIdentifier;

/// ### [16.1.4 Script Records](https://tc39.es/ecma262/#sec-script-records)
#[derive(Debug)]
pub struct ScriptRecord {
    /// \[\[Realm]]
    pub realm: RealmIdentifier,
    /// \[\[ECMAScriptCode]]
    pub ecmascript_code: oxc_ast::ast::Program<'static>,
    /// The source entry keeping the AST alive.
    pub source_code: SourceCode,
    /// \[\[HostDefined]]: the script's name for diagnostics.
    pub host_defined: Option<HeapString>,
    /// Whether the script is strict mode code (module-strict scripts or a
    /// "use strict" prologue).
    pub is_strict: bool,
}

/// ### [16.1.5 ParseScript ( sourceText, realm, hostDefined )](https://tc39.es/ecma262/#sec-parse-script)
pub fn parse_script(
    agent: &mut Agent,
    source_text: &str,
    realm: RealmIdentifier,
    strict: bool,
    host_defined: Option<HeapString>,
) -> Result<ScriptIdentifier, Vec<OxcDiagnostic>> {
    // 1./2. Parse sourceText; early errors surface as the diagnostics.
    let source_type = if strict {
        SourceCodeType::StrictScript
    } else {
        SourceCodeType::Script
    };
    let (program, source_code) = SourceCode::parse_source(agent, source_text, source_type)?;
    let is_strict = strict || has_use_strict_directive(&program);
    // 3. Return Script Record { ... }.
    agent.heap.scripts.push(ScriptRecord {
        realm,
        ecmascript_code: program,
        source_code,
        host_defined,
        is_strict,
    });
    Ok(ScriptIdentifier::last(&agent.heap.scripts))
}

fn has_use_strict_directive(program: &oxc_ast::ast::Program<'_>) -> bool {
    program
        .directives
        .iter()
        .any(|directive| directive.directive == "use strict")
}

/// A script evaluation in progress: the host-drainable lazy sequence.
#[derive(Debug)]
pub struct ScriptEvaluation {
    fiber: Fiber,
    script: ScriptIdentifier,
    finished: bool,
}

/// One advancement of a [`ScriptEvaluation`].
#[derive(Debug)]
pub enum ScriptStep {
    /// More work remains; call step again.
    Continue,
    /// Evaluation finished with the script's completion value.
    Done(JsResult<Value>),
}

impl ScriptEvaluation {
    pub fn step(&mut self, agent: &mut Agent) -> ScriptStep {
        debug_assert!(!self.finished);
        match self.fiber.step(agent) {
            FiberStep::Continue => ScriptStep::Continue,
            FiberStep::Yield(_) | FiberStep::Await(_) => {
                // Scripts cannot yield or await at their top level.
                self.finished = true;
                agent.pop_execution_context();
                let err = agent.throw_exception_with_static_message(
                    ExceptionType::SyntaxError,
                    "Unexpected suspension at script top level",
                );
                ScriptStep::Done(Err(err))
            }
            FiberStep::Done(completion) => {
                self.finished = true;
                agent.pop_execution_context();
                ScriptStep::Done(match completion {
                    Completion::Normal(value) => Ok(value.unwrap_or(Value::Undefined)),
                    Completion::Throw(err) => Err(err),
                    Completion::Return(_) | Completion::Break(_) | Completion::Continue(_) => {
                        unreachable!("control flow cannot escape a script")
                    }
                })
            }
        }
    }

    pub fn script(&self) -> ScriptIdentifier {
        self.script
    }
}

/// ### [16.1.6 ScriptEvaluation ( scriptRecord )](https://tc39.es/ecma262/#sec-runtime-semantics-scriptevaluation)
///
/// Prepares the script context and global declarations, returning the
/// drainable evaluation. On error the context is already popped.
pub fn begin_script_evaluation(
    agent: &mut Agent,
    script: ScriptIdentifier,
) -> JsResult<ScriptEvaluation> {
    let record = &agent.heap.scripts[script.into_index()];
    let realm = record.realm;
    let source_code = record.source_code;
    let is_strict = record.is_strict;
    // SAFETY: the program is owned by a never-dropped heap entry.
    let program: &'static oxc_ast::ast::Program<'static> = unsafe {
        super::source_code::extend_node_lifetime(&agent.heap.scripts[script.into_index()].ecmascript_code)
    };
    // 1./2. Let globalEnv be scriptRecord.[[Realm]].[[GlobalEnv]]; push the
    //    script context.
    let global_env = agent.get_realm(realm).global_env;
    let environment = agent.get_realm(realm).global_env_index();
    agent.push_execution_context(ExecutionContext {
        ecmascript_code: Some(ECMAScriptCodeEvaluationState {
            lexical_environment: environment,
            variable_environment: environment,
            private_environment: None,
            is_strict_mode: is_strict,
            source_code,
        }),
        function: None,
        realm,
        script_or_module: Some(ScriptOrModule::Script(script)),
    });
    // 12. Let result be
    //     Completion(GlobalDeclarationInstantiation(script, globalEnv)).
    if let Err(err) = global_declaration_instantiation(agent, program, global_env) {
        agent.pop_execution_context();
        return Err(err);
    }
    // 13. The statement list evaluates on the drainable fiber.
    Ok(ScriptEvaluation {
        fiber: Fiber::for_program(program),
        script,
        finished: false,
    })
}

/// Drains a script evaluation synchronously.
pub fn script_evaluation(agent: &mut Agent, script: ScriptIdentifier) -> JsResult<Value> {
    let mut evaluation = begin_script_evaluation(agent, script)?;
    loop {
        match evaluation.step(agent) {
            ScriptStep::Continue => {}
            ScriptStep::Done(result) => return result,
        }
    }
}

/// ### [16.1.7 GlobalDeclarationInstantiation ( script, env )](https://tc39.es/ecma262/#sec-globaldeclarationinstantiation)
pub(crate) fn global_declaration_instantiation(
    agent: &mut Agent,
    program: &'static oxc_ast::ast::Program<'static>,
    env: crate::ecmascript::execution::GlobalEnvironment,
) -> JsResult<()> {
    let lex_declarations = script_lexically_scoped_declarations(program);
    let var_names = script_var_declared_names(program);
    let var_declarations = script_var_scoped_declarations(program);

    // 1.-3. Name clash checks between lexical names and existing
    //    var/lexical/restricted globals.
    let mut lex_names: Vec<HeapString> = Vec::new();
    for declaration in &lex_declarations {
        declaration.bound_names(&mut |identifier| {
            lex_names.push(HeapString::from_str(agent, identifier.name.as_str()));
        });
    }
    for name in &lex_names {
        if GlobalEnvironmentRecord::has_var_declaration(agent, env, *name)
            || GlobalEnvironmentRecord::has_lexical_declaration(agent, env, *name)
        {
            let text = name.as_str(agent).to_owned();
            return Err(agent.throw_exception(
                ExceptionType::SyntaxError,
                format!("Identifier '{text}' has already been declared"),
            ));
        }
        if GlobalEnvironmentRecord::has_restricted_global_property(agent, env, *name)? {
            let text = name.as_str(agent).to_owned();
            return Err(agent.throw_exception(
                ExceptionType::SyntaxError,
                format!("Cannot declare global binding '{text}'"),
            ));
        }
    }
    // 4. For each name of varNames: lexical shadowing is an error.
    for name in &var_names {
        let name = HeapString::from_str(agent, name);
        if GlobalEnvironmentRecord::has_lexical_declaration(agent, env, name) {
            let text = name.as_str(agent).to_owned();
            return Err(agent.throw_exception(
                ExceptionType::SyntaxError,
                format!("Identifier '{text}' has already been declared"),
            ));
        }
    }

    // 5.-10. functionsToInitialize: the last hoistable declaration of each
    //    name wins; collect plain var names separately.
    let mut declared_function_names: Vec<&str> = Vec::new();
    let mut functions_to_initialize: Vec<&'static oxc_ast::ast::Function<'static>> = Vec::new();
    for declaration in var_declarations.iter().rev() {
        if let VarScopedDeclaration::Function(function) = declaration {
            let name = function.id.as_ref().unwrap().name.as_str();
            if !declared_function_names.contains(&name) {
                declared_function_names.push(name);
                functions_to_initialize.insert(0, function);
            }
        }
    }
    let mut declared_var_names: Vec<HeapString> = Vec::new();
    for declaration in &var_declarations {
        if let VarScopedDeclaration::Variable(declarator) = declaration {
            let mut names = Vec::new();
            declarator.id.bound_names(&mut |identifier| {
                names.push(HeapString::from_str(agent, identifier.name.as_str()));
            });
            for name in names {
                if declared_function_names.contains(&name.as_str(agent)) {
                    continue;
                }
                // 10.a.i.1. Let vnDefinable be ? env.CanDeclareGlobalVar(vn).
                if !GlobalEnvironmentRecord::can_declare_global_var(agent, env, name)? {
                    let text = name.as_str(agent).to_owned();
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        format!("Cannot declare global variable '{text}'"),
                    ));
                }
                if !declared_var_names.contains(&name) {
                    declared_var_names.push(name);
                }
            }
        }
    }
    // 8. Function declarability.
    for function in &functions_to_initialize {
        let name = HeapString::from_str(agent, function.id.as_ref().unwrap().name.as_str());
        if !GlobalEnvironmentRecord::can_declare_global_function(agent, env, name)? {
            let text = name.as_str(agent).to_owned();
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                format!("Cannot declare global function '{text}'"),
            ));
        }
    }

    // 15. Create the lexical bindings.
    let env_index = crate::ecmascript::execution::EnvironmentIndex::Global(env);
    for declaration in &lex_declarations {
        let is_constant = declaration.is_constant_declaration();
        let mut names = Vec::new();
        declaration.bound_names(&mut |identifier| {
            names.push(HeapString::from_str(agent, identifier.name.as_str()));
        });
        for name in names {
            if is_constant {
                // i. Perform ? env.CreateImmutableBinding(dn, true).
                env_index.create_immutable_binding(agent, name, true)?;
            } else {
                // ii. Perform ? env.CreateMutableBinding(dn, false).
                env_index.create_mutable_binding(agent, name, false)?;
            }
        }
    }
    // 16. Instantiate the hoisted functions.
    for function in functions_to_initialize {
        let name = HeapString::from_str(agent, function.id.as_ref().unwrap().name.as_str());
        let function_object =
            instantiate_ordinary_function_object(agent, function, env_index, None);
        GlobalEnvironmentRecord::create_global_function_binding(
            agent,
            env,
            name,
            crate::ecmascript::types::Value::Object(function_object),
            false,
        )?;
    }
    // 17. Create the global var bindings.
    for name in declared_var_names {
        GlobalEnvironmentRecord::create_global_var_binding(agent, env, name, false)?;
    }
    // 18. Return UNUSED.
    Ok(())
}
