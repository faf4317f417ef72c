// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)

use std::cell::RefCell;
use std::collections::VecDeque;

use ahash::AHashMap;

use super::environments::{get_identifier_reference, EnvironmentIndex};
use super::execution_context::ExecutionContext;
use super::realm::Realm;
use crate::ecmascript::builtins::control_abstraction_objects::promise_objects::promise_abstract_operations::promise_jobs::{
    PromiseReactionJob, PromiseResolveThenableJob,
};
use crate::ecmascript::builtins::error::create_error_object;
use crate::ecmascript::types::{HeapString, Object, Reference, Symbol, Value};
use crate::engine::dispatch::SyntaxTable;
use crate::heap::{Heap, RealmIdentifier};

#[derive(Debug, Default)]
pub struct Options {
    /// An optional bound on evaluator steps. Exhaustion surfaces as a thrown
    /// `RangeError`, which is how an embedder implements script timeouts.
    pub step_budget: Option<u64>,
    pub print_internals: bool,
}

pub type JsResult<T> = std::result::Result<T, JsError>;

/// A thrown language value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsError(Value);

impl JsError {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(self) -> Value {
        self.0
    }

    pub fn debug_string(self, agent: &Agent) -> std::string::String {
        self.0.debug_string(agent)
    }
}

pub(crate) enum InnerJob {
    PromiseResolveThenable(PromiseResolveThenableJob),
    PromiseReaction(PromiseReactionJob),
}

/// ### [9.5 Jobs and Host Operations to Enqueue Jobs](https://tc39.es/ecma262/#sec-jobs)
///
/// A microtask: runs only when the execution-context stack is empty, sets up
/// its own realm context, and must return a normal completion.
pub struct Job {
    pub(crate) realm: Option<RealmIdentifier>,
    pub(crate) inner: InnerJob,
}

impl Job {
    pub fn realm(&self) -> Option<RealmIdentifier> {
        self.realm
    }

    pub fn run(self, agent: &mut Agent) -> JsResult<()> {
        let mut pushed_context = false;
        if let Some(realm) = self.realm {
            if agent.execution_context_stack.is_empty() || agent.current_realm_id() != realm {
                agent.execution_context_stack.push(ExecutionContext {
                    ecmascript_code: None,
                    function: None,
                    realm,
                    script_or_module: None,
                });
                pushed_context = true;
            }
        }

        let result = match self.inner {
            InnerJob::PromiseResolveThenable(job) => job.run(agent),
            InnerJob::PromiseReaction(job) => job.run(agent),
        };

        if pushed_context {
            agent.execution_context_stack.pop();
        }

        result
    }
}

pub enum PromiseRejectionTrackerOperation {
    Reject,
    Handle,
}

pub trait HostHooks: std::fmt::Debug {
    /// ### [9.5.5 HostEnqueuePromiseJob ( job, realm )](https://tc39.es/ecma262/#sec-hostenqueuepromisejob)
    fn enqueue_promise_job(&self, job: Job);

    /// Hands back the oldest queued job, if the hooks own a queue. The
    /// embedder's driver loop drains jobs between turns with this.
    fn pop_promise_job(&self) -> Option<Job> {
        None
    }

    /// ### [27.2.1.9 HostPromiseRejectionTracker ( promise, operation )](https://tc39.es/ecma262/#sec-host-promise-rejection-tracker)
    fn promise_rejection_tracker(
        &self,
        _promise: Object,
        _operation: PromiseRejectionTrackerOperation,
    ) {
        // The default implementation is to return unused.
    }
}

/// Host hooks with a thread-local FIFO job queue, suitable for tests and
/// single-agent embedders.
#[derive(Debug)]
pub struct DefaultHostHooks;

thread_local! {
    static JOB_QUEUE: RefCell<VecDeque<Job>> = RefCell::new(VecDeque::new());
}

impl HostHooks for DefaultHostHooks {
    fn enqueue_promise_job(&self, job: Job) {
        JOB_QUEUE.with(|queue| queue.borrow_mut().push_back(job));
    }

    fn pop_promise_job(&self) -> Option<Job> {
        JOB_QUEUE.with(|queue| queue.borrow_mut().pop_front())
    }
}

/// An agent: the heap, the execution context stack, and the host embedding.
#[derive(Debug)]
pub struct Agent {
    pub heap: Heap,
    pub(crate) options: Options,
    pub(crate) global_symbol_registry: AHashMap<HeapString, Symbol>,
    pub(crate) host_hooks: &'static dyn HostHooks,
    pub(crate) execution_context_stack: Vec<ExecutionContext>,
    pub(crate) syntax_table: SyntaxTable,
    steps_taken: u64,
}

impl Agent {
    pub fn new(options: Options, host_hooks: &'static dyn HostHooks) -> Self {
        Self {
            heap: Heap::new(),
            options,
            global_symbol_registry: AHashMap::default(),
            host_hooks,
            execution_context_stack: Vec::new(),
            syntax_table: SyntaxTable::default(),
            steps_taken: 0,
        }
    }

    pub fn host_hooks(&self) -> &'static dyn HostHooks {
        self.host_hooks
    }

    pub(crate) fn syntax_table(&self) -> &SyntaxTable {
        &self.syntax_table
    }

    pub(crate) fn syntax_table_mut(&mut self) -> &mut SyntaxTable {
        &mut self.syntax_table
    }

    /// Accounts one evaluator step against the optional step budget.
    pub(crate) fn consume_step(&mut self) -> JsResult<()> {
        self.steps_taken += 1;
        if let Some(budget) = self.options.step_budget {
            if self.steps_taken > budget {
                return Err(self.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "Execution step budget exhausted",
                ));
            }
        }
        Ok(())
    }

    pub fn current_realm_id(&self) -> RealmIdentifier {
        self.execution_context_stack.last().unwrap().realm
    }

    pub fn current_realm(&self) -> &Realm {
        self.get_realm(self.current_realm_id())
    }

    pub fn current_realm_mut(&mut self) -> &mut Realm {
        let id = self.current_realm_id();
        self.get_realm_mut(id)
    }

    pub fn get_realm(&self, id: RealmIdentifier) -> &Realm {
        &self.heap.realms[id.into_index()]
    }

    pub fn get_realm_mut(&mut self, id: RealmIdentifier) -> &mut Realm {
        &mut self.heap.realms[id.into_index()]
    }

    /// ### [9.4.6 GetGlobalObject ( )](https://tc39.es/ecma262/#sec-getglobalobject)
    pub fn current_global_object(&self) -> Object {
        self.current_realm().global_object
    }

    /// Fetches an intrinsic of the current realm by its well-known name.
    pub fn intrinsic(&self, name: &'static str) -> Object {
        self.current_realm().intrinsics.get(name)
    }

    pub(crate) fn running_execution_context(&self) -> &ExecutionContext {
        self.execution_context_stack.last().unwrap()
    }

    pub(crate) fn running_execution_context_mut(&mut self) -> &mut ExecutionContext {
        self.execution_context_stack.last_mut().unwrap()
    }

    pub(crate) fn push_execution_context(&mut self, context: ExecutionContext) {
        self.execution_context_stack.push(context);
    }

    /// Pushes a bare execution context for the given realm. Embedders call
    /// this to establish a current realm before running scripts or jobs.
    pub fn enter_realm(&mut self, realm: RealmIdentifier) {
        self.push_execution_context(ExecutionContext {
            ecmascript_code: None,
            function: None,
            realm,
            script_or_module: None,
        });
    }

    /// Leaves a realm entered with [`Agent::enter_realm`].
    pub fn exit_realm(&mut self) {
        self.pop_execution_context();
    }

    pub(crate) fn pop_execution_context(&mut self) -> ExecutionContext {
        self.execution_context_stack.pop().unwrap()
    }

    pub(crate) fn current_lexical_environment(&self) -> EnvironmentIndex {
        self.running_execution_context()
            .ecmascript_code
            .as_ref()
            .unwrap()
            .lexical_environment
    }

    pub(crate) fn current_variable_environment(&self) -> EnvironmentIndex {
        self.running_execution_context()
            .ecmascript_code
            .as_ref()
            .unwrap()
            .variable_environment
    }

    pub(crate) fn set_current_lexical_environment(&mut self, env: EnvironmentIndex) {
        self.running_execution_context_mut()
            .ecmascript_code
            .as_mut()
            .unwrap()
            .lexical_environment = env;
    }

    pub(crate) fn in_strict_mode(&self) -> bool {
        self.running_execution_context()
            .ecmascript_code
            .as_ref()
            .is_some_and(|code| code.is_strict_mode)
    }

    /// The function object of the running execution context.
    pub(crate) fn active_function_object(&self) -> Option<Object> {
        self.execution_context_stack.last().and_then(|cx| cx.function)
    }

    /// ### [5.2.3.2 Throw an Exception](https://tc39.es/ecma262/#sec-throw-an-exception)
    pub fn throw_exception_with_static_message(
        &mut self,
        kind: ExceptionType,
        message: &'static str,
    ) -> JsError {
        self.throw_exception(kind, message.to_owned())
    }

    pub fn throw_exception(&mut self, kind: ExceptionType, message: String) -> JsError {
        let error = create_error_object(self, kind, message);
        JsError(Value::Object(error))
    }

    pub(crate) fn throw_error_value(&mut self, value: Value) -> JsError {
        JsError(value)
    }

    /// Renders the current execution-context stack into the non-standard
    /// `stack` string captured at error construction.
    pub(crate) fn capture_stack_trace(&self) -> String {
        let mut out = String::new();
        for context in self.execution_context_stack.iter().rev() {
            let name = context
                .function
                .and_then(|f| {
                    let key = self.heap.string_lookup.get("name").copied()?;
                    let property = self.heap.objects[f.into_index()]
                        .properties
                        .get(crate::ecmascript::types::PropertyKey::String(key))?;
                    match property.value {
                        crate::ecmascript::types::PropertyValue::Data { value: Value::String(s), .. } => {
                            Some(s.as_str(self).to_owned())
                        }
                        _ => None,
                    }
                })
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "<anonymous>".to_owned());
            out.push_str("\n    at ");
            out.push_str(&name);
        }
        out
    }
}

/// ### [9.4.1 GetActiveScriptOrModule ()](https://tc39.es/ecma262/#sec-getactivescriptormodule)
pub(crate) fn get_active_script_or_module(
    agent: &Agent,
) -> Option<crate::ecmascript::scripts_and_modules::ScriptOrModule> {
    agent
        .execution_context_stack
        .iter()
        .rev()
        .find_map(|context| context.script_or_module)
}

/// ### [9.4.2 ResolveBinding ( name \[ , env \] )](https://tc39.es/ecma262/#sec-resolvebinding)
///
/// Determines the binding of `name`, starting from `env` or the running
/// execution context's LexicalEnvironment.
pub(crate) fn resolve_binding(
    agent: &mut Agent,
    name: HeapString,
    env: Option<EnvironmentIndex>,
) -> JsResult<Reference> {
    let env = env.or_else(|| {
        // 1. If env is not present or env is undefined, then
        //    a. Set env to the running execution context's LexicalEnvironment.
        Some(agent.current_lexical_environment())
    });

    // 3. Let strict be IsStrict(the syntactic production that is being
    //    evaluated).
    let strict = agent.in_strict_mode();

    // 4. Return ? GetIdentifierReference(env, name, strict).
    get_identifier_reference(agent, env, name, strict)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Error,
    AggregateError,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl ExceptionType {
    /// The value of the error's `name` property.
    pub fn as_str(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::AggregateError => "AggregateError",
            ExceptionType::EvalError => "EvalError",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
            ExceptionType::UriError => "URIError",
        }
    }
}
