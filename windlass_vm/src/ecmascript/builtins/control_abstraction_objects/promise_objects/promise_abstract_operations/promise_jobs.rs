// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2.2 Promise Jobs](https://tc39.es/ecma262/#sec-promise-jobs)

use super::promise_capability_records::PromiseCapability;
use super::promise_resolving_functions::create_resolving_functions;
use crate::ecmascript::abstract_operations::operations_on_objects::{call, call_function};
use crate::ecmascript::builtins::control_abstraction_objects::async_function_objects::resume_await_reaction;
use crate::ecmascript::builtins::control_abstraction_objects::promise_objects::promise_objects_data::{
    PromiseReaction, PromiseReactionHandler, PromiseReactionType,
};
use crate::ecmascript::execution::agent::{InnerJob, Job};
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::types::{Completion, Object, Value};

/// ### [27.2.2.1 NewPromiseReactionJob ( reaction, argument )](https://tc39.es/ecma262/#sec-newpromisereactionjob)
pub(crate) struct PromiseReactionJob {
    reaction: PromiseReaction,
    argument: Value,
}

impl PromiseReactionJob {
    pub(crate) fn run(self, agent: &mut Agent) -> JsResult<()> {
        let PromiseReactionJob { reaction, argument } = self;
        match reaction.handler {
            // a. If promiseCapability is undefined with an EMPTY handler,
            //    nothing observable happens.
            PromiseReactionHandler::Empty => {
                let Some(capability) = reaction.capability else {
                    return Ok(());
                };
                // d./e. Forward the settlement through the capability.
                match reaction.reaction_type {
                    PromiseReactionType::Fulfill => capability.try_resolve(agent, argument),
                    PromiseReactionType::Reject => capability.reject(agent, argument),
                }
                Ok(())
            }
            PromiseReactionHandler::JobCallback(handler) => {
                // f. Let handlerResult be
                //    Completion(HostCallJobCallback(handler, undefined,
                //    « argument »)).
                let handler_result =
                    call_function(agent, handler, Value::Undefined, &[argument]);
                let Some(capability) = reaction.capability else {
                    return Ok(());
                };
                // h./i. A throwing handler rejects the derived promise,
                //    a returning one resolves it.
                match handler_result {
                    Ok(value) => capability.try_resolve(agent, value),
                    Err(err) => capability.reject(agent, err.value()),
                }
                Ok(())
            }
            // The continuation of a suspended async activation.
            PromiseReactionHandler::Await(await_reaction) => {
                let completion = match reaction.reaction_type {
                    PromiseReactionType::Fulfill => Completion::normal(argument),
                    PromiseReactionType::Reject => {
                        Completion::Throw(JsError::new(argument))
                    }
                };
                resume_await_reaction(agent, await_reaction, completion);
                Ok(())
            }
        }
    }
}

/// ### [27.2.2.2 NewPromiseResolveThenableJob ( promiseToResolve, thenable, then )](https://tc39.es/ecma262/#sec-newpromiseresolvethenablejob)
pub(crate) struct PromiseResolveThenableJob {
    promise_to_resolve: Object,
    thenable: Object,
    then: Object,
}

impl PromiseResolveThenableJob {
    pub(crate) fn run(self, agent: &mut Agent) -> JsResult<()> {
        let Self {
            promise_to_resolve,
            thenable,
            then,
        } = self;
        // a. Let resolvingFunctions be
        //    CreateResolvingFunctions(promiseToResolve).
        let (resolve_function, reject_function) =
            create_resolving_functions(agent, promise_to_resolve);
        // b. Let thenCallResult be Completion(HostCallJobCallback(then,
        //    thenable, « resolve, reject »)).
        let then_call_result = call(
            agent,
            Value::Object(then),
            Value::Object(thenable),
            &[Value::Object(resolve_function), Value::Object(reject_function)],
        );
        // c. If thenCallResult is an abrupt completion: reject.
        if let Err(err) = then_call_result {
            let capability = PromiseCapability::from_promise(promise_to_resolve);
            capability.reject(agent, err.value());
        }
        // d. Return ? thenCallResult.
        Ok(())
    }
}

pub(crate) fn new_promise_reaction_job(
    agent: &mut Agent,
    reaction: PromiseReaction,
    argument: Value,
) -> Job {
    // 2.-4. The job's realm is the handler function's realm when one
    //       exists.
    let realm = match reaction.handler {
        PromiseReactionHandler::JobCallback(handler) => {
            crate::ecmascript::abstract_operations::operations_on_objects::get_function_realm(
                agent, handler,
            )
            .ok()
        }
        _ => {
            if agent.execution_context_stack.is_empty() {
                None
            } else {
                Some(agent.current_realm_id())
            }
        }
    };
    Job {
        realm,
        inner: InnerJob::PromiseReaction(PromiseReactionJob { reaction, argument }),
    }
}

pub(crate) fn new_promise_resolve_thenable_job(
    agent: &mut Agent,
    promise_to_resolve: Object,
    thenable: Object,
    then: Object,
) -> Job {
    // 2.-5. thenRealm is used to create error objects when the then
    //       callback is a revoked proxy.
    let realm =
        crate::ecmascript::abstract_operations::operations_on_objects::get_function_realm(
            agent, then,
        )
        .ok()
        .or_else(|| {
            if agent.execution_context_stack.is_empty() {
                None
            } else {
                Some(agent.current_realm_id())
            }
        });
    Job {
        realm,
        inner: InnerJob::PromiseResolveThenable(PromiseResolveThenableJob {
            promise_to_resolve,
            thenable,
            then,
        }),
    }
}
