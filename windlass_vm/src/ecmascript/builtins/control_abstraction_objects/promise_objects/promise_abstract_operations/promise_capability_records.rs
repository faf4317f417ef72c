// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2.1.1 PromiseCapability Records](https://tc39.es/ecma262/#sec-promisecapability-records)

use super::promise_jobs::new_promise_reaction_job;
use super::promise_resolving_functions::create_resolving_functions;
use crate::ecmascript::builtins::control_abstraction_objects::promise_objects::promise_objects_data::{
    promise_create, promise_data, promise_data_mut, PromiseReaction, PromiseReactionHandler,
    PromiseReactionType, PromiseState,
};
use crate::ecmascript::execution::agent::PromiseRejectionTrackerOperation;
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::{Object, Value};

/// A promise capability: the promise paired with the resolve and reject
/// functions that settle it. The two functions share an already-resolved
/// cell, stored on the pending promise state.
#[derive(Debug, Clone, Copy)]
pub struct PromiseCapability {
    promise: Object,
    pub(crate) resolve: Value,
    pub(crate) reject: Value,
}

impl PromiseCapability {
    /// ### [27.2.1.5 NewPromiseCapability ( C )](https://tc39.es/ecma262/#sec-newpromisecapability)
    ///
    /// Built-in promises only: subclass constructors fall back to the
    /// intrinsic behaviour.
    pub fn new(agent: &mut Agent) -> Self {
        let promise = promise_create(agent);
        let (resolve, reject) = create_resolving_functions(agent, promise);
        Self {
            promise,
            resolve: Value::Object(resolve),
            reject: Value::Object(reject),
        }
    }

    pub fn from_promise(promise: Object) -> Self {
        Self {
            promise,
            resolve: Value::Undefined,
            reject: Value::Undefined,
        }
    }

    pub fn promise(&self) -> Object {
        self.promise
    }

    /// ### [27.2.1.4 FulfillPromise ( promise, value )](https://tc39.es/ecma262/#sec-fulfillpromise)
    pub fn internal_fulfill(self, agent: &mut Agent, value: Value) {
        // 1. Assert: the value of promise.[[PromiseState]] is PENDING.
        let data = promise_data_mut(agent, self.promise);
        let PromiseState::Pending {
            fulfill_reactions, ..
        } = &mut data.promise_state
        else {
            unreachable!()
        };
        // 2. Let reactions be promise.[[PromiseFulfillReactions]].
        let reactions = std::mem::take(fulfill_reactions);
        // 3.-6. Settle: result stored, both reaction lists dropped.
        data.promise_state = PromiseState::Fulfilled {
            promise_result: value,
        };
        // 7. Perform TriggerPromiseReactions(reactions, value).
        trigger_promise_reactions(agent, reactions, value);
    }

    /// ### [27.2.1.7 RejectPromise ( promise, reason )](https://tc39.es/ecma262/#sec-rejectpromise)
    pub fn internal_reject(self, agent: &mut Agent, reason: Value) {
        let data = promise_data_mut(agent, self.promise);
        let PromiseState::Pending {
            reject_reactions, ..
        } = &mut data.promise_state
        else {
            unreachable!()
        };
        // 2. Let reactions be promise.[[PromiseRejectReactions]].
        let reactions = std::mem::take(reject_reactions);
        data.promise_state = PromiseState::Rejected {
            promise_result: reason,
        };
        let is_handled = data.is_handled;
        // 6. If promise.[[PromiseIsHandled]] is false, perform
        //    HostPromiseRejectionTracker(promise, "reject").
        if !is_handled {
            agent
                .host_hooks
                .promise_rejection_tracker(self.promise, PromiseRejectionTrackerOperation::Reject);
        }
        // 7. Perform TriggerPromiseReactions(reactions, reason).
        trigger_promise_reactions(agent, reactions, reason);
    }

    /// ### [27.2.1.3.2 Promise Resolve Functions](https://tc39.es/ecma262/#sec-promise-resolve-functions)
    ///
    /// The resolution algorithm shared by the resolve function object and
    /// the internal fast paths.
    pub fn resolve(self, agent: &mut Agent, resolution: Value) {
        // 7. If SameValue(resolution, promise) is true: reject with a
        //    TypeError (a chaining cycle).
        if resolution == Value::Object(self.promise) {
            let error = agent.throw_exception_with_static_message(
                crate::ecmascript::execution::ExceptionType::TypeError,
                "Chaining cycle detected for promise",
            );
            self.internal_reject(agent, error.value());
            return;
        }
        // 8. If resolution is not an Object, fulfill.
        let Value::Object(resolution_object) = resolution else {
            self.internal_fulfill(agent, resolution);
            return;
        };
        // 9. Let then be Completion(Get(resolution, "then")).
        let then_key = crate::ecmascript::types::PropertyKey::from_str(agent, "then");
        let then = crate::ecmascript::abstract_operations::operations_on_objects::get(
            agent,
            resolution_object,
            then_key,
        );
        let then = match then {
            Ok(then) => then,
            // 10. If then is an abrupt completion, reject.
            Err(err) => {
                self.internal_reject(agent, err.value());
                return;
            }
        };
        // 11./12. A non-callable then means a plain object: fulfill.
        let Value::Object(then_action) = then else {
            self.internal_fulfill(agent, resolution);
            return;
        };
        if !then_action.is_callable(agent) {
            self.internal_fulfill(agent, resolution);
            return;
        }
        // 13.-15. Enqueue a resolve-thenable job.
        let job = super::promise_jobs::new_promise_resolve_thenable_job(
            agent,
            self.promise,
            resolution_object,
            then_action,
        );
        agent.host_hooks.enqueue_promise_job(job);
    }

    pub fn reject(self, agent: &mut Agent, reason: Value) {
        if self.is_already_resolved(agent) {
            return;
        }
        self.mark_resolved(agent);
        self.internal_reject(agent, reason);
    }

    /// Resolution entry point that honours the shared already-resolved
    /// cell.
    pub fn try_resolve(self, agent: &mut Agent, resolution: Value) {
        if self.is_already_resolved(agent) {
            return;
        }
        self.mark_resolved(agent);
        self.resolve(agent, resolution);
    }

    pub(crate) fn is_already_resolved(self, agent: &Agent) -> bool {
        match &promise_data(agent, self.promise).promise_state {
            PromiseState::Pending { is_resolved, .. } => *is_resolved,
            _ => true,
        }
    }

    fn mark_resolved(self, agent: &mut Agent) {
        if let PromiseState::Pending { is_resolved, .. } =
            &mut promise_data_mut(agent, self.promise).promise_state
        {
            *is_resolved = true;
        }
    }
}

/// ### [27.2.1.8 TriggerPromiseReactions ( reactions, argument )](https://tc39.es/ecma262/#sec-triggerpromisereactions)
pub fn trigger_promise_reactions(
    agent: &mut Agent,
    reactions: Vec<PromiseReaction>,
    argument: Value,
) {
    // 1. For each element reaction of reactions: enqueue a
    //    PromiseReactionJob.
    for reaction in reactions {
        let job = new_promise_reaction_job(agent, reaction, argument);
        agent.host_hooks.enqueue_promise_job(job);
    }
}

/// ### [27.2.5.4.1 PerformPromiseThen ( promise, onFulfilled, onRejected \[ , resultCapability \] )](https://tc39.es/ecma262/#sec-performpromisethen)
pub fn perform_promise_then(
    agent: &mut Agent,
    promise: Object,
    on_fulfilled: Value,
    on_rejected: Value,
    result_capability: Option<PromiseCapability>,
) {
    // 3./4. Non-callable handlers become EMPTY.
    let fulfill_handler = match on_fulfilled {
        Value::Object(f) if f.is_callable(agent) => PromiseReactionHandler::JobCallback(f),
        _ => PromiseReactionHandler::Empty,
    };
    let reject_handler = match on_rejected {
        Value::Object(f) if f.is_callable(agent) => PromiseReactionHandler::JobCallback(f),
        _ => PromiseReactionHandler::Empty,
    };
    inner_promise_then(
        agent,
        promise,
        fulfill_handler,
        reject_handler,
        result_capability,
    );
}

/// The handler-typed core of PerformPromiseThen, shared with the await
/// machinery.
pub fn inner_promise_then(
    agent: &mut Agent,
    promise: Object,
    fulfill_handler: PromiseReactionHandler,
    reject_handler: PromiseReactionHandler,
    result_capability: Option<PromiseCapability>,
) {
    // 5./6. Build the reaction records.
    let fulfill_reaction = PromiseReaction {
        capability: result_capability,
        reaction_type: PromiseReactionType::Fulfill,
        handler: fulfill_handler,
    };
    let reject_reaction = PromiseReaction {
        capability: result_capability,
        reaction_type: PromiseReactionType::Reject,
        handler: reject_handler,
    };
    let data = promise_data_mut(agent, promise);
    match &mut data.promise_state {
        // 7. If promise.[[PromiseState]] is PENDING: append the reactions.
        PromiseState::Pending {
            fulfill_reactions,
            reject_reactions,
            ..
        } => {
            fulfill_reactions.push(fulfill_reaction);
            reject_reactions.push(reject_reaction);
            data.is_handled = true;
        }
        // 8. A settled promise schedules the matching reaction
        //    immediately; handlers still never run synchronously.
        PromiseState::Fulfilled { promise_result } => {
            let value = *promise_result;
            data.is_handled = true;
            let job = new_promise_reaction_job(agent, fulfill_reaction, value);
            agent.host_hooks.enqueue_promise_job(job);
        }
        PromiseState::Rejected { promise_result } => {
            let reason = *promise_result;
            let was_handled = data.is_handled;
            data.is_handled = true;
            if !was_handled {
                agent
                    .host_hooks
                    .promise_rejection_tracker(promise, PromiseRejectionTrackerOperation::Handle);
            }
            let job = new_promise_reaction_job(agent, reject_reaction, reason);
            agent.host_hooks.enqueue_promise_job(job);
        }
    }
}

/// ### [27.2.4.7.1 PromiseResolve ( C, x )](https://tc39.es/ecma262/#sec-promise-resolve)
pub fn promise_resolve(agent: &mut Agent, value: Value) -> Object {
    // 1. If IsPromise(x) is true, return x.
    if let Some(promise) =
        crate::ecmascript::builtins::control_abstraction_objects::promise_objects::promise_objects_data::is_promise(
            agent, value,
        )
    {
        return promise;
    }
    // 2./3. Otherwise resolve a fresh capability with x.
    let capability = PromiseCapability::new(agent);
    capability.try_resolve(agent, value);
    capability.promise()
}
