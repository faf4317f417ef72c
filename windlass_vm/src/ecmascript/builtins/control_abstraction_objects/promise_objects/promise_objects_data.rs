// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2 Promise Objects](https://tc39.es/ecma262/#sec-promise-objects)

use crate::ecmascript::execution::{Agent, ProtoIntrinsics};
use crate::ecmascript::types::{Object, ObjectHeapData, ObjectKind, Value};
use crate::heap::AwaitReaction;

/// ### [\[\[PromiseState]]](https://tc39.es/ecma262/#sec-properties-of-promise-instances)
///
/// The reaction lists live in the pending state and are emptied at
/// settlement, so no handler outlives resolution. `is_resolved` is the
/// shared already-resolved cell of the resolve/reject function pair.
#[derive(Debug)]
pub enum PromiseState {
    Pending {
        fulfill_reactions: Vec<PromiseReaction>,
        reject_reactions: Vec<PromiseReaction>,
        is_resolved: bool,
    },
    Fulfilled {
        promise_result: Value,
    },
    Rejected {
        promise_result: Value,
    },
}

#[derive(Debug)]
pub struct PromiseData {
    pub promise_state: PromiseState,
    /// \[\[PromiseIsHandled]]
    pub is_handled: bool,
}

impl Default for PromiseData {
    fn default() -> Self {
        Self {
            promise_state: PromiseState::Pending {
                fulfill_reactions: Vec::new(),
                reject_reactions: Vec::new(),
                is_resolved: false,
            },
            is_handled: false,
        }
    }
}

/// ### [27.2.1.2 PromiseReaction Records](https://tc39.es/ecma262/#sec-promisereaction-records)
#[derive(Debug, Clone, Copy)]
pub struct PromiseReaction {
    /// \[\[Capability]]
    pub capability: Option<super::promise_abstract_operations::promise_capability_records::PromiseCapability>,
    /// \[\[Type]]
    pub reaction_type: PromiseReactionType,
    /// \[\[Handler]]
    pub handler: PromiseReactionHandler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseReactionType {
    Fulfill,
    Reject,
}

/// The handler of a reaction: a user callback, the identity/thrower
/// defaults, or the continuation of a suspended async activation.
#[derive(Debug, Clone, Copy)]
pub enum PromiseReactionHandler {
    Empty,
    JobCallback(Object),
    Await(AwaitReaction),
}

/// Creates a fresh pending promise with `%Promise.prototype%`.
pub fn promise_create(agent: &mut Agent) -> Object {
    let prototype = agent.intrinsic(ProtoIntrinsics::Promise.intrinsic_name());
    agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::Promise(Box::new(PromiseData::default())),
    ))
}

/// ### [27.2.1.6 IsPromise ( x )](https://tc39.es/ecma262/#sec-ispromise)
pub fn is_promise(agent: &Agent, value: Value) -> Option<Object> {
    match value {
        Value::Object(object) if matches!(agent[object].kind, ObjectKind::Promise(_)) => {
            Some(object)
        }
        _ => None,
    }
}

pub(crate) fn promise_data_mut<'a>(agent: &'a mut Agent, promise: Object) -> &'a mut PromiseData {
    match &mut agent[promise].kind {
        ObjectKind::Promise(data) => data,
        _ => unreachable!("expected a promise object"),
    }
}

pub(crate) fn promise_data<'a>(agent: &'a Agent, promise: Object) -> &'a PromiseData {
    match &agent[promise].kind {
        ObjectKind::Promise(data) => data,
        _ => unreachable!("expected a promise object"),
    }
}
