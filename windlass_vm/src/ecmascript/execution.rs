// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod agent;
mod execution_context;
mod environments;
mod realm;

pub use agent::{
    Agent, DefaultHostHooks, ExceptionType, HostHooks, Job, JsError, JsResult, Options,
    PromiseRejectionTrackerOperation,
};
pub(crate) use environments::get_this_function_environment;
pub use environments::{
    get_identifier_reference, get_this_environment, new_declarative_environment,
    new_function_environment, new_object_environment, DeclarativeEnvironment,
    DeclarativeEnvironmentRecord, EnvironmentIndex, Environments, FunctionEnvironment,
    FunctionEnvironmentRecord, GlobalEnvironment, GlobalEnvironmentRecord, ObjectEnvironment,
    ObjectEnvironmentRecord, PrivateEnvironment, ThisBindingStatus,
};
pub use execution_context::{ECMAScriptCodeEvaluationState, ExecutionContext};
pub use realm::{
    create_realm, initialize_default_realm, Intrinsics, ProtoIntrinsics, Realm,
};

pub use crate::heap::RealmIdentifier;
