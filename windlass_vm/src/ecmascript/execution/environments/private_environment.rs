// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use super::PrivateEnvironment;
use crate::ecmascript::types::{HeapString, Value};

/// ### [9.2 PrivateEnvironment Records](https://tc39.es/ecma262/#sec-privateenvironment-records)
///
/// Tracks the Private Names declared by ClassElements in the nearest
/// containing class.
#[derive(Debug, Clone, Default)]
pub struct PrivateEnvironmentRecord {
    /// ### \[\[OuterPrivateEnvironment]]
    pub(crate) outer_private_environment: Option<PrivateEnvironment>,

    /// ### \[\[Names]]
    ///
    /// Private names resolve to per-instance storage keys; the values here
    /// are the declaration-time identities.
    pub(crate) names: AHashMap<HeapString, Value>,
}
