// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod module;
pub mod script;
pub mod source_code;

use crate::heap::{ModuleIdentifier, ScriptIdentifier};

/// ### [ScriptOrModule](https://tc39.es/ecma262/#script-record)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOrModule {
    Script(ScriptIdentifier),
    Module(ModuleIdentifier),
}
