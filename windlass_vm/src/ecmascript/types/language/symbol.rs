// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.5 The Symbol Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-symbol-type)

use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::HeapString;
pub use crate::heap::Symbol;

#[derive(Debug, Clone)]
pub struct SymbolHeapData {
    /// \[\[Description]]
    pub(crate) description: Option<HeapString>,
}

impl Symbol {
    /// Creates a new unique symbol with the given description.
    pub fn new(agent: &mut Agent, description: Option<HeapString>) -> Self {
        agent.heap.create_symbol(SymbolHeapData { description })
    }

    pub fn description(self, agent: &Agent) -> Option<HeapString> {
        agent.heap.symbols[self.into_index()].description
    }

    /// ### [20.4.3.3.1 SymbolDescriptiveString ( sym )](https://tc39.es/ecma262/#sec-symboldescriptivestring)
    pub fn descriptive_string(self, agent: &mut Agent) -> HeapString {
        let description = self
            .description(agent)
            .map_or("", |d| d.as_str(agent))
            .to_owned();
        HeapString::from_string(agent, format!("Symbol({description})"))
    }
}
