// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The agent heap: arena vectors for every heap-allocated language artefact,
//! addressed by `NonZeroU32` index handles.
//!
//! Nothing in the arena is freed before the agent itself is dropped. Cyclic
//! references between objects, environments and closures are therefore
//! harmless: the arena is torn down as a whole at agent teardown.

use ahash::AHashMap;

use crate::ecmascript::{
    builtins::control_abstraction_objects::async_function_objects::AwaitReactionData,
    execution::{Environments, Realm},
    scripts_and_modules::{module::ModuleRecord, script::ScriptRecord, source_code::SourceCodeHeapData},
    types::{BigIntHeapData, ObjectHeapData, StringHeapData, SymbolHeapData},
};

/// Creates a `NonZeroU32`-backed index handle for a heap vector.
///
/// Internally the handle stores the index plus one, so that the zero index
/// stays representable while `Option<Handle>` needs no extra space.
macro_rules! heap_index {
    ($(#[$doc: meta])* $name: ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(core::num::NonZeroU32);

        impl $name {
            pub(crate) const fn from_u32_index(value: u32) -> Self {
                // SAFETY: value + 1 cannot be zero short of u32 overflow,
                // which would require a four-billion-entry arena.
                Self(unsafe { core::num::NonZeroU32::new_unchecked(value + 1) })
            }

            pub(crate) const fn into_index(self) -> usize {
                self.0.get() as usize - 1
            }

            pub(crate) const fn into_u32_index(self) -> u32 {
                self.0.get() - 1
            }

            pub(crate) fn last<T>(vec: &[T]) -> Self {
                debug_assert!(!vec.is_empty());
                Self::from_u32_index(vec.len() as u32 - 1)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.into_u32_index())
            }
        }
    };
}

pub(crate) use heap_index;

heap_index!(
    /// A handle to an interned heap string.
    HeapString
);
heap_index!(
    /// A handle to a symbol's heap data.
    Symbol
);
heap_index!(
    /// A handle to an arbitrary-precision integer's heap data.
    HeapBigInt
);
heap_index!(
    /// A handle to an object's heap data.
    Object
);
heap_index!(
    /// A handle to a realm record.
    RealmIdentifier
);
heap_index!(
    /// A handle to a parsed source text and its backing allocation.
    SourceCode
);
heap_index!(
    /// A handle to a script record.
    ScriptIdentifier
);
heap_index!(
    /// A handle to a module record.
    ModuleIdentifier
);
heap_index!(
    /// A handle to a suspended async activation awaiting a promise.
    AwaitReaction
);

#[derive(Debug)]
pub struct Heap {
    pub(crate) objects: Vec<ObjectHeapData>,
    pub(crate) strings: Vec<StringHeapData>,
    /// Intern table: equal string content implies an equal [`HeapString`]
    /// handle, making string identity comparison an index comparison.
    pub(crate) string_lookup: AHashMap<Box<str>, HeapString>,
    pub(crate) symbols: Vec<SymbolHeapData>,
    pub(crate) bigints: Vec<BigIntHeapData>,
    pub(crate) environments: Environments,
    pub(crate) realms: Vec<Realm>,
    pub(crate) source_codes: Vec<SourceCodeHeapData>,
    pub(crate) scripts: Vec<ScriptRecord>,
    pub(crate) modules: Vec<ModuleRecord>,
    pub(crate) await_reactions: Vec<Option<AwaitReactionData>>,
}

impl Heap {
    pub(crate) fn new() -> Self {
        let mut heap = Self {
            objects: Vec::with_capacity(1024),
            strings: Vec::with_capacity(1024),
            string_lookup: AHashMap::with_capacity(1024),
            symbols: Vec::with_capacity(16),
            bigints: Vec::new(),
            environments: Environments::default(),
            realms: Vec::with_capacity(1),
            source_codes: Vec::new(),
            scripts: Vec::new(),
            modules: Vec::new(),
            await_reactions: Vec::new(),
        };
        heap.create_well_known_symbols();
        heap
    }

    /// Interns a string, returning the handle of the existing entry when the
    /// content has been seen before.
    pub(crate) fn alloc_string(&mut self, data: &str) -> HeapString {
        if let Some(existing) = self.string_lookup.get(data) {
            return *existing;
        }
        self.strings.push(StringHeapData::new(data));
        let handle = HeapString::last(&self.strings);
        self.string_lookup.insert(data.into(), handle);
        handle
    }

    /// Interns an owned string without copying when the content is new.
    pub(crate) fn alloc_string_owned(&mut self, data: std::string::String) -> HeapString {
        if let Some(existing) = self.string_lookup.get(data.as_str()) {
            return *existing;
        }
        let data: Box<str> = data.into_boxed_str();
        self.strings.push(StringHeapData::from_boxed(data.clone()));
        let handle = HeapString::last(&self.strings);
        self.string_lookup.insert(data, handle);
        handle
    }

    pub(crate) fn create_object(&mut self, data: ObjectHeapData) -> Object {
        self.objects.push(data);
        Object::last(&self.objects)
    }

    pub(crate) fn create_symbol(&mut self, data: SymbolHeapData) -> Symbol {
        self.symbols.push(data);
        Symbol::last(&self.symbols)
    }

    pub(crate) fn create_bigint(&mut self, data: BigIntHeapData) -> HeapBigInt {
        self.bigints.push(data);
        HeapBigInt::last(&self.bigints)
    }

    pub(crate) fn create_await_reaction(&mut self, data: AwaitReactionData) -> AwaitReaction {
        self.await_reactions.push(Some(data));
        AwaitReaction::from_u32_index(self.await_reactions.len() as u32 - 1)
    }

    /// The descriptionless symbols the language knows by name, created once
    /// per heap so every realm shares their identities.
    fn create_well_known_symbols(&mut self) {
        debug_assert!(self.symbols.is_empty());
        for name in WELL_KNOWN_SYMBOL_DESCRIPTIONS {
            let description = self.alloc_string(name);
            self.symbols.push(SymbolHeapData {
                description: Some(description),
            });
        }
    }
}

const WELL_KNOWN_SYMBOL_DESCRIPTIONS: [&str; 13] = [
    "Symbol.asyncIterator",
    "Symbol.hasInstance",
    "Symbol.isConcatSpreadable",
    "Symbol.iterator",
    "Symbol.match",
    "Symbol.matchAll",
    "Symbol.replace",
    "Symbol.search",
    "Symbol.species",
    "Symbol.split",
    "Symbol.toPrimitive",
    "Symbol.toStringTag",
    "Symbol.unscopables",
];

/// ### [6.1.5.1 Well-Known Symbols](https://tc39.es/ecma262/#sec-well-known-symbols)
///
/// Fixed indexes into the symbol arena; [`Heap::new`] creates the entries in
/// this order before anything else can allocate a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum WellKnownSymbolIndexes {
    AsyncIterator = 0,
    HasInstance,
    IsConcatSpreadable,
    Iterator,
    Match,
    MatchAll,
    Replace,
    Search,
    Species,
    Split,
    ToPrimitive,
    ToStringTag,
    Unscopables,
}

impl From<WellKnownSymbolIndexes> for Symbol {
    fn from(value: WellKnownSymbolIndexes) -> Self {
        Symbol::from_u32_index(value as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_interning_reuses_handles() {
        let mut heap = Heap::new();
        let a = heap.alloc_string("hello");
        let b = heap.alloc_string("hello");
        let c = heap.alloc_string("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn well_known_symbols_have_fixed_indexes() {
        let heap = Heap::new();
        assert_eq!(heap.symbols.len(), 13);
        let iterator: Symbol = WellKnownSymbolIndexes::Iterator.into();
        assert_eq!(iterator.into_index(), 3);
    }
}
