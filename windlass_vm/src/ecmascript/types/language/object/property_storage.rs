// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered own-property storage.
//!
//! Entries keep insertion order; enumeration order is the language order:
//! array indexes ascending first, then string keys in insertion order, then
//! symbol keys in insertion order.

use crate::ecmascript::types::{Object, PropertyDescriptor, PropertyKey, Value};

/// A fully populated own property.
#[derive(Debug, Clone, Copy)]
pub struct Property {
    pub enumerable: bool,
    pub configurable: bool,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, Copy)]
pub enum PropertyValue {
    Data {
        value: Value,
        writable: bool,
    },
    Accessor {
        get: Option<Object>,
        set: Option<Object>,
    },
}

impl Property {
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            enumerable,
            configurable,
            value: PropertyValue::Data { value, writable },
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self.value, PropertyValue::Data { .. })
    }

    /// The fully populated descriptor view of this property.
    pub fn descriptor(&self) -> PropertyDescriptor {
        match self.value {
            PropertyValue::Data { value, writable } => PropertyDescriptor {
                value: Some(value),
                writable: Some(writable),
                get: None,
                set: None,
                enumerable: Some(self.enumerable),
                configurable: Some(self.configurable),
            },
            PropertyValue::Accessor { get, set } => PropertyDescriptor {
                value: None,
                writable: None,
                get: Some(get),
                set: Some(set),
                enumerable: Some(self.enumerable),
                configurable: Some(self.configurable),
            },
        }
    }

    /// Builds a property from a descriptor, filling absent fields with
    /// their defaults.
    pub fn from_descriptor(descriptor: PropertyDescriptor) -> Self {
        let descriptor = descriptor.complete();
        let value = if descriptor.get.is_some() || descriptor.set.is_some() {
            PropertyValue::Accessor {
                get: descriptor.get.flatten(),
                set: descriptor.set.flatten(),
            }
        } else {
            PropertyValue::Data {
                value: descriptor.value.unwrap_or(Value::Undefined),
                writable: descriptor.writable.unwrap_or(false),
            }
        };
        Self {
            enumerable: descriptor.enumerable.unwrap_or(false),
            configurable: descriptor.configurable.unwrap_or(false),
            value,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropertyStorage {
    entries: Vec<(PropertyKey, Property)>,
}

impl PropertyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: PropertyKey) -> Option<&Property> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, p)| p)
    }

    pub fn get_mut(&mut self, key: PropertyKey) -> Option<&mut Property> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, p)| p)
    }

    pub fn contains(&self, key: PropertyKey) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Inserts or replaces; replacement keeps the entry's position.
    pub fn set(&mut self, key: PropertyKey, property: Property) {
        if let Some(slot) = self.get_mut(key) {
            *slot = property;
        } else {
            self.entries.push((key, property));
        }
    }

    pub fn remove(&mut self, key: PropertyKey) -> bool {
        if let Some(position) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(position);
            true
        } else {
            false
        }
    }

    /// ### [10.1.11 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
    pub fn ordered_keys(&self) -> Vec<PropertyKey> {
        let mut indexes: Vec<u32> = Vec::new();
        let mut strings: Vec<PropertyKey> = Vec::new();
        let mut symbols: Vec<PropertyKey> = Vec::new();
        for (key, _) in &self.entries {
            match key {
                PropertyKey::Index(i) => indexes.push(*i),
                PropertyKey::String(_) => strings.push(*key),
                PropertyKey::Symbol(_) => symbols.push(*key),
            }
        }
        indexes.sort_unstable();
        let mut keys = Vec::with_capacity(self.entries.len());
        keys.extend(indexes.into_iter().map(PropertyKey::Index));
        keys.append(&mut strings);
        keys.append(&mut symbols);
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, &Property)> {
        self.entries.iter().map(|(k, p)| (*k, p))
    }

    /// Array indexes at or above the given length, used by array length
    /// truncation. Returned in descending order.
    pub fn indexes_from(&self, start: u32) -> Vec<u32> {
        let mut indexes: Vec<u32> = self
            .entries
            .iter()
            .filter_map(|(k, _)| k.as_index().filter(|i| *i >= start))
            .collect();
        indexes.sort_unstable_by(|a, b| b.cmp(a));
        indexes
    }
}
