// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Windlass: an ECMAScript interpreter core.
//!
//! A host builds an [`Engine`], installs plugins, creates a realm, and
//! evaluates scripts against it. The evaluator is a stepwise fiber; the
//! host drains script evaluations and the promise job queue
//! cooperatively.

pub mod ecmascript;
pub mod engine;
pub mod heap;
pub mod plugins;

use ecmascript::execution::{
    create_realm, Agent, HostHooks, JsResult, RealmIdentifier,
};
use ecmascript::scripts_and_modules::script::{
    begin_script_evaluation, parse_script, script_evaluation, ScriptEvaluation,
};
use ecmascript::types::Value;
use plugins::{Plugin, DEFAULT_PLUGINS};

pub use ecmascript::execution::agent::{DefaultHostHooks, ExceptionType, Job, JsError};
pub use ecmascript::execution::Options;
pub use ecmascript::types::{Completion, HeapString, Object, PropertyKey, Value as JsValue};

/// The virtual machine: an agent plus the installed plugin set.
pub struct Engine {
    pub agent: Agent,
    plugins: Vec<&'static dyn Plugin>,
}

impl Engine {
    pub fn new(options: Options, host_hooks: &'static dyn HostHooks) -> Self {
        Self {
            agent: Agent::new(options, host_hooks),
            plugins: Vec::new(),
        }
    }

    /// Creates an engine with every default plugin installed.
    pub fn with_default_plugins(
        options: Options,
        host_hooks: &'static dyn HostHooks,
    ) -> Self {
        let mut engine = Self::new(options, host_hooks);
        for plugin in DEFAULT_PLUGINS {
            engine.install(*plugin).expect("default plugins form a DAG");
        }
        engine
    }

    /// Installs a plugin. Dependencies must already be installed; syntax
    /// registrations run immediately.
    pub fn install(&mut self, plugin: &'static dyn Plugin) -> Result<(), String> {
        if self.plugins.iter().any(|installed| installed.id() == plugin.id()) {
            return Err(format!("plugin {} is already installed", plugin.id()));
        }
        for dependency in plugin.dependencies() {
            if !self.plugins.iter().any(|installed| installed.id() == *dependency) {
                return Err(format!(
                    "plugin {} depends on {dependency}, which is not installed",
                    plugin.id()
                ));
            }
        }
        plugin.register_syntax(self.agent.syntax_table_mut());
        self.plugins.push(plugin);
        Ok(())
    }

    /// Creates a realm from the installed plugins and enters it.
    pub fn create_realm(&mut self) -> JsResult<RealmIdentifier> {
        let realm = create_realm(&mut self.agent, &self.plugins)?;
        self.agent.enter_realm(realm);
        Ok(realm)
    }

    /// Parses and begins evaluating a script, returning the drainable
    /// evaluation. Parse errors surface as a SyntaxError throw.
    pub fn evaluate_script(
        &mut self,
        source: &str,
        realm: RealmIdentifier,
        strict: bool,
    ) -> JsResult<ScriptEvaluation> {
        let script = match parse_script(&mut self.agent, source, realm, strict, None) {
            Ok(script) => script,
            Err(errors) => {
                let message = errors
                    .first()
                    .map(|error| error.to_string())
                    .unwrap_or_else(|| "Invalid or unexpected token".to_owned());
                return Err(self
                    .agent
                    .throw_exception(ExceptionType::SyntaxError, message));
            }
        };
        begin_script_evaluation(&mut self.agent, script)
    }

    /// Parses and fully evaluates a script.
    pub fn run_script(
        &mut self,
        source: &str,
        realm: RealmIdentifier,
        strict: bool,
    ) -> JsResult<Value> {
        let script = match parse_script(&mut self.agent, source, realm, strict, None) {
            Ok(script) => script,
            Err(errors) => {
                let message = errors
                    .first()
                    .map(|error| error.to_string())
                    .unwrap_or_else(|| "Invalid or unexpected token".to_owned());
                return Err(self
                    .agent
                    .throw_exception(ExceptionType::SyntaxError, message));
            }
        };
        script_evaluation(&mut self.agent, script)
    }

    /// Drains the promise job queue to empty. Jobs run FIFO; each runs to
    /// completion before the next. Returns the first job failure, after
    /// draining stops.
    pub fn run_jobs(&mut self) -> JsResult<()> {
        while let Some(job) = self.agent.host_hooks().pop_promise_job() {
            job.run(&mut self.agent)?;
        }
        Ok(())
    }

    /// Renders any value into a diagnostic string.
    pub fn debug_string(&self, value: Value) -> String {
        value.debug_string(&self.agent)
    }

    /// The captured `stack` string of an error object, when present.
    pub fn error_stack(&self, value: Value) -> Option<String> {
        let Value::Object(object) = value else {
            return None;
        };
        let key = self.agent.heap.string_lookup.get("stack").copied()?;
        let property = self.agent[object]
            .properties
            .get(ecmascript::types::PropertyKey::String(key))?;
        match property.value {
            ecmascript::types::PropertyValue::Data {
                value: Value::String(stack),
                ..
            } => Some(stack.as_str(&self.agent).to_owned()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_rejects_missing_dependencies() {
        let mut engine = Engine::new(Options::default(), &DefaultHostHooks);
        let error = engine
            .install(&plugins::FundamentalObjectsPlugin)
            .unwrap_err();
        assert!(error.contains("language"));
        engine.install(&plugins::LanguagePlugin).unwrap();
        engine.install(&plugins::FundamentalObjectsPlugin).unwrap();
    }
}
