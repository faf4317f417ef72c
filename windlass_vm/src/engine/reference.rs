// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stepwise evaluation of reference-producing forms (identifiers, member
//! accesses, super properties), shared by assignment, update, delete, and
//! call frames. Frames embed a [`RefEval`] and forward child values into
//! it until it yields a [`Reference`].

use oxc_ast::ast;

use super::fiber::Frame;
use crate::ecmascript::abstract_operations::type_conversion::to_property_key;
use crate::ecmascript::execution::agent::resolve_binding;
use crate::ecmascript::execution::{
    get_this_environment, Agent, EnvironmentIndex, ExceptionType, FunctionEnvironmentRecord,
    JsError,
};
use crate::ecmascript::types::{Base, HeapString, PropertyKey, Reference, Value};

/// The syntactic shapes that evaluate to references.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RefTarget {
    Identifier(&'static ast::IdentifierReference<'static>),
    Static(&'static ast::StaticMemberExpression<'static>),
    Computed(&'static ast::ComputedMemberExpression<'static>),
}

impl RefTarget {
    pub(crate) fn from_expression(
        expression: &'static ast::Expression<'static>,
    ) -> Option<Self> {
        let mut expression = expression;
        // Parenthesization is transparent to reference evaluation.
        while let ast::Expression::ParenthesizedExpression(inner) = expression {
            expression = &inner.expression;
        }
        match expression {
            ast::Expression::Identifier(identifier) => Some(RefTarget::Identifier(identifier)),
            ast::Expression::StaticMemberExpression(member) => Some(RefTarget::Static(member)),
            ast::Expression::ComputedMemberExpression(member) => Some(RefTarget::Computed(member)),
            _ => None,
        }
    }

    pub(crate) fn from_simple_target(
        target: &'static ast::SimpleAssignmentTarget<'static>,
    ) -> Option<Self> {
        match target {
            ast::SimpleAssignmentTarget::AssignmentTargetIdentifier(identifier) => {
                Some(RefTarget::Identifier(identifier))
            }
            ast::SimpleAssignmentTarget::StaticMemberExpression(member) => {
                Some(RefTarget::Static(member))
            }
            ast::SimpleAssignmentTarget::ComputedMemberExpression(member) => {
                Some(RefTarget::Computed(member))
            }
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RefEval {
    target: RefTarget,
    state: RefState,
}

#[derive(Debug)]
enum RefState {
    Start,
    AwaitObject,
    AwaitKey {
        object: Value,
        this_value: Option<Value>,
    },
}

pub(crate) enum RefProgress {
    /// Evaluate this child frame and feed its value back in.
    Push(Frame),
    /// The reference is fully resolved.
    Ready(Reference),
    Err(JsError),
}

impl RefEval {
    pub(crate) fn new(target: RefTarget) -> Self {
        Self {
            target,
            state: RefState::Start,
        }
    }

    /// Advances reference evaluation. `input` is the value of the child
    /// frame requested by the previous call, if any.
    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Value>) -> RefProgress {
        match &self.state {
            RefState::Start => self.begin(agent),
            RefState::AwaitObject => {
                let object = input.expect("reference evaluation expected an object value");
                self.receive_object(agent, object)
            }
            RefState::AwaitKey { object, this_value } => {
                let object = *object;
                let this_value = *this_value;
                let key = input.expect("reference evaluation expected a key value");
                match to_property_key(agent, key) {
                    Ok(key) => RefProgress::Ready(Reference {
                        base: Base::Value(object),
                        referenced_name: key,
                        strict: agent.in_strict_mode(),
                        this_value,
                    }),
                    Err(err) => RefProgress::Err(err),
                }
            }
        }
    }

    fn begin(&mut self, agent: &mut Agent) -> RefProgress {
        match self.target {
            // ### [13.1.3 Identifier Reference Evaluation](https://tc39.es/ecma262/#sec-identifiers-runtime-semantics-evaluation)
            RefTarget::Identifier(identifier) => {
                let name = HeapString::from_str(agent, identifier.name.as_str());
                match resolve_binding(agent, name, None) {
                    Ok(reference) => RefProgress::Ready(reference),
                    Err(err) => RefProgress::Err(err),
                }
            }
            RefTarget::Static(member) => {
                if matches!(member.object, ast::Expression::Super(_)) {
                    let key = PropertyKey::from_str(agent, member.property.name.as_str());
                    return self.super_reference(agent, Some(key));
                }
                self.state = RefState::AwaitObject;
                RefProgress::Push(Frame::expression(&member.object))
            }
            RefTarget::Computed(member) => {
                if matches!(member.object, ast::Expression::Super(_)) {
                    return self.super_reference(agent, None);
                }
                self.state = RefState::AwaitObject;
                RefProgress::Push(Frame::expression(&member.object))
            }
        }
    }

    fn receive_object(&mut self, agent: &mut Agent, object: Value) -> RefProgress {
        // ### [13.3.2.1 Property Accessor Evaluation](https://tc39.es/ecma262/#sec-property-accessors-runtime-semantics-evaluation)
        if object.is_nullish() {
            let what = if object.is_null() { "null" } else { "undefined" };
            let message = match self.target {
                RefTarget::Static(member) => format!(
                    "Cannot read properties of {what} (reading '{}')",
                    member.property.name.as_str()
                ),
                _ => format!("Cannot read properties of {what}"),
            };
            return RefProgress::Err(agent.throw_exception(ExceptionType::TypeError, message));
        }
        match self.target {
            RefTarget::Static(member) => {
                let key = PropertyKey::from_str(agent, member.property.name.as_str());
                RefProgress::Ready(Reference {
                    base: Base::Value(object),
                    referenced_name: key,
                    strict: agent.in_strict_mode(),
                    this_value: None,
                })
            }
            RefTarget::Computed(member) => {
                self.state = RefState::AwaitKey {
                    object,
                    this_value: None,
                };
                RefProgress::Push(Frame::expression(&member.expression))
            }
            RefTarget::Identifier(_) => unreachable!(),
        }
    }

    /// ### [13.3.7.3 MakeSuperPropertyReference ( actualThis, propertyKey, strict )](https://tc39.es/ecma262/#sec-makesuperpropertyreference)
    fn super_reference(&mut self, agent: &mut Agent, key: Option<PropertyKey>) -> RefProgress {
        // 1. Let env be GetThisEnvironment().
        let env = get_this_environment(agent);
        let EnvironmentIndex::Function(function_env) = env else {
            return RefProgress::Err(agent.throw_exception_with_static_message(
                ExceptionType::SyntaxError,
                "'super' keyword is only valid inside methods",
            ));
        };
        // 2. Let actualThis be ? env.GetThisBinding().
        let actual_this = match FunctionEnvironmentRecord::get_this_binding(agent, function_env) {
            Ok(this) => this,
            Err(err) => return RefProgress::Err(err),
        };
        // 3. Let baseValue be ? env.GetSuperBase().
        let base = match FunctionEnvironmentRecord::get_super_base(agent, function_env) {
            Ok(base) => base,
            Err(err) => return RefProgress::Err(err),
        };
        match key {
            Some(key) => RefProgress::Ready(Reference {
                base: Base::Value(base),
                referenced_name: key,
                strict: agent.in_strict_mode(),
                this_value: Some(actual_this),
            }),
            None => {
                let RefTarget::Computed(member) = self.target else {
                    unreachable!()
                };
                self.state = RefState::AwaitKey {
                    object: base,
                    this_value: Some(actual_this),
                };
                RefProgress::Push(Frame::expression(&member.expression))
            }
        }
    }
}

/// Resolves a simple assignment target to a reference without fiber
/// involvement, used by destructuring assignment where targets are
/// evaluated mid-protocol.
pub(crate) fn native_reference(
    agent: &mut Agent,
    target: RefTarget,
) -> crate::ecmascript::execution::JsResult<Reference> {
    let mut machine = RefEval::new(target);
    let mut input: Option<Value> = None;
    loop {
        match machine.step(agent, input.take()) {
            RefProgress::Ready(reference) => return Ok(reference),
            RefProgress::Err(err) => return Err(err),
            RefProgress::Push(frame) => {
                let Frame::Expression(expression) = frame else {
                    unreachable!("reference evaluation only pushes expression frames")
                };
                let value =
                    crate::engine::evaluate_expression_native(agent, expression.node)?;
                input = Some(value);
            }
        }
    }
}
