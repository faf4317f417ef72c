// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [8.6 Runtime Semantics: BindingInitialization](https://tc39.es/ecma262/#sec-runtime-semantics-bindinginitialization)
//!
//! Binding and destructuring initialization. These run natively, spinning
//! nested fibers for default-value expressions and computed keys.

use oxc_ast::ast;

use super::evaluate_expression_native;
use super::expressions::{is_anonymous_function_definition, static_property_key};
use super::reference::{native_reference, RefTarget};
use crate::ecmascript::abstract_operations::operations_on_iterator_objects::{
    get_iterator, iterator_close, iterator_step_value, IteratorRecord,
};
use crate::ecmascript::abstract_operations::operations_on_objects::{
    copy_data_properties, create_array_from_list, get_v,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::require_object_coercible;
use crate::ecmascript::abstract_operations::type_conversion::to_property_key;
use crate::ecmascript::builtins::array::array_from_elements;
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::agent::resolve_binding;
use crate::ecmascript::execution::{Agent, EnvironmentIndex, ExceptionType, JsResult};
use crate::ecmascript::syntax_directed_operations::function_definitions::ContainsExpression;
use crate::ecmascript::types::{HeapString, PropertyKey, Value};

/// Static facts about a formal parameter list that declaration
/// instantiation branches on.
pub(crate) struct FormalsSummary {
    pub is_simple: bool,
    pub has_expressions: bool,
}

impl FormalsSummary {
    pub(crate) fn of(formals: &ast::FormalParameters<'_>) -> Self {
        let is_simple = formals.rest.is_none()
            && formals.items.iter().all(|item| {
                matches!(
                    item.pattern.kind,
                    ast::BindingPatternKind::BindingIdentifier(_)
                )
            });
        let has_expressions = formals.rest.as_ref().is_some_and(|rest| {
            rest.argument.contains_expression()
        }) || formals
            .items
            .iter()
            .any(|item| item.pattern.contains_expression());
        Self {
            is_simple,
            has_expressions,
        }
    }
}

/// ### [10.2.11 step 23: IteratorBindingInitialization of formals](https://tc39.es/ecma262/#sec-functiondeclarationinstantiation)
///
/// Binds the actual argument values against the formal parameters.
/// `environment` is `None` when duplicate parameter names forced
/// assignment-style initialization.
pub(crate) fn formal_parameters_binding_initialization(
    agent: &mut Agent,
    formals: &'static ast::FormalParameters<'static>,
    arguments: &[Value],
    environment: Option<EnvironmentIndex>,
) -> JsResult<()> {
    for (index, item) in formals.items.iter().enumerate() {
        let value = arguments.get(index).copied().unwrap_or(Value::Undefined);
        binding_initialization_for_pattern(agent, &item.pattern, value, environment)?;
    }
    if let Some(rest) = &formals.rest {
        let remaining: Vec<Value> = arguments
            .iter()
            .skip(formals.items.len())
            .copied()
            .collect();
        let rest_array = create_array_from_list(agent, &remaining);
        binding_initialization_for_pattern(
            agent,
            &rest.argument,
            Value::Object(rest_array),
            environment,
        )?;
    }
    Ok(())
}

/// Writes `value` into the binding named by a resolved identifier, either
/// by initializing the fresh binding or through PutValue when no target
/// environment was supplied.
fn initialize_bound_name(
    agent: &mut Agent,
    name: HeapString,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> JsResult<()> {
    match environment {
        // ### [8.6.2.1 InitializeBoundName ( name, value, environment )](https://tc39.es/ecma262/#sec-initializeboundname)
        Some(environment) => environment.initialize_binding(agent, name, value),
        None => {
            let reference = resolve_binding(agent, name, None)?;
            reference.put_value(agent, value)
        }
    }
}

/// BindingInitialization over a full binding pattern.
pub(crate) fn binding_initialization_for_pattern(
    agent: &mut Agent,
    pattern: &'static ast::BindingPattern<'static>,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> JsResult<()> {
    match &pattern.kind {
        ast::BindingPatternKind::BindingIdentifier(identifier) => {
            let name = HeapString::from_str(agent, identifier.name.as_str());
            initialize_bound_name(agent, name, value, environment)
        }
        ast::BindingPatternKind::AssignmentPattern(assignment) => {
            // A default initializer applies when the incoming value is
            // undefined.
            let value = if value.is_undefined() {
                evaluate_default(agent, &assignment.left, &assignment.right)?
            } else {
                value
            };
            binding_initialization_for_pattern(agent, &assignment.left, value, environment)
        }
        ast::BindingPatternKind::ObjectPattern(object_pattern) => {
            object_binding_initialization(agent, object_pattern, value, environment)
        }
        ast::BindingPatternKind::ArrayPattern(array_pattern) => {
            array_binding_initialization(agent, array_pattern, value, environment)
        }
    }
}

fn evaluate_default(
    agent: &mut Agent,
    left: &'static ast::BindingPattern<'static>,
    default: &'static ast::Expression<'static>,
) -> JsResult<Value> {
    let value = evaluate_expression_native(agent, default)?;
    // NamedEvaluation: `function (x = () => {}) {}` names the closure
    // after the parameter when the default is anonymous.
    if is_anonymous_function_definition(default) {
        if let (ast::BindingPatternKind::BindingIdentifier(identifier), Value::Object(closure)) =
            (&left.kind, value)
        {
            let name = PropertyKey::from_str(agent, identifier.name.as_str());
            let has_own_name = {
                let name_key = PropertyKey::from_str(agent, "name");
                agent[closure]
                    .properties
                    .get(name_key)
                    .is_some_and(|property| match property.value {
                        crate::ecmascript::types::PropertyValue::Data {
                            value: Value::String(s),
                            ..
                        } => !s.is_empty(agent),
                        _ => false,
                    })
            };
            if !has_own_name {
                crate::ecmascript::builtins::ecmascript_function::set_function_name(
                    agent, closure, name, None,
                );
            }
        }
    }
    Ok(value)
}

/// ### [14.3.3.1 ObjectBindingPattern BindingInitialization](https://tc39.es/ecma262/#sec-destructuring-binding-patterns-runtime-semantics-bindinginitialization)
fn object_binding_initialization(
    agent: &mut Agent,
    pattern: &'static ast::ObjectPattern<'static>,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> JsResult<()> {
    // 1. Perform ? RequireObjectCoercible(value).
    require_object_coercible(agent, value)?;
    let mut seen_keys: Vec<PropertyKey> = Vec::with_capacity(pattern.properties.len());
    for property in &pattern.properties {
        let key = if property.computed {
            let expression = property
                .key
                .as_expression()
                .expect("computed keys are expressions");
            let key_value = evaluate_expression_native(agent, expression)?;
            to_property_key(agent, key_value)?
        } else {
            static_property_key(agent, &property.key)
        };
        seen_keys.push(key);
        // KeyedBindingInitialization: v = ? GetV(value, P).
        let property_value = get_v(agent, value, key)?;
        binding_initialization_for_pattern(agent, &property.value, property_value, environment)?;
    }
    if let Some(rest) = &pattern.rest {
        // RestBindingInitialization: a fresh object with the unclaimed own
        // enumerable properties.
        let prototype = agent.current_realm().intrinsics.object_prototype();
        let rest_object = ordinary_object_create(agent, Some(prototype));
        copy_data_properties(agent, rest_object, value, &seen_keys)?;
        binding_initialization_for_pattern(
            agent,
            &rest.argument,
            Value::Object(rest_object),
            environment,
        )?;
    }
    Ok(())
}

/// ### [8.6.3 Runtime Semantics: IteratorBindingInitialization](https://tc39.es/ecma262/#sec-runtime-semantics-iteratorbindinginitialization)
fn array_binding_initialization(
    agent: &mut Agent,
    pattern: &'static ast::ArrayPattern<'static>,
    value: Value,
    environment: Option<EnvironmentIndex>,
) -> JsResult<()> {
    let mut iterator = get_iterator(agent, value, false)?;
    let result = array_binding_elements(agent, pattern, &mut iterator, environment);
    // IteratorClose unless the iterator already completed.
    if !iterator.done {
        return iterator_close(agent, &iterator, result);
    }
    result
}

fn array_binding_elements(
    agent: &mut Agent,
    pattern: &'static ast::ArrayPattern<'static>,
    iterator: &mut IteratorRecord,
    environment: Option<EnvironmentIndex>,
) -> JsResult<()> {
    for element in &pattern.elements {
        let value = iterator_step_value(agent, iterator)?.unwrap_or(Value::Undefined);
        if let Some(element) = element {
            binding_initialization_for_pattern(agent, element, value, environment)?;
        }
    }
    if let Some(rest) = &pattern.rest {
        let mut remaining = Vec::new();
        while let Some(value) = iterator_step_value(agent, iterator)? {
            remaining.push(Some(value));
        }
        let rest_array = array_from_elements(agent, &remaining)?;
        binding_initialization_for_pattern(
            agent,
            &rest.argument,
            Value::Object(rest_array),
            environment,
        )?;
    }
    Ok(())
}

/// ### [13.15.5 Runtime Semantics: DestructuringAssignmentEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-destructuringassignmentevaluation)
pub(crate) fn destructuring_assignment_evaluation(
    agent: &mut Agent,
    target: &'static ast::AssignmentTarget<'static>,
    value: Value,
) -> JsResult<()> {
    match target {
        ast::AssignmentTarget::ArrayAssignmentTarget(array_target) => {
            array_destructuring_assignment(agent, array_target, value)
        }
        ast::AssignmentTarget::ObjectAssignmentTarget(object_target) => {
            object_destructuring_assignment(agent, object_target, value)
        }
        _ => {
            let Some(simple) = target.as_simple_assignment_target() else {
                unreachable!()
            };
            assign_to_simple_target(agent, simple, value)
        }
    }
}

fn assign_to_simple_target(
    agent: &mut Agent,
    target: &'static ast::SimpleAssignmentTarget<'static>,
    value: Value,
) -> JsResult<()> {
    let Some(target) = RefTarget::from_simple_target(target) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::SyntaxError,
            "Invalid assignment target",
        ));
    };
    let reference = native_reference(agent, target)?;
    reference.put_value(agent, value)
}

fn assign_to_maybe_default(
    agent: &mut Agent,
    target: &'static ast::AssignmentTargetMaybeDefault<'static>,
    value: Value,
) -> JsResult<()> {
    match target {
        ast::AssignmentTargetMaybeDefault::AssignmentTargetWithDefault(with_default) => {
            let value = if value.is_undefined() {
                evaluate_expression_native(agent, &with_default.init)?
            } else {
                value
            };
            assign_to_target(agent, &with_default.binding, value)
        }
        _ => {
            let target = target
                .as_assignment_target()
                .expect("non-default entries are assignment targets");
            assign_to_target(agent, target, value)
        }
    }
}

fn assign_to_target(
    agent: &mut Agent,
    target: &'static ast::AssignmentTarget<'static>,
    value: Value,
) -> JsResult<()> {
    destructuring_assignment_evaluation(agent, target, value)
}

fn array_destructuring_assignment(
    agent: &mut Agent,
    target: &'static ast::ArrayAssignmentTarget<'static>,
    value: Value,
) -> JsResult<()> {
    let mut iterator = get_iterator(agent, value, false)?;
    let result = (|agent: &mut Agent| -> JsResult<()> {
        for element in &target.elements {
            let value = iterator_step_value(agent, &mut iterator)?.unwrap_or(Value::Undefined);
            if let Some(element) = element {
                assign_to_maybe_default(agent, element, value)?;
            }
        }
        if let Some(rest) = &target.rest {
            let mut remaining = Vec::new();
            while let Some(value) = iterator_step_value(agent, &mut iterator)? {
                remaining.push(value);
            }
            let rest_array = create_array_from_list(agent, &remaining);
            assign_to_target(agent, &rest.target, Value::Object(rest_array))?;
        }
        Ok(())
    })(agent);
    if !iterator.done {
        return iterator_close(agent, &iterator, result);
    }
    result
}

fn object_destructuring_assignment(
    agent: &mut Agent,
    target: &'static ast::ObjectAssignmentTarget<'static>,
    value: Value,
) -> JsResult<()> {
    require_object_coercible(agent, value)?;
    let mut seen_keys: Vec<PropertyKey> = Vec::with_capacity(target.properties.len());
    for property in &target.properties {
        match property {
            ast::AssignmentTargetProperty::AssignmentTargetPropertyIdentifier(identifier) => {
                let name = HeapString::from_str(agent, identifier.binding.name.as_str());
                let key = PropertyKey::from_heap_string(agent, name);
                seen_keys.push(key);
                let mut property_value = get_v(agent, value, key)?;
                if property_value.is_undefined() {
                    if let Some(init) = &identifier.init {
                        property_value = evaluate_expression_native(agent, init)?;
                    }
                }
                let reference = resolve_binding(agent, name, None)?;
                reference.put_value(agent, property_value)?;
            }
            ast::AssignmentTargetProperty::AssignmentTargetPropertyProperty(property) => {
                let key = if property.computed {
                    let expression = property
                        .name
                        .as_expression()
                        .expect("computed keys are expressions");
                    let key_value = evaluate_expression_native(agent, expression)?;
                    to_property_key(agent, key_value)?
                } else {
                    static_property_key(agent, &property.name)
                };
                seen_keys.push(key);
                let property_value = get_v(agent, value, key)?;
                assign_to_maybe_default(agent, &property.binding, property_value)?;
            }
        }
    }
    if let Some(rest) = &target.rest {
        let prototype = agent.current_realm().intrinsics.object_prototype();
        let rest_object = ordinary_object_create(agent, Some(prototype));
        copy_data_properties(agent, rest_object, value, &seen_keys)?;
        assign_to_target(agent, &rest.target, Value::Object(rest_object))?;
    }
    Ok(())
}
