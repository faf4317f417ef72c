// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Expression evaluation frames and the operator semantics they apply.

use oxc_ast::ast;
use oxc_syntax::operator::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};

use super::dispatch::{dispatch, EvalNode, SyntaxOperation, SyntaxRequest};
use super::fiber::{Frame, FrameStep};
use super::patterns::destructuring_assignment_evaluation;
use super::reference::{native_reference, RefEval, RefProgress, RefTarget};
use crate::ecmascript::abstract_operations::operations_on_iterator_objects::{
    create_iter_result_object, get_iterator, iterable_to_list, iterator_close, iterator_value,
    IteratorRecord,
};
use crate::ecmascript::abstract_operations::operations_on_objects::{
    call, call_function, construct, copy_data_properties, create_array_from_list,
    create_data_property_or_throw, get_method, get_v, has_property, instanceof_operator,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::{
    is_less_than, is_loosely_equal, is_strictly_equal,
};
use crate::ecmascript::abstract_operations::type_conversion::{
    to_number, to_numeric, to_object, to_primitive, to_property_key, to_string,
};
use crate::ecmascript::builtins::array::array_from_elements;
use crate::ecmascript::builtins::control_abstraction_objects::generator_objects::in_async_generator;
use crate::ecmascript::builtins::ecmascript_function::{
    function_data, function_declaration_instantiation, make_method, ordinary_call_bind_this,
    prepare_for_ordinary_call, set_function_name,
};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{
    get_this_environment, get_this_function_environment, Agent, ExceptionType,
    FunctionEnvironmentRecord, JsResult,
};
use crate::ecmascript::syntax_directed_operations::class_definitions::class_definition_evaluation;
use crate::ecmascript::syntax_directed_operations::function_definitions::{
    instantiate_arrow_function_expression, instantiate_function_expression,
};
use crate::ecmascript::types::{
    bigint_binary_op, Completion, HeapBigInt, HeapString, Object, ObjectKind, Property,
    PropertyKey, PropertyValue, Reference, Value,
};

pub(crate) fn value_of(input: Option<Completion>) -> Value {
    match input {
        Some(Completion::Normal(value)) => value.unwrap_or(Value::Undefined),
        _ => unreachable!("expression frames receive normal completions"),
    }
}

fn throw_step(err: crate::ecmascript::execution::JsError) -> FrameStep {
    FrameStep::Done(Completion::Throw(err))
}

fn done(value: Value) -> FrameStep {
    FrameStep::Done(Completion::normal(value))
}

fn result_step(result: JsResult<Value>) -> FrameStep {
    match result {
        Ok(value) => done(value),
        Err(err) => throw_step(err),
    }
}

/// The generic expression dispatcher frame: consults the syntax table and
/// either completes immediately (leaf forms) or is replaced by a
/// specialized frame. Carries the NamedEvaluation name when the context
/// supplies one.
#[derive(Debug)]
pub struct ExpressionFrame {
    pub(crate) node: &'static ast::Expression<'static>,
    pub(crate) name: Option<PropertyKey>,
}

impl ExpressionFrame {
    pub(crate) fn step(&mut self, agent: &mut Agent) -> FrameStep {
        match self.name {
            None => dispatch(
                agent,
                SyntaxOperation::Evaluate,
                SyntaxRequest::Evaluate {
                    node: EvalNode::Expression(self.node),
                },
            ),
            Some(name) => dispatch(
                agent,
                SyntaxOperation::NamedEvaluation,
                SyntaxRequest::NamedEvaluation {
                    node: EvalNode::Expression(self.node),
                    name,
                },
            ),
        }
    }
}

/// ### [13 ECMAScript Language: Expressions](https://tc39.es/ecma262/#sec-ecmascript-language-expressions)
///
/// The base-language `Evaluate` behaviour for expressions: the leaf forms
/// complete immediately, the composite forms replace themselves with their
/// dedicated frame.
pub(crate) fn begin_expression(
    agent: &mut Agent,
    node: &'static ast::Expression<'static>,
) -> FrameStep {
    begin_expression_named(agent, node, None)
}

pub(crate) fn begin_expression_named(
    agent: &mut Agent,
    node: &'static ast::Expression<'static>,
    name: Option<PropertyKey>,
) -> FrameStep {
    use ast::Expression;
    match node {
        Expression::BooleanLiteral(literal) => done(Value::Boolean(literal.value)),
        Expression::NullLiteral(_) => done(Value::Null),
        Expression::NumericLiteral(literal) => done(Value::Number(literal.value)),
        Expression::StringLiteral(literal) => {
            done(Value::from_str(agent, literal.value.as_str()))
        }
        Expression::BigIntLiteral(literal) => {
            let digits = literal.raw.as_ref().map_or_else(
                || literal.value.as_str().to_owned(),
                |raw| raw.as_str().trim_end_matches('n').to_owned(),
            );
            match crate::ecmascript::types::string_to_big_int(agent, &digits) {
                Some(data) => done(Value::BigInt(HeapBigInt::from_bigint(agent, data))),
                None => throw_step(agent.throw_exception_with_static_message(
                    ExceptionType::SyntaxError,
                    "Invalid BigInt literal",
                )),
            }
        }
        Expression::RegExpLiteral(literal) => {
            // The literal's raw text carries both pattern and flags:
            // "/pattern/flags".
            let raw = literal.raw.as_ref().map_or("//", |atom| atom.as_str());
            let (pattern, flags) = raw
                .strip_prefix('/')
                .and_then(|rest| rest.rsplit_once('/'))
                .unwrap_or(("", ""));
            result_step(
                crate::ecmascript::builtins::regexp::reg_exp_create(agent, pattern, flags)
                    .map(Value::Object),
            )
        }
        Expression::Identifier(identifier) => {
            let name = HeapString::from_str(agent, identifier.name.as_str());
            let reference = match crate::ecmascript::execution::agent::resolve_binding(
                agent, name, None,
            ) {
                Ok(reference) => reference,
                Err(err) => return throw_step(err),
            };
            result_step(reference.get_value(agent))
        }
        Expression::ThisExpression(_) => {
            // ### [13.2.1.1 This Expression Evaluation](https://tc39.es/ecma262/#sec-this-keyword-runtime-semantics-evaluation)
            let env = get_this_environment(agent);
            result_step(env.get_this_binding(agent))
        }
        Expression::MetaProperty(meta) => {
            if meta.meta.name == "new" {
                // new.target
                let new_target = get_this_function_environment(agent).and_then(|env| {
                    agent.heap.environments.get_function(env).get_new_target()
                });
                done(match new_target {
                    Some(object) => Value::Object(object),
                    None => Value::Undefined,
                })
            } else {
                done(Value::Undefined)
            }
        }
        Expression::Super(_) => throw_step(agent.throw_exception_with_static_message(
            ExceptionType::SyntaxError,
            "'super' keyword unexpected here",
        )),
        Expression::FunctionExpression(function) => {
            let closure = instantiate_function_expression(agent, function, name);
            done(Value::Object(closure))
        }
        Expression::ArrowFunctionExpression(function) => {
            let closure = instantiate_arrow_function_expression(agent, function, name);
            done(Value::Object(closure))
        }
        Expression::ClassExpression(class) => {
            result_step(class_definition_evaluation(agent, class, name).map(Value::Object))
        }
        Expression::ParenthesizedExpression(inner) => {
            begin_expression_named(agent, &inner.expression, name)
        }
        Expression::TemplateLiteral(template) => {
            if template.expressions.is_empty() {
                let cooked = template
                    .quasis
                    .first()
                    .and_then(|quasi| quasi.value.cooked.as_ref())
                    .map_or("", |atom| atom.as_str());
                done(Value::from_str(agent, cooked))
            } else {
                FrameStep::Replace(Frame::Template(TemplateFrame::new(template)))
            }
        }
        Expression::TaggedTemplateExpression(tagged) => {
            FrameStep::Replace(Frame::TaggedTemplate(TaggedTemplateFrame::new(tagged)))
        }
        Expression::StaticMemberExpression(_) | Expression::ComputedMemberExpression(_) => {
            let target = RefTarget::from_expression(node).unwrap();
            FrameStep::Replace(Frame::Member(MemberFrame {
                reference: RefEval::new(target),
            }))
        }
        Expression::PrivateFieldExpression(_) | Expression::PrivateInExpression(_) => {
            throw_step(agent.throw_exception_with_static_message(
                ExceptionType::SyntaxError,
                "Private class members are not supported",
            ))
        }
        Expression::CallExpression(expression) => {
            FrameStep::Replace(Frame::Call(CallFrame::new(expression)))
        }
        Expression::NewExpression(expression) => {
            FrameStep::Replace(Frame::New(NewFrame::new(expression)))
        }
        Expression::UpdateExpression(expression) => {
            FrameStep::Replace(Frame::Update(UpdateFrame::new(expression)))
        }
        Expression::UnaryExpression(expression) => begin_unary(agent, expression),
        Expression::BinaryExpression(expression) => {
            FrameStep::Replace(Frame::Binary(BinaryFrame::new(expression)))
        }
        Expression::LogicalExpression(expression) => {
            FrameStep::Replace(Frame::Logical(LogicalFrame::new(expression)))
        }
        Expression::ConditionalExpression(expression) => {
            FrameStep::Replace(Frame::Conditional(ConditionalFrame::new(expression)))
        }
        Expression::AssignmentExpression(expression) => {
            FrameStep::Replace(Frame::Assignment(AssignmentFrame::new(expression)))
        }
        Expression::SequenceExpression(expression) => {
            FrameStep::Replace(Frame::Sequence(SequenceFrame::new(expression)))
        }
        Expression::ArrayExpression(expression) => {
            FrameStep::Replace(Frame::ArrayLiteral(ArrayLiteralFrame::new(expression)))
        }
        Expression::ObjectExpression(expression) => {
            FrameStep::Replace(Frame::ObjectLiteral(ObjectLiteralFrame::new(expression)))
        }
        Expression::YieldExpression(expression) => {
            if expression.delegate {
                FrameStep::Replace(Frame::YieldDelegate(YieldDelegateFrame::new(expression)))
            } else {
                FrameStep::Replace(Frame::Yield(YieldFrame::new(expression)))
            }
        }
        Expression::AwaitExpression(expression) => {
            FrameStep::Replace(Frame::Await(AwaitFrame::new(expression)))
        }
        Expression::ChainExpression(chain) => result_step(evaluate_chain(agent, chain)),
        Expression::ImportExpression(_) => throw_step(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Dynamic import is not supported",
        )),
        _ => throw_step(agent.throw_exception_with_static_message(
            ExceptionType::SyntaxError,
            "Unsupported expression form",
        )),
    }
}

/// An rvalue member access: resolve the reference, then GetValue.
#[derive(Debug)]
pub struct MemberFrame {
    pub(crate) reference: RefEval,
}

impl MemberFrame {
    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let input = input.map(|completion| value_of(Some(completion)));
        match self.reference.step(agent, input) {
            RefProgress::Push(frame) => FrameStep::Push(frame),
            RefProgress::Err(err) => throw_step(err),
            RefProgress::Ready(reference) => result_step(reference.get_value(agent)),
        }
    }
}

/// ### [13.15 Assignment Operators](https://tc39.es/ecma262/#sec-assignment-operators)
#[derive(Debug)]
pub struct AssignmentFrame {
    node: &'static ast::AssignmentExpression<'static>,
    state: AssignmentState,
}

#[derive(Debug)]
enum AssignmentState {
    Start,
    Reference(RefEval),
    AwaitRhs {
        reference: Reference,
        old_value: Option<Value>,
    },
    AwaitPatternRhs,
}

impl AssignmentFrame {
    fn new(node: &'static ast::AssignmentExpression<'static>) -> Self {
        Self {
            node,
            state: AssignmentState::Start,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match &mut self.state {
            AssignmentState::Start => {
                match &self.node.left {
                    ast::AssignmentTarget::ArrayAssignmentTarget(_)
                    | ast::AssignmentTarget::ObjectAssignmentTarget(_) => {
                        // Destructuring: evaluate the right side first.
                        self.state = AssignmentState::AwaitPatternRhs;
                        FrameStep::Push(Frame::expression(&self.node.right))
                    }
                    target => {
                        let Some(simple) = target.as_simple_assignment_target() else {
                            return throw_step(agent.throw_exception_with_static_message(
                                ExceptionType::SyntaxError,
                                "Invalid assignment target",
                            ));
                        };
                        let Some(target) = RefTarget::from_simple_target(simple) else {
                            return throw_step(agent.throw_exception_with_static_message(
                                ExceptionType::SyntaxError,
                                "Invalid assignment target",
                            ));
                        };
                        self.state = AssignmentState::Reference(RefEval::new(target));
                        self.step(agent, None)
                    }
                }
            }
            AssignmentState::Reference(reference) => {
                let input = input.map(|completion| value_of(Some(completion)));
                match reference.step(agent, input) {
                    RefProgress::Push(frame) => FrameStep::Push(frame),
                    RefProgress::Err(err) => throw_step(err),
                    RefProgress::Ready(reference) => {
                        match self.node.operator {
                            // 13.15.2: a = b evaluates the right side with
                            // NamedEvaluation against an identifier target.
                            AssignmentOperator::Assign => {
                                self.state = AssignmentState::AwaitRhs {
                                    reference,
                                    old_value: None,
                                };
                                let name = assignment_name(agent, self.node);
                                FrameStep::Push(named_expression_frame(
                                    &self.node.right,
                                    name,
                                ))
                            }
                            AssignmentOperator::LogicalAnd
                            | AssignmentOperator::LogicalOr
                            | AssignmentOperator::LogicalNullish => {
                                let old_value = match reference.get_value(agent) {
                                    Ok(value) => value,
                                    Err(err) => return throw_step(err),
                                };
                                let short_circuit = match self.node.operator {
                                    AssignmentOperator::LogicalAnd => {
                                        !old_value.to_boolean(agent)
                                    }
                                    AssignmentOperator::LogicalOr => old_value.to_boolean(agent),
                                    AssignmentOperator::LogicalNullish => {
                                        !old_value.is_nullish()
                                    }
                                    _ => unreachable!(),
                                };
                                if short_circuit {
                                    return done(old_value);
                                }
                                self.state = AssignmentState::AwaitRhs {
                                    reference,
                                    old_value: None,
                                };
                                let name = assignment_name(agent, self.node);
                                FrameStep::Push(named_expression_frame(
                                    &self.node.right,
                                    name,
                                ))
                            }
                            _ => {
                                // Compound assignment reads the old value
                                // before evaluating the right side.
                                let old_value = match reference.get_value(agent) {
                                    Ok(value) => value,
                                    Err(err) => return throw_step(err),
                                };
                                self.state = AssignmentState::AwaitRhs {
                                    reference,
                                    old_value: Some(old_value),
                                };
                                FrameStep::Push(Frame::expression(&self.node.right))
                            }
                        }
                    }
                }
            }
            AssignmentState::AwaitRhs {
                reference,
                old_value,
            } => {
                let rhs = value_of(input);
                let result = match old_value {
                    None => rhs,
                    Some(old_value) => {
                        let operator = compound_operator(self.node.operator);
                        match apply_binary_operator(agent, operator, *old_value, rhs) {
                            Ok(value) => value,
                            Err(err) => return throw_step(err),
                        }
                    }
                };
                if let Err(err) = reference.put_value(agent, result) {
                    return throw_step(err);
                }
                done(result)
            }
            AssignmentState::AwaitPatternRhs => {
                let value = value_of(input);
                match destructuring_assignment_evaluation(agent, &self.node.left, value) {
                    Ok(()) => done(value),
                    Err(err) => throw_step(err),
                }
            }
        }
    }
}

fn assignment_name(
    agent: &mut Agent,
    node: &'static ast::AssignmentExpression<'static>,
) -> Option<PropertyKey> {
    if !is_anonymous_function_definition(&node.right) {
        return None;
    }
    match &node.left {
        ast::AssignmentTarget::AssignmentTargetIdentifier(identifier) => {
            Some(PropertyKey::from_str(agent, identifier.name.as_str()))
        }
        _ => None,
    }
}

pub(crate) fn is_anonymous_function_definition(expression: &ast::Expression<'_>) -> bool {
    match expression {
        ast::Expression::FunctionExpression(function) => function.id.is_none(),
        ast::Expression::ArrowFunctionExpression(_) => true,
        ast::Expression::ClassExpression(class) => class.id.is_none(),
        ast::Expression::ParenthesizedExpression(inner) => {
            is_anonymous_function_definition(&inner.expression)
        }
        _ => false,
    }
}

/// Builds an expression frame that will carry a NamedEvaluation name.
pub(crate) fn named_expression_frame(
    node: &'static ast::Expression<'static>,
    name: Option<PropertyKey>,
) -> Frame {
    Frame::Expression(ExpressionFrame { node, name })
}

/// ### [13.4 Update Expressions](https://tc39.es/ecma262/#sec-update-expressions)
#[derive(Debug)]
pub struct UpdateFrame {
    node: &'static ast::UpdateExpression<'static>,
    reference: RefEval,
}

impl UpdateFrame {
    fn new(node: &'static ast::UpdateExpression<'static>) -> Self {
        let target = RefTarget::from_simple_target(&node.argument)
            .expect("update expression targets are simple references");
        Self {
            node,
            reference: RefEval::new(target),
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let input = input.map(|completion| value_of(Some(completion)));
        match self.reference.step(agent, input) {
            RefProgress::Push(frame) => FrameStep::Push(frame),
            RefProgress::Err(err) => throw_step(err),
            RefProgress::Ready(reference) => {
                let result = (|| -> JsResult<Value> {
                    // 2. Let oldValue be ? ToNumeric(? GetValue(expr)).
                    let old_value = reference.get_value(agent)?;
                    let old_value = to_numeric(agent, old_value)?;
                    // 3./4. Compute newValue of the same numeric type.
                    let new_value = match old_value {
                        Value::Number(n) => match self.node.operator {
                            UpdateOperator::Increment => Value::Number(n + 1.0),
                            UpdateOperator::Decrement => Value::Number(n - 1.0),
                        },
                        Value::BigInt(b) => {
                            let one = HeapBigInt::from_i64(agent, 1);
                            let operator = match self.node.operator {
                                UpdateOperator::Increment => "+",
                                UpdateOperator::Decrement => "-",
                            };
                            bigint_binary_op(agent, operator, b, one)?
                        }
                        _ => unreachable!(),
                    };
                    // 5. Perform ? PutValue(expr, newValue).
                    reference.put_value(agent, new_value)?;
                    // 6. Prefix forms return newValue, postfix the old one.
                    Ok(if self.node.prefix { new_value } else { old_value })
                })();
                result_step(result)
            }
        }
    }
}

fn begin_unary(
    agent: &mut Agent,
    node: &'static ast::UnaryExpression<'static>,
) -> FrameStep {
    match node.operator {
        // ### [13.5.1 The delete Operator](https://tc39.es/ecma262/#sec-delete-operator)
        UnaryOperator::Delete => {
            match RefTarget::from_expression(&node.argument) {
                // Non-reference operands evaluate for effect, then true.
                None => FrameStep::Replace(Frame::Unary(UnaryFrame {
                    node,
                    reference: None,
                })),
                Some(target) => FrameStep::Replace(Frame::Unary(UnaryFrame {
                    node,
                    reference: Some(RefEval::new(target)),
                })),
            }
        }
        // ### [13.5.3 The typeof Operator](https://tc39.es/ecma262/#sec-typeof-operator)
        UnaryOperator::Typeof => {
            if let ast::Expression::Identifier(identifier) = &node.argument {
                // typeof of an unresolvable name is "undefined", not a
                // ReferenceError.
                let name = HeapString::from_str(agent, identifier.name.as_str());
                let reference = match crate::ecmascript::execution::agent::resolve_binding(
                    agent, name, None,
                ) {
                    Ok(reference) => reference,
                    Err(err) => return throw_step(err),
                };
                if reference.is_unresolvable() {
                    return done(Value::from_str(agent, "undefined"));
                }
                let value = match reference.get_value(agent) {
                    Ok(value) => value,
                    Err(err) => return throw_step(err),
                };
                let type_string = value.type_of(agent);
                return done(Value::from_str(agent, type_string));
            }
            FrameStep::Replace(Frame::Unary(UnaryFrame {
                node,
                reference: None,
            }))
        }
        _ => FrameStep::Replace(Frame::Unary(UnaryFrame {
            node,
            reference: None,
        })),
    }
}

/// ### [13.5 Unary Operators](https://tc39.es/ecma262/#sec-unary-operators)
#[derive(Debug)]
pub struct UnaryFrame {
    node: &'static ast::UnaryExpression<'static>,
    /// Only populated for `delete` of a reference form.
    reference: Option<RefEval>,
}

impl UnaryFrame {
    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        if let Some(reference) = &mut self.reference {
            let input = input.map(|completion| value_of(Some(completion)));
            return match reference.step(agent, input) {
                RefProgress::Push(frame) => FrameStep::Push(frame),
                RefProgress::Err(err) => throw_step(err),
                RefProgress::Ready(reference) => result_step(delete_reference(agent, reference)),
            };
        }
        let Some(input) = input else {
            return FrameStep::Push(Frame::expression(&self.node.argument));
        };
        let value = value_of(Some(input));
        let result = (|| -> JsResult<Value> {
            match self.node.operator {
                UnaryOperator::UnaryPlus => Ok(Value::Number(to_number(agent, value)?)),
                UnaryOperator::UnaryNegation => match to_numeric(agent, value)? {
                    Value::Number(n) => Ok(Value::Number(-n)),
                    Value::BigInt(b) => {
                        let negated = -b.data(agent).clone();
                        Ok(Value::BigInt(HeapBigInt::from_bigint(agent, negated)))
                    }
                    _ => unreachable!(),
                },
                UnaryOperator::LogicalNot => Ok(Value::Boolean(!value.to_boolean(agent))),
                UnaryOperator::BitwiseNot => match to_numeric(agent, value)? {
                    Value::Number(n) => {
                        let int = crate::ecmascript::abstract_operations::type_conversion::f64_to_int32(n);
                        Ok(Value::Number(!int as f64))
                    }
                    Value::BigInt(b) => {
                        let inverted = !b.data(agent).clone();
                        Ok(Value::BigInt(HeapBigInt::from_bigint(agent, inverted)))
                    }
                    _ => unreachable!(),
                },
                UnaryOperator::Typeof => {
                    let type_string = value.type_of(agent);
                    Ok(Value::from_str(agent, type_string))
                }
                UnaryOperator::Void => Ok(Value::Undefined),
                UnaryOperator::Delete => Ok(Value::Boolean(true)),
            }
        })();
        result_step(result)
    }
}

fn delete_reference(agent: &mut Agent, reference: Reference) -> JsResult<Value> {
    match reference.base {
        crate::ecmascript::types::Base::Unresolvable => Ok(Value::Boolean(true)),
        crate::ecmascript::types::Base::Value(base) => {
            // 5.c. Let deleteStatus be ? baseObj.[[Delete]](...).
            let base_obj = to_object(agent, base)?;
            let status = base_obj.internal_delete(agent, reference.referenced_name)?;
            if !status && reference.strict {
                let name = reference.referenced_name.debug_string(agent);
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    format!("Cannot delete property '{name}'"),
                ));
            }
            Ok(Value::Boolean(status))
        }
        crate::ecmascript::types::Base::Environment(env) => {
            let PropertyKey::String(name) = reference.referenced_name else {
                unreachable!()
            };
            Ok(Value::Boolean(env.delete_binding(agent, name)?))
        }
    }
}

/// ### [13.6-13.13 Binary Operators](https://tc39.es/ecma262/#sec-exp-operator)
#[derive(Debug)]
pub struct BinaryFrame {
    node: &'static ast::BinaryExpression<'static>,
    left_value: Option<Value>,
}

impl BinaryFrame {
    fn new(node: &'static ast::BinaryExpression<'static>) -> Self {
        Self {
            node,
            left_value: None,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match (input, self.left_value) {
            (None, _) => FrameStep::Push(Frame::expression(&self.node.left)),
            (Some(input), None) => {
                self.left_value = Some(value_of(Some(input)));
                FrameStep::Push(Frame::expression(&self.node.right))
            }
            (Some(input), Some(left)) => {
                let right = value_of(Some(input));
                result_step(apply_binary_operator(agent, self.node.operator, left, right))
            }
        }
    }
}

/// ### [13.15.3 ApplyStringOrNumericBinaryOperator ( lval, opText, rval )](https://tc39.es/ecma262/#sec-applystringornumericbinaryoperator)
/// together with the relational and equality operators.
pub(crate) fn apply_binary_operator(
    agent: &mut Agent,
    operator: BinaryOperator,
    lval: Value,
    rval: Value,
) -> JsResult<Value> {
    match operator {
        BinaryOperator::Addition => {
            // 1.a. Let lprim be ? ToPrimitive(lval); rprim likewise.
            let lprim = to_primitive(agent, lval, None)?;
            let rprim = to_primitive(agent, rval, None)?;
            // 1.b. If lprim is a String or rprim is a String, concatenate.
            if lprim.is_string() || rprim.is_string() {
                let lstr = to_string(agent, lprim)?;
                let rstr = to_string(agent, rprim)?;
                return Ok(Value::String(HeapString::concat(agent, &[lstr, rstr])));
            }
            numeric_binary_operation(agent, "+", lprim, rprim)
        }
        BinaryOperator::Subtraction => numeric_binary_operation(agent, "-", lval, rval),
        BinaryOperator::Multiplication => numeric_binary_operation(agent, "*", lval, rval),
        BinaryOperator::Division => numeric_binary_operation(agent, "/", lval, rval),
        BinaryOperator::Remainder => numeric_binary_operation(agent, "%", lval, rval),
        BinaryOperator::Exponential => numeric_binary_operation(agent, "**", lval, rval),
        BinaryOperator::BitwiseOR => numeric_binary_operation(agent, "|", lval, rval),
        BinaryOperator::BitwiseXOR => numeric_binary_operation(agent, "^", lval, rval),
        BinaryOperator::BitwiseAnd => numeric_binary_operation(agent, "&", lval, rval),
        BinaryOperator::ShiftLeft => numeric_binary_operation(agent, "<<", lval, rval),
        BinaryOperator::ShiftRight => numeric_binary_operation(agent, ">>", lval, rval),
        BinaryOperator::ShiftRightZeroFill => {
            numeric_binary_operation(agent, ">>>", lval, rval)
        }
        // ### [13.10 Relational Operators](https://tc39.es/ecma262/#sec-relational-operators)
        BinaryOperator::LessThan => {
            let result = is_less_than::<true>(agent, lval, rval)?;
            Ok(Value::Boolean(result == Some(true)))
        }
        BinaryOperator::GreaterThan => {
            let result = is_less_than::<false>(agent, rval, lval)?;
            Ok(Value::Boolean(result == Some(true)))
        }
        BinaryOperator::LessEqualThan => {
            let result = is_less_than::<false>(agent, rval, lval)?;
            Ok(Value::Boolean(result == Some(false)))
        }
        BinaryOperator::GreaterEqualThan => {
            let result = is_less_than::<true>(agent, lval, rval)?;
            Ok(Value::Boolean(result == Some(false)))
        }
        // ### [13.11 Equality Operators](https://tc39.es/ecma262/#sec-equality-operators)
        BinaryOperator::Equality => Ok(Value::Boolean(is_loosely_equal(agent, lval, rval)?)),
        BinaryOperator::Inequality => {
            Ok(Value::Boolean(!is_loosely_equal(agent, lval, rval)?))
        }
        BinaryOperator::StrictEquality => {
            Ok(Value::Boolean(is_strictly_equal(agent, lval, rval)))
        }
        BinaryOperator::StrictInequality => {
            Ok(Value::Boolean(!is_strictly_equal(agent, lval, rval)))
        }
        BinaryOperator::Instanceof => {
            Ok(Value::Boolean(instanceof_operator(agent, lval, rval)?))
        }
        BinaryOperator::In => {
            // ### [13.10.1 The in Operator](https://tc39.es/ecma262/#sec-relational-operators-runtime-semantics-evaluation)
            let Value::Object(object) = rval else {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Cannot use 'in' operator on a non-object",
                ));
            };
            let key = to_property_key(agent, lval)?;
            Ok(Value::Boolean(has_property(agent, object, key)?))
        }
    }
}

/// Reduces both operands with ToNumeric and applies the operator within
/// the shared numeric type; mixing BigInt and Number throws.
fn numeric_binary_operation(
    agent: &mut Agent,
    operator: &str,
    lval: Value,
    rval: Value,
) -> JsResult<Value> {
    let lnum = to_numeric(agent, lval)?;
    let rnum = to_numeric(agent, rval)?;
    match (lnum, rnum) {
        (Value::Number(l), Value::Number(r)) => Ok(apply_number_operator(operator, l, r)),
        (Value::BigInt(l), Value::BigInt(r)) => bigint_binary_op(agent, operator, l, r),
        _ => Err(
            crate::ecmascript::abstract_operations::testing_and_comparison::throw_mixed_numeric_types(
                agent,
            ),
        ),
    }
}

fn apply_number_operator(operator: &str, l: f64, r: f64) -> Value {
    use crate::ecmascript::abstract_operations::type_conversion::{f64_to_int32, f64_to_uint32};
    let result = match operator {
        "+" => l + r,
        "-" => l - r,
        "*" => l * r,
        "/" => l / r,
        "%" => l % r,
        "**" => l.powf(r),
        "|" => (f64_to_int32(l) | f64_to_int32(r)) as f64,
        "^" => (f64_to_int32(l) ^ f64_to_int32(r)) as f64,
        "&" => (f64_to_int32(l) & f64_to_int32(r)) as f64,
        "<<" => (f64_to_int32(l) << (f64_to_uint32(r) & 31)) as f64,
        ">>" => (f64_to_int32(l) >> (f64_to_uint32(r) & 31)) as f64,
        ">>>" => (f64_to_uint32(l) >> (f64_to_uint32(r) & 31)) as f64,
        _ => unreachable!(),
    };
    Value::Number(result)
}

fn compound_operator(operator: AssignmentOperator) -> BinaryOperator {
    match operator {
        AssignmentOperator::Addition => BinaryOperator::Addition,
        AssignmentOperator::Subtraction => BinaryOperator::Subtraction,
        AssignmentOperator::Multiplication => BinaryOperator::Multiplication,
        AssignmentOperator::Division => BinaryOperator::Division,
        AssignmentOperator::Remainder => BinaryOperator::Remainder,
        AssignmentOperator::Exponential => BinaryOperator::Exponential,
        AssignmentOperator::ShiftLeft => BinaryOperator::ShiftLeft,
        AssignmentOperator::ShiftRight => BinaryOperator::ShiftRight,
        AssignmentOperator::ShiftRightZeroFill => BinaryOperator::ShiftRightZeroFill,
        AssignmentOperator::BitwiseOR => BinaryOperator::BitwiseOR,
        AssignmentOperator::BitwiseXOR => BinaryOperator::BitwiseXOR,
        AssignmentOperator::BitwiseAnd => BinaryOperator::BitwiseAnd,
        _ => unreachable!("logical and plain assignment are handled separately"),
    }
}

/// ### [13.13 Binary Logical Operators](https://tc39.es/ecma262/#sec-binary-logical-operators)
#[derive(Debug)]
pub struct LogicalFrame {
    node: &'static ast::LogicalExpression<'static>,
}

impl LogicalFrame {
    fn new(node: &'static ast::LogicalExpression<'static>) -> Self {
        Self { node }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let Some(input) = input else {
            return FrameStep::Push(Frame::expression(&self.node.left));
        };
        let left = value_of(Some(input));
        let short_circuit = match self.node.operator {
            LogicalOperator::And => !left.to_boolean(agent),
            LogicalOperator::Or => left.to_boolean(agent),
            LogicalOperator::Coalesce => !left.is_nullish(),
        };
        if short_circuit {
            done(left)
        } else {
            FrameStep::Replace(Frame::expression(&self.node.right))
        }
    }
}

/// ### [13.14 Conditional Operator ( ? : )](https://tc39.es/ecma262/#sec-conditional-operator)
#[derive(Debug)]
pub struct ConditionalFrame {
    node: &'static ast::ConditionalExpression<'static>,
}

impl ConditionalFrame {
    fn new(node: &'static ast::ConditionalExpression<'static>) -> Self {
        Self { node }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let Some(input) = input else {
            return FrameStep::Push(Frame::expression(&self.node.test));
        };
        let test = value_of(Some(input)).to_boolean(agent);
        let branch = if test {
            &self.node.consequent
        } else {
            &self.node.alternate
        };
        FrameStep::Replace(Frame::expression(branch))
    }
}

/// ### [13.16 Comma Operator ( , )](https://tc39.es/ecma262/#sec-comma-operator)
#[derive(Debug)]
pub struct SequenceFrame {
    node: &'static ast::SequenceExpression<'static>,
    index: usize,
}

impl SequenceFrame {
    fn new(node: &'static ast::SequenceExpression<'static>) -> Self {
        Self { node, index: 0 }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let _ = agent;
        if let Some(input) = input {
            if self.index == self.node.expressions.len() {
                return FrameStep::Done(input);
            }
        }
        let expression = &self.node.expressions[self.index];
        self.index += 1;
        FrameStep::Push(Frame::expression(expression))
    }
}

/// ### [13.2.4 Array Initializer](https://tc39.es/ecma262/#sec-array-initializer)
#[derive(Debug)]
pub struct ArrayLiteralFrame {
    node: &'static ast::ArrayExpression<'static>,
    index: usize,
    awaiting_spread: bool,
    values: Vec<Option<Value>>,
}

impl ArrayLiteralFrame {
    fn new(node: &'static ast::ArrayExpression<'static>) -> Self {
        Self {
            node,
            index: 0,
            awaiting_spread: false,
            values: Vec::with_capacity(node.elements.len()),
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        if let Some(input) = input {
            let value = value_of(Some(input));
            if self.awaiting_spread {
                self.awaiting_spread = false;
                match iterable_to_list(agent, value) {
                    Ok(items) => self.values.extend(items.into_iter().map(Some)),
                    Err(err) => return throw_step(err),
                }
            } else {
                self.values.push(Some(value));
            }
        }
        loop {
            let Some(element) = self.node.elements.get(self.index) else {
                return result_step(
                    array_from_elements(agent, &self.values).map(Value::Object),
                );
            };
            self.index += 1;
            match element {
                ast::ArrayExpressionElement::Elision(_) => {
                    self.values.push(None);
                }
                ast::ArrayExpressionElement::SpreadElement(spread) => {
                    self.awaiting_spread = true;
                    return FrameStep::Push(Frame::expression(&spread.argument));
                }
                _ => {
                    let expression = element
                        .as_expression()
                        .expect("non-spread array elements are expressions");
                    return FrameStep::Push(Frame::expression(expression));
                }
            }
        }
    }
}

/// ### [13.2.5 Object Initializer](https://tc39.es/ecma262/#sec-object-initializer)
#[derive(Debug)]
pub struct ObjectLiteralFrame {
    node: &'static ast::ObjectExpression<'static>,
    index: usize,
    object: Option<Object>,
    pending: ObjectLiteralPending,
}

#[derive(Debug)]
enum ObjectLiteralPending {
    None,
    /// Waiting for a computed key of the property at `index - 1`.
    Key,
    /// Waiting for a value to define under the stored key.
    Value(PropertyKey),
    /// Waiting for a spread source object.
    Spread,
}

impl ObjectLiteralFrame {
    fn new(node: &'static ast::ObjectExpression<'static>) -> Self {
        Self {
            node,
            index: 0,
            object: None,
            pending: ObjectLiteralPending::None,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let object = match self.object {
            Some(object) => object,
            None => {
                let prototype = agent.current_realm().intrinsics.object_prototype();
                let object = ordinary_object_create(agent, Some(prototype));
                self.object = Some(object);
                object
            }
        };

        if let Some(input) = input {
            let value = value_of(Some(input));
            match std::mem::replace(&mut self.pending, ObjectLiteralPending::None) {
                ObjectLiteralPending::Key => {
                    let key = match to_property_key(agent, value) {
                        Ok(key) => key,
                        Err(err) => return throw_step(err),
                    };
                    // The value of the property evaluated under the
                    // now-known key.
                    let property = self.current_property();
                    self.pending = ObjectLiteralPending::Value(key);
                    let name = if is_anonymous_function_definition(&property.value) {
                        Some(key)
                    } else {
                        None
                    };
                    return FrameStep::Push(named_expression_frame(&property.value, name));
                }
                ObjectLiteralPending::Value(key) => {
                    if let Err(err) = create_data_property_or_throw(agent, object, key, value) {
                        return throw_step(err);
                    }
                }
                ObjectLiteralPending::Spread => {
                    if let Err(err) = copy_data_properties(agent, object, value, &[]) {
                        return throw_step(err);
                    }
                }
                ObjectLiteralPending::None => unreachable!(),
            }
        }

        loop {
            let Some(property) = self.node.properties.get(self.index) else {
                return done(Value::Object(object));
            };
            self.index += 1;
            match property {
                ast::ObjectPropertyKind::SpreadProperty(spread) => {
                    self.pending = ObjectLiteralPending::Spread;
                    return FrameStep::Push(Frame::expression(&spread.argument));
                }
                ast::ObjectPropertyKind::ObjectProperty(property) => {
                    if property.computed {
                        self.pending = ObjectLiteralPending::Key;
                        let key_expression = property
                            .key
                            .as_expression()
                            .expect("computed keys are expressions");
                        return FrameStep::Push(Frame::expression(key_expression));
                    }
                    let key = static_property_key(agent, &property.key);
                    match property.kind {
                        ast::PropertyKind::Init => {
                            if property.method {
                                if let Err(err) =
                                    define_object_literal_method(agent, object, key, property)
                                {
                                    return throw_step(err);
                                }
                                continue;
                            }
                            self.pending = ObjectLiteralPending::Value(key);
                            let name = if is_anonymous_function_definition(&property.value) {
                                Some(key)
                            } else {
                                None
                            };
                            return FrameStep::Push(named_expression_frame(
                                &property.value,
                                name,
                            ));
                        }
                        ast::PropertyKind::Get | ast::PropertyKind::Set => {
                            if let Err(err) =
                                define_object_literal_accessor(agent, object, key, property)
                            {
                                return throw_step(err);
                            }
                            continue;
                        }
                    }
                }
            }
        }
    }

    fn current_property(&self) -> &'static ast::ObjectProperty<'static> {
        match &self.node.properties[self.index - 1] {
            ast::ObjectPropertyKind::ObjectProperty(property) => property,
            _ => unreachable!(),
        }
    }
}

pub(crate) fn static_property_key(
    agent: &mut Agent,
    key: &ast::PropertyKey<'_>,
) -> PropertyKey {
    match key {
        ast::PropertyKey::StaticIdentifier(identifier) => {
            PropertyKey::from_str(agent, identifier.name.as_str())
        }
        ast::PropertyKey::StringLiteral(literal) => {
            PropertyKey::from_str(agent, literal.value.as_str())
        }
        ast::PropertyKey::NumericLiteral(literal) => {
            let text = crate::ecmascript::types::number_to_string(literal.value);
            PropertyKey::from_str(agent, &text)
        }
        _ => unreachable!("static keys are identifiers or literals"),
    }
}

fn define_object_literal_method(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    property: &'static ast::ObjectProperty<'static>,
) -> JsResult<()> {
    let ast::Expression::FunctionExpression(function) = &property.value else {
        unreachable!("object literal methods are function expressions")
    };
    let closure = instantiate_function_expression(agent, function, Some(key));
    make_method(agent, closure, object);
    create_data_property_or_throw(agent, object, key, Value::Object(closure))
}

fn define_object_literal_accessor(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    property: &'static ast::ObjectProperty<'static>,
) -> JsResult<()> {
    let ast::Expression::FunctionExpression(function) = &property.value else {
        unreachable!("object literal accessors are function expressions")
    };
    let closure = instantiate_function_expression(agent, function, None);
    make_method(agent, closure, object);
    let prefix = match property.kind {
        ast::PropertyKind::Get => "get",
        ast::PropertyKind::Set => "set",
        ast::PropertyKind::Init => unreachable!(),
    };
    set_function_name(agent, closure, key, Some(prefix));
    let existing = match agent[object].properties.get(key) {
        Some(Property {
            value: PropertyValue::Accessor { get, set },
            ..
        }) => (*get, *set),
        _ => (None, None),
    };
    let (get, set) = match property.kind {
        ast::PropertyKind::Get => (Some(closure), existing.1),
        ast::PropertyKind::Set => (existing.0, Some(closure)),
        ast::PropertyKind::Init => unreachable!(),
    };
    agent[object].properties.set(
        key,
        Property {
            enumerable: true,
            configurable: true,
            value: PropertyValue::Accessor { get, set },
        },
    );
    Ok(())
}

/// ### [13.2.8 Template Literals](https://tc39.es/ecma262/#sec-template-literals)
#[derive(Debug)]
pub struct TemplateFrame {
    node: &'static ast::TemplateLiteral<'static>,
    index: usize,
    accumulated: String,
}

impl TemplateFrame {
    fn new(node: &'static ast::TemplateLiteral<'static>) -> Self {
        let mut accumulated = String::new();
        if let Some(first) = node.quasis.first() {
            if let Some(cooked) = &first.value.cooked {
                accumulated.push_str(cooked.as_str());
            }
        }
        Self {
            node,
            index: 0,
            accumulated,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        if let Some(input) = input {
            let value = value_of(Some(input));
            let text = match to_string(agent, value) {
                Ok(text) => text,
                Err(err) => return throw_step(err),
            };
            self.accumulated.push_str(text.as_str(agent));
            if let Some(quasi) = self.node.quasis.get(self.index + 1) {
                if let Some(cooked) = &quasi.value.cooked {
                    self.accumulated.push_str(cooked.as_str());
                }
            }
            self.index += 1;
        }
        match self.node.expressions.get(self.index) {
            Some(expression) => FrameStep::Push(Frame::expression(expression)),
            None => done(Value::from_string(agent, std::mem::take(&mut self.accumulated))),
        }
    }
}

/// ### [13.3.11 Tagged Templates](https://tc39.es/ecma262/#sec-tagged-templates)
#[derive(Debug)]
pub struct TaggedTemplateFrame {
    node: &'static ast::TaggedTemplateExpression<'static>,
    state: TaggedTemplateState,
}

#[derive(Debug)]
enum TaggedTemplateState {
    Start,
    TagRef(RefEval),
    TagValue,
    Substitutions {
        function: Value,
        this_value: Value,
        values: Vec<Value>,
    },
}

impl TaggedTemplateFrame {
    fn new(node: &'static ast::TaggedTemplateExpression<'static>) -> Self {
        Self {
            node,
            state: TaggedTemplateState::Start,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match &mut self.state {
            TaggedTemplateState::Start => match RefTarget::from_expression(&self.node.tag) {
                Some(target) => {
                    self.state = TaggedTemplateState::TagRef(RefEval::new(target));
                    self.step(agent, None)
                }
                None => {
                    self.state = TaggedTemplateState::TagValue;
                    FrameStep::Push(Frame::expression(&self.node.tag))
                }
            },
            TaggedTemplateState::TagRef(reference) => {
                let input = input.map(|completion| value_of(Some(completion)));
                match reference.step(agent, input) {
                    RefProgress::Push(frame) => FrameStep::Push(frame),
                    RefProgress::Err(err) => throw_step(err),
                    RefProgress::Ready(reference) => {
                        let this_value = if reference.is_property_reference() {
                            reference.get_this_value()
                        } else {
                            Value::Undefined
                        };
                        let function = match reference.get_value(agent) {
                            Ok(value) => value,
                            Err(err) => return throw_step(err),
                        };
                        self.state = TaggedTemplateState::Substitutions {
                            function,
                            this_value,
                            values: Vec::new(),
                        };
                        self.step(agent, None)
                    }
                }
            }
            TaggedTemplateState::TagValue => {
                let function = value_of(input);
                self.state = TaggedTemplateState::Substitutions {
                    function,
                    this_value: Value::Undefined,
                    values: Vec::new(),
                };
                self.step(agent, None)
            }
            TaggedTemplateState::Substitutions {
                function,
                this_value,
                values,
            } => {
                if let Some(input) = input {
                    values.push(value_of(Some(input)));
                }
                let quasi = &self.node.quasi;
                match quasi.expressions.get(values.len()) {
                    Some(expression) => FrameStep::Push(Frame::expression(expression)),
                    None => {
                        let function = *function;
                        let this_value = *this_value;
                        let substitutions = values.clone();
                        result_step(invoke_tag_function(
                            agent,
                            function,
                            this_value,
                            quasi,
                            &substitutions,
                        ))
                    }
                }
            }
        }
    }
}

/// ### [13.2.8.4 GetTemplateObject ( templateLiteral )](https://tc39.es/ecma262/#sec-gettemplateobject)
fn invoke_tag_function(
    agent: &mut Agent,
    function: Value,
    this_value: Value,
    quasi: &'static ast::TemplateLiteral<'static>,
    substitutions: &[Value],
) -> JsResult<Value> {
    let mut cooked_strings = Vec::with_capacity(quasi.quasis.len());
    let mut raw_strings = Vec::with_capacity(quasi.quasis.len());
    for element in &quasi.quasis {
        let cooked = match &element.value.cooked {
            Some(cooked) => Value::from_str(agent, cooked.as_str()),
            None => Value::Undefined,
        };
        cooked_strings.push(cooked);
        raw_strings.push(Value::from_str(agent, element.value.raw.as_str()));
    }
    let template = create_array_from_list(agent, &cooked_strings);
    let raw = create_array_from_list(agent, &raw_strings);
    let raw_key = PropertyKey::from_str(agent, "raw");
    crate::ecmascript::abstract_operations::operations_on_objects::define_property_or_throw(
        agent,
        template,
        raw_key,
        crate::ecmascript::types::PropertyDescriptor::frozen_data_descriptor(Value::Object(raw)),
    )?;
    let mut arguments = Vec::with_capacity(substitutions.len() + 1);
    arguments.push(Value::Object(template));
    arguments.extend_from_slice(substitutions);
    call(agent, function, this_value, &arguments)
}

/// Stepwise evaluation of an argument list, including spreads.
#[derive(Debug)]
pub(crate) struct ArgumentsEval {
    arguments: &'static [ast::Argument<'static>],
    index: usize,
    awaiting_spread: bool,
    values: Vec<Value>,
}

pub(crate) enum ArgumentsProgress {
    Push(Frame),
    Ready(Vec<Value>),
    Err(crate::ecmascript::execution::JsError),
}

impl ArgumentsEval {
    pub(crate) fn new(arguments: &'static [ast::Argument<'static>]) -> Self {
        Self {
            arguments,
            index: 0,
            awaiting_spread: false,
            values: Vec::with_capacity(arguments.len()),
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Value>) -> ArgumentsProgress {
        if let Some(value) = input {
            if self.awaiting_spread {
                self.awaiting_spread = false;
                match iterable_to_list(agent, value) {
                    Ok(items) => self.values.extend(items),
                    Err(err) => return ArgumentsProgress::Err(err),
                }
            } else {
                self.values.push(value);
            }
        }
        let Some(argument) = self.arguments.get(self.index) else {
            return ArgumentsProgress::Ready(std::mem::take(&mut self.values));
        };
        self.index += 1;
        match argument {
            ast::Argument::SpreadElement(spread) => {
                self.awaiting_spread = true;
                ArgumentsProgress::Push(Frame::expression(&spread.argument))
            }
            _ => {
                let expression = argument
                    .as_expression()
                    .expect("non-spread arguments are expressions");
                ArgumentsProgress::Push(Frame::expression(expression))
            }
        }
    }
}

/// ### [13.3.6 Function Calls](https://tc39.es/ecma262/#sec-function-calls)
#[derive(Debug)]
pub struct CallFrame {
    node: &'static ast::CallExpression<'static>,
    state: CallState,
}

#[derive(Debug)]
enum CallState {
    Start,
    CalleeRef(RefEval),
    CalleeValue,
    Arguments {
        function: Value,
        this_value: Value,
        arguments: ArgumentsEval,
    },
    SuperArguments {
        arguments: ArgumentsEval,
    },
}

impl CallFrame {
    fn new(node: &'static ast::CallExpression<'static>) -> Self {
        Self {
            node,
            state: CallState::Start,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match &mut self.state {
            CallState::Start => {
                if matches!(self.node.callee, ast::Expression::Super(_)) {
                    self.state = CallState::SuperArguments {
                        arguments: ArgumentsEval::new(&self.node.arguments),
                    };
                    return self.step(agent, None);
                }
                match RefTarget::from_expression(&self.node.callee) {
                    Some(target) => {
                        self.state = CallState::CalleeRef(RefEval::new(target));
                        self.step(agent, None)
                    }
                    None => {
                        self.state = CallState::CalleeValue;
                        FrameStep::Push(Frame::expression(&self.node.callee))
                    }
                }
            }
            CallState::CalleeRef(reference) => {
                let input = input.map(|completion| value_of(Some(completion)));
                match reference.step(agent, input) {
                    RefProgress::Push(frame) => FrameStep::Push(frame),
                    RefProgress::Err(err) => throw_step(err),
                    RefProgress::Ready(reference) => {
                        // ### [13.3.6.2 EvaluateCall](https://tc39.es/ecma262/#sec-evaluatecall)
                        // 1. If ref is a Reference Record: thisValue is the
                        //    base (or the with-statement binding object).
                        let this_value = match reference.base {
                            crate::ecmascript::types::Base::Value(_) => {
                                reference.get_this_value()
                            }
                            crate::ecmascript::types::Base::Environment(env) => {
                                match env.with_base_object(agent) {
                                    Some(base) => Value::Object(base),
                                    None => Value::Undefined,
                                }
                            }
                            crate::ecmascript::types::Base::Unresolvable => Value::Undefined,
                        };
                        let function = match reference.get_value(agent) {
                            Ok(value) => value,
                            Err(err) => return throw_step(err),
                        };
                        self.state = CallState::Arguments {
                            function,
                            this_value,
                            arguments: ArgumentsEval::new(&self.node.arguments),
                        };
                        self.step(agent, None)
                    }
                }
            }
            CallState::CalleeValue => {
                let function = value_of(input);
                self.state = CallState::Arguments {
                    function,
                    this_value: Value::Undefined,
                    arguments: ArgumentsEval::new(&self.node.arguments),
                };
                self.step(agent, None)
            }
            CallState::Arguments {
                function,
                this_value,
                arguments,
            } => {
                let input = input.map(|completion| value_of(Some(completion)));
                match arguments.step(agent, input) {
                    ArgumentsProgress::Push(frame) => FrameStep::Push(frame),
                    ArgumentsProgress::Err(err) => throw_step(err),
                    ArgumentsProgress::Ready(values) => {
                        let function = *function;
                        let this_value = *this_value;
                        invoke_call(agent, function, this_value, values)
                    }
                }
            }
            CallState::SuperArguments { arguments } => {
                let input = input.map(|completion| value_of(Some(completion)));
                match arguments.step(agent, input) {
                    ArgumentsProgress::Push(frame) => FrameStep::Push(frame),
                    ArgumentsProgress::Err(err) => throw_step(err),
                    ArgumentsProgress::Ready(values) => {
                        result_step(super_call(agent, &values))
                    }
                }
            }
        }
    }
}

/// Invokes the resolved callee. Plain ECMAScript functions run inline on
/// the same fiber through a call-boundary frame so that deep recursion
/// lives on the heap and yields inside argument positions keep working;
/// everything else (builtins, bound functions, proxies, generators, async
/// functions) runs through the native \[\[Call]].
fn invoke_call(
    agent: &mut Agent,
    function: Value,
    this_value: Value,
    arguments: Vec<Value>,
) -> FrameStep {
    let Value::Object(callee) = function else {
        let what = function.debug_string(agent);
        return throw_step(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{what} is not a function"),
        ));
    };
    if !callee.is_callable(agent) {
        let what = callee.debug_string(agent);
        return throw_step(agent.throw_exception(
            ExceptionType::TypeError,
            format!("{what} is not a function"),
        ));
    }
    let inline = match &agent[callee].kind {
        ObjectKind::ECMAScriptFunction(data) => {
            !data.is_async && !data.is_generator && !data.constructor_status.is_class_constructor()
        }
        _ => false,
    };
    if !inline {
        return result_step(callee.internal_call(
            agent,
            this_value,
            ArgumentsList(&arguments),
        ));
    }
    // Inline path: PrepareForOrdinaryCall + bind this + declaration
    // instantiation, then hand the body to a call-boundary frame.
    let local_env = prepare_for_ordinary_call(agent, callee, None);
    if let Err(err) = ordinary_call_bind_this(agent, callee, local_env, this_value) {
        agent.pop_execution_context();
        return throw_step(err);
    }
    if let Err(err) = function_declaration_instantiation(
        agent,
        callee,
        ArgumentsList(&arguments),
    ) {
        agent.pop_execution_context();
        return throw_step(err);
    }
    FrameStep::Replace(Frame::CallBoundary(CallBoundaryFrame::new(agent, callee)))
}

/// ### [13.3.7.1 SuperCall Evaluation](https://tc39.es/ecma262/#sec-super-keyword-runtime-semantics-evaluation)
fn super_call(agent: &mut Agent, arguments: &[Value]) -> JsResult<Value> {
    // 1./2. Let thisER be GetThisEnvironment(); its NewTarget.
    let Some(function_env) = get_this_function_environment(agent) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::SyntaxError,
            "'super' keyword is only valid inside class constructors",
        ));
    };
    let record = agent.heap.environments.get_function(function_env);
    let active_function = record.get_function_object();
    let Some(new_target) = record.get_new_target() else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Super constructor call outside of a [[Construct]] invocation",
        ));
    };
    // 3. Let func be GetSuperConstructor(): the active function's
    //    prototype.
    let func = active_function.internal_get_prototype_of(agent)?;
    let Some(func) = func.filter(|func| func.is_constructor(agent)) else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Super constructor is not a constructor",
        ));
    };
    // 6. Let result be ? Construct(func, argList, newTarget).
    let result = construct(agent, func, arguments, Some(new_target))?;
    // 8. Perform ? thisER.BindThisValue(result).
    FunctionEnvironmentRecord::bind_this_value(agent, function_env, Value::Object(result))?;
    // 10. Perform ? InitializeInstanceElements(result, F).
    crate::ecmascript::builtins::ecmascript_function::initialize_instance_elements(
        agent,
        result,
        active_function,
    )?;
    // 11. Return result.
    Ok(Value::Object(result))
}

/// The frame at an inline ECMAScript-function activation boundary. It pops
/// the callee execution context and translates a return completion into
/// the call's value.
#[derive(Debug)]
pub struct CallBoundaryFrame {
    body: &'static ast::FunctionBody<'static>,
    implicit_return: bool,
    started: bool,
}

impl CallBoundaryFrame {
    pub(crate) fn new(agent: &Agent, function: Object) -> Self {
        let data = function_data(agent, function);
        // SAFETY: kept alive by the function's SourceCode.
        let body: &'static ast::FunctionBody<'static> =
            unsafe { data.ecmascript_code.as_ref() };
        Self {
            body,
            implicit_return: data.is_concise_arrow_function,
            started: false,
        }
    }

    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        matches!(completion, Completion::Return(_))
    }

    pub(crate) fn on_unwind(&mut self, agent: &mut Agent, _completion: &Completion) {
        agent.pop_execution_context();
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        if !self.started {
            self.started = true;
            if self.implicit_return {
                let ast::Statement::ExpressionStatement(statement) = &self.body.statements[0]
                else {
                    unreachable!("concise bodies hold exactly one expression statement")
                };
                return FrameStep::Push(Frame::expression(&statement.expression));
            }
            return FrameStep::Push(Frame::statement_list(&self.body.statements));
        }
        let completion = input.expect("call boundary is re-entered with a completion");
        agent.pop_execution_context();
        match completion {
            Completion::Normal(value) => {
                let result = if self.implicit_return {
                    value.unwrap_or(Value::Undefined)
                } else {
                    Value::Undefined
                };
                done(result)
            }
            Completion::Return(value) => done(value),
            abrupt => FrameStep::Done(abrupt),
        }
    }
}

/// ### [13.3.5 The new Operator](https://tc39.es/ecma262/#sec-new-operator)
#[derive(Debug)]
pub struct NewFrame {
    node: &'static ast::NewExpression<'static>,
    state: NewState,
}

#[derive(Debug)]
enum NewState {
    Start,
    Arguments {
        constructor: Value,
        arguments: ArgumentsEval,
    },
}

impl NewFrame {
    fn new(node: &'static ast::NewExpression<'static>) -> Self {
        Self {
            node,
            state: NewState::Start,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match &mut self.state {
            NewState::Start => match input {
                None => FrameStep::Push(Frame::expression(&self.node.callee)),
                Some(input) => {
                    let constructor = value_of(Some(input));
                    self.state = NewState::Arguments {
                        constructor,
                        arguments: ArgumentsEval::new(&self.node.arguments),
                    };
                    self.step(agent, None)
                }
            },
            NewState::Arguments {
                constructor,
                arguments,
            } => {
                let input = input.map(|completion| value_of(Some(completion)));
                match arguments.step(agent, input) {
                    ArgumentsProgress::Push(frame) => FrameStep::Push(frame),
                    ArgumentsProgress::Err(err) => throw_step(err),
                    ArgumentsProgress::Ready(values) => {
                        let constructor = *constructor;
                        // 5. If IsConstructor(constructor) is false, throw a
                        //    TypeError exception.
                        let Value::Object(constructor_object) = constructor else {
                            let what = constructor.debug_string(agent);
                            return throw_step(agent.throw_exception(
                                ExceptionType::TypeError,
                                format!("{what} is not a constructor"),
                            ));
                        };
                        if !constructor_object.is_constructor(agent) {
                            let what = constructor.debug_string(agent);
                            return throw_step(agent.throw_exception(
                                ExceptionType::TypeError,
                                format!("{what} is not a constructor"),
                            ));
                        }
                        // 6. Return ? Construct(constructor, argList).
                        result_step(
                            construct(agent, constructor_object, &values, None)
                                .map(Value::Object),
                        )
                    }
                }
            }
        }
    }
}

/// ### [27.5.3.2 Yield Evaluation](https://tc39.es/ecma262/#sec-yield)
#[derive(Debug)]
pub struct YieldFrame {
    node: &'static ast::YieldExpression<'static>,
    state: YieldState,
}

#[derive(Debug)]
enum YieldState {
    Start,
    AwaitingOperandAwait,
    Suspended,
}

impl YieldFrame {
    fn new(node: &'static ast::YieldExpression<'static>) -> Self {
        Self {
            node,
            state: YieldState::Start,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match self.state {
            YieldState::Start => match (&self.node.argument, input) {
                (Some(argument), None) => FrameStep::Push(Frame::expression(argument)),
                (None, None) => self.suspend(agent, Value::Undefined),
                (_, Some(input)) => {
                    let value = value_of(Some(input));
                    self.suspend(agent, value)
                }
            },
            YieldState::AwaitingOperandAwait => {
                // Async generators await the operand, then yield the
                // awaited value raw; the driver wraps it.
                let value = value_of(input);
                self.state = YieldState::Suspended;
                FrameStep::Yield(value)
            }
            YieldState::Suspended => {
                // The resumption payload becomes the yield expression's
                // value; abrupt resumptions unwound past this frame
                // already.
                FrameStep::Done(input.expect("yield resumption carries a completion"))
            }
        }
    }

    fn suspend(&mut self, agent: &mut Agent, value: Value) -> FrameStep {
        if in_async_generator(agent) {
            self.state = YieldState::AwaitingOperandAwait;
            FrameStep::Await(value)
        } else {
            self.state = YieldState::Suspended;
            let iter_result = create_iter_result_object(agent, value, false);
            FrameStep::Yield(Value::Object(iter_result))
        }
    }
}

/// ### [27.5.3.2 yield* Evaluation](https://tc39.es/ecma262/#sec-generator-function-definitions-runtime-semantics-evaluation)
#[derive(Debug)]
pub struct YieldDelegateFrame {
    node: &'static ast::YieldExpression<'static>,
    state: YieldDelegateState,
}

#[derive(Debug)]
enum YieldDelegateState {
    Start,
    Suspended { iterator: IteratorRecord },
}

impl YieldDelegateFrame {
    fn new(node: &'static ast::YieldExpression<'static>) -> Self {
        Self {
            node,
            state: YieldDelegateState::Start,
        }
    }

    pub(crate) fn observes_abrupt(&self, _completion: &Completion) -> bool {
        // Abrupt resumptions are forwarded into the inner iterator.
        matches!(self.state, YieldDelegateState::Suspended { .. })
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match &self.state {
            YieldDelegateState::Start => match (&self.node.argument, input) {
                (Some(argument), None) => FrameStep::Push(Frame::expression(argument)),
                (None, None) => throw_step(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "yield* requires an iterable operand",
                )),
                (_, Some(input)) => {
                    let value = value_of(Some(input));
                    // 2. Let iteratorRecord be ? GetIterator(value, SYNC).
                    let iterator = match get_iterator(agent, value, false) {
                        Ok(iterator) => iterator,
                        Err(err) => return throw_step(err),
                    };
                    self.advance(agent, iterator, Completion::normal(Value::Undefined))
                }
            },
            YieldDelegateState::Suspended { iterator } => {
                let iterator = *iterator;
                let received = input.expect("yield* resumption carries a completion");
                self.advance(agent, iterator, received)
            }
        }
    }

    /// One round of the delegation protocol: forward `received` into the
    /// inner iterator and either finish or re-suspend on its result.
    fn advance(
        &mut self,
        agent: &mut Agent,
        iterator: IteratorRecord,
        received: Completion,
    ) -> FrameStep {
        match received {
            // a. If received is a normal completion: call next.
            Completion::Normal(value) => {
                let value = value.unwrap_or(Value::Undefined);
                let inner = call(
                    agent,
                    iterator.next_method,
                    Value::Object(iterator.iterator),
                    &[value],
                );
                self.handle_inner_result(agent, iterator, inner, false)
            }
            // b. Else if received is a throw completion: forward through
            //    the iterator's throw method when it has one.
            Completion::Throw(err) => {
                let key = PropertyKey::from_str(agent, "throw");
                let throw_method = match get_method(agent, iterator.iterator, key) {
                    Ok(method) => method,
                    Err(err) => return throw_step(err),
                };
                match throw_method {
                    Some(throw_method) => {
                        let inner = call_function(
                            agent,
                            throw_method,
                            Value::Object(iterator.iterator),
                            &[err.value()],
                        );
                        self.handle_inner_result(agent, iterator, inner, false)
                    }
                    None => {
                        // iii./iv. Close the inner iterator, then fail with
                        //    a TypeError per the delegation rule.
                        let close_result: JsResult<Value> =
                            iterator_close(agent, &iterator, Ok(Value::Undefined));
                        if let Err(close_err) = close_result {
                            return throw_step(close_err);
                        }
                        throw_step(agent.throw_exception_with_static_message(
                            ExceptionType::TypeError,
                            "The iterator does not provide a 'throw' method",
                        ))
                    }
                }
            }
            // c. Else: received is a return completion.
            Completion::Return(value) => {
                let key = PropertyKey::from_str(agent, "return");
                let return_method = match get_method(agent, iterator.iterator, key) {
                    Ok(method) => method,
                    Err(err) => return throw_step(err),
                };
                match return_method {
                    // i. If return is undefined, return the completion.
                    None => FrameStep::Done(Completion::Return(value)),
                    Some(return_method) => {
                        let inner = call_function(
                            agent,
                            return_method,
                            Value::Object(iterator.iterator),
                            &[value],
                        );
                        self.handle_inner_result(agent, iterator, inner, true)
                    }
                }
            }
            Completion::Break(_) | Completion::Continue(_) => {
                unreachable!("loop completions never resume a generator")
            }
        }
    }

    fn handle_inner_result(
        &mut self,
        agent: &mut Agent,
        iterator: IteratorRecord,
        inner: JsResult<Value>,
        is_return: bool,
    ) -> FrameStep {
        let inner = match inner {
            Ok(inner) => inner,
            Err(err) => return throw_step(err),
        };
        let Value::Object(inner) = inner else {
            return throw_step(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Iterator result is not an object",
            ));
        };
        let done_flag = match crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterator_complete(
            agent, inner,
        ) {
            Ok(done) => done,
            Err(err) => return throw_step(err),
        };
        if done_flag {
            let value = match iterator_value(agent, inner) {
                Ok(value) => value,
                Err(err) => return throw_step(err),
            };
            return if is_return {
                FrameStep::Done(Completion::Return(value))
            } else {
                FrameStep::Done(Completion::normal(value))
            };
        }
        self.state = YieldDelegateState::Suspended { iterator };
        // The inner result object is forwarded verbatim as the visible
        // yield.
        FrameStep::Yield(Value::Object(inner))
    }
}

/// ### [27.7.5.3 Await ( value )](https://tc39.es/ecma262/#await)
#[derive(Debug)]
pub struct AwaitFrame {
    node: &'static ast::AwaitExpression<'static>,
    suspended: bool,
}

impl AwaitFrame {
    fn new(node: &'static ast::AwaitExpression<'static>) -> Self {
        Self {
            node,
            suspended: false,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let _ = agent;
        match (self.suspended, input) {
            (false, None) => FrameStep::Push(Frame::expression(&self.node.argument)),
            (false, Some(input)) => {
                self.suspended = true;
                FrameStep::Await(value_of(Some(input)))
            }
            (true, Some(completion)) => FrameStep::Done(completion),
            (true, None) => unreachable!("await resumption carries a completion"),
        }
    }
}

/// ### [13.3.9 Optional Chains](https://tc39.es/ecma262/#sec-optional-chains)
///
/// Chains evaluate natively: each link may short-circuit the whole chain
/// to undefined when its base is nullish.
fn evaluate_chain(
    agent: &mut Agent,
    chain: &'static ast::ChainExpression<'static>,
) -> JsResult<Value> {
    let result = match &chain.expression {
        ast::ChainElement::CallExpression(call_expression) => {
            eval_call_link(agent, call_expression)?
        }
        ast::ChainElement::StaticMemberExpression(member) => {
            eval_static_member_link(agent, member)?
        }
        ast::ChainElement::ComputedMemberExpression(member) => {
            eval_computed_member_link(agent, member)?
        }
        _ => {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::SyntaxError,
                "Unsupported optional chain element",
            ));
        }
    };
    Ok(result.map(|(value, _)| value).unwrap_or(Value::Undefined))
}

fn eval_static_member_link(
    agent: &mut Agent,
    member: &'static ast::StaticMemberExpression<'static>,
) -> JsResult<Option<(Value, Value)>> {
    let Some((object, _)) = eval_chain_link(agent, &member.object)? else {
        return Ok(None);
    };
    if member.optional && object.is_nullish() {
        return Ok(None);
    }
    let key = PropertyKey::from_str(agent, member.property.name.as_str());
    let value = get_v(agent, object, key)?;
    Ok(Some((value, object)))
}

fn eval_computed_member_link(
    agent: &mut Agent,
    member: &'static ast::ComputedMemberExpression<'static>,
) -> JsResult<Option<(Value, Value)>> {
    let Some((object, _)) = eval_chain_link(agent, &member.object)? else {
        return Ok(None);
    };
    if member.optional && object.is_nullish() {
        return Ok(None);
    }
    let key = crate::engine::evaluate_expression_native(agent, &member.expression)?;
    let key = to_property_key(agent, key)?;
    let value = get_v(agent, object, key)?;
    Ok(Some((value, object)))
}

fn eval_call_link(
    agent: &mut Agent,
    call_expression: &'static ast::CallExpression<'static>,
) -> JsResult<Option<(Value, Value)>> {
    let Some((function, this_value)) = eval_chain_link(agent, &call_expression.callee)? else {
        return Ok(None);
    };
    if call_expression.optional && function.is_nullish() {
        return Ok(None);
    }
    let mut arguments = Vec::with_capacity(call_expression.arguments.len());
    for argument in &call_expression.arguments {
        match argument {
            ast::Argument::SpreadElement(spread) => {
                let value = crate::engine::evaluate_expression_native(agent, &spread.argument)?;
                arguments.extend(iterable_to_list(agent, value)?);
            }
            _ => {
                let expression = argument.as_expression().unwrap();
                let value = crate::engine::evaluate_expression_native(agent, expression)?;
                arguments.push(value);
            }
        }
    }
    let value = call(agent, function, this_value, &arguments)?;
    Ok(Some((value, Value::Undefined)))
}

/// Evaluates one link; `None` means the chain short-circuited. The second
/// tuple slot is the `this` value for a subsequent call link.
fn eval_chain_link(
    agent: &mut Agent,
    expression: &'static ast::Expression<'static>,
) -> JsResult<Option<(Value, Value)>> {
    match expression {
        ast::Expression::StaticMemberExpression(member) => {
            eval_static_member_link(agent, member)
        }
        ast::Expression::ComputedMemberExpression(member) => {
            eval_computed_member_link(agent, member)
        }
        ast::Expression::CallExpression(call_expression) => {
            eval_call_link(agent, call_expression)
        }
        ast::Expression::ParenthesizedExpression(inner) => {
            eval_chain_link(agent, &inner.expression)
        }
        _ => {
            let value = crate::engine::evaluate_expression_native(agent, expression)?;
            Ok(Some((value, Value::Undefined)))
        }
    }
}
