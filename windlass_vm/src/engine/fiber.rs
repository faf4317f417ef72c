// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fiber: a lazy sequence of evaluation steps.
//!
//! A fiber owns a stack of frames, each a small state machine for one
//! syntactic construct in progress. One [`Fiber::step`] performs a bounded
//! amount of work: it advances the top frame once, pushing child frames,
//! completing with a [`Completion`], or suspending the whole fiber on a
//! yield or await marker. Abrupt completions unwind the frame stack
//! centrally; frames that implement the completion algebra (loops, try,
//! labels, call boundaries) declare which abrupt kinds they observe.

use oxc_ast::ast;

use super::expressions::{
    ArrayLiteralFrame, AssignmentFrame, AwaitFrame, BinaryFrame, CallBoundaryFrame, CallFrame,
    ConditionalFrame, ExpressionFrame, LogicalFrame, MemberFrame, NewFrame, ObjectLiteralFrame,
    SequenceFrame, TaggedTemplateFrame, TemplateFrame, UnaryFrame, UpdateFrame, YieldDelegateFrame,
    YieldFrame,
};
use super::statements::{
    BlockFrame, CatchFrame, DoWhileFrame, ForFrame, ForInFrame, ForOfFrame, IfFrame,
    LabelledFrame, ReturnFrame, StatementFrame, StatementListFrame, SwitchFrame, ThrowFrame,
    TryFrame, VariableDeclarationFrame, WhileFrame, WithFrame,
};
use crate::ecmascript::builtins::ecmascript_function::function_data;
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::{Completion, Object, Value};

/// One step of a frame: what the frame wants the fiber to do next.
pub enum FrameStep {
    /// Push a child frame; this frame is re-entered with the child's
    /// completion.
    Push(Frame),
    /// Replace this frame; the replacement's completion goes to the
    /// parent.
    Replace(Frame),
    /// This frame is finished.
    Done(Completion),
    /// Suspend the fiber on a yield marker carrying the visible result.
    Yield(Value),
    /// Suspend the fiber on an await marker carrying the awaited value.
    Await(Value),
}

/// One step of a fiber, as seen by its driver.
#[derive(Debug)]
pub enum FiberStep {
    /// More work remains.
    Continue,
    /// The fiber suspended on a yield; resume it with the next payload.
    Yield(Value),
    /// The fiber suspended on an await of the given value.
    Await(Value),
    /// Evaluation finished.
    Done(Completion),
}

/// An evaluation frame: one syntactic construct in progress.
#[derive(Debug)]
pub enum Frame {
    Expression(ExpressionFrame),
    Member(MemberFrame),
    Binary(BinaryFrame),
    Logical(LogicalFrame),
    Conditional(ConditionalFrame),
    Unary(UnaryFrame),
    Update(UpdateFrame),
    Assignment(AssignmentFrame),
    Call(CallFrame),
    CallBoundary(CallBoundaryFrame),
    New(NewFrame),
    ArrayLiteral(ArrayLiteralFrame),
    ObjectLiteral(ObjectLiteralFrame),
    Template(TemplateFrame),
    TaggedTemplate(TaggedTemplateFrame),
    Sequence(SequenceFrame),
    Yield(YieldFrame),
    YieldDelegate(YieldDelegateFrame),
    Await(AwaitFrame),
    /// Turns a concise arrow body's value into a return completion.
    ImplicitReturn,
    Statement(StatementFrame),
    StatementList(StatementListFrame),
    Block(BlockFrame),
    VariableDeclaration(VariableDeclarationFrame),
    If(IfFrame),
    While(WhileFrame),
    DoWhile(DoWhileFrame),
    For(ForFrame),
    ForIn(ForInFrame),
    ForOf(ForOfFrame),
    Switch(SwitchFrame),
    Labelled(LabelledFrame),
    Try(TryFrame),
    Catch(CatchFrame),
    Return(ReturnFrame),
    Throw(ThrowFrame),
    With(WithFrame),
}

impl Frame {
    pub fn expression(node: &'static ast::Expression<'static>) -> Frame {
        Frame::Expression(ExpressionFrame { node, name: None })
    }

    pub fn statement_list(statements: &'static [ast::Statement<'static>]) -> Frame {
        Frame::StatementList(StatementListFrame::new(statements))
    }

    fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match self {
            Frame::Expression(frame) => frame.step(agent),
            Frame::Member(frame) => frame.step(agent, input),
            Frame::Binary(frame) => frame.step(agent, input),
            Frame::Logical(frame) => frame.step(agent, input),
            Frame::Conditional(frame) => frame.step(agent, input),
            Frame::Unary(frame) => frame.step(agent, input),
            Frame::Update(frame) => frame.step(agent, input),
            Frame::Assignment(frame) => frame.step(agent, input),
            Frame::Call(frame) => frame.step(agent, input),
            Frame::CallBoundary(frame) => frame.step(agent, input),
            Frame::New(frame) => frame.step(agent, input),
            Frame::ArrayLiteral(frame) => frame.step(agent, input),
            Frame::ObjectLiteral(frame) => frame.step(agent, input),
            Frame::Template(frame) => frame.step(agent, input),
            Frame::TaggedTemplate(frame) => frame.step(agent, input),
            Frame::Sequence(frame) => frame.step(agent, input),
            Frame::Yield(frame) => frame.step(agent, input),
            Frame::YieldDelegate(frame) => frame.step(agent, input),
            Frame::Await(frame) => frame.step(agent, input),
            Frame::ImplicitReturn => {
                let value = match input {
                    Some(Completion::Normal(value)) => value.unwrap_or(Value::Undefined),
                    None => {
                        unreachable!("implicit return always receives its body's completion")
                    }
                    Some(abrupt) => return FrameStep::Done(abrupt),
                };
                FrameStep::Done(Completion::Return(value))
            }
            Frame::Statement(frame) => frame.step(agent),
            Frame::StatementList(frame) => frame.step(agent, input),
            Frame::Block(frame) => frame.step(agent, input),
            Frame::VariableDeclaration(frame) => frame.step(agent, input),
            Frame::If(frame) => frame.step(agent, input),
            Frame::While(frame) => frame.step(agent, input),
            Frame::DoWhile(frame) => frame.step(agent, input),
            Frame::For(frame) => frame.step(agent, input),
            Frame::ForIn(frame) => frame.step(agent, input),
            Frame::ForOf(frame) => frame.step(agent, input),
            Frame::Switch(frame) => frame.step(agent, input),
            Frame::Labelled(frame) => frame.step(agent, input),
            Frame::Try(frame) => frame.step(agent, input),
            Frame::Catch(frame) => frame.step(agent, input),
            Frame::Return(frame) => frame.step(agent, input),
            Frame::Throw(frame) => frame.step(agent, input),
            Frame::With(frame) => frame.step(agent, input),
        }
    }

    /// Whether this frame wants to see the given abrupt completion instead
    /// of being unwound past.
    fn observes_abrupt(&self, completion: &Completion) -> bool {
        match self {
            Frame::CallBoundary(frame) => frame.observes_abrupt(completion),
            Frame::While(frame) => frame.observes_abrupt(completion),
            Frame::DoWhile(frame) => frame.observes_abrupt(completion),
            Frame::For(frame) => frame.observes_abrupt(completion),
            Frame::ForIn(frame) => frame.observes_abrupt(completion),
            Frame::ForOf(frame) => frame.observes_abrupt(completion),
            Frame::Switch(frame) => frame.observes_abrupt(completion),
            Frame::Labelled(frame) => frame.observes_abrupt(completion),
            Frame::Try(frame) => frame.observes_abrupt(completion),
            Frame::YieldDelegate(frame) => frame.observes_abrupt(completion),
            _ => false,
        }
    }

    /// Cleanup when this frame is popped by abrupt unwinding.
    fn on_unwind(&mut self, agent: &mut Agent, completion: &Completion) {
        match self {
            Frame::CallBoundary(frame) => frame.on_unwind(agent, completion),
            Frame::Block(frame) => frame.on_unwind(agent, completion),
            Frame::Catch(frame) => frame.on_unwind(agent, completion),
            Frame::With(frame) => frame.on_unwind(agent, completion),
            Frame::ForOf(frame) => frame.on_unwind(agent, completion),
            Frame::For(frame) => frame.on_unwind(agent, completion),
            _ => {}
        }
    }
}

/// A suspendable evaluation: the lazy sequence of markers the host and the
/// generator machinery drain.
#[derive(Debug)]
pub struct Fiber {
    frames: Vec<Frame>,
    input: Option<Completion>,
}

impl Fiber {
    pub(crate) fn for_expression(expression: &'static ast::Expression<'static>) -> Self {
        Self {
            frames: vec![Frame::expression(expression)],
            input: None,
        }
    }

    pub(crate) fn for_statements(
        statements: &'static oxc_allocator::Vec<'static, ast::Statement<'static>>,
    ) -> Self {
        Self {
            frames: vec![Frame::statement_list(statements)],
            input: None,
        }
    }

    pub(crate) fn for_program(program: &'static ast::Program<'static>) -> Self {
        Self {
            frames: vec![Frame::statement_list(&program.body)],
            input: None,
        }
    }

    /// Packages a function body for evaluation in the current (already
    /// prepared) execution context.
    pub(crate) fn for_function_body(agent: &Agent, function: Object) -> Self {
        let data = function_data(agent, function);
        // SAFETY: the function's SourceCode keeps the body alive.
        let body: &'static ast::FunctionBody<'static> =
            unsafe { data.ecmascript_code.as_ref() };
        if data.is_concise_arrow_function {
            // ConciseBody: a single expression statement with an implicit
            // return.
            let ast::Statement::ExpressionStatement(statement) = &body.statements[0] else {
                unreachable!("concise bodies hold exactly one expression statement")
            };
            Self {
                frames: vec![
                    Frame::ImplicitReturn,
                    Frame::expression(&statement.expression),
                ],
                input: None,
            }
        } else {
            Self {
                frames: vec![Frame::statement_list(&body.statements)],
                input: None,
            }
        }
    }

    /// Delivers a resumption payload to the suspended top frame.
    pub(crate) fn resume_with(&mut self, completion: Completion) {
        self.input = Some(completion);
    }

    /// Advances the fiber by one bounded step.
    pub fn step(&mut self, agent: &mut Agent) -> FiberStep {
        if let Err(err) = agent.consume_step() {
            self.input = Some(Completion::Throw(err));
        }

        let Some(top) = self.frames.last_mut() else {
            let completion = self
                .input
                .take()
                .expect("a drained fiber holds its final completion");
            return FiberStep::Done(completion);
        };

        // Central abrupt unwinding: frames that do not observe the abrupt
        // kind are popped, with their cleanup run, until one does.
        if let Some(completion) = &self.input {
            if completion.is_abrupt() && !top.observes_abrupt(completion) {
                let completion = self.input.take().unwrap();
                let mut frame = self.frames.pop().unwrap();
                frame.on_unwind(agent, &completion);
                if self.frames.is_empty() {
                    return FiberStep::Done(completion);
                }
                self.input = Some(completion);
                return FiberStep::Continue;
            }
        }

        let input = self.input.take();
        match top.step(agent, input) {
            FrameStep::Push(frame) => {
                self.frames.push(frame);
                FiberStep::Continue
            }
            FrameStep::Replace(frame) => {
                *self.frames.last_mut().unwrap() = frame;
                FiberStep::Continue
            }
            FrameStep::Done(completion) => {
                self.frames.pop();
                if self.frames.is_empty() {
                    return FiberStep::Done(completion);
                }
                self.input = Some(completion);
                FiberStep::Continue
            }
            FrameStep::Yield(value) => FiberStep::Yield(value),
            FrameStep::Await(value) => FiberStep::Await(value),
        }
    }

    /// Drains the fiber. Suspension markers cannot legally occur in the
    /// contexts that use this entry point; reaching one is reported as a
    /// TypeError rather than a crash because nested evaluation of
    /// not-yet-started coroutines can observe it.
    pub fn run_to_completion(&mut self, agent: &mut Agent) -> Completion {
        loop {
            match self.step(agent) {
                FiberStep::Continue => {}
                FiberStep::Done(completion) => return completion,
                FiberStep::Yield(_) | FiberStep::Await(_) => {
                    let err = agent.throw_exception_with_static_message(
                        crate::ecmascript::execution::ExceptionType::TypeError,
                        "Suspension is not supported in this evaluation context",
                    );
                    return Completion::Throw(err);
                }
            }
        }
    }
}
