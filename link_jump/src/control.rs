// Control-statement lowering.
//
// `return`, `break`, `continue` and `disable` all become a single JumpGo
// to the label their anchor memoizes; the anchor's scope wraps the label
// in once its own lowering completes. Illegal uses are reported and the
// offending statement dropped, so one run surfaces every diagnostic
// without cascading into later passes.

use crate::link_error::DiagnosticKind;
use crate::LinkJump;
use hdl_ast::expressions::{Access, Expression};
use hdl_ast::statements::{LabelId, PragmaKind, Stmt, StmtKind, UnrollMode};
use hdl_ast::FtaskKind;
use shared_context::{Identifier, Span};

impl<'src, 'ctx> LinkJump<'src, 'ctx> {
    /// Lowers a `return`.
    ///
    /// A value-returning form first stores into the function's result
    /// variable, then jumps to the shared exit label:
    /// ```text
    /// return 7;
    /// ```
    /// becomes:
    /// ```text
    /// f = 7;
    /// JumpGo L
    /// ```
    /// Returns under a fork or outside any function or task are illegal
    /// (IEEE 1800-2023 9.2.3) and are deleted after reporting.
    pub(crate) fn lower_return(
        &mut self,
        value: Option<Expression>,
        span: Span,
        out: &mut Vec<Stmt>,
    ) {
        if self.in_fork {
            self.report(DiagnosticKind::ReturnUnderFork(span));
            return;
        }
        let Some(kind) = self.current_ftask.as_ref().map(|scope| scope.kind) else {
            self.report(DiagnosticKind::ReturnOutsideFtask(span));
            return;
        };

        if let Some(expr) = &value {
            self.note_var_refs(expr);
        }
        match kind {
            FtaskKind::Function {
                result,
                is_constructor,
            } => {
                if value.is_none() && !is_constructor {
                    self.report(DiagnosticKind::ReturnMissingValue(span));
                }
                if let Some(rhs) = value {
                    out.push(Stmt::new(
                        StmtKind::Assign {
                            lhs: Expression::VarRef {
                                name: result,
                                access: Access::Write,
                            },
                            rhs,
                        },
                        span,
                    ));
                }
            }
            FtaskKind::Task => {
                if value.is_some() {
                    self.report(DiagnosticKind::ReturnValueInTask(span));
                }
            }
        }

        let label = self.ftask_exit_label();
        out.push(Stmt::new(StmtKind::JumpGo(label), span));
    }

    /// Lowers a `break` into a jump past the innermost enclosing loop.
    pub(crate) fn lower_break(&mut self, span: Span, out: &mut Vec<Stmt>) {
        if self.current_loop.is_none() {
            self.report(DiagnosticKind::BreakOutsideLoop(span));
            return;
        }
        let label = self.loop_break_label();
        out.push(Stmt::new(StmtKind::JumpGo(label), span));
    }

    /// Lowers a `continue` into a jump to the end of the innermost loop
    /// body; the loop's increment still runs afterwards.
    pub(crate) fn lower_continue(&mut self, span: Span, out: &mut Vec<Stmt>) {
        if self.current_loop.is_none() {
            self.report(DiagnosticKind::ContinueOutsideLoop(span));
            return;
        }
        let label = self.loop_continue_label();
        out.push(Stmt::new(StmtKind::JumpGo(label), span));
    }

    /// Lowers a `disable` naming an enclosing block.
    ///
    /// The target is the innermost enclosing block with a matching name.
    /// Only plain sequential blocks can be disabled this way: disabling a
    /// fork, or a block a fork has been seen under, needs process control
    /// this pass does not model, and is reported as unsupported.
    pub(crate) fn lower_disable(&mut self, target: Identifier, span: Span, out: &mut Vec<Stmt>) {
        let found = self
            .block_stack
            .iter()
            .rposition(|scope| scope.name == Some(target));

        let Some(index) = found else {
            self.report(DiagnosticKind::DisableTargetMissing { target, span });
            return;
        };

        if self.block_stack[index].is_fork {
            self.report(DiagnosticKind::DisableFork(span));
        } else if self.block_stack[index].contains_fork {
            self.report(DiagnosticKind::DisableBlockWithFork(span));
        } else {
            let label = match self.block_stack[index].exit_label {
                Some(label) => label,
                None => {
                    let label = self.next_label();
                    self.block_stack[index].exit_label = Some(label);
                    label
                }
            };
            out.push(Stmt::new(StmtKind::JumpGo(label), span));
        }
    }

    /// Latches unroll pragmas for the next loop and deletes them; every
    /// other pragma travels through untouched.
    pub(crate) fn lower_pragma(&mut self, pragma: PragmaKind, span: Span, out: &mut Vec<Stmt>) {
        match pragma {
            PragmaKind::UnrollFull => self.unroll_pending = Some(UnrollMode::Full),
            PragmaKind::UnrollDisable => self.unroll_pending = Some(UnrollMode::Disable),
            other => out.push(Stmt::new(StmtKind::Pragma(other), span)),
        }
    }

    /// The shared exit label of the enclosing function or task, allocated
    /// on first use. Callers check the scope exists first.
    fn ftask_exit_label(&mut self) -> LabelId {
        if let Some(label) = self
            .current_ftask
            .as_ref()
            .and_then(|scope| scope.exit_label)
        {
            return label;
        }
        let label = self.next_label();
        if let Some(scope) = self.current_ftask.as_mut() {
            scope.exit_label = Some(label);
        }
        label
    }

    /// The exit label of the innermost loop, allocated on first use.
    /// Callers check the scope exists first.
    fn loop_break_label(&mut self) -> LabelId {
        if let Some(label) = self
            .current_loop
            .as_ref()
            .and_then(|scope| scope.break_label)
        {
            return label;
        }
        let label = self.next_label();
        if let Some(scope) = self.current_loop.as_mut() {
            scope.break_label = Some(label);
        }
        label
    }

    /// The end-of-body label of the innermost loop, allocated on first
    /// use. Callers check the scope exists first.
    fn loop_continue_label(&mut self) -> LabelId {
        if let Some(label) = self
            .current_loop
            .as_ref()
            .and_then(|scope| scope.continue_label)
        {
            return label;
        }
        let label = self.next_label();
        if let Some(scope) = self.current_loop.as_mut() {
            scope.continue_label = Some(label);
        }
        label
    }
}
