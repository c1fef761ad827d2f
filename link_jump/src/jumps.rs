// Label insertion engine.
//
// A jump target is always materialized the same way: the statements the
// label protects are moved into a JumpBlock whose final statement is the
// JumpLabel, so every JumpGo inserted inside the moved region runs forward
// to a point past them. Declarations are kept out of the block so they stay
// visible in their original scope.

use crate::{BlockScope, LinkJump};
use hdl_ast::statements::{LabelId, Stmt, StmtKind};
use shared_context::{Identifier, Span};
use std::mem;

impl<'src, 'ctx> LinkJump<'src, 'ctx> {
    /// Allocates a fresh jump label id.
    pub(crate) fn next_label(&mut self) -> LabelId {
        let label = LabelId::new(self.label_counter);
        self.label_counter += 1;
        label
    }

    /// Wraps a lowered statement list in the JumpBlock owning `label`.
    ///
    /// ```text
    /// var a; s1; var b; s2;
    /// ```
    /// becomes:
    /// ```text
    /// var a; var b;
    /// JumpBlock L { s1; s2; JumpLabel L }
    /// ```
    /// Every declaration ends up before the block, never inside it, so the
    /// enclosing scope still sees it.
    pub(crate) fn wrap_in_jump_block(
        &mut self,
        stmts: Vec<Stmt>,
        label: LabelId,
        anchor_span: Span,
    ) -> Vec<Stmt> {
        let mut out = Vec::new();
        let mut wrapped = Vec::new();
        let mut span = anchor_span;

        for stmt in stmts {
            if stmt.is_var_decl() {
                out.push(stmt);
            } else {
                if wrapped.is_empty() {
                    span = stmt.get_span();
                }
                wrapped.push(stmt);
            }
        }

        wrapped.push(Stmt::new(StmtKind::JumpLabel(label), span));
        out.push(Stmt::new(
            StmtKind::JumpBlock {
                label,
                stmts: wrapped,
            },
            span,
        ));
        out
    }

    /// Lowers a sequential block. A `disable` naming this block allocates
    /// its exit label through the block stack; when that happened the body
    /// is wrapped so the label sits past the last statement.
    pub(crate) fn lower_begin(
        &mut self,
        name: Option<Identifier>,
        contains_fork: bool,
        stmts: Vec<Stmt>,
        span: Span,
        out: &mut Vec<Stmt>,
    ) {
        self.block_stack.push(BlockScope {
            name,
            is_fork: false,
            contains_fork,
            exit_label: None,
        });
        let body = self.lower_stmt_list(stmts);
        let scope = self.block_stack.pop().expect("block stack underflow");

        let body = match scope.exit_label {
            Some(label) => self.wrap_in_jump_block(body, label, span),
            None => body,
        };
        out.push(Stmt::new(
            StmtKind::Begin {
                name,
                contains_fork: scope.contains_fork,
                stmts: body,
            },
            span,
        ));
    }

    /// Lowers a parallel block. Every enclosing block is marked as
    /// containing a fork; the walk stops at the first block already
    /// marked, since everything above it was marked by an earlier fork.
    pub(crate) fn lower_fork(
        &mut self,
        name: Option<Identifier>,
        contains_fork: bool,
        stmts: Vec<Stmt>,
        span: Span,
        out: &mut Vec<Stmt>,
    ) {
        for scope in self.block_stack.iter_mut().rev() {
            if scope.contains_fork {
                break;
            }
            scope.contains_fork = true;
        }

        self.block_stack.push(BlockScope {
            name,
            is_fork: true,
            contains_fork,
            exit_label: None,
        });
        let saved_in_fork = mem::replace(&mut self.in_fork, true);
        let body = self.lower_stmt_list(stmts);
        self.in_fork = saved_in_fork;
        let scope = self.block_stack.pop().expect("block stack underflow");

        // disable of a fork is rejected, so no exit label can exist here
        out.push(Stmt::new(
            StmtKind::Fork {
                name,
                contains_fork: scope.contains_fork,
                stmts: body,
            },
            span,
        ));
    }
}
