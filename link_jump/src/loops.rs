// Loop normalization.
//
// This module rewrites the loop forms later passes refuse to see: `repeat`
// becomes a counted `while`, `do-while` becomes one inlined body run plus
// a `while`. Plain `while` and `foreach` keep their shape; they only pick
// up the pending unroll pragma and the labels their breaks and continues
// asked for.

use crate::{LinkJump, LoopScope};
use hdl_ast::expressions::{Access, BinaryOP, Expression};
use hdl_ast::statements::{
    clone_stmts_with_fresh_labels, rename_named_begins, Stmt, StmtKind, UnrollMode, Var,
};
use shared_context::symbol_table::{Lifetime, Type, VarAttrs};
use shared_context::{Identifier, Span, SpannedIdentifier};
use std::mem;

impl<'src, 'ctx> LinkJump<'src, 'ctx> {
    /// Lowers a `while` loop.
    ///
    /// The body and preconditions run under this loop's scope; the
    /// increment statements run with induction marking on. A continue
    /// label wraps the body, a break label wraps the whole loop:
    /// ```text
    /// while (c) { ...; continue; ...; break; ... }
    /// ```
    /// becomes:
    /// ```text
    /// JumpBlock L1 {
    ///   while (c) JumpBlock L0 { ...; JumpGo L0; ...; JumpGo L1; ...; JumpLabel L0 }
    ///   JumpLabel L1
    /// }
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn lower_while(
        &mut self,
        preconds: Vec<Stmt>,
        cond: Expression,
        body: Vec<Stmt>,
        incs: Vec<Stmt>,
        unroll: Option<UnrollMode>,
        suppress_unused: bool,
        span: Span,
        out: &mut Vec<Stmt>,
    ) {
        let mut unroll = unroll;
        if let Some(mode) = self.unroll_pending.take() {
            unroll = Some(mode);
        }
        // parameter values may legitimately zero the trip count
        let suppress_unused = suppress_unused || self.module_parameterized;

        let saved_loop = mem::replace(&mut self.current_loop, Some(LoopScope::default()));
        let saved_increment = mem::replace(&mut self.in_loop_increment, false);

        let preconds = self.lower_stmt_list(preconds);
        let body = self.lower_stmt_list(body);
        self.in_loop_increment = true;
        let incs = self.lower_stmt_list(incs);
        self.in_loop_increment = saved_increment;

        let scope = mem::replace(&mut self.current_loop, saved_loop)
            .expect("loop scope lost during lowering");
        let body = match scope.continue_label {
            Some(label) => self.wrap_in_jump_block(body, label, span),
            None => body,
        };

        let while_stmt = Stmt::new(
            StmtKind::While {
                preconds,
                cond,
                body,
                incs,
                unroll,
                suppress_unused,
            },
            span,
        );
        match scope.break_label {
            Some(label) => out.extend(self.wrap_in_jump_block(vec![while_stmt], label, span)),
            None => out.push(while_stmt),
        }
    }

    /// Lowers a `do-while` loop by running the body once ahead of a plain
    /// `while`:
    /// ```text
    /// do body while (c);
    /// ```
    /// becomes:
    /// ```text
    /// body_copy   // named begins prefixed __Vdo_while1_
    /// while (c)
    ///   body      // named begins prefixed __Vdo_while2_
    /// ```
    /// The copy gets fresh label ids for the labels defined inside it, so
    /// a continue in either run reaches its own end-of-body label, while
    /// breaks in both runs share the one exit label wrapped around
    /// everything. The new `while` never warns about an unused loop; the
    /// body already ran once.
    pub(crate) fn lower_do_while(
        &mut self,
        cond: Expression,
        body: Vec<Stmt>,
        span: Span,
        out: &mut Vec<Stmt>,
    ) {
        let saved_loop = mem::replace(&mut self.current_loop, Some(LoopScope::default()));
        let body = self.lower_stmt_list(body);
        let scope = mem::replace(&mut self.current_loop, saved_loop)
            .expect("loop scope lost during lowering");

        let mut body = match scope.continue_label {
            Some(label) => self.wrap_in_jump_block(body, label, span),
            None => body,
        };

        let unroll = self.unroll_pending.take();

        let mut first_run = clone_stmts_with_fresh_labels(&body, &mut || self.next_label());
        self.rename_begins(&mut first_run, "__Vdo_while1_");
        self.rename_begins(&mut body, "__Vdo_while2_");

        let while_stmt = Stmt::new(
            StmtKind::While {
                preconds: Vec::new(),
                cond,
                body,
                incs: Vec::new(),
                unroll,
                suppress_unused: true,
            },
            span,
        );

        let mut lowered = first_run;
        lowered.push(while_stmt);
        match scope.break_label {
            Some(label) => out.extend(self.wrap_in_jump_block(lowered, label, span)),
            None => out.extend(lowered),
        }
    }

    /// Lowers a `repeat` loop into a fresh down-counting `while`:
    /// ```text
    /// repeat (n) body
    /// ```
    /// becomes:
    /// ```text
    /// begin
    ///   int __Vrepeat0;
    ///   __Vrepeat0 = n;
    ///   while (__Vrepeat0 > 0) { body; __Vrepeat0 = __Vrepeat0 - 1; }
    /// end
    /// ```
    /// A negative count fails the `> 0` guard immediately, giving the zero
    /// iterations the standard requires. The replacement is fed back
    /// through the normal lowering path, so breaks inside the body bind to
    /// the new `while` and the decrement marks the counter as an
    /// induction variable.
    pub(crate) fn lower_repeat(
        &mut self,
        count: Expression,
        body: Vec<Stmt>,
        span: Span,
        out: &mut Vec<Stmt>,
    ) {
        let counter = self.make_repeat_counter(span);
        let counter_ref = |access| Expression::VarRef {
            name: counter,
            access,
        };

        let decl = Stmt::new(
            StmtKind::VarDecl(Var::new(counter, Type::Int, Lifetime::Automatic, span)),
            span,
        );
        let init = Stmt::new(
            StmtKind::Assign {
                lhs: counter_ref(Access::Write),
                rhs: count,
            },
            span,
        );
        let guard = Expression::Binary {
            operator: BinaryOP::Gt,
            operand1: Box::new(counter_ref(Access::Read)),
            operand2: Box::new(Expression::Constant(0)),
        };
        let decrement = Stmt::new(
            StmtKind::Assign {
                lhs: counter_ref(Access::Write),
                rhs: Expression::Binary {
                    operator: BinaryOP::Sub,
                    operand1: Box::new(counter_ref(Access::Read)),
                    operand2: Box::new(Expression::Constant(1)),
                },
            },
            span,
        );

        let unroll = self.unroll_pending.take();
        let while_stmt = Stmt::new(
            StmtKind::While {
                preconds: Vec::new(),
                cond: guard,
                body,
                incs: vec![decrement],
                unroll,
                suppress_unused: false,
            },
            span,
        );
        let replacement = Stmt::new(
            StmtKind::Begin {
                name: None,
                contains_fork: false,
                stmts: vec![decl, init, while_stmt],
            },
            span,
        );
        self.lower_stmt(replacement, out);
    }

    /// Lowers a `foreach` loop. The construct itself survives; only its
    /// break and continue labels are materialized, exactly like `while`.
    pub(crate) fn lower_foreach(
        &mut self,
        array: Expression,
        body: Vec<Stmt>,
        span: Span,
        out: &mut Vec<Stmt>,
    ) {
        let saved_loop = mem::replace(&mut self.current_loop, Some(LoopScope::default()));
        let body = self.lower_stmt_list(body);
        let scope = mem::replace(&mut self.current_loop, saved_loop)
            .expect("loop scope lost during lowering");

        let body = match scope.continue_label {
            Some(label) => self.wrap_in_jump_block(body, label, span),
            None => body,
        };

        let foreach_stmt = Stmt::new(StmtKind::Foreach { array, body }, span);
        match scope.break_label {
            Some(label) => out.extend(self.wrap_in_jump_block(vec![foreach_stmt], label, span)),
            None => out.push(foreach_stmt),
        }
    }

    /// Allocates and registers the counter variable for one `repeat`:
    /// automatic, signed 32-bit, flagged as a loop index from birth.
    fn make_repeat_counter(&mut self, span: Span) -> Identifier {
        let symbol = self
            .interner
            .intern_indexed("__Vrepeat", self.mod_repeat_counter);
        self.mod_repeat_counter += 1;
        let counter = Identifier::new(symbol, self.var_counter);
        self.var_counter += 1;

        let attrs = VarAttrs {
            lifetime: Lifetime::Automatic,
            used_loop_idx: true,
        };
        self.symbol_table
            .add(SpannedIdentifier::new(counter, span), Type::Int, attrs, span);
        counter
    }

    /// Prefixes the name of every named begin in the subtree. Called on
    /// both runs of a duplicated do-while body so block names downstream
    /// stay unique.
    fn rename_begins(&mut self, stmts: &mut [Stmt], prefix: &str) {
        rename_named_begins(stmts, &mut |name| {
            let (symbol, id) = name.into_parts();
            Identifier::new(self.interner.intern_prefixed(prefix, symbol), id)
        });
    }
}
