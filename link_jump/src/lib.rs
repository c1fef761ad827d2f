// Control-flow lowering for the HDL compiler.
//
// Rewrites structured, non-local control flow (`return`, `break`,
// `continue`, `disable`, `repeat`, `do-while`) into the forward-only
// JumpBlock/JumpLabel/JumpGo triple, normalizes the loop forms the
// unroller expects, and reports control flow the language rules forbid.
// Runs after the binder, before the unroller; afterwards no Return, Break,
// Continue, Disable, Repeat, DoWhile or unroll-pragma node remains.

use hdl_ast::expressions::{for_each_var_ref, Expression};
use hdl_ast::print_ast::DebuggingPrinter;
use hdl_ast::statements::{LabelId, Stmt, StmtKind, UnrollMode};
use hdl_ast::{FtaskKind, FunctionOrTask, Module, ModuleItem, Netlist, Process};
use log::{debug, log_enabled, trace, Level};
use shared_context::interner::Interner;
use shared_context::source_map::SourceMap;
use shared_context::symbol_table::SymbolTable;
use shared_context::Identifier;
use std::mem;

mod control;
mod jumps;
pub mod link_error;
mod loops;

use link_error::{DiagnosticKind, LinkDiagnostic};

/// The entry point for control-flow lowering.
/// Consumes a netlist and produces the lowered netlist together with every
/// diagnostic found along the way; recoverable errors never abort the pass.
///
/// `var_counter` continues the numbering of earlier passes so variables
/// created here cannot collide with bound ones.
pub fn link_jumps<'src>(
    netlist: Netlist,
    interner: &mut Interner<'src>,
    symbol_table: &mut SymbolTable,
    source_map: &SourceMap<'src>,
    var_counter: usize,
) -> (Netlist, Vec<LinkDiagnostic>) {
    let mut pass = LinkJump::new(interner, symbol_table, source_map, var_counter);
    let linked = pass.link_netlist(netlist);
    let diagnostics = pass.take_diagnostics();
    (linked, diagnostics)
}

/// Lowers structured control flow into labels and forward jumps.
///
/// The pass walks each statement list once, rebuilding it bottom-up. While
/// descending it carries the enclosing loop, the enclosing function or
/// task, and the stack of enclosing blocks; each of those scopes lazily
/// allocates the label a jump out of it needs, and when the scope closes
/// the lowered statements are wrapped in the JumpBlock that owns the label.
pub struct LinkJump<'src, 'ctx> {
    /// Reference to the string interner, for the names of created
    /// counters and renamed blocks.
    interner: &'ctx mut Interner<'src>,

    /// Symbol table holding variable metadata; loop counters created here
    /// are registered and induction-variable uses are flagged.
    symbol_table: &'ctx mut SymbolTable,

    /// Source positions for diagnostics.
    source_map: &'ctx SourceMap<'src>,

    /// Diagnostics accumulated across the whole netlist.
    diagnostics: Vec<LinkDiagnostic>,

    /// Counter used to allocate jump label ids.
    label_counter: usize,

    /// Counter used to disambiguate variables created by this pass.
    var_counter: usize,

    /// Per-module counter naming repeat counters `__Vrepeat<N>`.
    mod_repeat_counter: usize,

    /// Whether the module being lowered is parameterized; its loops keep
    /// the unused-loop warning quiet.
    module_parameterized: bool,

    /// Scope of the function or task being lowered, if any.
    current_ftask: Option<FtaskScope>,

    /// Scope of the innermost enclosing loop, if any.
    current_loop: Option<LoopScope>,

    /// Enclosing begin/fork blocks, innermost last; `disable` resolves its
    /// target name against this stack.
    block_stack: Vec<BlockScope>,

    /// True once any enclosing block is a fork.
    in_fork: bool,

    /// True while lowering a while loop's increment statements.
    in_loop_increment: bool,

    /// Most recent unroll pragma not yet attached to a loop.
    unroll_pending: Option<UnrollMode>,
}

/// Lazily allocated labels of the loop currently being lowered.
/// `break_label` exits past the whole loop, `continue_label` jumps to the
/// end of the body so the increment still runs.
#[derive(Default)]
struct LoopScope {
    break_label: Option<LabelId>,
    continue_label: Option<LabelId>,
}

/// Scope of the function or task being lowered; `exit_label` is the
/// shared target of every `return` inside it.
struct FtaskScope {
    kind: FtaskKind,
    exit_label: Option<LabelId>,
}

impl FtaskScope {
    fn new(kind: FtaskKind) -> Self {
        Self {
            kind,
            exit_label: None,
        }
    }
}

/// One enclosing block on the stack. `contains_fork` is set the moment a
/// fork is entered anywhere below; `exit_label` is allocated by the first
/// `disable` naming this block.
struct BlockScope {
    name: Option<Identifier>,
    is_fork: bool,
    contains_fork: bool,
    exit_label: Option<LabelId>,
}

impl<'src, 'ctx> LinkJump<'src, 'ctx> {
    /// Creates a new lowering pass.
    ///
    /// # Parameters
    /// - `interner`: shared string interner
    /// - `symbol_table`: variable metadata from the binder
    /// - `source_map`: source positions for diagnostics
    /// - `var_counter`: first free number for created variables
    pub fn new(
        interner: &'ctx mut Interner<'src>,
        symbol_table: &'ctx mut SymbolTable,
        source_map: &'ctx SourceMap<'src>,
        var_counter: usize,
    ) -> Self {
        Self {
            interner,
            symbol_table,
            source_map,
            diagnostics: Vec::new(),
            label_counter: 0,
            var_counter,
            mod_repeat_counter: 0,
            module_parameterized: false,
            current_ftask: None,
            current_loop: None,
            block_stack: Vec::new(),
            in_fork: false,
            in_loop_increment: false,
            unroll_pending: None,
        }
    }

    /// Hands out the accumulated diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<LinkDiagnostic> {
        mem::take(&mut self.diagnostics)
    }

    /// Lowers every live module of the netlist.
    pub fn link_netlist(&mut self, netlist: Netlist) -> Netlist {
        debug!(
            "linking jumps across {} modules",
            netlist.get_modules_ref().len()
        );
        if log_enabled!(Level::Trace) {
            let printer = DebuggingPrinter::new(self.interner);
            trace!("netlist before jump linking:\n{}", printer.dump(&netlist));
        }

        let modules = netlist.into_parts();
        let mut linked = Vec::with_capacity(modules.len());
        for module in modules {
            linked.push(self.link_module(module));
        }
        let linked = Netlist::new(linked);

        if log_enabled!(Level::Trace) {
            let printer = DebuggingPrinter::new(self.interner);
            trace!("netlist after jump linking:\n{}", printer.dump(&linked));
        }
        if cfg!(debug_assertions) {
            let violations = hdl_ast::verify::check_links(&linked);
            assert!(
                violations.is_empty(),
                "jump links inconsistent after lowering: {:?}",
                violations
            );
        }

        linked
    }

    /// Lowers a single module; dead modules pass through untouched.
    fn link_module(&mut self, module: Module) -> Module {
        if module.is_dead() {
            return module;
        }
        debug!(
            "linking jumps in module {}",
            self.interner.lookup(module.get_name().get_symbol())
        );

        let (name, dead, parameterized, items, span) = module.into_parts();
        self.mod_repeat_counter = 0;
        let saved_parameterized = mem::replace(&mut self.module_parameterized, parameterized);
        let saved_unroll = self.unroll_pending.take();

        let mut linked_items = Vec::with_capacity(items.len());
        for item in items {
            let linked = match item {
                ModuleItem::Ftask(ftask) => ModuleItem::Ftask(self.link_ftask(ftask)),
                ModuleItem::Process(process) => ModuleItem::Process(self.link_process(process)),
            };
            linked_items.push(linked);
        }

        self.module_parameterized = saved_parameterized;
        self.unroll_pending = saved_unroll;
        Module::new(name, dead, parameterized, linked_items, span)
    }

    /// Lowers a function or task body. If any `return` inside asked for the
    /// exit label, the body is wrapped so the label sits past the last
    /// statement, with declarations kept outside the wrap.
    fn link_ftask(&mut self, ftask: FunctionOrTask) -> FunctionOrTask {
        let (name, kind, stmts, span) = ftask.into_parts();
        let saved_scope = mem::replace(&mut self.current_ftask, Some(FtaskScope::new(kind)));
        let saved_unroll = self.unroll_pending.take();

        let mut body = self.lower_stmt_list(stmts);

        let scope = mem::replace(&mut self.current_ftask, saved_scope)
            .expect("function scope lost during lowering");
        if let Some(label) = scope.exit_label {
            body = self.wrap_in_jump_block(body, label, span);
        }
        self.unroll_pending = saved_unroll;
        FunctionOrTask::new(name, kind, body, span)
    }

    /// Lowers a procedural block. Processes are not jump anchors, so the
    /// body is only traversed, never wrapped.
    fn link_process(&mut self, process: Process) -> Process {
        let (kind, stmts, span) = process.into_parts();
        let saved_unroll = self.unroll_pending.take();
        let body = self.lower_stmt_list(stmts);
        self.unroll_pending = saved_unroll;
        Process::new(kind, body, span)
    }

    /// Lowers a statement list into a fresh one.
    pub(crate) fn lower_stmt_list(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        let mut out = Vec::new();
        for stmt in stmts {
            self.lower_stmt(stmt, &mut out);
        }
        out
    }

    /// Lowers a single statement. One input statement may produce any
    /// number of output statements, which is why results are pushed into
    /// `out` instead of returned.
    pub(crate) fn lower_stmt(&mut self, stmt: Stmt, out: &mut Vec<Stmt>) {
        let (kind, span) = stmt.into_parts();
        match kind {
            StmtKind::VarDecl(var) => out.push(Stmt::new(StmtKind::VarDecl(var), span)),

            StmtKind::Assign { lhs, rhs } => {
                self.note_var_refs(&lhs);
                self.note_var_refs(&rhs);
                out.push(Stmt::new(StmtKind::Assign { lhs, rhs }, span));
            }

            StmtKind::ExprStmt(expr) => {
                self.note_var_refs(&expr);
                out.push(Stmt::new(StmtKind::ExprStmt(expr), span));
            }

            StmtKind::If { cond, thens, elses } => {
                self.note_var_refs(&cond);
                let thens = self.lower_stmt_list(thens);
                let elses = self.lower_stmt_list(elses);
                out.push(Stmt::new(StmtKind::If { cond, thens, elses }, span));
            }

            StmtKind::Begin {
                name,
                contains_fork,
                stmts,
            } => self.lower_begin(name, contains_fork, stmts, span, out),

            StmtKind::Fork {
                name,
                contains_fork,
                stmts,
            } => self.lower_fork(name, contains_fork, stmts, span, out),

            StmtKind::While {
                preconds,
                cond,
                body,
                incs,
                unroll,
                suppress_unused,
            } => self.lower_while(preconds, cond, body, incs, unroll, suppress_unused, span, out),

            StmtKind::DoWhile { cond, body } => self.lower_do_while(cond, body, span, out),

            StmtKind::Repeat { count, body } => self.lower_repeat(count, body, span, out),

            StmtKind::Foreach { array, body } => self.lower_foreach(array, body, span, out),

            StmtKind::Return { value } => self.lower_return(value, span, out),

            StmtKind::Break => self.lower_break(span, out),

            StmtKind::Continue => self.lower_continue(span, out),

            StmtKind::Disable { target } => self.lower_disable(target, span, out),

            StmtKind::Pragma(pragma) => self.lower_pragma(pragma, span, out),

            // Already-lowered structure travels through unchanged, which
            // makes a second run of the pass a no-op.
            StmtKind::JumpBlock { label, stmts } => {
                let stmts = self.lower_stmt_list(stmts);
                out.push(Stmt::new(StmtKind::JumpBlock { label, stmts }, span));
            }

            StmtKind::JumpLabel(label) => out.push(Stmt::new(StmtKind::JumpLabel(label), span)),

            StmtKind::JumpGo(label) => out.push(Stmt::new(StmtKind::JumpGo(label), span)),
        }
    }

    /// While lowering a loop increment, every variable referenced is an
    /// induction candidate; flag it so optimization keeps its writes.
    pub(crate) fn note_var_refs(&mut self, expr: &Expression) {
        if !self.in_loop_increment {
            return;
        }
        for_each_var_ref(expr, &mut |name, _access| {
            self.symbol_table.mark_used_loop_idx(name);
        });
    }

    /// Records a diagnostic; the offending node is dropped by the caller
    /// so later passes never see it.
    pub(crate) fn report(&mut self, kind: DiagnosticKind) {
        self.diagnostics
            .push(LinkDiagnostic::new(kind, self.source_map, self.interner));
    }
}
