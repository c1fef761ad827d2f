use crate::expressions::{Access, Expression};
use crate::statements::{Stmt, StmtKind, Var};
use crate::{FtaskKind, FunctionOrTask, Module, ModuleItem, Netlist, Process, ProcessKind};
use shared_context::interner::Interner;
use shared_context::symbol_table::{Lifetime, Type};
use shared_context::Identifier;

/// Indented tree dump of a netlist. Rendering into a `String` lets tests
/// diff whole trees; `print` is the human entry point.
pub struct DebuggingPrinter<'a, 'src> {
    interner: &'a Interner<'src>,
}

impl<'a, 'src> DebuggingPrinter<'a, 'src> {
    pub fn new(interner: &'a Interner<'src>) -> Self {
        Self { interner }
    }

    pub fn print(&self, netlist: &Netlist) {
        print!("{}", self.dump(netlist));
    }

    pub fn dump(&self, netlist: &Netlist) -> String {
        let mut out = String::new();
        out.push_str("Netlist\n");
        for module in netlist.get_modules_ref() {
            self.dump_module(module, 2, &mut out);
        }
        out
    }

    fn name_of(&self, identifier: Identifier) -> &'src str {
        self.interner.lookup(identifier.get_symbol())
    }

    fn dump_module(&self, module: &Module, indent: usize, out: &mut String) {
        let pad = " ".repeat(indent);
        out.push_str(&format!("{}Module {}", pad, self.name_of(module.get_name())));
        if module.is_dead() {
            out.push_str(" (dead)");
        }
        if module.is_parameterized() {
            out.push_str(" (parameterized)");
        }
        out.push('\n');

        for item in module.get_items_ref() {
            match item {
                ModuleItem::Ftask(ftask) => self.dump_ftask(ftask, indent + 2, out),
                ModuleItem::Process(process) => self.dump_process(process, indent + 2, out),
            }
        }
    }

    fn dump_ftask(&self, ftask: &FunctionOrTask, indent: usize, out: &mut String) {
        let pad = " ".repeat(indent);
        match ftask.get_kind() {
            FtaskKind::Function {
                result,
                is_constructor,
            } => {
                out.push_str(&format!(
                    "{}Function {} -> {}",
                    pad,
                    self.name_of(ftask.get_name()),
                    self.name_of(result)
                ));
                if is_constructor {
                    out.push_str(" (constructor)");
                }
                out.push('\n');
            }
            FtaskKind::Task => {
                out.push_str(&format!("{}Task {}\n", pad, self.name_of(ftask.get_name())));
            }
        }
        self.dump_stmts(ftask.get_stmts_ref(), indent + 2, out);
    }

    fn dump_process(&self, process: &Process, indent: usize, out: &mut String) {
        let pad = " ".repeat(indent);
        let kind = match process.get_kind() {
            ProcessKind::Initial => "Initial",
            ProcessKind::Always => "Always",
            ProcessKind::Final => "Final",
        };
        out.push_str(&format!("{}{}\n", pad, kind));
        self.dump_stmts(process.get_stmts_ref(), indent + 2, out);
    }

    fn dump_stmts(&self, stmts: &[Stmt], indent: usize, out: &mut String) {
        for stmt in stmts {
            self.dump_stmt(stmt, indent, out);
        }
    }

    fn dump_stmt(&self, stmt: &Stmt, indent: usize, out: &mut String) {
        let pad = " ".repeat(indent);
        match stmt.get_kind_ref() {
            StmtKind::VarDecl(var) => self.dump_var(var, indent, out),

            StmtKind::Assign { lhs, rhs } => {
                out.push_str(&format!("{}Assign\n", pad));
                self.dump_expr(lhs, indent + 2, out);
                self.dump_expr(rhs, indent + 2, out);
            }

            StmtKind::ExprStmt(expr) => {
                out.push_str(&format!("{}ExprStmt\n", pad));
                self.dump_expr(expr, indent + 2, out);
            }

            StmtKind::If { cond, thens, elses } => {
                out.push_str(&format!("{}If\n", pad));
                out.push_str(&format!("{}  Cond\n", pad));
                self.dump_expr(cond, indent + 4, out);
                out.push_str(&format!("{}  Then\n", pad));
                self.dump_stmts(thens, indent + 4, out);
                if !elses.is_empty() {
                    out.push_str(&format!("{}  Else\n", pad));
                    self.dump_stmts(elses, indent + 4, out);
                }
            }

            StmtKind::Begin {
                name,
                contains_fork,
                stmts,
            } => {
                self.dump_block("Begin", *name, *contains_fork, pad, out);
                self.dump_stmts(stmts, indent + 2, out);
            }

            StmtKind::Fork {
                name,
                contains_fork,
                stmts,
            } => {
                self.dump_block("Fork", *name, *contains_fork, pad, out);
                self.dump_stmts(stmts, indent + 2, out);
            }

            StmtKind::While {
                preconds,
                cond,
                body,
                incs,
                unroll,
                suppress_unused,
            } => {
                out.push_str(&format!("{}While", pad));
                let mut flags = Vec::new();
                match unroll {
                    Some(crate::statements::UnrollMode::Full) => flags.push("unroll_full"),
                    Some(crate::statements::UnrollMode::Disable) => flags.push("unroll_disable"),
                    None => {}
                }
                if *suppress_unused {
                    flags.push("nowarn_unused");
                }
                if !flags.is_empty() {
                    out.push_str(&format!(" ({})", flags.join(", ")));
                }
                out.push('\n');
                if !preconds.is_empty() {
                    out.push_str(&format!("{}  Preconds\n", pad));
                    self.dump_stmts(preconds, indent + 4, out);
                }
                out.push_str(&format!("{}  Cond\n", pad));
                self.dump_expr(cond, indent + 4, out);
                out.push_str(&format!("{}  Body\n", pad));
                self.dump_stmts(body, indent + 4, out);
                if !incs.is_empty() {
                    out.push_str(&format!("{}  Incs\n", pad));
                    self.dump_stmts(incs, indent + 4, out);
                }
            }

            StmtKind::DoWhile { cond, body } => {
                out.push_str(&format!("{}DoWhile\n", pad));
                out.push_str(&format!("{}  Cond\n", pad));
                self.dump_expr(cond, indent + 4, out);
                out.push_str(&format!("{}  Body\n", pad));
                self.dump_stmts(body, indent + 4, out);
            }

            StmtKind::Repeat { count, body } => {
                out.push_str(&format!("{}Repeat\n", pad));
                out.push_str(&format!("{}  Count\n", pad));
                self.dump_expr(count, indent + 4, out);
                out.push_str(&format!("{}  Body\n", pad));
                self.dump_stmts(body, indent + 4, out);
            }

            StmtKind::Foreach { array, body } => {
                out.push_str(&format!("{}Foreach\n", pad));
                out.push_str(&format!("{}  Array\n", pad));
                self.dump_expr(array, indent + 4, out);
                out.push_str(&format!("{}  Body\n", pad));
                self.dump_stmts(body, indent + 4, out);
            }

            StmtKind::Return { value } => {
                out.push_str(&format!("{}Return\n", pad));
                if let Some(expr) = value {
                    self.dump_expr(expr, indent + 2, out);
                }
            }

            StmtKind::Break => out.push_str(&format!("{}Break\n", pad)),
            StmtKind::Continue => out.push_str(&format!("{}Continue\n", pad)),

            StmtKind::Disable { target } => {
                out.push_str(&format!("{}Disable {}\n", pad, self.name_of(*target)));
            }

            StmtKind::Pragma(kind) => {
                out.push_str(&format!("{}Pragma({:?})\n", pad, kind));
            }

            StmtKind::JumpBlock { label, stmts } => {
                out.push_str(&format!("{}JumpBlock L{}\n", pad, label.index()));
                self.dump_stmts(stmts, indent + 2, out);
            }

            StmtKind::JumpLabel(label) => {
                out.push_str(&format!("{}JumpLabel L{}\n", pad, label.index()));
            }

            StmtKind::JumpGo(label) => {
                out.push_str(&format!("{}JumpGo L{}\n", pad, label.index()));
            }
        }
    }

    fn dump_block(
        &self,
        keyword: &str,
        name: Option<Identifier>,
        contains_fork: bool,
        pad: String,
        out: &mut String,
    ) {
        out.push_str(&format!("{}{}", pad, keyword));
        if let Some(name) = name {
            out.push_str(&format!(" :{}", self.name_of(name)));
        }
        if contains_fork {
            out.push_str(" (contains fork)");
        }
        out.push('\n');
    }

    fn dump_var(&self, var: &Var, indent: usize, out: &mut String) {
        let pad = " ".repeat(indent);
        let type_text = match var.get_type() {
            Type::Int => "int".to_string(),
            Type::Logic(width) => format!("logic[{}]", width),
            Type::Ftask => "ftask".to_string(),
        };
        let lifetime_text = match var.get_lifetime() {
            Lifetime::Automatic => "automatic",
            Lifetime::Static => "static",
        };
        out.push_str(&format!(
            "{}VarDecl {} ({}, {})\n",
            pad,
            self.name_of(var.get_name()),
            type_text,
            lifetime_text
        ));
    }

    fn dump_expr(&self, expr: &Expression, indent: usize, out: &mut String) {
        let pad = " ".repeat(indent);
        match expr {
            Expression::Constant(value) => {
                out.push_str(&format!("{}Constant({})\n", pad, value));
            }

            Expression::VarRef { name, access } => {
                let direction = match access {
                    Access::Read => "rd",
                    Access::Write => "wr",
                };
                out.push_str(&format!(
                    "{}VarRef {} ({})\n",
                    pad,
                    self.name_of(*name),
                    direction
                ));
            }

            Expression::Unary { operator, operand } => {
                out.push_str(&format!("{}Unary({:?})\n", pad, operator));
                self.dump_expr(operand, indent + 2, out);
            }

            Expression::Binary {
                operator,
                operand1,
                operand2,
            } => {
                out.push_str(&format!("{}Binary({:?})\n", pad, operator));
                self.dump_expr(operand1, indent + 2, out);
                self.dump_expr(operand2, indent + 2, out);
            }
        }
    }
}
