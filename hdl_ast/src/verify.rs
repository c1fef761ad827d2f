//! Consistency check for the lowered jump structure. Runs after passes
//! that create or clone `JumpBlock`s; any violation means a pass bug.

use crate::statements::{child_lists, LabelId, Stmt, StmtKind};
use crate::{ModuleItem, Netlist};
use std::collections::HashMap;

/// Checks every jump-related link in the netlist:
/// each `JumpBlock` ends with the `JumpLabel` it owns, no label is defined
/// twice, no `JumpLabel` floats outside a `JumpBlock` tail, and every
/// `JumpGo` targets a defined label. Returns one message per violation.
pub fn check_links(netlist: &Netlist) -> Vec<String> {
    let mut state = CheckState {
        defined: HashMap::new(),
        used: Vec::new(),
        violations: Vec::new(),
    };

    for module in netlist.get_modules_ref() {
        for item in module.get_items_ref() {
            let stmts = match item {
                ModuleItem::Ftask(ftask) => ftask.get_stmts_ref(),
                ModuleItem::Process(process) => process.get_stmts_ref(),
            };
            state.walk_list(stmts);
        }
    }

    for (label, count) in &state.defined {
        if *count > 1 {
            state
                .violations
                .push(format!("label L{} defined {} times", label.index(), count));
        }
    }
    for label in &state.used {
        if !state.defined.contains_key(label) {
            state
                .violations
                .push(format!("JumpGo targets undefined label L{}", label.index()));
        }
    }

    state.violations
}

struct CheckState {
    defined: HashMap<LabelId, usize>,
    used: Vec<LabelId>,
    violations: Vec<String>,
}

impl CheckState {
    fn walk_list(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt.get_kind_ref() {
            StmtKind::JumpBlock { label, stmts } => {
                *self.defined.entry(*label).or_insert(0) += 1;

                let tail_matches = matches!(
                    stmts.last().map(Stmt::get_kind_ref),
                    Some(StmtKind::JumpLabel(tail)) if tail == label
                );
                if !tail_matches {
                    self.violations.push(format!(
                        "JumpBlock L{} does not end with its own JumpLabel",
                        label.index()
                    ));
                }

                // the sanctioned tail label was accounted for above
                let body = if tail_matches {
                    &stmts[..stmts.len() - 1]
                } else {
                    &stmts[..]
                };
                self.walk_list(body);
            }

            StmtKind::JumpLabel(label) => {
                self.violations.push(format!(
                    "JumpLabel L{} outside the tail of its JumpBlock",
                    label.index()
                ));
            }

            StmtKind::JumpGo(label) => self.used.push(*label),

            kind => {
                for list in child_lists(kind) {
                    self.walk_list(list);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FtaskKind, FunctionOrTask, Module, Netlist};
    use shared_context::{Identifier, Span};

    fn stmt(kind: StmtKind) -> Stmt {
        Stmt::new(kind, Span::default())
    }

    fn netlist_with_body(stmts: Vec<Stmt>) -> Netlist {
        let ftask = FunctionOrTask::new(
            Identifier::default(),
            FtaskKind::Task,
            stmts,
            Span::default(),
        );
        let module = Module::new(
            Identifier::default(),
            false,
            false,
            vec![ModuleItem::Ftask(ftask)],
            Span::default(),
        );
        Netlist::new(vec![module])
    }

    #[test]
    fn well_formed_jump_block_passes() {
        let label = LabelId::new(0);
        let netlist = netlist_with_body(vec![stmt(StmtKind::JumpBlock {
            label,
            stmts: vec![stmt(StmtKind::JumpGo(label)), stmt(StmtKind::JumpLabel(label))],
        })]);
        assert_eq!(check_links(&netlist), Vec::<String>::new());
    }

    #[test]
    fn dangling_go_and_stray_label_are_reported() {
        let netlist = netlist_with_body(vec![
            stmt(StmtKind::JumpGo(LabelId::new(7))),
            stmt(StmtKind::JumpLabel(LabelId::new(8))),
        ]);
        let violations = check_links(&netlist);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.contains("undefined label L7")));
        assert!(violations.iter().any(|v| v.contains("JumpLabel L8 outside")));
    }

    #[test]
    fn block_without_tail_label_is_reported() {
        let label = LabelId::new(0);
        let netlist = netlist_with_body(vec![stmt(StmtKind::JumpBlock {
            label,
            stmts: vec![stmt(StmtKind::Break)],
        })]);
        let violations = check_links(&netlist);
        assert!(violations
            .iter()
            .any(|v| v.contains("does not end with its own JumpLabel")));
    }
}
