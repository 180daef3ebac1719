//! Name resolution over a syntactically valid module.

use std::collections::{HashMap, HashSet};

use super::ast::{Command, CommandKind, Formula, IntExpr, Module, NameRef, Target};
use crate::engine::{Diagnostics, Pos};

/// Report unknown or duplicate names, extends cycles and recursive
/// predicates. Unused predicates and repeated command labels are warnings.
pub fn check<'m>(module: &'m Module, commands: &'m [Command], diagnostics: &mut Diagnostics) {
    let mut checker = Checker {
        module,
        diagnostics,
        sigs: HashMap::new(),
        called: HashSet::new(),
    };
    checker.declarations();
    checker.hierarchy();
    checker.bodies(commands);
    checker.recursion();
    checker.commands(commands);
    checker.unused();
}

struct Checker<'m, 'd> {
    module: &'m Module,
    diagnostics: &'d mut Diagnostics,
    sigs: HashMap<&'m str, Pos>,
    called: HashSet<&'m str>,
}

impl<'m, 'd> Checker<'m, 'd> {
    fn declarations(&mut self) {
        let module = self.module;
        for sig in &module.sigs {
            if self.sigs.insert(&sig.name, sig.pos).is_some() {
                self.diagnostics
                    .error(Some(sig.pos), format!("duplicate signature `{}`", sig.name));
            }
        }

        let mut paragraphs: HashSet<&str> = HashSet::new();
        for paragraph in module.preds.iter().chain(&module.asserts) {
            if let Some(name) = paragraph.name.as_deref() {
                if !paragraphs.insert(name) {
                    self.diagnostics.error(
                        Some(paragraph.pos),
                        format!("duplicate predicate or assertion `{name}`"),
                    );
                }
            }
        }
    }

    fn hierarchy(&mut self) {
        let module = self.module;
        let parents: HashMap<&str, &NameRef> = module
            .sigs
            .iter()
            .filter_map(|s| s.parent.as_ref().map(|p| (s.name.as_str(), p)))
            .collect();

        for sig in &module.sigs {
            let Some(parent) = &sig.parent else { continue };
            if !self.sigs.contains_key(parent.name.as_str()) {
                self.diagnostics.error(
                    Some(parent.pos),
                    format!("`{}` extends unknown signature `{}`", sig.name, parent.name),
                );
                continue;
            }

            let mut current = parent.name.as_str();
            for _ in 0..module.sigs.len() {
                if current == sig.name {
                    self.diagnostics.error(
                        Some(sig.pos),
                        format!("signature `{}` is part of an extends cycle", sig.name),
                    );
                    break;
                }
                match parents.get(current) {
                    Some(next) => current = next.name.as_str(),
                    None => break,
                }
            }
        }
    }

    fn bodies(&mut self, commands: &'m [Command]) {
        let module = self.module;
        for paragraph in module.facts.iter().chain(&module.preds).chain(&module.asserts) {
            for formula in &paragraph.body {
                self.formula(formula);
            }
        }
        for command in commands {
            if let Target::Block(body) = &command.target {
                for formula in body {
                    self.formula(formula);
                }
            }
        }
    }

    fn formula(&mut self, formula: &'m Formula) {
        match formula {
            Formula::Quantified(_, sig) => self.sig_ref(sig),
            Formula::Compare(_, lhs, rhs) => {
                self.int_expr(lhs);
                self.int_expr(rhs);
            }
            Formula::Not(inner) => self.formula(inner),
            Formula::And(lhs, rhs) | Formula::Or(lhs, rhs) | Formula::Implies(lhs, rhs) => {
                self.formula(lhs);
                self.formula(rhs);
            }
            Formula::Block(body) => {
                for f in body {
                    self.formula(f);
                }
            }
            Formula::Call(name) => {
                self.called.insert(&name.name);
                if self.module.pred(&name.name).is_some() {
                    return;
                }
                let message = if self.module.assertion(&name.name).is_some() {
                    format!("`{}` is an assertion, not a predicate", name.name)
                } else {
                    format!("unknown predicate `{}`", name.name)
                };
                self.diagnostics.error(Some(name.pos), message);
            }
        }
    }

    fn int_expr(&mut self, expr: &'m IntExpr) {
        match expr {
            IntExpr::Literal(_) => {}
            IntExpr::Card(sig) => self.sig_ref(sig),
            IntExpr::Add(lhs, rhs) | IntExpr::Sub(lhs, rhs) => {
                self.int_expr(lhs);
                self.int_expr(rhs);
            }
        }
    }

    fn sig_ref(&mut self, sig: &NameRef) {
        if !self.sigs.contains_key(sig.name.as_str()) {
            self.diagnostics
                .error(Some(sig.pos), format!("unknown signature `{}`", sig.name));
        }
    }

    fn recursion(&mut self) {
        let module = self.module;
        for pred in &module.preds {
            let Some(name) = pred.name.as_deref() else { continue };
            if self.reaches(name, name, &mut HashSet::new()) {
                self.diagnostics
                    .error(Some(pred.pos), format!("predicate `{name}` is recursive"));
            }
        }
    }

    /// Whether `target` is reachable through calls made by predicate `from`.
    fn reaches(&self, from: &'m str, target: &str, seen: &mut HashSet<&'m str>) -> bool {
        if !seen.insert(from) {
            return false;
        }
        let module = self.module;
        let Some(pred) = module.pred(from) else { return false };
        let mut calls = Vec::new();
        for formula in &pred.body {
            collect_calls(formula, &mut calls);
        }
        calls
            .into_iter()
            .any(|call| call == target || self.reaches(call, target, seen))
    }

    fn commands(&mut self, commands: &'m [Command]) {
        let mut labels: HashSet<&str> = HashSet::new();
        for command in commands {
            if !labels.insert(&command.label) {
                self.diagnostics.warning(
                    Some(command.pos),
                    format!(
                        "command label `{}` is declared more than once; \
                         the first one is selected by name",
                        command.label
                    ),
                );
            }

            let Target::Named(name) = &command.target else { continue };
            if command.kind == CommandKind::Run {
                self.called.insert(&name.name);
            }
            match command.kind {
                CommandKind::Run if self.module.pred(&name.name).is_none() => {
                    self.diagnostics.error(
                        Some(name.pos),
                        format!("run target `{}` is not a predicate", name.name),
                    );
                }
                CommandKind::Check if self.module.assertion(&name.name).is_none() => {
                    self.diagnostics.error(
                        Some(name.pos),
                        format!("check target `{}` is not an assertion", name.name),
                    );
                }
                _ => {}
            }
        }
    }

    fn unused(&mut self) {
        let module = self.module;
        for pred in &module.preds {
            let Some(name) = pred.name.as_deref() else { continue };
            if !self.called.contains(name) {
                self.diagnostics
                    .warning(Some(pred.pos), format!("predicate `{name}` is never used"));
            }
        }
    }
}

fn collect_calls<'f>(formula: &'f Formula, calls: &mut Vec<&'f str>) {
    match formula {
        Formula::Call(name) => calls.push(&name.name),
        Formula::Not(inner) => collect_calls(inner, calls),
        Formula::And(lhs, rhs) | Formula::Or(lhs, rhs) | Formula::Implies(lhs, rhs) => {
            collect_calls(lhs, calls);
            collect_calls(rhs, calls);
        }
        Formula::Block(body) => body.iter().for_each(|f| collect_calls(f, calls)),
        Formula::Quantified(..) | Formula::Compare(..) => {}
    }
}
