//! Bounded search over signature cardinalities.
//!
//! Every signature receives a count within its bounds; an assignment is a
//! solution when it respects the extends hierarchy, every fact and the
//! command's goal. `check` commands search for a violation of the assertion.

use std::collections::HashMap;
use std::ops::ControlFlow;

use super::ast::{
    CmpOp, Command, CommandKind, Formula, IntExpr, Module, Multiplicity, NameRef, Quantifier,
    Target,
};
use super::solution::{Instance, SigAtoms, Solution};
use crate::engine::{Diagnostics, EngineError, SolverConfig, SolvingEngine};

/// Scope used when neither the command nor the request provides one.
pub const DEFAULT_SCOPE: u32 = 3;

/// Assignments the engine may examine unless the request overrides it.
pub const DEFAULT_SEARCH_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// First solution in enumeration order.
    Exhaustive,
    /// Solution with the fewest atoms; ties go to the earliest.
    Minimal,
}

impl Strategy {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "exhaustive" => Some(Self::Exhaustive),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl SolvingEngine<Module, Command> for BuiltinEngine {
    type Solution = Solution;

    fn execute(
        &self,
        module: &Module,
        command: &Command,
        config: &SolverConfig,
        diagnostics: &mut Diagnostics,
    ) -> Result<Solution, EngineError> {
        if let Some(name) = config.extra.keys().next() {
            return Err(EngineError::Unsupported(format!(
                "solver option `{name}` is not recognized by the built-in engine"
            )));
        }
        let strategy = Strategy::from_id(&config.backend).ok_or_else(|| {
            EngineError::Unsupported(format!(
                "backend `{}` is not provided by the built-in engine",
                config.backend
            ))
        })?;

        let scope = command.scope.or(config.default_scope).unwrap_or(DEFAULT_SCOPE);
        let limit = config.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        let universe = Universe::new(module, scope, diagnostics);
        let size = universe.search_space().ok_or_else(|| {
            EngineError::Resource(format!("search space at scope {scope} is too large to count"))
        })?;
        if size > limit {
            return Err(EngineError::Resource(format!(
                "{size} candidate assignments at scope {scope} exceed the limit of {limit}"
            )));
        }

        let goal = goal(module, command)?;
        let found = match strategy {
            Strategy::Exhaustive => universe.first(&goal)?,
            Strategy::Minimal => universe.smallest(&goal)?,
        };

        Ok(Solution {
            kind: command.kind,
            instance: found.map(|counts| universe.instance(&counts)),
        })
    }
}

fn goal(module: &Module, command: &Command) -> Result<Formula, EngineError> {
    let body = match (&command.target, command.kind) {
        (Target::Block(body), _) => Formula::Block(body.clone()),
        (Target::Named(name), CommandKind::Run) => {
            if module.pred(&name.name).is_none() {
                return Err(EngineError::Type(format!("unknown predicate `{}`", name.name)));
            }
            Formula::Call(name.clone())
        }
        (Target::Named(name), CommandKind::Check) => {
            let assertion = module
                .assertion(&name.name)
                .ok_or_else(|| EngineError::Type(format!("unknown assertion `{}`", name.name)))?;
            Formula::Block(assertion.body.clone())
        }
    };

    Ok(match command.kind {
        CommandKind::Run => body,
        CommandKind::Check => Formula::Not(Box::new(body)),
    })
}

struct Universe<'m> {
    module: &'m Module,
    index: HashMap<&'m str, usize>,
    /// Inclusive cardinality bounds per signature.
    ranges: Vec<(u32, u32)>,
    children: Vec<Vec<usize>>,
}

impl<'m> Universe<'m> {
    fn new(module: &'m Module, scope: u32, diagnostics: &mut Diagnostics) -> Self {
        let index: HashMap<&str, usize> = module
            .sigs
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.as_str(), i))
            .collect();

        let mut children = vec![Vec::new(); module.sigs.len()];
        let mut ranges = Vec::with_capacity(module.sigs.len());
        for (i, sig) in module.sigs.iter().enumerate() {
            if let Some(parent) = sig.parent.as_ref().and_then(|p| index.get(p.name.as_str())) {
                children[*parent].push(i);
            }
            let range = match sig.multiplicity {
                Some(Multiplicity::One) => (1, 1),
                Some(Multiplicity::Lone) => (0, 1),
                Some(Multiplicity::Some) => {
                    if scope == 0 {
                        diagnostics.warning(
                            Some(sig.pos),
                            format!("scope 0 is too small for `some sig {}`; using 1", sig.name),
                        );
                    }
                    (1, scope.max(1))
                }
                None => (0, scope),
            };
            ranges.push(range);
        }

        Self {
            module,
            index,
            ranges,
            children,
        }
    }

    fn search_space(&self) -> Option<u64> {
        self.ranges
            .iter()
            .try_fold(1u64, |acc, &(lo, hi)| acc.checked_mul(u64::from(hi - lo) + 1))
    }

    /// Call `f` for every assignment; the last signature varies fastest.
    fn visit(
        &self,
        mut f: impl FnMut(&[u32]) -> Result<ControlFlow<()>, EngineError>,
    ) -> Result<(), EngineError> {
        let mut counts: Vec<u32> = self.ranges.iter().map(|&(lo, _)| lo).collect();
        loop {
            if f(&counts)?.is_break() {
                return Ok(());
            }
            let mut i = counts.len();
            loop {
                if i == 0 {
                    return Ok(());
                }
                i -= 1;
                if counts[i] < self.ranges[i].1 {
                    counts[i] += 1;
                    break;
                }
                counts[i] = self.ranges[i].0;
            }
        }
    }

    fn first(&self, goal: &Formula) -> Result<Option<Vec<u32>>, EngineError> {
        let mut found = None;
        self.visit(|counts| {
            if self.admits(counts, goal)? {
                found = Some(counts.to_vec());
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(found)
    }

    fn smallest(&self, goal: &Formula) -> Result<Option<Vec<u32>>, EngineError> {
        let mut best: Option<(u64, Vec<u32>)> = None;
        self.visit(|counts| {
            if self.admits(counts, goal)? {
                let size = self.atom_count(counts);
                if best.as_ref().map_or(true, |(b, _)| size < *b) {
                    best = Some((size, counts.to_vec()));
                }
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(best.map(|(_, counts)| counts))
    }

    /// Distinct atoms: subsignature atoms are shared with their parent.
    fn atom_count(&self, counts: &[u32]) -> u64 {
        self.module
            .sigs
            .iter()
            .zip(counts)
            .filter(|(sig, _)| sig.parent.is_none())
            .map(|(_, &n)| u64::from(n))
            .sum()
    }

    fn admits(&self, counts: &[u32], goal: &Formula) -> Result<bool, EngineError> {
        if !self.hierarchy_holds(counts) {
            return Ok(false);
        }
        for fact in &self.module.facts {
            if !self.all(&fact.body, counts)? {
                return Ok(false);
            }
        }
        self.holds(goal, counts)
    }

    fn hierarchy_holds(&self, counts: &[u32]) -> bool {
        self.children.iter().enumerate().all(|(i, kids)| {
            if kids.is_empty() {
                return true;
            }
            let sum: u64 = kids.iter().map(|&k| u64::from(counts[k])).sum();
            let own = u64::from(counts[i]);
            if self.module.sigs[i].is_abstract {
                sum == own
            } else {
                sum <= own
            }
        })
    }

    fn all(&self, body: &[Formula], counts: &[u32]) -> Result<bool, EngineError> {
        for formula in body {
            if !self.holds(formula, counts)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn holds(&self, formula: &Formula, counts: &[u32]) -> Result<bool, EngineError> {
        Ok(match formula {
            Formula::Quantified(q, sig) => {
                let n = self.card(sig, counts)?;
                match q {
                    Quantifier::Some => n >= 1,
                    Quantifier::No => n == 0,
                    Quantifier::One => n == 1,
                    Quantifier::Lone => n <= 1,
                }
            }
            Formula::Compare(op, lhs, rhs) => {
                let (l, r) = (self.eval(lhs, counts)?, self.eval(rhs, counts)?);
                match op {
                    CmpOp::Eq => l == r,
                    CmpOp::NotEq => l != r,
                    CmpOp::Lt => l < r,
                    CmpOp::Le => l <= r,
                    CmpOp::Gt => l > r,
                    CmpOp::Ge => l >= r,
                }
            }
            Formula::Not(inner) => !self.holds(inner, counts)?,
            Formula::And(lhs, rhs) => self.holds(lhs, counts)? && self.holds(rhs, counts)?,
            Formula::Or(lhs, rhs) => self.holds(lhs, counts)? || self.holds(rhs, counts)?,
            Formula::Implies(lhs, rhs) => !self.holds(lhs, counts)? || self.holds(rhs, counts)?,
            Formula::Block(body) => self.all(body, counts)?,
            Formula::Call(name) => {
                let pred = self.module.pred(&name.name).ok_or_else(|| {
                    EngineError::Type(format!("unknown predicate `{}`", name.name))
                })?;
                self.all(&pred.body, counts)?
            }
        })
    }

    fn eval(&self, expr: &IntExpr, counts: &[u32]) -> Result<i64, EngineError> {
        Ok(match expr {
            IntExpr::Literal(n) => *n,
            IntExpr::Card(sig) => i64::from(self.card(sig, counts)?),
            IntExpr::Add(lhs, rhs) => {
                self.eval(lhs, counts)?.saturating_add(self.eval(rhs, counts)?)
            }
            IntExpr::Sub(lhs, rhs) => {
                self.eval(lhs, counts)?.saturating_sub(self.eval(rhs, counts)?)
            }
        })
    }

    fn card(&self, sig: &NameRef, counts: &[u32]) -> Result<u32, EngineError> {
        self.index
            .get(sig.name.as_str())
            .map(|&i| counts[i])
            .ok_or_else(|| EngineError::Type(format!("unknown signature `{}`", sig.name)))
    }

    fn instance(&self, counts: &[u32]) -> Instance {
        let sigs = self
            .module
            .sigs
            .iter()
            .enumerate()
            .map(|(i, sig)| SigAtoms {
                name: sig.name.clone(),
                atoms: self.atoms(i, counts),
            })
            .collect();
        Instance { sigs }
    }

    /// Children's atoms first, then the signature's own.
    fn atoms(&self, i: usize, counts: &[u32]) -> Vec<String> {
        let mut atoms = Vec::new();
        let mut inherited = 0u32;
        for &child in &self.children[i] {
            atoms.extend(self.atoms(child, counts));
            inherited = inherited.saturating_add(counts[child]);
        }
        let own = counts[i].saturating_sub(inherited);
        let name = &self.module.sigs[i].name;
        atoms.extend((0..own).map(|n| format!("{name}${n}")));
        atoms
    }
}
