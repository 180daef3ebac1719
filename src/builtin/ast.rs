use std::fmt;

use crate::engine::{ModelCommand, Pos};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub name: Option<String>,
    pub sigs: Vec<Sig>,
    pub facts: Vec<Paragraph>,
    pub preds: Vec<Paragraph>,
    pub asserts: Vec<Paragraph>,
}

impl Module {
    pub fn pred(&self, name: &str) -> Option<&Paragraph> {
        self.preds.iter().find(|p| p.name.as_deref() == Some(name))
    }

    pub fn assertion(&self, name: &str) -> Option<&Paragraph> {
        self.asserts.iter().find(|p| p.name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    One,
    Lone,
    Some,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sig {
    pub name: String,
    pub is_abstract: bool,
    pub multiplicity: Option<Multiplicity>,
    pub parent: Option<NameRef>,
    pub pos: Pos,
}

/// A fact, predicate or assertion. Only facts may be anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub name: Option<String>,
    pub body: Vec<Formula>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRef {
    pub name: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Some,
    No,
    One,
    Lone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntExpr {
    Literal(i64),
    Card(NameRef),
    Add(Box<IntExpr>, Box<IntExpr>),
    Sub(Box<IntExpr>, Box<IntExpr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    Quantified(Quantifier, NameRef),
    Compare(CmpOp, IntExpr, IntExpr),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    /// Conjunction of the enclosed formulas.
    Block(Vec<Formula>),
    /// Reference to a predicate, inlined at evaluation.
    Call(NameRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Run,
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Named(NameRef),
    Block(Vec<Formula>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub label: String,
    pub kind: CommandKind,
    pub target: Target,
    pub scope: Option<u32>,
    pub pos: Pos,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            CommandKind::Run => "Run",
            CommandKind::Check => "Check",
        };
        write!(f, "{verb} {}", self.label)?;
        if let Some(scope) = self.scope {
            write!(f, " for {scope}")?;
        }
        Ok(())
    }
}

impl ModelCommand for Command {
    fn label(&self) -> &str {
        &self.label
    }
}
