//! Recursive-descent parser over the token stream.
//!
//! A syntax error abandons the current paragraph, records a diagnostic and
//! resumes at the next declaration, so one pass reports every broken
//! paragraph.

use super::ast::{
    CmpOp, Command, CommandKind, Formula, IntExpr, Module, Multiplicity, NameRef, Paragraph,
    Quantifier, Sig, Target,
};
use super::lexer::{Spanned, Token};
use crate::engine::{Diagnostics, Pos};

const RESERVED: &[&str] = &[
    "module", "sig", "abstract", "one", "lone", "some", "no", "extends", "fact", "pred", "assert",
    "run", "check", "for", "and", "or", "not", "implies",
];

/// Deepest formula nesting accepted; parsing, checking and solving all
/// recurse once per level.
const MAX_NESTING: usize = 128;

const PARAGRAPH_START: &[&str] = &[
    "module", "sig", "abstract", "one", "lone", "some", "fact", "pred", "assert", "run", "check",
];

struct SyntaxError {
    pos: Pos,
    message: String,
}

type PResult<T> = Result<T, SyntaxError>;

/// Parse a token stream ending in `Token::Eof`.
pub fn parse(tokens: &[Spanned], diagnostics: &mut Diagnostics) -> (Module, Vec<Command>) {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        nesting: 0,
        module: Module::default(),
        commands: Vec::new(),
    };

    while !parser.at(&Token::Eof) {
        parser.depth = 0;
        parser.nesting = 0;
        if let Err(err) = parser.paragraph() {
            diagnostics.error(Some(err.pos), err.message);
            parser.recover();
        }
    }

    (parser.module, parser.commands)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    /// Braces opened and not yet closed inside the current paragraph.
    depth: usize,
    /// Formulas entered and not yet finished.
    nesting: usize,
    module: Module,
    commands: Vec<Command>,
}

impl<'a> Parser<'a> {
    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> &'a Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_nth(&self, n: usize) -> &'a Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)].token
    }

    fn advance(&mut self) -> &'a Spanned {
        let tok = self.peek();
        if tok.token != Token::Eof {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Token) -> bool {
        &self.peek().token == token
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().token.is_keyword(keyword)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error<T>(&self, expected: &str) -> PResult<T> {
        let tok = self.peek();
        Err(SyntaxError {
            pos: tok.pos,
            message: format!("expected {expected}, found {}", tok.token),
        })
    }

    fn expect(&mut self, token: &Token, expected: &str) -> PResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            self.error(expected)
        }
    }

    /// Run `f` one formula level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.nesting >= MAX_NESTING {
            return Err(SyntaxError {
                pos: self.peek().pos,
                message: format!("formula nested too deeply (limit {MAX_NESTING})"),
            });
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }

    fn name(&mut self, what: &str) -> PResult<NameRef> {
        let tok = self.peek();
        match &tok.token {
            Token::Ident(s) if !RESERVED.contains(&s.as_str()) => {
                self.advance();
                Ok(NameRef {
                    name: s.clone(),
                    pos: tok.pos,
                })
            }
            _ => self.error(what),
        }
    }

    /// Skip to the next token that can start a paragraph outside any braces.
    fn recover(&mut self) {
        let mut first = true;
        loop {
            let tok = &self.peek().token;
            match tok {
                Token::Eof => return,
                Token::Ident(k)
                    if !first && self.depth == 0 && PARAGRAPH_START.contains(&k.as_str()) =>
                {
                    return
                }
                Token::LBrace => self.depth += 1,
                Token::RBrace => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
            first = false;
        }
    }

    // ------------------------------------------------------------------
    // Paragraphs
    // ------------------------------------------------------------------

    fn paragraph(&mut self) -> PResult<()> {
        let keyword = match &self.peek().token {
            Token::Ident(k) => k.clone(),
            _ => return self.error("a declaration or command"),
        };

        match keyword.as_str() {
            "module" => {
                let pos = self.advance().pos;
                let name = self.name("module name")?;
                if self.module.name.is_some() {
                    return Err(SyntaxError {
                        pos,
                        message: "module is declared more than once".to_string(),
                    });
                }
                self.module.name = Some(name.name);
                Ok(())
            }
            "abstract" | "one" | "lone" | "some" | "sig" => self.sig_decl(),
            "fact" => {
                let pos = self.advance().pos;
                let name = match self.peek().token {
                    Token::LBrace => None,
                    _ => Some(self.name("fact name or `{`")?.name),
                };
                let body = self.block()?;
                self.module.facts.push(Paragraph { name, body, pos });
                Ok(())
            }
            "pred" | "assert" => {
                let pos = self.advance().pos;
                let what = if keyword == "pred" { "predicate name" } else { "assertion name" };
                let name = self.name(what)?;
                let body = self.block()?;
                let paragraph = Paragraph {
                    name: Some(name.name),
                    body,
                    pos,
                };
                if keyword == "pred" {
                    self.module.preds.push(paragraph);
                } else {
                    self.module.asserts.push(paragraph);
                }
                Ok(())
            }
            "run" | "check" => self.command(None),
            _ if *self.peek_nth(1) == Token::Colon => {
                let label = self.name("command label")?;
                self.advance();
                if self.at_keyword("run") || self.at_keyword("check") {
                    self.command(Some(label.name))
                } else {
                    self.error("`run` or `check` after command label")
                }
            }
            _ => self.error("a declaration or command"),
        }
    }

    fn sig_decl(&mut self) -> PResult<()> {
        let pos = self.peek().pos;
        let mut is_abstract = false;
        let mut multiplicity = None;

        loop {
            let modifier = match &self.peek().token {
                Token::Ident(k) => k.as_str(),
                _ => break,
            };
            let mult = match modifier {
                "abstract" => {
                    if is_abstract {
                        return self.error("`sig`");
                    }
                    is_abstract = true;
                    self.advance();
                    continue;
                }
                "one" => Multiplicity::One,
                "lone" => Multiplicity::Lone,
                "some" => Multiplicity::Some,
                _ => break,
            };
            if multiplicity.is_some() {
                return self.error("`sig`");
            }
            multiplicity = Some(mult);
            self.advance();
        }

        self.expect(&Token::Ident("sig".into()), "`sig`")?;

        let mut names = vec![self.name("signature name")?];
        while self.eat(&Token::Comma) {
            names.push(self.name("signature name")?);
        }

        let parent = if self.eat_keyword("extends") {
            Some(self.name("parent signature name")?)
        } else {
            None
        };

        self.expect(&Token::LBrace, "`{`")?;
        self.depth += 1;
        if !self.at(&Token::RBrace) {
            let tok = self.peek();
            return Err(SyntaxError {
                pos: tok.pos,
                message: "signature fields are not supported".to_string(),
            });
        }
        self.advance();
        self.depth -= 1;

        for name in names {
            self.module.sigs.push(Sig {
                name: name.name,
                is_abstract,
                multiplicity,
                parent: parent.clone(),
                pos,
            });
        }
        Ok(())
    }

    fn command(&mut self, label: Option<String>) -> PResult<()> {
        let start = self.advance();
        let kind = if start.token.is_keyword("run") {
            CommandKind::Run
        } else {
            CommandKind::Check
        };

        let target = if self.at(&Token::LBrace) {
            Target::Block(self.block()?)
        } else {
            let what = match kind {
                CommandKind::Run => "predicate name or `{`",
                CommandKind::Check => "assertion name or `{`",
            };
            Target::Named(self.name(what)?)
        };

        let scope = if self.eat_keyword("for") {
            match self.peek().token {
                Token::Int(n) => {
                    self.advance();
                    Some(n)
                }
                _ => return self.error("scope after `for`"),
            }
        } else {
            None
        };

        let label = match (label, &target) {
            (Some(label), _) => label,
            (None, Target::Named(name)) => name.name.clone(),
            (None, Target::Block(_)) => {
                let verb = match kind {
                    CommandKind::Run => "run",
                    CommandKind::Check => "check",
                };
                format!("{verb}${}", self.commands.len() + 1)
            }
        };

        self.commands.push(Command {
            label,
            kind,
            target,
            scope,
            pos: start.pos,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Formulas
    // ------------------------------------------------------------------

    fn block(&mut self) -> PResult<Vec<Formula>> {
        self.expect(&Token::LBrace, "`{`")?;
        self.depth += 1;
        let mut body = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.at(&Token::Eof) {
                return self.error("`}`");
            }
            body.push(self.formula()?);
        }
        self.advance();
        self.depth -= 1;
        Ok(body)
    }

    fn formula(&mut self) -> PResult<Formula> {
        self.nested(|p| {
            let lhs = p.disjunction()?;
            if p.eat(&Token::Implies) || p.eat_keyword("implies") {
                let rhs = p.formula()?;
                return Ok(Formula::Implies(Box::new(lhs), Box::new(rhs)));
            }
            Ok(lhs)
        })
    }

    fn disjunction(&mut self) -> PResult<Formula> {
        let mut lhs = self.conjunction()?;
        while self.eat(&Token::OrOr) || self.eat_keyword("or") {
            let rhs = self.conjunction()?;
            lhs = Formula::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn conjunction(&mut self) -> PResult<Formula> {
        let mut lhs = self.unary()?;
        while self.eat(&Token::AndAnd) || self.eat_keyword("and") {
            let rhs = self.unary()?;
            lhs = Formula::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> PResult<Formula> {
        if self.eat(&Token::Bang) || self.eat_keyword("not") {
            let inner = self.nested(Self::unary)?;
            return Ok(Formula::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> PResult<Formula> {
        match &self.peek().token {
            Token::LParen => {
                self.advance();
                let inner = self.formula()?;
                self.expect(&Token::RParen, "`)`")?;
                Ok(inner)
            }
            Token::LBrace => Ok(Formula::Block(self.block()?)),
            Token::Hash | Token::Int(_) | Token::Minus => self.comparison(),
            Token::Ident(k) => {
                let quantifier = match k.as_str() {
                    "some" => Some(Quantifier::Some),
                    "no" => Some(Quantifier::No),
                    "one" => Some(Quantifier::One),
                    "lone" => Some(Quantifier::Lone),
                    _ => None,
                };
                match quantifier {
                    Some(q) => {
                        self.advance();
                        Ok(Formula::Quantified(q, self.name("signature name")?))
                    }
                    None => Ok(Formula::Call(self.name("formula")?)),
                }
            }
            _ => self.error("formula"),
        }
    }

    fn comparison(&mut self) -> PResult<Formula> {
        let lhs = self.int_expr()?;
        let op = match self.peek().token {
            Token::Eq => CmpOp::Eq,
            Token::NotEq => CmpOp::NotEq,
            Token::Lt => CmpOp::Lt,
            Token::Le => CmpOp::Le,
            Token::Gt => CmpOp::Gt,
            Token::Ge => CmpOp::Ge,
            _ => return self.error("comparison operator"),
        };
        self.advance();
        let rhs = self.int_expr()?;
        Ok(Formula::Compare(op, lhs, rhs))
    }

    fn int_expr(&mut self) -> PResult<IntExpr> {
        let mut lhs = self.int_term()?;
        loop {
            if self.eat(&Token::Plus) {
                lhs = IntExpr::Add(Box::new(lhs), Box::new(self.int_term()?));
            } else if self.eat(&Token::Minus) {
                lhs = IntExpr::Sub(Box::new(lhs), Box::new(self.int_term()?));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn int_term(&mut self) -> PResult<IntExpr> {
        match self.peek().token {
            Token::Hash => {
                self.advance();
                Ok(IntExpr::Card(self.name("signature name after `#`")?))
            }
            Token::Int(n) => {
                self.advance();
                Ok(IntExpr::Literal(i64::from(n)))
            }
            Token::Minus => {
                self.advance();
                match self.peek().token {
                    Token::Int(n) => {
                        self.advance();
                        Ok(IntExpr::Literal(-i64::from(n)))
                    }
                    _ => self.error("integer literal after `-`"),
                }
            }
            _ => self.error("integer expression"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::lexer::tokenize;

    fn parse_source(source: &str) -> (Module, Vec<Command>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, &mut diagnostics);
        let (module, commands) = parse(&tokens, &mut diagnostics);
        (module, commands, diagnostics)
    }

    #[test]
    fn parses_declarations_and_commands() {
        let (module, commands, diagnostics) = parse_source(
            "module people\n\
             abstract sig Person {}\n\
             one sig Alice, Bob extends Person {}\n\
             fact { #Person <= 3 }\n\
             pred show { some Person }\n\
             assert inv { lone Alice }\n\
             run show for 4\n\
             check inv\n\
             named: run { no Person }",
        );
        assert!(!diagnostics.has_errors(), "{}", diagnostics.render());
        assert_eq!(module.name.as_deref(), Some("people"));
        assert_eq!(module.sigs.len(), 3);
        assert_eq!(module.sigs[1].multiplicity, Some(Multiplicity::One));
        assert_eq!(module.sigs[2].parent.as_ref().map(|p| p.name.as_str()), Some("Person"));
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].to_string(), "Run show for 4");
        assert_eq!(commands[1].to_string(), "Check inv");
        assert_eq!(commands[2].label, "named");
    }

    #[test]
    fn anonymous_commands_are_numbered() {
        let (_, commands, diagnostics) = parse_source("run {} check { some A } for 2");
        assert!(!diagnostics.has_errors());
        assert_eq!(commands[0].label, "run$1");
        assert_eq!(commands[1].to_string(), "Check check$2 for 2");
    }

    #[test]
    fn operator_precedence() {
        let (module, _, _) = parse_source("pred p { some A or some B and no C => one D }");
        let body = &module.preds[0].body;
        assert_eq!(body.len(), 1);
        match &body[0] {
            Formula::Implies(lhs, _) => assert!(matches!(**lhs, Formula::Or(_, _))),
            other => panic!("expected implication, got {other:?}"),
        }
    }

    #[test]
    fn recovers_and_reports_every_broken_paragraph() {
        let (module, commands, diagnostics) = parse_source(
            "sig A {}\n\
             pred broken { some }\n\
             sig B { field }\n\
             fact { #A = }\n\
             run {}",
        );
        assert_eq!(diagnostics.errors().count(), 3, "{}", diagnostics.render());
        assert_eq!(module.sigs.len(), 1);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn nesting_is_bounded() {
        let ok = format!("run {{ {}some A{} }}", "(".repeat(100), ")".repeat(100));
        let (_, commands, diagnostics) = parse_source(&ok);
        assert!(!diagnostics.has_errors(), "{}", diagnostics.render());
        assert_eq!(commands.len(), 1);

        for deep in [
            format!("run {{ {}some A{} }}", "(".repeat(5000), ")".repeat(5000)),
            format!("run {{ {}some A }}", "not ".repeat(5000)),
            format!("run {{ {}some A{} }}", "{ ".repeat(5000), " }".repeat(5000)),
            format!("run {{ some A{} }}", " => some A".repeat(5000)),
        ] {
            let source = format!("{deep}\nsig A {{}}");
            let (module, commands, diagnostics) = parse_source(&source);
            assert_eq!(diagnostics.errors().count(), 1, "{}", diagnostics.render());
            assert!(diagnostics.render().contains("formula nested too deeply"));
            assert!(commands.is_empty());
            assert_eq!(module.sigs.len(), 1);
        }
    }

    #[test]
    fn keywords_are_not_names() {
        let (_, _, diagnostics) = parse_source("sig run {}");
        assert!(diagnostics.render().contains("expected signature name, found `run`"));
    }
}
