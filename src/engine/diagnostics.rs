use std::fmt;

/// One-based line and column in model source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub pos: Option<Pos>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match self.pos {
            Some(pos) => write!(f, "{label} at {pos}: {}", self.message),
            None => write!(f, "{label}: {}", self.message),
        }
    }
}

/// Collects every warning and error emitted while parsing and solving.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning(&mut self, pos: Option<Pos>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            pos,
            message: message.into(),
        });
    }

    pub fn error(&mut self, pos: Option<Pos>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            pos,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, errors first, one per line.
    pub fn render(&self) -> String {
        self.errors()
            .chain(self.warnings())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
