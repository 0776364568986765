use std::fmt;

use tshape_ir::{TypeIdentity, UnsupportedKind};

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// What a diagnostic is about.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Location {
    /// A type, by identity.
    Type(TypeIdentity),
    /// A provider declaration, by name.
    Declaration(String),
    /// Nothing more specific is known.
    Unknown,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Type(id) => write!(f, "type `{id}`"),
            Location::Declaration(name) => write!(f, "declaration `{name}`"),
            Location::Unknown => write!(f, "<unknown>"),
        }
    }
}

/// A diagnostic record.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Severity level.
    pub severity: Severity,
    /// Main message.
    pub message: String,
    /// What the diagnostic concerns.
    pub location: Location,
    /// Additional notes providing context.
    pub notes: Vec<String>,
    /// Suggestions for fixing the problem.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            location: Location::Unknown,
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a suggestion for fixing the problem.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// The type this diagnostic concerns, if it concerns one.
    pub fn type_identity(&self) -> Option<&TypeIdentity> {
        match &self.location {
            Location::Type(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if self.location != Location::Unknown {
            write!(f, "\n  --> {}", self.location)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }
        Ok(())
    }
}

// Common diagnostic helpers

/// A declared root that cannot be shaped.
pub fn unsupported_root(root: TypeIdentity, reason: UnsupportedKind) -> Diagnostic {
    Diagnostic::error(ErrorCode::S0001)
        .with_message(format!("type `{root}` is not supported as a shape root"))
        .with_note(format!("{reason} cannot be shaped"))
        .at(Location::Type(root))
}

/// A provider declaration (or one of its containing declarations) that
/// cannot be extended with generated members.
pub fn provider_not_extensible(provider: &str, offending: &str) -> Diagnostic {
    let diag = Diagnostic::error(ErrorCode::S0002)
        .with_message(format!(
            "shape provider `{provider}` must be declared extensible"
        ))
        .at(Location::Declaration(provider.to_owned()));
    if offending == provider {
        diag.with_suggestion(format!("mark `{provider}` as extensible"))
    } else {
        diag.with_note(format!("containing declaration `{offending}` is not extensible"))
            .with_suggestion(format!("mark `{offending}` as extensible"))
    }
}

/// A discovered type the fact source knows nothing about.
pub fn missing_facts(ty: TypeIdentity) -> Diagnostic {
    Diagnostic::warning(ErrorCode::S1001)
        .with_message(format!("no structural facts for `{ty}`"))
        .with_note("the type is shaped as an object with no members")
        .at(Location::Type(ty))
}
