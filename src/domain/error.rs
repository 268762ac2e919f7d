//! Domain error types.
//!
//! Lexical and grammar failures carry the offending rule text and the byte
//! position they were detected at, so callers can point at the exact spot.

/// `position` is a byte offset; the padding counts characters and keeps tabs
/// so the caret lines up under the rule as printed.
fn caret_context(rule: &str, position: usize, err: &dyn std::fmt::Display) -> String {
    let pad: String = match rule.get(..position) {
        Some(prefix) => prefix
            .chars()
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect(),
        None => " ".repeat(position),
    };
    format!("{rule}\n{pad}^\n{err}")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unknown identifier '{0}' (expected OPEN, HIGH, LOW or CLOSE)")]
    UnknownIdentifier(String),
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("expected '[' offset after price identifier")]
    MissingOffset,
    #[error("malformed offset '{0}'")]
    MalformedOffset(String),
    #[error("offset must be non-negative")]
    NegativeOffset,
    #[error("unterminated '[' offset")]
    UnterminatedBracket,
}

/// A lexical error in a single rule string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lex error at position {position} in rule '{rule}': {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub rule: String,
    pub position: usize,
}

impl LexError {
    /// Format the error with a caret pointing at the error position in the rule.
    pub fn display_with_context(&self) -> String {
        caret_context(&self.rule, self.position, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingComparison,
    MultipleComparisons,
    NestedComparison,
    UnbalancedParens,
    TrailingInput,
    EmptyOperand,
    TooDeep,
}

/// A grammar violation in a single rule string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at position {position} in rule '{rule}': {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub rule: String,
    pub position: usize,
    pub message: String,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the rule.
    pub fn display_with_context(&self) -> String {
        caret_context(&self.rule, self.position, self)
    }
}

/// Top-level error type for ruleconv.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("rule set is empty: a condition needs at least one rule")]
    EmptyRuleSet,

    #[error("internal emission error for rule '{rule}': {reason}")]
    Emission { rule: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown platform '{name}' (expected mql4, mql5, pine or ctrader)")]
    UnknownPlatform { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TranslateError {
    /// Caret-annotated message for rule errors, plain message otherwise.
    pub fn display_with_context(&self) -> String {
        match self {
            TranslateError::Lex(e) => e.display_with_context(),
            TranslateError::Parse(e) => e.display_with_context(),
            other => other.to_string(),
        }
    }

    /// Process exit status: 1 I/O, 2 config, 4 rule, 5 internal.
    pub fn exit_status(&self) -> u8 {
        match self {
            TranslateError::Io(_) => 1,
            TranslateError::ConfigParse { .. }
            | TranslateError::ConfigMissing { .. }
            | TranslateError::ConfigInvalid { .. }
            | TranslateError::UnknownPlatform { .. } => 2,
            TranslateError::Lex(_) | TranslateError::Parse(_) | TranslateError::EmptyRuleSet => 4,
            TranslateError::Emission { .. } => 5,
        }
    }
}

impl From<&TranslateError> for std::process::ExitCode {
    fn from(err: &TranslateError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
