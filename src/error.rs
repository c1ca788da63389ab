use std::fmt;

/// Route template compilation error
///
/// Returned by [`crate::pattern::compile`] and therefore by every route
/// registration call. A template that fails here never reaches dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationError {
    /// A `(` without its closing `)`, or a `)` with no opening `(`
    UnbalancedGroup {
        /// The offending template
        template: String,
        /// Byte offset of the unmatched parenthesis
        position: usize,
    },
    /// A `[` character class that is never closed
    UnterminatedClass {
        /// The offending template
        template: String,
        /// Byte offset of the opening bracket
        position: usize,
    },
    /// A trailing `\` with nothing left to escape
    DanglingEscape {
        /// The offending template
        template: String,
    },
    /// The generated (or supplied) expression was rejected by the regex engine
    InvalidRegex {
        /// The regex source handed to the engine
        pattern: String,
        /// Engine diagnostic
        reason: String,
    },
    /// The compiled matcher has a different number of capture groups than
    /// parameter names were collected
    CaptureCountMismatch {
        /// The regex source
        pattern: String,
        /// Number of capture groups in the matcher
        groups: usize,
        /// Number of collected parameter names
        params: usize,
    },
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilationError::UnbalancedGroup { template, position } => {
                write!(
                    f,
                    "route compilation error: unbalanced group in '{template}' at offset {position}"
                )
            }
            CompilationError::UnterminatedClass { template, position } => {
                write!(
                    f,
                    "route compilation error: unterminated character class in '{template}' at offset {position}"
                )
            }
            CompilationError::DanglingEscape { template } => {
                write!(
                    f,
                    "route compilation error: '{template}' ends with a dangling escape"
                )
            }
            CompilationError::InvalidRegex { pattern, reason } => {
                write!(
                    f,
                    "route compilation error: invalid expression '{pattern}': {reason}"
                )
            }
            CompilationError::CaptureCountMismatch {
                pattern,
                groups,
                params,
            } => {
                write!(
                    f,
                    "route compilation error: '{pattern}' has {groups} capture groups but {params} parameter names"
                )
            }
        }
    }
}

impl std::error::Error for CompilationError {}

/// Fault raised while a handler was running
///
/// Handlers report ordinary failures through `Err(..)` or
/// [`crate::handler::Flow::Fail`]; this type covers what the dispatcher
/// has to synthesise itself. It travels through the error channel inside
/// an [`anyhow::Error`], so error-aware handlers can `downcast_ref` it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerFault {
    /// The handler panicked; the payload is rendered into `message`
    Panicked {
        /// Route template of the handler that panicked
        route: String,
        /// Panic payload, if it was a string
        message: String,
    },
}

impl fmt::Display for HandlerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerFault::Panicked { route, message } => {
                write!(f, "handler for '{route}' panicked: {message}")
            }
        }
    }
}

impl std::error::Error for HandlerFault {}
