use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VerbatimKind {
    Quote,
    Code,
}

impl fmt::Display for VerbatimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VerbatimKind::Quote => "quote block",
            VerbatimKind::Code => "source block",
        })
    }
}

/// Structural nesting errors. Any of them aborts the whole parse.
///
/// Line numbers are 1-based.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: end of {block} without a matching begin")]
    UnopenedBlock { line: usize, block: VerbatimKind },
    #[error("line {line}: end of {block} does not close an open {block}")]
    UnbalancedBlock { line: usize, block: VerbatimKind },
    #[error("line {line}: {block} is never closed")]
    Unterminated { line: usize, block: VerbatimKind },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnopenedBlock { line, .. }
            | ParseError::UnbalancedBlock { line, .. }
            | ParseError::Unterminated { line, .. } => *line,
        }
    }
}

/// Errors raised while reading sources from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: not a file", .0.display())]
    NotAFile(PathBuf),
    #[error("{}: not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_line_and_block() {
        let err = ParseError::Unterminated {
            line: 3,
            block: VerbatimKind::Code,
        };
        assert_eq!(err.to_string(), "line 3: source block is never closed");
        assert_eq!(err.line(), 3);
    }
}
