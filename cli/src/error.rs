use std::fmt;
use quadreg::error::QuadregError;

#[derive(Debug, Clone, PartialEq)]
pub enum CLIError {
	ExternalError(String, String),
	UnknownArgument(String),
	InsufficientArguments,
	NotFound(String),
}

impl CLIError {
	pub fn external<E: QuadregError>(kind: &str, e: E) -> Self {
		CLIError::ExternalError(kind.into(), e.to_string())
	}
}

impl fmt::Display for CLIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CLIError::ExternalError(kind, message) => write!(f, "{}: {}", kind, message),
			CLIError::UnknownArgument(arg) => write!(f, "unknown argument '{}'", arg),
			CLIError::InsufficientArguments => {
				write!(f, "usage: quadreg (build|run) <file> [--strict] [--extended] [-v|-vv]")
			}
			CLIError::NotFound(file) => write!(f, "{}: no such file", file),
		}
	}
}

pub type CLIResult<O = ()> = Result<O, CLIError>;
