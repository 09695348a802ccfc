//! Constants used throughout the envium codebase

// Literal that external sources use for an explicitly absent value
pub const NONE_LITERAL: &str = "None";

// Boolean literals, both for rendering and for parsing source strings
pub const BOOL_TRUE_LITERAL: &str = "True";
pub const BOOL_FALSE_LITERAL: &str = "False";

// Sequence delimiters
pub const LIST_DELIMITER_POSIX: &str = ":";
pub const LIST_DELIMITER_WINDOWS: &str = ";";

// Naming
pub const PATH_SEPARATOR: char = '.';
pub const KEY_SEPARATOR: &str = "_";
pub const STRIPPED_NAME_CHARS: &[char] = &['_', '-'];

// Default root names for variants that do not need a caller-chosen one
pub const DEFAULT_CTX_NAME: &str = "ctx";
pub const DEFAULT_SECRETS_NAME: &str = "secrets";
