use super::path::WinPath;
use std::path::PathBuf;

type LastError = String;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("path \"{0}\" does not exist")]
    NotFound(WinPath),
    #[error("path \"{0}\" is not a directory")]
    NotADirectory(WinPath),
    #[error("failed to access path \"{0}\": {1}")]
    Io(WinPath, LastError),
    #[error("entry {1:?} in \"{0}\" contains a '\\' and cannot be represented")]
    InvalidEntryName(WinPath, String),
    #[error("{0}")]
    FlagConflict(String),
    #[error("variable name is empty")]
    KeyEmpty,
    #[error("variable name \"{0}\" contains whitespace between characters")]
    KeyContainsWhitespace(String),
    #[error("variable name \"{0}\" contains newline character")]
    KeyContainsNewline(String),
    #[error("variable name \"{0}\" contains one of '%', '$' or '='")]
    KeyContainsSigil(String),
    #[error("could not parse variable due to missing '=' character")]
    VarParseMissingEq,
    #[error("failed to read variables file {0:?}: {1}")]
    TomlParse(PathBuf, LastError),
    #[error("failed to read file {0:?}: {1}")]
    FileRead(PathBuf, LastError),
}

impl Error {
    // Presents the message `s` without the first letter being capitalized.
    pub fn lowerize(s: String) -> String {
        s.char_indices()
            .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
            .collect()
    }
}
