use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::util::ExitCode;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Error {
    #[error("not a git repository: {path:?}")]
    NotAGitRepository { path: PathBuf },

    #[error("invalid object for merge: '{object}' is a {kind}, expected a commit or tag")]
    InvalidMergeObject { object: String, kind: String },

    #[error("could not resolve reference '{name}'")]
    ResolveRef { name: String },

    #[error("no remote named '{name}'")]
    NoSuchRemote { name: String },

    #[error("directory {path:?} is not empty")]
    DirectoryNotEmpty { path: PathBuf },

    /// A Git invocation exited unsuccessfully. `message` is the raw text Git
    /// wrote to stderr (or stdout, if stderr was empty).
    #[error("{message}")]
    GitFailed {
        args: Vec<String>,
        exit_code: ExitCode,
        message: String,
    },

    /// A remote operation failed because the remote rejected, or could not
    /// obtain, credentials. Callers can supply credentials and retry.
    #[error("not authorized to access {uri}: {message}")]
    Unauthorized { uri: String, message: String },

    #[error("could not execute git: {0}")]
    SpawnGit(#[source] io::Error),

    #[error("git {args} did not complete within {timeout:?}")]
    Timeout { args: String, timeout: Duration },

    #[error("credentials provider '{expected}' returned a credential belonging to provider '{actual}'")]
    CredentialsProviderMismatch { expected: String, actual: String },

    #[error("credentials provider '{provider_id}' failed: {message}")]
    CredentialsProvider {
        provider_id: String,
        message: String,
    },

    #[error("could not provision credential script at {path:?}: {source}")]
    ProvisionScript { source: io::Error, path: PathBuf },

    #[error("could not parse {item} from git output: {line:?}")]
    ParseOutput { item: &'static str, line: String },

    #[error("could not decode UTF-8 value for {item}")]
    DecodeUtf8 { item: &'static str },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether this error should prompt the caller for credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
