//! Utility functions.

use std::fmt::Display;
use std::num::TryFromIntError;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Represents the exit code of a process.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExitCode(pub isize);

impl ExitCode {
    /// Return an exit code corresponding to success.
    pub fn success() -> Self {
        Self(0)
    }

    /// Determine whether or not this exit code represents a successful
    /// termination.
    pub fn is_success(&self) -> bool {
        match self {
            ExitCode(0) => true,
            ExitCode(_) => false,
        }
    }
}

impl Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self(code) = self;
        write!(f, "{code}")
    }
}

impl TryFrom<ExitStatus> for ExitCode {
    type Error = TryFromIntError;

    fn try_from(status: ExitStatus) -> Result<Self, Self::Error> {
        // On Unix, if the child process was terminated by a signal, we need to
        // call some Unix-specific functions to access the signal that
        // terminated it. For simplicity, just return `1` in those cases.
        let exit_code = status.code().unwrap_or(1);
        Ok(Self(exit_code.try_into()?))
    }
}

/// Encapsulate both an `eyre::Result<T>` and a possible subcommand exit code.
pub type EyreExitOr<T> = eyre::Result<Result<T, ExitCode>>;

/// Returns a path for a given file, searching through PATH to find it.
pub fn get_from_path(exe_name: &str) -> Option<PathBuf> {
    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths).find_map(|dir| {
            let path = dir.join(exe_name);
            if path.is_file() {
                Some(path)
            } else {
                None
            }
        })
    })
}

/// Returns the path to a shell suitable for running the credential helper
/// scripts that Git invokes.
pub fn get_sh() -> Option<PathBuf> {
    let exe_name = if cfg!(target_os = "windows") {
        "bash.exe"
    } else {
        "sh"
    };
    // On Windows, Git for Windows ships its own bash next to `git.exe`, but
    // it's usually not on `PATH`. It lives at `<git dir>\bin\bash.exe` while
    // `git.exe` lives at `<git dir>\cmd\git.exe`.
    if cfg!(target_os = "windows") {
        let git_bash = get_from_path("git.exe")
            .as_deref()
            .and_then(|git_path| git_path.parent())
            .and_then(|cmd_dir| cmd_dir.parent())
            .map(|git_dir| git_dir.join("bin").join(exe_name));
        if let Some(git_bash) = git_bash {
            if git_bash.is_file() {
                return Some(git_bash);
            }
        }
    }
    get_from_path(exe_name)
}
