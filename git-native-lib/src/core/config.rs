//! Well-known configuration keys and environment variables.

/// Repository-local Git config key recording which credentials provider last
/// authenticated a remote operation for this repository. Later operations use
/// it to re-derive the acting committer.
pub const CREDENTIALS_PROVIDER_KEY: &str = "codenvy.credentialsProvider";

/// Git config key for the configured author name.
pub const USER_NAME_KEY: &str = "user.name";

/// Git config key for the configured author email.
pub const USER_EMAIL_KEY: &str = "user.email";

/// User preference holding the committer name.
pub const COMMITTER_NAME_PREFERENCE: &str = "git.committer.name";

/// User preference holding the committer email.
pub const COMMITTER_EMAIL_PREFERENCE: &str = "git.committer.email";

/// Pattern matching every committer preference, passed to
/// [`crate::git::PreferenceStore::get_preferences`].
pub const COMMITTER_PREFERENCE_PATTERN: &str = r"^git\.committer\..+$";

/// The remote used when an operation does not name one.
pub const DEFAULT_REMOTE_NAME: &str = "origin";

/// Environment variables which affect the functioning of the connection
/// layer.
pub mod env_vars {
    use std::path::PathBuf;

    use tracing::instrument;

    use crate::util::get_from_path;

    /// Path to the Git executable to shell out to. This may be set during
    /// tests.
    pub const TEST_GIT: &str = "TEST_GIT";

    /// "Path to wherever your core Git programs are installed". You can find
    /// the default value by running `git --exec-path`.
    ///
    /// See <https://git-scm.com/docs/git#Documentation/git.txt---exec-pathltpathgt>.
    pub const TEST_GIT_EXEC_PATH: &str = "TEST_GIT_EXEC_PATH";

    /// Overrides the Git executable used outside of tests.
    pub const GIT_NATIVE_GIT: &str = "GIT_NATIVE_GIT";

    /// Username supplied to remote operations through the basic credentials
    /// provider by the command-line front end.
    pub const GIT_NATIVE_USERNAME: &str = "GIT_NATIVE_USERNAME";

    /// Password or token paired with [`GIT_NATIVE_USERNAME`].
    pub const GIT_NATIVE_PASSWORD: &str = "GIT_NATIVE_PASSWORD";

    /// Committer name preference used by the command-line front end.
    pub const GIT_NATIVE_COMMITTER_NAME: &str = "GIT_NATIVE_COMMITTER_NAME";

    /// Committer email preference used by the command-line front end.
    pub const GIT_NATIVE_COMMITTER_EMAIL: &str = "GIT_NATIVE_COMMITTER_EMAIL";

    /// Get the path to the Git executable for testing.
    #[instrument]
    pub fn get_path_to_git() -> eyre::Result<PathBuf> {
        let path_to_git = std::env::var_os(TEST_GIT).ok_or_else(|| {
            eyre::eyre!(
                "No path to Git executable was set. \
Try running as: `{0}=$(which git) cargo test ...` \
or set `env.{0}` in your `config.toml` \
(see https://doc.rust-lang.org/cargo/reference/config.html)",
                TEST_GIT,
            )
        })?;
        Ok(PathBuf::from(&path_to_git))
    }

    /// Get the `GIT_EXEC_PATH` environment variable for testing.
    #[instrument]
    pub fn get_git_exec_path() -> eyre::Result<PathBuf> {
        let git_exec_path = std::env::var_os(TEST_GIT_EXEC_PATH).ok_or_else(|| {
            eyre::eyre!(
                "No Git exec path was set. \
Try running as: `{0}=$(git --exec-path) cargo test ...` \
or set `env.{0}` in your `config.toml` \
(see https://doc.rust-lang.org/cargo/reference/config.html)",
                TEST_GIT_EXEC_PATH,
            )
        })?;
        Ok(PathBuf::from(&git_exec_path))
    }

    /// Get the Git executable to use outside of tests: `GIT_NATIVE_GIT` if
    /// set, otherwise the first `git` on `PATH`, otherwise a bare `git` for
    /// the OS to resolve.
    #[instrument]
    pub fn get_production_path_to_git() -> PathBuf {
        if let Some(path) = std::env::var_os(GIT_NATIVE_GIT) {
            return PathBuf::from(path);
        }
        let exe_name = if cfg!(target_os = "windows") {
            "git.exe"
        } else {
            "git"
        };
        get_from_path(exe_name).unwrap_or_else(|| PathBuf::from(exe_name))
    }
}
