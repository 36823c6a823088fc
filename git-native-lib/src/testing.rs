//! Testing utilities.
//!
//! This is inside `src` rather than `tests` since we use this code in some unit
//! tests.

use std::collections::HashMap;
use std::ffi::OsString;
use std::ops::Deref;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use eyre::Context;
use itertools::Itertools;
use once_cell::sync::OnceCell;
use tempfile::TempDir;
use tracing::instrument;

use crate::core::config::env_vars::{get_git_exec_path, get_path_to_git, TEST_GIT};
use crate::core::config::{COMMITTER_EMAIL_PREFERENCE, COMMITTER_NAME_PREFERENCE};
use crate::core::context::RequestContext;
use crate::git::{
    CredentialsLoader, GitRunInfo, InMemoryPreferenceStore, LocalUserResolver,
    NativeGitConnection, NativeGitConnectionFactory, SshScriptProvider,
};
use crate::util::get_from_path;

const DUMMY_NAME: &str = "Testy McTestface";
const DUMMY_EMAIL: &str = "test@example.com";
const DUMMY_DATE: &str = "Wed 29 Oct 12:34:56 2020 PDT";

/// The user id of the request context built by [`make_request_context`].
pub const TEST_USER_ID: &str = "tester";

/// The committer name stored in the preferences of [`TEST_USER_ID`].
pub const TEST_COMMITTER_NAME: &str = "Web Committer";

/// The committer email stored in the preferences of [`TEST_USER_ID`].
pub const TEST_COMMITTER_EMAIL: &str = "web-committer@example.com";

/// Wrapper around the Git executable, for testing.
#[derive(Clone, Debug)]
pub struct Git {
    /// The path to the repository on disk. The directory itself must exist,
    /// although it might not have a `.git` folder in it. (Use `Git::init_repo`
    /// to initialize it.)
    pub repo_path: PathBuf,

    /// The path to the Git executable on disk.
    pub path_to_git: PathBuf,

    /// The `GIT_EXEC_PATH` environment variable value to use for testing.
    pub git_exec_path: PathBuf,
}

/// Options for `Git::run_with_options`.
#[derive(Debug, Default)]
pub struct GitRunOptions {
    /// The timestamp of the command. Mostly useful for `git commit`. This should
    /// be a number like 0, 1, 2, 3...
    pub time: isize,

    /// The exit code that `Git` should return.
    pub expected_exit_code: i32,

    /// Additional environment variables to start the process with.
    pub env: HashMap<String, String>,
}

impl Git {
    /// Constructor.
    pub fn new(path_to_git: PathBuf, repo_path: PathBuf, git_exec_path: PathBuf) -> Self {
        Git {
            repo_path,
            path_to_git,
            git_exec_path,
        }
    }

    /// Get the `PATH` environment variable to use for testing: the Git exec
    /// path first, then the `PATH` of the test process, so that helper
    /// programs like `ssh` and `sh` can be found.
    pub fn get_path_for_env(&self) -> OsString {
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let paths = std::iter::once(self.git_exec_path.clone())
            .chain(std::env::split_paths(&inherited))
            .collect_vec();
        std::env::join_paths(paths).unwrap_or(inherited)
    }

    /// Get the environment variables needed to run git in the test environment.
    pub fn get_base_env(&self, time: isize) -> Vec<(OsString, OsString)> {
        // Required for determinism, as these values will be baked into the commit
        // hash.
        let date: OsString = format!("{DUMMY_DATE} -{time:0>2}").into();

        // ":" is understood by `git` to skip editing.
        let git_editor = OsString::from(":");

        let envs = vec![
            ("GIT_CONFIG_NOSYSTEM", OsString::from("1")),
            ("GIT_AUTHOR_DATE", date.clone()),
            ("GIT_COMMITTER_DATE", date),
            ("GIT_EDITOR", git_editor),
            ("GIT_EXEC_PATH", self.git_exec_path.as_os_str().into()),
            ("HOME", self.repo_path.as_os_str().into()),
            ("PATH", self.get_path_for_env()),
            (TEST_GIT, self.path_to_git.as_os_str().into()),
        ];

        envs.into_iter()
            .map(|(key, value)| (OsString::from(key), value))
            .collect()
    }

    /// Build a `git` invocation in the repository with a deterministic
    /// environment. Nothing from the test process leaks through except
    /// `PATH`.
    fn command(&self, time: isize, extra_env: &HashMap<String, String>) -> Command {
        let mut command = Command::new(&self.path_to_git);
        command
            .current_dir(&self.repo_path)
            .env_clear()
            .envs(self.get_base_env(time))
            .envs(extra_env);
        command
    }

    /// Run a Git command, failing unless it exits with
    /// `options.expected_exit_code`. Returns its stdout and stderr.
    #[instrument]
    pub fn run_with_options<S: AsRef<str> + std::fmt::Debug>(
        &self,
        args: &[S],
        options: &GitRunOptions,
    ) -> eyre::Result<(String, String)> {
        let args = args.iter().map(AsRef::as_ref).collect_vec();
        let output = self
            .command(options.time, &options.env)
            .args(&args)
            .output()
            .wrap_err_with(|| format!("Could not run {:?} {args:?}", self.path_to_git))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        match output.status.code() {
            Some(code) if code == options.expected_exit_code => Ok((stdout, stderr)),
            code => eyre::bail!(
                "git {} exited with {code:?}, expected {}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}",
                args.join(" "),
                options.expected_exit_code,
            ),
        }
    }

    /// Run a Git command.
    pub fn run<S: AsRef<str> + std::fmt::Debug>(
        &self,
        args: &[S],
    ) -> eyre::Result<(String, String)> {
        self.run_with_options(args, &Default::default())
    }

    /// Set up a Git repo in the directory, with `master` checked out and an
    /// initial commit.
    #[instrument]
    pub fn init_repo(&self) -> eyre::Result<()> {
        std::fs::create_dir_all(&self.repo_path)?;
        self.run(&["init"])?;
        self.run(&["symbolic-ref", "HEAD", "refs/heads/master"])?;
        self.run(&["config", "user.name", DUMMY_NAME])?;
        self.run(&["config", "user.email", DUMMY_EMAIL])?;

        // Disable warnings of the following form on Windows:
        //
        // ```
        // warning: LF will be replaced by CRLF in initial.txt.
        // The file will have its original line endings in your working directory
        // ```
        self.run(&["config", "core.autocrlf", "false"])?;

        self.commit_file("initial", 0)?;
        Ok(())
    }

    /// Clone this repository into the `target` repository (which must not have
    /// been initialized).
    pub fn clone_repo_into(&self, target: &Git, additional_args: &[&str]) -> eyre::Result<()> {
        let remote = self.repo_path.to_string_lossy().into_owned();
        let target_path = target.repo_path.to_string_lossy().into_owned();
        let args = {
            let mut args = vec![
                "clone",
                // For Windows in CI.
                "-c",
                "core.autocrlf=false",
                &remote,
                &target_path,
            ];
            args.extend(additional_args.iter());
            args
        };

        let (_stdout, _stderr) = self.run(args.as_slice())?;
        target.run(&["config", "user.name", DUMMY_NAME])?;
        target.run(&["config", "user.email", DUMMY_EMAIL])?;
        Ok(())
    }

    /// Write the provided contents to the provided file in the repository root.
    pub fn write_file(&self, name: &str, contents: &str) -> eyre::Result<()> {
        let path = self.repo_path.join(name);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(self.repo_path.join(dir))?;
        }
        std::fs::write(&path, contents)?;
        Ok(())
    }

    /// Commit a file named `<name>.txt` with default contents. The `time`
    /// argument is used to set the commit timestamp, which is factored into
    /// the commit hash. Returns the hash of the new commit.
    #[instrument]
    pub fn commit_file(&self, name: &str, time: isize) -> eyre::Result<String> {
        self.write_file(&format!("{name}.txt"), &format!("{name} contents\n"))?;
        self.run(&["add", "."])?;
        self.run_with_options(
            &["commit", "-m", &format!("create {name}.txt")],
            &GitRunOptions {
                time,
                ..Default::default()
            },
        )?;
        let (oid, _stderr) = self.run(&["rev-parse", "HEAD"])?;
        Ok(oid.trim().to_owned())
    }

    /// Get the `GitRunInfo` to use for this repository.
    #[instrument]
    pub fn get_git_run_info(&self) -> GitRunInfo {
        GitRunInfo {
            path_to_git: self.path_to_git.clone(),
            working_directory: self.repo_path.clone(),
            env: self.get_base_env(0).into_iter().collect(),
        }
    }

    /// Make a connection factory whose mount root is this repository, with
    /// the preferences of [`TEST_USER_ID`] available to it.
    pub fn make_connection_factory(
        &self,
        credentials_loader: CredentialsLoader,
    ) -> NativeGitConnectionFactory {
        NativeGitConnectionFactory::new(
            &self.repo_path,
            self.get_git_run_info(),
            Arc::new(credentials_loader),
            Arc::new(SshScriptProvider::default()),
            make_user_resolver(),
        )
    }

    /// Connect to this repository as [`TEST_USER_ID`], without credentials.
    pub fn make_connection(&self) -> NativeGitConnection {
        self.make_connection_with(CredentialsLoader::default(), &make_request_context())
    }

    /// Connect to this repository with the given credentials loader and
    /// request context.
    pub fn make_connection_with(
        &self,
        credentials_loader: CredentialsLoader,
        ctx: &RequestContext,
    ) -> NativeGitConnection {
        self.make_connection_factory(credentials_loader)
            .connect(&self.repo_path, ctx)
    }
}

/// A user resolver which knows the committer preferences of
/// [`TEST_USER_ID`].
pub fn make_user_resolver() -> Arc<LocalUserResolver> {
    let preference_store = InMemoryPreferenceStore::new();
    preference_store.set(TEST_USER_ID, COMMITTER_NAME_PREFERENCE, TEST_COMMITTER_NAME);
    preference_store.set(TEST_USER_ID, COMMITTER_EMAIL_PREFERENCE, TEST_COMMITTER_EMAIL);
    Arc::new(LocalUserResolver::new(Arc::new(preference_store)))
}

/// A request made by [`TEST_USER_ID`].
pub fn make_request_context() -> RequestContext {
    RequestContext::anonymous().with_user_id(TEST_USER_ID)
}

/// Wrapper around a `Git` instance which cleans up the repository once
/// dropped.
pub struct GitWrapper {
    #[allow(dead_code)]
    repo_dir: TempDir,
    git: Git,
}

impl Deref for GitWrapper {
    type Target = Git;

    fn deref(&self) -> &Self::Target {
        &self.git
    }
}

static COLOR_EYRE_INSTALL: OnceCell<()> = OnceCell::new();

/// Locate the Git executable and its exec path: from `TEST_GIT` and
/// `TEST_GIT_EXEC_PATH` when set, otherwise from `PATH` and
/// `git --exec-path`.
fn locate_git() -> eyre::Result<(PathBuf, PathBuf)> {
    COLOR_EYRE_INSTALL.get_or_try_init(color_eyre::install)?;

    let path_to_git = match get_path_to_git() {
        Ok(path_to_git) => path_to_git,
        Err(err) => {
            let exe_name = if cfg!(target_os = "windows") {
                "git.exe"
            } else {
                "git"
            };
            get_from_path(exe_name).ok_or(err)?
        }
    };
    let git_exec_path = match get_git_exec_path() {
        Ok(git_exec_path) => git_exec_path,
        Err(err) => {
            let output = Command::new(&path_to_git)
                .arg("--exec-path")
                .output()
                .wrap_err(err)?;
            PathBuf::from(String::from_utf8(output.stdout)?.trim())
        }
    };
    Ok((path_to_git, git_exec_path))
}

/// Create a temporary directory for testing and a `Git` instance to use with it.
pub fn make_git() -> eyre::Result<GitWrapper> {
    let (path_to_git, git_exec_path) = locate_git()?;
    let repo_dir = tempfile::tempdir()?;
    let git = Git::new(path_to_git, repo_dir.path().to_path_buf(), git_exec_path);
    Ok(GitWrapper { repo_dir, git })
}

/// An original repository and a clone of it, both inside one temporary
/// directory which is removed once this value is dropped. The caller
/// initializes `original_repo` and clones it into `cloned_repo`.
pub struct GitWrapperWithRemoteRepo {
    /// Guard for the containing directory. Bind it to a named variable, not
    /// `_`, so that it lives until the end of the test.
    pub temp_dir: TempDir,

    /// The repository acting as the remote, at `<temp_dir>/original`.
    pub original_repo: Git,

    /// The repository acting as the local clone, at `<temp_dir>/cloned`.
    pub cloned_repo: Git,
}

/// Create a [`GitWrapperWithRemoteRepo`].
pub fn make_git_with_remote_repo() -> eyre::Result<GitWrapperWithRemoteRepo> {
    let (path_to_git, git_exec_path) = locate_git()?;
    let temp_dir = tempfile::tempdir()?;
    let repo_at = |name: &str| {
        Git::new(
            path_to_git.clone(),
            temp_dir.path().join(name),
            git_exec_path.clone(),
        )
    };
    let original_repo = repo_at("original");
    let cloned_repo = repo_at("cloned");
    Ok(GitWrapperWithRemoteRepo {
        temp_dir,
        original_repo,
        cloned_repo,
    })
}
