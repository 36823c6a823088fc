//! One options struct per Git subcommand.
//!
//! Each command is an immutable description of a single `git` invocation:
//! the arguments to pass and how to interpret the result. Commands are run
//! by [`NativeGit::execute`](crate::git::NativeGit::execute) and
//! [`NativeGit::execute_remote`](crate::git::NativeGit::execute_remote).

mod branch;
mod config;
mod history;
mod index;
mod remote;
mod repo;
mod sync;
mod tag;

use std::ffi::OsString;
use std::fmt::Debug;
use std::time::Duration;

pub use branch::{
    BranchCreateCommand, BranchDeleteCommand, BranchListCommand, BranchRenameCommand,
};
pub use config::{ConfigGetCommand, ConfigListCommand, ConfigSetCommand, ConfigUnsetCommand};
pub use history::{
    CommitCommand, CommittersCommand, DiffCommand, DiffType, LogCommand, MergeCommand,
    MergeResult, MergeStatus, ShowFileContentCommand, StatusCommand,
};
pub use index::{
    AddCommand, CheckoutCommand, MvCommand, ResetCommand, ResetMode, RmCommand,
};
pub use remote::{
    LsRemoteCommand, RemoteAddCommand, RemoteDeleteCommand, RemoteListCommand,
    RemoteUpdateCommand,
};
pub use repo::{
    CatFileTypeCommand, CurrentBranchCommand, InitCommand, IsInsideWorkTreeCommand,
    RevParseCommand, ShowRefCommand, ShowToplevelCommand,
};
pub use sync::{
    CloneCommand, FetchCommand, FetchResponse, PullCommand, PullResponse, PushCommand,
    PushResponse, PushUpdate,
};
pub use tag::{Tag, TagCreateCommand, TagDeleteCommand, TagListCommand};

use crate::git::{GitRunResult, GitUser, Result};

/// A single invocation of the `git` executable.
pub trait GitCommand: Debug {
    /// The parsed result of a successful invocation.
    type Output;

    /// The arguments to pass to `git`, not including the executable.
    fn args(&self) -> Vec<String>;

    /// Interpret the output of the invocation.
    fn parse(&self, result: GitRunResult) -> Result<Self::Output>;

    /// Whether a non-zero exit code fails the command before
    /// [`GitCommand::parse`] is called.
    fn treat_failure_as_error(&self) -> bool {
        true
    }

    /// Kill `git` if it runs for longer than this.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Whether output lines should be forwarded to a line consumer as they
    /// are produced.
    fn streams_output(&self) -> bool {
        false
    }

    /// Additional environment variables for this invocation.
    fn env(&self) -> Vec<(OsString, OsString)> {
        Vec::new()
    }

    /// Whether the id of the credentials provider used for a successful
    /// remote invocation is recorded in the repository's configuration.
    fn records_credentials_provider(&self) -> bool {
        true
    }
}

/// Append `paths` to `args`, separated by `--` so that paths are never
/// mistaken for revisions or options.
pub(crate) fn push_paths(args: &mut Vec<String>, paths: &[String]) {
    if !paths.is_empty() {
        args.push("--".to_string());
        args.extend(paths.iter().cloned());
    }
}

/// Environment which makes Git commit as `committer`, and as `author` if
/// given. Without an author, Git takes the author from the repository
/// configuration.
pub(crate) fn identity_env(
    committer: Option<&GitUser>,
    author: Option<&GitUser>,
) -> Vec<(OsString, OsString)> {
    let mut env = Vec::new();
    if let Some(GitUser { name, email }) = committer {
        env.push(("GIT_COMMITTER_NAME".into(), name.into()));
        env.push(("GIT_COMMITTER_EMAIL".into(), email.into()));
    }
    if let Some(GitUser { name, email }) = author {
        env.push(("GIT_AUTHOR_NAME".into(), name.into()));
        env.push(("GIT_AUTHOR_EMAIL".into(), email.into()));
    }
    env
}
