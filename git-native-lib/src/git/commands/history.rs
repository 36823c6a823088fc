use std::ffi::OsString;

use itertools::Itertools;

use super::{identity_env, push_paths, GitCommand};
use crate::git::revision::{parse_committers, parse_log, COMMITTERS_FORMAT, LOG_FORMAT};
use crate::git::status::{parse_status, STATUS_ARGS};
use crate::git::{Error, GitRunResult, GitUser, Result, Revision, Status};

/// `git commit`.
#[derive(Clone, Debug, Default)]
pub struct CommitCommand {
    /// The commit message.
    pub message: String,

    /// Stage all modified and deleted tracked files first.
    pub all: bool,

    /// Replace the tip of the current branch.
    pub amend: bool,

    /// Commit only these files.
    pub files: Vec<String>,

    /// Commit as this committer rather than the configured identity.
    pub committer: Option<GitUser>,

    /// Record this author rather than the configured identity.
    pub author: Option<GitUser>,
}

impl GitCommand for CommitCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["commit".to_string()];
        if self.all {
            args.push("--all".to_string());
        }
        if self.amend {
            args.push("--amend".to_string());
        }
        args.push(format!("--message={}", self.message));
        push_paths(&mut args, &self.files);
        args
    }

    fn env(&self) -> Vec<(OsString, OsString)> {
        identity_env(self.committer.as_ref(), self.author.as_ref())
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git log`.
#[derive(Clone, Debug, Default)]
pub struct LogCommand {
    /// A revision or range like `master..topic`. `HEAD` if not given.
    pub revision_range: Option<String>,

    /// Limit the number of commits listed.
    pub max_count: Option<usize>,

    /// Skip this many commits before listing.
    pub skip: Option<usize>,

    /// Only list commits touching these paths.
    pub paths: Vec<String>,
}

impl GitCommand for LogCommand {
    type Output = Vec<Revision>;

    fn args(&self) -> Vec<String> {
        let mut args = vec!["log".to_string(), LOG_FORMAT.to_string()];
        if let Some(max_count) = self.max_count {
            args.push(format!("--max-count={max_count}"));
        }
        if let Some(skip) = self.skip {
            args.push(format!("--skip={skip}"));
        }
        if let Some(revision_range) = &self.revision_range {
            args.push(revision_range.clone());
        }
        push_paths(&mut args, &self.paths);
        args
    }

    fn parse(&self, result: GitRunResult) -> Result<Vec<Revision>> {
        parse_log(&result.stdout_text()?)
    }
}

/// The distinct committers in the history of `HEAD`, most recent first.
#[derive(Clone, Debug, Default)]
pub struct CommittersCommand;

impl GitCommand for CommittersCommand {
    type Output = Vec<GitUser>;

    fn args(&self) -> Vec<String> {
        vec!["log".to_string(), COMMITTERS_FORMAT.to_string()]
    }

    fn parse(&self, result: GitRunResult) -> Result<Vec<GitUser>> {
        Ok(parse_committers(&result.stdout_text()?)
            .into_iter()
            .unique()
            .collect())
    }
}

/// `git status`.
#[derive(Clone, Debug, Default)]
pub struct StatusCommand;

impl GitCommand for StatusCommand {
    type Output = Status;

    fn args(&self) -> Vec<String> {
        STATUS_ARGS.iter().map(|arg| arg.to_string()).collect()
    }

    fn parse(&self, result: GitRunResult) -> Result<Status> {
        parse_status(&result.stdout_text()?)
    }
}

/// What `git diff` prints.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DiffType {
    /// A unified patch.
    #[default]
    Patch,

    /// Only the names of changed files.
    NameOnly,

    /// The names of changed files and how they changed.
    NameStatus,
}

/// `git diff`.
#[derive(Clone, Debug, Default)]
pub struct DiffCommand {
    /// The output format.
    pub diff_type: DiffType,

    /// Compare against this commit.
    pub commit_a: Option<String>,

    /// Compare `commit_a` with this commit rather than the working tree.
    pub commit_b: Option<String>,

    /// Compare the index rather than the working tree.
    pub cached: bool,

    /// Limit the diff to these paths.
    pub paths: Vec<String>,
}

impl GitCommand for DiffCommand {
    type Output = String;

    fn args(&self) -> Vec<String> {
        let mut args = vec!["diff".to_string()];
        match self.diff_type {
            DiffType::Patch => {}
            DiffType::NameOnly => args.push("--name-only".to_string()),
            DiffType::NameStatus => args.push("--name-status".to_string()),
        }
        if self.cached {
            args.push("--cached".to_string());
        }
        args.extend(self.commit_a.iter().cloned());
        args.extend(self.commit_b.iter().cloned());
        push_paths(&mut args, &self.paths);
        args
    }

    fn parse(&self, result: GitRunResult) -> Result<String> {
        result.stdout_text()
    }
}

/// `git show <revision>:<path>`: the contents of a file at a revision.
#[derive(Clone, Debug)]
pub struct ShowFileContentCommand {
    /// The revision to read from.
    pub revision: String,

    /// The path of the file, relative to the repository root.
    pub path: String,
}

impl GitCommand for ShowFileContentCommand {
    type Output = String;

    fn args(&self) -> Vec<String> {
        vec![
            "show".to_string(),
            format!("{}:{}", self.revision, self.path),
        ]
    }

    fn parse(&self, result: GitRunResult) -> Result<String> {
        result.stdout_text()
    }
}

/// How a merge ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeStatus {
    /// Nothing to merge.
    AlreadyUpToDate,

    /// The branch was moved forward without a merge commit.
    FastForward,

    /// A merge commit was created.
    Merged,

    /// The merge stopped with conflicts, which are left in the working tree.
    Conflicting,

    /// The merge did not start because it would overwrite local changes.
    Failed,
}

/// The result of `git merge`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeResult {
    /// How the merge ended.
    pub status: MergeStatus,

    /// `HEAD` after the merge.
    pub new_head: Option<String>,

    /// Files left with conflict markers.
    pub conflicts: Vec<String>,

    /// Files whose local changes prevented the merge.
    pub failed: Vec<String>,
}

/// `git merge <commit>`.
#[derive(Clone, Debug)]
pub struct MergeCommand {
    /// The commit to merge into the current branch.
    pub commit: String,

    /// Create the merge commit as this user.
    pub committer: Option<GitUser>,
}

impl GitCommand for MergeCommand {
    type Output = MergeResult;

    fn args(&self) -> Vec<String> {
        vec![
            "merge".to_string(),
            "--no-edit".to_string(),
            self.commit.clone(),
        ]
    }

    fn env(&self) -> Vec<(OsString, OsString)> {
        identity_env(self.committer.as_ref(), self.committer.as_ref())
    }

    fn treat_failure_as_error(&self) -> bool {
        false
    }

    fn parse(&self, result: GitRunResult) -> Result<MergeResult> {
        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);
        match parse_merge_output(result.exit_code.is_success(), &stdout, &stderr) {
            Some(merge_result) => Ok(merge_result),
            None => Err(Error::GitFailed {
                args: self.args(),
                exit_code: result.exit_code,
                message: result.failure_message(),
            }),
        }
    }
}

/// Interpret the output of `git merge`. Returns `None` for failures which are
/// not conflicts or blocked merges.
pub(crate) fn parse_merge_output(success: bool, stdout: &str, stderr: &str) -> Option<MergeResult> {
    let result = |status, conflicts, failed| MergeResult {
        status,
        new_head: None,
        conflicts,
        failed,
    };
    if success {
        let status = if stdout.contains("Already up to date") || stdout.contains("Already up-to-date")
        {
            MergeStatus::AlreadyUpToDate
        } else if stdout.contains("Fast-forward") {
            MergeStatus::FastForward
        } else {
            MergeStatus::Merged
        };
        return Some(result(status, Vec::new(), Vec::new()));
    }

    let conflicts: Vec<String> = stdout
        .lines()
        .filter(|line| line.starts_with("CONFLICT"))
        .filter_map(|line| line.split_once(" in "))
        .map(|(_, path)| path.trim().to_owned())
        .collect();
    if !conflicts.is_empty() {
        return Some(result(MergeStatus::Conflicting, conflicts, Vec::new()));
    }

    if stderr.contains("would be overwritten by merge") {
        let failed = stderr
            .lines()
            .filter(|line| line.starts_with('\t'))
            .map(|line| line.trim().to_owned())
            .collect();
        return Some(result(MergeStatus::Failed, Vec::new(), failed));
    }
    None
}
