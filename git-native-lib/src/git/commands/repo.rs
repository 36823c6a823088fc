use std::path::PathBuf;

use super::GitCommand;
use crate::git::reference::parse_show_ref;
use crate::git::{GitRunResult, ReferenceName, Result};

/// `git init`.
#[derive(Clone, Debug, Default)]
pub struct InitCommand {
    /// Create a bare repository.
    pub bare: bool,
}

impl GitCommand for InitCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["init".to_string()];
        if self.bare {
            args.push("--bare".to_string());
        }
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git rev-parse --show-toplevel`: the root of the enclosing working tree.
#[derive(Clone, Debug, Default)]
pub struct ShowToplevelCommand;

impl GitCommand for ShowToplevelCommand {
    type Output = PathBuf;

    fn args(&self) -> Vec<String> {
        vec!["rev-parse".to_string(), "--show-toplevel".to_string()]
    }

    fn parse(&self, result: GitRunResult) -> Result<PathBuf> {
        Ok(PathBuf::from(result.stdout_text()?.trim_end_matches(['\n', '\r'])))
    }
}

/// `git rev-parse --is-inside-work-tree`. Failure (outside of any
/// repository) is reported as `false`.
#[derive(Clone, Debug, Default)]
pub struct IsInsideWorkTreeCommand;

impl GitCommand for IsInsideWorkTreeCommand {
    type Output = bool;

    fn args(&self) -> Vec<String> {
        vec!["rev-parse".to_string(), "--is-inside-work-tree".to_string()]
    }

    fn treat_failure_as_error(&self) -> bool {
        false
    }

    fn parse(&self, result: GitRunResult) -> Result<bool> {
        Ok(result.exit_code.is_success() && result.stdout_text()?.trim() == "true")
    }
}

/// `git symbolic-ref --short -q HEAD`: the checked-out branch, or `None` on a
/// detached `HEAD`.
#[derive(Clone, Debug, Default)]
pub struct CurrentBranchCommand;

impl GitCommand for CurrentBranchCommand {
    type Output = Option<String>;

    fn args(&self) -> Vec<String> {
        ["symbolic-ref", "--short", "-q", "HEAD"]
            .iter()
            .map(|arg| arg.to_string())
            .collect()
    }

    fn treat_failure_as_error(&self) -> bool {
        false
    }

    fn parse(&self, result: GitRunResult) -> Result<Option<String>> {
        if !result.exit_code.is_success() {
            return Ok(None);
        }
        let branch = result.stdout_text()?.trim().to_owned();
        Ok(if branch.is_empty() { None } else { Some(branch) })
    }
}

/// `git rev-parse --verify <revision>`: the object id a revision names.
#[derive(Clone, Debug)]
pub struct RevParseCommand {
    /// The revision to resolve.
    pub revision: String,
}

impl GitCommand for RevParseCommand {
    type Output = String;

    fn args(&self) -> Vec<String> {
        vec![
            "rev-parse".to_string(),
            "--verify".to_string(),
            "--end-of-options".to_string(),
            self.revision.clone(),
        ]
    }

    fn parse(&self, result: GitRunResult) -> Result<String> {
        Ok(result.stdout_text()?.trim().to_owned())
    }
}

/// `git show-ref <name>`: the fully-qualified name of the first reference
/// matching `name`, or `None` if nothing matches.
#[derive(Clone, Debug)]
pub struct ShowRefCommand {
    /// A full or abbreviated reference name.
    pub name: String,
}

impl GitCommand for ShowRefCommand {
    type Output = Option<ReferenceName>;

    fn args(&self) -> Vec<String> {
        vec!["show-ref".to_string(), self.name.clone()]
    }

    fn treat_failure_as_error(&self) -> bool {
        false
    }

    fn parse(&self, result: GitRunResult) -> Result<Option<ReferenceName>> {
        if !result.exit_code.is_success() {
            return Ok(None);
        }
        Ok(parse_show_ref(&result.stdout_text()?))
    }
}

/// `git cat-file -t <object>`: the type of an object, like `commit`.
#[derive(Clone, Debug)]
pub struct CatFileTypeCommand {
    /// Any expression naming an object.
    pub object: String,
}

impl GitCommand for CatFileTypeCommand {
    type Output = String;

    fn args(&self) -> Vec<String> {
        vec!["cat-file".to_string(), "-t".to_string(), self.object.clone()]
    }

    fn parse(&self, result: GitRunResult) -> Result<String> {
        Ok(result.stdout_text()?.trim().to_owned())
    }
}
