use super::{push_paths, GitCommand};
use crate::git::{GitRunResult, Result};

/// `git add`.
#[derive(Clone, Debug, Default)]
pub struct AddCommand {
    /// Paths to add. Everything under the working directory if empty.
    pub paths: Vec<String>,

    /// Only stage changes to files which are already tracked.
    pub update: bool,
}

impl GitCommand for AddCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["add".to_string()];
        if self.update {
            args.push("--update".to_string());
        }
        if self.paths.is_empty() {
            args.push(".".to_string());
        } else {
            push_paths(&mut args, &self.paths);
        }
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git rm`.
#[derive(Clone, Debug, Default)]
pub struct RmCommand {
    /// Paths to remove.
    pub paths: Vec<String>,

    /// Only remove from the index, keeping the working tree files.
    pub cached: bool,

    /// Allow removing directories.
    pub recursive: bool,
}

impl GitCommand for RmCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["rm".to_string()];
        if self.cached {
            args.push("--cached".to_string());
        }
        if self.recursive {
            args.push("-r".to_string());
        }
        push_paths(&mut args, &self.paths);
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git mv <source> <target>`.
#[derive(Clone, Debug)]
pub struct MvCommand {
    /// The path to move.
    pub source: String,

    /// Where to move it.
    pub target: String,
}

impl GitCommand for MvCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["mv".to_string()];
        push_paths(&mut args, &[self.source.clone(), self.target.clone()]);
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// How `git reset` treats the index and working tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ResetMode {
    /// Keep the index and working tree.
    Soft,

    /// Reset the index, keep the working tree.
    #[default]
    Mixed,

    /// Reset the index and working tree.
    Hard,

    /// Reset, keeping uncommitted local changes.
    Keep,

    /// Reset, keeping changes which are not staged.
    Merge,
}

impl ResetMode {
    fn as_arg(self) -> &'static str {
        match self {
            ResetMode::Soft => "--soft",
            ResetMode::Mixed => "--mixed",
            ResetMode::Hard => "--hard",
            ResetMode::Keep => "--keep",
            ResetMode::Merge => "--merge",
        }
    }
}

/// `git reset`.
#[derive(Clone, Debug, Default)]
pub struct ResetCommand {
    /// The commit to reset to. `HEAD` if not given.
    pub commit: Option<String>,

    /// Ignored when `paths` is non-empty: Git only resets the index for
    /// individual paths.
    pub mode: ResetMode,

    /// Only reset the index entries for these paths.
    pub paths: Vec<String>,
}

impl GitCommand for ResetCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["reset".to_string()];
        if self.paths.is_empty() {
            args.push(self.mode.as_arg().to_string());
        }
        args.push(self.commit.clone().unwrap_or_else(|| "HEAD".to_string()));
        push_paths(&mut args, &self.paths);
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git checkout`: switch branches, or restore files.
#[derive(Clone, Debug, Default)]
pub struct CheckoutCommand {
    /// The branch or commit to check out.
    pub name: Option<String>,

    /// Create the branch `name` starting at this commit.
    pub start_point: Option<String>,

    /// Create `name` as a new branch.
    pub create_new: bool,

    /// Set up tracking of the remote-tracking branch `start_point`.
    pub track: bool,

    /// Restore only these files.
    pub files: Vec<String>,
}

impl GitCommand for CheckoutCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["checkout".to_string()];
        if self.create_new {
            args.push("-b".to_string());
        }
        if let Some(name) = &self.name {
            args.push(name.clone());
        }
        if let Some(start_point) = &self.start_point {
            if self.track {
                args.push("--track".to_string());
            }
            args.push(start_point.clone());
        }
        push_paths(&mut args, &self.files);
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_defaults_to_everything() {
        assert_eq!(AddCommand::default().args(), vec!["add", "."]);
        assert_eq!(
            AddCommand {
                paths: vec!["a.txt".to_string()],
                update: true,
            }
            .args(),
            vec!["add", "--update", "--", "a.txt"]
        );
    }

    #[test]
    fn test_reset_args() {
        assert_eq!(
            ResetCommand {
                commit: Some("HEAD~1".to_string()),
                mode: ResetMode::Hard,
                paths: vec![],
            }
            .args(),
            vec!["reset", "--hard", "HEAD~1"]
        );
        assert_eq!(
            ResetCommand {
                commit: None,
                mode: ResetMode::Hard,
                paths: vec!["a.txt".to_string()],
            }
            .args(),
            vec!["reset", "HEAD", "--", "a.txt"]
        );
    }

    #[test]
    fn test_checkout_args() {
        assert_eq!(
            CheckoutCommand {
                name: Some("topic".to_string()),
                start_point: Some("origin/topic".to_string()),
                create_new: true,
                track: true,
                files: vec![],
            }
            .args(),
            vec!["checkout", "-b", "topic", "--track", "origin/topic"]
        );
        assert_eq!(
            CheckoutCommand {
                files: vec!["a.txt".to_string()],
                ..Default::default()
            }
            .args(),
            vec!["checkout", "--", "a.txt"]
        );
    }
}
