use super::GitCommand;
use crate::git::reference::{parse_branch_list, BRANCH_LIST_FORMAT};
use crate::git::{Branch, BranchListMode, GitRunResult, Result};

/// `git branch <name> [<start_point>]`.
#[derive(Clone, Debug)]
pub struct BranchCreateCommand {
    /// The name of the new branch.
    pub name: String,

    /// Where the branch starts. `HEAD` if not given.
    pub start_point: Option<String>,
}

impl GitCommand for BranchCreateCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["branch".to_string(), self.name.clone()];
        args.extend(self.start_point.iter().cloned());
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// Delete a local branch, or a branch on a remote.
#[derive(Clone, Debug)]
pub enum BranchDeleteCommand {
    /// `git branch -d <name>`.
    Local {
        /// The short name of the branch.
        name: String,

        /// Delete even if the branch is not merged.
        force: bool,
    },

    /// `git push <remote> --delete <name>`.
    Remote {
        /// The name of the remote.
        remote: String,

        /// The name of the branch on the remote.
        name: String,
    },
}

impl GitCommand for BranchDeleteCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        match self {
            BranchDeleteCommand::Local { name, force } => vec![
                "branch".to_string(),
                if *force { "-D" } else { "-d" }.to_string(),
                name.clone(),
            ],
            BranchDeleteCommand::Remote { remote, name } => vec![
                "push".to_string(),
                remote.clone(),
                "--delete".to_string(),
                name.clone(),
            ],
        }
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// Rename a local branch, or a branch on a remote.
#[derive(Clone, Debug)]
pub enum BranchRenameCommand {
    /// `git branch -m <old> <new>`.
    Local {
        /// The current short name of the branch.
        old_name: String,

        /// The new short name of the branch.
        new_name: String,
    },

    /// Push the remote-tracking branch under its new name and delete the old
    /// name, in one `git push`.
    Remote {
        /// The name of the remote.
        remote: String,

        /// The current name of the branch on the remote.
        old_name: String,

        /// The new name of the branch on the remote.
        new_name: String,
    },
}

impl GitCommand for BranchRenameCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        match self {
            BranchRenameCommand::Local { old_name, new_name } => vec![
                "branch".to_string(),
                "-m".to_string(),
                old_name.clone(),
                new_name.clone(),
            ],
            BranchRenameCommand::Remote {
                remote,
                old_name,
                new_name,
            } => vec![
                "push".to_string(),
                remote.clone(),
                format!("refs/remotes/{remote}/{old_name}:refs/heads/{new_name}"),
                format!(":refs/heads/{old_name}"),
            ],
        }
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git branch --list`.
#[derive(Clone, Debug, Default)]
pub struct BranchListCommand {
    /// Which branches to list.
    pub mode: BranchListMode,
}

impl GitCommand for BranchListCommand {
    type Output = Vec<Branch>;

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "branch".to_string(),
            "--list".to_string(),
            BRANCH_LIST_FORMAT.to_string(),
        ];
        match self.mode {
            BranchListMode::Local => {}
            BranchListMode::Remote => args.push("--remotes".to_string()),
            BranchListMode::All => args.push("--all".to_string()),
        }
        args
    }

    fn parse(&self, result: GitRunResult) -> Result<Vec<Branch>> {
        Ok(parse_branch_list(&result.stdout_text()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_branch_delete_args() {
        let command = BranchDeleteCommand::Remote {
            remote: "origin".to_string(),
            name: "feature/login".to_string(),
        };
        assert_eq!(
            command.args(),
            vec!["push", "origin", "--delete", "feature/login"]
        );
    }

    #[test]
    fn test_remote_branch_rename_args() {
        let command = BranchRenameCommand::Remote {
            remote: "origin".to_string(),
            old_name: "topic".to_string(),
            new_name: "feature".to_string(),
        };
        assert_eq!(
            command.args(),
            vec![
                "push",
                "origin",
                "refs/remotes/origin/topic:refs/heads/feature",
                ":refs/heads/topic"
            ]
        );
    }
}
