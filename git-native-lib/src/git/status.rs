use crate::git::{Error, Result};

/// The state of the working tree and index, as reported by `git status`.
///
/// Paths are relative to the repository root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// The checked-out branch, or `None` on a detached `HEAD`.
    pub branch_name: Option<String>,

    /// New files added to the index.
    pub added: Vec<String>,

    /// Files changed in the index (modified, renamed or copied).
    pub changed: Vec<String>,

    /// Files deleted in the index.
    pub removed: Vec<String>,

    /// Files deleted in the working tree but not in the index.
    pub missing: Vec<String>,

    /// Files modified in the working tree but not in the index.
    pub modified: Vec<String>,

    /// Files not tracked by Git.
    pub untracked: Vec<String>,

    /// Files with unresolved merge conflicts.
    pub conflicting: Vec<String>,
}

impl Status {
    /// Whether there is nothing to commit and nothing untracked.
    pub fn is_clean(&self) -> bool {
        let Self {
            branch_name: _,
            added,
            changed,
            removed,
            missing,
            modified,
            untracked,
            conflicting,
        } = self;
        [added, changed, removed, missing, modified, untracked, conflicting]
            .iter()
            .all(|paths| paths.is_empty())
    }
}

/// Arguments for `git status` understood by [`parse_status`].
pub(crate) const STATUS_ARGS: &[&str] = &[
    "status",
    "--porcelain=v1",
    "--branch",
    "-z",
    "--untracked-files=all",
];

fn is_conflict(index: char, worktree: char) -> bool {
    matches!(
        (index, worktree),
        ('D', 'D') | ('A', 'A') | ('U', _) | (_, 'U')
    )
}

fn parse_branch_header(header: &str) -> Option<String> {
    let header = header.strip_prefix("## ")?;
    if header.starts_with("HEAD (no branch)") {
        return None;
    }
    // `No commits yet on master` on an unborn branch.
    let header = header
        .strip_prefix("No commits yet on ")
        .or_else(|| header.strip_prefix("Initial commit on "))
        .unwrap_or(header);
    let branch_name = match header.split_once("...") {
        Some((local, _upstream)) => local,
        None => header.split(' ').next().unwrap_or(header),
    };
    Some(branch_name.to_owned())
}

/// Parse `git status --porcelain=v1 --branch -z` output.
pub(crate) fn parse_status(output: &str) -> Result<Status> {
    let mut status = Status::default();
    let mut entries = output.split('\0').filter(|entry| !entry.is_empty());
    while let Some(entry) = entries.next() {
        if entry.starts_with("## ") {
            status.branch_name = parse_branch_header(entry);
            continue;
        }

        let mut chars = entry.chars();
        let (index, worktree) = match (chars.next(), chars.next(), chars.next()) {
            (Some(index), Some(worktree), Some(' ')) => (index, worktree),
            _ => {
                return Err(Error::ParseOutput {
                    item: "status entry",
                    line: entry.to_owned(),
                })
            }
        };
        let path = chars.as_str().to_owned();
        if matches!(index, 'R' | 'C') {
            // The source path of a rename or copy follows as its own entry.
            let _source_path = entries.next();
        }

        if (index, worktree) == ('?', '?') {
            status.untracked.push(path);
            continue;
        }
        if (index, worktree) == ('!', '!') {
            continue;
        }
        if is_conflict(index, worktree) {
            status.conflicting.push(path);
            continue;
        }

        match index {
            'A' => status.added.push(path.clone()),
            'M' | 'R' | 'C' | 'T' => status.changed.push(path.clone()),
            'D' => status.removed.push(path.clone()),
            _ => {}
        }
        match worktree {
            'M' | 'T' => status.modified.push(path),
            'D' => status.missing.push(path),
            _ => {}
        }
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() -> eyre::Result<()> {
        let output = [
            "## master...origin/master [ahead 1]",
            "A  new.txt",
            "M  staged.txt",
            "MM both.txt",
            " M edited.txt",
            "D  deleted.txt",
            " D gone.txt",
            "R  renamed.txt",
            "original.txt",
            "UU conflict.txt",
            "?? scratch/notes.txt",
            "",
        ]
        .join("\0");
        let status = parse_status(&output)?;
        assert_eq!(
            status,
            Status {
                branch_name: Some("master".to_string()),
                added: vec!["new.txt".to_string()],
                changed: vec![
                    "staged.txt".to_string(),
                    "both.txt".to_string(),
                    "renamed.txt".to_string(),
                ],
                removed: vec!["deleted.txt".to_string()],
                missing: vec!["gone.txt".to_string()],
                modified: vec!["both.txt".to_string(), "edited.txt".to_string()],
                untracked: vec!["scratch/notes.txt".to_string()],
                conflicting: vec!["conflict.txt".to_string()],
            }
        );
        assert!(!status.is_clean());
        Ok(())
    }

    #[test]
    fn test_parse_status_clean() -> eyre::Result<()> {
        let status = parse_status("## feature/login\0")?;
        assert_eq!(status.branch_name, Some("feature/login".to_string()));
        assert!(status.is_clean());
        Ok(())
    }

    #[test]
    fn test_parse_status_branch_headers() {
        assert_eq!(
            parse_branch_header("## No commits yet on master"),
            Some("master".to_string())
        );
        assert_eq!(parse_branch_header("## HEAD (no branch)"), None);
        assert_eq!(
            parse_branch_header("## topic...origin/topic [behind 2]"),
            Some("topic".to_string())
        );
    }

    #[test]
    fn test_parse_status_malformed() {
        assert!(matches!(
            parse_status("## master\0X\0"),
            Err(Error::ParseOutput { .. })
        ));
    }
}
