use std::fmt::Display;

use tracing::warn;

/// The name of a reference, like `refs/heads/master`.
#[derive(Clone, Debug, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct ReferenceName(String);

impl ReferenceName {
    /// View this reference name as a string.
    pub fn as_str(&self) -> &str {
        let Self(reference_name) = self;
        reference_name
    }
}

impl From<&str> for ReferenceName {
    fn from(s: &str) -> Self {
        ReferenceName(s.to_owned())
    }
}

impl From<String> for ReferenceName {
    fn from(s: String) -> Self {
        ReferenceName(s)
    }
}

impl AsRef<str> for ReferenceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ReferenceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Determine what kind of branch a reference is, given its name.
#[derive(Debug, PartialEq, Eq)]
pub enum CategorizedReferenceName<'a> {
    /// The reference represents a local branch.
    LocalBranch {
        /// The full name of the reference.
        name: &'a str,

        /// The string `refs/heads/`.
        prefix: &'static str,
    },

    /// The reference represents a remote-tracking branch.
    RemoteBranch {
        /// The full name of the reference.
        name: &'a str,

        /// The string `refs/remotes/`.
        prefix: &'static str,
    },

    /// Some other kind of reference which isn't a branch at all.
    OtherRef {
        /// The full name of the reference.
        name: &'a str,
    },
}

impl<'a> CategorizedReferenceName<'a> {
    /// Categorize the provided reference name.
    pub fn new(name: &'a ReferenceName) -> Self {
        Self::from_name(name.as_str())
    }

    /// Categorize the provided reference name.
    pub fn from_name(name: &'a str) -> Self {
        if name.starts_with("refs/heads/") {
            Self::LocalBranch {
                name,
                prefix: "refs/heads/",
            }
        } else if name.starts_with("refs/remotes/") {
            Self::RemoteBranch {
                name,
                prefix: "refs/remotes/",
            }
        } else {
            Self::OtherRef { name }
        }
    }

    /// Remove the `refs/heads/` or `refs/remotes/` prefix from the reference
    /// name. For remote branches, the remote name is kept (`origin/feature`).
    pub fn remove_prefix(&self) -> &'a str {
        match *self {
            Self::LocalBranch { name, prefix } | Self::RemoteBranch { name, prefix } => {
                name.strip_prefix(prefix).unwrap_or(name)
            }
            Self::OtherRef { name } => name,
        }
    }

    /// The name of the remote a remote-tracking branch belongs to: the first
    /// path segment after `refs/remotes/`.
    pub fn remote_name(&self) -> Option<&'a str> {
        match self {
            Self::RemoteBranch { .. } => {
                let suffix = self.remove_prefix();
                suffix.split_once('/').map(|(remote_name, _)| remote_name)
            }
            Self::LocalBranch { .. } | Self::OtherRef { .. } => None,
        }
    }

    /// The plain branch name, without any prefix or remote name
    /// (`refs/remotes/origin/feature` becomes `feature`).
    pub fn branch_name(&self) -> &'a str {
        let suffix = self.remove_prefix();
        match self {
            Self::RemoteBranch { .. } => match suffix.split_once('/') {
                Some((_remote_name, branch_name)) => branch_name,
                None => suffix,
            },
            Self::LocalBranch { .. } | Self::OtherRef { .. } => suffix,
        }
    }

    /// Render the full name of the reference, including its prefix.
    pub fn render_full(&self) -> &'a str {
        match *self {
            Self::LocalBranch { name, .. }
            | Self::RemoteBranch { name, .. }
            | Self::OtherRef { name } => name,
        }
    }
}

/// Extract the fully-qualified reference name from the output of `git
/// show-ref <name>`: the second whitespace-delimited token of the first
/// line. Returns `None` if nothing matched.
pub fn parse_show_ref(output: &str) -> Option<ReferenceName> {
    let line = output.lines().next()?;
    let mut tokens = line.split_whitespace();
    let _oid = tokens.next()?;
    tokens.next().map(ReferenceName::from)
}

/// Which branches `git branch` should list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BranchListMode {
    /// Local branches only.
    #[default]
    Local,

    /// Remote-tracking branches only.
    Remote,

    /// Both.
    All,
}

/// A branch, as listed by `git branch`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    /// The fully-qualified reference name, like `refs/heads/master`.
    pub name: String,

    /// The short name, like `master` or `origin/master`.
    pub display_name: String,

    /// Whether this is the branch `HEAD` points to.
    pub active: bool,

    /// Whether this is a remote-tracking branch.
    pub remote: bool,
}

impl Branch {
    /// Build a branch from its fully-qualified reference name.
    pub fn from_reference(name: &ReferenceName, active: bool) -> Self {
        let categorized = CategorizedReferenceName::new(name);
        Self {
            name: name.as_str().to_owned(),
            display_name: categorized.remove_prefix().to_owned(),
            active,
            remote: matches!(categorized, CategorizedReferenceName::RemoteBranch { .. }),
        }
    }
}

/// `--format` argument for `git branch` understood by [`parse_branch_list`].
pub(crate) const BRANCH_LIST_FORMAT: &str = "--format=%(HEAD) %(refname)";

/// Parse `git branch --format='%(HEAD) %(refname)'` output. The symbolic
/// `refs/remotes/<remote>/HEAD` entries are skipped.
pub(crate) fn parse_branch_list(output: &str) -> Vec<Branch> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (head, name) = match line.split_once(' ') {
                Some(parts) => parts,
                None => {
                    warn!(?line, "Unexpected branch list line");
                    return None;
                }
            };
            let name = ReferenceName::from(name.trim());
            let categorized = CategorizedReferenceName::new(&name);
            if let CategorizedReferenceName::RemoteBranch { .. } = categorized {
                if categorized.branch_name() == "HEAD" {
                    return None;
                }
            }
            Some(Branch::from_reference(&name, head == "*"))
        })
        .collect()
}
