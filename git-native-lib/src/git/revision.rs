use crate::git::{Error, GitUser, Result};

/// A single commit, as produced by `git log` or by committing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Revision {
    /// The commit hash. Empty for a fake revision.
    pub id: String,

    /// The full commit message. For a fake revision, the reason no commit
    /// was made.
    pub message: String,

    /// The branch the commit was made on, when known.
    pub branch: Option<String>,

    /// Who committed.
    pub committer: GitUser,

    /// Who authored the change.
    pub author: GitUser,

    /// Committer timestamp, in seconds since the Unix epoch.
    pub commit_time: i64,

    /// Set when no commit was actually created.
    pub fake: bool,
}

impl Revision {
    /// A placeholder revision standing in for a commit that was not made.
    pub fn fake(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fake: true,
            ..Default::default()
        }
    }
}

const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\x1e';

/// `--format` argument for `git log` understood by [`parse_log`]. Fields are
/// separated by ASCII unit separators and records by record separators, so
/// that messages may contain anything but those two characters.
pub(crate) const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%ae%x1f%cn%x1f%ce%x1f%ct%x1f%B%x1e";

/// `--format` argument for `git log` understood by [`parse_committers`].
pub(crate) const COMMITTERS_FORMAT: &str = "--format=%cn%x1f%ce";

/// Parse `git log` output produced with [`LOG_FORMAT`].
pub(crate) fn parse_log(output: &str) -> Result<Vec<Revision>> {
    output
        .split(RECORD_SEPARATOR)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.is_empty())
        .map(parse_log_record)
        .collect()
}

fn parse_log_record(record: &str) -> Result<Revision> {
    let fields: Vec<&str> = record.splitn(7, FIELD_SEPARATOR).collect();
    match fields.as_slice() {
        [id, author_name, author_email, committer_name, committer_email, commit_time, message] => {
            let commit_time = commit_time.parse().map_err(|_| Error::ParseOutput {
                item: "commit time",
                line: record.to_owned(),
            })?;
            Ok(Revision {
                id: id.to_string(),
                message: message.trim_end().to_owned(),
                branch: None,
                committer: GitUser::new(*committer_name, *committer_email),
                author: GitUser::new(*author_name, *author_email),
                commit_time,
                fake: false,
            })
        }
        _ => Err(Error::ParseOutput {
            item: "log record",
            line: record.to_owned(),
        }),
    }
}

/// Parse `git log` output produced with [`COMMITTERS_FORMAT`].
pub(crate) fn parse_committers(output: &str) -> Vec<GitUser> {
    output
        .lines()
        .filter_map(|line| line.split_once(FIELD_SEPARATOR))
        .map(|(name, email)| GitUser::new(name, email))
        .collect()
}
