use tracing::warn;

/// A configured remote, as listed by `git remote -v`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Remote {
    /// The name of the remote, like `origin`.
    pub name: String,

    /// The URL fetched from.
    pub url: String,

    /// The URL pushed to, if it differs from `url`.
    pub push_url: Option<String>,
}

/// A reference advertised by a remote repository, as listed by `git
/// ls-remote`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteReference {
    /// The object the reference points to.
    pub commit_id: String,

    /// The fully-qualified reference name.
    pub reference: String,
}

/// Parse the output of `git remote -v`, which lists one line per remote and
/// direction:
///
/// ```text
/// origin	https://example.com/repo.git (fetch)
/// origin	https://example.com/repo.git (push)
/// ```
pub(crate) fn parse_remote_list(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        let (name, rest) = match line.split_once('\t') {
            Some(parts) => parts,
            None => {
                warn!(?line, "Unexpected remote list line");
                continue;
            }
        };
        let (url, direction) = match rest.rsplit_once(' ') {
            Some((url, direction)) => (url, direction),
            None => (rest, "(fetch)"),
        };
        let index = match remotes.iter().position(|remote| remote.name == name) {
            Some(index) => index,
            None => {
                remotes.push(Remote {
                    name: name.to_owned(),
                    url: url.to_owned(),
                    push_url: None,
                });
                remotes.len() - 1
            }
        };
        let remote = &mut remotes[index];
        match direction {
            "(push)" => {
                if remote.url != url {
                    remote.push_url = Some(url.to_owned());
                }
            }
            _ => remote.url = url.to_owned(),
        }
    }
    remotes
}

/// Parse the output of `git ls-remote`: `<oid>\t<reference>` per line.
pub(crate) fn parse_ls_remote(output: &str) -> Vec<RemoteReference> {
    output
        .lines()
        .filter_map(|line| {
            let (commit_id, reference) = line.split_once('\t')?;
            Some(RemoteReference {
                commit_id: commit_id.to_owned(),
                reference: reference.to_owned(),
            })
        })
        .collect()
}
