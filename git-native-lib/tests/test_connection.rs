use std::sync::Arc;

use nativegit::core::config::CREDENTIALS_PROVIDER_KEY;
use nativegit::core::context::RequestContext;
use nativegit::git::commands::{CheckoutCommand, DiffCommand, DiffType, LogCommand, MergeStatus};
use nativegit::git::{
    BranchListMode, CommitRequest, CredentialsLoader, CredentialsProvider, Error, GitUser,
    ReferenceName, TagCreateRequest, UserCredential,
};
use nativegit::testing::{
    make_git, make_request_context, TEST_COMMITTER_EMAIL, TEST_COMMITTER_NAME,
};

fn web_committer() -> GitUser {
    GitUser::new(TEST_COMMITTER_NAME, TEST_COMMITTER_EMAIL)
}

#[derive(Debug)]
struct IdentityProvider;

impl CredentialsProvider for IdentityProvider {
    fn id(&self) -> &str {
        "identity-provider"
    }

    fn can_provide_credentials(&self, _url: &str, _ctx: &RequestContext) -> bool {
        true
    }

    fn get_user_credential(&self, _ctx: &RequestContext) -> eyre::Result<Option<UserCredential>> {
        Ok(Some(UserCredential {
            username: "oauth".to_string(),
            secret: "token".to_string(),
            provider_id: self.id().to_string(),
        }))
    }

    fn get_user(&self, _ctx: &RequestContext) -> eyre::Result<Option<GitUser>> {
        Ok(Some(GitUser::new("Provider User", "provider@example.com")))
    }
}

#[test]
fn test_precondition_fails_in_subdirectory() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    std::fs::create_dir_all(git.repo_path.join("subdir"))?;

    let connection = git
        .make_connection_factory(Default::default())
        .connect(&git.repo_path.join("subdir"), &make_request_context());
    match connection.status() {
        Err(Error::NotAGitRepository { path }) => {
            assert_eq!(path, git.repo_path.join("subdir"));
        }
        other => eyre::bail!("Expected NotAGitRepository, got {other:?}"),
    }
    assert!(matches!(
        connection.commit(&CommitRequest {
            message: "should not happen".to_string(),
            ..Default::default()
        }),
        Err(Error::NotAGitRepository { .. })
    ));

    // The enclosing repository is still reachable through its root.
    assert!(git.make_connection().status()?.is_clean());
    Ok(())
}

#[test]
fn test_precondition_fails_outside_repository() -> eyre::Result<()> {
    let git = make_git()?;
    let connection = git.make_connection();
    assert!(!connection.is_inside_work_tree()?);
    assert!(matches!(
        connection.branch_list(BranchListMode::Local),
        Err(Error::NotAGitRepository { .. })
    ));
    Ok(())
}

#[test]
fn test_init() -> eyre::Result<()> {
    let git = make_git()?;
    let connection = git.make_connection();
    connection.init(false)?;
    assert!(connection.is_inside_work_tree()?);
    assert!(git.repo_path.join(".git").is_dir());
    Ok(())
}

#[test]
fn test_commit_with_nothing_to_commit() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let connection = git.make_connection();
    let revision = connection.commit(&CommitRequest {
        message: "nothing here".to_string(),
        ..Default::default()
    })?;
    assert!(revision.fake);
    assert!(revision.id.is_empty());
    assert!(
        revision.message.contains("nothing to commit"),
        "{}",
        revision.message
    );
    Ok(())
}

#[test]
fn test_commit_other_failures_propagate() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let connection = git.make_connection();
    let result = connection.commit(&CommitRequest {
        message: "missing file".to_string(),
        files: vec!["does-not-exist.txt".to_string()],
        ..Default::default()
    });
    match result {
        Err(Error::GitFailed { message, .. }) => {
            assert!(message.contains("does-not-exist.txt"), "{message}");
        }
        other => eyre::bail!("Expected GitFailed, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_commit_author_is_committer() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.write_file("test1.txt", "hello\n")?;

    let connection = git.make_connection();
    connection.add(&[], false)?;
    let revision = connection.commit(&CommitRequest {
        message: "Add test1".to_string(),
        ..Default::default()
    })?;
    assert!(!revision.fake);
    assert_eq!(revision.message, "Add test1");
    assert_eq!(revision.branch.as_deref(), Some("master"));
    assert_eq!(revision.committer, web_committer());
    assert_eq!(revision.author, web_committer());

    let (head, _stderr) = git.run(&["rev-parse", "HEAD"])?;
    assert_eq!(revision.id, head.trim());
    let (author, _stderr) = git.run(&["log", "-1", "--format=%an <%ae>"])?;
    insta::assert_snapshot!(author, @"Web Committer <web-committer@example.com>");
    Ok(())
}

#[test]
fn test_local_committer_without_provider() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let connection = git.make_connection();
    assert_eq!(connection.get_local_committer()?, web_committer());

    let anonymous = git.make_connection_with(Default::default(), &RequestContext::anonymous());
    assert_eq!(anonymous.get_local_committer()?, GitUser::anonymous());
    Ok(())
}

#[test]
fn test_local_committer_overridden_by_provider() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.run(&["config", CREDENTIALS_PROVIDER_KEY, "identity-provider"])?;

    let connection = git.make_connection_with(
        CredentialsLoader::new(vec![Arc::new(IdentityProvider)]),
        &make_request_context(),
    );
    let provider_user = GitUser::new("Provider User", "provider@example.com");
    assert_eq!(connection.get_local_committer()?, provider_user);
    // Resolving twice gives the same identity.
    assert_eq!(connection.get_local_committer()?, provider_user);

    git.write_file("test1.txt", "hello\n")?;
    connection.add(&["test1.txt".to_string()], false)?;
    let revision = connection.commit(&CommitRequest {
        message: "Add test1".to_string(),
        ..Default::default()
    })?;
    assert_eq!(revision.committer, provider_user);
    assert_eq!(revision.author, provider_user);

    // An unknown provider id falls back to the bound user.
    git.run(&["config", CREDENTIALS_PROVIDER_KEY, "someone-else"])?;
    assert_eq!(connection.get_local_committer()?, web_committer());
    Ok(())
}

#[test]
fn test_status() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.write_file("initial.txt", "changed\n")?;
    git.write_file("dir/new.txt", "new\n")?;

    let connection = git.make_connection();
    let status = connection.status()?;
    assert_eq!(status.branch_name.as_deref(), Some("master"));
    assert_eq!(status.modified, vec!["initial.txt"]);
    assert_eq!(status.untracked, vec!["dir/new.txt"]);
    assert!(!status.is_clean());

    connection.add(&[], false)?;
    let status = connection.status()?;
    assert_eq!(status.added, vec!["dir/new.txt"]);
    assert_eq!(status.changed, vec!["initial.txt"]);
    assert!(status.modified.is_empty());
    Ok(())
}

#[test]
fn test_log_and_committers() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.commit_file("test1", 1)?;
    git.commit_file("test2", 2)?;

    let connection = git.make_connection();
    let revisions = connection.log(&LogCommand {
        max_count: Some(2),
        ..Default::default()
    })?;
    let messages: Vec<&str> = revisions
        .iter()
        .map(|revision| revision.message.as_str())
        .collect();
    assert_eq!(messages, vec!["create test2.txt", "create test1.txt"]);
    assert!(revisions.iter().all(|revision| !revision.fake));

    let revisions = connection.log(&LogCommand {
        paths: vec!["test1.txt".to_string()],
        ..Default::default()
    })?;
    assert_eq!(revisions.len(), 1);

    git.write_file("test3.txt", "three\n")?;
    connection.add(&[], false)?;
    connection.commit(&CommitRequest {
        message: "create test3.txt".to_string(),
        ..Default::default()
    })?;
    let committers = connection.get_committers()?;
    assert_eq!(
        committers,
        vec![
            web_committer(),
            GitUser::new("Testy McTestface", "test@example.com")
        ]
    );
    Ok(())
}

#[test]
fn test_diff_and_show_file_content() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.write_file("initial.txt", "changed\n")?;

    let connection = git.make_connection();
    let names = connection.diff(&DiffCommand {
        diff_type: DiffType::NameOnly,
        ..Default::default()
    })?;
    assert_eq!(names, "initial.txt\n");

    let patch = connection.diff(&Default::default())?;
    assert!(patch.contains("-initial contents"), "{patch}");
    assert!(patch.contains("+changed"), "{patch}");

    let content = connection.show_file_content("HEAD", "initial.txt")?;
    assert_eq!(content, "initial contents\n");
    Ok(())
}

#[test]
fn test_index_operations() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.commit_file("test1", 1)?;

    let connection = git.make_connection();
    connection.mv("test1.txt", "renamed.txt")?;
    let status = connection.status()?;
    assert_eq!(status.changed, vec!["renamed.txt"]);

    connection.rm(&["initial.txt".to_string()], true, false)?;
    let status = connection.status()?;
    assert_eq!(status.removed, vec!["initial.txt"]);
    assert_eq!(status.untracked, vec!["initial.txt"]);

    connection.reset(&Default::default())?;
    connection.checkout(&CheckoutCommand {
        files: vec!["test1.txt".to_string()],
        ..Default::default()
    })?;
    let status = connection.status()?;
    assert!(status.changed.is_empty());
    assert_eq!(status.untracked, vec!["renamed.txt"]);
    Ok(())
}

#[test]
fn test_branches() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let connection = git.make_connection();
    let branch = connection.branch_create("topic", None)?;
    assert_eq!(branch.name, "refs/heads/topic");
    assert_eq!(branch.display_name, "topic");
    assert!(!branch.active);

    connection.branch_rename("topic", "feature")?;
    let names: Vec<String> = connection
        .branch_list(BranchListMode::Local)?
        .into_iter()
        .map(|branch| branch.display_name)
        .collect();
    assert_eq!(names, vec!["feature", "master"]);

    assert_eq!(
        connection.get_branch_ref("feature")?,
        ReferenceName::from("refs/heads/feature")
    );
    assert!(matches!(
        connection.get_branch_ref("topic"),
        Err(Error::ResolveRef { .. })
    ));

    connection.branch_delete("feature", false)?;
    let branches = connection.branch_list(BranchListMode::All)?;
    assert_eq!(branches.len(), 1);
    assert!(branches[0].active);
    Ok(())
}

#[test]
fn test_tags() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let connection = git.make_connection();
    let tag = connection.tag_create(&TagCreateRequest {
        name: "v1.0".to_string(),
        message: Some("Release 1.0".to_string()),
        ..Default::default()
    })?;
    assert_eq!(tag.name, "v1.0");
    connection.tag_create(&TagCreateRequest {
        name: "experiment".to_string(),
        ..Default::default()
    })?;

    let (tagger, _stderr) = git.run(&[
        "for-each-ref",
        "--format=%(taggername) %(taggeremail)",
        "refs/tags/v1.0",
    ])?;
    insta::assert_snapshot!(tagger, @"Web Committer <web-committer@example.com>");

    let names: Vec<String> = connection
        .tag_list(None)?
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, vec!["experiment", "v1.0"]);
    let names: Vec<String> = connection
        .tag_list(Some("v*"))?
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, vec!["v1.0"]);

    connection.tag_delete("v1.0")?;
    assert!(connection.tag_list(Some("v*"))?.is_empty());
    Ok(())
}

#[test]
fn test_merge_checks_object_type() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let connection = git.make_connection();
    let err = match connection.merge("HEAD^{tree}") {
        Err(err) => err,
        Ok(result) => eyre::bail!("Expected failure, got {result:?}"),
    };
    insta::assert_snapshot!(err, @"invalid object for merge: 'HEAD^{tree}' is a tree, expected a commit or tag");

    assert!(matches!(
        connection.merge("HEAD:initial.txt"),
        Err(Error::InvalidMergeObject { kind, .. }) if kind == "blob"
    ));
    assert!(matches!(
        connection.merge("nonexistent"),
        Err(Error::GitFailed { .. })
    ));
    Ok(())
}

#[test]
fn test_merge() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.run(&["checkout", "-b", "topic"])?;
    let topic_oid = git.commit_file("test1", 1)?;
    git.run(&["checkout", "master"])?;

    let connection = git.make_connection();
    let result = connection.merge("topic")?;
    assert_eq!(result.status, MergeStatus::FastForward);
    assert_eq!(result.new_head, Some(topic_oid));

    let result = connection.merge("topic")?;
    assert_eq!(result.status, MergeStatus::AlreadyUpToDate);

    git.run(&["checkout", "-b", "conflict", "HEAD~1"])?;
    git.write_file("test1.txt", "conflicting contents\n")?;
    git.run(&["add", "."])?;
    git.run(&["commit", "-m", "conflict"])?;
    let result = connection.merge("master")?;
    assert_eq!(result.status, MergeStatus::Conflicting);
    assert_eq!(result.conflicts, vec!["test1.txt"]);
    Ok(())
}

#[test]
fn test_config() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let connection = git.make_connection();
    let config = connection.get_config();
    assert_eq!(config.get("user.name")?.as_deref(), Some("Testy McTestface"));
    assert_eq!(config.get("nativegit.missing")?, None);
    assert_eq!(config.get_or("nativegit.missing", "fallback")?, "fallback");

    config.set("nativegit.key", "one")?;
    config.add("nativegit.key", "two")?;
    assert_eq!(config.get_all("nativegit.key")?, vec!["one", "two"]);
    assert!(config
        .list()?
        .contains(&("nativegit.key".to_string(), "two".to_string())));

    config.unset("nativegit.key")?;
    assert_eq!(config.get("nativegit.key")?, None);
    // Unsetting again is not an error.
    config.unset("nativegit.key")?;
    Ok(())
}
