use std::sync::Arc;
use std::time::Duration;

use nativegit::core::output::CollectingLineConsumer;
use nativegit::git::{Error, GitRunInfo, GitRunOpts};
use nativegit::testing::make_git;

#[test]
fn test_run_captures_output() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let git_run_info = git.get_git_run_info();
    let result = git_run_info.run(&["rev-parse", "--abbrev-ref", "HEAD"], Default::default())?;
    assert!(result.exit_code.is_success());
    assert_eq!(result.stdout_text()?, "master\n");
    Ok(())
}

#[test]
fn test_run_failure_carries_raw_stderr() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let git_run_info = git.get_git_run_info();
    let err = match git_run_info.run(&["rev-parse", "--verify", "nonexistent"], Default::default())
    {
        Ok(result) => eyre::bail!("Expected failure, got {result:?}"),
        Err(err) => err,
    };
    match &err {
        Error::GitFailed {
            args,
            exit_code,
            message,
        } => {
            assert_eq!(args, &["rev-parse", "--verify", "nonexistent"]);
            assert!(!exit_code.is_success());
            insta::assert_snapshot!(message, @"fatal: Needed a single revision");
        }
        other => eyre::bail!("Unexpected error: {other:?}"),
    }

    let result = git_run_info.run(
        &["rev-parse", "--verify", "nonexistent"],
        GitRunOpts {
            treat_git_failure_as_error: false,
            ..Default::default()
        },
    )?;
    assert!(!result.exit_code.is_success());
    Ok(())
}

#[test]
fn test_run_streams_lines_to_consumer() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.commit_file("test1", 1)?;

    let consumer = CollectingLineConsumer::default();
    let git_run_info = git.get_git_run_info();
    let result = git_run_info.run(
        &["log", "--format=%s"],
        GitRunOpts {
            line_consumer: Some(Arc::new(consumer.clone())),
            ..Default::default()
        },
    )?;
    assert_eq!(result.stdout_text()?, "create test1.txt\ncreate initial.txt\n");
    assert_eq!(
        consumer.lines(),
        vec!["create test1.txt".to_string(), "create initial.txt".to_string()]
    );
    Ok(())
}

#[test]
fn test_run_environment_is_replaced() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let git_run_info = git.get_git_run_info();
    let result = git_run_info.run(
        &["var", "GIT_COMMITTER_IDENT"],
        GitRunOpts {
            env: vec![
                ("GIT_COMMITTER_NAME".into(), "Override".into()),
                ("GIT_COMMITTER_EMAIL".into(), "override@example.com".into()),
            ],
            ..Default::default()
        },
    )?;
    assert!(result
        .stdout_text()?
        .starts_with("Override <override@example.com>"));
    Ok(())
}

#[test]
fn test_spawn_failure() -> eyre::Result<()> {
    let git = make_git()?;
    let git_run_info = GitRunInfo {
        path_to_git: git.repo_path.join("no-such-git"),
        ..git.get_git_run_info()
    };
    let result = git_run_info.run(&["status"], Default::default());
    assert!(matches!(result, Err(Error::SpawnGit(_))));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_run_timeout_kills_process() -> eyre::Result<()> {
    let git = make_git()?;
    let sleep = match nativegit::util::get_from_path("sleep") {
        Some(sleep) => sleep,
        None => return Ok(()),
    };
    let git_run_info = GitRunInfo {
        path_to_git: sleep,
        ..git.get_git_run_info()
    };

    let start = std::time::Instant::now();
    let result = git_run_info.run(
        &["30"],
        GitRunOpts {
            timeout: Some(Duration::from_millis(200)),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::Timeout { .. })));
    assert!(start.elapsed() < Duration::from_secs(10));
    Ok(())
}

#[cfg(unix)]
fn process_is_running(pid: i32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    if kill(Pid::from_raw(pid), None).is_err() {
        return false;
    }
    // A killed process whose parent is gone may linger as a zombie until it
    // is reaped.
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => match stat.rsplit_once(") ") {
            Some((_, fields)) => !fields.starts_with('Z'),
            None => true,
        },
        Err(_) => true,
    }
}

#[cfg(unix)]
#[test]
fn test_run_timeout_kills_spawned_processes() -> eyre::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let git = make_git()?;
    let stub_dir = tempfile::tempdir()?;
    let pid_file = stub_dir.path().join("sleep.pid");
    let stub = stub_dir.path().join("stub-git");
    std::fs::write(
        &stub,
        format!(
            "#!/bin/sh\nsleep 41 &\necho $! > '{}'\nwait\nexit 0\n",
            pid_file.display()
        ),
    )?;
    std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755))?;
    let git_run_info = GitRunInfo {
        path_to_git: stub,
        ..git.get_git_run_info()
    };

    let start = std::time::Instant::now();
    let result = git_run_info.run(
        &["fetch", "origin"],
        GitRunOpts {
            timeout: Some(Duration::from_millis(300)),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::Timeout { .. })), "{result:?}");
    assert!(start.elapsed() < Duration::from_secs(10));

    let pid: i32 = std::fs::read_to_string(&pid_file)?.trim().parse()?;
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while process_is_running(pid) {
        if std::time::Instant::now() >= deadline {
            eyre::bail!("sleep {pid} is still running after the timeout");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    Ok(())
}
