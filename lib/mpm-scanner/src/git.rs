//! Local Git metadata: repository presence, remotes and last commit date.
//!
//! Everything here shells out to the `git` binary and blocks until it exits.
//! Any failure degrades to an empty result.

use mpm_types::{GitInfo, GitRemote};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

/// Whether `path` holds a `.git` directory or worktree file
pub fn has_repo(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Probe a project directory for a repository and its fetch remotes
pub fn probe(path: &Path) -> GitInfo {
    if !has_repo(path) {
        return GitInfo::default();
    }

    let remotes = match run_git(path, &["remote", "-v"]) {
        Some(output) => parse_remotes(&output),
        None => Vec::new(),
    };

    GitInfo {
        has_repo: true,
        remotes,
    }
}

/// Parse `git remote -v` output.
///
/// Only `(fetch)` lines are used. A remote listed twice keeps the last URL.
/// Remotes come back ordered by name.
pub fn parse_remotes(output: &str) -> Vec<GitRemote> {
    let mut remotes = BTreeMap::new();
    for line in output.lines() {
        if !line.contains("(fetch)") {
            continue;
        }
        let mut fields = line.split_whitespace();
        if let (Some(name), Some(url)) = (fields.next(), fields.next()) {
            remotes.insert(name.to_string(), url.to_string());
        }
    }
    remotes
        .into_iter()
        .map(|(name, url)| GitRemote { name, url })
        .collect()
}

/// Date of the most recent commit, if the repository has one
pub fn last_commit_date(path: &Path) -> Option<chrono::NaiveDate> {
    if !has_repo(path) {
        return None;
    }
    let output = run_git(path, &["log", "-1", "--format=%cd", "--date=format:%Y-%m-%d"])?;
    chrono::NaiveDate::parse_from_str(output.trim(), "%Y-%m-%d").ok()
}

fn run_git(path: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => {
            log::debug!("git {:?} exited with {} in {}", args, output.status, path.display());
            None
        }
        Err(err) => {
            log::debug!("Failed to run git in {}: {}", path.display(), err);
            None
        }
    }
}
