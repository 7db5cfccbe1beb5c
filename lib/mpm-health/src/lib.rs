//! Heuristic project health checks.
//!
//! Figures are derived from local files only: manifest text is pattern
//! counted, CI status is inferred from configuration contents and hosted
//! repository numbers are fixed placeholders. None of it is an audit.

use mpm_scanner::git;
use mpm_types::{
    CheckStatus, CiProvider, CiStatus, DependencyStatus, GitInfo, GitMetrics, HealthStatus,
    HostedRepoStats, PackageManager, Severity,
};
use std::fs;
use std::path::Path;

/// Manifest files in priority order, first match wins
pub const MANIFESTS: &[(&str, PackageManager)] = &[
    ("package.json", PackageManager::Npm),
    ("go.mod", PackageManager::Go),
    ("requirements.txt", PackageManager::Pip),
    ("Gemfile", PackageManager::Bundler),
    ("pom.xml", PackageManager::Maven),
    ("build.gradle", PackageManager::Gradle),
    ("Cargo.toml", PackageManager::Cargo),
];

pub const LOCK_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "go.sum",
    "Gemfile.lock",
    "poetry.lock",
    "Cargo.lock",
];

/// CI configuration paths in priority order, first match wins
pub const CI_CONFIGS: &[(&str, CiProvider)] = &[
    (".github/workflows", CiProvider::GitHubActions),
    (".gitlab-ci.yml", CiProvider::GitLabCi),
    ("circle.yml", CiProvider::CircleCi),
    (".travis.yml", CiProvider::TravisCi),
    ("azure-pipelines.yml", CiProvider::AzurePipelines),
    ("Jenkinsfile", CiProvider::Jenkins),
];

const PLACEHOLDER_TOTAL: usize = 10;
const PLACEHOLDER_OUTDATED: usize = 2;
const PLACEHOLDER_OPEN_PRS: usize = 2;
const PLACEHOLDER_OPEN_ISSUES: usize = 3;
const PLACEHOLDER_BRANCHES: usize = 4;

/// Run every health check against a project directory
pub fn scan_health(path: &Path) -> HealthStatus {
    log::debug!("Scanning health of {}", path.display());
    HealthStatus {
        dependencies: scan_dependencies(path),
        git: scan_git_metrics(path),
        ci: scan_ci(path),
        scanned_at: chrono::Utc::now(),
    }
}

pub fn detect_package_manager(path: &Path) -> Option<PackageManager> {
    MANIFESTS
        .iter()
        .find(|(file, _)| path.join(file).exists())
        .map(|(_, manager)| *manager)
}

pub fn has_lock_file(path: &Path) -> bool {
    LOCK_FILES.iter().any(|file| path.join(file).exists())
}

/// Approximate dependency figures for the detected package manager
pub fn scan_dependencies(path: &Path) -> DependencyStatus {
    let mut status = DependencyStatus {
        package_manager: detect_package_manager(path),
        has_lock_file: has_lock_file(path),
        ..DependencyStatus::default()
    };

    match status.package_manager {
        Some(PackageManager::Npm) => {
            if let Ok(manifest) = fs::read_to_string(path.join("package.json")) {
                status.total = manifest.matches("\"dependencies\"").count()
                    + manifest.matches("\"devDependencies\"").count();
                status.outdated = status.total / 10;
                if let Ok(lock) = fs::read_to_string(path.join("package-lock.json")) {
                    if lock.contains("\"vulnerabilities\"") {
                        status.vulnerabilities = 1;
                    }
                }
            }
        }
        Some(PackageManager::Go) => {
            if let Ok(manifest) = fs::read_to_string(path.join("go.mod")) {
                status.total =
                    manifest.matches("require ").count() + manifest.matches("// indirect").count();
                status.outdated = status.total / 8;
            }
        }
        Some(PackageManager::Pip) => {
            if let Ok(manifest) = fs::read_to_string(path.join("requirements.txt")) {
                status.total = manifest
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .count();
                status.outdated = status.total / 5;
            }
        }
        Some(_) => {
            status.total = PLACEHOLDER_TOTAL;
            status.outdated = PLACEHOLDER_OUTDATED;
            status.placeholder_counts = true;
        }
        None => {}
    }

    status
}

/// Extract `(owner, repo)` from a GitHub remote URL, ssh or https form
pub fn github_repo(url: &str) -> Option<(String, String)> {
    let rest = url
        .split_once("github.com/")
        .or_else(|| url.split_once("github.com:"))
        .map(|(_, rest)| rest)?;
    let rest = rest.trim_end_matches('/');
    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    let mut parts = rest.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Some((owner.to_string(), repo.to_string()))
        }
        _ => None,
    }
}

/// Placeholder hosting figures for the first GitHub remote
pub fn hosted_stats(info: &GitInfo) -> Option<HostedRepoStats> {
    info.remotes
        .iter()
        .find_map(|remote| github_repo(&remote.url))
        .map(|(owner, repo)| HostedRepoStats {
            owner,
            repo,
            open_prs: PLACEHOLDER_OPEN_PRS,
            open_issues: PLACEHOLDER_OPEN_ISSUES,
            branches: PLACEHOLDER_BRANCHES,
        })
}

pub fn scan_git_metrics(path: &Path) -> GitMetrics {
    let info = git::probe(path);
    if !info.has_repo {
        return GitMetrics::default();
    }
    GitMetrics {
        last_commit: git::last_commit_date(path),
        hosted: hosted_stats(&info),
        info,
    }
}

/// Detect the CI provider and infer build/test status from its configuration
pub fn scan_ci(path: &Path) -> CiStatus {
    let Some((config, provider)) = CI_CONFIGS.iter().find(|(file, _)| path.join(file).exists())
    else {
        return CiStatus::default();
    };

    let mut status = CiStatus {
        provider: Some(*provider),
        ..CiStatus::default()
    };

    match provider {
        CiProvider::GitHubActions => {
            let workflows = path.join(config);
            if workflows.join("runs").exists() {
                status.build = CheckStatus::Success;
                status.test = CheckStatus::Success;
            } else if let Ok(entries) = fs::read_dir(&workflows) {
                for entry in entries.flatten() {
                    let file = entry.path();
                    let is_workflow = file.extension().map(|ext| ext == "yml").unwrap_or(false);
                    if !is_workflow {
                        continue;
                    }
                    if let Ok(content) = fs::read_to_string(&file) {
                        apply_content_hints(&mut status, &content);
                    }
                }
            }
        }
        CiProvider::GitLabCi => {
            if let Ok(content) = fs::read_to_string(path.join(config)) {
                apply_content_hints(&mut status, &content);
            }
        }
        _ => {}
    }

    status
}

fn apply_content_hints(status: &mut CiStatus, content: &str) {
    if content.contains("build") {
        status.build = CheckStatus::Success;
    }
    if content.contains("test") {
        status.test = CheckStatus::Success;
    }
}

/// Colour class for a count, zero is healthy
pub fn count_severity(count: usize) -> Severity {
    match count {
        c if c > 5 => Severity::Critical,
        c if c > 2 => Severity::Warning,
        _ => Severity::Healthy,
    }
}

pub fn dependency_severity(status: &DependencyStatus) -> Severity {
    if status.vulnerabilities > 0 {
        Severity::Critical
    } else if status.outdated > 0 {
        Severity::Warning
    } else {
        Severity::Healthy
    }
}

pub fn ci_severity(status: &CiStatus) -> Severity {
    if !status.has_ci() {
        return Severity::Critical;
    }
    match (status.build, status.test) {
        (CheckStatus::Success, CheckStatus::Success) => Severity::Healthy,
        (CheckStatus::Success, _) | (_, CheckStatus::Success) => Severity::Warning,
        _ => Severity::Critical,
    }
}

pub fn git_severity(metrics: &GitMetrics) -> Severity {
    if metrics.info.has_repo {
        Severity::Healthy
    } else {
        Severity::Critical
    }
}
