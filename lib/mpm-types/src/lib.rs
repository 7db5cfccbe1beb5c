use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Label shown for projects stored with an empty category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Default depth used when scanning a project for file statistics
pub const DEFAULT_SCAN_DEPTH: usize = 3;

/// A bookmarked project directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Unique, case-sensitive identifier
    pub name: String,
    /// Absolute path to the project directory
    pub path: PathBuf,
    /// Free-text grouping label, may be empty
    #[serde(default)]
    pub category: String,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            category: category.into(),
        }
    }

    /// Category used for grouping and display
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            UNCATEGORIZED
        } else {
            &self.category
        }
    }
}

/// The persisted document: an ordered sequence of projects
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Catalog {
    pub fn find(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Category groups sorted by name, empty categories folded into `Uncategorized`
    pub fn categories(&self) -> Vec<CategorySummary> {
        let mut counts = std::collections::BTreeMap::<&str, usize>::new();
        for project in &self.projects {
            *counts.entry(project.display_category()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(name, count)| CategorySummary {
                name: name.to_string(),
                count,
            })
            .collect()
    }

    /// Projects grouped by display category, groups in category order
    pub fn grouped(&self) -> Vec<(String, Vec<&Project>)> {
        let mut groups = std::collections::BTreeMap::<&str, Vec<&Project>>::new();
        for project in &self.projects {
            groups.entry(project.display_category()).or_default().push(project);
        }
        groups
            .into_iter()
            .map(|(name, projects)| (name.to_string(), projects))
            .collect()
    }
}

/// A category and the number of projects in it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
}

/// A single file or directory found while scanning a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the scan root, `/` separated
    pub relative_path: String,
    pub is_dir: bool,
    pub size_bytes: u64,
    /// Lower-cased extension including the leading dot, empty for directories
    pub extension: String,
}

/// Number of files sharing an extension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtensionCount {
    pub extension: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitRemote {
    pub name: String,
    pub url: String,
}

/// Local version-control metadata for a project
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitInfo {
    pub has_repo: bool,
    pub remotes: Vec<GitRemote>,
}

/// Package managers recognised by their manifest file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Go,
    Pip,
    Bundler,
    Maven,
    Gradle,
    Cargo,
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageManager::Npm => write!(f, "npm"),
            PackageManager::Go => write!(f, "go"),
            PackageManager::Pip => write!(f, "pip"),
            PackageManager::Bundler => write!(f, "bundler"),
            PackageManager::Maven => write!(f, "maven"),
            PackageManager::Gradle => write!(f, "gradle"),
            PackageManager::Cargo => write!(f, "cargo"),
        }
    }
}

/// Approximate dependency figures derived from manifest text
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyStatus {
    pub package_manager: Option<PackageManager>,
    pub has_lock_file: bool,
    pub total: usize,
    pub outdated: usize,
    pub vulnerabilities: usize,
    /// Set when the counts are fixed stand-ins rather than derived from files
    pub placeholder_counts: bool,
}

/// Stand-in figures shown for repositories hosted on GitHub.
///
/// These are never fetched from the hosting service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostedRepoStats {
    pub owner: String,
    pub repo: String,
    pub open_prs: usize,
    pub open_issues: usize,
    pub branches: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitMetrics {
    pub info: GitInfo,
    pub last_commit: Option<chrono::NaiveDate>,
    pub hosted: Option<HostedRepoStats>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CiProvider {
    GitHubActions,
    GitLabCi,
    CircleCi,
    TravisCi,
    AzurePipelines,
    Jenkins,
}

impl std::fmt::Display for CiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CiProvider::GitHubActions => write!(f, "GitHub Actions"),
            CiProvider::GitLabCi => write!(f, "GitLab CI"),
            CiProvider::CircleCi => write!(f, "CircleCI"),
            CiProvider::TravisCi => write!(f, "Travis CI"),
            CiProvider::AzurePipelines => write!(f, "Azure Pipelines"),
            CiProvider::Jenkins => write!(f, "Jenkins"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckStatus {
    Success,
    #[default]
    Unknown,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Success => write!(f, "Success"),
            CheckStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CiStatus {
    pub provider: Option<CiProvider>,
    pub build: CheckStatus,
    pub test: CheckStatus,
}

impl CiStatus {
    pub fn has_ci(&self) -> bool {
        self.provider.is_some()
    }
}

/// Heuristic health snapshot of a project directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub dependencies: DependencyStatus,
    pub git: GitMetrics,
    pub ci: CiStatus,
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

/// Traffic-light classification used by the health dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    Healthy,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Healthy => write!(f, "healthy"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// User settings that shape scanning and storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Overrides the default project file location
    pub store_path: Option<PathBuf>,
    /// Depth bound for the detail view scan, 0 means unbounded
    pub scan_max_depth: usize,
    /// Extra glob patterns excluded on top of the built-in table
    pub exclude_patterns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: None,
            scan_max_depth: DEFAULT_SCAN_DEPTH,
            exclude_patterns: Vec::new(),
        }
    }
}
