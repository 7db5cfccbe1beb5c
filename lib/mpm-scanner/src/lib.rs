use mpm_types::{ExtensionCount, FileEntry, Settings, DEFAULT_SCAN_DEPTH};
use mpm_utils::{lowercase_extension, should_exclude_dir, validate_exclude_patterns};
use std::collections::HashMap;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

pub mod git;

/// Directory and file names never listed, compared case-insensitively
pub const EXCLUDED_NAMES: &[&str] = &[
    "node_modules",
    ".git",
    ".idea",
    ".vscode",
    "__pycache__",
    "dist",
    "build",
    "target",
    "bin",
    "obj",
    ".next",
    ".nuxt",
    ".DS_Store",
    "vendor",
    "coverage",
    ".gradle",
    ".mvn",
    ".cache",
    ".npm",
    ".yarn",
    "venv",
    "env",
    ".env",
    ".pytest_cache",
];

/// Binary and artifact suffixes never listed
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".exe", ".dll", ".so", ".dylib", ".o", ".obj", ".a", ".lib", ".bin", ".dat", ".db", ".sqlite",
    ".class",
];

/// Maximum number of extensions reported by [`count_by_extension`]
pub const TOP_EXTENSIONS: usize = 10;

/// Check a base name against the built-in exclusion table
pub fn should_exclude(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }
    if EXCLUDED_NAMES.iter().any(|excluded| name.eq_ignore_ascii_case(excluded)) {
        return true;
    }
    let lower = name.to_lowercase();
    EXCLUDED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Walks a project directory and lists what it contains
#[derive(Debug, Clone)]
pub struct FileScanner {
    max_depth: usize,
    exclude_patterns: Vec<String>,
}

impl FileScanner {
    /// Scanner with the default depth and no extra patterns
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_SCAN_DEPTH,
            exclude_patterns: Vec::new(),
        }
    }

    /// Scanner configured from user settings
    pub fn with_settings(settings: &Settings) -> anyhow::Result<Self> {
        validate_exclude_patterns(&settings.exclude_patterns)?;
        Ok(Self {
            max_depth: settings.scan_max_depth,
            exclude_patterns: settings.exclude_patterns.clone(),
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        should_exclude(&name) || should_exclude_dir(&name, &self.exclude_patterns)
    }

    /// List entries under `root`, depth-first in file-name order.
    ///
    /// Children of `root` are at depth 0; entries deeper than `max_depth` are
    /// not listed unless `max_depth` is 0. Unreadable directories and entries
    /// are skipped, so an unreadable root yields an empty list.
    pub fn scan(&self, root: &Path) -> Vec<FileEntry> {
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));
        if self.max_depth > 0 {
            walker = walker.max_depth(self.max_depth + 1);
        }

        let mut entries = Vec::new();
        let iter = walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_excluded(e));

        for entry in iter {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    log::debug!("Skipping {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            let relative_path = match entry.path().strip_prefix(root) {
                Ok(relative) => relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
                Err(_) => continue,
            };

            let is_dir = metadata.is_dir();
            entries.push(FileEntry {
                relative_path,
                is_dir,
                size_bytes: if is_dir { 0 } else { metadata.len() },
                extension: if is_dir {
                    String::new()
                } else {
                    lowercase_extension(&entry.file_name().to_string_lossy())
                },
            });
        }

        log::debug!("Scanned {} entries under {}", entries.len(), root.display());
        entries
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan a directory with the built-in exclusion table, 0 meaning unbounded depth
pub fn scan(root: &Path, max_depth: usize) -> Vec<FileEntry> {
    FileScanner::new().with_max_depth(max_depth).scan(root)
}

/// Rank file extensions by frequency.
///
/// Directories and extension-less files are ignored. Ties are broken
/// alphabetically and only the top ten are kept.
pub fn count_by_extension(entries: &[FileEntry]) -> Vec<ExtensionCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        if entry.is_dir || entry.extension.is_empty() {
            continue;
        }
        *counts.entry(entry.extension.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<ExtensionCount> = counts
        .into_iter()
        .map(|(extension, count)| ExtensionCount {
            extension: extension.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));
    ranked.truncate(TOP_EXTENSIONS);
    ranked
}

/// Number of non-directory entries
pub fn total_files(entries: &[FileEntry]) -> usize {
    entries.iter().filter(|e| !e.is_dir).count()
}

/// Sum of file sizes in bytes
pub fn total_size(entries: &[FileEntry]) -> u64 {
    entries.iter().filter(|e| !e.is_dir).map(|e| e.size_bytes).sum()
}
