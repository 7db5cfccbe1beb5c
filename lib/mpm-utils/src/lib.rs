//! Utility functions for the mpm project bookmark manager
//!
//! Path handling (tilde expansion, lexical absolutization, home-relative
//! display), glob-based exclusion, shell quoting and size formatting.

use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// Check if a name matches any of the given patterns
///
/// Supports exact matches and glob patterns with wildcards (* and ?).
///
/// # Examples
/// ```
/// use mpm_utils::should_exclude_dir;
///
/// let patterns = vec!["node_modules".to_string(), "*.tmp".to_string()];
/// assert!(should_exclude_dir("node_modules", &patterns));
/// assert!(should_exclude_dir("cache.tmp", &patterns));
/// assert!(!should_exclude_dir("src", &patterns));
/// ```
pub fn should_exclude_dir(dir_name: &str, exclude_patterns: &[String]) -> bool {
    exclude_patterns.iter().any(|pattern| {
        if dir_name == pattern {
            return true;
        }

        if pattern.contains('*') || pattern.contains('?') {
            match glob_to_regex(pattern) {
                Ok(regex) => regex.is_match(dir_name),
                Err(_) => false,
            }
        } else {
            false
        }
    })
}

/// Convert a `*`/`?` glob into an anchored regex
pub fn glob_to_regex(pattern: &str) -> anyhow::Result<Regex> {
    let escaped = regex::escape(pattern);
    let regex_pattern = escaped.replace(r"\*", ".*").replace(r"\?", ".");
    Regex::new(&format!("^{}$", regex_pattern))
        .map_err(|e| anyhow::anyhow!("Invalid exclude pattern {}: {}", pattern, e))
}

/// Validate user supplied exclude patterns
pub fn validate_exclude_patterns(patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        if pattern.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "exclude_patterns cannot contain empty or whitespace-only strings"
            ));
        }
        if pattern.contains('*') || pattern.contains('?') {
            glob_to_regex(pattern)?;
        }
    }
    Ok(())
}

/// Resolve the current user's home directory
pub fn home_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))
}

/// Default location of the project file under `home`
pub fn default_store_path(home: &Path) -> PathBuf {
    home.join(".mpm").join("config.json")
}

/// Expand a leading tilde against `home`
///
/// # Examples
/// ```
/// use mpm_utils::expand_tilde;
/// use std::path::{Path, PathBuf};
///
/// let home = Path::new("/home/dev");
/// assert_eq!(expand_tilde("~/code/demo", home), PathBuf::from("/home/dev/code/demo"));
/// assert_eq!(expand_tilde("/srv/app", home), PathBuf::from("/srv/app"));
/// ```
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if let Some(stripped) = path.strip_prefix('~') {
        let relative_path = stripped.strip_prefix('/').unwrap_or(stripped);
        if relative_path.is_empty() {
            home.to_path_buf()
        } else {
            home.join(relative_path)
        }
    } else {
        PathBuf::from(path)
    }
}

/// Make `path` absolute relative to `base` and clean `.`/`..` lexically.
///
/// Symlinks are not followed and the path does not need to exist.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

/// Expand a tilde and absolutize against the current directory
pub fn normalize_project_path(path: &str, home: &Path) -> anyhow::Result<PathBuf> {
    let expanded = expand_tilde(path, home);
    if expanded.is_absolute() {
        return Ok(absolutize(&expanded, Path::new("/")));
    }
    let current_dir = std::env::current_dir()?;
    Ok(absolutize(&expanded, &current_dir))
}

/// Format a path for display, making it relative to home if possible
pub fn format_path_display(path: &Path, home: &Path) -> String {
    if let Ok(relative) = path.strip_prefix(home) {
        if relative.as_os_str().is_empty() {
            return "~/".to_string();
        } else {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

/// Quote a string for a POSIX shell, leaving plain words untouched
///
/// # Examples
/// ```
/// use mpm_utils::shell_quote;
///
/// assert_eq!(shell_quote("/home/dev/app"), "/home/dev/app");
/// assert_eq!(shell_quote("/home/dev/my app"), "'/home/dev/my app'");
/// ```
pub fn shell_quote(value: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "/._-+=:,@%~".contains(c);
    if !value.is_empty() && value.chars().all(is_safe) {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Get a human-readable file size string
///
/// # Examples
/// ```
/// use mpm_utils::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(1024), "1.0 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Lower-cased extension of a file name including the dot, empty if none
pub fn lowercase_extension(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(index) => file_name[index..].to_lowercase(),
        None => String::new(),
    }
}
