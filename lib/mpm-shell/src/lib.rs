//! Shell integration for the mpm project bookmark manager
//!
//! A child process cannot change its parent shell's working directory, so
//! directory changes travel back to the shell in one of two ways:
//!
//! - `mpm go` prints a `cd <path>` directive on stdout for the wrapper to eval
//! - the interactive session writes the directive to a side-channel file at a
//!   fixed temporary path; the wrapper sources and deletes it after `mpm i`
//!   exits
//!
//! The wrapper functions themselves come from [`generate_init_script`].

use anyhow::{Context, Result};
use mpm_utils::shell_quote;
use std::fs;
use std::path::{Path, PathBuf};

mod scripts;

pub use scripts::{generate_init_script, ShellType};

/// File name of the side channel inside the system temporary directory
pub const SIDE_CHANNEL_FILE: &str = "mpm_cd_command";

/// Directive that changes the shell into `path`
pub fn cd_command(path: &Path) -> String {
    format!("cd {}", shell_quote(&path.to_string_lossy()))
}

/// Directive that changes into `path` and opens Neovim there
pub fn neovim_command(path: &Path) -> String {
    format!("{} && nvim .", cd_command(path))
}

/// Single-line file handing a `cd` directive to the invoking shell.
///
/// The file holds exactly one line. The shell wrapper sources it once the
/// interactive process has exited and then deletes it.
#[derive(Debug, Clone)]
pub struct CdSideChannel {
    path: PathBuf,
}

impl CdSideChannel {
    /// Side channel at `<temp dir>/mpm_cd_command`
    pub fn new() -> Self {
        Self::at(std::env::temp_dir().join(SIDE_CHANNEL_FILE))
    }

    /// Side channel at an explicit location
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the directive for changing into `dir`, replacing any previous one
    pub fn write(&self, dir: &Path) -> Result<()> {
        fs::write(&self.path, format!("{}\n", cd_command(dir)))
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        log::debug!("Wrote cd directive for {} to {}", dir.display(), self.path.display());
        Ok(())
    }

    /// Current directive, if one is pending
    pub fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|contents| contents.trim_end().to_string())
            .filter(|contents| !contents.is_empty())
    }

    /// Remove a pending directive
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

impl Default for CdSideChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cd_command() {
        assert_eq!(cd_command(Path::new("/home/dev/code/demo")), "cd /home/dev/code/demo");
        assert_eq!(cd_command(Path::new("/home/dev/my app")), "cd '/home/dev/my app'");
    }

    #[test]
    fn test_neovim_command() {
        assert_eq!(neovim_command(Path::new("/srv/app")), "cd /srv/app && nvim .");
    }

    #[test]
    fn test_side_channel_round_trip() {
        let temp_dir = tempdir().unwrap();
        let channel = CdSideChannel::at(temp_dir.path().join(SIDE_CHANNEL_FILE));

        assert!(channel.read().is_none());
        channel.write(Path::new("/srv/one")).unwrap();
        channel.write(Path::new("/srv/two")).unwrap();

        let contents = fs::read_to_string(channel.path()).unwrap();
        assert_eq!(contents, "cd /srv/two\n");
        assert_eq!(channel.read().as_deref(), Some("cd /srv/two"));

        channel.clear().unwrap();
        assert!(!channel.path().exists());
        channel.clear().unwrap();
    }

    #[test]
    fn test_default_location() {
        let channel = CdSideChannel::new();
        assert_eq!(channel.path(), std::env::temp_dir().join("mpm_cd_command"));
    }
}
