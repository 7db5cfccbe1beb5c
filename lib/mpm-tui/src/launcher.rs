use anyhow::Context;
use std::path::Path;
use std::process::{Command, Stdio};

/// External programs a project can be opened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    VsCode,
    Zed,
    Cursor,
    Sublime,
    Trae,
    TextMate,
    FileManager,
}

impl LaunchTarget {
    pub fn program(self) -> &'static str {
        match self {
            LaunchTarget::VsCode => "code",
            LaunchTarget::Zed => "zed",
            LaunchTarget::Cursor => "cursor",
            LaunchTarget::Sublime => "subl",
            LaunchTarget::Trae => "trae",
            LaunchTarget::TextMate => "mate",
            LaunchTarget::FileManager => file_manager(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LaunchTarget::VsCode => "VS Code",
            LaunchTarget::Zed => "Zed",
            LaunchTarget::Cursor => "Cursor",
            LaunchTarget::Sublime => "Sublime Text",
            LaunchTarget::Trae => "Trae",
            LaunchTarget::TextMate => "TextMate",
            LaunchTarget::FileManager => "Finder/File Explorer",
        }
    }
}

fn file_manager() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Opens a project directory in an external program
pub trait Launcher {
    fn launch(&self, target: LaunchTarget, path: &Path) -> anyhow::Result<()>;
}

/// Spawns the program detached from the terminal and does not wait for it
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLauncher;

impl Launcher for DetachedLauncher {
    fn launch(&self, target: LaunchTarget, path: &Path) -> anyhow::Result<()> {
        spawn_detached(target.program(), path)?;
        log::info!("Opened {} in {}", path.display(), target.label());
        Ok(())
    }
}

fn spawn_detached(program: &str, path: &Path) -> anyhow::Result<()> {
    Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to launch {}", program))?;
    Ok(())
}
