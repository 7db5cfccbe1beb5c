//! CLI command implementations

use std::io::Write;
use std::path::Path;

use mpm_shell::{cd_command, generate_init_script, CdSideChannel, ShellType};
use mpm_store::StoreError;
use mpm_tui::SessionOutcome;

use crate::output::{OutputFormat, OutputFormatter};
use crate::CliRunner;

impl CliRunner {
    /// Run the add command
    pub fn run_add<W: Write>(
        &self,
        name: Option<&str>,
        path: Option<&str>,
        category: &str,
        working_dir: bool,
        out: &mut W,
    ) -> anyhow::Result<()> {
        let (name, path) = if working_dir {
            let current_dir = std::env::current_dir()?;
            let folder_name = current_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (folder_name, current_dir.to_string_lossy().into_owned())
        } else {
            match (name, path) {
                (Some(name), Some(path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
                    (name.to_string(), path.to_string())
                }
                _ => {
                    writeln!(out, "Error: Both name and path are required")?;
                    return Ok(());
                }
            }
        };

        match self.store.add_project(&name, &path, category) {
            Ok(outcome) => writeln!(out, "{}", outcome)?,
            Err(e) => {
                log::error!("Failed to add project '{}': {}", name, e);
                writeln!(out, "Error adding project: {}", e)?;
            }
        }
        Ok(())
    }

    /// Run the remove command
    pub fn run_remove<W: Write>(&self, name: &str, out: &mut W) -> anyhow::Result<()> {
        match self.store.remove_project(name) {
            Ok(project) => writeln!(out, "Removed project '{}'", project.name)?,
            Err(StoreError::ProjectNotFound(name)) => {
                writeln!(out, "Project '{}' not found", name)?
            }
            Err(e) => {
                log::error!("Failed to remove project '{}': {}", name, e);
                writeln!(out, "Error removing project: {}", e)?;
            }
        }
        Ok(())
    }

    /// Run the list command
    pub fn run_list<W: Write>(&self, format: &OutputFormat, out: &mut W) -> anyhow::Result<()> {
        let catalog = self.store.load();
        let formatter = OutputFormatter::new(*format);
        formatter.format_projects_to_writer(&catalog, self.store.home_dir(), out)
    }

    /// Run the go command
    pub fn run_go<W: Write>(&self, name: &str, out: &mut W) -> anyhow::Result<()> {
        match self.store.find_path(name) {
            Some(path) => writeln!(out, "{}", cd_command(&path))?,
            None => writeln!(out, "Project '{}' not found", name)?,
        }
        Ok(())
    }

    /// Run the interactive session
    pub fn run_interactive<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let side_channel = CdSideChannel::new();
        discard_stale_directive(&side_channel);
        let outcome = mpm_tui::run_session(self.store.clone(), &self.settings)?;
        self.deliver_outcome(outcome, &side_channel, out)
    }

    /// Hand the session result to the invoking shell
    pub fn deliver_outcome<W: Write>(
        &self,
        outcome: SessionOutcome,
        side_channel: &CdSideChannel,
        out: &mut W,
    ) -> anyhow::Result<()> {
        match outcome {
            SessionOutcome::Quit => {}
            SessionOutcome::ShellCommand(command) => writeln!(out, "{}", command)?,
            SessionOutcome::ChangeDirectory(path) => {
                if uses_side_channel() {
                    self.write_side_channel(side_channel, &path, out)?;
                } else {
                    writeln!(out, "{}", cd_command(&path))?;
                }
            }
        }
        Ok(())
    }

    fn write_side_channel<W: Write>(
        &self,
        side_channel: &CdSideChannel,
        path: &Path,
        out: &mut W,
    ) -> anyhow::Result<()> {
        match side_channel.write(path) {
            Ok(()) => log::info!(
                "To change to the selected directory after exiting: source {}",
                side_channel.path().display()
            ),
            Err(e) => {
                log::warn!("{:#}", e);
                writeln!(out, "{}", cd_command(path))?;
            }
        }
        Ok(())
    }

    /// Run the init command
    pub fn run_init<W: Write>(&self, shell: ShellType, out: &mut W) -> anyhow::Result<()> {
        let script = generate_init_script(shell, CdSideChannel::new().path());
        write!(out, "{}", script)?;
        Ok(())
    }
}

/// Drop a directive an earlier session left behind
fn discard_stale_directive(side_channel: &CdSideChannel) {
    if let Err(e) = side_channel.clear() {
        log::warn!("{:#}", e);
    }
}

fn uses_side_channel() -> bool {
    cfg!(any(target_os = "linux", target_os = "macos"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpm_store::ProjectStore;
    use mpm_types::Settings;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn create_test_runner() -> (TempDir, PathBuf, CliRunner) {
        let dir = tempdir().unwrap();
        let home = dir.path().join("home");
        fs::create_dir_all(&home).unwrap();
        let store = ProjectStore::open(home.join(".mpm/config.json"), &home).unwrap();
        (dir, home, CliRunner::with_store(store, Settings::default()))
    }

    fn capture<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_demo_scenario() {
        let (_dir, home, runner) = create_test_runner();

        let added = capture(|out| runner.run_add(Some("demo"), Some("~/code/demo"), "work", false, out));
        let expected_path = home.join("code/demo");
        assert_eq!(
            added,
            format!(
                "Added project 'demo' with path '{}' and category 'work'\n",
                expected_path.display()
            )
        );

        let catalog = runner.store().load();
        assert_eq!(catalog.projects.len(), 1);
        assert_eq!(catalog.projects[0].path, expected_path);

        let go = capture(|out| runner.run_go("demo", out));
        assert_eq!(go, format!("{}\n", cd_command(&expected_path)));

        let removed = capture(|out| runner.run_remove("demo", out));
        assert_eq!(removed, "Removed project 'demo'\n");
        assert!(runner.store().load().is_empty());

        let listed = capture(|out| runner.run_list(&OutputFormat::Text, out));
        assert_eq!(listed, "No projects found\n");
    }

    #[test]
    fn test_add_requires_name_and_path() {
        let (_dir, _home, runner) = create_test_runner();
        let output = capture(|out| runner.run_add(Some("demo"), None, "", false, out));
        assert_eq!(output, "Error: Both name and path are required\n");

        let output = capture(|out| runner.run_add(Some("  "), Some("/srv"), "", false, out));
        assert_eq!(output, "Error: Both name and path are required\n");
        assert!(runner.store().load().is_empty());
    }

    #[test]
    fn test_add_existing_name_updates() {
        let (_dir, _home, runner) = create_test_runner();
        capture(|out| runner.run_add(Some("api"), Some("/srv/api"), "", false, out));
        let output = capture(|out| runner.run_add(Some("api"), Some("/srv/api2"), "work", false, out));
        assert!(output.starts_with("Updated project 'api'"));
        assert_eq!(runner.store().load().projects.len(), 1);
    }

    #[test]
    fn test_add_working_dir() {
        let (_dir, _home, runner) = create_test_runner();
        let output = capture(|out| runner.run_add(None, None, "tools", true, out));
        let current_dir = std::env::current_dir().unwrap();
        let name = current_dir.file_name().unwrap().to_string_lossy().into_owned();

        assert!(output.starts_with(&format!("Added project '{}'", name)));
        assert_eq!(runner.store().find_path(&name), Some(current_dir));
    }

    #[test]
    fn test_remove_and_go_not_found() {
        let (_dir, _home, runner) = create_test_runner();
        assert_eq!(
            capture(|out| runner.run_remove("ghost", out)),
            "Project 'ghost' not found\n"
        );
        assert_eq!(
            capture(|out| runner.run_go("ghost", out)),
            "Project 'ghost' not found\n"
        );
    }

    #[test]
    fn test_go_quotes_unsafe_paths() {
        let (_dir, _home, runner) = create_test_runner();
        capture(|out| runner.run_add(Some("docs"), Some("/srv/my docs"), "", false, out));
        assert_eq!(
            capture(|out| runner.run_go("docs", out)),
            "cd '/srv/my docs'\n"
        );
    }

    #[test]
    fn test_corrupt_store_is_reported() {
        let (_dir, _home, runner) = create_test_runner();
        fs::write(runner.store().path(), "{ broken").unwrap();

        let output = capture(|out| runner.run_add(Some("api"), Some("/srv/api"), "", false, out));
        assert!(output.starts_with("Error adding project:"));
        assert_eq!(fs::read_to_string(runner.store().path()).unwrap(), "{ broken");

        let listed = capture(|out| runner.run_list(&OutputFormat::Text, out));
        assert_eq!(listed, "No projects found\n");
    }

    #[test]
    fn test_deliver_outcomes() {
        let (dir, _home, runner) = create_test_runner();
        let side_channel = CdSideChannel::at(dir.path().join("mpm_cd_command"));

        let quit = capture(|out| runner.deliver_outcome(SessionOutcome::Quit, &side_channel, out));
        assert!(quit.is_empty());

        let command = "cd /srv/api && nvim .".to_string();
        let shell = capture(|out| {
            runner.deliver_outcome(SessionOutcome::ShellCommand(command.clone()), &side_channel, out)
        });
        assert_eq!(shell, format!("{}\n", command));

        let target = PathBuf::from("/srv/api");
        let navigate = capture(|out| {
            runner.deliver_outcome(SessionOutcome::ChangeDirectory(target.clone()), &side_channel, out)
        });
        if uses_side_channel() {
            assert!(navigate.is_empty());
            assert_eq!(side_channel.read(), Some("cd /srv/api".to_string()));
        } else {
            assert_eq!(navigate, "cd /srv/api\n");
        }
    }

    #[test]
    fn test_stale_directive_is_discarded() {
        let dir = tempdir().unwrap();
        let side_channel = CdSideChannel::at(dir.path().join("mpm_cd_command"));
        side_channel.write(Path::new("/srv/old")).unwrap();

        discard_stale_directive(&side_channel);
        assert!(side_channel.read().is_none());
        discard_stale_directive(&side_channel);
    }

    #[test]
    fn test_init_script() {
        let (_dir, _home, runner) = create_test_runner();
        let script = capture(|out| runner.run_init(ShellType::Bash, out));
        assert!(script.contains("mpm() {"));
        assert!(script.contains("mpm_cd_command"));
    }
}
