use mpm_types::{Catalog, Project, Settings};
use mpm_utils::{default_store_path, normalize_project_path};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse project file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
    #[error("Invalid project: {0}")]
    InvalidProject(String),
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// What an add operation did to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Project),
    Updated(Project),
}

impl AddOutcome {
    pub fn project(&self) -> &Project {
        match self {
            AddOutcome::Added(project) | AddOutcome::Updated(project) => project,
        }
    }
}

impl std::fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (verb, project) = match self {
            AddOutcome::Added(project) => ("Added", project),
            AddOutcome::Updated(project) => ("Updated", project),
        };
        write!(
            f,
            "{} project '{}' with path '{}' and category '{}'",
            verb,
            project.name,
            project.path.display(),
            project.category
        )
    }
}

/// Handle on the JSON project file.
///
/// Every operation reads the file fresh; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
    home_dir: PathBuf,
}

impl ProjectStore {
    /// Open the store at `~/.mpm/config.json`, or the location `settings` overrides it with
    pub fn open_default(settings: &Settings) -> Result<Self> {
        let home_dir = mpm_utils::home_dir()?;
        let path = settings
            .store_path
            .clone()
            .unwrap_or_else(|| default_store_path(&home_dir));
        Self::open(path, home_dir)
    }

    /// Open the store at a specific path, creating an empty document if needed
    pub fn open<P: AsRef<Path>, H: AsRef<Path>>(path: P, home_dir: H) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            home_dir: home_dir.as_ref().to_path_buf(),
        };
        store.ensure_initialized()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Create the parent directory and an empty document on first run
    pub fn ensure_initialized(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !self.path.exists() {
            log::info!("Creating project file at {}", self.path.display());
            self.try_save(&Catalog::default())?;
        }
        Ok(())
    }

    /// Load the catalog, surfacing read and parse failures
    pub fn try_load(&self) -> Result<Catalog> {
        if !self.path.exists() {
            return Ok(Catalog::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the catalog, reporting failures and falling back to an empty one
    pub fn load(&self) -> Catalog {
        match self.try_load() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Error reading project file: {}", e);
                Catalog::default()
            }
        }
    }

    /// Write the catalog as pretty JSON
    pub fn try_save(&self, catalog: &Catalog) -> Result<()> {
        let mut contents = serde_json::to_string_pretty(catalog)?;
        contents.push('\n');
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Write the catalog, reporting failures instead of returning them
    pub fn save(&self, catalog: &Catalog) {
        if let Err(e) = self.try_save(catalog) {
            log::error!("Error writing project file: {}", e);
        }
    }

    /// Add a project or overwrite the one with the same name in place.
    ///
    /// A leading `~` is expanded and the path made absolute before storing.
    pub fn add_project(&self, name: &str, path: &str, category: &str) -> Result<AddOutcome> {
        let name = name.trim();
        let path = path.trim();
        if name.is_empty() || path.is_empty() {
            return Err(StoreError::InvalidProject(
                "both name and path are required".to_string(),
            ));
        }

        // Refuse to overwrite a document we could not parse
        let mut catalog = self.try_load()?;
        let project = Project::new(
            name,
            normalize_project_path(path, &self.home_dir)?,
            category.trim(),
        );

        let outcome = match catalog.position(name) {
            Some(index) => {
                catalog.projects[index] = project.clone();
                AddOutcome::Updated(project)
            }
            None => {
                catalog.projects.push(project.clone());
                AddOutcome::Added(project)
            }
        };

        self.try_save(&catalog)?;
        log::debug!("{}", outcome);
        Ok(outcome)
    }

    /// Remove the first project with the given name
    pub fn remove_project(&self, name: &str) -> Result<Project> {
        let mut catalog = self.try_load()?;
        let index = catalog
            .position(name)
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))?;
        let removed = catalog.projects.remove(index);
        self.try_save(&catalog)?;
        Ok(removed)
    }

    /// Look up the stored path of a project
    pub fn find_path(&self, name: &str) -> Option<PathBuf> {
        self.load().find(name).map(|p| p.path.clone())
    }
}
