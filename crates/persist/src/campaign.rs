//! A campaign on disk: the current project plus its version history.
//!
//! ```text
//! <root>/
//!   project.json   - current state
//!   versions/      - see [`crate::store`]
//! ```

use crate::project_file::{PROJECT_FILE, load_project, save_project, write_project_json};
use crate::snapshot::Snapshot;
use crate::store::{StoreConfig, StoreError, Version, VersionStore};
use campaign_kernel::Project;
use std::path::{Path, PathBuf};
use tracing::info;

const VERSIONS_DIR: &str = "versions";

/// Owns one campaign directory and decides when history is recorded.
#[derive(Debug)]
pub struct Campaign {
    root: PathBuf,
    project: Project,
    versions: VersionStore,
}

impl Campaign {
    /// Create a new campaign in `root` and record its first version.
    pub fn create(
        root: impl AsRef<Path>,
        name: &str,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        Self::create_with(root.as_ref(), Project::new(name), "Initial version", config)
    }

    /// Create a campaign in `root` from a project exported as JSON.
    ///
    /// The imported project gets a new id and creation time so that importing
    /// the same file twice yields two distinct campaigns.
    pub fn import(
        json_path: impl AsRef<Path>,
        root: impl AsRef<Path>,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let json_path = json_path.as_ref();
        let content = std::fs::read_to_string(json_path)?;
        let mut project: Project = serde_json::from_str(&content)?;
        project.reidentify();
        let file_name = json_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| json_path.display().to_string());
        Self::create_with(
            root.as_ref(),
            project,
            &format!("Import from {file_name}"),
            config,
        )
    }

    fn create_with(
        root: &Path,
        project: Project,
        description: &str,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        if root.join(PROJECT_FILE).exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already holds a campaign", root.display()),
            )
            .into());
        }
        let mut versions = VersionStore::open(root.join(VERSIONS_DIR), config)?;
        // The first version goes in before project.json, so a failed commit
        // leaves no half-created campaign behind.
        versions.commit(&Snapshot::capture(&project)?, Some(description))?;
        save_project(root, &project)?;
        let campaign = Self {
            root: root.to_path_buf(),
            project,
            versions,
        };
        info!(root = %root.display(), name = %campaign.project.name, "campaign created");
        Ok(campaign)
    }

    /// Open an existing campaign.
    pub fn open(root: impl AsRef<Path>, config: StoreConfig) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        let project = load_project(&root)?;
        let versions = VersionStore::open(root.join(VERSIONS_DIR), config)?;
        Ok(Self {
            root,
            project,
            versions,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Mutable access to the project. Changes reach disk on the next [`Campaign::save`].
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    pub fn versions(&self) -> &VersionStore {
        &self.versions
    }

    /// Write `project.json` and record a version if the project changed
    /// (or unconditionally with `force`).
    pub fn save(
        &mut self,
        description: Option<&str>,
        force: bool,
    ) -> Result<Option<Version>, StoreError> {
        save_project(&self.root, &self.project)?;
        let snapshot = Snapshot::capture(&self.project)?;
        self.versions.create_version(&snapshot, description, force)
    }

    /// Restore the project stored in version `number` and commit it as a new
    /// version described "Rollback to version N".
    ///
    /// A missing version fails with [`StoreError::NotFound`] and changes nothing.
    /// The project file and the in-memory project only change once the new
    /// version is committed.
    pub fn rollback(&mut self, number: i64) -> Result<Version, StoreError> {
        let snapshot = self.versions.rollback_to_version(number)?;
        let project = snapshot.restore()?;
        let version = self
            .versions
            .commit(&snapshot, Some(&format!("Rollback to version {number}")))?;
        save_project(&self.root, &project)?;
        self.project = project;
        info!(from = number, to = version.version_number, "rolled back");
        Ok(version)
    }

    /// Write the current project to `path` as JSON for [`Campaign::import`].
    pub fn export(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        write_project_json(path, &self.project)?;
        info!(path = %path.display(), "campaign exported");
        Ok(())
    }
}
