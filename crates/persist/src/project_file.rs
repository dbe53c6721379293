//! The `project.json` file holding a campaign's current state.

use crate::store::StoreError;
use campaign_kernel::Project;
use std::path::Path;
use tracing::debug;

pub const PROJECT_FILE: &str = "project.json";

/// Load the project stored under `root`.
pub fn load_project(root: &Path) -> Result<Project, StoreError> {
    let path = root.join(PROJECT_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::ProjectNotFound(root.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let project = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "loaded project");
    Ok(project)
}

/// Write `project` to `root/project.json`, creating `root` if needed.
pub fn save_project(root: &Path, project: &Project) -> Result<(), StoreError> {
    std::fs::create_dir_all(root)?;
    write_project_json(&root.join(PROJECT_FILE), project)
}

/// Write `project` as pretty JSON to `path`, readable back by `Campaign::import`.
pub fn write_project_json(path: &Path, project: &Project) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(project)?;

    // Write atomically (write to temp file, then rename)
    let tmp = path.with_extension("json.tmp");
    if let Err(e) = std::fs::write(&tmp, content).and_then(|()| std::fs::rename(&tmp, path)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    debug!(path = %path.display(), "wrote project");
    Ok(())
}
