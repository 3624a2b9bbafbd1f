//! # Project
//!
//! The top-level document: metadata, ordered scenes, variables and the UID
//! allocator shared by every scene. Projects persist as versioned JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChroniclerError, Result};
use crate::graph::{Connection, Scene, UidAllocator};

/// Current project file format
pub const FORMAT_VERSION: u32 = 1;

/// Scene that carries the project preamble
pub const STARTUP_SCENE: &str = "startup";

/// A script variable, global when it has no owning scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
}

impl Variable {
    pub fn global(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            scene: None,
        }
    }

    pub fn temp(name: impl Into<String>, value: impl Into<String>, scene: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            scene: Some(scene.into()),
        }
    }

    pub fn is_global(&self) -> bool {
        self.scene.is_none()
    }
}

/// Connections dropped while loading, per scene
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub dropped: Vec<(String, Connection)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    format_version: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    scenes: Vec<Scene>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(skip)]
    uids: UidAllocator,
}

impl Project {
    /// A new project with an empty startup scene.
    pub fn new(title: impl Into<String>) -> Self {
        let mut uids = UidAllocator::new();
        let startup = Scene::new(STARTUP_SCENE, &mut uids);
        Self {
            format_version: FORMAT_VERSION,
            title: title.into(),
            author: String::new(),
            scenes: vec![startup],
            variables: Vec::new(),
            uids,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, name: &str) -> Result<&Scene> {
        self.scenes
            .iter()
            .find(|scene| scene.name() == name)
            .ok_or_else(|| ChroniclerError::SceneNotFound(name.to_string()))
    }

    pub fn scene_mut(&mut self, name: &str) -> Result<&mut Scene> {
        self.scenes
            .iter_mut()
            .find(|scene| scene.name() == name)
            .ok_or_else(|| ChroniclerError::SceneNotFound(name.to_string()))
    }

    /// A scene together with the project's UID allocator, for graph edits.
    pub fn edit_scene(&mut self, name: &str) -> Result<(&mut Scene, &mut UidAllocator)> {
        let scene = self
            .scenes
            .iter_mut()
            .find(|scene| scene.name() == name)
            .ok_or_else(|| ChroniclerError::SceneNotFound(name.to_string()))?;
        Ok((scene, &mut self.uids))
    }

    pub fn startup(&self) -> Result<&Scene> {
        self.scene(STARTUP_SCENE)
            .map_err(|_| ChroniclerError::MissingStartup)
    }

    pub fn uids(&self) -> &UidAllocator {
        &self.uids
    }

    /// Append a new scene with its own Start bubble.
    pub fn add_scene(&mut self, name: impl Into<String>) -> Result<&mut Scene> {
        let name = name.into();
        self.ensure_unique(&name)?;

        let scene = Scene::new(name, &mut self.uids);
        tracing::debug!("[PROJECT] added scene '{}'", scene.name());
        self.scenes.push(scene);
        let last = self.scenes.len() - 1;
        Ok(&mut self.scenes[last])
    }

    /// Rename a scene, keeping names unique and variable ownership intact.
    /// The startup scene keeps its name.
    pub fn rename_scene(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if old == new {
            return Ok(());
        }
        if old == STARTUP_SCENE {
            return Err(ChroniclerError::CannotRenameStartup);
        }
        self.ensure_unique(&new)?;

        self.scene_mut(old)?.set_name(new.clone());
        for variable in &mut self.variables {
            if variable.scene.as_deref() == Some(old) {
                variable.scene = Some(new.clone());
            }
        }
        Ok(())
    }

    /// Move a scene one position towards the front of the scene list.
    pub fn move_scene_up(&mut self, name: &str) -> Result<()> {
        let index = self.scene_index(name)?;
        if index > 0 {
            self.scenes.swap(index, index - 1);
        }
        Ok(())
    }

    /// Move a scene one position towards the end of the scene list.
    pub fn move_scene_down(&mut self, name: &str) -> Result<()> {
        let index = self.scene_index(name)?;
        if index + 1 < self.scenes.len() {
            self.scenes.swap(index, index + 1);
        }
        Ok(())
    }

    /// Remove a scene, its variables and its UIDs. The startup scene stays.
    pub fn remove_scene(&mut self, name: &str) -> Result<Scene> {
        if name == STARTUP_SCENE {
            return Err(ChroniclerError::CannotRemoveStartup);
        }

        let index = self.scene_index(name)?;
        let scene = self.scenes.remove(index);
        for bubble in scene.bubbles() {
            self.uids.release(bubble.uid);
            for option in bubble.options() {
                self.uids.release(option.uid);
            }
        }
        self.variables
            .retain(|variable| variable.scene.as_deref() != Some(name));

        tracing::debug!("[PROJECT] removed scene '{}'", name);
        Ok(scene)
    }

    /// Parse a project, rebuild its UID allocator and repair dangling links.
    pub fn from_json(json: &str) -> Result<(Self, LoadReport)> {
        let mut project: Project = serde_json::from_str(json)?;
        if project.format_version != FORMAT_VERSION {
            return Err(ChroniclerError::UnsupportedVersion(project.format_version));
        }

        let mut names = std::collections::HashSet::new();
        for scene in &project.scenes {
            if !names.insert(scene.name()) {
                return Err(ChroniclerError::DuplicateScene(scene.name().to_string()));
            }
            scene.validate_start()?;
            scene.claim_uids(&mut project.uids)?;
        }

        let mut report = LoadReport::default();
        for scene in &mut project.scenes {
            let name = scene.name().to_string();
            report
                .dropped
                .extend(scene.repair().into_iter().map(|connection| (name.clone(), connection)));
        }

        tracing::info!(
            "[PROJECT] loaded '{}' ({} scenes, {} UIDs, {} repaired connections)",
            project.title,
            project.scenes.len(),
            project.uids.len(),
            report.dropped.len()
        );
        Ok((project, report))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<(Self, LoadReport)> {
        let json = std::fs::read_to_string(path).map_err(|e| ChroniclerError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Write the project file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| ChroniclerError::io(dir, e))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| ChroniclerError::io(path, e))?;
        tracing::info!("[PROJECT] saved to {}", path.display());
        Ok(())
    }

    /// Write a backup copy into the `backups/` directory next to the project.
    pub fn save_backup(&self, project_path: &Path, slot: usize) -> Result<PathBuf> {
        let path = backup_path(project_path, slot);
        self.save(&path)?;
        Ok(path)
    }

    fn scene_index(&self, name: &str) -> Result<usize> {
        self.scenes
            .iter()
            .position(|scene| scene.name() == name)
            .ok_or_else(|| ChroniclerError::SceneNotFound(name.to_string()))
    }

    fn ensure_unique(&self, name: &str) -> Result<()> {
        if self.scenes.iter().any(|scene| scene.name() == name) {
            return Err(ChroniclerError::DuplicateScene(name.to_string()));
        }
        Ok(())
    }
}

/// `<dir>/backups/<stem>.backup<slot>.<ext>` for a project file.
pub fn backup_path(project_path: &Path, slot: usize) -> PathBuf {
    let dir = project_path.parent().unwrap_or_else(|| Path::new(""));
    let stem = project_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    let extension = project_path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());

    dir.join("backups")
        .join(format!("{}.backup{}.{}", stem, slot, extension))
}

/// Cycles backup slots `1..=max`
#[derive(Debug, Clone)]
pub struct BackupRotation {
    max: usize,
    last: usize,
}

impl BackupRotation {
    pub fn new(max: usize) -> Self {
        Self { max, last: 0 }
    }

    /// Next slot to write, or `None` when backups are disabled.
    pub fn next_slot(&mut self) -> Option<usize> {
        if self.max == 0 {
            return None;
        }
        self.last = self.last % self.max + 1;
        Some(self.last)
    }
}
