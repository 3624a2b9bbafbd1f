//! # Script Compiler
//!
//! Main entry points for compiling Chronicler projects to ChoiceScript.

use std::path::{Path, PathBuf};

use crate::codegen::{compute_order, emission_sequence, generate_preamble, ScriptCodeGenerator};
use crate::config::CompileOptions;
use crate::error::{ChroniclerError, Result};
use crate::project::Project;

/// Directory next to the project file that receives the scene scripts
pub const SCENES_DIR: &str = "scenes";

/// Script produced for one scene
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledScene {
    pub name: String,
    pub script: String,
}

/// Compile one scene with default options
///
/// # Examples
///
/// ```rust
/// use chronicler::{compile_scene, BubbleKind, Port, Project};
///
/// let mut project = Project::new("Tale");
/// let (scene, uids) = project.edit_scene("startup")?;
/// let start = scene.start()?.uid;
/// let story = scene.add_bubble(uids, BubbleKind::story("Hello"))?;
/// scene.connect(start, Port::Next, story)?;
///
/// let script = compile_scene(&mut project, "startup")?;
/// assert!(script.ends_with("Hello\n*finish\n"));
/// # Ok::<(), chronicler::ChroniclerError>(())
/// ```
pub fn compile_scene(project: &mut Project, name: &str) -> Result<String> {
    compile_scene_with_options(project, name, &CompileOptions::default())
}

/// Compile one scene
///
/// Recomputes bubble order, sorts the scene into its emission sequence and
/// renders the preamble followed by every bubble.
pub fn compile_scene_with_options(
    project: &mut Project,
    name: &str,
    options: &CompileOptions,
) -> Result<String> {
    // Phase 1: Order bubbles from the Start bubble
    let traversed = compute_order(project.scene_mut(name)?)?;

    let scene = project.scene(name)?;
    tracing::info!(
        "[CHRON] Compiling scene '{}' ({} bubbles, {} connections, {} traversed)",
        name,
        scene.bubbles().len(),
        scene.connections().len(),
        traversed
    );

    // Phase 2: Emission sequence
    let sequence = emission_sequence(scene);

    // Phase 3: Preamble
    let mut script = generate_preamble(project, scene, options);

    // Phase 4: Bubbles
    let mut generator = ScriptCodeGenerator::new(scene, &sequence, options);
    script.push_str(&generator.generate_scene()?);

    tracing::info!("[CHRON] Scene '{}' complete ({} bytes)", name, script.len());
    Ok(script)
}

/// Compile every scene in project order
pub fn compile_project(project: &mut Project, options: &CompileOptions) -> Result<Vec<CompiledScene>> {
    tracing::info!(
        "[CHRON] Starting export of '{}' ({} scenes, {} variables)",
        project.title,
        project.scenes().len(),
        project.variables.len()
    );

    let names: Vec<String> = project
        .scenes()
        .iter()
        .map(|scene| scene.name().to_string())
        .collect();

    let mut compiled = Vec::with_capacity(names.len());
    for name in names {
        let script = compile_scene_with_options(project, &name, options)?;
        compiled.push(CompiledScene { name, script });
    }

    Ok(compiled)
}

/// Compile the project and write `<dir>/scenes/<scene>.txt` for every scene
///
/// Returns the paths written, in scene order.
pub fn export_project(
    project: &mut Project,
    project_dir: &Path,
    options: &CompileOptions,
) -> Result<Vec<PathBuf>> {
    let compiled = compile_project(project, options)?;

    let scenes_dir = project_dir.join(SCENES_DIR);
    std::fs::create_dir_all(&scenes_dir).map_err(|e| ChroniclerError::io(&scenes_dir, e))?;

    let mut written = Vec::with_capacity(compiled.len());
    for scene in compiled {
        let path = scenes_dir.join(format!("{}.txt", scene.name));
        std::fs::write(&path, scene.script).map_err(|e| ChroniclerError::io(&path, e))?;
        tracing::debug!("[CHRON] wrote {}", path.display());
        written.push(path);
    }

    tracing::info!("[CHRON] Export complete: {} scene file(s)", written.len());
    Ok(written)
}

/// Export the scene scripts next to the project file, then save the project
///
/// Exporting first refreshes every bubble's order, so the saved file carries
/// the same order the scripts were generated with.
pub fn save_project(
    project: &mut Project,
    project_path: &Path,
    options: &CompileOptions,
) -> Result<Vec<PathBuf>> {
    let project_dir = project_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let written = export_project(project, project_dir, options)?;
    project.save(project_path)?;
    Ok(written)
}
