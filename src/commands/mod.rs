pub mod check;
pub mod export;

use std::path::Path;

use chronicler::{CompileOptions, Project, Result};

/// Compile options from an optional config file.
fn load_options(config: Option<&Path>) -> Result<CompileOptions> {
    match config {
        Some(path) => CompileOptions::from_file(path),
        None => Ok(CompileOptions::default()),
    }
}

/// Load a project, reporting repaired connections on stderr.
fn load_project(path: &Path) -> Result<Project> {
    let (project, report) = Project::load(path)?;
    for (scene, connection) in &report.dropped {
        eprintln!(
            "warning: scene '{}': dropped unresolved connection {} ({}.{} -> {})",
            scene, connection.id, connection.from, connection.port, connection.to
        );
    }
    Ok(project)
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", err);
    std::process::exit(1);
}
