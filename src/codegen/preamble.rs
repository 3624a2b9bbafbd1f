//! # Scene Preamble
//!
//! Directives emitted before the bubble walk: project metadata and the scene
//! list for the startup scene, variable declarations for every scene.

use crate::config::CompileOptions;
use crate::graph::Scene;
use crate::project::{Project, STARTUP_SCENE};

pub fn generate_preamble(project: &Project, scene: &Scene, options: &CompileOptions) -> String {
    let mut code = String::new();
    let mut declarations = 0;

    if scene.name() == STARTUP_SCENE {
        code.push_str(&format!("*title {}\n", project.title));
        code.push_str(&format!("*author {}\n\n", project.author));

        code.push_str("*scene_list\n");
        let indent = options.indent.unit();
        for listed in project.scenes() {
            code.push_str(&format!("{}{}\n", indent, listed.name()));
        }
        code.push('\n');

        for variable in project.variables.iter().filter(|variable| variable.is_global()) {
            code.push_str(&format!("*create {} {}\n", variable.name, variable.value));
            declarations += 1;
        }
    }

    for variable in project
        .variables
        .iter()
        .filter(|variable| variable.scene.as_deref() == Some(scene.name()))
    {
        code.push_str(&format!("*temp {} {}\n", variable.name, variable.value));
        declarations += 1;
    }

    if declarations > 0 {
        code.push('\n');
    }

    code
}
