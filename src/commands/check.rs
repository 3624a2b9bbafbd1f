use std::path::PathBuf;

use chronicler::codegen::{compute_order, emission_sequence, ScriptCodeGenerator};

use super::{fail, load_options, load_project};

pub struct CheckArgs {
    pub project: PathBuf,
    pub config: Option<PathBuf>,
}

pub fn run(args: CheckArgs) {
    let options = load_options(args.config.as_deref()).unwrap_or_else(|e| fail(e));

    let mut project = load_project(&args.project).unwrap_or_else(|e| fail(e));
    if project.startup().is_err() {
        eprintln!("warning: project has no 'startup' scene; no preamble will be emitted");
    }

    let names: Vec<String> = project
        .scenes()
        .iter()
        .map(|scene| scene.name().to_string())
        .collect();

    for name in names {
        let scene = project.scene_mut(&name).unwrap_or_else(|e| fail(e));
        compute_order(scene).unwrap_or_else(|e| fail(e));

        let scene = project.scene(&name).unwrap_or_else(|e| fail(e));
        let sequence = emission_sequence(scene);
        let mut generator = ScriptCodeGenerator::new(scene, &sequence, &options);
        generator.generate_scene().unwrap_or_else(|e| fail(e));
        let policy = generator.labels();

        println!(
            "scene '{}': {} bubble(s), {} connection(s)",
            name,
            scene.bubbles().len(),
            scene.connections().len()
        );

        let labels: Vec<String> = sequence
            .iter()
            .filter(|uid| policy.needs_label(**uid))
            .map(|uid| policy.make_label(*uid))
            .collect();
        if !labels.is_empty() {
            println!("  labels: {}", labels.join(", "));
        }

        let reachable = scene.reachable();
        let unreachable: Vec<String> = scene
            .bubbles()
            .iter()
            .filter(|bubble| !reachable.contains(&bubble.uid))
            .map(|bubble| format!("{} ({})", bubble.uid, bubble.bubble_type()))
            .collect();
        if !unreachable.is_empty() {
            println!("  unreachable: {}", unreachable.join(", "));
        }
    }
}
