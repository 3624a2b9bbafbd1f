use std::fs;

use chronicler::{
    compile_project, compile_scene, export_project, save_project, BubbleKind, CompileOptions,
    Port, Project, Variable, STARTUP_SCENE,
};
use indoc::indoc;

/// startup: Start -> "Hello" -> Choice { A -> finish, B -> "B text" }
/// gate:    Start -> Condition { true -> Y, false -> X -> Y }
fn tale() -> Project {
    let mut project = Project::new("The Tale").with_author("Ann Writer");
    project.add_scene("gate").unwrap();
    project.variables.push(Variable::global("gold", "10"));
    project
        .variables
        .push(Variable::temp("guard_seen", "false", "gate"));

    {
        let (scene, uids) = project.edit_scene(STARTUP_SCENE).unwrap();
        let start = scene.start().unwrap().uid;
        let hello = scene.add_bubble(uids, BubbleKind::story("Hello")).unwrap();
        let choice = scene.add_bubble(uids, BubbleKind::choice()).unwrap();
        scene.add_option(uids, choice, "A").unwrap();
        let b = scene.add_option(uids, choice, "B").unwrap();
        let b_text = scene.add_bubble(uids, BubbleKind::story("B text")).unwrap();
        scene.connect(start, Port::Next, hello).unwrap();
        scene.connect(hello, Port::Next, choice).unwrap();
        scene.connect(b, Port::Next, b_text).unwrap();
    }

    {
        let (scene, uids) = project.edit_scene("gate").unwrap();
        let start = scene.start().unwrap().uid;
        let cond = scene.add_bubble(uids, BubbleKind::condition("guard_seen")).unwrap();
        let y = scene
            .add_bubble(uids, BubbleKind::story("You reach the gate."))
            .unwrap();
        let x = scene
            .add_bubble(uids, BubbleKind::story("You sneak around."))
            .unwrap();
        scene.bubble_mut(y).unwrap().label = "gate".to_string();
        scene.connect(start, Port::Next, cond).unwrap();
        scene.connect(cond, Port::True, y).unwrap();
        scene.connect(cond, Port::False, x).unwrap();
        scene.connect(x, Port::Next, y).unwrap();
    }

    project
}

#[test]
fn startup_scene_gets_preamble_and_inlined_choice() {
    let mut project = tale();
    let script = compile_scene(&mut project, STARTUP_SCENE).unwrap();

    assert_eq!(
        script,
        indoc! {"
            *title The Tale
            *author Ann Writer

            *scene_list
                startup
                gate

            *create gold 10

            Hello
            *choice
                #A
                    *finish
                #B
                    B text
                    *finish
        "}
    );
}

#[test]
fn shared_target_is_labeled_and_emitted_once() {
    let mut project = tale();
    let script = compile_scene(&mut project, "gate").unwrap();

    assert_eq!(
        script,
        indoc! {"
            *temp guard_seen false

            *if(guard_seen)
                *goto gate
            *else
                You sneak around.
                *goto gate

            *label gate
            You reach the gate.
            *finish
        "}
    );
    assert_eq!(script.matches("You reach the gate.").count(), 1);
    assert_eq!(script.matches("*label gate").count(), 1);
}

#[test]
fn choice_looping_back_jumps_to_label() {
    let mut project = Project::new("Loop");
    {
        let (scene, uids) = project.edit_scene(STARTUP_SCENE).unwrap();
        let start = scene.start().unwrap().uid;
        let intro = scene.add_bubble(uids, BubbleKind::story("Intro")).unwrap();
        scene.bubble_mut(intro).unwrap().label = "intro".to_string();
        let choice = scene.add_bubble(uids, BubbleKind::choice()).unwrap();
        let again = scene.add_option(uids, choice, "Again").unwrap();
        let leave = scene.add_option(uids, choice, "Leave").unwrap();
        let bye = scene.add_bubble(uids, BubbleKind::story("Bye")).unwrap();
        scene.connect(start, Port::Next, intro).unwrap();
        scene.connect(intro, Port::Next, choice).unwrap();
        scene.connect(again, Port::Next, intro).unwrap();
        scene.connect(leave, Port::Next, bye).unwrap();
    }

    let script = compile_scene(&mut project, STARTUP_SCENE).unwrap();
    let body = script
        .split_once("*scene_list\n    startup\n\n")
        .map(|(_, body)| body)
        .unwrap();

    let expected = format!(
        "\n{}",
        indoc! {"
            *label intro
            Intro
            *choice
                #Again
                    *goto intro
                #Leave
                    Bye
                    *finish
        "}
    );
    assert_eq!(body, expected);
}

#[test]
fn compiling_twice_is_byte_identical() {
    let mut project = tale();
    let options = CompileOptions::default();

    let first = compile_project(&mut project, &options).unwrap();
    let second = compile_project(&mut project, &options).unwrap();

    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|scene| scene.name.as_str()).collect();
    assert_eq!(names, vec![STARTUP_SCENE, "gate"]);
}

#[test]
fn export_writes_one_file_per_scene() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = tale();

    let written = export_project(&mut project, dir.path(), &CompileOptions::default()).unwrap();

    assert_eq!(
        written,
        vec![
            dir.path().join("scenes").join("startup.txt"),
            dir.path().join("scenes").join("gate.txt"),
        ]
    );
    let gate = fs::read_to_string(&written[1]).unwrap();
    assert!(gate.starts_with("*temp guard_seen false\n"));
}

#[test]
fn saved_project_reloads_to_the_same_scripts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tale.chronx");
    let options = CompileOptions::default();

    let mut project = tale();
    let written = save_project(&mut project, &path, &options).unwrap();
    assert_eq!(written.len(), 2);
    let before = compile_project(&mut project, &options).unwrap();

    let (mut reloaded, report) = Project::load(&path).unwrap();
    assert!(report.is_clean());
    let after = compile_project(&mut reloaded, &options).unwrap();

    assert_eq!(before, after);
}

#[test]
fn backups_land_next_to_the_project() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tale.chronx");
    let project = tale();

    let backup = project.save_backup(&path, 1).unwrap();

    assert_eq!(backup, dir.path().join("backups").join("tale.backup1.chronx"));
    let (restored, _) = Project::load(&backup).unwrap();
    assert_eq!(restored.title, "The Tale");
}

#[test]
fn dangling_links_are_repaired_before_export() {
    let json = r#"{
        "format_version": 1,
        "title": "Pasted",
        "author": "",
        "scenes": [{
            "name": "startup",
            "bubbles": [
                { "uid": 0, "type": "start" },
                { "uid": 1, "type": "action", "script": "*set pasted true" }
            ],
            "connections": [
                { "id": 0, "from": 0, "to": 1 },
                { "id": 1, "from": 1, "to": 12 }
            ]
        }]
    }"#;

    let (mut project, report) = Project::from_json(json).unwrap();
    assert_eq!(report.dropped.len(), 1);

    let script = compile_scene(&mut project, STARTUP_SCENE).unwrap();
    assert!(script.ends_with("*set pasted true\n*finish\n"));
}
