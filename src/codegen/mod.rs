//! # ChoiceScript Code Generation
//!
//! Order calculation, label policy and script emission for bubble graphs.

mod bubble_handlers;
pub mod labels;
pub mod order;
pub mod preamble;
mod script_codegen;

pub use labels::LabelPolicy;
pub use order::{calculate_order, compute_order, emission_sequence};
pub use preamble::generate_preamble;
pub use script_codegen::ScriptCodeGenerator;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompileOptions, Indent};
    use crate::error::ChroniclerError;
    use crate::graph::{BubbleKind, Port, Scene, Uid, UidAllocator};

    fn emit(scene: &mut Scene, options: &CompileOptions) -> crate::Result<String> {
        compute_order(scene)?;
        let sequence = emission_sequence(scene);
        ScriptCodeGenerator::new(scene, &sequence, options).generate_scene()
    }

    fn new_scene() -> (Scene, UidAllocator, Uid) {
        let mut uids = UidAllocator::new();
        let scene = Scene::new("s", &mut uids);
        let start = scene.start().unwrap().uid;
        (scene, uids, start)
    }

    #[test]
    fn empty_scene_finishes() {
        let (mut scene, _, _) = new_scene();
        assert_eq!(emit(&mut scene, &CompileOptions::default()).unwrap(), "*finish\n");
    }

    #[test]
    fn choice_options_inline_their_targets() {
        let (mut scene, mut uids, start) = new_scene();
        let hello = scene.add_bubble(&mut uids, BubbleKind::story("Hello")).unwrap();
        let choice = scene.add_bubble(&mut uids, BubbleKind::choice()).unwrap();
        let _a = scene.add_option(&mut uids, choice, "A").unwrap();
        let b = scene.add_option(&mut uids, choice, "B").unwrap();
        let b_text = scene.add_bubble(&mut uids, BubbleKind::story("B text")).unwrap();
        scene.connect(start, Port::Next, hello).unwrap();
        scene.connect(hello, Port::Next, choice).unwrap();
        scene.connect(b, Port::Next, b_text).unwrap();

        let script = emit(&mut scene, &CompileOptions::default()).unwrap();
        assert_eq!(
            script,
            "Hello\n*choice\n    #A\n        *finish\n    #B\n        B text\n        *finish\n"
        );
    }

    #[test]
    fn action_without_link_finishes_without_goto() {
        let (mut scene, mut uids, start) = new_scene();
        let action = scene.add_bubble(&mut uids, BubbleKind::action("*set gold 5")).unwrap();
        scene.connect(start, Port::Next, action).unwrap();

        let script = emit(&mut scene, &CompileOptions::default()).unwrap();
        assert_eq!(script, "*set gold 5\n*finish\n");
        assert!(!script.contains("*goto"));
    }

    #[test]
    fn multiline_text_is_reindented() {
        let (mut scene, mut uids, start) = new_scene();
        let cond = scene.add_bubble(&mut uids, BubbleKind::condition("gold > 3")).unwrap();
        let rich = scene
            .add_bubble(&mut uids, BubbleKind::story("You are rich.\n\nCongratulations."))
            .unwrap();
        scene.connect(start, Port::Next, cond).unwrap();
        scene.connect(cond, Port::True, rich).unwrap();

        let script = emit(&mut scene, &CompileOptions::default().with_indent(Indent::Tab)).unwrap();
        assert_eq!(
            script,
            "*if(gold > 3)\n\tYou are rich.\n\n\tCongratulations.\n\t*finish\n*else\n\t*finish\n"
        );
    }

    #[test]
    fn cycles_emit_each_bubble_once() {
        let (mut scene, mut uids, start) = new_scene();
        let a = scene.add_bubble(&mut uids, BubbleKind::story("a")).unwrap();
        let b = scene.add_bubble(&mut uids, BubbleKind::story("b")).unwrap();
        scene.connect(start, Port::Next, a).unwrap();
        scene.connect(a, Port::Next, b).unwrap();
        scene.connect(b, Port::Next, a).unwrap();
        scene.bubble_mut(a).unwrap().label = "loop top".to_string();

        let script = emit(&mut scene, &CompileOptions::default()).unwrap();
        assert_eq!(script, "\n*label loop_top\na\nb\n*goto loop_top\n");
    }

    #[test]
    fn tail_after_a_converging_bubble_is_labeled() {
        let (mut scene, mut uids, start) = new_scene();
        let cond = scene.add_bubble(&mut uids, BubbleKind::condition("c")).unwrap();
        let tail = scene.add_bubble(&mut uids, BubbleKind::story("Y text")).unwrap();
        let join = scene.add_bubble(&mut uids, BubbleKind::story("X text")).unwrap();
        let detour = scene.add_bubble(&mut uids, BubbleKind::story("P text")).unwrap();
        scene.connect(start, Port::Next, cond).unwrap();
        scene.connect(cond, Port::True, join).unwrap();
        scene.connect(cond, Port::False, detour).unwrap();
        scene.connect(detour, Port::Next, join).unwrap();
        scene.connect(join, Port::Next, tail).unwrap();

        compute_order(&mut scene).unwrap();
        let sequence = emission_sequence(&scene);
        // The tail keeps the order it got on the first visit to the join.
        assert_eq!(sequence, vec![start, cond, detour, tail, join]);

        let mut generator = ScriptCodeGenerator::new(&scene, &sequence, &CompileOptions::default());
        let script = generator.generate_scene().unwrap();
        assert_eq!(
            script,
            format!(
                "*if(c)\n    *goto bubble_{join}\n*else\n    P text\n    *goto bubble_{join}\n\
                 \n*label bubble_{tail}\nY text\n*finish\n\
                 \n*label bubble_{join}\nX text\n*goto bubble_{tail}\n",
                join = join,
                tail = tail
            )
        );
        assert!(generator.labels().needs_label(tail));
    }

    #[test]
    fn depth_limit_stops_long_chains() {
        let (mut scene, mut uids, start) = new_scene();
        let mut previous = start;
        for i in 0..10 {
            let next = scene.add_bubble(&mut uids, BubbleKind::story(format!("line {}", i))).unwrap();
            scene.connect(previous, Port::Next, next).unwrap();
            previous = next;
        }

        let err = emit(&mut scene, &CompileOptions::default().with_max_depth(4)).unwrap_err();
        assert!(matches!(err, ChroniclerError::DepthLimitExceeded { limit: 4, .. }));

        assert!(emit(&mut scene, &CompileOptions::default().with_max_depth(10)).is_ok());
    }
}
