//! # Bubble Handlers
//!
//! Per-type rendering for the script generator. Each handler receives the
//! indentation level its bubble is emitted at and returns the bubble's text
//! followed by whatever its links inline.

use super::script_codegen::ScriptCodeGenerator;
use crate::error::Result;
use crate::graph::{ChoiceOption, Port, Uid};

impl<'a> ScriptCodeGenerator<'a> {
    /// Start has no text of its own; its target is inlined even when it
    /// carries a label.
    pub(super) fn generate_start(&mut self, uid: Uid, indent_level: usize, depth: usize) -> Result<String> {
        let scene = self.scene;
        match scene.link(uid, Port::Next) {
            Some(connection) => self.generate_bubble(connection.to, indent_level, depth + 1),
            None => Ok(format!("{}*finish\n", self.indent(indent_level))),
        }
    }

    pub(super) fn generate_story(
        &mut self,
        uid: Uid,
        text: &str,
        indent_level: usize,
        depth: usize,
    ) -> Result<String> {
        let mut code = self.indented_text(text, indent_level);
        let scene = self.scene;
        code.push_str(&self.follow_link(scene.link(uid, Port::Next), indent_level, depth)?);
        Ok(code)
    }

    pub(super) fn generate_action(
        &mut self,
        uid: Uid,
        script: &str,
        indent_level: usize,
        depth: usize,
    ) -> Result<String> {
        let mut code = self.indented_text(script, indent_level);
        let scene = self.scene;
        code.push_str(&self.follow_link(scene.link(uid, Port::Next), indent_level, depth)?);
        Ok(code)
    }

    /// `*choice` with one `#option` per answer; each option decides on its
    /// own whether its target is inlined or jumped to.
    pub(super) fn generate_choice(
        &mut self,
        options: &[ChoiceOption],
        indent_level: usize,
        depth: usize,
    ) -> Result<String> {
        let scene = self.scene;
        let mut code = format!("{}*choice\n", self.indent(indent_level));
        let option_indent = self.indent(indent_level + 1);

        for option in options {
            code.push_str(&format!("{}#{}\n", option_indent, option.text));
            let link = scene.link(option.uid, Port::Next);
            code.push_str(&self.follow_link(link, indent_level + 2, depth)?);
        }

        Ok(code)
    }

    pub(super) fn generate_condition(
        &mut self,
        uid: Uid,
        expression: &str,
        indent_level: usize,
        depth: usize,
    ) -> Result<String> {
        let scene = self.scene;
        let indent = self.indent(indent_level);

        let mut code = format!("{}*if({})\n", indent, expression);
        code.push_str(&self.follow_link(scene.link(uid, Port::True), indent_level + 1, depth)?);
        code.push_str(&format!("{}*else\n", indent));
        code.push_str(&self.follow_link(scene.link(uid, Port::False), indent_level + 1, depth)?);

        Ok(code)
    }
}
