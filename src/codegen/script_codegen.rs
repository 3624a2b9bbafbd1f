//! # Script Code Generator
//!
//! Emits ChoiceScript for the bubbles of one scene.

use std::collections::HashSet;

use super::labels::LabelPolicy;
use crate::config::CompileOptions;
use crate::error::{ChroniclerError, Result};
use crate::graph::{BubbleKind, Connection, Scene, Uid};

/// Scene-level ChoiceScript generator
///
/// Walks the emission sequence and renders each bubble not yet emitted.
/// Bubbles reached through links that need no label are inlined after their
/// predecessor; everything else is reached by `*goto`.
///
/// A link whose unlabeled target was already emitted elsewhere cannot fall
/// through to it. Such targets are labeled and the scene is emitted again.
pub struct ScriptCodeGenerator<'a> {
    pub(super) scene: &'a Scene,
    sequence: &'a [Uid],
    pub(super) labels: LabelPolicy<'a>,
    indent_unit: String,
    max_depth: usize,
    processed: HashSet<Uid>,
    stranded: HashSet<Uid>,
}

impl<'a> ScriptCodeGenerator<'a> {
    pub fn new(scene: &'a Scene, sequence: &'a [Uid], options: &CompileOptions) -> Self {
        Self {
            scene,
            sequence,
            labels: LabelPolicy::new(scene, sequence),
            indent_unit: options.indent.unit(),
            max_depth: options.max_depth,
            processed: HashSet::new(),
            stranded: HashSet::new(),
        }
    }

    /// Label policy in effect, including labels forced during generation.
    pub fn labels(&self) -> &LabelPolicy<'a> {
        &self.labels
    }

    /// Generate the script for every bubble of the sequence.
    pub fn generate_scene(&mut self) -> Result<String> {
        let mut pass = 1;
        loop {
            let code = self.generate_pass()?;
            let stranded: Vec<Uid> = self.stranded.drain().collect();
            if !self.labels.force(stranded) {
                return Ok(code);
            }
            pass += 1;
            tracing::debug!("[CODEGEN] {}: relabeling, pass {}", self.scene.name(), pass);
        }
    }

    fn generate_pass(&mut self) -> Result<String> {
        self.processed.clear();
        let mut code = String::new();

        for &uid in self.sequence {
            let bubble_code = self.generate_bubble(uid, 0, 0)?;
            code.push_str(&bubble_code);
        }

        tracing::debug!(
            "[CODEGEN] {}: emitted {} of {} bubble(s)",
            self.scene.name(),
            self.processed.len(),
            self.sequence.len()
        );
        Ok(code)
    }

    /// Generate a bubble and the chain of bubbles inlined after it.
    ///
    /// Returns nothing for bubbles already emitted. A bubble is marked as
    /// emitted before any of its successors are visited, so cycles end at the
    /// first revisit.
    pub(super) fn generate_bubble(&mut self, uid: Uid, indent_level: usize, depth: usize) -> Result<String> {
        let mut code = String::new();

        if self.processed.contains(&uid) {
            return Ok(code);
        }
        if depth > self.max_depth {
            return Err(ChroniclerError::DepthLimitExceeded {
                uid,
                limit: self.max_depth,
            });
        }
        self.processed.insert(uid);

        let scene = self.scene;
        let Some(bubble) = scene.bubble(uid) else {
            return Ok(code);
        };

        let indent_level = if self.labels.needs_label(uid) {
            let label = self.labels.make_label(uid);
            tracing::trace!("[CODEGEN] {} gets label '{}'", uid, label);
            code.push_str(&format!("\n*label {}\n", label));
            0
        } else {
            indent_level
        };

        let body = match &bubble.kind {
            BubbleKind::Start => self.generate_start(uid, indent_level, depth)?,
            BubbleKind::Story { text } => self.generate_story(uid, text, indent_level, depth)?,
            BubbleKind::Action { script } => self.generate_action(uid, script, indent_level, depth)?,
            BubbleKind::Choice { options } => self.generate_choice(options, indent_level, depth)?,
            BubbleKind::Condition { expression } => {
                self.generate_condition(uid, expression, indent_level, depth)?
            }
        };
        code.push_str(&body);

        Ok(code)
    }

    /// Continue after a bubble: `*finish` without a link, `*goto` when the
    /// target needs a label, the inlined target otherwise.
    pub(super) fn follow_link(
        &mut self,
        link: Option<&Connection>,
        indent_level: usize,
        depth: usize,
    ) -> Result<String> {
        let indent = self.indent(indent_level);

        match link {
            None => Ok(format!("{}*finish\n", indent)),
            Some(connection) if self.labels.needs_label(connection.to) => Ok(format!(
                "{}*goto {}\n",
                indent,
                self.labels.make_label(connection.to)
            )),
            Some(connection) if self.processed.contains(&connection.to) => {
                tracing::trace!("[CODEGEN] {} already emitted, needs a label", connection.to);
                self.stranded.insert(connection.to);
                Ok(String::new())
            }
            Some(connection) => self.generate_bubble(connection.to, indent_level, depth + 1),
        }
    }

    /// Text block with every line indented to the given level.
    pub(super) fn indented_text(&self, text: &str, indent_level: usize) -> String {
        let indent = self.indent(indent_level);
        let mut code = String::new();

        for line in text.lines() {
            if !line.is_empty() {
                code.push_str(&indent);
                code.push_str(line);
            }
            code.push('\n');
        }

        code
    }

    pub(super) fn indent(&self, indent_level: usize) -> String {
        self.indent_unit.repeat(indent_level)
    }
}
