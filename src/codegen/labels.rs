//! # Label Policy
//!
//! Decides which bubbles need an explicit `*label` and names them. Both
//! answers depend on the emission sequence, so a policy is built once per
//! scene emission. Names are assigned up front and stay unique within the
//! scene.

use std::collections::{HashMap, HashSet};

use crate::graph::{Scene, Uid};

pub struct LabelPolicy<'a> {
    scene: &'a Scene,
    sequence: &'a [Uid],
    positions: HashMap<Uid, usize>,
    forced: HashSet<Uid>,
    names: HashMap<Uid, String>,
}

impl<'a> LabelPolicy<'a> {
    pub fn new(scene: &'a Scene, sequence: &'a [Uid]) -> Self {
        let positions = sequence
            .iter()
            .enumerate()
            .map(|(position, uid)| (*uid, position))
            .collect();

        let mut policy = Self {
            scene,
            sequence,
            positions,
            forced: HashSet::new(),
            names: HashMap::new(),
        };
        policy.assign_names();
        policy
    }

    /// Require labels on bubbles that turned out to be unreachable by
    /// fallthrough during emission. Returns whether anything changed.
    pub fn force(&mut self, uids: impl IntoIterator<Item = Uid>) -> bool {
        let before = self.forced.len();
        self.forced.extend(uids);
        if self.forced.len() == before {
            return false;
        }
        self.assign_names();
        true
    }

    /// Whether the bubble must be reachable through a `*goto` rather than by
    /// falling through from its predecessor.
    ///
    /// That is the case for bubbles with several incoming connections, for
    /// locked bubbles, and for bubbles whose single predecessor is emitted more
    /// than one position after them (unless the predecessor is a choice, whose
    /// options always inline their targets). Bubbles forced during emission
    /// need one as well.
    pub fn needs_label(&self, uid: Uid) -> bool {
        let Some(bubble) = self.scene.bubble(uid) else {
            return false;
        };

        let incoming = self.scene.incoming(uid);
        if incoming.len() > 1 || bubble.locked || self.forced.contains(&uid) {
            return true;
        }

        let Some(connection) = incoming.first() else {
            return false;
        };
        let Some(from) = self.scene.container(connection.from) else {
            return false;
        };
        if self.scene.bubble(from).is_some_and(|container| container.is_choice()) {
            return false;
        }

        match (self.positions.get(&from), self.positions.get(&uid)) {
            (Some(&from_position), Some(&position)) => from_position > position + 1,
            _ => false,
        }
    }

    /// Label text for a bubble.
    ///
    /// The user label with spaces turned into underscores, or `bubble_<uid>`
    /// when there is none. A `_<uid>` suffix is added when another bubble
    /// needing a label carries the same user label, or when the name is
    /// already taken by a bubble earlier in the sequence.
    pub fn make_label(&self, uid: Uid) -> String {
        match self.names.get(&uid) {
            Some(name) => name.clone(),
            None => self.base_name(uid),
        }
    }

    fn assign_names(&mut self) {
        let labeled: Vec<Uid> = self
            .sequence
            .iter()
            .copied()
            .filter(|uid| self.needs_label(*uid))
            .collect();

        let mut user_labels: HashMap<String, usize> = HashMap::new();
        for uid in &labeled {
            let label = self.user_label(*uid);
            if !label.is_empty() {
                *user_labels.entry(label).or_default() += 1;
            }
        }

        let mut taken = HashSet::new();
        let mut names = HashMap::new();
        for uid in labeled {
            let label = self.user_label(uid);
            let mut name = if user_labels.get(&label).is_some_and(|count| *count > 1) {
                format!("{}_{}", label, uid)
            } else {
                self.base_name(uid)
            };
            while taken.contains(&name) {
                name = format!("{}_{}", name, uid);
            }
            taken.insert(name.clone());
            names.insert(uid, name);
        }

        self.names = names;
    }

    fn user_label(&self, uid: Uid) -> String {
        self.scene
            .bubble(uid)
            .map(|bubble| label_text(&bubble.label))
            .unwrap_or_default()
    }

    fn base_name(&self, uid: Uid) -> String {
        let label = self.user_label(uid);
        if label.is_empty() {
            format!("bubble_{}", uid)
        } else {
            label
        }
    }
}

fn label_text(label: &str) -> String {
    label.replace(' ', "_")
}
