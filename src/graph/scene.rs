//! # Scenes
//!
//! A scene owns its bubbles and connections. Bubbles keep no references to
//! their connections; incoming and outgoing links are looked up here by UID.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::{Anchor, Bubble, BubbleKind, ChoiceOption, Connection, ConnectionId, Port, Uid, UidAllocator};
use crate::error::{ChroniclerError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    name: String,
    #[serde(default)]
    bubbles: Vec<Bubble>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl Scene {
    /// Create a scene rooted at a fresh Start bubble.
    pub fn new(name: impl Into<String>, uids: &mut UidAllocator) -> Self {
        let start = Bubble::new(uids.allocate(), BubbleKind::Start);
        Self {
            name: name.into(),
            bubbles: vec![start],
            connections: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Bubbles in insertion order
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubble(&self, uid: Uid) -> Option<&Bubble> {
        self.bubbles.iter().find(|bubble| bubble.uid == uid)
    }

    pub fn bubble_mut(&mut self, uid: Uid) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|bubble| bubble.uid == uid)
    }

    pub fn start(&self) -> Result<&Bubble> {
        self.bubbles
            .iter()
            .find(|bubble| bubble.is_start())
            .ok_or_else(|| ChroniclerError::MissingStart(self.name.clone()))
    }

    pub(crate) fn start_mut(&mut self) -> Result<&mut Bubble> {
        let name = &self.name;
        self.bubbles
            .iter_mut()
            .find(|bubble| bubble.is_start())
            .ok_or_else(|| ChroniclerError::MissingStart(name.clone()))
    }

    /// The choice bubble owning the given option, if any
    pub fn option_owner(&self, option: Uid) -> Option<&Bubble> {
        self.bubbles.iter().find(|bubble| bubble.has_option(option))
    }

    /// Container of a UID: the parent choice for an option, the bubble itself
    /// otherwise.
    pub fn container(&self, uid: Uid) -> Option<Uid> {
        if self.bubble(uid).is_some() {
            return Some(uid);
        }
        self.option_owner(uid).map(|owner| owner.uid)
    }

    /// Add a new bubble with a freshly allocated UID.
    ///
    /// Options already present in a choice payload keep their UIDs, which are
    /// claimed from the allocator.
    pub fn add_bubble(&mut self, uids: &mut UidAllocator, kind: BubbleKind) -> Result<Uid> {
        if matches!(kind, BubbleKind::Start) {
            return Err(ChroniclerError::DuplicateStart(self.name.clone()));
        }

        let uid = uids.allocate();
        let bubble = Bubble::new(uid, kind);
        let option_uids: Vec<Uid> = bubble.options().iter().map(|option| option.uid).collect();
        if let Err(err) = claim_all(uids, option_uids) {
            uids.release(uid);
            return Err(err);
        }

        tracing::debug!("[SCENE] {}: added {} bubble {}", self.name, bubble.bubble_type(), uid);
        self.bubbles.push(bubble);
        Ok(uid)
    }

    /// Insert a fully formed bubble, claiming its UID and option UIDs.
    pub fn insert_bubble(&mut self, uids: &mut UidAllocator, bubble: Bubble) -> Result<()> {
        if bubble.is_start() && self.start().is_ok() {
            return Err(ChroniclerError::DuplicateStart(self.name.clone()));
        }

        let all_uids = std::iter::once(bubble.uid).chain(bubble.options().iter().map(|option| option.uid));
        claim_all(uids, all_uids)?;

        self.bubbles.push(bubble);
        Ok(())
    }

    /// Append an option to a choice bubble.
    pub fn add_option(
        &mut self,
        uids: &mut UidAllocator,
        choice: Uid,
        text: impl Into<String>,
    ) -> Result<Uid> {
        let bubble = self
            .bubble_mut(choice)
            .ok_or(ChroniclerError::BubbleNotFound(choice))?;
        let BubbleKind::Choice { options } = &mut bubble.kind else {
            return Err(ChroniclerError::NotAChoice(choice));
        };

        let uid = uids.allocate();
        options.push(ChoiceOption {
            uid,
            text: text.into(),
        });
        Ok(uid)
    }

    /// Remove an option and its outgoing link.
    pub fn remove_option(&mut self, uids: &mut UidAllocator, option: Uid) -> Result<ChoiceOption> {
        let owner = self
            .option_owner(option)
            .map(|bubble| bubble.uid)
            .ok_or(ChroniclerError::BubbleNotFound(option))?;

        self.connections.retain(|connection| connection.from != option);

        let removed = match self.bubble_mut(owner).map(|bubble| &mut bubble.kind) {
            Some(BubbleKind::Choice { options }) => {
                let index = options
                    .iter()
                    .position(|candidate| candidate.uid == option)
                    .ok_or(ChroniclerError::BubbleNotFound(option))?;
                options.remove(index)
            }
            _ => return Err(ChroniclerError::BubbleNotFound(option)),
        };

        uids.release(option);
        Ok(removed)
    }

    /// Remove a bubble together with every connection attached to it.
    pub fn remove_bubble(&mut self, uids: &mut UidAllocator, uid: Uid) -> Result<Bubble> {
        let index = self
            .bubbles
            .iter()
            .position(|bubble| bubble.uid == uid)
            .ok_or(ChroniclerError::BubbleNotFound(uid))?;
        if self.bubbles[index].is_start() {
            return Err(ChroniclerError::CannotRemoveStart);
        }

        let bubble = self.bubbles.remove(index);
        let owned: HashSet<Uid> = std::iter::once(uid)
            .chain(bubble.options().iter().map(|option| option.uid))
            .collect();

        let before = self.connections.len();
        self.connections
            .retain(|connection| !owned.contains(&connection.from) && connection.to != uid);
        tracing::debug!(
            "[SCENE] {}: removed bubble {} and {} connection(s)",
            self.name,
            uid,
            before - self.connections.len()
        );

        for owned_uid in owned {
            uids.release(owned_uid);
        }
        Ok(bubble)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|connection| connection.id == id)
    }

    /// Link `from`'s `port` slot to `to` with default anchors.
    pub fn connect(&mut self, from: Uid, port: Port, to: Uid) -> Result<ConnectionId> {
        self.connect_anchored(from, port, to, Anchor::South, Anchor::North)
    }

    /// Link a slot to a target bubble, replacing whatever occupied the slot.
    pub fn connect_anchored(
        &mut self,
        from: Uid,
        port: Port,
        to: Uid,
        from_anchor: Anchor,
        to_anchor: Anchor,
    ) -> Result<ConnectionId> {
        if self.container(from).is_none() {
            return Err(ChroniclerError::BubbleNotFound(from));
        }
        if !self.slot_exists(from, port) {
            return Err(ChroniclerError::InvalidPort { uid: from, port });
        }
        if self.container(to).is_none() {
            return Err(ChroniclerError::BubbleNotFound(to));
        }
        if !self.is_valid_target(to) {
            return Err(ChroniclerError::InvalidTarget(to));
        }

        self.connections.retain(|connection| !connection.leaves(from, port));

        let id = self.next_connection_id();
        self.connections
            .push(Connection::new(id, from, port, to).with_anchors(from_anchor, to_anchor));
        tracing::debug!("[SCENE] {}: connected {}.{} -> {} as {}", self.name, from, port, to, id);
        Ok(id)
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> Result<Connection> {
        let index = self
            .connections
            .iter()
            .position(|connection| connection.id == id)
            .ok_or(ChroniclerError::ConnectionNotFound(id))?;
        Ok(self.connections.remove(index))
    }

    /// Connection occupying an outgoing slot
    pub fn link(&self, from: Uid, port: Port) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|connection| connection.leaves(from, port))
    }

    /// Outgoing connections of a bubble in slot order.
    ///
    /// For a choice this is the link of every option in option order.
    pub fn links(&self, uid: Uid) -> Vec<&Connection> {
        let Some(bubble) = self.bubble(uid) else {
            return self.link(uid, Port::Next).into_iter().collect();
        };

        match &bubble.kind {
            BubbleKind::Choice { options } => options
                .iter()
                .filter_map(|option| self.link(option.uid, Port::Next))
                .collect(),
            kind => kind
                .ports()
                .iter()
                .filter_map(|port| self.link(uid, *port))
                .collect(),
        }
    }

    /// Connections ending at a bubble
    pub fn incoming(&self, uid: Uid) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|connection| connection.to == uid)
            .collect()
    }

    /// Bubbles reachable from the Start bubble by following links.
    pub fn reachable(&self) -> HashSet<Uid> {
        let mut seen = HashSet::new();
        let Ok(start) = self.start() else {
            return seen;
        };

        let mut queue = VecDeque::from([start.uid]);
        seen.insert(start.uid);
        while let Some(uid) = queue.pop_front() {
            for connection in self.links(uid) {
                if seen.insert(connection.to) {
                    queue.push_back(connection.to);
                }
            }
        }
        seen
    }

    /// Drop connections that cannot be resolved against this scene.
    ///
    /// A connection is dropped when its source slot or target is missing, when
    /// it targets a Start bubble or a choice option, or when an earlier
    /// connection already occupies the same slot or id. Returns the dropped
    /// connections.
    pub fn repair(&mut self) -> Vec<Connection> {
        let connections = std::mem::take(&mut self.connections);
        let mut occupied = HashSet::new();
        let mut ids = HashSet::new();
        let mut dropped = Vec::new();

        for connection in connections {
            let resolved = self.slot_exists(connection.from, connection.port)
                && self.is_valid_target(connection.to);
            if resolved
                && ids.insert(connection.id)
                && occupied.insert((connection.from, connection.port))
            {
                self.connections.push(connection);
            } else {
                tracing::warn!(
                    "[SCENE] {}: dropping unresolved connection {} ({}.{} -> {})",
                    self.name,
                    connection.id,
                    connection.from,
                    connection.port,
                    connection.to
                );
                dropped.push(connection);
            }
        }

        dropped
    }

    /// Claim every UID of this scene, used when rebuilding an allocator.
    pub(crate) fn claim_uids(&self, uids: &mut UidAllocator) -> Result<()> {
        for bubble in &self.bubbles {
            uids.claim(bubble.uid)?;
            for option in bubble.options() {
                uids.claim(option.uid)?;
            }
        }
        Ok(())
    }

    /// Check that exactly one Start bubble roots the scene.
    pub(crate) fn validate_start(&self) -> Result<()> {
        match self.bubbles.iter().filter(|bubble| bubble.is_start()).count() {
            0 => Err(ChroniclerError::MissingStart(self.name.clone())),
            1 => Ok(()),
            _ => Err(ChroniclerError::DuplicateStart(self.name.clone())),
        }
    }

    fn slot_exists(&self, from: Uid, port: Port) -> bool {
        match self.bubble(from) {
            Some(bubble) => bubble.has_port(port),
            None => port == Port::Next && self.option_owner(from).is_some(),
        }
    }

    fn is_valid_target(&self, to: Uid) -> bool {
        self.bubble(to).is_some_and(|bubble| !bubble.is_start())
    }

    fn next_connection_id(&self) -> ConnectionId {
        let next = self
            .connections
            .iter()
            .map(|connection| connection.id.0 + 1)
            .max()
            .unwrap_or(0);
        ConnectionId(next)
    }
}

/// Claim all UIDs or none of them.
fn claim_all(uids: &mut UidAllocator, candidates: impl IntoIterator<Item = Uid>) -> Result<()> {
    let mut claimed = Vec::new();
    for uid in candidates {
        if let Err(err) = uids.claim(uid) {
            for uid in claimed {
                uids.release(uid);
            }
            return Err(err);
        }
        claimed.push(uid);
    }
    Ok(())
}
