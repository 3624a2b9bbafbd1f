//! # Connections
//!
//! Directed edges between bubbles. Endpoints are stored as UIDs and resolved
//! through the owning scene.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Port, Uid};

/// Scene-scoped connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side of a bubble's bounding box a connection attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    North,
    East,
    South,
    West,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    /// Source bubble, or choice option for links leaving a choice
    pub from: Uid,
    #[serde(default = "default_port")]
    pub port: Port,
    pub to: Uid,
    #[serde(default = "default_from_anchor")]
    pub from_anchor: Anchor,
    #[serde(default = "default_to_anchor")]
    pub to_anchor: Anchor,
}

fn default_port() -> Port {
    Port::Next
}

fn default_from_anchor() -> Anchor {
    Anchor::South
}

fn default_to_anchor() -> Anchor {
    Anchor::North
}

impl Connection {
    pub fn new(id: ConnectionId, from: Uid, port: Port, to: Uid) -> Self {
        Self {
            id,
            from,
            port,
            to,
            from_anchor: default_from_anchor(),
            to_anchor: default_to_anchor(),
        }
    }

    pub fn with_anchors(mut self, from_anchor: Anchor, to_anchor: Anchor) -> Self {
        self.from_anchor = from_anchor;
        self.to_anchor = to_anchor;
        self
    }

    /// Whether this connection occupies the given outgoing slot
    pub fn leaves(&self, from: Uid, port: Port) -> bool {
        self.from == from && self.port == port
    }
}
