//! # Graph Model
//!
//! Bubbles, choice options and connections arranged in scenes. The graph may
//! be cyclic and bubbles may have any number of incoming connections; every
//! outgoing slot holds at most one connection.

mod bubble;
mod connection;
mod scene;
mod uid;

pub use bubble::{Bubble, BubbleKind, BubbleType, ChoiceOption, Port};
pub use connection::{Anchor, Connection, ConnectionId};
pub use scene::Scene;
pub use uid::{Uid, UidAllocator};
