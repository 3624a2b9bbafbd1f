//! # UID allocation
//!
//! Bubbles and choice options share one project-wide UID space. The allocator
//! is owned by the project and passed explicitly to every graph mutation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChroniclerError, Result};

/// Stable identifier of a bubble or choice option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(pub u32);

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out the smallest UID not currently in use
#[derive(Debug, Clone, Default)]
pub struct UidAllocator {
    in_use: BTreeSet<Uid>,
}

impl UidAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the smallest free UID.
    pub fn allocate(&mut self) -> Uid {
        let mut candidate = 0;
        for used in &self.in_use {
            if used.0 != candidate {
                break;
            }
            candidate += 1;
        }

        let uid = Uid(candidate);
        self.in_use.insert(uid);
        tracing::trace!("[UID] allocated {}", uid);
        uid
    }

    /// Reserve a specific UID, failing if it is already taken.
    pub fn claim(&mut self, uid: Uid) -> Result<()> {
        if self.in_use.insert(uid) {
            Ok(())
        } else {
            Err(ChroniclerError::DuplicateUid(uid))
        }
    }

    /// Return a UID to the pool. Releasing an unused UID is a no-op.
    pub fn release(&mut self, uid: Uid) {
        self.in_use.remove(&uid);
    }

    pub fn is_used(&self, uid: Uid) -> bool {
        self.in_use.contains(&uid)
    }

    pub fn len(&self) -> usize {
        self.in_use.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_use.is_empty()
    }
}
