//! # Bubbles
//!
//! Typed nodes of the narrative graph. Each bubble type carries its own
//! payload; link slots are described by [`Port`] and stored as connections on
//! the owning scene.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Uid;

/// Type tag of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleType {
    Start,
    Story,
    Choice,
    Action,
    Condition,
}

impl fmt::Display for BubbleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BubbleType::Start => write!(f, "start"),
            BubbleType::Story => write!(f, "story"),
            BubbleType::Choice => write!(f, "choice"),
            BubbleType::Action => write!(f, "action"),
            BubbleType::Condition => write!(f, "condition"),
        }
    }
}

/// Outgoing link slot of a bubble or choice option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Port {
    /// Sole link of Start, Story, Action and choice options
    Next,
    /// Condition branch taken when the expression holds
    True,
    /// Condition branch taken otherwise
    False,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Next => write!(f, "next"),
            Port::True => write!(f, "true"),
            Port::False => write!(f, "false"),
        }
    }
}

/// One answer of a choice bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub uid: Uid,
    #[serde(default)]
    pub text: String,
}

/// Type-specific payload of a bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BubbleKind {
    Start,
    Story {
        #[serde(default)]
        text: String,
    },
    Action {
        #[serde(default)]
        script: String,
    },
    Condition {
        #[serde(default)]
        expression: String,
    },
    Choice {
        #[serde(default)]
        options: Vec<ChoiceOption>,
    },
}

impl BubbleKind {
    pub fn story(text: impl Into<String>) -> Self {
        BubbleKind::Story { text: text.into() }
    }

    pub fn action(script: impl Into<String>) -> Self {
        BubbleKind::Action {
            script: script.into(),
        }
    }

    pub fn condition(expression: impl Into<String>) -> Self {
        BubbleKind::Condition {
            expression: expression.into(),
        }
    }

    /// A choice without options; add them through the scene so they get UIDs.
    pub fn choice() -> Self {
        BubbleKind::Choice {
            options: Vec::new(),
        }
    }

    pub fn bubble_type(&self) -> BubbleType {
        match self {
            BubbleKind::Start => BubbleType::Start,
            BubbleKind::Story { .. } => BubbleType::Story,
            BubbleKind::Action { .. } => BubbleType::Action,
            BubbleKind::Condition { .. } => BubbleType::Condition,
            BubbleKind::Choice { .. } => BubbleType::Choice,
        }
    }

    /// Ports a connection may leave the bubble itself from.
    ///
    /// Choice bubbles have none: their links hang off the options.
    pub fn ports(&self) -> &'static [Port] {
        match self {
            BubbleKind::Start | BubbleKind::Story { .. } | BubbleKind::Action { .. } => {
                &[Port::Next]
            }
            BubbleKind::Condition { .. } => &[Port::True, Port::False],
            BubbleKind::Choice { .. } => &[],
        }
    }
}

/// A node of the narrative graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub uid: Uid,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: BubbleKind,
}

impl Bubble {
    pub fn new(uid: Uid, kind: BubbleKind) -> Self {
        Self {
            uid,
            label: String::new(),
            order: 0,
            locked: false,
            kind,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn bubble_type(&self) -> BubbleType {
        self.kind.bubble_type()
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, BubbleKind::Start)
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, BubbleKind::Choice { .. })
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match &self.kind {
            BubbleKind::Choice { options } => options,
            _ => &[],
        }
    }

    pub fn has_option(&self, uid: Uid) -> bool {
        self.options().iter().any(|option| option.uid == uid)
    }

    pub fn has_port(&self, port: Port) -> bool {
        self.kind.ports().contains(&port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_bubbles_expose_no_ports() {
        assert!(BubbleKind::choice().ports().is_empty());
        assert_eq!(BubbleKind::condition("x").ports(), &[Port::True, Port::False]);
        assert_eq!(BubbleKind::story("s").ports(), &[Port::Next]);
    }

    #[test]
    fn bubble_serializes_with_flat_type_tag() {
        let bubble = Bubble::new(Uid(3), BubbleKind::story("Once upon a time")).with_label("intro");
        let json = serde_json::to_value(&bubble).unwrap();

        assert_eq!(json["type"], "story");
        assert_eq!(json["uid"], 3);
        assert_eq!(json["text"], "Once upon a time");
        assert_eq!(json["label"], "intro");
    }

    #[test]
    fn missing_optional_fields_default() {
        let bubble: Bubble =
            serde_json::from_str(r#"{ "uid": 7, "type": "condition", "expression": "gold > 3" }"#)
                .unwrap();

        assert_eq!(bubble.order, 0);
        assert!(!bubble.locked);
        assert!(bubble.label.is_empty());
        assert_eq!(bubble.bubble_type(), BubbleType::Condition);
    }
}
