//! # Chronicler Script Compiler
//!
//! Compiles branching-narrative graphs built in the Chronicler editor into
//! ChoiceScript.
//!
//! A project holds scenes; each scene is a graph of "bubbles" (Start, Story,
//! Choice, Action, Condition) joined by connections. Compiling a scene:
//!
//! 1. **Order** - walk the connections from the Start bubble and give every
//!    reachable bubble an order number (locked bubbles keep theirs)
//! 2. **Sequence** - sort the bubbles by order, Start first among equals,
//!    then by UID
//! 3. **Preamble** - title, author, scene list and variable declarations
//! 4. **Emission** - render each bubble, inlining successors that can fall
//!    through and emitting `*label`/`*goto` pairs where they cannot
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chronicler::{export_project, CompileOptions, Project};
//! use std::path::Path;
//!
//! let (mut project, _report) = Project::load(Path::new("tale.chronx"))?;
//! let written = export_project(&mut project, Path::new("."), &CompileOptions::default())?;
//! for path in written {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), chronicler::ChroniclerError>(())
//! ```

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod project;

pub use compiler::{
    compile_project,
    compile_scene,
    compile_scene_with_options,
    export_project,
    save_project,
    CompiledScene,
};

pub use config::{CompileOptions, Indent};
pub use error::{ChroniclerError, Result};

pub use graph::{
    Anchor, Bubble, BubbleKind, BubbleType, ChoiceOption, Connection, ConnectionId,
    Port, Scene, Uid, UidAllocator,
};

pub use project::{backup_path, BackupRotation, LoadReport, Project, Variable, STARTUP_SCENE};
