//! Stagehand Transitions
//!
//! Declarative transitions for the children of a container. When a host
//! re-renders a container and children are added, removed or pushed around,
//! the change is animated instead of happening in a single frame.
//!
//! - **Stable children** slide from their old box to the new one (FLIP)
//! - **Entering children** fade, slide or scale in
//! - **Exiting children** stay in the document, pinned over their old box,
//!   until their exit animation finishes
//!
//! The host wires [`TransitionChildren::pre_update`] and
//! [`TransitionChildren::post_update`] around its DOM mutation and provides
//! the document through [`DomRuntime`]. [`headless::HeadlessDom`] is an
//! in-memory runtime.
//!
//! # Logging
//!
//! Decisions are reported through `tracing`: per-cycle summaries at `debug`,
//! per-element decisions at `trace`, runtime failures at `warn`.

pub mod config;
pub mod controller;
pub mod error;
pub mod headless;
pub mod partition;
pub mod runtime;
pub mod snapshot;

pub use config::{Direction, TransitionConfig, TransitionKind, TransitionProps};
pub use controller::{TransitionChildren, TransitionReport};
pub use error::{ConfigError, RuntimeError};
pub use headless::{HeadlessDom, NodeId};
pub use partition::Partition;
pub use runtime::{DomRuntime, FinishCallback, Position, StyleProperty, StyleValue};
pub use snapshot::{ContainerSnapshot, ElementSnapshot, ExitGroup, SnapshotTable};

pub use stagehand_animation::{Orientation, Rect};
