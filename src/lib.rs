//! Lane-packed timeline engine.
//!
//! Takes a list of dated items and works out, for one render:
//!
//! * the padded date span ([`layout::boundaries`]),
//! * which horizontal lane each item sits in ([`layout::assign_lanes`]),
//! * the visible window for the current zoom ([`model::Viewport`]),
//! * where each item lands inside that window, in percent.
//!
//! It also hosts the per-item interaction state machines for resizing by drag
//! and inline renaming ([`interaction`]). Those never mutate items; they emit
//! [`model::ItemUpdate`]s that the owner applies to its [`model::ItemStore`].

pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use interaction::{Edge, InteractionError, Interactions};
pub use layout::{assign_lanes, boundaries, LaneCache, LanePolicy, TimelineLayout, TimelineSpan};
pub use model::{Item, ItemId, ItemPatch, ItemStore, ItemUpdate, Scheduled, Viewport};
