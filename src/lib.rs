//! Core library for the Hazard home-automation control panel.
//! Provides the tag-keyed JSON type registry, the multi-key record comparator, the
//! domain models and REST client for the Hazard backend, and the egui front end.

pub mod client;
pub mod config;
pub mod error;
mod gui;
pub mod model;
pub mod registry;
pub mod sort;
pub mod statics;
mod value;

pub use client::HazardClient;
pub use config::Config;
pub use error::{HazardError, Result};
pub use gui::run_gui;
pub use model::{Model, ModelNode};
pub use registry::{Instance, Node, Tagged, TypeRegistry, serialize};
pub use sort::{Key, SortKey, sort_by, sort_records};
pub use value::{HzNumber, HzValue};
