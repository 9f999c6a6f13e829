//! Bubble layout engine for recurring payments.
//!
//! Each payment becomes a circle: its radius follows the amount, its color
//! how close the next due date is. [`bubbles::compute_scene`] runs the whole
//! pipeline (enrich, select, size, pack, fit) as a pure function of its inputs.

pub mod bubbles;
pub mod config;
pub mod error;
pub mod subscription;
pub mod util;

pub use bubbles::{Bubble, BubbleScene, ViewOptions, Viewport, compute_scene};
pub use config::{EngineConfig, load_config};
pub use error::{EngineError, Result};
pub use subscription::{BillingCycle, SubscriptionRecord};
