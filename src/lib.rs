//! bonktrack: frame-driven 2D collision tracking (boxes, rays, circles) with pair events and ray casts

pub mod types;
pub mod api;
pub mod error;
pub mod pool;
pub mod narrowphase;
pub mod pairs;
pub mod raycast;
pub mod tracker;
pub mod debug;


pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::TrackerError;
pub use crate::narrowphase::CollisionUtils;
pub use crate::tracker::CollisionTracker;
