use thiserror::Error;

use crate::types::BodyHandle;

/// Wiring mistakes reported by the tracker.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerError {
    /// `update()` was called before `set_listener()`.
    #[error("update() called without a collision listener")]
    MissingListener,

    /// `ray_cast()` was called while an earlier cast has not been dispatched.
    #[error("a ray cast is already pending")]
    CastPending,

    /// The handle does not name a live body.
    #[error("body {0:?} is not live in this tracker")]
    UnknownBody(BodyHandle),
}
