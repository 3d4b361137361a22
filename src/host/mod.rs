//! The seam between the gesture core and whatever renders it.

mod dom;

pub use dom::{DomHost, HostSignal, ZoomCallbacks, touches_from_list};

use crate::model::GestureSnapshot;
use crate::state::BoundsTicket;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,
    #[error("tracked view is not mounted")]
    Detached,
    #[error("host call failed: {0}")]
    Js(String),
}

/// Everything the controller needs from the host. Both requests must answer
/// on a later turn of the event loop, never from inside the call.
pub trait ZoomHost {
    /// Measure the tracked view in window coordinates and hand the result to
    /// `ZoomController::bounds_resolved` with the same ticket.
    fn request_bounds(&mut self, ticket: BoundsTicket) -> Result<(), HostError>;

    /// Call `ZoomController::frame` once after `delay_ms`. A new request
    /// replaces any frame still pending.
    fn schedule_frame(&mut self, delay_ms: u32) -> Result<(), HostError>;

    /// Render the new state.
    fn publish(&mut self, snapshot: &GestureSnapshot);

    fn zoom_began(&mut self);

    fn zoom_ended(&mut self);
}
