pub mod controller;
pub mod gesture;

pub use controller::ZoomController;
pub use gesture::{BoundsTicket, Command, GestureMachine, StartDecision, touch_pair};
