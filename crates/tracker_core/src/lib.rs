//! Rider tracking view: animation stepper and the controller that owns view
//! state.

pub mod animation;
pub mod controller;
pub mod error;
pub mod events;
pub mod settings;

pub use animation::{animate_marker, AnimationError, AnimationHandle, AnimationState};
pub use controller::{ViewController, ViewState};
pub use error::ViewError;
pub use events::ViewEvent;
pub use settings::TrackerSettings;
