mod members;
mod subscriptions;
mod workouts;

pub use members::*;
pub use subscriptions::*;
pub use workouts::*;
