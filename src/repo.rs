mod members;
mod store;
mod subscriptions;
mod workouts;

pub use members::*;
pub use store::*;
pub use subscriptions::*;
pub use workouts::*;
