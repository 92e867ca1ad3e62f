mod forms;
mod reminders;

pub use forms::*;
pub use reminders::*;
