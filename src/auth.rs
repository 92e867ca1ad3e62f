mod bearer;
mod gate;
mod session;

pub use bearer::*;
pub use gate::*;
pub use session::*;
