mod api_client;
mod session;

pub use api_client::*;
pub use session::*;
