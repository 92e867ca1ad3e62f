mod email_address;
mod person_name;
mod phone_number;
mod role;

pub use email_address::*;
pub use person_name::*;
pub use phone_number::*;
pub use role::*;
