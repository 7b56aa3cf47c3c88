//! Authentication

mod errors;
mod scope;
mod session;
mod token;

pub use errors::*;
pub use scope::*;
pub use session::*;
pub use token::*;
