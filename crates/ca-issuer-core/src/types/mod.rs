mod condition;
mod event;
mod issuer;
mod keypair;
pub mod reason;

pub use condition::*;
pub use event::*;
pub use issuer::*;
pub use keypair::*;
