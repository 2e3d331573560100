//! Sessions and the access gate in front of every contact operation.

pub mod password;
pub mod policy;
pub mod session;

pub use policy::{AccessPolicy, Operation, LOGIN_PATH};
pub use session::{AccessContext, Session};
