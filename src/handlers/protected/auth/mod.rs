pub mod session;

pub use session::{logout, whoami};
