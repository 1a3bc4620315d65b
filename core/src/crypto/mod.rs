pub mod types;
pub mod params;
pub mod padding;
pub mod block;
pub mod session;

pub use types::*;
pub use params::*;
pub use block::BlockCipherImpl;
pub use session::{BlockRule, CipherSession};
