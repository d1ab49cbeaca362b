pub mod jobs;
pub mod system;

pub use jobs::*;
pub use system::*;
