pub mod capture;
pub mod stream;

pub use capture::*;
pub use stream::*;
