pub use self::logger::*;
pub use self::timer::*;

pub mod logger;
pub mod timer;
