pub mod definition;
pub mod map;
pub mod simulator;

pub use definition::*;
pub use map::*;
pub use simulator::*;
