pub mod definition;
pub mod layout;
pub mod normalizer;
pub mod shapes;

pub use definition::*;
pub use layout::*;
pub use normalizer::*;
pub use shapes::*;
