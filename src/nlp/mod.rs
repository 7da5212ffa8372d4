pub mod fuzzy;
pub mod names;
pub mod tagger;

pub use fuzzy::*;
pub use names::*;
pub use tagger::*;
