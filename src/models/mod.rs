pub mod diagnostic;
pub mod person;
pub mod transcript;
pub mod utterance;

pub use diagnostic::*;
pub use person::*;
pub use transcript::*;
pub use utterance::*;
