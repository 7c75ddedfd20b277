pub mod chat;
pub mod enums;
pub mod imaging;
pub mod intake;
pub mod queue;
pub mod triage;

pub use chat::*;
pub use enums::*;
pub use imaging::*;
pub use intake::*;
pub use queue::*;
pub use triage::*;
