mod analytics;
mod event;
mod object;
mod payload;
mod primitive;

pub use analytics::*;
pub use event::*;
pub use object::*;
pub use payload::*;
pub use primitive::*;
