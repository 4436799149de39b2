//! TypeScript interface generation from table descriptors.

mod emitter;
mod writer;

pub use emitter::*;
pub use writer::*;
