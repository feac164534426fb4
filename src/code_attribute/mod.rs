mod decoder;
pub mod opcodes;
mod types;

pub use self::decoder::*;
pub use self::types::*;
