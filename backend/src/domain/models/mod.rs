pub mod split_inputs;
pub mod user_context;

pub use split_inputs::*;
pub use user_context::*;
