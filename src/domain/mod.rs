mod update;
mod errors;

pub use update::*;
pub use errors::*;
