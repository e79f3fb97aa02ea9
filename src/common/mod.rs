mod key;
mod snapshot;

pub use key::*;
pub use snapshot::*;
