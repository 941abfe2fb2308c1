pub mod keys;
pub mod store;

pub use keys::ProgressKeys;
pub use store::{KeyKind, ProgressStore};

#[cfg(test)]
pub use store::MockProgressStore;
