pub mod documents;
pub(crate) mod health;
pub mod root;

pub use health::health_check;
