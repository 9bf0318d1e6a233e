pub mod structs;

pub use structs::{DEFAULT_TTL, ProfileCache};
