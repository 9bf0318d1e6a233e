pub mod profile;

pub use profile::{ProfileService, SearchChannel};
