pub mod faceit_client;
pub mod models;

pub use faceit_client::FaceitClient;
