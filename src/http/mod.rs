pub mod client;

pub use client::{ApiResponse, HttpTransport, Transport, TransportError};
