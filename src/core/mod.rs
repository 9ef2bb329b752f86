// src/core/mod.rs
//! Dual-backend request layer: endpoints, token injection, transports and error normalization

pub mod backend;
pub mod endpoints;
pub mod error;
pub mod normalizer;
pub mod poll;
pub mod token;
pub mod transport;

pub use backend::Backend;
pub use endpoints::{Endpoint, EndpointRegistry};
pub use error::{ApiError, ErrorKind, ErrorSource};
pub use normalizer::{ErrorNormalizer, RawFailure, TransportFailure};
pub use poll::{ingest_and_poll, IngestHandle, PollConfig, PollState};
pub use token::TokenSlot;
pub use transport::{RequestBody, TransportClient, TransportOptions};
