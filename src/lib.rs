// src/lib.rs
//! Client library for the job portal: a primary REST backend and an AI
//! backend behind one session, with every failure normalized to [`ApiError`].

pub mod logging;

pub mod cli;
pub mod client;
pub mod core;
pub mod environment;
pub mod job_insights;
pub mod realtime;
pub mod services;
pub mod types;
pub mod utils;

pub use client::PortalClient;
pub use crate::core::{ApiError, Backend, ErrorKind, ErrorSource, PollConfig, TokenSlot};
pub use environment::EnvironmentConfig;
