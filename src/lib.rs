//! Constraint-solving service over JSON-RPC 2.0.
//!
//! Exposes `solve` and `ping` over newline-delimited stdio. A solve request
//! carries model text, a command label, a backend identifier, an output
//! format and solver options; the service validates it, loads the model,
//! runs exactly one command and replies with the encoded solution or a
//! classified error.
//!
//! The parser, engine and backend registry are pluggable through the traits
//! in [`engine`]; [`builtin`] provides a small reference engine.

pub mod builtin;
pub mod config;
pub mod engine;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod service;

pub mod schema;
