// Tailfinder: long-tail keyword discovery backed by a generative model.
//
// This is the library root. The keyword pipeline lives in `pipeline`; the
// other modules are its model provider, data types and output surfaces.

pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod output;
pub mod pipeline;

#[cfg(feature = "web")]
pub mod web;
