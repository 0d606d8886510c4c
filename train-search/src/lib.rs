//! Train search server.
//!
//! Answers "which trains run between these two stations on this date?"
//! by driving the IRCTC search form in a real browser, or by proxying a
//! third-party JSON API that mirrors it.

pub mod config;
pub mod domain;
pub mod irctc;
pub mod normalize;
pub mod railapi;
pub mod web;
