//! Core domain types for routes, requests, and mock definitions.

pub mod node;
pub mod request;
pub mod route;
