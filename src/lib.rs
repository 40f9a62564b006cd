// src/lib.rs

//! Subdomain discovery service: passive source aggregation, bounded brute-force
//! resolution and HTTP/HTTPS liveness detail for every name found.

pub mod api;
pub mod app;
pub mod config;
pub mod core;
pub mod logging;
