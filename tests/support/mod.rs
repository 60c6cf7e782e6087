//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod http_server;
pub mod socket_guard;
