//! Outbound adapters for the hosted data and identity service.

pub mod remote;
