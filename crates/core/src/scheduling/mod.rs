//! Blocked-slot scheduling: ports, in-flight operation tracking and the
//! store service reconciling the remote and cached replicas.

pub mod ops;
pub mod ports;
pub mod service;
