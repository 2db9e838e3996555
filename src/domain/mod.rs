//! Entities, value objects and the storage ports the services depend on.

pub mod account;
pub mod agreement;
pub mod ports;
