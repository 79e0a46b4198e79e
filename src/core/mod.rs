//! Transaction building, signing, and the network configuration surface.

pub mod client;
pub mod payload;
pub mod transaction;
