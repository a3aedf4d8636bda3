//! Order lifecycle: the state machine and the service that drives it
//! in lockstep with the balance ledger.

pub mod lifecycle;
pub mod service;
