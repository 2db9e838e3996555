//! Application layer containing the banking business logic.
//!
//! `AccountService` is the only component that mutates balances;
//! `PaymentProcessor` picks accounts by agreement and type and delegates the
//! actual money movement to it.

pub mod account_service;
pub mod agreement_service;
pub mod payment_processor;
