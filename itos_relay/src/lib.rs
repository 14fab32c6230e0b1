//! Relay service for the ITOS real-estate tokenization demo.
//!
//! The platform's funds custody lives in external smart contracts on Sepolia
//! (an escrow, a property token and a test USDC token). This crate holds the
//! off-chain side: a chain client over JSON-RPC with a single signing
//! identity, the investment orchestration sequence, and the HTTP relay the
//! front end talks to.

pub mod api;
pub mod chain;
pub mod config;
pub mod invest;
