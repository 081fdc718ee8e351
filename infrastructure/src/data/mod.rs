//! File-backed and in-memory data adapters.
//!
//! - [`KnowledgeBaseLoader`]: JSON rule corpus for the kb agent
//! - [`InMemoryCustomerDirectory`]: profiles and transactions loaded from JSON
//! - [`InMemoryOtpQuota`]: sliding-window OTP limit per customer

mod customers;
mod knowledge_base;
mod otp_quota;

pub use customers::{CustomerDataError, CustomerFixtures, InMemoryCustomerDirectory};
pub use knowledge_base::{KnowledgeBaseError, KnowledgeBaseLoader};
pub use otp_quota::InMemoryOtpQuota;
