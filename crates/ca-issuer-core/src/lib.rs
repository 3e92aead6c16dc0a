//! Core types and errors for CA issuer readiness verification.
//!
//! This crate provides the foundational types shared by the verifier and its
//! collaborators:
//!
//! - **Types**: issuer references, readiness conditions, events and decoded
//!   keypair material
//! - **Errors**: every collaborator failure is an [`IssuerError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use ca_issuer_core::{
//!     reason, ConditionStatus, IssuerConditionType, IssuerRef, IssuerStatus, ReadinessState,
//! };
//!
//! let issuer = IssuerRef::issuer("ns1", "ca", "ca-secret").with_generation(3);
//! let mut status = IssuerStatus::default();
//! status.set_condition(
//!     issuer.generation,
//!     IssuerConditionType::Ready,
//!     ConditionStatus::True,
//!     reason::KEY_PAIR_VERIFIED,
//!     reason::MESSAGE_KEY_PAIR_VERIFIED,
//! );
//! assert_eq!(status.readiness(), ReadinessState::Verified);
//! ```

mod error;
pub mod types;

pub use error::{IssuerError, Result};
pub use types::*;
