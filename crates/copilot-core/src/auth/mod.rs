//! Authentication token lifecycle.
//!
//! [`provider::TokenProvider`] sits between the backend client and the host
//! identity mechanism ([`session::IdentitySession`]). It remembers whether the
//! last token was rejected so the next request forces a fresh grant.

pub mod credential;
pub mod provider;
pub mod session;
