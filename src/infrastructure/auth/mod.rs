//! Authentication infrastructure module
//!
//! This module provides JWT session tokens for authenticated requests.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
