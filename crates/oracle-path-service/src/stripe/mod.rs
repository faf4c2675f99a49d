//! Stripe payment integration.
//!
//! Subscription billing for the premium tier: customer creation, incomplete
//! subscription checkout (payment-intent flow), cancel-at-period-end, and
//! webhook signature verification.

pub mod client;
pub mod signature;
pub mod types;

pub use client::{StripeClient, StripeError};
pub use types::{Customer, PaymentIntent, Subscription};
