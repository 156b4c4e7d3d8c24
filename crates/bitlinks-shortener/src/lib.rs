//! Shortening backends and the three-way fan-out.
//!
//! [`BitlyShortener`] talks to the Bitly v4 API, [`SeqShortener`] mints
//! links locally for offline use, and [`ShorteningGateway`] drives any
//! [`Shortener`](bitlinks_core::Shortener) once per channel.

pub mod bitly;
pub mod gateway;
pub mod seq;

pub use bitly::{BitlyConfig, BitlyShortener};
pub use gateway::{GatewayError, ShorteningGateway};
pub use seq::SeqShortener;
