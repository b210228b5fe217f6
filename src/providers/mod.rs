//! Production implementations of the capability traits.
//!
//! This module provides the "real" implementations of the traits defined in
//! [`crate::traits`] that do not depend on a particular chain runtime. Token
//! and router capabilities are supplied by the embedding environment; tests
//! use the fakes in [`crate::testing`].

mod system_clock;

pub use self::system_clock::SystemClock;
