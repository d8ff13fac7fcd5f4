//! # Random Number Generation
//!
//! Seeded random number generation for the path simulator.
//!
//! ## Design
//!
//! - **Reproducibility**: every generator is seeded; a run is fully determined
//!   by the seed handed to it
//! - **Injection**: the simulator never creates its own generator; callers
//!   pass a [`PricerRng`] in, so tests and sweeps control the randomness
//! - **Per-path streams**: each path draws from its own generator derived
//!   from a base seed and the path index, so sequential and parallel runs
//!   produce identical paths
//!
//! ## British English Convention
//!
//! Documentation in this crate uses British English spelling
//! ("initialise", "behaviour", "normalise").
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut rng = PricerRng::from_seed(12345);
//! let base = rng.next_seed();
//!
//! // Path 7 always sees the same stream for a given base seed
//! let mut a = PricerRng::stream(base, 7);
//! let mut b = PricerRng::stream(base, 7);
//! assert_eq!(a.gen_normal(), b.gen_normal());
//! ```

mod prng;

pub use prng::{split_mix64, PricerRng};
