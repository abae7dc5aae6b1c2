//! Examples and their generation.
//!
//! - [`Example`] - A start/end board pair separated by `delta` steps
//! - [`GeneratorConfig`] - Board shape, burn-in, delta and fill ranges for [`create_examples`]
//! - [`GeneratorSeed`] - Seed for deterministic generation
//!
//! # Generation Flow
//!
//! 1. Fill a random board, each cell alive with the drawn fill probability
//! 2. Advance it `burn_in` steps and discard the history
//! 3. Record the result as the start board and advance `delta` more steps for the end board
//! 4. Keep the example only if the end board has a live cell
//!
//! # Example
//!
//! ```
//! use revlife_engine::{GeneratorConfig, GeneratorSeed, create_examples};
//!
//! let mut rng = GeneratorSeed::from_u64(7).rng();
//! let config = GeneratorConfig::default().with_deltas(vec![1]);
//! let examples = create_examples(&mut rng, 4, &config).unwrap();
//!
//! assert_eq!(examples.len(), 4);
//! assert!(examples.iter().all(|e| !e.end().is_all_dead()));
//! ```

pub use self::{example::*, example_generator::*};

mod example;
mod example_generator;
