//! # Timestamp-ordered sensor reading store
//!
//! Stores temperature/humidity readings in an unbalanced binary search tree
//! keyed by timestamp, fed by an emulated memory-mapped sensor peripheral.
//!
//! ## Components
//!
//! 1. **[`Reading`]**: immutable `(timestamp, temperature, humidity)` sample
//! 2. **[`ReadingTree`]**: insert, point search, in-order enumeration;
//!    equal timestamps chain to the left
//! 3. **[`registers::IoModule`]**: eight-register I/O map with switches, LEDs,
//!    RGB control and an AHT20-style temperature/humidity sensor
//! 4. **[`sampling`]**: drives the sensor once per day and decodes the raw
//!    registers into readings
//! 5. **[`date`]**: `MM/DD/YYYY` parsing into Unix timestamps
//!
//! ## Usage Example
//!
//! ```
//! use sensortree::registers::{IoConfig, IoModule};
//! use sensortree::sampling::{build_tree, SamplingConfig};
//! use sensortree::date::parse_timestamp;
//!
//! let mut io = IoModule::initialize(IoConfig::default().with_seed(1))?;
//! let tree = build_tree(&mut io, &SamplingConfig::default().with_shuffle_seed(2))?;
//!
//! let day = parse_timestamp("11/15/2024")?;
//! assert_eq!(tree.search(day).map(|r| r.timestamp), Some(day));
//! let all = tree.enumerate();
//! assert!(all.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp));
//! # Ok::<(), sensortree::Error>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod date;
pub mod reading;
pub mod registers;
pub mod sampling;
pub mod tree;

// Re-exports for convenience
pub use date::DateError;
pub use reading::Reading;
pub use registers::{IoConfig, IoModule, RegisterError};
pub use sampling::{SamplingConfig, SamplingError};
pub use tree::{InOrder, Node, ReadingTree};

use thiserror::Error;

/// Any failure surfaced by the library
#[derive(Error, Debug)]
pub enum Error {
    /// Register file setup or access failed
    #[error("register error: {0}")]
    Register(#[from] RegisterError),

    /// Date input was malformed or impossible
    #[error("date error: {0}")]
    Date(#[from] DateError),

    /// Sampling readings failed
    #[error("sampling error: {0}")]
    Sampling(#[from] SamplingError),
}
