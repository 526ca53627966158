//! # Trit Gossip Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Codec and dispatch throughput (criterion)
//! └── src/integration/  # Whole-node flows over localhost UDP
//!     ├── propagation.rs
//!     └── round_rollover.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tg-tests
//! cargo bench -p tg-tests
//! ```

pub mod integration;
