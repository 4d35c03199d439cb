//! App - the batch adapter.
//!
//! # Components
//! - **Invoker**: one message end-to-end (decode, invoke, await, validate, encode)
//! - **BatchAdapter** / `process_batch`: the batch driver and failure isolation
//! - **AdapterBuilder**: fail-fast construction of a `BatchAdapter`

pub mod builder;
pub mod driver;
pub mod invoker;

pub use self::builder::{AdapterBuilder, BuildError};
pub use self::driver::{BatchAdapter, process_batch};
pub use self::invoker::{Invoker, validate};
