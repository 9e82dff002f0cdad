//! # Task Module
//!
//! The unit of background work. A task is a boxed closure that owns all the
//! data it needs (cloned `Arc` handles to the world, generator or mesher) and
//! produces one result value of the manager's result type.
//!
//! Keeping tasks as plain closures keeps the worker pool oblivious to what it
//! runs: chunk generation and mesh extraction go through the same channels,
//! distinguished only by the result enum the engine drains.

/// A unit of background work producing a result of type `R`.
pub type Task<R> = Box<dyn FnOnce() -> R + Send + 'static>;
