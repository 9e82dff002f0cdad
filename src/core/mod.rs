//! # Core Module
//!
//! Fundamental concurrency primitives shared by every subsystem.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write
//!   locking, used to share chunk data between the main thread and workers.
//!
//! ## Usage
//! ```rust
//! use voxel_world::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
