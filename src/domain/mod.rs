//! Domain Layer
//!
//! Host dependency resolution without direct I/O.
//!
//! ## Structure
//!
//! - `entities/` - Dependency entries and manifests
//! - `value_objects/` - Versions, asset kinds, hashes, path lists
//! - `services/` - Servicing index, roll-forward, probe stages, resolver
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No direct I/O** - every disk query goes through the `FileSystem` port
//! 2. **Deterministic** - identical inputs and disk state give identical lists

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
