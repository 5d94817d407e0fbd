//! Core systems for Casement.
//!
//! This crate provides the foundational components of the Casement window
//! orchestration layer:
//!
//! - **Signal/Slot System**: Type-safe change notification with explicit
//!   connection management
//! - **Shared Store**: A generic key/value store with per-key change
//!   subscription
//!
//! # Signal Example
//!
//! ```
//! use casement_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let title_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = title_changed.connect(|title| {
//!     println!("Title changed to: {}", title);
//! });
//!
//! // Emit the signal
//! title_changed.emit("Hello, World!".to_string());
//!
//! // Disconnect when done
//! title_changed.disconnect(conn_id);
//! ```
//!
//! # Shared Store Example
//!
//! ```
//! use casement_core::SharedStore;
//!
//! let store: SharedStore<i32> = SharedStore::new();
//! store.watch("counter", |value| {
//!     println!("counter is now {}", value);
//! });
//! store.set("counter", 1);
//! assert_eq!(store.get("counter"), Some(1));
//! ```

mod signal;
mod store;

pub use signal::{ConnectionId, Signal};
pub use store::SharedStore;
