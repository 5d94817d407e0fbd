//! Signal/slot system for Casement.
//!
//! This module provides a type-safe signal/slot mechanism for change
//! notification. Signals are emitted when state changes, and connected
//! slots (callbacks) are invoked in response.
//!
//! Dispatch is always synchronous on the emitting thread: the window
//! orchestration layer runs on a single control thread (the host UI event
//! loop), so there is no queued or cross-thread invocation machinery here.
//! Slots must assume callback re-entrancy.
//!
//! # Example
//!
//! ```
//! use casement_core::Signal;
//!
//! let closed = Signal::<String>::new();
//!
//! let conn_id = closed.connect(|name| {
//!     println!("window {} closed", name);
//! });
//!
//! closed.emit("main".to_string());
//! closed.disconnect(conn_id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked synchronously
/// with a reference to the provided arguments, in an unspecified order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple for multiple arguments.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Arc<dyn Fn(&Args) + Send + Sync>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot
    /// later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false`
    /// otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. This is useful during
    /// initialization or batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// If the signal is blocked, this does nothing. Slots connected or
    /// disconnected from within a slot take effect on the next emission:
    /// the connection set is snapshotted before dispatch so a re-entrant
    /// mutation cannot deadlock the connection table.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "casement_core::signal", "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<_> = self.connections.lock().values().cloned().collect();
        tracing::trace!(
            target: "casement_core::signal",
            connection_count = slots.len(),
            "emitting signal"
        );

        for slot in slots {
            slot(&args);
        }
    }
}
