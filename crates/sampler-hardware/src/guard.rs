//! Scoped fail-safe ownership of an actuator.

use std::ops::{Deref, DerefMut};

use crate::actuator::Actuator;

/// Owns an [`Actuator`] and drives it to its safe state (pump off, all
/// valves closed) when dropped — on normal return, on error propagation,
/// and on panic unwind alike.
///
/// The release is unconditional: turning an already-off pump off is a plain
/// register write, so a clean shutdown followed by the guard's own all-off
/// is harmless.  Failures during the release are logged rather than
/// propagated (there is nowhere left to propagate to).
///
/// Requires unwinding to be enabled; the workspace profiles deliberately do
/// not set `panic = "abort"`.
pub struct FailSafe<A: Actuator> {
    inner: A,
}

impl<A: Actuator> FailSafe<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

impl<A: Actuator> Deref for FailSafe<A> {
    type Target = A;

    fn deref(&self) -> &A {
        &self.inner
    }
}

impl<A: Actuator> DerefMut for FailSafe<A> {
    fn deref_mut(&mut self) -> &mut A {
        &mut self.inner
    }
}

impl<A: Actuator> Drop for FailSafe<A> {
    fn drop(&mut self) {
        if let Err(e) = self.inner.pump_off() {
            tracing::error!(error = %e, "fail-safe pump off failed");
        }
        if let Err(e) = self.inner.close_all_valves() {
            tracing::error!(error = %e, "fail-safe valve close failed");
        }
    }
}
