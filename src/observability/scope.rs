//! Observation scope for paired begin/complete logging
//!
//! Logs `{name}_BEGIN` on creation. A scope that is dropped without
//! `complete()` logs `{name}_ABORTED` at error level, so an early return
//! from a batch is always visible.

use std::cell::Cell;

use super::logger::Logger;

/// Logs a begin event now and a matching end event later.
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
}

impl<'a> ObservationScope<'a> {
    /// Opens the scope, logging `{name}_BEGIN`.
    pub fn begin(name: &'a str, fields: &[(&str, &str)]) -> Self {
        Logger::info(&format!("{name}_BEGIN"), fields);
        Self {
            name,
            completed: Cell::new(false),
        }
    }

    /// Closes the scope cleanly, logging `{name}_COMPLETE`.
    pub fn complete(self, fields: &[(&str, &str)]) {
        Logger::info(&format!("{}_COMPLETE", self.name), fields);
        self.completed.set(true);
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            Logger::error(&format!("{}_ABORTED", self.name), &[]);
        }
    }
}
