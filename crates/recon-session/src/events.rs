//! Notifications raised by a session.

use std::fmt;

/// Something a host might want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The aggregate validity flipped.
    ValidityChanged(bool),
    /// Records could not be built from the reconciled dataset.
    MaterializeFailed { type_name: String, message: String },
}

type Listener = Box<dyn FnMut(&SessionEvent) + Send>;

#[derive(Default)]
pub(crate) struct Listeners(Vec<Listener>);

impl Listeners {
    pub(crate) fn push(&mut self, listener: Listener) {
        self.0.push(listener);
    }

    pub(crate) fn emit(&mut self, event: &SessionEvent) {
        for listener in &mut self.0 {
            listener(event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listeners({})", self.0.len())
    }
}
