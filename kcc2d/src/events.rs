//! Notifications emitted by a controller.
//!
//! Listeners are plain closures called synchronously, in subscription order, from inside
//! `move_by` (collisions) or the trigger forwarding methods (trigger events).

use std::fmt;

use crate::collision::types::ContactRecord;
use crate::query::BodyId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControllerEvent {
    /// One accepted ray hit, in resolution order: horizontal hits before vertical ones.
    Collided(ContactRecord),
    TriggerEntered(BodyId),
    TriggerStayed(BodyId),
    TriggerExited(BodyId),
}

/// Handle returned by [`Listeners::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

type Callback = Box<dyn FnMut(&ControllerEvent) + Send>;

#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&ControllerEvent) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &ControllerEvent) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("next_id", &self.next_id)
            .field(
                "ids",
                &self.entries.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .finish()
    }
}
