//=========================================================================
// Observer
//=========================================================================
//
// Subject/observer notification plus a deferred event queue.
//
// Architecture:
//   Subject<Ev, Cx>
//     └─ observers: [(ObserverId, Box<dyn Observer>)]   registration order
//
//   EventQueue<Ev>  events raised where the subject is out of reach
//                   (inside task callbacks), drained at tick boundaries
//
// Observers receive a context `Cx` on every notification instead of
// holding references back into the world that owns the subject.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Observer ============================================================

/// Reacts to events of type `Ev`.
pub trait Observer<Ev, Cx: ?Sized>: Send {
    fn on_notify(&mut self, event: &Ev, context: &mut Cx);
}

/// Handle returned by [`Subject::add_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

//=== Subject =============================================================

/// Fans events out to registered observers in registration order.
pub struct Subject<Ev: 'static, Cx: ?Sized + 'static> {
    observers: Vec<(ObserverId, Box<dyn Observer<Ev, Cx>>)>,
    next_id: u32,
}

impl<Ev: 'static, Cx: ?Sized + 'static> Subject<Ev, Cx> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add_observer<O>(&mut self, observer: O) -> ObserverId
    where
        O: Observer<Ev, Cx> + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        debug!("Observer {:?} added ({} total)", id, self.observers.len());
        id
    }

    /// Returns `false` if the observer was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);

        let removed = self.observers.len() != before;
        if !removed {
            warn!("Observer {:?} not registered, nothing removed", id);
        }
        removed
    }

    pub fn notify(&mut self, event: &Ev, context: &mut Cx) {
        for (_, observer) in &mut self.observers {
            observer.on_notify(event, context);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<Ev: 'static, Cx: ?Sized + 'static> Default for Subject<Ev, Cx> {
    fn default() -> Self {
        Self::new()
    }
}

//=== EventQueue ==========================================================

/// FIFO of events waiting for the next tick boundary.
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    queue: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues an event for delivery at the next tick boundary.
    pub fn push(&mut self, event: T) {
        self.queue.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes every queued event, leaving the queue empty.
    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.queue)
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        label: &'static str,
    }

    impl Observer<u32, Vec<String>> for Recorder {
        fn on_notify(&mut self, event: &u32, context: &mut Vec<String>) {
            context.push(format!("{}:{}", self.label, event));
        }
    }

    #[test]
    fn notify_reaches_observers_in_order() {
        let mut subject = Subject::<u32, Vec<String>>::new();
        subject.add_observer(Recorder { label: "a" });
        subject.add_observer(Recorder { label: "b" });

        let mut seen = Vec::new();
        subject.notify(&7, &mut seen);

        assert_eq!(seen, vec!["a:7", "b:7"]);
    }

    #[test]
    fn removed_observer_is_silent() {
        let mut subject = Subject::<u32, Vec<String>>::new();
        let a = subject.add_observer(Recorder { label: "a" });
        subject.add_observer(Recorder { label: "b" });

        assert!(subject.remove_observer(a));
        assert!(!subject.remove_observer(a));

        let mut seen = Vec::new();
        subject.notify(&1, &mut seen);
        assert_eq!(seen, vec!["b:1"]);
        assert_eq!(subject.len(), 1);
    }

    #[test]
    fn queue_take_empties() {
        let mut queue = EventQueue::new();
        queue.push(1);
        queue.push(2);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.take(), vec![1, 2]);
        assert!(queue.is_empty());
    }
}
