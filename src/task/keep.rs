//=========================================================================
// Task Keep
//=========================================================================
//
// Owning handle that holds a task alive.
//
// While at least one safety-enabled keep exists, `destroy` on the target
// is refused and `clear` on the registry skips it. When the last such keep
// is cleared or dropped the target is doomed and goes away on the next
// registry update. Keeps with safety off only observe.
//
// The keep count lives in a shared `Lifeline` so keeps can be cloned and
// dropped without access to the registry.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::type_name;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use log::trace;

//=== Internal Dependencies ===============================================

use super::context::TaskBuilder;
use super::error::TaskError;
use super::registry::{TaskId, TaskSystem};
use super::Task;

//=== Lifeline ============================================================

/// Keep count and doom flag shared between a task and its keeps.
#[derive(Debug, Default)]
pub(crate) struct Lifeline {
    links: AtomicUsize,
    doomed: AtomicBool,
}

impl Lifeline {
    pub(crate) fn links(&self) -> usize {
        self.links.load(Ordering::Acquire)
    }

    pub(crate) fn retain(&self) {
        self.links.fetch_add(1, Ordering::AcqRel);
    }

    /// Decrements the keep count, saturating at zero. Returns the new count.
    pub(crate) fn release(&self) -> usize {
        let previous = self
            .links
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_sub(1)))
            .unwrap_or(0);
        previous.saturating_sub(1)
    }

    pub(crate) fn doom(&self) {
        self.doomed.store(true, Ordering::Release);
    }

    pub(crate) fn is_doomed(&self) -> bool {
        self.doomed.load(Ordering::Acquire)
    }
}

//=== TaskKeep ============================================================

/// Keeps a task of type `T` alive.
///
/// Safety is on by default. A keep with safety off does not count as a
/// keep and never destroys its target; clearing it only lets go.
pub struct TaskKeep<T: Task> {
    target: Option<(TaskId, Arc<Lifeline>)>,
    safety: bool,
    marker: PhantomData<fn() -> T>,
}

impl<T: Task> TaskKeep<T> {
    /// Empty keep with safety on.
    pub fn new() -> Self {
        Self {
            target: None,
            safety: true,
            marker: PhantomData,
        }
    }

    /// Keeps an existing task with safety on.
    ///
    /// # Errors
    ///
    /// - [`TaskError::UnknownTask`] for a stale id.
    /// - [`TaskError::TypeMismatch`] if the task is not a `T`.
    /// - [`TaskError::Doomed`] if the task is already scheduled for removal.
    pub fn keep<E: 'static>(system: &TaskSystem<E>, id: TaskId) -> Result<Self, TaskError> {
        let mut keep = Self::new();
        keep.set(system, id)?;
        Ok(keep)
    }

    /// Handle that observes a task without holding it.
    pub(crate) fn watch<E: 'static>(system: &TaskSystem<E>, id: TaskId) -> Result<Self, TaskError> {
        let mut keep = Self::new();
        keep.safety = false;
        keep.set(system, id)?;
        Ok(keep)
    }

    /// Creates a task and keeps it.
    pub fn create<E, F>(system: &mut TaskSystem<E>, build: F) -> Self
    where
        E: 'static,
        F: FnOnce(&mut TaskBuilder<'_, T, E>) -> T,
    {
        let id = system.create(build);
        let mut keep = Self::new();
        keep.target = system.lifeline(id).map(|lifeline| {
            lifeline.retain();
            (id, lifeline)
        });
        keep
    }

    /// Retargets this keep, clearing the previous target first.
    pub fn set<E: 'static>(&mut self, system: &TaskSystem<E>, id: TaskId) -> Result<(), TaskError> {
        let lifeline = system.lifeline(id).ok_or(TaskError::UnknownTask(id))?;

        if !system.holds::<T>(id) {
            return Err(TaskError::TypeMismatch {
                id,
                expected: type_name::<T>(),
            });
        }

        if self.safety && system.is_scheduled(id) {
            return Err(TaskError::Doomed(id));
        }

        self.clear();
        if self.safety {
            lifeline.retain();
        }
        self.target = Some((id, lifeline));
        Ok(())
    }

    //--- Release ----------------------------------------------------------

    /// Releases the target and destroys it if nothing else keeps it.
    ///
    /// With safety off this is the same as [`free`](Self::free).
    pub fn clear(&mut self) {
        if !self.safety {
            self.free();
            return;
        }
        let Some((id, lifeline)) = self.target.take() else {
            return;
        };

        if lifeline.release() == 0 {
            lifeline.doom();
            trace!("Last keep of {} released, task doomed", id);
        }
    }

    /// Same as [`clear`](Self::clear).
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Releases the target without destroying it.
    pub fn free(&mut self) {
        if let Some((_, lifeline)) = self.target.take() {
            if self.safety {
                lifeline.release();
            }
        }
    }

    //--- Safety -----------------------------------------------------------

    pub fn set_safety(&mut self, safety: bool) {
        if self.safety == safety {
            return;
        }

        if let Some((_, lifeline)) = &self.target {
            if safety {
                lifeline.retain();
            } else {
                lifeline.release();
            }
        }
        self.safety = safety;
    }

    pub fn safety(&self) -> bool {
        self.safety
    }

    //--- Access -----------------------------------------------------------

    pub fn id(&self) -> Option<TaskId> {
        self.target.as_ref().map(|(id, _)| *id)
    }

    pub fn is_some(&self) -> bool {
        self.target.is_some()
    }

    pub fn get<'s, E: 'static>(&self, system: &'s TaskSystem<E>) -> Option<&'s T> {
        system.get::<T>(self.id()?)
    }

    pub fn get_mut<'s, E: 'static>(&self, system: &'s mut TaskSystem<E>) -> Option<&'s mut T> {
        system.get_mut::<T>(self.id()?)
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T: Task> Default for TaskKeep<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Task> Clone for TaskKeep<T> {
    fn clone(&self) -> Self {
        if let Some((_, lifeline)) = &self.target {
            if self.safety {
                lifeline.retain();
            }
        }

        Self {
            target: self.target.clone(),
            safety: self.safety,
            marker: PhantomData,
        }
    }
}

impl<T: Task> Drop for TaskKeep<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Task> std::fmt::Debug for TaskKeep<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskKeep")
            .field("target", &self.id())
            .field("safety", &self.safety)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
