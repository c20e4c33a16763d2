//=== Task Context ========================================================
//
// Handles passed to user code: `TaskBuilder` while a task is being
// constructed, `TaskContext` while one of its callbacks runs.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use super::call::{erase, CallFn, CallId};
use super::error::TaskError;
use super::keep_array::KeepId;
use super::registry::{TaskId, TaskSystem};
use super::{Task, UPDATE};

//=== TaskContext =========================================================

/// What a callback sees besides its own task.
///
/// Dereferences to the [`TaskSystem`], so a callback can create, destroy,
/// bind, and look up other tasks. The running task itself is checked out
/// for the duration of the call and is invisible to lookups.
pub struct TaskContext<'a, E: 'static> {
    system: &'a mut TaskSystem<E>,
    env: &'a mut E,
    current: TaskId,
}

impl<'a, E: 'static> TaskContext<'a, E> {
    pub(super) fn new(system: &'a mut TaskSystem<E>, env: &'a mut E, current: TaskId) -> Self {
        Self {
            system,
            env,
            current,
        }
    }

    /// Id of the task whose callback is running.
    pub fn id(&self) -> TaskId {
        self.current
    }

    pub fn env(&self) -> &E {
        self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        self.env
    }

    /// Flags the running task for removal at the next update.
    pub fn destroy_self(&mut self) {
        let id = self.current;
        self.system.destroy(id);
    }

    /// System and environment borrowed at once.
    pub fn split(&mut self) -> (&mut TaskSystem<E>, &mut E) {
        (&mut *self.system, &mut *self.env)
    }
}

impl<E: 'static> Deref for TaskContext<'_, E> {
    type Target = TaskSystem<E>;

    fn deref(&self) -> &Self::Target {
        self.system
    }
}

impl<E: 'static> DerefMut for TaskContext<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.system
    }
}

//=== TaskBuilder =========================================================

/// Construction-time handle for a task of type `T`.
///
/// The id is already reserved, so callbacks and lookups can be attached
/// before the task value exists.
pub struct TaskBuilder<'a, T: Task, E: 'static> {
    system: &'a mut TaskSystem<E>,
    id: TaskId,
    marker: PhantomData<fn() -> T>,
}

impl<'a, T: Task, E: 'static> TaskBuilder<'a, T, E> {
    pub(super) fn new(system: &'a mut TaskSystem<E>, id: TaskId) -> Self {
        Self {
            system,
            id,
            marker: PhantomData,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Binds `f` in the [`UPDATE`] group at priority 0.
    pub fn bind(&mut self, f: CallFn<T, E>) -> CallId {
        self.bind_with(f, UPDATE, 0, true)
    }

    pub fn bind_with(&mut self, f: CallFn<T, E>, group: u8, priority: usize, push_back: bool) -> CallId {
        self.system.attach(self.id, Some(erase(f)), group, priority, push_back)
    }

    /// Reserves a dispatch position without a callback.
    pub fn bind_idle(&mut self, group: u8, priority: usize) -> CallId {
        self.system.attach(self.id, None, group, priority, true)
    }

    /// Lists the new task in the indexed lookup for `T`.
    pub fn register_get(&mut self) -> Result<KeepId, TaskError> {
        self.system.register_get::<T>(self.id)
    }

    /// Lists the new task in the broadcast list for `T`.
    pub fn register_link(&mut self) -> Result<KeepId, TaskError> {
        self.system.register_link::<T>(self.id)
    }

    /// The system the task is being created in.
    pub fn tasks(&mut self) -> &mut TaskSystem<E> {
        self.system
    }
}
