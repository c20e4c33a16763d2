//=========================================================================
// Task Registry
//=========================================================================
//
// Owns every live task and keeps them in creation order.
//
// Architecture:
//   slots: Vec<Slot>        generational storage, recycled via `free`
//   head ⇄ ... ⇄ tail       index-linked list in creation order
//
// Lifecycle:
//   reserve() → builder binds calls → install() → [dispatch] → update()
//
// A task is "checked out" of its slot while one of its callbacks runs.
// Lookups of a checked-out task return `None`; it is put back as soon
// as the callback returns.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::call::{CallId, CallList, Invoke};
use super::context::{TaskBuilder, TaskContext};
use super::keep::Lifeline;
use super::roster::Roster;
use super::Task;

//=== TaskId ==============================================================

/// Generational handle to a task.
///
/// Ids are never reused with the same generation, so a handle to a
/// removed task can not be confused with whatever occupies the slot next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    index: u32,
    generation: u32,
}

impl TaskId {
    fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index as u32,
            generation,
        }
    }

    fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}v{}", self.index, self.generation)
    }
}

//=== DestroyMode =========================================================

/// How a task leaves the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DestroyMode {
    /// Lives until [`TaskSystem::destroy`] is called.
    #[default]
    None,

    /// Removed by the next [`TaskSystem::update`].
    Destroy,

    /// Removed once the task has seen this many updates.
    Count(u64),

    /// Removed once the task is at least this old.
    Time(Duration),
}

//=== Storage =============================================================

struct TaskEntry {
    task: Option<Box<dyn Task>>,
    name: &'static str,
    mode: DestroyMode,
    count: u64,
    born: Instant,
    lifeline: Arc<Lifeline>,
    calls: Vec<CallId>,
    linked: bool,
    prev: Option<usize>,
    next: Option<usize>,
}

impl TaskEntry {
    fn expired(&self, now: Instant) -> bool {
        if self.lifeline.is_doomed() {
            return true;
        }

        match self.mode {
            DestroyMode::None => false,
            DestroyMode::Destroy => true,
            DestroyMode::Count(target) => target <= self.count,
            DestroyMode::Time(target) => target <= now.saturating_duration_since(self.born),
        }
    }
}

struct Slot {
    generation: u32,
    entry: Option<TaskEntry>,
}

//=== TaskSystem ==========================================================

/// Registry, dispatcher, and lookup service for tasks.
///
/// `E` is the environment handed to callbacks by [`call_all`](Self::call_all).
pub struct TaskSystem<E: 'static = ()> {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    dispatching: bool,
    pub(super) calls: CallList<E>,
    pub(super) gets: Roster,
    pub(super) links: Roster,
}

impl<E: 'static> TaskSystem<E> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty task system.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            dispatching: false,
            calls: CallList::new(),
            gets: Roster::default(),
            links: Roster::default(),
        }
    }

    //--- Creation ---------------------------------------------------------

    /// Creates a task that lives until destroyed.
    ///
    /// The builder receives the new task's id before the task exists, so it
    /// can bind callbacks and register lookups for it. The finished task is
    /// appended at the end of the registry.
    pub fn create<T, F>(&mut self, build: F) -> TaskId
    where
        T: Task,
        F: FnOnce(&mut TaskBuilder<'_, T, E>) -> T,
    {
        self.create_with_mode(DestroyMode::None, build)
    }

    /// Creates a task with an initial [`DestroyMode`].
    pub fn create_with_mode<T, F>(&mut self, mode: DestroyMode, build: F) -> TaskId
    where
        T: Task,
        F: FnOnce(&mut TaskBuilder<'_, T, E>) -> T,
    {
        let id = self.reserve(type_name::<T>(), mode);

        let task = {
            let mut builder = TaskBuilder::new(self, id);
            build(&mut builder)
        };

        self.install(id, Box::new(task));
        debug!("Created {} as {} ({:?})", type_name::<T>(), id, mode);
        id
    }

    fn reserve(&mut self, name: &'static str, mode: DestroyMode) -> TaskId {
        let entry = TaskEntry {
            task: None,
            name,
            mode,
            count: 0,
            born: Instant::now(),
            lifeline: Arc::new(Lifeline::default()),
            calls: Vec::new(),
            linked: false,
            prev: None,
            next: None,
        };

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.entry = Some(entry);
                TaskId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                TaskId::new(self.slots.len() - 1, 0)
            }
        }
    }

    fn install(&mut self, id: TaskId, task: Box<dyn Task>) {
        let tail = self.tail;

        let Some(entry) = self.entry_mut(id) else {
            warn!("Reserved slot for {} vanished during construction", id);
            return;
        };
        entry.task = Some(task);
        entry.linked = true;
        entry.prev = tail;
        entry.next = None;

        match tail {
            Some(last) => {
                if let Some(entry) = self.slots[last].entry.as_mut() {
                    entry.next = Some(id.index());
                }
            }
            None => self.head = Some(id.index()),
        }

        self.tail = Some(id.index());
        self.len += 1;
    }

    //--- Destruction ------------------------------------------------------

    /// Flags a task for removal at the next [`update`](Self::update).
    ///
    /// Ignored while the task is kept by a [`TaskKeep`](super::TaskKeep).
    pub fn destroy(&mut self, id: TaskId) {
        let Some(entry) = self.entry_mut(id) else {
            debug!("Destroy ignored, {} no longer exists", id);
            return;
        };

        if entry.lifeline.links() > 0 {
            debug!("Destroy ignored, {} is kept", id);
            return;
        }

        entry.mode = DestroyMode::Destroy;
    }

    /// Replaces the destroy mode of a task.
    ///
    /// Counts and times are measured from the task's creation, not from
    /// this call.
    pub fn set_auto_destroy(&mut self, id: TaskId, mode: DestroyMode) {
        match self.entry_mut(id) {
            Some(entry) => entry.mode = mode,
            None => debug!("Auto destroy ignored, {} no longer exists", id),
        }
    }

    /// Returns `true` if the task will be removed by the next update.
    pub fn is_destroy(&self, id: TaskId) -> bool {
        self.entry(id)
            .map(|entry| entry.mode == DestroyMode::Destroy || entry.lifeline.is_doomed())
            .unwrap_or(false)
    }

    //--- Queries ----------------------------------------------------------

    /// Number of updates the task has seen.
    pub fn count(&self, id: TaskId) -> Option<u64> {
        self.entry(id).map(|entry| entry.count)
    }

    /// Time elapsed since the task was created.
    pub fn age(&self, id: TaskId) -> Option<Duration> {
        self.entry(id).map(|entry| entry.born.elapsed())
    }

    /// Number of safety-enabled keeps holding the task.
    pub fn link(&self, id: TaskId) -> Option<usize> {
        self.entry(id).map(|entry| entry.lifeline.links())
    }

    /// Current destroy mode of the task.
    pub fn destroy_mode(&self, id: TaskId) -> Option<DestroyMode> {
        self.entry(id).map(|entry| entry.mode)
    }

    /// Type name the task was created with.
    pub fn name(&self, id: TaskId) -> Option<&'static str> {
        self.entry(id).map(|entry| entry.name)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.entry(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates task ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        std::iter::successors(self.head, move |&index| {
            self.slots[index].entry.as_ref().and_then(|entry| entry.next)
        })
        .map(move |index| TaskId::new(index, self.slots[index].generation))
    }

    /// Typed access to a task.
    ///
    /// Returns `None` for stale ids, a different task type, or a task whose
    /// callback is currently running.
    pub fn get<T: Task>(&self, id: TaskId) -> Option<&T> {
        self.entry(id)?
            .task
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut<T: Task>(&mut self, id: TaskId) -> Option<&mut T> {
        self.entry_mut(id)?
            .task
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    //--- Frame Processing -------------------------------------------------

    /// Advances every task by one update and removes expired tasks.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// [`update`](Self::update) with an explicit clock reading.
    pub fn update_at(&mut self, now: Instant) {
        if self.dispatching {
            warn!("Task update requested from inside a callback, ignored");
            return;
        }

        let mut cursor = self.head;
        let mut removed = 0usize;

        while let Some(index) = cursor {
            let Some(entry) = self.slots[index].entry.as_mut() else {
                warn!("Task list corrupted at slot {}, update stopped", index);
                break;
            };

            entry.count += 1;
            cursor = entry.next;

            if entry.expired(now) {
                self.remove_at(index);
                removed += 1;
            }
        }

        if removed > 0 {
            trace!("Task update removed {} task(s), {} remain", removed, self.len);
        }
    }

    /// Removes every task that is not kept. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        if self.dispatching {
            warn!("Task clear requested from inside a callback, ignored");
            return 0;
        }

        let mut cursor = self.head;
        let mut removed = 0usize;

        while let Some(index) = cursor {
            let Some(entry) = self.slots[index].entry.as_ref() else {
                break;
            };

            cursor = entry.next;

            if entry.lifeline.links() == 0 {
                self.remove_at(index);
                removed += 1;
            }
        }

        debug!("Cleared {} task(s), {} kept", removed, self.len);
        removed
    }

    //--- Dispatch ---------------------------------------------------------

    /// Invokes every active binding of `group` in priority order.
    ///
    /// The next binding is looked up after each callback returns, so
    /// bindings created or moved by a callback are honoured in the same
    /// pass when they land after the current position.
    pub fn call_all(&mut self, group: u8, env: &mut E) {
        if self.dispatching {
            warn!("Nested call_all({}) ignored", group);
            return;
        }

        self.dispatching = true;
        let mut cursor = self.calls.head(group);

        while let Some(call) = cursor {
            let fallback = self.calls.next(call);

            if let Some((task, invoke)) = self.calls.runnable(call) {
                self.invoke(task, invoke.as_ref(), env);
            }

            cursor = if self.calls.is_in_group(call, group) {
                self.calls.next(call)
            } else {
                fallback.filter(|&next| self.calls.is_in_group(next, group))
            };
        }

        self.dispatching = false;
    }

    fn invoke(&mut self, id: TaskId, invoke: &dyn Invoke<E>, env: &mut E) {
        let Some(mut task) = self.entry_mut(id).and_then(|entry| entry.task.take()) else {
            trace!("{} unavailable, call skipped", id);
            return;
        };

        {
            let mut context = TaskContext::new(self, env, id);
            invoke.invoke(task.as_mut(), &mut context);
        }

        match self.entry_mut(id) {
            Some(entry) => entry.task = Some(task),
            None => debug!("{} vanished while running, dropped", id),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn entry(&self, id: TaskId) -> Option<&TaskEntry> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: TaskId) -> Option<&mut TaskEntry> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// `true` when `id` exists and is (or will be, while under
    /// construction or checked out) a `T`.
    pub(crate) fn holds<T: Task>(&self, id: TaskId) -> bool {
        match self.entry(id) {
            Some(entry) => match entry.task.as_deref() {
                Some(task) => task.as_any().is::<T>(),
                None => entry.name == type_name::<T>(),
            },
            None => false,
        }
    }

    pub(crate) fn lifeline(&self, id: TaskId) -> Option<Arc<Lifeline>> {
        self.entry(id).map(|entry| Arc::clone(&entry.lifeline))
    }

    /// `true` if the task already has a way out (flagged, counted, timed).
    pub(crate) fn is_scheduled(&self, id: TaskId) -> bool {
        self.entry(id)
            .map(|entry| entry.mode != DestroyMode::None || entry.lifeline.is_doomed())
            .unwrap_or(false)
    }

    pub(super) fn attach_call(&mut self, id: TaskId, call: CallId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.calls.push(call);
        }
    }

    pub(super) fn detach_call(&mut self, id: TaskId, call: CallId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.calls.retain(|&owned| owned != call);
        }
    }

    fn remove_at(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        let Some(entry) = slot.entry.take() else {
            return;
        };

        let id = TaskId::new(index, slot.generation);
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);

        if entry.linked {
            match entry.prev {
                Some(prev) => {
                    if let Some(prev) = self.slots[prev].entry.as_mut() {
                        prev.next = entry.next;
                    }
                }
                None => self.head = entry.next,
            }

            match entry.next {
                Some(next) => {
                    if let Some(next) = self.slots[next].entry.as_mut() {
                        next.prev = entry.prev;
                    }
                }
                None => self.tail = entry.prev,
            }

            self.len -= 1;
        }

        for &call in &entry.calls {
            self.calls.remove(call);
        }
        self.gets.forget(id);
        self.links.forget(id);

        debug!("Removed {} ({}) after {} update(s)", id, entry.name, entry.count);
    }
}

impl<E: 'static> Default for TaskSystem<E> {
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
    use crate::task::TaskKeep;

    struct Dummy(u32);
    impl Task for Dummy {}

    struct Other;
    impl Task for Other {}

    fn spawn(tasks: &mut TaskSystem, value: u32) -> TaskId {
        tasks.create(|_| Dummy(value))
    }

    //--- Registration -----------------------------------------------------

    #[test]
    fn create_appends_in_order() {
        let mut tasks = TaskSystem::<()>::new();
        let a = spawn(&mut tasks, 1);
        let b = spawn(&mut tasks, 2);
        let c = spawn(&mut tasks, 3);

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks.ids().collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(tasks.get::<Dummy>(b).map(|d| d.0), Some(2));
    }

    #[test]
    fn get_with_wrong_type_is_none() {
        let mut tasks = TaskSystem::<()>::new();
        let a = spawn(&mut tasks, 1);

        assert!(tasks.get::<Other>(a).is_none());
        assert!(tasks.holds::<Dummy>(a));
        assert!(!tasks.holds::<Other>(a));
    }

    //--- Destruction ------------------------------------------------------

    #[test]
    fn destroy_removes_on_next_update() {
        let mut tasks = TaskSystem::<()>::new();
        let a = spawn(&mut tasks, 1);
        let b = spawn(&mut tasks, 2);

        tasks.destroy(a);
        assert!(tasks.is_destroy(a));
        assert!(tasks.contains(a), "destroy is deferred");

        tasks.update();

        assert!(!tasks.contains(a));
        assert_eq!(tasks.ids().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn stale_id_does_not_alias_reused_slot() {
        let mut tasks = TaskSystem::<()>::new();
        let a = spawn(&mut tasks, 1);
        tasks.destroy(a);
        tasks.update();

        let b = spawn(&mut tasks, 2);

        assert_eq!(a.index, b.index, "slot is recycled");
        assert!(tasks.get::<Dummy>(a).is_none());
        assert_eq!(tasks.get::<Dummy>(b).map(|d| d.0), Some(2));
    }

    #[test]
    fn count_mode_expires_after_n_updates() {
        let mut tasks = TaskSystem::<()>::new();
        let a = tasks.create_with_mode(DestroyMode::Count(3), |_| Dummy(0));

        tasks.update();
        tasks.update();
        assert!(tasks.contains(a));
        assert_eq!(tasks.count(a), Some(2));

        tasks.update();
        assert!(!tasks.contains(a));
    }

    #[test]
    fn time_mode_expires_after_duration() {
        let mut tasks = TaskSystem::<()>::new();
        let a = tasks.create_with_mode(DestroyMode::Time(Duration::from_secs(2)), |_| Dummy(0));

        let now = Instant::now();
        tasks.update_at(now);
        assert!(tasks.contains(a));

        tasks.update_at(now + Duration::from_secs(3));
        assert!(!tasks.contains(a));
    }

    #[test]
    fn set_auto_destroy_counts_from_creation() {
        let mut tasks = TaskSystem::<()>::new();
        let a = spawn(&mut tasks, 0);

        tasks.update();
        tasks.update();
        tasks.set_auto_destroy(a, DestroyMode::Count(3));
        tasks.update();

        assert!(!tasks.contains(a));
    }

    #[test]
    fn kept_task_ignores_destroy_and_survives_clear() {
        let mut tasks = TaskSystem::<()>::new();
        let kept = spawn(&mut tasks, 1);
        let loose = spawn(&mut tasks, 2);

        let keep = TaskKeep::<Dummy>::keep(&tasks, kept).unwrap();
        tasks.destroy(kept);
        assert!(!tasks.is_destroy(kept));

        assert_eq!(tasks.clear(), 1);
        assert!(tasks.contains(kept));
        assert!(!tasks.contains(loose));

        drop(keep);
        tasks.update();
        assert!(!tasks.contains(kept), "dropping the last keep destroys the task");
    }

    #[test]
    fn removing_middle_task_relinks_neighbours() {
        let mut tasks = TaskSystem::<()>::new();
        let a = spawn(&mut tasks, 1);
        let b = spawn(&mut tasks, 2);
        let c = spawn(&mut tasks, 3);

        tasks.destroy(b);
        tasks.update();
        let d = spawn(&mut tasks, 4);

        assert_eq!(tasks.ids().collect::<Vec<_>>(), vec![a, c, d]);

        tasks.destroy(a);
        tasks.destroy(d);
        tasks.update();
        assert_eq!(tasks.ids().collect::<Vec<_>>(), vec![c]);
    }
}
