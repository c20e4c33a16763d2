//=========================================================================
// Task Keep Array
//=========================================================================
//
// Ordered collection of keeps addressed either by position or by a
// stable `KeepId`.
//
// Architecture:
//   registered: VecDeque<KeepId>     position order
//   data:       KeepId → TaskKeep    storage
//   cleared:    VecDeque<KeepId>     ids waiting for reuse (FIFO)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, VecDeque};
use std::fmt;

//=== Internal Dependencies ===============================================

use super::context::TaskBuilder;
use super::error::TaskError;
use super::keep::TaskKeep;
use super::registry::{TaskId, TaskSystem};
use super::Task;

//=== KeepId ==============================================================

/// Stable identifier of an element in a [`TaskKeepArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeepId(pub usize);

impl fmt::Display for KeepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keep#{}", self.0)
    }
}

//=== TaskKeepArray =======================================================

/// Position- and id-addressable list of [`TaskKeep`]s.
pub struct TaskKeepArray<T: Task> {
    next_id: usize,
    data: HashMap<KeepId, TaskKeep<T>>,
    registered: VecDeque<KeepId>,
    cleared: VecDeque<KeepId>,
    safety: bool,
}

impl<T: Task> TaskKeepArray<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            data: HashMap::new(),
            registered: VecDeque::new(),
            cleared: VecDeque::new(),
            safety: true,
        }
    }

    //--- Id Allocation ----------------------------------------------------

    fn allocate(&mut self) -> KeepId {
        match self.cleared.pop_front() {
            Some(id) => id,
            None => {
                let id = KeepId(self.next_id);
                self.next_id += 1;
                id
            }
        }
    }

    /// Id the next added element will receive.
    pub fn next_id(&self) -> KeepId {
        self.cleared
            .front()
            .copied()
            .unwrap_or(KeepId(self.next_id))
    }

    fn fresh_keep<E: 'static>(&self, system: &TaskSystem<E>, task: TaskId) -> Result<TaskKeep<T>, TaskError> {
        let mut keep = TaskKeep::new();
        keep.set_safety(self.safety);
        keep.set(system, task)?;
        Ok(keep)
    }

    fn adopt(&mut self, mut keep: TaskKeep<T>) -> (KeepId, TaskKeep<T>) {
        keep.set_safety(self.safety);
        (self.allocate(), keep)
    }

    //--- Keep -------------------------------------------------------------

    pub fn keep_back<E: 'static>(&mut self, system: &TaskSystem<E>, task: TaskId) -> Result<KeepId, TaskError> {
        let keep = self.fresh_keep(system, task)?;
        Ok(self.push_back(keep))
    }

    pub fn keep_front<E: 'static>(&mut self, system: &TaskSystem<E>, task: TaskId) -> Result<KeepId, TaskError> {
        let keep = self.fresh_keep(system, task)?;
        Ok(self.push_front(keep))
    }

    /// Keeps `task` at position `index` (`index == len()` appends).
    pub fn keep_insert<E: 'static>(
        &mut self,
        index: usize,
        system: &TaskSystem<E>,
        task: TaskId,
    ) -> Result<KeepId, TaskError> {
        self.check_insert(index)?;
        let keep = self.fresh_keep(system, task)?;
        self.push_at(index, keep)
    }

    pub(crate) fn push_back(&mut self, keep: TaskKeep<T>) -> KeepId {
        let (id, keep) = self.adopt(keep);
        self.data.insert(id, keep);
        self.registered.push_back(id);
        id
    }

    fn push_front(&mut self, keep: TaskKeep<T>) -> KeepId {
        let (id, keep) = self.adopt(keep);
        self.data.insert(id, keep);
        self.registered.push_front(id);
        id
    }

    fn push_at(&mut self, index: usize, keep: TaskKeep<T>) -> Result<KeepId, TaskError> {
        self.check_insert(index)?;
        let (id, keep) = self.adopt(keep);
        self.data.insert(id, keep);
        self.registered.insert(index, id);
        Ok(id)
    }

    fn check_insert(&self, index: usize) -> Result<(), TaskError> {
        if index > self.registered.len() {
            return Err(TaskError::IndexOutOfRange {
                index,
                len: self.registered.len(),
            });
        }
        Ok(())
    }

    //--- Create -----------------------------------------------------------

    pub fn create_back<E, F>(&mut self, system: &mut TaskSystem<E>, build: F) -> KeepId
    where
        E: 'static,
        F: FnOnce(&mut TaskBuilder<'_, T, E>) -> T,
    {
        self.push_back(TaskKeep::create(system, build))
    }

    pub fn create_front<E, F>(&mut self, system: &mut TaskSystem<E>, build: F) -> KeepId
    where
        E: 'static,
        F: FnOnce(&mut TaskBuilder<'_, T, E>) -> T,
    {
        self.push_front(TaskKeep::create(system, build))
    }

    pub fn create_insert<E, F>(&mut self, index: usize, system: &mut TaskSystem<E>, build: F) -> Result<KeepId, TaskError>
    where
        E: 'static,
        F: FnOnce(&mut TaskBuilder<'_, T, E>) -> T,
    {
        self.check_insert(index)?;
        self.push_at(index, TaskKeep::create(system, build))
    }

    /// Creates `count` tasks at the back, in order.
    pub fn creates_back<E, F>(&mut self, system: &mut TaskSystem<E>, count: usize, mut build: F) -> Vec<KeepId>
    where
        E: 'static,
        F: FnMut(&mut TaskBuilder<'_, T, E>) -> T,
    {
        (0..count)
            .map(|_| self.create_back(system, |builder| build(builder)))
            .collect()
    }

    /// Creates `count` tasks at the front; the last created ends up first.
    pub fn creates_front<E, F>(&mut self, system: &mut TaskSystem<E>, count: usize, mut build: F) -> Vec<KeepId>
    where
        E: 'static,
        F: FnMut(&mut TaskBuilder<'_, T, E>) -> T,
    {
        (0..count)
            .map(|_| self.create_front(system, |builder| build(builder)))
            .collect()
    }

    //--- Clear (release and destroy) ------------------------------------

    fn take_id(&mut self, id: KeepId) -> Option<TaskKeep<T>> {
        let keep = self.data.remove(&id)?;
        self.registered.retain(|&registered| registered != id);
        self.cleared.push_back(id);
        Some(keep)
    }

    fn take_at(&mut self, index: usize) -> Option<TaskKeep<T>> {
        let id = *self.registered.get(index)?;
        self.take_id(id)
    }

    pub fn clear_id(&mut self, id: KeepId) -> bool {
        self.take_id(id).map(|mut keep| keep.clear()).is_some()
    }

    pub fn clear(&mut self, index: usize) -> bool {
        self.take_at(index).map(|mut keep| keep.clear()).is_some()
    }

    pub fn clear_back(&mut self) -> bool {
        match self.registered.len() {
            0 => false,
            len => self.clear(len - 1),
        }
    }

    pub fn clear_front(&mut self) -> bool {
        self.clear(0)
    }

    /// Clears every element and restarts id allocation from zero.
    pub fn clear_all(&mut self) {
        for (_, mut keep) in self.data.drain() {
            keep.clear();
        }
        self.registered.clear();
        self.cleared.clear();
        self.next_id = 0;
    }

    //--- Free (release only) ----------------------------------------------

    pub fn free_id(&mut self, id: KeepId) -> bool {
        self.take_id(id).map(|mut keep| keep.free()).is_some()
    }

    pub fn free(&mut self, index: usize) -> bool {
        self.take_at(index).map(|mut keep| keep.free()).is_some()
    }

    pub fn free_back(&mut self) -> bool {
        match self.registered.len() {
            0 => false,
            len => self.free(len - 1),
        }
    }

    pub fn free_front(&mut self) -> bool {
        self.free(0)
    }

    pub fn free_all(&mut self) {
        for (_, mut keep) in self.data.drain() {
            keep.free();
        }
        self.registered.clear();
        self.cleared.clear();
        self.next_id = 0;
    }

    /// Frees every element that refers to `task`.
    pub(crate) fn forget(&mut self, task: TaskId) -> usize {
        let stale: Vec<KeepId> = self
            .data
            .iter()
            .filter(|(_, keep)| keep.id() == Some(task))
            .map(|(&id, _)| id)
            .collect();

        for &id in &stale {
            self.free_id(id);
        }
        stale.len()
    }

    //--- Safety -----------------------------------------------------------

    /// Sets safety on every element and on elements added later.
    pub fn set_safety(&mut self, safety: bool) {
        self.safety = safety;
        for keep in self.data.values_mut() {
            keep.set_safety(safety);
        }
    }

    pub fn set_safety_id(&mut self, id: KeepId, safety: bool) -> bool {
        match self.data.get_mut(&id) {
            Some(keep) => {
                keep.set_safety(safety);
                true
            }
            None => false,
        }
    }

    pub fn safety(&self) -> bool {
        self.safety
    }

    //--- Lookup -----------------------------------------------------------

    pub fn to_array_number(&self, id: KeepId) -> Option<usize> {
        self.registered.iter().position(|&registered| registered == id)
    }

    pub fn to_id(&self, index: usize) -> Option<KeepId> {
        self.registered.get(index).copied()
    }

    pub fn is_id(&self, id: KeepId) -> bool {
        self.data.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn back_id(&self) -> Option<KeepId> {
        self.registered.back().copied()
    }

    pub fn front_id(&self) -> Option<KeepId> {
        self.registered.front().copied()
    }

    /// Task at position `index`.
    pub fn task(&self, index: usize) -> Option<TaskId> {
        self.task_id(self.to_id(index)?)
    }

    /// Task stored under `id`.
    pub fn task_id(&self, id: KeepId) -> Option<TaskId> {
        self.data.get(&id)?.id()
    }

    /// `(KeepId, TaskId)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (KeepId, TaskId)> + '_ {
        self.registered
            .iter()
            .filter_map(move |&id| Some((id, self.data.get(&id)?.id()?)))
    }

    pub fn get<'s, E: 'static>(&self, index: usize, system: &'s TaskSystem<E>) -> Option<&'s T> {
        system.get::<T>(self.task(index)?)
    }

    pub fn get_mut<'s, E: 'static>(&self, index: usize, system: &'s mut TaskSystem<E>) -> Option<&'s mut T> {
        system.get_mut::<T>(self.task(index)?)
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T: Task> Default for TaskKeepArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Task> Clone for TaskKeepArray<T> {
    fn clone(&self) -> Self {
        Self {
            next_id: self.next_id,
            data: self.data.iter().map(|(&id, keep)| (id, keep.clone())).collect(),
            registered: self.registered.clone(),
            cleared: self.cleared.clone(),
            safety: self.safety,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Bullet(u32);
    impl Task for Bullet {}

    fn spawn(tasks: &mut TaskSystem, n: u32) -> TaskId {
        tasks.create(|_| Bullet(n))
    }

    #[test]
    fn ids_are_recycled_fifo() {
        let mut tasks = TaskSystem::<()>::new();
        let mut array = TaskKeepArray::<Bullet>::new();

        let a = array.create_back(&mut tasks, |_| Bullet(0));
        let b = array.create_back(&mut tasks, |_| Bullet(1));
        let _c = array.create_back(&mut tasks, |_| Bullet(2));
        assert_eq!((a, b), (KeepId(0), KeepId(1)));

        array.clear_id(b);
        array.clear_id(a);
        assert_eq!(array.next_id(), KeepId(1));

        assert_eq!(array.create_back(&mut tasks, |_| Bullet(3)), KeepId(1));
        assert_eq!(array.create_back(&mut tasks, |_| Bullet(4)), KeepId(0));
        assert_eq!(array.create_back(&mut tasks, |_| Bullet(5)), KeepId(3));
    }

    #[test]
    fn positions_follow_front_back_insert() {
        let mut tasks = TaskSystem::<()>::new();
        let mut array = TaskKeepArray::<Bullet>::new();
        let (x, y, z) = (spawn(&mut tasks, 1), spawn(&mut tasks, 2), spawn(&mut tasks, 3));

        let mid = array.keep_back(&tasks, x).unwrap();
        let front = array.keep_front(&tasks, y).unwrap();
        let inserted = array.keep_insert(1, &tasks, z).unwrap();

        assert_eq!(array.front_id(), Some(front));
        assert_eq!(array.back_id(), Some(mid));
        assert_eq!(array.to_array_number(inserted), Some(1));
        assert_eq!(array.get(1, &tasks).map(|b| b.0), Some(3));
        assert_eq!(array.iter().map(|(_, t)| t).collect::<Vec<_>>(), vec![y, z, x]);
    }

    #[test]
    fn insert_past_end_is_rejected() {
        let mut tasks = TaskSystem::<()>::new();
        let mut array = TaskKeepArray::<Bullet>::new();

        let result = array.create_insert(1, &mut tasks, |_| Bullet(0));

        assert_eq!(result, Err(TaskError::IndexOutOfRange { index: 1, len: 0 }));
        assert!(tasks.is_empty(), "no task created on a bad index");
    }

    #[test]
    fn clear_destroys_and_free_does_not() {
        let mut tasks = TaskSystem::<()>::new();
        let mut array = TaskKeepArray::<Bullet>::new();
        let ids = array.creates_back(&mut tasks, 2, |_| Bullet(7));
        let cleared = array.task_id(ids[0]).unwrap();
        let freed = array.task_id(ids[1]).unwrap();

        assert!(array.clear_front());
        assert!(array.free_back());
        assert!(!array.clear_back());
        tasks.update();

        assert!(!tasks.contains(cleared));
        assert!(tasks.contains(freed));
        assert!(array.is_empty());
    }

    #[test]
    fn clear_all_resets_ids_and_releases_keeps() {
        let mut tasks = TaskSystem::<()>::new();
        let mut array = TaskKeepArray::<Bullet>::new();
        array.creates_front(&mut tasks, 3, |_| Bullet(0));

        array.clear_all();
        tasks.update();

        assert!(tasks.is_empty());
        assert_eq!(array.next_id(), KeepId(0));
    }

    #[test]
    fn clone_keeps_again() {
        let mut tasks = TaskSystem::<()>::new();
        let mut array = TaskKeepArray::<Bullet>::new();
        let id = array.create_back(&mut tasks, |_| Bullet(0));
        let task = array.task_id(id).unwrap();

        let copy = array.clone();
        assert_eq!(tasks.link(task), Some(2));

        array.clear_all();
        tasks.update();
        assert!(tasks.contains(task));
        drop(copy);
    }

    #[test]
    fn safety_off_array_does_not_count() {
        let mut tasks = TaskSystem::<()>::new();
        let mut array = TaskKeepArray::<Bullet>::new();
        let id = array.create_back(&mut tasks, |_| Bullet(0));
        let task = array.task_id(id).unwrap();

        array.set_safety(false);
        assert_eq!(tasks.link(task), Some(0));
        assert!(array.set_safety_id(id, true));
        assert_eq!(tasks.link(task), Some(1));
    }

    #[test]
    fn dropping_safety_off_array_spares_tasks() {
        let mut tasks = TaskSystem::<()>::new();
        let mut array = TaskKeepArray::<Bullet>::new();
        array.create_back(&mut tasks, |_| Bullet(1));
        array.create_back(&mut tasks, |_| Bullet(2));
        let listed: Vec<TaskId> = array.iter().map(|(_, task)| task).collect();

        array.set_safety(false);
        drop(array);
        tasks.update();

        assert!(listed.iter().all(|&task| tasks.contains(task)));
    }
}
