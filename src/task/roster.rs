//=========================================================================
// Task Rosters
//=========================================================================
//
// Type-keyed lists of tasks for lookup by other tasks.
//
//   gets   indexed access: "the 2nd registered Enemy"
//   links  broadcast: "call this on every registered Enemy"
//
// Entries do not keep their task alive and are dropped automatically
// when the task is removed from the registry.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::error::TaskError;
use super::keep::TaskKeep;
use super::keep_array::{KeepId, TaskKeepArray};
use super::registry::{TaskId, TaskSystem};
use super::Task;

//=== Roster ==============================================================

pub(super) trait RosterList: Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn forget(&mut self, task: TaskId) -> usize;
}

impl<T: Task> RosterList for TaskKeepArray<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn forget(&mut self, task: TaskId) -> usize {
        TaskKeepArray::forget(self, task)
    }
}

#[derive(Default)]
pub(super) struct Roster {
    lists: HashMap<TypeId, Box<dyn RosterList>>,
}

impl Roster {
    fn enroll<T: Task>(&mut self, task: TaskId, keep: TaskKeep<T>) -> Result<KeepId, TaskError> {
        let list = self.lists.entry(TypeId::of::<T>()).or_insert_with(|| {
            let mut list = TaskKeepArray::<T>::new();
            list.set_safety(false);
            Box::new(list)
        });

        match list.as_any_mut().downcast_mut::<TaskKeepArray<T>>() {
            Some(list) => Ok(list.push_back(keep)),
            None => {
                warn!("Roster list for {} has the wrong type, {} not listed", type_name::<T>(), task);
                Err(TaskError::TypeMismatch {
                    id: task,
                    expected: type_name::<T>(),
                })
            }
        }
    }

    fn list<T: Task>(&self) -> Option<&TaskKeepArray<T>> {
        self.lists
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<TaskKeepArray<T>>()
    }

    pub(super) fn forget(&mut self, task: TaskId) {
        for list in self.lists.values_mut() {
            let removed = list.forget(task);
            if removed > 0 {
                trace!("Roster dropped {} entr(ies) for {}", removed, task);
            }
        }
    }
}

//=== TaskSystem: Get API =================================================

impl<E: 'static> TaskSystem<E> {
    //--- Registration -----------------------------------------------------

    /// Lists `task` in the indexed lookup for `T`.
    pub fn register_get<T: Task>(&mut self, task: TaskId) -> Result<KeepId, TaskError> {
        let keep = TaskKeep::<T>::watch(self, task)?;
        self.gets.enroll(task, keep)
    }

    fn get_list<T: Task>(&self) -> Option<&TaskKeepArray<T>> {
        self.gets.list::<T>()
    }

    //--- Queries ----------------------------------------------------------

    /// The `n`th registered `T`.
    pub fn get_task<T: Task>(&self, n: usize) -> Option<&T> {
        let id = self.get_list::<T>()?.task(n)?;
        self.get(id)
    }

    pub fn get_task_mut<T: Task>(&mut self, n: usize) -> Option<&mut T> {
        let id = self.get_list::<T>()?.task(n)?;
        self.get_mut(id)
    }

    pub fn get_task_by_id<T: Task>(&self, id: KeepId) -> Option<&T> {
        let id = self.get_list::<T>()?.task_id(id)?;
        self.get(id)
    }

    pub fn get_front<T: Task>(&self) -> Option<&T> {
        self.get_task::<T>(0)
    }

    pub fn get_back<T: Task>(&self) -> Option<&T> {
        self.get_task::<T>(self.get_len::<T>().checked_sub(1)?)
    }

    pub fn get_len<T: Task>(&self) -> usize {
        self.get_list::<T>().map(TaskKeepArray::len).unwrap_or(0)
    }

    pub fn get_is_empty<T: Task>(&self) -> bool {
        self.get_len::<T>() == 0
    }

    pub fn get_is_id<T: Task>(&self, id: KeepId) -> bool {
        self.get_list::<T>().map(|list| list.is_id(id)).unwrap_or(false)
    }

    pub fn get_to_array_number<T: Task>(&self, id: KeepId) -> Option<usize> {
        self.get_list::<T>()?.to_array_number(id)
    }

    pub fn get_to_id<T: Task>(&self, n: usize) -> Option<KeepId> {
        self.get_list::<T>()?.to_id(n)
    }

    pub fn get_front_id<T: Task>(&self) -> Option<KeepId> {
        self.get_list::<T>()?.front_id()
    }

    pub fn get_back_id<T: Task>(&self) -> Option<KeepId> {
        self.get_list::<T>()?.back_id()
    }

    /// Task id of the `n`th registered `T`.
    pub fn get_task_id<T: Task>(&self, n: usize) -> Option<TaskId> {
        self.get_list::<T>()?.task(n)
    }

    //--- Destruction ------------------------------------------------------

    /// Destroys the `n`th registered `T` unless it is kept.
    ///
    /// Returns whether the task was flagged. The entry stays listed until
    /// the task is removed by the next update.
    pub fn get_clear<T: Task>(&mut self, n: usize) -> bool {
        match self.get_task_id::<T>(n) {
            Some(task) => self.clear_unkept(task),
            None => false,
        }
    }

    pub fn get_clear_id<T: Task>(&mut self, id: KeepId) -> bool {
        match self.get_list::<T>().and_then(|list| list.task_id(id)) {
            Some(task) => self.clear_unkept(task),
            None => false,
        }
    }

    pub fn get_clear_front<T: Task>(&mut self) -> bool {
        self.get_clear::<T>(0)
    }

    pub fn get_clear_back<T: Task>(&mut self) -> bool {
        match self.get_len::<T>().checked_sub(1) {
            Some(last) => self.get_clear::<T>(last),
            None => false,
        }
    }

    /// Destroys every registered `T` that is not kept. Returns how many.
    pub fn get_clear_all<T: Task>(&mut self) -> usize {
        let tasks: Vec<TaskId> = match self.get_list::<T>() {
            Some(list) => list.iter().map(|(_, task)| task).collect(),
            None => return 0,
        };

        tasks
            .into_iter()
            .filter(|&task| self.clear_unkept(task))
            .count()
    }

    fn clear_unkept(&mut self, task: TaskId) -> bool {
        if self.link(task).unwrap_or(0) > 0 {
            return false;
        }
        self.destroy(task);
        self.is_destroy(task)
    }

    //--- Link API ---------------------------------------------------------

    /// Lists `task` in the broadcast list for `T`.
    pub fn register_link<T: Task>(&mut self, task: TaskId) -> Result<KeepId, TaskError> {
        let keep = TaskKeep::<T>::watch(self, task)?;
        self.links.enroll(task, keep)
    }

    /// Number of `T`s in the broadcast list.
    pub fn link_len<T: Task>(&self) -> usize {
        self.links.list::<T>().map(TaskKeepArray::len).unwrap_or(0)
    }

    /// Calls `f` on every `T` in the broadcast list, in registration order.
    ///
    /// Returns how many tasks were visited. A task whose callback is
    /// currently running is skipped.
    pub fn link_call<T: Task>(&mut self, mut f: impl FnMut(TaskId, &mut T)) -> usize {
        let targets: Vec<TaskId> = match self.links.list::<T>() {
            Some(list) => list.iter().map(|(_, task)| task).collect(),
            None => return 0,
        };

        let mut visited = 0;
        for id in targets {
            if let Some(task) = self.get_mut::<T>(id) {
                f(id, task);
                visited += 1;
            }
        }
        visited
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
