//=========================================================================
// Task Calls
//=========================================================================
//
// Per-group, priority-ordered lists of callbacks bound to tasks.
//
// Architecture:
//   CallList<E>
//     ├─ slots   generational storage for bindings
//     └─ heads   group → first binding of that group
//
//   group 0:  [p0 a] ⇄ [p0 b] ⇄ [p3 c]
//   group 1:  [p0 d]
//
// Lower priorities run first. On equal priority a binding inserted with
// `push_back` goes after the existing ones, otherwise in front of them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::context::TaskContext;
use super::error::TaskError;
use super::registry::{TaskId, TaskSystem};
use super::{Task, UPDATE};

//=== Callback Types ======================================================

/// Callback signature for a task of type `T`.
pub type CallFn<T, E> = fn(&mut T, &mut TaskContext<'_, E>);

/// Type-erased callback.
pub(super) trait Invoke<E: 'static>: Send + Sync {
    fn invoke(&self, task: &mut dyn Task, context: &mut TaskContext<'_, E>);
}

struct Bound<T: Task, E: 'static> {
    f: CallFn<T, E>,
}

impl<T: Task, E: 'static> Invoke<E> for Bound<T, E> {
    fn invoke(&self, task: &mut dyn Task, context: &mut TaskContext<'_, E>) {
        match task.as_any_mut().downcast_mut::<T>() {
            Some(task) => (self.f)(task, context),
            None => warn!(
                "Call for {} reached a {}, skipped",
                type_name::<T>(),
                task.name()
            ),
        }
    }
}

pub(super) fn erase<T: Task, E: 'static>(f: CallFn<T, E>) -> Arc<dyn Invoke<E>> {
    Arc::new(Bound { f })
}

//=== CallId ==============================================================

/// Generational handle to a call binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId {
    index: u32,
    generation: u32,
}

impl CallId {
    fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call#{}v{}", self.index, self.generation)
    }
}

//=== CallList ============================================================

struct Binding<E: 'static> {
    task: TaskId,
    group: u8,
    priority: usize,
    tag: String,
    invoke: Option<Arc<dyn Invoke<E>>>,
    active: bool,
    prev: Option<usize>,
    next: Option<usize>,
}

struct CallSlot<E: 'static> {
    generation: u32,
    binding: Option<Binding<E>>,
}

pub(super) struct CallList<E: 'static> {
    slots: Vec<CallSlot<E>>,
    free: Vec<usize>,
    heads: HashMap<u8, usize>,
}

impl<E: 'static> CallList<E> {
    pub(super) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            heads: HashMap::new(),
        }
    }

    fn id_of(&self, index: usize) -> CallId {
        CallId {
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    fn binding(&self, call: CallId) -> Option<&Binding<E>> {
        let slot = self.slots.get(call.index())?;
        if slot.generation != call.generation {
            return None;
        }
        slot.binding.as_ref()
    }

    fn binding_mut(&mut self, call: CallId) -> Option<&mut Binding<E>> {
        let slot = self.slots.get_mut(call.index())?;
        if slot.generation != call.generation {
            return None;
        }
        slot.binding.as_mut()
    }

    fn node(&self, index: usize) -> Option<&Binding<E>> {
        self.slots.get(index)?.binding.as_ref()
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Binding<E>> {
        self.slots.get_mut(index)?.binding.as_mut()
    }

    //--- Allocation -------------------------------------------------------

    fn insert(
        &mut self,
        task: TaskId,
        invoke: Option<Arc<dyn Invoke<E>>>,
        group: u8,
        priority: usize,
        push_back: bool,
    ) -> CallId {
        let binding = Binding {
            task,
            group,
            priority,
            tag: String::new(),
            invoke,
            active: true,
            prev: None,
            next: None,
        };

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].binding = Some(binding);
                index
            }
            None => {
                self.slots.push(CallSlot {
                    generation: 0,
                    binding: Some(binding),
                });
                self.slots.len() - 1
            }
        };

        self.link(index, push_back);
        self.id_of(index)
    }

    /// Unlinks and frees a binding, returning the task it belonged to.
    pub(super) fn remove(&mut self, call: CallId) -> Option<TaskId> {
        self.binding(call)?;
        self.unlink(call.index());

        let slot = &mut self.slots[call.index()];
        let binding = slot.binding.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(call.index());

        Some(binding.task)
    }

    //--- Linking ----------------------------------------------------------

    fn link(&mut self, index: usize, push_back: bool) {
        let Some((group, priority)) = self.node(index).map(|b| (b.group, b.priority)) else {
            return;
        };

        let mut prev = None;
        let mut cursor = self.heads.get(&group).copied();

        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                break;
            };

            let goes_before = if push_back {
                priority < node.priority
            } else {
                priority <= node.priority
            };
            if goes_before {
                break;
            }

            prev = Some(current);
            cursor = node.next;
        }

        if let Some(node) = self.node_mut(index) {
            node.prev = prev;
            node.next = cursor;
        }

        match prev {
            Some(prev) => {
                if let Some(node) = self.node_mut(prev) {
                    node.next = Some(index);
                }
            }
            None => {
                self.heads.insert(group, index);
            }
        }

        if let Some(next) = cursor {
            if let Some(node) = self.node_mut(next) {
                node.prev = Some(index);
            }
        }
    }

    fn unlink(&mut self, index: usize) {
        let Some((group, prev, next)) = self.node(index).map(|b| (b.group, b.prev, b.next)) else {
            return;
        };

        match prev {
            Some(prev) => {
                if let Some(node) = self.node_mut(prev) {
                    node.next = next;
                }
            }
            None => match next {
                Some(next) => {
                    self.heads.insert(group, next);
                }
                None => {
                    self.heads.remove(&group);
                }
            },
        }

        if let Some(next) = next {
            if let Some(node) = self.node_mut(next) {
                node.prev = prev;
            }
        }

        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = None;
        }
    }

    //--- Traversal --------------------------------------------------------

    pub(super) fn head(&self, group: u8) -> Option<CallId> {
        self.heads.get(&group).map(|&index| self.id_of(index))
    }

    pub(super) fn next(&self, call: CallId) -> Option<CallId> {
        self.binding(call)?.next.map(|index| self.id_of(index))
    }

    pub(super) fn is_in_group(&self, call: CallId, group: u8) -> bool {
        self.binding(call).map(|b| b.group == group).unwrap_or(false)
    }

    /// Task and callback of an active binding that has a callback.
    pub(super) fn runnable(&self, call: CallId) -> Option<(TaskId, Arc<dyn Invoke<E>>)> {
        let binding = self.binding(call)?;
        if !binding.active {
            return None;
        }
        binding
            .invoke
            .as_ref()
            .map(|invoke| (binding.task, Arc::clone(invoke)))
    }
}

//=== TaskSystem: Call API ================================================

impl<E: 'static> TaskSystem<E> {
    //--- Binding ----------------------------------------------------------

    /// Binds `f` to `task` in the [`UPDATE`] group at priority 0.
    pub fn bind<T: Task>(&mut self, task: TaskId, f: CallFn<T, E>) -> Result<CallId, TaskError> {
        self.bind_with(task, f, UPDATE, 0, true)
    }

    /// Binds `f` to `task` in `group` at `priority`.
    pub fn bind_with<T: Task>(
        &mut self,
        task: TaskId,
        f: CallFn<T, E>,
        group: u8,
        priority: usize,
        push_back: bool,
    ) -> Result<CallId, TaskError> {
        self.check_type::<T>(task)?;
        Ok(self.attach(task, Some(erase(f)), group, priority, push_back))
    }

    /// Reserves a position in `group` without a callback.
    ///
    /// Dispatch skips the binding until [`set_call`](Self::set_call) gives
    /// it one.
    pub fn bind_idle(&mut self, task: TaskId, group: u8, priority: usize) -> Result<CallId, TaskError> {
        if !self.contains(task) {
            return Err(TaskError::UnknownTask(task));
        }
        Ok(self.attach(task, None, group, priority, true))
    }

    pub(super) fn attach(
        &mut self,
        task: TaskId,
        invoke: Option<Arc<dyn Invoke<E>>>,
        group: u8,
        priority: usize,
        push_back: bool,
    ) -> CallId {
        let call = self.calls.insert(task, invoke, group, priority, push_back);
        self.attach_call(task, call);
        trace!("Bound {} to {} (group {}, priority {})", call, task, group, priority);
        call
    }

    /// Removes a binding.
    pub fn unbind(&mut self, call: CallId) {
        match self.calls.remove(call) {
            Some(task) => self.detach_call(task, call),
            None => warn!("Unbind ignored, {} no longer exists", call),
        }
    }

    //--- Callback ---------------------------------------------------------

    /// Replaces the callback of a binding and activates it.
    pub fn set_call<T: Task>(&mut self, call: CallId, f: CallFn<T, E>) -> Result<(), TaskError> {
        let task = self
            .calls
            .binding(call)
            .map(|b| b.task)
            .ok_or(TaskError::UnknownCall(call))?;
        self.check_type::<T>(task)?;

        if let Some(binding) = self.calls.binding_mut(call) {
            binding.invoke = Some(erase(f));
            binding.active = true;
        }
        Ok(())
    }

    /// Replaces the callback, active flag, and tag of a binding at once.
    pub fn set_call_with<T: Task>(
        &mut self,
        call: CallId,
        f: CallFn<T, E>,
        active: bool,
        tag: impl Into<String>,
    ) -> Result<(), TaskError> {
        self.set_call(call, f)?;
        if let Some(binding) = self.calls.binding_mut(call) {
            binding.active = active;
            binding.tag = tag.into();
        }
        Ok(())
    }

    //--- Activity ---------------------------------------------------------

    pub fn set_active(&mut self, call: CallId, active: bool) {
        match self.calls.binding_mut(call) {
            Some(binding) => binding.active = active,
            None => warn!("set_active ignored, {} no longer exists", call),
        }
    }

    /// Flips the active flag and returns the new value.
    pub fn toggle_active(&mut self, call: CallId) -> bool {
        match self.calls.binding_mut(call) {
            Some(binding) => {
                binding.active = !binding.active;
                binding.active
            }
            None => {
                warn!("toggle_active ignored, {} no longer exists", call);
                false
            }
        }
    }

    pub fn is_active(&self, call: CallId) -> bool {
        self.calls.binding(call).map(|b| b.active).unwrap_or(false)
    }

    //--- Ordering ---------------------------------------------------------

    /// Moves a binding to `priority` within its group.
    pub fn set_priority(&mut self, call: CallId, priority: usize, push_back: bool) {
        if self.calls.binding(call).is_none() {
            warn!("set_priority ignored, {} no longer exists", call);
            return;
        }

        self.calls.unlink(call.index());
        if let Some(binding) = self.calls.binding_mut(call) {
            binding.priority = priority;
        }
        self.calls.link(call.index(), push_back);
    }

    pub fn priority(&self, call: CallId) -> Option<usize> {
        self.calls.binding(call).map(|b| b.priority)
    }

    /// Moves a binding to the end of its priority band in `group`.
    pub fn set_group(&mut self, call: CallId, group: u8) {
        if self.calls.binding(call).is_none() {
            warn!("set_group ignored, {} no longer exists", call);
            return;
        }

        self.calls.unlink(call.index());
        if let Some(binding) = self.calls.binding_mut(call) {
            binding.group = group;
        }
        self.calls.link(call.index(), true);
    }

    pub fn group(&self, call: CallId) -> Option<u8> {
        self.calls.binding(call).map(|b| b.group)
    }

    //--- Metadata ---------------------------------------------------------

    pub fn set_tag(&mut self, call: CallId, tag: impl Into<String>) {
        match self.calls.binding_mut(call) {
            Some(binding) => binding.tag = tag.into(),
            None => warn!("set_tag ignored, {} no longer exists", call),
        }
    }

    pub fn tag(&self, call: CallId) -> Option<&str> {
        self.calls.binding(call).map(|b| b.tag.as_str())
    }

    /// Task a binding belongs to.
    pub fn call_owner(&self, call: CallId) -> Option<TaskId> {
        self.calls.binding(call).map(|b| b.task)
    }

    /// Bindings of `group` in dispatch order.
    pub fn call_order(&self, group: u8) -> Vec<CallId> {
        std::iter::successors(self.calls.head(group), |&call| self.calls.next(call)).collect()
    }

    fn check_type<T: Task>(&self, task: TaskId) -> Result<(), TaskError> {
        if !self.contains(task) {
            return Err(TaskError::UnknownTask(task));
        }
        if !self.holds::<T>(task) {
            return Err(TaskError::TypeMismatch {
                id: task,
                expected: type_name::<T>(),
            });
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
