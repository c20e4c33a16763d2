//=== TaskError ===========================================================

use super::call::CallId;
use super::registry::TaskId;

/// Misuse of the task system that the caller can recover from.
///
/// Stale handles passed to fire-and-forget operations (`destroy`,
/// `set_active`, ...) are logged and ignored instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The id does not name a live task.
    UnknownTask(TaskId),

    /// The id does not name a live call binding.
    UnknownCall(CallId),

    /// The task is already scheduled for removal and can not be kept.
    Doomed(TaskId),

    /// The task exists but is not of the requested type.
    TypeMismatch { id: TaskId, expected: &'static str },

    /// Positional insert past the end of a keep array.
    IndexOutOfRange { index: usize, len: usize },
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask(id) => write!(f, "{} does not exist", id),
            Self::UnknownCall(id) => write!(f, "{} does not exist", id),
            Self::Doomed(id) => write!(f, "{} is scheduled for removal and can not be kept", id),
            Self::TypeMismatch { id, expected } => {
                write!(f, "{} is not a {}", id, expected)
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for {} element(s)", index, len)
            }
        }
    }
}

impl std::error::Error for TaskError {}
