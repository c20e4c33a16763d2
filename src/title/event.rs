//=== Title Events ========================================================

/// Notifications exchanged between title stages and the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleEvent {
    CreateOpeningText,
    CreateOpeningGraph,
    CreateTitleGraph,
    CreateTitleText,

    /// The player pressed a key on the prompt.
    Started,
}
