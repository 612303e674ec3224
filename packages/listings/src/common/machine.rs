//! Pure decision machines.
//!
//! A machine interprets events (facts about what the user or the store did)
//! and decides on at most one command (intent to perform IO). Machines never
//! perform IO themselves and are never async; the controller that owns a
//! machine executes the command and feeds the outcome back as another event.

/// A state machine that interprets events and decides on commands.
///
/// # Guarantees
///
/// - Called synchronously (no async)
/// - Called serially (`&mut self`)
/// - At most one command per event
pub trait Machine {
    /// The event type this machine handles.
    type Event;

    /// The command type this machine can emit.
    type Command;

    /// Process an event and optionally return a command.
    fn decide(&mut self, event: &Self::Event) -> Option<Self::Command>;
}
