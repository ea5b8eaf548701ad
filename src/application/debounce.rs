use std::future::Future;
use std::time::Duration;

use iced::task::Handle;

/// Identifies one scheduled countdown. Only the most recent ticket is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Single-shot restartable timer for the URL field.
///
/// At most one countdown is armed at a time. Scheduling again aborts the
/// running countdown task (when its handle was tracked) and invalidates its
/// ticket, so a late wake-up from a replaced countdown is ignored.
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    armed: Option<u64>,
    pending: Option<Handle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            armed: None,
            pending: None,
        }
    }

    /// Restart the countdown. The returned future resolves with its ticket
    /// once the quiet interval has elapsed.
    pub fn schedule(&mut self) -> impl Future<Output = DebounceTicket> + Send + 'static {
        self.cancel();
        self.generation += 1;
        self.armed = Some(self.generation);

        let ticket = DebounceTicket(self.generation);
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            ticket
        }
    }

    /// Remember the task running the latest countdown so the next
    /// `schedule` can abort it.
    pub fn track(&mut self, handle: Handle) {
        if let Some(previous) = self.pending.replace(handle) {
            previous.abort();
        }
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        self.armed = None;
    }

    /// Returns `true` exactly once, for the ticket of the latest countdown.
    pub fn fire(&mut self, ticket: DebounceTicket) -> bool {
        if self.armed == Some(ticket.0) {
            self.armed = None;
            self.pending = None;
            true
        } else {
            false
        }
    }
}
