//! Terminal abstraction used by the session frontend.

/// Minimal terminal interface: raw input in, frames out.
pub trait Terminal {
    /// Enter raw mode and begin delivering input chunks and resize notifications.
    fn start(
        &mut self,
        on_input: Box<dyn FnMut(String) + Send>,
        on_resize: Box<dyn FnMut() + Send>,
    ) -> std::io::Result<()>;

    /// Stop delivering input and restore the terminal.
    fn stop(&mut self) -> std::io::Result<()>;

    /// Discard pending input for up to `max_ms`, returning early after `idle_ms` of silence.
    fn drain_input(&mut self, max_ms: u64, idle_ms: u64);

    fn write(&mut self, data: &str);

    fn columns(&self) -> u16;
    fn rows(&self) -> u16;
}

/// Drains input and stops the terminal when dropped, so a panic or early return never leaves
/// the shell in raw mode.
pub struct TerminalGuard<T: Terminal> {
    terminal: T,
    max_drain_ms: u64,
    idle_drain_ms: u64,
    armed: bool,
}

impl<T: Terminal> TerminalGuard<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal,
            max_drain_ms: 500,
            idle_drain_ms: 50,
            armed: true,
        }
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Stops the terminal now and disarms the drop handler.
    pub fn finish(mut self) -> std::io::Result<()> {
        self.armed = false;
        self.terminal
            .drain_input(self.max_drain_ms, self.idle_drain_ms);
        self.terminal.stop()
    }
}

impl<T: Terminal> Drop for TerminalGuard<T> {
    fn drop(&mut self) {
        if self.armed {
            self.terminal
                .drain_input(self.max_drain_ms, self.idle_drain_ms);
            let _ = self.terminal.stop();
        }
    }
}
