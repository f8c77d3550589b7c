/// Instruction for the host's autoplay timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayCommand {
    Start,
    Stop,
}

/// Why autoplay is held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspension {
    Hover,
    Focus,
    Drag,
}

/// Two-state autoplay latch.
///
/// Autoplay runs once it has been requested with `start` and while no
/// suspension is held. Every operation is idempotent and reports a command
/// only when the running state actually flips, so the host never stacks two
/// interval timers and never clears one it does not own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoplayLatch {
    armed: bool,
    running: bool,
    hovered: bool,
    focused: bool,
    dragging: bool,
}

impl AutoplayLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_suspended(&self) -> bool {
        self.hovered || self.focused || self.dragging
    }

    /// Requests autoplay, typically once the start delay has elapsed. It runs
    /// right away unless a suspension is held.
    pub fn start(&mut self) -> Option<AutoplayCommand> {
        self.armed = true;
        self.settle()
    }

    /// Withdraws the autoplay request; only a later `start` restarts it.
    pub fn stop(&mut self) -> Option<AutoplayCommand> {
        self.armed = false;
        self.settle()
    }

    pub fn suspend(&mut self, reason: Suspension) -> Option<AutoplayCommand> {
        *self.flag(reason) = true;
        self.settle()
    }

    pub fn resume(&mut self, reason: Suspension) -> Option<AutoplayCommand> {
        *self.flag(reason) = false;
        self.settle()
    }

    fn flag(&mut self, reason: Suspension) -> &mut bool {
        match reason {
            Suspension::Hover => &mut self.hovered,
            Suspension::Focus => &mut self.focused,
            Suspension::Drag => &mut self.dragging,
        }
    }

    fn settle(&mut self) -> Option<AutoplayCommand> {
        let want = self.armed && !self.is_suspended();
        if want == self.running {
            return None;
        }
        self.running = want;
        Some(if want {
            AutoplayCommand::Start
        } else {
            AutoplayCommand::Stop
        })
    }
}
