use std::collections::VecDeque;

/// Bounded in-memory trace of dispatched events and timer activity.
///
/// Lines are also forwarded to `tracing` at debug level under the
/// `storefront_ui::trace` target.
#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    logs: VecDeque<String>,
    log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

impl TraceState {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub(crate) fn event_line(&mut self, line: impl FnOnce() -> String) {
        if self.enabled && self.events {
            self.line(line());
        }
    }

    pub(crate) fn timer_line(&mut self, line: impl FnOnce() -> String) {
        if self.enabled && self.timers {
            self.line(line());
        }
    }

    fn line(&mut self, line: String) {
        tracing::debug!(target: "storefront_ui::trace", "{line}");
        while self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub(crate) fn take_logs(&mut self) -> Vec<String> {
        self.logs.drain(..).collect()
    }

    pub(crate) fn set_log_limit(&mut self, max_entries: usize) {
        self.log_limit = max_entries;
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
    }
}
