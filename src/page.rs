use crate::carousel::CarouselController;
use crate::components::{self, Handler, Widgets, notify};
use crate::config::PageConfig;
use crate::events::{EventDetail, EventState, Listener, ListenerStore};
use crate::html::parse_html;
use crate::scheduler::{PendingTimer, ScheduledTask, SchedulerState, TimerTask};
use crate::trace::TraceState;
use crate::{Dom, Error, NodeId, NotificationKind, Result, truncate_chars};

const SEQUENTIAL_FOCUS: &str =
    "a[href], button, input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";

/// Browser-side state the components act on.
#[derive(Debug)]
pub(crate) struct Host {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) trace: TraceState,
    pub(crate) config: PageConfig,
    pub(crate) viewport_width: u32,
    pub(crate) scroll_y: f64,
    pub(crate) active_element: Option<NodeId>,
    hovered_path: Vec<NodeId>,
    pending_focus: Option<NodeId>,
    scroll_requests: Vec<NodeId>,
}

impl Host {
    pub(crate) fn listen(&mut self, node: NodeId, event_type: &str, handler: Handler) {
        self.listeners.add(node, event_type, Listener { handler });
    }

    pub(crate) fn set_timeout(&mut self, task: TimerTask, delay_ms: i64) -> i64 {
        self.scheduler
            .schedule_timeout(task, delay_ms, &mut self.trace)
    }

    pub(crate) fn set_interval(&mut self, task: TimerTask, interval_ms: i64) -> i64 {
        self.scheduler
            .schedule_interval(task, interval_ms, &mut self.trace)
    }

    pub(crate) fn clear_timer(&mut self, id: i64) -> bool {
        self.scheduler.clear(id, &mut self.trace)
    }

    /// Focus changes dispatch events, so handlers only request them; the page
    /// applies the request once the current dispatch has finished.
    pub(crate) fn request_focus(&mut self, node: NodeId) {
        self.pending_focus = Some(node);
    }

    pub(crate) fn request_scroll_into_view(&mut self, node: NodeId) {
        self.scroll_requests.push(node);
    }

    fn node_label(&self, node: NodeId) -> String {
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        if let Some(tag) = self.dom.tag_name(node) {
            return match self.dom.attr(node, "class") {
                Some(class) if !class.trim().is_empty() => {
                    let first = class.split_whitespace().next().unwrap_or_default();
                    format!("{tag}.{first}")
                }
                _ => tag.to_string(),
            };
        }
        if node == self.dom.root {
            return "document".into();
        }
        format!("node-{}", node.0)
    }
}

/// A parsed storefront page with its widgets wired up.
///
/// All input goes through the action methods (`click`, `press_key`, `resize`,
/// ...) and time only moves when the caller advances the virtual clock.
#[derive(Debug)]
pub struct Page {
    host: Host,
    widgets: Widgets,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, PageConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: PageConfig) -> Result<Self> {
        config.validate()?;
        let dom = parse_html(html)?;
        let trace = TraceState::new(config.trace);
        let mut host = Host {
            dom,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::new(config.timer_step_limit),
            trace,
            viewport_width: config.viewport_width,
            config,
            scroll_y: 0.0,
            active_element: None,
            hovered_path: Vec::new(),
            pending_focus: None,
            scroll_requests: Vec::new(),
        };
        let mut widgets = Widgets::default();
        components::install(&mut host, &mut widgets)?;
        tracing::debug!(
            carousels = widgets.carousels.len(),
            viewport_width = host.viewport_width,
            "page ready"
        );
        Ok(Self { host, widgets })
    }

    pub fn config(&self) -> &PageConfig {
        &self.host.config
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.host.trace.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.host.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.host.trace.timers = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.host.trace.take_logs()
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config("set_trace_log_limit requires at least 1 entry".into()));
        }
        self.host.trace.set_log_limit(max_entries);
        Ok(())
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Config("set_timer_step_limit requires at least 1 step".into()));
        }
        self.host.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.host.dom.disabled(target) {
            return Ok(());
        }

        let click_outcome = self.dispatch(EventState::new("click", target))?;
        if !click_outcome.default_prevented && self.is_submit_control(target) {
            if let Some(form) = self.host.dom.closest(target, "form")? {
                self.dispatch(EventState::new("submit", form))?;
            }
        }
        self.apply_pending_focus()
    }

    /// Dispatches `submit` on the form matched by `selector`. Returns whether
    /// the submission went ahead.
    pub fn submit(&mut self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        let form = self
            .host
            .dom
            .closest(target, "form")?
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form control".into(),
                actual: self.host.dom.tag_name(target).unwrap_or("node").to_string(),
            })?;
        let outcome = self.dispatch(EventState::new("submit", form))?;
        self.apply_pending_focus()?;
        Ok(!outcome.default_prevented)
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)?;
        self.apply_pending_focus()
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.blur_node(target, None)?;
        self.apply_pending_focus()
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.host.dom.disabled(target) || self.host.dom.has_attr(target, "readonly") {
            return Ok(());
        }

        let tag = self
            .host
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        self.host.dom.set_value(target, text)?;
        self.dispatch(EventState::new("input", target))?;
        self.apply_pending_focus()
    }

    /// Sends `keydown` to the focused element (or `body`). Returns `true` when
    /// no handler prevented the key's default action.
    pub fn press_key(&mut self, key: &str) -> Result<bool> {
        self.key_down(key, false)
    }

    pub fn press_key_with_shift(&mut self, key: &str) -> Result<bool> {
        self.key_down(key, true)
    }

    fn key_down(&mut self, key: &str, shift: bool) -> Result<bool> {
        let target = self
            .host
            .active_element
            .filter(|node| self.host.dom.is_connected(*node))
            .unwrap_or_else(|| self.host.dom.body());
        let event = EventState::new("keydown", target).with_detail(EventDetail::Key {
            key: key.to_string(),
            shift,
        });
        let outcome = self.dispatch(event)?;
        self.apply_pending_focus()?;
        if !outcome.default_prevented && key == "Tab" {
            self.move_sequential_focus(shift)?;
        }
        Ok(!outcome.default_prevented)
    }

    /// Moves the pointer onto the element matched by `selector`, sending
    /// `mouseleave` to elements it left and `mouseenter` to those it entered.
    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if self.host.dom.element(node).is_some() {
                path.push(node);
            }
            cursor = self.host.dom.parent(node);
        }
        self.move_pointer(path)
    }

    pub fn unhover(&mut self) -> Result<()> {
        self.move_pointer(Vec::new())
    }

    fn move_pointer(&mut self, path: Vec<NodeId>) -> Result<()> {
        let previous = std::mem::take(&mut self.host.hovered_path);
        for node in previous.iter().filter(|node| !path.contains(node)) {
            self.dispatch(EventState::new("mouseleave", *node))?;
        }
        for node in path.iter().rev().filter(|node| !previous.contains(node)) {
            self.dispatch(EventState::new("mouseenter", *node))?;
        }
        self.host.hovered_path = path;
        self.apply_pending_focus()
    }

    pub fn touch_start(&mut self, selector: &str, client_x: f64) -> Result<()> {
        self.touch(selector, "touchstart", EventDetail::Touch { client_x })
    }

    pub fn touch_move(&mut self, selector: &str, client_x: f64) -> Result<()> {
        self.touch(selector, "touchmove", EventDetail::Touch { client_x })
    }

    pub fn touch_end(&mut self, selector: &str) -> Result<()> {
        self.touch(selector, "touchend", EventDetail::None)
    }

    fn touch(&mut self, selector: &str, event_type: &str, detail: EventDetail) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch(EventState::new(event_type, target).with_detail(detail))?;
        self.apply_pending_focus()
    }

    pub fn resize(&mut self, viewport_width: u32) -> Result<()> {
        self.host.viewport_width = viewport_width;
        let root = self.host.dom.root;
        self.dispatch(EventState::new("resize", root))?;
        self.apply_pending_focus()
    }

    pub fn scroll_to(&mut self, scroll_y: f64) -> Result<()> {
        self.host.scroll_y = scroll_y.max(0.0);
        let root = self.host.dom.root;
        self.dispatch(EventState::new("scroll", root))?;
        self.apply_pending_focus()
    }

    /// Reports that the elements matched by `selector` entered the viewport.
    pub fn intersect(&mut self, selector: &str) -> Result<()> {
        let targets = self.host.dom.query_selector_all(selector)?;
        if targets.is_empty() {
            return Err(Error::SelectorNotFound(selector.to_string()));
        }
        for target in targets {
            self.dispatch(EventState::new("intersect", target))?;
        }
        self.apply_pending_focus()
    }

    pub fn show_notification(&mut self, message: &str, kind: NotificationKind) -> Result<()> {
        notify::show(&mut self.host, message, kind)?;
        Ok(())
    }

    pub fn viewport_width(&self) -> u32 {
        self.host.viewport_width
    }

    pub fn scroll_y(&self) -> f64 {
        self.host.scroll_y
    }

    /// Read-only view of the `index`-th carousel in document order.
    pub fn carousel(&self, index: usize) -> Option<&CarouselController> {
        self.widgets
            .carousels
            .get(index)
            .map(|widget| &widget.controller)
    }

    pub fn carousel_count(&self) -> usize {
        self.widgets.carousels.len()
    }

    /// Drains the scroll-into-view requests issued by anchor links, as
    /// element labels (`#id`, else `tag.class`).
    pub fn take_scroll_requests(&mut self) -> Vec<String> {
        let requests = std::mem::take(&mut self.host.scroll_requests);
        requests
            .into_iter()
            .map(|node| self.host.node_label(node))
            .collect()
    }

    pub fn active_element_matches(&self, selector: &str) -> Result<bool> {
        match self.host.active_element {
            Some(node) => self.host.dom.matches_selector(node, selector),
            None => Ok(false),
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.host.scheduler.now_ms
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Timer(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.host.scheduler.now_ms;
        let target = from.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(target), true)?;
        self.host.scheduler.now_ms = target;
        self.host.trace.timer_line(|| {
            format!("[timer] advance delta_ms={delta_ms} from={from} to={target} ran_due={ran}")
        });
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        let from = self.host.scheduler.now_ms;
        if target_ms < from {
            return Err(Error::Timer(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={from})"
            )));
        }
        let ran = self.run_timer_queue(Some(target_ms), true)?;
        self.host.scheduler.now_ms = target_ms;
        self.host.trace.timer_line(|| {
            format!("[timer] advance_to from={from} to={target_ms} ran_due={ran}")
        });
        Ok(())
    }

    /// Runs every queued timer, moving the clock forward as needed. Fails if a
    /// still-armed interval keeps the queue busy past the step limit.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.host.scheduler.now_ms;
        let ran = self.run_timer_queue(None, true)?;
        let to = self.host.scheduler.now_ms;
        self.host
            .trace
            .timer_line(|| format!("[timer] flush from={from} to={to} ran={ran}"));
        Ok(())
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(task) = self.host.scheduler.take_next(None, true) else {
            self.host.trace.timer_line(|| "[timer] run_next none".into());
            return Ok(false);
        };
        self.execute_timer_task(task)?;
        Ok(true)
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let now = self.host.scheduler.now_ms;
        let ran = self.run_timer_queue(Some(now), false)?;
        self.host
            .trace
            .timer_line(|| format!("[timer] run_due now_ms={now} ran={ran}"));
        Ok(ran)
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.host.scheduler.pending()
    }

    pub fn clear_all_timers(&mut self) -> usize {
        self.host.scheduler.clear_all(&mut self.host.trace)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while self.host.scheduler.next_task_index(due_limit).is_some() {
            steps += 1;
            if steps > self.host.scheduler.timer_step_limit {
                return Err(self.host.scheduler.step_limit_error(steps, due_limit));
            }
            let Some(task) = self.host.scheduler.take_next(due_limit, advance_clock) else {
                break;
            };
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        let now = self.host.scheduler.now_ms;
        self.host.trace.timer_line(|| {
            let interval_desc = task
                .interval_ms
                .map(|value| value.to_string())
                .unwrap_or_else(|| "none".into());
            format!(
                "[timer] run id={} due_at={} interval_ms={} now_ms={}",
                task.id, task.due_at, interval_desc, now
            )
        });

        let outcome = components::run_timer(&mut self.host, &mut self.widgets, &task.task);
        self.host.scheduler.finish(task, &mut self.host.trace);
        outcome?;
        self.apply_pending_focus()
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.text_content(target);
        self.check(selector, target, expected, actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.value(target)?;
        self.check(selector, target, expected, actual)
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_missing(&self, selector: &str) -> Result<()> {
        if let Some(node) = self.host.dom.query_selector(selector)? {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "no match".into(),
                actual: "element present".into(),
                dom_snippet: self.node_snippet(node),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.class_contains(target, class_name);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name:?} present={expected}"),
                actual: format!("present={actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    /// Checks an attribute value; `None` expects the attribute to be absent.
    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.attr(target, name);
        if actual.as_deref() != expected {
            let describe = |value: Option<&str>| match value {
                Some(value) => format!("{name}={value:?}"),
                None => format!("{name} absent"),
            };
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: describe(expected),
                actual: describe(actual.as_deref()),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.style_get(target, property)?;
        self.check(selector, target, expected, actual)
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.host.dom.class_contains(target, class_name))
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.host.dom.attr(target, name))
    }

    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.host.dom.style_get(target, property)
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.host.dom.text_content(target))
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.host.dom.query_selector_all(selector)?.len())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.host.dom.dump_node(target))
    }

    fn check(&self, selector: &str, target: NodeId, expected: &str, actual: String) -> Result<()> {
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.host
            .dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.host.dom.dump_node(node_id), 200)
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        let kind = self
            .host
            .dom
            .attr(node, "type")
            .map(|value| value.to_ascii_lowercase());
        match self.host.dom.tag_name(node) {
            Some("button") => kind.is_none_or(|kind| kind == "submit"),
            Some("input") => kind.as_deref() == Some("submit"),
            _ => false,
        }
    }

    fn dispatch(&mut self, mut event: EventState) -> Result<EventState> {
        let mut path = Vec::new();
        let mut cursor = Some(event.target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.host.dom.parent(node);
        }

        let hops = if event.bubbles { path.len() } else { 1 };
        for node in path.into_iter().take(hops) {
            event.current_target = node;
            self.invoke_listeners(node, &mut event)?;
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    fn invoke_listeners(&mut self, node_id: NodeId, event: &mut EventState) -> Result<()> {
        let listeners = self.host.listeners.get(node_id, &event.event_type);
        for listener in listeners {
            if self.host.trace.enabled {
                let target_label = self.host.node_label(event.target);
                let current_label = self.host.node_label(event.current_target);
                let event_type = event.event_type.clone();
                let default_prevented = event.default_prevented;
                self.host.trace.event_line(|| {
                    format!(
                        "[event] {event_type} target={target_label} current={current_label} default_prevented={default_prevented}"
                    )
                });
            }
            components::handle(&mut self.host, &mut self.widgets, &listener.handler, event)?;
        }
        Ok(())
    }

    fn trace_event_done(&mut self, event: &EventState, outcome: &str) {
        if !self.host.trace.enabled {
            return;
        }
        let target_label = self.host.node_label(event.target);
        self.host.trace.event_line(|| {
            format!(
                "[event] done {} target={} outcome={} default_prevented={}",
                event.event_type, target_label, outcome, event.default_prevented
            )
        });
    }

    fn focus_node(&mut self, node: NodeId) -> Result<()> {
        if self.host.dom.disabled(node) || !self.host.dom.is_connected(node) {
            return Ok(());
        }
        if self.host.active_element == Some(node) {
            return Ok(());
        }

        let previous = self.host.active_element;
        if let Some(current) = previous {
            self.blur_node(current, Some(node))?;
        }

        self.host.active_element = Some(node);
        self.dispatch(EventState::new("focusin", node).with_related_target(previous))?;
        self.dispatch(EventState::new("focus", node).with_related_target(previous))?;
        Ok(())
    }

    fn blur_node(&mut self, node: NodeId, next: Option<NodeId>) -> Result<()> {
        if self.host.active_element != Some(node) {
            return Ok(());
        }

        self.dispatch(EventState::new("focusout", node).with_related_target(next))?;
        self.dispatch(EventState::new("blur", node).with_related_target(next))?;
        self.host.active_element = None;
        Ok(())
    }

    fn apply_pending_focus(&mut self) -> Result<()> {
        // Each focus change may queue another one; cap the chain.
        for _ in 0..16 {
            let Some(node) = self.host.pending_focus.take() else {
                return Ok(());
            };
            self.focus_node(node)?;
        }
        Ok(())
    }

    fn move_sequential_focus(&mut self, backwards: bool) -> Result<()> {
        let candidates = self
            .host
            .dom
            .query_selector_all(SEQUENTIAL_FOCUS)?
            .into_iter()
            .filter(|node| !self.host.dom.disabled(*node))
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return Ok(());
        }
        let position = self
            .host
            .active_element
            .and_then(|active| candidates.iter().position(|node| *node == active));
        let next = match (position, backwards) {
            (Some(pos), false) => candidates[(pos + 1) % candidates.len()],
            (Some(pos), true) => candidates[(pos + candidates.len() - 1) % candidates.len()],
            (None, false) => candidates[0],
            (None, true) => candidates[candidates.len() - 1],
        };
        self.focus_node(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_PAGE: &str = r#"
      <body>
        <form id="signup">
          <input id="email" name="email" required>
          <input id="zip" name="zip" pattern="[0-9]{5}">
          <button id="send">Send</button>
          <button id="reset" type="button">Reset</button>
        </form>
      </body>
    "#;

    #[test]
    fn clicking_submit_button_dispatches_submit() -> Result<()> {
        let mut page = Page::from_html(FORM_PAGE)?;
        page.click("#send")?;
        page.assert_class("#email", "form__input--error", true)?;
        page.assert_text(".notification__message", "Please fill in all required fields.")?;
        Ok(())
    }

    #[test]
    fn non_submit_button_does_not_submit() -> Result<()> {
        let mut page = Page::from_html(FORM_PAGE)?;
        page.click("#reset")?;
        page.assert_class("#email", "form__input--error", false)?;
        page.assert_missing(".notification")?;
        Ok(())
    }

    #[test]
    fn disabled_controls_ignore_clicks() -> Result<()> {
        let html = r#"<form><input id="name" required><button id="go" disabled>Go</button></form>"#;
        let mut page = Page::from_html(html)?;
        page.click("#go")?;
        page.assert_missing(".notification")?;
        Ok(())
    }

    #[test]
    fn focus_moves_fire_blur_on_previous_element() -> Result<()> {
        let mut page = Page::from_html(FORM_PAGE)?;
        page.focus("#email")?;
        page.focus("#zip")?;
        page.assert_class("#email", "form__input--error", true)?;
        assert!(page.active_element_matches("#zip")?);
        Ok(())
    }

    #[test]
    fn tab_moves_focus_in_document_order() -> Result<()> {
        let mut page = Page::from_html(FORM_PAGE)?;
        page.focus("#zip")?;
        assert!(page.press_key("Tab")?);
        assert!(page.active_element_matches("#send")?);
        page.press_key_with_shift("Tab")?;
        assert!(page.active_element_matches("#zip")?);
        Ok(())
    }

    #[test]
    fn type_text_rejects_non_inputs() -> Result<()> {
        let mut page = Page::from_html(FORM_PAGE)?;
        let err = page.type_text("#signup", "x").expect_err("form is not typeable");
        assert!(matches!(err, Error::TypeMismatch { .. }));
        Ok(())
    }

    #[test]
    fn assertion_failure_carries_snippet() -> Result<()> {
        let page = Page::from_html(r#"<p id="msg" class="note">Hello</p>"#)?;
        match page.assert_text("#msg", "Bye") {
            Err(Error::AssertionFailed {
                actual,
                dom_snippet,
                ..
            }) => {
                assert_eq!(actual, "Hello");
                assert!(dom_snippet.contains("id=\"msg\""));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn advance_time_rejects_negative_delta() -> Result<()> {
        let mut page = Page::from_html("<p></p>")?;
        assert!(matches!(page.advance_time(-1), Err(Error::Timer(_))));
        page.advance_time(25)?;
        assert!(matches!(page.advance_time_to(10), Err(Error::Timer(_))));
        assert_eq!(page.now_ms(), 25);
        Ok(())
    }

    #[test]
    fn trace_records_event_and_timer_lines() -> Result<()> {
        let mut page = Page::from_html(FORM_PAGE)?;
        page.enable_trace(true);
        page.click("#send")?;
        page.advance_time(5_000)?;
        let logs = page.take_trace_logs();
        assert!(logs.iter().any(|line| line.starts_with("[event] done click target=#send")));
        assert!(logs.iter().any(|line| line.starts_with("[event] submit target=#signup")));
        assert!(logs.iter().any(|line| line.starts_with("[timer] run id=")));
        assert!(page.take_trace_logs().is_empty());
        Ok(())
    }

    #[test]
    fn trace_flag_in_config_enables_tracing_from_construction() -> Result<()> {
        let config = PageConfig {
            trace: true,
            ..PageConfig::default()
        };
        let mut page = Page::from_html_with_config(FORM_PAGE, config)?;
        page.click("#send")?;
        let logs = page.take_trace_logs();
        assert!(logs.iter().any(|line| line.starts_with("[event] submit target=#signup")));

        let mut quiet = Page::from_html(FORM_PAGE)?;
        quiet.click("#send")?;
        assert!(quiet.take_trace_logs().is_empty());
        Ok(())
    }

    #[test]
    fn zero_limits_are_rejected() -> Result<()> {
        let mut page = Page::from_html("<p></p>")?;
        assert!(page.set_timer_step_limit(0).is_err());
        assert!(page.set_trace_log_limit(0).is_err());
        Ok(())
    }
}
