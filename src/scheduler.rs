use crate::Error;
use crate::NodeId;
use crate::carousel::widget::CarouselTimer;
use crate::trace::TraceState;

/// Deferred work a timer performs when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimerTask {
    Carousel { widget: usize, timer: CarouselTimer },
    AddClass { node: NodeId, class_name: &'static str },
    RemoveClass { node: NodeId, class_name: &'static str },
    DismissNotification(NodeId),
    RemoveModal(usize),
    Focus(NodeId),
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) interval_ms: Option<i64>,
    pub(crate) task: TimerTask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub interval_ms: Option<i64>,
}

/// Virtual-clock timer queue. Tasks fire in `(due_at, order)` order, so two
/// timers due at the same instant run in scheduling order.
#[derive(Debug)]
pub(crate) struct SchedulerState {
    task_queue: Vec<ScheduledTask>,
    pub(crate) now_ms: i64,
    pub(crate) timer_step_limit: usize,
    next_timer_id: i64,
    next_task_order: i64,
    running_timer_id: Option<i64>,
    running_timer_canceled: bool,
}

impl SchedulerState {
    pub(crate) fn new(timer_step_limit: usize) -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit,
            next_timer_id: 1,
            next_task_order: 0,
            running_timer_id: None,
            running_timer_canceled: false,
        }
    }

    pub(crate) fn schedule_timeout(
        &mut self,
        task: TimerTask,
        delay_ms: i64,
        trace: &mut TraceState,
    ) -> i64 {
        let delay_ms = delay_ms.max(0);
        let id = self.push(task, delay_ms, None);
        let due_at = self.now_ms + delay_ms;
        trace.timer_line(|| {
            format!("[timer] schedule timeout id={id} due_at={due_at} delay_ms={delay_ms}")
        });
        id
    }

    pub(crate) fn schedule_interval(
        &mut self,
        task: TimerTask,
        interval_ms: i64,
        trace: &mut TraceState,
    ) -> i64 {
        let interval_ms = interval_ms.max(0);
        let id = self.push(task, interval_ms, Some(interval_ms));
        let due_at = self.now_ms + interval_ms;
        trace.timer_line(|| {
            format!("[timer] schedule interval id={id} due_at={due_at} interval_ms={interval_ms}")
        });
        id
    }

    fn push(&mut self, task: TimerTask, delay_ms: i64, interval_ms: Option<i64>) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        self.task_queue.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order,
            interval_ms,
            task,
        });
        id
    }

    /// Cancels a queued timer. Clearing the interval that is currently running
    /// keeps it from being requeued. Returns whether anything was canceled.
    pub(crate) fn clear(&mut self, id: i64, trace: &mut TraceState) -> bool {
        let before = self.task_queue.len();
        self.task_queue.retain(|task| task.id != id);
        let removed = before.saturating_sub(self.task_queue.len());
        let mut running_canceled = false;
        if self.running_timer_id == Some(id) {
            self.running_timer_canceled = true;
            running_canceled = true;
        }
        trace.timer_line(|| {
            format!("[timer] clear id={id} removed={removed} running_canceled={running_canceled}")
        });
        removed > 0 || running_canceled
    }

    pub(crate) fn clear_all(&mut self, trace: &mut TraceState) -> usize {
        let cleared = self.task_queue.len();
        self.task_queue.clear();
        if self.running_timer_id.is_some() {
            self.running_timer_canceled = true;
        }
        trace.timer_line(|| format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub(crate) fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                interval_ms: task.interval_ms,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub(crate) fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    /// Removes the next task and marks it as running. The caller must hand it
    /// back through [`SchedulerState::finish`] once its work is done.
    pub(crate) fn take_next(
        &mut self,
        due_limit: Option<i64>,
        advance_clock: bool,
    ) -> Option<ScheduledTask> {
        let idx = self.next_task_index(due_limit)?;
        let task = self.task_queue.remove(idx);
        if advance_clock && task.due_at > self.now_ms {
            self.now_ms = task.due_at;
        }
        self.running_timer_id = Some(task.id);
        self.running_timer_canceled = false;
        Some(task)
    }

    pub(crate) fn finish(&mut self, task: ScheduledTask, trace: &mut TraceState) {
        let canceled = self.running_timer_canceled;
        self.running_timer_id = None;
        self.running_timer_canceled = false;

        let Some(interval_ms) = task.interval_ms else {
            return;
        };
        if canceled {
            return;
        }
        let due_at = task.due_at.saturating_add(interval_ms);
        let order = self.next_task_order;
        self.next_task_order += 1;
        let id = task.id;
        self.task_queue.push(ScheduledTask {
            due_at,
            order,
            ..task
        });
        trace.timer_line(|| {
            format!("[timer] requeue id={id} due_at={due_at} interval_ms={interval_ms}")
        });
    }

    pub(crate) fn step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());

        let next_task_desc = self
            .next_task_index(due_limit)
            .and_then(|idx| self.task_queue.get(idx))
            .map(|task| {
                let interval_desc = task
                    .interval_ms
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "none".into());
                format!(
                    "id={},due_at={},order={},interval_ms={}",
                    task.id, task.due_at, task.order, interval_desc
                )
            })
            .unwrap_or_else(|| "none".into());

        Error::Timer(format!(
            "flush exceeded max task steps (an interval is still armed): limit={}, steps={steps}, now_ms={}, due_limit={}, pending_tasks={}, next_task={}",
            self.timer_step_limit,
            self.now_ms,
            due_limit_desc,
            self.task_queue.len(),
            next_task_desc
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus_task(id: usize) -> TimerTask {
        TimerTask::Focus(NodeId(id))
    }

    #[test]
    fn same_due_time_runs_in_scheduling_order() {
        let mut trace = TraceState::default();
        let mut scheduler = SchedulerState::new(100);
        let late = scheduler.schedule_timeout(focus_task(1), 50, &mut trace);
        let first = scheduler.schedule_timeout(focus_task(2), 10, &mut trace);
        let second = scheduler.schedule_timeout(focus_task(3), 10, &mut trace);

        let order = scheduler
            .pending()
            .into_iter()
            .map(|timer| timer.id)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![first, second, late]);
    }

    #[test]
    fn interval_is_requeued_until_cleared_while_running() {
        let mut trace = TraceState::default();
        let mut scheduler = SchedulerState::new(100);
        let id = scheduler.schedule_interval(focus_task(1), 20, &mut trace);

        let task = scheduler.take_next(None, true).expect("interval queued");
        assert_eq!(scheduler.now_ms, 20);
        scheduler.finish(task, &mut trace);
        assert_eq!(scheduler.pending()[0].due_at, 40);

        let task = scheduler.take_next(None, true).expect("interval requeued");
        assert!(scheduler.clear(id, &mut trace));
        scheduler.finish(task, &mut trace);
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn due_limit_filters_future_tasks() {
        let mut trace = TraceState::default();
        let mut scheduler = SchedulerState::new(100);
        scheduler.schedule_timeout(focus_task(1), 5, &mut trace);
        assert!(scheduler.take_next(Some(4), false).is_none());
        assert!(scheduler.take_next(Some(5), false).is_some());
    }

    #[test]
    fn clearing_unknown_id_reports_nothing_removed() {
        let mut trace = TraceState::default();
        let mut scheduler = SchedulerState::new(100);
        assert!(!scheduler.clear(42, &mut trace));
    }

    #[test]
    fn step_limit_error_describes_next_task() {
        let mut trace = TraceState::default();
        let mut scheduler = SchedulerState::new(3);
        scheduler.schedule_interval(focus_task(1), 0, &mut trace);
        let Error::Timer(message) = scheduler.step_limit_error(4, None) else {
            panic!("expected timer error");
        };
        assert!(message.contains("limit=3"));
        assert!(message.contains("interval_ms=0"));
    }
}
