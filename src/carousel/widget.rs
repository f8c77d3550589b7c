use super::{AutoplayCommand, CarouselController, CarouselEvent, CarouselView, NavKey, Reaction};
use crate::components::Handler;
use crate::events::EventState;
use crate::page::Host;
use crate::scheduler::TimerTask;
use crate::{NodeId, Result, format_px};

const CONTAINER_SELECTOR: &str = ".featured__carousel";

/// DOM inputs routed to a carousel widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CarouselInput {
    PreviousClick,
    NextClick,
    KeyDown,
    TouchStart,
    TouchMove,
    TouchEnd,
    MouseEnter,
    MouseLeave,
    FocusIn,
    FocusOut,
    WindowResize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CarouselTimer {
    AutoplayArm,
    AutoplayTick,
    Resize,
}

/// Binds one [`CarouselController`] to its markup and owns its timers.
#[derive(Debug)]
pub(crate) struct CarouselWidget {
    index: usize,
    container: NodeId,
    track: Option<NodeId>,
    previous: Option<NodeId>,
    next: Option<NodeId>,
    pub(crate) controller: CarouselController,
    autoplay_interval_ms: i64,
    resize_debounce_ms: i64,
    autoplay_timer: Option<i64>,
    resize_timer: Option<i64>,
}

pub(crate) fn install(host: &mut Host, widgets: &mut Vec<CarouselWidget>) -> Result<()> {
    for container in host.dom.query_selector_all(CONTAINER_SELECTOR)? {
        let width_attr = host.dom.attr(container, "data-item-width");
        let config = match host.config.carousel.with_item_width_attr(width_attr.as_deref()) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    value = width_attr.as_deref().unwrap_or_default(),
                    %err,
                    "ignoring invalid data-item-width"
                );
                host.config.carousel.clone()
            }
        };
        let items = host
            .dom
            .query_selector_all_from(container, ".product-card")?
            .len();

        let index = widgets.len();
        let mut widget = CarouselWidget {
            index,
            container,
            track: host.dom.query_selector_from(container, ".featured__track")?,
            previous: host.dom.query_selector_from(container, ".featured__nav--prev")?,
            next: host.dom.query_selector_from(container, ".featured__nav--next")?,
            controller: CarouselController::new(items, &config)?,
            autoplay_interval_ms: config.autoplay_interval_ms,
            resize_debounce_ms: config.resize_debounce_ms,
            autoplay_timer: None,
            resize_timer: None,
        };

        let view = widget
            .controller
            .initialize(f64::from(host.viewport_width));
        widget.apply_view(host, &view)?;
        widget.listen(host);

        if config.autoplay {
            host.set_timeout(
                TimerTask::Carousel {
                    widget: index,
                    timer: CarouselTimer::AutoplayArm,
                },
                config.autoplay_start_delay_ms,
            );
        }

        tracing::debug!(index, items, "carousel widget installed");
        widgets.push(widget);
    }
    Ok(())
}

impl CarouselWidget {
    fn listen(&self, host: &mut Host) {
        let handler = |input| Handler::Carousel {
            widget: self.index,
            input,
        };
        if let Some(previous) = self.previous {
            host.listen(previous, "click", handler(CarouselInput::PreviousClick));
        }
        if let Some(next) = self.next {
            host.listen(next, "click", handler(CarouselInput::NextClick));
        }
        for (event_type, input) in [
            ("keydown", CarouselInput::KeyDown),
            ("touchstart", CarouselInput::TouchStart),
            ("touchmove", CarouselInput::TouchMove),
            ("touchend", CarouselInput::TouchEnd),
            ("mouseenter", CarouselInput::MouseEnter),
            ("mouseleave", CarouselInput::MouseLeave),
            ("focusin", CarouselInput::FocusIn),
            ("focusout", CarouselInput::FocusOut),
        ] {
            host.listen(self.container, event_type, handler(input));
        }
        let root = host.dom.root;
        host.listen(root, "resize", handler(CarouselInput::WindowResize));
    }

    pub(crate) fn handle_input(
        &mut self,
        host: &mut Host,
        input: CarouselInput,
        event: &mut EventState,
    ) -> Result<()> {
        let carousel_event = match input {
            CarouselInput::PreviousClick => CarouselEvent::Previous,
            CarouselInput::NextClick => CarouselEvent::Next,
            CarouselInput::KeyDown => {
                let Some(key) = event.key().and_then(NavKey::from_key) else {
                    return Ok(());
                };
                CarouselEvent::Key(key)
            }
            CarouselInput::TouchStart => {
                let Some(x) = event.client_x() else {
                    return Ok(());
                };
                CarouselEvent::DragStart { x }
            }
            CarouselInput::TouchMove => {
                let Some(x) = event.client_x() else {
                    return Ok(());
                };
                CarouselEvent::DragMove { x }
            }
            CarouselInput::TouchEnd => CarouselEvent::DragEnd,
            CarouselInput::MouseEnter => CarouselEvent::PointerEnter,
            CarouselInput::MouseLeave => CarouselEvent::PointerLeave,
            CarouselInput::FocusIn => CarouselEvent::FocusIn,
            CarouselInput::FocusOut => {
                // Focus moving between elements of the widget keeps it focused.
                if event
                    .related_target
                    .is_some_and(|related| host.dom.contains(self.container, related))
                {
                    return Ok(());
                }
                CarouselEvent::FocusOut
            }
            CarouselInput::WindowResize => {
                self.schedule_resize(host);
                return Ok(());
            }
        };

        let reaction = self.controller.handle(carousel_event);
        if reaction.prevent_default {
            event.prevent_default();
        }
        self.apply(host, reaction)
    }

    pub(crate) fn run_timer(&mut self, host: &mut Host, timer: CarouselTimer) -> Result<()> {
        let event = match timer {
            CarouselTimer::AutoplayArm => CarouselEvent::AutoplayArmed,
            CarouselTimer::AutoplayTick => CarouselEvent::AutoplayTick,
            CarouselTimer::Resize => {
                self.resize_timer = None;
                CarouselEvent::Resize {
                    viewport_width: f64::from(host.viewport_width),
                }
            }
        };
        let reaction = self.controller.handle(event);
        self.apply(host, reaction)
    }

    fn schedule_resize(&mut self, host: &mut Host) {
        if let Some(id) = self.resize_timer.take() {
            host.clear_timer(id);
        }
        self.resize_timer = Some(host.set_timeout(
            TimerTask::Carousel {
                widget: self.index,
                timer: CarouselTimer::Resize,
            },
            self.resize_debounce_ms,
        ));
    }

    fn apply(&mut self, host: &mut Host, reaction: Reaction) -> Result<()> {
        if let Some(offset) = reaction.live_offset {
            if let Some(track) = self.track {
                host.dom.style_set(
                    track,
                    "transform",
                    &format!("translateX({})", format_px(offset)),
                )?;
            }
        }
        if let Some(view) = &reaction.view {
            self.apply_view(host, view)?;
        }
        match reaction.autoplay {
            Some(AutoplayCommand::Start) => {
                if self.autoplay_timer.is_none() {
                    self.autoplay_timer = Some(host.set_interval(
                        TimerTask::Carousel {
                            widget: self.index,
                            timer: CarouselTimer::AutoplayTick,
                        },
                        self.autoplay_interval_ms,
                    ));
                }
                tracing::debug!(index = self.index, "carousel autoplay running");
            }
            Some(AutoplayCommand::Stop) => {
                if let Some(id) = self.autoplay_timer.take() {
                    host.clear_timer(id);
                }
                tracing::debug!(index = self.index, "carousel autoplay suspended");
            }
            None => {}
        }
        Ok(())
    }

    fn apply_view(&self, host: &mut Host, view: &CarouselView) -> Result<()> {
        if let Some(track) = self.track {
            host.dom.style_set(track, "transform", &view.transform())?;
        }
        let controls = [
            (self.previous, view.previous_disabled, view.previous_label),
            (self.next, view.next_disabled, view.next_label),
        ];
        for (control, disabled, label) in controls {
            let Some(control) = control else {
                continue;
            };
            let display = if view.navigation_enabled { "" } else { "none" };
            host.dom.style_set(control, "display", display)?;
            host.dom.set_disabled(control, disabled)?;
            host.dom.set_attr(control, "aria-label", label)?;
        }
        Ok(())
    }
}
