//! Featured-products carousel.
//!
//! [`CarouselController`] is the rendering-free state machine: it tracks which
//! window of items is visible and answers every input with a [`Reaction`]
//! describing what the presentation should show. The DOM binding that owns the
//! track, the controls and the timers lives in `widget`.
//!
//! ```
//! use storefront_ui::{CarouselConfig, CarouselController, CarouselEvent};
//!
//! let mut carousel = CarouselController::new(5, &CarouselConfig::default())?;
//! let view = carousel.initialize(600.0);
//! assert_eq!(carousel.visible_count(), 2);
//! assert!(view.previous_disabled);
//!
//! let reaction = carousel.handle(CarouselEvent::Next);
//! assert_eq!(carousel.current_index(), 1);
//! assert_eq!(reaction.view.map(|view| view.transform()), Some("translateX(-300px)".to_string()));
//! # Ok::<(), storefront_ui::Error>(())
//! ```

mod autoplay;
pub(crate) mod widget;

pub use autoplay::{AutoplayCommand, AutoplayLatch, Suspension};

use crate::config::CarouselConfig;
use crate::{Result, format_px};

pub const PREVIOUS_LABEL: &str = "Previous products";
pub const PREVIOUS_DISABLED_LABEL: &str = "No previous products";
pub const NEXT_LABEL: &str = "Next products";
pub const NEXT_DISABLED_LABEL: &str = "No more products";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
}

impl NavKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            _ => None,
        }
    }
}

/// Every input the carousel reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselEvent {
    Next,
    Previous,
    Key(NavKey),
    DragStart { x: f64 },
    DragMove { x: f64 },
    DragEnd,
    Resize { viewport_width: f64 },
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    /// The autoplay start delay has elapsed.
    AutoplayArmed,
    AutoplayTick,
}

/// Settled presentation of the carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselView {
    pub offset_px: f64,
    /// `false` when every item fits; both controls are then hidden.
    pub navigation_enabled: bool,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    pub previous_label: &'static str,
    pub next_label: &'static str,
}

impl CarouselView {
    /// The track's `transform` value.
    pub fn transform(&self) -> String {
        format!("translateX({})", format_px(self.offset_px))
    }
}

/// What the presentation should do after an input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    pub view: Option<CarouselView>,
    /// Unclamped track offset while a drag is in progress.
    pub live_offset: Option<f64>,
    pub prevent_default: bool,
    pub autoplay: Option<AutoplayCommand>,
}

impl Reaction {
    fn with_view(view: CarouselView) -> Self {
        Self {
            view: Some(view),
            ..Self::default()
        }
    }

    fn with_autoplay(command: Option<AutoplayCommand>) -> Self {
        Self {
            autoplay: command,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    start_x: f64,
    current_x: f64,
}

impl DragState {
    fn delta(&self) -> f64 {
        self.start_x - self.current_x
    }
}

#[derive(Debug, Clone)]
pub struct CarouselController {
    item_count: usize,
    item_width: f64,
    swipe_threshold_ratio: f64,
    visible_count: usize,
    current_index: usize,
    drag: Option<DragState>,
    autoplay: AutoplayLatch,
}

impl CarouselController {
    pub fn new(item_count: usize, config: &CarouselConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            item_count,
            item_width: config.item_width,
            swipe_threshold_ratio: config.swipe_threshold_ratio,
            visible_count: 0,
            current_index: 0,
            drag: None,
            autoplay: AutoplayLatch::new(),
        })
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn item_width(&self) -> f64 {
        self.item_width
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Highest index that still shows a full window.
    pub fn max_index(&self) -> usize {
        self.item_count.saturating_sub(self.visible_count)
    }

    pub fn navigation_enabled(&self) -> bool {
        self.item_count > self.visible_count
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn autoplay(&self) -> &AutoplayLatch {
        &self.autoplay
    }

    fn visible_count_for(&self, viewport_width: f64) -> usize {
        let count = (viewport_width / self.item_width).floor();
        if count.is_finite() && count > 0.0 {
            count as usize
        } else {
            0
        }
    }

    pub fn initialize(&mut self, viewport_width: f64) -> CarouselView {
        self.visible_count = self.visible_count_for(viewport_width);
        self.current_index = 0;
        self.drag = None;
        tracing::debug!(
            items = self.item_count,
            visible = self.visible_count,
            navigation = self.navigation_enabled(),
            "carousel initialized"
        );
        self.render()
    }

    /// Steps one item forward. Returns whether the index moved.
    pub fn next(&mut self) -> bool {
        if self.current_index < self.max_index() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// Steps one item back. Returns whether the index moved.
    pub fn previous(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn render(&self) -> CarouselView {
        let navigation_enabled = self.navigation_enabled();
        let previous_disabled = !navigation_enabled || self.current_index == 0;
        let next_disabled = self.current_index >= self.max_index();
        CarouselView {
            offset_px: -(self.current_index as f64) * self.item_width,
            navigation_enabled,
            previous_disabled,
            next_disabled,
            previous_label: if previous_disabled {
                PREVIOUS_DISABLED_LABEL
            } else {
                PREVIOUS_LABEL
            },
            next_label: if next_disabled {
                NEXT_DISABLED_LABEL
            } else {
                NEXT_LABEL
            },
        }
    }

    /// Recomputes the window for a new viewport. Returns a view only when the
    /// number of visible items changed.
    pub fn on_resize(&mut self, viewport_width: f64) -> Option<CarouselView> {
        let visible_count = self.visible_count_for(viewport_width);
        if visible_count == self.visible_count {
            return None;
        }
        self.visible_count = visible_count;
        self.current_index = self.current_index.min(self.max_index());
        tracing::debug!(
            visible = self.visible_count,
            index = self.current_index,
            "carousel window resized"
        );
        Some(self.render())
    }

    /// Arrow keys step the window and always suppress the page scroll.
    pub fn on_key(&mut self, key: NavKey) -> Reaction {
        let moved = match key {
            NavKey::ArrowLeft => self.previous(),
            NavKey::ArrowRight => self.next(),
        };
        Reaction {
            view: moved.then(|| self.render()),
            prevent_default: true,
            ..Reaction::default()
        }
    }

    pub fn drag_start(&mut self, x: f64) -> Reaction {
        self.drag = Some(DragState {
            start_x: x,
            current_x: x,
        });
        Reaction::with_autoplay(self.autoplay.suspend(Suspension::Drag))
    }

    pub fn drag_move(&mut self, x: f64) -> Reaction {
        let Some(drag) = self.drag.as_mut() else {
            return Reaction::default();
        };
        drag.current_x = x;
        let delta = drag.delta();
        Reaction {
            live_offset: Some(-(self.current_index as f64) * self.item_width - delta),
            ..Reaction::default()
        }
    }

    pub fn drag_end(&mut self) -> Reaction {
        let Some(drag) = self.drag.take() else {
            return Reaction::default();
        };
        let delta = drag.delta();
        if delta.abs() > self.item_width * self.swipe_threshold_ratio {
            if delta > 0.0 {
                self.next();
            } else {
                self.previous();
            }
        }
        Reaction {
            view: Some(self.render()),
            autoplay: self.autoplay.resume(Suspension::Drag),
            ..Reaction::default()
        }
    }

    /// Advances one step, wrapping to the start once the last window is shown.
    pub fn autoplay_tick(&mut self) -> CarouselView {
        if self.current_index < self.max_index() {
            self.current_index += 1;
        } else {
            self.current_index = 0;
        }
        self.render()
    }

    pub fn handle(&mut self, event: CarouselEvent) -> Reaction {
        match event {
            CarouselEvent::Next => {
                if self.next() {
                    Reaction::with_view(self.render())
                } else {
                    Reaction::default()
                }
            }
            CarouselEvent::Previous => {
                if self.previous() {
                    Reaction::with_view(self.render())
                } else {
                    Reaction::default()
                }
            }
            CarouselEvent::Key(key) => self.on_key(key),
            CarouselEvent::DragStart { x } => self.drag_start(x),
            CarouselEvent::DragMove { x } => self.drag_move(x),
            CarouselEvent::DragEnd => self.drag_end(),
            CarouselEvent::Resize { viewport_width } => Reaction {
                view: self.on_resize(viewport_width),
                ..Reaction::default()
            },
            CarouselEvent::PointerEnter => {
                Reaction::with_autoplay(self.autoplay.suspend(Suspension::Hover))
            }
            CarouselEvent::PointerLeave => {
                Reaction::with_autoplay(self.autoplay.resume(Suspension::Hover))
            }
            CarouselEvent::FocusIn => {
                Reaction::with_autoplay(self.autoplay.suspend(Suspension::Focus))
            }
            CarouselEvent::FocusOut => {
                Reaction::with_autoplay(self.autoplay.resume(Suspension::Focus))
            }
            CarouselEvent::AutoplayArmed => Reaction::with_autoplay(self.autoplay.start()),
            CarouselEvent::AutoplayTick => {
                if !self.autoplay.is_running() {
                    return Reaction::default();
                }
                Reaction::with_view(self.autoplay_tick())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(items: usize, viewport_width: f64) -> Result<CarouselController> {
        let mut carousel = CarouselController::new(items, &CarouselConfig::default())?;
        carousel.initialize(viewport_width);
        Ok(carousel)
    }

    #[test]
    fn initialize_computes_window_and_disables_previous() -> Result<()> {
        let mut carousel = CarouselController::new(6, &CarouselConfig::default())?;
        let view = carousel.initialize(950.0);
        assert_eq!(carousel.visible_count(), 3);
        assert_eq!(carousel.current_index(), 0);
        assert!(view.navigation_enabled);
        assert!(view.previous_disabled);
        assert!(!view.next_disabled);
        assert_eq!(view.previous_label, "No previous products");
        assert_eq!(view.next_label, "Next products");
        assert_eq!(view.transform(), "translateX(0px)");
        Ok(())
    }

    #[test]
    fn next_saturates_at_last_window() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        for _ in 0..10 {
            carousel.next();
        }
        assert_eq!(carousel.current_index(), 3);
        let view = carousel.render();
        assert!(view.next_disabled);
        assert_eq!(view.next_label, "No more products");
        assert_eq!(view.offset_px, -900.0);
        assert_eq!(carousel.handle(CarouselEvent::Next), Reaction::default());
        Ok(())
    }

    #[test]
    fn previous_at_start_is_a_noop() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        assert!(!carousel.previous());
        assert_eq!(carousel.current_index(), 0);
        Ok(())
    }

    #[test]
    fn navigation_disabled_when_everything_fits() -> Result<()> {
        let mut carousel = carousel(3, 1200.0)?;
        let view = carousel.render();
        assert!(!view.navigation_enabled);
        assert!(view.previous_disabled && view.next_disabled);
        assert!(!carousel.next());
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.on_resize(1500.0), Some(carousel.render()));
        assert_eq!(carousel.current_index(), 0);
        Ok(())
    }

    #[test]
    fn narrow_viewport_shows_zero_items_and_still_navigates() -> Result<()> {
        let mut carousel = carousel(2, 120.0)?;
        assert_eq!(carousel.visible_count(), 0);
        assert_eq!(carousel.max_index(), 2);
        assert!(carousel.next());
        assert!(carousel.next());
        assert!(!carousel.next());
        Ok(())
    }

    #[test]
    fn resize_reclamps_index() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        carousel.next();
        carousel.next();
        carousel.next();
        assert_eq!(carousel.current_index(), 3);

        assert!(carousel.on_resize(300.0).is_some());
        assert_eq!(carousel.visible_count(), 1);
        assert_eq!(carousel.current_index(), 3);

        let view = carousel.on_resize(1200.0).expect("window changed");
        assert_eq!(carousel.current_index(), 1);
        assert_eq!(view.offset_px, -300.0);
        assert!(view.next_disabled);
        Ok(())
    }

    #[test]
    fn resize_without_window_change_renders_nothing() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        assert_eq!(carousel.on_resize(650.0), None);
        Ok(())
    }

    #[test]
    fn arrow_keys_step_and_prevent_scroll() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        let reaction = carousel.handle(CarouselEvent::Key(NavKey::ArrowRight));
        assert!(reaction.prevent_default);
        assert_eq!(carousel.current_index(), 1);
        assert!(reaction.view.is_some());

        carousel.handle(CarouselEvent::Key(NavKey::ArrowLeft));
        let reaction = carousel.handle(CarouselEvent::Key(NavKey::ArrowLeft));
        assert!(reaction.prevent_default);
        assert!(reaction.view.is_none());
        assert_eq!(carousel.current_index(), 0);
        Ok(())
    }

    #[test]
    fn drag_below_threshold_snaps_back() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        carousel.handle(CarouselEvent::DragStart { x: 500.0 });
        let live = carousel.handle(CarouselEvent::DragMove { x: 401.0 });
        assert_eq!(live.live_offset, Some(-99.0));
        let reaction = carousel.handle(CarouselEvent::DragEnd);
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(reaction.view.map(|view| view.offset_px), Some(0.0));
        assert!(!carousel.is_dragging());
        Ok(())
    }

    #[test]
    fn drag_past_threshold_steps_once() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        carousel.handle(CarouselEvent::DragStart { x: 500.0 });
        carousel.handle(CarouselEvent::DragMove { x: 100.0 });
        carousel.handle(CarouselEvent::DragEnd);
        assert_eq!(carousel.current_index(), 1);

        carousel.handle(CarouselEvent::DragStart { x: 100.0 });
        carousel.handle(CarouselEvent::DragMove { x: 250.0 });
        carousel.handle(CarouselEvent::DragEnd);
        assert_eq!(carousel.current_index(), 0);
        Ok(())
    }

    #[test]
    fn tap_without_move_does_not_navigate() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        carousel.handle(CarouselEvent::DragStart { x: 420.0 });
        carousel.handle(CarouselEvent::DragEnd);
        assert_eq!(carousel.current_index(), 0);
        Ok(())
    }

    #[test]
    fn drag_move_and_end_without_start_are_ignored() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        assert_eq!(
            carousel.handle(CarouselEvent::DragMove { x: 10.0 }),
            Reaction::default()
        );
        assert_eq!(carousel.handle(CarouselEvent::DragEnd), Reaction::default());
        Ok(())
    }

    #[test]
    fn autoplay_wraps_to_start_from_last_window() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        carousel.next();
        carousel.next();
        carousel.next();
        let view = carousel.autoplay_tick();
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(view.offset_px, 0.0);
        Ok(())
    }

    #[test]
    fn autoplay_ticks_are_ignored_until_armed() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        assert_eq!(carousel.handle(CarouselEvent::AutoplayTick), Reaction::default());
        let armed = carousel.handle(CarouselEvent::AutoplayArmed);
        assert_eq!(armed.autoplay, Some(AutoplayCommand::Start));
        carousel.handle(CarouselEvent::AutoplayTick);
        assert_eq!(carousel.current_index(), 1);
        Ok(())
    }

    #[test]
    fn hover_focus_and_drag_suspend_autoplay() -> Result<()> {
        let mut carousel = carousel(5, 600.0)?;
        carousel.handle(CarouselEvent::AutoplayArmed);

        let enter = carousel.handle(CarouselEvent::PointerEnter);
        assert_eq!(enter.autoplay, Some(AutoplayCommand::Stop));
        assert_eq!(carousel.handle(CarouselEvent::FocusIn).autoplay, None);
        assert_eq!(carousel.handle(CarouselEvent::PointerLeave).autoplay, None);
        let out = carousel.handle(CarouselEvent::FocusOut);
        assert_eq!(out.autoplay, Some(AutoplayCommand::Start));

        let start = carousel.handle(CarouselEvent::DragStart { x: 0.0 });
        assert_eq!(start.autoplay, Some(AutoplayCommand::Stop));
        let end = carousel.handle(CarouselEvent::DragEnd);
        assert_eq!(end.autoplay, Some(AutoplayCommand::Start));
        Ok(())
    }

    #[test]
    fn empty_carousel_initializes() -> Result<()> {
        let mut carousel = carousel(0, 600.0)?;
        assert!(!carousel.navigation_enabled());
        assert_eq!(carousel.autoplay_tick().offset_px, 0.0);
        Ok(())
    }

    #[test]
    fn custom_item_width_drives_window() -> Result<()> {
        let config = CarouselConfig {
            item_width: 250.0,
            ..CarouselConfig::default()
        };
        let mut carousel = CarouselController::new(6, &config)?;
        carousel.initialize(1000.0);
        assert_eq!(carousel.visible_count(), 4);
        carousel.next();
        assert_eq!(carousel.render().transform(), "translateX(-250px)");
        Ok(())
    }
}
