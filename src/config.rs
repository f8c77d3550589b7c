//! Page and widget configuration.
//!
//! Defaults mirror the storefront's shipped behavior. Every field can be
//! overridden from JSON (missing fields keep their default):
//!
//! ```
//! use storefront_ui::PageConfig;
//!
//! let config = PageConfig::from_json(r#"{ "viewport_width": 900, "carousel": { "item_width": 250 } }"#)?;
//! assert_eq!(config.viewport_width, 900);
//! assert_eq!(config.carousel.item_width, 250.0);
//! assert_eq!(config.carousel.autoplay_interval_ms, 5_000);
//! # Ok::<(), storefront_ui::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Carousel geometry and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// On-screen footprint of one item including spacing, in px.
    pub item_width: f64,
    /// Fraction of `item_width` a swipe must exceed to count as a step.
    pub swipe_threshold_ratio: f64,
    pub resize_debounce_ms: i64,
    pub autoplay: bool,
    pub autoplay_start_delay_ms: i64,
    pub autoplay_interval_ms: i64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            item_width: 300.0,
            swipe_threshold_ratio: 1.0 / 3.0,
            resize_debounce_ms: 100,
            autoplay: true,
            autoplay_start_delay_ms: 3_000,
            autoplay_interval_ms: 5_000,
        }
    }
}

impl CarouselConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.item_width.is_finite() || self.item_width <= 0.0 {
            return Err(Error::Config(format!(
                "carousel item_width must be a positive number, got {}",
                self.item_width
            )));
        }
        if !self.swipe_threshold_ratio.is_finite() || self.swipe_threshold_ratio < 0.0 {
            return Err(Error::Config(format!(
                "carousel swipe_threshold_ratio must be non-negative, got {}",
                self.swipe_threshold_ratio
            )));
        }
        if self.resize_debounce_ms < 0 || self.autoplay_start_delay_ms < 0 {
            return Err(Error::Config("carousel delays must be non-negative".into()));
        }
        if self.autoplay_interval_ms <= 0 {
            return Err(Error::Config(format!(
                "carousel autoplay_interval_ms must be positive, got {}",
                self.autoplay_interval_ms
            )));
        }
        Ok(())
    }

    /// Applies a container's `data-item-width` override.
    pub(crate) fn with_item_width_attr(&self, raw: Option<&str>) -> Result<Self> {
        let mut config = self.clone();
        if let Some(raw) = raw {
            config.item_width = raw.trim().trim_end_matches("px").parse::<f64>().map_err(|_| {
                Error::Config(format!("invalid data-item-width value: {raw:?}"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Host and peripheral component configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Initial viewport width in px, before any `Page::resize`.
    pub viewport_width: u32,
    pub carousel: CarouselConfig,
    /// Scroll offset past which the header gets `header--scrolled`.
    pub header_scroll_threshold: f64,
    /// Multiplier from scroll offset to the hero image's vertical translation.
    pub parallax_rate: f64,
    pub notification_timeout_ms: i64,
    pub modal_close_delay_ms: i64,
    pub modal_focus_delay_ms: i64,
    pub cta_pulse_ms: i64,
    /// Upper bound on timer callbacks a single `flush`/`advance_time` may run.
    pub timer_step_limit: usize,
    pub trace: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1_200,
            carousel: CarouselConfig::default(),
            header_scroll_threshold: 100.0,
            parallax_rate: -0.5,
            notification_timeout_ms: 5_000,
            modal_close_delay_ms: 300,
            modal_focus_delay_ms: 100,
            cta_pulse_ms: 200,
            timer_step_limit: 10_000,
            trace: false,
        }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.carousel.validate()?;
        if self.timer_step_limit == 0 {
            return Err(Error::Config("timer_step_limit requires at least 1 step".into()));
        }
        if self.notification_timeout_ms < 0
            || self.modal_close_delay_ms < 0
            || self.modal_focus_delay_ms < 0
            || self.cta_pulse_ms < 0
        {
            return Err(Error::Config("page delays must be non-negative".into()));
        }
        if !self.header_scroll_threshold.is_finite() || !self.parallax_rate.is_finite() {
            return Err(Error::Config("scroll threshold and parallax rate must be finite".into()));
        }
        Ok(())
    }
}
