//! Deterministic storefront page interactivity.
//!
//! A [`Page`] parses fully rendered storefront markup, discovers the interactive
//! widgets on it (featured-products carousel, navigation menus, forms, product
//! cards, tooltips) and drives them from user actions and a virtual clock:
//!
//! ```
//! use storefront_ui::Page;
//!
//! let html = r#"
//!   <div class="featured__carousel">
//!     <button class="featured__nav--prev">Prev</button>
//!     <div class="featured__track">
//!       <div class="product-card"></div><div class="product-card"></div>
//!       <div class="product-card"></div><div class="product-card"></div>
//!     </div>
//!     <button class="featured__nav--next">Next</button>
//!   </div>
//! "#;
//!
//! let mut page = Page::from_html(html)?;
//! page.resize(600)?;
//! page.advance_time(100)?;
//! page.click(".featured__nav--next")?;
//! page.assert_style(".featured__track", "transform", "translateX(-300px)")?;
//! # Ok::<(), storefront_ui::Error>(())
//! ```
//!
//! The carousel state machine in [`carousel`] has no DOM dependency and can be
//! driven directly with [`CarouselEvent`]s.

pub mod carousel;
mod components;
pub mod config;
mod dom;
mod events;
mod html;
mod page;
mod scheduler;
mod selector;
mod trace;

pub use carousel::{
    AutoplayCommand, AutoplayLatch, CarouselController, CarouselEvent, CarouselView, NavKey,
    Reaction, Suspension,
};
pub use components::notify::NotificationKind;
pub use config::{CarouselConfig, PageConfig};
pub use page::Page;
pub use scheduler::PendingTimer;

pub(crate) use dom::{Dom, NodeId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },
    #[error("timer error: {0}")]
    Timer(String),
    #[error("json error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

/// Formats a pixel amount the way inline styles carry it: integral values
/// without a fraction, `-0` folded to `0`.
fn format_px(value: f64) -> String {
    if value == 0.0 {
        return "0px".to_string();
    }
    let mut out = format!("{value:.4}");
    while out.contains('.') && out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    format!("{out}px")
}
