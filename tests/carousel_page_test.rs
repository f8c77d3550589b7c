use storefront_ui::{Error, Page, PageConfig, Result};

fn carousel_html(items: usize) -> String {
    let cards = (0..items)
        .map(|idx| {
            format!(
                "<div class=\"product-card\" id=\"card-{idx}\"><img class=\"product-card__img\" src=\"{idx}.png\"></div>"
            )
        })
        .collect::<String>();
    format!(
        r#"<body>
          <div class="featured__carousel" id="featured">
            <button class="featured__nav--prev" id="prev">Prev</button>
            <div class="featured__track" id="track">{cards}</div>
            <button class="featured__nav--next" id="next">Next</button>
          </div>
          <a href="/elsewhere" id="outside">Elsewhere</a>
        </body>"#
    )
}

fn page_at_width(items: usize, viewport_width: u32) -> Result<Page> {
    let config = PageConfig {
        viewport_width,
        ..PageConfig::default()
    };
    Page::from_html_with_config(&carousel_html(items), config)
}

fn index(page: &Page) -> Result<usize> {
    page.carousel(0)
        .map(|carousel| carousel.current_index())
        .ok_or_else(|| Error::SelectorNotFound(".featured__carousel".into()))
}

#[test]
fn initial_render_disables_previous_and_labels_controls() -> Result<()> {
    let page = page_at_width(5, 600)?;
    page.assert_style("#track", "transform", "translateX(0px)")?;
    page.assert_attr("#prev", "disabled", Some("true"))?;
    page.assert_attr("#prev", "aria-label", Some("No previous products"))?;
    page.assert_attr("#next", "disabled", None)?;
    page.assert_attr("#next", "aria-label", Some("Next products"))?;
    page.assert_style("#next", "display", "")?;
    Ok(())
}

#[test]
fn next_clicks_saturate_at_last_window() -> Result<()> {
    let mut page = page_at_width(5, 600)?;
    for _ in 0..3 {
        page.click("#next")?;
    }
    assert_eq!(index(&page)?, 3);
    page.assert_style("#track", "transform", "translateX(-900px)")?;
    page.assert_attr("#next", "disabled", Some("true"))?;
    page.assert_attr("#next", "aria-label", Some("No more products"))?;

    // Disabled controls ignore further clicks.
    page.click("#next")?;
    assert_eq!(index(&page)?, 3);

    page.click("#prev")?;
    assert_eq!(index(&page)?, 2);
    page.assert_attr("#prev", "aria-label", Some("Previous products"))?;
    page.assert_attr("#next", "disabled", None)?;
    Ok(())
}

#[test]
fn controls_hidden_when_every_item_fits() -> Result<()> {
    let mut page = page_at_width(3, 1200)?;
    page.assert_style("#prev", "display", "none")?;
    page.assert_style("#next", "display", "none")?;
    page.assert_attr("#next", "disabled", Some("true"))?;

    page.resize(1500)?;
    page.advance_time(100)?;
    page.assert_style("#next", "display", "none")?;
    assert_eq!(index(&page)?, 0);

    page.resize(600)?;
    page.advance_time(100)?;
    page.assert_style("#next", "display", "")?;
    page.assert_attr("#next", "disabled", None)?;
    Ok(())
}

#[test]
fn resize_is_debounced_and_reclamps() -> Result<()> {
    let mut page = page_at_width(5, 600)?;
    page.click("#next")?;
    page.click("#next")?;
    page.click("#next")?;

    page.resize(900)?;
    page.advance_time(50)?;
    page.resize(1200)?;
    let debounces = page
        .pending_timers()
        .iter()
        .filter(|timer| timer.due_at == 150)
        .count();
    assert_eq!(debounces, 1, "second resize should replace the first debounce");

    page.advance_time(60)?;
    assert_eq!(index(&page)?, 3);

    page.advance_time(40)?;
    assert_eq!(page.carousel(0).map(|c| c.visible_count()), Some(4));
    assert_eq!(index(&page)?, 1);
    page.assert_style("#track", "transform", "translateX(-300px)")?;
    page.assert_attr("#next", "disabled", Some("true"))?;
    Ok(())
}

#[test]
fn arrow_keys_navigate_only_with_focus_inside() -> Result<()> {
    let mut page = page_at_width(5, 600)?;
    assert!(page.press_key("ArrowRight")?);
    assert_eq!(index(&page)?, 0);

    page.focus("#next")?;
    assert!(!page.press_key("ArrowRight")?);
    assert!(!page.press_key("ArrowRight")?);
    assert_eq!(index(&page)?, 2);
    assert!(!page.press_key("ArrowLeft")?);
    assert_eq!(index(&page)?, 1);
    assert!(page.press_key("Enter")?);
    Ok(())
}

#[test]
fn autoplay_starts_after_delay_and_wraps() -> Result<()> {
    let mut page = page_at_width(5, 600)?;
    page.advance_time(7_999)?;
    assert_eq!(index(&page)?, 0);
    assert!(page.carousel(0).is_some_and(|c| c.autoplay().is_running()));

    page.advance_time(1)?;
    assert_eq!(index(&page)?, 1);

    page.advance_time_to(18_000)?;
    assert_eq!(index(&page)?, 3);

    page.advance_time_to(23_000)?;
    assert_eq!(index(&page)?, 0);
    page.assert_style("#track", "transform", "translateX(0px)")?;
    Ok(())
}

#[test]
fn hover_suspends_autoplay_until_pointer_leaves() -> Result<()> {
    let mut page = page_at_width(5, 600)?;
    page.advance_time(4_000)?;
    page.hover("#card-1 img")?;
    assert!(page.has_class("#card-1", "product-card--hover")?);
    assert!(
        page.pending_timers()
            .iter()
            .all(|timer| timer.interval_ms.is_none())
    );

    page.advance_time(20_000)?;
    assert_eq!(index(&page)?, 0);

    page.hover("#outside")?;
    assert!(!page.has_class("#card-1", "product-card--hover")?);
    page.assert_style("#card-1 img", "transform", "scale(1)")?;
    page.advance_time(5_000)?;
    assert_eq!(index(&page)?, 1);
    Ok(())
}

#[test]
fn focus_inside_suspends_autoplay_and_moving_within_keeps_it_suspended() -> Result<()> {
    let mut page = page_at_width(5, 600)?;
    page.focus("#next")?;
    page.advance_time(10_000)?;
    assert_eq!(index(&page)?, 0);
    assert!(page.carousel(0).is_some_and(|c| c.autoplay().is_suspended()));

    page.click("#next")?;
    page.focus("#prev")?;
    page.advance_time(10_000)?;
    assert_eq!(index(&page)?, 1);

    page.focus("#outside")?;
    page.advance_time(5_000)?;
    assert_eq!(index(&page)?, 2);
    Ok(())
}

#[test]
fn swipe_commits_one_step_past_a_third_of_an_item() -> Result<()> {
    let mut page = page_at_width(5, 600)?;
    page.touch_start("#track", 500.0)?;
    page.touch_move("#track", 450.0)?;
    page.assert_style("#track", "transform", "translateX(-50px)")?;
    page.touch_end("#track")?;
    assert_eq!(index(&page)?, 0);
    page.assert_style("#track", "transform", "translateX(0px)")?;

    page.touch_start("#track", 500.0)?;
    page.touch_move("#track", 100.0)?;
    page.touch_end("#track")?;
    assert_eq!(index(&page)?, 1);

    page.touch_start("#track", 100.0)?;
    page.touch_move("#track", 300.0)?;
    page.assert_style("#track", "transform", "translateX(-100px)")?;
    page.touch_end("#track")?;
    assert_eq!(index(&page)?, 0);
    Ok(())
}

#[test]
fn swipe_suspends_autoplay_while_dragging() -> Result<()> {
    let mut page = page_at_width(5, 600)?;
    page.advance_time(3_000)?;
    page.touch_start("#track", 400.0)?;
    page.advance_time(10_000)?;
    assert_eq!(index(&page)?, 0);
    page.touch_end("#track")?;
    page.advance_time(5_000)?;
    assert_eq!(index(&page)?, 1);
    Ok(())
}

#[test]
fn data_item_width_overrides_configured_width() -> Result<()> {
    let html = r#"
      <div class="featured__carousel" data-item-width="200">
        <div class="featured__track" id="track">
          <div class="product-card"></div><div class="product-card"></div>
          <div class="product-card"></div><div class="product-card"></div>
        </div>
        <button class="featured__nav--next" id="next">Next</button>
      </div>
    "#;
    let config = PageConfig {
        viewport_width: 400,
        ..PageConfig::default()
    };
    let mut page = Page::from_html_with_config(html, config)?;
    assert_eq!(page.carousel(0).map(|c| c.visible_count()), Some(2));
    page.click("#next")?;
    page.assert_style("#track", "transform", "translateX(-200px)")?;
    Ok(())
}

#[test]
fn invalid_item_width_attribute_falls_back_to_configured_width() -> Result<()> {
    let html = r#"
      <div class="featured__carousel" data-item-width="280 px">
        <div class="featured__track" id="track">
          <div class="product-card"></div><div class="product-card"></div>
          <div class="product-card"></div><div class="product-card"></div>
        </div>
        <button class="featured__nav--next" id="next">Next</button>
      </div>
      <form id="signup">
        <input id="email" name="email" required>
        <button type="submit">Join</button>
      </form>
    "#;
    let config = PageConfig {
        viewport_width: 600,
        ..PageConfig::default()
    };
    let mut page = Page::from_html_with_config(html, config)?;
    assert_eq!(page.carousel(0).map(|c| c.item_width()), Some(300.0));
    page.click("#next")?;
    page.assert_style("#track", "transform", "translateX(-300px)")?;

    // The rest of the page is still wired up.
    assert!(!page.submit("#signup")?);
    page.assert_class("#email", "form__input--error", true)?;
    page.assert_exists(".notification--error")?;
    Ok(())
}

#[test]
fn carousel_without_track_or_controls_still_initializes() -> Result<()> {
    let html = r#"<div class="featured__carousel"><div class="product-card"></div></div>"#;
    let mut page = Page::from_html(html)?;
    assert_eq!(page.carousel_count(), 1);
    page.resize(100)?;
    page.advance_time(10_000)?;
    assert_eq!(page.carousel(0).map(|c| c.item_count()), Some(1));
    Ok(())
}

#[test]
fn autoplay_can_be_disabled_from_config() -> Result<()> {
    let config = PageConfig::from_json(
        r#"{ "viewport_width": 600, "carousel": { "autoplay": false } }"#,
    )?;
    let mut page = Page::from_html_with_config(&carousel_html(5), config)?;
    assert!(page.pending_timers().iter().all(|timer| timer.due_at != 3_000));
    page.advance_time(30_000)?;
    assert_eq!(index(&page)?, 0);
    Ok(())
}

#[test]
fn each_carousel_keeps_its_own_state() -> Result<()> {
    let html = r#"
      <div class="featured__carousel">
        <div class="featured__track" id="track-a">
          <div class="product-card"></div><div class="product-card"></div>
          <div class="product-card"></div>
        </div>
        <button class="featured__nav--next" id="next-a">Next</button>
      </div>
      <div class="featured__carousel">
        <div class="featured__track" id="track-b">
          <div class="product-card"></div><div class="product-card"></div>
          <div class="product-card"></div><div class="product-card"></div>
          <div class="product-card"></div>
        </div>
        <button class="featured__nav--next" id="next-b">Next</button>
      </div>
    "#;
    let config = PageConfig {
        viewport_width: 600,
        ..PageConfig::default()
    };
    let mut page = Page::from_html_with_config(html, config)?;
    assert_eq!(page.carousel_count(), 2);
    page.click("#next-b")?;
    page.click("#next-b")?;
    assert_eq!(page.carousel(0).map(|c| c.current_index()), Some(0));
    assert_eq!(page.carousel(1).map(|c| c.current_index()), Some(2));
    page.assert_style("#track-a", "transform", "translateX(0px)")?;
    page.assert_style("#track-b", "transform", "translateX(-600px)")?;
    Ok(())
}
