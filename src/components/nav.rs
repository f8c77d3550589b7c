use super::Handler;
use crate::events::EventState;
use crate::page::Host;
use crate::{NodeId, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavHandler {
    MobileToggle,
    MobileOutsideClick,
    MegaToggle(usize),
    MegaOutsideClick(usize),
    AnchorClick,
}

#[derive(Debug, Clone)]
struct MobileMenu {
    toggle: NodeId,
    menu: NodeId,
    container: Option<NodeId>,
}

#[derive(Debug, Clone)]
struct MegaMenu {
    item: NodeId,
    button: NodeId,
    panel: NodeId,
}

#[derive(Debug, Default)]
pub(crate) struct NavMenus {
    mobile: Option<MobileMenu>,
    mega: Vec<MegaMenu>,
}

pub(crate) fn install(host: &mut Host, menus: &mut NavMenus) -> Result<()> {
    let root = host.dom.root;
    let toggle = host.dom.query_selector(".nav__toggle")?;
    let menu = host.dom.query_selector(".nav__menu")?;
    if let (Some(toggle), Some(menu)) = (toggle, menu) {
        menus.mobile = Some(MobileMenu {
            toggle,
            menu,
            container: host.dom.query_selector(".nav__container")?,
        });
        host.listen(toggle, "click", Handler::Nav(NavHandler::MobileToggle));
        host.listen(root, "click", Handler::Nav(NavHandler::MobileOutsideClick));
    }

    for item in host.dom.query_selector_all(".nav__item--has-mega")? {
        let button = host.dom.query_selector_from(item, ".nav__link--dropdown")?;
        let panel = host.dom.query_selector_from(item, ".nav__mega-menu")?;
        let (Some(button), Some(panel)) = (button, panel) else {
            continue;
        };
        let index = menus.mega.len();
        menus.mega.push(MegaMenu {
            item,
            button,
            panel,
        });
        host.listen(button, "click", Handler::Nav(NavHandler::MegaToggle(index)));
        host.listen(root, "click", Handler::Nav(NavHandler::MegaOutsideClick(index)));
    }

    for anchor in host.dom.query_selector_all("a[href^=\"#\"]")? {
        host.listen(anchor, "click", Handler::Nav(NavHandler::AnchorClick));
    }
    Ok(())
}

pub(crate) fn handle(
    host: &mut Host,
    menus: &NavMenus,
    handler: NavHandler,
    event: &mut EventState,
) -> Result<()> {
    match handler {
        NavHandler::MobileToggle => {
            let Some(mobile) = &menus.mobile else {
                return Ok(());
            };
            let expanded = host.dom.attr(mobile.toggle, "aria-expanded").as_deref() == Some("true");
            set_mobile_open(host, mobile, !expanded)
        }
        NavHandler::MobileOutsideClick => {
            let Some(mobile) = &menus.mobile else {
                return Ok(());
            };
            // Without a container only the toggle and the menu count as inside.
            let inside = match mobile.container {
                Some(container) => host.dom.contains(container, event.target),
                None => {
                    host.dom.contains(mobile.toggle, event.target)
                        || host.dom.contains(mobile.menu, event.target)
                }
            };
            if inside {
                return Ok(());
            }
            set_mobile_open(host, mobile, false)
        }
        NavHandler::MegaToggle(index) => {
            let Some(mega) = menus.mega.get(index) else {
                return Ok(());
            };
            event.prevent_default();
            let expanded = host.dom.attr(mega.button, "aria-expanded").as_deref() == Some("true");
            host.dom.set_attr(
                mega.button,
                "aria-expanded",
                if expanded { "false" } else { "true" },
            )?;
            host.dom.class_toggle(mega.panel, "nav__mega-menu--active")?;
            Ok(())
        }
        NavHandler::MegaOutsideClick(index) => {
            let Some(mega) = menus.mega.get(index) else {
                return Ok(());
            };
            if host.dom.contains(mega.item, event.target) {
                return Ok(());
            }
            host.dom.set_attr(mega.button, "aria-expanded", "false")?;
            host.dom.class_remove(mega.panel, "nav__mega-menu--active")
        }
        NavHandler::AnchorClick => {
            let anchor = event.current_target;
            let Some(href) = host.dom.attr(anchor, "href") else {
                return Ok(());
            };
            if href == "#" {
                return Ok(());
            }
            // Fragments that are not valid selectors simply have no target.
            let Some(target) = host.dom.query_selector(&href).ok().flatten() else {
                return Ok(());
            };
            event.prevent_default();
            host.request_scroll_into_view(target);
            Ok(())
        }
    }
}

fn set_mobile_open(host: &mut Host, mobile: &MobileMenu, open: bool) -> Result<()> {
    host.dom.set_attr(
        mobile.toggle,
        "aria-expanded",
        if open { "true" } else { "false" },
    )?;
    if open {
        host.dom.class_add(mobile.menu, "nav__menu--active")?;
        host.dom.class_add(mobile.toggle, "nav__toggle--active")?;
    } else {
        host.dom.class_remove(mobile.menu, "nav__menu--active")?;
        host.dom.class_remove(mobile.toggle, "nav__toggle--active")?;
    }
    tracing::debug!(open, "mobile menu toggled");
    Ok(())
}
