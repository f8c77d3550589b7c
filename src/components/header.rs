use super::Handler;
use crate::page::Host;
use crate::{NodeId, Result, format_px};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScrollHandler {
    Header(NodeId),
    Parallax(NodeId),
}

pub(crate) fn install(host: &mut Host) -> Result<()> {
    let root = host.dom.root;
    if let Some(header) = host.dom.query_selector(".header")? {
        host.listen(root, "scroll", Handler::Scroll(ScrollHandler::Header(header)));
    }
    if let Some(image) = host.dom.query_selector(".hero__img")? {
        host.listen(root, "scroll", Handler::Scroll(ScrollHandler::Parallax(image)));
    }
    Ok(())
}

pub(crate) fn handle(host: &mut Host, handler: ScrollHandler) -> Result<()> {
    match handler {
        ScrollHandler::Header(header) => {
            if host.scroll_y > host.config.header_scroll_threshold {
                host.dom.class_add(header, "header--scrolled")
            } else {
                host.dom.class_remove(header, "header--scrolled")
            }
        }
        ScrollHandler::Parallax(image) => {
            let shift = host.scroll_y * host.config.parallax_rate;
            host.dom.style_set(
                image,
                "transform",
                &format!("translateY({})", format_px(shift)),
            )
        }
    }
}
