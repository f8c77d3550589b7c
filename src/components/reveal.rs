use std::collections::HashSet;

use super::Handler;
use crate::events::EventState;
use crate::page::Host;
use crate::{NodeId, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObserveHandler {
    Reveal,
    LazyImage,
}

/// Lazy images still waiting for their first intersection.
#[derive(Debug, Default)]
pub(crate) struct Observer {
    pending_images: HashSet<NodeId>,
}

pub(crate) fn install(host: &mut Host, observer: &mut Observer) -> Result<()> {
    for node in host.dom.query_selector_all(".reveal")? {
        host.listen(node, "intersect", Handler::Observe(ObserveHandler::Reveal));
    }
    for image in host.dom.query_selector_all("img[loading=\"lazy\"]")? {
        observer.pending_images.insert(image);
        host.listen(image, "intersect", Handler::Observe(ObserveHandler::LazyImage));
    }
    Ok(())
}

pub(crate) fn handle(
    host: &mut Host,
    observer: &mut Observer,
    handler: ObserveHandler,
    event: &EventState,
) -> Result<()> {
    let node = event.current_target;
    match handler {
        ObserveHandler::Reveal => host.dom.class_add(node, "active"),
        ObserveHandler::LazyImage => {
            if !observer.pending_images.remove(&node) {
                return Ok(());
            }
            if let Some(src) = host.dom.attr(node, "data-src") {
                host.dom.set_attr(node, "src", &src)?;
            }
            host.dom.class_remove(node, "lazy")?;
            tracing::debug!(node = node.0, "lazy image loaded");
            Ok(())
        }
    }
}
