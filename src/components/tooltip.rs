use super::Handler;
use crate::events::EventState;
use crate::page::Host;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TooltipHandler {
    Show,
    Hide,
}

pub(crate) fn install(host: &mut Host) -> Result<()> {
    for node in host.dom.query_selector_all("[data-tooltip]")? {
        host.listen(node, "mouseenter", Handler::Tooltip(TooltipHandler::Show));
        host.listen(node, "mouseleave", Handler::Tooltip(TooltipHandler::Hide));
    }
    Ok(())
}

pub(crate) fn handle(host: &mut Host, handler: TooltipHandler, event: &EventState) -> Result<()> {
    match handler {
        TooltipHandler::Show => {
            let text = host
                .dom
                .attr(event.current_target, "data-tooltip")
                .unwrap_or_default();
            let body = host.dom.body();
            let tooltip = host.dom.create_element_with_class(body, "div", "tooltip");
            host.dom.create_text(tooltip, text);
            Ok(())
        }
        TooltipHandler::Hide => {
            if let Some(tooltip) = host.dom.query_selector(".tooltip")? {
                host.dom.remove_node(tooltip)?;
            }
            Ok(())
        }
    }
}
