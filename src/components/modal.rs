use super::Handler;
use crate::events::EventState;
use crate::page::Host;
use crate::scheduler::TimerTask;
use crate::{NodeId, Result};

const DESCRIPTION: &str = "Premium quality custom printed apparel with your unique design.";
const FOCUSABLE: &str =
    "button, [href], input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModalInput {
    Close,
    Escape,
    FocusTrap,
}

#[derive(Debug, Clone)]
struct ProductModal {
    root: NodeId,
    first_focusable: Option<NodeId>,
    last_focusable: Option<NodeId>,
    closing: bool,
}

/// Open product modals. Slots are never reused so indices held by listeners
/// and timers stay valid.
#[derive(Debug, Default)]
pub(crate) struct ModalStack {
    modals: Vec<Option<ProductModal>>,
}

pub(crate) fn open(
    host: &mut Host,
    stack: &mut ModalStack,
    title: &str,
    price: &str,
) -> Result<usize> {
    let index = stack.modals.len();
    let body = host.dom.body();
    let dom = &mut host.dom;

    let root = dom.create_element_with_class(body, "div", "product-modal");
    let overlay = dom.create_element_with_class(root, "div", "product-modal__overlay");
    let content = dom.create_element_with_class(root, "div", "product-modal__content");
    let close = dom.create_element_with_class(content, "button", "product-modal__close");
    dom.set_attr(close, "aria-label", "Close modal")?;
    dom.create_text(close, "\u{d7}".to_string());

    let modal_body = dom.create_element_with_class(content, "div", "product-modal__body");
    let heading = dom.create_element_with_class(modal_body, "h2", "product-modal__title");
    dom.create_text(heading, title.to_string());
    let price_node = dom.create_element_with_class(modal_body, "div", "product-modal__price");
    dom.create_text(price_node, price.to_string());
    let description =
        dom.create_element_with_class(modal_body, "p", "product-modal__description");
    dom.create_text(description, DESCRIPTION.to_string());

    let actions = dom.create_element_with_class(modal_body, "div", "product-modal__actions");
    for (class_name, label) in [
        ("btn btn--primary product-modal__btn", "Add to Cart"),
        ("btn btn--secondary product-modal__btn", "Customize Design"),
    ] {
        let button = dom.create_element_with_class(actions, "button", class_name);
        dom.create_text(button, label.to_string());
    }

    let focusable = dom.query_selector_all_from(root, FOCUSABLE)?;
    let modal = ProductModal {
        root,
        first_focusable: focusable.first().copied(),
        last_focusable: focusable.last().copied(),
        closing: false,
    };

    let handler = |input| Handler::Modal {
        modal: index,
        input,
    };
    let document = host.dom.root;
    host.listen(close, "click", handler(ModalInput::Close));
    host.listen(overlay, "click", handler(ModalInput::Close));
    host.listen(document, "keydown", handler(ModalInput::Escape));
    host.listen(root, "keydown", handler(ModalInput::FocusTrap));

    if let Some(first) = modal.first_focusable {
        let delay = host.config.modal_focus_delay_ms;
        host.set_timeout(TimerTask::Focus(first), delay);
    }

    stack.modals.push(Some(modal));
    tracing::info!(index, title, "product modal opened");
    Ok(index)
}

fn close(host: &mut Host, stack: &mut ModalStack, index: usize) -> Result<()> {
    let Some(Some(modal)) = stack.modals.get_mut(index) else {
        return Ok(());
    };
    if modal.closing {
        return Ok(());
    }
    modal.closing = true;
    host.dom.class_add(modal.root, "product-modal--closing")?;
    let delay = host.config.modal_close_delay_ms;
    host.set_timeout(TimerTask::RemoveModal(index), delay);
    Ok(())
}

/// Detaches a closed modal and drops its listeners, including the
/// document-level Escape handler.
pub(crate) fn remove(host: &mut Host, stack: &mut ModalStack, index: usize) -> Result<()> {
    let Some(removed) = stack.modals.get_mut(index).and_then(Option::take) else {
        return Ok(());
    };
    if host
        .active_element
        .is_some_and(|active| host.dom.contains(removed.root, active))
    {
        host.active_element = None;
    }
    host.dom.remove_node(removed.root)?;
    host.listeners
        .remove_where(|handler| matches!(handler, Handler::Modal { modal, .. } if *modal == index));
    tracing::info!(index, "product modal removed");
    Ok(())
}

pub(crate) fn handle(
    host: &mut Host,
    stack: &mut ModalStack,
    index: usize,
    input: ModalInput,
    event: &mut EventState,
) -> Result<()> {
    match input {
        ModalInput::Close => close(host, stack, index),
        ModalInput::Escape => {
            if event.key() == Some("Escape") {
                close(host, stack, index)?;
            }
            Ok(())
        }
        ModalInput::FocusTrap => {
            if event.key() != Some("Tab") {
                return Ok(());
            }
            let Some(Some(modal)) = stack.modals.get(index) else {
                return Ok(());
            };
            let (Some(first), Some(last)) = (modal.first_focusable, modal.last_focusable) else {
                return Ok(());
            };
            let active = host.active_element;
            if event.shift_key() {
                if active == Some(first) {
                    event.prevent_default();
                    host.request_focus(last);
                }
            } else if active == Some(last) {
                event.prevent_default();
                host.request_focus(first);
            }
            Ok(())
        }
    }
}
