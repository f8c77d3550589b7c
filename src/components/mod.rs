//! Peripheral storefront behaviors and the routing table that connects DOM
//! listeners and timers to them.

pub(crate) mod cards;
pub(crate) mod forms;
pub(crate) mod header;
pub(crate) mod modal;
pub(crate) mod nav;
pub(crate) mod notify;
pub(crate) mod reveal;
pub(crate) mod tooltip;

use crate::carousel::widget::{self, CarouselInput, CarouselWidget};
use crate::events::EventState;
use crate::page::Host;
use crate::scheduler::TimerTask;
use crate::{Error, NodeId, Result};

/// Listener payload: which component reacts to an event.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Handler {
    Carousel { widget: usize, input: CarouselInput },
    Nav(nav::NavHandler),
    Scroll(header::ScrollHandler),
    Observe(reveal::ObserveHandler),
    Form(forms::FormHandler),
    NotificationClose(NodeId),
    Modal { modal: usize, input: modal::ModalInput },
    Card(cards::CardHandler),
    Tooltip(tooltip::TooltipHandler),
}

/// Every widget instance discovered on a page.
#[derive(Debug, Default)]
pub(crate) struct Widgets {
    pub(crate) carousels: Vec<CarouselWidget>,
    nav: nav::NavMenus,
    observer: reveal::Observer,
    forms: forms::FormValidators,
    pub(crate) modals: modal::ModalStack,
}

/// Discovers widgets in the parsed markup and wires their listeners and
/// start-up timers.
pub(crate) fn install(host: &mut Host, widgets: &mut Widgets) -> Result<()> {
    nav::install(host, &mut widgets.nav)?;
    header::install(host)?;
    reveal::install(host, &mut widgets.observer)?;
    forms::install(host, &mut widgets.forms)?;
    tooltip::install(host)?;
    cards::install(host)?;
    widget::install(host, &mut widgets.carousels)?;
    Ok(())
}

pub(crate) fn handle(
    host: &mut Host,
    widgets: &mut Widgets,
    handler: &Handler,
    event: &mut EventState,
) -> Result<()> {
    match handler {
        Handler::Carousel { widget, input } => {
            let carousel = widgets
                .carousels
                .get_mut(*widget)
                .ok_or_else(|| Error::Dom(format!("unknown carousel widget {widget}")))?;
            carousel.handle_input(host, *input, event)
        }
        Handler::Nav(handler) => nav::handle(host, &widgets.nav, *handler, event),
        Handler::Scroll(handler) => header::handle(host, *handler),
        Handler::Observe(handler) => reveal::handle(host, &mut widgets.observer, *handler, event),
        Handler::Form(handler) => forms::handle(host, &widgets.forms, *handler, event),
        Handler::NotificationClose(notification) => notify::dismiss(host, *notification),
        Handler::Modal { modal, input } => {
            modal::handle(host, &mut widgets.modals, *modal, *input, event)
        }
        Handler::Card(handler) => cards::handle(host, &mut widgets.modals, *handler, event),
        Handler::Tooltip(handler) => tooltip::handle(host, *handler, event),
    }
}

/// Runs a fired timer. Focus moves are only requested; the page applies them.
pub(crate) fn run_timer(host: &mut Host, widgets: &mut Widgets, task: &TimerTask) -> Result<()> {
    match task {
        TimerTask::Carousel { widget, timer } => {
            let carousel = widgets
                .carousels
                .get_mut(*widget)
                .ok_or_else(|| Error::Dom(format!("unknown carousel widget {widget}")))?;
            carousel.run_timer(host, *timer)
        }
        TimerTask::AddClass { node, class_name } => host.dom.class_add(*node, class_name),
        TimerTask::RemoveClass { node, class_name } => host.dom.class_remove(*node, class_name),
        TimerTask::DismissNotification(notification) => notify::dismiss(host, *notification),
        TimerTask::RemoveModal(modal) => modal::remove(host, &mut widgets.modals, *modal),
        TimerTask::Focus(node) => {
            host.request_focus(*node);
            Ok(())
        }
    }
}
