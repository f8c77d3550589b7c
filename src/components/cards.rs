use super::Handler;
use super::modal::{self, ModalStack};
use crate::events::EventState;
use crate::page::Host;
use crate::scheduler::TimerTask;
use crate::{NodeId, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CardKind {
    Product,
    Category,
}

impl CardKind {
    fn selector(self) -> &'static str {
        match self {
            Self::Product => ".product-card",
            Self::Category => ".category-card",
        }
    }

    fn entered_class(self) -> &'static str {
        match self {
            Self::Product => "product-card--entered",
            Self::Category => "category-card--entered",
        }
    }

    fn hover_class(self) -> &'static str {
        match self {
            Self::Product => "product-card--hover",
            Self::Category => "category-card--hover",
        }
    }

    fn image_selector(self) -> &'static str {
        match self {
            Self::Product => ".product-card__img",
            Self::Category => ".category-card__img",
        }
    }

    fn hover_scale(self) -> &'static str {
        match self {
            Self::Product => "scale(1.1)",
            Self::Category => "scale(1.05)",
        }
    }

    fn stagger_ms(self) -> i64 {
        match self {
            Self::Product => 100,
            Self::Category => 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CardHandler {
    Enter(CardKind),
    Leave(CardKind),
    QuickView(NodeId),
    CtaClick,
}

const HERO_STEPS: [(&str, &str, i64); 3] = [
    (".hero__title", "hero__title--animate", 300),
    (".hero__subtitle", "hero__subtitle--animate", 600),
    (".hero__actions", "hero__actions--animate", 900),
];

pub(crate) fn install(host: &mut Host) -> Result<()> {
    if let Some(hero) = host.dom.query_selector(".hero")? {
        for (selector, class_name, delay) in HERO_STEPS {
            if let Some(node) = host.dom.query_selector_from(hero, selector)? {
                host.set_timeout(TimerTask::AddClass { node, class_name }, delay);
            }
        }
    }

    for kind in [CardKind::Category, CardKind::Product] {
        for (position, card) in host
            .dom
            .query_selector_all(kind.selector())?
            .into_iter()
            .enumerate()
        {
            host.set_timeout(
                TimerTask::AddClass {
                    node: card,
                    class_name: kind.entered_class(),
                },
                kind.stagger_ms() * position as i64,
            );
            host.listen(card, "mouseenter", Handler::Card(CardHandler::Enter(kind)));
            host.listen(card, "mouseleave", Handler::Card(CardHandler::Leave(kind)));
            if kind == CardKind::Product {
                if let Some(button) = host.dom.query_selector_from(card, ".product-card__btn")? {
                    host.listen(button, "click", Handler::Card(CardHandler::QuickView(card)));
                }
            }
        }
    }

    if let Some(cta) = host.dom.query_selector(".bulk-cta")? {
        if let Some(button) = host.dom.query_selector_from(cta, ".btn")? {
            host.listen(button, "click", Handler::Card(CardHandler::CtaClick));
        }
    }
    Ok(())
}

pub(crate) fn handle(
    host: &mut Host,
    modals: &mut ModalStack,
    handler: CardHandler,
    event: &mut EventState,
) -> Result<()> {
    match handler {
        CardHandler::Enter(kind) => set_hover(host, event.current_target, kind, true),
        CardHandler::Leave(kind) => set_hover(host, event.current_target, kind, false),
        CardHandler::QuickView(card) => {
            event.prevent_default();
            let title = child_text(host, card, ".product-card__title")?;
            let price = child_text(host, card, ".product-card__price")?;
            modal::open(host, modals, &title, &price)?;
            Ok(())
        }
        CardHandler::CtaClick => {
            let button = event.current_target;
            host.dom.class_add(button, "btn--clicked")?;
            let pulse = host.config.cta_pulse_ms;
            host.set_timeout(
                TimerTask::RemoveClass {
                    node: button,
                    class_name: "btn--clicked",
                },
                pulse,
            );
            Ok(())
        }
    }
}

fn set_hover(host: &mut Host, card: NodeId, kind: CardKind, hovered: bool) -> Result<()> {
    if hovered {
        host.dom.class_add(card, kind.hover_class())?;
    } else {
        host.dom.class_remove(card, kind.hover_class())?;
    }
    if let Some(image) = host.dom.query_selector_from(card, kind.image_selector())? {
        let scale = if hovered { kind.hover_scale() } else { "scale(1)" };
        host.dom.style_set(image, "transform", scale)?;
    }
    Ok(())
}

fn child_text(host: &Host, card: NodeId, selector: &str) -> Result<String> {
    Ok(host
        .dom
        .query_selector_from(card, selector)?
        .map(|node| host.dom.text_content(node).trim().to_string())
        .unwrap_or_default())
}
