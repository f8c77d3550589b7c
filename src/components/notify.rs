use std::fmt;

use super::Handler;
use crate::page::Host;
use crate::scheduler::TimerTask;
use crate::{NodeId, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Info,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appends a notification to `body` and schedules its removal. The message is
/// inserted as text, never parsed as markup.
pub(crate) fn show(host: &mut Host, message: &str, kind: NotificationKind) -> Result<NodeId> {
    let body = host.dom.body();
    let notification = host.dom.create_element_with_class(
        body,
        "div",
        &format!("notification notification--{kind}"),
    );
    let content = host
        .dom
        .create_element_with_class(notification, "div", "notification__content");
    let text = host
        .dom
        .create_element_with_class(content, "span", "notification__message");
    host.dom.create_text(text, message.to_string());
    let close = host
        .dom
        .create_element_with_class(content, "button", "notification__close");
    host.dom.set_attr(close, "aria-label", "Close notification")?;
    host.dom.create_text(close, "\u{d7}".to_string());

    host.listen(close, "click", Handler::NotificationClose(notification));
    let timeout = host.config.notification_timeout_ms;
    host.set_timeout(TimerTask::DismissNotification(notification), timeout);
    tracing::info!(%kind, message, "notification shown");
    Ok(notification)
}

/// Removes a notification if it is still attached.
pub(crate) fn dismiss(host: &mut Host, notification: NodeId) -> Result<()> {
    if host.dom.parent(notification).is_none() {
        return Ok(());
    }
    host.dom.remove_node(notification)?;
    host.listeners
        .remove_where(|handler| *handler == Handler::NotificationClose(notification));
    tracing::debug!(node = notification.0, "notification dismissed");
    Ok(())
}
