use colored::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Where outcomes go: the rendering surface, the notification area and the
/// loading indicator.
pub trait OutcomeSink: Send + Sync {
    fn render_image(&self, url: &str);

    fn notify(&self, notification: Notification);

    fn set_pending(&self, _pending: bool) {}
}

/// Terminal front end: notifications on stderr, the image URL on stdout.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    show_colors: bool,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self { show_colors: true }
    }
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }
}

impl OutcomeSink for ConsoleSink {
    fn render_image(&self, url: &str) {
        println!("{}", url);
    }

    fn notify(&self, notification: Notification) {
        let line = match notification.kind {
            NotificationKind::Success => format!("✅ {}", notification.message),
            NotificationKind::Error => format!("❌ {}", notification.message),
        };
        if !self.show_colors {
            eprintln!("{}", line);
            return;
        }
        match notification.kind {
            NotificationKind::Success => eprintln!("{}", line.green().bold()),
            NotificationKind::Error => eprintln!("{}", line.red().bold()),
        }
    }

    fn set_pending(&self, pending: bool) {
        if !pending {
            return;
        }
        if self.show_colors {
            eprintln!("{}", "⏳ Generating...".bright_black());
        } else {
            eprintln!("⏳ Generating...");
        }
    }
}
