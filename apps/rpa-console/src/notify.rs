//! Toast notifications.

use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

/// A short, transient message for the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Where toasts go. The CLI prints them, tests record them.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast {
            kind: ToastKind::Success,
            message: message.to_string(),
        });
    }

    fn warning(&self, message: &str) {
        self.notify(Toast {
            kind: ToastKind::Warning,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Toast {
            kind: ToastKind::Error,
            message: message.to_string(),
        });
    }
}

/// Records every toast in order.
#[derive(Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.toasts().into_iter().map(|t| t.message).collect()
    }

    /// True if a toast of `kind` with exactly `message` was shown.
    pub fn contains(&self, kind: ToastKind, message: &str) -> bool {
        self.toasts()
            .iter()
            .any(|t| t.kind == kind && t.message == message)
    }

    pub fn clear(&self) {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(toast);
    }
}

/// Prints toasts to the terminal: successes to stdout, the rest to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => println!("✓ {}", toast.message),
            ToastKind::Warning => eprintln!("! {}", toast.message),
            ToastKind::Error => eprintln!("✗ {}", toast.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_order_and_kind() {
        let log = ToastLog::new();
        log.success("Saved");
        log.warning("Only 4 more images can be added");
        log.error("Failed");

        assert_eq!(
            log.messages(),
            vec!["Saved", "Only 4 more images can be added", "Failed"]
        );
        assert!(log.contains(ToastKind::Warning, "Only 4 more images can be added"));
        assert!(!log.contains(ToastKind::Error, "Saved"));

        log.clear();
        assert!(log.toasts().is_empty());
    }
}
