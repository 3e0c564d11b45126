use std::sync::{Arc, Once};

use metals_config::{init_tracing, MetalsConfig};
use metals_core::sanitize_json_error_message;

pub type PanicNotifier = Arc<dyn Fn(&str) + Send + Sync + 'static>;

static PANIC_HOOK: Once = Once::new();

/// Initialize structured logging and install a process-wide panic hook.
///
/// The hook records panics through `tracing` (with quoted values redacted)
/// and forwards a short message to `notifier`. stdout carries the DAP stream,
/// so nothing here writes to it.
pub fn init(config: &MetalsConfig, notifier: PanicNotifier) {
    init_tracing(&config.logging);
    PANIC_HOOK.call_once(|| install_panic_hook(notifier));
}

fn install_panic_hook(notifier: PanicNotifier) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if cfg!(debug_assertions) {
            previous(info);
        }

        let message = sanitize_json_error_message(&panic_message(info));
        let location = info.location().map(|loc| loc.to_string());
        tracing::error!(
            target: "metals.panic",
            message = %message,
            location = location.as_deref().unwrap_or("<unknown>"),
            "panic"
        );
        notifier(&format!("metals-dap panicked: {message}"));
    }));
}

fn panic_message(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_owned()
    }
}
