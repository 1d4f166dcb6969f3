pub struct NotificationSystem {}

impl NotificationSystem {
    pub fn hotspot_message(label: &str) -> String {
        format!("You clicked on: {label}")
    }

    /// Tells the user which hotspot they clicked. On the web this is a
    /// blocking alert, natively it goes to the log and stdout.
    pub fn notify_hotspot(label: &str) {
        let message = NotificationSystem::hotspot_message(label);
        tracing::info!(hotspot = label, "{message}");

        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.alert_with_message(&message) {
                    tracing::warn!("alert failed: {err:?}");
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            println!("{message}");
        }
    }
}
