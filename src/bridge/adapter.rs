use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{ColorScheme, HapticStyle, InitData, ThemeParams, WebAppHost};

type Detect = Box<dyn FnOnce() -> Option<Box<dyn WebAppHost>> + Send>;

/// Result of probing for the host object.
pub enum HostAvailability {
    Available(Box<dyn WebAppHost>),
    Unavailable,
}

impl std::fmt::Debug for HostAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostAvailability::Available(_) => f.write_str("Available"),
            HostAvailability::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Lazily resolved handle to the Mini App host.
///
/// Host detection runs on first use, not at construction: inside Telegram the host
/// object can appear after the app starts. Once resolved the result is fixed for
/// the session. Every call on an unavailable host is a no-op; the first one logs
/// a warning.
pub struct Bridge {
    detect: Mutex<Option<Detect>>,
    host: OnceCell<HostAvailability>,
    warned: AtomicBool,
}

impl Bridge {
    pub fn new(detect: impl FnOnce() -> Option<Box<dyn WebAppHost>> + Send + 'static) -> Self {
        Self {
            detect: Mutex::new(Some(Box::new(detect))),
            host: OnceCell::new(),
            warned: AtomicBool::new(false),
        }
    }

    /// Bridge backed by an already-known host.
    pub fn with_host(host: impl WebAppHost + 'static) -> Self {
        Self::new(move || Some(Box::new(host) as Box<dyn WebAppHost>))
    }

    /// Bridge for a context with no host (plain browser, terminal without init data).
    pub fn unavailable() -> Self {
        Self::new(|| None)
    }

    pub fn availability(&self) -> &HostAvailability {
        self.host.get_or_init(|| {
            let detect = self.detect.lock().ok().and_then(|mut slot| slot.take());
            match detect.and_then(|detect| detect()) {
                Some(host) => {
                    log::info!("Mini App host bridge available");
                    HostAvailability::Available(host)
                }
                None => HostAvailability::Unavailable,
            }
        })
    }

    pub fn is_available(&self) -> bool {
        matches!(self.availability(), HostAvailability::Available(_))
    }

    fn host(&self, call: &str) -> Option<&dyn WebAppHost> {
        match self.availability() {
            HostAvailability::Available(host) => Some(host.as_ref()),
            HostAvailability::Unavailable => {
                if !self.warned.swap(true, Ordering::Relaxed) {
                    log::warn!("Telegram WebApp not available; `{}` and later host calls are skipped", call);
                } else {
                    log::debug!("host bridge unavailable, skipping `{}`", call);
                }
                None
            }
        }
    }

    pub fn ready(&self) {
        if let Some(host) = self.host("ready") {
            host.ready();
        }
    }

    pub fn expand(&self) {
        if let Some(host) = self.host("expand") {
            host.expand();
        }
    }

    pub fn set_header_color(&self, color: &str) {
        if let Some(host) = self.host("setHeaderColor") {
            host.set_header_color(color);
        }
    }

    pub fn set_background_color(&self, color: &str) {
        if let Some(host) = self.host("setBackgroundColor") {
            host.set_background_color(color);
        }
    }

    pub fn haptic_pulse(&self, style: HapticStyle) {
        if let Some(host) = self.host("impactOccurred") {
            host.impact_occurred(style);
        }
    }

    pub fn close(&self) {
        if let Some(host) = self.host("close") {
            host.close();
        }
    }

    /// Re-applies the host's own header/background colours so the app chrome matches the theme.
    pub fn apply_theme(&self) {
        let Some(host) = self.host("theme") else {
            return;
        };
        let theme = host.theme();
        if let Some(color) = theme.header_color.as_deref() {
            host.set_header_color(color);
        }
        if let Some(color) = theme.background_color.as_deref() {
            host.set_background_color(color);
        }
    }

    pub fn color_scheme(&self) -> Option<ColorScheme> {
        self.host("colorScheme").map(|host| host.color_scheme())
    }

    pub fn theme(&self) -> Option<ThemeParams> {
        self.host("themeParams").map(|host| host.theme())
    }

    pub fn init_data(&self) -> Option<&InitData> {
        self.host("initDataUnsafe").map(|host| host.init_data())
    }

    pub fn chat_username(&self) -> Option<String> {
        self.init_data().and_then(|d| d.chat_username()).map(str::to_string)
    }

    pub fn user_username(&self) -> Option<String> {
        self.init_data().and_then(|d| d.user_username()).map(str::to_string)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.init_data().and_then(InitData::user_id)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge").field("host", &self.host.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{HeadlessHost, HostCall};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_detection_runs_lazily_once() {
        let detections = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&detections);
        let bridge = Bridge::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(Box::new(HeadlessHost::new(InitData::default())) as Box<dyn WebAppHost>)
        });
        assert_eq!(detections.load(Ordering::SeqCst), 0);

        bridge.ready();
        bridge.expand();
        assert!(bridge.is_available());
        assert_eq!(detections.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unavailable_bridge_is_inert() {
        let bridge = Bridge::unavailable();
        bridge.ready();
        bridge.expand();
        bridge.haptic_pulse(HapticStyle::Medium);
        bridge.apply_theme();
        bridge.close();
        assert!(!bridge.is_available());
        assert_eq!(bridge.user_id(), None);
        assert_eq!(bridge.chat_username(), None);
        assert_eq!(bridge.color_scheme(), None);
    }

    #[test]
    fn test_calls_forwarded() {
        let host = HeadlessHost::new(InitData::default()).with_theme(ThemeParams {
            header_color: Some("#101010".into()),
            background_color: Some("#202020".into()),
        });
        let calls = host.call_log();
        let bridge = Bridge::with_host(host);

        bridge.ready();
        bridge.apply_theme();
        bridge.haptic_pulse(HapticStyle::Light);

        assert_eq!(
            calls.snapshot(),
            vec![
                HostCall::Ready,
                HostCall::SetHeaderColor("#101010".into()),
                HostCall::SetBackgroundColor("#202020".into()),
                HostCall::Haptic(HapticStyle::Light),
            ]
        );
    }
}
