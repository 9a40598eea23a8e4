//! A host that lives outside Telegram: it serves fixed init data and records
//! every call. Used for terminal runs and tests.

use std::sync::{Arc, Mutex};

use super::{ColorScheme, HapticStyle, InitData, ThemeParams, WebAppHost};

/// One call received by a [`HeadlessHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Ready,
    Expand,
    SetHeaderColor(String),
    SetBackgroundColor(String),
    Haptic(HapticStyle),
    Close,
}

/// Shared view of the calls a host received.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<HostCall>>>);

impl CallLog {
    fn push(&self, call: HostCall) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(call);
        }
    }

    pub fn snapshot(&self) -> Vec<HostCall> {
        self.0.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn contains(&self, call: &HostCall) -> bool {
        self.snapshot().contains(call)
    }
}

#[derive(Debug)]
pub struct HeadlessHost {
    init_data: InitData,
    scheme: ColorScheme,
    theme: ThemeParams,
    calls: CallLog,
}

impl HeadlessHost {
    pub fn new(init_data: InitData) -> Self {
        Self {
            init_data,
            scheme: ColorScheme::default(),
            theme: ThemeParams::default(),
            calls: CallLog::default(),
        }
    }

    #[must_use]
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemeParams) -> Self {
        self.theme = theme;
        self
    }

    /// Handle that keeps observing calls after the host is moved into a `Bridge`.
    pub fn call_log(&self) -> CallLog {
        self.calls.clone()
    }
}

impl WebAppHost for HeadlessHost {
    fn ready(&self) {
        self.calls.push(HostCall::Ready);
    }

    fn expand(&self) {
        self.calls.push(HostCall::Expand);
    }

    fn set_header_color(&self, color: &str) {
        self.calls.push(HostCall::SetHeaderColor(color.to_string()));
    }

    fn set_background_color(&self, color: &str) {
        self.calls.push(HostCall::SetBackgroundColor(color.to_string()));
    }

    fn impact_occurred(&self, style: HapticStyle) {
        self.calls.push(HostCall::Haptic(style));
    }

    fn close(&self) {
        log::info!("Mini App close requested");
        self.calls.push(HostCall::Close);
    }

    fn init_data(&self) -> &InitData {
        &self.init_data
    }

    fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    fn theme(&self) -> ThemeParams {
        self.theme.clone()
    }
}
