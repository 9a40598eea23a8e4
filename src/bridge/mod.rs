//! Host bridge: the enclosing Telegram client's Mini App surface.
//!
//! `WebAppHost` is the capability the app calls into (viewport, theming,
//! haptics, identity). `Bridge` wraps it with lazy probing and an explicit
//! unavailable variant, so a plain browser context degrades to no-ops.

pub mod adapter;
pub mod headless;
pub mod init_data;

pub use adapter::{Bridge, HostAvailability};
pub use headless::{CallLog, HeadlessHost, HostCall};
pub use init_data::{InitData, InitDataError, WebAppChat, WebAppUser};

use strum::{AsRefStr, Display};

/// Haptic impact strength accepted by `HapticFeedback.impactOccurred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum HapticStyle {
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
}

/// Colour scheme reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Current header/background colours of the host chrome (`#rrggbb` or a theme key).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeParams {
    pub header_color: Option<String>,
    pub background_color: Option<String>,
}

/// Calls the app makes into the host. Implementations must never fail the caller.
pub trait WebAppHost: Send + Sync {
    /// Signals that the app has rendered and may be shown.
    fn ready(&self);

    /// Expands the viewport to full height.
    fn expand(&self);

    fn set_header_color(&self, color: &str);

    fn set_background_color(&self, color: &str);

    fn impact_occurred(&self, style: HapticStyle);

    /// Closes the Mini App.
    fn close(&self);

    /// Identity and launch parameters handed to the app.
    fn init_data(&self) -> &InitData;

    fn color_scheme(&self) -> ColorScheme {
        ColorScheme::Light
    }

    fn theme(&self) -> ThemeParams {
        ThemeParams::default()
    }
}
