//! Best-effort detection of the desktop's light/dark preference, used to pick
//! the starting theme when neither the command line nor the config sets one.

use crate::ui::theme::ThemeMode;

pub fn detect_theme_mode() -> Option<ThemeMode> {
    os_hint()
}

#[cfg(target_os = "macos")]
fn os_hint() -> Option<ThemeMode> {
    use std::process::Command;

    // `defaults` exits non-zero when AppleInterfaceStyle is unset, which is
    // how macOS spells "light".
    let output = Command::new("/usr/bin/defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    if !output.status.success() {
        return Some(ThemeMode::Light);
    }
    Some(parse_apple_interface_style(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

#[cfg(target_os = "windows")]
fn os_hint() -> Option<ThemeMode> {
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::RegKey;

    let personalize = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        .ok()?;
    let apps_use_light: u32 = personalize.get_value("AppsUseLightTheme").ok()?;
    Some(if apps_use_light == 0 {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    })
}

#[cfg(target_os = "linux")]
fn os_hint() -> Option<ThemeMode> {
    gsettings("color-scheme")
        .and_then(|value| parse_color_scheme(&value))
        .or_else(|| gsettings("gtk-theme").map(|value| parse_gtk_theme(&value)))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
fn os_hint() -> Option<ThemeMode> {
    None
}

#[cfg(target_os = "linux")]
fn gsettings(key: &str) -> Option<String> {
    let output = std::process::Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", key])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_apple_interface_style(value: &str) -> ThemeMode {
    if value.to_ascii_lowercase().contains("dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

/// GNOME 42+ `color-scheme`: `'prefer-dark'`, `'prefer-light'` or `'default'`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_color_scheme(value: &str) -> Option<ThemeMode> {
    let value = value.to_ascii_lowercase();
    if value.contains("prefer-dark") {
        Some(ThemeMode::Dark)
    } else if value.contains("prefer-light") || value.contains("default") {
        Some(ThemeMode::Light)
    } else {
        None
    }
}

/// Older GNOME setups only expose the GTK theme name, e.g. `'Adwaita-dark'`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_gtk_theme(value: &str) -> ThemeMode {
    if value.to_ascii_lowercase().contains("-dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}
