//! Best-effort extraction of camera settings from coaching replies
//!
//! Replies are free-form markdown, so this never fails: unrecognised text
//! yields an empty [`CameraSettings`].
//!
//! Recognised lines look like `ISO: 400`, `- **Aperture**: f/2.8` or
//! `**Shutter speed:** 1/250s`.
//!
//! # Examples
//!
//! ```
//! use lenscoach::settings_parser::parse_camera_settings;
//!
//! let reply = "Here is what I'd use:\n- **ISO**: 200\n- **Aperture**: f/4\n";
//! let settings = parse_camera_settings(reply);
//! assert_eq!(settings.iso.as_deref(), Some("200"));
//! assert_eq!(settings.aperture.as_deref(), Some("f/4"));
//! assert!(settings.shutter_speed.is_none());
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Settings pulled out of a reply; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraSettings {
    /// Sensor sensitivity, e.g. `400`
    pub iso: Option<String>,
    /// Aperture, e.g. `f/2.8`
    pub aperture: Option<String>,
    /// Shutter speed, e.g. `1/250s`
    pub shutter_speed: Option<String>,
    /// Autofocus mode, e.g. `AF-C`
    pub focus_mode: Option<String>,
    /// White balance, e.g. `Daylight (5500K)`
    pub white_balance: Option<String>,
}

impl CameraSettings {
    /// True when nothing was recognised
    pub fn is_empty(&self) -> bool {
        self.iso.is_none()
            && self.aperture.is_none()
            && self.shutter_speed.is_none()
            && self.focus_mode.is_none()
            && self.white_balance.is_none()
    }

    /// Label/value pairs for display, in a fixed order, skipping missing values
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("ISO", &self.iso),
            ("Aperture", &self.aperture),
            ("Shutter speed", &self.shutter_speed),
            ("Focus mode", &self.focus_mode),
            ("White balance", &self.white_balance),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

fn setting_pattern(labels: &str) -> Regex {
    // Leading bullets, numbering, quotes, headings and bold markers are skipped.
    Regex::new(&format!(
        r"(?im)^[\s>*\-•#\d.)]*(?:{})\s*\**\s*[:\-–]\s*\**\s*(?P<value>.+?)\s*$",
        labels
    ))
    .expect("settings pattern is valid")
}

static ISO_PATTERN: LazyLock<Regex> = LazyLock::new(|| setting_pattern(r"ISO"));
static APERTURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| setting_pattern(r"aperture|f-stop"));
static SHUTTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| setting_pattern(r"shutter\s+speed|shutter"));
static FOCUS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| setting_pattern(r"focus\s+mode|autofocus|focus"));
static WHITE_BALANCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| setting_pattern(r"white\s+balance|WB"));

/// Extract camera settings from a reply
pub fn parse_camera_settings(text: &str) -> CameraSettings {
    CameraSettings {
        iso: find_setting(text, &ISO_PATTERN),
        aperture: find_setting(text, &APERTURE_PATTERN),
        shutter_speed: find_setting(text, &SHUTTER_PATTERN),
        focus_mode: find_setting(text, &FOCUS_PATTERN),
        white_balance: find_setting(text, &WHITE_BALANCE_PATTERN),
    }
}

/// First non-empty value captured by `pattern`
fn find_setting(text: &str, pattern: &Regex) -> Option<String> {
    for caps in pattern.captures_iter(text) {
        let Some(value) = caps.name("value") else {
            continue;
        };
        let value = value.as_str().trim_matches('*').trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "\
For a beach wedding at golden hour I'd start here:

1. **ISO:** 100
2. **Aperture:** f/2.8 for soft backgrounds
3. **Shutter Speed:** 1/500s
4. **Focus Mode:** AF-C with eye detection
5. **White Balance:** Daylight (5500K)

Why: the sun is low, so keep an eye on highlights.";

    #[test]
    fn test_all_patterns_compile() {
        for pattern in [
            &*ISO_PATTERN,
            &*APERTURE_PATTERN,
            &*SHUTTER_PATTERN,
            &*FOCUS_PATTERN,
            &*WHITE_BALANCE_PATTERN,
        ] {
            assert!(pattern.capture_names().any(|n| n == Some("value")));
        }
    }

    #[test]
    fn test_find_setting_skips_empty_values() {
        let text = "ISO: **\nISO: 640";
        assert_eq!(find_setting(text, &ISO_PATTERN).as_deref(), Some("640"));
        assert_eq!(parse_camera_settings(text), parse_camera_settings(text));
    }

    #[test]
    fn test_parses_numbered_bold_list() {
        let settings = parse_camera_settings(REPLY);
        assert_eq!(settings.iso.as_deref(), Some("100"));
        assert_eq!(settings.aperture.as_deref(), Some("f/2.8 for soft backgrounds"));
        assert_eq!(settings.shutter_speed.as_deref(), Some("1/500s"));
        assert_eq!(settings.focus_mode.as_deref(), Some("AF-C with eye detection"));
        assert_eq!(settings.white_balance.as_deref(), Some("Daylight (5500K)"));
        assert!(!settings.is_empty());
    }

    #[test]
    fn test_parses_plain_and_dash_bullets() {
        let reply = "- ISO - 3200\n- shutter: 1/60\n* WB: Tungsten";
        let settings = parse_camera_settings(reply);
        assert_eq!(settings.iso.as_deref(), Some("3200"));
        assert_eq!(settings.shutter_speed.as_deref(), Some("1/60"));
        assert_eq!(settings.white_balance.as_deref(), Some("Tungsten"));
        assert!(settings.aperture.is_none());
    }

    #[test]
    fn test_label_must_be_followed_by_separator() {
        let reply = "Isolation: high\nFocusing tips follow.";
        let settings = parse_camera_settings(reply);
        assert!(settings.iso.is_none());
        assert!(settings.focus_mode.is_none());
    }

    #[test]
    fn test_unrecognised_text_is_empty() {
        let settings = parse_camera_settings("Sorry, I couldn't see the image clearly.");
        assert!(settings.is_empty());
        assert!(settings.entries().is_empty());
    }

    #[test]
    fn test_entries_in_display_order() {
        let settings = CameraSettings {
            iso: Some("400".to_string()),
            white_balance: Some("Auto".to_string()),
            ..Default::default()
        };
        assert_eq!(
            settings.entries(),
            vec![("ISO", "400"), ("White balance", "Auto")]
        );
    }
}
