//! CLI color helpers for the beacon palette.
//!
//! Every function respects `NO_COLOR`, `FORCE_COLOR` and TTY detection through
//! `owo-colors`' `if_supports_color()`. `--no-color` sets an in-process flag
//! that skips styling entirely.

use std::sync::atomic::{AtomicBool, Ordering};

use beacon_core::CanonicalStatus;
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

static NO_COLOR_FLAG: AtomicBool = AtomicBool::new(false);

/// Call once from main.rs when `--no-color` is passed.
pub fn set_no_color() {
    NO_COLOR_FLAG.store(true, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl Rgb {
    const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

const SIGNAL: Rgb = Rgb::from_hex(0x5FA8D3); // Accent, names
const READY: Rgb = Rgb::from_hex(0x5E9E6B); // Deployed
const BUILDING: Rgb = Rgb::from_hex(0xD6A04C); // In flight
const FAILED: Rgb = Rgb::from_hex(0xC0584F); // Errors
const MUTED: Rgb = Rgb::from_hex(0x6A7280); // Secondary info

fn no_color() -> bool {
    NO_COLOR_FLAG.load(Ordering::Relaxed)
}

fn paint(text: &str, stream: owo_colors::Stream, rgb: Rgb) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(stream, |t| t.truecolor(rgb.r, rgb.g, rgb.b))
        .to_string()
}

/// Deployment names and other primary accents.
pub fn accent(text: &str) -> String {
    paint(text, Stdout, SIGNAL)
}

pub fn ready(text: &str) -> String {
    paint(text, Stdout, READY)
}

pub fn building(text: &str) -> String {
    paint(text, Stdout, BUILDING)
}

pub fn failed(text: &str) -> String {
    paint(text, Stdout, FAILED)
}

/// Borders, timestamps and hints on stdout.
pub fn muted(text: &str) -> String {
    paint(text, Stdout, MUTED)
}

pub fn bold(text: &str) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(Stdout, |t| t.bold()).to_string()
}

/// Color-code a canonical deployment status.
pub fn status(status: CanonicalStatus, text: &str) -> String {
    match status {
        CanonicalStatus::Ready => ready(text),
        CanonicalStatus::Building | CanonicalStatus::Queued => building(text),
        CanonicalStatus::Error => failed(text),
        CanonicalStatus::Canceled | CanonicalStatus::Unknown => muted(text),
    }
}

/// Error styling for stderr messages.
pub fn error(text: &str) -> String {
    paint(text, Stderr, FAILED)
}

/// Warning styling for stderr messages.
pub fn warning(text: &str) -> String {
    paint(text, Stderr, BUILDING)
}

/// Hint styling for secondary info on stderr.
pub fn hint(text: &str) -> String {
    paint(text, Stderr, MUTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        let c = Rgb::from_hex(0x5FA8D3);
        assert_eq!(c.r, 95);
        assert_eq!(c.g, 168);
        assert_eq!(c.b, 211);
    }

    #[test]
    fn test_rgb_from_hex_white() {
        let c = Rgb::from_hex(0xFFFFFF);
        assert_eq!((c.r, c.g, c.b), (255, 255, 255));
    }

    #[test]
    fn test_no_color_returns_plain_text() {
        set_no_color();
        assert_eq!(accent("web"), "web");
        assert_eq!(status(CanonicalStatus::Error, "ERROR"), "ERROR");
        assert_eq!(error("boom"), "boom");
        assert_eq!(bold("Name"), "Name");
    }
}
