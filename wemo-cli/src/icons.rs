//! State and device icons for terminal output.

use colored::{ColoredString, Colorize};
use wemo_device::BinaryState;

const ON_ICON: &str = "\u{23FB} ";
const OFF_ICON: &str = "\u{25BC} ";
const UNKNOWN_ICON: &str = "\u{26A1}";
const UNKNOWN_DEVICE_ICON: &str = "\u{2BD1} ";

/// Icon for a device state.
pub fn state(state: BinaryState) -> ColoredString {
    match state {
        BinaryState::On => ON_ICON.green(),
        BinaryState::Off => OFF_ICON.red(),
        BinaryState::Unknown => UNKNOWN_ICON.green(),
    }
}

/// Icon for a device whose name never resolved.
pub fn unknown_device() -> ColoredString {
    UNKNOWN_DEVICE_ICON.red()
}
