//! Output formatting

pub mod console;

/// Force colored output on or off for the whole process
pub fn set_color_enabled(enabled: bool) {
    colored::control::set_override(enabled);
}
