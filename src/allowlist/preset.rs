//! Built-in class presets.
//!
//! Frameworks toggle state classes from script (`active`, `open`, `in`...)
//! that rarely appear in the page's own stylesheet, or they ship helper
//! classes documented as part of their markup contract. Enabling a preset
//! with `true` keeps those names regardless of the harvested set.
//!
//! Lists are versioned as a whole; changing a list bumps [`PRESET_VERSION`].

/// Version of the preset tables below.
pub const PRESET_VERSION: u32 = 1;

/// A named, static class list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub classes: &'static [&'static str],
}

/// Component library state and plugin classes (Bootstrap).
pub const BOOTSTRAP: Preset = Preset {
    name: "bootstrap",
    description: "component library state classes toggled by plugins",
    classes: &[
        "active",
        "affix",
        "affix-bottom",
        "affix-top",
        "carousel-item-end",
        "carousel-item-next",
        "carousel-item-prev",
        "carousel-item-start",
        "collapse",
        "collapsed",
        "collapsing",
        "disabled",
        "dropdown-backdrop",
        "fade",
        "in",
        "is-invalid",
        "is-valid",
        "left",
        "modal-backdrop",
        "modal-open",
        "next",
        "offcanvas-backdrop",
        "open",
        "popover",
        "prev",
        "right",
        "show",
        "showing",
        "tooltip",
        "was-validated",
    ],
};

/// Semantic boilerplate helpers (HTML5 Boilerplate).
pub const H5BP: Preset = Preset {
    name: "h5bp",
    description: "HTML5 Boilerplate helper and feature-detection classes",
    classes: &[
        "browserupgrade",
        "clearfix",
        "focusable",
        "hidden",
        "invisible",
        "js",
        "no-js",
        "sr-only",
        "visually-hidden",
        "visuallyhidden",
    ],
};

/// All presets, in display order.
pub const PRESETS: &[Preset] = &[BOOTSTRAP, H5BP];

/// Find a preset by exact name.
pub fn lookup(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.name == name)
}

/// Comma-separated preset names, for diagnostics.
pub fn known_names() -> String {
    PRESETS
        .iter()
        .map(|preset| preset.name)
        .collect::<Vec<_>>()
        .join(", ")
}
