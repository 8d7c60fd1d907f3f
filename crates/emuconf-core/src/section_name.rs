//! Section name translation between the global files and per-game files.
//!
//! Graphics sections live in `GFX` under short names (`Settings`, `Hacks`, ...)
//! but a per-game file holds every store in one file, so the same sections
//! carry a `Video_` prefix there. Every other section keeps its name.

/// `(global name, per-game name)` pairs.
const SECTION_NAME_PAIRS: [(&str, &str); 6] = [
    ("Hardware", "Video_Hardware"),
    ("Settings", "Video_Settings"),
    ("Enhancements", "Video_Enhancements"),
    ("Stereoscopy", "Video_Stereoscopy"),
    ("Hacks", "Video_Hacks"),
    ("GameSpecific", "Video"),
];

/// Maps a global section name to the name used inside a per-game file.
pub fn map_section_name_from_ini(global_name: &str) -> &str {
    SECTION_NAME_PAIRS
        .iter()
        .find(|(global, _)| *global == global_name)
        .map_or(global_name, |&(_, scoped)| scoped)
}

/// Maps a per-game section name back to its global name.
pub fn map_section_name_to_ini(scoped_name: &str) -> &str {
    SECTION_NAME_PAIRS
        .iter()
        .find(|(_, scoped)| *scoped == scoped_name)
        .map_or(scoped_name, |&(global, _)| global)
}
