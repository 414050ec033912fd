//! Layout presets offered by the workspace toolbar.

/// `(name, (rows, cols))` in toolbar order.
pub const GRID_PRESETS: &[(&str, (usize, usize))] = &[
    ("1x1", (1, 1)),
    ("2x1", (2, 1)),
    ("2x2", (2, 2)),
    ("2x3", (2, 3)),
    ("3x3", (3, 3)),
];

/// Look up a preset by name.
pub fn preset(name: &str) -> Option<(usize, usize)> {
    GRID_PRESETS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, dims)| *dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_presets_resolve() {
        assert_eq!(preset("1x1"), Some((1, 1)));
        assert_eq!(preset("2x1"), Some((2, 1)));
        assert_eq!(preset("2x2"), Some((2, 2)));
        assert_eq!(preset("2x3"), Some((2, 3)));
        assert_eq!(preset("3x3"), Some((3, 3)));
    }

    #[test]
    fn unknown_preset_is_none() {
        assert_eq!(preset("4x4"), None);
        assert_eq!(preset(""), None);
    }

    #[test]
    fn names_match_their_dimensions() {
        for (name, (rows, cols)) in GRID_PRESETS {
            assert_eq!(*name, format!("{rows}x{cols}"));
        }
    }
}
