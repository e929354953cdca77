//! Column resolution - which CSV columns hold the X/Y/Z acceleration
//!
//! Pure functions over header names; no file I/O.

/// Axis column triples in order of preference (names already normalized)
pub const AXIS_CANDIDATES: &[[&str; 3]] = &[
    // iOS sensor logger exports
    ["accelerationx", "accelerationy", "accelerationz"],
    ["acc_x", "acc_y", "acc_z"],
    ["ax", "ay", "az"],
    ["x", "y", "z"],
];

/// Positions of the resolved axis columns within a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisColumns {
    pub names: [&'static str; 3],
    pub indices: [usize; 3],
}

/// Trim, lowercase, and map spaces and hyphens to underscores.
pub fn normalize_column(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

/// Pick the first candidate triple fully present in `columns`.
///
/// `columns` must already be normalized. When a name repeats, its first
/// occurrence wins.
pub fn resolve_axis_columns<S: AsRef<str>>(columns: &[S]) -> Option<AxisColumns> {
    let position = |name: &str| columns.iter().position(|c| c.as_ref() == name);

    AXIS_CANDIDATES.iter().find_map(|names| {
        let x = position(names[0])?;
        let y = position(names[1])?;
        let z = position(names[2])?;
        Some(AxisColumns { names: *names, indices: [x, y, z] })
    })
}
