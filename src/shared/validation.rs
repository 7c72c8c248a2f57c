//! Write validation
//!
//! Both the server's write arbiter and the client's write path run these
//! checks; the server's result is the one that counts.

use std::sync::LazyLock;

use regex::Regex;

use crate::shared::error::SharedError;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("hex color pattern is valid")
});

/// Accepts `#RGB` and `#RRGGBB`, either case
pub fn validate_color(color: &str) -> Result<(), SharedError> {
    if HEX_COLOR.is_match(color) {
        Ok(())
    } else {
        Err(SharedError::validation(
            "color",
            format!("'{}' is not a #RGB or #RRGGBB hex color", color),
        ))
    }
}

/// Checks `0 <= x, y < size` and returns the coordinates as indices
pub fn validate_coordinates(x: i64, y: i64, size: usize) -> Result<(usize, usize), SharedError> {
    let to_index = |value: i64, field: &str| -> Result<usize, SharedError> {
        usize::try_from(value)
            .ok()
            .filter(|index| *index < size)
            .ok_or_else(|| {
                SharedError::validation(
                    field,
                    format!("{} is outside the canvas (0..{})", value, size),
                )
            })
    };

    Ok((to_index(x, "x")?, to_index(y, "y")?))
}
