//! Physical furniture dimensions.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Width, height and depth of a piece of furniture, in whole inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Dimensions {
    /// Create dimensions from inches.
    #[must_use]
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Compact `WxHxD` form used when deriving cart identities.
    #[must_use]
    pub fn compact(&self) -> String {
        format!("{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// Render a length in inches as feet and inches (`6'`, `2' 6"`, `9"`).
fn feet_and_inches(inches: u32) -> String {
    let feet = inches / 12;
    let rest = inches % 12;
    match (feet, rest) {
        (0, _) => format!("{rest}\""),
        (_, 0) => format!("{feet}'"),
        _ => format!("{feet}' {rest}\""),
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} × {} × {}",
            feet_and_inches(self.width),
            feet_and_inches(self.height),
            feet_and_inches(self.depth)
        )
    }
}
