//! Character modifiers
//!
//! Stat adjustments attached to mutations (and other character elements).
//! Absent wire fields decode to zero, so an object that omits a field and one
//! that sends `0` for it describe the same modifiers.

use serde::{Deserialize, Serialize};

/// Adjustments to the ten characteristics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    #[serde(rename = "WS")]
    pub ws: i32,
    #[serde(rename = "BS")]
    pub bs: i32,
    #[serde(rename = "S")]
    pub s: i32,
    #[serde(rename = "T")]
    pub t: i32,
    #[serde(rename = "I")]
    pub i: i32,
    #[serde(rename = "Ag")]
    pub ag: i32,
    #[serde(rename = "Dex")]
    pub dex: i32,
    #[serde(rename = "Int")]
    pub int: i32,
    #[serde(rename = "WP")]
    pub wp: i32,
    #[serde(rename = "Fel")]
    pub fel: i32,
}

impl Attributes {
    /// Characteristic values in sheet order (WS, BS, S, T, I, Ag, Dex, Int, WP, Fel)
    pub fn values(&self) -> [i32; 10] {
        [
            self.ws, self.bs, self.s, self.t, self.i, self.ag, self.dex, self.int, self.wp,
            self.fel,
        ]
    }

    pub fn is_zero(&self) -> bool {
        self.values().iter().all(|v| *v == 0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub size: i32,
    pub movement: i32,
    pub attributes: Attributes,
}

impl Modifiers {
    /// Modifiers that change nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether any adjustment is non-zero
    pub fn has_modifiers(&self) -> bool {
        self.size != 0 || self.movement != 0 || !self.attributes.is_zero()
    }

    /// Field-by-field comparison
    pub fn equals(&self, other: &Modifiers) -> bool {
        self.size == other.size
            && self.movement == other.movement
            && self.attributes.values() == other.attributes.values()
    }
}

pub fn has_modifiers(modifiers: &Modifiers) -> bool {
    modifiers.has_modifiers()
}

pub fn compare_modifiers(a: &Modifiers, b: &Modifiers) -> bool {
    a.equals(b)
}

pub fn empty_modifiers() -> Modifiers {
    Modifiers::empty()
}
