// =============================================================================
// Price Structure Module
// =============================================================================
//
// Swing-point detection plus the structure classification and support /
// resistance levels derived from it.

pub mod levels;
pub mod swing;

pub use levels::{classify_structure, key_levels, MarketStructure};
pub use swing::{find_swing_highs, find_swing_lows, SwingPoint};
