//! User profile payloads
//!
//! Shapes returned by the ranking API's user endpoints. The cache treats these
//! as opaque values; the fields exist for the command handlers and scorers that
//! consume them.

use serde::{Deserialize, Serialize};

/// Tier names from lowest to highest, five sub-tiers each.
const TIER_GROUPS: [&str; 7] = [
    "Unrated", "Bronze", "Silver", "Gold", "Platinum", "Diamond", "Ruby",
];

// == User Profile ==
/// Core ranking profile for one handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The external handle this profile belongs to
    pub handle: String,
    /// Numeric tier, 0 = unrated, then five sub-tiers per group
    pub tier: u8,
    /// Current rating points
    pub rating: u32,
    /// Number of distinct problems solved
    pub solved_count: u32,
    /// Global rank by rating
    pub rank: u32,
}

impl UserProfile {
    /// Human-readable tier name, e.g. tier 11 → "Gold V".
    pub fn tier_name(&self) -> String {
        if self.tier == 0 {
            return TIER_GROUPS[0].to_string();
        }
        let group = ((self.tier - 1) / 5 + 1).min(6) as usize;
        let sub = 5 - ((self.tier - 1) % 5);
        let numeral = ["I", "II", "III", "IV", "V"][sub as usize - 1];
        format!("{} {}", TIER_GROUPS[group], numeral)
    }
}

// == Additional Info ==
/// Extended profile attributes, fetched from a separate endpoint and cached
/// under its own partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    /// Profile image, absent for default avatars
    pub profile_image_url: Option<String>,
    /// Equipped profile background identifier
    pub background_id: Option<String>,
    /// Displayed badge identifier
    pub badge_id: Option<String>,
}
