//! Catalog of known Filipino Sign Language signs.
//!
//! Static metadata only; the media referenced here is served elsewhere.

use crate::defaults;

/// Metadata for one sign in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SignInfo {
    /// Spoken word this sign maps to, lowercase.
    pub word: &'static str,
    /// Human-readable display name.
    pub display_name: &'static str,
    /// Reference to the sign demonstration media.
    pub image_url: &'static str,
    /// Short instruction for performing the sign.
    pub description: &'static str,
}

/// Placeholder shown when a phrase matches nothing in the catalog.
pub const NO_MATCH_IMAGE: &str =
    "https://via.placeholder.com/400x400/27272a/ffffff?text=No+Match";

/// Known signs, ordered by word.
pub const SIGNS: &[SignInfo] = &[
    SignInfo {
        word: "ho",
        display_name: "HO",
        image_url: "https://via.placeholder.com/400x400/95e1d3/000000?text=HO",
        description: "Open hand dips from the chin; polite particle used with familiar elders.",
    },
    SignInfo {
        word: "ka",
        display_name: "KA",
        image_url: "https://via.placeholder.com/400x400/4ecdc4/ffffff?text=KA",
        description: "Index finger points toward the person being addressed.",
    },
    SignInfo {
        word: "kamusta",
        display_name: "KAMUSTA",
        image_url: "https://via.placeholder.com/400x400/ff6b6b/ffffff?text=KAMUSTA",
        description: "Open palm circles in front of the chest in greeting.",
    },
    SignInfo {
        word: "magandang",
        display_name: "MAGANDANG",
        image_url: "https://via.placeholder.com/400x400/a29bfe/ffffff?text=MAGANDANG",
        description: "Flat hand sweeps outward from the chin, palm turning up.",
    },
    SignInfo {
        word: "po",
        display_name: "PO",
        image_url: "https://via.placeholder.com/400x400/f7dc6f/000000?text=PO",
        description: "Flat hand taps the chest lightly to show respect.",
    },
    SignInfo {
        word: "salamat",
        display_name: "SALAMAT",
        image_url: "https://via.placeholder.com/400x400/45b7d1/ffffff?text=SALAMAT",
        description: "Fingertips touch the chin, then move forward toward the listener.",
    },
    SignInfo {
        word: "umaga",
        display_name: "UMAGA",
        image_url: "https://via.placeholder.com/400x400/fd9644/ffffff?text=UMAGA",
        description: "Right forearm rises over the left like the sun coming up.",
    },
];

/// Look up a sign by its spoken word.
pub fn get_sign(word: &str) -> Option<&'static SignInfo> {
    SIGNS.iter().find(|s| s.word == word)
}

/// List all known signs.
pub fn list_signs() -> &'static [SignInfo] {
    SIGNS
}

/// Check if a sign exists for the given word.
pub fn has_sign(word: &str) -> bool {
    SIGNS.iter().any(|s| s.word == word)
}

/// The entry presented when nothing in a phrase matched.
pub fn no_match_sign() -> SignInfo {
    SignInfo {
        word: defaults::NO_MATCH_LABEL,
        display_name: defaults::NO_MATCH_LABEL,
        image_url: NO_MATCH_IMAGE,
        description: "None of the spoken words are in the sign dictionary.",
    }
}
