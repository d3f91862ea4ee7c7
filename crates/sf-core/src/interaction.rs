//! `Interaction` — the closed set of services a Producer (or, for
//! `Transport`, a Mover) can perform, and its stable URL identifier (§6).

use crate::CoreError;

/// A service a Producer (or, for `Transport`, a Mover) can perform.
///
/// The set is closed and each variant has a stable, externally visible URL
/// identifier used on the message bus (§6). Decoding is case-insensitive;
/// encoding always produces the canonical (case-preserving) form.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interaction {
    PlaceHousing,
    PlaceTrimmerElement,
    PlaceLever,
    PlaceCard,
    PersonalizeCard,
    RemoveAssy,
    SpecialTrick,
    Transport,
}

impl Interaction {
    /// All variants, in the order they appear in §6's table.
    pub const ALL: [Interaction; 8] = [
        Interaction::PlaceHousing,
        Interaction::PlaceTrimmerElement,
        Interaction::PlaceLever,
        Interaction::PlaceCard,
        Interaction::PersonalizeCard,
        Interaction::RemoveAssy,
        Interaction::SpecialTrick,
        Interaction::Transport,
    ];

    /// The canonical, case-preserving URL for this interaction.
    pub fn to_url(self) -> &'static str {
        match self {
            Interaction::PlaceHousing => "https://aas.2propel.com/ids/sm/7445_9011_6042_2805",
            Interaction::PlaceTrimmerElement => "https://aas.2propel.com/ids/sm/1555_1111_6042_0142",
            Interaction::PlaceLever => "https://aas.2propel.com/ids/sm/6362_2111_6042_2233",
            Interaction::PlaceCard => "https://aas.2propel.com/ids/sm/3555_1111_6042_9999",
            Interaction::PersonalizeCard => "https://aas.2propel.com/ids/sm/4485_9011_6042_0610",
            Interaction::RemoveAssy => "https://aas.2propel.com/ids/sm/0065_1111_6042_4666",
            Interaction::SpecialTrick => "https://aas.2propel.com/ids/sm/5555_1111_6042_8699",
            Interaction::Transport => "https://aas.2propel.com/ids/sm/0065_1111_6042_46253",
        }
    }

    /// Decode a URL into its `Interaction`, case-insensitively.
    ///
    /// Returns `Err(CoreError::UnknownInteractionUrl)` for any string that
    /// is not one of the eight stable URLs (§7: "Unknown URL / interaction:
    /// reject the message, do not crash").
    pub fn from_url(url: &str) -> Result<Interaction, CoreError> {
        let lower = url.to_ascii_lowercase();
        Interaction::ALL
            .into_iter()
            .find(|i| i.to_url().to_ascii_lowercase() == lower)
            .ok_or_else(|| CoreError::UnknownInteractionUrl(url.to_string()))
    }
}

impl std::fmt::Display for Interaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_url())
    }
}
