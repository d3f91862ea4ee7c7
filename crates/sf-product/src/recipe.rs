//! Product types and their ordered recipes (§6).

use sf_core::Interaction;

/// The closed set of product types this engine knows how to build.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProductType {
    Trimmer,
    TrimmerPersonalized,
}

const TRIMMER_RECIPE: [Interaction; 4] = [
    Interaction::PlaceHousing,
    Interaction::PlaceTrimmerElement,
    Interaction::PlaceLever,
    Interaction::RemoveAssy,
];

const TRIMMER_PERSONALIZED_RECIPE: [Interaction; 6] = [
    Interaction::PlaceHousing,
    Interaction::PlaceTrimmerElement,
    Interaction::PlaceLever,
    Interaction::PlaceCard,
    Interaction::PersonalizeCard,
    Interaction::RemoveAssy,
];

impl ProductType {
    /// The ordered sequence of interactions this product type requires.
    pub fn recipe(self) -> &'static [Interaction] {
        match self {
            ProductType::Trimmer => &TRIMMER_RECIPE,
            ProductType::TrimmerPersonalized => &TRIMMER_PERSONALIZED_RECIPE,
        }
    }

    /// Short name used to build the `type_N` product naming scheme (§4.9).
    pub fn name(self) -> &'static str {
        match self {
            ProductType::Trimmer => "Trimmer",
            ProductType::TrimmerPersonalized => "TrimmerPersonalized",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
