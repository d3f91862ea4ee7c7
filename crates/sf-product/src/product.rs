//! `Product` — one instance of a `ProductType` working through its recipe.

use sf_core::{Interaction, ProductId};

use crate::recipe::ProductType;

/// An in-progress or completed recipe instance.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    pub id: ProductId,
    /// Human-readable `type_N` name (§4.9's sequential naming).
    pub name: String,
    pub product_type: ProductType,
    /// Index of the next recipe step; equals `recipe().len()` once complete.
    pub cursor: usize,
    pub ticks: u64,
    pub distance: f32,
    pub processing_ticks: u64,
    /// Human-readable log of completed interactions, in order.
    pub completed_interactions: Vec<String>,
}

impl Product {
    pub fn new(id: ProductId, name: String, product_type: ProductType) -> Self {
        Self {
            id,
            name,
            product_type,
            cursor: 0,
            ticks: 0,
            distance: 0.0,
            processing_ticks: 0,
            completed_interactions: Vec::new(),
        }
    }

    /// The interaction the product is waiting for next, or `None` if the
    /// recipe is already complete.
    pub fn current_interaction(&self) -> Option<Interaction> {
        self.product_type.recipe().get(self.cursor).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.product_type.recipe().len()
    }

    /// Advance the cursor past the current step, logging it. Returns `true`
    /// if this completes the recipe.
    pub fn advance(&mut self) -> bool {
        if let Some(interaction) = self.current_interaction() {
            self.completed_interactions.push(interaction.to_string());
            self.cursor += 1;
        }
        self.is_complete()
    }
}
