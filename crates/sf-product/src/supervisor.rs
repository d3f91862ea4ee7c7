//! Product supervisor (component C9): owns every `Product`'s progression
//! through its recipe and the completed/in-progress trackers.

use std::collections::HashMap;

use sf_core::{Interaction, ProductId};

use crate::error::{ProductError, ProductResult};
use crate::product::Product;
use crate::recipe::ProductType;

/// A finished product's summary, moved out of the in-progress tracker once
/// its recipe completes.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletedRecord {
    pub id: ProductId,
    pub name: String,
    pub ticks: u64,
    pub distance: f32,
    pub completed_interactions: Vec<String>,
}

impl From<Product> for CompletedRecord {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            ticks: p.ticks,
            distance: p.distance,
            completed_interactions: p.completed_interactions,
        }
    }
}

/// Owns all products. The environment registry and broker never hold a
/// `Product` directly — they reference products by id and go through this
/// supervisor, per the ownership rule in the data model (§3).
#[derive(Default)]
pub struct ProductSupervisor {
    next_product_id: u32,
    next_sequence: HashMap<ProductType, u32>,
    in_progress: HashMap<ProductId, Product>,
    completed: Vec<CompletedRecord>,
}

impl ProductSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// `CreateProduct`: assign a sequential `type_N` id and start tracking a
    /// new in-progress product (§4.9).
    pub fn create_product(&mut self, product_type: ProductType) -> ProductId {
        let id = ProductId(self.next_product_id);
        self.next_product_id += 1;

        let seq = self.next_sequence.entry(product_type).or_insert(0);
        let name = format!("{}_{}", product_type.name(), *seq);
        *seq += 1;

        self.in_progress.insert(id, Product::new(id, name, product_type));
        id
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.in_progress.get(&id)
    }

    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.in_progress.get_mut(&id)
    }

    /// The interaction this product is currently waiting for.
    pub fn current_interaction(&self, id: ProductId) -> ProductResult<Interaction> {
        let product = self.in_progress.get(&id).ok_or(ProductError::NotFound(id))?;
        product
            .current_interaction()
            .ok_or(ProductError::RecipeExhausted(id))
    }

    /// Record that `id`'s current recipe step finished. Advances the
    /// cursor; if that completes the recipe, moves the product into the
    /// completed tracker and returns its summary.
    pub fn advance(&mut self, id: ProductId) -> ProductResult<Option<CompletedRecord>> {
        let product = self.in_progress.get_mut(&id).ok_or(ProductError::NotFound(id))?;
        if product.advance() {
            let product = self.in_progress.remove(&id).unwrap();
            let record: CompletedRecord = product.into();
            self.completed.push(record.clone());
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// Read-only copy of every completed product's summary (§4.9 "Snapshot
    /// messages return read-only copies").
    pub fn completed_snapshot(&self) -> Vec<CompletedRecord> {
        self.completed.clone()
    }

    /// Read-only copy of every still-in-progress product.
    pub fn in_progress_snapshot(&self) -> Vec<Product> {
        self.in_progress.values().cloned().collect()
    }

    pub fn in_progress_count(&self) -> usize {
        self.in_progress.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Clear all children and counters (§4.9 Reset).
    pub fn reset(&mut self) {
        self.next_product_id = 0;
        self.next_sequence.clear();
        self.in_progress.clear();
        self.completed.clear();
    }
}
