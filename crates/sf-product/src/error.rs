//! Product-subsystem error type.

use thiserror::Error;

use sf_core::ProductId;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("product {0} has no current recipe step")]
    RecipeExhausted(ProductId),
}

pub type ProductResult<T> = Result<T, ProductError>;
