//! `sf-product` — product recipes and the supervisor that tracks each
//! product's progression through them (component C9, recipe half of §6).
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|----------------------------------------------------------|
//! | [`recipe`]    | `ProductType`, recipe tables                             |
//! | [`product`]   | `Product` — per-instance cursor, ticks, distance, log    |
//! | [`supervisor`]| `ProductSupervisor`, `CompletedRecord`                   |
//! | [`error`]     | `ProductError`, `ProductResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.       |

pub mod error;
pub mod product;
pub mod recipe;
pub mod supervisor;


pub use error::{ProductError, ProductResult};
pub use product::Product;
pub use recipe::ProductType;
pub use supervisor::{CompletedRecord, ProductSupervisor};
