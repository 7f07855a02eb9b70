// Re-export all model types
pub use self::cart::*;
pub use self::errors::*;
pub use self::pages::*;
pub use self::product::*;
pub use self::validation::*;

mod cart;
mod errors;
mod pages;
mod product;
mod validation;
