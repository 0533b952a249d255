pub mod config;
pub mod domain;
pub mod errors;

pub use domain::filter::ProductFilter;
pub use domain::price::{Price, PriceRange};
pub use domain::product::{NewProduct, Product, ProductId, ProductPatch};
pub use domain::user::{NewUser, User, UserId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
