pub mod filter;
pub mod price;
pub mod product;
pub mod user;
