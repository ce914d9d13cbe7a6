mod product;
mod user;

pub use self::product::{DynProductStore, ProductStoreTrait};
pub use self::user::{DynUserStore, UserStoreTrait};
