mod product;
mod user;

pub use self::product::ProductRepository;
pub use self::user::UserRepository;
