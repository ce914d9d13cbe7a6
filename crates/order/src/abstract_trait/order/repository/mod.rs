mod command;
mod query;

pub use self::command::{DynOrderCommandRepository, OrderCommandRepositoryTrait, OrderUnitOfWork};
pub use self::query::{DynOrderQueryRepository, OrderQueryRepositoryTrait};
