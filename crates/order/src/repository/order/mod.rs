mod command;
mod query;
mod unit_of_work;

pub use self::command::OrderCommandRepository;
pub use self::query::OrderQueryRepository;
pub use self::unit_of_work::PgOrderUnitOfWork;
