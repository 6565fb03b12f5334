/// Budgets and the spending aggregator
pub mod budget;
/// User and default categories
pub mod category;
/// Dispatch of validated commands to the store
pub mod command;
/// Expenses and expense filtering
pub mod expense;
/// Cent-precision arithmetic on amounts
pub mod money;
/// Password digests
pub mod password;
/// User accounts
pub mod user;
