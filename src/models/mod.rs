//! Domain models

pub mod order;
pub mod user;

pub use order::{OrderLine, OrderRecord, OrderStatus, OrderTotals};
pub use user::UserClaims;
