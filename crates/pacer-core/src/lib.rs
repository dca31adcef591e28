pub mod budget;
pub mod daypart;
pub mod money;
pub mod types;

pub use budget::{at_or_over_budget, exceeds_budget};
pub use daypart::{is_within_dayparting, HourError};
pub use money::{parse_amount, parse_limit, to_money, validate_amount, validate_limit, AmountError};
pub use types::*;
