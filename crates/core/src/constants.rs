use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Currency assumed for new users until a goal or preference says otherwise.
pub const DEFAULT_CURRENCY: &str = "GBP";

/// Default UI theme preference.
pub const DEFAULT_THEME: &str = "light";

/// Default display name preference.
pub const DEFAULT_USER_NAME: &str = "User";

/// Minimum number of characters in a goal title.
pub const MIN_GOAL_TITLE_CHARS: usize = 3;

/// Upper bound for a goal's target amount.
pub const MAX_GOAL_TARGET_AMOUNT: Decimal = dec!(10_000_000);

/// Upper bound for a single deposit.
pub const MAX_DEPOSIT_AMOUNT: Decimal = dec!(1_000_000);

/// Remote collection holding goal documents.
pub const GOALS_COLLECTION: &str = "goals";

/// Remote collection holding deposit documents.
pub const DEPOSITS_COLLECTION: &str = "deposits";
