//! Time source. Validation ("not before today") and creation timestamps read a
//! `mockable::Clock` so tests can pin or step it.

use chrono::NaiveDate;
pub use mockable::{Clock, DefaultClock};

/// Calendar date in the server's local time zone.
pub fn today(clock: &dyn Clock) -> NaiveDate { clock.local().date_naive() }
