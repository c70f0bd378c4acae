/// Habit counter entity and its once-per-day increment rule
///
/// A counter tracks how many consecutive days a habit has been kept. It comes
/// in two shapes: `Persisted` (the store has assigned an id) and
/// `PendingCreation` (built from raw dialog input, no id yet). Counters are
/// immutable values; every operation returns a new counter.

use chrono::{Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

use crate::domain::{DomainError, NonEmptyText};

/// Streak value every counter starts from
pub const INITIAL_COUNTER_VALUE: u32 = 0;

/// A habit counter, differentiated by whether the store has assigned an id
///
/// Both variants share the same fields conceptually; `Persisted` additionally
/// carries a strictly positive id that is fixed for the entity's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitCounter {
    Persisted {
        id: u32,
        number_of_days: u32,
        name: NonEmptyText,
        last_increase: NaiveDateTime,
    },
    PendingCreation {
        number_of_days: u32,
        name: NonEmptyText,
        last_increase: NaiveDateTime,
    },
}

impl HabitCounter {
    /// Build a persisted counter from raw stored values, validating everything
    ///
    /// Checks run in a fixed order and the first failure wins: positive id,
    /// non-negative day count, non-empty name, resolvable timestamp.
    pub fn persisted(
        id: i32,
        number_of_days: i32,
        name: &str,
        last_increase_epoch_millis: i64,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::IdMustBePositive);
        }
        if number_of_days < 0 {
            return Err(DomainError::DaysMustBeNonNegative);
        }
        let name = NonEmptyText::new(name)?;
        let last_increase = local_date_time_from_millis(last_increase_epoch_millis)?;

        Ok(Self::Persisted {
            id: id as u32,
            number_of_days: number_of_days as u32,
            name,
            last_increase,
        })
    }

    /// Build a counter from raw dialog input, before the store assigns an id
    ///
    /// The streak starts at zero and `last_increase` records the creation
    /// moment. The timestamp conversion cannot realistically fail for "now"
    /// but the error path is kept for symmetry with `persisted`.
    pub fn pending(draft_text: &str) -> Result<Self, DomainError> {
        let name = NonEmptyText::new(draft_text)?;
        let last_increase = local_date_time_from_millis(Local::now().timestamp_millis())?;

        Ok(Self::PendingCreation {
            number_of_days: INITIAL_COUNTER_VALUE,
            name,
            last_increase,
        })
    }

    /// Return a copy of this counter with the streak increased by one day
    ///
    /// Fails with `AlreadyIncreasedToday` if the counter was already increased
    /// on the current local calendar day. A counter whose streak is zero is
    /// exempt from that check: a freshly created counter has no prior "today"
    /// to collide with. Note this exemption also applies to a counter reset
    /// to zero; see the tests for the flagged edge case.
    pub fn increased(&self) -> Result<Self, DomainError> {
        let now = Local::now().naive_local();
        if self.was_increased_on(now.date()) {
            return Err(DomainError::AlreadyIncreasedToday);
        }

        let mut increased = self.clone();
        match &mut increased {
            Self::Persisted {
                number_of_days,
                last_increase,
                ..
            }
            | Self::PendingCreation {
                number_of_days,
                last_increase,
                ..
            } => {
                *number_of_days += 1;
                *last_increase = now;
            }
        }
        Ok(increased)
    }

    /// Promote a pending counter to persisted once the store assigns an id
    ///
    /// A counter that is already persisted keeps its original id; the id is
    /// fixed for the entity's lifetime.
    pub fn promoted(self, id: u32) -> Result<Self, DomainError> {
        if id == 0 {
            return Err(DomainError::IdMustBePositive);
        }
        match self {
            Self::PendingCreation {
                number_of_days,
                name,
                last_increase,
            } => Ok(Self::Persisted {
                id,
                number_of_days,
                name,
                last_increase,
            }),
            persisted @ Self::Persisted { .. } => Ok(persisted),
        }
    }

    /// The store-assigned id, absent before first persistence
    pub fn id(&self) -> Option<u32> {
        match self {
            Self::Persisted { id, .. } => Some(*id),
            Self::PendingCreation { .. } => None,
        }
    }

    /// Consecutive days this habit has been kept
    pub fn number_of_days(&self) -> u32 {
        match self {
            Self::Persisted { number_of_days, .. }
            | Self::PendingCreation { number_of_days, .. } => *number_of_days,
        }
    }

    /// Display name of the habit
    pub fn name(&self) -> &NonEmptyText {
        match self {
            Self::Persisted { name, .. } | Self::PendingCreation { name, .. } => name,
        }
    }

    /// Local date-time of the last successful increase (or creation)
    pub fn last_increase(&self) -> NaiveDateTime {
        match self {
            Self::Persisted { last_increase, .. }
            | Self::PendingCreation { last_increase, .. } => *last_increase,
        }
    }

    fn was_increased_on(&self, today: NaiveDate) -> bool {
        self.last_increase().date() == today && self.number_of_days() != INITIAL_COUNTER_VALUE
    }
}

/// Resolve epoch milliseconds to a local date-time
///
/// A DST fold resolves to the earlier of the two candidate wall-clock times;
/// out-of-range values fail with `TimestampConversionFailure`.
fn local_date_time_from_millis(millis: i64) -> Result<NaiveDateTime, DomainError> {
    match Local.timestamp_millis_opt(millis) {
        LocalResult::Single(date_time) => Ok(date_time.naive_local()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.naive_local()),
        LocalResult::None => Err(DomainError::TimestampConversionFailure),
    }
}
