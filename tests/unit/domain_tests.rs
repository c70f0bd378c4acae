/// Unit tests exercising the public domain and effect surface
use habit_counter::*;

#[cfg(test)]
mod domain_unit_tests {
    use super::*;
    use chrono::{Duration, Local};

    #[test]
    fn non_empty_text_round_trip() {
        let name = NonEmptyText::new("reading").unwrap();
        assert_eq!(name.as_str(), "reading");
        assert_eq!(name.to_string(), "reading");
    }

    #[test]
    fn non_empty_text_rejects_empty_input() {
        assert!(matches!(NonEmptyText::new(""), Err(DomainError::EmptyName)));
    }

    #[test]
    fn persisted_counter_construction_and_increase() {
        let yesterday_ten = (Local::now() - Duration::days(1)).timestamp_millis();
        let counter = HabitCounter::persisted(1, 3, "reading", yesterday_ten).unwrap();

        let increased = counter.increased().unwrap();
        assert_eq!(increased.number_of_days(), 4);

        assert!(matches!(
            increased.increased(),
            Err(DomainError::AlreadyIncreasedToday)
        ));
    }

    #[test]
    fn pending_counter_has_no_id_until_promoted() {
        let pending = HabitCounter::pending("workout").unwrap();
        assert_eq!(pending.id(), None);

        let persisted = pending.promoted(5).unwrap();
        assert_eq!(persisted.id(), Some(5));
    }

    #[test]
    fn effect_queue_is_fifo() {
        let queue = EffectQueue::new();
        queue.enqueue(Effect::RequestFocusOnNewHabitInput);
        queue.enqueue(Effect::HideKeyboard);

        assert_eq!(
            queue.consume_next(),
            Some(Effect::RequestFocusOnNewHabitInput)
        );
        assert_eq!(queue.consume_next(), Some(Effect::HideKeyboard));
        assert_eq!(queue.consume_next(), None);
    }

    #[test]
    fn projection_keeps_only_valid_persisted_counters() {
        let counter =
            HabitCounter::persisted(2, 9, "reading", Local::now().timestamp_millis()).unwrap();
        let state = HabitsState {
            counters: vec![Err(DomainError::EmptyName), Ok(counter)],
            ..HabitsState::default()
        };

        let view = HabitsViewState::from(&state);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, 2);
        assert_eq!(view.items[0].count, 9);
    }
}
