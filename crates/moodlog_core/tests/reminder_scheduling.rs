use moodlog_core::db::open_db_in_memory;
use moodlog_core::{
    CollectingSink, DailyTrigger, DeliveryError, DeliveryStage, EntryStore, NotificationSink,
    PlanError, ReminderPayload, ReminderScheduler, ReminderService, ReminderServiceError,
    ReminderSettings, SchedulerError, SqliteKeyValueStore, TimeOfDay, WakingWindow,
};
use std::cell::{Cell, RefCell};

/// Sink that mirrors platform state and can be told to fail.
#[derive(Default)]
struct FlakySink {
    active: RefCell<Vec<(u8, u8)>>,
    cancel_calls: Cell<usize>,
    fail_cancel: Cell<bool>,
    fail_register_after: Cell<Option<usize>>,
}

impl FlakySink {
    fn active(&self) -> Vec<(u8, u8)> {
        self.active.borrow().clone()
    }
}

impl NotificationSink for FlakySink {
    fn cancel_all(&self) -> Result<(), DeliveryError> {
        self.cancel_calls.set(self.cancel_calls.get() + 1);
        if self.fail_cancel.get() {
            return Err(DeliveryError::PermissionDenied);
        }
        self.active.borrow_mut().clear();
        Ok(())
    }

    fn schedule_recurring_daily(
        &self,
        hour: u8,
        minute: u8,
        _payload: &ReminderPayload,
    ) -> Result<(), DeliveryError> {
        if let Some(limit) = self.fail_register_after.get() {
            if self.active.borrow().len() >= limit {
                return Err(DeliveryError::Platform("scheduler offline".to_string()));
            }
        }
        self.active.borrow_mut().push((hour, minute));
        Ok(())
    }
}

fn window(wake: &str, bed: &str) -> WakingWindow {
    WakingWindow::new(wake.parse().unwrap(), bed.parse().unwrap()).unwrap()
}

fn hm(times: &[TimeOfDay]) -> Vec<(u8, u8)> {
    times.iter().map(|t| (t.hour(), t.minute())).collect()
}

#[test]
fn reschedule_registers_evenly_spaced_daily_triggers() {
    let scheduler = ReminderScheduler::new(CollectingSink::new());
    let times = scheduler.reschedule_all(&window("08:00", "22:00")).unwrap();

    let expected = vec![(8, 0), (11, 30), (15, 0), (18, 30), (22, 0)];
    assert_eq!(hm(&times), expected);

    let triggers = scheduler.sink().active_triggers();
    let registered: Vec<(u8, u8)> = triggers.iter().map(|t| (t.hour, t.minute)).collect();
    assert_eq!(registered, expected);
    assert!(triggers
        .iter()
        .all(|DailyTrigger { payload, .. }| payload.title == "Mood Check 🧠"));
}

#[test]
fn reschedule_twice_equals_once() {
    let scheduler = ReminderScheduler::new(FlakySink::default());
    let w = window("07:00", "23:00");

    scheduler.reschedule_all(&w).unwrap();
    let once = scheduler.sink().active();
    scheduler.reschedule_all(&w).unwrap();

    assert_eq!(scheduler.sink().active(), once);
    assert_eq!(once.len(), 5);
    assert_eq!(scheduler.sink().cancel_calls.get(), 2);
}

#[test]
fn new_window_replaces_previous_reminders() {
    let scheduler = ReminderScheduler::new(FlakySink::default());
    scheduler.reschedule_all(&window("08:00", "22:00")).unwrap();
    scheduler.reschedule_all(&window("10:00", "12:00")).unwrap();

    assert_eq!(
        scheduler.sink().active(),
        vec![(10, 0), (10, 30), (11, 0), (11, 30), (12, 0)]
    );
}

#[test]
fn narrow_window_registers_each_minute_once() {
    let scheduler = ReminderScheduler::new(FlakySink::default());
    let times = scheduler.reschedule_all(&window("09:00", "09:02")).unwrap();

    let expected = vec![(9, 0), (9, 1), (9, 2)];
    assert_eq!(hm(&times), expected);
    assert_eq!(scheduler.sink().active(), expected);
}

#[test]
fn cancel_failure_leaves_prior_schedule_intact() {
    let scheduler = ReminderScheduler::new(FlakySink::default());
    scheduler.reschedule_all(&window("08:00", "22:00")).unwrap();
    let before = scheduler.sink().active();

    scheduler.sink().fail_cancel.set(true);
    let err = scheduler
        .reschedule_all(&window("09:00", "21:00"))
        .unwrap_err();

    assert!(matches!(
        err,
        SchedulerError::DeliveryUnavailable {
            stage: DeliveryStage::Cancel,
            registered: 0,
            cause: DeliveryError::PermissionDenied,
        }
    ));
    assert_eq!(scheduler.sink().active(), before);
}

#[test]
fn register_failure_after_cancel_is_not_rolled_back() {
    let scheduler = ReminderScheduler::new(FlakySink::default());
    scheduler.reschedule_all(&window("08:00", "22:00")).unwrap();

    scheduler.sink().fail_register_after.set(Some(2));
    let err = scheduler
        .reschedule_all(&window("09:00", "21:00"))
        .unwrap_err();

    match err {
        SchedulerError::DeliveryUnavailable {
            stage, registered, ..
        } => {
            assert_eq!(stage, DeliveryStage::Register);
            assert_eq!(registered, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(scheduler.sink().active(), vec![(9, 0), (12, 0)]);
}

#[test]
fn first_register_failure_leaves_zero_reminders() {
    let scheduler = ReminderScheduler::new(FlakySink::default());
    scheduler.reschedule_all(&window("08:00", "22:00")).unwrap();

    scheduler.sink().fail_register_after.set(Some(0));
    let err = scheduler
        .reschedule_all(&window("08:00", "22:00"))
        .unwrap_err();

    assert!(matches!(
        err,
        SchedulerError::DeliveryUnavailable { registered: 0, .. }
    ));
    assert!(scheduler.sink().active().is_empty());
}

#[test]
fn unsupported_count_fails_before_touching_sink() {
    let settings = ReminderSettings {
        count: 1,
        ..ReminderSettings::default()
    };
    let scheduler = ReminderScheduler::with_settings(FlakySink::default(), settings);

    let err = scheduler
        .reschedule_all(&window("08:00", "22:00"))
        .unwrap_err();
    assert_eq!(err, SchedulerError::Plan(PlanError::InvalidCount(1)));
    assert_eq!(scheduler.sink().cancel_calls.get(), 0);
}

#[test]
fn update_waking_hours_persists_then_reschedules() {
    let store = EntryStore::new(SqliteKeyValueStore::new(open_db_in_memory().unwrap()));
    let service = ReminderService::new(&store, ReminderScheduler::new(FlakySink::default()));
    let w = window("06:00", "18:00");

    let times = service.update_waking_hours(&w).unwrap();

    assert_eq!(hm(&times), vec![(6, 0), (9, 0), (12, 0), (15, 0), (18, 0)]);
    assert_eq!(store.get_waking_window(), Some(w));
    assert_eq!(service.scheduler().sink().active(), hm(&times));
}

#[test]
fn delivery_failure_still_keeps_saved_window() {
    let store = EntryStore::new(SqliteKeyValueStore::new(open_db_in_memory().unwrap()));
    let sink = FlakySink::default();
    sink.fail_cancel.set(true);
    let service = ReminderService::new(&store, ReminderScheduler::new(sink));
    let w = window("06:00", "18:00");

    let err = service.update_waking_hours(&w).unwrap_err();

    assert!(matches!(
        err,
        ReminderServiceError::Scheduler(SchedulerError::DeliveryUnavailable { .. })
    ));
    assert_eq!(store.get_waking_window(), Some(w));
}

#[test]
fn restore_schedule_uses_default_window_when_unset() {
    let store = EntryStore::new(SqliteKeyValueStore::new(open_db_in_memory().unwrap()));
    let service = ReminderService::new(&store, ReminderScheduler::new(FlakySink::default()));

    let times = service.restore_schedule().unwrap();

    assert_eq!(
        hm(&times),
        vec![(8, 0), (11, 30), (15, 0), (18, 30), (22, 0)]
    );
    assert_eq!(service.current_window(), WakingWindow::default());
}
