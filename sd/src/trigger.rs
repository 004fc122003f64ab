//! Wall-clock trigger for the daily report slots
//!
//! Polls the local time on a short tick instead of sleeping until the
//! next slot, so host suspends and clock jumps cost at most one tick of
//! delay. A slot fires once per local day, the first time a tick lands
//! on or after its configured time; a daemon started late still fires
//! the slots it slept through.

use crate::config::ReportsConfig;
use crate::reporter::{Reporter, ReportSlot, SlotOutcome};
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use eyre::Result;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Periodically checks the clock and runs due report slots
pub struct ReportTrigger {
    times: HashMap<ReportSlot, NaiveTime>,
    tick: Duration,
    reporter: Reporter,
    last_fired: HashMap<ReportSlot, NaiveDate>,
}

impl ReportTrigger {
    pub fn new(config: &ReportsConfig, reporter: Reporter) -> Result<Self> {
        let (morning, midday, evening) = config.parse_times()?;

        let mut times = HashMap::new();
        times.insert(ReportSlot::Morning, morning);
        times.insert(ReportSlot::Midday, midday);
        times.insert(ReportSlot::Evening, evening);

        Ok(Self {
            times,
            tick: Duration::from_secs(config.tick_secs),
            reporter,
            last_fired: HashMap::new(),
        })
    }

    /// Start the trigger loop
    pub async fn run(mut self) {
        info!(
            "Report trigger started (morning {}, midday {}, evening {}, tick {:?})",
            self.times[&ReportSlot::Morning],
            self.times[&ReportSlot::Midday],
            self.times[&ReportSlot::Evening],
            self.tick
        );

        loop {
            let fired = self.check_once(Local::now()).await;
            for (slot, outcome) in fired {
                info!(slot = slot.as_str(), outcome = outcome.as_str(), "Slot fired");
            }

            tokio::time::sleep(self.tick).await;
        }
    }

    /// Run every slot that is due at `now`, in slot order
    pub async fn check_once(&mut self, now: DateTime<Local>) -> Vec<(ReportSlot, SlotOutcome)> {
        let today = now.date_naive();
        let time = now.time();
        let mut fired = Vec::new();

        for slot in ReportSlot::ALL {
            if time < self.times[&slot] {
                continue;
            }
            if self.last_fired.get(&slot) == Some(&today) {
                continue;
            }

            debug!(slot = slot.as_str(), %today, "Slot due");
            let outcome = self.reporter.run_slot(slot, today).await;

            // A skip still counts as fired; silence was the slot's answer
            self.last_fired.insert(slot, today);
            fired.push((slot, outcome));
        }

        fired
    }

    #[cfg(test)]
    fn last_fired(&self, slot: ReportSlot) -> Option<NaiveDate> {
        self.last_fired.get(&slot).copied()
    }

    #[cfg(test)]
    fn set_last_fired(&mut self, slot: ReportSlot, date: NaiveDate) {
        self.last_fired.insert(slot, date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::mock::MockNotifier;
    use crate::state::{SnapshotStore, StateManager};
    use chrono::TimeZone;
    use std::sync::Arc;
    use studycore::domain::{AppState, Task, TaskKind};
    use tempfile::tempdir;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    async fn trigger_fixture(
        dir: &tempfile::TempDir,
        with_task: bool,
    ) -> (ReportTrigger, Arc<MockNotifier>, StateManager) {
        let manager = StateManager::spawn(SnapshotStore::new(dir.path().join("state.json")));
        if with_task {
            let mut state = AppState::default();
            state.tasks.push(Task::new(
                "Paragraf denemesi",
                TaskKind::Question,
                NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            ));
            manager.replace(state).await.unwrap();
        }

        let notifier = Arc::new(MockNotifier::new());
        let reporter = Reporter::new(manager.clone(), notifier.clone());
        let trigger = ReportTrigger::new(&ReportsConfig::default(), reporter).unwrap();
        (trigger, notifier, manager)
    }

    #[tokio::test]
    async fn test_nothing_fires_before_first_slot() {
        let dir = tempdir().unwrap();
        let (mut trigger, notifier, manager) = trigger_fixture(&dir, false).await;

        let fired = trigger.check_once(local(2026, 3, 2, 7, 59)).await;

        assert!(fired.is_empty());
        assert_eq!(notifier.call_count(), 0);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_slot_fires_once_per_day() {
        let dir = tempdir().unwrap();
        let (mut trigger, notifier, manager) = trigger_fixture(&dir, false).await;

        let fired = trigger.check_once(local(2026, 3, 2, 8, 0)).await;
        assert_eq!(fired, vec![(ReportSlot::Morning, SlotOutcome::Sent)]);

        // Next tick on the same day stays quiet
        let fired = trigger.check_once(local(2026, 3, 2, 8, 1)).await;
        assert!(fired.is_empty());
        assert_eq!(notifier.call_count(), 1);

        // The next day it fires again
        let fired = trigger.check_once(local(2026, 3, 3, 8, 0)).await;
        assert_eq!(fired, vec![(ReportSlot::Morning, SlotOutcome::Sent)]);
        assert_eq!(
            trigger.last_fired(ReportSlot::Morning),
            Some(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap())
        );

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_late_start_fires_missed_slots() {
        let dir = tempdir().unwrap();
        let (mut trigger, notifier, manager) = trigger_fixture(&dir, true).await;

        // First tick of a daemon started at 15:00: morning and midday
        // are both past due, evening is not
        let fired = trigger.check_once(local(2026, 3, 2, 15, 0)).await;

        let slots: Vec<ReportSlot> = fired.iter().map(|(slot, _)| *slot).collect();
        assert_eq!(slots, vec![ReportSlot::Morning, ReportSlot::Midday]);
        assert_eq!(notifier.call_count(), 2);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_skipped_slot_counts_as_fired() {
        let dir = tempdir().unwrap();
        // Empty store: midday has nothing pending and skips
        let (mut trigger, notifier, manager) = trigger_fixture(&dir, false).await;
        trigger.set_last_fired(ReportSlot::Morning, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());

        let fired = trigger.check_once(local(2026, 3, 2, 14, 30)).await;
        assert_eq!(fired, vec![(ReportSlot::Midday, SlotOutcome::Skipped)]);

        // The skip is not retried on the next tick
        let fired = trigger.check_once(local(2026, 3, 2, 14, 31)).await;
        assert!(fired.is_empty());
        assert_eq!(notifier.call_count(), 0);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_evening_fires_at_its_time() {
        let dir = tempdir().unwrap();
        let (mut trigger, _notifier, manager) = trigger_fixture(&dir, true).await;
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        trigger.set_last_fired(ReportSlot::Morning, today);
        trigger.set_last_fired(ReportSlot::Midday, today);

        let fired = trigger.check_once(local(2026, 3, 2, 23, 0)).await;

        // A pending task makes the evening report speak
        assert_eq!(fired, vec![(ReportSlot::Evening, SlotOutcome::Sent)]);

        manager.shutdown().await.unwrap();
    }
}
