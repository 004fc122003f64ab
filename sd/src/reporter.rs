//! Report slot orchestration
//!
//! Ties the snapshot, the analyzer, and the message builders together.
//! What a slot says (or whether it stays silent) is decided entirely by
//! the builders in `studycore::report`; this module only fetches state,
//! hands the text to the notifier, and logs the outcome.

use crate::notify::Notifier;
use crate::state::StateManager;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use studycore::diff::StateDiff;
use studycore::domain::AppState;
use studycore::{analyzer, report};
use tracing::{debug, error, info, warn};

/// The three daily report slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSlot {
    Morning,
    Midday,
    Evening,
}

impl ReportSlot {
    pub const ALL: [ReportSlot; 3] = [ReportSlot::Morning, ReportSlot::Midday, ReportSlot::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSlot::Morning => "morning",
            ReportSlot::Midday => "midday",
            ReportSlot::Evening => "evening",
        }
    }
}

impl FromStr for ReportSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(ReportSlot::Morning),
            "midday" => Ok(ReportSlot::Midday),
            "evening" => Ok(ReportSlot::Evening),
            _ => Err(format!("Unknown slot: {}. Use: morning, midday, evening", s)),
        }
    }
}

impl fmt::Display for ReportSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened when a slot ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// Message built and delivered
    Sent,
    /// The builder decided there was nothing to say
    Skipped,
    /// Message built but delivery failed
    Failed,
}

impl SlotOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotOutcome::Sent => "sent",
            SlotOutcome::Skipped => "skipped",
            SlotOutcome::Failed => "failed",
        }
    }
}

/// Load the snapshot for a report surface
///
/// Reports must go out even when the store is unreadable, so an absent or
/// malformed snapshot degrades to the empty state here.
pub async fn snapshot_or_empty(state: &StateManager) -> AppState {
    match state.get().await {
        Ok(Some(state)) => state,
        Ok(None) => AppState::default(),
        Err(e) => {
            warn!("Reporting over unreadable snapshot: {}", e);
            AppState::default()
        }
    }
}

/// Build the text a slot would send, `None` when the slot stays silent
pub async fn build_slot(state: &StateManager, slot: ReportSlot, today: NaiveDate) -> Option<String> {
    let snapshot = snapshot_or_empty(state).await;
    let analysis = analyzer::analyze(&snapshot, today);
    debug!(
        slot = slot.as_str(),
        overdue = analysis.overdue.len(),
        due_today = analysis.due_today.len(),
        done_today = analysis.done_today.len(),
        "build_slot: analysis ready"
    );

    let mut rng = rand::rng();
    match slot {
        ReportSlot::Morning => Some(report::morning_report(&analysis, today)),
        ReportSlot::Midday => report::midday_nudge(&analysis, &mut rng),
        ReportSlot::Evening => report::evening_report(&analysis, today, &mut rng),
    }
}

/// Runs report slots and sync notices against a notifier
#[derive(Clone)]
pub struct Reporter {
    state: StateManager,
    notifier: Arc<dyn Notifier>,
}

impl Reporter {
    pub fn new(state: StateManager, notifier: Arc<dyn Notifier>) -> Self {
        Self { state, notifier }
    }

    /// Run one slot end to end
    ///
    /// Delivery failures are logged here and reported in the outcome;
    /// they never propagate to the trigger loop.
    pub async fn run_slot(&self, slot: ReportSlot, today: NaiveDate) -> SlotOutcome {
        debug!(slot = slot.as_str(), %today, "run_slot: called");

        let Some(text) = build_slot(&self.state, slot, today).await else {
            info!(slot = slot.as_str(), "Report skipped, nothing to say");
            return SlotOutcome::Skipped;
        };

        match self.notifier.send(&text).await {
            Ok(()) => {
                info!(slot = slot.as_str(), "Report sent");
                SlotOutcome::Sent
            }
            Err(e) => {
                error!(slot = slot.as_str(), "Report delivery failed: {}", e);
                SlotOutcome::Failed
            }
        }
    }

    /// Send the addition and completion notices a sync produced
    ///
    /// Best effort on both notices; a failed one does not stop the other.
    pub async fn run_sync_notices(&self, diff: &StateDiff) {
        let addition = report::addition_notice(diff);
        let completion = {
            let mut rng = rand::rng();
            report::completion_notice(diff, &mut rng)
        };

        if let Some(text) = addition {
            match self.notifier.send(&text).await {
                Ok(()) => info!("Addition notice sent"),
                Err(e) => error!("Addition notice failed: {}", e),
            }
        }

        if let Some(text) = completion {
            match self.notifier.send(&text).await {
                Ok(()) => info!("Completion notice sent"),
                Err(e) => error!("Completion notice failed: {}", e),
            }
        }
    }
}
