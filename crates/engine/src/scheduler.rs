use crate::pipeline::{CycleOutcome, ReportPipeline};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Timelike};
use configuration::{RepeatInterval, ScheduleConfig};
use tokio::sync::watch;

/// When reports are due: a wall-clock time and a repeat interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireSchedule {
    pub at: NaiveTime,
    pub interval: RepeatInterval,
}

impl FireSchedule {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, configuration::error::ConfigError> {
        Ok(Self {
            at: config.fire_time()?,
            interval: config.repeat_interval,
        })
    }

    /// The first fire time strictly after `now`.
    ///
    /// Weekly schedules repeat seven days after `last`, the previous fire time;
    /// the first weekly run is the next occurrence of `at`. Fire times that
    /// passed while a cycle was running are skipped, not caught up.
    pub fn next_after(&self, now: NaiveDateTime, last: Option<NaiveDateTime>) -> NaiveDateTime {
        match self.interval {
            RepeatInterval::EveryMinute => {
                let minute = now
                    .with_second(0)
                    .and_then(|t| t.with_nanosecond(0))
                    .unwrap_or(now);
                minute + Duration::minutes(1)
            }
            RepeatInterval::Daily => self.next_occurrence(now),
            RepeatInterval::Weekly => match last {
                Some(last) => {
                    let mut next = last + Duration::weeks(1);
                    while next <= now {
                        next += Duration::weeks(1);
                    }
                    next
                }
                None => self.next_occurrence(now),
            },
        }
    }

    fn next_occurrence(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.at);
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}

/// The periodic driver of the report pipeline.
///
/// Cycles run one after another inside `run`: a cycle always completes before
/// the next fire time is computed, so two cycles never write concurrently.
pub struct Scheduler {
    pipeline: ReportPipeline,
    schedule: FireSchedule,
    last_fire: Option<NaiveDateTime>,
}

impl Scheduler {
    pub fn new(pipeline: ReportPipeline, schedule: FireSchedule) -> Self {
        Self {
            pipeline,
            schedule,
            last_fire: None,
        }
    }

    /// Runs until `shutdown` carries `true` or its sender is dropped.
    ///
    /// A cycle already in progress is finished before the loop exits.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            at = %self.schedule.at,
            interval = ?self.schedule.interval,
            "Report scheduler started."
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let now = Local::now().naive_local();
            let next = self.schedule.next_after(now, self.last_fire);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!(next_run = %next, "Next report scheduled.");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            self.last_fire = Some(next);
            match self.pipeline.run_cycle().await {
                Ok(CycleOutcome::Written(report)) => {
                    tracing::info!(metrics = report.len(), "Report cycle complete.");
                }
                Ok(CycleOutcome::Skipped { reason }) => {
                    tracing::warn!(reason, "Report cycle skipped.");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Report cycle failed.");
                }
            }
        }

        tracing::info!("Report scheduler stopped.");
    }
}
