//! Service-start / waiting-time recurrence
//!
//! ```text
//! start[0] = arrival[0]
//! start[i] = max(arrival[i], start[i-1] + service[i-1] + downtime[i-1])
//! wait[i]  = start[i] - arrival[i]
//! ```
//!
//! applied independently to each channel's sub-sequence.

use log::{debug, info};
use std::collections::{HashMap, HashSet};

use super::assignment::{ChannelAssignment, ChannelPlan};
use super::ordering::order_records;
use super::SimulationError;
use crate::models::{AnnotatedRecord, Timing, TransactionRecord};

/// Result of replaying one record on its channel
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChannelSlot {
    channel: usize,
    service_start_min: f64,
    waiting_time_min: f64,
}

/// Replays time-ordered records through one or more service channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingTimeSimulator {
    assignment: ChannelAssignment,
}

impl WaitingTimeSimulator {
    /// # Errors
    /// `InvalidParameter` if the assignment has zero channels.
    pub fn new(assignment: ChannelAssignment) -> Result<Self, SimulationError> {
        assignment.validate()?;
        Ok(Self { assignment })
    }

    pub fn assignment(&self) -> &ChannelAssignment {
        &self.assignment
    }

    /// Annotate already time-ordered records with service start and waiting time
    ///
    /// The output has one entry per input record, in input order.
    ///
    /// # Errors
    /// - `MissingField` if a timing field (or `server_id` for `ByServerId`) is absent
    /// - `InvariantViolation` if timings are negative or non-finite, record ids
    ///   repeat, arrivals go backwards within a channel, or a wait comes out negative
    pub fn run(&self, records: &[TransactionRecord]) -> Result<Vec<AnnotatedRecord>, SimulationError> {
        let timings = records
            .iter()
            .map(|r| r.timing().map_err(SimulationError::from))
            .collect::<Result<Vec<Timing>, _>>()?;

        let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id()) {
                return Err(SimulationError::InvariantViolation(format!(
                    "duplicate record id {}",
                    record.id()
                )));
            }
        }

        let plans = self.assignment.partition(records)?;

        let mut slots: HashMap<&str, ChannelSlot> = HashMap::with_capacity(records.len());
        for (channel, plan) in plans.iter().enumerate() {
            replay_channel(channel, plan, records, &timings, &mut slots)?;
        }

        let annotated = records
            .iter()
            .map(|record| {
                let slot = slots.remove(record.id()).ok_or_else(|| {
                    SimulationError::InvariantViolation(format!(
                        "record {} was not assigned to any channel",
                        record.id()
                    ))
                })?;
                Ok(AnnotatedRecord {
                    record: record.clone(),
                    channel: plans[slot.channel].name.clone(),
                    service_start_min: slot.service_start_min,
                    waiting_time_min: slot.waiting_time_min,
                })
            })
            .collect::<Result<Vec<_>, SimulationError>>()?;

        info!(
            "Simulated {} records over {} channel(s)",
            annotated.len(),
            plans.len()
        );
        Ok(annotated)
    }

    /// Number of channels this simulator would use for `records`
    pub fn channel_count(&self, records: &[TransactionRecord]) -> Result<usize, SimulationError> {
        Ok(self.assignment.partition(records)?.len())
    }
}

fn replay_channel<'a>(
    channel: usize,
    plan: &ChannelPlan,
    records: &'a [TransactionRecord],
    timings: &[Timing],
    slots: &mut HashMap<&'a str, ChannelSlot>,
) -> Result<(), SimulationError> {
    // (arrival, finish) of the previous record on this channel
    let mut previous: Option<(f64, f64)> = None;
    let mut total_wait = 0.0;

    for &position in &plan.positions {
        let record = &records[position];
        let timing = timings[position];

        let service_start_min = match previous {
            None => timing.arrival_min,
            Some((prev_arrival, prev_finish)) => {
                if timing.arrival_min < prev_arrival {
                    return Err(SimulationError::InvariantViolation(format!(
                        "record {} arrives at {} before the previous record on {} ({})",
                        record.id(),
                        timing.arrival_min,
                        plan.name,
                        prev_arrival
                    )));
                }
                timing.arrival_min.max(prev_finish)
            }
        };

        let waiting_time_min = service_start_min - timing.arrival_min;
        if waiting_time_min < 0.0 || !waiting_time_min.is_finite() {
            return Err(SimulationError::InvariantViolation(format!(
                "record {} has negative waiting time {}",
                record.id(),
                waiting_time_min
            )));
        }

        total_wait += waiting_time_min;
        previous = Some((timing.arrival_min, timing.finish_from(service_start_min)));
        slots.insert(
            record.id(),
            ChannelSlot {
                channel,
                service_start_min,
                waiting_time_min,
            },
        );
    }

    if !plan.positions.is_empty() {
        debug!(
            "Channel {}: {} records, mean wait {:.3} min",
            plan.name,
            plan.positions.len(),
            total_wait / plan.positions.len() as f64
        );
    }
    Ok(())
}

/// Order a raw log and annotate it in one pass
///
/// # Example
/// ```
/// use atm_queue_core_rs::simulation::{annotate_waiting_times, ChannelAssignment};
/// use atm_queue_core_rs::TransactionRecord;
///
/// let log = vec![
///     TransactionRecord::new(2.0, 1.0, 0.0).with_timestamp("2024-03-01", "09:02"),
///     TransactionRecord::new(0.0, 4.0, 0.0).with_timestamp("2024-03-01", "09:00"),
/// ];
/// let annotated = annotate_waiting_times(log, &ChannelAssignment::Single).unwrap();
/// assert_eq!(annotated[0].record.arrival_time_min(), Some(0.0));
/// assert_eq!(annotated[1].waiting_time_min, 2.0);
/// ```
pub fn annotate_waiting_times(
    records: Vec<TransactionRecord>,
    assignment: &ChannelAssignment,
) -> Result<Vec<AnnotatedRecord>, SimulationError> {
    let simulator = WaitingTimeSimulator::new(assignment.clone())?;
    let ordered = order_records(records)?;
    simulator.run(&ordered)
}
