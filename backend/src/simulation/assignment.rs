//! Channel assignment rules
//!
//! Decides which service channel (ATM unit) each record of a time-ordered
//! log is replayed on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::SimulationError;
use crate::models::TransactionRecord;

/// How records are partitioned across service channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChannelAssignment {
    /// Every record on one channel
    #[default]
    Single,

    /// Record `i` of the global order goes to channel `i % channels`
    RoundRobin { channels: usize },

    /// Records are grouped by their `server_id` column
    ByServerId,
}

/// Positions (into the global order) replayed on one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPlan {
    pub name: String,
    pub positions: Vec<usize>,
}

impl ChannelAssignment {
    pub fn validate(&self) -> Result<(), SimulationError> {
        match self {
            ChannelAssignment::RoundRobin { channels: 0 } => Err(SimulationError::InvalidParameter(
                "round-robin assignment needs at least one channel".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Split record positions into per-channel plans, keeping relative order
    ///
    /// # Errors
    /// `MissingField` if `ByServerId` is used and a record has no `server_id`.
    pub fn partition(&self, records: &[TransactionRecord]) -> Result<Vec<ChannelPlan>, SimulationError> {
        self.validate()?;

        match self {
            ChannelAssignment::Single => Ok(vec![ChannelPlan {
                name: channel_name(0),
                positions: (0..records.len()).collect(),
            }]),

            ChannelAssignment::RoundRobin { channels } => {
                let mut plans: Vec<ChannelPlan> = (0..*channels)
                    .map(|k| ChannelPlan {
                        name: channel_name(k),
                        positions: Vec::with_capacity(records.len() / channels + 1),
                    })
                    .collect();
                for position in 0..records.len() {
                    plans[position % channels].positions.push(position);
                }
                Ok(plans)
            }

            ChannelAssignment::ByServerId => {
                let mut plans: Vec<ChannelPlan> = Vec::new();
                let mut index: HashMap<&str, usize> = HashMap::new();
                for (position, record) in records.iter().enumerate() {
                    let server = record
                        .server_id()
                        .ok_or_else(|| SimulationError::MissingField {
                            record_id: record.id().to_string(),
                            field: "server_id",
                        })?;
                    let slot = *index.entry(server).or_insert_with(|| {
                        plans.push(ChannelPlan {
                            name: server.to_string(),
                            positions: Vec::new(),
                        });
                        plans.len() - 1
                    });
                    plans[slot].positions.push(position);
                }
                Ok(plans)
            }
        }
    }
}

fn channel_name(index: usize) -> String {
    format!("ATM-{}", index + 1)
}
