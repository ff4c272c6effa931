//! Pod, PodResult, Round and the points ledger.

use serde::{Deserialize, Deserializer, Serialize};

/// Label of the pod that holds players who skip the semi-final.
pub const AUTO_FINAL_LABEL: &str = "Automatically qualified for final";
/// Label given to bye pods.
pub const BYE_LABEL: &str = "Bye";

/// Outcome recorded for a pod.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum PodResult {
    /// Not reported yet.
    #[default]
    #[serde(rename = "")]
    Pending,
    #[serde(rename = "win")]
    Win,
    #[serde(rename = "draw")]
    Draw,
    #[serde(rename = "bye")]
    Bye,
    #[serde(rename = "auto-final")]
    AutoFinal,
}

impl PodResult {
    pub fn is_reported(self) -> bool {
        self != PodResult::Pending
    }
}

/// A group of players seated together for one round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    pub label: String,
    pub players: Vec<String>,
    #[serde(default)]
    pub result: PodResult,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub winner: Option<String>,
}

impl Pod {
    /// A regular, unreported pod.
    pub fn new(label: impl Into<String>, players: Vec<String>) -> Self {
        Self {
            label: label.into(),
            players,
            result: PodResult::Pending,
            winner: None,
        }
    }

    /// A bye pod; its result is fixed at creation.
    pub fn bye(players: Vec<String>) -> Self {
        Self {
            result: PodResult::Bye,
            ..Self::new(BYE_LABEL, players)
        }
    }

    /// Bye and auto-final pods carry a result from creation and cannot be reported on.
    pub fn is_fixed(&self) -> bool {
        matches!(self.result, PodResult::Bye | PodResult::AutoFinal)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }
}

/// Stored records used "" for "no winner".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Playoff label overriding the plain round number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RoundLabel {
    #[serde(rename = "Semi-Final")]
    SemiFinal,
    #[serde(rename = "Final")]
    Final,
}

/// One entry of a round's points ledger.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointsChange {
    pub name: String,
    pub change: i64,
    /// Set for the per-round penalty charged to dropped players.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dropped: bool,
}

impl PointsChange {
    pub fn new(name: impl Into<String>, change: i64) -> Self {
        Self {
            name: name.into(),
            change,
            dropped: false,
        }
    }
}

/// One round of the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "RoundRecord", rename_all = "camelCase")]
pub struct Round {
    /// 1-based sequence number.
    pub round: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<RoundLabel>,
    pub pods: Vec<Pod>,
    /// Deltas applied when this round was created (the previous round's scoring).
    pub points_changes: Vec<PointsChange>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_top_cut: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_final: bool,
    /// This round's own results have been scored.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub points_applied: bool,
    /// The Final's own scoring, applied at lock time. Always written, so records from
    /// before this field can be told apart.
    pub final_points_changes: Vec<PointsChange>,
    /// Bye history before this round's pods were built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_bye_history: Option<Vec<String>>,
}

/// On-disk shape of a round, including records written before `finalPointsChanges`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoundRecord {
    round: u32,
    #[serde(default)]
    label: Option<RoundLabel>,
    pods: Vec<Pod>,
    #[serde(default)]
    points_changes: Vec<PointsChange>,
    #[serde(default)]
    is_top_cut: bool,
    #[serde(default)]
    is_final: bool,
    #[serde(default)]
    points_applied: bool,
    #[serde(default)]
    final_points_changes: Option<Vec<PointsChange>>,
    #[serde(default)]
    prior_bye_history: Option<Vec<String>>,
}

impl From<RoundRecord> for Round {
    fn from(r: RoundRecord) -> Self {
        let mut points_changes = r.points_changes;
        // Older locked finals kept their own scoring in `pointsChanges`.
        let final_points_changes = match r.final_points_changes {
            Some(changes) => changes,
            None if r.label == Some(RoundLabel::Final) && r.points_applied => {
                std::mem::take(&mut points_changes)
            }
            None => Vec::new(),
        };
        Self {
            round: r.round,
            label: r.label,
            pods: r.pods,
            points_changes,
            is_top_cut: r.is_top_cut,
            is_final: r.is_final,
            points_applied: r.points_applied,
            final_points_changes,
            prior_bye_history: r.prior_bye_history,
        }
    }
}

impl Round {
    pub fn new(round: u32, pods: Vec<Pod>, points_changes: Vec<PointsChange>) -> Self {
        Self {
            round,
            label: None,
            pods,
            points_changes,
            is_top_cut: false,
            is_final: false,
            points_applied: false,
            final_points_changes: Vec::new(),
            prior_bye_history: None,
        }
    }

    /// Every pod that needs a report has one.
    pub fn is_complete(&self) -> bool {
        self.pods.iter().all(|p| p.result.is_reported())
    }

    pub fn is_final_round(&self) -> bool {
        self.label == Some(RoundLabel::Final)
    }
}
