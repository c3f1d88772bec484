//! Wellness goals offered on the intake questionnaire.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One of the fixed goals a client can pick on the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Weight Management")]
    WeightManagement,
    #[serde(rename = "Stress Reduction")]
    StressReduction,
    #[serde(rename = "Improved Flexibility")]
    ImprovedFlexibility,
    #[serde(rename = "Better Sleep")]
    BetterSleep,
    #[serde(rename = "Increased Energy")]
    IncreasedEnergy,
    #[serde(rename = "Mental Clarity")]
    MentalClarity,
    #[serde(rename = "Personal Growth")]
    PersonalGrowth,
    #[serde(rename = "Disease Prevention")]
    DiseasePrevention,
}

impl Goal {
    /// Every goal, in the order the questionnaire lists them.
    pub const ALL: [Self; 8] = [
        Self::WeightManagement,
        Self::StressReduction,
        Self::ImprovedFlexibility,
        Self::BetterSleep,
        Self::IncreasedEnergy,
        Self::MentalClarity,
        Self::PersonalGrowth,
        Self::DiseasePrevention,
    ];

    /// Human-readable label, also used on the wire.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WeightManagement => "Weight Management",
            Self::StressReduction => "Stress Reduction",
            Self::ImprovedFlexibility => "Improved Flexibility",
            Self::BetterSleep => "Better Sleep",
            Self::IncreasedEnergy => "Increased Energy",
            Self::MentalClarity => "Mental Clarity",
            Self::PersonalGrowth => "Personal Growth",
            Self::DiseasePrevention => "Disease Prevention",
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a label is not one of the fixed goals.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown goal: {0}")]
pub struct UnknownGoal(pub String);

impl std::str::FromStr for Goal {
    type Err = UnknownGoal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|goal| goal.label() == s)
            .ok_or_else(|| UnknownGoal(s.to_string()))
    }
}

/// The goals a client selected. No duplicates, no meaningful order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalSet(BTreeSet<Goal>);

impl GoalSet {
    /// An empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Select the goal if it is not selected, deselect it if it is.
    ///
    /// Returns `true` when the goal is selected afterwards.
    ///
    /// ```
    /// use prana_core::{Goal, GoalSet};
    ///
    /// let mut goals = GoalSet::new();
    /// assert!(goals.toggle(Goal::BetterSleep));
    /// assert!(!goals.toggle(Goal::BetterSleep));
    /// assert!(goals.is_empty());
    /// ```
    pub fn toggle(&mut self, goal: Goal) -> bool {
        if self.0.remove(&goal) {
            false
        } else {
            self.0.insert(goal);
            true
        }
    }

    /// Select the goal. Selecting an already selected goal is a no-op.
    pub fn insert(&mut self, goal: Goal) {
        self.0.insert(goal);
    }

    /// Whether the goal is selected.
    #[must_use]
    pub fn contains(&self, goal: Goal) -> bool {
        self.0.contains(&goal)
    }

    /// Number of selected goals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the selected goals.
    pub fn iter(&self) -> impl Iterator<Item = Goal> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Goal> for GoalSet {
    fn from_iter<I: IntoIterator<Item = Goal>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
