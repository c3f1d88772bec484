//! Checkout attempt status.

use serde::{Deserialize, Serialize};

/// Where a single checkout attempt currently is.
///
/// ```text
/// Idle → CreatingOrder → AwaitingKey → LoadingWidgetScript → WidgetOpen → Verifying → Completed
///              │              │                │                  │            │
///              └──────────────┴────────────────┴──→ Failed ←──────┴────────────┘
///                                                                 │
///                                                                 └──→ Abandoned
/// ```
///
/// `Completed`, `Failed` and `Abandoned` are terminal: a new attempt starts
/// again from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    #[default]
    Idle,
    CreatingOrder,
    AwaitingKey,
    LoadingWidgetScript,
    WidgetOpen,
    Verifying,
    Completed,
    Failed,
    Abandoned,
}

impl CheckoutStatus {
    /// Whether the attempt has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Abandoned)
    }

    /// Whether moving from `self` to `next` is a legal step.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::CreatingOrder)
                | (Self::CreatingOrder, Self::AwaitingKey | Self::Failed)
                | (Self::AwaitingKey, Self::LoadingWidgetScript | Self::Failed)
                | (Self::LoadingWidgetScript, Self::WidgetOpen | Self::Failed)
                | (Self::WidgetOpen, Self::Verifying | Self::Abandoned | Self::Failed)
                | (Self::Verifying, Self::Completed | Self::Failed)
        )
    }
}

impl std::fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::CreatingOrder => "creating_order",
            Self::AwaitingKey => "awaiting_key",
            Self::LoadingWidgetScript => "loading_widget_script",
            Self::WidgetOpen => "widget_open",
            Self::Verifying => "verifying",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Abandoned => "abandoned",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CheckoutStatus; 9] = [
        CheckoutStatus::Idle,
        CheckoutStatus::CreatingOrder,
        CheckoutStatus::AwaitingKey,
        CheckoutStatus::LoadingWidgetScript,
        CheckoutStatus::WidgetOpen,
        CheckoutStatus::Verifying,
        CheckoutStatus::Completed,
        CheckoutStatus::Failed,
        CheckoutStatus::Abandoned,
    ];

    #[test]
    fn test_happy_path_is_legal() {
        let path = [
            CheckoutStatus::Idle,
            CheckoutStatus::CreatingOrder,
            CheckoutStatus::AwaitingKey,
            CheckoutStatus::LoadingWidgetScript,
            CheckoutStatus::WidgetOpen,
            CheckoutStatus::Verifying,
            CheckoutStatus::Completed,
        ];
        for pair in path.windows(2) {
            if let [from, to] = pair {
                assert!(from.can_transition_to(*to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_only_open_widget_can_be_abandoned() {
        for from in ALL {
            let expected = from == CheckoutStatus::WidgetOpen;
            assert_eq!(from.can_transition_to(CheckoutStatus::Abandoned), expected);
        }
    }

    #[test]
    fn test_idle_cannot_fail_without_starting() {
        assert!(!CheckoutStatus::Idle.can_transition_to(CheckoutStatus::Failed));
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&CheckoutStatus::WidgetOpen).ok().as_deref(),
            Some("\"widget_open\"")
        );
    }
}
