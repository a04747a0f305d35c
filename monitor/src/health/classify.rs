//! Failure-message classification
//!
//! An explicit, ordered list of (markers, action) rules replaces dispatching
//! out of a global error hook. Benign rules sit ahead of recovery rules so a
//! settings-immutable error can never start a reconfiguration loop.

use tracing::debug;

/// What to do with a classified failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Known-benign: log and swallow, never recover
    Suppress,
    /// Backend-originated: swallow and schedule one recovery attempt
    SuppressAndRecover,
    /// Not ours: let default handling proceed
    Propagate,
}

struct ClassifierRule {
    markers: Vec<String>,
    action: FailureAction,
}

/// Ordered substring classifier for uncaught failure messages.
pub struct FailureClassifier {
    rules: Vec<ClassifierRule>,
}

impl FailureClassifier {
    /// Build the rule list. Benign markers are installed first; rule order
    /// is evaluation order.
    pub fn new(benign_markers: Vec<String>, recovery_markers: Vec<String>) -> Self {
        let rules = vec![
            ClassifierRule {
                markers: lowercased(benign_markers),
                action: FailureAction::Suppress,
            },
            ClassifierRule {
                markers: lowercased(recovery_markers),
                action: FailureAction::SuppressAndRecover,
            },
        ];
        Self { rules }
    }

    /// Classify a message against the rules in order. Matching is
    /// case-insensitive substring containment.
    pub fn classify(&self, message: &str) -> FailureAction {
        let needle = message.to_lowercase();

        for rule in &self.rules {
            if rule.markers.iter().any(|m| needle.contains(m.as_str())) {
                debug!("Failure message matched {:?} rule: {}", rule.action, message);
                return rule.action;
            }
        }

        FailureAction::Propagate
    }
}

fn lowercased(markers: Vec<String>) -> Vec<String> {
    markers.into_iter().map(|m| m.to_lowercase()).collect()
}
