//! Hover and selection state driven by pointer picks

use crate::keys::{EntityId, ParseKeyError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

/// When a point's name label is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelPolicy {
    #[default]
    #[serde(rename = "hover")]
    Hover,
    #[serde(rename = "selected")]
    Selected,
    #[serde(rename = "hover+selected")]
    HoverSelected,
    #[serde(rename = "all")]
    All,
    #[serde(rename = "off")]
    Off,
}

impl LabelPolicy {
    pub const ALL: [LabelPolicy; 5] = [
        LabelPolicy::Hover,
        LabelPolicy::Selected,
        LabelPolicy::HoverSelected,
        LabelPolicy::All,
        LabelPolicy::Off,
    ];

    pub fn matches(self, hovered: bool, selected: bool) -> bool {
        match self {
            LabelPolicy::Hover => hovered,
            LabelPolicy::Selected => selected,
            LabelPolicy::HoverSelected => hovered || selected,
            LabelPolicy::All => true,
            LabelPolicy::Off => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabelPolicy::Hover => "hover",
            LabelPolicy::Selected => "selected",
            LabelPolicy::HoverSelected => "hover+selected",
            LabelPolicy::All => "all",
            LabelPolicy::Off => "off",
        }
    }
}

impl FromStr for LabelPolicy {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseKeyError {
                kind: "label policy",
                value: s.to_string(),
            })
    }
}

/// Visual reset or emphasis of a point after the hovered id changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverInstruction {
    Exit(EntityId),
    Enter(EntityId),
}

/// Tracks the hovered and selected entity
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    hovered: Option<EntityId>,
    selected: Option<EntityId>,
    label_policy: LabelPolicy,
}

impl SelectionController {
    pub fn new(label_policy: LabelPolicy) -> Self {
        Self {
            label_policy,
            ..Default::default()
        }
    }

    pub fn hovered(&self) -> Option<&EntityId> {
        self.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn label_policy(&self) -> LabelPolicy {
        self.label_policy
    }

    pub fn set_label_policy(&mut self, policy: LabelPolicy) {
        self.label_policy = policy;
    }

    pub fn is_hovered(&self, id: &EntityId) -> bool {
        self.hovered.as_ref() == Some(id)
    }

    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Update the hovered id from a pick result
    ///
    /// Returns nothing when the pick did not change; otherwise an exit for the
    /// previous id (if any) followed by an enter for the new one (if any).
    pub fn pointer_moved(&mut self, next: Option<EntityId>) -> Vec<HoverInstruction> {
        if next == self.hovered {
            return Vec::new();
        }

        let mut instructions = Vec::with_capacity(2);
        if let Some(previous) = self.hovered.take() {
            instructions.push(HoverInstruction::Exit(previous));
        }
        if let Some(id) = &next {
            instructions.push(HoverInstruction::Enter(id.clone()));
        }
        debug!(hovered = ?next, "hover changed");
        self.hovered = next;
        instructions
    }

    /// Select the picked entity, or clear the selection on a miss
    pub fn pointer_clicked(&mut self, next: Option<EntityId>) {
        if next != self.selected {
            info!(selected = ?next, "selection changed");
        }
        self.selected = next;
    }

    /// Clear the selection if it no longer passes `is_visible`
    ///
    /// Returns the id that was cleared.
    pub fn retain_visible(&mut self, is_visible: impl Fn(&EntityId) -> bool) -> Option<EntityId> {
        match &self.selected {
            Some(id) if !is_visible(id) => {
                info!(selected = %id, "selected entity hidden, clearing selection");
                self.selected.take()
            }
            _ => None,
        }
    }

    /// Effective label visibility for one point
    pub fn label_visible(&self, id: &EntityId, point_visible: bool) -> bool {
        point_visible
            && self
                .label_policy
                .matches(self.is_hovered(id), self.is_selected(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> EntityId {
        EntityId::from(s)
    }

    #[test]
    fn test_hover_emits_exit_then_enter() {
        let mut selection = SelectionController::default();

        assert_eq!(
            selection.pointer_moved(Some(id("a"))),
            vec![HoverInstruction::Enter(id("a"))]
        );
        assert!(selection.pointer_moved(Some(id("a"))).is_empty());
        assert_eq!(
            selection.pointer_moved(Some(id("b"))),
            vec![HoverInstruction::Exit(id("a")), HoverInstruction::Enter(id("b"))]
        );
        assert_eq!(selection.pointer_moved(None), vec![HoverInstruction::Exit(id("b"))]);
        assert!(selection.pointer_moved(None).is_empty());
        assert!(selection.hovered().is_none());
    }

    #[test]
    fn test_click_is_unconditional() {
        let mut selection = SelectionController::default();
        selection.pointer_clicked(Some(id("a")));
        assert_eq!(selection.selected(), Some(&id("a")));

        // Clicking without hovering still selects
        selection.pointer_clicked(Some(id("b")));
        assert_eq!(selection.selected(), Some(&id("b")));

        selection.pointer_moved(Some(id("b")));
        selection.pointer_clicked(None);
        assert!(selection.selected().is_none());
        assert_eq!(selection.hovered(), Some(&id("b")));
    }

    #[test]
    fn test_retain_visible() {
        let mut selection = SelectionController::default();
        selection.pointer_clicked(Some(id("a")));

        assert_eq!(selection.retain_visible(|_| true), None);
        assert_eq!(selection.selected(), Some(&id("a")));

        assert_eq!(selection.retain_visible(|e| e != "a"), Some(id("a")));
        assert!(selection.selected().is_none());
    }

    #[test]
    fn test_label_policy_table() {
        // (policy, hovered, selected) -> shown
        let cases = [
            (LabelPolicy::Hover, [false, false, true, true]),
            (LabelPolicy::Selected, [false, true, false, true]),
            (LabelPolicy::HoverSelected, [false, true, true, true]),
            (LabelPolicy::All, [true, true, true, true]),
            (LabelPolicy::Off, [false, false, false, false]),
        ];
        let inputs = [(false, false), (false, true), (true, false), (true, true)];

        for (policy, expected) in cases {
            for ((hovered, selected), shown) in inputs.iter().zip(expected) {
                assert_eq!(policy.matches(*hovered, *selected), shown, "{:?} {} {}", policy, hovered, selected);
            }
        }
    }

    #[test]
    fn test_hidden_points_never_show_labels() {
        let mut selection = SelectionController::new(LabelPolicy::All);
        assert!(selection.label_visible(&id("a"), true));
        assert!(!selection.label_visible(&id("a"), false));

        selection.set_label_policy(LabelPolicy::Hover);
        selection.pointer_moved(Some(id("a")));
        assert!(selection.label_visible(&id("a"), true));
        assert!(!selection.label_visible(&id("b"), true));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("hover+selected".parse::<LabelPolicy>(), Ok(LabelPolicy::HoverSelected));
        assert!("always".parse::<LabelPolicy>().is_err());
        let json = serde_json::to_string(&LabelPolicy::HoverSelected).unwrap();
        assert_eq!(json, "\"hover+selected\"");
    }
}
