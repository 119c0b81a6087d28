//! Actions raised by the chart
//!
//! egui has no callbacks: the widgets return what the user asked for and the
//! host decides what to do with it, either by matching on the values or by
//! handing them to an [`OrgChartHandler`].

use org_chart_core::hierarchy::Forest;
use org_chart_core::model::{MemberId, OrgChartNode};

/// What the user asked for this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgChartAction {
    /// Re-send the invitation to a pending member
    ResendInvite(MemberId),
    /// Open the "change manager" flow for a member
    EditManager(MemberId),
}

impl OrgChartAction {
    pub fn member(&self) -> &MemberId {
        match self {
            Self::ResendInvite(id) | Self::EditManager(id) => id,
        }
    }

    /// Route to the handler. Actions for members no longer in `forest` are
    /// dropped.
    pub fn dispatch(self, forest: &Forest, handler: &mut impl OrgChartHandler) {
        let Some(node) = forest.node(self.member()) else {
            tracing::debug!(action = ?self, "Action for unknown member ignored");
            return;
        };
        match self {
            Self::ResendInvite(id) => handler.on_resend_invite(&id),
            Self::EditManager(_) => handler.on_edit_manager(node),
        }
    }
}

/// Host side of the chart's actions
pub trait OrgChartHandler {
    fn on_resend_invite(&mut self, id: &MemberId);
    fn on_edit_manager(&mut self, node: &OrgChartNode);
}

/// Which actions the current user may trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgChartCapabilities {
    pub can_resend_invite: bool,
    pub can_edit_hierarchy: bool,
}

impl Default for OrgChartCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl OrgChartCapabilities {
    pub fn all() -> Self {
        Self {
            can_resend_invite: true,
            can_edit_hierarchy: true,
        }
    }

    pub fn read_only() -> Self {
        Self {
            can_resend_invite: false,
            can_edit_hierarchy: false,
        }
    }
}
