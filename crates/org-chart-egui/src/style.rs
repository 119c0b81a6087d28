//! Color palette for the org chart
//!
//! Card and line colors follow the active egui visuals so the chart reads in
//! both light and dark mode; role and status accents are fixed.

use egui::{Color32, Stroke, Visuals};
use org_chart_core::model::{MemberStatus, Role};

// =============================================================================
// ROLE COLORS
// =============================================================================

/// Accent color for a role badge
pub fn role_color(role: &Role) -> Color32 {
    match role {
        Role::BusinessOwner => Color32::from_rgb(156, 39, 176), // Purple
        Role::Executive => Color32::from_rgb(33, 150, 243),     // Blue
        Role::Operational(_) => Color32::from_rgb(96, 125, 139), // Blue-gray
    }
}

/// Muted badge background for a role
pub fn role_badge_fill(role: &Role) -> Color32 {
    let c = role_color(role);
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), 40)
}

// =============================================================================
// STATUS COLORS
// =============================================================================

pub fn status_color(status: MemberStatus) -> Color32 {
    match status {
        MemberStatus::Pending => Color32::from_rgb(255, 193, 7), // Amber
        MemberStatus::Active => Color32::from_rgb(76, 175, 80),  // Green
    }
}

// =============================================================================
// CARD + CONNECTOR
// =============================================================================

pub fn card_fill(visuals: &Visuals, dragging: bool) -> Color32 {
    if dragging {
        visuals.widgets.active.weak_bg_fill
    } else {
        visuals.extreme_bg_color
    }
}

pub fn card_stroke(visuals: &Visuals, hovered: bool, dragging: bool) -> Stroke {
    if dragging {
        visuals.selection.stroke
    } else if hovered {
        visuals.widgets.hovered.bg_stroke
    } else {
        visuals.widgets.noninteractive.bg_stroke
    }
}

/// Placeholder avatar background, stable per member
pub fn avatar_color(seed: &str) -> Color32 {
    const PALETTE: [Color32; 6] = [
        Color32::from_rgb(100, 181, 246), // Light blue
        Color32::from_rgb(129, 199, 132), // Light green
        Color32::from_rgb(206, 147, 216), // Light purple
        Color32::from_rgb(255, 183, 77),  // Orange lighter
        Color32::from_rgb(77, 182, 172),  // Teal lighter
        Color32::from_rgb(240, 98, 146),  // Pink
    ];
    let hash = seed
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    PALETTE[hash as usize % PALETTE.len()]
}

pub fn connector_stroke(visuals: &Visuals, width: f32) -> Stroke {
    Stroke::new(width, visuals.widgets.noninteractive.fg_stroke.color.gamma_multiply(0.6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_color_is_stable() {
        assert_eq!(avatar_color("ada"), avatar_color("ada"));
    }

    #[test]
    fn leadership_roles_stand_out() {
        assert_ne!(role_color(&Role::Executive), role_color(&Role::from_str("developer")));
        assert_eq!(role_badge_fill(&Role::Executive).a(), 40);
    }
}
