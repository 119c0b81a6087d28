//! Node card - one member, optionally draggable
//!
//! The card owns its drag offset. Each frame it is painted at its laid-out
//! rect plus the chart origin plus that offset, and the painted rect is
//! recorded in the chart's [`CardGeometry`] so the connector overlay can read
//! it back. Moving the card publishes `Drag` on the chart's hub; a `Reset`
//! from the hub zeroes the offset.

use crate::action::{OrgChartAction, OrgChartCapabilities};
use crate::config::CardSettings;
use crate::style;
use egui::text::{LayoutJob, TextWrapping};
use egui::{
    Align2, Color32, CursorIcon, FontId, LayerId, Order, Painter, Pos2, Rect, Response, Rounding,
    Sense, Ui, Vec2,
};
use org_chart_core::drag::CardDrag;
use org_chart_core::geometry::CardGeometry;
use org_chart_core::model::{MemberId, MemberStatus, OrgChartNode, Role};
use org_chart_core::signal::{ChartSignal, SignalHub, Subscription};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

const AVATAR_RADIUS: f32 = 16.0;
const COMPACT_AVATAR_RADIUS: f32 = 11.0;
const PADDING: f32 = 8.0;

// =============================================================================
// FRAME CONTEXT
// =============================================================================

/// Everything a card needs from its tree for one frame
pub struct CardFrame<'a> {
    pub hub: &'a SignalHub,
    pub geometry: &'a mut CardGeometry,
    /// Screen position of the chart's (0,0)
    pub origin: Vec2,
    pub draggable: bool,
    pub compact: bool,
    pub capabilities: OrgChartCapabilities,
    pub settings: &'a CardSettings,
}

/// Result of showing a card
#[derive(Debug, Clone)]
pub struct CardResponse {
    /// Where the card was painted
    pub rect: Rect,
    pub action: Option<OrgChartAction>,
    pub dragging: bool,
}

// =============================================================================
// NODE CARD
// =============================================================================

/// Draggable card state for one member in the tree
pub struct NodeCard {
    id: MemberId,
    drag: Rc<RefCell<CardDrag>>,
    _reset: Subscription,
}

impl std::fmt::Debug for NodeCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCard")
            .field("id", &self.id)
            .field("drag", &*self.drag.borrow())
            .finish()
    }
}

impl NodeCard {
    /// Create the card and subscribe it to `Reset` on the chart's hub
    pub fn new(id: MemberId, hub: &SignalHub) -> Self {
        let drag = Rc::new(RefCell::new(CardDrag::new()));
        let target = Rc::clone(&drag);
        let reset = hub.subscribe(ChartSignal::Reset, move |_| target.borrow_mut().reset());
        Self {
            id,
            drag,
            _reset: reset,
        }
    }

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn offset(&self) -> Vec2 {
        self.drag.borrow().offset()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.borrow().is_dragging()
    }

    /// Zero this card only (chart-wide resets go through the hub)
    pub fn reset(&self) {
        self.drag.borrow_mut().reset();
    }

    pub fn show(
        &self,
        ui: &mut Ui,
        node: &OrgChartNode,
        base: Rect,
        frame: &mut CardFrame<'_>,
    ) -> CardResponse {
        let origin = frame.origin;
        let painted_rect = |drag: &CardDrag| base.translate(origin + drag.offset());

        let rect = painted_rect(&self.drag.borrow());
        let widget_id = ui.id().with(("org_chart_card", node.id.as_str()));
        let sense = if frame.draggable {
            Sense::click_and_drag()
        } else {
            Sense::click()
        };
        let response = ui.interact(rect, widget_id, sense);

        if frame.draggable {
            self.handle_drag(&response, frame.hub);
        }

        // Position after this frame's pointer movement
        let dragging = self.is_dragging();
        let rect = painted_rect(&self.drag.borrow());
        frame.geometry.record(&node.id, rect);

        if frame.draggable && response.hovered() {
            ui.ctx().set_cursor_icon(if dragging {
                CursorIcon::Grabbing
            } else {
                CursorIcon::Grab
            });
        }

        let painter = if dragging {
            ui.ctx()
                .layer_painter(LayerId::new(Order::Foreground, widget_id))
                .with_clip_rect(ui.clip_rect())
        } else {
            ui.painter().clone()
        };
        let look = CardLook {
            compact: frame.compact,
            hovered: response.hovered(),
            dragging,
        };
        paint_card(&painter, ui.visuals(), node, rect, look, frame.settings);

        let mut action = None;
        if !dragging {
            action = card_buttons(ui, node, rect, frame.compact, frame.capabilities);
        }
        if action.is_none() {
            action = card_action(&response, node, frame.draggable, frame.capabilities);
        }

        if !dragging {
            card_tooltip(response, node);
        }

        CardResponse {
            rect,
            action,
            dragging,
        }
    }

    fn handle_drag(&self, response: &Response, hub: &SignalHub) {
        if response.drag_started() {
            let press = response
                .ctx
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(pointer) = press {
                tracing::trace!(member = %self.id, "drag start");
                self.drag.borrow_mut().pointer_down(pointer);
            }
        }

        if response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let moved = self.drag.borrow_mut().pointer_move(pointer);
                // Borrow released before subscribers run
                if moved {
                    hub.publish(ChartSignal::Drag);
                }
            }
        }

        if response.drag_stopped() {
            tracing::trace!(member = %self.id, offset = ?self.offset(), "drag end");
            self.drag.borrow_mut().pointer_up();
        }
    }
}

/// Click (static mode only) or context menu
fn card_action(
    response: &Response,
    node: &OrgChartNode,
    draggable: bool,
    capabilities: OrgChartCapabilities,
) -> Option<OrgChartAction> {
    let mut action = None;
    if capabilities.can_edit_hierarchy && !draggable && response.clicked() {
        action = Some(OrgChartAction::EditManager(node.id.clone()));
    }

    let can_resend = node.is_pending() && capabilities.can_resend_invite;
    if capabilities.can_edit_hierarchy || can_resend {
        response.context_menu(|ui| {
            if capabilities.can_edit_hierarchy && ui.button("Change manager…").clicked() {
                action = Some(OrgChartAction::EditManager(node.id.clone()));
                ui.close_menu();
            }
            if can_resend && ui.button("Resend invite").clicked() {
                action = Some(OrgChartAction::ResendInvite(node.id.clone()));
                ui.close_menu();
            }
        });
    }
    action
}

fn card_buttons(
    ui: &mut Ui,
    node: &OrgChartNode,
    rect: Rect,
    compact: bool,
    capabilities: OrgChartCapabilities,
) -> Option<OrgChartAction> {
    if compact || !node.is_pending() || !capabilities.can_resend_invite {
        return None;
    }
    let button_rect = Rect::from_min_size(
        Pos2::new(rect.right() - 92.0, rect.bottom() - 24.0),
        Vec2::new(86.0, 18.0),
    );
    let clicked = ui
        .put(button_rect, egui::Button::new("Resend invite").small())
        .clicked();
    clicked.then(|| OrgChartAction::ResendInvite(node.id.clone()))
}

fn card_tooltip(response: Response, node: &OrgChartNode) {
    let mut lines = Vec::new();
    if !node.email.is_empty() {
        lines.push(node.email.clone());
    }
    if let Some(office) = &node.office_location {
        lines.push(office.clone());
    }
    if !node.roles.is_empty() {
        let roles: Vec<String> = node.roles.iter().map(|r| r.label()).collect();
        lines.push(roles.join(", "));
    }
    if !lines.is_empty() {
        response.on_hover_text(lines.join("\n"));
    }
}

// =============================================================================
// PAINTING
// =============================================================================

/// Visual state of a card
#[derive(Debug, Clone, Copy, Default)]
pub struct CardLook {
    pub compact: bool,
    pub hovered: bool,
    pub dragging: bool,
}

fn single_line(
    painter: &Painter,
    text: &str,
    font: FontId,
    color: Color32,
    width: f32,
) -> Arc<egui::Galley> {
    let mut job = LayoutJob::simple_singleline(text.to_owned(), font, color);
    job.wrap = TextWrapping::truncate_at_width(width.max(1.0));
    painter.layout_job(job)
}

/// Paint one member card into `rect`
pub fn paint_card(
    painter: &Painter,
    visuals: &egui::Visuals,
    node: &OrgChartNode,
    rect: Rect,
    look: CardLook,
    settings: &CardSettings,
) {
    let rounding = Rounding::same(settings.corner_radius);
    if look.dragging {
        let shadow = rect.translate(Vec2::new(3.0, 4.0));
        painter.rect_filled(shadow, rounding, Color32::from_black_alpha(40));
    }
    painter.rect_filled(rect, rounding, style::card_fill(visuals, look.dragging));
    painter.rect_stroke(rect, rounding, style::card_stroke(visuals, look.hovered, look.dragging));

    let radius = if look.compact {
        COMPACT_AVATAR_RADIUS
    } else {
        AVATAR_RADIUS
    };
    let avatar_center = Pos2::new(rect.left() + PADDING + radius, rect.center().y);
    paint_avatar(painter, node, avatar_center, radius);

    let text_left = avatar_center.x + radius + PADDING;
    let text_width = rect.right() - PADDING - text_left;
    let strong = visuals.strong_text_color();
    let weak = visuals.weak_text_color();

    if look.compact {
        let font = FontId::proportional(12.0);
        let name = single_line(painter, node.display_name(), font, strong, text_width);
        let pos = Pos2::new(text_left, rect.center().y - name.size().y / 2.0);
        painter.galley(pos, name, strong);
        return;
    }

    let mut y = rect.top() + PADDING;
    let font = FontId::proportional(13.0);
    let name = single_line(painter, node.display_name(), font, strong, text_width);
    let name_height = name.size().y;
    painter.galley(Pos2::new(text_left, y), name, strong);
    y += name_height + 2.0;

    let subtitle = node
        .title
        .clone()
        .or_else(|| node.roles.first().map(|r| r.label()));
    if let Some(subtitle) = subtitle {
        let font = FontId::proportional(11.0);
        let galley = single_line(painter, &subtitle, font, weak, text_width);
        painter.galley(Pos2::new(text_left, y), galley, weak);
    }

    if node.is_pending() {
        paint_pending_badge(painter, rect);
    } else if let Some(role) = node.roles.iter().find(|r| r.is_leadership()) {
        paint_role_badge(painter, rect, role);
    }
}

fn paint_avatar(painter: &Painter, node: &OrgChartNode, center: Pos2, radius: f32) {
    painter.circle_filled(center, radius, style::avatar_color(node.id.as_str()));
    painter.text(
        center,
        Align2::CENTER_CENTER,
        node.initials(),
        FontId::proportional(radius * 0.8),
        Color32::WHITE,
    );
}

fn paint_role_badge(painter: &Painter, card: Rect, role: &Role) {
    let badge = Rect::from_min_size(
        Pos2::new(card.left() + PADDING, card.bottom() - 18.0),
        Vec2::new(card.width() - 2.0 * PADDING, 14.0),
    );
    painter.rect_filled(badge, Rounding::same(7.0), style::role_badge_fill(role));
    painter.text(
        badge.center(),
        Align2::CENTER_CENTER,
        role.label(),
        FontId::proportional(9.5),
        style::role_color(role),
    );
}

fn paint_pending_badge(painter: &Painter, card: Rect) {
    let color = style::status_color(MemberStatus::Pending);
    let badge = Rect::from_min_size(
        Pos2::new(card.right() - 58.0, card.top() + 4.0),
        Vec2::new(54.0, 14.0),
    );
    painter.rect_filled(badge, Rounding::same(7.0), color.gamma_multiply(0.25));
    painter.text(
        badge.center(),
        Align2::CENTER_CENTER,
        "Pending",
        FontId::proportional(9.5),
        color,
    );
}

// =============================================================================
// MEMBER CHIP (side panel)
// =============================================================================

/// Non-draggable compact card laid out in the normal flow
pub fn member_chip(
    ui: &mut Ui,
    node: &OrgChartNode,
    capabilities: OrgChartCapabilities,
    settings: &CardSettings,
) -> Option<OrgChartAction> {
    let width = ui.available_width().min(settings.compact_width.max(160.0));
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(width, settings.compact_height), Sense::click());
    let look = CardLook {
        compact: true,
        hovered: response.hovered() && capabilities.can_edit_hierarchy,
        dragging: false,
    };
    paint_card(ui.painter(), ui.visuals(), node, rect, look, settings);

    if node.is_pending() {
        let dot = Pos2::new(rect.right() - PADDING, rect.center().y);
        ui.painter().circle_filled(dot, 3.0, style::status_color(node.status));
    }

    let action = card_action(&response, node, false, capabilities);
    if capabilities.can_edit_hierarchy && response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
    }
    card_tooltip(response, node);
    action
}
