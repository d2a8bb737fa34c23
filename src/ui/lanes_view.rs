use std::time::Instant;

use egui::{Color32, Key, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use timeline_lanes::interaction::RenameOutcome;
use timeline_lanes::layout::PlacedItem;
use timeline_lanes::model::{item_tooltip, ItemPosition};
use timeline_lanes::{Edge, EngineConfig, Interactions, Item, ItemUpdate, TimelineLayout, Viewport};

use crate::ui::theme;

const LANE_HEIGHT: f32 = theme::LANE_HEIGHT;
const LANE_GAP: f32 = theme::LANE_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;
const MIN_BAR_WIDTH: f32 = 6.0;
const RENAME_FIELD_WIDTH: f32 = 180.0;

/// What happened in the lanes area this frame.
#[derive(Debug, Default)]
pub struct LanesResponse {
    pub updates: Vec<ItemUpdate>,
    pub status: Option<String>,
}

/// Render the month ruler and all lanes, and route pointer and keyboard input
/// to the item sessions.
pub fn show_lanes(
    layout: &TimelineLayout<'_, Item>,
    viewport: &mut Viewport,
    config: &EngineConfig,
    interactions: &mut Interactions,
    ui: &mut Ui,
) -> LanesResponse {
    let mut out = LanesResponse::default();
    let width = ui.available_width();
    let height = HEADER_HEIGHT + layout.lane_count() as f32 * (LANE_HEIGHT + LANE_GAP) + 40.0;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) =
                ui.allocate_painter(Vec2::new(width, height.max(ui.available_height())), Sense::hover());
            let rect = response.rect;

            painter.rect_filled(rect, 0.0, theme::BG_DARK);
            draw_ruler(&painter, rect, layout);

            if layout.item_count() == 0 {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No timeline items",
                    theme::font_header(),
                    theme::TEXT_DIM,
                );
            }

            let pixels_per_day = f64::from(rect.width()) / layout.visible.window_days();
            for placed in layout.placed() {
                show_item(&placed, layout, rect, pixels_per_day, interactions, ui, &painter, &mut out);
            }

            handle_wheel_zoom(rect, viewport, config, ui);
        });

    if interactions.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            interactions.cancel_drags();
            out.status = Some("Resize cancelled".to_string());
        } else {
            if let Some(pos) = ui.ctx().pointer_latest_pos() {
                interactions.pointer_move(f64::from(pos.x));
            }
            if ui.input(|i| i.pointer.any_released()) {
                out.updates.extend(interactions.pointer_up());
            }
        }
    }

    out
}

#[allow(clippy::too_many_arguments)]
fn show_item(
    placed: &PlacedItem<'_, Item>,
    layout: &TimelineLayout<'_, Item>,
    rect: Rect,
    pixels_per_day: f64,
    interactions: &mut Interactions,
    ui: &mut Ui,
    painter: &egui::Painter,
    out: &mut LanesResponse,
) {
    let item = placed.item;
    let preview = interactions.preview_patch(&item.id);
    let position = match &preview {
        Some(patch) => {
            let mut ghost = item.clone();
            ghost.apply(patch);
            layout.visible.position(&ghost)
        }
        None => placed.position,
    };
    let editing = interactions
        .get(&item.id)
        .is_some_and(|s| s.rename.is_editing());
    if !position.is_visible() && !editing {
        return;
    }

    let y = rect.top() + HEADER_HEIGHT + placed.lane as f32 * (LANE_HEIGHT + LANE_GAP) + LANE_GAP;
    let bar_rect = bar_rect(rect, position, y);
    let clipped = painter.with_clip_rect(rect);
    draw_bar(&clipped, bar_rect, theme::lane_color(placed.lane), preview.is_some());

    if editing {
        show_rename_field(item, bar_rect, interactions, ui, out);
        return;
    }

    if bar_rect.width() > theme::MIN_LABEL_WIDTH {
        let galley = painter.layout_no_wrap(item.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.center().y - galley.size().y / 2.0;
        painter
            .with_clip_rect(bar_rect.intersect(rect))
            .galley(Pos2::new(bar_rect.left() + 8.0, text_y), galley, Color32::TRANSPARENT);
    }

    let bar_response = ui
        .interact(bar_rect, ui.make_persistent_id(("item-bar", &item.id)), Sense::click())
        .on_hover_text(item_tooltip(item));
    let left = ui.interact(
        handle_rect(bar_rect, bar_rect.left()),
        ui.make_persistent_id(("item-resize-start", &item.id)),
        Sense::drag(),
    );
    let right = ui.interact(
        handle_rect(bar_rect, bar_rect.right()),
        ui.make_persistent_id(("item-resize-end", &item.id)),
        Sense::drag(),
    );

    if left.hovered() || right.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        draw_handles(&clipped, bar_rect);
    } else if bar_response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Text);
    }

    for (handle, edge) in [(&left, Edge::Start), (&right, Edge::End)] {
        if !handle.drag_started() {
            continue;
        }
        let Some(pos) = handle.interact_pointer_pos() else {
            continue;
        };
        if let Err(e) = interactions.begin_drag(item, edge, f64::from(pos.x), Some(pixels_per_day)) {
            out.status = Some(format!("Cannot resize '{}': {e}", item.name));
        }
    }

    if bar_response.clicked() {
        if let Err(e) = interactions.begin_rename(item) {
            out.status = Some(format!("Cannot rename '{}': {e}", item.name));
        }
    }
}

fn show_rename_field(
    item: &Item,
    bar_rect: Rect,
    interactions: &mut Interactions,
    ui: &mut Ui,
    out: &mut LanesResponse,
) {
    let rename = &mut interactions.session(item).rename;
    let mut buffer = rename.displayed_name().to_string();
    let field_rect = Rect::from_min_size(
        bar_rect.min,
        Vec2::new(bar_rect.width().max(RENAME_FIELD_WIDTH), bar_rect.height()),
    );
    let response = ui.put(
        field_rect,
        egui::TextEdit::singleline(&mut buffer).id(ui.make_persistent_id(("item-rename", &item.id))),
    );
    if response.changed() {
        rename.input(buffer, Instant::now());
    }

    if response.lost_focus() {
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            rename.cancel();
        } else {
            match rename.commit() {
                RenameOutcome::Committed(update) => out.updates.push(update),
                RenameOutcome::Invalid(e) => out.status = Some(format!("Invalid name: {e}")),
                RenameOutcome::Unchanged | RenameOutcome::NotEditing => {}
            }
        }
    } else if !response.has_focus() {
        response.request_focus();
    }

    if let Some(error) = rename.validation_error() {
        ui.painter().text(
            Pos2::new(field_rect.left(), field_rect.bottom() + 2.0),
            egui::Align2::LEFT_TOP,
            error.to_string(),
            theme::font_status(),
            theme::TEXT_ERROR,
        );
    }
}

fn bar_rect(rect: Rect, position: ItemPosition, y: f32) -> Rect {
    let x = rect.left() + rect.width() * (position.left_percent / 100.0) as f32;
    let w = (rect.width() * (position.width_percent / 100.0) as f32).max(MIN_BAR_WIDTH);
    Rect::from_min_size(
        Pos2::new(x, y + theme::BAR_INSET),
        Vec2::new(w, LANE_HEIGHT - theme::BAR_INSET * 2.0),
    )
}

fn handle_rect(bar_rect: Rect, x: f32) -> Rect {
    Rect::from_min_max(
        Pos2::new(x - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(x + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    )
    .expand(3.0)
}

fn draw_ruler(painter: &egui::Painter, rect: Rect, layout: &TimelineLayout<'_, Item>) {
    painter.rect_filled(
        Rect::from_min_size(rect.min, Vec2::new(rect.width(), HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(rect.left(), rect.top() + HEADER_HEIGHT),
            Pos2::new(rect.right(), rect.top() + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for marker in layout.month_markers() {
        if !(0.0..=100.0).contains(&marker.left_percent) {
            continue;
        }
        let x = rect.left() + rect.width() * (marker.left_percent / 100.0) as f32;
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        painter.text(
            Pos2::new(x + 4.0, rect.top() + HEADER_HEIGHT / 2.0),
            egui::Align2::LEFT_CENTER,
            marker.date.format("%b %Y").to_string(),
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    }
}

fn draw_bar(painter: &egui::Painter, bar_rect: Rect, color: Color32, previewing: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, color);
    if previewing {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::PREVIEW_OUTLINE),
        );
    }
}

fn draw_handles(painter: &egui::Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
            Rounding::same(2.0),
            theme::HANDLE_COLOR,
        );
    }
}

/// Ctrl+wheel zooms around the pointer. egui turns Ctrl+scroll into a zoom
/// gesture, so the raw wheel events are read instead of the scroll delta.
fn handle_wheel_zoom(rect: Rect, viewport: &mut Viewport, config: &EngineConfig, ui: &Ui) {
    let Some(pointer) = ui.ctx().pointer_hover_pos().filter(|p| rect.contains(*p)) else {
        return;
    };
    let delta_y: f32 = ui.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::MouseWheel {
                    unit,
                    delta,
                    modifiers,
                } if modifiers.command => Some(match unit {
                    egui::MouseWheelUnit::Point => delta.y,
                    egui::MouseWheelUnit::Line => delta.y * 50.0,
                    egui::MouseWheelUnit::Page => delta.y * rect.height(),
                }),
                _ => None,
            })
            .sum()
    });
    if delta_y == 0.0 {
        return;
    }
    let pointer_percent = f64::from((pointer.x - rect.left()) / rect.width()) * 100.0;
    // egui reports wheel-up as positive; the zoom formula expects wheel-down positive.
    viewport.wheel(-f64::from(delta_y), pointer_percent, &config.zoom);
}
