use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use timeline_lanes::model::timeline::format_zoom_level;

/// Render the top menu bar and zoom controls.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Zoom In        Ctrl++").clicked() {
                app.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+-").clicked() {
                app.zoom_out();
                ui.close_menu();
            }
            if ui.button("  Reset Zoom    Ctrl+0").clicked() {
                app.reset_zoom();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Settings  ").font(theme::font_menu()), |ui| {
            if ui.button("  Reload Config").clicked() {
                app.reload_config();
                ui.close_menu();
            }
            if ui.button("  Open Config Folder").clicked() {
                app.open_config_folder();
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new("Ctrl + scroll to zoom")
                    .size(10.5)
                    .color(theme::TEXT_DIM),
            );
            ui.separator();

            let zoom = app.config.zoom.clone();
            if ui
                .add_enabled(!app.viewport.is_default(&zoom), egui::Button::new("⌂"))
                .on_hover_text("Reset Zoom (Ctrl + 0)")
                .clicked()
            {
                app.reset_zoom();
            }

            let mut level = app.viewport.zoom_level;
            let slider = egui::Slider::new(&mut level, zoom.min..=zoom.max)
                .step_by(zoom.step)
                .show_value(false);
            if ui.add(slider).on_hover_text("Zoom Level").changed() {
                app.viewport.set_zoom(level, &zoom);
            }

            if ui
                .add_enabled(app.viewport.can_zoom_in(&zoom), egui::Button::new("+"))
                .on_hover_text("Zoom In (Ctrl + +)")
                .clicked()
            {
                app.zoom_in();
            }
            ui.label(
                RichText::new(format_zoom_level(app.viewport.zoom_level))
                    .monospace()
                    .color(theme::TEXT_SECONDARY),
            );
            if ui
                .add_enabled(app.viewport.can_zoom_out(&zoom), egui::Button::new("−"))
                .on_hover_text("Zoom Out (Ctrl + -)")
                .clicked()
            {
                app.zoom_out();
            }
        });
    });
}
