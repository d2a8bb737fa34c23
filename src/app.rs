use std::time::{Duration, Instant};

use chrono::{Days, Local, NaiveDate, Utc};
use timeline_lanes::model::date::format_date;
use timeline_lanes::{EngineConfig, Interactions, Item, ItemStore, ItemUpdate, LaneCache, TimelineLayout, Viewport};
use tracing::{info, warn};

use crate::ui;

/// How often to wake up while a rename auto-save may be pending.
const RENAME_POLL: Duration = Duration::from_millis(250);

/// Main application state.
pub struct TimelineApp {
    pub config: EngineConfig,
    pub store: ItemStore,
    pub viewport: Viewport,
    pub lane_cache: LaneCache,
    pub interactions: Interactions,
    pub status_message: String,
}

impl TimelineApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = EngineConfig::load();
        let store = Self::sample_timeline();
        info!(items = store.items.len(), "loaded sample timeline");
        Self {
            viewport: Viewport::new(&config.zoom),
            interactions: Interactions::new(config.clone()),
            lane_cache: LaneCache::new(),
            store,
            config,
            status_message: "Ready".to_string(),
        }
    }

    /// A handful of overlapping items around today.
    fn sample_timeline() -> ItemStore {
        let today = Local::now().date_naive();
        let day = |offset: i64| -> String {
            let shifted = if offset >= 0 {
                today.checked_add_days(Days::new(offset.unsigned_abs()))
            } else {
                today.checked_sub_days(Days::new(offset.unsigned_abs()))
            };
            format_date(shifted.unwrap_or(today))
        };
        let entries: [(&str, i64, i64); 10] = [
            ("Kickoff", -20, -16),
            ("Requirements", -16, -5),
            ("Research spike", -14, -9),
            ("UI design", -6, 10),
            ("API design", -4, 3),
            ("Backend", 3, 30),
            ("Frontend", 10, 34),
            ("Load testing", 28, 38),
            ("Docs", 30, 42),
            ("Launch", 42, 43),
        ];
        let items = entries
            .iter()
            .enumerate()
            .map(|(i, (name, start, end))| Item::new(i as u64 + 1, *name, day(*start), day(*end)))
            .collect();
        ItemStore::with_items("Sample Timeline", items)
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in(&self.config.zoom);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out(&self.config.zoom);
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset(&self.config.zoom);
    }

    /// Re-read `config.json`. Running sessions are dropped; the lane cache is
    /// rebuilt with the new policy on the next frame.
    pub fn reload_config(&mut self) {
        self.config = EngineConfig::load();
        self.interactions = Interactions::new(self.config.clone());
        self.viewport.set_zoom(self.viewport.zoom_level, &self.config.zoom);
        self.lane_cache.invalidate();
        self.status_message = "Configuration reloaded".to_string();
    }

    pub fn open_config_folder(&mut self) {
        let Some(dir) = EngineConfig::config_path().and_then(|p| p.parent().map(|d| d.to_path_buf())) else {
            self.status_message = "No configuration directory on this system".to_string();
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            warn!(dir = %dir.display(), "cannot open config folder: {e}");
            self.status_message = format!("Cannot open {}: {e}", dir.display());
        }
    }

    fn apply_updates(&mut self, updates: Vec<ItemUpdate>) {
        if updates.is_empty() {
            return;
        }
        for update in &updates {
            if !self.store.apply(update) {
                continue;
            }
            if let Some(item) = self.store.get(&update.id) {
                self.status_message = match &update.patch.name {
                    Some(name) => format!("Renamed to '{name}'"),
                    None => format!("Updated '{}' ({} to {})", item.name, item.start, item.end),
                };
            }
        }
        self.interactions.sync(&self.store.items);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Leave Ctrl+- and friends to the text field while renaming.
        if self.interactions.is_editing() {
            return;
        }
        let (zoom_in, zoom_out, reset) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                cmd && (i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals)),
                cmd && i.key_pressed(egui::Key::Minus),
                cmd && i.key_pressed(egui::Key::Num0),
            )
        });
        if zoom_in {
            self.zoom_in();
        }
        if zoom_out {
            self.zoom_out();
        }
        if reset {
            self.reset_zoom();
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);
        self.handle_shortcuts(ctx);

        let autosaved = self.interactions.tick(Instant::now());
        self.apply_updates(autosaved);
        if self.interactions.is_editing() {
            ctx.request_repaint_after(RENAME_POLL);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        let now = Utc::now().naive_utc();
        let layout = TimelineLayout::with_cache(
            &self.store.items,
            &self.viewport,
            &self.config.layout,
            now,
            &mut self.lane_cache,
        );

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::STATUS_BAR_BG)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(visible_window_label(&layout))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(layout.summary())
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let response = egui::CentralPanel::default()
            .frame(frame)
            .show(ctx, |ui| {
                ui::lanes_view::show_lanes(&layout, &mut self.viewport, &self.config, &mut self.interactions, ui)
            })
            .inner;

        if let Some(status) = response.status {
            self.status_message = status;
        }
        self.apply_updates(response.updates);
    }
}

fn visible_window_label(layout: &TimelineLayout<'_, Item>) -> String {
    let start: NaiveDate = layout.visible.start.date();
    let end: NaiveDate = layout.visible.end.date();
    format!("{} to {}", format_date(start), format_date(end))
}
