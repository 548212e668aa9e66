// src/app/ui/mod.rs
pub mod grid;
pub mod topbar;

use eframe::egui as eg;

use crate::app::results::DisplayState;

impl crate::app::MovieRecApp {
    /// Spinner, the single error line, and the empty-result notice.
    pub(crate) fn ui_render_status(&self, ui: &mut eg::Ui) {
        ui.vertical_centered(|ui| {
            let state = self.coordinator.display_state();
            if state == DisplayState::Loading {
                ui.add_space(16.0);
                ui.add(eg::Spinner::new().size(28.0));
                ui.add_space(16.0);
            }

            if let Some(msg) = self.coordinator.error_message() {
                ui.add_space(8.0);
                let color = ui.visuals().error_fg_color;
                ui.colored_label(color, msg);
                ui.add_space(8.0);
            }

            if state == DisplayState::Empty {
                ui.add_space(8.0);
                ui.heading("No movies found matching your criteria.");
                ui.add_space(8.0);
            }
        });
    }
}
