// src/app/ui/topbar.rs
use eframe::egui as eg;

use crate::app::coordinator::CoordinatorEvent;
use crate::app::genres::Genre;

impl crate::app::MovieRecApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ui: &mut eg::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.heading(eg::RichText::new("MOVIEREC").size(32.0).strong());
            ui.add_space(8.0);

            // Search: echo immediately, fetch after the quiet period
            let resp = ui.add(
                eg::TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search for movies...")
                    .desired_width(400.0),
            );
            if resp.changed() {
                self.dispatch(
                    ui.ctx(),
                    CoordinatorEvent::SearchTextChanged(self.search_input.clone()),
                );
            }

            ui.add_space(10.0);
            ui.label(eg::RichText::new("Select your favorite genres:").size(18.0));
            ui.add_space(4.0);
        });

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 14.0;
            for genre in Genre::ALL {
                let mut checked = self.coordinator.genres().contains(genre);
                if ui.checkbox(&mut checked, genre.name()).changed() {
                    self.dispatch(
                        ui.ctx(),
                        CoordinatorEvent::GenreToggled(genre.name().to_string()),
                    );
                }
            }
        });

        ui.vertical_centered(|ui| {
            ui.add_space(6.0);
            if ui
                .button(eg::RichText::new("Get Recommendations").strong())
                .clicked()
            {
                self.dispatch(ui.ctx(), CoordinatorEvent::RecommendationsRequested);
            }
            ui.add_space(10.0);
        });
    }
}
