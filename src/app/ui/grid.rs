// src/app/ui/grid.rs
use eframe::egui as eg;

use crate::app::types::{MovieSummary, PosterState};
use crate::app::utils::{rating_label, vote_label, year_label};

pub const H_SPACING: f32 = 16.0;
pub const V_SPACING: f32 = 16.0;
const MAX_CARD_W: f32 = 300.0;
const TEXT_H: f32 = 112.0;
const TITLE_MAX_CHARS: usize = 48;

/// 1-4 columns, stepping at the usual 600/900/1200 px breakpoints.
pub(crate) fn columns_for_width(width: f32) -> usize {
    if width < 600.0 {
        1
    } else if width < 900.0 {
        2
    } else if width < 1200.0 {
        3
    } else {
        4
    }
}

pub(crate) fn card_width(avail: f32, cols: usize) -> f32 {
    let gaps = cols.saturating_sub(1) as f32 * H_SPACING;
    ((avail - gaps) / cols.max(1) as f32).clamp(120.0, MAX_CARD_W)
}

/// Roughly two lines worth of title; longer ones end in an ellipsis.
pub(crate) fn clip_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut out: String = title.chars().take(max_chars.saturating_sub(1)).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

fn paint_placeholder(p: &eg::Painter, rect: eg::Rect, label: &str) {
    p.rect_filled(rect, 6.0, eg::Color32::from_gray(40));
    p.text(
        rect.center(),
        eg::Align2::CENTER_CENTER,
        label,
        eg::FontId::proportional(16.0),
        eg::Color32::from_gray(200),
    );
}

impl crate::app::MovieRecApp {
    pub(crate) fn ui_render_grid(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        let movies: Vec<MovieSummary> = self.coordinator.results().movies().to_vec();
        if movies.is_empty() {
            return;
        }

        let mut uploads_left = crate::app::MAX_UPLOADS_PER_FRAME;

        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let avail = ui.available_width();
                let cols = columns_for_width(avail);
                let card_w = card_width(avail, cols);
                let card_h = card_w * 1.5 + TEXT_H;

                // center the block of columns
                let used = cols as f32 * card_w + cols.saturating_sub(1) as f32 * H_SPACING;
                let left_pad = ((avail - used) * 0.5).max(0.0);

                ui.add_space(8.0);
                for row in movies.chunks(cols) {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);
                        ui.add_space(left_pad);
                        for movie in row {
                            ui.allocate_ui_with_layout(
                                eg::vec2(card_w, card_h),
                                eg::Layout::top_down(eg::Align::Min),
                                |ui| {
                                    ui.set_min_size(eg::vec2(card_w, card_h));
                                    ui.set_max_width(card_w);

                                    // opportunistic upload
                                    if uploads_left > 0 && self.try_lazy_upload(ctx, movie.id) {
                                        uploads_left -= 1;
                                    }
                                    self.ui_render_card(ui, movie, card_w);
                                },
                            );
                        }
                    });
                    ui.add_space(V_SPACING);
                }
            });
    }

    fn ui_render_card(&mut self, ui: &mut eg::Ui, movie: &MovieSummary, card_w: f32) {
        // Poster
        let (poster_rect, _) =
            ui.allocate_exact_size(eg::vec2(card_w, card_w * 1.5), eg::Sense::hover());
        match self.posters.get(&movie.id) {
            Some(slot) if slot.state == PosterState::Ready => {
                if let Some(tex) = &slot.tex {
                    ui.painter().image(
                        tex.id(),
                        poster_rect,
                        eg::Rect::from_min_max(eg::pos2(0.0, 0.0), eg::pos2(1.0, 1.0)),
                        eg::Color32::WHITE,
                    );
                }
            }
            Some(slot) if slot.state == PosterState::Failed => {
                paint_placeholder(ui.painter(), poster_rect, "No Poster");
            }
            _ => paint_placeholder(ui.painter(), poster_rect, "Loading…"),
        }

        ui.add_space(6.0);

        // Title
        ui.add(
            eg::Label::new(
                eg::RichText::new(clip_title(&movie.title, TITLE_MAX_CHARS))
                    .strong()
                    .size(16.0),
            )
            .wrap(),
        );

        // Vote + year
        ui.horizontal(|ui| {
            ui.label(
                eg::RichText::new(format!("★ {}", vote_label(movie.vote_average)))
                    .color(eg::Color32::from_rgb(120, 170, 255)),
            );
            ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                ui.label(eg::RichText::new(year_label(movie.release_date.as_deref())).weak());
            });
        });

        // Personal rating
        let current = self.ratings.rating_or_zero(movie.id);
        let mut picked = current;
        eg::ComboBox::from_id_source(("rating", movie.id))
            .width(card_w - 8.0)
            .selected_text(rating_label(current))
            .show_ui(ui, |ui| {
                for value in 0..=crate::app::ratings::MAX_RATING {
                    ui.selectable_value(&mut picked, value, rating_label(value));
                }
            });
        if picked != current {
            self.rate_movie(movie.id, picked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_breakpoints() {
        assert_eq!(columns_for_width(400.0), 1);
        assert_eq!(columns_for_width(600.0), 2);
        assert_eq!(columns_for_width(1000.0), 3);
        assert_eq!(columns_for_width(1920.0), 4);
    }

    #[test]
    fn cards_are_capped() {
        assert_eq!(card_width(1920.0, 4), MAX_CARD_W);
        let w = card_width(520.0, 2);
        assert!((w - (520.0 - H_SPACING) / 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn long_titles_are_clipped() {
        assert_eq!(clip_title("Dune", 10), "Dune");
        assert_eq!(clip_title("The Lord of the Rings", 8), "The Lor…");
        assert_eq!(clip_title("The Lord of", 5), "The…");
        assert_eq!(clip_title("Amélie Poulain", 7), "Amélie…");
    }
}
