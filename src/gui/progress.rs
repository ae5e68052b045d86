use eframe::egui;
use crate::core::{format_clock, ProgressSnapshot};
use std::time::Duration;

/// Read-only playback bar: elapsed fill, time markers and a playhead.
pub struct ProgressWidget {
    pub height: f32,
}

impl ProgressWidget {
    pub fn new() -> Self {
        Self { height: 48.0 }
    }

    pub fn show(&self, ui: &mut egui::Ui, progress: &ProgressSnapshot) -> egui::Response {
        let available_width = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(
            egui::Vec2::new(available_width, self.height),
            egui::Sense::hover(),
        );

        if !ui.is_rect_visible(rect) {
            return response;
        }

        let painter = ui.painter();
        painter.rect_filled(rect, egui::Rounding::same(4.0), ui.visuals().extreme_bg_color);

        let track_rect = egui::Rect::from_min_size(
            rect.min + egui::Vec2::new(10.0, 18.0),
            egui::Vec2::new(available_width - 20.0, 14.0),
        );
        painter.rect_stroke(
            track_rect,
            egui::Rounding::same(2.0),
            egui::Stroke::new(1.0, ui.visuals().text_color()),
        );

        let fraction = progress.fraction();
        if fraction > 0.0 {
            let filled = egui::Rect::from_min_size(
                track_rect.min,
                egui::Vec2::new(track_rect.width() * fraction, track_rect.height()),
            );
            painter.rect_filled(filled, egui::Rounding::same(2.0), ui.visuals().selection.bg_fill);
        }

        if let Some(total) = progress.duration.filter(|d| !d.is_zero()) {
            let total_secs = total.as_secs_f64();
            let interval = marker_interval(total_secs / track_rect.width() as f64);

            let mut time = 0.0;
            while time <= total_secs {
                let x = track_rect.min.x + ((time / total_secs) * track_rect.width() as f64) as f32;
                painter.line_segment(
                    [egui::Pos2::new(x, track_rect.min.y), egui::Pos2::new(x, track_rect.max.y)],
                    egui::Stroke::new(0.5, ui.visuals().weak_text_color()),
                );
                painter.text(
                    egui::Pos2::new(x, track_rect.min.y - 3.0),
                    egui::Align2::CENTER_BOTTOM,
                    format_clock(Duration::from_secs_f64(time)),
                    egui::FontId::monospace(9.0),
                    ui.visuals().weak_text_color(),
                );
                time += interval;
            }

            let head_x = track_rect.min.x + track_rect.width() * fraction;
            painter.line_segment(
                [egui::Pos2::new(head_x, track_rect.min.y - 2.0), egui::Pos2::new(head_x, track_rect.max.y + 2.0)],
                egui::Stroke::new(2.0, egui::Color32::RED),
            );
        }

        let total_text = progress
            .duration
            .map(format_clock)
            .unwrap_or_else(|| "--:--".to_string());
        painter.text(
            rect.max - egui::Vec2::new(10.0, 3.0),
            egui::Align2::RIGHT_BOTTOM,
            format!("{} / {}", format_clock(progress.elapsed), total_text),
            egui::FontId::monospace(11.0),
            ui.visuals().text_color(),
        );

        response
    }
}

/// Seconds between labelled markers so labels stay roughly 60px apart.
pub fn marker_interval(seconds_per_pixel: f64) -> f64 {
    let base_interval = seconds_per_pixel * 60.0;

    if base_interval <= 5.0 {
        5.0
    } else if base_interval <= 15.0 {
        15.0
    } else if base_interval <= 30.0 {
        30.0
    } else if base_interval <= 60.0 {
        60.0
    } else if base_interval <= 120.0 {
        120.0
    } else {
        300.0
    }
}
