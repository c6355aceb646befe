use std::collections::BTreeMap;

use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Stroke, Ui};
use textstat_core::analysis::frequency::top_n;

/// Most words drawn in a cloud.
const MAX_WORDS: usize = 100;
const MIN_FONT: f32 = 12.0;
const MAX_FONT: f32 = 56.0;
/// Spiral turns tried before a word is given up.
const MAX_SPIRAL: f32 = 160.0;
const SPIRAL_STEP: f32 = 1.6;

const PALETTE: [Color32; 6] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
];

const BAR_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

/// Draws a word cloud from the space-joined token string.
///
/// Font size grows with frequency. Words are placed from the most frequent
/// outwards along an Archimedean spiral, skipping spots that overlap an
/// already placed word; words that find no spot are left out.
pub fn word_cloud(ui: &mut Ui, source: &str) {
    let weights = top_n(source.split_whitespace(), MAX_WORDS);
    let Some(&(_, max_count)) = weights.first() else {
        return;
    };

    let size = vec2(ui.available_width().max(200.0), 400.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let area = response.rect;
    painter.rect_filled(area, 0.0, Color32::WHITE);

    let center = area.center();
    let mut placed: Vec<Rect> = Vec::new();

    for (index, (word, count)) in weights.iter().enumerate() {
        let scale = *count as f32 / max_count as f32;
        let font = FontId::proportional(MIN_FONT + (MAX_FONT - MIN_FONT) * scale);
        let color = PALETTE[index % PALETTE.len()];
        let galley = painter.layout_no_wrap(word.to_string(), font, color);
        let word_size = galley.size();

        let mut t = 0.0f32;
        while t < MAX_SPIRAL {
            let offset = vec2(t.cos(), t.sin()) * (SPIRAL_STEP * t);
            let candidate = Rect::from_center_size(center + offset, word_size);
            if area.contains_rect(candidate) && !placed.iter().any(|r| r.intersects(candidate)) {
                painter.galley(candidate.min, galley, color);
                placed.push(candidate);
                break;
            }
            t += 0.1;
        }
    }
}

/// Draws a bar chart of `histogram`, one slot per key between the smallest
/// and the largest key.
pub fn bar_chart(ui: &mut Ui, histogram: &BTreeMap<usize, usize>, x_caption: &str, y_caption: &str) {
    let (Some(&min_key), Some(&max_key)) = (histogram.keys().next(), histogram.keys().next_back()) else {
        return;
    };
    let max_count = histogram.values().copied().max().unwrap_or(1).max(1);

    let size = vec2(ui.available_width().max(200.0), 260.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let area = response.rect;
    let plot = Rect::from_min_max(area.min + vec2(40.0, 24.0), area.max - vec2(10.0, 36.0));

    let text_color = ui.visuals().text_color();
    let axis = Stroke::new(1.0, text_color);
    let small = FontId::proportional(11.0);

    let slot_width = plot.width() / (max_key - min_key + 1) as f32;
    for (&length, &count) in histogram {
        let left = plot.left() + (length - min_key) as f32 * slot_width;
        let height = plot.height() * count as f32 / max_count as f32;
        let bar = Rect::from_min_max(
            pos2(left + slot_width * 0.1, plot.bottom() - height),
            pos2(left + slot_width * 0.9, plot.bottom()),
        );
        painter.rect_filled(bar, 0.0, BAR_COLOR);
        painter.text(pos2(bar.center().x, plot.bottom() + 2.0), Align2::CENTER_TOP, length.to_string(), small.clone(), text_color);
        painter.text(pos2(bar.center().x, bar.top() - 2.0), Align2::CENTER_BOTTOM, count.to_string(), small.clone(), text_color);
    }

    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    painter.line_segment([plot.left_bottom(), plot.left_top()], axis);
    painter.text(pos2(plot.center().x, area.bottom() - 2.0), Align2::CENTER_BOTTOM, x_caption, FontId::proportional(13.0), text_color);
    painter.text(area.left_top(), Align2::LEFT_TOP, y_caption, FontId::proportional(13.0), text_color);
}
