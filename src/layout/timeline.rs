use super::text::{measure_label, text_width};
use super::{DiagramLayout, Layout, PADDING, TimelineEventLayout, TimelineLayout};
use crate::config::LayoutConfig;
use crate::date;
use crate::model::{NotationKind, TimelineEvent};
use crate::theme::Theme;

/// Single vertical axis, events top to bottom in ascending date order.
/// Spacing is uniform per event unless proportional mode maps elapsed days
/// through the pixels-per-day scale.
pub(super) fn compute_timeline_layout(
    events: &[TimelineEvent],
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&i| (events[i].date, i));

    let date_labels: Vec<String> = order
        .iter()
        .map(|&i| events[i].date.format("%Y-%m-%d").to_string())
        .collect();
    let date_width = date_labels
        .iter()
        .map(|label| text_width(label, theme.font_size))
        .fold(0.0, f32::max);
    let axis_x = PADDING + date_width + 12.0;
    let axis_top = PADDING;
    let marker_radius = 5.0;
    let first_date = order.first().map(|&i| events[i].date);

    let mut placed = Vec::with_capacity(events.len());
    let mut prev_y = axis_top;
    for (rank, &i) in order.iter().enumerate() {
        let event = &events[i];
        let y = if config.proportional_timeline {
            let days = first_date.map_or(0, |first| date::days_between(first, event.date));
            let proportional = axis_top + config.event_spacing / 2.0
                + days as f32 * config.pixels_per_day;
            // Same-day events would stack exactly; keep a readable floor.
            proportional.max(prev_y + theme.font_size * 1.4)
        } else {
            axis_top + config.event_spacing * (rank as f32 + 0.5)
        };
        prev_y = y;
        placed.push(TimelineEventLayout {
            id: event.id.clone(),
            title: measure_label(&event.title, theme, config),
            date_label: date_labels[rank].clone(),
            milestone: event.milestone,
            x: axis_x,
            y,
            marker_radius,
        });
    }

    let axis_bottom = prev_y + config.event_spacing / 2.0;
    let title_width = placed
        .iter()
        .map(|event| event.title.width)
        .fold(0.0, f32::max);
    let width = axis_x + 16.0 + title_width + PADDING;
    let height = axis_bottom + PADDING;

    Layout {
        kind: NotationKind::Timeline,
        diagram: DiagramLayout::Timeline(TimelineLayout {
            axis_x,
            axis_top,
            axis_bottom,
            events: placed,
        }),
        width,
        height,
    }
}
