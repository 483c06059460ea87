use std::collections::HashMap;

use super::text::{measure_label, text_width};
use super::{
    DiagramLayout, GanttChartLayout, GanttDependencyLayout, GanttTaskLayout, GanttTick, Layout,
    PADDING,
};
use crate::config::LayoutConfig;
use crate::date;
use crate::model::{GanttTask, NotationKind};
use crate::theme::Theme;

/// One row per task in input order; bar length is `(end - start)` days at
/// the fixed pixels-per-day scale. Dependencies connect the dependency's bar
/// end to the dependent's bar start.
pub(super) fn compute_gantt_layout(
    tasks: &[GanttTask],
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let names: Vec<_> = tasks
        .iter()
        .map(|task| measure_label(&task.name, theme, config))
        .collect();
    let name_width = names
        .iter()
        .map(|name| name.width)
        .fold(theme.font_size * 5.0, f32::max);

    let label_x = PADDING;
    let chart_x = PADDING + name_width + 16.0;
    let chart_y = PADDING;

    let origin = tasks.iter().map(|task| task.start).min();
    let horizon = tasks.iter().map(|task| task.end).max();
    let span_days = match (origin, horizon) {
        (Some(origin), Some(horizon)) => date::days_between(origin, horizon).max(1),
        _ => 1,
    };

    let mut bars = Vec::with_capacity(tasks.len());
    for (row, task) in tasks.iter().enumerate() {
        let offset = origin.map_or(0, |origin| date::days_between(origin, task.start));
        let duration = date::days_between(task.start, task.end);
        let x = chart_x + offset as f32 * config.pixels_per_day;
        let width = (duration as f32 * config.pixels_per_day).max(3.0);
        let bar_height = config.row_height * 0.66;
        bars.push(GanttTaskLayout {
            id: task.id.clone(),
            name: names[row].clone(),
            assignee: task.assignee.clone(),
            priority: task.priority,
            x,
            y: chart_y + row as f32 * config.row_height + (config.row_height - bar_height) / 2.0,
            width,
            height: bar_height,
            progress_width: width * task.progress as f32 / 100.0,
        });
    }

    let by_id: HashMap<&str, &GanttTaskLayout> =
        bars.iter().map(|bar| (bar.id.as_str(), bar)).collect();
    let mut dependencies = Vec::new();
    for task in tasks {
        let Some(to) = by_id.get(task.id.as_str()) else {
            continue;
        };
        for dep in &task.dependencies {
            let Some(from) = by_id.get(dep.as_str()) else {
                continue;
            };
            let fx = from.x + from.width;
            let fy = from.y + from.height / 2.0;
            let tx = to.x;
            let ty = to.y + to.height / 2.0;
            let bend = fx + 6.0;
            dependencies.push(GanttDependencyLayout {
                from: dep.clone(),
                to: task.id.clone(),
                points: vec![(fx, fy), (bend, fy), (bend, ty), (tx, ty)],
            });
        }
    }

    let axis_y = chart_y + tasks.len() as f32 * config.row_height + 8.0;
    let ticks = match origin {
        Some(origin) => {
            let count = 4;
            (0..=count)
                .map(|i| {
                    let day = span_days * i / count;
                    GanttTick {
                        x: chart_x + day as f32 * config.pixels_per_day,
                        label: date::add_days(origin, day).format("%Y-%m-%d").to_string(),
                    }
                })
                .collect()
        }
        None => Vec::new(),
    };
    let tick_label_width = ticks
        .last()
        .map_or(0.0, |tick| text_width(&tick.label, theme.font_size));

    let width = chart_x + span_days as f32 * config.pixels_per_day + tick_label_width / 2.0 + PADDING;
    let height = axis_y + theme.font_size * 1.6 + PADDING;

    Layout {
        kind: NotationKind::Gantt,
        diagram: DiagramLayout::Gantt(GanttChartLayout {
            label_x,
            chart_x,
            chart_y,
            row_height: config.row_height,
            axis_y,
            tasks: bars,
            dependencies,
            ticks,
        }),
        width,
        height,
    }
}
