use crate::config::LayoutConfig;
use crate::layout::{
    DiagramLayout, FlowLayout, GanttChartLayout, Layout, PlaceholderLayout, SequenceDiagramLayout,
    TextBlock, TimelineLayout,
};
use crate::model::Priority;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Serializes a computed layout into a static SVG document. Theme role
/// resolution happens here, in a single place, so layouts stay color-free.
pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.text_color
    ));
    svg.push_str("</defs>");

    match &layout.diagram {
        DiagramLayout::Flow(flow) => render_flow(&mut svg, flow, theme, config),
        DiagramLayout::Sequence(sequence) => render_sequence(&mut svg, sequence, theme, config),
        DiagramLayout::Timeline(timeline) => render_timeline(&mut svg, timeline, theme),
        DiagramLayout::Gantt(gantt) => render_gantt(&mut svg, gantt, theme),
        DiagramLayout::Placeholder(placeholder) => render_placeholder(&mut svg, placeholder, theme),
    }

    svg.push_str("</svg>");
    svg
}

fn render_flow(svg: &mut String, flow: &FlowLayout, theme: &Theme, config: &LayoutConfig) {
    for edge in &flow.edges {
        let d = points_to_path(&edge.points);
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\" marker-end=\"url(#arrow)\"/>",
            d, theme.text_color
        ));
        if let (Some(label), Some((x, y))) = (&edge.label, edge.label_anchor) {
            let rect_x = x - label.width / 2.0 - 6.0;
            let rect_y = y - label.height / 2.0 - 4.0;
            svg.push_str(&format!(
                "<rect x=\"{rect_x:.2}\" y=\"{rect_y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\"/>",
                label.width + 12.0,
                label.height + 8.0,
                theme.background
            ));
            svg.push_str(&text_block_svg(x, y, label, theme, config));
        }
    }
    for node in &flow.nodes {
        svg.push_str(&format!(
            "<rect data-entity-id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"8\" ry=\"8\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            escape_xml(&node.id),
            node.x,
            node.y,
            node.width,
            node.height,
            theme.primary_color,
            theme.accent_color
        ));
        let center_x = node.x + node.width / 2.0;
        let center_y = node.y + node.height / 2.0;
        svg.push_str(&text_block_svg(center_x, center_y, &node.label, theme, config));
    }
}

fn render_sequence(
    svg: &mut String,
    sequence: &SequenceDiagramLayout,
    theme: &Theme,
    config: &LayoutConfig,
) {
    for lifeline in &sequence.lifelines {
        svg.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"4 4\"/>",
            lifeline.y1,
            lifeline.y2,
            theme.text_color,
            x = lifeline.x
        ));
        svg.push_str(&format!(
            "<rect data-entity-id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            escape_xml(&lifeline.id),
            lifeline.head_x,
            lifeline.head_y,
            lifeline.head_width,
            lifeline.head_height,
            theme.primary_color,
            theme.accent_color
        ));
        let center_x = lifeline.head_x + lifeline.head_width / 2.0;
        let center_y = lifeline.head_y + lifeline.head_height / 2.0;
        svg.push_str(&text_block_svg(center_x, center_y, &lifeline.label, theme, config));
    }
    for message in &sequence.messages {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1.4\" marker-end=\"url(#arrow)\"/>",
            message.x1,
            message.x2,
            theme.text_color,
            y = message.y
        ));
        if let Some(label) = &message.label {
            let mid_x = (message.x1 + message.x2) / 2.0;
            let label_y = message.y - theme.font_size * 0.5;
            svg.push_str(&format!(
                "<text x=\"{mid_x:.2}\" y=\"{label_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                theme.font_family,
                theme.font_size,
                theme.text_color,
                escape_xml(&label.lines.join(" "))
            ));
        }
    }
}

fn render_timeline(svg: &mut String, timeline: &TimelineLayout, theme: &Theme) {
    svg.push_str(&format!(
        "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
        timeline.axis_top,
        timeline.axis_bottom,
        theme.text_color,
        x = timeline.axis_x
    ));
    for event in &timeline.events {
        let fill = if event.milestone {
            &theme.accent_color
        } else {
            &theme.primary_color
        };
        if event.milestone {
            let r = event.marker_radius * 1.25;
            svg.push_str(&format!(
                "<path data-entity-id=\"{}\" d=\"M {x:.2} {:.2} L {:.2} {y:.2} L {x:.2} {:.2} L {:.2} {y:.2} Z\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"1\"/>",
                escape_xml(&event.id),
                event.y - r,
                event.x + r,
                event.y + r,
                event.x - r,
                theme.text_color,
                x = event.x,
                y = event.y
            ));
        } else {
            svg.push_str(&format!(
                "<circle data-entity-id=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"1\"/>",
                escape_xml(&event.id),
                event.x,
                event.y,
                event.marker_radius,
                theme.text_color
            ));
        }
        let date_x = timeline.axis_x - 12.0;
        let baseline = event.y + theme.font_size * 0.35;
        svg.push_str(&format!(
            "<text x=\"{date_x:.2}\" y=\"{baseline:.2}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(&event.date_label)
        ));
        let title_x = event.x + event.marker_radius + 10.0;
        svg.push_str(&format!(
            "<text x=\"{title_x:.2}\" y=\"{baseline:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(&event.title.lines.join(" "))
        ));
    }
}

fn render_gantt(svg: &mut String, gantt: &GanttChartLayout, theme: &Theme) {
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        gantt.chart_x,
        gantt.ticks.last().map_or(gantt.chart_x, |tick| tick.x),
        theme.text_color,
        y = gantt.axis_y
    ));
    for tick in &gantt.ticks {
        svg.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            gantt.axis_y,
            gantt.axis_y + 4.0,
            theme.text_color,
            x = tick.x
        ));
        let label_y = gantt.axis_y + 4.0 + theme.font_size;
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{label_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            tick.x,
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(&tick.label)
        ));
    }
    for dependency in &gantt.dependencies {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"3 3\" marker-end=\"url(#arrow)\"/>",
            points_to_path(&dependency.points),
            theme.text_color
        ));
    }
    for task in &gantt.tasks {
        let fill = task_fill(task.priority, theme);
        svg.push_str(&format!(
            "<rect data-entity-id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"1\"/>",
            escape_xml(&task.id),
            task.x,
            task.y,
            task.width,
            task.height,
            theme.accent_color
        ));
        if task.progress_width > 0.0 {
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" opacity=\"0.85\"/>",
                task.x,
                task.y,
                task.progress_width,
                task.height,
                theme.secondary_color
            ));
        }
        let baseline = task.y + task.height / 2.0 + theme.font_size * 0.35;
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{baseline:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            gantt.label_x,
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(&task.name.lines.join(" "))
        ));
        if let Some(assignee) = &task.assignee {
            let assignee_x = task.x + task.width + 6.0;
            svg.push_str(&format!(
                "<text x=\"{assignee_x:.2}\" y=\"{baseline:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" opacity=\"0.7\">{}</text>",
                theme.font_family,
                theme.font_size * 0.85,
                theme.text_color,
                escape_xml(assignee)
            ));
        }
    }
}

fn render_placeholder(svg: &mut String, placeholder: &PlaceholderLayout, theme: &Theme) {
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" opacity=\"0.6\">{}</text>",
        placeholder.x,
        placeholder.y,
        theme.font_family,
        theme.font_size,
        theme.text_color,
        escape_xml(&placeholder.message)
    ));
}

/// Bars climb the theme palette with severity: the muted secondary for
/// low, the primary brand shade for medium, and the accent for anything
/// urgent.
fn task_fill(priority: Priority, theme: &Theme) -> String {
    match priority {
        Priority::Low => theme.secondary_color.clone(),
        Priority::Medium => theme.primary_color.clone(),
        Priority::High | Priority::Critical => theme.accent_color.clone(),
    }
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn text_block_svg(x: f32, y: f32, label: &TextBlock, theme: &Theme, config: &LayoutConfig) -> String {
    let line_height = theme.font_size * config.label_line_height;
    let total_height = label.lines.len() as f32 * line_height;
    let start_y = y - total_height / 2.0 + theme.font_size;
    let mut text = String::new();
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        theme.font_family, theme.font_size, theme.text_color
    ));
    for (idx, line) in label.lines.iter().enumerate() {
        if idx == 0 {
            text.push_str(&format!("<tspan x=\"{x:.2}\" dy=\"0\">{}", escape_xml(line)));
        } else {
            text.push_str(&format!(
                "<tspan x=\"{x:.2}\" dy=\"{line_height:.2}\">{}",
                escape_xml(line)
            ));
        }
        text.push_str("</tspan>");
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
