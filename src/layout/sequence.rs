use std::collections::HashMap;

use super::text::measure_label;
use super::{DiagramLayout, Layout, Lifeline, MessageLayout, PADDING, SequenceDiagramLayout};
use crate::config::LayoutConfig;
use crate::model::DiagramData;
use crate::theme::Theme;

/// Participants become lifelines in order of first appearance; messages run
/// top to bottom in document order.
pub(super) fn compute_sequence_layout(
    data: &DiagramData,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let labels: Vec<_> = data
        .nodes
        .iter()
        .map(|node| measure_label(&node.label, theme, config))
        .collect();
    let head_heights: Vec<f32> = labels
        .iter()
        .map(|label| label.height + config.node_padding_y * 2.0)
        .collect();
    let head_height = head_heights.iter().copied().fold(0.0, f32::max);
    let slot = labels
        .iter()
        .map(|label| label.width + config.node_padding_x * 2.0)
        .fold(0.0, f32::max)
        + config.node_spacing;

    let message_gap = theme.font_size * 2.8;
    let head_y = PADDING;
    let lane_top = head_y + head_height;
    let lane_bottom = lane_top + message_gap * (data.edges.len() as f32 + 0.5);

    let mut lifelines = Vec::with_capacity(data.nodes.len());
    let mut centers: HashMap<&str, f32> = HashMap::new();
    for (i, node) in data.nodes.iter().enumerate() {
        let center = PADDING + slot * i as f32 + slot / 2.0;
        let head_width = labels[i].width + config.node_padding_x * 2.0;
        centers.insert(node.id.as_str(), center);
        lifelines.push(Lifeline {
            id: node.id.clone(),
            label: labels[i].clone(),
            x: center,
            head_x: center - head_width / 2.0,
            head_y,
            head_width,
            head_height,
            y1: lane_top,
            y2: lane_bottom,
        });
    }

    let mut messages = Vec::with_capacity(data.edges.len());
    for (k, edge) in data.edges.iter().enumerate() {
        let (Some(&x1), Some(&x2)) = (
            centers.get(edge.from.as_str()),
            centers.get(edge.to.as_str()),
        ) else {
            continue;
        };
        messages.push(MessageLayout {
            from: edge.from.clone(),
            to: edge.to.clone(),
            label: edge
                .label
                .as_ref()
                .map(|text| measure_label(text, theme, config)),
            x1,
            x2,
            y: lane_top + message_gap * (k as f32 + 1.0),
        });
    }

    let width = PADDING + slot * data.nodes.len() as f32 + PADDING;
    let height = lane_bottom + PADDING;
    Layout {
        kind: data.kind,
        diagram: DiagramLayout::Sequence(SequenceDiagramLayout {
            lifelines,
            messages,
        }),
        width,
        height,
    }
}
