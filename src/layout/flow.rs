use std::collections::{HashMap, VecDeque};

use super::text::measure_label;
use super::{DiagramLayout, EdgeLayout, FlowLayout, Layout, NodeLayout, PADDING};
use crate::config::LayoutConfig;
use crate::model::DiagramData;
use crate::theme::Theme;

/// Layered layout shared by flowchart, org-chart and text-flow kinds: nodes
/// grouped into layers by graph distance from the roots, each layer centered,
/// edges drawn as straight or elbow connectors.
pub(super) fn compute_flow_layout(
    data: &DiagramData,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let index: HashMap<&str, usize> = data
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let layers = assign_layers(data, &index);
    let layer_count = layers.iter().copied().max().map_or(0, |l| l + 1);
    let mut grouped: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    for (i, layer) in layers.iter().enumerate() {
        grouped[*layer].push(i);
    }

    let labels: Vec<_> = data
        .nodes
        .iter()
        .map(|node| measure_label(&node.label, theme, config))
        .collect();
    let sizes: Vec<(f32, f32)> = labels
        .iter()
        .map(|label| {
            (
                label.width + config.node_padding_x * 2.0,
                label.height + config.node_padding_y * 2.0,
            )
        })
        .collect();

    let layer_widths: Vec<f32> = grouped
        .iter()
        .map(|members| {
            let total: f32 = members.iter().map(|&i| sizes[i].0).sum();
            total + config.node_spacing * members.len().saturating_sub(1) as f32
        })
        .collect();
    let max_layer_width = layer_widths.iter().copied().fold(0.0, f32::max);

    let mut nodes: Vec<Option<NodeLayout>> = vec![None; data.nodes.len()];
    let mut y = PADDING;
    for (layer, members) in grouped.iter().enumerate() {
        let layer_height = members
            .iter()
            .map(|&i| sizes[i].1)
            .fold(0.0, f32::max);
        let mut x = PADDING + (max_layer_width - layer_widths[layer]) / 2.0;
        for &i in members {
            let (width, height) = sizes[i];
            nodes[i] = Some(NodeLayout {
                id: data.nodes[i].id.clone(),
                x,
                y: y + (layer_height - height) / 2.0,
                width,
                height,
                label: labels[i].clone(),
            });
            x += width + config.node_spacing;
        }
        y += layer_height + config.rank_spacing;
    }
    let nodes: Vec<NodeLayout> = nodes.into_iter().flatten().collect();
    let placed: HashMap<&str, &NodeLayout> =
        nodes.iter().map(|node| (node.id.as_str(), node)).collect();

    let mut edges = Vec::new();
    for edge in &data.edges {
        let (Some(from), Some(to)) = (placed.get(edge.from.as_str()), placed.get(edge.to.as_str()))
        else {
            continue;
        };
        let x1 = from.x + from.width / 2.0;
        let y1 = from.y + from.height;
        let x2 = to.x + to.width / 2.0;
        let y2 = to.y;
        let points = if (x1 - x2).abs() < 0.5 {
            vec![(x1, y1), (x2, y2)]
        } else {
            let mid = (y1 + y2) / 2.0;
            vec![(x1, y1), (x1, mid), (x2, mid), (x2, y2)]
        };
        let label = edge
            .label
            .as_ref()
            .map(|text| measure_label(text, theme, config));
        let label_anchor = label
            .as_ref()
            .map(|_| ((x1 + x2) / 2.0, (y1 + y2) / 2.0));
        edges.push(EdgeLayout {
            from: edge.from.clone(),
            to: edge.to.clone(),
            label,
            label_anchor,
            points,
        });
    }

    let width = max_layer_width + PADDING * 2.0;
    let height = (y - config.rank_spacing + PADDING).max(PADDING * 2.0);
    Layout {
        kind: data.kind,
        diagram: DiagramLayout::Flow(FlowLayout { nodes, edges }),
        width,
        height,
    }
}

/// Minimum graph distance from the roots, breadth-first. Nodes unreachable
/// from any root (cycles, disconnected parts) seed new roots in input order.
fn assign_layers(data: &DiagramData, index: &HashMap<&str, usize>) -> Vec<usize> {
    let n = data.nodes.len();
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut incoming = vec![0usize; n];
    for edge in &data.edges {
        let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
        else {
            continue;
        };
        outgoing[from].push(to);
        incoming[to] += 1;
    }

    let mut layer = vec![usize::MAX; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| incoming[i] == 0).collect();
    for &root in &queue {
        layer[root] = 0;
    }
    loop {
        while let Some(current) = queue.pop_front() {
            for &next in &outgoing[current] {
                if layer[next] == usize::MAX {
                    layer[next] = layer[current] + 1;
                    queue.push_back(next);
                }
            }
        }
        match (0..n).find(|&i| layer[i] == usize::MAX) {
            Some(orphan) => {
                layer[orphan] = 0;
                queue.push_back(orphan);
            }
            None => break,
        }
    }
    layer
}
