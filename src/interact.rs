use serde::Serialize;
use serde_json::json;

use crate::config::LayoutConfig;
use crate::date::{add_days, px_to_days};
use crate::layout::{compute_layout, DiagramLayout, Layout};
use crate::model::{self, DiagramContent, Warning};
use crate::theme::Theme;

/// Pan/zoom state for a rendered diagram. Zoom is clamped to the configured
/// bounds; panning is unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub scale: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

/// Applies a zoom factor anchored at `(cx, cy)` in document coordinates.
/// The anchor point stays fixed on screen across the zoom.
pub fn apply_zoom(
    viewport: Viewport,
    factor: f32,
    cx: f32,
    cy: f32,
    config: &LayoutConfig,
) -> Viewport {
    let scale = (viewport.scale * factor).clamp(config.min_zoom, config.max_zoom);
    let ratio = scale / viewport.scale;
    Viewport {
        scale,
        tx: cx - (cx - viewport.tx) * ratio,
        ty: cy - (cy - viewport.ty) * ratio,
    }
}

/// Finds the entity under a point, topmost first. Coordinates are in the
/// layout's own space, before any viewport transform.
pub fn hit_test(layout: &Layout, x: f32, y: f32) -> Option<&str> {
    match &layout.diagram {
        DiagramLayout::Flow(flow) => flow
            .nodes
            .iter()
            .rev()
            .find(|node| {
                x >= node.x && x <= node.x + node.width && y >= node.y && y <= node.y + node.height
            })
            .map(|node| node.id.as_str()),
        DiagramLayout::Sequence(sequence) => sequence
            .lifelines
            .iter()
            .rev()
            .find(|lifeline| {
                x >= lifeline.head_x
                    && x <= lifeline.head_x + lifeline.head_width
                    && y >= lifeline.head_y
                    && y <= lifeline.head_y + lifeline.head_height
            })
            .map(|lifeline| lifeline.id.as_str()),
        DiagramLayout::Timeline(timeline) => timeline
            .events
            .iter()
            .rev()
            .find(|event| {
                let r = event.marker_radius * 1.5;
                (x - event.x).abs() <= r && (y - event.y).abs() <= r
            })
            .map(|event| event.id.as_str()),
        DiagramLayout::Gantt(gantt) => gantt
            .tasks
            .iter()
            .rev()
            .find(|task| {
                x >= task.x && x <= task.x + task.width && y >= task.y && y <= task.y + task.height
            })
            .map(|task| task.id.as_str()),
        DiagramLayout::Placeholder(_) => None,
    }
}

/// Structured detail for an entity, shown on click. Returns `None` when the
/// id does not name an entity in the content.
pub fn entity_detail(content: &DiagramContent, id: &str) -> Option<serde_json::Value> {
    match content {
        DiagramContent::Graph(data) => data.nodes.iter().find(|node| node.id == id).map(|node| {
            json!({
                "id": node.id,
                "label": node.label,
                "category": node.category,
            })
        }),
        DiagramContent::Timeline(events) => {
            events.iter().find(|event| event.id == id).map(|event| {
                json!({
                    "id": event.id,
                    "title": event.title,
                    "date": event.date.format("%Y-%m-%d").to_string(),
                    "milestone": event.milestone,
                    "category": event.category,
                })
            })
        }
        DiagramContent::Gantt(tasks) => tasks.iter().find(|task| task.id == id).map(|task| {
            json!({
                "id": task.id,
                "name": task.name,
                "start": task.start.format("%Y-%m-%d").to_string(),
                "end": task.end.format("%Y-%m-%d").to_string(),
                "progress": task.progress,
                "dependencies": task.dependencies,
                "assignee": task.assignee,
                "priority": task.priority,
            })
        }),
    }
}

/// Result of a completed drag: the updated content, any repairs the move
/// triggered, and the freshly computed layout.
#[derive(Debug)]
pub struct DragOutcome {
    pub content: DiagramContent,
    pub warnings: Vec<Warning>,
    pub layout: Layout,
    pub days: i64,
}

/// Moves a timeline event or gantt task horizontally. The pixel displacement
/// is rounded to whole days; dates shift by that amount, the content is
/// re-validated, and the layout recomputed. Graph nodes are not draggable.
pub fn drag_entity(
    content: &DiagramContent,
    id: &str,
    dx_px: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> Option<DragOutcome> {
    if !theme.interaction.draggable {
        return None;
    }
    let days = px_to_days(dx_px, config.pixels_per_day);
    let mut updated = content.clone();
    let moved = match &mut updated {
        DiagramContent::Timeline(events) => {
            match events.iter_mut().find(|event| event.id == id) {
                Some(event) => {
                    event.date = add_days(event.date, days);
                    true
                }
                None => false,
            }
        }
        DiagramContent::Gantt(tasks) => match tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.start = add_days(task.start, days);
                task.end = add_days(task.end, days);
                true
            }
            None => false,
        },
        DiagramContent::Graph(_) => false,
    };
    if !moved {
        return None;
    }
    let mut warnings = Vec::new();
    let content = model::validate(updated, &mut warnings);
    let layout = compute_layout(&content, theme, config);
    Some(DragOutcome {
        content,
        warnings,
        layout,
        days,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingOp {
    Click,
    Drag,
    Edit,
}

/// One interactive entity and the operations enabled on it.
#[derive(Debug, Clone, Serialize)]
pub struct Binding {
    pub entity_id: String,
    pub ops: Vec<BindingOp>,
}

/// A rendered SVG with its interaction manifest embedded as a JSON script
/// element, ready for a host page to wire up.
#[derive(Debug, Clone)]
pub struct InteractiveArtifact {
    pub svg: String,
    pub bindings: Vec<Binding>,
}

/// Attaches interaction bindings to a rendered SVG. Which operations appear
/// is governed by the theme's interaction flags; with all flags off the SVG
/// is returned unchanged and the binding list is empty.
pub fn bind(
    svg: &str,
    content: &DiagramContent,
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
) -> InteractiveArtifact {
    let flags = &theme.interaction;
    if !flags.any() {
        return InteractiveArtifact {
            svg: svg.to_string(),
            bindings: Vec::new(),
        };
    }

    let mut ops = Vec::new();
    if flags.clickable {
        ops.push(BindingOp::Click);
    }
    let positional = matches!(
        content,
        DiagramContent::Timeline(_) | DiagramContent::Gantt(_)
    );
    if flags.draggable && positional {
        ops.push(BindingOp::Drag);
    }
    if flags.edit_mode {
        ops.push(BindingOp::Edit);
    }

    let bindings: Vec<Binding> = if ops.is_empty() {
        Vec::new()
    } else {
        entity_ids(layout)
            .into_iter()
            .map(|entity_id| Binding {
                entity_id,
                ops: ops.clone(),
            })
            .collect()
    };

    let manifest = json!({
        "kind": layout.kind,
        "zoomable": flags.zoomable,
        "min_zoom": config.min_zoom,
        "max_zoom": config.max_zoom,
        "real_time_updates": flags.real_time_updates,
        "bindings": bindings,
    });
    // "</" must not appear verbatim inside an inline script element.
    let payload = manifest.to_string().replace("</", "<\\/");
    let script = format!(
        "<script type=\"application/json\" id=\"docviz-bindings\">{payload}</script>"
    );
    let svg = match svg.rfind("</svg>") {
        Some(pos) => {
            let mut out = String::with_capacity(svg.len() + script.len());
            out.push_str(&svg[..pos]);
            out.push_str(&script);
            out.push_str(&svg[pos..]);
            out
        }
        None => svg.to_string(),
    };

    InteractiveArtifact { svg, bindings }
}

fn entity_ids(layout: &Layout) -> Vec<String> {
    match &layout.diagram {
        DiagramLayout::Flow(flow) => flow.nodes.iter().map(|node| node.id.clone()).collect(),
        DiagramLayout::Sequence(sequence) => sequence
            .lifelines
            .iter()
            .map(|lifeline| lifeline.id.clone())
            .collect(),
        DiagramLayout::Timeline(timeline) => timeline
            .events
            .iter()
            .map(|event| event.id.clone())
            .collect(),
        DiagramLayout::Gantt(gantt) => gantt.tasks.iter().map(|task| task.id.clone()).collect(),
        DiagramLayout::Placeholder(_) => Vec::new(),
    }
}
