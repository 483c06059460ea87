use serde::Serialize;

use crate::model::{NotationKind, Priority};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: TextBlock,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    pub label: Option<TextBlock>,
    pub label_anchor: Option<(f32, f32)>,
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowLayout {
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Lifeline {
    pub id: String,
    pub label: TextBlock,
    pub x: f32,
    pub head_x: f32,
    pub head_y: f32,
    pub head_width: f32,
    pub head_height: f32,
    pub y1: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageLayout {
    pub from: String,
    pub to: String,
    pub label: Option<TextBlock>,
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceDiagramLayout {
    pub lifelines: Vec<Lifeline>,
    pub messages: Vec<MessageLayout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEventLayout {
    pub id: String,
    pub title: TextBlock,
    pub date_label: String,
    pub milestone: bool,
    /// Marker center on the axis.
    pub x: f32,
    pub y: f32,
    pub marker_radius: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineLayout {
    pub axis_x: f32,
    pub axis_top: f32,
    pub axis_bottom: f32,
    pub events: Vec<TimelineEventLayout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttTaskLayout {
    pub id: String,
    pub name: TextBlock,
    pub assignee: Option<String>,
    pub priority: Priority,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub progress_width: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttDependencyLayout {
    pub from: String,
    pub to: String,
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttTick {
    pub x: f32,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttChartLayout {
    pub label_x: f32,
    pub chart_x: f32,
    pub chart_y: f32,
    pub row_height: f32,
    pub axis_y: f32,
    pub tasks: Vec<GanttTaskLayout>,
    pub dependencies: Vec<GanttDependencyLayout>,
    pub ticks: Vec<GanttTick>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceholderLayout {
    pub message: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum DiagramLayout {
    Flow(FlowLayout),
    Sequence(SequenceDiagramLayout),
    Timeline(TimelineLayout),
    Gantt(GanttChartLayout),
    Placeholder(PlaceholderLayout),
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub kind: NotationKind,
    pub diagram: DiagramLayout,
    pub width: f32,
    pub height: f32,
}
