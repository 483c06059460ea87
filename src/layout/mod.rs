mod flow;
mod gantt;
mod sequence;
pub(crate) mod text;
mod timeline;
pub(crate) mod types;
pub use types::*;
use flow::*;
use gantt::*;
use sequence::*;
use timeline::*;

use crate::config::LayoutConfig;
use crate::model::{DiagramContent, NotationKind};
use crate::theme::Theme;

/// Outer margin applied on every side of a computed layout.
pub(crate) const PADDING: f32 = 24.0;

const PLACEHOLDER_WIDTH: f32 = 320.0;
const PLACEHOLDER_HEIGHT: f32 = 140.0;

/// Computes a complete, deterministic layout for validated diagram content.
/// The same content, theme, and config always produce the same geometry.
pub fn compute_layout(content: &DiagramContent, theme: &Theme, config: &LayoutConfig) -> Layout {
    if content.is_empty() {
        return placeholder_layout(content.kind());
    }
    match content {
        DiagramContent::Graph(data) => match data.kind {
            NotationKind::Sequence => compute_sequence_layout(data, theme, config),
            _ => compute_flow_layout(data, theme, config),
        },
        DiagramContent::Timeline(events) => compute_timeline_layout(events, theme, config),
        DiagramContent::Gantt(tasks) => compute_gantt_layout(tasks, theme, config),
    }
}

fn placeholder_layout(kind: NotationKind) -> Layout {
    Layout {
        kind,
        diagram: DiagramLayout::Placeholder(PlaceholderLayout {
            message: "No diagram content".to_string(),
            x: PLACEHOLDER_WIDTH / 2.0,
            y: PLACEHOLDER_HEIGHT / 2.0,
        }),
        width: PLACEHOLDER_WIDTH,
        height: PLACEHOLDER_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiagramData;

    #[test]
    fn empty_content_yields_placeholder() {
        let content = DiagramContent::Graph(DiagramData::new(NotationKind::Flowchart));
        let layout = compute_layout(
            &content,
            &Theme::document_default(),
            &LayoutConfig::default(),
        );
        assert!(matches!(layout.diagram, DiagramLayout::Placeholder(_)));
        assert_eq!(layout.kind, NotationKind::Flowchart);
    }

    #[test]
    fn sequence_graphs_get_lifeline_layouts() {
        let parsed =
            crate::parser::parse_block(NotationKind::Sequence, "Client -> Server: request\n")
                .unwrap();
        let layout = compute_layout(
            &parsed.content,
            &Theme::document_default(),
            &LayoutConfig::default(),
        );
        assert!(matches!(layout.diagram, DiagramLayout::Sequence(_)));
    }
}
