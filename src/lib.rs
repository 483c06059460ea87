#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod date;
pub mod detect;
pub mod error;
pub mod interact;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod theme;

use std::collections::BTreeSet;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use error::Error;
pub use interact::{bind, InteractiveArtifact};
pub use layout::{compute_layout, Layout};
pub use model::{DiagramContent, NotationKind, Warning};
pub use render::render_svg;
pub use theme::Theme;

/// Controls for a document extraction pass. Defaults allow every notation
/// and use the stock document theme.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub allowed_kinds: BTreeSet<NotationKind>,
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            allowed_kinds: NotationKind::ALL.iter().copied().collect(),
            theme: Theme::document_default(),
            layout: LayoutConfig::default(),
        }
    }
}

/// One diagram recovered from a document, with the repairs applied to it.
#[derive(Debug, Clone)]
pub struct ExtractedDiagram {
    pub kind: NotationKind,
    pub content: DiagramContent,
    pub confidence: f32,
    pub warnings: Vec<Warning>,
}

/// Everything extracted from one document, in source order.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub diagrams: Vec<ExtractedDiagram>,
    pub warnings: Vec<Warning>,
}

/// Scans a document for diagrammatic regions and parses each into validated
/// content. Malformed input never fails the call; blocks that cannot be
/// parsed are dropped with a document-level warning. The only errors are an
/// invalid theme or layout config.
pub fn extract(text: &str, options: &ExtractOptions) -> Result<Extraction, Error> {
    options.theme.validate()?;
    options.layout.validate()?;

    let mut diagrams = Vec::new();
    let mut warnings = Vec::new();
    for block in detect::detect_blocks(text, &options.allowed_kinds) {
        match parser::parse_block(block.kind, &block.text) {
            Some(parsed) => {
                let mut diagram_warnings = parsed.warnings;
                let content = model::validate(parsed.content, &mut diagram_warnings);
                diagrams.push(ExtractedDiagram {
                    kind: block.kind,
                    content,
                    confidence: block.confidence,
                    warnings: diagram_warnings,
                });
            }
            None => {
                warnings.push(Warning::SkippedBlock {
                    notation: block.kind,
                    reason: "block did not parse as its detected notation".to_string(),
                });
            }
        }
    }
    Ok(Extraction { diagrams, warnings })
}

/// A fully rendered diagram: static SVG plus its interaction manifest.
#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    pub kind: NotationKind,
    pub artifact: InteractiveArtifact,
    pub warnings: Vec<Warning>,
}

/// Convenience for the whole pipeline: extract, lay out, render, and bind
/// every diagram in a document.
pub fn render_document(
    text: &str,
    options: &ExtractOptions,
) -> Result<Vec<RenderedDiagram>, Error> {
    let extraction = extract(text, options)?;
    Ok(extraction
        .diagrams
        .into_iter()
        .map(|diagram| {
            let layout = compute_layout(&diagram.content, &options.theme, &options.layout);
            let svg = render_svg(&layout, &options.theme, &options.layout);
            let artifact = bind(&svg, &diagram.content, &layout, &options.theme, &options.layout);
            RenderedDiagram {
                kind: diagram.kind,
                artifact,
                warnings: diagram.warnings,
            }
        })
        .collect())
}
