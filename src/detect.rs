use std::collections::BTreeSet;
use std::ops::Range;

use serde::Serialize;

use crate::model::NotationKind;
use crate::parser::REGISTRY;

/// How a candidate block was recognized. Higher tiers win overlap
/// resolution outright, before confidence is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionTier {
    Heuristic,
    Table,
    Fence,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectedBlock {
    pub kind: NotationKind,
    pub text: String,
    pub range: Range<usize>,
    pub confidence: f32,
    pub tier: DetectionTier,
}

/// Scans a document for candidate notation blocks and resolves overlaps.
/// Plain text yields an empty list; this never fails.
pub fn detect_blocks(text: &str, allowed: &BTreeSet<NotationKind>) -> Vec<DetectedBlock> {
    let lines = index_lines(text);
    let mut candidates = Vec::new();
    scan_fences(text, &lines, allowed, &mut candidates);
    scan_tables(text, &lines, allowed, &mut candidates);
    scan_heuristics(text, &lines, allowed, &mut candidates);
    resolve_overlaps(candidates)
}

/// (byte offset of line start, line content without terminator).
fn index_lines(text: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        lines.push((offset, content));
        offset += line.len();
    }
    lines
}

fn fence_open(line: &str) -> Option<(&'static str, &str)> {
    for marker in ["```", "~~~", ":::"] {
        if let Some(rest) = line.trim_start().strip_prefix(marker) {
            return Some((marker, rest.trim()));
        }
    }
    None
}

fn fence_close(line: &str, marker: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(marker) && trimmed[marker.len()..].trim().is_empty()
}

fn fence_kind(tag: &str) -> Option<NotationKind> {
    let tag = tag.to_ascii_lowercase();
    for notation in REGISTRY {
        if notation.fence_tags().contains(&tag.as_str()) {
            return Some(notation.kind());
        }
    }
    None
}

fn scan_fences(
    text: &str,
    lines: &[(usize, &str)],
    allowed: &BTreeSet<NotationKind>,
    candidates: &mut Vec<DetectedBlock>,
) {
    let mut i = 0;
    while i < lines.len() {
        let (start_offset, line) = lines[i];
        let Some((marker, tag)) = fence_open(line) else {
            i += 1;
            continue;
        };
        let Some(kind) = fence_kind(tag) else {
            i += 1;
            continue;
        };

        let close = (i + 1..lines.len()).find(|&j| fence_close(lines[j].1, marker));
        match close {
            Some(j) => {
                let body_start = lines[i + 1].0;
                let body_end = lines[j].0;
                let end_offset = lines[j].0 + lines[j].1.len();
                if allowed.contains(&kind) {
                    candidates.push(DetectedBlock {
                        kind,
                        text: text[body_start..body_end].to_string(),
                        range: start_offset..end_offset,
                        confidence: 1.0,
                        tier: DetectionTier::Fence,
                    });
                }
                i = j + 1;
            }
            None => {
                // Unterminated fence: zero confidence, dropped after overlap
                // resolution. The candidate still spans the opener and its
                // paragraph so lower tiers cannot reinterpret those lines,
                // while anything past the next blank line still surfaces.
                if !allowed.contains(&kind) {
                    i += 1;
                    continue;
                }
                let body_end = (i + 1..lines.len())
                    .find(|&j| lines[j].1.trim().is_empty())
                    .unwrap_or(lines.len());
                let (last_offset, last_line) = lines[body_end - 1];
                candidates.push(DetectedBlock {
                    kind,
                    text: String::new(),
                    range: start_offset..last_offset + last_line.len(),
                    confidence: 0.0,
                    tier: DetectionTier::Fence,
                });
                i = body_end;
            }
        }
    }
}

fn scan_tables(
    text: &str,
    lines: &[(usize, &str)],
    allowed: &BTreeSet<NotationKind>,
    candidates: &mut Vec<DetectedBlock>,
) {
    for (start, end) in pipe_runs(lines) {
        let run: Vec<&str> = lines[start..end].iter().map(|(_, line)| *line).collect();
        for notation in REGISTRY {
            if !allowed.contains(&notation.kind()) {
                continue;
            }
            if let Some(confidence) = notation.sniff_table(&run) {
                let range = lines[start].0..lines[end - 1].0 + lines[end - 1].1.len();
                candidates.push(DetectedBlock {
                    kind: notation.kind(),
                    text: text[range.clone()].to_string(),
                    range,
                    confidence,
                    tier: DetectionTier::Table,
                });
            }
        }
    }
}

/// Maximal runs of consecutive lines containing a pipe separator.
fn pipe_runs(lines: &[(usize, &str)]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, (_, line)) in lines.iter().enumerate() {
        if line.contains('|') && !line.trim().is_empty() {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            runs.push((s, i));
        }
    }
    if let Some(s) = start {
        runs.push((s, lines.len()));
    }
    runs
}

fn scan_heuristics(
    text: &str,
    lines: &[(usize, &str)],
    allowed: &BTreeSet<NotationKind>,
    candidates: &mut Vec<DetectedBlock>,
) {
    for (start, end) in paragraph_runs(lines) {
        let run: Vec<&str> = lines[start..end].iter().map(|(_, line)| *line).collect();
        for notation in REGISTRY {
            if !allowed.contains(&notation.kind()) {
                continue;
            }
            if let Some(confidence) = notation.sniff(&run) {
                let range = lines[start].0..lines[end - 1].0 + lines[end - 1].1.len();
                candidates.push(DetectedBlock {
                    kind: notation.kind(),
                    text: text[range.clone()].to_string(),
                    range,
                    confidence,
                    tier: DetectionTier::Heuristic,
                });
            }
        }
    }
}

/// Maximal runs of consecutive non-blank lines.
fn paragraph_runs(lines: &[(usize, &str)]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, (_, line)) in lines.iter().enumerate() {
        if !line.trim().is_empty() {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            runs.push((s, i));
        }
    }
    if let Some(s) = start {
        runs.push((s, lines.len()));
    }
    runs
}

/// Keeps the best non-overlapping candidates: tier first, then confidence,
/// then span length. Zero-confidence candidates take part in suppression
/// but are removed from the result, so a malformed fence mutes its span
/// instead of handing it to a lower tier.
fn resolve_overlaps(mut candidates: Vec<DetectedBlock>) -> Vec<DetectedBlock> {
    candidates.sort_by(|a, b| {
        b.tier
            .cmp(&a.tier)
            .then(b.confidence.total_cmp(&a.confidence))
            .then((b.range.len()).cmp(&a.range.len()))
            .then(a.range.start.cmp(&b.range.start))
    });

    let mut kept: Vec<DetectedBlock> = Vec::new();
    for block in candidates {
        let overlaps = kept
            .iter()
            .any(|other| block.range.start < other.range.end && other.range.start < block.range.end);
        if !overlaps {
            kept.push(block);
        }
    }
    kept.retain(|block| block.confidence > 0.0);
    kept.sort_by_key(|block| block.range.start);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_kinds() -> BTreeSet<NotationKind> {
        NotationKind::ALL.into_iter().collect()
    }

    #[test]
    fn plain_text_yields_no_blocks() {
        let text = "Just a paragraph.\n\nAnother paragraph with words.\n";
        assert!(detect_blocks(text, &all_kinds()).is_empty());
    }

    #[test]
    fn fenced_block_detects_with_full_confidence() {
        let text = "intro\n\n```timeline\n2024-01-15: Kickoff\n2024-02-01: Ship\n```\n\noutro\n";
        let blocks = detect_blocks(text, &all_kinds());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, NotationKind::Timeline);
        assert_eq!(blocks[0].tier, DetectionTier::Fence);
        assert_eq!(blocks[0].confidence, 1.0);
        assert!(blocks[0].text.contains("Kickoff"));
    }

    #[test]
    fn all_three_fence_markers_are_accepted() {
        for marker in ["```", "~~~", ":::"] {
            let text = format!("{marker}gantt\nA | 2024-01-01 | 2024-01-05 |\n{marker}\n");
            let blocks = detect_blocks(&text, &all_kinds());
            assert_eq!(blocks.len(), 1, "marker {marker} should open a fence");
            assert_eq!(blocks[0].kind, NotationKind::Gantt);
        }
    }

    #[test]
    fn unterminated_fence_is_skipped_but_later_blocks_survive() {
        let text = "```flowchart\nA -> B\n\n2024-01-15: Kickoff\n2024-02-01: Ship\n";
        let blocks = detect_blocks(text, &all_kinds());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, NotationKind::Timeline);
    }

    #[test]
    fn unterminated_fence_body_is_not_reinterpreted() {
        // The body alone would sniff as a flowchart; the broken fence must
        // mute it rather than let the heuristic tier claim it.
        let text = "intro\n\n```flowchart\nA -> B\nB -> C\n";
        assert!(detect_blocks(text, &all_kinds()).is_empty());
    }

    #[test]
    fn fence_beats_table_on_same_range() {
        // The fenced flowchart body is also a plausible gantt table; the
        // fence tier must win and the table candidate must vanish entirely.
        let text = "```flowchart\nDesign | 2024-01-15 | 2024-02-15 | Sarah\nA -> B\n```\n";
        let blocks = detect_blocks(text, &all_kinds());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, NotationKind::Flowchart);
        assert_eq!(blocks[0].tier, DetectionTier::Fence);
    }

    #[test]
    fn gantt_table_detects_without_fence() {
        let text = "Name | Start | End | Assignee\nDesign | 2024-01-15 | 2024-02-15 | Sarah\n";
        let blocks = detect_blocks(text, &all_kinds());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, NotationKind::Gantt);
        assert_eq!(blocks[0].tier, DetectionTier::Table);
        assert!(blocks[0].confidence >= 0.9);
    }

    #[test]
    fn dated_lines_detect_as_timeline_heuristic() {
        let text = "2024-01-15: Kickoff\n2024-02-01: Phase1 Complete [milestone]\n";
        let blocks = detect_blocks(text, &all_kinds());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, NotationKind::Timeline);
        assert_eq!(blocks[0].tier, DetectionTier::Heuristic);
        assert!(blocks[0].confidence >= 0.5 && blocks[0].confidence <= 0.9);
    }

    #[test]
    fn disallowed_kinds_are_not_reported() {
        let text = "2024-01-15: Kickoff\n2024-02-01: Ship\n";
        let only_gantt: BTreeSet<NotationKind> = [NotationKind::Gantt].into_iter().collect();
        assert!(detect_blocks(text, &only_gantt).is_empty());
    }

    #[test]
    fn multiple_blocks_come_back_in_document_order() {
        let text = "\
A -> B\nB -> C\n\n\
1. Draft\n2. Review\n3. Publish\n\n\
2024-01-15: Kickoff\n2024-02-01: Ship\n";
        let blocks = detect_blocks(text, &all_kinds());
        let kinds: Vec<NotationKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotationKind::Flowchart,
                NotationKind::TextFlow,
                NotationKind::Timeline
            ]
        );
        for pair in blocks.windows(2) {
            assert!(pair[0].range.end <= pair[1].range.start);
        }
    }

    #[test]
    fn detection_is_deterministic() {
        let text = "```gantt\nDesign | 2024-01-15 | 2024-02-15 | Sarah\n```\n\nA -> B: go\nB -> C: stop\n";
        let a = detect_blocks(text, &all_kinds());
        let b = detect_blocks(text, &all_kinds());
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.range, y.range);
            assert_eq!(x.confidence, y.confidence);
        }
    }
}
