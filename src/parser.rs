use once_cell::sync::Lazy;
use regex::Regex;

use crate::date;
use crate::model::{
    DiagramContent, DiagramData, Edge, GanttTask, Node, NotationKind, Priority, TimelineEvent,
    Warning, slug,
};

static ARROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<left>.+?)\s*-{1,2}>\s*(?P<right>[^:]+?)(?:\s*:\s*(?P<label>.+))?$").unwrap()
});
static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)[.)]\s+(?P<text>.+)$").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•]\s+(?P<text>.+)$").unwrap());
static MILESTONE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\[\s*milestone\s*\]\s*").unwrap());
static GANTT_DESC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<name>[^|:]+?)\s+from\s+(?P<start>[^,]+?)\s+to\s+(?P<end>[^,]+?)(?:\s*,\s*(?P<rest>.+))?$")
        .unwrap()
});
static DEPENDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:after|depends\s+on)\s+(?P<task>.+)$").unwrap());
static ASSIGNEE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:assigned\s+to|assignee)\s+(?P<name>.+)$").unwrap());
static PROGRESS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<pct>\d{1,3})\s*%$").unwrap());

/// Successful parser output: the diagram payload, how strongly the block
/// matched this notation's signature, and any elements dropped on the way.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub content: DiagramContent,
    pub confidence: f32,
    pub warnings: Vec<Warning>,
}

/// One notation strategy. Detection and parsing live behind the same
/// registry entry so adding a notation is purely additive.
pub trait Notation: Sync {
    fn kind(&self) -> NotationKind;

    /// Tags accepted after a fence opener (```` ```gantt ````, `~~~timeline`, ...).
    fn fence_tags(&self) -> &'static [&'static str];

    /// Heuristic signature confidence for an unfenced run of raw
    /// (indentation-preserving) lines. `None` means this notation makes no
    /// claim on the block.
    fn sniff(&self, lines: &[&str]) -> Option<f32>;

    /// Table-tier signature confidence. Only table-shaped notations bid here.
    fn sniff_table(&self, _lines: &[&str]) -> Option<f32> {
        None
    }

    /// Never errors and never panics on document content; unrecognizable
    /// input yields `None` and the block is skipped upstream.
    fn try_parse(&self, text: &str) -> Option<Parsed>;
}

pub static REGISTRY: &[&dyn Notation] = &[
    &FlowchartNotation,
    &SequenceNotation,
    &TextFlowNotation,
    &OrgChartNotation,
    &TimelineNotation,
    &GanttNotation,
];

pub fn strategy_for(kind: NotationKind) -> &'static dyn Notation {
    REGISTRY
        .iter()
        .copied()
        .find(|notation| notation.kind() == kind)
        .expect("every notation kind is registered")
}

pub fn parse_block(kind: NotationKind, text: &str) -> Option<Parsed> {
    strategy_for(kind).try_parse(text)
}

fn nonempty_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn arrow_stats(lines: &[&str]) -> (usize, usize) {
    let mut arrows = 0;
    let mut labeled = 0;
    for line in lines {
        if let Some(caps) = ARROW_RE.captures(line.trim()) {
            arrows += 1;
            if caps.name("label").is_some() {
                labeled += 1;
            }
        }
    }
    (arrows, labeled)
}

fn heuristic_confidence(matched: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    0.5 + 0.4 * (matched as f32 / total as f32)
}

fn parse_arrow_graph(text: &str, kind: NotationKind) -> Option<Parsed> {
    let lines = nonempty_lines(text);
    let mut data = DiagramData::new(kind);
    let mut matched = 0usize;

    for line in &lines {
        let Some(caps) = ARROW_RE.captures(line) else {
            continue;
        };
        matched += 1;
        let from = caps["left"].trim().to_string();
        let to = caps["right"].trim().to_string();
        if from.is_empty() || to.is_empty() {
            continue;
        }
        ensure_node(&mut data, &from);
        ensure_node(&mut data, &to);
        data.edges.push(Edge {
            from,
            to,
            label: caps.name("label").map(|m| m.as_str().trim().to_string()),
        });
    }

    if matched == 0 {
        return None;
    }
    Some(Parsed {
        confidence: heuristic_confidence(matched, lines.len()),
        content: DiagramContent::Graph(data),
        warnings: Vec::new(),
    })
}

fn ensure_node(data: &mut DiagramData, id: &str) {
    if data.node(id).is_none() {
        data.nodes.push(Node {
            id: id.to_string(),
            label: id.to_string(),
            category: None,
        });
    }
}

pub struct FlowchartNotation;

impl Notation for FlowchartNotation {
    fn kind(&self) -> NotationKind {
        NotationKind::Flowchart
    }

    fn fence_tags(&self) -> &'static [&'static str] {
        &["flowchart", "flow", "graph"]
    }

    fn sniff(&self, lines: &[&str]) -> Option<f32> {
        let (arrows, labeled) = arrow_stats(lines);
        if arrows == 0 || labeled * 2 > arrows {
            return None;
        }
        Some(heuristic_confidence(arrows, lines.len()))
    }

    fn try_parse(&self, text: &str) -> Option<Parsed> {
        parse_arrow_graph(text, NotationKind::Flowchart)
    }
}

pub struct SequenceNotation;

impl Notation for SequenceNotation {
    fn kind(&self) -> NotationKind {
        NotationKind::Sequence
    }

    fn fence_tags(&self) -> &'static [&'static str] {
        &["sequence"]
    }

    /// Arrow lines that mostly carry `: message` labels read as interactions
    /// between participants rather than a flowchart.
    fn sniff(&self, lines: &[&str]) -> Option<f32> {
        let (arrows, labeled) = arrow_stats(lines);
        if arrows == 0 || labeled * 2 <= arrows {
            return None;
        }
        Some(heuristic_confidence(arrows, lines.len()))
    }

    fn try_parse(&self, text: &str) -> Option<Parsed> {
        parse_arrow_graph(text, NotationKind::Sequence)
    }
}

pub struct TextFlowNotation;

impl Notation for TextFlowNotation {
    fn kind(&self) -> NotationKind {
        NotationKind::TextFlow
    }

    fn fence_tags(&self) -> &'static [&'static str] {
        &["textflow", "steps"]
    }

    fn sniff(&self, lines: &[&str]) -> Option<f32> {
        if lines.len() < 2 {
            return None;
        }
        let numbered = lines
            .iter()
            .filter(|line| NUMBERED_RE.is_match(line.trim()))
            .count();
        if numbered * 2 < lines.len() {
            return None;
        }
        Some(heuristic_confidence(numbered, lines.len()))
    }

    fn try_parse(&self, text: &str) -> Option<Parsed> {
        let lines = nonempty_lines(text);
        let mut data = DiagramData::new(NotationKind::TextFlow);
        let mut matched = 0usize;

        for line in &lines {
            let text = if let Some(caps) = NUMBERED_RE.captures(line) {
                caps["text"].trim().to_string()
            } else if let Some(caps) = BULLET_RE.captures(line) {
                caps["text"].trim().to_string()
            } else {
                continue;
            };
            matched += 1;
            let id = format!("step-{}", data.nodes.len() + 1);
            if let Some(prev) = data.nodes.last() {
                data.edges.push(Edge {
                    from: prev.id.clone(),
                    to: id.clone(),
                    label: None,
                });
            }
            data.nodes.push(Node {
                id,
                label: text,
                category: None,
            });
        }

        if matched == 0 {
            return None;
        }
        Some(Parsed {
            confidence: heuristic_confidence(matched, lines.len()),
            content: DiagramContent::Graph(data),
            warnings: Vec::new(),
        })
    }
}

pub struct OrgChartNotation;

impl OrgChartNotation {
    /// Leading whitespace width with tabs counted as four columns.
    fn indent_of(line: &str) -> usize {
        let mut width = 0;
        for ch in line.chars() {
            match ch {
                ' ' => width += 1,
                '\t' => width += 4,
                _ => break,
            }
        }
        width
    }
}

impl Notation for OrgChartNotation {
    fn kind(&self) -> NotationKind {
        NotationKind::OrgChart
    }

    fn fence_tags(&self) -> &'static [&'static str] {
        &["orgchart", "org"]
    }

    fn sniff(&self, lines: &[&str]) -> Option<f32> {
        if lines.len() < 2 {
            return None;
        }
        // Only bare or bulleted names qualify; any other notation signature
        // disqualifies the block.
        let plain = lines.iter().all(|line| {
            let trimmed = line.trim();
            !ARROW_RE.is_match(trimmed)
                && date::date_prefix(trimmed).is_none()
                && !trimmed.contains('|')
                && !NUMBERED_RE.is_match(trimmed)
        });
        if !plain || Self::indent_of(lines[0]) != 0 {
            return None;
        }
        let nested = lines
            .iter()
            .filter(|line| Self::indent_of(line) > 0 || BULLET_RE.is_match(line.trim()))
            .count();
        if nested == 0 {
            return None;
        }
        Some(heuristic_confidence(nested, lines.len()).min(0.8))
    }

    fn try_parse(&self, text: &str) -> Option<Parsed> {
        let mut data = DiagramData::new(NotationKind::OrgChart);
        // (indent, node index) path from the root to the previous item.
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for raw_line in text.lines() {
            if raw_line.trim().is_empty() {
                continue;
            }
            let mut indent = Self::indent_of(raw_line);
            let mut label = raw_line.trim();
            if let Some(caps) = BULLET_RE.captures(label) {
                // Bullet nesting counts toward depth even when the marker
                // itself sits at column zero.
                indent += 2;
                label = caps.name("text").map_or(label, |m| m.as_str().trim());
            }
            if label.is_empty() {
                continue;
            }

            while stack.last().is_some_and(|(depth, _)| *depth >= indent) {
                stack.pop();
            }
            let index = data.nodes.len();
            data.nodes.push(Node {
                id: slug(label),
                label: label.to_string(),
                category: None,
            });
            if let Some((_, parent)) = stack.last() {
                data.edges.push(Edge {
                    from: data.nodes[*parent].id.clone(),
                    to: data.nodes[index].id.clone(),
                    label: None,
                });
            }
            stack.push((indent, index));
        }

        if data.nodes.is_empty() {
            return None;
        }
        let confidence = heuristic_confidence(data.edges.len(), data.nodes.len());
        Some(Parsed {
            confidence,
            content: DiagramContent::Graph(data),
            warnings: Vec::new(),
        })
    }
}

pub struct TimelineNotation;

impl Notation for TimelineNotation {
    fn kind(&self) -> NotationKind {
        NotationKind::Timeline
    }

    fn fence_tags(&self) -> &'static [&'static str] {
        &["timeline"]
    }

    fn sniff(&self, lines: &[&str]) -> Option<f32> {
        let dated = lines
            .iter()
            .filter(|line| date::date_prefix(line.trim()).is_some())
            .count();
        if dated < 2 || dated * 2 < lines.len() {
            return None;
        }
        Some(heuristic_confidence(dated, lines.len()))
    }

    fn try_parse(&self, text: &str) -> Option<Parsed> {
        let lines = nonempty_lines(text);
        let mut events = Vec::new();
        let mut warnings = Vec::new();
        let mut date_shaped = 0usize;

        for line in &lines {
            let Some(prefix) = date::date_prefix(line) else {
                continue;
            };
            date_shaped += 1;
            let Some(parsed_date) = date::parse_date(prefix) else {
                warnings.push(Warning::UnparseableDate {
                    line: (*line).to_string(),
                });
                continue;
            };
            let rest = line[prefix.len()..]
                .trim_start_matches([':', '-', '–'])
                .trim();
            let milestone = MILESTONE_TAG_RE.is_match(rest);
            let title = MILESTONE_TAG_RE.replace_all(rest, " ").trim().to_string();
            events.push(TimelineEvent {
                id: format!("event-{}", events.len() + 1),
                title: if title.is_empty() {
                    prefix.trim().to_string()
                } else {
                    title
                },
                date: parsed_date,
                category: None,
                milestone,
            });
        }

        if date_shaped == 0 {
            return None;
        }
        Some(Parsed {
            confidence: heuristic_confidence(events.len(), lines.len()),
            content: DiagramContent::Timeline(events),
            warnings,
        })
    }
}

pub struct GanttNotation;

impl GanttNotation {
    fn split_row(line: &str) -> Option<Vec<&str>> {
        if !line.contains('|') {
            return None;
        }
        let cells: Vec<&str> = line
            .trim()
            .trim_matches('|')
            .split('|')
            .map(str::trim)
            .collect();
        if cells.len() < 3 { None } else { Some(cells) }
    }

    fn is_separator_row(cells: &[&str]) -> bool {
        cells
            .iter()
            .all(|cell| !cell.is_empty() && cell.chars().all(|ch| matches!(ch, '-' | ':' | '=')))
    }

    fn is_header_row(cells: &[&str]) -> bool {
        let name = cells[0].to_ascii_lowercase();
        let start = cells[1].to_ascii_lowercase();
        matches!(name.as_str(), "name" | "task" | "title") || start == "start"
    }

    fn parse_table_row(cells: &[&str], warnings: &mut Vec<Warning>, line: &str) -> Option<GanttTask> {
        let name = cells[0];
        if name.is_empty() {
            return None;
        }
        let (Some(start), Some(end)) = (date::parse_date(cells[1]), date::parse_date(cells[2]))
        else {
            warnings.push(Warning::UnparseableDate {
                line: line.to_string(),
            });
            return None;
        };
        let assignee = cells
            .get(3)
            .filter(|cell| !cell.is_empty())
            .map(|cell| cell.to_string());
        let progress = cells
            .get(4)
            .and_then(|cell| cell.trim_end_matches('%').trim().parse::<u32>().ok())
            .map_or(0, |pct| pct.min(100) as u8);
        let priority = cells
            .get(5)
            .and_then(|cell| Priority::from_token(cell))
            .unwrap_or_default();
        Some(GanttTask {
            id: slug(name),
            name: name.to_string(),
            start,
            end,
            progress,
            dependencies: Vec::new(),
            assignee,
            priority,
        })
    }

    fn parse_descriptive_line(line: &str, warnings: &mut Vec<Warning>) -> Option<GanttTask> {
        let caps = GANTT_DESC_RE.captures(line)?;
        let name = caps["name"].trim();
        let (Some(start), Some(end)) = (
            date::parse_date(&caps["start"]),
            date::parse_date(&caps["end"]),
        ) else {
            warnings.push(Warning::UnparseableDate {
                line: line.to_string(),
            });
            return None;
        };

        let mut task = GanttTask {
            id: slug(name),
            name: name.to_string(),
            start,
            end,
            progress: 0,
            dependencies: Vec::new(),
            assignee: None,
            priority: Priority::default(),
        };
        if let Some(rest) = caps.name("rest") {
            for clause in rest.as_str().split(',') {
                let clause = clause.trim();
                if let Some(dep) = DEPENDS_RE.captures(clause) {
                    task.dependencies.push(slug(&dep["task"]));
                } else if let Some(who) = ASSIGNEE_RE.captures(clause) {
                    task.assignee = Some(who["name"].trim().to_string());
                } else if let Some(pct) = PROGRESS_RE.captures(clause) {
                    task.progress = pct["pct"].parse::<u32>().map_or(0, |p| p.min(100) as u8);
                } else if let Some(priority) = Priority::from_token(clause) {
                    task.priority = priority;
                }
            }
        }
        Some(task)
    }
}

impl Notation for GanttNotation {
    fn kind(&self) -> NotationKind {
        NotationKind::Gantt
    }

    fn fence_tags(&self) -> &'static [&'static str] {
        &["gantt"]
    }

    fn sniff(&self, lines: &[&str]) -> Option<f32> {
        let descriptive = lines
            .iter()
            .filter(|line| {
                GANTT_DESC_RE.captures(line.trim()).is_some_and(|caps| {
                    date::parse_date(&caps["start"]).is_some()
                        && date::parse_date(&caps["end"]).is_some()
                })
            })
            .count();
        if descriptive == 0 {
            return None;
        }
        Some(heuristic_confidence(descriptive, lines.len()))
    }

    fn sniff_table(&self, lines: &[&str]) -> Option<f32> {
        let mut data_rows = 0usize;
        let mut dated_rows = 0usize;
        let mut header = false;
        for line in lines {
            let Some(cells) = Self::split_row(line) else {
                return None;
            };
            if Self::is_separator_row(&cells) {
                continue;
            }
            if data_rows == 0 && dated_rows == 0 && Self::is_header_row(&cells) {
                header = true;
                continue;
            }
            data_rows += 1;
            if date::parse_date(cells[1]).is_some() && date::parse_date(cells[2]).is_some() {
                dated_rows += 1;
            }
        }
        if data_rows == 0 || (dated_rows == 0 && !header) {
            return None;
        }
        let mut confidence = heuristic_confidence(dated_rows, data_rows).min(0.9);
        if header {
            confidence = confidence.max(0.9);
        }
        Some(confidence)
    }

    fn try_parse(&self, text: &str) -> Option<Parsed> {
        let lines = nonempty_lines(text);
        let mut tasks = Vec::new();
        let mut warnings = Vec::new();
        let mut task_shaped = 0usize;

        for line in &lines {
            if let Some(cells) = Self::split_row(line) {
                if Self::is_separator_row(&cells) || Self::is_header_row(&cells) {
                    continue;
                }
                task_shaped += 1;
                if let Some(task) = Self::parse_table_row(&cells, &mut warnings, line) {
                    tasks.push(task);
                }
            } else if GANTT_DESC_RE.is_match(line) {
                task_shaped += 1;
                if let Some(task) = Self::parse_descriptive_line(line, &mut warnings) {
                    tasks.push(task);
                }
            }
        }

        if task_shaped == 0 {
            return None;
        }
        Some(Parsed {
            confidence: heuristic_confidence(tasks.len(), lines.len()),
            content: DiagramContent::Gantt(tasks),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(kind: NotationKind, text: &str) -> Parsed {
        parse_block(kind, text).expect("block should parse")
    }

    #[test]
    fn arrow_lines_become_nodes_and_edges() {
        let parsed = parse(
            NotationKind::Flowchart,
            "Start -> Validate\nValidate -> Ship: on success\n",
        );
        let DiagramContent::Graph(data) = &parsed.content else {
            panic!("expected graph");
        };
        assert_eq!(data.nodes.len(), 3);
        assert_eq!(data.edges.len(), 2);
        assert_eq!(data.edges[1].label.as_deref(), Some("on success"));
    }

    #[test]
    fn sequence_labels_are_captured_verbatim() {
        let parsed = parse(NotationKind::Sequence, "Client --> Server: GET /jobs\n");
        let DiagramContent::Graph(data) = &parsed.content else {
            panic!("expected graph");
        };
        assert_eq!(data.kind, NotationKind::Sequence);
        assert_eq!(data.edges[0].label.as_deref(), Some("GET /jobs"));
    }

    #[test]
    fn numbered_steps_chain_in_document_order() {
        let parsed = parse(
            NotationKind::TextFlow,
            "1. Draft\n2. Review\n3) Publish\n",
        );
        let DiagramContent::Graph(data) = &parsed.content else {
            panic!("expected graph");
        };
        assert_eq!(data.nodes.len(), 3);
        assert_eq!(data.edges.len(), 2);
        assert_eq!(data.edges[0].from, "step-1");
        assert_eq!(data.edges[1].to, "step-3");
    }

    #[test]
    fn org_chart_indentation_builds_hierarchy() {
        let parsed = parse(
            NotationKind::OrgChart,
            "CEO\n  VP Engineering\n    Platform Lead\n  VP Sales\n",
        );
        let DiagramContent::Graph(data) = &parsed.content else {
            panic!("expected graph");
        };
        assert_eq!(data.nodes[0].id, "ceo");
        assert_eq!(data.edges.len(), 3);
        assert_eq!(data.edges[0].from, "ceo");
        assert_eq!(data.edges[1].from, "vp-engineering");
        assert_eq!(data.edges[2].from, "ceo");
    }

    #[test]
    fn org_chart_bullet_nesting_counts_as_depth() {
        let parsed = parse(
            NotationKind::OrgChart,
            "Director\n- Team A\n  - Alice\n- Team B\n",
        );
        let DiagramContent::Graph(data) = &parsed.content else {
            panic!("expected graph");
        };
        assert_eq!(data.edges.len(), 3);
        assert_eq!(data.edges[1].from, "team-a");
        assert_eq!(data.edges[1].to, "alice");
    }

    #[test]
    fn timeline_milestone_tag_sets_flag() {
        let parsed = parse(
            NotationKind::Timeline,
            "2024-01-15: Kickoff\n2024-02-01: Phase1 Complete [milestone]\n",
        );
        let DiagramContent::Timeline(events) = &parsed.content else {
            panic!("expected timeline");
        };
        assert_eq!(events.len(), 2);
        assert!(!events[0].milestone);
        assert!(events[1].milestone);
        assert_eq!(events[1].title, "Phase1 Complete");
    }

    #[test]
    fn timeline_written_dates_normalize() {
        let parsed = parse(NotationKind::Timeline, "January 15, 2024: Kickoff\n");
        let DiagramContent::Timeline(events) = &parsed.content else {
            panic!("expected timeline");
        };
        assert_eq!(events[0].date, date::parse_date("2024-01-15").unwrap());
    }

    #[test]
    fn timeline_bad_date_drops_element_with_warning() {
        let parsed = parse(
            NotationKind::Timeline,
            "2024-01-15: Kickoff\n2024-13-40: Impossible\n",
        );
        let DiagramContent::Timeline(events) = &parsed.content else {
            panic!("expected timeline");
        };
        assert_eq!(events.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(matches!(parsed.warnings[0], Warning::UnparseableDate { .. }));
    }

    #[test]
    fn gantt_table_row_parses_all_columns() {
        let parsed = parse(
            NotationKind::Gantt,
            "Name | Start | End | Assignee\nDesign | 2024-01-15 | 2024-02-15 | Sarah\n",
        );
        let DiagramContent::Gantt(tasks) = &parsed.content else {
            panic!("expected gantt");
        };
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.id, "design");
        assert_eq!(task.assignee.as_deref(), Some("Sarah"));
        assert_eq!(date::days_between(task.start, task.end), 31);
        assert_eq!(task.progress, 0);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn gantt_extended_columns_parse_progress_and_priority() {
        let parsed = parse(
            NotationKind::Gantt,
            "Build | 2024-02-01 | 2024-03-01 | Ann | 40% | critical\n",
        );
        let DiagramContent::Gantt(tasks) = &parsed.content else {
            panic!("expected gantt");
        };
        assert_eq!(tasks[0].progress, 40);
        assert_eq!(tasks[0].priority, Priority::Critical);
    }

    #[test]
    fn gantt_descriptive_line_with_dependency_phrasing() {
        let parsed = parse(
            NotationKind::Gantt,
            "Design from 2024-01-15 to 2024-02-15\nBuild from 2024-02-16 to 2024-03-20, after Design, assigned to Omar, 25%, high\n",
        );
        let DiagramContent::Gantt(tasks) = &parsed.content else {
            panic!("expected gantt");
        };
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].dependencies, vec!["design".to_string()]);
        assert_eq!(tasks[1].assignee.as_deref(), Some("Omar"));
        assert_eq!(tasks[1].progress, 25);
        assert_eq!(tasks[1].priority, Priority::High);
    }

    #[test]
    fn gantt_bad_date_row_is_dropped_with_warning() {
        let parsed = parse(
            NotationKind::Gantt,
            "Design | 2024-01-15 | 2024-02-15 | Sarah\nBroken | someday | 2024-02-20 | Lee\n",
        );
        let DiagramContent::Gantt(tasks) = &parsed.content else {
            panic!("expected gantt");
        };
        assert_eq!(tasks.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn unrecognizable_content_yields_none() {
        assert!(parse_block(NotationKind::Flowchart, "just prose here\n").is_none());
        assert!(parse_block(NotationKind::Timeline, "no dates at all\n").is_none());
        assert!(parse_block(NotationKind::Gantt, "nothing tabular\n").is_none());
    }

    #[test]
    fn identical_input_parses_identically() {
        let text = "2024-01-15: Kickoff\n2024-02-01: Done [milestone]\n";
        let a = parse(NotationKind::Timeline, text);
        let b = parse(NotationKind::Timeline, text);
        assert_eq!(a.content, b.content);
        assert_eq!(a.warnings, b.warnings);
    }
}
