use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotationKind {
    Flowchart,
    Sequence,
    TextFlow,
    OrgChart,
    Timeline,
    Gantt,
}

impl NotationKind {
    pub const ALL: [NotationKind; 6] = [
        NotationKind::Flowchart,
        NotationKind::Sequence,
        NotationKind::TextFlow,
        NotationKind::OrgChart,
        NotationKind::Timeline,
        NotationKind::Gantt,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "flowchart" | "flow" | "graph" => Some(Self::Flowchart),
            "sequence" => Some(Self::Sequence),
            "textflow" | "text-flow" | "steps" => Some(Self::TextFlow),
            "orgchart" | "org-chart" | "org" => Some(Self::OrgChart),
            "timeline" => Some(Self::Timeline),
            "gantt" => Some(Self::Gantt),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequence",
            Self::TextFlow => "text-flow",
            Self::OrgChart => "org-chart",
            Self::Timeline => "timeline",
            Self::Gantt => "gantt",
        }
    }
}

impl fmt::Display for NotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    /// Style hint resolved against the theme at render time.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
}

/// Common node/edge envelope shared by flowchart, sequence, org-chart and
/// text-flow notations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramData {
    pub kind: NotationKind,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub metadata: BTreeMap<String, String>,
}

impl DiagramData {
    pub fn new(kind: NotationKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            edges: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    pub milestone: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "normal" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttTask {
    pub id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Percent complete, 0-100.
    pub progress: u8,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assignee: Option<String>,
    pub priority: Priority,
}

/// Everything the repair policy records. Construction never fails on
/// document content; these are the paper trail instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Warning {
    DuplicateId { original: String, renamed: String },
    DanglingEdge { from: String, to: String, missing: String },
    DanglingDependency { task: String, missing: String },
    CircularDependency { task: String, dropped: String },
    EndBeforeStart { task: String },
    UnparseableDate { line: String },
    SkippedBlock { notation: NotationKind, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { original, renamed } => {
                write!(f, "duplicate id {original:?} renamed to {renamed:?}")
            }
            Self::DanglingEdge { from, to, missing } => {
                write!(f, "edge {from:?} -> {to:?} dropped: {missing:?} does not exist")
            }
            Self::DanglingDependency { task, missing } => {
                write!(f, "task {task:?} dependency {missing:?} dropped: no such task")
            }
            Self::CircularDependency { task, dropped } => {
                write!(f, "task {task:?} dependency {dropped:?} dropped: closes a cycle")
            }
            Self::EndBeforeStart { task } => {
                write!(f, "task {task:?} ended before it started; end clamped to start")
            }
            Self::UnparseableDate { line } => {
                write!(f, "dropped element with unparseable date: {line:?}")
            }
            Self::SkippedBlock { notation, reason } => {
                write!(f, "skipped {notation} block: {reason}")
            }
        }
    }
}

/// One recognized diagram in any of its three payload shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum DiagramContent {
    Graph(DiagramData),
    Timeline(Vec<TimelineEvent>),
    Gantt(Vec<GanttTask>),
}

impl DiagramContent {
    pub fn kind(&self) -> NotationKind {
        match self {
            Self::Graph(data) => data.kind,
            Self::Timeline(_) => NotationKind::Timeline,
            Self::Gantt(_) => NotationKind::Gantt,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Graph(data) => data.nodes.is_empty(),
            Self::Timeline(events) => events.is_empty(),
            Self::Gantt(tasks) => tasks.is_empty(),
        }
    }
}

/// Applies the invariant checks and deterministic repairs. Repairs append to
/// `warnings`; nothing here rejects a whole diagram.
pub fn validate(content: DiagramContent, warnings: &mut Vec<Warning>) -> DiagramContent {
    match content {
        DiagramContent::Graph(data) => DiagramContent::Graph(validate_graph(data, warnings)),
        DiagramContent::Timeline(events) => {
            DiagramContent::Timeline(validate_timeline(events, warnings))
        }
        DiagramContent::Gantt(tasks) => DiagramContent::Gantt(validate_gantt(tasks, warnings)),
    }
}

fn validate_graph(mut data: DiagramData, warnings: &mut Vec<Warning>) -> DiagramData {
    dedupe_ids(
        data.nodes.iter_mut().map(|node| &mut node.id),
        warnings,
    );

    let ids: HashSet<String> = data.nodes.iter().map(|node| node.id.clone()).collect();
    data.edges.retain(|edge| {
        let missing = if !ids.contains(&edge.from) {
            Some(edge.from.clone())
        } else if !ids.contains(&edge.to) {
            Some(edge.to.clone())
        } else {
            None
        };
        match missing {
            Some(missing) => {
                warnings.push(Warning::DanglingEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing,
                });
                false
            }
            None => true,
        }
    });
    data
}

fn validate_timeline(
    mut events: Vec<TimelineEvent>,
    warnings: &mut Vec<Warning>,
) -> Vec<TimelineEvent> {
    dedupe_ids(events.iter_mut().map(|event| &mut event.id), warnings);
    events
}

fn validate_gantt(mut tasks: Vec<GanttTask>, warnings: &mut Vec<Warning>) -> Vec<GanttTask> {
    dedupe_ids(tasks.iter_mut().map(|task| &mut task.id), warnings);

    for task in &mut tasks {
        if task.end < task.start {
            warnings.push(Warning::EndBeforeStart {
                task: task.id.clone(),
            });
            task.end = task.start;
        }
        task.progress = task.progress.min(100);
    }

    let ids: HashSet<String> = tasks.iter().map(|task| task.id.clone()).collect();
    for task in &mut tasks {
        let task_id = task.id.clone();
        task.dependencies.retain(|dep| {
            if ids.contains(dep) {
                true
            } else {
                warnings.push(Warning::DanglingDependency {
                    task: task_id.clone(),
                    missing: dep.clone(),
                });
                false
            }
        });
    }

    break_dependency_cycles(&mut tasks, warnings);
    tasks
}

/// Walks dependencies in task order and drops any edge that closes a cycle,
/// so every downstream stage sees a DAG.
fn break_dependency_cycles(tasks: &mut [GanttTask], warnings: &mut Vec<Warning>) {
    let mut accepted: HashMap<String, Vec<String>> = HashMap::new();
    for task in tasks.iter_mut() {
        let task_id = task.id.clone();
        task.dependencies.retain(|dep| {
            if reaches(&accepted, &task_id, dep) {
                warnings.push(Warning::CircularDependency {
                    task: task_id.clone(),
                    dropped: dep.clone(),
                });
                false
            } else {
                accepted
                    .entry(dep.clone())
                    .or_default()
                    .push(task_id.clone());
                true
            }
        });
    }
}

/// True when `target` is reachable from `from` over accepted dependency edges.
fn reaches(edges: &HashMap<String, Vec<String>>, from: &str, target: &str) -> bool {
    if from == target {
        return true;
    }
    let mut stack = vec![from];
    let mut seen: HashSet<&str> = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(next) = edges.get(current) {
            stack.extend(next.iter().map(String::as_str));
        }
    }
    false
}

/// Renames the second and later occurrences of an id with a deterministic
/// `-2`, `-3`, ... suffix.
fn dedupe_ids<'a>(ids: impl Iterator<Item = &'a mut String>, warnings: &mut Vec<Warning>) {
    let ids: Vec<&'a mut String> = ids.collect();
    // Every input id is off limits as a rename target, so `a, a, a-2`
    // becomes `a, a-3, a-2` rather than colliding with the literal `a-2`.
    let mut taken: HashSet<String> = ids.iter().map(|id| (**id).clone()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    for id in ids {
        if seen.insert(id.clone()) {
            continue;
        }
        let mut suffix = 2usize;
        let renamed = loop {
            let candidate = format!("{}-{}", id, suffix);
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        taken.insert(renamed.clone());
        seen.insert(renamed.clone());
        warnings.push(Warning::DuplicateId {
            original: id.clone(),
            renamed: renamed.clone(),
        });
        *id = renamed;
    }
}

/// Lowercase alphanumeric id derived from a display name. Parse-time only;
/// rendering never mints ids.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("item");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;

    fn task(id: &str, start: &str, end: &str, deps: &[&str]) -> GanttTask {
        GanttTask {
            id: id.to_string(),
            name: id.to_string(),
            start: parse_date(start).unwrap(),
            end: parse_date(end).unwrap(),
            progress: 0,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            assignee: None,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn duplicate_node_ids_get_numeric_suffix() {
        let mut data = DiagramData::new(NotationKind::Flowchart);
        for _ in 0..3 {
            data.nodes.push(Node {
                id: "a".to_string(),
                label: "A".to_string(),
                category: None,
            });
        }
        let mut warnings = Vec::new();
        let DiagramContent::Graph(data) = validate(DiagramContent::Graph(data), &mut warnings)
        else {
            unreachable!()
        };
        let ids: Vec<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "a-2", "a-3"]);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn skipped_block_warning_serializes_with_tag_and_notation() {
        let warning = Warning::SkippedBlock {
            notation: NotationKind::Flowchart,
            reason: "unreadable".to_string(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"kind\":\"skipped-block\""));
        assert!(json.contains("\"notation\":\"flowchart\""));
    }

    #[test]
    fn duplicate_rename_skips_ids_already_in_use() {
        // A task literally named `a-2` must keep its id; the renamed
        // duplicate steps over it instead of colliding.
        let tasks = vec![
            task("a", "2024-01-01", "2024-01-05", &[]),
            task("a", "2024-01-06", "2024-01-10", &[]),
            task("a-2", "2024-01-11", "2024-01-15", &[]),
        ];
        let mut warnings = Vec::new();
        let DiagramContent::Gantt(tasks) = validate(DiagramContent::Gantt(tasks), &mut warnings)
        else {
            unreachable!()
        };
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "a-3", "a-2"]);
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn dangling_edge_is_dropped_with_warning() {
        let mut data = DiagramData::new(NotationKind::Flowchart);
        data.nodes.push(Node {
            id: "a".to_string(),
            label: "A".to_string(),
            category: None,
        });
        data.edges.push(Edge {
            from: "a".to_string(),
            to: "ghost".to_string(),
            label: None,
        });
        let mut warnings = Vec::new();
        let DiagramContent::Graph(data) = validate(DiagramContent::Graph(data), &mut warnings)
        else {
            unreachable!()
        };
        assert!(data.edges.is_empty());
        assert!(matches!(warnings[0], Warning::DanglingEdge { .. }));
    }

    #[test]
    fn inverted_date_range_clamps_end_to_start() {
        let tasks = vec![task("a", "2024-02-15", "2024-01-15", &[])];
        let mut warnings = Vec::new();
        let DiagramContent::Gantt(tasks) = validate(DiagramContent::Gantt(tasks), &mut warnings)
        else {
            unreachable!()
        };
        assert_eq!(tasks[0].end, tasks[0].start);
        assert!(matches!(warnings[0], Warning::EndBeforeStart { .. }));
    }

    #[test]
    fn dangling_dependency_is_dropped() {
        let tasks = vec![task("a", "2024-01-01", "2024-01-05", &["ghost"])];
        let mut warnings = Vec::new();
        let DiagramContent::Gantt(tasks) = validate(DiagramContent::Gantt(tasks), &mut warnings)
        else {
            unreachable!()
        };
        assert!(tasks[0].dependencies.is_empty());
        assert!(matches!(warnings[0], Warning::DanglingDependency { .. }));
    }

    #[test]
    fn dependency_cycle_is_broken_at_the_closing_edge() {
        let tasks = vec![
            task("a", "2024-01-01", "2024-01-05", &["b"]),
            task("b", "2024-01-06", "2024-01-10", &["a"]),
        ];
        let mut warnings = Vec::new();
        let DiagramContent::Gantt(tasks) = validate(DiagramContent::Gantt(tasks), &mut warnings)
        else {
            unreachable!()
        };
        // First edge survives, the one that would close the cycle is dropped.
        assert_eq!(tasks[0].dependencies, vec!["b".to_string()]);
        assert!(tasks[1].dependencies.is_empty());
        assert!(
            warnings
                .iter()
                .any(|w| matches!(w, Warning::CircularDependency { .. }))
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let tasks = vec![task("a", "2024-01-01", "2024-01-05", &["a"])];
        let mut warnings = Vec::new();
        let DiagramContent::Gantt(tasks) = validate(DiagramContent::Gantt(tasks), &mut warnings)
        else {
            unreachable!()
        };
        assert!(tasks[0].dependencies.is_empty());
    }

    #[test]
    fn slug_is_stable_and_ascii() {
        assert_eq!(slug("Design Phase"), "design-phase");
        assert_eq!(slug("  QA / Review  "), "qa-review");
        assert_eq!(slug("***"), "item");
    }
}
