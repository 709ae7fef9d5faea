//! Tree entities for work plans and study plans
//!
//! Two tree variants share one header shape:
//!
//! ```text
//! Project   -> Phase   -> Step    -> Task -> SubTask
//! StudyPlan -> Subject -> Chapter -> Lecture | Topic
//! ```
//!
//! A chapter holds checkbox lectures (the lecture-count import shape) or
//! numeric topics, never both.
//!
//! Every level implements [`Node`], which is all the engine needs to walk,
//! aggregate and mutate either variant without knowing which one it holds.

use crate::error::{Result, TallyError};
use crate::progress::{HasProgress, MAX_PROGRESS, MIN_PROGRESS};
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use ulid::Ulid;

/// Opaque node identifier, unique within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Fresh ULID-backed identifier
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Level of a node within its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Project,
    Phase,
    Step,
    Task,
    SubTask,
    StudyPlan,
    Subject,
    Chapter,
    Lecture,
    Topic,
}

impl NodeKind {
    /// Kind of the children this level holds, `None` for leaves
    ///
    /// Chapters report lectures here; a chapter that already holds topics grows
    /// topics instead.
    pub fn child_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::Project => Some(NodeKind::Phase),
            NodeKind::Phase => Some(NodeKind::Step),
            NodeKind::Step => Some(NodeKind::Task),
            NodeKind::Task => Some(NodeKind::SubTask),
            NodeKind::StudyPlan => Some(NodeKind::Subject),
            NodeKind::Subject => Some(NodeKind::Chapter),
            NodeKind::Chapter => Some(NodeKind::Lecture),
            NodeKind::SubTask | NodeKind::Lecture | NodeKind::Topic => None,
        }
    }

    pub fn is_leaf(self) -> bool {
        self.child_kind().is_none()
    }

    pub fn is_root(self) -> bool {
        matches!(self, NodeKind::Project | NodeKind::StudyPlan)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Project => "project",
            NodeKind::Phase => "phase",
            NodeKind::Step => "step",
            NodeKind::Task => "task",
            NodeKind::SubTask => "subtask",
            NodeKind::StudyPlan => "study plan",
            NodeKind::Subject => "subject",
            NodeKind::Chapter => "chapter",
            NodeKind::Lecture => "lecture",
            NodeKind::Topic => "topic",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields shared by every node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeHeader {
    #[serde(default = "NodeId::generate")]
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    /// 0-100, unrounded on composites
    #[serde(default)]
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl NodeHeader {
    /// Header for a brand-new node: fresh id, zero progress, not started
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: NodeId::generate(),
            name: name.into(),
            description: None,
            status: Status::NotStarted,
            progress: MIN_PROGRESS,
            notes: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn from_spec(spec: &NewNode, now: DateTime<Utc>) -> Self {
        Self {
            description: spec.description.clone(),
            notes: spec.notes.clone(),
            tags: spec.tags.clone(),
            ..Self::new(spec.name.trim(), now)
        }
    }
}

impl HasProgress for NodeHeader {
    fn progress(&self) -> f64 {
        self.progress
    }
}

/// Initial fields for a node created through `add_child`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewNode {
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    /// Only kept by tasks and subtasks
    pub estimated_minutes: Option<u32>,
}

impl NewNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub(crate) fn header(&self, now: DateTime<Utc>) -> NodeHeader {
        NodeHeader::from_spec(self, now)
    }
}

/// Common interface over every level of both tree variants
pub trait Node: fmt::Debug {
    fn kind(&self) -> NodeKind;

    fn header(&self) -> &NodeHeader;

    fn header_mut(&mut self) -> &mut NodeHeader;

    /// Immediate children, in order
    fn children(&self) -> Vec<&dyn Node> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        Vec::new()
    }

    /// Append a child of this level's child kind, returning the kind created
    fn push_child(&mut self, header: NodeHeader, spec: &NewNode) -> Result<NodeKind> {
        let _ = (header, spec);
        Err(TallyError::leaf_has_no_children(self.id().as_str(), self.kind()))
    }

    /// Remove the immediate child with `id` and its whole subtree
    fn remove_child(&mut self, id: &str) -> bool {
        let _ = id;
        false
    }

    /// Progress dictated by leaf-specific state rather than the header
    fn intrinsic_progress(&self) -> Option<f64> {
        None
    }

    /// Store a resolved progress value on a leaf
    fn set_leaf_progress(&mut self, progress: f64) {
        self.header_mut().progress = progress;
    }

    fn id(&self) -> &NodeId {
        &self.header().id
    }

    fn name(&self) -> &str {
        &self.header().name
    }

    fn status(&self) -> Status {
        self.header().status
    }

    fn is_leaf(&self) -> bool {
        self.kind().is_leaf()
    }
}

impl HasProgress for dyn Node + '_ {
    fn progress(&self) -> f64 {
        self.header().progress
    }
}

// ── Work tree ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

/// Work-tree leaf; progress and status are set by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

// ── Study tree ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Topic>,
}

/// Study-tree leaf; a checkbox rather than a progress slider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub completed: bool,
    /// Free-form duration such as "00:01:30:00"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<String>,
}

/// Study-tree leaf with a user-set progress, like a subtask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

impl Project {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            header: NodeHeader::new(name, now),
            phases: Vec::new(),
        }
    }
}

impl StudyPlan {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            header: NodeHeader::new(name, now),
            subjects: Vec::new(),
        }
    }
}

impl Phase {
    fn spawn(header: NodeHeader, _spec: &NewNode) -> Self {
        Self {
            header,
            steps: Vec::new(),
        }
    }
}

impl Step {
    fn spawn(header: NodeHeader, _spec: &NewNode) -> Self {
        Self {
            header,
            tasks: Vec::new(),
        }
    }
}

impl Task {
    fn spawn(header: NodeHeader, spec: &NewNode) -> Self {
        Self {
            header,
            subtasks: Vec::new(),
            estimated_minutes: spec.estimated_minutes,
        }
    }
}

impl SubTask {
    fn spawn(header: NodeHeader, spec: &NewNode) -> Self {
        Self {
            header,
            estimated_minutes: spec.estimated_minutes,
        }
    }
}

impl Subject {
    fn spawn(header: NodeHeader, _spec: &NewNode) -> Self {
        Self {
            header,
            chapters: Vec::new(),
        }
    }
}

impl Chapter {
    fn spawn(header: NodeHeader, _spec: &NewNode) -> Self {
        Self {
            header,
            lectures: Vec::new(),
            topics: Vec::new(),
        }
    }

    /// Holds topics rather than lectures
    pub fn is_topical(&self) -> bool {
        !self.topics.is_empty()
    }
}

impl Topic {
    fn spawn(header: NodeHeader, spec: &NewNode) -> Self {
        Self {
            header,
            estimated_minutes: spec.estimated_minutes,
        }
    }
}

impl Lecture {
    fn spawn(header: NodeHeader, _spec: &NewNode) -> Self {
        Self {
            header,
            completed: false,
            time_spent: None,
        }
    }
}

/// Implements [`Node`] for a level that owns a `Vec` of the next level
macro_rules! composite_node {
    ($ty:ty, $kind:expr, $field:ident, $child:ty) => {
        impl Node for $ty {
            fn kind(&self) -> NodeKind {
                $kind
            }

            fn header(&self) -> &NodeHeader {
                &self.header
            }

            fn header_mut(&mut self) -> &mut NodeHeader {
                &mut self.header
            }

            fn children(&self) -> Vec<&dyn Node> {
                self.$field.iter().map(|c| c as &dyn Node).collect()
            }

            fn children_mut(&mut self) -> Vec<&mut dyn Node> {
                self.$field.iter_mut().map(|c| c as &mut dyn Node).collect()
            }

            fn push_child(&mut self, header: NodeHeader, spec: &NewNode) -> Result<NodeKind> {
                let child = <$child>::spawn(header, spec);
                let kind = child.kind();
                self.$field.push(child);
                Ok(kind)
            }

            fn remove_child(&mut self, id: &str) -> bool {
                match self.$field.iter().position(|c| c.header.id.as_str() == id) {
                    Some(pos) => {
                        self.$field.remove(pos);
                        true
                    }
                    None => false,
                }
            }
        }
    };
}

composite_node!(Project, NodeKind::Project, phases, Phase);
composite_node!(Phase, NodeKind::Phase, steps, Step);
composite_node!(Step, NodeKind::Step, tasks, Task);
composite_node!(Task, NodeKind::Task, subtasks, SubTask);
composite_node!(StudyPlan, NodeKind::StudyPlan, subjects, Subject);
composite_node!(Subject, NodeKind::Subject, chapters, Chapter);

impl Node for Chapter {
    fn kind(&self) -> NodeKind {
        NodeKind::Chapter
    }

    fn header(&self) -> &NodeHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut NodeHeader {
        &mut self.header
    }

    fn children(&self) -> Vec<&dyn Node> {
        let lectures = self.lectures.iter().map(|c| c as &dyn Node);
        lectures.chain(self.topics.iter().map(|c| c as &dyn Node)).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        let lectures = self.lectures.iter_mut().map(|c| c as &mut dyn Node);
        lectures
            .chain(self.topics.iter_mut().map(|c| c as &mut dyn Node))
            .collect()
    }

    fn push_child(&mut self, header: NodeHeader, spec: &NewNode) -> Result<NodeKind> {
        if self.is_topical() {
            self.topics.push(Topic::spawn(header, spec));
            Ok(NodeKind::Topic)
        } else {
            self.lectures.push(Lecture::spawn(header, spec));
            Ok(NodeKind::Lecture)
        }
    }

    fn remove_child(&mut self, id: &str) -> bool {
        if let Some(pos) = self.lectures.iter().position(|c| c.header.id.as_str() == id) {
            self.lectures.remove(pos);
            return true;
        }
        match self.topics.iter().position(|c| c.header.id.as_str() == id) {
            Some(pos) => {
                self.topics.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Implements [`Node`] for a leaf whose progress lives in its header
macro_rules! numeric_leaf {
    ($ty:ty, $kind:expr) => {
        impl Node for $ty {
            fn kind(&self) -> NodeKind {
                $kind
            }

            fn header(&self) -> &NodeHeader {
                &self.header
            }

            fn header_mut(&mut self) -> &mut NodeHeader {
                &mut self.header
            }
        }
    };
}

numeric_leaf!(SubTask, NodeKind::SubTask);
numeric_leaf!(Topic, NodeKind::Topic);

impl Node for Lecture {
    fn kind(&self) -> NodeKind {
        NodeKind::Lecture
    }

    fn header(&self) -> &NodeHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut NodeHeader {
        &mut self.header
    }

    fn intrinsic_progress(&self) -> Option<f64> {
        Some(if self.completed { MAX_PROGRESS } else { MIN_PROGRESS })
    }

    fn set_leaf_progress(&mut self, progress: f64) {
        self.completed = progress >= MAX_PROGRESS;
        self.header.progress = if self.completed {
            MAX_PROGRESS
        } else {
            MIN_PROGRESS
        };
    }
}

// ── Document ────────────────────────────────────────────────────────

/// A whole project or study plan, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Document {
    Project(Project),
    Study(StudyPlan),
}

impl Document {
    pub fn root(&self) -> &dyn Node {
        match self {
            Document::Project(project) => project,
            Document::Study(plan) => plan,
        }
    }

    pub fn root_mut(&mut self) -> &mut dyn Node {
        match self {
            Document::Project(project) => project,
            Document::Study(plan) => plan,
        }
    }

    pub fn id(&self) -> &NodeId {
        self.root().id()
    }

    pub fn name(&self) -> &str {
        self.root().name()
    }

    pub fn progress(&self) -> f64 {
        self.root().header().progress
    }

    pub fn status(&self) -> Status {
        self.root().status()
    }

    /// Find any node in the document by id
    pub fn find(&self, id: &str) -> Option<&dyn Node> {
        find_node(self.root(), id)
    }

    /// Visit every node depth-first, parents before children
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&dyn Node, usize),
    {
        walk_node(self.root(), 0, &mut visit);
    }

    /// Total number of nodes including the root
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Find a node (leaf or composite) by id
pub fn find_node<'a>(node: &'a dyn Node, id: &str) -> Option<&'a dyn Node> {
    if node.id().as_str() == id {
        return Some(node);
    }
    node.children()
        .into_iter()
        .find_map(|child| find_node(child, id))
}

fn walk_node(node: &dyn Node, depth: usize, visit: &mut dyn FnMut(&dyn Node, usize)) {
    visit(node, depth);
    for child in node.children() {
        walk_node(child, depth + 1, visit);
    }
}
