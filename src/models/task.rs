use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Eisenhower matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    UrgentImportant,
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Self::UrgentImportant,
        Self::NotUrgentImportant,
        Self::UrgentNotImportant,
        Self::NotUrgentNotImportant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "urgent-important",
            Self::NotUrgentImportant => "not-urgent-important",
            Self::UrgentNotImportant => "urgent-not-important",
            Self::NotUrgentNotImportant => "not-urgent-not-important",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "Do first",
            Self::NotUrgentImportant => "Schedule",
            Self::UrgentNotImportant => "Delegate",
            Self::NotUrgentNotImportant => "Eliminate",
        }
    }
}

/// Workflow column on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BoardStatus {
    Backlog,
    InProgress,
    Done,
}

impl BoardStatus {
    pub const ALL: [BoardStatus; 3] = [Self::Backlog, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }
}

/// Where a task lives. The tag doubles as the task `type`, so a task can
/// never carry both a quadrant and a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Placement {
    #[serde(alias = "eisenhower")]
    Matrix { quadrant: Quadrant },
    #[serde(alias = "kanban")]
    Board { status: BoardStatus },
}

impl Placement {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Matrix { .. } => TaskKind::Matrix,
            Self::Board { .. } => TaskKind::Board,
        }
    }

    pub fn quadrant(&self) -> Option<Quadrant> {
        match self {
            Self::Matrix { quadrant } => Some(*quadrant),
            Self::Board { .. } => None,
        }
    }

    pub fn status(&self) -> Option<BoardStatus> {
        match self {
            Self::Board { status } => Some(*status),
            Self::Matrix { .. } => None,
        }
    }

    /// Rebuild a placement from the three stored columns.
    pub fn from_parts(
        kind: &str,
        quadrant: Option<&str>,
        status: Option<&str>,
    ) -> Option<Self> {
        match (TaskKind::from_str(kind)?, quadrant, status) {
            (TaskKind::Matrix, Some(q), None) => Some(Self::Matrix {
                quadrant: Quadrant::from_str(q)?,
            }),
            (TaskKind::Board, None, Some(s)) => Some(Self::Board {
                status: BoardStatus::from_str(s)?,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Matrix,
    Board,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matrix => "matrix",
            Self::Board => "board",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "matrix" => Some(Self::Matrix),
            "board" => Some(Self::Board),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub placement: Placement,
}

impl Task {
    pub fn new(
        title: &str,
        description: Option<&str>,
        placement: Placement,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            title: title.trim().to_string(),
            description: normalize_description(description),
            completed: false,
            created_at: now,
            placement,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.placement.kind()
    }
}

pub fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matrix_task_serializes_type_and_quadrant_only() {
        let created = "2026-10-01T09:00:00Z".parse().unwrap();
        let task = Task::new(
            "  Write report ",
            Some("  "),
            Placement::Matrix {
                quadrant: Quadrant::UrgentImportant,
            },
            created,
        );
        let v = serde_json::to_value(&task).unwrap();
        assert_eq!(v["title"], "Write report");
        assert_eq!(v["type"], "matrix");
        assert_eq!(v["quadrant"], "urgent-important");
        assert!(v.get("status").is_none());
        assert!(v.get("description").is_none());
        assert_eq!(v["completed"], false);
        assert_eq!(v["createdAt"], "2026-10-01T09:00:00Z");
    }

    #[test]
    fn legacy_type_names_are_accepted() {
        let v = json!({
            "id": "1700000000000",
            "title": "Old board task",
            "description": "",
            "completed": true,
            "createdAt": "2023-11-14T22:13:20.000Z",
            "type": "kanban",
            "status": "in-progress"
        });
        let task: Task = serde_json::from_value(v).unwrap();
        assert_eq!(
            task.placement,
            Placement::Board {
                status: BoardStatus::InProgress
            }
        );
        assert!(task.completed);
    }

    #[test]
    fn placement_without_matching_field_is_rejected() {
        let v = json!({
            "id": "x",
            "title": "Broken",
            "createdAt": "2026-10-01T09:00:00Z",
            "type": "matrix",
            "status": "done"
        });
        assert!(serde_json::from_value::<Task>(v).is_err());
    }

    #[test]
    fn from_parts_enforces_exactly_one_field() {
        assert!(Placement::from_parts("matrix", Some("urgent-important"), None).is_some());
        assert!(Placement::from_parts("board", None, Some("backlog")).is_some());
        assert!(Placement::from_parts("matrix", Some("urgent-important"), Some("done")).is_none());
        assert!(Placement::from_parts("board", None, None).is_none());
        assert!(Placement::from_parts("list", None, Some("done")).is_none());
    }
}
