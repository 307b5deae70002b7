use std::sync::Arc;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

use crate::directory::{
    Audience, CourseForm, Directory, DirectoryError, NewDepartment, NewUser, ProfileUpdate,
};
use crate::engine::{Engine, EngineError};
use crate::model::*;

/// One request, as a JSON object tagged by `op`.
///
/// `actor` is the id of a registered user; the runner resolves the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    RegisterUser {
        user: NewUser,
    },
    UpdateProfile {
        actor: Ulid,
        profile: ProfileUpdate,
    },
    SearchUsers {
        audience: Audience,
        #[serde(default)]
        q: String,
    },
    CreateInterval {
        actor: Ulid,
        day: String,
        start: NaiveTime,
        end: NaiveTime,
        capacity: u32,
    },
    UpdateInterval {
        actor: Ulid,
        id: Ulid,
        day: String,
        start: NaiveTime,
        end: NaiveTime,
        capacity: u32,
    },
    DeleteInterval {
        actor: Ulid,
        id: Ulid,
    },
    Reserve {
        actor: Ulid,
        id: Ulid,
    },
    Release {
        actor: Ulid,
        id: Ulid,
    },
    GetInterval {
        id: Ulid,
    },
    ListIntervals {
        teacher: Ulid,
    },
    ListReservations {
        student: Ulid,
    },
    CreateDepartment {
        actor: Ulid,
        department: NewDepartment,
    },
    ListDepartments,
    GetDepartment {
        number: i64,
    },
    CreateCourse {
        actor: Ulid,
        course: CourseForm,
    },
    UpdateCourse {
        actor: Ulid,
        id: Ulid,
        course: CourseForm,
    },
    ListCourses {
        #[serde(default = "default_course_limit")]
        limit: usize,
    },
    Enroll {
        actor: Ulid,
        course: Ulid,
    },
    DropCourse {
        actor: Ulid,
        course: Ulid,
    },
}

fn default_course_limit() -> usize {
    5
}

/// Failure of a single command, from whichever side handled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Engine(EngineError),
    Directory(DirectoryError),
}

impl CommandError {
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Engine(e) => e.kind(),
            CommandError::Directory(e) => e.kind(),
        }
    }
}

impl From<EngineError> for CommandError {
    fn from(e: EngineError) -> Self {
        CommandError::Engine(e)
    }
}

impl From<DirectoryError> for CommandError {
    fn from(e: DirectoryError) -> Self {
        CommandError::Directory(e)
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Engine(e) => e.fmt(f),
            CommandError::Directory(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for CommandError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reply {
    Ok(Value),
    Error { kind: String, message: String },
}

impl Reply {
    fn parse_error(message: impl std::fmt::Display) -> Self {
        Reply::Error {
            kind: "parse".into(),
            message: message.to_string(),
        }
    }

    fn from_result(result: Result<Value, CommandError>) -> Self {
        match result {
            Ok(v) => Reply::Ok(v),
            Err(e) => Reply::Error {
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
        }
    }
}

fn json(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Executes commands against an engine and a directory.
pub struct CommandRunner {
    pub engine: Arc<Engine>,
    pub directory: Arc<Directory>,
}

impl CommandRunner {
    pub fn new(engine: Arc<Engine>, directory: Arc<Directory>) -> Self {
        Self { engine, directory }
    }

    fn actor(&self, id: Ulid) -> Result<Actor, DirectoryError> {
        self.directory
            .get_user(&id)
            .map(|u| u.actor())
            .ok_or(DirectoryError::NotFound(id))
    }

    /// Parse one line of JSON and execute it. Never fails; errors become replies.
    pub async fn handle_line(&self, line: &str) -> Reply {
        match serde_json::from_str::<Command>(line) {
            Ok(cmd) => Reply::from_result(self.execute(cmd).await),
            Err(e) => Reply::parse_error(e),
        }
    }

    /// Like [`handle_line`](Self::handle_line) for raw input; a line that is
    /// not UTF-8 gets a parse error reply. `None` for blank lines.
    pub async fn handle_bytes(&self, raw: &[u8]) -> Option<Reply> {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(e) => return Some(Reply::parse_error(format!("line is not valid UTF-8: {e}"))),
        };
        if line.is_empty() {
            return None;
        }
        Some(self.handle_line(line).await)
    }

    pub async fn execute(&self, cmd: Command) -> Result<Value, CommandError> {
        let engine = &self.engine;
        let dir = &self.directory;
        match cmd {
            Command::RegisterUser { user } => Ok(json(dir.register_user(user)?)),
            Command::UpdateProfile { actor, profile } => {
                let a = self.actor(actor)?;
                Ok(json(dir.update_profile(a, actor, profile)?))
            }
            Command::SearchUsers { audience, q } => Ok(json(dir.search(audience, &q))),
            Command::CreateInterval { actor, day, start, end, capacity } => {
                let draft = IntervalDraft { day, start, end, capacity };
                let id = engine.create_interval(self.actor(actor)?, draft).await?;
                Ok(json(engine.get_interval(&id).await))
            }
            Command::UpdateInterval { actor, id, day, start, end, capacity } => {
                let draft = IntervalDraft { day, start, end, capacity };
                engine.update_interval(self.actor(actor)?, id, draft).await?;
                Ok(json(engine.get_interval(&id).await))
            }
            Command::DeleteInterval { actor, id } => {
                let released = engine.delete_interval(self.actor(actor)?, id).await?;
                Ok(json(serde_json::json!({ "released": released })))
            }
            Command::Reserve { actor, id } => {
                engine.reserve(self.actor(actor)?, id).await?;
                Ok(json(engine.get_interval(&id).await))
            }
            Command::Release { actor, id } => {
                engine.release(self.actor(actor)?, id).await?;
                Ok(json(engine.get_interval(&id).await))
            }
            Command::GetInterval { id } => Ok(engine
                .get_interval(&id)
                .await
                .map(json)
                .ok_or(EngineError::NotFound(id))?),
            Command::ListIntervals { teacher } => Ok(json(engine.teacher_intervals(&teacher).await)),
            Command::ListReservations { student } => {
                Ok(json(engine.student_reservations(&student).await))
            }
            Command::CreateDepartment { actor, department } => {
                Ok(json(dir.create_department(self.actor(actor)?, department)?))
            }
            Command::ListDepartments => Ok(json(dir.list_departments())),
            Command::GetDepartment { number } => Ok(json(dir.find_department(number)?)),
            Command::CreateCourse { actor, course } => {
                Ok(json(dir.create_course(self.actor(actor)?, course)?))
            }
            Command::UpdateCourse { actor, id, course } => {
                Ok(json(dir.update_course(self.actor(actor)?, id, course)?))
            }
            Command::ListCourses { limit } => Ok(json(dir.courses(limit))),
            Command::Enroll { actor, course } => {
                dir.enroll(self.actor(actor)?, course)?;
                Ok(Value::Null)
            }
            Command::DropCourse { actor, course } => {
                dir.drop_course(self.actor(actor)?, course)?;
                Ok(Value::Null)
            }
        }
    }
}
