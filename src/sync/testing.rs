//! In-memory fake task manager for engine tests

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::client::TaskManager;
use crate::error::{Result, SyncError};
use crate::types::{NewProject, NewTask, RemoteProject, RemoteTask, TaskUpdate};

#[derive(Default)]
struct FakeState {
    projects: Vec<RemoteProject>,
    tasks: Vec<RemoteTask>,
    next_id: u64,
    project_creates: u32,
    task_creates: u32,
    fail_project_names: HashSet<String>,
    fail_task_contents: HashSet<String>,
    fail_task_lists: HashSet<String>,
    fail_project_list: bool,
}

/// Fake [`TaskManager`] holding projects and tasks in memory.
///
/// Mirrors the remote listing contract: `list_tasks` only returns active
/// tasks, so completion of known tasks is observable only as absence.
pub(crate) struct FakeTaskManager {
    state: Mutex<FakeState>,
    configured: bool,
}

impl FakeTaskManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            configured: true,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            configured: false,
        }
    }

    /// Seed a project directly, bypassing creation counters
    pub fn seed_project(&self, name: &str, parent_id: Option<&str>) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("rp-{}", state.next_id);
        state.projects.push(RemoteProject {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.map(String::from),
            child_order: 0,
            color: String::new(),
            is_archived: false,
            is_deleted: false,
        });
        id
    }

    /// Seed a task directly, bypassing creation counters
    pub fn seed_task(&self, project_id: &str, content: &str, parent_id: Option<&str>) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("rt-{}", state.next_id);
        let now = Utc::now();
        state.tasks.push(RemoteTask {
            id: id.clone(),
            content: content.to_string(),
            description: String::new(),
            project_id: project_id.to_string(),
            parent_id: parent_id.map(String::from),
            child_order: 0,
            is_completed: false,
            labels: Vec::new(),
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Make `create_project` fail for the given name
    pub fn fail_creating_project(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_project_names
            .insert(name.to_string());
    }

    /// Make `create_task` fail for the given content
    pub fn fail_creating_task(&self, content: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_task_contents
            .insert(content.to_string());
    }

    /// Make `list_tasks` fail for the given project
    pub fn fail_listing_tasks(&self, project_id: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_task_lists
            .insert(project_id.to_string());
    }

    /// Make every `list_projects` call fail
    pub fn fail_listing_projects(&self) {
        self.state.lock().unwrap().fail_project_list = true;
    }

    pub fn set_task_title(&self, task_id: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(task) = state.tasks.iter_mut().find(|t| t.id == task_id) {
            task.content = content.to_string();
        }
    }

    pub fn project_creates(&self) -> u32 {
        self.state.lock().unwrap().project_creates
    }

    pub fn task_creates(&self) -> u32 {
        self.state.lock().unwrap().task_creates
    }

    pub fn project_count(&self) -> usize {
        self.state.lock().unwrap().projects.len()
    }

    pub fn find_task(&self, task_id: &str) -> Option<RemoteTask> {
        self.state
            .lock()
            .unwrap()
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
    }

    pub fn find_project_named(&self, name: &str) -> Option<RemoteProject> {
        self.state
            .lock()
            .unwrap()
            .projects
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    pub fn tasks_in_project(&self, project_id: &str) -> Vec<RemoteTask> {
        self.state
            .lock()
            .unwrap()
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TaskManager for FakeTaskManager {
    async fn list_projects(&self) -> Result<Vec<RemoteProject>> {
        let state = self.state.lock().unwrap();
        if state.fail_project_list {
            return Err(SyncError::Server {
                status: 500,
                message: "injected failure listing projects".to_string(),
            });
        }
        Ok(state.projects.clone())
    }

    async fn create_project(&self, project: NewProject) -> Result<RemoteProject> {
        let mut state = self.state.lock().unwrap();
        if state.fail_project_names.contains(&project.name) {
            return Err(SyncError::Server {
                status: 500,
                message: format!("injected failure for {}", project.name),
            });
        }
        state.next_id += 1;
        state.project_creates += 1;
        let created = RemoteProject {
            id: format!("rp-{}", state.next_id),
            name: project.name,
            parent_id: project.parent_id,
            child_order: 0,
            color: project.color.unwrap_or_default(),
            is_archived: false,
            is_deleted: false,
        };
        state.projects.push(created.clone());
        Ok(created)
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<RemoteTask>> {
        let state = self.state.lock().unwrap();
        if state.fail_task_lists.contains(project_id) {
            return Err(SyncError::Server {
                status: 500,
                message: format!("injected failure listing tasks of {project_id}"),
            });
        }
        // Active-only, like the real API
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id && !t.is_completed)
            .cloned()
            .collect())
    }

    async fn create_task(&self, task: NewTask) -> Result<RemoteTask> {
        let mut state = self.state.lock().unwrap();
        if state.fail_task_contents.contains(&task.content) {
            return Err(SyncError::Server {
                status: 500,
                message: format!("injected failure for {}", task.content),
            });
        }
        state.next_id += 1;
        state.task_creates += 1;
        let now = Utc::now();
        let created = RemoteTask {
            id: format!("rt-{}", state.next_id),
            content: task.content,
            description: task.description.unwrap_or_default(),
            project_id: task.project_id,
            parent_id: task.parent_id,
            child_order: 0,
            is_completed: false,
            labels: task.labels,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<RemoteTask> {
        let mut state = self.state.lock().unwrap();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(SyncError::Server {
                status: 404,
                message: format!("no task {task_id}"),
            })?;
        if let Some(content) = update.content {
            task.content = content;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(labels) = update.labels {
            task.labels = labels;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn complete_task(&self, task_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.is_completed = true;
                Ok(())
            }
            None => Err(SyncError::Server {
                status: 404,
                message: format!("no task {task_id}"),
            }),
        }
    }

    async fn reopen_task(&self, task_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.is_completed = false;
                Ok(())
            }
            None => Err(SyncError::Server {
                status: 404,
                message: format!("no task {task_id}"),
            }),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// Shared builders for engine tests
pub(crate) mod fixtures {
    use chrono::Utc;

    use crate::model::{Goal, GoalStatus, Sphere, Subtask};

    pub fn sphere(id: &str, name: &str) -> Sphere {
        Sphere {
            id: id.into(),
            user_id: "u1".into(),
            name: name.into(),
            description: None,
            color: "#0ea5e9".into(),
            icon: "🎯".into(),
            order: 0,
            created_at: Utc::now(),
            remote_id: None,
        }
    }

    pub fn goal(id: &str, sphere_id: &str, title: &str) -> Goal {
        Goal {
            id: id.into(),
            user_id: "u1".into(),
            sphere_id: sphere_id.into(),
            title: title.into(),
            description: None,
            status: GoalStatus::Active,
            progress: 0,
            subtasks: Vec::new(),
            strict_order: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            remote_id: None,
        }
    }

    pub fn subtask(id: &str, title: &str, order: u32, remote_id: Option<&str>) -> Subtask {
        Subtask {
            id: id.into(),
            title: title.into(),
            completed: false,
            order,
            remote_id: remote_id.map(String::from),
        }
    }
}
