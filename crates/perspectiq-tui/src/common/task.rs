//! Async task lifecycle.
//!
//! The reducer begins a task (assigning a fresh id and marking it active) in
//! the same step that emits the effect, so the loading state is visible to
//! the very next event. The runtime reports the result as `TaskCompleted`;
//! completions whose id is no longer active are dropped.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Profile,
    Login,
    History,
    DeleteSession,
    Personas,
    GenerateScenario,
    StartSession,
    Messages,
    SendMessage,
    EndSession,
    SummaryLoad,
    SummaryGenerate,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub profile: TaskState,
    pub login: TaskState,
    pub history: TaskState,
    pub delete_session: TaskState,
    pub personas: TaskState,
    pub generate_scenario: TaskState,
    pub start_session: TaskState,
    pub messages: TaskState,
    pub send_message: TaskState,
    pub end_session: TaskState,
    pub summary_load: TaskState,
    pub summary_generate: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Profile => &self.profile,
            TaskKind::Login => &self.login,
            TaskKind::History => &self.history,
            TaskKind::DeleteSession => &self.delete_session,
            TaskKind::Personas => &self.personas,
            TaskKind::GenerateScenario => &self.generate_scenario,
            TaskKind::StartSession => &self.start_session,
            TaskKind::Messages => &self.messages,
            TaskKind::SendMessage => &self.send_message,
            TaskKind::EndSession => &self.end_session,
            TaskKind::SummaryLoad => &self.summary_load,
            TaskKind::SummaryGenerate => &self.summary_generate,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Profile => &mut self.profile,
            TaskKind::Login => &mut self.login,
            TaskKind::History => &mut self.history,
            TaskKind::DeleteSession => &mut self.delete_session,
            TaskKind::Personas => &mut self.personas,
            TaskKind::GenerateScenario => &mut self.generate_scenario,
            TaskKind::StartSession => &mut self.start_session,
            TaskKind::Messages => &mut self.messages,
            TaskKind::SendMessage => &mut self.send_message,
            TaskKind::EndSession => &mut self.end_session,
            TaskKind::SummaryLoad => &mut self.summary_load,
            TaskKind::SummaryGenerate => &mut self.summary_generate,
        }
    }

    /// Marks `kind` as running under a fresh id and returns it.
    ///
    /// A task of the same kind that is still in flight becomes stale.
    pub fn begin(&mut self, seq: &mut TaskSeq, kind: TaskKind) -> TaskId {
        let id = seq.next_id();
        self.state_mut(kind).active = Some(id);
        id
    }

    pub fn is_any_running(&self) -> bool {
        [
            &self.profile,
            &self.login,
            &self.history,
            &self.delete_session,
            &self.personas,
            &self.generate_scenario,
            &self.start_session,
            &self.messages,
            &self.send_message,
            &self.end_session,
            &self.summary_load,
            &self.summary_generate,
        ]
        .iter()
        .any(|t| t.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_supersedes_previous_task() {
        let mut seq = TaskSeq::default();
        let mut tasks = Tasks::default();

        let first = tasks.begin(&mut seq, TaskKind::History);
        let second = tasks.begin(&mut seq, TaskKind::History);
        assert_ne!(first, second);

        assert!(!tasks.history.finish_if_active(first));
        assert!(tasks.history.is_running());
        assert!(tasks.history.finish_if_active(second));
        assert!(!tasks.is_any_running());
    }

    #[test]
    fn kinds_are_tracked_independently() {
        let mut seq = TaskSeq::default();
        let mut tasks = Tasks::default();
        tasks.begin(&mut seq, TaskKind::Login);
        assert!(tasks.state(TaskKind::Login).is_running());
        assert!(!tasks.state(TaskKind::Personas).is_running());
        tasks.state_mut(TaskKind::Login).clear();
        assert!(!tasks.is_any_running());
    }
}
