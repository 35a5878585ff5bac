//! PollTask: перезапускаемая per-frame задача с cancellation token
//!
//! Замена корутины: задача "живёт" пока у неё есть token.
//! Драйвер (система `poll_part_interactions`) шагает её раз в frame.
//!
//! Инварианты:
//! - `start()` синхронно отменяет предыдущий запуск (нет окна с двумя поллерами)
//! - `cancel()` на остановленной/не запущенной задаче: no-op
//! - каждый запуск получает новый token (старый token больше не "жив")

/// Token конкретного запуска задачи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskToken(u64);

#[derive(Debug, Clone, Default)]
pub struct PollTask {
    token: Option<TaskToken>,
    generation: u64,
}

impl PollTask {
    /// Запустить задачу заново (предыдущий запуск отменяется)
    pub fn start(&mut self) -> TaskToken {
        self.cancel();
        self.generation += 1;
        let token = TaskToken(self.generation);
        self.token = Some(token);
        token
    }

    pub fn cancel(&mut self) {
        self.token = None;
    }

    pub fn is_running(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<TaskToken> {
        self.token
    }

    /// true если `token`: текущий живой запуск
    pub fn is_current(&self, token: TaskToken) -> bool {
        self.token == Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_never_started_is_noop() {
        let mut task = PollTask::default();
        task.cancel();
        task.cancel();
        assert!(!task.is_running());
        assert_eq!(task.token(), None);
    }

    #[test]
    fn test_restart_invalidates_previous_token() {
        let mut task = PollTask::default();
        let first = task.start();
        let second = task.start();

        assert_ne!(first, second);
        assert!(!task.is_current(first));
        assert!(task.is_current(second));
    }

    #[test]
    fn test_cancel_clears_token() {
        let mut task = PollTask::default();
        let token = task.start();
        task.cancel();

        assert!(!task.is_running());
        assert!(!task.is_current(token));
    }
}
