/// Opaque, unique identifier of a task within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
}

/// In-memory, insertion ordered to-do list. Tasks are never removed.
#[derive(Debug, Default, Clone)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from seed texts, skipping blank entries.
    pub fn with_tasks<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for text in texts {
            list.add(text.as_ref());
        }
        list
    }

    /// Append a task. Blank input is ignored and yields `None`.
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            done: false,
        });
        log::debug!("task added: {text}");
        Some(id)
    }

    /// Flip the done flag. Returns false when no task has this id.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.done = !task.done;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_ignored() {
        let mut list = TaskList::new();
        assert_eq!(list.add("  "), None);
        assert_eq!(list.add(""), None);
        assert_eq!(list.add("\t\n"), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_appends_one_open_task() {
        let mut list = TaskList::new();
        let id = list.add("Write spec").unwrap();
        assert_eq!(list.len(), 1);
        let task = list.get(0).unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.text, "Write spec");
        assert!(!task.done);
    }

    #[test]
    fn test_add_trims_and_keeps_order() {
        let mut list = TaskList::new();
        list.add("  first ");
        list.add("second");
        let texts: Vec<&str> = list.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut list = TaskList::new();
        let a = list.add("a").unwrap();
        let b = list.add("a").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_toggle_flips_only_matching_task() {
        let mut list = TaskList::new();
        list.add("a");
        let b = list.add("b").unwrap();
        assert!(list.toggle(b));
        assert!(!list.get(0).unwrap().done);
        assert!(list.get(1).unwrap().done);
        assert_eq!(list.done_count(), 1);
        assert!(list.toggle(b));
        assert!(!list.get(1).unwrap().done);
    }

    #[test]
    fn test_toggle_missing_is_noop() {
        let mut list = TaskList::new();
        list.add("a");
        let other = TaskList::with_tasks(["x", "y", "z"]);
        let foreign = other.get(2).unwrap().id;
        assert!(!list.toggle(foreign));
        assert!(!list.get(0).unwrap().done);
    }

    #[test]
    fn test_with_tasks_skips_blank() {
        let list = TaskList::with_tasks(["Read article", " ", "Write report"]);
        assert_eq!(list.len(), 2);
    }
}
