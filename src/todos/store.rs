//! In-memory todo storage.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    /// Insertion order, for stable listing.
    #[serde(skip)]
    seq: u64,
}

/// Client-supplied todo fields.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Thread-safe todo store, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    todos: Arc<DashMap<Uuid, Todo>>,
    next_seq: Arc<AtomicU64>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, input: TodoInput) -> Todo {
        let todo = Todo {
            id: Uuid::new_v4(),
            title: input.title,
            completed: input.completed,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.todos.insert(todo.id, todo.clone());
        todo
    }

    pub fn get(&self, id: &Uuid) -> Option<Todo> {
        self.todos.get(id).map(|t| t.value().clone())
    }

    /// All todos in insertion order.
    pub fn list(&self) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self.todos.iter().map(|t| t.value().clone()).collect();
        todos.sort_by_key(|t| t.seq);
        todos
    }

    /// Replace title and state of an existing todo.
    pub fn replace(&self, id: &Uuid, input: TodoInput) -> Option<Todo> {
        let mut entry = self.todos.get_mut(id)?;
        entry.title = input.title;
        entry.completed = input.completed;
        Some(entry.value().clone())
    }

    pub fn remove(&self, id: &Uuid) -> Option<Todo> {
        self.todos.remove(id).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}
