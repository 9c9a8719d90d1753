use crate::error::StorageError;
use crate::models::Exercise;
use crate::user_models::User;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

const USERS_FILE: &str = "users.json";
const EXERCISES_FILE: &str = "exercises.json";

/// Both collections live in one store so "create exercise, then link it to its
/// user" happens under the write locks as a single step, with no window where
/// an exercise exists un-referenced by its owner.
///
/// Lock order is always users before exercises.
pub struct TrackerStorage {
    users_path: PathBuf,
    exercises_path: PathBuf,
    users: RwLock<Vec<User>>,
    exercises: RwLock<Vec<Exercise>>,
}

impl TrackerStorage {
    pub fn new() -> Result<Self, StorageError> {
        Self::with_data_dir(".")
    }

    pub fn with_data_dir(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let users_path = dir.as_ref().join(USERS_FILE);
        let exercises_path = dir.as_ref().join(EXERCISES_FILE);

        let users = load_collection(&users_path)?;
        let exercises = load_collection(&exercises_path)?;

        Ok(Self {
            users_path,
            exercises_path,
            users: RwLock::new(users),
            exercises: RwLock::new(exercises),
        })
    }

    pub async fn create_user(&self, username: String) -> Result<User, StorageError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == username) {
            return Err(StorageError::DuplicateUsername);
        }

        let user = User::new(username);
        users.push(user.clone());
        save_collection(&self.users_path, &users)?;
        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.username == username).cloned()
    }

    /// Creates an exercise owned by `username` and appends it to that user's
    /// log in one step. The stored `user_id` is the owner's username as
    /// persisted, not the raw request input.
    pub async fn add_exercise(
        &self,
        username: &str,
        description: String,
        duration: i64,
        date: NaiveDate,
    ) -> Result<Exercise, StorageError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or(StorageError::UserNotFound)?;

        let mut exercises = self.exercises.write().await;
        let exercise = Exercise::new(user.username.clone(), description, duration, date);
        exercises.push(exercise.clone());

        let stored = exercises
            .iter()
            .rfind(|e| e.id == exercise.id)
            .cloned()
            .ok_or(StorageError::ExerciseNotPersisted)?;

        save_collection(&self.exercises_path, &exercises)?;

        user.exercises.push(stored.id.clone());
        save_collection(&self.users_path, &users)?;

        Ok(stored)
    }

    /// A user's exercises in creation order, optionally windowed by date
    /// (`from` inclusive, `to` exclusive) and truncated to `limit` entries.
    pub async fn exercise_log(
        &self,
        username: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: Option<usize>,
    ) -> Result<Vec<Exercise>, StorageError> {
        let users = self.users.read().await;
        let user = users
            .iter()
            .find(|u| u.username == username)
            .ok_or(StorageError::UserNotFound)?;

        let exercises = self.exercises.read().await;
        let mut log: Vec<Exercise> = user
            .exercises
            .iter()
            .filter_map(|id| exercises.iter().find(|e| &e.id == id))
            .filter(|e| from.map_or(true, |f| e.date >= f))
            .filter(|e| to.map_or(true, |t| e.date < t))
            .cloned()
            .collect();

        if let Some(limit) = limit {
            log.truncate(limit);
        }

        Ok(log)
    }
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    if path.exists() {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    } else {
        Ok(Vec::new())
    }
}

fn save_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(items)?;
    fs::write(path, json)?;
    Ok(())
}
