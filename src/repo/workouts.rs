use crate::error::{Error, Result};
use crate::model::{NewWorkout, Workout};

use super::Store;

/// Repository for monthly workout plans
pub struct WorkoutsRepo;

impl WorkoutsRepo {
    #[tracing::instrument(name = "Fetch all workouts", skip(store))]
    pub fn fetch_all(store: &Store) -> Vec<Workout> {
        store.read(|state| state.workouts.clone())
    }

    #[tracing::instrument(name = "Fetch workouts for a member", skip(store))]
    pub fn fetch_for_member(store: &Store, user_id: &str) -> Vec<Workout> {
        store.read(|state| {
            state
                .workouts
                .iter()
                .filter(|w| w.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    #[tracing::instrument(name = "Insert workout", skip(store, new_workout))]
    pub fn insert(store: &Store, user_id: &str, new_workout: NewWorkout) -> Result<Workout> {
        store.write(|state| {
            if !state.has_member(user_id) {
                return Err(Error::InvalidMemberReference(user_id.to_string()));
            }
            let workout = Workout::new(state.take_workout_id(), user_id.to_string(), new_workout);
            state.workouts.push(workout.clone());
            Ok(workout)
        })
    }
}
