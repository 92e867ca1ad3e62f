use crate::error::{Error, Result};
use crate::model::{Member, MemberChanges, NewMember};

use super::Store;

const ENTITY: &str = "User";

/// Repository for the member collection
pub struct MembersRepo;

impl MembersRepo {
    #[tracing::instrument(name = "Fetch all members", skip(store))]
    pub fn fetch_all(store: &Store) -> Vec<Member> {
        store.read(|state| state.users.clone())
    }

    #[tracing::instrument(name = "Fetch a member by id", skip(store))]
    pub fn fetch_by_id(store: &Store, id: &str) -> Result<Member> {
        store
            .read(|state| state.users.iter().find(|m| m.id == id).cloned())
            .ok_or(Error::NotFound(ENTITY))
    }

    pub fn exists(store: &Store, id: &str) -> bool {
        store.read(|state| state.has_member(id))
    }

    #[tracing::instrument(name = "Insert member", skip(store))]
    pub fn insert(store: &Store, new_member: NewMember) -> Result<Member> {
        store.write(|state| {
            let member = Member::new(state.take_user_id(), new_member);
            state.users.push(member.clone());
            Ok(member)
        })
    }

    #[tracing::instrument(name = "Update member", skip(store))]
    pub fn update(store: &Store, id: &str, changes: MemberChanges) -> Result<Member> {
        store.write(|state| {
            let member = state
                .users
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or(Error::NotFound(ENTITY))?;
            member.apply(changes);
            Ok(member.clone())
        })
    }

    /// Hard delete. Subscriptions and workouts pointing at the member are kept.
    #[tracing::instrument(name = "Delete member", skip(store))]
    pub fn delete(store: &Store, id: &str) -> Result<()> {
        store.write(|state| {
            let idx = state
                .users
                .iter()
                .position(|m| m.id == id)
                .ok_or(Error::NotFound(ENTITY))?;
            state.users.remove(idx);
            Ok(())
        })
    }
}
