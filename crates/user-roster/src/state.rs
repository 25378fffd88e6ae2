//! In-memory application state: the ordered user list and the two modal selections.
//!
//! Nothing here validates input; callers check drafts before mutating.

use crate::model::{User, UserId, UserPatch};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    users: Vec<User>,
    /// Record shown in the edit modal.
    pub editing: Option<UserId>,
    /// Record awaiting delete confirmation.
    pub deleting: Option<UserId>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn favorite_count(&self) -> usize {
        self.users.iter().filter(|u| u.favorite).count()
    }

    /// Replaces the whole list, dropping later duplicates of an id.
    pub fn replace_all(&mut self, users: Vec<User>) {
        self.users.clear();
        for user in users {
            self.append(user);
        }
    }

    /// Appends a record. Returns `false` (and leaves the list alone) if the id is taken.
    pub fn append(&mut self, user: User) -> bool {
        if self.find_by_id(&user.id).is_some() {
            return false;
        }
        self.users.push(user);
        true
    }

    /// Removes the record with `id`, keeping the order of the rest.
    pub fn remove_by_id(&mut self, id: &UserId) -> Option<User> {
        let idx = self.users.iter().position(|u| &u.id == id)?;
        Some(self.users.remove(idx))
    }

    pub fn update_by_id(&mut self, id: &UserId, patch: UserPatch) -> Option<&User> {
        let user = self.users.iter_mut().find(|u| &u.id == id)?;
        patch.apply(user);
        Some(&*user)
    }

    /// Flips the favorite flag and returns the new value.
    pub fn toggle_favorite_by_id(&mut self, id: &UserId) -> Option<bool> {
        let user = self.users.iter_mut().find(|u| &u.id == id)?;
        user.favorite = !user.favorite;
        Some(user.favorite)
    }

    pub fn find_by_id(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u32, name: &str) -> User {
        User {
            id: UserId::from(id),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "5551234".to_string(),
            profile_image: crate::model::PLACEHOLDER_IMAGE.to_string(),
            favorite: false,
        }
    }

    fn names(state: &AppState) -> Vec<&str> {
        state.users().iter().map(|u| u.full_name.as_str()).collect()
    }

    #[test]
    fn test_remove_keeps_order_of_others() {
        let mut state = AppState::new();
        state.replace_all(vec![user(1, "Ann"), user(2, "Bob"), user(3, "Cid")]);

        let removed = state.remove_by_id(&UserId::from(2)).unwrap();
        assert_eq!(removed.full_name, "Bob");
        assert_eq!(names(&state), vec!["Ann", "Cid"]);
        assert!(state.remove_by_id(&UserId::from(2)).is_none());
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_ids_stay_unique() {
        let mut state = AppState::new();
        state.replace_all(vec![user(1, "Ann"), user(1, "Again")]);
        assert_eq!(names(&state), vec!["Ann"]);

        assert!(!state.append(user(1, "Dup")));
        assert!(state.append(user(2, "Bob")));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_toggle_and_count_favorites() {
        let mut state = AppState::new();
        state.replace_all(vec![user(1, "Ann"), user(2, "Bob")]);
        assert_eq!(state.favorite_count(), 0);

        assert_eq!(state.toggle_favorite_by_id(&UserId::from(2)), Some(true));
        assert_eq!(state.favorite_count(), 1);
        assert_eq!(state.toggle_favorite_by_id(&UserId::from(2)), Some(false));
        assert_eq!(state.favorite_count(), 0);
        assert_eq!(state.toggle_favorite_by_id(&UserId::from(9)), None);
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let mut state = AppState::new();
        state.replace_all(vec![user(1, "Ann")]);

        let patch = UserPatch {
            email: Some("ann@work.example.com".into()),
            ..UserPatch::default()
        };
        let updated = state.update_by_id(&UserId::from(1), patch).unwrap();
        assert_eq!(updated.email, "ann@work.example.com");
        assert_eq!(updated.full_name, "Ann");
        assert!(state.update_by_id(&UserId::from(5), UserPatch::default()).is_none());
    }
}
