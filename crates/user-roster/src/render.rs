//! # Renderer
//!
//! Pure projection of the application state into something a front end can draw.
//! [`render`] builds the list view (counters, cards, empty state); [`Screen`] adds the
//! forms and modals around it. Both implement `Display` for the terminal front end.
//!
//! Hover hints live on each [`ActionView`] and are rebuilt on every pass, so a front end
//! never holds on to hints from a previous render.

use crate::model::{User, UserDraft, UserId};
use crate::state::AppState;
use std::fmt::{self, Display};

pub const EMPTY_TITLE: &str = "No users registered";
pub const EMPTY_HINT: &str = "Use the form to add your first user";

/// The three affordances on every card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ToggleFavorite,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub kind: ActionKind,
    pub user_id: UserId,
    /// Hover hint shown next to the control.
    pub hint: String,
    /// Highlighted state; only the favorite toggle uses it.
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: UserId,
    pub image: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub favorite: bool,
    pub actions: Vec<ActionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Count of the cards shown, e.g. `"3 users"`.
    pub total_label: String,
    /// Count of favorites across the whole list, filtered or not.
    pub favorite_label: String,
    pub cards: Vec<CardView>,
    /// Present only when there are no cards.
    pub empty: Option<EmptyState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: &'static str,
    pub hint: &'static str,
}

fn card(user: &User) -> CardView {
    let favorite_hint = if user.favorite {
        "Remove from favorites"
    } else {
        "Mark as favorite"
    };
    let action = |kind, hint: &str, active| ActionView {
        kind,
        user_id: user.id.clone(),
        hint: hint.to_string(),
        active,
    };
    CardView {
        id: user.id.clone(),
        image: user.profile_image.clone(),
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        favorite: user.favorite,
        actions: vec![
            action(ActionKind::ToggleFavorite, favorite_hint, user.favorite),
            action(ActionKind::Edit, "Edit user", false),
            action(ActionKind::Delete, "Delete user", false),
        ],
    }
}

/// Projects `visible` into cards; the favorite count is always taken from `all`.
pub fn render(visible: &[User], all: &[User]) -> ListView {
    let favorites = all.iter().filter(|u| u.favorite).count();
    let cards: Vec<CardView> = visible.iter().map(card).collect();
    let empty = cards.is_empty().then_some(EmptyState {
        title: EMPTY_TITLE,
        hint: EMPTY_HINT,
    });
    ListView {
        total_label: format!("{} users", visible.len()),
        favorite_label: favorites.to_string(),
        cards,
        empty,
    }
}

/// Case-insensitive substring match on name or email. A blank query keeps everyone.
pub fn filter_users(users: &[User], query: &str) -> Vec<User> {
    let needle = query.trim().to_lowercase();
    users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.full_name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Renders the state, through `filter` when one is set.
pub fn render_state(state: &AppState, filter: Option<&str>) -> ListView {
    match filter {
        Some(query) => render(&filter_users(state.users(), query), state.users()),
        None => render(state.users(), state.users()),
    }
}

/// The edit modal: which record, and the form as currently filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModal {
    pub id: UserId,
    pub form: UserDraft,
}

/// The delete confirmation modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteModal {
    pub id: UserId,
    pub full_name: String,
}

/// Everything on screen after a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub list: ListView,
    pub create_form: UserDraft,
    pub edit_modal: Option<EditModal>,
    pub delete_modal: Option<DeleteModal>,
    pub filter: Option<String>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            list: render(&[], &[]),
            create_form: UserDraft::default(),
            edit_modal: None,
            delete_modal: None,
            filter: None,
        }
    }
}

impl Display for CardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = if self.favorite { '★' } else { '☆' };
        writeln!(f, "{star} [{}] {}", self.id, self.full_name)?;
        writeln!(f, "    {} | {}", self.email, self.phone)?;
        writeln!(f, "    {}", self.image)?;
        let hints: Vec<String> = self
            .actions
            .iter()
            .map(|a| {
                let verb = match a.kind {
                    ActionKind::ToggleFavorite => "fav",
                    ActionKind::Edit => "edit",
                    ActionKind::Delete => "delete",
                };
                format!("{verb} {}: {}", a.user_id, a.hint)
            })
            .collect();
        write!(f, "    {}", hints.join(" · "))
    }
}

impl Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} | ★ {}", self.total_label, self.favorite_label)?;
        if let Some(empty) = &self.empty {
            writeln!(f)?;
            writeln!(f, "  {}", empty.title)?;
            return write!(f, "  {}", empty.hint);
        }
        for card in &self.cards {
            writeln!(f)?;
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

fn write_form(f: &mut fmt::Formatter<'_>, form: &UserDraft) -> fmt::Result {
    writeln!(f, "  name:  {}", form.full_name)?;
    writeln!(f, "  email: {}", form.email)?;
    writeln!(f, "  phone: {}", form.phone)?;
    write!(f, "  image: {}", form.profile_image)
}

impl Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(query) = &self.filter {
            writeln!(f, "filter: {query:?}")?;
        }
        writeln!(f, "{}", self.list)?;
        writeln!(f)?;
        writeln!(f, "New user form")?;
        write_form(f, &self.create_form)?;
        if let Some(modal) = &self.edit_modal {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "Editing user {}", modal.id)?;
            write_form(f, &modal.form)?;
        }
        if let Some(modal) = &self.delete_modal {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "Delete {}? (confirm / cancel)", modal.full_name)?;
        }
        Ok(())
    }
}
