use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Image shown for users that never picked one.
pub const PLACEHOLDER_IMAGE: &str =
    "https://cdn.pixabay.com/photo/2023/02/18/11/00/icon-7797704_640.png";

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

/// Server-assigned identifier for users.
///
/// json-server hands out numeric ids in older releases and string ids in newer ones.
/// Both are accepted; two ids are equal when their textual forms are equal, and the
/// original JSON shape is kept when the id is written back.
#[derive(Debug, Clone)]
pub struct UserId {
    text: String,
    number: Option<u64>,
}

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self {
            text: id.to_string(),
            number: Some(u64::from(id)),
        }
    }
}

impl FromStr for UserId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "007" stays textual so it round-trips unchanged
        let number = s.parse::<u64>().ok().filter(|n| n.to_string() == s);
        Ok(Self {
            text: s.to_string(),
            number,
        })
    }
}

impl PartialEq for UserId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for UserId {}

impl Hash for UserId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.number {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.text),
        }
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self {
                text: n.to_string(),
                number: Some(n),
            },
            RawId::Text(text) => Self { text, number: None },
        })
    }
}

/// A user profile as stored by the REST mock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default = "placeholder_image")]
    pub profile_image: String,
    #[serde(default)]
    pub favorite: bool,
}

impl User {
    /// Builds a stored record from a server-minted id and a payload.
    pub fn from_payload(id: UserId, payload: UserCreate) -> Self {
        Self {
            id,
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            profile_image: payload.profile_image,
            favorite: payload.favorite,
        }
    }

    /// The editable fields of this record, as a form would show them.
    pub fn draft(&self) -> UserDraft {
        UserDraft {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            profile_image: self.profile_image.clone(),
        }
    }

    /// Copy of this record with name, email and phone taken from `draft`.
    ///
    /// Image and favorite flag are left alone: the edit form only changes the three
    /// validated fields.
    pub fn merged_with(&self, draft: &UserDraft) -> Self {
        Self {
            full_name: draft.full_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            ..self.clone()
        }
    }

    /// Copy of this record with the favorite flag flipped.
    pub fn with_favorite_toggled(&self) -> Self {
        Self {
            favorite: !self.favorite,
            ..self.clone()
        }
    }
}

/// Form data for the creation and edit forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub profile_image: String,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            profile_image: placeholder_image(),
        }
    }
}

impl UserDraft {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// The values as read for submission: surrounding whitespace removed.
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            profile_image: self.profile_image.trim().to_string(),
        }
    }
}

/// Body of `POST /users` (and of `PUT /users/{id}`, where any `id` field is ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default = "placeholder_image")]
    pub profile_image: String,
    #[serde(default)]
    pub favorite: bool,
}

impl From<UserDraft> for UserCreate {
    /// New users always start out as non-favorites; a blank image falls back to the placeholder.
    fn from(draft: UserDraft) -> Self {
        let profile_image = if draft.profile_image.trim().is_empty() {
            placeholder_image()
        } else {
            draft.profile_image
        };
        Self {
            full_name: draft.full_name,
            email: draft.email,
            phone: draft.phone,
            profile_image,
            favorite: false,
        }
    }
}

/// Partial update applied to the in-memory list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub favorite: Option<bool>,
}

impl From<&User> for UserPatch {
    /// A patch that overwrites every mutable field with the values of `user`.
    fn from(user: &User) -> Self {
        Self {
            full_name: Some(user.full_name.clone()),
            email: Some(user.email.clone()),
            phone: Some(user.phone.clone()),
            profile_image: Some(user.profile_image.clone()),
            favorite: Some(user.favorite),
        }
    }
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(profile_image) = self.profile_image {
            user.profile_image = profile_image;
        }
        if let Some(favorite) = self.favorite {
            user.favorite = favorite;
        }
    }
}
