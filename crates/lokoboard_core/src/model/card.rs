//! Card domain model.
//!
//! # Responsibility
//! - Define the card record for locomotives, engineers, and assistants.
//! - Validate per-type field requirements before persistence.
//!
//! # Invariants
//! - `name` and `code` are never blank.
//! - Engineer and assistant cards carry a position; locomotive cards do not.
//! - `photo_url`, when present, is not blank.

use super::column::ColumnId;
use super::subcolumn::SubcolumnId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Card identifier, prefixed by card type (`loco-`, `eng-`, `ast-`).
pub type CardId = String;

/// What a card stands for on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// Rolling stock unit.
    Locomotive,
    /// Driver.
    Engineer,
    /// Driver's assistant.
    Assistant,
}

impl CardType {
    pub const ALL: [CardType; 3] = [Self::Locomotive, Self::Engineer, Self::Assistant];

    /// Stable persisted value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locomotive => "locomotive",
            Self::Engineer => "engineer",
            Self::Assistant => "assistant",
        }
    }

    /// Parses the persisted value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "locomotive" => Some(Self::Locomotive),
            "engineer" => Some(Self::Engineer),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    /// User-facing label used in card headlines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Locomotive => "Locomotive",
            Self::Engineer => "Engineer",
            Self::Assistant => "Assistant",
        }
    }

    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Locomotive => "loco",
            Self::Engineer => "eng",
            Self::Assistant => "ast",
        }
    }

    /// Personnel cards need a position; locomotives never have one.
    pub fn requires_position(self) -> bool {
        !matches!(self, Self::Locomotive)
    }

    /// Generates a fresh id carrying this type's prefix.
    pub fn generate_id(self) -> CardId {
        format!("{}-{}", self.id_prefix(), Uuid::new_v4())
    }
}

/// Card validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyId,
    BlankName,
    BlankCode,
    EmptyColumnId,
    /// `sub_id` is present but empty.
    EmptySubId,
    MissingPosition(CardType),
    UnexpectedPosition(CardType),
    BlankPhotoUrl,
}

impl Display for CardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "card id must not be empty"),
            Self::BlankName => write!(f, "card name must not be blank"),
            Self::BlankCode => write!(f, "card code must not be blank"),
            Self::EmptyColumnId => write!(f, "card column id must not be empty"),
            Self::EmptySubId => write!(f, "card subcolumn id must not be empty when set"),
            Self::MissingPosition(kind) => {
                write!(f, "{} card requires a position", kind.as_str())
            }
            Self::UnexpectedPosition(kind) => {
                write!(f, "{} card must not carry a position", kind.as_str())
            }
            Self::BlankPhotoUrl => write!(f, "photo url must not be blank when set"),
        }
    }
}

impl Error for CardValidationError {}

/// Content fields shared by create and edit flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub name: String,
    pub code: String,
    pub position: Option<String>,
    pub photo_url: Option<String>,
}

/// Validated input for a new card, before it is placed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub kind: CardType,
    pub fields: CardFields,
}

/// Persisted card record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    /// Serialized as `type` to match the stored record shape.
    #[serde(rename = "type")]
    pub kind: CardType,
    pub name: String,
    pub code: String,
    pub position: Option<String>,
    pub photo_url: Option<String>,
    pub column_id: ColumnId,
    /// `None` means the card sits directly in its column.
    pub sub_id: Option<SubcolumnId>,
}

impl Card {
    /// Builds a card from a draft with a generated, type-prefixed id.
    pub fn from_draft(draft: &CardDraft, column_id: ColumnId, sub_id: Option<SubcolumnId>) -> Self {
        Self {
            id: draft.kind.generate_id(),
            kind: draft.kind,
            name: draft.fields.name.clone(),
            code: draft.fields.code.clone(),
            position: draft.fields.position.clone(),
            photo_url: draft.fields.photo_url.clone(),
            column_id,
            sub_id,
        }
    }

    /// Replaces content fields, keeping identity, type and placement.
    pub fn apply_fields(&mut self, fields: &CardFields) {
        self.name = fields.name.clone();
        self.code = fields.code.clone();
        self.position = fields.position.clone();
        self.photo_url = fields.photo_url.clone();
    }

    /// Whether the card sits directly in its column.
    pub fn is_direct(&self) -> bool {
        self.sub_id.is_none()
    }

    /// Checks per-type field requirements.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.id.trim().is_empty() {
            return Err(CardValidationError::EmptyId);
        }
        if self.column_id.trim().is_empty() {
            return Err(CardValidationError::EmptyColumnId);
        }
        if matches!(self.sub_id.as_deref(), Some(sub_id) if sub_id.trim().is_empty()) {
            return Err(CardValidationError::EmptySubId);
        }
        validate_fields(self.kind, &self.name, &self.code, &self.position, &self.photo_url)
    }
}

impl CardDraft {
    pub fn validate(&self) -> Result<(), CardValidationError> {
        validate_fields(
            self.kind,
            &self.fields.name,
            &self.fields.code,
            &self.fields.position,
            &self.fields.photo_url,
        )
    }
}

fn validate_fields(
    kind: CardType,
    name: &str,
    code: &str,
    position: &Option<String>,
    photo_url: &Option<String>,
) -> Result<(), CardValidationError> {
    if name.trim().is_empty() {
        return Err(CardValidationError::BlankName);
    }
    if code.trim().is_empty() {
        return Err(CardValidationError::BlankCode);
    }
    match (kind.requires_position(), position.as_deref()) {
        (true, None) => return Err(CardValidationError::MissingPosition(kind)),
        (true, Some(value)) if value.trim().is_empty() => {
            return Err(CardValidationError::MissingPosition(kind));
        }
        (false, Some(_)) => return Err(CardValidationError::UnexpectedPosition(kind)),
        _ => {}
    }
    if matches!(photo_url.as_deref(), Some(url) if url.trim().is_empty()) {
        return Err(CardValidationError::BlankPhotoUrl);
    }
    Ok(())
}
