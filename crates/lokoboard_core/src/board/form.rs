//! Input-collection forms for board actions.
//!
//! # Responsibility
//! - Gather raw answers from an [`InputSource`] in a fixed question order.
//! - Validate and normalize answers into domain drafts before any storage call.
//!
//! # Invariants
//! - A cancelled or empty required answer aborts collection (`Ok(None)`).
//! - An unknown card type choice is an error, never a silent default.
//! - Blank photo urls, and the `none` answer, normalize to `None`.
//! - Cancelling the optional photo prompt still aborts the whole form.

use super::input::InputSource;
use crate::model::card::{Card, CardDraft, CardFields, CardType, CardValidationError};
use crate::model::normalize_title;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CARD_TYPE_PROMPT: &str = "Card type (1 - Locomotive, 2 - Engineer, 3 - Assistant)";
const PHOTO_PROMPT: &str = "Photo URL (optional, `none` to clear)";
/// Photo answer that removes the current photo.
pub const CLEAR_PHOTO: &str = "none";

/// Form validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Card type answer matched none of the known choices.
    InvalidCardType(String),
    BlankTitle,
    Invalid(CardValidationError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCardType(value) => write!(f, "invalid card type: `{value}`"),
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CardValidationError> for FormError {
    fn from(value: CardValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Parses a card type answer: `1|2|3` or the type name, case-insensitive.
pub fn parse_card_type_choice(value: &str) -> Result<CardType, FormError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "locomotive" => Ok(CardType::Locomotive),
        "2" | "engineer" => Ok(CardType::Engineer),
        "3" | "assistant" => Ok(CardType::Assistant),
        other => Err(FormError::InvalidCardType(other.to_string())),
    }
}

/// Single-field form for column and subcolumn titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleForm {
    pub title: String,
}

impl TitleForm {
    pub fn collect(input: &mut dyn InputSource, label: &str) -> Option<Self> {
        input.prompt(label, None).map(|title| Self { title })
    }

    /// Returns the trimmed title.
    pub fn validate(&self) -> Result<String, FormError> {
        normalize_title(&self.title).ok_or(FormError::BlankTitle)
    }
}

/// Raw answers for a new card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardForm {
    pub card_type: String,
    pub name: String,
    pub code: String,
    pub position: Option<String>,
    pub photo_url: Option<String>,
}

impl CardForm {
    /// Asks for card type first, then the fields that type needs.
    ///
    /// Personnel cards are asked for position, name, service number and
    /// photo; locomotives for name, code and photo.
    ///
    /// # Errors
    /// - `InvalidCardType` when the type answer is not a known choice.
    pub fn collect(input: &mut dyn InputSource) -> Result<Option<Self>, FormError> {
        let Some(card_type) = required(input, CARD_TYPE_PROMPT, Some("1")) else {
            return Ok(None);
        };
        let kind = parse_card_type_choice(&card_type)?;

        let position = if kind.requires_position() {
            match required(input, "Position", None) {
                Some(value) => Some(value),
                None => return Ok(None),
            }
        } else {
            None
        };
        let Some(name) = required(input, name_label(kind), None) else {
            return Ok(None);
        };
        let Some(code) = required(input, code_label(kind), None) else {
            return Ok(None);
        };
        let Some(photo_url) = photo_answer(input, None) else {
            return Ok(None);
        };

        Ok(Some(Self {
            card_type,
            name,
            code,
            position,
            photo_url,
        }))
    }

    /// Validates answers into a card draft.
    pub fn into_draft(self) -> Result<CardDraft, FormError> {
        let kind = parse_card_type_choice(&self.card_type)?;
        let draft = CardDraft {
            kind,
            fields: normalize_fields(self.name, self.code, self.position, self.photo_url),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Raw answers for editing an existing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEditForm {
    pub name: String,
    pub code: String,
    pub position: Option<String>,
    pub photo_url: Option<String>,
}

impl CardEditForm {
    /// Asks for new field values, pre-filled with the card's current ones.
    pub fn collect(input: &mut dyn InputSource, card: &Card) -> Option<Self> {
        let position = if card.kind.requires_position() {
            Some(required(input, "Position", card.position.as_deref())?)
        } else {
            None
        };
        let name = required(input, name_label(card.kind), Some(card.name.as_str()))?;
        let code = required(input, code_label(card.kind), Some(card.code.as_str()))?;
        let photo_url = photo_answer(input, card.photo_url.as_deref())?;

        Some(Self {
            name,
            code,
            position,
            photo_url,
        })
    }

    /// Validates answers against the rules of `kind`.
    pub fn into_fields(self, kind: CardType) -> Result<CardFields, FormError> {
        let fields = normalize_fields(self.name, self.code, self.position, self.photo_url);
        CardDraft {
            kind,
            fields: fields.clone(),
        }
        .validate()?;
        Ok(fields)
    }
}

/// Outer `None` is a cancel; inner `None` means "no photo".
fn photo_answer(input: &mut dyn InputSource, current: Option<&str>) -> Option<Option<String>> {
    let answer = input.prompt(PHOTO_PROMPT, current)?;
    if answer.trim().eq_ignore_ascii_case(CLEAR_PHOTO) {
        return Some(None);
    }
    Some(Some(answer))
}

fn required(input: &mut dyn InputSource, label: &str, default: Option<&str>) -> Option<String> {
    input
        .prompt(label, default)
        .filter(|value| !value.trim().is_empty())
}

fn normalize_fields(
    name: String,
    code: String,
    position: Option<String>,
    photo_url: Option<String>,
) -> CardFields {
    CardFields {
        name: name.trim().to_string(),
        code: code.trim().to_string(),
        position: position.map(|value| value.trim().to_string()),
        photo_url: photo_url
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()),
    }
}

fn name_label(kind: CardType) -> &'static str {
    match kind {
        CardType::Locomotive => "Locomotive name",
        CardType::Engineer => "Engineer full name",
        CardType::Assistant => "Assistant full name",
    }
}

fn code_label(kind: CardType) -> &'static str {
    match kind {
        CardType::Locomotive => "Locomotive code",
        CardType::Engineer | CardType::Assistant => "Service number",
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_card_type_choice, CardEditForm, CardForm, FormError};
    use crate::board::input::ScriptedInput;
    use crate::model::card::{Card, CardType, CardValidationError};

    #[test]
    fn card_type_choice_accepts_numbers_and_names() {
        assert_eq!(parse_card_type_choice("1").unwrap(), CardType::Locomotive);
        assert_eq!(parse_card_type_choice(" Engineer ").unwrap(), CardType::Engineer);
        assert_eq!(parse_card_type_choice("3").unwrap(), CardType::Assistant);
        assert_eq!(
            parse_card_type_choice("4").unwrap_err(),
            FormError::InvalidCardType("4".to_string())
        );
    }

    #[test]
    fn locomotive_form_skips_position_and_drops_blank_photo() {
        let mut input = ScriptedInput::new().answers(["1", " 2TE10U ", "0457", "  "]);
        let form = CardForm::collect(&mut input).unwrap().unwrap();
        let draft = form.into_draft().unwrap();

        assert_eq!(draft.kind, CardType::Locomotive);
        assert_eq!(draft.fields.name, "2TE10U");
        assert_eq!(draft.fields.code, "0457");
        assert_eq!(draft.fields.position, None);
        assert_eq!(draft.fields.photo_url, None);
        assert_eq!(input.pending_answers(), 0);
    }

    #[test]
    fn engineer_form_asks_position_first() {
        let mut input =
            ScriptedInput::new().answers(["2", "Senior driver", "Petrov P.", "E-17", "http://x/p.png"]);
        let draft = CardForm::collect(&mut input)
            .unwrap()
            .unwrap()
            .into_draft()
            .unwrap();

        assert_eq!(draft.kind, CardType::Engineer);
        assert_eq!(draft.fields.position.as_deref(), Some("Senior driver"));
        assert_eq!(draft.fields.name, "Petrov P.");
        assert_eq!(draft.fields.photo_url.as_deref(), Some("http://x/p.png"));
    }

    #[test]
    fn empty_required_answer_cancels_collection() {
        let mut input = ScriptedInput::new().answers(["3", "Helper", ""]);
        assert_eq!(CardForm::collect(&mut input).unwrap(), None);

        let mut cancelled_type = ScriptedInput::new().answer(None);
        assert_eq!(CardForm::collect(&mut cancelled_type).unwrap(), None);
    }

    #[test]
    fn unknown_type_is_an_error() {
        let mut input = ScriptedInput::new().answers(["9"]);
        let err = CardForm::collect(&mut input).unwrap_err();
        assert_eq!(err, FormError::InvalidCardType("9".to_string()));
    }

    #[test]
    fn edit_form_rejects_position_on_locomotive() {
        let form = CardEditForm {
            name: "2M62".to_string(),
            code: "1102".to_string(),
            position: Some("driver".to_string()),
            photo_url: None,
        };
        let err = form.into_fields(CardType::Locomotive).unwrap_err();
        assert_eq!(
            err,
            FormError::Invalid(CardValidationError::UnexpectedPosition(CardType::Locomotive))
        );
    }

    #[test]
    fn edit_form_cancelled_photo_aborts() {
        let card = Card {
            id: "eng-1".to_string(),
            kind: CardType::Engineer,
            name: "Old".to_string(),
            code: "1".to_string(),
            position: Some("driver".to_string()),
            photo_url: Some("http://old".to_string()),
            column_id: "col-1".to_string(),
            sub_id: None,
        };
        let mut input = ScriptedInput::new().answers(["driver", "New", "2"]).answer(None);
        assert_eq!(CardEditForm::collect(&mut input, &card), None);

        let mut input = ScriptedInput::new().answers(["driver", "New", "2", " None "]);
        let fields = CardEditForm::collect(&mut input, &card)
            .unwrap()
            .into_fields(card.kind)
            .unwrap();
        assert_eq!(fields.name, "New");
        assert_eq!(fields.photo_url, None);
    }

    #[test]
    fn new_card_cancelled_photo_aborts() {
        let mut input = ScriptedInput::new().answers(["1", "TE3", "0457"]).answer(None);
        assert_eq!(CardForm::collect(&mut input).unwrap(), None);
    }
}
