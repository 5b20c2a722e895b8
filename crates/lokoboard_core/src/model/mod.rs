//! Board domain model.
//!
//! # Responsibility
//! - Define the three record shapes of the board hierarchy.
//! - Own id generation and per-record validation rules.
//!
//! # Invariants
//! - Every card references an existing column; a non-null `sub_id` references
//!   a subcolumn of that same column.
//! - Deleting a parent never leaves orphaned children.

pub mod card;
pub mod column;
pub mod subcolumn;

/// Trims a user-supplied title, rejecting blank input.
pub fn normalize_title(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_title;

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  Depot A "), Some("Depot A".to_string()));
        assert_eq!(normalize_title(" \t "), None);
    }
}
