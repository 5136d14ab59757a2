use crate::error::{Result, TaskError};
use crate::models::NewTaskItem;

/// Substring that widens a title search to the description column.
const URGENT_MARKER: &str = "urgent";

/// Whether a title search term triggers the urgent widening rule.
///
/// When the term contains the substring `urgent`, the title predicate is
/// widened to also match rows whose description contains `urgent`. The rule
/// is data-dependent and deliberate; keeping it as a named predicate makes
/// it explicit and lets every backend apply the same behavior.
///
/// # Examples
///
/// ```rust
/// use taskboard_core::validation::urgent_widening_applies;
///
/// assert!(urgent_widening_applies("urgent"));
/// assert!(urgent_widening_applies("very urgent fix"));
/// assert!(!urgent_widening_applies("routine"));
/// ```
pub fn urgent_widening_applies(title_term: &str) -> bool {
    title_term.contains(URGENT_MARKER)
}

/// The description substring matched when the widening rule applies.
pub fn urgent_marker() -> &'static str {
    URGENT_MARKER
}

/// Validation utilities for task operations
pub struct TaskValidator;

impl TaskValidator {
    /// Validate a task title
    ///
    /// Titles must not be empty or whitespace-only. This check runs on the
    /// create path only; the update path intentionally skips it, so an
    /// existing title can be overwritten with an empty one.
    ///
    /// # Returns
    /// * `Ok(())` - If the title is valid
    /// * `Err(TaskError::Validation)` - If the title is empty
    pub fn validate_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(TaskError::empty_field("title"));
        }
        Ok(())
    }

    /// Validate a creating-user identifier
    pub fn validate_created_by(created_by: &str) -> Result<()> {
        if created_by.trim().is_empty() {
            return Err(TaskError::empty_field("created_by"));
        }
        Ok(())
    }

    /// Validate a complete NewTaskItem structure
    pub fn validate_new_task(task: &NewTaskItem) -> Result<()> {
        Self::validate_title(&task.title)?;
        Self::validate_created_by(&task.created_by)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgent_widening_predicate() {
        assert!(urgent_widening_applies("urgent"));
        assert!(urgent_widening_applies("urgent fix"));
        assert!(urgent_widening_applies("something urgent happened"));
        assert!(!urgent_widening_applies(""));
        assert!(!urgent_widening_applies("important"));
        // The rule is a plain case-sensitive substring match
        assert!(!urgent_widening_applies("URGENT"));
    }

    #[test]
    fn test_valid_titles() {
        assert!(TaskValidator::validate_title("Fix bug").is_ok());
        assert!(TaskValidator::validate_title("a").is_ok());
        assert!(TaskValidator::validate_title("  padded but non-empty  ").is_ok());
    }

    #[test]
    fn test_invalid_titles() {
        assert!(TaskValidator::validate_title("").is_err());
        assert!(TaskValidator::validate_title("   ").is_err());
        assert!(TaskValidator::validate_title("\t\n").is_err());
    }

    #[test]
    fn test_validate_new_task() {
        let valid = NewTaskItem::new("Fix bug", None, "maria");
        assert!(TaskValidator::validate_new_task(&valid).is_ok());

        let empty_title = NewTaskItem::new("", None, "maria");
        assert!(TaskValidator::validate_new_task(&empty_title).is_err());

        let empty_creator = NewTaskItem::new("Fix bug", None, " ");
        assert!(TaskValidator::validate_new_task(&empty_creator).is_err());
    }
}
