//! Action label presets

const LABEL_OK: &str = "OK";
const LABEL_CANCEL: &str = "Cancel";
const LABEL_YES: &str = "Yes";
const LABEL_NO: &str = "No";
const LABEL_ABORT: &str = "Abort";
const LABEL_RETRY: &str = "Retry";
const LABEL_IGNORE: &str = "Ignore";

/// Predefined sets of user actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActionType {
    #[default]
    Ok,
    OkCancel,
    RetryCancel,
    YesNo,
    YesNoCancel,
    AbortRetryIgnore,
}

impl ActionType {
    /// Button labels for this preset, in action order
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            ActionType::Ok => &[LABEL_OK],
            ActionType::OkCancel => &[LABEL_OK, LABEL_CANCEL],
            ActionType::RetryCancel => &[LABEL_RETRY, LABEL_CANCEL],
            ActionType::YesNo => &[LABEL_YES, LABEL_NO],
            ActionType::YesNoCancel => &[LABEL_YES, LABEL_NO, LABEL_CANCEL],
            ActionType::AbortRetryIgnore => &[LABEL_ABORT, LABEL_RETRY, LABEL_IGNORE],
        }
    }

    pub fn to_labels(self) -> Vec<String> {
        self.labels().iter().map(|s| s.to_string()).collect()
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "ok" => Some(ActionType::Ok),
            "okcancel" => Some(ActionType::OkCancel),
            "retrycancel" => Some(ActionType::RetryCancel),
            "yesno" => Some(ActionType::YesNo),
            "yesnocancel" => Some(ActionType::YesNoCancel),
            "abortretryignore" => Some(ActionType::AbortRetryIgnore),
            _ => None,
        }
    }
}

/// Custom button labels, filling gaps with placeholders.
///
/// The last label that is set decides the button count; missing labels before
/// it fall back to "OK" (first) and "No" (second).
pub fn custom_labels(
    button1: Option<&str>,
    button2: Option<&str>,
    button3: Option<&str>,
) -> Vec<String> {
    let first = button1.unwrap_or(LABEL_OK).to_string();
    match (button2, button3) {
        (second, Some(third)) => vec![
            first,
            second.unwrap_or(LABEL_NO).to_string(),
            third.to_string(),
        ],
        (Some(second), None) => vec![first, second.to_string()],
        (None, None) => vec![first],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_labels() {
        assert_eq!(ActionType::Ok.labels(), &["OK"]);
        assert_eq!(ActionType::RetryCancel.labels(), &["Retry", "Cancel"]);
        assert_eq!(ActionType::YesNoCancel.labels(), &["Yes", "No", "Cancel"]);
        assert_eq!(
            ActionType::AbortRetryIgnore.labels(),
            &["Abort", "Retry", "Ignore"]
        );
    }

    #[test]
    fn test_parse_preset_names() {
        assert_eq!(ActionType::parse("yes-no"), Some(ActionType::YesNo));
        assert_eq!(ActionType::parse("OkCancel"), Some(ActionType::OkCancel));
        assert_eq!(ActionType::parse("maybe"), None);
    }

    #[test]
    fn test_custom_labels_placeholders() {
        assert_eq!(custom_labels(None, None, None), vec!["OK"]);
        assert_eq!(custom_labels(Some("Go"), None, None), vec!["Go"]);
        assert_eq!(custom_labels(None, Some("Stop"), None), vec!["OK", "Stop"]);
        assert_eq!(
            custom_labels(Some("Save"), None, Some("Discard")),
            vec!["Save", "No", "Discard"]
        );
    }
}
