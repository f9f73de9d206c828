use std::path::PathBuf;

use clap::Parser;

use modalbox_core::{ActionType, IconType};

#[derive(Parser, Debug)]
#[command(name = "modalbox")]
#[command(about = "Show a modal message box and print the chosen action")]
pub struct Args {
    /// Dialog title
    pub caption: String,

    /// Dialog body text
    pub message: String,

    /// Icon: none, info, question, warning, error
    #[arg(short, long, default_value = "none", value_parser = parse_icon)]
    pub icon: IconType,

    /// Button label, repeat up to three times (in action order)
    #[arg(short, long = "action", conflicts_with = "preset")]
    pub actions: Vec<String>,

    /// Predefined buttons: ok, ok-cancel, retry-cancel, yes-no, yes-no-cancel,
    /// abort-retry-ignore
    #[arg(short, long, value_parser = parse_preset)]
    pub preset: Option<ActionType>,

    /// Call the prompt from a worker thread instead of the UI thread
    #[arg(short, long)]
    pub worker: bool,

    /// Give up waiting on the worker thread after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Answer the dialog automatically with button N (1-based), without a terminal
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=3))]
    pub headless_press: Option<u32>,

    /// Path to the data directory (default: ~/.modalbox/)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Write the effective settings back to the config file
    #[arg(long)]
    pub save_config: bool,
}

fn parse_icon(value: &str) -> Result<IconType, String> {
    IconType::parse(value).ok_or_else(|| format!("unknown icon '{value}'"))
}

fn parse_preset(value: &str) -> Result<ActionType, String> {
    ActionType::parse(value).ok_or_else(|| format!("unknown preset '{value}'"))
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".modalbox")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let args = Args::try_parse_from(["modalbox", "Title", "Body"]).unwrap();
        assert_eq!(args.caption, "Title");
        assert_eq!(args.message, "Body");
        assert_eq!(args.icon, IconType::None);
        assert!(args.actions.is_empty());
        assert!(args.preset.is_none());
        assert!(!args.worker);
    }

    #[test]
    fn test_repeated_actions_keep_order() {
        let args = Args::try_parse_from([
            "modalbox", "Delete", "Really?", "-a", "Delete", "--action", "Cancel", "-i", "warn",
        ])
        .unwrap();
        assert_eq!(args.actions, vec!["Delete", "Cancel"]);
        assert_eq!(args.icon, IconType::Warning);
    }

    #[test]
    fn test_preset_and_actions_conflict() {
        let result =
            Args::try_parse_from(["modalbox", "T", "M", "-a", "Go", "--preset", "yes-no"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_preset_parsing() {
        let args = Args::try_parse_from(["modalbox", "T", "M", "-p", "yes_no_cancel"]).unwrap();
        assert_eq!(args.preset, Some(ActionType::YesNoCancel));
        assert!(Args::try_parse_from(["modalbox", "T", "M", "-p", "maybe"]).is_err());
    }

    #[test]
    fn test_headless_press_range() {
        assert!(Args::try_parse_from(["modalbox", "T", "M", "--headless-press", "0"]).is_err());
        assert!(Args::try_parse_from(["modalbox", "T", "M", "--headless-press", "4"]).is_err());
        let args =
            Args::try_parse_from(["modalbox", "T", "M", "--headless-press", "3", "--worker"])
                .unwrap();
        assert_eq!(args.headless_press, Some(3));
        assert!(args.worker);
    }
}
