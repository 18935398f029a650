use super::{load_config, parse_config, parse_replace_pair, DesiredState};
use std::io::Write;

const FULL_DOCUMENT: &str = r#"
casks:
  - google-chrome
  - visual-studio-code
formulae:
  - git
  - jq
  - ripgrep
appStore:
  - 409183694
  - "497799835"
defaultSettings:
  - "defaults write com.apple.finder AppleShowAllFiles YES"
  - "defaults write com.apple.dock autohide -bool true"
dockReplace:
  - "/Applications/Safari.app|/Applications/Firefox.app"
dockAdd:
  - "/Applications/Slack.app"
dockRemove:
  - "/Applications/Mail.app"
"#;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn load_preserves_every_list_in_declared_order() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(FULL_DOCUMENT.as_bytes())
        .expect("write temp config");

    let state = load_config(file.path()).expect("load config");

    assert_eq!(
        state,
        DesiredState {
            casks: strings(&["google-chrome", "visual-studio-code"]),
            formulae: strings(&["git", "jq", "ripgrep"]),
            app_store_items: strings(&["409183694", "497799835"]),
            default_setting_commands: strings(&[
                "defaults write com.apple.finder AppleShowAllFiles YES",
                "defaults write com.apple.dock autohide -bool true",
            ]),
            dock_replacements: strings(&["/Applications/Safari.app|/Applications/Firefox.app"]),
            dock_additions: strings(&["/Applications/Slack.app"]),
            dock_removals: strings(&["/Applications/Mail.app"]),
        }
    );
}

#[test]
fn missing_and_null_keys_become_empty_lists() {
    let state = parse_config("formulae:\n  - git\ncasks:\n").expect("parse config");
    assert_eq!(state.formulae, strings(&["git"]));
    assert!(state.casks.is_empty());
    assert!(state.app_store_items.is_empty());
    assert!(state.dock_removals.is_empty());
}

#[test]
fn empty_document_is_an_empty_state() {
    let state = parse_config("  \n").expect("parse empty config");
    assert_eq!(state, DesiredState::default());
}

#[test]
fn unknown_keys_are_ignored() {
    let state = parse_config("formulae: [git]\nextras: [thing]\n").expect("parse config");
    assert_eq!(state.formulae, strings(&["git"]));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = load_config(&dir.path().join("config.yaml")).expect_err("missing file");
    assert!(format!("{err:#}").contains("read config"));
}

#[test]
fn malformed_yaml_is_an_error() {
    assert!(parse_config("casks: [unterminated\n").is_err());
}

#[test]
fn non_list_value_is_an_error() {
    let err = parse_config("casks: google-chrome\n").expect_err("scalar casks");
    assert!(format!("{err:#}").contains("expected a list"));
}

#[test]
fn nested_list_entry_is_an_error() {
    assert!(parse_config("formulae:\n  - [git, jq]\n").is_err());
}

#[test]
fn replace_pair_splits_on_single_delimiter() {
    assert_eq!(parse_replace_pair("AppA|AppB"), Some(("AppA", "AppB")));
}

#[test]
fn replace_pair_rejects_wrong_delimiter_counts() {
    assert_eq!(parse_replace_pair("AppA"), None);
    assert_eq!(parse_replace_pair("AppA|AppB|AppC"), None);
    assert_eq!(parse_replace_pair("A||B"), None);
}
