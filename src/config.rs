use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub keybindings: Keybindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keybindings {
    pub next_tab: Vec<String>,
    pub prev_tab: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub search: Vec<String>,
    pub download: Vec<String>,
    pub open_drive: Vec<String>,
    pub refresh: Vec<String>,
    pub refresh_all: Vec<String>,
    pub update_scopes: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keybindings: Keybindings {
                next_tab: vec!["Tab".to_string(), "l".to_string()],
                prev_tab: vec!["BackTab".to_string(), "h".to_string()],
                move_up: vec!["k".to_string(), "Up".to_string()],
                move_down: vec!["j".to_string(), "Down".to_string()],
                search: vec!["/".to_string()],
                download: vec!["d".to_string(), "Enter".to_string()],
                open_drive: vec!["o".to_string()],
                refresh: vec!["r".to_string()],
                refresh_all: vec!["R".to_string()],
                update_scopes: vec!["s".to_string()],
                quit: vec!["q".to_string()],
            },
        }
    }
}

pub fn parse_key_string(key_str: &str) -> (KeyCode, KeyModifiers) {
    let mut parts: Vec<&str> = key_str.split('-').collect();
    let mut modifiers = KeyModifiers::empty();

    // We process from the end to find the base key, then consume prefixes
    let base_key_str = parts.pop().unwrap_or("");

    for part in parts {
        match part.to_lowercase().as_str() {
            "ctrl" => modifiers.insert(KeyModifiers::CONTROL),
            "alt" => modifiers.insert(KeyModifiers::ALT),
            "shift" => modifiers.insert(KeyModifiers::SHIFT),
            "cmd" | "command" | "super" => modifiers.insert(KeyModifiers::SUPER),
            "meta" => modifiers.insert(KeyModifiers::META),
            _ => {}
        }
    }

    let code = match base_key_str {
        "Backspace" => KeyCode::Backspace,
        "Enter" => KeyCode::Enter,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Esc" => KeyCode::Esc,
        " " => KeyCode::Char(' '),
        s if s.len() == 1 => KeyCode::Char(s.chars().next().unwrap()),
        _ => KeyCode::Null,
    };

    (code, modifiers)
}

pub fn matches_key(event: KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|b| {
        let (code, modifiers) = parse_key_string(b);
        event.code == code && event.modifiers.contains(modifiers)
    })
}

impl Config {
    pub fn load() -> Self {
        use std::fs;
        if let Ok(content) = fs::read_to_string("settings.toml") {
            if let Ok(config) = toml::from_str(&content) {
                return config;
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_modified_keys() {
        assert_eq!(parse_key_string("q"), (KeyCode::Char('q'), KeyModifiers::empty()));
        assert_eq!(parse_key_string("Tab"), (KeyCode::Tab, KeyModifiers::empty()));
        assert_eq!(
            parse_key_string("ctrl-r"),
            (KeyCode::Char('r'), KeyModifiers::CONTROL)
        );
    }

    #[test]
    fn test_matches_key_any_binding() {
        let bindings = vec!["j".to_string(), "Down".to_string()];
        assert!(matches_key(
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::empty()),
            &bindings
        ));
        assert!(matches_key(
            KeyEvent::new(KeyCode::Down, KeyModifiers::empty()),
            &bindings
        ));
        assert!(!matches_key(
            KeyEvent::new(KeyCode::Char('x'), KeyModifiers::empty()),
            &bindings
        ));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let serialized = toml::to_string(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.keybindings.quit, vec!["q".to_string()]);
    }
}
