//! UI preferences persisted alongside the session token.

/// Interface language. Dutch is the default audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Nl,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Nl => "nl",
            Language::En => "en",
        }
    }

    /// Parses a stored language value, falling back to Dutch.
    pub fn from_stored(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Language::En,
            _ => Language::Nl,
        }
    }
}

/// Visual theme for the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parses a stored theme value, falling back to light.
    pub fn from_stored(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_round_trips_through_storage() {
        assert_eq!(Language::from_stored(Language::En.as_str()), Language::En);
        assert_eq!(Language::from_stored(Language::Nl.as_str()), Language::Nl);
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        assert_eq!(Language::from_stored("??"), Language::Nl);
        assert_eq!(Theme::from_stored("solarized"), Theme::Light);
    }
}
