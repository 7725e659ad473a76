use std::collections::HashMap;

use crate::models::CalendarResource;

/// Immutable lookup tables for the fixed location and language sets. Built
/// once at startup and shared through `AppState`; nothing mutates it after
/// that.
#[derive(Debug, Clone)]
pub struct Registry {
    locations: Vec<String>,
    language_names: HashMap<String, String>,
    location_colors: HashMap<String, String>,
    location_resources: HashMap<String, String>,
}

const FALLBACK_COLOR: &str = "#808080";

impl Registry {
    pub fn new(
        locations: Vec<String>,
        language_names: HashMap<String, String>,
        location_colors: HashMap<String, String>,
        location_resources: HashMap<String, String>,
    ) -> Self {
        Self {
            locations,
            language_names,
            location_colors,
            location_resources,
        }
    }

    /// The NYPL branch set the dashboard ships with.
    pub fn nypl_default() -> Self {
        let locations = ["Chatham Sq", "Online", "Seward Park", "SNFL"];
        let resources = [
            ("Chatham Sq", "chatham"),
            ("Online", "online"),
            ("Seward Park", "seward"),
            ("SNFL", "snfl"),
        ];
        let colors = [
            ("Chatham Sq", "#54BCD6"),
            ("Online", "#D65654"),
            ("Seward Park", "#D6C853"),
            ("SNFL", "#8F62BF"),
        ];
        let languages = [("en", "English"), ("zh", "Chinese")];

        Self::new(
            locations.iter().map(|s| s.to_string()).collect(),
            languages
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            colors
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            resources
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Valid location codes, in display order.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn is_location(&self, code: &str) -> bool {
        self.locations.iter().any(|l| l == code)
    }

    /// Language display names, in a stable order.
    pub fn language_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.language_names.values().cloned().collect();
        names.sort();
        names
    }

    /// Reverse lookup: display name back to the internal language code.
    pub fn language_code(&self, display_name: &str) -> Option<&str> {
        self.language_names
            .iter()
            .find(|(_, name)| name.as_str() == display_name)
            .map(|(code, _)| code.as_str())
    }

    pub fn color(&self, location: &str) -> &str {
        self.location_colors
            .get(location)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Calendar lane id for a location; unregistered codes fall back to the
    /// code itself so a stray row is visible rather than lost.
    pub fn resource_id(&self, location: &str) -> String {
        self.location_resources
            .get(location)
            .cloned()
            .unwrap_or_else(|| location.to_string())
    }

    /// One calendar lane per registered location, 1:1 and in location order.
    pub fn calendar_resources(&self) -> Vec<CalendarResource> {
        self.locations
            .iter()
            .map(|loc| CalendarResource {
                id: self.resource_id(loc),
                title: loc.clone(),
            })
            .collect()
    }
}
