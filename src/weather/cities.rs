//! Supported city registry
//!
//! Built once at startup and shared read-only for the life of the process.

/// A supported city and its coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    /// Lowercase registry key
    pub key: String,

    pub latitude: f64,
    pub longitude: f64,
}

/// Ordered, case-insensitive mapping from city key to coordinates
#[derive(Debug, Clone)]
pub struct CityRegistry {
    cities: Vec<City>,
}

impl CityRegistry {
    /// Build a registry from `(name, latitude, longitude)` entries.
    ///
    /// Keys are lowercased; a repeated key replaces the earlier coordinates
    /// but keeps its original position.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: AsRef<str>,
    {
        let mut cities: Vec<City> = Vec::new();

        for (name, latitude, longitude) in entries {
            let key = normalize(name.as_ref());
            match cities.iter_mut().find(|c| c.key == key) {
                Some(existing) => {
                    existing.latitude = latitude;
                    existing.longitude = longitude;
                }
                None => cities.push(City {
                    key,
                    latitude,
                    longitude,
                }),
            }
        }

        Self { cities }
    }

    /// Look up a city by name, ignoring case and surrounding whitespace
    pub fn get(&self, name: &str) -> Option<&City> {
        let key = normalize(name);
        self.cities.iter().find(|c| c.key == key)
    }

    /// Registry keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(|c| c.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for CityRegistry {
    fn default() -> Self {
        Self::new([("bangalore", 12.9716, 77.5946), ("delhi", 28.7041, 77.1025)])
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Title-case a city name the way it is echoed back in reports
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;

    for ch in name.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}
