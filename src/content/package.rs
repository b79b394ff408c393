//! Bookable tour packages.

use super::{Extra, lenient};
use serde::{Deserialize, Serialize};

/// Prefix of generated package ids.
const ID_PREFIX: &str = "package-";

/// A tour offering, listed on the home page and deep-linked by `id` from the
/// detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description_long: String,
    /// Comma-joined list, e.g. "Transporte, Hotel, Guia".
    #[serde(default, deserialize_with = "lenient::text")]
    pub included: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Package {
    /// Trimmed, non-empty entries of `included`.
    pub fn included_items(&self) -> impl Iterator<Item = &str> {
        self.included
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
    }
}

/// Generate a `package-<unix millis>` id not used by any of `existing`.
///
/// Two packages created within the same millisecond get consecutive values.
pub fn generate_package_id(existing: &[Package]) -> String {
    let mut millis = chrono::Utc::now().timestamp_millis();
    loop {
        let id = format!("{ID_PREFIX}{millis}");
        if !existing.iter().any(|p| p.id == id) {
            return id;
        }
        millis += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_included_items() {
        let pkg = Package {
            included: " Transporte, Hotel ,, Guia ".into(),
            ..Default::default()
        };
        let items: Vec<_> = pkg.included_items().collect();
        assert_eq!(items, vec!["Transporte", "Hotel", "Guia"]);
    }

    #[test]
    fn test_included_items_empty() {
        let pkg = Package::default();
        assert_eq!(pkg.included_items().count(), 0);
    }

    #[test]
    fn test_generate_package_id_format() {
        let id = generate_package_id(&[]);
        assert!(id.starts_with(ID_PREFIX));
        assert!(id[ID_PREFIX.len()..].parse::<i64>().is_ok());
    }

    #[test]
    fn test_generate_package_id_skips_taken() {
        let mut existing = Vec::new();
        for _ in 0..5 {
            let id = generate_package_id(&existing);
            assert!(!existing.iter().any(|p: &Package| p.id == id));
            existing.push(Package {
                id,
                ..Default::default()
            });
        }
    }

    #[test]
    fn test_description_long_key() {
        let pkg: Package =
            serde_json::from_str(r#"{"id": "p", "description_long": "Longo"}"#).unwrap();
        assert_eq!(pkg.description_long, "Longo");
        let back = serde_json::to_value(&pkg).unwrap();
        assert_eq!(back["description_long"], "Longo");
    }
}
