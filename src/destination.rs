// Destination schema: a geographic entity in the hierarchical travel catalog.
use serde::{Deserialize, Serialize};

// Parent id carried by root destinations on the wire.
pub const ROOT_PARENT_ID: u64 = 0;

// Geographic center of a destination. Range checking is a strict-mode
// concern, not a wire constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub destination_id: u64,
    pub name: String,
    // Free-form: city, region, country and whatever else the catalog emits.
    #[serde(rename = "type")]
    pub destination_type: String,
    pub parent_destination_id: u64,
    pub lookup_id: String,
    pub destination_url: String,
    pub default_currency_code: String,
    pub time_zone: String,
    pub country_calling_code: String,
    // Order carries display priority.
    pub languages: Vec<String>,
    pub center: Coordinates,
}

impl Destination {
    // Parent id with the root sentinel mapped to None.
    pub fn parent(&self) -> Option<u64> {
        if self.parent_destination_id == ROOT_PARENT_ID {
            None
        } else {
            Some(self.parent_destination_id)
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_destination_id == ROOT_PARENT_ID
    }

    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Destination {
        Destination {
            destination_id: 1,
            name: "Paris".to_string(),
            destination_type: "city".to_string(),
            parent_destination_id: 0,
            lookup_id: "PAR".to_string(),
            destination_url: "/paris".to_string(),
            default_currency_code: "EUR".to_string(),
            time_zone: "Europe/Paris".to_string(),
            country_calling_code: "+33".to_string(),
            languages: vec!["fr".to_string(), "en".to_string()],
            center: Coordinates {
                latitude: 48.8566,
                longitude: 2.3522,
            },
        }
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let json = serde_json::to_value(paris()).unwrap();

        assert_eq!(json["destinationId"], 1);
        assert_eq!(json["type"], "city");
        assert_eq!(json["parentDestinationId"], 0);
        assert_eq!(json["lookupId"], "PAR");
        assert_eq!(json["defaultCurrencyCode"], "EUR");
        assert_eq!(json["countryCallingCode"], "+33");
        assert_eq!(json["center"]["latitude"], 48.8566);
    }

    #[test]
    fn test_serde_round_trip() {
        let original = paris();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Destination = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_root_sentinel_maps_to_none() {
        let root = paris();
        assert!(root.is_root());
        assert_eq!(root.parent(), None);

        let child = Destination {
            destination_id: 2,
            parent_destination_id: 1,
            ..paris()
        };
        assert!(!child.is_root());
        assert_eq!(child.parent(), Some(1));
    }

    #[test]
    fn test_primary_language_is_first_entry() {
        assert_eq!(paris().primary_language(), Some("fr"));

        let silent = Destination {
            languages: vec![],
            ..paris()
        };
        assert_eq!(silent.primary_language(), None);
    }
}
