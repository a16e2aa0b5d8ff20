//! Saved shipping addresses.

use serde::{Deserialize, Serialize};

use super::id::AddressId;

/// Country used when the form leaves it blank.
pub const DEFAULT_COUNTRY: &str = "United States";

/// A shipping address in the user's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    /// At most one address in a book is the default.
    #[serde(default)]
    pub is_default: bool,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Address {
    /// One-line postal form, e.g. `New York, NY 10001`.
    #[must_use]
    pub fn locality(&self) -> String {
        format!("{}, {} {}", self.city, self.state, self.zip_code)
    }
}

/// Form input for creating or editing an address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl AddressInput {
    /// Names of required fields that are blank. Country is optional.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Build the stored record, trimming every field.
    #[must_use]
    pub fn into_address(self, id: AddressId, is_default: bool) -> Address {
        let country = self.country.trim();
        Address {
            id,
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            country: if country.is_empty() {
                default_country()
            } else {
                country.to_string()
            },
            is_default,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> AddressInput {
        AddressInput {
            name: "Jane Roe".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            street: " 9 Elm Road ".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            country: String::new(),
        }
    }

    #[test]
    fn test_missing_fields_lists_blank_required_fields() {
        assert!(input().missing_fields().is_empty());

        let blank = AddressInput {
            phone: "  ".to_string(),
            zip_code: String::new(),
            ..input()
        };
        assert_eq!(blank.missing_fields(), vec!["phone", "zip code"]);
    }

    #[test]
    fn test_into_address_trims_and_defaults_country() {
        let address = input().into_address(AddressId::new("a1"), true);
        assert_eq!(address.street, "9 Elm Road");
        assert_eq!(address.country, DEFAULT_COUNTRY);
        assert_eq!(address.locality(), "Portland, OR 97201");
    }

    #[test]
    fn test_parses_stored_record() {
        let raw = r#"{"id":"1","name":"John Doe","phone":"+1","street":"123 Main",
            "city":"New York","state":"NY","zipCode":"10001","isDefault":true}"#;
        let address: Address = serde_json::from_str(raw).unwrap();
        assert_eq!(address.id.as_str(), "1");
        assert!(address.is_default);
        assert_eq!(address.country, DEFAULT_COUNTRY);
    }
}
