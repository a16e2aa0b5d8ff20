//! Shipping address book.
//!
//! Addresses live under [`keys::ADDRESSES`] as one JSON array. A book that
//! has never been saved is seeded with a sample address on first read; a
//! book the user emptied stays empty.
//!
//! When the book is non-empty exactly one address is the default. The first
//! address added becomes the default, and deleting the default promotes the
//! first remaining address.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use shopfront_core::{Address, AddressId, AddressInput, DEFAULT_COUNTRY};

use crate::storage::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Errors that can occur when editing the address book.
#[derive(Debug, Error)]
pub enum AddressError {
    /// Required fields are blank.
    #[error("Please fill in all required fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Address does not exist.
    #[error("Address not found: {0}")]
    NotFound(AddressId),

    /// The book could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persisted list of shipping addresses.
pub struct AddressBook {
    storage: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write cycles on the address key.
    write_lock: Mutex<()>,
}

impl AddressBook {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// All addresses in insertion order, seeding the sample on first use.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::Storage` if the book cannot be read or parsed.
    pub async fn list(&self) -> Result<Vec<Address>, AddressError> {
        let _guard = self.write_lock.lock().await;
        self.load().await
    }

    /// The default address, if the book has one.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::Storage` if the book cannot be read or parsed.
    pub async fn default_address(&self) -> Result<Option<Address>, AddressError> {
        Ok(self.list().await?.into_iter().find(|a| a.is_default))
    }

    /// Save a new address. It becomes the default if the book was empty.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::MissingFields` for blank required fields, or
    /// `AddressError::Storage` if the book cannot be saved.
    #[instrument(skip_all)]
    pub async fn add(&self, input: AddressInput) -> Result<Address, AddressError> {
        validate(&input)?;
        let _guard = self.write_lock.lock().await;
        let mut addresses = self.load().await?;

        let address = input.into_address(AddressId::generate(), addresses.is_empty());
        addresses.push(address.clone());
        self.save(&addresses).await?;
        info!(address_id = %address.id, "Address added");
        Ok(address)
    }

    /// Replace the fields of an existing address. Its id and default flag
    /// are kept.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::MissingFields`, `AddressError::NotFound`, or
    /// `AddressError::Storage` if the book cannot be saved.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &AddressId, input: AddressInput) -> Result<Address, AddressError> {
        validate(&input)?;
        let _guard = self.write_lock.lock().await;
        let mut addresses = self.load().await?;

        let slot = addresses
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| AddressError::NotFound(id.clone()))?;
        let updated = input.into_address(id.clone(), slot.is_default);
        *slot = updated.clone();

        self.save(&addresses).await?;
        info!("Address updated");
        Ok(updated)
    }

    /// Delete an address, promoting the first remaining one if the default
    /// was removed.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NotFound`, or `AddressError::Storage` if the
    /// book cannot be saved.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &AddressId) -> Result<(), AddressError> {
        let _guard = self.write_lock.lock().await;
        let mut addresses = self.load().await?;

        let before = addresses.len();
        addresses.retain(|a| &a.id != id);
        if addresses.len() == before {
            return Err(AddressError::NotFound(id.clone()));
        }
        if !addresses.iter().any(|a| a.is_default)
            && let Some(first) = addresses.first_mut()
        {
            first.is_default = true;
        }

        self.save(&addresses).await?;
        info!("Address deleted");
        Ok(())
    }

    /// Make `id` the only default address.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NotFound`, or `AddressError::Storage` if the
    /// book cannot be saved.
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: &AddressId) -> Result<Address, AddressError> {
        let _guard = self.write_lock.lock().await;
        let mut addresses = self.load().await?;

        if !addresses.iter().any(|a| &a.id == id) {
            return Err(AddressError::NotFound(id.clone()));
        }
        for address in &mut addresses {
            address.is_default = &address.id == id;
        }

        self.save(&addresses).await?;
        info!("Default address changed");
        addresses
            .into_iter()
            .find(|a| &a.id == id)
            .ok_or_else(|| AddressError::NotFound(id.clone()))
    }

    /// Read the book, seeding it when the key has never been written.
    /// Callers hold `write_lock`.
    async fn load(&self) -> Result<Vec<Address>, AddressError> {
        if let Some(addresses) = read_json(self.storage.as_ref(), keys::ADDRESSES).await? {
            return Ok(addresses);
        }
        let seeded = vec![sample_address()];
        self.save(&seeded).await?;
        info!("Sample address initialized");
        Ok(seeded)
    }

    async fn save(&self, addresses: &[Address]) -> Result<(), AddressError> {
        write_json(self.storage.as_ref(), keys::ADDRESSES, &addresses).await?;
        Ok(())
    }
}

fn validate(input: &AddressInput) -> Result<(), AddressError> {
    let missing = input.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AddressError::MissingFields(missing))
    }
}

/// The demo address shown to a new user.
#[must_use]
pub fn sample_address() -> Address {
    Address {
        id: AddressId::new("1"),
        name: "John Doe".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        street: "123 Main Street, Apt 4B".to_string(),
        city: "New York".to_string(),
        state: "NY".to_string(),
        zip_code: "10001".to_string(),
        country: DEFAULT_COUNTRY.to_string(),
        is_default: true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn book() -> (Arc<MemoryStore>, AddressBook) {
        let storage = Arc::new(MemoryStore::new());
        let book = AddressBook::new(storage.clone());
        (storage, book)
    }

    fn input(name: &str) -> AddressInput {
        AddressInput {
            name: name.to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            street: "9 Elm Road".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            country: String::new(),
        }
    }

    #[tokio::test]
    async fn test_first_list_seeds_sample() {
        let (storage, book) = book();
        let listed = book.list().await.unwrap();

        assert_eq!(listed, vec![sample_address()]);
        let saved: Vec<Address> = read_json(storage.as_ref(), keys::ADDRESSES)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved, listed);
    }

    #[tokio::test]
    async fn test_emptied_book_is_not_reseeded() {
        let (_, book) = book();
        book.delete(&AddressId::new("1")).await.unwrap();

        assert!(book.list().await.unwrap().is_empty());
        assert!(book.default_address().await.unwrap().is_none());

        let first = book.add(input("Jane Roe")).await.unwrap();
        assert!(first.is_default);
    }

    #[tokio::test]
    async fn test_add_keeps_existing_default() {
        let (_, book) = book();
        let added = book.add(input("Jane Roe")).await.unwrap();

        assert!(!added.is_default);
        let default = book.default_address().await.unwrap().unwrap();
        assert_eq!(default.id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_add_rejects_missing_fields() {
        let (_, book) = book();
        let mut incomplete = input("Jane Roe");
        incomplete.city = " ".to_string();

        let result = book.add(incomplete).await;
        assert!(matches!(result, Err(AddressError::MissingFields(ref f)) if f == &vec!["city"]));
        assert_eq!(book.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_default_flag() {
        let (_, book) = book();
        let id = AddressId::new("1");

        let updated = book.update(&id, input("John Q. Doe")).await.unwrap();

        assert_eq!(updated.id, id);
        assert!(updated.is_default);
        assert_eq!(book.list().await.unwrap()[0].name, "John Q. Doe");
        assert!(matches!(
            book.update(&AddressId::new("missing"), input("X")).await,
            Err(AddressError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_deleting_default_promotes_first_remaining() {
        let (_, book) = book();
        let second = book.add(input("Jane Roe")).await.unwrap();
        let third = book.add(input("Max Mustermann")).await.unwrap();

        book.delete(&AddressId::new("1")).await.unwrap();

        let listed = book.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert!(listed[0].is_default);
        assert!(!listed[1].is_default);
        assert_eq!(listed[1].id, third.id);
    }

    #[tokio::test]
    async fn test_set_default_is_exclusive() {
        let (_, book) = book();
        let added = book.add(input("Jane Roe")).await.unwrap();

        let default = book.set_default(&added.id).await.unwrap();

        assert!(default.is_default);
        let defaults: Vec<_> = book
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter(|a| a.is_default)
            .collect();
        assert_eq!(defaults, vec![default]);
    }

    #[tokio::test]
    async fn test_corrupt_book_is_reported() {
        let (storage, book) = book();
        storage.write(keys::ADDRESSES, "{not json").await.unwrap();

        assert!(matches!(
            book.list().await,
            Err(AddressError::Storage(StorageError::Serialization(_)))
        ));
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let (storage, book) = book();
        book.list().await.unwrap();
        storage.set_unavailable(true);

        assert!(matches!(
            book.add(input("Jane Roe")).await,
            Err(AddressError::Storage(_))
        ));
    }
}
