use crate::models::Listing;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the listing dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode dataset record: {0}")]
    Decode(#[from] csv::Error),
}

/// Read-only snapshot of historical listings.
///
/// Loaded once at startup and shared across requests; nothing mutates it
/// afterwards, so concurrent reads need no locking.
#[derive(Debug, Clone, Default)]
pub struct ListingStore {
    listings: Vec<Listing>,
}

impl ListingStore {
    /// Load the store from a CSV file with columns
    /// `id,title,category,brand,condition,age_months,asking_price,location`.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| StoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse CSV records from any reader. A header-only input yields an
    /// empty store, which is a valid state.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut listings = Vec::new();
        for record in csv_reader.deserialize() {
            let listing: Listing = record?;
            listings.push(listing);
        }
        Ok(Self { listings })
    }

    /// Build a store directly from records (used by tests and the offline
    /// suggest command).
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Listings in the given category, compared case-insensitively, in
    /// dataset order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Listing> {
        self.listings
            .iter()
            .filter(move |listing| listing.category.eq_ignore_ascii_case(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
id,title,category,brand,condition,age_months,asking_price,location
1,iPhone 12,Mobile,Apple,Good,24,32000,Mumbai
2,Galaxy S21,Mobile,Samsung,Fair,30,21000,Delhi
3,ThinkPad T14,Laptop,Lenovo,Good,18,52000,Pune
";

    #[test]
    fn test_from_reader_parses_all_rows() {
        let store = ListingStore::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.listings()[0].title, "iPhone 12");
        assert_eq!(store.listings()[2].asking_price, 52000.0);
    }

    #[test]
    fn test_header_only_input_is_empty_store() {
        let csv = "id,title,category,brand,condition,age_months,asking_price,location\n";
        let store = ListingStore::from_reader(csv.as_bytes()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_in_category_is_case_insensitive() {
        let store = ListingStore::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let mobiles: Vec<_> = store.in_category("mobile").collect();
        assert_eq!(mobiles.len(), 2);
        assert_eq!(mobiles[0].id, 1);
        assert_eq!(mobiles[1].id, 2);
    }

    #[test]
    fn test_in_category_empty_pool() {
        let store = ListingStore::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(store.in_category("Furniture").count(), 0);
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let csv = "\
id,title,category,brand,condition,age_months,asking_price,location
1,iPhone 12,Mobile,Apple,Good,not-a-number,32000,Mumbai
";
        let result = ListingStore::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_an_open_error() {
        let result = ListingStore::from_csv("/nonexistent/listings.csv");
        assert!(matches!(result, Err(StoreError::Open { .. })));
    }
}
