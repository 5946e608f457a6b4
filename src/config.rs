use std::time::Duration;

/// Record store used when neither the builder nor the environment names one.
pub const DEFAULT_BASE_URL: &str = "https://json-server-ms3r.onrender.com";

/// Environment variable consulted by [`base_url_from_env`].
pub const BASE_URL_ENV: &str = "SALES_API_URL";

/// Collection holding the sales records on the record store.
pub const SALES_COLLECTION: &str = "salesData";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Wire field names, case-sensitive.
pub const FIELD_TRANSACTION_ID: &str = "Transaction ID";
pub const FIELD_DATE: &str = "Date";
pub const FIELD_CUSTOMER_ID: &str = "Customer ID";
pub const FIELD_GENDER: &str = "Gender";
pub const FIELD_AGE: &str = "Age";
pub const FIELD_PRODUCT_CATEGORY: &str = "Product Category";
pub const FIELD_QUANTITY: &str = "Quantity";
pub const FIELD_PRICE_PER_UNIT: &str = "Price per Unit";
pub const FIELD_TOTAL_AMOUNT: &str = "Total Amount";

/// Resolve the record store base URL from [`BASE_URL_ENV`], falling back to
/// [`DEFAULT_BASE_URL`]. A blank variable counts as unset.
pub fn base_url_from_env() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Join a base URL and the sales collection path.
pub fn collection_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), SALES_COLLECTION)
}
