pub mod client;
pub mod error;
pub mod flatten;
pub mod pagination;
pub mod throttle;
pub mod types;

pub use client::{ProductsPage, ShopifyAdminClient, ShopifyClientConfig};
pub use error::ShopifyError;
pub use flatten::flatten_products;
pub use throttle::{CallLimit, CALL_LIMIT_HEADER};
pub use types::{ShopifyProduct, ShopifyProductsResponse, ShopifyVariant};
