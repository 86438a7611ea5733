pub mod payment_link;
pub mod transaction;

pub use payment_link::{PaymentByLinkRecord, PaymentLinkRecord};
pub use transaction::{
    BillingAddress, CardDetails, CustomerDetails, ItemDetails, PaymentMethod, ShippingDetails,
    TransactionRecord, TransactionRequired,
};
