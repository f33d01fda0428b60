pub mod dispatcher;
pub mod events;
pub mod preferences;

pub use crate::domain::model::{
    DeliveryPreferences, LabelDocument, LabelFormat, OutgoingEmail, PackagingSlip, ShippingMethod,
};
pub use crate::domain::ports::{CarrierClient, EmailTransport, SessionStore, ShippingMethodLookup};
pub use crate::utils::error::Result;
