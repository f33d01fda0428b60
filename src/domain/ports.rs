use crate::domain::model::{OutgoingEmail, PackagingSlip, ShippingMethod};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Raw answer from the carrier's label endpoint; status is not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait ShippingMethodLookup: Send + Sync {
    async fn find(&self, shipping_method_id: u64) -> Result<Option<ShippingMethod>>;
}

#[async_trait]
pub trait CarrierClient: Send + Sync {
    /// Registers the parcel; on success `slip.carrier_shipment_id` is set.
    async fn create_parcel(&self, slip: &mut PackagingSlip) -> Result<()>;

    async fn fetch_label(&self, carrier_shipment_id: &str, accept: &str)
        -> Result<CarrierResponse>;
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Per-user session values, handed to each handler call.
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
