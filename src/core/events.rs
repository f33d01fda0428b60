use crate::core::dispatcher::{DispatchOutcome, ShipmentLabelDispatcher};
use crate::domain::model::{FormDefinition, PackagingSlip, SubmittedData};
use crate::domain::ports::{CarrierClient, EmailTransport, SessionStore, ShippingMethodLookup};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::HashMap;

pub const EVENT_STATUS_SHIPPED: &str = "isotope_packaging_slip.status_shipped";
pub const EVENT_FORM_BUILDER: &str = "isotope_packaging_slip.form_builder";

#[derive(Debug, Clone)]
pub struct PackagingSlipStatusChangedEvent {
    pub packaging_slip: PackagingSlip,
    pub submitted_data: SubmittedData,
}

impl PackagingSlipStatusChangedEvent {
    pub fn new(packaging_slip: PackagingSlip, submitted_data: SubmittedData) -> Self {
        Self {
            packaging_slip,
            submitted_data,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormBuilderEvent {
    pub form: FormDefinition,
    /// Widget names the host renders in addition to its own.
    pub additional_widgets: Vec<String>,
}

#[derive(Debug)]
pub enum HostEvent<'a> {
    StatusShipped(&'a mut PackagingSlipStatusChangedEvent),
    FormBuilder(&'a mut FormBuilderEvent),
}

impl HostEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::StatusShipped(_) => EVENT_STATUS_SHIPPED,
            HostEvent::FormBuilder(_) => EVENT_FORM_BUILDER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    OnStatusShipped,
    OnFormBuilder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Shipped(DispatchOutcome),
    FormExtended,
    Ignored,
}

/// Routes host events by name using a subscriber's registration table.
#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    routes: HashMap<&'static str, Handler>,
}

impl EventRouter {
    pub fn new(table: Vec<(&'static str, Handler)>) -> Self {
        Self {
            routes: table.into_iter().collect(),
        }
    }

    pub fn for_dispatcher<C, M, L>(dispatcher: &ShipmentLabelDispatcher<C, M, L>) -> Self
    where
        C: CarrierClient,
        M: EmailTransport,
        L: ShippingMethodLookup,
    {
        Self::new(dispatcher.subscribed_events())
    }

    pub fn handler_for(&self, event_name: &str) -> Option<Handler> {
        self.routes.get(event_name).copied()
    }

    pub async fn dispatch<C, M, L>(
        &self,
        dispatcher: &ShipmentLabelDispatcher<C, M, L>,
        event: HostEvent<'_>,
        session: &mut dyn SessionStore,
    ) -> Result<Routed>
    where
        C: CarrierClient,
        M: EmailTransport,
        L: ShippingMethodLookup,
    {
        match (self.handler_for(event.name()), event) {
            (Some(Handler::OnStatusShipped), HostEvent::StatusShipped(e)) => {
                let outcome = dispatcher.handle_status_shipped(e, session).await?;
                Ok(Routed::Shipped(outcome))
            }
            (Some(Handler::OnFormBuilder), HostEvent::FormBuilder(e)) => {
                dispatcher.handle_form_builder(e, session);
                Ok(Routed::FormExtended)
            }
            (_, event) => {
                tracing::debug!("No handler registered for {}", event.name());
                Ok(Routed::Ignored)
            }
        }
    }
}
