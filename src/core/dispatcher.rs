use crate::core::events::{FormBuilderEvent, Handler, PackagingSlipStatusChangedEvent};
use crate::core::events::{EVENT_FORM_BUILDER, EVENT_STATUS_SHIPPED};
use crate::domain::model::{
    DeliveryPreferences, EmailAttachment, FieldKind, FormField, LabelDocument, LabelFormat,
    OutgoingEmail, PackagingSlip, SubmittedData,
};
use crate::domain::ports::{CarrierClient, EmailTransport, SessionStore, ShippingMethodLookup};
use crate::utils::error::{DispatchError, Result};

pub const DEFAULT_CARRIER_TYPE: &str = "carrier_dhl";
pub const DEFAULT_SUBJECT: &str = "PDF DHL Barcode";
pub const ATTACHMENT_PLACEHOLDER: &str = "See attachment";
pub const ATTACHMENT_FILENAME: &str = "barcode.pdf";

pub const FIELD_EMAIL: &str = "email";
pub const FIELD_EMAIL_FORMAT: &str = "email_format";

const STATUS_OK: u16 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSource {
    /// Recipient and format come from the submitted form; preferences go to the session.
    Submitted,
    /// Always PDF to one address; the session is never touched.
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub recipient: RecipientSource,
    /// When false, carrier failures are logged and reported as `Dropped`.
    pub strict_errors: bool,
}

impl DispatchPolicy {
    pub fn configurable() -> Self {
        Self {
            recipient: RecipientSource::Submitted,
            strict_errors: true,
        }
    }

    pub fn fixed_recipient(address: impl Into<String>) -> Self {
        Self {
            recipient: RecipientSource::Fixed(address.into()),
            strict_errors: false,
        }
    }

    pub fn with_strict_errors(mut self, strict_errors: bool) -> Self {
        self.strict_errors = strict_errors;
        self
    }

    pub fn is_configurable(&self) -> bool {
        matches!(self.recipient, RecipientSource::Submitted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSettings {
    pub carrier_type: String,
    pub subject: String,
    pub policy: DispatchPolicy,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            carrier_type: DEFAULT_CARRIER_TYPE.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            policy: DispatchPolicy::configurable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingRecipient,
    CarrierMismatch {
        shipping_method_id: u64,
        method_type: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Skipped(SkipReason),
    Delivered {
        recipient: String,
        format: LabelFormat,
        carrier_shipment_id: String,
    },
    Dropped {
        recipient: String,
        reason: String,
    },
}

pub struct ShipmentLabelDispatcher<C, M, L>
where
    C: CarrierClient,
    M: EmailTransport,
    L: ShippingMethodLookup,
{
    carrier: C,
    mailer: M,
    shipping_methods: L,
    settings: DispatcherSettings,
}

impl<C, M, L> ShipmentLabelDispatcher<C, M, L>
where
    C: CarrierClient,
    M: EmailTransport,
    L: ShippingMethodLookup,
{
    pub fn new(carrier: C, mailer: M, shipping_methods: L, settings: DispatcherSettings) -> Self {
        Self {
            carrier,
            mailer,
            shipping_methods,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    /// 事件名稱 -> handler 的註冊表，交給宿主的 dispatcher
    pub fn subscribed_events(&self) -> Vec<(&'static str, Handler)> {
        let mut table = vec![(EVENT_STATUS_SHIPPED, Handler::OnStatusShipped)];
        if self.settings.policy.is_configurable() {
            table.push((EVENT_FORM_BUILDER, Handler::OnFormBuilder));
        }
        table
    }

    pub async fn handle_status_shipped(
        &self,
        event: &mut PackagingSlipStatusChangedEvent,
        session: &mut dyn SessionStore,
    ) -> Result<DispatchOutcome> {
        let (recipient, format) = match &self.settings.policy.recipient {
            RecipientSource::Submitted => {
                let Some(recipient) = submitted_recipient(&event.submitted_data) else {
                    tracing::debug!(
                        "📭 Packaging slip {}: no recipient submitted, skipping label delivery",
                        event.packaging_slip.document_number
                    );
                    return Ok(DispatchOutcome::Skipped(SkipReason::MissingRecipient));
                };
                let format = LabelFormat::resolve(
                    event
                        .submitted_data
                        .get(FIELD_EMAIL_FORMAT)
                        .and_then(|v| v.as_str()),
                );

                DeliveryPreferences {
                    recipient_email: recipient.clone(),
                    label_format: format,
                }
                .store(session)?;

                (recipient, format)
            }
            RecipientSource::Fixed(address) => (address.clone(), LabelFormat::Pdf),
        };

        let slip = &mut event.packaging_slip;
        let method = self.shipping_methods.find(slip.shipping_method_id).await?;
        match method {
            Some(m) if m.r#type == self.settings.carrier_type => {}
            other => {
                tracing::debug!(
                    "🚚 Packaging slip {}: shipping method {} is not handled by {}",
                    slip.document_number,
                    slip.shipping_method_id,
                    self.settings.carrier_type
                );
                return Ok(DispatchOutcome::Skipped(SkipReason::CarrierMismatch {
                    shipping_method_id: slip.shipping_method_id,
                    method_type: other.map(|m| m.r#type),
                }));
            }
        }

        match self.deliver(slip, &recipient, format).await {
            Ok(carrier_shipment_id) => {
                tracing::info!(
                    "📨 Packaging slip {}: {} label for {} sent to {}",
                    slip.document_number,
                    format,
                    carrier_shipment_id,
                    recipient
                );
                Ok(DispatchOutcome::Delivered {
                    recipient,
                    format,
                    carrier_shipment_id,
                })
            }
            Err(e) if e.is_carrier_failure() && !self.settings.policy.strict_errors => {
                tracing::warn!(
                    "🔶 Packaging slip {}: label not delivered to {}: {}",
                    slip.document_number,
                    recipient,
                    e
                );
                Ok(DispatchOutcome::Dropped {
                    recipient,
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                tracing::error!(
                    "❌ Packaging slip {}: label delivery failed: {}",
                    slip.document_number,
                    e
                );
                Err(e)
            }
        }
    }

    async fn deliver(
        &self,
        slip: &mut PackagingSlip,
        recipient: &str,
        format: LabelFormat,
    ) -> Result<String> {
        if slip.carrier_shipment_id.is_none() {
            tracing::debug!(
                "📦 Packaging slip {}: registering parcel with carrier",
                slip.document_number
            );
            self.carrier.create_parcel(slip).await?;
        }

        let carrier_shipment_id =
            slip.carrier_shipment_id
                .clone()
                .ok_or_else(|| DispatchError::ParcelNotCreated {
                    packaging_slip: slip.document_number.clone(),
                })?;

        let response = self
            .carrier
            .fetch_label(&carrier_shipment_id, format.content_type())
            .await?;

        if response.status != STATUS_OK {
            return Err(DispatchError::Delivery {
                status: response.status,
                recipient: recipient.to_string(),
            });
        }

        let label = LabelDocument::new(response.body, format);
        let email = self.compose_email(&label, recipient, format);
        self.mailer.send(&email).await?;

        Ok(carrier_shipment_id)
    }

    pub fn compose_email(
        &self,
        label: &LabelDocument,
        recipient: &str,
        format: LabelFormat,
    ) -> OutgoingEmail {
        let (body, attachment) = match format {
            LabelFormat::Zpl => (label.as_text(), None),
            LabelFormat::Pdf => (
                ATTACHMENT_PLACEHOLDER.to_string(),
                Some(EmailAttachment {
                    filename: ATTACHMENT_FILENAME.to_string(),
                    content_type: label.content_type.to_string(),
                    bytes: label.bytes.clone(),
                }),
            ),
        };

        OutgoingEmail {
            subject: self.settings.subject.clone(),
            body,
            recipient: recipient.to_string(),
            attachment,
        }
    }

    pub fn handle_form_builder(&self, event: &mut FormBuilderEvent, session: &dyn SessionStore) {
        if !self.settings.policy.is_configurable() {
            return;
        }

        let prefs = DeliveryPreferences::load(session);

        event.form.add(FormField {
            name: FIELD_EMAIL.to_string(),
            label: "Email".to_string(),
            kind: FieldKind::Email,
            attr_class: "tl_text".to_string(),
            row_class: "widget".to_string(),
            data: prefs.recipient_email,
        });
        event.form.add(FormField {
            name: FIELD_EMAIL_FORMAT.to_string(),
            label: "Email format".to_string(),
            kind: FieldKind::Choice {
                choices: LabelFormat::ALL
                    .iter()
                    .map(|f| f.as_str().to_string())
                    .collect(),
                expanded: true,
                multiple: false,
            },
            attr_class: "tl_radio".to_string(),
            row_class: "tl_radio_container".to_string(),
            data: prefs.label_format.as_str().to_string(),
        });

        for widget in [FIELD_EMAIL, FIELD_EMAIL_FORMAT] {
            if !event.additional_widgets.iter().any(|w| w == widget) {
                event.additional_widgets.push(widget.to_string());
            }
        }
    }
}

fn submitted_recipient(data: &SubmittedData) -> Option<String> {
    data.get(FIELD_EMAIL)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session::MemorySession;
    use crate::adapters::shipping::StaticShippingMethods;
    use crate::core::preferences::{SESSION_KEY_EMAIL, SESSION_KEY_EMAIL_FORMAT};
    use crate::domain::ports::CarrierResponse;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const ZPL_LABEL: &str = "^XA^FO50,50^BCN,100^FDJVGL0123^FS^XZ";
    const PDF_LABEL: &[u8] = b"%PDF-1.4 fake label";

    #[derive(Clone, Default)]
    struct MockCarrier {
        created: Arc<Mutex<Vec<u64>>>,
        fetched: Arc<Mutex<Vec<(String, String)>>>,
        label_status: u16,
        assign_id: bool,
        parcel_rejection: Option<u16>,
    }

    impl MockCarrier {
        fn new() -> Self {
            Self {
                label_status: 200,
                assign_id: true,
                ..Default::default()
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                label_status: status,
                ..Self::new()
            }
        }

        fn rejecting_parcels(status: u16) -> Self {
            Self {
                parcel_rejection: Some(status),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl CarrierClient for MockCarrier {
        async fn create_parcel(&self, slip: &mut PackagingSlip) -> Result<()> {
            self.created.lock().await.push(slip.id);
            if let Some(status) = self.parcel_rejection {
                return Err(DispatchError::ParcelCreation { status });
            }
            if self.assign_id {
                slip.carrier_shipment_id = Some(format!("JVGL{:04}", slip.id));
            }
            Ok(())
        }

        async fn fetch_label(&self, carrier_shipment_id: &str, accept: &str) -> Result<CarrierResponse> {
            self.fetched
                .lock()
                .await
                .push((carrier_shipment_id.to_string(), accept.to_string()));

            let body = if accept == "application/zpl" {
                ZPL_LABEL.as_bytes().to_vec()
            } else {
                PDF_LABEL.to_vec()
            };
            Ok(CarrierResponse {
                status: self.label_status,
                body,
            })
        }
    }

    #[derive(Clone, Default)]
    struct MockMailer {
        sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    }

    #[async_trait]
    impl EmailTransport for MockMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<()> {
            self.sent.lock().await.push(email.clone());
            Ok(())
        }
    }

    fn shipping_methods() -> StaticShippingMethods {
        StaticShippingMethods::from_pairs([(7, "carrier_dhl"), (8, "flat")])
    }

    fn dispatcher(
        carrier: MockCarrier,
        mailer: MockMailer,
        policy: DispatchPolicy,
    ) -> ShipmentLabelDispatcher<MockCarrier, MockMailer, StaticShippingMethods> {
        let settings = DispatcherSettings {
            policy,
            ..Default::default()
        };
        ShipmentLabelDispatcher::new(carrier, mailer, shipping_methods(), settings)
    }

    fn shipped_event(shipping_method_id: u64, data: serde_json::Value) -> PackagingSlipStatusChangedEvent {
        let submitted_data: SubmittedData = serde_json::from_value(data).unwrap();
        PackagingSlipStatusChangedEvent::new(
            PackagingSlip::new(42, "PS-0042", shipping_method_id),
            submitted_data,
        )
    }

    #[tokio::test]
    async fn test_pdf_dispatch_creates_parcel_and_attaches_label() {
        let carrier = MockCarrier::new();
        let mailer = MockMailer::default();
        let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
        let mut session = MemorySession::new();
        let mut event = shipped_event(
            7,
            serde_json::json!({"email": "ops@example.com", "email_format": "PDF"}),
        );

        let outcome = d.handle_status_shipped(&mut event, &mut session).await.unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Delivered {
                recipient: "ops@example.com".to_string(),
                format: LabelFormat::Pdf,
                carrier_shipment_id: "JVGL0042".to_string(),
            }
        );
        assert_eq!(*carrier.created.lock().await, vec![42]);
        assert_eq!(
            *carrier.fetched.lock().await,
            vec![("JVGL0042".to_string(), "application/pdf".to_string())]
        );
        assert_eq!(event.packaging_slip.carrier_shipment_id.as_deref(), Some("JVGL0042"));

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "ops@example.com");
        assert_eq!(sent[0].subject, DEFAULT_SUBJECT);
        assert_eq!(sent[0].body, ATTACHMENT_PLACEHOLDER);
        let attachment = sent[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, "barcode.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.bytes, PDF_LABEL);
    }

    #[tokio::test]
    async fn test_missing_email_format_defaults_to_zpl_body() {
        let carrier = MockCarrier::new();
        let mailer = MockMailer::default();
        let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
        let mut session = MemorySession::new();
        let mut event = shipped_event(7, serde_json::json!({"email": "ops@example.com"}));

        d.handle_status_shipped(&mut event, &mut session).await.unwrap();

        assert_eq!(carrier.fetched.lock().await[0].1, "application/zpl");
        let sent = mailer.sent.lock().await;
        assert_eq!(sent[0].body, ZPL_LABEL);
        assert!(sent[0].attachment.is_none());
    }

    #[tokio::test]
    async fn test_unrecognized_format_falls_back_to_zpl() {
        let carrier = MockCarrier::new();
        let mailer = MockMailer::default();
        let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
        let mut session = MemorySession::new();
        let mut event = shipped_event(
            7,
            serde_json::json!({"email": "ops@example.com", "email_format": "PNG"}),
        );

        let outcome = d.handle_status_shipped(&mut event, &mut session).await.unwrap();

        assert!(matches!(
            outcome,
            DispatchOutcome::Delivered { format: LabelFormat::Zpl, .. }
        ));
        assert!(mailer.sent.lock().await[0].attachment.is_none());
        assert_eq!(session.get(SESSION_KEY_EMAIL_FORMAT).as_deref(), Some("ZPL"));
    }

    #[tokio::test]
    async fn test_missing_or_blank_email_is_a_no_op() {
        for data in [
            serde_json::json!({}),
            serde_json::json!({"email": ""}),
            serde_json::json!({"email": "   ", "email_format": "PDF"}),
            serde_json::json!({"email": null}),
        ] {
            let carrier = MockCarrier::new();
            let mailer = MockMailer::default();
            let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
            let mut session = MemorySession::new();
            let mut event = shipped_event(7, data);

            let outcome = d.handle_status_shipped(&mut event, &mut session).await.unwrap();

            assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::MissingRecipient));
            assert!(carrier.created.lock().await.is_empty());
            assert!(carrier.fetched.lock().await.is_empty());
            assert!(mailer.sent.lock().await.is_empty());
            assert!(session.is_empty());
        }
    }

    #[tokio::test]
    async fn test_other_carrier_types_are_untouched() {
        for method_id in [8, 99] {
            let carrier = MockCarrier::new();
            let mailer = MockMailer::default();
            let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
            let mut session = MemorySession::new();
            let mut event = shipped_event(
                method_id,
                serde_json::json!({"email": "ops@example.com", "email_format": "PDF"}),
            );

            let outcome = d.handle_status_shipped(&mut event, &mut session).await.unwrap();

            assert!(matches!(
                outcome,
                DispatchOutcome::Skipped(SkipReason::CarrierMismatch { .. })
            ));
            assert!(carrier.created.lock().await.is_empty());
            assert!(carrier.fetched.lock().await.is_empty());
            assert!(mailer.sent.lock().await.is_empty());
            assert!(event.packaging_slip.carrier_shipment_id.is_none());
        }
    }

    #[tokio::test]
    async fn test_existing_shipment_id_skips_parcel_creation() {
        let carrier = MockCarrier::new();
        let mailer = MockMailer::default();
        let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
        let mut session = MemorySession::new();
        let mut event = PackagingSlipStatusChangedEvent::new(
            PackagingSlip::new(42, "PS-0042", 7).with_carrier_shipment_id("EXISTING1"),
            serde_json::from_value(serde_json::json!({"email": "ops@example.com"})).unwrap(),
        );

        d.handle_status_shipped(&mut event, &mut session).await.unwrap();

        assert!(carrier.created.lock().await.is_empty());
        assert_eq!(carrier.fetched.lock().await[0].0, "EXISTING1");
    }

    #[tokio::test]
    async fn test_label_failure_is_fatal_when_configurable() {
        let carrier = MockCarrier::failing(404);
        let mailer = MockMailer::default();
        let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
        let mut session = MemorySession::new();
        let mut event = shipped_event(
            7,
            serde_json::json!({"email": "ops@example.com", "email_format": "PDF"}),
        );

        let err = d.handle_status_shipped(&mut event, &mut session).await.unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Delivery { status: 404, ref recipient } if recipient == "ops@example.com"
        ));
        assert_eq!(carrier.fetched.lock().await.len(), 1);
        assert!(mailer.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_fixed_recipient_always_sends_pdf_and_ignores_session() {
        let carrier = MockCarrier::new();
        let mailer = MockMailer::default();
        let d = dispatcher(
            carrier.clone(),
            mailer.clone(),
            DispatchPolicy::fixed_recipient("printer@example.com"),
        );
        let mut session = MemorySession::new();
        let mut event = shipped_event(7, serde_json::json!({"email_format": "ZPL"}));

        let outcome = d.handle_status_shipped(&mut event, &mut session).await.unwrap();

        assert!(matches!(
            outcome,
            DispatchOutcome::Delivered { format: LabelFormat::Pdf, ref recipient, .. }
                if recipient == "printer@example.com"
        ));
        assert_eq!(carrier.fetched.lock().await[0].1, "application/pdf");
        assert!(mailer.sent.lock().await[0].attachment.is_some());
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_fixed_recipient_drops_failures_unless_strict() {
        let policy = DispatchPolicy::fixed_recipient("printer@example.com");

        let mailer = MockMailer::default();
        let d = dispatcher(MockCarrier::failing(500), mailer.clone(), policy.clone());
        let mut event = shipped_event(7, serde_json::json!({}));
        let outcome = d
            .handle_status_shipped(&mut event, &mut MemorySession::new())
            .await
            .unwrap();
        assert!(matches!(outcome, DispatchOutcome::Dropped { .. }));
        assert!(mailer.sent.lock().await.is_empty());

        let d = dispatcher(
            MockCarrier::failing(500),
            MockMailer::default(),
            policy.with_strict_errors(true),
        );
        let mut event = shipped_event(7, serde_json::json!({}));
        let result = d
            .handle_status_shipped(&mut event, &mut MemorySession::new())
            .await;
        assert!(matches!(result, Err(DispatchError::Delivery { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_parcel_rejection_is_fatal_when_configurable() {
        let carrier = MockCarrier::rejecting_parcels(500);
        let mailer = MockMailer::default();
        let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
        let mut event = shipped_event(
            7,
            serde_json::json!({"email": "ops@example.com", "email_format": "PDF"}),
        );

        let err = d
            .handle_status_shipped(&mut event, &mut MemorySession::new())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::ParcelCreation { status: 500 }));
        assert_eq!(*carrier.created.lock().await, vec![42]);
        assert!(carrier.fetched.lock().await.is_empty());
        assert!(mailer.sent.lock().await.is_empty());
        assert!(event.packaging_slip.carrier_shipment_id.is_none());
    }

    #[tokio::test]
    async fn test_parcel_rejection_is_dropped_for_fixed_recipient() {
        let carrier = MockCarrier::rejecting_parcels(500);
        let mailer = MockMailer::default();
        let d = dispatcher(
            carrier.clone(),
            mailer.clone(),
            DispatchPolicy::fixed_recipient("printer@example.com"),
        );
        let mut event = shipped_event(7, serde_json::json!({}));

        let outcome = d
            .handle_status_shipped(&mut event, &mut MemorySession::new())
            .await
            .unwrap();

        match outcome {
            DispatchOutcome::Dropped { recipient, reason } => {
                assert_eq!(recipient, "printer@example.com");
                assert!(reason.contains("500"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(carrier.created.lock().await.len(), 1);
        assert!(carrier.fetched.lock().await.is_empty());
        assert!(mailer.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_parcel_without_shipment_id_is_reported() {
        let carrier = MockCarrier {
            assign_id: false,
            ..MockCarrier::new()
        };
        let mailer = MockMailer::default();
        let d = dispatcher(carrier.clone(), mailer.clone(), DispatchPolicy::configurable());
        let mut event = shipped_event(7, serde_json::json!({"email": "ops@example.com"}));

        let err = d
            .handle_status_shipped(&mut event, &mut MemorySession::new())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::ParcelNotCreated { .. }));
        assert!(carrier.fetched.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_session_preferences_prefill_next_form() {
        let d = dispatcher(MockCarrier::new(), MockMailer::default(), DispatchPolicy::configurable());
        let mut session = MemorySession::new();
        let mut event = shipped_event(
            7,
            serde_json::json!({"email": "ops@example.com", "email_format": "PDF"}),
        );
        d.handle_status_shipped(&mut event, &mut session).await.unwrap();

        assert_eq!(session.get(SESSION_KEY_EMAIL).as_deref(), Some("ops@example.com"));

        let mut form_event = FormBuilderEvent::default();
        d.handle_form_builder(&mut form_event, &session);

        assert_eq!(form_event.form.get(FIELD_EMAIL).unwrap().data, "ops@example.com");
        assert_eq!(form_event.form.get(FIELD_EMAIL_FORMAT).unwrap().data, "PDF");
        assert_eq!(form_event.additional_widgets, vec!["email", "email_format"]);
    }

    #[test]
    fn test_form_builder_defaults_and_idempotence() {
        let d = dispatcher(MockCarrier::new(), MockMailer::default(), DispatchPolicy::configurable());
        let session = MemorySession::new();
        let mut form_event = FormBuilderEvent::default();

        d.handle_form_builder(&mut form_event, &session);
        d.handle_form_builder(&mut form_event, &session);

        assert_eq!(form_event.form.fields.len(), 2);
        assert_eq!(form_event.additional_widgets.len(), 2);

        let email = form_event.form.get(FIELD_EMAIL).unwrap();
        assert_eq!(email.kind, FieldKind::Email);
        assert_eq!(email.data, "");

        let format = form_event.form.get(FIELD_EMAIL_FORMAT).unwrap();
        assert_eq!(format.data, "ZPL");
        assert_eq!(
            format.kind,
            FieldKind::Choice {
                choices: vec!["ZPL".to_string(), "PDF".to_string()],
                expanded: true,
                multiple: false,
            }
        );
    }

    #[test]
    fn test_fixed_recipient_registers_only_shipped_event() {
        let configurable =
            dispatcher(MockCarrier::new(), MockMailer::default(), DispatchPolicy::configurable());
        assert_eq!(configurable.subscribed_events().len(), 2);

        let fixed = dispatcher(
            MockCarrier::new(),
            MockMailer::default(),
            DispatchPolicy::fixed_recipient("printer@example.com"),
        );
        assert_eq!(
            fixed.subscribed_events(),
            vec![(EVENT_STATUS_SHIPPED, Handler::OnStatusShipped)]
        );

        let mut form_event = FormBuilderEvent::default();
        fixed.handle_form_builder(&mut form_event, &MemorySession::new());
        assert!(form_event.form.fields.is_empty());
    }
}
