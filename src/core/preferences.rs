use crate::domain::model::{DeliveryPreferences, LabelFormat};
use crate::domain::ports::SessionStore;
use crate::utils::error::Result;

pub const SESSION_KEY_EMAIL: &str = "label_mailer.email";
pub const SESSION_KEY_EMAIL_FORMAT: &str = "label_mailer.email_format";

impl DeliveryPreferences {
    pub fn load(session: &dyn SessionStore) -> Self {
        let recipient_email = session.get(SESSION_KEY_EMAIL).unwrap_or_default();
        let label_format = LabelFormat::resolve(session.get(SESSION_KEY_EMAIL_FORMAT).as_deref());

        Self {
            recipient_email,
            label_format,
        }
    }

    pub fn store(&self, session: &mut dyn SessionStore) -> Result<()> {
        session.set(SESSION_KEY_EMAIL, &self.recipient_email)?;
        session.set(SESSION_KEY_EMAIL_FORMAT, self.label_format.as_str())?;
        Ok(())
    }
}
