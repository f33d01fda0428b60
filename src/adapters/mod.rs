// Adapters layer: concrete implementations of the domain ports (carrier http, smtp, session, lookup).

pub mod carrier;
pub mod mailer;
pub mod session;
pub mod shipping;
