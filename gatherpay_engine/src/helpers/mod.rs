mod aggregates;
mod callback_signature;
mod event_status;

pub use aggregates::{aggregate, Aggregates};
pub use callback_signature::{CallbackVerifier, PaymentCallback, SignatureError};
pub use event_status::{derive_status, parse_scheduled_time, parse_utc_offset, ScheduleError, ONGOING_WINDOW_HOURS};
