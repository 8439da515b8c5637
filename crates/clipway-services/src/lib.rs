pub mod clipboard;
pub mod confirm;
pub mod content;
pub mod events;
pub mod log_store;
pub mod peer;
pub mod relay;
pub mod settings;

pub use clipboard::ClipboardSink;
pub use confirm::{ConfirmError, ConfirmationGate};
pub use content::{sanitize_filename, ContentBody, ContentEnvelope, ContentKind, FilePayload};
pub use events::{UiEvent, UiEventBus};
pub use log_store::{ContentLogStore, Direction, LogEntry, LogFilter, LogRecord, LogStatus};
pub use peer::{PeerCatalog, PeerNode};
pub use relay::{PollReply, RelayError, RelayManager, RelayStatus, SessionOutcome, SessionPhase};
pub use settings::{Settings, SettingsStore};
