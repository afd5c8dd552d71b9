//! `accessmate-sessions` — assist session domain.
//!
//! A session is one assistance run; voice commands, subtitles, and layout
//! analyses are artifacts recorded against a live session.

pub mod layout;
pub mod session;
pub mod subtitle;
pub mod voice;

pub use layout::{IssueSeverity, LayoutAnalysis, LayoutIssue};
pub use session::{AssistSession, NewSession, SessionStatus};
pub use subtitle::{NewSubtitle, Subtitle};
pub use voice::{CommandStatus, VoiceCommand};
