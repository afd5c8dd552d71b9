//! `accessmate-feedback` — feedback domain.

pub mod feedback;

pub use feedback::{Feedback, FeedbackCategory, NewFeedback};
