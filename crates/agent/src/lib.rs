//! Reply engine for inbound chat messages.
//!
//! One message in, one reply out:
//! 1. **Coercion** (`intent::InboundBody`) - non-text payloads become text
//! 2. **Classification** (`intent`) - ordered keyword rules, first match wins
//! 3. **Execution** (`runtime`) - at most one Inventory Gateway call
//! 4. **Reply** (`replies`) - brand and currency aware texts
//!
//! The engine keeps nothing between messages. Multi-turn order taking is out
//! of scope; a "buy" message always logs a placeholder order.

pub mod capture;
pub mod intent;
pub mod replies;
pub mod runtime;

pub use capture::{CapturingSender, NO_REPLY};
pub use intent::{classify, InboundBody, Intent, IntentKind};
pub use replies::ReplyTemplates;
pub use runtime::{ReplyEngine, ReplySender};
