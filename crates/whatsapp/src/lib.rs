//! WhatsApp channel adapter.
//!
//! - **Events** (`events`) - `messages.upsert` payload parsing
//! - **Webhook** (`webhook`) - feeds parsed messages through the reply engine
//!   and collects one reply per message
//!
//! ```text
//! session gateway → POST upsert → parse_upsert → ReplyEngine → replies → session gateway
//! ```
//!
//! Session pairing (QR linking), credential storage and delivery stay with the
//! session gateway that posts the upsert.

pub mod events;
pub mod webhook;

pub use events::{order_id_from_text, parse_upsert, InboundMessage};
pub use webhook::{dispatch_upsert, UpsertReply};
