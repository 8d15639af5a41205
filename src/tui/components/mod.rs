//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: top status bar with bot name and status
//! - `MessageBubble`: one conversation message
//! - `BusyIndicator`: "<bot> is thinking" with animated dots
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `LoginForm`: email/password card shown while logged out
//! - `Composer`: text or image input with the simulated upload
//! - `MessageList`: scrollable conversation view with layout caching
//!
//! Each file keeps its state types, event types, rendering, event handling
//! and tests together. Components receive external data as props and never
//! reach into the core `App` themselves.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status bar)
//! ├── login.rs         (sign-in card)
//! ├── text_field.rs    (single-line editing shared by login and composer)
//! ├── composer.rs      (message / image input)
//! ├── busy.rs          (thinking indicator)
//! ├── message.rs       (single message bubble)
//! └── message_list.rs  (scrollable message container)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod busy;
pub mod composer;
pub mod login;
pub mod message;
pub mod message_list;
pub mod text_field;

pub use composer::{COMPOSER_HEIGHT, Composer, ComposerEvent};
pub use login::{LoginEvent, LoginForm};
pub use message_list::{MessageList, MessageListState};
