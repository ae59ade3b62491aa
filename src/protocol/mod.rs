// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod dispatch;
pub mod messages;
pub mod parser;

pub use dispatch::handle_line;
pub use messages::{Command, Line, Rejection};
pub use parser::{parse_line, LineAssembler};
