pub mod codec;
pub mod messages;

/// Maximum accepted `Content-Length` of an incoming DAP message.
///
/// Caps the buffer allocated for a message body before any of it is read.
pub const MAX_DAP_MESSAGE_BYTES: usize = 16 * 1024 * 1024; // 16 MiB

/// Maximum allowed size of a single DAP header line (in bytes).
pub const MAX_DAP_HEADER_LINE_BYTES: usize = 8 * 1024; // 8 KiB
