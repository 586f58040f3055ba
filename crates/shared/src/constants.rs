// Limits
pub const MAX_MESSAGE_LENGTH: usize = 4000;
pub const MAX_ROOM_NAME_LENGTH: usize = 100;
pub const MAX_ROOM_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;
pub const MAX_ATTACHMENT_NAME_LENGTH: usize = 255;
/// Counted in chars; ZWJ and skin-tone sequences run past a dozen.
pub const MAX_EMOJI_LENGTH: usize = 64;

// Typing
pub const TYPING_TIMEOUT_MS: u64 = 3_000;

// Default captions for attachment messages sent without text
pub const IMAGE_CAPTION: &str = "Shared an image";
pub const FILE_CAPTION: &str = "Shared a file";

/// Quick-reaction emoji offered next to every message.
pub const REACTION_PALETTE: [&str; 8] = ["👍", "❤️", "😂", "😮", "😢", "🎉", "🚀", "👏"];
