use crate::constants::*;

pub fn validate_room_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Room name is required".into());
    }
    if trimmed.chars().count() > MAX_ROOM_NAME_LENGTH {
        return Err(format!(
            "Room name must be at most {} characters",
            MAX_ROOM_NAME_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_room_description(description: &str) -> Result<(), String> {
    if description.trim().chars().count() > MAX_ROOM_DESCRIPTION_LENGTH {
        return Err(format!(
            "Room description must be at most {} characters",
            MAX_ROOM_DESCRIPTION_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_message_content(content: &str, max_length: usize) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Message content is required".into());
    }
    if content.chars().count() > max_length {
        return Err(format!("Message must be at most {} characters", max_length));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Display name is required".into());
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(format!(
            "Display name must be at most {} characters",
            MAX_DISPLAY_NAME_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_emoji(emoji: &str) -> Result<(), String> {
    let trimmed = emoji.trim();
    if trimmed.is_empty() {
        return Err("Emoji is required".into());
    }
    if trimmed.chars().count() > MAX_EMOJI_LENGTH {
        return Err(format!(
            "Emoji must be at most {} characters",
            MAX_EMOJI_LENGTH
        ));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err("Emoji cannot contain whitespace".into());
    }
    Ok(())
}

pub fn validate_attachment_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Attachment name is required".into());
    }
    if trimmed.chars().count() > MAX_ATTACHMENT_NAME_LENGTH {
        return Err(format!(
            "Attachment name must be at most {} characters",
            MAX_ATTACHMENT_NAME_LENGTH
        ));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err("Attachment name cannot contain path separators".into());
    }
    Ok(())
}
