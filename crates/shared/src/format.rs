//! Display helpers shared by anything that renders session state.

use chrono::{DateTime, Utc};

use crate::constants::{FILE_CAPTION, IMAGE_CAPTION};

/// Sidebar-style age of a timestamp: minutes under an hour, hours under a
/// day, the calendar date after that.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes().max(0);

    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

pub fn clock_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// "alice is typing" / "alice, bob are typing"
pub fn typing_banner<S: AsRef<str>>(names: &[S]) -> Option<String> {
    match names {
        [] => None,
        [one] => Some(format!("{} is typing", one.as_ref())),
        many => {
            let joined = many.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
            Some(format!("{} are typing", joined))
        }
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

pub fn attachment_caption(is_image: bool) -> &'static str {
    if is_image {
        IMAGE_CAPTION
    } else {
        FILE_CAPTION
    }
}
