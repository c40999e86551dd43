use console::{style, StyledObject};
use std::fmt::Display;

/// Terminal styles shared by the banner, phase spinners and summary
fn styled(text: impl Display) -> StyledObject<String> {
    style(text.to_string())
}

pub fn brand(text: impl Display) -> StyledObject<String> {
    styled(text).magenta().bold()
}

pub fn heading(text: impl Display) -> StyledObject<String> {
    styled(text).bright().underlined()
}

pub fn emphasis(text: impl Display) -> StyledObject<String> {
    styled(text).bright()
}

pub fn label(text: impl Display) -> StyledObject<String> {
    styled(text).dim()
}

pub fn subject(text: impl Display) -> StyledObject<String> {
    styled(text).cyan()
}

/// Counts and in-flight phase messages
pub fn highlight(text: impl Display) -> StyledObject<String> {
    styled(text).bright().yellow()
}

pub fn success(text: impl Display) -> StyledObject<String> {
    styled(text).bright().green()
}

/// Green when nothing deprecated turned up, red otherwise.
pub fn findings(count: usize, text: impl Display) -> StyledObject<String> {
    if count == 0 {
        success(text)
    } else {
        styled(text).bright().red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn findings_keep_their_text() {
        let clean = findings(0, "0 pipelines").to_string();
        let dirty = findings(3, "3 pipelines").to_string();

        assert_eq!(console::strip_ansi_codes(&clean), "0 pipelines");
        assert_eq!(console::strip_ansi_codes(&dirty), "3 pipelines");
    }
}
