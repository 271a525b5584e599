// Conversation step helpers

/// First step of every conversation
pub const FIRST_STEP: u8 = 1;

/// Terminal step; a conversation that reaches it is complete
pub const FINAL_STEP: u8 = 14;

/// Clamp a server-reported step into the known range
pub fn clamp_step(step: u8) -> u8 {
    step.clamp(FIRST_STEP, FINAL_STEP)
}

/// Human readable label for a step, shown next to the progress indicator
pub fn step_label(step: u8) -> &'static str {
    match clamp_step(step) {
        1 => "Greeting",
        2 => "Product type",
        3 => "Box type & material",
        4 => "Inner cushioning",
        5 => "Dimensions & quantity",
        6 => "Structure summary",
        7 => "Mood & tone",
        8 => "Logo",
        9 => "Special effects",
        10 => "Design summary",
        11 => "Mockup",
        12 => "Quotation",
        13 => "Confirm order",
        _ => "Done",
    }
}

/// Check if a step is the terminal one
pub fn is_terminal_step(step: u8) -> bool {
    step >= FINAL_STEP
}

/// Progress through the conversation in percent
pub fn progress_percent(step: u8) -> u8 {
    let done = (clamp_step(step) - FIRST_STEP) as u32;
    let total = (FINAL_STEP - FIRST_STEP) as u32;
    (done * 100 / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_cover_all_steps() {
        assert_eq!(step_label(1), "Greeting");
        assert_eq!(step_label(5), "Dimensions & quantity");
        assert_eq!(step_label(14), "Done");
    }

    #[test]
    fn test_out_of_range_steps_clamp() {
        assert_eq!(clamp_step(0), FIRST_STEP);
        assert_eq!(clamp_step(99), FINAL_STEP);
        assert_eq!(step_label(0), "Greeting");
        assert_eq!(step_label(42), "Done");
    }

    #[test]
    fn test_terminal_step() {
        assert!(is_terminal_step(14));
        assert!(!is_terminal_step(13));
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress_percent(1), 0);
        assert_eq!(progress_percent(14), 100);
        assert_eq!(progress_percent(10), 69);
    }
}
