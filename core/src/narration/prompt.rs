/// Target length of a generated tour, in words.
pub const TARGET_WORDS: usize = 3500;

/// Build the tour-guide prompt for `location`.
///
/// The template depends on nothing but the location. It asks the model to avoid stage
/// directions, asides, and emphasis markers; `crate::sanitize` strips whatever slips through.
pub fn build_prompt(location: &str) -> String {
    let location = location.trim();
    format!(
        "Act as an expert historian and engaging storyteller giving a {words}-word spoken audio tour of {location}.\n\
         Speak in the first person and the present tense, as if the listener is standing in front of {location} with you right now.\n\
         \n\
         The tour should:\n\
         - Be detailed, factual, and historically accurate, focusing on specific events, dates, people, and architectural or cultural significance.\n\
         - Keep an engaging, vivid narrative voice without drifting into poetic or fluffy language.\n\
         - Include quirky, surprising, or little-known facts that make the place memorable.\n\
         - Connect the site to its broader historical, social, and cultural context.\n\
         - Use clear, descriptive language that helps the listener picture what they are looking at.\n\
         \n\
         The result should sound like a knowledgeable, passionate historian guiding a curious visitor: dense with facts and insight, not filler.\n\
         \n\
         This text will be read aloud by a speech synthesizer. Write plain prose only.\n\
         Do not use stage directions, sound cues, parenthetical asides, headings, or asterisks for emphasis.",
        words = TARGET_WORDS,
        location = location,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_deterministic_and_names_location() {
        let a = build_prompt("Machu Picchu");
        let b = build_prompt("Machu Picchu");
        assert_eq!(a, b);
        assert!(a.contains("audio tour of Machu Picchu"));
        assert!(a.contains("in front of Machu Picchu"));
        assert!(a.contains("3500-word"));
    }

    #[test]
    fn prompt_forbids_stage_directions_and_emphasis() {
        let p = build_prompt("Rome");
        assert!(p.contains("stage directions"));
        assert!(p.contains("parenthetical asides"));
        assert!(p.contains("asterisks"));
    }

    #[test]
    fn surrounding_whitespace_in_location_is_ignored() {
        assert_eq!(build_prompt("  Kyoto \n"), build_prompt("Kyoto"));
    }
}
