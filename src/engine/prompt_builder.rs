use crate::model::battle_round::Matchup;

/// Number of candidate arguments requested per suggestion call.
pub const SUGGESTION_COUNT: usize = 12;

/// Builds the prompts sent to the judge model.
/// Only formats text: no parsing, no networking.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn battle(matchup: &Matchup) -> String {
        let mut prompt = String::new();

        push_battle_context(&mut prompt, matchup);
        push_dialogue_instructions(&mut prompt);
        push_verdict_instructions(&mut prompt);
        push_battle_output_format(&mut prompt, matchup);

        prompt
    }

    pub fn suggestions(topic: &str, stance: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str("This is for a Chinese debate game.\n");
        prompt.push_str(&format!("The topic of a playful dispute is: \"{}\".\n", topic.trim()));
        prompt.push_str(&format!("A user's stance is: \"{}\".\n", stance.trim()));
        prompt.push_str(&format!(
            "Generate {SUGGESTION_COUNT} short, punchy, colloquial CHINESE arguments \
             (max 12 Chinese characters each) that support this stance.\n"
        ));
        prompt.push_str(
            "They should sound like spoken language in a chat or a funny argument \
             (e.g., \"这明明就是我的理！\", \"根本不是那样\").\n",
        );
        prompt.push_str("Return strictly a JSON array of strings in Simplified Chinese.\n");

        prompt
    }
}

fn push_battle_context(prompt: &mut String, m: &Matchup) {
    prompt.push_str("Context: A specialized AI for a debate game \"Judge for Us\" (都来评评理).\n");
    prompt.push_str(&format!("Topic: \"{}\"\n\n", m.topic.trim()));

    prompt.push_str("Characters:\n");
    push_character(prompt, 1, &m.p1_name, &m.p1_arg, m.is_p1_manual);
    push_character(prompt, 2, &m.p2_name, &m.p2_arg, m.is_p2_manual);
    prompt.push('\n');
}

fn push_character(prompt: &mut String, number: u8, name: &str, arg: &str, manual: bool) {
    prompt.push_str(&format!(
        "- Player {number} ({}): Holding stance \"{}\"",
        name.trim(),
        arg.trim()
    ));
    if manual {
        prompt.push_str(" (Manually input by user, be responsive to this!)");
    }
    prompt.push('\n');
}

fn push_dialogue_instructions(prompt: &mut String) {
    prompt.push_str(
        "STEP 1: GENERATE THE FIGHT (Dialogue)\n\
         Create a short, spicy, and colloquial dialogue (2-4 turns).\n\
         - P1 speaks first using their stance.\n\
         - P2 MUST retort directly to what P1 said.\n\
         - Focus on \"divine comebacks\" (神回复), sarcasm, or emotional outbursts.\n\
         - Language: Simplified Chinese.\n\n",
    );
}

fn push_verdict_instructions(prompt: &mut String) {
    prompt.push_str(
        "STEP 2: JUDGE THE RESULT (The Verdict)\n\
         Based EXCLUSIVELY on the dialogue you just wrote in Step 1, decide who won.\n\
         - DO NOT randomize. Judge based on \"Emotional Damage\" and logic.\n\
         - If P2's comeback was weak or generic -> P1 wins (score > 60).\n\
         - If P2's comeback was a \"mic drop\" moment or exposed a flaw -> P2 wins (score < 40).\n\
         - If it's a messy tie -> score ~50.\n\n\
         Reason format: a short, spicy comment (max 20 characters) from an onlooker's \
         perspective explaining WHY one side won (e.g., \"P2这一句绝杀！\", \"P1逻辑感人...\").\n\n",
    );
}

fn push_battle_output_format(prompt: &mut String, m: &Matchup) {
    prompt.push_str("OUTPUT FORMAT:\n");
    prompt.push_str("Respond with ONLY this JSON object, no markdown:\n");
    prompt.push_str(&format!(
        "{{\"dialogue\": [{{\"speaker\": \"{}\", \"text\": \"...\"}}, {{\"speaker\": \"{}\", \"text\": \"...\"}}], \
         \"voteP1\": <integer 0-100, >50 means P1 wins, <50 means P2 wins>, \
         \"reason\": \"...\"}}\n",
        m.p1_name.trim(),
        m.p2_name.trim()
    ));
    prompt.push_str("Use the exact player names above as speaker values.\n");
}
