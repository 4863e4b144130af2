//! Kokoro phoneme vocabulary and token batching

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Longest token sequence the model accepts per inference, padding excluded.
pub const MAX_TOKENS: usize = 510;

pub const PAD_TOKEN: i64 = 0;
pub const SPACE_TOKEN: i64 = 16;

const VOCAB_ENTRIES: &[(char, i64)] = &[
    (';', 1), (':', 2), (',', 3), ('.', 4), ('!', 5), ('?', 6), ('—', 9), ('…', 10),
    ('"', 11), ('(', 12), (')', 13), ('“', 14), ('”', 15), (' ', 16), ('\u{0303}', 17),
    ('ʣ', 18), ('ʥ', 19), ('ʦ', 20), ('ʨ', 21), ('ᵝ', 22), ('\u{AB67}', 23),
    ('A', 24), ('I', 25), ('O', 31), ('Q', 33), ('S', 35), ('T', 36), ('W', 39), ('Y', 41),
    ('ᵊ', 42), ('a', 43), ('b', 44), ('c', 45), ('d', 46), ('e', 47), ('f', 48), ('h', 50),
    ('i', 51), ('j', 52), ('k', 53), ('l', 54), ('m', 55), ('n', 56), ('o', 57), ('p', 58),
    ('q', 59), ('r', 60), ('s', 61), ('t', 62), ('u', 63), ('v', 64), ('w', 65), ('x', 66),
    ('y', 67), ('z', 68), ('ɑ', 69), ('ɐ', 70), ('ɒ', 71), ('æ', 72), ('β', 75), ('ɔ', 76),
    ('ɕ', 77), ('ç', 78), ('ɖ', 80), ('ð', 81), ('ʤ', 82), ('ə', 83), ('ɚ', 85), ('ɛ', 86),
    ('ɜ', 87), ('ɟ', 90), ('ɡ', 92), ('ɥ', 99), ('ɨ', 101), ('ɪ', 102), ('ʝ', 103),
    ('ɯ', 110), ('ɰ', 111), ('ŋ', 112), ('ɳ', 113), ('ɲ', 114), ('ɴ', 115), ('ø', 116),
    ('ɸ', 118), ('θ', 119), ('œ', 120), ('ɹ', 123), ('ɾ', 125), ('ɻ', 126), ('ʁ', 128),
    ('ɽ', 129), ('ʂ', 130), ('ʃ', 131), ('ʈ', 132), ('ʧ', 133), ('ʊ', 135), ('ʋ', 136),
    ('ʌ', 138), ('ɣ', 139), ('ɤ', 140), ('χ', 142), ('ʎ', 143), ('ʒ', 147), ('ʔ', 148),
    ('ˈ', 156), ('ˌ', 157), ('ː', 158), ('ʰ', 162), ('ʲ', 164), ('↓', 169), ('→', 171),
    ('↗', 172), ('↘', 173), ('ᵻ', 177),
];

static VOCAB: Lazy<HashMap<char, i64>> = Lazy::new(|| VOCAB_ENTRIES.iter().copied().collect());

pub fn token_for(c: char) -> Option<i64> {
    VOCAB.get(&c).copied()
}

/// Map phonemes to token ids, dropping symbols outside the vocabulary.
pub fn tokenize(phonemes: &str) -> Vec<i64> {
    phonemes.chars().filter_map(token_for).collect()
}

/// Greedily pack per-sentence token runs into batches of at most `max` tokens.
///
/// Sentences are joined with a space token. A sentence longer than `max` is split at its last
/// space that fits, or hard-split if it has none.
pub fn pack_batches(sentences: Vec<Vec<i64>>, max: usize) -> Vec<Vec<i64>> {
    let max = max.max(1);
    let mut batches = Vec::new();
    let mut current: Vec<i64> = Vec::new();

    for sentence in sentences {
        if sentence.is_empty() {
            continue;
        }
        for piece in split_long(sentence, max) {
            let needed = piece.len() + usize::from(!current.is_empty());
            if current.len() + needed > max {
                batches.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(SPACE_TOKEN);
            }
            current.extend(piece);
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

fn split_long(mut tokens: Vec<i64>, max: usize) -> Vec<Vec<i64>> {
    let mut pieces = Vec::new();
    while tokens.len() > max {
        let cut = tokens[..=max]
            .iter()
            .rposition(|t| *t == SPACE_TOKEN)
            .filter(|pos| *pos > 0)
            .unwrap_or(max);
        let rest = tokens.split_off(cut);
        pieces.push(tokens);
        tokens = rest
            .into_iter()
            .skip_while(|t| *t == SPACE_TOKEN)
            .collect();
    }
    if !tokens.is_empty() {
        pieces.push(tokens);
    }
    pieces
}
