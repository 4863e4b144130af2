//! Text → IPA via the espeak-ng command line
//!
//! Each sentence is phonemized with one `espeak-ng -q --ipa --stdin -v <lang>` invocation.
//! espeak drops punctuation, so the sentence's closing mark is re-attached afterwards to keep
//! the model's prosody cues.

use crate::{Result, TourVoiceError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

const SENTENCE_MARKS: &[char] = &['.', '!', '?', ';', ':'];

#[derive(Debug, Clone)]
pub struct EspeakPhonemizer {
    program: PathBuf,
}

impl EspeakPhonemizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// IPA for one sentence, normalized to Kokoro's phoneme set.
    pub fn phonemize(&self, sentence: &str, language: &str) -> Result<String> {
        let (body, mark) = split_terminal_mark(sentence);
        let mut phonemes = if body.trim().is_empty() {
            String::new()
        } else {
            normalize_phonemes(&self.run(body, language)?)
        };
        if let Some(mark) = mark {
            phonemes.push(mark);
        }
        Ok(phonemes)
    }

    fn run(&self, text: &str, language: &str) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-q", "--ipa", "--stdin", "-v", language]);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!(target: "tts", command = ?cmd, "Running espeak-ng");
        let mut child = cmd.spawn().map_err(|e| {
            TourVoiceError::SynthesisError(format!(
                "failed to run phonemizer '{}': {e}",
                self.program.display()
            ))
        })?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(TourVoiceError::SynthesisError(format!(
                "espeak-ng failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Split narration into sentences at closing punctuation and line breaks.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            flush(&mut current, &mut sentences);
            continue;
        }
        current.push(c);
        let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
        if SENTENCE_MARKS.contains(&c) && at_boundary {
            flush(&mut current, &mut sentences);
        }
    }
    flush(&mut current, &mut sentences);
    sentences
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

fn split_terminal_mark(sentence: &str) -> (&str, Option<char>) {
    let trimmed = sentence.trim_end();
    match trimmed.chars().last() {
        Some(c) if SENTENCE_MARKS.contains(&c) || c == ',' => {
            (&trimmed[..trimmed.len() - c.len_utf8()], Some(c))
        }
        _ => (trimmed, None),
    }
}

/// Map espeak-ng symbols onto the ones Kokoro was trained with.
pub fn normalize_phonemes(ipa: &str) -> String {
    let mapped: String = ipa
        .chars()
        .map(|c| match c {
            'ʲ' => 'j',
            'r' => 'ɹ',
            'x' => 'k',
            'ɬ' => 'l',
            'g' => 'ɡ',
            _ => c,
        })
        .collect();
    // espeak renders a trailing plural "s" as a separate " z".
    let mapped = mapped.replace(" z ", "z ");
    match mapped.strip_suffix(" z") {
        Some(head) => format!("{head}z"),
        None => mapped,
    }
}
