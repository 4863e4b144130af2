use serde::Serialize;

/// A selectable synthetic voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceCatalogEntry {
    pub id: &'static str,
    #[serde(rename = "name")]
    pub display_name: &'static str,
}

const fn voice(id: &'static str, display_name: &'static str) -> VoiceCatalogEntry {
    VoiceCatalogEntry { id, display_name }
}

pub const DEFAULT_VOICE: &str = "am_liam";

/// Voices shipped in the Kokoro v1.0 voice bank that we expose
pub const KOKORO_VOICES: &[VoiceCatalogEntry] = &[
    voice("af_heart", "Heart (Female)"),
    voice("af_alloy", "Alloy (Female)"),
    voice("af_aoede", "Aoede (Female)"),
    voice("af_bella", "Bella (Female)"),
    voice("af_jessica", "Jessica (Female)"),
    voice("af_kore", "Kore (Female)"),
    voice("af_nicole", "Nicole (Female)"),
    voice("af_nova", "Nova (Female)"),
    voice("af_river", "River (Female)"),
    voice("af_sarah", "Sarah (Female)"),
    voice("af_sky", "Sky (Female)"),
    voice("am_adam", "Adam (Male)"),
    voice("am_echo", "Echo (Male)"),
    voice("am_eric", "Eric (Male)"),
    voice("am_liam", "Liam (Male)"),
    voice("am_michael", "Michael (Male)"),
    voice("am_onyx", "Onyx (Male)"),
    voice("am_puck", "Puck (Male)"),
    voice("am_santa", "Santa (Male)"),
];

pub fn find_voice(id: &str) -> Option<&'static VoiceCatalogEntry> {
    KOKORO_VOICES.iter().find(|v| v.id == id)
}

pub fn is_known_voice(id: &str) -> bool {
    find_voice(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_voice_is_in_catalog() {
        assert!(is_known_voice(DEFAULT_VOICE));
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = KOKORO_VOICES.iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), KOKORO_VOICES.len());
        assert_eq!(KOKORO_VOICES.len(), 19);
    }

    #[test]
    fn serializes_display_name_as_name() {
        let v = serde_json::to_value(find_voice("af_heart").unwrap()).unwrap();
        assert_eq!(v, serde_json::json!({"id": "af_heart", "name": "Heart (Female)"}));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert!(!is_known_voice("zz_nobody"));
        assert!(!is_known_voice(""));
    }
}
