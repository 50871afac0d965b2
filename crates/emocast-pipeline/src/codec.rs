// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant decoding of completion text into typed stage results.
//!
//! The model is asked for strict JSON but may not comply. Decoding never
//! fails: anything that does not match the expected shape comes back as
//! [`Decoded::Malformed`] carrying the raw text.
//!
//! Emotion results are decoded on every read from the stored raw text.
//! Keyphrase and clean results are decoded once, before they are written.

use emocast_core::EmotionProfile;
use emocast_core::types::CampaignPillar;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Outcome of decoding one completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Parsed(T),
    Malformed(String),
}

impl<T> Decoded<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl<T: Default> Decoded<T> {
    /// The parsed value, or the empty result for malformed text.
    pub fn or_empty(self) -> T {
        self.ok().unwrap_or_default()
    }
}

/// One decoding strategy per stage.
pub trait StageResultCodec {
    type Output;

    /// Stage name used in logs and `Malformed` errors.
    const STAGE: &'static str;

    fn decode(raw: &str) -> Decoded<Self::Output>;
}

/// Flat `{emotion: score}` object. An empty object is malformed.
pub struct EmotionCodec;

impl StageResultCodec for EmotionCodec {
    type Output = EmotionProfile;
    const STAGE: &'static str = "emotion";

    fn decode(raw: &str) -> Decoded<EmotionProfile> {
        match decode_json::<EmotionProfile>(Self::STAGE, raw) {
            Decoded::Parsed(profile) if profile.is_empty() => Decoded::Malformed(raw.to_string()),
            other => other,
        }
    }
}

/// `{"result": [string, ...]}`, shared by the clean and keyphrase stages.
pub struct ResultListCodec;

#[derive(Deserialize)]
struct ResultList {
    result: Vec<String>,
}

impl StageResultCodec for ResultListCodec {
    type Output = Vec<String>;
    const STAGE: &'static str = "result-list";

    fn decode(raw: &str) -> Decoded<Vec<String>> {
        match decode_json::<ResultList>(Self::STAGE, raw) {
            Decoded::Parsed(list) => Decoded::Parsed(list.result),
            Decoded::Malformed(raw) => Decoded::Malformed(raw),
        }
    }
}

/// A campaign draft as returned by the model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CampaignDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pillars: Vec<CampaignPillar>,
}

pub struct CampaignCodec;

impl StageResultCodec for CampaignCodec {
    type Output = CampaignDraft;
    const STAGE: &'static str = "campaign";

    fn decode(raw: &str) -> Decoded<CampaignDraft> {
        match decode_json::<CampaignDraft>(Self::STAGE, raw) {
            Decoded::Parsed(draft) if draft.name.trim().is_empty() => {
                Decoded::Malformed(raw.to_string())
            }
            other => other,
        }
    }
}

fn decode_json<T: DeserializeOwned>(stage: &str, raw: &str) -> Decoded<T> {
    match serde_json::from_str::<T>(strip_code_fence(raw)) {
        Ok(value) => Decoded::Parsed(value),
        Err(e) => {
            debug!(stage, error = %e, "completion did not match the expected shape");
            Decoded::Malformed(raw.to_string())
        }
    }
}

/// Removes one enclosing markdown code fence (```` ```json ... ``` ````), if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_EIGHTEEN: &str = r#"{
        "happiness": 0.912, "sadness": 0.021, "anger": 0.0, "fear": 0.013,
        "surprise": 0.2, "disgust": 0.004, "trust": 0.55, "joy": 0.87,
        "love": 0.31, "worry": 0.05, "guilt": 0.0, "shame": 0.001,
        "aversion": 0.002, "hope": 0.64, "pride": 0.22, "motivation": 0.48,
        "satisfaction": 0.77, "frustration": 0.015
    }"#;

    #[test]
    fn emotion_profile_round_trips_all_eighteen() {
        let expected: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(ALL_EIGHTEEN).unwrap();
        let profile = EmotionCodec::decode(ALL_EIGHTEEN).ok().unwrap();

        assert_eq!(profile.len(), 18);
        for name in emocast_core::Emotion::vocabulary() {
            assert_eq!(
                profile.get(&name).copied(),
                expected[&name].as_f64(),
                "score for {name}"
            );
        }
    }

    #[test]
    fn emotion_keys_are_not_restricted_to_vocabulary() {
        let profile = EmotionCodec::decode(r#"{"felicidad":0.9,"tristeza":0.1}"#)
            .ok()
            .unwrap();
        assert_eq!(profile.get("felicidad"), Some(&0.9));
        assert_eq!(profile.get("tristeza"), Some(&0.1));
    }

    #[test]
    fn empty_or_non_numeric_profile_is_malformed() {
        assert!(EmotionCodec::decode("{}").is_malformed());
        assert!(EmotionCodec::decode(r#"{"joy":"high"}"#).is_malformed());
        assert!(EmotionCodec::decode(r#"[0.1, 0.2]"#).is_malformed());
        assert!(EmotionCodec::decode("").is_malformed());
    }

    #[test]
    fn fenced_json_is_accepted() {
        let fenced = "```json\n{\"result\": [\"fresh start\", \"new job\"]}\n```";
        assert_eq!(
            ResultListCodec::decode(fenced).ok().unwrap(),
            vec!["fresh start", "new job"]
        );
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn result_list_falls_back_to_empty() {
        assert_eq!(ResultListCodec::decode(r#"{"phrases":["x"]}"#).or_empty(), Vec::<String>::new());
        assert_eq!(ResultListCodec::decode("Sure! Here you go").or_empty(), Vec::<String>::new());
        assert_eq!(
            ResultListCodec::decode(r#"{"result":[]}"#),
            Decoded::Parsed(Vec::new())
        );
    }

    #[test]
    fn campaign_requires_a_name() {
        let raw = r#"{"name":"Morning Light","description":"d","pillars":[{"name":"Ritual","applications":["a","b"]},{"name":"Craft"}]}"#;
        let draft = CampaignCodec::decode(raw).ok().unwrap();
        assert_eq!(draft.pillars.len(), 2);
        assert!(draft.pillars[1].applications.is_empty());

        assert!(CampaignCodec::decode(r#"{"description":"no name"}"#).is_malformed());
        assert!(CampaignCodec::decode(r#"{"name":"  "}"#).is_malformed());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn non_json_text_is_always_malformed(s in r#"[^{\["0-9tfn\-`\s]\PC*"#) {
                prop_assume!(serde_json::from_str::<serde_json::Value>(&s).is_err());
                prop_assert!(EmotionCodec::decode(&s).is_malformed());
                prop_assert!(ResultListCodec::decode(&s).is_malformed());
                prop_assert!(CampaignCodec::decode(&s).is_malformed());
            }

            #[test]
            fn decoding_never_panics(s in "\\PC*") {
                let _ = EmotionCodec::decode(&s);
                let _ = ResultListCodec::decode(&s);
                let _ = CampaignCodec::decode(&s);
            }

            #[test]
            fn valid_profiles_decode_losslessly(
                entries in proptest::collection::btree_map(
                    "[a-z]{1,12}",
                    (0u32..=1000).prop_map(|n| f64::from(n) / 1000.0),
                    1..18,
                )
            ) {
                let raw = serde_json::to_string(&entries).unwrap();
                let decoded = EmotionCodec::decode(&raw).ok().unwrap();
                prop_assert_eq!(decoded, entries);
            }
        }
    }
}
