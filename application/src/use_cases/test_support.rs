//! Shared mocks for use case tests

use crate::ports::clock::Clock;
use crate::ports::discussion_observer::{DiscussionObserver, Notice};
use crate::ports::key_value_store::{KeyValueStore, StorageError};
use crate::ports::locale::LocaleProvider;
use chrono::{DateTime, Duration, TimeZone, Utc};
use panel_domain::{
    ConsensusSummary, DiscussionPhase, Language, OpinionType, PanelOpinion, Persona, Speaker,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".to_string()))
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub struct SwitchableLocale {
    language: Mutex<Language>,
}

impl SwitchableLocale {
    pub fn new(tag: &str) -> Self {
        Self {
            language: Mutex::new(Language::new(tag).unwrap()),
        }
    }

    pub fn set(&self, tag: &str) {
        *self.language.lock().unwrap() = Language::new(tag).unwrap();
    }
}

impl LocaleProvider for SwitchableLocale {
    fn active_language(&self) -> Language {
        self.language.lock().unwrap().clone()
    }
}

/// Records every callback as a readable line
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl DiscussionObserver for RecordingObserver {
    fn on_phase_change(&self, phase: DiscussionPhase) {
        self.push(format!("phase:{}", phase));
    }

    fn on_speaker(&self, speaker: &Speaker) {
        self.push(format!("speaker:{}", speaker));
    }

    fn on_opinion_revealed(&self, index: usize, opinion: &PanelOpinion) {
        self.push(format!("revealed:{}:{}", index, opinion.model));
    }

    fn on_consensus(&self, consensus: &ConsensusSummary) {
        self.push(format!("consensus:{}", consensus.recommendation));
    }

    fn on_notice(&self, notice: &Notice) {
        self.push(format!("notice:{:?}", notice.level));
        self.notices.lock().unwrap().push(notice.clone());
    }
}

/// GPT-4, Claude and Grok, in that order
pub fn sample_opinions(at: DateTime<Utc>) -> Vec<PanelOpinion> {
    vec![
        PanelOpinion::from_persona(Persona::Gpt4, "Momentum is fading above resistance.", at)
            .with_disagreements(vec!["valuation".to_string()]),
        PanelOpinion::from_persona(Persona::Claude, "Fundamentals support a hold.", at)
            .with_type(OpinionType::Response)
            .with_agreements(vec!["valuation".to_string(), "guidance".to_string()]),
        PanelOpinion::from_persona(Persona::Grok, "Retail sentiment is euphoric.", at)
            .with_type(OpinionType::Synthesis)
            .with_agreements(vec!["guidance".to_string()]),
    ]
}

pub fn sample_consensus() -> ConsensusSummary {
    ConsensusSummary::new("HOLD", 65)
        .with_timeframe("3 months")
        .with_risk_level("Medium")
        .with_key_points(vec!["Guidance intact".to_string()])
}
