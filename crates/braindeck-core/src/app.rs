//! Main application container
//!
//! One explicit handle object constructed at startup and passed by
//! reference into everything that needs the store. All state flows
//! through here; the view layer is purely a renderer.

use serde::de::DeserializeOwned;
use serde::Serialize;

use braindeck_privacy::{
    estimate_usage, PrefsStore, StorageUsage, TransientStore, PERSISTENT_WIPE_KEYS,
    TRANSIENT_WIPE_KEYS,
};
use braindeck_progress::{next_grade_level, ChainSnapshot, GradeLevel};
use braindeck_quiz::{
    default_bundle, LoadOutcome, NewSession, Question, QuizSession, SampleBundle, SampleLoader,
    SessionPatch, SessionStore, SettingsStore, Topic, TopicStore,
};
use braindeck_storage::Database;

use crate::config::Config;
use crate::state::AppState;
use crate::Result;

pub struct App {
    config: Config,
    db: Database,
    topics: TopicStore,
    sessions: SessionStore,
    settings: SettingsStore,
    samples: SampleLoader,
    sample_bundle: SampleBundle,
    prefs: PrefsStore,
    transient: TransientStore,
    state: AppState,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| crate::CoreError::Config(e.to_string()))?;
        }

        let db = Database::open(&config.database_path)?;
        let prefs = PrefsStore::open(&config.prefs_path)?;

        let topics = TopicStore::new(db.clone());
        let sessions = SessionStore::new(db.clone());
        let settings = SettingsStore::new(db.clone());
        let samples = SampleLoader::new(sessions.clone(), settings.clone());

        Ok(Self {
            config,
            db,
            topics,
            sessions,
            settings,
            samples,
            sample_bundle: default_bundle(),
            prefs,
            transient: TransientStore::new(),
            state: AppState::new(),
        })
    }

    /// Seed sample content if the shipped bundle is newer than the
    /// stored one. Runs on every start; the common path is one read.
    pub fn initialize(&self) -> Result<LoadOutcome> {
        let outcome = self.samples.load_if_needed(&self.sample_bundle)?;

        tracing::info!("BrainDeck core initialized");

        Ok(outcome)
    }

    // === Topic operations ===

    pub fn save_topic(&self, topic: &Topic) -> Result<()> {
        Ok(self.topics.save_topic(topic)?)
    }

    pub fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        Ok(self.topics.get_topic(id)?)
    }

    pub fn get_all_topics(&self) -> Result<Vec<Topic>> {
        Ok(self.topics.get_all_topics()?)
    }

    pub fn delete_topic(&self, id: &str) -> Result<()> {
        Ok(self.topics.delete_topic(id)?)
    }

    // === Session operations ===

    pub fn save_session(&self, session: &NewSession) -> Result<i64> {
        Ok(self.sessions.save_session(session)?)
    }

    pub fn get_session(&self, id: i64) -> Result<Option<QuizSession>> {
        Ok(self.sessions.get_session(id)?)
    }

    pub fn get_all_sessions(&self) -> Result<Vec<QuizSession>> {
        Ok(self.sessions.get_all_sessions()?)
    }

    pub fn get_sessions_by_topic(&self, topic_id: &str) -> Result<Vec<QuizSession>> {
        Ok(self.sessions.get_sessions_by_topic(topic_id)?)
    }

    pub fn get_recent_sessions(&self, limit: usize) -> Result<Vec<QuizSession>> {
        Ok(self.sessions.get_recent_sessions(limit)?)
    }

    pub fn update_session(&self, id: i64, patch: SessionPatch) -> Result<Option<QuizSession>> {
        Ok(self.sessions.update_session(id, patch)?)
    }

    pub fn update_question_explanation(
        &self,
        id: i64,
        question_index: usize,
        explanation: &str,
    ) -> Result<Option<QuizSession>> {
        Ok(self
            .sessions
            .update_question_explanation(id, question_index, explanation)?)
    }

    // === Settings & credential operations ===

    pub fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.settings.get(key)?)
    }

    pub fn save_setting<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        Ok(self.settings.set(key, value)?)
    }

    pub fn remove_setting(&self, key: &str) -> Result<()> {
        Ok(self.settings.remove(key)?)
    }

    pub fn store_openrouter_key(&self, secret: &str) -> Result<()> {
        Ok(self.settings.store_openrouter_key(secret)?)
    }

    pub fn get_openrouter_key(&self) -> Result<Option<String>> {
        Ok(self.settings.get_openrouter_key()?)
    }

    pub fn remove_openrouter_key(&self) -> Result<()> {
        Ok(self.settings.remove_openrouter_key()?)
    }

    pub fn is_openrouter_connected(&self) -> Result<bool> {
        Ok(self.settings.is_openrouter_connected()?)
    }

    pub fn get_welcome_version(&self) -> Result<Option<String>> {
        Ok(self.settings.get_welcome_version()?)
    }

    pub fn set_welcome_version(&self, version: &str) -> Result<()> {
        Ok(self.settings.set_welcome_version(version)?)
    }

    // === Continue chain & progression ===

    pub fn init_continue_chain(
        &self,
        topic: &str,
        starting_grade_level: &str,
        initial_questions: &[Question],
    ) {
        let prompts = initial_questions.iter().map(|q| q.prompt.clone()).collect();
        self.state.chain().init(topic, starting_grade_level, prompts);
    }

    pub fn add_to_continue_chain(&self, new_questions: &[Question]) {
        let prompts = new_questions.iter().map(|q| q.prompt.clone()).collect();
        self.state.chain().push(prompts);
    }

    pub fn clear_continue_chain(&self) {
        self.state.chain().clear();
    }

    pub fn get_continue_chain(&self) -> Option<ChainSnapshot> {
        self.state.chain().snapshot()
    }

    /// The level the next generation request should ask for, or `None`
    /// when no chain is active.
    pub fn chain_next_grade_level(&self) -> Option<GradeLevel> {
        self.state
            .chain()
            .snapshot()
            .map(|chain| next_grade_level(chain.continue_count, &chain.starting_grade_level))
    }

    // === Privacy operations ===

    /// Remove all personally-created content, leaving the app usable.
    ///
    /// The step order is a correctness requirement: the store wipe must
    /// fully succeed before anything else runs, and the sample reload at
    /// the end relies on the version stamp having died with the settings
    /// in step 1.
    pub fn delete_all_user_data(&self) -> Result<()> {
        // 1. Store-resident user data, atomically. Failure propagates
        //    and stops the sequence here.
        self.db.transaction(|conn| {
            conn.execute("DELETE FROM sessions WHERE is_sample = 0", [])?;
            conn.execute("DELETE FROM topics", [])?;
            conn.execute("DELETE FROM settings", [])?;
            Ok(())
        })?;

        // 2. The enumerated persistent side-channel keys, nothing else.
        for key in PERSISTENT_WIPE_KEYS {
            self.prefs.remove(key)?;
        }

        // 3. The enumerated transient keys.
        for key in TRANSIENT_WIPE_KEYS {
            self.transient.remove(key);
        }

        // 4. In-memory state, continue chain included.
        self.state.clear();

        // 5. Reseed so the app is non-empty immediately after deletion.
        self.samples.load_if_needed(&self.sample_bundle)?;

        tracing::info!("Deleted all user data");

        Ok(())
    }

    pub fn estimate_storage_usage(&self) -> Result<StorageUsage> {
        Ok(estimate_usage(&self.db, &self.prefs)?)
    }

    // === Accessors ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn prefs(&self) -> &PrefsStore {
        &self.prefs
    }

    pub fn transient(&self) -> &TransientStore {
        &self.transient
    }
}

impl Clone for App {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db: self.db.clone(),
            topics: self.topics.clone(),
            sessions: self.sessions.clone(),
            settings: self.settings.clone(),
            samples: self.samples.clone(),
            sample_bundle: self.sample_bundle.clone(),
            prefs: self.prefs.clone(),
            transient: self.transient.clone(),
            state: self.state.clone(),
        }
    }
}
