//! Application state shared by the command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use habit_core::repository::{
    init_db, DbState, SessionRepository, SessionStore, SqlitePeriodMemory, SORT_OPTION_KEY,
};
use habit_core::{AuthSession, ReminderFeed, Services, SortOption};

use crate::config::{AppConfig, DB_FILE};

pub struct AppState {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub services: Services,
    pub session: Arc<AuthSession>,
    pub sessions: Arc<SessionRepository>,
    pub feed: ReminderFeed<SqlitePeriodMemory>,
}

impl AppState {
    pub fn open(data_dir: &Path, config: AppConfig) -> Result<Self> {
        let db_path = data_dir.join(DB_FILE);
        let db = init_db(&db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;
        Self::with_db(data_dir, config, db)
    }

    pub fn with_db(data_dir: &Path, config: AppConfig, db: DbState) -> Result<Self> {
        let services = Services::build(&config.service_options())?;
        let sessions = Arc::new(SessionRepository::new(db.connection()));
        let store: Arc<dyn SessionStore> = sessions.clone();
        let session = Arc::new(AuthSession::new(services.auth.clone(), Some(store)));
        let feed = ReminderFeed::new(
            services.habits.clone(),
            session.clone(),
            SqlitePeriodMemory::new(db.connection()),
        );

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            services,
            session,
            sessions,
            feed,
        })
    }

    /// Stored sort order, default when unset or unreadable
    pub fn sort_preference(&self) -> SortOption {
        match self.sessions.get_preference(SORT_OPTION_KEY) {
            Ok(Some(value)) => SortOption::from_str(&value),
            Ok(None) => SortOption::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read sort preference");
                SortOption::default()
            }
        }
    }

    pub fn set_sort_preference(&self, sort: SortOption) {
        if let Err(e) = self.sessions.set_preference(SORT_OPTION_KEY, sort.as_str()) {
            tracing::warn!(error = %e, "failed to save sort preference");
        }
    }
}
