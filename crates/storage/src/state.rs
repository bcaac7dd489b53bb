use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use swim_core::defaults::default_standards;
use swim_core::dto::{CompetitionRequest, CreateSwimmerRequest, ProfileUpdate, TimeEntryRequest};
use swim_core::models::{
    AgeGroup, Competition, EventKey, QualifyingStandards, Sex, StandardsTable, SwimTimeRecord,
    Swimmer, Tier,
};
use swim_core::services::reconcile::{ImportMode, reconcile};

use crate::error::{Result, StorageError};

/// Application state: every swimmer, competition and the standards database,
/// plus which swimmer the session is acting for.
///
/// Time-record operations act on the current session swimmer.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    swimmers: Vec<Swimmer>,
    competitions: Vec<Competition>,
    standards: QualifyingStandards,
    session: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            swimmers: Vec::new(),
            competitions: Vec::new(),
            standards: default_standards(),
            session: None,
        }
    }

    /// Rebuilds state from stored parts. A session naming an unknown swimmer
    /// is dropped.
    pub fn from_parts(
        swimmers: Vec<Swimmer>,
        competitions: Vec<Competition>,
        standards: QualifyingStandards,
        session: Option<String>,
    ) -> Self {
        let session = session.filter(|id| {
            let known = swimmers.iter().any(|swimmer| &swimmer.id == id);
            if !known {
                warn!(swimmer = %id, "Session refers to unknown swimmer, clearing");
            }
            known
        });
        Self {
            swimmers,
            competitions,
            standards,
            session,
        }
    }

    pub fn swimmers(&self) -> &[Swimmer] {
        &self.swimmers
    }

    pub fn competitions(&self) -> &[Competition] {
        &self.competitions
    }

    pub fn standards(&self) -> &QualifyingStandards {
        &self.standards
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn swimmer(&self, id: &str) -> Option<&Swimmer> {
        self.swimmers.iter().find(|swimmer| swimmer.id == id)
    }

    pub fn competition(&self, id: &str) -> Option<&Competition> {
        self.competitions.iter().find(|competition| competition.id == id)
    }

    pub fn current_swimmer(&self) -> Option<&Swimmer> {
        self.session_id().and_then(|id| self.swimmer(id))
    }

    fn current_mut(&mut self) -> Result<&mut Swimmer> {
        let id = self.session.as_deref().ok_or(StorageError::NoActiveSwimmer)?;
        self.swimmers
            .iter_mut()
            .find(|swimmer| swimmer.id == id)
            .ok_or(StorageError::NoActiveSwimmer)
    }

    fn competition_mut(&mut self, id: &str) -> Result<&mut Competition> {
        self.competitions
            .iter_mut()
            .find(|competition| competition.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("competition {id}")))
    }

    // --- Swimmers & session ---

    pub fn create_swimmer(&mut self, request: CreateSwimmerRequest) -> Result<&Swimmer> {
        request.validate()?;
        if let Some(member_number) = request.member_number.as_deref()
            && self
                .swimmers
                .iter()
                .any(|swimmer| swimmer.member_number.as_deref() == Some(member_number))
        {
            return Err(StorageError::ConstraintViolation(format!(
                "Member number {member_number} is already registered"
            )));
        }

        let mut swimmer = Swimmer::new(
            Uuid::new_v4().to_string(),
            request.name.trim(),
            request.sex,
            request.date_of_birth,
        );
        swimmer.member_number = request.member_number;
        info!(swimmer = %swimmer.id, "Created swimmer {}", swimmer.name);

        self.swimmers.push(swimmer);
        let created = self.swimmers.len() - 1;
        Ok(&self.swimmers[created])
    }

    pub fn delete_swimmer(&mut self, id: &str) -> Result<Swimmer> {
        let index = self
            .swimmers
            .iter()
            .position(|swimmer| swimmer.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("swimmer {id}")))?;
        if self.session.as_deref() == Some(id) {
            self.session = None;
        }
        Ok(self.swimmers.remove(index))
    }

    pub fn select_swimmer(&mut self, id: &str) -> Result<&Swimmer> {
        let swimmer = self
            .swimmers
            .iter()
            .find(|swimmer| swimmer.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("swimmer {id}")))?;
        self.session = Some(swimmer.id.clone());
        Ok(swimmer)
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&Swimmer> {
        update.validate()?;
        let swimmer = self.current_mut()?;
        if let Some(name) = update.name {
            swimmer.name = name.trim().to_string();
        }
        if let Some(sex) = update.sex {
            swimmer.sex = sex;
        }
        if update.date_of_birth.is_some() {
            swimmer.date_of_birth = update.date_of_birth;
        }
        if update.member_number.is_some() {
            swimmer.member_number = update.member_number;
        }
        if let Some(target_percentage) = update.target_percentage {
            swimmer.target_percentage = target_percentage;
        }
        Ok(swimmer)
    }

    /// Adds or removes a competition from the current swimmer's entries.
    pub fn set_entered(&mut self, competition_id: &str, entered: bool) -> Result<()> {
        if entered && self.competition(competition_id).is_none() {
            return Err(StorageError::NotFound(format!("competition {competition_id}")));
        }
        let swimmer = self.current_mut()?;
        if entered {
            swimmer.entered_competition_ids.insert(competition_id.to_string());
        } else {
            swimmer.entered_competition_ids.remove(competition_id);
        }
        Ok(())
    }

    // --- Time records ---

    pub fn add_time(&mut self, request: TimeEntryRequest) -> Result<&SwimTimeRecord> {
        let record = request.into_record()?;
        let swimmer = self.current_mut()?;
        swimmer.times.push(record);
        let added = swimmer.times.len() - 1;
        Ok(&swimmer.times[added])
    }

    /// Replaces the fields of an existing record, keeping its id.
    pub fn update_time(&mut self, id: Uuid, request: TimeEntryRequest) -> Result<&SwimTimeRecord> {
        let mut replacement = request.into_record()?;
        let swimmer = self.current_mut()?;
        let record = swimmer
            .times
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("time {id}")))?;
        replacement.id = id;
        *record = replacement;
        Ok(record)
    }

    pub fn delete_time(&mut self, id: Uuid) -> Result<SwimTimeRecord> {
        let swimmer = self.current_mut()?;
        let index = swimmer
            .times
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("time {id}")))?;
        Ok(swimmer.times.remove(index))
    }

    /// Appends records without any duplicate check.
    pub fn bulk_add_times(&mut self, records: Vec<SwimTimeRecord>) -> Result<usize> {
        ensure_consistent(&records)?;
        let swimmer = self.current_mut()?;
        let count = records.len();
        swimmer.times.extend(records);
        Ok(count)
    }

    /// Folds imported records into the current swimmer's history and returns
    /// the count reported for the chosen mode.
    pub fn import_times(&mut self, mode: ImportMode, incoming: &[SwimTimeRecord]) -> Result<usize> {
        ensure_consistent(incoming)?;
        let swimmer = self.current_mut()?;
        let (times, count) = reconcile(mode, &swimmer.times, incoming);
        swimmer.times = times;
        info!(swimmer = %swimmer.id, ?mode, count, "Imported times");
        Ok(count)
    }

    pub fn merge_times(&mut self, incoming: &[SwimTimeRecord]) -> Result<usize> {
        self.import_times(ImportMode::Merge, incoming)
    }

    pub fn overwrite_times(&mut self, incoming: &[SwimTimeRecord]) -> Result<usize> {
        self.import_times(ImportMode::Overwrite, incoming)
    }

    // --- Standards database ---

    /// Sets one cell of a tier. A time of zero or less removes the cell.
    pub fn update_standard(
        &mut self,
        tier: Tier,
        sex: Sex,
        group: AgeGroup,
        event: EventKey,
        time_ms: i64,
    ) {
        self.standards.tier_mut(tier).times.set(sex, group, event, time_ms);
    }

    pub fn update_standard_meta(&mut self, tier: Tier, name: &str, year: i32) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::ConstraintViolation(
                "Standard name must not be empty".to_string(),
            ));
        }
        let set = self.standards.tier_mut(tier);
        set.name = name.to_string();
        set.year = year;
        Ok(())
    }

    pub fn reset_standards(&mut self) {
        info!("Resetting standards to defaults");
        self.standards = default_standards();
    }

    // --- Competitions ---

    pub fn add_competition(&mut self, request: CompetitionRequest) -> Result<&Competition> {
        let competition = request.into_competition(Uuid::new_v4().to_string())?;
        info!(competition = %competition.id, "Added competition {}", competition.name);
        self.competitions.push(competition);
        let added = self.competitions.len() - 1;
        Ok(&self.competitions[added])
    }

    /// Replaces a competition's details, keeping its id and standards.
    pub fn update_competition(&mut self, id: &str, request: CompetitionRequest) -> Result<&Competition> {
        let mut replacement = request.into_competition(id)?;
        let competition = self.competition_mut(id)?;
        replacement.standards = std::mem::take(&mut competition.standards);
        *competition = replacement;
        Ok(competition)
    }

    /// Removes a competition and withdraws every swimmer from it.
    pub fn delete_competition(&mut self, id: &str) -> Result<Competition> {
        let index = self
            .competitions
            .iter()
            .position(|competition| competition.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("competition {id}")))?;
        for swimmer in &mut self.swimmers {
            swimmer.entered_competition_ids.remove(id);
        }
        Ok(self.competitions.remove(index))
    }

    pub fn update_competition_standard(
        &mut self,
        id: &str,
        sex: Sex,
        group: AgeGroup,
        event: EventKey,
        time_ms: i64,
    ) -> Result<()> {
        self.competition_mut(id)?.standards.set(sex, group, event, time_ms);
        Ok(())
    }

    /// Clears a competition's table and fills it from `standards`. Returns
    /// the number of cells stored.
    pub fn replace_competition_standards(&mut self, id: &str, standards: StandardsTable) -> Result<usize> {
        let competition = self.competition_mut(id)?;
        competition.standards = standards;
        Ok(competition.standards.len())
    }
}

fn ensure_consistent(records: &[SwimTimeRecord]) -> Result<()> {
    match records.iter().find(|record| !record.is_consistent()) {
        Some(record) => Err(StorageError::ConstraintViolation(format!(
            "Time {} does not match {} ms",
            record.formatted_time, record.time_ms
        ))),
        None => Ok(()),
    }
}
