use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::config::ScoringConfig;
use crate::workflows::competency::{
    Answer, CompetencyDimension, CompetencyEngine, CompetencyQuestion, CompetencySinks,
    CompetencySources, InterviewId, InterviewRecord, OperationScope, RoleScope, ALL_VESSELS,
};
use crate::workflows::trust::memory::{
    InMemoryAssessmentLog, InMemoryCandidates, InMemoryInterviews, InMemoryQuestionBank,
    InMemoryTrustEvents, InMemoryTrustProfiles,
};
use crate::workflows::trust::{
    CandidateDirectory, CandidateId, CandidateProfile, FixedClock, RepositoryError,
};

pub(super) fn question(id: &str, dimension: CompetencyDimension, role: RoleScope) -> CompetencyQuestion {
    CompetencyQuestion {
        id: id.to_string(),
        dimension,
        role_scope: role,
        vessel_scope: ALL_VESSELS.to_string(),
        operation_scope: OperationScope::Both,
        difficulty: 1,
        prompt: format!("Tell us about {}", dimension.label()),
        active: true,
    }
}

/// One generic question per dimension plus a MASTER-only command question.
pub(super) fn question_bank() -> Vec<CompetencyQuestion> {
    let mut questions: Vec<CompetencyQuestion> = CompetencyDimension::ALL
        .into_iter()
        .map(|dimension| {
            question(
                &format!("q-{}", dimension.code().to_lowercase()),
                dimension,
                RoleScope::All,
            )
        })
        .collect();
    questions.push(question(
        "q-master-command",
        CompetencyDimension::Leadership,
        RoleScope::Master,
    ));
    questions
}

pub(super) fn strong_answers() -> Vec<Answer> {
    vec![
        Answer::new(
            "DISCIPLINE",
            "For example on my previous vessel I checked the permit to work and the checklist \
             before entering the tank, and as a result we prevented an accident because the \
             safety procedure was followed by everyone on deck.",
        ),
        Answer::new(
            "LEADERSHIP",
            "Once during cargo operations I took charge of the team, delegated tasks after a short \
             briefing and I decided the order of work, and the result was that we finished safely \
             and on time with full responsibility.",
        ),
        Answer::new(
            "STRESS",
            "I remember an emergency during a blackout when I stayed calm under pressure, set the \
             priority for the crew and I ensured we followed the drill, and finally the situation \
             was resolved without injuries to anyone.",
        ),
        Answer::new(
            "TEAMWORK",
            "Last contract my colleagues and I worked together on a difficult handover, we gave \
             support and help to the new crew members, and as a result the shift ran smoothly and \
             everyone felt trust and respect on board.",
        ),
        Answer::new(
            "COMMS",
            "For instance I reported the engine alarm on the radio using closed loop communication, \
             informed the officer of the watch and explained the situation clearly, and as a \
             result the problem was solved quickly that night.",
        ),
        Answer::new(
            "TECH_PRACTICAL",
            "One time the ballast pump failed, so I checked the valve line, did the repair with the \
             fitter and updated the planned maintenance record, and as a result the pump was fixed \
             before arrival and passed inspection without remarks.",
        ),
    ]
}

pub(super) fn candidate(id: &str, rank: &str) -> CandidateProfile {
    CandidateProfile {
        id: CandidateId::new(id),
        full_name: "Deniz Kaya".to_string(),
        rank: Some(rank.to_string()),
        fleet_type: None,
    }
}

pub(super) fn interview(candidate_id: &str, answers: Vec<Answer>) -> InterviewRecord {
    InterviewRecord {
        id: InterviewId(format!("interview-{candidate_id}")),
        candidate_id: CandidateId::new(candidate_id),
        completed_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()),
        answers,
    }
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date")
}

/// In-memory collaborators wired to one engine.
pub(super) struct Harness {
    pub(super) candidates: InMemoryCandidates,
    pub(super) interviews: InMemoryInterviews,
    pub(super) assessments: InMemoryAssessmentLog,
    pub(super) profiles: InMemoryTrustProfiles,
    pub(super) events: InMemoryTrustEvents,
    pub(super) engine: CompetencyEngine,
}

impl Harness {
    pub(super) fn new(scoring: ScoringConfig) -> Self {
        Self::with_directory(scoring, None)
    }

    pub(super) fn with_directory(
        scoring: ScoringConfig,
        directory: Option<Arc<dyn CandidateDirectory>>,
    ) -> Self {
        let candidates = InMemoryCandidates::default();
        let interviews = InMemoryInterviews::default();
        let assessments = InMemoryAssessmentLog::default();
        let profiles = InMemoryTrustProfiles::default();
        let events = InMemoryTrustEvents::default();

        let engine = CompetencyEngine::new(
            Arc::new(scoring),
            CompetencySources {
                candidates: directory.unwrap_or_else(|| Arc::new(candidates.clone())),
                interviews: Arc::new(interviews.clone()),
                questions: Arc::new(InMemoryQuestionBank::with_questions(question_bank())),
            },
            CompetencySinks {
                assessments: Arc::new(assessments.clone()),
                profiles: Arc::new(profiles.clone()),
                events: Arc::new(events.clone()),
            },
        )
        .with_clock(Arc::new(FixedClock::on(today())));

        Self {
            candidates,
            interviews,
            assessments,
            profiles,
            events,
            engine,
        }
    }

    pub(super) fn seed(&self, profile: CandidateProfile, answers: Vec<Answer>) {
        let id = profile.id.0.clone();
        self.candidates.insert(profile).expect("seed candidate");
        self.interviews
            .insert(interview(&id, answers))
            .expect("seed interview");
    }
}

/// Directory that always fails, used to exercise the fail-open boundary.
pub(super) struct OfflineDirectory;

impl CandidateDirectory for OfflineDirectory {
    fn candidate(&self, _id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("crew database offline".to_string()))
    }
}

/// Directory that panics, standing in for a corrupt row.
pub(super) struct PanickingDirectory;

impl CandidateDirectory for PanickingDirectory {
    fn candidate(&self, _id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        panic!("corrupt candidate row")
    }
}
